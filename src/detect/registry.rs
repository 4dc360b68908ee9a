use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};

use crate::detect::backend::{DetectionCapability, DetectorBackend};
use crate::detect::result::Detection;

type SharedBackend = Arc<Mutex<dyn DetectorBackend>>;

/// Registry of detector backends, keyed by backend name.
///
/// Backends sit behind a `Mutex` because `DetectorBackend::detect` takes
/// `&mut self`; the same lock is the synchronization seam a future worker
/// pool would contend on.
pub struct BackendRegistry {
    backends: HashMap<String, SharedBackend>,
    default_name: Option<String>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self {
            backends: HashMap::new(),
            default_name: None,
        }
    }

    /// Register a backend. The first registered backend becomes the default.
    pub fn register<B: DetectorBackend + 'static>(&mut self, backend: B) {
        let name = backend.name().to_string();
        if self.default_name.is_none() {
            self.default_name = Some(name.clone());
        }
        self.backends.insert(name, Arc::new(Mutex::new(backend)));
    }

    /// Set the default backend by name.
    pub fn set_default(&mut self, name: &str) -> Result<()> {
        if !self.backends.contains_key(name) {
            return Err(anyhow!("backend '{}' not registered", name));
        }
        self.default_name = Some(name.to_string());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<SharedBackend> {
        self.backends.get(name).cloned()
    }

    pub fn default_backend(&self) -> Option<SharedBackend> {
        self.default_name.as_ref().and_then(|name| self.get(name))
    }

    /// List registered backend names.
    pub fn list(&self) -> Vec<String> {
        self.backends.keys().cloned().collect()
    }

    /// Select a backend supporting the capability, preferring the default.
    pub fn backend_for_capability(&self, capability: DetectionCapability) -> Result<SharedBackend> {
        let candidates = self
            .default_backend()
            .into_iter()
            .chain(self.backends.values().cloned());
        for backend in candidates {
            let supports = backend
                .lock()
                .map_err(|_| anyhow!("backend lock poisoned"))?
                .supports(capability);
            if supports {
                return Ok(backend);
            }
        }
        Err(anyhow!(
            "no registered backend supports capability {:?}",
            capability
        ))
    }

    /// Run detection using a backend that supports the requested capability.
    pub fn detect_with_capability(
        &self,
        capability: DetectionCapability,
        pixels: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<Detection>> {
        let backend = self.backend_for_capability(capability)?;
        let mut guard = backend
            .lock()
            .map_err(|_| anyhow!("backend lock poisoned"))?;
        guard.detect(pixels, width, height)
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedBackend {
        output: Vec<Detection>,
    }

    impl DetectorBackend for FixedBackend {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn supports(&self, capability: DetectionCapability) -> bool {
            matches!(capability, DetectionCapability::ConnectorDetection)
        }

        fn detect(&mut self, _pixels: &[u8], _w: u32, _h: u32) -> Result<Vec<Detection>> {
            Ok(self.output.clone())
        }
    }

    #[test]
    fn first_registered_backend_is_default() {
        let mut registry = BackendRegistry::new();
        registry.register(FixedBackend { output: vec![] });
        assert!(registry.default_backend().is_some());
        assert_eq!(registry.list(), vec!["fixed".to_string()]);
    }

    #[test]
    fn detect_routes_through_capability() {
        let mut registry = BackendRegistry::new();
        registry.register(FixedBackend {
            output: vec![Detection::new([0.0, 0.0, 10.0, 10.0], 0.9, 1)],
        });
        let out = registry
            .detect_with_capability(DetectionCapability::ConnectorDetection, &[0u8; 12], 2, 2)
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].class_id, 1);

        assert!(registry
            .backend_for_capability(DetectionCapability::Classification)
            .is_err());
    }

    #[test]
    fn set_default_rejects_unknown_name() {
        let mut registry = BackendRegistry::new();
        assert!(registry.set_default("missing").is_err());
    }
}
