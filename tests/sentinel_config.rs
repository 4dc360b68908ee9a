use std::sync::Mutex;

use tempfile::NamedTempFile;

use cable_sentinel::config::SentinelConfig;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "CABLE_SENTINEL_CONFIG",
        "CABLE_SENTINEL_CONF_THRESHOLD",
        "CABLE_SENTINEL_ALERT_THRESHOLD",
        "CABLE_SENTINEL_REPORT_OUT",
        "CABLE_SENTINEL_CAMERA",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn defaults_apply_without_file_or_env() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let cfg = SentinelConfig::load().expect("load config");
    assert_eq!(cfg.conf_threshold, 0.25);
    assert_eq!(cfg.alert_threshold, 0.7);
    assert_eq!(cfg.backend, "stub");
    assert_eq!(cfg.camera.device, "stub://bench_cam");
    assert_eq!(cfg.camera.target_fps, 10);

    clear_env();
}

#[test]
fn loads_config_from_file_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let json = r#"{
        "conf_threshold": 0.4,
        "alert_threshold": 0.8,
        "report_out": "bench_report.json",
        "camera": {
            "device": "stub://line_cam",
            "target_fps": 15,
            "width": 800,
            "height": 600
        }
    }"#;
    std::io::Write::write_all(&mut file, json.as_bytes()).expect("write config");

    std::env::set_var("CABLE_SENTINEL_CONFIG", file.path());
    std::env::set_var("CABLE_SENTINEL_ALERT_THRESHOLD", "0.9");
    std::env::set_var("CABLE_SENTINEL_CAMERA", "stub://overhead");

    let cfg = SentinelConfig::load().expect("load config");

    assert_eq!(cfg.conf_threshold, 0.4);
    assert_eq!(cfg.alert_threshold, 0.9);
    assert_eq!(cfg.report_out.to_str(), Some("bench_report.json"));
    assert_eq!(cfg.camera.device, "stub://overhead");
    assert_eq!(cfg.camera.target_fps, 15);
    assert_eq!(cfg.camera.width, 800);
    assert_eq!(cfg.camera.height, 600);

    clear_env();
}

#[test]
fn out_of_range_threshold_is_fatal() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("CABLE_SENTINEL_ALERT_THRESHOLD", "1.5");
    assert!(SentinelConfig::load().is_err());

    std::env::set_var("CABLE_SENTINEL_ALERT_THRESHOLD", "not-a-number");
    assert!(SentinelConfig::load().is_err());

    clear_env();
}
