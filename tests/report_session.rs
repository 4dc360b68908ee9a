use cable_sentinel::{interpret, Detection, Report, Session, Taxonomy};

fn det(confidence: f32, class_id: u32) -> Detection {
    Detection::new([12.0, 8.0, 96.0, 72.0], confidence, class_id)
}

#[test]
fn session_json_matches_the_report_schema() {
    let taxonomy = Taxonomy::standard();
    let mut session = Session::new();

    // hdmi disconnected (class 5), ethernet connected (class 6)
    session.record(Report::new(
        "bench/frame_001.jpg",
        interpret(&[det(0.88, 5), det(0.91, 6)], &taxonomy),
    ));
    // nothing recognized
    session.record(Report::new(
        "bench/frame_002.jpg",
        interpret(&[det(0.99, 42)], &taxonomy),
    ));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    session.save_json(&path).expect("save session");

    let raw = std::fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();

    let reports = parsed.as_array().expect("array of reports");
    assert_eq!(reports.len(), 2);

    let first = &reports[0];
    assert_eq!(first["image"], "bench/frame_001.jpg");
    assert_eq!(first["cable_status"]["hdmi"], "disconnected");
    assert_eq!(first["cable_status"]["ethernet"], "connected");
    assert_eq!(first["cable_status"]["power"], "unknown");
    assert_eq!(first["summary"]["total_cables"], 5);
    assert_eq!(first["summary"]["connected"], 1);
    assert_eq!(first["summary"]["disconnected"], 1);
    assert_eq!(first["summary"]["unknown"], 3);
    assert_eq!(first["summary"]["overall_status"], "NEEDS_ATTENTION");

    let alerts = first["alerts"].as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["type"], "disconnected_cable");
    assert_eq!(alerts[0]["cable_type"], "hdmi");
    assert_eq!(alerts[0]["message"], "HDMI cable is disconnected!");

    // all-unknown frame is still OK
    let second = &reports[1];
    assert_eq!(second["summary"]["unknown"], 5);
    assert_eq!(second["summary"]["overall_status"], "OK");
    assert!(second["alerts"].as_array().unwrap().is_empty());
}

#[test]
fn non_ascii_image_references_stay_unescaped() {
    let taxonomy = Taxonomy::standard();
    let mut session = Session::new();
    session.record(Report::new("벤치/케이블_01.jpg", interpret(&[], &taxonomy)));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    session.save_json(&path).expect("save session");

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("벤치/케이블_01.jpg"), "non-ASCII was escaped");
}

#[test]
fn saved_session_deserializes_back_into_reports() {
    let taxonomy = Taxonomy::standard();
    let mut session = Session::new();
    session.record(Report::new(
        "frame.jpg",
        interpret(&[det(0.75, 1)], &taxonomy),
    ));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    session.save_json(&path).expect("save session");

    let raw = std::fs::read_to_string(&path).unwrap();
    let reports: Vec<Report> = serde_json::from_str(&raw).expect("deserialize reports");
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].alerts.len(), 1);
    assert_eq!(reports[0].alerts[0].confidence, 0.75);
}
