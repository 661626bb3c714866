use asset_sink::{FsSink, Sink, SinkError};
use bytes::Bytes;

#[tokio::test]
async fn round_trips_objects_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let sink = FsSink::open(dir.path().join("objects")).await.unwrap();

    sink.set("feeda.json", Bytes::from_static(b"{\"id\":\"a\"}")).await.unwrap();

    assert_eq!(
        sink.get("feeda.json").await.unwrap(),
        Bytes::from_static(b"{\"id\":\"a\"}")
    );
    assert!(dir.path().join("objects").join("feeda.json").exists());
}

#[tokio::test]
async fn absent_file_is_structured_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let sink = FsSink::new(dir.path());

    match sink.get("missing.json").await {
        Err(SinkError::NotFound { key }) => assert_eq!(key, "missing.json"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn overwrite_leaves_no_temp_files() {
    let dir = tempfile::tempdir().unwrap();
    let sink = FsSink::new(dir.path());

    sink.set("a.css", Bytes::from_static(b"one")).await.unwrap();
    sink.set("a.css", Bytes::from_static(b"two")).await.unwrap();

    assert_eq!(sink.get("a.css").await.unwrap(), Bytes::from_static(b"two"));
    let names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(names, vec!["a.css".to_string()]);
}

#[tokio::test]
async fn traversal_keys_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let sink = FsSink::new(dir.path());

    let err = sink.set("../escape.js", Bytes::new()).await.unwrap_err();
    assert!(matches!(err, SinkError::InvalidKey { .. }));
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn failed_writes_leave_no_temp_files() {
    let dir = tempfile::tempdir().unwrap();
    let sink = FsSink::new(dir.path());

    // A directory squatting on the key makes the final rename fail.
    std::fs::create_dir(dir.path().join("a.css")).unwrap();
    std::fs::write(dir.path().join("a.css").join("keep"), b"x").unwrap();

    let err = sink.set("a.css", Bytes::from_static(b"body")).await.unwrap_err();
    assert!(matches!(err, SinkError::Io { .. }));

    let names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(names, vec!["a.css".to_string()]);
}

#[tokio::test]
async fn missing_root_fails_without_side_effects() {
    let dir = tempfile::tempdir().unwrap();
    let sink = FsSink::new(dir.path().join("absent"));

    let err = sink.set("a.js", Bytes::from_static(b"x")).await.unwrap_err();

    assert!(matches!(err, SinkError::Io { .. }));
    assert!(!dir.path().join("absent").exists());
}
