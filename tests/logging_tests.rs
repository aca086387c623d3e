use astra_mentor::logging::init_tracing;
use astra_mentor::Config;

#[test]
fn file_layer_installed_once() {
    let dir = tempfile::tempdir().unwrap();
    let log_dir = dir.path().join("logs");
    let log_dir_str = log_dir.to_string_lossy().to_string();

    let config = Config::from_lookup(|key| match key {
        "RUST_LOG" => Some("astra_mentor=debug".to_string()),
        "ASTRA_FILE_LOGS" => Some("1".to_string()),
        "LOG_DIR" => Some(log_dir_str.clone()),
        _ => None,
    });
    assert!(config.file_logs);
    assert_eq!(config.log_dir, log_dir);

    let guard = init_tracing(&config);
    assert!(guard.is_some());
    assert!(log_dir.is_dir());
    tracing::info!("subscriber installed");

    // a subscriber is already set; later calls are no-ops
    let again = Config {
        log_level: "not a [valid filter".to_string(),
        ..config.clone()
    };
    assert!(init_tracing(&again).is_none());
    assert!(init_tracing(&Config::default()).is_none());
}
