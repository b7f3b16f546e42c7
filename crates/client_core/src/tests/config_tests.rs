use super::{load_settings, load_settings_from, normalize_base_url, Settings, DEFAULT_SETTINGS_FILE};

use std::{
    env, fs,
    path::{Path, PathBuf},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

fn temp_settings_file(contents: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("client_core_config_test_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("client.toml");
    fs::write(&path, contents).expect("write settings");
    path
}

#[test]
fn defaults_point_at_local_backend() {
    let settings = Settings::default();
    assert_eq!(settings.api_base_url, "http://localhost:5000");
    assert_eq!(settings.user_id, "react_user");
    assert_eq!(settings.clock_tick, Duration::from_secs(1));
}

#[test]
fn endpoint_joins_base_and_path() {
    let settings = Settings::with_base_url("https://api.example.com/").expect("settings");
    assert_eq!(
        settings.endpoint("/api/food/chat"),
        "https://api.example.com/api/food/chat"
    );
}

#[test]
fn rejects_non_http_base_urls() {
    assert!(normalize_base_url("ftp://example.com").is_err());
    assert!(normalize_base_url("not a url").is_err());
    assert_eq!(
        normalize_base_url(" http://127.0.0.1:8080// ").expect("valid"),
        "http://127.0.0.1:8080"
    );
}

#[test]
fn missing_settings_file_keeps_defaults() {
    let path = env::temp_dir().join("client_core_config_test_missing/client.toml");
    let settings = load_settings_from(&path).expect("load");
    assert_eq!(settings.user_id, Settings::default().user_id);
}

#[test]
fn settings_file_overrides_defaults() {
    let path = temp_settings_file(
        r#"
user_id = "kiosk"
request_timeout_secs = 5
clock_tick_ms = "250"
"#,
    );

    let settings = load_settings_from(&path).expect("load");
    assert_eq!(settings.user_id, "kiosk");
    assert_eq!(settings.request_timeout, Duration::from_secs(5));
    assert_eq!(settings.clock_tick, Duration::from_millis(250));

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn malformed_settings_value_is_an_error() {
    let path = temp_settings_file("clock_tick_ms = \"soon\"\n");

    let err = load_settings_from(&path).expect_err("must fail");
    assert!(err.to_string().contains("clock_tick_ms"), "unexpected: {err}");

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn load_settings_reads_the_default_file_name() {
    let implicit = load_settings().expect("load implicit");
    let explicit = load_settings_from(Path::new(DEFAULT_SETTINGS_FILE)).expect("load explicit");
    assert_eq!(implicit, explicit);
}
