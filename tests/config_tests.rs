// Config loading and validation tests

use metricsd::config::AppConfig;

const VALID_CONFIG: &str = r#"
[server]
port = 8125
host = "0.0.0.0"

[webhook]
path = "/filestack"

[disk]
mount_points = []
ignore_fs = ["tmpfs", "devtmpfs"]
ignore_mount_opts = ["bind"]

[monitoring]
collect_interval_ms = 10000
stats_log_interval_secs = 60
"#;

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.server.port, 8125);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.webhook.path, "/filestack");
    assert_eq!(config.disk.ignore_fs, vec!["tmpfs", "devtmpfs"]);
    assert_eq!(config.disk.ignore_mount_opts, vec!["bind"]);
    assert!(config.disk.mount_points.is_empty());
    assert_eq!(config.monitoring.collect_interval_ms, 10000);
}

#[test]
fn test_disk_section_is_optional() {
    let no_disk = VALID_CONFIG
        .lines()
        .filter(|l| !l.starts_with("mount_points") && !l.starts_with("ignore_") && *l != "[disk]")
        .collect::<Vec<_>>()
        .join("\n");
    let config = AppConfig::load_from_str(&no_disk).expect("load without [disk]");
    assert!(config.disk.mount_points.is_empty());
    assert!(config.disk.ignore_fs.is_empty());
    assert!(config.disk.ignore_mount_opts.is_empty());
}

#[test]
fn test_config_validation_rejects_invalid_port() {
    let bad = VALID_CONFIG.replace("port = 8125", "port = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("server.port"));
}

#[test]
fn test_config_validation_rejects_relative_webhook_path() {
    let bad = VALID_CONFIG.replace("path = \"/filestack\"", "path = \"filestack\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("webhook.path"));
}

#[test]
fn test_config_validation_rejects_collect_interval_zero() {
    let bad = VALID_CONFIG.replace("collect_interval_ms = 10000", "collect_interval_ms = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("collect_interval_ms"));
}

#[test]
fn test_config_validation_rejects_stats_log_interval_zero() {
    let bad = VALID_CONFIG.replace("stats_log_interval_secs = 60", "stats_log_interval_secs = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("stats_log_interval_secs"));
}

#[test]
fn test_config_rejects_garbage_toml() {
    assert!(AppConfig::load_from_str("not toml at all [").is_err());
}
