use clap::Parser;
use notification_center::cli::Cli;
use notification_center::config::{Config, NotificationConfig};
use serial_test::serial;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// A helper function to run a test with a temporary config file.
fn with_config_file<F>(toml_content: &str, test_fn: F)
where
    F: FnOnce(PathBuf),
{
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", toml_content).unwrap();
    let path = file.path().to_path_buf();
    test_fn(path);
}

fn cli_with_config(path: PathBuf) -> Cli {
    Cli {
        config: Some(path),
        ..Default::default()
    }
}

#[test]
#[serial]
fn test_load_full_valid_config() {
    let toml_content = r#"
        log_level = "debug"
        [notifications]
        log_dispatch = true
        slow_listener_threshold_ms = 250
    "#;

    with_config_file(toml_content, |path| {
        let config = Config::load(&cli_with_config(path)).unwrap();

        assert_eq!(config.log_level, "debug");
        assert!(config.notifications.log_dispatch);
        assert_eq!(config.notifications.slow_listener_threshold_ms, Some(250));
    });
}

#[test]
#[serial]
fn test_load_default_values() {
    with_config_file("", |path| {
        let config = Config::load(&cli_with_config(path)).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.notifications, NotificationConfig::default());
    });
}

#[test]
#[serial]
fn test_load_without_config_file() {
    let config = Config::load(&Cli::default()).unwrap();
    assert_eq!(config.log_level, "info");
    assert_eq!(config.notifications.slow_listener_threshold_ms, None);
}

#[test]
#[serial]
fn test_invalid_value_type() {
    let toml_content = r#"
        [notifications]
        slow_listener_threshold_ms = "fast"
    "#;

    with_config_file(toml_content, |path| {
        let result = Config::load(&cli_with_config(path));
        assert!(result.is_err());
    });
}

#[test]
#[serial]
fn test_cli_overrides_file() {
    let toml_content = r#"
        log_level = "warn"
        [notifications]
        slow_listener_threshold_ms = 100
    "#;

    with_config_file(toml_content, |path| {
        let cli = Cli::try_parse_from([
            "notification-center",
            "--config",
            path.to_str().unwrap(),
            "--datafile",
            "datafile.json",
            "--replay",
            "events.jsonl",
            "--log-level",
            "trace",
            "--slow-listener-ms",
            "5",
            "--log-dispatch",
        ])
        .unwrap();
        let config = Config::load(&cli).unwrap();

        assert_eq!(config.log_level, "trace");
        assert_eq!(config.notifications.slow_listener_threshold_ms, Some(5));
        assert!(config.notifications.log_dispatch);
    });
}

#[test]
#[serial]
fn test_env_overrides_file_but_not_cli() {
    let toml_content = r#"
        log_level = "warn"
    "#;

    with_config_file(toml_content, |path| {
        std::env::set_var("NOTIFICATION_CENTER_LOG_LEVEL", "debug");
        std::env::set_var("NOTIFICATION_CENTER_NOTIFICATIONS__LOG_DISPATCH", "true");

        let from_env = Config::load(&cli_with_config(path.clone()));
        let cli = Cli {
            log_level: Some("error".to_string()),
            ..cli_with_config(path)
        };
        let from_cli = Config::load(&cli);

        std::env::remove_var("NOTIFICATION_CENTER_LOG_LEVEL");
        std::env::remove_var("NOTIFICATION_CENTER_NOTIFICATIONS__LOG_DISPATCH");

        let from_env = from_env.unwrap();
        assert_eq!(from_env.log_level, "debug");
        assert!(from_env.notifications.log_dispatch);
        assert_eq!(from_cli.unwrap().log_level, "error");
    });
}
