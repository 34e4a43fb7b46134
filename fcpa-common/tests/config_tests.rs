//! Configuration file loading and location
//!
//! Tests that point XDG_CONFIG_HOME at a temporary directory are marked
//! #[serial] so they never race on the environment. They only run on
//! Linux, where `dirs` honours XDG_CONFIG_HOME.

use fcpa_common::config::{locate_config_file, TomlConfig, DEFAULT_PORT};
use fcpa_common::Error;
use serial_test::serial;
use std::env;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_user_config(dir: &TempDir, contents: &str) -> PathBuf {
    let config_dir = dir.path().join("fcpa");
    fs::create_dir_all(&config_dir).unwrap();
    let path = config_dir.join("config.toml");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_full_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fcpa.toml");
    fs::write(
        &path,
        r#"
host = "0.0.0.0"
port = 8080
seed_path = "/srv/fcpa/empty.ardour"
default_sample_rate = 44100
max_upload_bytes = 1048576

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let config = TomlConfig::load(&path).unwrap();
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 8080);
    assert_eq!(config.seed_path, Some(PathBuf::from("/srv/fcpa/empty.ardour")));
    assert_eq!(config.default_sample_rate, 44_100);
    assert_eq!(config.max_upload_bytes, 1_048_576);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_explicit_missing_file_is_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");
    let err = TomlConfig::resolve(Some(&missing)).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn test_malformed_file_is_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "port = \"not a number\"\n").unwrap();
    assert!(matches!(TomlConfig::load(&path), Err(Error::Config(_))));
}

#[test]
#[serial]
#[cfg(target_os = "linux")]
fn test_user_config_is_found() {
    let dir = TempDir::new().unwrap();
    let path = write_user_config(&dir, "port = 6001\n");
    env::set_var("XDG_CONFIG_HOME", dir.path());

    assert_eq!(locate_config_file(), Some(path));
    let config = TomlConfig::resolve(None).unwrap();
    assert_eq!(config.port, 6001);

    env::remove_var("XDG_CONFIG_HOME");
}

#[test]
#[serial]
#[cfg(target_os = "linux")]
fn test_explicit_path_beats_user_config() {
    let dir = TempDir::new().unwrap();
    write_user_config(&dir, "port = 6001\n");
    env::set_var("XDG_CONFIG_HOME", dir.path());

    let explicit = dir.path().join("explicit.toml");
    fs::write(&explicit, "port = 6002\n").unwrap();
    let config = TomlConfig::resolve(Some(&explicit)).unwrap();
    assert_eq!(config.port, 6002);

    env::remove_var("XDG_CONFIG_HOME");
}

#[test]
#[serial]
#[cfg(target_os = "linux")]
fn test_no_user_config_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    env::set_var("XDG_CONFIG_HOME", dir.path());

    if locate_config_file().is_none() {
        let config = TomlConfig::resolve(None).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.seed_path.is_none());
    }

    env::remove_var("XDG_CONFIG_HOME");
}
