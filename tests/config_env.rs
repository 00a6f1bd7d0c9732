use assert_fs::TempDir;
use serial_test::serial;
use std::fs;
use tempfile::tempdir;

use arr_relocate::config::{load_file_settings, validate_and_normalize, CONFIG_ENV};
use arr_relocate::{default_config_path, Backend, Config};

struct EnvGuard;

impl EnvGuard {
    fn set(value: &std::path::Path) -> Self {
        unsafe { std::env::set_var(CONFIG_ENV, value) };
        EnvGuard
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        unsafe { std::env::remove_var(CONFIG_ENV) };
    }
}

#[test]
#[serial]
fn env_override_is_used_and_loaded() {
    let td = tempdir().unwrap();
    let cfg = td.path().join("custom.xml");
    fs::write(
        &cfg,
        "<config><sonarr><api_key>from-file</api_key></sonarr></config>",
    )
    .unwrap();
    let _env = EnvGuard::set(&cfg);

    assert_eq!(default_config_path(), Some(cfg.clone()));
    let settings = load_file_settings().unwrap().expect("settings");
    assert_eq!(
        settings.backend(Backend::Sonarr).api_key.as_deref(),
        Some("from-file")
    );
    assert_eq!(settings.backend(Backend::Radarr).api_key, None);
}

#[test]
#[serial]
fn explicit_missing_file_is_an_error() {
    let td = tempdir().unwrap();
    let _env = EnvGuard::set(&td.path().join("nope.xml"));
    let err = load_file_settings().unwrap_err();
    assert!(format!("{err:#}").contains("nope.xml"));
}

#[test]
#[serial]
fn malformed_file_is_an_error() {
    let td = tempdir().unwrap();
    let cfg = td.path().join("broken.xml");
    fs::write(&cfg, "<config><radarr>").unwrap();
    let _env = EnvGuard::set(&cfg);
    assert!(load_file_settings().is_err());
}

#[test]
fn destination_is_created_and_cleaned() {
    let td = TempDir::new().unwrap();
    let root = dunce::canonicalize(td.path()).unwrap();
    let messy = root.join("a/./b/../dst/");
    let mut cfg = Config::new(Backend::Radarr, "key", "archive", &messy);
    cfg.symlink_root = Some(root.join("links/.."));

    validate_and_normalize(&mut cfg).expect("validation creates the destination");

    assert_eq!(cfg.destination_root, root.join("a/dst"));
    assert!(cfg.destination_root.is_dir());
    assert_eq!(cfg.symlink_root.as_deref(), Some(root.as_path()));
}

#[test]
fn destination_that_is_a_file_is_rejected() {
    let td = TempDir::new().unwrap();
    let file = td.path().join("dst");
    fs::write(&file, b"").unwrap();
    let mut cfg = Config::new(Backend::Radarr, "key", "archive", &file);
    assert!(validate_and_normalize(&mut cfg).is_err());
}
