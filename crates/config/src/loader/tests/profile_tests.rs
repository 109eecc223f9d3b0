//! Config file layer tests.
//!
//! Responsibilities:
//! - Test reading `google_config.*` keys and the bare `region`/`account` keys.
//! - Test `[default]` versus `[profile <name>]` section naming.
//! - Test rejection of unparseable typed values.

use std::path::Path;

use tempfile::TempDir;

use crate::loader::{ConfigError, ConfigLoader, from_profile_section};
use crate::persistence::{ProfileDocument, ProfileStore};

pub const SAMPLE_CONFIG: &str = "\
[default]
region = us-east-1

[profile work]
region = eu-west-1
account = 123456789012
google_config.google_username = jane@example.com
google_config.google_idp_id = C01abc
google_config.google_sp_id = 123456
google_config.duration = 3600
google_config.role_arn = arn:aws:iam::123456789012:role/Admin
google_config.ask_role = False
google_config.keyring = True
google_config.u2f_disabled = false
";

/// Write `content` as the config file of a fresh store inside `dir`.
pub fn store_with_config(dir: &Path, content: &str) -> ProfileStore {
    let store = ProfileStore::new(dir.join("config"), dir.join("credentials"));
    std::fs::write(store.config_file(), content).unwrap();
    store
}

#[test]
fn test_profile_section_is_read() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_with_config(temp_dir.path(), SAMPLE_CONFIG);
    let doc = ProfileDocument::load(store.config_file()).unwrap();

    let layer = from_profile_section(&doc, "work").unwrap();

    assert_eq!(layer.region.as_deref(), Some("eu-west-1"));
    assert_eq!(layer.account.as_deref(), Some("123456789012"));
    assert_eq!(layer.username.as_deref(), Some("jane@example.com"));
    assert_eq!(layer.idp_id.as_deref(), Some("C01abc"));
    assert_eq!(layer.sp_id.as_deref(), Some("123456"));
    assert_eq!(layer.duration, Some(3600));
    assert_eq!(
        layer.role_arn.as_deref(),
        Some("arn:aws:iam::123456789012:role/Admin")
    );
    assert_eq!(layer.ask_role, Some(false));
    assert_eq!(layer.keyring, Some(true));
    assert_eq!(layer.disable_second_factor, Some(false));
}

#[test]
fn test_default_profile_uses_bare_section() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_with_config(temp_dir.path(), SAMPLE_CONFIG);
    let doc = ProfileDocument::load(store.config_file()).unwrap();

    let layer = from_profile_section(&doc, "default").unwrap();
    assert_eq!(layer.region.as_deref(), Some("us-east-1"));
    assert!(layer.username.is_none());
}

#[test]
fn test_missing_section_is_empty_layer() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_with_config(temp_dir.path(), SAMPLE_CONFIG);
    let doc = ProfileDocument::load(store.config_file()).unwrap();

    let layer = from_profile_section(&doc, "absent").unwrap();
    assert!(layer.region.is_none());
    assert!(layer.duration.is_none());
}

#[test]
fn test_unparseable_file_duration_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_with_config(
        temp_dir.path(),
        "[profile bad]\ngoogle_config.duration = one hour\n",
    );
    let doc = ProfileDocument::load(store.config_file()).unwrap();

    match from_profile_section(&doc, "bad") {
        Err(ConfigError::InvalidFileValue { key, .. }) => {
            assert_eq!(key, "google_config.duration");
        }
        other => panic!("expected InvalidFileValue, got {other:?}"),
    }
}

#[test]
fn test_unparseable_file_bool_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_with_config(temp_dir.path(), "[profile bad]\ngoogle_config.keyring = sometimes\n");
    let doc = ProfileDocument::load(store.config_file()).unwrap();

    assert!(matches!(
        from_profile_section(&doc, "bad"),
        Err(ConfigError::InvalidFileValue { .. })
    ));
}

#[test]
fn test_loader_reads_file_layer_and_creates_missing_files() {
    let temp_dir = TempDir::new().unwrap();
    let store = ProfileStore::new(
        temp_dir.path().join("aws").join("config"),
        temp_dir.path().join("aws").join("credentials"),
    );

    let config = ConfigLoader::new()
        .with_profile_name("fresh")
        .with_store(store.clone())
        .from_profile()
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(config.profile, "fresh");
    assert!(store.config_file().exists());
    assert!(store.credentials_file().exists());
}

#[test]
fn test_loader_with_profile_file_values() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_with_config(temp_dir.path(), SAMPLE_CONFIG);

    let config = ConfigLoader::new()
        .with_profile_name("work")
        .with_store(store)
        .from_profile()
        .unwrap()
        .build()
        .unwrap();

    assert_eq!(config.region.as_deref(), Some("eu-west-1"));
    assert_eq!(config.duration, 3600);
    assert!(config.keyring);
    assert!(!config.disable_second_factor);
}

#[test]
fn test_file_duration_out_of_bounds_fails_validation() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_with_config(temp_dir.path(), "[profile short]\ngoogle_config.duration = 60\n");

    let result = ConfigLoader::new()
        .with_profile_name("short")
        .with_store(store)
        .from_profile()
        .unwrap()
        .build();

    assert!(matches!(result, Err(ConfigError::Validation(_))));
}
