// SPDX-FileCopyrightText: 2026 Plugdesc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the plugdesc configuration system.

use std::path::Path;

use plugdesc_config::diagnostic::ConfigError;
use plugdesc_config::model::{PlugdescConfig, DEFAULT_HOST_VERSION};
use plugdesc_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

#[test]
fn valid_toml_deserializes() {
    let toml = r#"
[host]
version = 2024100700

[plugins]
roots = ["plugins", "/opt/host/local"]
manifest_file = "manifest.toml"
installed_state = "/var/lib/host/installed.toml"

[log]
level = "debug"
"#;

    let config = load_and_validate_str(toml).expect("valid config");
    assert_eq!(config.host.version, 2024100700);
    assert_eq!(config.plugins.roots, vec!["plugins", "/opt/host/local"]);
    assert_eq!(config.plugins.manifest_file, "manifest.toml");
    assert_eq!(config.plugins.installed_state, "/var/lib/host/installed.toml");
    assert_eq!(config.log.level, "debug");
}

#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");
    assert_eq!(config.host.version, DEFAULT_HOST_VERSION);
    assert_eq!(config.plugins.roots, vec!["plugins"]);
    assert_eq!(config.plugins.manifest_file, "version.toml");
    assert_eq!(config.plugins.installed_state, "installed.toml");
    assert_eq!(config.log.level, "info");
}

#[test]
fn unknown_key_gets_suggestion_and_span() {
    let toml = "[plugins]\nmanfest_file = \"v.toml\"\n";
    let errors = load_and_validate_str(toml).expect_err("unknown key must be rejected");
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key,
            suggestion,
            valid_keys,
            ..
        } => {
            assert_eq!(key, "manfest_file");
            assert_eq!(suggestion.as_deref(), Some("manifest_file"));
            assert!(valid_keys.contains("installed_state"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

#[test]
fn wrong_type_is_reported() {
    let toml = "[host]\nversion = \"latest\"\n";
    let errors = load_and_validate_str(toml).expect_err("string version must be rejected");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key == "host.version")),
        "{errors:?}"
    );
}

#[test]
fn zero_host_version_fails_validation() {
    let errors = load_and_validate_str("[host]\nversion = 0\n").expect_err("zero is invalid");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::Validation { message } if message.contains("host.version")
    )));
}

#[test]
fn env_override_wins_over_file() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("plugdesc.toml", "[host]\nversion = 2022041200\n")?;
        jail.set_env("PLUGDESC_HOST_VERSION", "2025050200");
        jail.set_env("PLUGDESC_LOG_LEVEL", "debug");

        let config = load_and_validate_path(Path::new("plugdesc.toml"))
            .map_err(|errors| format!("{errors:?}"))?;
        assert_eq!(config.host.version, 2025050200);
        assert_eq!(config.log.level, "debug");
        Ok(())
    });
}

#[test]
fn explicit_path_is_loaded() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("plugdesc.toml");
    std::fs::write(&path, "[plugins]\nroots = [\"custom\"]\n").unwrap();

    let config = load_and_validate_path(&path).expect("file config should load");
    assert_eq!(config.plugins.roots, vec!["custom"]);
}

#[test]
fn defaults_serialize_to_loadable_toml() {
    let rendered = toml::to_string(&PlugdescConfig::default()).unwrap();
    let config = load_and_validate_str(&rendered).expect("rendered defaults should load");
    assert_eq!(config.host.version, DEFAULT_HOST_VERSION);
}
