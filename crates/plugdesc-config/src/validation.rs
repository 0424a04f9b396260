// SPDX-FileCopyrightText: 2026 Plugdesc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::PlugdescConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &PlugdescConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if config.host.version == 0 {
        fail("host.version must be a positive integer".to_string());
    }

    if config.plugins.roots.is_empty() {
        fail("plugins.roots must list at least one directory".to_string());
    }
    for (i, root) in config.plugins.roots.iter().enumerate() {
        if root.trim().is_empty() {
            fail(format!("plugins.roots[{i}] must not be empty"));
        }
    }

    let manifest_file = config.plugins.manifest_file.trim();
    if manifest_file.is_empty() {
        fail("plugins.manifest_file must not be empty".to_string());
    } else if manifest_file.contains(['/', '\\']) {
        fail(format!(
            "plugins.manifest_file `{manifest_file}` must be a file name, not a path"
        ));
    }

    if config.plugins.installed_state.trim().is_empty() {
        fail("plugins.installed_state must not be empty".to_string());
    }

    if !LOG_LEVELS.contains(&config.log.level.as_str()) {
        fail(format!(
            "log.level `{}` must be one of: {}",
            config.log.level,
            LOG_LEVELS.join(", ")
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(config: &PlugdescConfig) -> Vec<String> {
        validate_config(config)
            .unwrap_err()
            .into_iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&PlugdescConfig::default()).is_ok());
    }

    #[test]
    fn zero_host_version_fails_validation() {
        let mut config = PlugdescConfig::default();
        config.host.version = 0;
        assert!(messages(&config).iter().any(|m| m.contains("host.version")));
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = PlugdescConfig::default();
        config.plugins.roots = vec![" ".to_string()];
        config.plugins.manifest_file = "mod/version.toml".to_string();
        config.log.level = "loud".to_string();

        let messages = messages(&config);
        assert_eq!(messages.len(), 3, "{messages:?}");
        assert!(messages.iter().any(|m| m.contains("plugins.roots[0]")));
        assert!(messages.iter().any(|m| m.contains("not a path")));
        assert!(messages.iter().any(|m| m.contains("log.level")));
    }

    #[test]
    fn empty_roots_fail_validation() {
        let mut config = PlugdescConfig::default();
        config.plugins.roots.clear();
        assert!(messages(&config).iter().any(|m| m.contains("at least one")));
    }
}
