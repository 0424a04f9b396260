// SPDX-FileCopyrightText: 2026 Plugdesc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Versions recorded by previous successful loads.
//!
//! Stored as TOML:
//!
//! ```toml
//! [installed]
//! mod_book = 2022041900
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use plugdesc_core::{ComponentName, PlugdescError, Version};
use serde::{Deserialize, Serialize};

use crate::manifest::PluginManifest;

/// Map of component to the version last installed.
///
/// Keys are validated as component names when the file is read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstalledVersions {
    #[serde(default)]
    installed: BTreeMap<ComponentName, Version>,
}

impl InstalledVersions {
    /// Load state from `path`. A missing file is an empty state.
    pub fn load(path: &Path) -> Result<Self, PlugdescError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(PlugdescError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, PlugdescError> {
        toml::from_str(content)
            .map_err(|e| PlugdescError::Config(format!("invalid installed state: {e}")))
    }

    /// Write state to `path`, replacing any previous file.
    pub fn save(&self, path: &Path) -> Result<(), PlugdescError> {
        let content = toml::to_string(self)
            .map_err(|e| PlugdescError::Config(format!("cannot serialize installed state: {e}")))?;
        std::fs::write(path, content).map_err(|source| PlugdescError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn get(&self, component: &str) -> Option<Version> {
        let component = ComponentName::new(component).ok()?;
        self.installed.get(&component).copied()
    }

    /// Remember the manifest's version as installed.
    pub fn record(&mut self, manifest: &PluginManifest) {
        self.installed
            .insert(manifest.component().clone(), manifest.version());
    }

    /// Installed components in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Version)> {
        self.installed.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.installed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.installed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty_state() {
        let tmp = tempfile::tempdir().unwrap();
        let state = InstalledVersions::load(&tmp.path().join("installed.toml")).unwrap();
        assert!(state.is_empty());
    }

    #[test]
    fn record_then_save_and_reload() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("installed.toml");

        let manifest = PluginManifest::new(
            ComponentName::new("mod_book").unwrap(),
            Version::new(2022041900).unwrap(),
            Version::new(2022041200).unwrap(),
            Some(0),
        );
        let mut state = InstalledVersions::default();
        state.record(&manifest);
        state.save(&path).unwrap();

        let reloaded = InstalledVersions::load(&path).unwrap();
        assert_eq!(reloaded.get("mod_book").map(Version::get), Some(2022041900));
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn zero_version_in_state_is_rejected() {
        let err = InstalledVersions::from_toml("[installed]\nmod_book = 0\n").unwrap_err();
        assert!(err.to_string().contains("invalid installed state"));
    }

    #[test]
    fn invalid_component_key_is_rejected() {
        let err = InstalledVersions::from_toml("[installed]\nBook = 2022041900\n").unwrap_err();
        assert!(err.to_string().contains("<type>_<name>"), "{err}");
    }

    #[test]
    fn unknown_table_is_rejected() {
        assert!(InstalledVersions::from_toml("[plugins]\nmod_book = 1\n").is_err());
    }
}
