// SPDX-FileCopyrightText: 2026 Plugdesc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the plugdesc host.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Host version assumed when none is configured.
pub const DEFAULT_HOST_VERSION: u64 = 2022041200;

/// Top-level plugdesc configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PlugdescConfig {
    /// The running host framework.
    #[serde(default)]
    pub host: HostConfig,

    /// Where plugins live and how their manifests are named.
    #[serde(default)]
    pub plugins: PluginsConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// Running host framework settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HostConfig {
    /// Host version (`YYYYMMDDXX`) compared against each plugin's `requires`.
    #[serde(default = "default_host_version")]
    pub version: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            version: default_host_version(),
        }
    }
}

fn default_host_version() -> u64 {
    DEFAULT_HOST_VERSION
}

/// Plugin tree settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PluginsConfig {
    /// Plugin roots, each laid out as `<root>/<type>/<name>/`.
    #[serde(default = "default_roots")]
    pub roots: Vec<String>,

    /// Manifest file name inside each plugin directory.
    #[serde(default = "default_manifest_file")]
    pub manifest_file: String,

    /// TOML file recording versions from previous successful loads.
    #[serde(default = "default_installed_state")]
    pub installed_state: String,
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self {
            roots: default_roots(),
            manifest_file: default_manifest_file(),
            installed_state: default_installed_state(),
        }
    }
}

fn default_roots() -> Vec<String> {
    vec!["plugins".to_string()]
}

fn default_manifest_file() -> String {
    "version.toml".to_string()
}

fn default_installed_state() -> String {
    "installed.toml".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
