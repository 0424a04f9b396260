// SPDX-FileCopyrightText: 2026 Plugdesc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./plugdesc.toml` > `~/.config/plugdesc/plugdesc.toml`
//! > `/etc/plugdesc/plugdesc.toml`, with environment variable overrides via
//! the `PLUGDESC_` prefix.

// figment::Error is external and cannot be boxed without a wrapper.
#![allow(clippy::result_large_err)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::PlugdescConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/plugdesc/plugdesc.toml";

/// Config file in the working directory.
pub const LOCAL_CONFIG_PATH: &str = "plugdesc.toml";

/// Per-user config file under the XDG config directory.
pub fn user_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("plugdesc/plugdesc.toml"))
        .unwrap_or_default()
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/plugdesc/plugdesc.toml`
/// 3. `~/.config/plugdesc/plugdesc.toml`
/// 4. `./plugdesc.toml`
/// 5. `PLUGDESC_*` environment variables
pub fn load_config() -> Result<PlugdescConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<PlugdescConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PlugdescConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PlugdescConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PlugdescConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for hierarchy loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(PlugdescConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path()))
        .merge(Toml::file(LOCAL_CONFIG_PATH))
        .merge(env_provider())
}

/// Environment provider with explicit section mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so that
/// `PLUGDESC_PLUGINS_MANIFEST_FILE` maps to `plugins.manifest_file`.
/// Figment hands the mapper the key in its original case.
fn env_provider() -> Env {
    Env::prefixed("PLUGDESC_").map(|key| map_env_key(&key.as_str().to_ascii_lowercase()).into())
}

/// Map a lowercased, prefix-stripped env var name to a dotted config key.
pub fn map_env_key(key: &str) -> String {
    key.replacen("host_", "host.", 1)
        .replacen("plugins_", "plugins.", 1)
        .replacen("log_", "log.", 1)
}
