// SPDX-FileCopyrightText: 2026 Plugdesc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin manifest loading and validation.
//!
//! A manifest is a flat record of four fields (`component`, `version`,
//! `requires`, optional `cron`). It is read from `version.toml`, or from a
//! legacy `version.php` descriptor (see [`crate::legacy`]), and validated into
//! a [`PluginManifest`]. Loading is only allowed through an active
//! [`BootstrapContext`].

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use plugdesc_core::{BootstrapContext, ComponentName, PlugdescError, Version};
use serde::Serialize;
use tracing::debug;

use crate::legacy;

/// Every key the descriptor format knows about.
pub const MANIFEST_FIELDS: &[&str] = &["component", "version", "requires", "cron"];

/// Minimum Jaro-Winkler similarity for a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Validated, immutable plugin manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginManifest {
    component: ComponentName,
    version: Version,
    requires: Version,
    #[serde(skip_serializing_if = "Option::is_none")]
    cron: Option<u64>,
}

impl PluginManifest {
    pub fn new(
        component: ComponentName,
        version: Version,
        requires: Version,
        cron: Option<u64>,
    ) -> Self {
        Self {
            component,
            version,
            requires,
            cron,
        }
    }

    /// Unique identifier of the plugin, e.g. `mod_book`.
    pub fn component(&self) -> &ComponentName {
        &self.component
    }

    /// The plugin's own release number.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Minimum host version this plugin runs on.
    pub fn requires(&self) -> Version {
        self.requires
    }

    /// Declared cron period in seconds, exactly as written (absent stays `None`).
    pub fn cron(&self) -> Option<u64> {
        self.cron
    }

    /// Cron period as a duration, `None` when absent or zero (disabled).
    pub fn cron_interval(&self) -> Option<Duration> {
        self.cron.filter(|&secs| secs > 0).map(Duration::from_secs)
    }
}

/// Source dialect of a manifest file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    /// Flat TOML (`version.toml`).
    Toml,
    /// Legacy `$plugin->field = value;` descriptor (`version.php`).
    Legacy,
}

impl ManifestFormat {
    /// Pick the dialect from the file extension; anything but `.php` is TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("php") => Self::Legacy,
            _ => Self::Toml,
        }
    }
}

/// A field value before semantic validation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RawValue {
    Str(String),
    Int(i64),
    /// Any other value; carries a type name for error messages.
    Other(&'static str),
}

impl RawValue {
    fn type_name(&self) -> &'static str {
        match self {
            RawValue::Str(_) => "string",
            RawValue::Int(_) => "integer",
            RawValue::Other(kind) => kind,
        }
    }
}

/// Load a manifest from disk.
///
/// The bootstrap guard is checked before the file is touched. The file is
/// read exactly once.
pub fn load_manifest(ctx: &BootstrapContext, path: &Path) -> Result<PluginManifest, PlugdescError> {
    ctx.ensure_active()?;

    let content = std::fs::read_to_string(path).map_err(|source| PlugdescError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let origin = path.display().to_string();

    let manifest = match ManifestFormat::from_path(path) {
        ManifestFormat::Toml => parse_toml(&content, &origin)?,
        ManifestFormat::Legacy => legacy::parse_legacy(&content, &origin)?,
    };

    debug!(
        component = %manifest.component,
        version = %manifest.version,
        requires = %manifest.requires,
        path = %origin,
        "loaded plugin manifest"
    );
    Ok(manifest)
}

/// Parse a manifest from in-memory TOML content.
pub fn parse_manifest(
    ctx: &BootstrapContext,
    toml_content: &str,
) -> Result<PluginManifest, PlugdescError> {
    ctx.ensure_active()?;
    parse_toml(toml_content, "<inline>")
}

fn parse_toml(content: &str, origin: &str) -> Result<PluginManifest, PlugdescError> {
    let table: toml::Table = toml::from_str(content).map_err(|e| PlugdescError::Syntax {
        origin: origin.to_string(),
        message: e.message().to_string(),
    })?;

    let fields = table
        .into_iter()
        .map(|(key, value)| {
            let raw = match value {
                toml::Value::String(s) => RawValue::Str(s),
                toml::Value::Integer(i) => RawValue::Int(i),
                toml::Value::Float(_) => RawValue::Other("float"),
                toml::Value::Boolean(_) => RawValue::Other("boolean"),
                toml::Value::Datetime(_) => RawValue::Other("datetime"),
                toml::Value::Array(_) => RawValue::Other("array"),
                toml::Value::Table(_) => RawValue::Other("table"),
            };
            (key, raw)
        })
        .collect();

    build_manifest(fields)
}

/// Validate raw fields into a manifest. Shared by both dialects.
pub(crate) fn build_manifest(
    mut fields: BTreeMap<String, RawValue>,
) -> Result<PluginManifest, PlugdescError> {
    if let Some(unknown) = fields.keys().find(|k| !MANIFEST_FIELDS.contains(&k.as_str())) {
        return Err(PlugdescError::UnknownField {
            field: unknown.clone(),
            suggestion: suggest_field(unknown),
        });
    }

    let component = match fields.remove("component") {
        Some(RawValue::Str(s)) => {
            ComponentName::new(s).map_err(|reason| PlugdescError::malformed("component", reason))?
        }
        Some(other) => {
            return Err(PlugdescError::malformed(
                "component",
                format!("expected string, found {}", other.type_name()),
            ));
        }
        None => return Err(PlugdescError::malformed("component", "required field is missing")),
    };

    let version = required_version(&mut fields, "version")?;
    let requires = required_version(&mut fields, "requires")?;

    let cron = match fields.remove("cron") {
        None => None,
        Some(RawValue::Int(secs)) => Some(u64::try_from(secs).map_err(|_| {
            PlugdescError::malformed("cron", format!("must not be negative, got {secs}"))
        })?),
        Some(other) => {
            return Err(PlugdescError::malformed(
                "cron",
                format!("expected integer, found {}", other.type_name()),
            ));
        }
    };

    Ok(PluginManifest {
        component,
        version,
        requires,
        cron,
    })
}

fn required_version(
    fields: &mut BTreeMap<String, RawValue>,
    field: &str,
) -> Result<Version, PlugdescError> {
    match fields.remove(field) {
        Some(RawValue::Int(value)) => u64::try_from(value)
            .ok()
            .and_then(Version::new)
            .ok_or_else(|| {
                PlugdescError::malformed(field, format!("must be a positive integer, got {value}"))
            }),
        Some(other) => Err(PlugdescError::malformed(
            field,
            format!("expected integer, found {}", other.type_name()),
        )),
        None => Err(PlugdescError::malformed(field, "required field is missing")),
    }
}

/// Suggest the closest known field name for a misspelt key.
pub fn suggest_field(unknown: &str) -> Option<String> {
    let mut best_score = SUGGESTION_THRESHOLD;
    let mut best_match = None;

    for &key in MANIFEST_FIELDS {
        let score = strsim::jaro_winkler(unknown, key);
        if score > best_score {
            best_score = score;
            best_match = Some(key.to_string());
        }
    }

    best_match
}
