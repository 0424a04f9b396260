// SPDX-FileCopyrightText: 2026 Plugdesc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Value types shared by the manifest loader, the registry and the CLI.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// `<type>_<name>`: the type is a lowercase word, the name may contain underscores.
static COMPONENT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z][a-z0-9]*)_([a-z][a-z0-9_]*)$").unwrap());

/// A positive, conventionally date-encoded (`YYYYMMDDXX`) release number.
///
/// Used both for a plugin's own `version` and for the host version it `requires`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct Version(u64);

impl Version {
    /// Create a version, rejecting zero.
    pub fn new(value: u64) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    /// The raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }

    /// The `YYYYMMDD` prefix as a calendar date, if the number follows the convention.
    pub fn release_date(self) -> Option<NaiveDate> {
        if !(1_000_000_000..10_000_000_000).contains(&self.0) {
            return None;
        }
        let date = self.0 / 100;
        let year = i32::try_from(date / 10_000).ok()?;
        let month = u32::try_from((date / 100) % 100).ok()?;
        let day = u32::try_from(date % 100).ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    }

    /// The trailing `XX` build counter for releases made on the same day.
    pub fn increment(self) -> u8 {
        (self.0 % 100) as u8
    }
}

impl TryFrom<u64> for Version {
    type Error = String;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| "version must be a positive integer".to_string())
    }
}

impl From<Version> for u64 {
    fn from(version: Version) -> Self {
        version.0
    }
}

impl FromStr for Version {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u64 = s
            .trim()
            .parse()
            .map_err(|_| format!("`{s}` is not a positive integer"))?;
        Self::try_from(value)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fully qualified plugin identifier such as `mod_book` or `enrol_category`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ComponentName {
    full: String,
    split: usize,
}

impl ComponentName {
    /// Validate and build a component name.
    pub fn new(value: impl Into<String>) -> Result<Self, String> {
        let full = value.into();
        if full.is_empty() {
            return Err("component must not be empty".to_string());
        }
        let split = COMPONENT_PATTERN
            .captures(&full)
            .and_then(|caps| caps.get(1))
            .map(|m| m.end())
            .ok_or_else(|| format!("`{full}` does not match `<type>_<name>`"))?;
        Ok(Self { full, split })
    }

    /// Build the component implied by a plugin directory `<type>/<name>`.
    pub fn from_parts(plugin_type: &str, name: &str) -> Result<Self, String> {
        Self::new(format!("{plugin_type}_{name}"))
    }

    /// The subsystem prefix, e.g. `mod`.
    pub fn plugin_type(&self) -> &str {
        &self.full[..self.split]
    }

    /// The plugin name within its subsystem, e.g. `book`.
    pub fn name(&self) -> &str {
        &self.full[self.split + 1..]
    }

    pub fn as_str(&self) -> &str {
        &self.full
    }
}

impl TryFrom<String> for ComponentName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ComponentName> for String {
    fn from(component: ComponentName) -> Self {
        component.full
    }
}

impl FromStr for ComponentName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

impl AsRef<str> for ComponentName {
    fn as_ref(&self) -> &str {
        &self.full
    }
}
