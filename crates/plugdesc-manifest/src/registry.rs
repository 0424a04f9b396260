// SPDX-FileCopyrightText: 2026 Plugdesc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin registry for loaded manifests.
//!
//! The `PluginRegistry` stores `PluginEntry` records keyed by component. It
//! owns the checks the loader leaves to its consumer: component uniqueness,
//! the `requires` floor against the running host, version monotonicity
//! across upgrades, and the cron schedule.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use plugdesc_core::{ComponentName, PlugdescError, Version};
use strum::{Display, EnumString};
use tracing::{debug, warn};

use crate::manifest::PluginManifest;
use crate::state::InstalledVersions;

/// Status of a plugin in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum PluginStatus {
    /// Plugin is compatible and active.
    Enabled,
    /// Plugin is explicitly disabled.
    Disabled,
    /// Plugin requires a newer host than the one running.
    Incompatible,
}

/// A single entry in the plugin registry.
#[derive(Debug, Clone)]
pub struct PluginEntry {
    pub manifest: PluginManifest,
    pub status: PluginStatus,
    /// Directory the manifest was discovered in, if any.
    pub dir: Option<PathBuf>,
}

/// What the host must do for one component on this bootstrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeAction {
    /// Never installed before.
    Install { version: Version },
    /// On-disk version is newer than the installed one.
    Upgrade { from: Version, to: Version },
    UpToDate,
    /// On-disk version is older than the installed one; refused.
    Downgrade { installed: Version, found: Version },
    /// The plugin requires a newer host.
    Blocked { requires: Version, host: Version },
    /// Installed previously but no longer present on disk.
    Missing { installed: Version },
}

impl fmt::Display for UpgradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpgradeAction::Install { version } => write!(f, "install {version}"),
            UpgradeAction::Upgrade { from, to } => write!(f, "upgrade {from} -> {to}"),
            UpgradeAction::UpToDate => write!(f, "up to date"),
            UpgradeAction::Downgrade { installed, found } => {
                write!(f, "downgrade refused (installed {installed}, found {found})")
            }
            UpgradeAction::Blocked { requires, host } => {
                write!(f, "blocked (requires {requires}, host {host})")
            }
            UpgradeAction::Missing { installed } => {
                write!(f, "missing from disk (installed {installed})")
            }
        }
    }
}

impl UpgradeAction {
    /// Returns true when the host must not proceed without intervention.
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            UpgradeAction::Downgrade { .. } | UpgradeAction::Blocked { .. }
        )
    }
}

/// Registry of loaded plugin manifests for one running host.
pub struct PluginRegistry {
    host_version: Version,
    entries: HashMap<ComponentName, PluginEntry>,
}

impl PluginRegistry {
    /// Create an empty registry for a host running `host_version`.
    pub fn new(host_version: Version) -> Self {
        Self {
            host_version,
            entries: HashMap::new(),
        }
    }

    pub fn host_version(&self) -> Version {
        self.host_version
    }

    /// Register a manifest. Status is `Enabled` unless `requires` exceeds the host.
    pub fn register(&mut self, manifest: PluginManifest) -> Result<PluginStatus, PlugdescError> {
        self.register_from(manifest, None)
    }

    /// Register a manifest discovered in `dir`.
    pub fn register_from(
        &mut self,
        manifest: PluginManifest,
        dir: Option<PathBuf>,
    ) -> Result<PluginStatus, PlugdescError> {
        if self.entries.contains_key(manifest.component()) {
            return Err(PlugdescError::DuplicateComponent(
                manifest.component().to_string(),
            ));
        }

        let status = if manifest.requires() > self.host_version {
            warn!(
                component = %manifest.component(),
                requires = %manifest.requires(),
                host = %self.host_version,
                "plugin requires a newer host; not enabling"
            );
            PluginStatus::Incompatible
        } else {
            PluginStatus::Enabled
        };

        debug!(component = %manifest.component(), %status, "registered plugin");
        self.entries.insert(
            manifest.component().clone(),
            PluginEntry {
                manifest,
                status,
                dir,
            },
        );
        Ok(status)
    }

    /// Get a plugin entry by component.
    pub fn get(&self, component: &str) -> Option<&PluginEntry> {
        let component = ComponentName::new(component).ok()?;
        self.entries.get(&component)
    }

    /// All enabled plugins, sorted by component.
    pub fn enabled(&self) -> Vec<&PluginEntry> {
        self.list_all()
            .into_iter()
            .filter(|e| e.status == PluginStatus::Enabled)
            .collect()
    }

    /// Search entries by component (case-insensitive substring), sorted.
    ///
    /// An empty query returns everything.
    pub fn search(&self, query: &str) -> Vec<&PluginEntry> {
        let query_lower = query.to_lowercase();
        self.list_all()
            .into_iter()
            .filter(|e| e.manifest.component().as_str().contains(&query_lower))
            .collect()
    }

    /// List all plugin entries, sorted by component.
    pub fn list_all(&self) -> Vec<&PluginEntry> {
        let mut entries: Vec<&PluginEntry> = self.entries.values().collect();
        entries.sort_by(|a, b| a.manifest.component().cmp(b.manifest.component()));
        entries
    }

    /// Toggle a plugin between `Enabled` and `Disabled`.
    ///
    /// An incompatible plugin cannot be enabled; disabling it is allowed.
    pub fn set_enabled(&mut self, component: &str, enabled: bool) -> Result<(), PlugdescError> {
        let host = self.host_version;
        let entry = ComponentName::new(component)
            .ok()
            .and_then(|c| self.entries.get_mut(&c))
            .ok_or_else(|| PlugdescError::NotFound(component.to_string()))?;

        if enabled && entry.manifest.requires() > host {
            return Err(PlugdescError::Incompatible {
                component: component.to_string(),
                requires: entry.manifest.requires(),
                host,
            });
        }

        entry.status = if enabled {
            PluginStatus::Enabled
        } else {
            PluginStatus::Disabled
        };
        Ok(())
    }

    /// Decide, per component, what the host must do given previously installed versions.
    ///
    /// Components in `installed` that are not registered are reported as
    /// `Missing`. Output is sorted by component.
    pub fn upgrade_plan(&self, installed: &InstalledVersions) -> Vec<(String, UpgradeAction)> {
        let mut plan: Vec<(String, UpgradeAction)> = self
            .list_all()
            .into_iter()
            .map(|entry| {
                let component = entry.manifest.component().to_string();
                let action = self.action_for(entry, installed.get(&component));
                (component, action)
            })
            .collect();

        for (component, version) in installed.iter() {
            if self.get(component).is_none() {
                plan.push((
                    component.to_string(),
                    UpgradeAction::Missing { installed: version },
                ));
            }
        }

        plan.sort_by(|a, b| a.0.cmp(&b.0));
        plan
    }

    fn action_for(&self, entry: &PluginEntry, installed: Option<Version>) -> UpgradeAction {
        let found = entry.manifest.version();
        if entry.status == PluginStatus::Incompatible {
            return UpgradeAction::Blocked {
                requires: entry.manifest.requires(),
                host: self.host_version,
            };
        }
        match installed {
            None => UpgradeAction::Install { version: found },
            Some(current) if found > current => UpgradeAction::Upgrade {
                from: current,
                to: found,
            },
            Some(current) if found == current => UpgradeAction::UpToDate,
            Some(current) => UpgradeAction::Downgrade {
                installed: current,
                found,
            },
        }
    }

    /// Periodic maintenance schedule for enabled plugins.
    ///
    /// Plugins whose cron is absent or zero are not scheduled.
    pub fn cron_schedule(&self) -> Vec<(ComponentName, Duration)> {
        self.enabled()
            .into_iter()
            .filter_map(|e| {
                e.manifest
                    .cron_interval()
                    .map(|interval| (e.manifest.component().clone(), interval))
            })
            .collect()
    }

    /// Returns the number of registered plugins.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no plugins are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::str::FromStr;

    const HOST: u64 = 2022041200;

    fn v(n: u64) -> Version {
        Version::new(n).unwrap()
    }

    fn test_manifest(
        component: &str,
        version: u64,
        requires: u64,
        cron: Option<u64>,
    ) -> PluginManifest {
        PluginManifest::new(
            ComponentName::new(component).unwrap(),
            v(version),
            v(requires),
            cron,
        )
    }

    #[test]
    fn register_and_get_roundtrip() {
        let mut registry = PluginRegistry::new(v(HOST));
        let status = registry
            .register(test_manifest("mod_book", 2022041900, HOST, Some(0)))
            .unwrap();
        assert_eq!(status, PluginStatus::Enabled);

        let entry = registry.get("mod_book").unwrap();
        assert_eq!(entry.manifest.component().as_str(), "mod_book");
        assert_eq!(entry.manifest.requires(), v(HOST));
        assert!(registry.get("not a component").is_none());
    }

    #[test]
    fn duplicate_component_is_rejected() {
        let mut registry = PluginRegistry::new(v(HOST));
        registry.register(test_manifest("mod_book", 1, 1, None)).unwrap();
        let err = registry.register(test_manifest("mod_book", 2, 1, None)).unwrap_err();
        assert!(matches!(err, PlugdescError::DuplicateComponent(ref c) if c == "mod_book"));
        assert_eq!(registry.get("mod_book").unwrap().manifest.version(), v(1));
    }

    #[test]
    fn newer_requires_is_incompatible() {
        let mut registry = PluginRegistry::new(v(HOST));
        let status = registry
            .register(test_manifest("enrol_category", 2025050200, HOST + 1, None))
            .unwrap();
        assert_eq!(status, PluginStatus::Incompatible);
        assert!(registry.enabled().is_empty());

        let err = registry.set_enabled("enrol_category", true).unwrap_err();
        assert!(matches!(err, PlugdescError::Incompatible { .. }));

        registry.set_enabled("enrol_category", false).unwrap();
        assert_eq!(registry.get("enrol_category").unwrap().status, PluginStatus::Disabled);
    }

    #[test]
    fn set_enabled_toggles_status() {
        let mut registry = PluginRegistry::new(v(HOST));
        registry.register(test_manifest("mod_book", 1, 1, None)).unwrap();

        registry.set_enabled("mod_book", false).unwrap();
        assert_eq!(registry.get("mod_book").unwrap().status, PluginStatus::Disabled);

        registry.set_enabled("mod_book", true).unwrap();
        assert_eq!(registry.get("mod_book").unwrap().status, PluginStatus::Enabled);
    }

    #[test]
    fn set_enabled_returns_error_for_unknown_plugin() {
        let mut registry = PluginRegistry::new(v(HOST));
        let err = registry.set_enabled("mod_nonexistent", true).unwrap_err();
        assert!(matches!(err, PlugdescError::NotFound(_)));
    }

    #[test]
    fn list_all_returns_sorted() {
        let mut registry = PluginRegistry::new(v(HOST));
        registry.register(test_manifest("mod_zebra", 1, 1, None)).unwrap();
        registry.register(test_manifest("block_alpha", 1, 1, None)).unwrap();
        registry.register(test_manifest("enrol_middle", 1, 1, None)).unwrap();

        let names: Vec<&str> = registry
            .list_all()
            .iter()
            .map(|e| e.manifest.component().as_str())
            .collect();
        assert_eq!(names, vec!["block_alpha", "enrol_middle", "mod_zebra"]);
    }

    #[test]
    fn upgrade_plan_covers_every_case() {
        let mut registry = PluginRegistry::new(v(HOST));
        registry.register(test_manifest("mod_new", 5, 1, None)).unwrap();
        registry.register(test_manifest("mod_book", 2022041900, 1, None)).unwrap();
        registry.register(test_manifest("mod_same", 7, 1, None)).unwrap();
        registry.register(test_manifest("mod_old", 3, 1, None)).unwrap();
        registry.register(test_manifest("mod_future", 9, HOST + 100, None)).unwrap();

        let installed = InstalledVersions::from_toml(
            "[installed]\nmod_book = 2022041800\nmod_same = 7\nmod_old = 4\nmod_gone = 2\n",
        )
        .unwrap();

        let plan: HashMap<String, UpgradeAction> =
            registry.upgrade_plan(&installed).into_iter().collect();
        assert_eq!(plan["mod_new"], UpgradeAction::Install { version: v(5) });
        assert_eq!(
            plan["mod_book"],
            UpgradeAction::Upgrade { from: v(2022041800), to: v(2022041900) }
        );
        assert_eq!(plan["mod_same"], UpgradeAction::UpToDate);
        assert_eq!(plan["mod_old"], UpgradeAction::Downgrade { installed: v(4), found: v(3) });
        assert_eq!(
            plan["mod_future"],
            UpgradeAction::Blocked { requires: v(HOST + 100), host: v(HOST) }
        );
        assert_eq!(plan["mod_gone"], UpgradeAction::Missing { installed: v(2) });
        assert!(plan["mod_old"].is_blocking());
        assert!(!plan["mod_book"].is_blocking());
    }

    #[test]
    fn upgrade_plan_is_sorted() {
        let mut registry = PluginRegistry::new(v(HOST));
        registry.register(test_manifest("mod_b", 1, 1, None)).unwrap();
        let installed = InstalledVersions::from_toml("[installed]\nmod_a = 1\n").unwrap();
        let plan = registry.upgrade_plan(&installed);
        let names: Vec<&str> = plan.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(names, vec!["mod_a", "mod_b"]);
    }

    #[test]
    fn cron_schedule_skips_absent_zero_and_disabled() {
        let mut registry = PluginRegistry::new(v(HOST));
        registry.register(test_manifest("mod_book", 1, 1, Some(0))).unwrap();
        registry.register(test_manifest("enrol_category", 1, 1, None)).unwrap();
        registry.register(test_manifest("mod_forum", 1, 1, Some(60))).unwrap();
        registry.register(test_manifest("mod_quiz", 1, 1, Some(300))).unwrap();
        registry.set_enabled("mod_quiz", false).unwrap();

        let schedule = registry.cron_schedule();
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].0.as_str(), "mod_forum");
        assert_eq!(schedule[0].1, Duration::from_secs(60));
    }

    #[test]
    fn status_display_and_parse() {
        assert_eq!(PluginStatus::Incompatible.to_string(), "incompatible");
        assert_eq!(PluginStatus::from_str("disabled").unwrap(), PluginStatus::Disabled);
    }

    #[test]
    fn search_filters_by_component() {
        let mut registry = PluginRegistry::new(v(HOST));
        registry.register(test_manifest("mod_book", 2, 1, None)).unwrap();
        registry
            .register_from(
                test_manifest("enrol_category", 2, 1, None),
                Some(PathBuf::from("plugins/enrol/category")),
            )
            .unwrap();

        assert_eq!(registry.search("").len(), 2);
        assert_eq!(registry.search("BOOK").len(), 1);

        let found = registry.search("enrol_");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].dir.as_deref(), Some(Path::new("plugins/enrol/category")));
        assert!(registry.search("xyz").is_empty());
    }

    #[test]
    fn len_and_is_empty() {
        let mut registry = PluginRegistry::new(v(HOST));
        assert!(registry.is_empty());
        registry.register(test_manifest("mod_book", 1, 1, None)).unwrap();
        assert!(!registry.is_empty());
        assert_eq!(registry.len(), 1);
    }
}
