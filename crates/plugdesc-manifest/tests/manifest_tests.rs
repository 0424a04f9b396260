// SPDX-FileCopyrightText: 2026 Plugdesc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for manifest loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use plugdesc_core::{BootstrapContext, PlugdescError, Version};
use plugdesc_manifest::{
    discover, load_manifest, InstalledVersions, PluginRegistry, PluginStatus, UpgradeAction,
    DEFAULT_MANIFEST_FILE,
};

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/plugins")
}

fn ctx() -> BootstrapContext {
    BootstrapContext::begin(Version::new(2022041200).unwrap())
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// enrol_category without cron loads with cron absent.
#[test]
fn scenario_a_enrol_category() {
    let tmp = tempfile::tempdir().unwrap();
    let path = write(
        tmp.path(),
        "version.toml",
        "component = \"enrol_category\"\nversion = 2025050200\nrequires = 2022041200\n",
    );

    let manifest = load_manifest(&ctx(), &path).unwrap();
    assert_eq!(manifest.component().as_str(), "enrol_category");
    assert_eq!(manifest.version().get(), 2025050200);
    assert_eq!(manifest.requires().get(), 2022041200);
    assert!(manifest.cron().is_none());
}

/// mod_book with cron = 0 keeps the explicit zero.
#[test]
fn scenario_b_mod_book() {
    let tmp = tempfile::tempdir().unwrap();
    let path = write(
        tmp.path(),
        "version.toml",
        "component = \"mod_book\"\nversion = 2022041900\nrequires = 2022041200\ncron = 0\n",
    );

    let manifest = load_manifest(&ctx(), &path).unwrap();
    assert_eq!(manifest.component().as_str(), "mod_book");
    assert_eq!(manifest.cron(), Some(0));
}

/// The guard fails before the file is read: even a missing path yields MissingContext.
#[test]
fn scenario_c_guard_precedes_io() {
    let tmp = tempfile::tempdir().unwrap();
    let missing = tmp.path().join("does-not-exist.toml");

    let err = load_manifest(&BootstrapContext::detached(), &missing).unwrap_err();
    assert!(matches!(err, PlugdescError::MissingContext));
    assert!(err.is_fatal());

    let err = load_manifest(&ctx(), &missing).unwrap_err();
    assert!(matches!(err, PlugdescError::Io { .. }));
}

#[test]
fn scenario_d_string_version() {
    let tmp = tempfile::tempdir().unwrap();
    let path = write(
        tmp.path(),
        "version.toml",
        "component = \"mod_book\"\nversion = \"twenty\"\nrequires = 2022041200\n",
    );

    let err = load_manifest(&ctx(), &path).unwrap_err();
    assert!(matches!(err, PlugdescError::MalformedField { ref field, .. } if field == "version"));
}

#[test]
fn legacy_fixtures_match_toml_scenarios() {
    let book = load_manifest(&ctx(), &fixtures().join("mod/book/version.php")).unwrap();
    assert_eq!(book.component().as_str(), "mod_book");
    assert_eq!(book.version().get(), 2022041900);
    assert_eq!(book.cron(), Some(0));

    let category = load_manifest(&ctx(), &fixtures().join("enrol/category/version.php")).unwrap();
    assert_eq!(category.component().as_str(), "enrol_category");
    assert_eq!(category.version().get(), 2025050200);
    assert_eq!(category.cron(), None);
}

#[test]
fn loading_twice_is_idempotent() {
    let path = fixtures().join("mod/book/version.php");
    let first = load_manifest(&ctx(), &path).unwrap();
    let second = load_manifest(&ctx(), &path).unwrap();
    assert_eq!(first, second);
}

#[test]
fn fixture_tree_registers_and_plans() {
    let found = discover(&ctx(), &fixtures(), DEFAULT_MANIFEST_FILE).unwrap();
    assert_eq!(found.plugins.len(), 2);
    assert!(found.failures.is_empty());

    let mut registry = PluginRegistry::new(Version::new(2022041200).unwrap());
    for plugin in found.plugins {
        let status = registry
            .register_from(plugin.manifest, Some(plugin.dir))
            .unwrap();
        assert_eq!(status, PluginStatus::Enabled);
    }

    let installed = InstalledVersions::from_toml("[installed]\nmod_book = 2022041900\n").unwrap();
    let plan = registry.upgrade_plan(&installed);
    assert_eq!(
        plan,
        vec![
            (
                "enrol_category".to_string(),
                UpgradeAction::Install {
                    version: Version::new(2025050200).unwrap()
                }
            ),
            ("mod_book".to_string(), UpgradeAction::UpToDate),
        ]
    );
    assert!(registry.cron_schedule().is_empty());
}
