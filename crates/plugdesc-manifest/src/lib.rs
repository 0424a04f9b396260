// SPDX-FileCopyrightText: 2026 Plugdesc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin manifest loader, directory discovery, and registry.
//!
//! Every plugin directory carries a small descriptor declaring its
//! component, its own version, the minimum host version it requires and an
//! optional cron period. This crate loads and validates those descriptors
//! (only under an active bootstrap context) and provides the registry-side
//! decisions built on them: compatibility, upgrade planning, and scheduling.

pub mod discovery;
pub mod legacy;
pub mod manifest;
pub mod registry;
pub mod state;

pub use discovery::{discover, discover_roots, DiscoveredPlugin, Discovery, DEFAULT_MANIFEST_FILE};
pub use manifest::{load_manifest, parse_manifest, ManifestFormat, PluginManifest};
pub use registry::{PluginEntry, PluginRegistry, PluginStatus, UpgradeAction};
pub use state::InstalledVersions;
