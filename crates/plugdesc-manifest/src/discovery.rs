// SPDX-FileCopyrightText: 2026 Plugdesc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin directory discovery.
//!
//! Plugins live at `<root>/<type>/<name>/`, and the directory implies the
//! component `<type>_<name>`. Each plugin directory carries either the
//! configured manifest file (default `version.toml`) or a legacy
//! `version.php`.

use std::fs;
use std::path::{Path, PathBuf};

use plugdesc_core::{BootstrapContext, ComponentName, PlugdescError};
use tracing::{debug, info, warn};

use crate::manifest::{load_manifest, PluginManifest};

/// Default manifest file name inside a plugin directory.
pub const DEFAULT_MANIFEST_FILE: &str = "version.toml";

/// Legacy descriptor file name, tried after the configured manifest file.
pub const LEGACY_MANIFEST_FILE: &str = "version.php";

/// A manifest found on disk.
#[derive(Debug, Clone)]
pub struct DiscoveredPlugin {
    /// Plugin directory (`<root>/<type>/<name>`).
    pub dir: PathBuf,
    /// Manifest file that was loaded.
    pub source: PathBuf,
    pub manifest: PluginManifest,
}

/// Result of scanning one or more plugin roots.
///
/// Per-plugin failures are collected rather than aborting the scan, so the
/// caller decides whether to skip a bad plugin or stop.
#[derive(Debug, Default)]
pub struct Discovery {
    pub plugins: Vec<DiscoveredPlugin>,
    pub failures: Vec<(PathBuf, PlugdescError)>,
}

/// Scan every root in order and merge the results.
pub fn discover_roots<P: AsRef<Path>>(
    ctx: &BootstrapContext,
    roots: &[P],
    manifest_file: &str,
) -> Result<Discovery, PlugdescError> {
    ctx.ensure_active()?;

    let mut merged = Discovery::default();
    for root in roots {
        let found = discover(ctx, root.as_ref(), manifest_file)?;
        merged.plugins.extend(found.plugins);
        merged.failures.extend(found.failures);
    }
    Ok(merged)
}

/// Scan a single plugin root.
///
/// A missing root yields an empty result. An inactive context aborts before
/// any directory is read.
pub fn discover(
    ctx: &BootstrapContext,
    root: &Path,
    manifest_file: &str,
) -> Result<Discovery, PlugdescError> {
    ctx.ensure_active()?;

    let mut discovery = Discovery::default();
    if !root.exists() {
        info!("plugin root does not exist: {}", root.display());
        return Ok(discovery);
    }

    for type_dir in subdirectories(root)? {
        let plugin_dirs = match subdirectories(&type_dir) {
            Ok(dirs) => dirs,
            Err(e) => {
                warn!("skipping {}: {e}", type_dir.display());
                discovery.failures.push((type_dir, e));
                continue;
            }
        };

        for plugin_dir in plugin_dirs {
            let Some(source) = [manifest_file, LEGACY_MANIFEST_FILE]
                .iter()
                .map(|name| plugin_dir.join(name))
                .find(|candidate| candidate.is_file())
            else {
                debug!("no manifest in {}", plugin_dir.display());
                continue;
            };

            match load_checked(ctx, &type_dir, &plugin_dir, &source) {
                Ok(manifest) => discovery.plugins.push(DiscoveredPlugin {
                    dir: plugin_dir,
                    source,
                    manifest,
                }),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!("skipping plugin {}: {e}", source.display());
                    discovery.failures.push((source, e));
                }
            }
        }
    }

    info!(
        "discovered {} plugins under {} ({} failed)",
        discovery.plugins.len(),
        root.display(),
        discovery.failures.len()
    );
    Ok(discovery)
}

/// Load a manifest and check it against the component its directory implies.
fn load_checked(
    ctx: &BootstrapContext,
    type_dir: &Path,
    plugin_dir: &Path,
    source: &Path,
) -> Result<PluginManifest, PlugdescError> {
    let manifest = load_manifest(ctx, source)?;

    let plugin_type = file_name(type_dir);
    let name = file_name(plugin_dir);
    let expected = format!("{plugin_type}_{name}");

    match ComponentName::from_parts(&plugin_type, &name) {
        Ok(implied) if &implied == manifest.component() => Ok(manifest),
        _ => Err(PlugdescError::ComponentMismatch {
            expected,
            found: manifest.component().to_string(),
        }),
    }
}

/// Non-hidden child directories, sorted for a stable scan order.
fn subdirectories(dir: &Path) -> Result<Vec<PathBuf>, PlugdescError> {
    let io_err = |source| PlugdescError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if file_name(&path).starts_with('.') || !path.is_dir() {
            continue;
        }
        dirs.push(path);
    }
    dirs.sort();
    Ok(dirs)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
