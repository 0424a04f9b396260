// SPDX-FileCopyrightText: 2026 Plugdesc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `plugdesc check` command implementation.

use std::path::PathBuf;

use plugdesc_core::{BootstrapContext, PlugdescError};
use plugdesc_manifest::{load_manifest, PluginManifest};

use crate::report::{self, Mark};

/// Load every path and report each result.
///
/// Returns `Ok(false)` if any manifest failed; a fatal guard failure aborts.
pub fn run_check(
    ctx: &BootstrapContext,
    paths: &[PathBuf],
    json: bool,
    use_color: bool,
) -> Result<bool, PlugdescError> {
    let mut loaded: Vec<PluginManifest> = Vec::new();
    let mut failures = Vec::new();

    for path in paths {
        match load_manifest(ctx, path) {
            Ok(manifest) => loaded.push(manifest),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => failures.push((path, e)),
        }
    }

    if json {
        let rendered = serde_json::to_string_pretty(&loaded)
            .map_err(|e| PlugdescError::Config(format!("cannot render JSON: {e}")))?;
        println!("{rendered}");
        for (path, e) in &failures {
            eprintln!("{}: {e}", path.display());
        }
        return Ok(failures.is_empty());
    }

    report::header("plugdesc check");
    for manifest in &loaded {
        println!("    {} {}", Mark::Ok.render(use_color), describe(manifest));
    }
    for (path, e) in &failures {
        println!("    {} {}: {e}", Mark::Fail.render(use_color), path.display());
    }
    report::summary(failures.len());

    Ok(failures.is_empty())
}

/// Single-line description: component, version, release date, requires, cron.
pub fn describe(manifest: &PluginManifest) -> String {
    let released = manifest
        .version()
        .release_date()
        .map(|d| format!(" ({d})"))
        .unwrap_or_default();
    let cron = match manifest.cron() {
        None => "cron absent".to_string(),
        Some(0) => "cron disabled".to_string(),
        Some(secs) => format!("cron every {secs}s"),
    };
    format!(
        "{:<24} {}{released}  requires {}  {cron}",
        manifest.component().as_str(),
        manifest.version(),
        manifest.requires()
    )
}
