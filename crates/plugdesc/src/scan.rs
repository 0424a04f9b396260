// SPDX-FileCopyrightText: 2026 Plugdesc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `plugdesc scan`, `plan`, and `cron` command implementations.
//!
//! All three discover the configured plugin roots and feed the result into a
//! [`PluginRegistry`] for the running host.

use std::path::{Path, PathBuf};

use plugdesc_config::PlugdescConfig;
use plugdesc_core::{BootstrapContext, PlugdescError};
use plugdesc_manifest::{discover_roots, InstalledVersions, PluginRegistry, UpgradeAction};
use tracing::info;

use crate::check::describe;
use crate::report::{self, Mark};

/// Roots from the command line, falling back to `plugins.roots`.
pub fn roots_or_config(cli_roots: &[PathBuf], config: &PlugdescConfig) -> Vec<PathBuf> {
    if cli_roots.is_empty() {
        config.plugins.roots.iter().map(PathBuf::from).collect()
    } else {
        cli_roots.to_vec()
    }
}

/// Registry built from discovered plugins plus the per-plugin failures.
pub struct ScanOutcome {
    pub registry: PluginRegistry,
    pub failures: Vec<(PathBuf, PlugdescError)>,
}

/// Discover every root and register what loads.
///
/// Duplicate components across roots are reported as failures; the first
/// one found wins.
pub fn build_registry(
    ctx: &BootstrapContext,
    config: &PlugdescConfig,
    roots: &[PathBuf],
) -> Result<ScanOutcome, PlugdescError> {
    let host = ctx.host_version().ok_or(PlugdescError::MissingContext)?;
    let discovery = discover_roots(ctx, roots, &config.plugins.manifest_file)?;

    let mut registry = PluginRegistry::new(host);
    let mut failures = discovery.failures;
    for plugin in discovery.plugins {
        if let Err(e) = registry.register_from(plugin.manifest, Some(plugin.dir)) {
            failures.push((plugin.source, e));
        }
    }

    info!(
        registered = registry.len(),
        failed = failures.len(),
        "plugin scan complete"
    );
    Ok(ScanOutcome { registry, failures })
}

pub fn run_scan(
    ctx: &BootstrapContext,
    config: &PlugdescConfig,
    roots: &[PathBuf],
    filter: &str,
    use_color: bool,
) -> Result<bool, PlugdescError> {
    let ScanOutcome { registry, failures } = build_registry(ctx, config, roots)?;

    report::header(&format!("plugdesc scan (host {})", registry.host_version()));

    let mut issues = failures.len();
    for entry in registry.search(filter) {
        let mark = Mark::from(entry.status);
        if mark != Mark::Ok {
            issues += 1;
        }
        println!(
            "    {} {:<13} {}",
            mark.render(use_color),
            entry.status.to_string(),
            describe(&entry.manifest)
        );
        if let Some(dir) = &entry.dir {
            println!("      {:<13} {}", "", dir.display());
        }
    }
    print_failures(&failures, use_color);
    report::summary(issues);

    Ok(issues == 0)
}

pub fn run_plan(
    ctx: &BootstrapContext,
    config: &PlugdescConfig,
    roots: &[PathBuf],
    state_path: &Path,
    record: bool,
    use_color: bool,
) -> Result<bool, PlugdescError> {
    let ScanOutcome { registry, failures } = build_registry(ctx, config, roots)?;
    let mut installed = InstalledVersions::load(state_path)?;
    let plan = registry.upgrade_plan(&installed);

    report::header(&format!("plugdesc plan (host {})", registry.host_version()));

    let mut blocking = 0;
    for (component, action) in &plan {
        if action.is_blocking() {
            blocking += 1;
        }
        println!(
            "    {} {component:<24} {action}",
            Mark::from(action).render(use_color)
        );
    }
    print_failures(&failures, use_color);

    if record {
        let mut changed = 0;
        for (component, action) in &plan {
            if let UpgradeAction::Install { .. } | UpgradeAction::Upgrade { .. } = action
                && let Some(entry) = registry.get(component)
            {
                installed.record(&entry.manifest);
                changed += 1;
            }
        }
        installed.save(state_path)?;
        info!(changed, path = %state_path.display(), "recorded installed versions");
        println!();
        println!("  Recorded {changed} change(s) to {}.", state_path.display());
    }

    report::summary(blocking + failures.len());
    Ok(blocking == 0 && failures.is_empty())
}

pub fn run_cron(
    ctx: &BootstrapContext,
    config: &PlugdescConfig,
    roots: &[PathBuf],
) -> Result<bool, PlugdescError> {
    let ScanOutcome { registry, failures } = build_registry(ctx, config, roots)?;

    report::header("plugdesc cron");
    let schedule = registry.cron_schedule();
    if schedule.is_empty() {
        println!("    no plugins declare a cron period");
    }
    for (component, interval) in &schedule {
        println!("    {:<24} every {}s", component.as_str(), interval.as_secs());
    }
    for (path, e) in &failures {
        eprintln!("{}: {e}", path.display());
    }

    Ok(failures.is_empty())
}

fn print_failures(failures: &[(PathBuf, PlugdescError)], use_color: bool) {
    for (path, e) in failures {
        println!("    {} {}: {e}", Mark::Fail.render(use_color), path.display());
    }
}
