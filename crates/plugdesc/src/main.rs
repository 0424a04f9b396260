// SPDX-FileCopyrightText: 2026 Plugdesc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! plugdesc - load, validate, and plan upgrades for host plugin descriptors.

mod check;
mod report;
mod scan;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use plugdesc_config::PlugdescConfig;
use plugdesc_core::{BootstrapContext, PlugdescError, Version};

/// Exit status when loading is attempted without a bootstrap context.
const EXIT_MISSING_CONTEXT: u8 = 70;

/// plugdesc - plugin descriptor loader and registry.
#[derive(Parser, Debug)]
#[command(name = "plugdesc", version, about, long_about = None)]
struct Cli {
    /// Config file to use instead of the XDG hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the running host version.
    #[arg(long, global = true)]
    host_version: Option<u64>,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Load and validate individual manifest files.
    Check {
        /// Manifest files (`version.toml` or legacy `version.php`).
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Print the loaded manifests as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Discover plugins and show their registry status.
    Scan {
        /// Plugin roots; defaults to `plugins.roots` from config.
        #[arg(long)]
        root: Vec<PathBuf>,
        /// Only show components containing this text.
        #[arg(long, default_value = "")]
        filter: String,
    },
    /// Compare discovered versions against installed state.
    Plan {
        #[arg(long)]
        root: Vec<PathBuf>,
        /// Installed-state file; defaults to `plugins.installed_state`.
        #[arg(long)]
        installed: Option<PathBuf>,
        /// Write installs and upgrades back to the installed-state file.
        #[arg(long)]
        record: bool,
    },
    /// List the periodic maintenance schedule of enabled plugins.
    Cron {
        #[arg(long)]
        root: Vec<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => plugdesc_config::load_and_validate_path(path),
        None => plugdesc_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            plugdesc_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.log.level);

    let raw_host = cli.host_version.unwrap_or(config.host.version);
    let Some(host) = Version::new(raw_host) else {
        eprintln!("plugdesc: host version must be a positive integer");
        return ExitCode::FAILURE;
    };
    let ctx = BootstrapContext::begin(host);
    tracing::debug!(host = %host, "bootstrap context entered");

    ExitCode::from(exit_status(run(&cli, &config, &ctx)))
}

/// Map a command outcome to the process exit status.
///
/// `main` always enters a context, so the fatal arm only fires when a
/// command is driven with a detached one.
fn exit_status(outcome: Result<bool, PlugdescError>) -> u8 {
    match outcome {
        Ok(true) => 0,
        Ok(false) => 1,
        // The host owns any diagnostic for a failed guard.
        Err(e) if e.is_fatal() => EXIT_MISSING_CONTEXT,
        Err(e) => {
            eprintln!("plugdesc: {e}");
            1
        }
    }
}

/// Dispatch a subcommand. `Ok(false)` means it ran but found problems.
fn run(cli: &Cli, config: &PlugdescConfig, ctx: &BootstrapContext) -> Result<bool, PlugdescError> {
    let use_color = report::use_color(cli.plain);
    match &cli.command {
        Commands::Check { paths, json } => check::run_check(ctx, paths, *json, use_color),
        Commands::Scan { root, filter } => {
            let roots = scan::roots_or_config(root, config);
            scan::run_scan(ctx, config, &roots, filter, use_color)
        }
        Commands::Plan {
            root,
            installed,
            record,
        } => {
            let roots = scan::roots_or_config(root, config);
            let state_path = installed
                .clone()
                .unwrap_or_else(|| PathBuf::from(&config.plugins.installed_state));
            scan::run_plan(ctx, config, &roots, &state_path, *record, use_color)
        }
        Commands::Cron { root } => {
            let roots = scan::roots_or_config(root, config);
            scan::run_cron(ctx, config, &roots)
        }
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("plugdesc={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
