// SPDX-FileCopyrightText: 2026 Plugdesc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal output helpers shared by the subcommands.

use std::io::IsTerminal;

use colored::Colorize;
use plugdesc_manifest::{PluginStatus, UpgradeAction};

/// Color only when asked for and stdout is a terminal.
pub fn use_color(plain: bool) -> bool {
    !plain && std::io::stdout().is_terminal()
}

/// Outcome marker for a line of output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Ok,
    Warn,
    Fail,
}

impl Mark {
    pub fn render(self, use_color: bool) -> String {
        match (self, use_color) {
            (Mark::Ok, true) => "✓".green().to_string(),
            (Mark::Warn, true) => "!".yellow().to_string(),
            (Mark::Fail, true) => "✗".red().to_string(),
            (Mark::Ok, false) => "[OK]  ".to_string(),
            (Mark::Warn, false) => "[WARN]".to_string(),
            (Mark::Fail, false) => "[FAIL]".to_string(),
        }
    }
}

impl From<PluginStatus> for Mark {
    fn from(status: PluginStatus) -> Self {
        match status {
            PluginStatus::Enabled => Mark::Ok,
            PluginStatus::Disabled => Mark::Warn,
            PluginStatus::Incompatible => Mark::Fail,
        }
    }
}

impl From<&UpgradeAction> for Mark {
    fn from(action: &UpgradeAction) -> Self {
        match action {
            UpgradeAction::UpToDate => Mark::Ok,
            UpgradeAction::Install { .. } | UpgradeAction::Upgrade { .. } => Mark::Warn,
            UpgradeAction::Missing { .. } => Mark::Warn,
            UpgradeAction::Downgrade { .. } | UpgradeAction::Blocked { .. } => Mark::Fail,
        }
    }
}

pub fn header(title: &str) {
    println!();
    println!("  {title}");
    println!("  {}", "-".repeat(50));
}

/// Print a one-line summary, e.g. "2 issues found." or "No issues found."
pub fn summary(issues: usize) {
    println!();
    match issues {
        0 => println!("  No issues found."),
        1 => println!("  1 issue found."),
        n => println!("  {n} issues found."),
    }
}
