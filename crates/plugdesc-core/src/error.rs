// SPDX-FileCopyrightText: 2026 Plugdesc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for plugin descriptor loading and registry operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::Version;

/// The primary error type shared by the loader, the registry and the CLI.
#[derive(Debug, Error)]
pub enum PlugdescError {
    /// The loader was invoked without an active bootstrap context.
    ///
    /// This is the only fatal variant: the caller must stop loading entirely.
    #[error("manifest loading attempted outside of a host bootstrap context")]
    MissingContext,

    /// A required field is absent, has the wrong type, or is out of range.
    #[error("malformed field `{field}`: {reason}")]
    MalformedField { field: String, reason: String },

    /// A key that is not part of the descriptor format.
    #[error("unknown field `{field}`{}", suggestion_hint(.suggestion))]
    UnknownField {
        field: String,
        suggestion: Option<String>,
    },

    /// The manifest source could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manifest source is not syntactically valid.
    #[error("syntax error in {origin}: {message}")]
    Syntax { origin: String, message: String },

    /// A component was registered twice.
    #[error("duplicate component `{0}`")]
    DuplicateComponent(String),

    /// The declared component does not match the plugin directory it was found in.
    #[error("component mismatch: directory implies `{expected}`, manifest declares `{found}`")]
    ComponentMismatch { expected: String, found: String },

    /// The plugin requires a newer host than the one running.
    #[error("component `{component}` requires host version {requires}, running {host}")]
    Incompatible {
        component: String,
        requires: Version,
        host: Version,
    },

    /// Requested component is not in the registry.
    #[error("component not found: {0}")]
    NotFound(String),

    /// Installed-state or other configuration file problems.
    #[error("configuration error: {0}")]
    Config(String),
}

impl PlugdescError {
    /// Shorthand for a [`PlugdescError::MalformedField`].
    pub fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Returns true when loading must halt instead of skipping the plugin.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::MissingContext)
    }
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean `{s}`?)"),
        None => String::new(),
    }
}
