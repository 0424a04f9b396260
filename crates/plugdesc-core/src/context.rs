// SPDX-FileCopyrightText: 2026 Plugdesc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Explicit bootstrap context token.
//!
//! Descriptors may only be read while the host is bootstrapping. Instead of a
//! process-wide "already initialised" flag, the host creates a
//! [`BootstrapContext`] and passes it into every load call.

use crate::error::PlugdescError;
use crate::types::Version;

/// Proof that the caller is the host, in its bootstrap phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapContext {
    active: bool,
    host_version: Option<Version>,
}

impl BootstrapContext {
    /// Enter the bootstrap phase of a host running `host_version`.
    pub fn begin(host_version: Version) -> Self {
        Self {
            active: true,
            host_version: Some(host_version),
        }
    }

    /// A context whose guard flag is unset. Every load through it fails.
    pub fn detached() -> Self {
        Self {
            active: false,
            host_version: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The running host version, when bootstrapping.
    pub fn host_version(&self) -> Option<Version> {
        self.host_version
    }

    /// Fail with [`PlugdescError::MissingContext`] unless the guard flag is set.
    pub fn ensure_active(&self) -> Result<(), PlugdescError> {
        if self.active {
            Ok(())
        } else {
            Err(PlugdescError::MissingContext)
        }
    }
}

impl Default for BootstrapContext {
    fn default() -> Self {
        Self::detached()
    }
}
