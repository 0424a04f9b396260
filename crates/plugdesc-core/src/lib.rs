// SPDX-FileCopyrightText: 2026 Plugdesc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for plugdesc.
//!
//! Provides the shared error type, the date-encoded [`Version`] number, the
//! validated [`ComponentName`], and the [`BootstrapContext`] token that every
//! descriptor load must present.

pub mod context;
pub mod error;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use context::BootstrapContext;
pub use error::PlugdescError;
pub use types::{ComponentName, Version};
