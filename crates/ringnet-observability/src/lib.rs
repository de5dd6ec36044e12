// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # ringnet-observability
//!
//! Logging setup shared by the ring network tools, with per-crate debug flag
//! support.
//!
//! ## Features
//! - `file-logging`: JSON log files in timestamped run folders

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod init;

pub use cli::*;
pub use init::*;

/// Known crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "ringnet",
    "ringnet-parameters",
    "ringnet-network",
    "ringnet-config",
    "ringnet-experiment",
];
