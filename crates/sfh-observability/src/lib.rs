// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # sfh-observability
//!
//! Logging setup shared by the Sensor Fusion Hub crates and tools.
//!
//! Every crate logs through `tracing` with a `[SFH-...]` component prefix; this crate installs
//! the subscriber and turns per-crate debug flags into an `EnvFilter`.
//!
//! ## Features
//! - `json`: JSON console output
//! - `file-logging`: log file inside a timestamped run folder

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

pub use cli::*;
pub use config::*;
pub use init::*;

/// Workspace crate names accepted by the debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "sfh",
    "sfh-structures",
    "sfh-config",
    "sfh-hal",
    "sfh-reports",
    "sfh-driver",
];
