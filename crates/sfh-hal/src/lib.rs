// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # sfh-hal
//!
//! Platform abstraction for the Sensor Fusion Hub: the memory-mapped mailbox register block
//! and device-coherent memory. The driver is written against the traits in [`hal`]; the
//! [`platforms`] module provides a volatile MMIO implementation and host-side stand-ins.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod hal;
pub mod platforms;

pub use hal::*;
pub use platforms::*;
