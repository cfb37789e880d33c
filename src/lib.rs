// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # SFH - Sensor Fusion Hub host bridge
//!
//! Drives the sensor coprocessor found on AMD mobile platforms: enables each sensor through
//! the register mailbox, gives it a coherent sample buffer, polls that buffer periodically and
//! republishes the samples as HID sensor reports.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sfh::prelude::*;
//! use sfh::hal::{HostDmaAllocator, RecordingRegisters};
//!
//! let config = sfh::config::load_config(None, None)?;
//! let hub = SensorHub::new(
//!     RecordingRegisters::with_status(0x11),
//!     Arc::new(HostDmaAllocator::new()),
//!     Arc::new(CollectingTransport::new()),
//!     HubConfig::from(&config.driver),
//! );
//!
//! let summary = hub.probe(None);
//! for kind in &summary.opened {
//!     let report = hub.feature_report(*kind, kind.default_report_id())?;
//!     println!("{}: {} byte feature report", kind, report.len());
//! }
//! hub.remove();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Feature Flags
//!
//! - **`json-logging`**: JSON console output
//! - **`file-logging`**: per-run log files
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: sfh-structures, sfh-config,                │
//! │  sfh-observability                                      │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Platform: sfh-hal                                      │
//! │  (register block, coherent DMA)                         │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Reports: sfh-reports                                   │
//! │  (descriptors, feature/input report codec)              │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Driver: sfh-driver                                     │
//! │  (mailbox, mask resolution, polling, sessions)          │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

// Re-export foundation
pub use sfh_config as config;
pub use sfh_observability as observability;
pub use sfh_structures as structures;

// Re-export platform and codec
pub use sfh_hal as hal;
pub use sfh_reports as reports;

// Re-export driver
pub use sfh_driver as driver;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::structures::{RawSamples, SensorKind, SensorMask, SfhError, SfhResult};

    pub use crate::hal::{DmaAllocator, RegisterBlock};

    pub use crate::reports::{ReportType, SensorReportHandler};

    pub use crate::driver::{
        CollectingTransport, HubConfig, MaskSource, NullTransport, PlatformIdentity,
        ProbeSummary, ReportTransport, SensorHub,
    };
}
