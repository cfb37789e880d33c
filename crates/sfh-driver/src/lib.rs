// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Sensor Fusion Hub driver core
//!
//! Talks to the sensor coprocessor through its register mailbox and exposes every enabled
//! sensor as a HID device:
//!
//! - [`protocol`]: command words, both command encodings and the mailbox write sequences
//! - [`mask`] and [`quirks`]: which sensors to enable
//! - [`dma_buffer`]: the coherent sample buffer of each session
//! - [`scheduler`]: the per-session polling thread
//! - [`hub`]: probe, open, close and remove
//!
//! ```no_run
//! use std::sync::Arc;
//! use sfh_driver::{HubConfig, NullTransport, SensorHub};
//! use sfh_hal::{HostDmaAllocator, RecordingRegisters};
//!
//! let hub = SensorHub::new(
//!     RecordingRegisters::with_status(0b0001_0001),
//!     Arc::new(HostDmaAllocator::new()),
//!     Arc::new(NullTransport),
//!     HubConfig::default(),
//! );
//! let summary = hub.probe(None);
//! println!("opened {:?}", summary.opened);
//! hub.remove();
//! ```

pub mod dma_buffer;
pub mod hub;
pub mod mask;
pub mod protocol;
pub mod quirks;
pub mod scheduler;
pub mod session;
pub mod transport;

pub use dma_buffer::{DmaBuffer, DmaBufferManager, DMA_BUFFER_SIZE};
pub use hub::{HubConfig, ProbeSummary, SensorHub, MAX_POLL_INTERVAL};
pub use mask::{resolve, resolve_mask, MaskSource, ResolvedMask};
pub use protocol::{CommandEncoding, CommandId, CommandWord, Mailbox, ParameterWord, ResponseSnapshot};
pub use quirks::{PlatformIdentity, QuirkEntry, QUIRKS};
pub use scheduler::{PollTarget, PollingTask, DEFAULT_POLL_INTERVAL};
pub use session::SensorSession;
pub use transport::{CollectingTransport, DeviceInfo, NullTransport, ReportTransport};
