// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/// Heap-backed coherent memory that simulates device writes.
#[cfg(feature = "host")]
pub mod host_dma;
/// Volatile access to a mapped register window.
pub mod mmio;
/// In-memory register file that records every access.
#[cfg(feature = "host")]
pub mod recording;

#[cfg(feature = "host")]
pub use host_dma::HostDmaAllocator;
pub use mmio::MmioRegisters;
#[cfg(feature = "host")]
pub use recording::{RecordingRegisters, RegisterEvent};
