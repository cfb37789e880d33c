// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/// Device-coherent memory allocation.
pub mod dma;
/// Mailbox register map and access trait.
pub mod registers;

pub use dma::{CoherentRegion, DmaAllocator};
pub use registers::{offsets, RegisterBlock, REGISTER_WINDOW_LEN};
