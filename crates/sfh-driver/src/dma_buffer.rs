// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-session sample buffers.

use std::fmt;
use std::mem::ManuallyDrop;
use std::sync::Arc;

use sfh_hal::{CoherentRegion, DmaAllocator};
use sfh_structures::{RawSamples, SfhResult, RAW_SAMPLE_WORDS};
use tracing::{debug, warn};

/// Size of every sample buffer: eight 32-bit words.
pub const DMA_BUFFER_SIZE: usize = 32;

/// Hands out one coherent buffer per open session.
#[derive(Clone)]
pub struct DmaBufferManager {
    allocator: Arc<dyn DmaAllocator>,
}

impl DmaBufferManager {
    pub fn new(allocator: Arc<dyn DmaAllocator>) -> Self {
        DmaBufferManager { allocator }
    }

    /// Allocate a zeroed buffer. Fails with `ResourceExhausted`.
    pub fn acquire(&self) -> SfhResult<DmaBuffer> {
        let region = self.allocator.alloc_coherent(DMA_BUFFER_SIZE).map_err(|err| {
            warn!("[SFH-DMA] Sample buffer allocation failed: {}", err);
            err
        })?;
        debug!(
            "[SFH-DMA] Acquired sample buffer at {:#x}",
            region.device_address()
        );
        Ok(DmaBuffer {
            region: ManuallyDrop::new(region),
            allocator: Arc::clone(&self.allocator),
        })
    }

    /// Free `buffer`. Dropping it has the same effect.
    pub fn release(&self, buffer: DmaBuffer) {
        drop(buffer);
    }
}

impl fmt::Debug for DmaBufferManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DmaBufferManager").finish_non_exhaustive()
    }
}

/// Exclusively owned sample buffer. Freed exactly once, when dropped.
pub struct DmaBuffer {
    region: ManuallyDrop<CoherentRegion>,
    allocator: Arc<dyn DmaAllocator>,
}

impl DmaBuffer {
    /// Address the device writes samples to.
    pub fn device_address(&self) -> u64 {
        self.region.device_address()
    }

    pub fn len_bytes(&self) -> usize {
        self.region.len_bytes()
    }

    /// Latest sample vector written by the device.
    pub fn read_samples(&self) -> RawSamples {
        let mut words = [0u32; RAW_SAMPLE_WORDS];
        self.region.read_words(&mut words);
        RawSamples::new(words)
    }
}

impl fmt::Debug for DmaBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DmaBuffer")
            .field("device_address", &format_args!("{:#x}", self.device_address()))
            .field("len_bytes", &self.len_bytes())
            .finish()
    }
}

impl Drop for DmaBuffer {
    fn drop(&mut self) {
        // SAFETY: `region` is taken once, here, and never touched afterwards.
        let region = unsafe { ManuallyDrop::take(&mut self.region) };
        debug!(
            "[SFH-DMA] Releasing sample buffer at {:#x}",
            region.device_address()
        );
        self.allocator.free_coherent(region);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sfh_hal::HostDmaAllocator;
    use sfh_structures::SfhError;

    #[test]
    fn test_acquire_release_balance() {
        let allocator = Arc::new(HostDmaAllocator::new());
        let manager = DmaBufferManager::new(allocator.clone());

        let first = manager.acquire().unwrap();
        let second = manager.acquire().unwrap();
        assert_eq!(allocator.outstanding(), 2);
        assert_eq!(first.len_bytes(), DMA_BUFFER_SIZE);
        assert_ne!(first.device_address(), second.device_address());

        manager.release(first);
        assert_eq!(allocator.outstanding(), 1);
        drop(second);
        assert_eq!(allocator.outstanding(), 0);
    }

    #[test]
    fn test_reads_device_samples() {
        let allocator = Arc::new(HostDmaAllocator::new());
        let manager = DmaBufferManager::new(allocator.clone());
        let buffer = manager.acquire().unwrap();
        assert_eq!(buffer.read_samples(), RawSamples::default());

        allocator
            .write_device_words(buffer.device_address(), &[3000, (-2000i32) as u32, 9800, 1, 77])
            .unwrap();
        assert_eq!(
            buffer.read_samples(),
            RawSamples::from_signed([3000, -2000, 9800, 1])
        );
    }

    #[test]
    fn test_allocation_failure_reported() {
        let allocator = Arc::new(HostDmaAllocator::new());
        allocator.fail_next_allocations(1);
        let manager = DmaBufferManager::new(allocator.clone());
        assert!(matches!(
            manager.acquire(),
            Err(SfhError::ResourceExhausted(_))
        ));
        assert_eq!(allocator.outstanding(), 0);
    }
}
