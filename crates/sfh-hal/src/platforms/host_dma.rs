// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::Mutex;
use sfh_structures::{SfhError, SfhResult};
use tracing::{trace, warn};

use crate::hal::dma::{CoherentRegion, DmaAllocator};

const FIRST_DEVICE_ADDRESS: u64 = 0x1_0000_0000;
const DEVICE_PAGE: u64 = 0x1000;

#[derive(Debug, Default)]
struct HostDmaState {
    regions: HashMap<u64, Box<[AtomicU32]>>,
    next_device_address: u64,
    capacity: Option<usize>,
    failures_pending: usize,
    total_allocations: usize,
}

/// Coherent memory allocated from the host heap.
///
/// Device addresses are synthetic and page aligned above 4 GiB so both halves of the 64-bit
/// address register are exercised. [`HostDmaAllocator::write_device_words`] plays the role of
/// the coprocessor writing a sample vector.
#[derive(Debug)]
pub struct HostDmaAllocator {
    state: Mutex<HostDmaState>,
}

impl Default for HostDmaAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl HostDmaAllocator {
    pub fn new() -> Self {
        HostDmaAllocator {
            state: Mutex::new(HostDmaState {
                next_device_address: FIRST_DEVICE_ADDRESS,
                ..HostDmaState::default()
            }),
        }
    }

    /// Allocator that refuses to hold more than `max_live` regions at once.
    pub fn with_capacity(max_live: usize) -> Self {
        let allocator = Self::new();
        allocator.state.lock().capacity = Some(max_live);
        allocator
    }

    /// Make the next `count` allocations fail with `ResourceExhausted`.
    pub fn fail_next_allocations(&self, count: usize) {
        self.state.lock().failures_pending = count;
    }

    /// Regions allocated and not yet freed.
    pub fn outstanding(&self) -> usize {
        self.state.lock().regions.len()
    }

    pub fn total_allocations(&self) -> usize {
        self.state.lock().total_allocations
    }

    /// Device addresses of the live regions, ascending.
    pub fn live_device_addresses(&self) -> Vec<u64> {
        let mut addresses: Vec<u64> = self.state.lock().regions.keys().copied().collect();
        addresses.sort_unstable();
        addresses
    }

    /// Write `words` at the start of the region mapped at `device_address`, as the device would.
    pub fn write_device_words(&self, device_address: u64, words: &[u32]) -> SfhResult<()> {
        let state = self.state.lock();
        let region = state.regions.get(&device_address).ok_or_else(|| {
            SfhError::InvalidArgument(format!(
                "no coherent region mapped at device address {:#x}",
                device_address
            ))
        })?;
        if words.len() > region.len() {
            return Err(SfhError::InsufficientBuffer {
                required: words.len() * 4,
                available: region.len() * 4,
            });
        }
        for (slot, value) in region.iter().zip(words) {
            slot.store(*value, Ordering::Release);
        }
        Ok(())
    }
}

impl DmaAllocator for HostDmaAllocator {
    fn alloc_coherent(&self, len_bytes: usize) -> SfhResult<CoherentRegion> {
        if len_bytes == 0 {
            return Err(SfhError::InvalidArgument(
                "coherent allocation of zero bytes".to_string(),
            ));
        }
        let mut state = self.state.lock();
        if state.failures_pending > 0 {
            state.failures_pending -= 1;
            return Err(SfhError::ResourceExhausted(format!(
                "coherent allocation of {} bytes refused",
                len_bytes
            )));
        }
        if let Some(capacity) = state.capacity {
            if state.regions.len() >= capacity {
                return Err(SfhError::ResourceExhausted(format!(
                    "coherent pool exhausted ({} regions live)",
                    capacity
                )));
            }
        }

        let words = len_bytes.div_ceil(4);
        let storage: Box<[AtomicU32]> = (0..words).map(|_| AtomicU32::new(0)).collect();
        let cpu = NonNull::new(storage.as_ptr() as *mut AtomicU32).ok_or_else(|| {
            SfhError::ResourceExhausted("coherent allocation returned null".to_string())
        })?;

        let device_address = state.next_device_address;
        let pages = (len_bytes as u64).div_ceil(DEVICE_PAGE).max(1);
        state.next_device_address += pages * DEVICE_PAGE;
        state.total_allocations += 1;
        state.regions.insert(device_address, storage);
        trace!(
            "[SFH-HAL] allocated {} coherent bytes at device address {:#x}",
            len_bytes,
            device_address
        );

        // SAFETY: the boxed slice is owned by `regions` until `free_coherent` removes it, and
        // its heap storage does not move when the map rehashes.
        Ok(unsafe { CoherentRegion::from_raw_parts(cpu, words, device_address) })
    }

    fn free_coherent(&self, region: CoherentRegion) {
        let device_address = region.device_address();
        match self.state.lock().regions.remove(&device_address) {
            Some(_) => trace!(
                "[SFH-HAL] freed coherent region at device address {:#x}",
                device_address
            ),
            None => warn!(
                "[SFH-HAL] free of unknown coherent region at device address {:#x}",
                device_address
            ),
        }
    }
}

impl Drop for HostDmaAllocator {
    fn drop(&mut self) {
        let regions = std::mem::take(&mut self.state.get_mut().regions);
        if !regions.is_empty() {
            warn!(
                "[SFH-HAL] allocator dropped with {} live coherent regions; leaking them",
                regions.len()
            );
            for (_, storage) in regions {
                std::mem::forget(storage);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_is_zeroed_and_tracked() {
        let allocator = HostDmaAllocator::new();
        let region = allocator.alloc_coherent(32).unwrap();
        assert_eq!(region.len_words(), 8);
        assert_eq!(region.read_word(0), Some(0));
        assert_eq!(allocator.outstanding(), 1);

        allocator.free_coherent(region);
        assert_eq!(allocator.outstanding(), 0);
        assert_eq!(allocator.total_allocations(), 1);
    }

    #[test]
    fn test_device_writes_visible_to_cpu_view() {
        let allocator = HostDmaAllocator::new();
        let region = allocator.alloc_coherent(32).unwrap();
        allocator
            .write_device_words(region.device_address(), &[3000, 2, 3, 4])
            .unwrap();

        let mut words = [0u32; 4];
        assert_eq!(region.read_words(&mut words), 4);
        assert_eq!(words, [3000, 2, 3, 4]);
        allocator.free_coherent(region);
    }

    #[test]
    fn test_device_addresses_are_distinct_and_above_4g() {
        let allocator = HostDmaAllocator::new();
        let first = allocator.alloc_coherent(32).unwrap();
        let second = allocator.alloc_coherent(32).unwrap();
        assert_ne!(first.device_address(), second.device_address());
        assert!(first.device_address() >> 32 != 0);
        allocator.free_coherent(first);
        allocator.free_coherent(second);
    }

    #[test]
    fn test_capacity_and_injected_failures() {
        let allocator = HostDmaAllocator::with_capacity(1);
        let region = allocator.alloc_coherent(32).unwrap();
        assert!(matches!(
            allocator.alloc_coherent(32),
            Err(SfhError::ResourceExhausted(_))
        ));
        allocator.free_coherent(region);

        allocator.fail_next_allocations(1);
        assert!(allocator.alloc_coherent(32).is_err());
        let region = allocator.alloc_coherent(32).unwrap();
        allocator.free_coherent(region);
        assert_eq!(allocator.outstanding(), 0);
    }

    #[test]
    fn test_write_to_unknown_address_rejected() {
        let allocator = HostDmaAllocator::new();
        assert!(matches!(
            allocator.write_device_words(0xDEAD_0000, &[1]),
            Err(SfhError::InvalidArgument(_))
        ));
    }
}
