// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Device-coherent memory
//!
//! The coprocessor writes sample vectors straight into host memory. A [`CoherentRegion`]
//! names one such region from both sides: the CPU view used to read samples and the
//! device address programmed into the mailbox.

use std::ptr::NonNull;
use std::sync::atomic::{AtomicU32, Ordering};

use sfh_structures::SfhResult;

/// One device-coherent allocation, viewed as 32-bit words.
///
/// The region is not `Clone`: it is handed back to [`DmaAllocator::free_coherent`] by value,
/// so a region can only be freed once.
#[derive(Debug)]
pub struct CoherentRegion {
    cpu: NonNull<AtomicU32>,
    words: usize,
    device_address: u64,
}

// SAFETY: the CPU view is only ever accessed through atomic loads and stores.
unsafe impl Send for CoherentRegion {}
// SAFETY: as above; shared access never produces a non-atomic reference.
unsafe impl Sync for CoherentRegion {}

impl CoherentRegion {
    /// Wrap an allocation produced by a [`DmaAllocator`].
    ///
    /// # Safety
    ///
    /// `cpu` must point to `words` properly aligned 32-bit words that remain valid until the
    /// region is passed to `free_coherent` of the allocator that produced it. The memory may
    /// be written concurrently by the device but must not be accessed non-atomically by the
    /// host.
    pub unsafe fn from_raw_parts(cpu: NonNull<AtomicU32>, words: usize, device_address: u64) -> Self {
        CoherentRegion {
            cpu,
            words,
            device_address,
        }
    }

    /// Address the device uses to reach this region.
    pub fn device_address(&self) -> u64 {
        self.device_address
    }

    pub fn len_words(&self) -> usize {
        self.words
    }

    pub fn len_bytes(&self) -> usize {
        self.words * 4
    }

    fn word(&self, index: usize) -> Option<&AtomicU32> {
        if index >= self.words {
            return None;
        }
        // SAFETY: index is in bounds and the memory is valid per the constructor contract.
        Some(unsafe { &*self.cpu.as_ptr().add(index) })
    }

    /// Read one word written by the device.
    pub fn read_word(&self, index: usize) -> Option<u32> {
        self.word(index).map(|word| word.load(Ordering::Acquire))
    }

    /// Store one word from the host side, e.g. to clear the region.
    pub fn write_word(&self, index: usize, value: u32) -> bool {
        match self.word(index) {
            Some(word) => {
                word.store(value, Ordering::Release);
                true
            }
            None => false,
        }
    }

    /// Copy the leading words of the region into `out`, returning how many were copied.
    pub fn read_words(&self, out: &mut [u32]) -> usize {
        let count = out.len().min(self.words);
        for (index, slot) in out.iter_mut().take(count).enumerate() {
            if let Some(value) = self.read_word(index) {
                *slot = value;
            }
        }
        count
    }
}

/// Allocator of device-coherent memory.
pub trait DmaAllocator: Send + Sync {
    /// Allocate at least `len_bytes` bytes of zeroed coherent memory.
    ///
    /// Fails with `ResourceExhausted` when no memory is available. Never blocks waiting for
    /// memory to be freed.
    fn alloc_coherent(&self, len_bytes: usize) -> SfhResult<CoherentRegion>;

    /// Return a region obtained from [`DmaAllocator::alloc_coherent`] on this allocator.
    fn free_coherent(&self, region: CoherentRegion);
}
