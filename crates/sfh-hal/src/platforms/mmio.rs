// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::ptr::NonNull;
use std::sync::atomic::{fence, Ordering};

use sfh_structures::{SfhError, SfhResult};
use tracing::error;

use crate::hal::registers::{RegisterBlock, REGISTER_WINDOW_LEN};

/// Register block backed by a mapped device window.
///
/// Accesses are volatile 32-bit loads and stores. Offsets outside the window are rejected
/// and logged rather than dereferenced.
#[derive(Debug)]
pub struct MmioRegisters {
    base: NonNull<u8>,
    len: usize,
}

// SAFETY: the window is device memory reachable from any thread; exclusive access for writes
// is enforced by `&mut self` and by the driver's mailbox lock.
unsafe impl Send for MmioRegisters {}

impl MmioRegisters {
    /// Wrap a mapped register window.
    ///
    /// # Safety
    ///
    /// `base` must be the start of a mapping of the coprocessor register window that is at
    /// least `len` bytes long, stays mapped for the lifetime of the returned value, and is
    /// not written through any other handle.
    pub unsafe fn new(base: NonNull<u8>, len: usize) -> SfhResult<Self> {
        if len < REGISTER_WINDOW_LEN {
            return Err(SfhError::InvalidArgument(format!(
                "register window of {:#x} bytes does not cover the mailbox (needs {:#x})",
                len, REGISTER_WINDOW_LEN
            )));
        }
        if base.as_ptr() as usize % 4 != 0 {
            return Err(SfhError::InvalidArgument(
                "register window base is not 32-bit aligned".to_string(),
            ));
        }
        Ok(MmioRegisters { base, len })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    fn register(&self, offset: usize) -> Option<*mut u32> {
        if offset % 4 != 0 || offset.checked_add(4).map_or(true, |end| end > self.len) {
            error!(
                "[SFH-HAL] register offset {:#x} outside mapped window of {:#x} bytes",
                offset, self.len
            );
            return None;
        }
        // SAFETY: offset + 4 is within the mapping established in `new`.
        Some(unsafe { self.base.as_ptr().add(offset) } as *mut u32)
    }
}

impl RegisterBlock for MmioRegisters {
    fn read32(&self, offset: usize) -> u32 {
        match self.register(offset) {
            // SAFETY: aligned, in-bounds device register.
            Some(register) => unsafe { register.read_volatile() },
            None => 0,
        }
    }

    fn write32(&mut self, offset: usize, value: u32) {
        if let Some(register) = self.register(offset) {
            // SAFETY: aligned, in-bounds device register.
            unsafe { register.write_volatile(value) }
        }
    }

    fn write_barrier(&mut self) {
        fence(Ordering::SeqCst);
    }
}
