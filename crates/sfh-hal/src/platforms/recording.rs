// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::hal::registers::RegisterBlock;

/// One observed access to a [`RecordingRegisters`] block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterEvent {
    Write { offset: usize, value: u32 },
    Barrier,
}

#[derive(Debug, Default)]
struct RegisterFile {
    values: HashMap<usize, u32>,
    events: Vec<RegisterEvent>,
    reads: HashMap<usize, usize>,
}

/// Register block kept in host memory.
///
/// Clones share the same register file, so a test can hand one clone to the driver and keep
/// another to preload firmware status or inspect the write log.
#[derive(Debug, Clone, Default)]
pub struct RecordingRegisters {
    file: Arc<Mutex<RegisterFile>>,
}

impl RecordingRegisters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register block whose status register (P2C_MSG3) already holds `status`.
    pub fn with_status(status: u32) -> Self {
        let registers = Self::new();
        registers.set(crate::hal::registers::offsets::P2C_MSG3, status);
        registers
    }

    /// Set a register as the firmware would, without logging a host write.
    pub fn set(&self, offset: usize, value: u32) {
        self.file.lock().values.insert(offset, value);
    }

    pub fn value(&self, offset: usize) -> u32 {
        self.file.lock().values.get(&offset).copied().unwrap_or(0)
    }

    pub fn events(&self) -> Vec<RegisterEvent> {
        self.file.lock().events.clone()
    }

    /// Host writes in program order as `(offset, value)` pairs.
    pub fn writes(&self) -> Vec<(usize, u32)> {
        self.file
            .lock()
            .events
            .iter()
            .filter_map(|event| match event {
                RegisterEvent::Write { offset, value } => Some((*offset, *value)),
                RegisterEvent::Barrier => None,
            })
            .collect()
    }

    /// Values written to one register, oldest first.
    pub fn writes_to(&self, offset: usize) -> Vec<u32> {
        self.writes()
            .into_iter()
            .filter(|(written, _)| *written == offset)
            .map(|(_, value)| value)
            .collect()
    }

    pub fn read_count(&self, offset: usize) -> usize {
        self.file.lock().reads.get(&offset).copied().unwrap_or(0)
    }

    pub fn clear_log(&self) {
        let mut file = self.file.lock();
        file.events.clear();
        file.reads.clear();
    }
}

impl RegisterBlock for RecordingRegisters {
    fn read32(&self, offset: usize) -> u32 {
        let mut file = self.file.lock();
        *file.reads.entry(offset).or_insert(0) += 1;
        file.values.get(&offset).copied().unwrap_or(0)
    }

    fn write32(&mut self, offset: usize, value: u32) {
        let mut file = self.file.lock();
        file.values.insert(offset, value);
        file.events.push(RegisterEvent::Write { offset, value });
    }

    fn write_barrier(&mut self) {
        self.file.lock().events.push(RegisterEvent::Barrier);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::registers::offsets;

    #[test]
    fn test_clones_share_register_file() {
        let observer = RecordingRegisters::with_status(0x12);
        let mut device = observer.clone();

        assert_eq!(device.read32(offsets::P2C_MSG3), 0x12);
        device.write64(offsets::C2P_MSG2, 0xAAAA_BBBB_CCCC_DDDD);

        assert_eq!(
            observer.writes(),
            vec![
                (offsets::C2P_MSG2, 0xCCCC_DDDD),
                (offsets::C2P_MSG3, 0xAAAA_BBBB)
            ]
        );
        assert_eq!(observer.read_count(offsets::P2C_MSG3), 1);
    }

    #[test]
    fn test_firmware_side_set_is_not_logged() {
        let registers = RecordingRegisters::new();
        registers.set(offsets::P2C_MSG0, 7);
        assert!(registers.writes().is_empty());
        assert_eq!(registers.value(offsets::P2C_MSG0), 7);
    }

    #[test]
    fn test_barrier_recorded_between_writes() {
        let mut registers = RecordingRegisters::new();
        registers.write32(offsets::C2P_MSG1, 1);
        registers.write_barrier();
        registers.write32(offsets::C2P_MSG0, 2);
        assert_eq!(
            registers.events(),
            vec![
                RegisterEvent::Write {
                    offset: offsets::C2P_MSG1,
                    value: 1
                },
                RegisterEvent::Barrier,
                RegisterEvent::Write {
                    offset: offsets::C2P_MSG0,
                    value: 2
                },
            ]
        );
    }
}
