// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! The single command mailbox of a device.
//!
//! Every command is a short register write sequence ending with the command word; the device
//! latches the other registers when the command word lands. Sequences from different sessions
//! must not interleave, so all of them run under one lock, which also holds the command
//! encoding once it has been selected.

use std::fmt;

use parking_lot::Mutex;
use sfh_hal::{offsets, RegisterBlock};
use sfh_structures::SensorKind;
use tracing::{debug, trace, warn};

use super::command::{CommandEncoding, CommandWord, ParameterWord};
use crate::mask::version_from_register;

struct MailboxState<R> {
    registers: R,
    encoding: Option<CommandEncoding>,
}

impl<R: RegisterBlock> MailboxState<R> {
    fn encoding(&mut self) -> CommandEncoding {
        if let Some(encoding) = self.encoding {
            return encoding;
        }
        let status = self.registers.read32(offsets::P2C_MSG3);
        let version = version_from_register(status);
        let encoding = match CommandEncoding::from_version(version) {
            Ok(encoding) => encoding,
            Err(err) => {
                warn!("[SFH-MAILBOX] {}; falling back to the v1 command layout", err);
                CommandEncoding::V1
            }
        };
        debug!(
            "[SFH-MAILBOX] Protocol version {} uses the {} command layout",
            version, encoding
        );
        self.encoding = Some(encoding);
        encoding
    }

    fn write_command(&mut self, command: CommandWord) {
        let encoding = self.encoding();
        let word = command.encode(encoding);
        trace!(
            "[SFH-MAILBOX] {:?} sensor {} -> {:#010x}",
            command.command,
            command.sensor_id,
            word
        );
        self.registers.write32(offsets::C2P_MSG0, word);
    }
}

/// Response-side registers captured for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResponseSnapshot {
    pub response: [u32; 3],
    pub interrupt_enable: u32,
    pub interrupt_status: u32,
}

impl fmt::Display for ResponseSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "P2C_MSG0..2 = [{:#010x}, {:#010x}, {:#010x}], INTEN = {:#x}, INTSTS = {:#x}",
            self.response[0],
            self.response[1],
            self.response[2],
            self.interrupt_enable,
            self.interrupt_status
        )
    }
}

/// Device handle serializing every mailbox write sequence.
pub struct Mailbox<R: RegisterBlock> {
    state: Mutex<MailboxState<R>>,
}

impl<R: RegisterBlock> Mailbox<R> {
    pub fn new(registers: R) -> Self {
        Mailbox {
            state: Mutex::new(MailboxState {
                registers,
                encoding: None,
            }),
        }
    }

    /// Raw value of the status register (version and capability mask).
    pub fn status(&self) -> u32 {
        self.state.lock().registers.read32(offsets::P2C_MSG3)
    }

    /// Select the command encoding from the status register, unless already fixed.
    ///
    /// An unsupported version is logged and falls back to [`CommandEncoding::V1`].
    pub fn select_encoding(&self) -> CommandEncoding {
        self.state.lock().encoding()
    }

    /// Encoding in use, if one has been selected.
    pub fn encoding(&self) -> Option<CommandEncoding> {
        self.state.lock().encoding
    }

    /// Point the sensor at `dma_address` and start it.
    pub fn enable(&self, kind: SensorKind, dma_address: u64, interval_ms: u16) {
        let mut state = self.state.lock();
        state.registers.write64(offsets::C2P_MSG2, dma_address);
        state
            .registers
            .write32(offsets::C2P_MSG1, ParameterWord::sample_buffer().encode());
        state.registers.write_barrier();
        state.write_command(CommandWord::enable(kind, interval_ms));
        debug!(
            "[SFH-MAILBOX] Enabled {} (buffer {:#x}, interval {} ms)",
            kind, dma_address, interval_ms
        );
    }

    /// Stop the sensor; its buffer is no longer written once the command lands.
    pub fn disable(&self, kind: SensorKind) {
        let mut state = self.state.lock();
        state.registers.write64(offsets::C2P_MSG2, 0);
        state
            .registers
            .write32(offsets::C2P_MSG1, ParameterWord::EMPTY.encode());
        state.registers.write_barrier();
        state.write_command(CommandWord::disable(kind));
        debug!("[SFH-MAILBOX] Disabled {}", kind);
    }

    pub fn stop_all(&self) {
        let mut state = self.state.lock();
        state
            .registers
            .write32(offsets::C2P_MSG1, ParameterWord::EMPTY.encode());
        state.registers.write_barrier();
        state.write_command(CommandWord::stop_all());
        debug!("[SFH-MAILBOX] Stopped all sensors");
    }

    /// Zero the command and response registers.
    pub fn clear_registers(&self) {
        let mut state = self.state.lock();
        for offset in offsets::C2P_ALL.into_iter().chain(offsets::P2C_RESPONSE) {
            state.registers.write32(offset, 0);
        }
    }

    /// Read the response registers without waiting for the device.
    pub fn capture_response(&self) -> ResponseSnapshot {
        let state = self.state.lock();
        let registers = &state.registers;
        let snapshot = ResponseSnapshot {
            response: offsets::P2C_RESPONSE.map(|offset| registers.read32(offset)),
            interrupt_enable: registers.read32(offsets::P2C_INTEN),
            interrupt_status: registers.read32(offsets::P2C_INTSTS),
        };
        debug!("[SFH-MAILBOX] Response: {}", snapshot);
        snapshot
    }

    pub fn clear_interrupt_status(&self) {
        self.state.lock().registers.write32(offsets::P2C_INTSTS, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sfh_hal::{RecordingRegisters, RegisterEvent};

    #[test]
    fn test_enable_write_order() {
        let registers = RecordingRegisters::new();
        let mailbox = Mailbox::new(registers.clone());
        mailbox.enable(SensorKind::Gyroscope, 0x1_2345_6000, 200);

        assert_eq!(
            registers.events(),
            vec![
                RegisterEvent::Write {
                    offset: offsets::C2P_MSG2,
                    value: 0x2345_6000
                },
                RegisterEvent::Write {
                    offset: offsets::C2P_MSG3,
                    value: 0x1
                },
                RegisterEvent::Write {
                    offset: offsets::C2P_MSG1,
                    value: 0x41
                },
                RegisterEvent::Barrier,
                RegisterEvent::Write {
                    offset: offsets::C2P_MSG0,
                    value: 0x00C8_0101
                },
            ]
        );
    }

    #[test]
    fn test_disable_clears_address_and_parameters() {
        let registers = RecordingRegisters::new();
        let mailbox = Mailbox::new(registers.clone());
        mailbox.disable(SensorKind::LidSwitch);
        assert_eq!(
            registers.writes(),
            vec![
                (offsets::C2P_MSG2, 0),
                (offsets::C2P_MSG3, 0),
                (offsets::C2P_MSG1, 0),
                (offsets::C2P_MSG0, 0x0F02),
            ]
        );
    }

    #[test]
    fn test_stop_all_sequence() {
        let registers = RecordingRegisters::new();
        let mailbox = Mailbox::new(registers.clone());
        mailbox.stop_all();
        assert_eq!(
            registers.writes(),
            vec![(offsets::C2P_MSG1, 0), (offsets::C2P_MSG0, 8)]
        );
    }

    #[test]
    fn test_encoding_fixed_after_first_selection() {
        let registers = RecordingRegisters::with_status(0x2);
        let mailbox = Mailbox::new(registers.clone());
        assert_eq!(mailbox.encoding(), None);
        assert_eq!(mailbox.select_encoding(), CommandEncoding::V2);

        registers.set(offsets::P2C_MSG3, 0x1);
        assert_eq!(mailbox.select_encoding(), CommandEncoding::V2);
        assert_eq!(registers.read_count(offsets::P2C_MSG3), 1);
    }

    #[test]
    fn test_unsupported_version_falls_back() {
        let registers = RecordingRegisters::with_status(0b10100);
        let mailbox = Mailbox::new(registers.clone());
        mailbox.enable(SensorKind::Accelerometer, 0x1000, 200);
        assert_eq!(mailbox.encoding(), Some(CommandEncoding::V1));
        assert_eq!(registers.writes_to(offsets::C2P_MSG0), vec![0x00C8_0001]);
    }

    #[test]
    fn test_clear_registers_and_snapshot() {
        let registers = RecordingRegisters::new();
        registers.set(offsets::P2C_MSG1, 0xAB);
        registers.set(offsets::P2C_INTSTS, 1);
        let mailbox = Mailbox::new(registers.clone());

        let snapshot = mailbox.capture_response();
        assert_eq!(snapshot.response, [0, 0xAB, 0]);
        assert_eq!(snapshot.interrupt_status, 1);

        mailbox.clear_interrupt_status();
        mailbox.clear_registers();
        let cleared: Vec<usize> = registers
            .writes()
            .into_iter()
            .skip(1)
            .map(|(offset, _)| offset)
            .collect();
        assert_eq!(cleared.len(), 13);
        assert!(cleared.contains(&offsets::C2P_MSG9));
        assert!(cleared.contains(&offsets::P2C_MSG2));
        assert!(!cleared.contains(&offsets::P2C_MSG3));
        assert_eq!(registers.value(offsets::P2C_MSG1), 0);
    }
}
