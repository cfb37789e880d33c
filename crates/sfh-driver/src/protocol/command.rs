// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Command and parameter words.
//!
//! Two command word layouts exist, chosen by the version field of the status register:
//!
//! ```text
//! V1 (version 0, 1)   31            16 15      8 7       0
//!                     |   interval    | sensor  |  cmd    |
//!
//! V2 (version 2)      31     24 23     16 15 14     8 7   5 4 3   0
//!                     | period | sensor  |mt| length | rsvd|i| cmd |
//! ```
//!
//! `mt` selects the memory source (set for the ambient light sensor only) and `i` disables
//! the completion interrupt.

use std::fmt;

use sfh_structures::{SensorKind, SfhError, SfhResult};

/// Buffer layout written by every enable.
pub const BUFFER_LAYOUT_DEFAULT: u8 = 1;

/// Sample buffer length in 32-bit words, as announced to the firmware.
pub const BUFFER_LENGTH_WORDS: u8 = 16;

/// Largest period a V2 command word can carry.
pub const PERIOD_MAX: u8 = u8::MAX;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    Noop = 0,
    EnableSensor = 1,
    DisableSensor = 2,
    DumpSensorInfo = 3,
    NumberOfSensorsDiscovered = 4,
    WhoAmI = 5,
    SetDcdData = 6,
    GetDcdData = 7,
    StopAllSensors = 8,
    Invalid = 0xF,
}

impl TryFrom<u8> for CommandId {
    type Error = SfhError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => CommandId::Noop,
            1 => CommandId::EnableSensor,
            2 => CommandId::DisableSensor,
            3 => CommandId::DumpSensorInfo,
            4 => CommandId::NumberOfSensorsDiscovered,
            5 => CommandId::WhoAmI,
            6 => CommandId::SetDcdData,
            7 => CommandId::GetDcdData,
            8 => CommandId::StopAllSensors,
            0xF => CommandId::Invalid,
            other => {
                return Err(SfhError::InvalidArgument(format!(
                    "unknown command id {:#x}",
                    other
                )))
            }
        })
    }
}

/// Command word layout of one device. Fixed once selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandEncoding {
    V1,
    V2,
}

impl CommandEncoding {
    /// Layout for the version field of the status register.
    pub fn from_version(version: u8) -> SfhResult<Self> {
        match version {
            0 | 1 => Ok(CommandEncoding::V1),
            2 => Ok(CommandEncoding::V2),
            other => Err(SfhError::ProtocolVersionUnsupported(other)),
        }
    }
}

impl fmt::Display for CommandEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandEncoding::V1 => write!(f, "v1"),
            CommandEncoding::V2 => write!(f, "v2"),
        }
    }
}

/// Fields of a command, independent of the layout they are packed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandWord {
    pub command: CommandId,
    pub sensor_id: u8,
    /// Poll interval in milliseconds. V2 saturates it to [`PERIOD_MAX`].
    pub interval_ms: u16,
    /// Buffer length in words (V2 only).
    pub length_words: u8,
    /// Memory source selector (V2 only).
    pub mem_type: bool,
    /// Suppress the completion interrupt (V2 only).
    pub interrupt_disable: bool,
}

impl CommandWord {
    pub fn new(command: CommandId, sensor_id: u8) -> Self {
        CommandWord {
            command,
            sensor_id,
            interval_ms: 0,
            length_words: 0,
            mem_type: false,
            interrupt_disable: false,
        }
    }

    pub fn enable(kind: SensorKind, interval_ms: u16) -> Self {
        CommandWord {
            interval_ms,
            length_words: BUFFER_LENGTH_WORDS,
            mem_type: kind == SensorKind::AmbientLight,
            ..CommandWord::new(CommandId::EnableSensor, kind.sensor_id())
        }
    }

    pub fn disable(kind: SensorKind) -> Self {
        CommandWord::new(CommandId::DisableSensor, kind.sensor_id())
    }

    pub fn stop_all() -> Self {
        CommandWord::new(CommandId::StopAllSensors, 0)
    }

    pub fn encode(&self, encoding: CommandEncoding) -> u32 {
        match encoding {
            CommandEncoding::V1 => {
                u32::from(self.command as u8)
                    | u32::from(self.sensor_id) << 8
                    | u32::from(self.interval_ms) << 16
            }
            CommandEncoding::V2 => {
                let period = self.interval_ms.min(u16::from(PERIOD_MAX)) as u32;
                u32::from(self.command as u8 & 0x0F)
                    | u32::from(self.interrupt_disable) << 4
                    | u32::from(self.length_words & 0x7F) << 8
                    | u32::from(self.mem_type) << 15
                    | u32::from(self.sensor_id) << 16
                    | period << 24
            }
        }
    }

    /// Unpack a word written with `encoding`.
    pub fn decode(word: u32, encoding: CommandEncoding) -> SfhResult<Self> {
        match encoding {
            CommandEncoding::V1 => Ok(CommandWord {
                interval_ms: (word >> 16) as u16,
                ..CommandWord::new(CommandId::try_from(word as u8)?, (word >> 8) as u8)
            }),
            CommandEncoding::V2 => Ok(CommandWord {
                interval_ms: u16::from((word >> 24) as u8),
                length_words: ((word >> 8) & 0x7F) as u8,
                mem_type: word & (1 << 15) != 0,
                interrupt_disable: word & (1 << 4) != 0,
                ..CommandWord::new(
                    CommandId::try_from((word & 0x0F) as u8)?,
                    (word >> 16) as u8,
                )
            }),
        }
    }
}

/// Parameter word written to C2P_MSG1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParameterWord {
    pub buffer_layout: u8,
    pub buffer_length: u8,
}

impl ParameterWord {
    pub const EMPTY: ParameterWord = ParameterWord {
        buffer_layout: 0,
        buffer_length: 0,
    };

    pub const fn sample_buffer() -> Self {
        ParameterWord {
            buffer_layout: BUFFER_LAYOUT_DEFAULT,
            buffer_length: BUFFER_LENGTH_WORDS,
        }
    }

    /// `buffer_layout:2 | buffer_length:6`, upper bits reserved.
    pub fn encode(&self) -> u32 {
        u32::from(self.buffer_layout & 0x03) | u32::from(self.buffer_length & 0x3F) << 2
    }
}
