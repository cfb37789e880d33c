// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Sensor mask resolution.
//!
//! The status register P2C_MSG3 carries the protocol version in its low four bits and the
//! capability mask above them. Resolution order: configured override, then the firmware mask,
//! then the quirk table, then nothing.

use sfh_structures::{SensorMask, SfhError};
use tracing::{debug, error, info, warn};

use crate::quirks::{self, PlatformIdentity};

/// Bits the capability mask is shifted by inside the status register.
pub const CAPABILITY_MASK_SHIFT: u32 = 4;

/// Version field of the status register.
pub const VERSION_FIELD_MASK: u32 = (1 << CAPABILITY_MASK_SHIFT) - 1;

pub fn capability_mask_from_register(raw_register_value: u32) -> SensorMask {
    SensorMask::from_bits(raw_register_value >> CAPABILITY_MASK_SHIFT)
}

pub fn version_from_register(raw_register_value: u32) -> u8 {
    (raw_register_value & VERSION_FIELD_MASK) as u8
}

/// Where a resolved mask came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskSource {
    Override,
    Firmware,
    Quirk(&'static str),
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedMask {
    pub mask: SensorMask,
    pub source: MaskSource,
}

/// Resolve the active sensor mask, reporting which source won.
pub fn resolve(
    raw_register_value: u32,
    override_mask: Option<SensorMask>,
    platform: Option<&PlatformIdentity>,
) -> ResolvedMask {
    let firmware = capability_mask_from_register(raw_register_value);
    if firmware.is_empty() {
        error!(
            "[SFH-MASK] Firmware bug: {} (status register {:#x})",
            SfhError::FirmwareMaskMissing,
            raw_register_value
        );
    }

    if let Some(mask) = override_mask {
        info!("[SFH-MASK] Using configured sensor mask {}", mask);
        return ResolvedMask {
            mask,
            source: MaskSource::Override,
        };
    }

    if !firmware.is_empty() {
        if firmware.unknown_bits() != 0 {
            warn!(
                "[SFH-MASK] Firmware mask {} has unknown bits {:#x}; they are ignored",
                firmware,
                firmware.unknown_bits()
            );
        }
        debug!("[SFH-MASK] Firmware sensor mask {}", firmware);
        return ResolvedMask {
            mask: firmware,
            source: MaskSource::Firmware,
        };
    }

    if let Some(entry) = platform.and_then(quirks::lookup) {
        info!(
            "[SFH-MASK] Using quirk mask {} for {}",
            entry.sensor_mask, entry.ident
        );
        return ResolvedMask {
            mask: entry.sensor_mask,
            source: MaskSource::Quirk(entry.ident),
        };
    }

    warn!("[SFH-MASK] No sensor mask available; no sensors will be enabled");
    ResolvedMask {
        mask: SensorMask::EMPTY,
        source: MaskSource::Empty,
    }
}

/// Resolve the active sensor mask.
pub fn resolve_mask(
    raw_register_value: u32,
    override_mask: Option<SensorMask>,
    platform: Option<&PlatformIdentity>,
) -> SensorMask {
    resolve(raw_register_value, override_mask, platform).mask
}
