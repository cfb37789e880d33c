// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Platforms whose firmware leaves the capability register empty.

use sfh_structures::{SensorKind, SensorMask};

/// Platform identity as reported by the system firmware tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PlatformIdentity {
    pub vendor: String,
    pub board_name: String,
    pub board_version: String,
}

impl PlatformIdentity {
    pub fn new(
        vendor: impl Into<String>,
        board_name: impl Into<String>,
        board_version: impl Into<String>,
    ) -> Self {
        PlatformIdentity {
            vendor: vendor.into(),
            board_name: board_name.into(),
            board_version: board_version.into(),
        }
    }
}

/// Sensor mask to use on one platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuirkEntry {
    /// Human-readable model name, for logs.
    pub ident: &'static str,
    pub vendor: &'static str,
    pub board_name: &'static str,
    pub board_version: &'static str,
    pub sensor_mask: SensorMask,
}

impl QuirkEntry {
    /// Exact, case-sensitive match on all three fields.
    pub fn matches(&self, platform: &PlatformIdentity) -> bool {
        self.vendor == platform.vendor
            && self.board_name == platform.board_name
            && self.board_version == platform.board_version
    }
}

const HP_ENVY_X360_MASK: SensorMask = SensorMask::EMPTY
    .with(SensorKind::Accelerometer)
    .with(SensorKind::Magnetometer)
    .with(SensorKind::LidSwitch);

/// Platforms whose firmware reports an empty capability mask.
///
/// Both entries match on the board vendor. Firmware tables for the 13-ag0xxx identify the
/// vendor through the product name instead, so callers on that model should pass the product
/// name as `vendor`.
pub static QUIRKS: [QuirkEntry; 2] = [
    QuirkEntry {
        ident: "HP ENVY x360 Convertible 13-ag0xxx",
        vendor: "HP",
        board_name: "8496",
        board_version: "92.48",
        sensor_mask: HP_ENVY_X360_MASK,
    },
    QuirkEntry {
        ident: "HP ENVY x360 Convertible 15-cp0xxx",
        vendor: "HP",
        board_name: "8497",
        board_version: "92.48",
        sensor_mask: HP_ENVY_X360_MASK,
    },
];

/// First quirk matching `platform`.
pub fn lookup(platform: &PlatformIdentity) -> Option<&'static QuirkEntry> {
    QUIRKS.iter().find(|entry| entry.matches(platform))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_boards_match() {
        let entry = lookup(&PlatformIdentity::new("HP", "8497", "92.48")).unwrap();
        assert_eq!(entry.sensor_mask.bits(), 0b1000_0000_0000_0101);
        assert!(lookup(&PlatformIdentity::new("HP", "8496", "92.48")).is_some());
    }

    #[test]
    fn test_match_is_exact() {
        assert!(lookup(&PlatformIdentity::new("HP", "8496", "92.49")).is_none());
        assert!(lookup(&PlatformIdentity::new("hp", "8496", "92.48")).is_none());
        assert!(lookup(&PlatformIdentity::new("HP", "8496 ", "92.48")).is_none());
        assert!(lookup(&PlatformIdentity::default()).is_none());
    }
}
