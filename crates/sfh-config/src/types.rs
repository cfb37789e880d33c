// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! Each struct maps to a section of `sfh_configuration.toml`. Every field has a default, so
//! an empty file (or no file at all) yields a working configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use sfh_structures::SensorMask;

pub use sfh_observability::LoggingConfig;

/// Poll interval used when nothing overrides it
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 200;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SfhConfig {
    pub driver: DriverConfig,
    pub logging: LoggingConfig,
}

/// Driver behavior (`[driver]`)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Replaces the firmware capability mask when set, including a mask of zero
    pub sensor_mask_override: Option<u32>,
    /// Period of every sensor's polling task
    pub poll_interval_ms: u32,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            sensor_mask_override: None,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl DriverConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.poll_interval_ms))
    }

    pub fn mask_override(&self) -> Option<SensorMask> {
        self.sensor_mask_override.map(SensorMask::from_bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SfhConfig::default();
        assert_eq!(config.driver.poll_interval(), Duration::from_millis(200));
        assert!(config.driver.mask_override().is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_zero_override_is_kept() {
        let config: SfhConfig = toml::from_str("[driver]\nsensor_mask_override = 0\n").unwrap();
        assert_eq!(config.driver.mask_override(), Some(SensorMask::EMPTY));
        assert_eq!(config.driver.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
    }

    #[test]
    fn test_json_round_trip_keeps_sections() {
        let mut config = SfhConfig::default();
        config.driver.sensor_mask_override = Some(0b111);
        let json = serde_json::to_string(&config).unwrap();
        let back: SfhConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
