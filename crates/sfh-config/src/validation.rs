// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation

use sfh_observability::{is_valid_level, LOG_LEVELS};
use sfh_structures::SensorMask;

use crate::{ConfigError, ConfigResult, SfhConfig};

/// Longest poll interval the command word can carry, in milliseconds
pub const MAX_POLL_INTERVAL_MS: u32 = u16::MAX as u32;

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    UnknownSensorBits { mask: u32, unknown: u32 },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownSensorBits { mask, unknown } => write!(
                f,
                "driver.sensor_mask_override = {:#x} sets bits {:#x} that name no sensor",
                mask, unknown
            ),
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// Checks for:
/// - Poll interval in 1..=65535 ms
/// - Mask override limited to known sensor bits
/// - Known log level
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &SfhConfig) -> ConfigResult<()> {
    let errors = collect_errors(config);
    if errors.is_empty() {
        return Ok(());
    }
    let error_messages = errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n");
    Err(ConfigError::ValidationError(format!(
        "Configuration validation failed:\n{}",
        error_messages
    )))
}

fn collect_errors(config: &SfhConfig) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();

    let interval = config.driver.poll_interval_ms;
    if interval == 0 || interval > MAX_POLL_INTERVAL_MS {
        errors.push(ConfigValidationError::InvalidValue {
            field: "driver.poll_interval_ms".to_string(),
            reason: format!("{} is outside 1..={}", interval, MAX_POLL_INTERVAL_MS),
        });
    }

    if let Some(mask) = config.driver.sensor_mask_override {
        let unknown = SensorMask::from_bits(mask).unknown_bits();
        if unknown != 0 {
            errors.push(ConfigValidationError::UnknownSensorBits { mask, unknown });
        }
    }

    if !is_valid_level(&config.logging.level) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!(
                "{:?} is not one of {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    errors
}
