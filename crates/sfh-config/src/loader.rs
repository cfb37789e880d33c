// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Three tiers, later ones winning:
//! 1. TOML file (or built-in defaults when no file exists)
//! 2. Environment variables
//! 3. CLI arguments

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::validation::validate_config;
use crate::{ConfigError, ConfigResult, SfhConfig};

pub const CONFIG_FILE_NAME: &str = "sfh_configuration.toml";
pub const CONFIG_PATH_ENV: &str = "SFH_CONFIG_PATH";

const PARENT_SEARCH_DEPTH: usize = 5;

/// Find the configuration file
///
/// Search order:
/// 1. `SFH_CONFIG_PATH` environment variable (must exist when set)
/// 2. Current working directory
/// 3. Up to five parent directories
///
/// Returns `Ok(None)` when no file exists in any searched location.
pub fn find_config_file() -> ConfigResult<Option<PathBuf>> {
    if let Ok(env_path) = env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(Some(path));
        }
        return Err(ConfigError::FileNotFound(format!(
            "{} points at {}",
            CONFIG_PATH_ENV,
            path.display()
        )));
    }

    let Ok(cwd) = env::current_dir() else {
        return Ok(None);
    };
    Ok(cwd
        .ancestors()
        .take(PARENT_SEARCH_DEPTH + 1)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|path| path.exists()))
}

/// Load, override and validate the configuration
///
/// # Arguments
///
/// * `config_path` - Explicit file; when `None` the file is searched for and defaults are
///   used if none is found.
/// * `cli_args` - `key=value` overrides such as `{"driver.poll_interval_ms": "50"}`
///
/// # Errors
///
/// Missing explicit file, unreadable file, invalid TOML, malformed override values or a
/// configuration that fails validation.
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<SfhConfig> {
    let config_file = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => find_config_file()?,
    };

    let mut config = match &config_file {
        Some(path) => {
            debug!("[SFH-CONFIG] loading {}", path.display());
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => {
            debug!("[SFH-CONFIG] no {} found, using defaults", CONFIG_FILE_NAME);
            SfhConfig::default()
        }
    };

    apply_environment_overrides(&mut config)?;
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli)?;
    }

    validate_config(&config)?;
    Ok(config)
}

/// Parse a sensor mask written as decimal, `0x` hex or `0b` binary.
pub fn parse_mask(text: &str) -> ConfigResult<u32> {
    let text = text.trim();
    let parsed = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16)
    } else if let Some(binary) = text.strip_prefix("0b").or_else(|| text.strip_prefix("0B")) {
        u32::from_str_radix(binary, 2)
    } else {
        text.parse::<u32>()
    };
    parsed.map_err(|err| ConfigError::InvalidValue(format!("sensor mask {:?}: {}", text, err)))
}

fn parse_mask_override(text: &str) -> ConfigResult<Option<u32>> {
    if text.trim().eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    parse_mask(text).map(Some)
}

fn parse_interval(source: &str, text: &str) -> ConfigResult<u32> {
    text.trim().parse::<u32>().map_err(|err| {
        ConfigError::InvalidValue(format!("{} = {:?}: {}", source, text, err))
    })
}

/// Apply environment variable overrides
///
/// Supported environment variables:
/// - `SFH_SENSOR_MASK` -> `driver.sensor_mask_override` (`none` clears it)
/// - `SFH_POLL_INTERVAL_MS` -> `driver.poll_interval_ms`
/// - `SFH_LOG_LEVEL` -> `logging.level`
pub fn apply_environment_overrides(config: &mut SfhConfig) -> ConfigResult<()> {
    if let Ok(value) = env::var("SFH_SENSOR_MASK") {
        config.driver.sensor_mask_override = parse_mask_override(&value)?;
    }
    if let Ok(value) = env::var("SFH_POLL_INTERVAL_MS") {
        config.driver.poll_interval_ms = parse_interval("SFH_POLL_INTERVAL_MS", &value)?;
    }
    if let Ok(value) = env::var("SFH_LOG_LEVEL") {
        config.logging.level = value;
    }
    Ok(())
}

/// Apply CLI argument overrides
///
/// Keys: `driver.sensor_mask_override`, `driver.poll_interval_ms`, `logging.level`.
/// Unknown keys are rejected.
pub fn apply_cli_overrides(
    config: &mut SfhConfig,
    cli_args: &HashMap<String, String>,
) -> ConfigResult<()> {
    for (key, value) in cli_args {
        match key.as_str() {
            "driver.sensor_mask_override" => {
                config.driver.sensor_mask_override = parse_mask_override(value)?;
            }
            "driver.poll_interval_ms" => {
                config.driver.poll_interval_ms = parse_interval(key, value)?;
            }
            "logging.level" => config.logging.level = value.clone(),
            other => {
                return Err(ConfigError::InvalidValue(format!(
                    "unknown configuration key {:?}",
                    other
                )))
            }
        }
    }
    Ok(())
}
