// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! The core crate for the Sensor Fusion Hub bridge. Defines the data types shared by the
//! register protocol, the report codec and the session lifecycle.

mod error;
mod raw_samples;
mod sensor_kind;
mod sensor_mask;

pub use error::{SfhError, SfhResult};
pub use raw_samples::{RawSamples, FIRMWARE_DIVISOR, RAW_SAMPLE_WORDS};
pub use sensor_kind::SensorKind;
pub use sensor_mask::{SensorMask, SensorMaskIter};
