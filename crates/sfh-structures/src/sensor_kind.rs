// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::{SfhError, SfhResult};

/// Physical sensor types aggregated by the coprocessor.
///
/// The discriminant is the sensor identifier used on the wire, which is also the bit
/// position of the sensor in the firmware capability mask.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    Accelerometer = 0,
    Gyroscope = 1,
    Magnetometer = 2,
    LidSwitch = 15,
    AmbientLight = 19,
}

impl SensorKind {
    /// Every supported kind, in ascending identifier order.
    pub const ALL: [SensorKind; 5] = [
        SensorKind::Accelerometer,
        SensorKind::Gyroscope,
        SensorKind::Magnetometer,
        SensorKind::LidSwitch,
        SensorKind::AmbientLight,
    ];

    pub const fn sensor_id(self) -> u8 {
        self as u8
    }

    /// Single-bit mask for this kind in the capability register layout.
    pub const fn mask_bit(self) -> u32 {
        1u32 << (self as u8)
    }

    pub const fn name(self) -> &'static str {
        match self {
            SensorKind::Accelerometer => "accelerometer",
            SensorKind::Gyroscope => "gyroscope",
            SensorKind::Magnetometer => "magnetometer",
            SensorKind::LidSwitch => "lid_switch",
            SensorKind::AmbientLight => "ambient_light",
        }
    }

    /// Report id carried by this kind's feature and input reports.
    pub const fn default_report_id(self) -> u8 {
        match self {
            SensorKind::Accelerometer => 1,
            SensorKind::Gyroscope => 2,
            SensorKind::Magnetometer => 3,
            SensorKind::AmbientLight => 4,
            SensorKind::LidSwitch => 0x11,
        }
    }

    pub fn from_sensor_id(sensor_id: u8) -> SfhResult<SensorKind> {
        SensorKind::ALL
            .into_iter()
            .find(|kind| kind.sensor_id() == sensor_id)
            .ok_or_else(|| SfhError::InvalidArgument(format!("unknown sensor id {}", sensor_id)))
    }

    pub fn from_name(name: &str) -> SfhResult<SensorKind> {
        SensorKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| SfhError::InvalidArgument(format!("unknown sensor name '{}'", name)))
    }
}

impl TryFrom<u8> for SensorKind {
    type Error = SfhError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        SensorKind::from_sensor_id(value)
    }
}

impl Display for SensorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
