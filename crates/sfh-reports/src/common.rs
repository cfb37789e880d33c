// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Header fields shared by every sensor's feature and input reports.

use crate::sensor_report::{FieldReader, FieldWriter, SensorReport};

/// Sensor is built into the platform.
pub const CONNECTION_TYPE_INTEGRATED: u8 = 0x01;
/// Report on every event.
pub const REPORT_STATE_ALL_EVENTS: u8 = 0x41;
/// D0, full power.
pub const POWER_STATE_D0_FULL_POWER: u8 = 0x51;
pub const SENSOR_STATE_READY: u8 = 0x02;
pub const SENSOR_STATE_INITIALIZING: u8 = 0x05;
pub const EVENT_TYPE_DATA_UPDATED: u8 = 0x04;
/// Report interval advertised in feature reports.
pub const DEFAULT_REPORT_INTERVAL: u32 = 0x50;

/// Default static bounds advertised in feature reports.
pub const DEFAULT_SENSITIVITY: u16 = 0x7F;
pub const DEFAULT_MIN_VALUE: i16 = 0x7F;
pub const DEFAULT_MAX_VALUE: i16 = 0x80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommonFeatures {
    pub report_id: u8,
    pub connection_type: u8,
    pub report_state: u8,
    pub power_state: u8,
    pub sensor_state: u8,
    pub report_interval: u32,
}

impl CommonFeatures {
    pub const fn new(report_id: u8) -> Self {
        CommonFeatures {
            report_id,
            connection_type: CONNECTION_TYPE_INTEGRATED,
            report_state: REPORT_STATE_ALL_EVENTS,
            power_state: POWER_STATE_D0_FULL_POWER,
            sensor_state: SENSOR_STATE_INITIALIZING,
            report_interval: DEFAULT_REPORT_INTERVAL,
        }
    }
}

impl SensorReport for CommonFeatures {
    const ENCODED_LEN: usize = 9;

    fn write_fields(&self, writer: &mut FieldWriter<'_>) {
        writer.put_u8(self.report_id);
        writer.put_u8(self.connection_type);
        writer.put_u8(self.report_state);
        writer.put_u8(self.power_state);
        writer.put_u8(self.sensor_state);
        writer.put_u32(self.report_interval);
    }

    fn read_fields(reader: &mut FieldReader<'_>) -> Self {
        CommonFeatures {
            report_id: reader.get_u8(),
            connection_type: reader.get_u8(),
            report_state: reader.get_u8(),
            power_state: reader.get_u8(),
            sensor_state: reader.get_u8(),
            report_interval: reader.get_u32(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommonInputs {
    pub report_id: u8,
    pub sensor_state: u8,
    pub event_type: u8,
}

impl CommonInputs {
    pub const fn new(report_id: u8) -> Self {
        CommonInputs {
            report_id,
            sensor_state: SENSOR_STATE_READY,
            event_type: EVENT_TYPE_DATA_UPDATED,
        }
    }
}

impl SensorReport for CommonInputs {
    const ENCODED_LEN: usize = 3;

    fn write_fields(&self, writer: &mut FieldWriter<'_>) {
        writer.put_u8(self.report_id);
        writer.put_u8(self.sensor_state);
        writer.put_u8(self.event_type);
    }

    fn read_fields(reader: &mut FieldReader<'_>) -> Self {
        CommonInputs {
            report_id: reader.get_u8(),
            sensor_state: reader.get_u8(),
            event_type: reader.get_u8(),
        }
    }
}

/// Sensitivity bounds shared by the accelerometer, gyroscope and ambient light feature reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensitivityBounds {
    pub change_sensitivity: u16,
    pub sensitivity_max: i16,
    pub sensitivity_min: i16,
}

impl Default for SensitivityBounds {
    fn default() -> Self {
        SensitivityBounds {
            change_sensitivity: DEFAULT_SENSITIVITY,
            sensitivity_max: DEFAULT_MAX_VALUE,
            sensitivity_min: DEFAULT_MIN_VALUE,
        }
    }
}

impl SensitivityBounds {
    pub(crate) fn write_fields(&self, writer: &mut FieldWriter<'_>) {
        writer.put_u16(self.change_sensitivity);
        writer.put_i16(self.sensitivity_max);
        writer.put_i16(self.sensitivity_min);
    }

    pub(crate) fn read_fields(reader: &mut FieldReader<'_>) -> Self {
        SensitivityBounds {
            change_sensitivity: reader.get_u16(),
            sensitivity_max: reader.get_i16(),
            sensitivity_min: reader.get_i16(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_features_layout() {
        let bytes = CommonFeatures::new(7).to_bytes();
        assert_eq!(bytes, vec![7, 0x01, 0x41, 0x51, 0x05, 0x50, 0, 0, 0]);
    }

    #[test]
    fn test_common_inputs_layout() {
        let bytes = CommonInputs::new(0x11).to_bytes();
        assert_eq!(bytes, vec![0x11, 0x02, 0x04]);
    }
}
