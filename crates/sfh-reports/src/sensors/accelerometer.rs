// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use sfh_structures::{RawSamples, SensorKind};

use super::KindReports;
use crate::common::{CommonFeatures, CommonInputs, SensitivityBounds};
use crate::descriptors;
use crate::sensor_report::{FieldReader, FieldWriter, SensorReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccelerometerFeatureReport {
    pub common: CommonFeatures,
    pub bounds: SensitivityBounds,
}

impl AccelerometerFeatureReport {
    pub fn new(report_id: u8) -> Self {
        AccelerometerFeatureReport {
            common: CommonFeatures::new(report_id),
            bounds: SensitivityBounds::default(),
        }
    }
}

impl SensorReport for AccelerometerFeatureReport {
    const ENCODED_LEN: usize = CommonFeatures::ENCODED_LEN + 6;

    fn write_fields(&self, writer: &mut FieldWriter<'_>) {
        self.common.write_fields(writer);
        self.bounds.write_fields(writer);
    }

    fn read_fields(reader: &mut FieldReader<'_>) -> Self {
        AccelerometerFeatureReport {
            common: CommonFeatures::read_fields(reader),
            bounds: SensitivityBounds::read_fields(reader),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccelerometerInputReport {
    pub common: CommonInputs,
    pub accel_x: i32,
    pub accel_y: i32,
    pub accel_z: i32,
    pub shake_detection: u8,
}

impl AccelerometerInputReport {
    pub fn from_samples(report_id: u8, samples: &RawSamples) -> Self {
        AccelerometerInputReport {
            common: CommonInputs::new(report_id),
            accel_x: samples.scaled(0),
            accel_y: samples.scaled(1),
            accel_z: samples.scaled(2),
            shake_detection: samples.scaled(3).clamp(0, i32::from(u8::MAX)) as u8,
        }
    }
}

impl SensorReport for AccelerometerInputReport {
    const ENCODED_LEN: usize = CommonInputs::ENCODED_LEN + 13;

    fn write_fields(&self, writer: &mut FieldWriter<'_>) {
        self.common.write_fields(writer);
        writer.put_i32(self.accel_x);
        writer.put_i32(self.accel_y);
        writer.put_i32(self.accel_z);
        writer.put_u8(self.shake_detection);
    }

    fn read_fields(reader: &mut FieldReader<'_>) -> Self {
        AccelerometerInputReport {
            common: CommonInputs::read_fields(reader),
            accel_x: reader.get_i32(),
            accel_y: reader.get_i32(),
            accel_z: reader.get_i32(),
            shake_detection: reader.get_u8(),
        }
    }
}

pub(crate) static REPORTS: KindReports<AccelerometerFeatureReport, AccelerometerInputReport> =
    KindReports::new(
        SensorKind::Accelerometer,
        &descriptors::ACCELEROMETER,
        AccelerometerFeatureReport::new,
        AccelerometerInputReport::from_samples,
    );
