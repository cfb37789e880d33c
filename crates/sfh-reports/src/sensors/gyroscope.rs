// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use sfh_structures::{RawSamples, SensorKind};

use super::KindReports;
use crate::common::{CommonFeatures, CommonInputs, SensitivityBounds};
use crate::descriptors;
use crate::sensor_report::{FieldReader, FieldWriter, SensorReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GyroscopeFeatureReport {
    pub common: CommonFeatures,
    pub bounds: SensitivityBounds,
}

impl GyroscopeFeatureReport {
    pub fn new(report_id: u8) -> Self {
        GyroscopeFeatureReport {
            common: CommonFeatures::new(report_id),
            bounds: SensitivityBounds::default(),
        }
    }
}

impl SensorReport for GyroscopeFeatureReport {
    const ENCODED_LEN: usize = CommonFeatures::ENCODED_LEN + 6;

    fn write_fields(&self, writer: &mut FieldWriter<'_>) {
        self.common.write_fields(writer);
        self.bounds.write_fields(writer);
    }

    fn read_fields(reader: &mut FieldReader<'_>) -> Self {
        GyroscopeFeatureReport {
            common: CommonFeatures::read_fields(reader),
            bounds: SensitivityBounds::read_fields(reader),
        }
    }
}

/// Angular velocity around each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GyroscopeInputReport {
    pub common: CommonInputs,
    pub angle_x: i32,
    pub angle_y: i32,
    pub angle_z: i32,
}

impl GyroscopeInputReport {
    pub fn from_samples(report_id: u8, samples: &RawSamples) -> Self {
        GyroscopeInputReport {
            common: CommonInputs::new(report_id),
            angle_x: samples.scaled(0),
            angle_y: samples.scaled(1),
            angle_z: samples.scaled(2),
        }
    }
}

impl SensorReport for GyroscopeInputReport {
    const ENCODED_LEN: usize = CommonInputs::ENCODED_LEN + 12;

    fn write_fields(&self, writer: &mut FieldWriter<'_>) {
        self.common.write_fields(writer);
        writer.put_i32(self.angle_x);
        writer.put_i32(self.angle_y);
        writer.put_i32(self.angle_z);
    }

    fn read_fields(reader: &mut FieldReader<'_>) -> Self {
        GyroscopeInputReport {
            common: CommonInputs::read_fields(reader),
            angle_x: reader.get_i32(),
            angle_y: reader.get_i32(),
            angle_z: reader.get_i32(),
        }
    }
}

pub(crate) static REPORTS: KindReports<GyroscopeFeatureReport, GyroscopeInputReport> =
    KindReports::new(
        SensorKind::Gyroscope,
        &descriptors::GYROSCOPE,
        GyroscopeFeatureReport::new,
        GyroscopeInputReport::from_samples,
    );
