// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use sfh_structures::{RawSamples, SensorKind};

use super::KindReports;
use crate::common::{
    CommonFeatures, CommonInputs, DEFAULT_MAX_VALUE, DEFAULT_MIN_VALUE, DEFAULT_SENSITIVITY,
};
use crate::descriptors;
use crate::sensor_report::{FieldReader, FieldWriter, SensorReport};

/// Heading and flux bounds, in descriptor order (sensitivity, maximum, minimum).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MagnetometerFeatureReport {
    pub common: CommonFeatures,
    pub heading_change_sensitivity: u16,
    pub heading_max: i16,
    pub heading_min: i16,
    pub flux_change_sensitivity: u16,
    pub flux_max: i16,
    pub flux_min: i16,
}

impl MagnetometerFeatureReport {
    pub fn new(report_id: u8) -> Self {
        MagnetometerFeatureReport {
            common: CommonFeatures::new(report_id),
            heading_change_sensitivity: DEFAULT_SENSITIVITY,
            heading_max: DEFAULT_MAX_VALUE,
            heading_min: DEFAULT_MIN_VALUE,
            flux_change_sensitivity: DEFAULT_SENSITIVITY,
            flux_max: DEFAULT_MAX_VALUE,
            flux_min: DEFAULT_MIN_VALUE,
        }
    }
}

impl SensorReport for MagnetometerFeatureReport {
    const ENCODED_LEN: usize = CommonFeatures::ENCODED_LEN + 12;

    fn write_fields(&self, writer: &mut FieldWriter<'_>) {
        self.common.write_fields(writer);
        writer.put_u16(self.heading_change_sensitivity);
        writer.put_i16(self.heading_max);
        writer.put_i16(self.heading_min);
        writer.put_u16(self.flux_change_sensitivity);
        writer.put_i16(self.flux_max);
        writer.put_i16(self.flux_min);
    }

    fn read_fields(reader: &mut FieldReader<'_>) -> Self {
        MagnetometerFeatureReport {
            common: CommonFeatures::read_fields(reader),
            heading_change_sensitivity: reader.get_u16(),
            heading_max: reader.get_i16(),
            heading_min: reader.get_i16(),
            flux_change_sensitivity: reader.get_u16(),
            flux_max: reader.get_i16(),
            flux_min: reader.get_i16(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MagnetometerInputReport {
    pub common: CommonInputs,
    pub flux_x: i32,
    pub flux_y: i32,
    pub flux_z: i32,
    pub accuracy: i32,
}

impl MagnetometerInputReport {
    pub fn from_samples(report_id: u8, samples: &RawSamples) -> Self {
        MagnetometerInputReport {
            common: CommonInputs::new(report_id),
            flux_x: samples.scaled(0),
            flux_y: samples.scaled(1),
            flux_z: samples.scaled(2),
            accuracy: samples.scaled(3),
        }
    }
}

impl SensorReport for MagnetometerInputReport {
    const ENCODED_LEN: usize = CommonInputs::ENCODED_LEN + 16;

    fn write_fields(&self, writer: &mut FieldWriter<'_>) {
        self.common.write_fields(writer);
        writer.put_i32(self.flux_x);
        writer.put_i32(self.flux_y);
        writer.put_i32(self.flux_z);
        writer.put_i32(self.accuracy);
    }

    fn read_fields(reader: &mut FieldReader<'_>) -> Self {
        MagnetometerInputReport {
            common: CommonInputs::read_fields(reader),
            flux_x: reader.get_i32(),
            flux_y: reader.get_i32(),
            flux_z: reader.get_i32(),
            accuracy: reader.get_i32(),
        }
    }
}

pub(crate) static REPORTS: KindReports<MagnetometerFeatureReport, MagnetometerInputReport> =
    KindReports::new(
        SensorKind::Magnetometer,
        &descriptors::MAGNETOMETER,
        MagnetometerFeatureReport::new,
        MagnetometerInputReport::from_samples,
    );
