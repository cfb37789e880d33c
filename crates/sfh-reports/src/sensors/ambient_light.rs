// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use sfh_structures::{RawSamples, SensorKind};

use super::KindReports;
use crate::common::{CommonFeatures, CommonInputs, SensitivityBounds};
use crate::descriptors;
use crate::sensor_report::{FieldReader, FieldWriter, SensorReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmbientLightFeatureReport {
    pub common: CommonFeatures,
    pub bounds: SensitivityBounds,
}

impl AmbientLightFeatureReport {
    pub fn new(report_id: u8) -> Self {
        AmbientLightFeatureReport {
            common: CommonFeatures::new(report_id),
            bounds: SensitivityBounds::default(),
        }
    }
}

impl SensorReport for AmbientLightFeatureReport {
    const ENCODED_LEN: usize = CommonFeatures::ENCODED_LEN + 6;

    fn write_fields(&self, writer: &mut FieldWriter<'_>) {
        self.common.write_fields(writer);
        self.bounds.write_fields(writer);
    }

    fn read_fields(reader: &mut FieldReader<'_>) -> Self {
        AmbientLightFeatureReport {
            common: CommonFeatures::read_fields(reader),
            bounds: SensitivityBounds::read_fields(reader),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmbientLightInputReport {
    pub common: CommonInputs,
    pub illuminance: i32,
}

impl AmbientLightInputReport {
    pub fn from_samples(report_id: u8, samples: &RawSamples) -> Self {
        AmbientLightInputReport {
            common: CommonInputs::new(report_id),
            illuminance: samples.scaled(0),
        }
    }
}

impl SensorReport for AmbientLightInputReport {
    const ENCODED_LEN: usize = CommonInputs::ENCODED_LEN + 4;

    fn write_fields(&self, writer: &mut FieldWriter<'_>) {
        self.common.write_fields(writer);
        writer.put_i32(self.illuminance);
    }

    fn read_fields(reader: &mut FieldReader<'_>) -> Self {
        AmbientLightInputReport {
            common: CommonInputs::read_fields(reader),
            illuminance: reader.get_i32(),
        }
    }
}

pub(crate) static REPORTS: KindReports<AmbientLightFeatureReport, AmbientLightInputReport> =
    KindReports::new(
        SensorKind::AmbientLight,
        &descriptors::AMBIENT_LIGHT,
        AmbientLightFeatureReport::new,
        AmbientLightInputReport::from_samples,
    );
