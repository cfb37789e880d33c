// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use sfh_structures::{RawSamples, SensorKind};

use super::KindReports;
use crate::common::{CommonFeatures, CommonInputs};
use crate::descriptors;
use crate::sensor_report::{FieldReader, FieldWriter, SensorReport};

/// The lid switch has no bounds; its feature report is the common block alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LidSwitchFeatureReport {
    pub common: CommonFeatures,
}

impl LidSwitchFeatureReport {
    pub fn new(report_id: u8) -> Self {
        LidSwitchFeatureReport {
            common: CommonFeatures::new(report_id),
        }
    }
}

impl SensorReport for LidSwitchFeatureReport {
    const ENCODED_LEN: usize = CommonFeatures::ENCODED_LEN;

    fn write_fields(&self, writer: &mut FieldWriter<'_>) {
        self.common.write_fields(writer);
    }

    fn read_fields(reader: &mut FieldReader<'_>) -> Self {
        LidSwitchFeatureReport {
            common: CommonFeatures::read_fields(reader),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LidSwitchInputReport {
    pub common: CommonInputs,
    /// 1 when the firmware reports a nonzero lid value.
    pub state: u8,
}

impl LidSwitchInputReport {
    pub fn from_samples(report_id: u8, samples: &RawSamples) -> Self {
        LidSwitchInputReport {
            common: CommonInputs::new(report_id),
            state: u8::from(samples.scaled(0) != 0),
        }
    }

    pub fn is_set(&self) -> bool {
        self.state != 0
    }
}

impl SensorReport for LidSwitchInputReport {
    const ENCODED_LEN: usize = CommonInputs::ENCODED_LEN + 1;

    fn write_fields(&self, writer: &mut FieldWriter<'_>) {
        self.common.write_fields(writer);
        writer.put_u8(self.state);
    }

    fn read_fields(reader: &mut FieldReader<'_>) -> Self {
        LidSwitchInputReport {
            common: CommonInputs::read_fields(reader),
            state: reader.get_u8(),
        }
    }
}

pub(crate) static REPORTS: KindReports<LidSwitchFeatureReport, LidSwitchInputReport> =
    KindReports::new(
        SensorKind::LidSwitch,
        &descriptors::LID_SWITCH,
        LidSwitchFeatureReport::new,
        LidSwitchInputReport::from_samples,
    );

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_is_boolean() {
        let closed = RawSamples::from_signed([1000, 0, 0, 0]);
        assert_eq!(LidSwitchInputReport::from_samples(0x11, &closed).state, 1);
        let large = RawSamples::from_signed([42_000, 0, 0, 0]);
        assert_eq!(LidSwitchInputReport::from_samples(0x11, &large).state, 1);
        let open = RawSamples::from_signed([999, 0, 0, 0]);
        assert!(!LidSwitchInputReport::from_samples(0x11, &open).is_set());
    }
}
