// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-kind report handlers.
//!
//! Each sensor kind contributes one handler object; [`handler`] resolves a kind to its handler
//! once, and every codec entry point goes through that table.

pub mod accelerometer;
pub mod ambient_light;
pub mod gyroscope;
pub mod lid_switch;
pub mod magnetometer;

use sfh_structures::{RawSamples, SensorKind, SfhResult};

use crate::sensor_report::SensorReport;

/// Descriptor and report builders for one sensor kind.
pub trait SensorReportHandler: Send + Sync {
    fn kind(&self) -> SensorKind;

    fn descriptor(&self) -> &'static [u8];

    fn feature_report_len(&self) -> usize;

    fn input_report_len(&self) -> usize;

    /// Write the kind's static feature report, returning the number of bytes written.
    fn write_feature_report(&self, report_id: u8, destination: &mut [u8]) -> SfhResult<usize>;

    /// Decode `samples` into the kind's input report, returning the number of bytes written.
    fn write_input_report(
        &self,
        report_id: u8,
        samples: &RawSamples,
        destination: &mut [u8],
    ) -> SfhResult<usize>;
}

/// Handler built from a kind's report types and constructors.
pub struct KindReports<F, I> {
    kind: SensorKind,
    descriptor: &'static [u8],
    feature: fn(u8) -> F,
    input: fn(u8, &RawSamples) -> I,
}

impl<F, I> KindReports<F, I> {
    pub const fn new(
        kind: SensorKind,
        descriptor: &'static [u8],
        feature: fn(u8) -> F,
        input: fn(u8, &RawSamples) -> I,
    ) -> Self {
        KindReports {
            kind,
            descriptor,
            feature,
            input,
        }
    }
}

impl<F: SensorReport, I: SensorReport> SensorReportHandler for KindReports<F, I> {
    fn kind(&self) -> SensorKind {
        self.kind
    }

    fn descriptor(&self) -> &'static [u8] {
        self.descriptor
    }

    fn feature_report_len(&self) -> usize {
        F::ENCODED_LEN
    }

    fn input_report_len(&self) -> usize {
        I::ENCODED_LEN
    }

    fn write_feature_report(&self, report_id: u8, destination: &mut [u8]) -> SfhResult<usize> {
        (self.feature)(report_id).try_write_to_byte_slice(destination)
    }

    fn write_input_report(
        &self,
        report_id: u8,
        samples: &RawSamples,
        destination: &mut [u8],
    ) -> SfhResult<usize> {
        (self.input)(report_id, samples).try_write_to_byte_slice(destination)
    }
}

static HANDLERS: [&dyn SensorReportHandler; 5] = [
    &accelerometer::REPORTS,
    &gyroscope::REPORTS,
    &magnetometer::REPORTS,
    &lid_switch::REPORTS,
    &ambient_light::REPORTS,
];

/// Handler for `kind`.
pub fn handler(kind: SensorKind) -> &'static dyn SensorReportHandler {
    let index = match kind {
        SensorKind::Accelerometer => 0,
        SensorKind::Gyroscope => 1,
        SensorKind::Magnetometer => 2,
        SensorKind::LidSwitch => 3,
        SensorKind::AmbientLight => 4,
    };
    HANDLERS[index]
}

/// Every handler, in ascending sensor id order.
pub fn handlers() -> &'static [&'static dyn SensorReportHandler] {
    &HANDLERS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_keyed_by_kind() {
        for kind in SensorKind::ALL {
            assert_eq!(handler(kind).kind(), kind);
        }
        let kinds: Vec<_> = handlers().iter().map(|h| h.kind()).collect();
        assert_eq!(kinds, SensorKind::ALL.to_vec());
    }
}
