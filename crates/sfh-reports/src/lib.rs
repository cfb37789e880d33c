// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! HID-style report descriptors and the feature/input report codec.
//!
//! Every function here is pure: reports are built from the sensor kind, the report id chosen by
//! the transport and (for input reports) one raw sample vector. All multi-byte fields are packed
//! little-endian.

pub mod common;
pub mod descriptors;
pub mod hid_parser;
pub mod sensor_report;
pub mod sensors;

use std::fmt;

use sfh_structures::{RawSamples, SensorKind, SfhError, SfhResult};

pub use common::{CommonFeatures, CommonInputs, SensitivityBounds};
pub use hid_parser::{parse_descriptor, DescriptorSummary, ReportLayout};
pub use sensor_report::{FieldReader, FieldWriter, SensorReport};
pub use sensors::{handler, handlers, SensorReportHandler};

/// Report categories a transport can request.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportType {
    Input = 1,
    Output = 2,
    Feature = 3,
}

impl TryFrom<u8> for ReportType {
    type Error = SfhError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ReportType::Input),
            2 => Ok(ReportType::Output),
            3 => Ok(ReportType::Feature),
            other => Err(SfhError::InvalidArgument(format!(
                "unknown report type {}",
                other
            ))),
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportType::Input => "input",
            ReportType::Output => "output",
            ReportType::Feature => "feature",
        };
        write!(f, "{}", name)
    }
}

/// Compiled-in report descriptor for `kind`.
pub fn descriptor(kind: SensorKind) -> &'static [u8] {
    handler(kind).descriptor()
}

pub fn descriptor_size(kind: SensorKind) -> usize {
    handler(kind).descriptor().len()
}

/// Write the static feature report of `kind` into `out`, returning its length.
pub fn feature_report(kind: SensorKind, report_id: u8, out: &mut [u8]) -> SfhResult<usize> {
    handler(kind).write_feature_report(report_id, out)
}

/// Decode `samples` into the input report of `kind`, returning its length.
pub fn input_report(
    kind: SensorKind,
    report_id: u8,
    samples: &RawSamples,
    out: &mut [u8],
) -> SfhResult<usize> {
    handler(kind).write_input_report(report_id, samples, out)
}

/// Wire length of one report of `kind`. None of the sensors accept output reports.
pub fn report_size(kind: SensorKind, report_type: ReportType) -> SfhResult<usize> {
    let handler = handler(kind);
    match report_type {
        ReportType::Input => Ok(handler.input_report_len()),
        ReportType::Feature => Ok(handler.feature_report_len()),
        ReportType::Output => Err(SfhError::InvalidArgument(format!(
            "{} has no output report",
            kind
        ))),
    }
}

/// Feature report of `kind` as an owned buffer.
pub fn feature_report_vec(kind: SensorKind, report_id: u8) -> SfhResult<Vec<u8>> {
    let mut bytes = vec![0u8; handler(kind).feature_report_len()];
    let written = feature_report(kind, report_id, &mut bytes)?;
    bytes.truncate(written);
    Ok(bytes)
}

/// Input report of `kind` as an owned buffer.
pub fn input_report_vec(kind: SensorKind, report_id: u8, samples: &RawSamples) -> SfhResult<Vec<u8>> {
    let mut bytes = vec![0u8; handler(kind).input_report_len()];
    let written = input_report(kind, report_id, samples, &mut bytes)?;
    bytes.truncate(written);
    Ok(bytes)
}
