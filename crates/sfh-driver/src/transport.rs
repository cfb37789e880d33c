// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Boundary to the input-device layer that publishes sensor reports.

use parking_lot::Mutex;
use sfh_structures::{SensorKind, SfhResult};

pub const SFH_VENDOR_ID: u16 = 0x03FE;
pub const SFH_PRODUCT_ID: u16 = 0x0001;
pub const SFH_VERSION: u16 = 0x0001;
pub const SFH_PHYS: &str = "AMD Sensor Fusion Hub (PCIe)";

/// Identity of the input device announced for one sensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub vendor: u16,
    pub product: u16,
    pub version: u16,
    pub phys: &'static str,
    pub name: String,
}

impl DeviceInfo {
    pub fn for_kind(kind: SensorKind) -> Self {
        DeviceInfo {
            vendor: SFH_VENDOR_ID,
            product: SFH_PRODUCT_ID,
            version: SFH_VERSION,
            phys: SFH_PHYS,
            name: format!("sfh-{}", kind.name()),
        }
    }
}

/// Receiver of the input reports produced by polling.
///
/// Called from the polling threads, possibly concurrently for different kinds. Must not call
/// back into the hub: `close` joins the polling thread while holding the session table, so any
/// hub call from here (including `input_report` and `session_status`) can deadlock.
pub trait ReportTransport: Send + Sync {
    fn deliver_input_report(&self, kind: SensorKind, report: &[u8]) -> SfhResult<()>;
}

/// Transport that drops every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTransport;

impl ReportTransport for NullTransport {
    fn deliver_input_report(&self, _kind: SensorKind, _report: &[u8]) -> SfhResult<()> {
        Ok(())
    }
}

/// Transport that keeps every delivered report in memory.
#[derive(Debug, Default)]
pub struct CollectingTransport {
    reports: Mutex<Vec<(SensorKind, Vec<u8>)>>,
}

impl CollectingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<(SensorKind, Vec<u8>)> {
        self.reports.lock().clone()
    }

    pub fn reports_for(&self, kind: SensorKind) -> Vec<Vec<u8>> {
        self.reports
            .lock()
            .iter()
            .filter(|(reported, _)| *reported == kind)
            .map(|(_, bytes)| bytes.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.reports.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.lock().is_empty()
    }
}

impl ReportTransport for CollectingTransport {
    fn deliver_input_report(&self, kind: SensorKind, report: &[u8]) -> SfhResult<()> {
        self.reports.lock().push((kind, report.to_vec()));
        Ok(())
    }
}
