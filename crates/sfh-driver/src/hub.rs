// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Session lifecycle for one Sensor Fusion Hub device.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use sfh_config::DriverConfig;
use sfh_hal::{DmaAllocator, RegisterBlock};
use sfh_reports::ReportType;
use sfh_structures::{RawSamples, SensorKind, SensorMask, SfhError, SfhResult};
use tracing::{debug, error, info, warn};

use crate::dma_buffer::DmaBufferManager;
use crate::mask::{self, MaskSource};
use crate::protocol::Mailbox;
use crate::quirks::PlatformIdentity;
use crate::scheduler::{LatestSample, PollTarget, PollingTask, SpawnFailure, DEFAULT_POLL_INTERVAL};
use crate::session::SensorSession;
use crate::transport::{DeviceInfo, ReportTransport};

/// Longest poll interval the enable command can carry.
pub const MAX_POLL_INTERVAL: Duration = Duration::from_millis(u16::MAX as u64);

/// Hub settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubConfig {
    /// Between 1 ms and [`MAX_POLL_INTERVAL`], whole milliseconds.
    pub poll_interval: Duration,
    /// Replaces the firmware capability mask when set.
    pub sensor_mask_override: Option<SensorMask>,
}

impl Default for HubConfig {
    fn default() -> Self {
        HubConfig {
            poll_interval: DEFAULT_POLL_INTERVAL,
            sensor_mask_override: None,
        }
    }
}

impl From<&DriverConfig> for HubConfig {
    fn from(config: &DriverConfig) -> Self {
        HubConfig {
            poll_interval: config.poll_interval(),
            sensor_mask_override: config.mask_override(),
        }
    }
}

/// Outcome of [`SensorHub::probe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSummary {
    pub mask: SensorMask,
    pub source: MaskSource,
    pub opened: Vec<SensorKind>,
    pub failed: Vec<(SensorKind, SfhError)>,
}

/// Host-side bridge to one coprocessor.
///
/// Owns the mailbox, the sample buffer pool and at most one session per sensor kind. Open and
/// close hold the session table lock for their whole sequence; polling threads never take it.
pub struct SensorHub<R: RegisterBlock> {
    mailbox: Mailbox<R>,
    buffers: DmaBufferManager,
    transport: Arc<dyn ReportTransport>,
    sessions: Mutex<HashMap<SensorKind, SensorSession>>,
    config: HubConfig,
}

impl<R: RegisterBlock> SensorHub<R> {
    pub fn new(
        registers: R,
        allocator: Arc<dyn DmaAllocator>,
        transport: Arc<dyn ReportTransport>,
        config: HubConfig,
    ) -> Self {
        SensorHub {
            mailbox: Mailbox::new(registers),
            buffers: DmaBufferManager::new(allocator),
            transport,
            sessions: Mutex::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    /// The device mailbox, for diagnostics.
    pub fn mailbox(&self) -> &Mailbox<R> {
        &self.mailbox
    }

    /// Resolve the active sensor mask from the override, the status register and the quirks.
    pub fn resolve_sensor_mask(&self, platform: Option<&PlatformIdentity>) -> mask::ResolvedMask {
        mask::resolve(
            self.mailbox.status(),
            self.config.sensor_mask_override,
            platform,
        )
    }

    /// Bring the device up: select the command encoding, resolve the mask and open every
    /// sensor in it.
    ///
    /// A sensor that fails to open is reported in the summary and does not stop the others.
    /// An empty mask is not an error.
    pub fn probe(&self, platform: Option<&PlatformIdentity>) -> ProbeSummary {
        let encoding = self.mailbox.select_encoding();
        let resolved = self.resolve_sensor_mask(platform);
        let mut summary = ProbeSummary {
            mask: resolved.mask,
            source: resolved.source,
            opened: Vec::new(),
            failed: Vec::new(),
        };

        for kind in resolved.mask {
            match self.open(kind) {
                Ok(()) => summary.opened.push(kind),
                Err(err) => {
                    error!("[SFH-HUB] Failed to open {}: {}", kind, err);
                    summary.failed.push((kind, err));
                }
            }
        }

        info!(
            "[SFH-HUB] Probe complete: {} command layout, mask {} ({:?}), {} sensor(s) open",
            encoding,
            summary.mask,
            summary.source,
            summary.opened.len()
        );
        summary
    }

    /// Start a session for `kind`.
    ///
    /// Acquires a sample buffer, enables the sensor and starts polling. If polling cannot be
    /// started the sensor is disabled again before its buffer is released.
    pub fn open(&self, kind: SensorKind) -> SfhResult<()> {
        let mut sessions = self.sessions.lock();
        if sessions.contains_key(&kind) {
            return Err(SfhError::SessionAlreadyOpen(kind));
        }

        let interval = self.config.poll_interval;
        let interval_ms = poll_interval_ms(interval)?;
        let buffer = self.buffers.acquire()?;
        let device_address = buffer.device_address();
        self.mailbox.enable(kind, device_address, interval_ms);

        let latest = LatestSample::default();
        let target = PollTarget {
            kind,
            report_id: kind.default_report_id(),
            interval,
            transport: Arc::clone(&self.transport),
            latest: Arc::clone(&latest),
        };
        let task = match PollingTask::spawn(target, buffer) {
            Ok(task) => task,
            Err(SpawnFailure { error, buffer }) => {
                self.mailbox.disable(kind);
                self.buffers.release(buffer);
                return Err(error);
            }
        };

        sessions.insert(
            kind,
            SensorSession::new(kind, interval, device_address, task, latest),
        );
        info!("[SFH-HUB] Opened {}", DeviceInfo::for_kind(kind).name);
        Ok(())
    }

    /// End the session for `kind`: stop polling, disable the sensor, free its buffer.
    ///
    /// Returns `false` (and touches nothing) when no session is open.
    pub fn close(&self, kind: SensorKind) -> bool {
        let mut sessions = self.sessions.lock();
        let Some(session) = sessions.remove(&kind) else {
            debug!("[SFH-HUB] Close of {} ignored; no session open", kind);
            return false;
        };

        let buffer = session.stop_polling();
        self.mailbox.disable(kind);
        match buffer {
            Some(buffer) => self.buffers.release(buffer),
            None => warn!("[SFH-HUB] Sample buffer of {} leaked with its polling thread", kind),
        }
        info!("[SFH-HUB] Closed {}", DeviceInfo::for_kind(kind).name);
        true
    }

    /// Tear the device down: close every session, stop all sensors, clear the mailbox.
    pub fn remove(&self) {
        for kind in self.open_sensors() {
            self.close(kind);
        }
        self.mailbox.stop_all();
        self.mailbox.clear_registers();
        debug!("[SFH-HUB] Device removed");
    }

    pub fn is_open(&self, kind: SensorKind) -> bool {
        self.sessions.lock().contains_key(&kind)
    }

    /// Kinds with a live session, in ascending sensor id order.
    pub fn open_sensors(&self) -> Vec<SensorKind> {
        let sessions = self.sessions.lock();
        SensorKind::ALL
            .into_iter()
            .filter(|kind| sessions.contains_key(kind))
            .collect()
    }

    /// Latest sample and poll count of an open session.
    pub fn session_status(&self, kind: SensorKind) -> SfhResult<(Option<RawSamples>, u64)> {
        let sessions = self.sessions.lock();
        let session = sessions.get(&kind).ok_or(SfhError::SensorNotOpen(kind))?;
        Ok((session.latest_samples(), session.poll_count()))
    }

    pub fn device_info(&self, kind: SensorKind) -> DeviceInfo {
        DeviceInfo::for_kind(kind)
    }

    pub fn descriptor(&self, kind: SensorKind) -> &'static [u8] {
        sfh_reports::descriptor(kind)
    }

    /// Static feature report of `kind`.
    pub fn feature_report(&self, kind: SensorKind, report_id: u8) -> SfhResult<Vec<u8>> {
        sfh_reports::feature_report_vec(kind, report_id)
    }

    /// Input report built from the session's latest sample (zeros before the first poll).
    pub fn input_report(&self, kind: SensorKind, report_id: u8) -> SfhResult<Vec<u8>> {
        let (samples, _) = self.session_status(kind)?;
        sfh_reports::input_report_vec(kind, report_id, &samples.unwrap_or_default())
    }

    /// Transport-initiated report read.
    ///
    /// `report_id` must be the kind's report id. Output reports are not supported.
    pub fn raw_request(
        &self,
        kind: SensorKind,
        report_id: u8,
        report_type: ReportType,
    ) -> SfhResult<Vec<u8>> {
        if report_id != kind.default_report_id() {
            return Err(SfhError::InvalidArgument(format!(
                "{} has no report id {:#x}",
                kind, report_id
            )));
        }
        match report_type {
            ReportType::Feature => self.feature_report(kind, report_id),
            ReportType::Input => self.input_report(kind, report_id),
            ReportType::Output => Err(SfhError::InvalidArgument(format!(
                "{} reports cannot be written",
                kind
            ))),
        }
    }
}

fn poll_interval_ms(interval: Duration) -> SfhResult<u16> {
    match u16::try_from(interval.as_millis()) {
        Ok(ms) if ms > 0 => Ok(ms),
        _ => Err(SfhError::InvalidArgument(format!(
            "poll interval {:?} outside 1 ms..={:?}",
            interval, MAX_POLL_INTERVAL
        ))),
    }
}

impl<R: RegisterBlock> Drop for SensorHub<R> {
    fn drop(&mut self) {
        if !self.sessions.get_mut().is_empty() {
            warn!("[SFH-HUB] Hub dropped with open sessions; removing device");
            self.remove();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::CollectingTransport;
    use sfh_hal::{offsets, HostDmaAllocator, RecordingRegisters};

    fn hub(
        registers: &RecordingRegisters,
        allocator: &Arc<HostDmaAllocator>,
    ) -> SensorHub<RecordingRegisters> {
        SensorHub::new(
            registers.clone(),
            allocator.clone(),
            Arc::new(CollectingTransport::new()),
            HubConfig::default(),
        )
    }

    #[test]
    fn test_second_open_rejected() {
        let registers = RecordingRegisters::new();
        let allocator = Arc::new(HostDmaAllocator::new());
        let hub = hub(&registers, &allocator);

        hub.open(SensorKind::Gyroscope).unwrap();
        assert_eq!(
            hub.open(SensorKind::Gyroscope),
            Err(SfhError::SessionAlreadyOpen(SensorKind::Gyroscope))
        );
        assert_eq!(allocator.outstanding(), 1);
        assert_eq!(registers.writes_to(offsets::C2P_MSG0).len(), 1);
        hub.remove();
    }

    #[test]
    fn test_allocation_failure_leaves_nothing_behind() {
        let registers = RecordingRegisters::new();
        let allocator = Arc::new(HostDmaAllocator::new());
        allocator.fail_next_allocations(1);
        let hub = hub(&registers, &allocator);

        assert!(matches!(
            hub.open(SensorKind::Accelerometer),
            Err(SfhError::ResourceExhausted(_))
        ));
        assert!(!hub.is_open(SensorKind::Accelerometer));
        assert!(registers.writes().is_empty());
        assert_eq!(allocator.outstanding(), 0);
    }

    #[test]
    fn test_raw_request_validation() {
        let registers = RecordingRegisters::new();
        let allocator = Arc::new(HostDmaAllocator::new());
        let hub = hub(&registers, &allocator);

        assert_eq!(
            hub.raw_request(SensorKind::LidSwitch, 0x11, ReportType::Input),
            Err(SfhError::SensorNotOpen(SensorKind::LidSwitch))
        );
        assert!(matches!(
            hub.raw_request(SensorKind::LidSwitch, 0x11, ReportType::Output),
            Err(SfhError::InvalidArgument(_))
        ));
        assert!(matches!(
            hub.raw_request(SensorKind::LidSwitch, 0x01, ReportType::Feature),
            Err(SfhError::InvalidArgument(_))
        ));
        let feature = hub
            .raw_request(SensorKind::LidSwitch, 0x11, ReportType::Feature)
            .unwrap();
        assert_eq!(feature.len(), 9);
    }

    #[test]
    fn test_config_conversion() {
        let driver = DriverConfig {
            sensor_mask_override: Some(0b101),
            poll_interval_ms: 50,
        };
        let config = HubConfig::from(&driver);
        assert_eq!(config.poll_interval, Duration::from_millis(50));
        assert_eq!(config.sensor_mask_override, Some(SensorMask::from_bits(0b101)));
    }

    #[test]
    fn test_out_of_range_interval_rejected() {
        for poll_interval in [
            Duration::ZERO,
            Duration::from_micros(500),
            MAX_POLL_INTERVAL + Duration::from_millis(1),
        ] {
            let registers = RecordingRegisters::new();
            let allocator = Arc::new(HostDmaAllocator::new());
            let hub = SensorHub::new(
                registers.clone(),
                allocator.clone(),
                Arc::new(CollectingTransport::new()),
                HubConfig {
                    poll_interval,
                    sensor_mask_override: None,
                },
            );
            assert!(matches!(
                hub.open(SensorKind::Accelerometer),
                Err(SfhError::InvalidArgument(_))
            ));
            assert!(registers.writes().is_empty());
            assert_eq!(allocator.total_allocations(), 0);
        }
    }

    #[test]
    fn test_longest_interval_accepted() {
        let registers = RecordingRegisters::new();
        let allocator = Arc::new(HostDmaAllocator::new());
        let hub = SensorHub::new(
            registers.clone(),
            allocator.clone(),
            Arc::new(CollectingTransport::new()),
            HubConfig {
                poll_interval: MAX_POLL_INTERVAL,
                sensor_mask_override: None,
            },
        );
        hub.open(SensorKind::Gyroscope).unwrap();
        assert_eq!(
            registers.writes_to(offsets::C2P_MSG0),
            vec![0xFFFF_0101]
        );
        hub.remove();
    }
}
