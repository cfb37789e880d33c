// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use sfh_structures::{RawSamples, SensorKind};

use crate::dma_buffer::DmaBuffer;
use crate::scheduler::{LatestSample, PollingTask};

/// One enabled sensor: its polling task (which owns the sample buffer) and the latest sample.
pub struct SensorSession {
    kind: SensorKind,
    interval: Duration,
    device_address: u64,
    task: PollingTask,
    latest: LatestSample,
}

impl SensorSession {
    pub(crate) fn new(
        kind: SensorKind,
        interval: Duration,
        device_address: u64,
        task: PollingTask,
        latest: LatestSample,
    ) -> Self {
        SensorSession {
            kind,
            interval,
            device_address,
            task,
            latest,
        }
    }

    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Device address of the session's sample buffer.
    pub fn device_address(&self) -> u64 {
        self.device_address
    }

    /// Sample read by the most recent polling run, if any run has happened yet.
    pub fn latest_samples(&self) -> Option<RawSamples> {
        *self.latest.lock()
    }

    pub fn poll_count(&self) -> u64 {
        self.task.runs()
    }

    /// Stop polling and take back the sample buffer.
    pub(crate) fn stop_polling(self) -> Option<DmaBuffer> {
        self.task.cancel()
    }
}

impl std::fmt::Debug for SensorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SensorSession")
            .field("kind", &self.kind)
            .field("interval", &self.interval)
            .field("device_address", &format_args!("{:#x}", self.device_address))
            .field("poll_count", &self.poll_count())
            .finish()
    }
}
