// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-session polling.
//!
//! Each open sensor gets one named thread that wakes every interval, reads the sample buffer,
//! builds the input report and hands it to the transport. The thread owns the sample buffer
//! while it runs and returns it when joined, so the buffer cannot be freed under a read.
//! A run that panics is logged like any other failed run. If the thread itself dies the buffer
//! is leaked, never freed, because the device may still be writing to it.

use std::mem::ManuallyDrop;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use sfh_structures::{RawSamples, SensorKind, SfhError};
use tracing::{debug, error, trace, warn};

use crate::dma_buffer::DmaBuffer;
use crate::transport::ReportTransport;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Most recent sample vector of a session, shared with on-demand report reads.
pub type LatestSample = Arc<Mutex<Option<RawSamples>>>;

/// Everything a polling run needs besides the buffer.
#[derive(Clone)]
pub struct PollTarget {
    pub kind: SensorKind,
    pub report_id: u8,
    pub interval: Duration,
    pub transport: Arc<dyn ReportTransport>,
    pub latest: LatestSample,
}

/// A polling thread that could not be started. The buffer is handed back untouched.
#[derive(Debug)]
pub struct SpawnFailure {
    pub error: SfhError,
    pub buffer: DmaBuffer,
}

/// Handle to a running polling thread.
pub struct PollingTask {
    kind: SensorKind,
    cancel: Option<Sender<()>>,
    handle: Option<JoinHandle<Option<DmaBuffer>>>,
    runs: Arc<AtomicU64>,
}

impl PollingTask {
    /// Start polling `buffer`. The first run happens one interval from now.
    pub fn spawn(target: PollTarget, buffer: DmaBuffer) -> Result<Self, SpawnFailure> {
        let kind = target.kind;
        let (cancel_tx, cancel_rx) = channel::bounded::<()>(1);
        let (handoff_tx, handoff_rx) = channel::bounded::<DmaBuffer>(1);
        let runs = Arc::new(AtomicU64::new(0));
        let thread_runs = Arc::clone(&runs);

        let spawned = thread::Builder::new()
            .name(format!("sfh-poll-{}", kind.name()))
            .spawn(move || {
                let buffer = ManuallyDrop::new(handoff_rx.recv().ok()?);
                poll_loop(&target, &buffer, &cancel_rx, &thread_runs);
                Some(ManuallyDrop::into_inner(buffer))
            });
        let handle = match spawned {
            Ok(handle) => handle,
            Err(err) => {
                return Err(SpawnFailure {
                    error: SfhError::ResourceExhausted(format!(
                        "polling thread for {}: {}",
                        kind, err
                    )),
                    buffer,
                })
            }
        };

        // The thread only exits before receiving the buffer if it panicked.
        if let Err(unsent) = handoff_tx.send(buffer) {
            let _ = handle.join();
            return Err(SpawnFailure {
                error: SfhError::ResourceExhausted(format!(
                    "polling thread for {} exited before start",
                    kind
                )),
                buffer: unsent.into_inner(),
            });
        }

        debug!("[SFH-POLL] Started polling {}", kind);
        Ok(PollingTask {
            kind,
            cancel: Some(cancel_tx),
            handle: Some(handle),
            runs,
        })
    }

    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    /// Completed polling runs.
    pub fn runs(&self) -> u64 {
        self.runs.load(Ordering::Acquire)
    }

    /// Stop polling and wait for the thread, returning the sample buffer.
    ///
    /// Waits for at most one run in progress. Returns `None` if the thread died, in which case
    /// the buffer was leaked rather than freed.
    pub fn cancel(mut self) -> Option<DmaBuffer> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Option<DmaBuffer> {
        if let Some(cancel) = self.cancel.take() {
            // Disconnect wakes the thread as well if the slot is full.
            let _ = cancel.try_send(());
        }
        let handle = self.handle.take()?;
        match handle.join() {
            Ok(buffer) => {
                debug!("[SFH-POLL] Stopped polling {}", self.kind);
                buffer
            }
            Err(_) => {
                error!(
                    "[SFH-POLL] Polling thread for {} died; its sample buffer is leaked",
                    self.kind
                );
                None
            }
        }
    }
}

impl Drop for PollingTask {
    fn drop(&mut self) {
        if self.handle.is_some() {
            warn!(
                "[SFH-POLL] Polling task for {} dropped without cancel; stopping it",
                self.kind
            );
            self.shutdown();
        }
    }
}

fn poll_loop(
    target: &PollTarget,
    buffer: &DmaBuffer,
    cancel: &Receiver<()>,
    runs: &AtomicU64,
) {
    let mut report = Vec::new();
    loop {
        match cancel.recv_timeout(target.interval) {
            Err(RecvTimeoutError::Timeout) => {
                let run = panic::catch_unwind(AssertUnwindSafe(|| {
                    poll_once(target, buffer, &mut report)
                }));
                if let Err(payload) = run {
                    error!(
                        "[SFH-POLL] Polling run for {} panicked: {}",
                        target.kind,
                        panic_message(payload.as_ref())
                    );
                    report.clear();
                }
                runs.fetch_add(1, Ordering::AcqRel);
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        return message;
    }
    payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .unwrap_or("non-string panic payload")
}

/// One run. Failures are logged and the next run still happens.
fn poll_once(target: &PollTarget, buffer: &DmaBuffer, report: &mut Vec<u8>) {
    let samples = buffer.read_samples();
    *target.latest.lock() = Some(samples);

    let handler = sfh_reports::handler(target.kind);
    report.resize(handler.input_report_len(), 0);
    match handler.write_input_report(target.report_id, &samples, report) {
        Ok(len) => {
            trace!("[SFH-POLL] {} report {:02x?}", target.kind, &report[..len]);
            if let Err(err) = target
                .transport
                .deliver_input_report(target.kind, &report[..len])
            {
                warn!(
                    "[SFH-POLL] Delivering {} report failed: {}",
                    target.kind, err
                );
            }
        }
        Err(err) => warn!("[SFH-POLL] Encoding {} report failed: {}", target.kind, err),
    }
}
