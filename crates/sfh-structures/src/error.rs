// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use crate::SensorKind;

/// Common error type for Sensor Fusion Hub operations.
///
/// Every failure is scoped: allocation and lifecycle errors affect a single sensor session,
/// codec errors a single report, and the protocol/firmware variants are recoverable
/// conditions that callers log and fall back from.
///
/// # Examples
/// ```
/// use sfh_structures::SfhError;
///
/// fn check_room(required: usize, available: usize) -> Result<(), SfhError> {
///     if available < required {
///         return Err(SfhError::InsufficientBuffer { required, available });
///     }
///     Ok(())
/// }
///
/// assert!(check_room(16, 8).is_err());
/// assert!(check_room(16, 16).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SfhError {
    /// Device memory or a worker could not be obtained for one session
    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    /// Unknown sensor kind, report type or report id
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Output slice too small for the requested report
    #[error("Insufficient buffer: {required} bytes required, {available} available")]
    InsufficientBuffer { required: usize, available: usize },

    /// Version field of the status register names no known command encoding
    #[error("Unsupported protocol version {0}")]
    ProtocolVersionUnsupported(u8),

    /// Capability register reads zero
    #[error("Firmware reported an empty sensor capability mask")]
    FirmwareMaskMissing,

    #[error("A session for {0} is already open")]
    SessionAlreadyOpen(SensorKind),

    #[error("No open session for {0}")]
    SensorNotOpen(SensorKind),

    /// Report descriptor rejected by the schema parser
    #[error("Malformed report descriptor: {0}")]
    MalformedDescriptor(String),
}

pub type SfhResult<T> = Result<T, SfhError>;
