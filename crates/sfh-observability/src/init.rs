// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Logging initialization
//!
//! Installs a `tracing` registry with a console layer and, with the `file-logging` feature, a
//! log file inside a timestamped run folder:
//! ```text
//! ./logs/
//!   └── run_20250101_120000/
//!       └── sfh.log
//! ```

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;
use crate::config::LoggingConfig;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Keeps background log writers alive; logs are flushed when it is dropped.
#[derive(Default)]
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
    log_dir: Option<PathBuf>,
    installed: bool,
}

impl LoggingGuard {
    /// Run folder holding the log file, when file logging is active.
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }

    /// False when another subscriber was already installed.
    pub fn installed(&self) -> bool {
        self.installed
    }
}

/// `RUST_LOG` when set, otherwise the configured level raised by the debug flags.
pub fn build_env_filter(config: &LoggingConfig, debug_flags: &CrateDebugFlags) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::new(debug_flags.to_filter_string(&config.level.to_ascii_lowercase()))
}

#[cfg(feature = "json")]
fn console_layer(config: &LoggingConfig, filter: EnvFilter) -> BoxedLayer {
    if config.json {
        return tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_filter(filter)
            .boxed();
    }
    tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_filter(filter)
        .boxed()
}

#[cfg(not(feature = "json"))]
fn console_layer(config: &LoggingConfig, filter: EnvFilter) -> BoxedLayer {
    if config.json {
        eprintln!("Warning: JSON logging requested but the `json` feature is disabled; using text");
    }
    tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_filter(filter)
        .boxed()
}

#[cfg(feature = "file-logging")]
fn file_layer(
    base_log_dir: &Path,
    filter: EnvFilter,
) -> Result<(
    BoxedLayer,
    tracing_appender::non_blocking::WorkerGuard,
    PathBuf,
)> {
    use anyhow::Context;

    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let run_folder = base_log_dir.join(format!("run_{}", timestamp));
    std::fs::create_dir_all(&run_folder)
        .with_context(|| format!("Failed to create log directory: {}", run_folder.display()))?;

    let appender = tracing_appender::rolling::never(&run_folder, "sfh.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(filter)
        .boxed();
    Ok((layer, guard, run_folder))
}

/// Install the global subscriber.
///
/// Calling this again, or after another subscriber was installed, is not an error: the
/// returned guard reports `installed() == false` and nothing changes.
pub fn init_logging(config: &LoggingConfig, debug_flags: &CrateDebugFlags) -> Result<LoggingGuard> {
    let mut guard = LoggingGuard::default();
    let mut layers: Vec<BoxedLayer> = vec![console_layer(
        config,
        build_env_filter(config, debug_flags),
    )];

    #[cfg(feature = "file-logging")]
    if let Some(base_log_dir) = &config.log_dir {
        // EnvFilter is not Clone; each layer gets its own.
        let (layer, file_guard, run_folder) =
            file_layer(base_log_dir, build_env_filter(config, debug_flags))?;
        layers.push(layer);
        guard._file_guard = Some(file_guard);
        guard.log_dir = Some(run_folder);
    }
    #[cfg(not(feature = "file-logging"))]
    if config.log_dir.is_some() {
        eprintln!("Warning: log_dir is set but the `file-logging` feature is disabled");
    }

    guard.installed = Registry::default().with(layers).try_init().is_ok();
    if guard.installed {
        let unknown = debug_flags.unknown_crates();
        if !unknown.is_empty() {
            tracing::warn!("[SFH-LOG] debug flags name unknown crates: {:?}", unknown);
        }
        tracing::debug!(
            "[SFH-LOG] logging initialized (level={}, format={:?})",
            config.level,
            config.format()
        );
    }
    Ok(guard)
}

/// Initialize logging from defaults plus the process debug flags.
pub fn init_logging_default() -> Result<LoggingGuard> {
    init_logging(&LoggingConfig::default(), &crate::cli::parse_debug_flags())
}
