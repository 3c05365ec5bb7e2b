//! Console and JSONL logging for lookback
//!
//! Installs a global `tracing` subscriber built from a [`LogConfig`]. Console
//! output is JSONL by default; [`LogConfig::development`] switches to pretty,
//! human-readable output. File output goes through `tracing-appender` with
//! optional daily or hourly rotation. `RUST_LOG` always overrides the
//! configured levels.
//!
//! # Quick Start
//!
//! ```ignore
//! use lookback_logging::{LogConfig, TimelineSubscriberBuilder};
//!
//! // JSONL to console
//! TimelineSubscriberBuilder::new().init()?;
//!
//! // Pretty output while developing
//! TimelineSubscriberBuilder::new()
//!     .with_config(LogConfig::development())
//!     .init()?;
//! ```

pub mod config;

pub use config::{ConsoleConfig, FileConfig, JsonlConfig, LogConfig, RotationStrategy};

use std::fs::{self, File};

use thiserror::Error;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Errors raised while installing the subscriber
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The log directory or file could not be created
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A global subscriber was already installed
    #[error("Failed to install subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Builder for configuring and initializing the logging subscriber
pub struct TimelineSubscriberBuilder {
    config: LogConfig,
}

impl TimelineSubscriberBuilder {
    /// Create a new subscriber builder with default configuration
    ///
    /// Default: JSONL output to console
    pub fn new() -> Self {
        Self {
            config: LogConfig::default(),
        }
    }

    /// Use a specific configuration
    pub fn with_config(mut self, config: LogConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the default log level
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.config.default_level = level.into();
        self
    }

    /// Enable or disable console output
    pub fn with_console(mut self, enabled: bool) -> Self {
        self.config.console.enabled = enabled;
        self
    }

    /// Configure file output
    pub fn with_file_output(mut self, config: FileConfig) -> Self {
        self.config.file = Some(config);
        self
    }

    /// Install the subscriber globally
    ///
    /// The returned guard flushes file output when dropped and must be kept
    /// alive for the life of the program.
    ///
    /// # Errors
    ///
    /// Fails if the log file cannot be created or a global subscriber is
    /// already set.
    pub fn init(self) -> Result<Option<WorkerGuard>, LoggingError> {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.config.filter_directives()));

        let mut layers: Vec<BoxedLayer> = Vec::new();
        let mut guard = None;

        if self.config.console.enabled {
            layers.push(self.console_layer());
        }

        if let Some(file_config) = &self.config.file {
            let (writer, file_guard) = file_writer(file_config)?;
            guard = Some(file_guard);
            layers.push(jsonl_layer(&self.config.jsonl, writer));
        }

        tracing_subscriber::registry()
            .with(layers)
            .with(env_filter)
            .try_init()?;

        Ok(guard)
    }

    fn console_layer(&self) -> BoxedLayer {
        if self.config.console.pretty {
            tracing_subscriber::fmt::layer()
                .with_ansi(self.config.console.ansi)
                .with_target(true)
                .boxed()
        } else {
            jsonl_layer(&self.config.jsonl, std::io::stdout)
        }
    }
}

impl Default for TimelineSubscriberBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a JSONL formatting layer writing to `writer`
fn jsonl_layer<W>(config: &JsonlConfig, writer: W) -> BoxedLayer
where
    W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(config.include_spans)
        .flatten_event(config.flatten_events)
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_thread_ids(config.include_thread_info)
        .with_thread_names(config.include_thread_info)
        .with_writer(writer)
        .boxed()
}

/// Open the file writer; `Never` truncates a single file, others roll over
fn file_writer(config: &FileConfig) -> Result<(NonBlocking, WorkerGuard), LoggingError> {
    fs::create_dir_all(&config.directory)?;
    let writer = match config.rotation {
        RotationStrategy::Never => {
            let path = config.directory.join(format!("{}.log", config.prefix));
            tracing_appender::non_blocking(File::create(path)?)
        }
        RotationStrategy::Daily => tracing_appender::non_blocking(RollingFileAppender::new(
            Rotation::DAILY,
            &config.directory,
            &config.prefix,
        )),
        RotationStrategy::Hourly => tracing_appender::non_blocking(RollingFileAppender::new(
            Rotation::HOURLY,
            &config.directory,
            &config.prefix,
        )),
    };
    Ok(writer)
}

/// Initialize logging with default settings (JSONL to console)
pub fn init_default() -> Result<(), LoggingError> {
    TimelineSubscriberBuilder::new().init().map(|_| ())
}

/// Initialize logging for development (verbose, pretty console output)
pub fn init_development() -> Result<(), LoggingError> {
    TimelineSubscriberBuilder::new()
        .with_config(LogConfig::development())
        .init()
        .map(|_| ())
}

/// Initialize logging for testing (minimal output)
///
/// Safe to call from every test; only the first call installs a subscriber.
pub fn init_testing() {
    let _ = TimelineSubscriberBuilder::new()
        .with_config(LogConfig::testing())
        .init();
}
