//! # Logger
//!
//! Installs the global `tracing` subscriber for folio binaries.
//!
//! Output goes to the console (pretty, compact or JSON lines) and optionally to a daily rolling
//! file written through a non-blocking worker. `RUST_LOG` directives are honored on top of the
//! configured default level.
//!
//! ```rust
//! # use folio_logger::{LevelFilter, LogFormat, Logger};
//! let _guard = Logger::builder()
//!     .name("folio-docs")
//!     .format(LogFormat::Compact)
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use private::Sealed;
use std::fmt;
use std::fs;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

const DEFAULT_MAX_FILES: usize = 14;
const LOG_FILE_SUFFIX: &str = "log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Console rendering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" | "full" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(LoggerError::InvalidConfiguration {
                message: format!("unknown log format '{other}'").into(),
                context: Some("expected pretty, compact or json".into()),
            }),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pretty => "pretty",
            Self::Compact => "compact",
            Self::Json => "json",
        })
    }
}

/// Parses a level name (`trace`, `debug`, `info`, `warn`, `error`, `off`).
///
/// # Errors
/// Returns [`LoggerError::InvalidConfiguration`] for unknown names.
pub fn parse_level(value: &str) -> Result<LevelFilter, LoggerError> {
    LevelFilter::from_str(value.trim()).map_err(|e| LoggerError::InvalidConfiguration {
        message: format!("invalid log level '{value}': {e}").into(),
        context: None,
    })
}

#[derive(Debug)]
struct LoggerSettings {
    console: bool,
    stderr: bool,
    format: LogFormat,
    level: LevelFilter,
    directives: Option<String>,
    directory: Option<PathBuf>,
    rotation: Rotation,
    max_files: usize,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            console: true,
            stderr: false,
            format: LogFormat::default(),
            level: LevelFilter::INFO,
            directives: None,
            directory: None,
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
        }
    }
}

#[derive(Debug)]
pub struct Unnamed;
#[derive(Debug)]
pub struct Named(String);

mod private {
    pub trait Sealed {}
}
impl Sealed for Unnamed {}
impl Sealed for Named {}

/// Builder for the global subscriber. A name is required before [`LoggerBuilder::init`].
#[derive(Debug)]
#[must_use = "builders do nothing unless you call .init()"]
pub struct LoggerBuilder<N: Sealed = Unnamed> {
    settings: LoggerSettings,
    name: N,
    _state: PhantomData<N>,
}

impl LoggerBuilder<Unnamed> {
    /// Sets the application name, also used as the log file prefix.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<Named> {
        LoggerBuilder { settings: self.settings, name: Named(name.into()), _state: PhantomData }
    }
}

impl<N: Sealed> LoggerBuilder<N> {
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.settings.level = level;
        self
    }

    pub const fn format(mut self, format: LogFormat) -> Self {
        self.settings.format = format;
        self
    }

    pub const fn console(mut self, enabled: bool) -> Self {
        self.settings.console = enabled;
        self
    }

    /// Sends console output to stderr, keeping stdout free for command output.
    pub const fn stderr(mut self, enabled: bool) -> Self {
        self.settings.stderr = enabled;
        self
    }

    /// Extra filter directives such as `folio_customize=debug,hyper=warn`.
    pub fn directives(mut self, directives: impl Into<String>) -> Self {
        let directives = directives.into();
        self.settings.directives = (!directives.trim().is_empty()).then_some(directives);
        self
    }

    /// Also writes to rolling files in `directory`.
    pub fn directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.settings.directory = Some(directory.into());
        self
    }

    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.settings.rotation = rotation;
        self
    }

    pub const fn max_files(mut self, max_files: usize) -> Self {
        self.settings.max_files = max_files;
        self
    }
}

impl LoggerBuilder<Named> {
    /// Installs the subscriber.
    ///
    /// The returned [`LoggerGuard`] must stay alive until shutdown so buffered file output is
    /// flushed.
    ///
    /// # Errors
    /// * [`LoggerError::InvalidConfiguration`] for an empty name, zero `max_files`, bad filter
    ///   directives or when no output is enabled.
    /// * [`LoggerError::Subscriber`] when a global subscriber already exists.
    pub fn init(self) -> Result<LoggerGuard, LoggerError> {
        let Self { settings, name: Named(name), .. } = self;
        validate(&settings, &name)?;

        let filter = env_filter(&settings)?;
        let mut layers: Vec<BoxedLayer> = Vec::new();

        if settings.console {
            layers.push(if settings.stderr {
                console_layer(settings.format, std::io::stderr)
            } else {
                console_layer(settings.format, std::io::stdout)
            });
        }

        let worker = match &settings.directory {
            Some(directory) => {
                fs::create_dir_all(directory).map_err(|e| LoggerError::Internal {
                    message: e.to_string().into(),
                    context: Some(format!("creating {}", directory.display()).into()),
                })?;

                let appender = RollingFileAppender::builder()
                    .rotation(settings.rotation.clone())
                    .filename_prefix(&name)
                    .filename_suffix(LOG_FILE_SUFFIX)
                    .max_log_files(settings.max_files)
                    .build(directory)
                    .context("building rolling appender")?;
                let (writer, worker) = tracing_appender::non_blocking(appender);

                let file_layer = layer().with_writer(writer).with_ansi(false);
                layers.push(if settings.format == LogFormat::Json {
                    file_layer.json().boxed()
                } else {
                    file_layer.boxed()
                });
                Some(worker)
            },
            None => None,
        };

        if layers.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "no output enabled; turn on the console or set a directory".into(),
                context: None,
            });
        }

        tracing_subscriber::registry().with(layers).with(filter).try_init()?;
        tracing::debug!(logger = %name, format = %settings.format, "Logger initialized");

        Ok(LoggerGuard { worker })
    }
}

/// Keeps the non-blocking file writer alive.
#[must_use = "dropping the guard stops the background log writer"]
#[derive(Debug)]
pub struct LoggerGuard {
    worker: Option<WorkerGuard>,
}

impl LoggerGuard {
    /// `true` when file output is active.
    #[must_use]
    pub const fn writes_files(&self) -> bool {
        self.worker.is_some()
    }
}

impl Drop for LoggerGuard {
    fn drop(&mut self) {
        if self.worker.is_some() {
            tracing::info!("Flushing log files");
        }
    }
}

/// Entry point of the builder API.
#[derive(Debug)]
pub struct Logger;

impl Logger {
    pub fn builder() -> LoggerBuilder<Unnamed> {
        LoggerBuilder { settings: LoggerSettings::default(), name: Unnamed, _state: PhantomData }
    }
}

fn console_layer<W>(format: LogFormat, writer: W) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Pretty => layer().with_writer(writer).with_target(true).boxed(),
        LogFormat::Compact => layer().with_writer(writer).compact().boxed(),
        LogFormat::Json => layer().with_writer(writer).json().with_current_span(true).boxed(),
    }
}

fn validate(settings: &LoggerSettings, name: &str) -> Result<(), LoggerError> {
    if name.trim().is_empty() {
        return Err(LoggerError::InvalidConfiguration {
            message: "logger name cannot be empty".into(),
            context: None,
        });
    }
    if settings.max_files == 0 {
        return Err(LoggerError::InvalidConfiguration {
            message: "max_files must be greater than zero".into(),
            context: None,
        });
    }
    Ok(())
}

fn env_filter(settings: &LoggerSettings) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(settings.level.into());
    match &settings.directives {
        Some(directives) => builder.parse(directives).map_err(|e| LoggerError::InvalidConfiguration {
            message: format!("invalid filter '{directives}': {e}").into(),
            context: None,
        }),
        None => Ok(builder.from_env_lossy()),
    }
}
