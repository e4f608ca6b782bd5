use std::{
    convert::Infallible,
    fmt::{self, Display, Formatter},
    fs::OpenOptions,
    io,
    path::PathBuf,
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt,
    EnvFilter, Layer,
};

// SAFETY: every sink is switched on and off independently.
#[allow(clippy::struct_excessive_bools)]
#[serde_as]
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct LogConfig {
    /// Append logs to this file as well.
    #[serde(default)]
    pub file_path: Option<PathBuf>,

    #[serde(default)]
    pub emit_journald: bool,

    #[serde(default = "LogConfig::default_emit_stdout")]
    pub emit_stdout: bool,

    #[serde(default)]
    pub emit_stderr: bool,

    /// `EnvFilter` directives.
    #[serde(default = "LogConfig::default_log_filters")]
    pub log_filters: String,

    #[serde(default)]
    #[serde_as(as = "DisplayFromStr")]
    pub formatter: LogFormatter,

    /// Log span close events with their busy and idle time.
    #[serde(default)]
    pub show_fn_latency: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file_path: None,
            emit_journald: false,
            emit_stdout: Self::default_emit_stdout(),
            emit_stderr: false,
            log_filters: Self::default_log_filters(),
            formatter: LogFormatter::default(),
            show_fn_latency: false,
        }
    }
}

impl LogConfig {
    #[inline]
    #[must_use]
    pub fn default_log_filters() -> String { "info,lettre=warn".to_string() }

    #[inline]
    #[must_use]
    pub const fn default_emit_stdout() -> bool { true }

    /// Installs the global `tracing` subscriber.
    ///
    /// # Panics
    ///
    /// Panics if a global subscriber was already installed.
    pub fn init(&self) {
        let formatter = self.formatter;
        let span_events = if self.show_fn_latency { FmtSpan::CLOSE } else { FmtSpan::NONE };

        tracing_subscriber::registry()
            .with(EnvFilter::new(self.log_filters.as_str()))
            .with(
                self.emit_journald
                    .then(|| LogSink::Journald.layer(formatter, span_events.clone()))
                    .flatten(),
            )
            .with(
                self.file_path
                    .clone()
                    .and_then(|path| LogSink::File(path).layer(formatter, span_events.clone())),
            )
            .with(
                self.emit_stdout
                    .then(|| LogSink::Stdout.layer(formatter, span_events.clone()))
                    .flatten(),
            )
            .with(self.emit_stderr.then(|| LogSink::Stderr.layer(formatter, span_events)).flatten())
            .init();
    }
}

#[derive(Clone, Debug)]
enum LogSink {
    Stdout,
    Stderr,
    Journald,
    File(PathBuf),
}

impl LogSink {
    fn layer<S>(
        self,
        formatter: LogFormatter,
        span_events: FmtSpan,
    ) -> Option<Box<dyn Layer<S> + Send + Sync + 'static>>
    where
        S: tracing::Subscriber,
        for<'a> S: LookupSpan<'a>,
    {
        let fmt = tracing_subscriber::fmt::layer()
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_target(true)
            .with_span_events(span_events);

        let layer = match (self, formatter) {
            (Self::Journald, _) => tracing_journald::layer().ok()?.boxed(),
            (Self::Stdout, LogFormatter::Pretty) => fmt.with_writer(io::stdout).pretty().boxed(),
            (Self::Stdout, LogFormatter::Json) => {
                fmt.with_writer(io::stdout).json().flatten_event(true).boxed()
            }
            (Self::Stderr, LogFormatter::Pretty) => fmt.with_writer(io::stderr).pretty().boxed(),
            (Self::Stderr, LogFormatter::Json) => {
                fmt.with_writer(io::stderr).json().flatten_event(true).boxed()
            }
            (Self::File(path), formatter) => {
                let file = OpenOptions::new().create(true).append(true).open(path).ok()?;
                match formatter {
                    LogFormatter::Pretty => fmt.with_writer(file).pretty().with_ansi(false).boxed(),
                    LogFormatter::Json => fmt.with_writer(file).json().flatten_event(true).boxed(),
                }
            }
        };

        Some(layer)
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum LogFormatter {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormatter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("json") {
            Ok(Self::Json)
        } else {
            Ok(Self::Pretty)
        }
    }
}

impl Display for LogFormatter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => f.write_str("pretty"),
            Self::Json => f.write_str("json"),
        }
    }
}
