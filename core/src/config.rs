//! Builder configuration: how the trace looks and where it goes.
//!
//! Defaults print the verbose trace to stdout. `BuilderOptions::from_env`
//! lets a test run switch styles without touching step definitions:
//!
//! - `FIXTURE_TRACE` = `verbose` | `compact` | `off`
//! - `FIXTURE_TRACE_SINK` = `stdout` | `log`

use std::fmt;
use std::str::FromStr;

pub const TRACE_ENV: &str = "FIXTURE_TRACE";
pub const TRACE_SINK_ENV: &str = "FIXTURE_TRACE_SINK";

/// Layout of the diagnostic trace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TraceStyle {
    /// One item per line.
    #[default]
    Verbose,
    /// One line per field, collections dumped inline.
    Compact,
    Off,
}

/// Destination of the diagnostic trace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TraceSink {
    #[default]
    Stdout,
    /// An `info!` event with target `fixture_core::trace`.
    Log,
}

/// Returned when an option value is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidOption {
    pub option: &'static str,
    pub value: String,
}

impl fmt::Display for InvalidOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {} value `{}`", self.option, self.value)
    }
}

impl std::error::Error for InvalidOption {}

impl FromStr for TraceStyle {
    type Err = InvalidOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "verbose" => Ok(TraceStyle::Verbose),
            "compact" => Ok(TraceStyle::Compact),
            "off" | "none" => Ok(TraceStyle::Off),
            _ => Err(InvalidOption {
                option: "trace style",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for TraceSink {
    type Err = InvalidOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdout" => Ok(TraceSink::Stdout),
            "log" => Ok(TraceSink::Log),
            _ => Err(InvalidOption {
                option: "trace sink",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuilderOptions {
    pub style: TraceStyle,
    pub sink: TraceSink,
}

impl BuilderOptions {
    pub fn silent() -> Self {
        Self {
            style: TraceStyle::Off,
            sink: TraceSink::default(),
        }
    }

    /// Read options from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read options through `lookup`. Unset or unrecognized values keep the
    /// default; unrecognized ones are logged.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut options = Self::default();
        if let Some(raw) = lookup(TRACE_ENV) {
            match raw.parse() {
                Ok(style) => options.style = style,
                Err(err) => tracing::warn!(%err, "ignoring {TRACE_ENV}"),
            }
        }
        if let Some(raw) = lookup(TRACE_SINK_ENV) {
            match raw.parse() {
                Ok(sink) => options.sink = sink,
                Err(err) => tracing::warn!(%err, "ignoring {TRACE_SINK_ENV}"),
            }
        }
        options
    }
}
