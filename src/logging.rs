//! Tracing subscriber setup.
//!
//! `RUST_LOG` filters (default `codefetch=info`). `LOG_FORMAT=json` switches
//! from human-readable lines to one JSON object per event. Output goes to
//! stdout and, when configured, is appended to a log file as well.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, EnvFilter};

pub const DEFAULT_FILTER: &str = "codefetch=info";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to open log file {path}: {source}")]
    OpenLogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to install tracing subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Output format selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

fn make_writer(log_file: Option<&Path>) -> Result<BoxMakeWriter, LoggingError> {
    let Some(path) = log_file else {
        return Ok(BoxMakeWriter::new(std::io::stdout));
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::OpenLogFile {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(BoxMakeWriter::new(std::io::stdout.and(Mutex::new(file))))
}

/// Install the global subscriber. Call once, before anything logs.
pub fn init_tracing(log_file: Option<&Path>) -> Result<(), LoggingError> {
    let format = LogFormat::from_env_value(std::env::var("LOG_FORMAT").ok().as_deref());
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let writer = make_writer(log_file)?;

    match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(log_file.is_none())
                    .with_writer(writer),
            )
            .try_init()?,
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .flatten_event(true)
                    .with_writer(writer),
            )
            .try_init()?,
    }

    Ok(())
}
