//! Command-line argument parsing.
//!
//! This module handles parsing command-line arguments and determining
//! which CLI command to execute.

use std::path::PathBuf;
use thiserror::Error;

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Fetch codes (default)
    Run {
        /// Explicit config file, overriding discovery
        config: Option<PathBuf>,
        /// Fetch and deliver once, then exit
        once: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgsError {
    #[error("{0} requires a value")]
    MissingValue(&'static str),
    #[error("unknown argument: {0}")]
    Unknown(String),
}

pub const USAGE: &str = "\
Usage: codefetch [OPTIONS]

Options:
  -c, --config <PATH>  Config file (default: $CODEFETCH_CONFIG, ./config.json,
                       then the user config directory)
      --once           Fetch one code, copy it to the clipboard and exit
  -V, --version        Print version
  -h, --help           Print this help";

/// Parse command-line arguments and return the appropriate command.
///
/// `--version` and `--help` win over everything else on the line.
///
/// # Examples
///
/// ```
/// use codefetch::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["codefetch".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), Ok(CliCommand::Version));
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut config = None;
    let mut once = false;

    // Skip the program name
    let mut args = args.skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return Ok(CliCommand::Version),
            "--help" | "-h" => return Ok(CliCommand::Help),
            "--once" => once = true,
            "--config" | "-c" => {
                let value = args.next().ok_or(ArgsError::MissingValue("--config"))?;
                config = Some(PathBuf::from(value));
            }
            other => match other.strip_prefix("--config=") {
                Some(value) if !value.is_empty() => config = Some(PathBuf::from(value)),
                Some(_) => return Err(ArgsError::MissingValue("--config")),
                None => return Err(ArgsError::Unknown(other.to_string())),
            },
        }
    }

    Ok(CliCommand::Run { config, once })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliCommand, ArgsError> {
        let mut full = vec!["codefetch".to_string()];
        full.extend(args.iter().map(|a| a.to_string()));
        parse_args(full.into_iter())
    }

    #[test]
    fn test_parse_version_flag() {
        assert_eq!(parse(&["--version"]), Ok(CliCommand::Version));
        assert_eq!(parse(&["-V"]), Ok(CliCommand::Version));
    }

    #[test]
    fn test_parse_help_flag() {
        assert_eq!(parse(&["-h"]), Ok(CliCommand::Help));
        assert_eq!(parse(&["--once", "--help"]), Ok(CliCommand::Help));
    }

    #[test]
    fn test_parse_no_args() {
        assert_eq!(
            parse(&[]),
            Ok(CliCommand::Run {
                config: None,
                once: false
            })
        );
    }

    #[test]
    fn test_parse_config_and_once() {
        let expected = Ok(CliCommand::Run {
            config: Some(PathBuf::from("/tmp/codes.json")),
            once: true,
        });
        assert_eq!(parse(&["--config", "/tmp/codes.json", "--once"]), expected);
        assert_eq!(parse(&["--once", "-c", "/tmp/codes.json"]), expected);
        assert_eq!(parse(&["--config=/tmp/codes.json", "--once"]), expected);
    }

    #[test]
    fn test_parse_config_missing_value() {
        assert_eq!(parse(&["--config"]), Err(ArgsError::MissingValue("--config")));
        assert_eq!(parse(&["--config="]), Err(ArgsError::MissingValue("--config")));
    }

    #[test]
    fn test_parse_unknown_flag() {
        assert_eq!(
            parse(&["--unknown"]),
            Err(ArgsError::Unknown("--unknown".to_string()))
        );
    }
}
