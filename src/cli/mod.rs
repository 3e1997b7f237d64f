//! Command-line interface.
//!
//! The dispatcher should be called early in main() to handle informational
//! flags before any configuration is loaded:
//!
//! ```ignore
//! use codefetch::cli::{parse_args, run_cli_command, CliCommand};
//!
//! let command = parse_args(std::env::args())?;
//! if run_cli_command(&command) {
//!     return Ok(());
//! }
//! // CliCommand::Run: load config and start fetching
//! ```

pub mod args;
pub mod version;

pub use args::{parse_args, ArgsError, CliCommand, USAGE};
pub use version::{handle_version_command, version_line, VERSION};

/// Handle informational commands.
///
/// Returns `true` when the command was fully handled (help printed), `false`
/// for `Run`. The `Version` command never returns as it calls
/// `std::process::exit(0)`.
pub fn run_cli_command(command: &CliCommand) -> bool {
    match command {
        CliCommand::Version => handle_version_command(),
        CliCommand::Help => {
            println!("{}\n\n{}", version_line(), USAGE);
            true
        }
        CliCommand::Run { .. } => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_is_not_handled() {
        let command = CliCommand::Run {
            config: None,
            once: false,
        };
        assert!(!run_cli_command(&command));
    }

    #[test]
    fn test_help_is_handled() {
        assert!(run_cli_command(&CliCommand::Help));
    }
}
