//! Mode routing
//!
//! Unified entry points for the execution modes:
//! - Server mode (HTTP server)
//! - CLI mode (one-shot maintenance commands)

#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "server")]
pub use server::run_server;

#[cfg(feature = "cli")]
pub use cli::run_cli;

use crate::cli::{Cli, Commands};

/// Mode detection result
#[derive(Debug, PartialEq)]
pub enum Mode {
    #[cfg(feature = "server")]
    Server,
    #[cfg(feature = "cli")]
    Cli,
    Unknown,
}

/// Detect which mode to run based on the parsed command line
///
/// No subcommand or `serve` starts the server, any other subcommand runs
/// in CLI mode.
pub fn detect_mode(cli: &Cli) -> Mode {
    match cli.command {
        None | Some(Commands::Serve) => {
            #[cfg(feature = "server")]
            return Mode::Server;
            #[cfg(not(feature = "server"))]
            return Mode::Unknown;
        }
        Some(_) => {
            #[cfg(feature = "cli")]
            return Mode::Cli;
            #[cfg(not(feature = "cli"))]
            return Mode::Unknown;
        }
    }
}

#[cfg(all(test, feature = "server", feature = "cli"))]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("valid arguments")
    }

    #[test]
    fn test_no_subcommand_runs_server() {
        assert_eq!(detect_mode(&parse(&["tourstats"])), Mode::Server);
        assert_eq!(detect_mode(&parse(&["tourstats", "serve"])), Mode::Server);
    }

    #[test]
    fn test_subcommand_runs_cli() {
        assert_eq!(detect_mode(&parse(&["tourstats", "stats"])), Mode::Cli);
        assert_eq!(
            detect_mode(&parse(&["tourstats", "backup", "list"])),
            Mode::Cli
        );
    }
}
