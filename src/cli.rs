//! Command-line interface definitions using clap
//!
//! Running without a subcommand starts the HTTP server.

use clap::{Parser, Subcommand};

/// tourstats - visitor and page-view analytics for a tourism office
#[derive(Parser)]
#[command(name = "tourstats")]
#[command(version)]
#[command(about = "Visitor and page-view analytics for a tourism office", long_about = None)]
pub struct Cli {
    /// Configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Show database statistics
    Stats,

    /// Export all visitors to a CSV file
    Export {
        /// Output file path (default: visitors_export_<timestamp>.csv)
        file_path: Option<String>,
    },

    /// Generate sample pages, visitors and views
    Seed,

    /// Delete all visitors and pages and reset the view counter
    Reset {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Manage backups of the data file
    Backup {
        #[command(subcommand)]
        action: BackupCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Backup management commands
#[derive(Subcommand, Debug)]
pub enum BackupCommands {
    /// Copy the data file into the backup directory
    Create {
        /// Backup file name (default: backup_<timestamp>.db)
        #[arg(long)]
        name: Option<String>,
    },

    /// List backups, newest first
    List,

    /// Overwrite the data file with a backup
    Restore {
        /// Backup file name, as shown by `backup list`
        name: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Delete a backup
    Delete {
        /// Backup file name
        name: String,
    },

    /// Keep only the most recent backups
    Cleanup {
        /// Number of backups to keep (default: backup.keep_count)
        #[arg(long)]
        keep: Option<usize>,
    },
}

/// Configuration management commands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },

    /// Print the Argon2 hash of an admin token, for api.admin_token
    HashToken {
        /// Token to hash
        token: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_server() {
        let cli = Cli::try_parse_from(["tourstats"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["tourstats", "stats", "-c", "prod.toml"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some("prod.toml"));
        assert!(matches!(cli.command, Some(Commands::Stats)));
    }

    #[test]
    fn test_backup_subcommands() {
        let cli =
            Cli::try_parse_from(["tourstats", "backup", "restore", "backup_1.db", "--yes"]).unwrap();
        match cli.command {
            Some(Commands::Backup {
                action: BackupCommands::Restore { name, yes },
            }) => {
                assert_eq!(name, "backup_1.db");
                assert!(yes);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = Cli::try_parse_from(["tourstats", "backup", "cleanup", "--keep", "3"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Backup {
                action: BackupCommands::Cleanup { keep: Some(3) }
            })
        ));
    }

    #[test]
    fn test_reset_takes_no_positional_arguments() {
        let cli = Cli::try_parse_from(["tourstats", "reset"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Reset { yes: false })));
        assert!(Cli::try_parse_from(["tourstats", "reset", "extra"]).is_err());
    }
}
