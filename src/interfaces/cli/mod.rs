//! CLI interface module
//!
//! Maintenance commands that work directly on the data file and the backup
//! directory.

pub mod commands;

use crate::backup::BackupManager;
use crate::cli::{BackupCommands, Commands, ConfigCommands};
use crate::storage::StorageFactory;
use commands::{
    backup_cleanup, backup_create, backup_delete, backup_list, backup_restore, config_generate,
    config_hash_token, export_visitors, reset_data, seed_data, show_stats,
};
use std::fmt;

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    ParseError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::ParseError(msg) => format!("Parse error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::ParseError(msg) => {
                format!("{} {}", "Parse error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<crate::errors::AppError> for CliError {
    fn from(err: crate::errors::AppError) -> Self {
        match err {
            crate::errors::AppError::Validation(msg) => CliError::ParseError(msg),
            other => CliError::StorageError(other.to_string()),
        }
    }
}

/// Run a CLI command from clap-parsed input
pub async fn run_cli_command(cmd: Commands) -> Result<(), CliError> {
    let config = crate::config::get_config();

    match cmd {
        Commands::Serve => Err(CliError::CommandError(
            "serve is handled by the server runtime".to_string(),
        )),

        // 不需要数据库连接的命令
        Commands::Config { action } => match action {
            ConfigCommands::Generate { output_path, force } => {
                config_generate(output_path, force).await
            }
            ConfigCommands::HashToken { token } => config_hash_token(&token),
        },

        Commands::Backup { action } => {
            let manager = BackupManager::from_config(&config);
            match action {
                BackupCommands::Create { name } => backup_create(&manager, name.as_deref()),
                BackupCommands::List => backup_list(&manager),
                BackupCommands::Restore { name, yes } => backup_restore(&manager, &name, yes),
                BackupCommands::Delete { name } => backup_delete(&manager, &name),
                BackupCommands::Cleanup { keep } => {
                    backup_cleanup(&manager, keep.unwrap_or(config.backup.keep_count))
                }
            }
        }

        // 需要数据库连接的命令
        Commands::Stats => run_storage_command(StorageCommand::Stats).await,
        Commands::Export { file_path } => {
            run_storage_command(StorageCommand::Export { file_path }).await
        }
        Commands::Seed => run_storage_command(StorageCommand::Seed).await,
        Commands::Reset { yes } => run_storage_command(StorageCommand::Reset { yes }).await,
    }
}

/// 需要打开数据文件的命令
enum StorageCommand {
    Stats,
    Export { file_path: Option<String> },
    Seed,
    Reset { yes: bool },
}

async fn run_storage_command(cmd: StorageCommand) -> Result<(), CliError> {
    let storage = StorageFactory::create()
        .await
        .map_err(|e| CliError::StorageError(e.to_string()))?;

    let result = match cmd {
        StorageCommand::Stats => show_stats(&storage).await,
        StorageCommand::Export { file_path } => export_visitors(&storage, file_path).await,
        StorageCommand::Seed => seed_data(&storage).await,
        StorageCommand::Reset { yes } => {
            let manager = BackupManager::from_config(&crate::config::get_config());
            reset_data(&storage, &manager, yes).await
        }
    };

    if let Ok(storage) = std::sync::Arc::try_unwrap(storage)
        && let Err(e) = storage.close().await
    {
        tracing::warn!("Failed to close storage: {}", e);
    }
    result
}
