//! Backup commands

use colored::Colorize;

use crate::backup::BackupManager;
use crate::interfaces::cli::CliError;

use super::helpers::{confirm, format_size};

pub fn backup_create(manager: &BackupManager, name: Option<&str>) -> Result<(), CliError> {
    match manager.create_backup(name) {
        Some(path) => {
            println!(
                "{} Backup created: {}",
                "✓".bold().green(),
                path.display().to_string().cyan()
            );
            Ok(())
        }
        None => Err(CliError::CommandError(format!(
            "Failed to back up {}",
            manager.db_path().display()
        ))),
    }
}

pub fn backup_list(manager: &BackupManager) -> Result<(), CliError> {
    let backups = manager.list_backups();
    if backups.is_empty() {
        println!(
            "{} No backups in {}",
            "ℹ".bold().blue(),
            manager.backup_dir().display()
        );
        return Ok(());
    }

    println!("{}", "Backups (newest first):".bold().green());
    println!();
    for backup in &backups {
        println!(
            "  {:<40} {:>10}  {}",
            backup.name.cyan(),
            format_size(backup.size),
            backup
                .modified
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string()
                .dimmed()
        );
    }
    println!();
    println!(
        "{} Total {} backups",
        "ℹ".bold().blue(),
        backups.len().to_string().green()
    );
    Ok(())
}

/// 恢复前会先自动备份当前数据文件
pub fn backup_restore(manager: &BackupManager, name: &str, yes: bool) -> Result<(), CliError> {
    let path = manager
        .resolve(name)
        .ok_or_else(|| CliError::CommandError(format!("Backup not found: {}", name)))?;

    if !yes
        && !confirm(&format!(
            "Overwrite {} with {}?",
            manager.db_path().display(),
            name
        ))?
    {
        println!("{}", "Aborted.".red());
        return Ok(());
    }

    if manager.db_path().exists() && manager.auto_backup().is_none() {
        println!("{} Auto backup failed, continuing", "!".bold().yellow());
    }

    if manager.restore_backup(&path) {
        println!("{} Restored from {}", "✓".bold().green(), name.cyan());
        Ok(())
    } else {
        Err(CliError::CommandError(format!(
            "Failed to restore backup: {}",
            name
        )))
    }
}

pub fn backup_delete(manager: &BackupManager, name: &str) -> Result<(), CliError> {
    let path = manager
        .resolve(name)
        .ok_or_else(|| CliError::CommandError(format!("Backup not found: {}", name)))?;

    if manager.delete_backup(&path) {
        println!("{} Deleted backup: {}", "✓".bold().green(), name.cyan());
        Ok(())
    } else {
        Err(CliError::CommandError(format!(
            "Failed to delete backup: {}",
            name
        )))
    }
}

pub fn backup_cleanup(manager: &BackupManager, keep: usize) -> Result<(), CliError> {
    let removed = manager.cleanup_old_backups(keep);
    println!(
        "{} Removed {} old backups, keeping the {} most recent",
        "✓".bold().green(),
        removed.to_string().green(),
        keep
    );
    Ok(())
}
