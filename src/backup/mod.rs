//! File-level backups of the SQLite data file
//!
//! Snapshots are byte copies of the data file stored in a backup directory.
//! Every fallible filesystem call is handled here: failures are logged and
//! reported as `None` / `false`, never as errors.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::StaticConfig;
use crate::storage::backend::sqlite_file_path;

/// 数据文件没有扩展名时使用的备份扩展名
const DEFAULT_EXTENSION: &str = "db";

/// 单个备份文件的信息
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BackupInfo {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub modified: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct BackupManager {
    db_path: PathBuf,
    backup_dir: PathBuf,
}

impl BackupManager {
    pub fn new(db_path: impl Into<PathBuf>, backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            backup_dir: backup_dir.into(),
        }
    }

    /// 从配置构建：数据文件来自 `database.database_url`，目录来自 `backup.dir`
    pub fn from_config(config: &StaticConfig) -> Self {
        let db_path = sqlite_file_path(&config.database.database_url)
            .unwrap_or_else(|| PathBuf::from(&config.database.database_url));
        Self::new(db_path, &config.backup.dir)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    fn extension(&self) -> &str {
        self.db_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or(DEFAULT_EXTENSION)
    }

    fn timestamped_name(&self, prefix: &str) -> String {
        format!(
            "{}_{}.{}",
            prefix,
            Local::now().format("%Y%m%d_%H%M%S_%3f"),
            self.extension()
        )
    }

    /// 复制数据文件到备份目录
    ///
    /// Without a name the file is called `backup_<timestamp>.<ext>`.
    /// Returns the backup path, or `None` when the copy failed.
    pub fn create_backup(&self, name: Option<&str>) -> Option<PathBuf> {
        let name = match name {
            Some(name) => {
                if !is_plain_file_name(name) {
                    error!("Invalid backup name: '{}'", name);
                    return None;
                }
                name.to_string()
            }
            None => self.timestamped_name("backup"),
        };

        if let Err(e) = fs::create_dir_all(&self.backup_dir) {
            error!(
                "Failed to create backup directory {}: {}",
                self.backup_dir.display(),
                e
            );
            return None;
        }

        let target = self.backup_dir.join(&name);
        match fs::copy(&self.db_path, &target) {
            Ok(bytes) => {
                info!("Backup created: {} ({} bytes)", target.display(), bytes);
                Some(target)
            }
            Err(e) => {
                error!(
                    "Failed to back up {} to {}: {}",
                    self.db_path.display(),
                    target.display(),
                    e
                );
                None
            }
        }
    }

    /// 破坏性操作前的自动备份（`auto_backup_<timestamp>.<ext>`）
    pub fn auto_backup(&self) -> Option<PathBuf> {
        let name = self.timestamped_name("auto_backup");
        self.create_backup(Some(&name))
    }

    /// 列出备份目录中与数据文件同扩展名的文件，最新的在前
    pub fn list_backups(&self) -> Vec<BackupInfo> {
        let entries = match fs::read_dir(&self.backup_dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(
                    "Backup directory {} not readable: {}",
                    self.backup_dir.display(),
                    e
                );
                return Vec::new();
            }
        };

        let extension = self.extension();
        let mut backups: Vec<BackupInfo> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) != Some(extension) {
                    return None;
                }
                let metadata = entry.metadata().ok()?;
                if !metadata.is_file() {
                    return None;
                }
                let modified = metadata.modified().ok()?;
                Some(BackupInfo {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    path: fs::canonicalize(&path).unwrap_or(path),
                    size: metadata.len(),
                    modified: DateTime::<Utc>::from(modified),
                })
            })
            .collect();

        backups.sort_by(|a, b| {
            b.modified
                .cmp(&a.modified)
                .then_with(|| b.name.cmp(&a.name))
        });
        backups
    }

    /// 用备份覆盖数据文件
    ///
    /// Not transactional: a copy that fails midway can leave the data file
    /// damaged. Open storage handles must be reconnected afterwards.
    pub fn restore_backup(&self, backup_path: &Path) -> bool {
        if !backup_path.is_file() {
            error!("Backup not found: {}", backup_path.display());
            return false;
        }

        match fs::copy(backup_path, &self.db_path) {
            Ok(_) => {
                self.remove_stale_journal();
                warn!(
                    "Data file {} restored from {}",
                    self.db_path.display(),
                    backup_path.display()
                );
                true
            }
            Err(e) => {
                error!(
                    "Failed to restore {} from {}: {}",
                    self.db_path.display(),
                    backup_path.display(),
                    e
                );
                false
            }
        }
    }

    /// 旧的回滚日志会被 SQLite 当作热日志回放到新文件上
    fn remove_stale_journal(&self) {
        let mut journal = self.db_path.clone().into_os_string();
        journal.push("-journal");
        let journal = PathBuf::from(journal);
        if journal.exists()
            && let Err(e) = fs::remove_file(&journal)
        {
            warn!("Failed to remove journal {}: {}", journal.display(), e);
        }
    }

    pub fn delete_backup(&self, backup_path: &Path) -> bool {
        match fs::remove_file(backup_path) {
            Ok(()) => {
                info!("Backup deleted: {}", backup_path.display());
                true
            }
            Err(e) => {
                error!("Failed to delete backup {}: {}", backup_path.display(), e);
                false
            }
        }
    }

    /// 只保留最新的 `keep_count` 个备份，返回删除数量
    pub fn cleanup_old_backups(&self, keep_count: usize) -> usize {
        let backups = self.list_backups();
        if backups.len() <= keep_count {
            return 0;
        }

        let removed = backups[keep_count..]
            .iter()
            .filter(|b| self.delete_backup(&b.path))
            .count();

        info!(
            "Backup cleanup: kept {}, removed {}",
            keep_count.min(backups.len()),
            removed
        );
        removed
    }

    /// 将备份文件名解析为备份目录中的已有文件
    ///
    /// Only plain file names are accepted, so a name can never point
    /// outside the backup directory.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        if !is_plain_file_name(name) {
            return None;
        }
        let path = self.backup_dir.join(name);
        path.is_file().then_some(path)
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && Path::new(name).file_name().and_then(|n| n.to_str()) == Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_file_name() {
        assert!(is_plain_file_name("backup_20250101.db"));
        assert!(is_plain_file_name("before-import.db"));
        assert!(!is_plain_file_name(""));
        assert!(!is_plain_file_name(".."));
        assert!(!is_plain_file_name("../tourism_data.db"));
        assert!(!is_plain_file_name("nested/backup.db"));
        assert!(!is_plain_file_name("..\\evil.db"));
    }

    #[test]
    fn test_timestamped_name_uses_data_file_extension() {
        let manager = BackupManager::new("data/tourism.sqlite", "backups");
        let name = manager.timestamped_name("backup");
        assert!(name.starts_with("backup_"));
        assert!(name.ends_with(".sqlite"));

        let bare = BackupManager::new("tourism", "backups");
        assert!(bare.timestamped_name("auto_backup").ends_with(".db"));
    }

    #[test]
    fn test_list_backups_missing_directory() {
        let manager = BackupManager::new("nope.db", "/definitely/not/here");
        assert!(manager.list_backups().is_empty());
    }
}
