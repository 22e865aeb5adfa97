//! Backup subsystem tests
//!
//! Each test works on its own data file and backup directory under a TempDir.

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tempfile::TempDir;
use tourstats::api::AppContext;
use tourstats::backup::BackupManager;
use tourstats::storage::{
    AgeBracket, AnalyticsStorage, InterestType, PageCategory, StayDuration, VisitorProfile,
    VisitorType,
};

struct Fixture {
    _dir: TempDir,
    db_url: String,
    manager: BackupManager,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("tourism.db");
    let backup_dir = dir.path().join("backups");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    Fixture {
        manager: BackupManager::new(db_path, backup_dir),
        db_url,
        _dir: dir,
    }
}

fn couple() -> VisitorProfile {
    VisitorProfile {
        visitor_type: VisitorType::Couple,
        stay_duration: StayDuration::OverOneMonth,
        age_bracket: AgeBracket::From26To35,
        interest_type: InterestType::Beach,
    }
}

/// 在备份目录中写入一个文件，并设置修改时间
fn write_backup(dir: &Path, name: &str, age_secs: u64) {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, b"snapshot").unwrap();
    let file = File::options().write(true).open(&path).unwrap();
    file.set_modified(SystemTime::now() - Duration::from_secs(age_secs))
        .unwrap();
}

// =============================================================================
// 创建与列出
// =============================================================================

#[tokio::test]
async fn test_create_backup_copies_data_file() {
    let fx = fixture();
    let storage = AnalyticsStorage::new(&fx.db_url).await.unwrap();
    storage.add_visitor(&couple()).await.unwrap();

    let path = fx.manager.create_backup(None).expect("backup created");
    assert!(path.is_file());
    assert!(
        path.file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("backup_")
    );
    assert_eq!(path.extension().unwrap(), "db");

    let backups = fx.manager.list_backups();
    assert_eq!(backups.len(), 1);
    assert_eq!(
        backups[0].size,
        fs::metadata(fx.manager.db_path()).unwrap().len()
    );
}

#[tokio::test]
async fn test_create_backup_with_name() {
    let fx = fixture();
    let _storage = AnalyticsStorage::new(&fx.db_url).await.unwrap();

    let path = fx
        .manager
        .create_backup(Some("before-season.db"))
        .expect("backup created");
    assert_eq!(path.file_name().unwrap(), "before-season.db");
    assert!(fx.manager.resolve("before-season.db").is_some());
}

#[test]
fn test_create_backup_rejects_path_names() {
    let fx = fixture();
    File::create(fx.manager.db_path()).unwrap();

    assert!(fx.manager.create_backup(Some("../escape.db")).is_none());
    assert!(fx.manager.create_backup(Some("")).is_none());
    assert!(fx.manager.resolve("../tourism.db").is_none());
}

#[test]
fn test_create_backup_missing_data_file() {
    let fx = fixture();
    assert!(fx.manager.create_backup(None).is_none());
}

#[test]
fn test_auto_backup_name() {
    let fx = fixture();
    File::create(fx.manager.db_path()).unwrap();

    let path = fx.manager.auto_backup().expect("backup created");
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("auto_backup_"));
    assert!(name.ends_with(".db"));
}

#[test]
fn test_list_backups_newest_first_and_filters_extension() {
    let fx = fixture();
    let dir = fx.manager.backup_dir().to_path_buf();

    write_backup(&dir, "old.db", 300);
    write_backup(&dir, "new.db", 10);
    write_backup(&dir, "middle.db", 100);
    write_backup(&dir, "notes.txt", 0);

    let names: Vec<String> = fx
        .manager
        .list_backups()
        .into_iter()
        .map(|b| b.name)
        .collect();
    assert_eq!(names, vec!["new.db", "middle.db", "old.db"]);
}

// =============================================================================
// 清理与删除
// =============================================================================

#[test]
fn test_cleanup_keeps_most_recent() {
    let fx = fixture();
    let dir = fx.manager.backup_dir().to_path_buf();

    for (i, name) in ["a.db", "b.db", "c.db", "d.db", "e.db"].iter().enumerate() {
        write_backup(&dir, name, (i as u64 + 1) * 60);
    }

    assert_eq!(fx.manager.cleanup_old_backups(2), 3);

    let names: Vec<String> = fx
        .manager
        .list_backups()
        .into_iter()
        .map(|b| b.name)
        .collect();
    assert_eq!(names, vec!["a.db", "b.db"]);
}

#[test]
fn test_cleanup_with_fewer_backups_than_keep() {
    let fx = fixture();
    let dir = fx.manager.backup_dir().to_path_buf();
    write_backup(&dir, "only.db", 10);

    assert_eq!(fx.manager.cleanup_old_backups(5), 0);
    assert_eq!(fx.manager.list_backups().len(), 1);
}

#[test]
fn test_cleanup_keep_zero_removes_all() {
    let fx = fixture();
    let dir = fx.manager.backup_dir().to_path_buf();
    write_backup(&dir, "x.db", 10);
    write_backup(&dir, "y.db", 20);

    assert_eq!(fx.manager.cleanup_old_backups(0), 2);
    assert!(fx.manager.list_backups().is_empty());
}

#[test]
fn test_delete_backup() {
    let fx = fixture();
    let dir = fx.manager.backup_dir().to_path_buf();
    write_backup(&dir, "gone.db", 10);

    let path = fx.manager.resolve("gone.db").unwrap();
    assert!(fx.manager.delete_backup(&path));
    assert!(!fx.manager.delete_backup(&path));
    assert!(fx.manager.resolve("gone.db").is_none());
}

// =============================================================================
// 恢复
// =============================================================================

#[tokio::test]
async fn test_restore_returns_pre_mutation_state() {
    let fx = fixture();
    let storage = AnalyticsStorage::new(&fx.db_url).await.unwrap();
    storage.add_visitor(&couple()).await.unwrap();
    storage
        .add_page_view("Beaches", PageCategory::Nature)
        .await
        .unwrap();
    storage.add_total_views(9).await.unwrap();

    let backup = fx.manager.create_backup(Some("snapshot.db")).unwrap();

    storage.reset_all_data().await.unwrap();
    storage.add_visitor(&couple()).await.unwrap();
    storage.add_visitor(&couple()).await.unwrap();
    storage.close().await.unwrap();

    assert!(fx.manager.restore_backup(&backup));

    let restored = AnalyticsStorage::new(&fx.db_url).await.unwrap();
    let summary = restored.summary().await.unwrap();
    assert_eq!(summary.visitor_count, 1);
    assert_eq!(summary.page_count, 1);
    assert_eq!(summary.total_views, 9);
}

#[tokio::test]
async fn test_restore_through_context_reconnects() {
    let fx = fixture();
    let storage = Arc::new(AnalyticsStorage::new(&fx.db_url).await.unwrap());
    storage.add_total_views(3).await.unwrap();

    let ctx = AppContext::new(storage, fx.manager.clone(), 5);
    let backup = ctx.backup().create_backup(Some("three.db")).unwrap();

    ctx.storage().add_total_views(100).await.unwrap();
    assert_eq!(ctx.storage().get_total_views().await.unwrap(), 103);

    assert!(ctx.backup().restore_backup(&backup));
    ctx.reconnect().await.unwrap();

    assert_eq!(ctx.storage().get_total_views().await.unwrap(), 3);
}

#[test]
fn test_restore_missing_backup_fails() {
    let fx = fixture();
    File::create(fx.manager.db_path()).unwrap();
    assert!(
        !fx.manager
            .restore_backup(&fx.manager.backup_dir().join("missing.db"))
    );
}
