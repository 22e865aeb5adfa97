use std::path::PathBuf;

use sea_orm::DatabaseConnection;
use tracing::info;

use crate::errors::{AppError, Result};
use migration::{Migrator, MigratorTrait};

/// 连接 SQLite 数据库（不存在时自动创建）
///
/// Journal mode is the rollback journal rather than WAL: every committed
/// transaction lands in the main file, so a plain file copy is a complete
/// snapshot.
pub async fn connect_sqlite(database_url: &str, max_connections: u32) -> Result<DatabaseConnection> {
    use sea_orm::SqlxSqliteConnector;
    use sea_orm::sqlx::sqlite::{
        SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
    };
    use std::str::FromStr;

    let opt = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| AppError::database_config(format!("SQLite URL 解析失败: {}", e)))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Delete)
        .synchronous(SqliteSynchronous::Full)
        .busy_timeout(std::time::Duration::from_secs(5));

    // 内存数据库每个连接互相独立，只能用单连接
    let max_connections = if is_memory_url(database_url) {
        1
    } else {
        max_connections.max(1)
    };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(opt)
        .await
        .map_err(|e| {
            AppError::database_connection(format!("无法连接到 SQLite 数据库: {}", e))
        })?;

    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}

/// 运行数据库迁移
pub async fn run_migrations(db: &DatabaseConnection) -> Result<()> {
    Migrator::up(db, None)
        .await
        .map_err(|e| AppError::database_operation(format!("迁移失败: {}", e)))?;

    info!("Database migrations completed");
    Ok(())
}

/// 打开数据库并迁移，返回主连接池
///
/// File databases are migrated over a dedicated single-connection pool that
/// is closed before the main pool opens, so schema rebuilds never interleave
/// with other connections. In-memory databases only live as long as their one
/// connection and are migrated in place.
pub async fn open_migrated(
    database_url: &str,
    max_connections: u32,
) -> Result<DatabaseConnection> {
    if is_memory_url(database_url) {
        let db = connect_sqlite(database_url, 1).await?;
        run_migrations(&db).await?;
        return Ok(db);
    }

    let migration_db = connect_sqlite(database_url, 1).await?;
    run_migrations(&migration_db).await?;
    migration_db
        .close()
        .await
        .map_err(|e| AppError::database_connection(format!("关闭迁移连接失败: {}", e)))?;

    connect_sqlite(database_url, max_connections).await
}

fn is_memory_url(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Resolve the on-disk data file behind a SQLite URL.
///
/// Accepts `sqlite://path`, `sqlite:path` and bare paths; query parameters
/// are dropped. Returns `None` for in-memory databases.
pub fn sqlite_file_path(database_url: &str) -> Option<PathBuf> {
    if is_memory_url(database_url) {
        return None;
    }

    let without_scheme = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url);
    let path = without_scheme
        .split_once('?')
        .map_or(without_scheme, |(path, _)| path);

    if path.is_empty() {
        None
    } else {
        Some(PathBuf::from(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_file_path_variants() {
        assert_eq!(
            sqlite_file_path("sqlite:///tmp/data.db?mode=rwc"),
            Some(PathBuf::from("/tmp/data.db"))
        );
        assert_eq!(
            sqlite_file_path("sqlite://tourism_data.db"),
            Some(PathBuf::from("tourism_data.db"))
        );
        assert_eq!(
            sqlite_file_path("sqlite:data/app.db"),
            Some(PathBuf::from("data/app.db"))
        );
        assert_eq!(
            sqlite_file_path("tourism_data.db"),
            Some(PathBuf::from("tourism_data.db"))
        );
    }

    #[test]
    fn test_sqlite_file_path_memory() {
        assert_eq!(sqlite_file_path("sqlite::memory:"), None);
        assert_eq!(sqlite_file_path(":memory:"), None);
        assert_eq!(sqlite_file_path(""), None);
    }
}
