//! SeaORM storage backend
//!
//! Single-file SQLite storage for the three analytics tables:
//! the total view counter, page views and visitor records.

mod connection;
mod converters;
mod mutations;
mod query;

use std::path::PathBuf;

use sea_orm::DatabaseConnection;
use tracing::{info, warn};

use crate::errors::{AppError, Result};

pub use connection::{connect_sqlite, open_migrated, run_migrations, sqlite_file_path};
pub use converters::{model_to_page_view, model_to_visitor, profile_to_active_model};

/// total_views 单行记录的固定主键
pub const COUNTER_ID: i32 = 1;

/// 默认连接池大小
pub const DEFAULT_POOL_SIZE: u32 = 5;

/// SeaORM-based analytics storage
#[derive(Clone)]
pub struct AnalyticsStorage {
    db: DatabaseConnection,
    database_url: String,
}

impl AnalyticsStorage {
    /// Open (creating if needed) the data file, migrate it, and seed the
    /// singleton counter row.
    pub async fn new(database_url: &str) -> Result<Self> {
        Self::with_pool_size(database_url, DEFAULT_POOL_SIZE).await
    }

    pub async fn with_pool_size(database_url: &str, pool_size: u32) -> Result<Self> {
        if database_url.is_empty() {
            return Err(AppError::database_config("database_url 未设置".to_string()));
        }

        let db = open_migrated(database_url, pool_size).await?;
        let storage = AnalyticsStorage {
            db,
            database_url: database_url.to_string(),
        };

        storage.ensure_counter_row().await?;

        match storage.has_legacy_constraints().await {
            Ok(true) => warn!(
                "visitors table still carries legacy CHECK constraints; \
                 values outside the original lists will be rejected"
            ),
            Ok(false) => {}
            Err(e) => warn!("Could not inspect visitors schema: {}", e),
        }

        info!("SQLite analytics storage initialized: {}", database_url);
        Ok(storage)
    }

    /// 获取数据库连接
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// 数据文件路径（内存数据库为 None）
    pub fn data_file(&self) -> Option<PathBuf> {
        sqlite_file_path(&self.database_url)
    }

    /// 关闭连接池，之后可以安全地覆盖数据文件
    pub async fn close(self) -> Result<()> {
        self.db
            .close()
            .await
            .map_err(|e| AppError::database_connection(format!("关闭数据库连接失败: {}", e)))
    }
}
