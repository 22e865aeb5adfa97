//! Shared handles passed to every request handler.

use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::info;

use crate::backup::BackupManager;
use crate::errors::Result;
use crate::storage::AnalyticsStorage;

/// Storage and backup handles for the HTTP layer.
///
/// The storage handle sits behind an `ArcSwap` so a restore can swap in a
/// freshly connected engine while requests keep running.
pub struct AppContext {
    storage: ArcSwap<AnalyticsStorage>,
    backup: BackupManager,
    keep_count: usize,
}

impl AppContext {
    pub fn new(storage: Arc<AnalyticsStorage>, backup: BackupManager, keep_count: usize) -> Self {
        Self {
            storage: ArcSwap::new(storage),
            backup,
            keep_count,
        }
    }

    /// 当前存储句柄
    pub fn storage(&self) -> Arc<AnalyticsStorage> {
        self.storage.load_full()
    }

    pub fn backup(&self) -> &BackupManager {
        &self.backup
    }

    /// cleanup 未指定数量时的默认保留数
    pub fn keep_count(&self) -> usize {
        self.keep_count
    }

    /// 数据文件被替换后重新连接存储
    pub async fn reconnect(&self) -> Result<()> {
        let current = self.storage();
        let pool_size = crate::config::get_config().database.pool_size;
        let fresh = AnalyticsStorage::with_pool_size(current.database_url(), pool_size).await?;
        self.storage.store(Arc::new(fresh));
        info!("Storage reconnected: {}", current.database_url());
        Ok(())
    }
}
