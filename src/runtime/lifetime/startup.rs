use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::backup::BackupManager;
use crate::config::get_config;
use crate::storage::{AnalyticsStorage, StorageFactory};

pub struct StartupContext {
    pub storage: Arc<AnalyticsStorage>,
    pub backup: BackupManager,
}

/// 准备服务器启动的上下文：存储与备份管理
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;

    let config = get_config();
    let backup = BackupManager::from_config(&config);
    debug!(
        "Backups for {} go to {}",
        backup.db_path().display(),
        backup.backup_dir().display()
    );

    check_component_enabled();

    let summary = storage
        .summary()
        .await
        .context("Failed to read initial statistics")?;
    info!(
        "Loaded {} visitors, {} pages, {} total views",
        summary.visitor_count, summary.page_count, summary.total_views
    );

    info!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext { storage, backup })
}

fn check_component_enabled() {
    let config = get_config();

    let admin_token = &config.api.admin_token;
    if admin_token.is_empty() {
        info!("Admin API is disabled (admin_token not set)");
    } else {
        info!("Admin API available at: {}", crate::api::constants::ADMIN_PREFIX);
        if !admin_token.starts_with("$argon2") && admin_token.len() < 8 {
            warn!("WARNING: Admin Token is very short. Consider using a stronger token.");
        }
    }
}
