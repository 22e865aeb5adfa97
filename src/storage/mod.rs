use std::sync::Arc;

use crate::errors::Result;

pub mod backend;
pub mod domain;
pub mod models;

pub use backend::AnalyticsStorage;
pub use domain::{
    AgeBracket, Domain, InterestType, PageCategory, StayDuration, ValidValues, VisitorType,
};
pub use models::{
    AnalyticsSummary, CategoryCount, PageView, Visitor, VisitorFilter, VisitorProfile,
    VisitorStats,
};

pub struct StorageFactory;

impl StorageFactory {
    /// 按当前配置打开存储
    pub async fn create() -> Result<Arc<AnalyticsStorage>> {
        let config = crate::config::get_config();
        let storage = AnalyticsStorage::with_pool_size(
            &config.database.database_url,
            config.database.pool_size,
        )
        .await?;
        Ok(Arc::new(storage))
    }
}
