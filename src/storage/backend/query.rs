//! Query operations for AnalyticsStorage
//!
//! This module contains all read-only database operations.

use sea_orm::{
    ColumnTrait, EntityTrait, ExprTrait, FromQueryResult, PaginatorTrait, QueryOrder, QuerySelect,
    sea_query::Expr,
};
use tracing::debug;

use super::converters::{model_to_page_view, model_to_visitor};
use super::{AnalyticsStorage, COUNTER_ID};
use crate::errors::{AppError, Result};
use crate::storage::{AnalyticsSummary, CategoryCount, PageView, Visitor, VisitorStats};

use migration::entities::{page_view, total_views, visitor};

/// 分组计数查询结果行
#[derive(Debug, FromQueryResult)]
struct CountRow {
    label: String,
    count: i64,
}

impl AnalyticsStorage {
    /// 当前总浏览量，计数器不存在时为 0
    pub async fn get_total_views(&self) -> Result<i64> {
        let row = total_views::Entity::find_by_id(COUNTER_ID)
            .one(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("查询总浏览量失败: {}", e)))?;

        Ok(row.map_or(0, |r| std::cmp::max(r.view_count, 0)))
    }

    /// 所有页面，按浏览量降序（相同时按 id 升序）
    pub async fn list_page_views(&self) -> Result<Vec<PageView>> {
        let models = page_view::Entity::find()
            .order_by_desc(page_view::Column::ViewCount)
            .order_by_asc(page_view::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("查询页面失败: {}", e)))?;

        Ok(models.into_iter().map(model_to_page_view).collect())
    }

    /// Same rows and order as [`list_page_views`](Self::list_page_views);
    /// the admin listing uses the ids to edit and delete rows.
    pub async fn list_page_views_with_id(&self) -> Result<Vec<PageView>> {
        self.list_page_views().await
    }

    /// 所有访客，最新的在前（相同时间按 id 降序）
    pub async fn list_visitors(&self) -> Result<Vec<Visitor>> {
        let models = visitor::Entity::find()
            .order_by_desc(visitor::Column::VisitedAt)
            .order_by_desc(visitor::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("查询访客失败: {}", e)))?;

        Ok(models.into_iter().map(model_to_visitor).collect())
    }

    pub async fn get_visitor(&self, id: i64) -> Result<Option<Visitor>> {
        let model = visitor::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("查询访客 {} 失败: {}", id, e)))?;

        Ok(model.map(model_to_visitor))
    }

    pub async fn get_page(&self, id: i64) -> Result<Option<PageView>> {
        let model = page_view::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("查询页面 {} 失败: {}", id, e)))?;

        Ok(model.map(model_to_page_view))
    }

    /// 各维度的访客分布
    pub async fn get_visitor_stats(&self) -> Result<VisitorStats> {
        Ok(VisitorStats {
            visitor_types: self.count_visitors_by(visitor::Column::VisitorType).await?,
            stay_durations: self.count_visitors_by(visitor::Column::StayDuration).await?,
            age_brackets: self.count_visitors_by(visitor::Column::AgeBracket).await?,
            interest_types: self.count_visitors_by(visitor::Column::InterestType).await?,
        })
    }

    async fn count_visitors_by(&self, column: visitor::Column) -> Result<Vec<CategoryCount>> {
        let rows = visitor::Entity::find()
            .select_only()
            .column_as(column, "label")
            .column_as(visitor::Column::Id.count(), "count")
            .group_by(column)
            .order_by_desc(Expr::cust("count"))
            .order_by_asc(Expr::cust("label"))
            .into_model::<CountRow>()
            .all(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("访客统计查询失败: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|r| CategoryCount {
                value: r.label,
                count: r.count,
            })
            .collect())
    }

    /// 总览：总浏览量、访客数、页面数、最近一次访客时间
    pub async fn summary(&self) -> Result<AnalyticsSummary> {
        let total_views = self.get_total_views().await?;

        let visitor_count = visitor::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("统计访客数失败: {}", e)))?;

        let page_count = page_view::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("统计页面数失败: {}", e)))?;

        let latest = visitor::Entity::find()
            .order_by_desc(visitor::Column::VisitedAt)
            .order_by_desc(visitor::Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("查询最近访客失败: {}", e)))?;

        debug!(
            "Summary: {} views, {} visitors, {} pages",
            total_views, visitor_count, page_count
        );

        Ok(AnalyticsSummary {
            total_views,
            visitor_count,
            page_count,
            last_activity: latest.map(|v| v.visited_at),
        })
    }

    /// visitors 表是否仍带旧的 CHECK 约束
    pub async fn has_legacy_constraints(&self) -> Result<bool> {
        migration::has_legacy_visitor_constraints(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("检查表结构失败: {}", e)))
    }
}
