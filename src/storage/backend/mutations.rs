//! Mutation operations for AnalyticsStorage
//!
//! This module contains all write database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, EntityTrait, ExprTrait,
    QueryFilter, TransactionTrait,
    sea_query::{Expr, OnConflict},
};
use tracing::{debug, info, warn};

use super::converters::{model_to_visitor, profile_to_active_model};
use super::{AnalyticsStorage, COUNTER_ID};
use crate::errors::{AppError, Result};
use crate::storage::domain::{Domain, PageCategory};
use crate::storage::{Visitor, VisitorFilter, VisitorProfile};

use migration::entities::{page_view, total_views, visitor};

impl AnalyticsStorage {
    /// 确保计数器单行记录存在
    pub(super) async fn ensure_counter_row(&self) -> Result<()> {
        let existing = total_views::Entity::find_by_id(COUNTER_ID)
            .one(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("查询计数器失败: {}", e)))?;

        if existing.is_none() {
            total_views::ActiveModel {
                id: Set(COUNTER_ID),
                last_update_date: Set(Utc::now().date_naive()),
                view_count: Set(0),
            }
            .insert(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("初始化计数器失败: {}", e)))?;
            debug!("Total view counter seeded");
        }

        Ok(())
    }

    /// 总浏览量 +1，并记录当天日期
    pub async fn increment_total_views(&self) -> Result<()> {
        self.add_total_views(1).await
    }

    /// 总浏览量增加 `amount`（批量上报使用），单条 UPDATE
    pub async fn add_total_views(&self, amount: i64) -> Result<()> {
        if amount <= 0 {
            return Ok(());
        }

        total_views::Entity::update_many()
            .col_expr(
                total_views::Column::ViewCount,
                Expr::col(total_views::Column::ViewCount).add(amount),
            )
            .col_expr(
                total_views::Column::LastUpdateDate,
                Expr::value(Utc::now().date_naive()),
            )
            .filter(total_views::Column::Id.eq(COUNTER_ID))
            .exec(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("更新总浏览量失败: {}", e)))?;

        Ok(())
    }

    /// 记录一次页面浏览
    ///
    /// Keyed on (page_name, category): the first view inserts a row with
    /// count 1, later views bump the count and refresh `last_viewed_at`.
    pub async fn add_page_view(&self, page_name: &str, category: PageCategory) -> Result<()> {
        let model = page_view::ActiveModel {
            page_name: Set(page_name.to_string()),
            category: Set(category.as_str().to_string()),
            view_count: Set(1),
            last_viewed_at: Set(Utc::now()),
            ..Default::default()
        };

        page_view::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([page_view::Column::PageName, page_view::Column::Category])
                    .value(
                        page_view::Column::ViewCount,
                        Expr::col(page_view::Column::ViewCount).add(1),
                    )
                    .update_column(page_view::Column::LastViewedAt)
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| {
                AppError::database_operation(format!(
                    "记录页面浏览失败 ({} / {}): {}",
                    page_name, category, e
                ))
            })?;

        Ok(())
    }

    /// 新增访客记录，visited_at 取当前时间
    pub async fn add_visitor(&self, profile: &VisitorProfile) -> Result<Visitor> {
        let model = profile_to_active_model(profile, Utc::now())
            .insert(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("新增访客失败: {}", e)))?;

        Ok(model_to_visitor(model))
    }

    /// 用一条 UPDATE 替换访客的四个字段；记录不存在时返回 false
    pub async fn update_visitor(&self, id: i64, profile: &VisitorProfile) -> Result<bool> {
        let result = visitor::Entity::update_many()
            .col_expr(
                visitor::Column::VisitorType,
                Expr::value(profile.visitor_type.as_str()),
            )
            .col_expr(
                visitor::Column::StayDuration,
                Expr::value(profile.stay_duration.as_str()),
            )
            .col_expr(
                visitor::Column::AgeBracket,
                Expr::value(profile.age_bracket.as_str()),
            )
            .col_expr(
                visitor::Column::InterestType,
                Expr::value(profile.interest_type.as_str()),
            )
            .filter(visitor::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("更新访客 {} 失败: {}", id, e)))?;

        Ok(result.rows_affected > 0)
    }

    /// 修改页面名称与分类；记录不存在时返回 false
    ///
    /// Renaming onto an existing (page_name, category) pair violates the
    /// unique index and surfaces as a database error.
    pub async fn update_page(
        &self,
        id: i64,
        page_name: &str,
        category: PageCategory,
    ) -> Result<bool> {
        let result = page_view::Entity::update_many()
            .col_expr(page_view::Column::PageName, Expr::value(page_name))
            .col_expr(page_view::Column::Category, Expr::value(category.as_str()))
            .filter(page_view::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("更新页面 {} 失败: {}", id, e)))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn delete_visitor(&self, id: i64) -> Result<bool> {
        let result = visitor::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("删除访客 {} 失败: {}", id, e)))?;

        if result.rows_affected > 0 {
            info!("Visitor deleted: {}", id);
        }
        Ok(result.rows_affected > 0)
    }

    pub async fn delete_page(&self, id: i64) -> Result<bool> {
        let result = page_view::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("删除页面 {} 失败: {}", id, e)))?;

        if result.rows_affected > 0 {
            info!("Page deleted: {}", id);
        }
        Ok(result.rows_affected > 0)
    }

    /// 按条件批量删除访客，返回删除数量
    ///
    /// An empty filter matches every row and empties the table.
    pub async fn delete_visitors_by_criteria(&self, filter: &VisitorFilter) -> Result<u64> {
        let mut condition = Condition::all();

        if let Some(v) = filter.visitor_type {
            condition = condition.add(visitor::Column::VisitorType.eq(v.as_str()));
        }
        if let Some(v) = filter.stay_duration {
            condition = condition.add(visitor::Column::StayDuration.eq(v.as_str()));
        }
        if let Some(v) = filter.age_bracket {
            condition = condition.add(visitor::Column::AgeBracket.eq(v.as_str()));
        }
        if let Some(v) = filter.interest_type {
            condition = condition.add(visitor::Column::InterestType.eq(v.as_str()));
        }

        if filter.is_empty() {
            warn!("Deleting visitors with no filter: every visitor will be removed");
        }

        let result = visitor::Entity::delete_many()
            .filter(condition)
            .exec(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("批量删除访客失败: {}", e)))?;

        info!("Batch deleted {} visitors", result.rows_affected);
        Ok(result.rows_affected)
    }

    /// 删除属于给定分类的所有页面，返回删除数量
    pub async fn delete_pages_by_categories(&self, categories: &[PageCategory]) -> Result<u64> {
        if categories.is_empty() {
            return Ok(0);
        }

        let result = page_view::Entity::delete_many()
            .filter(page_view::Column::Category.is_in(categories.iter().map(|c| c.as_str())))
            .exec(&self.db)
            .await
            .map_err(|e| AppError::database_operation(format!("按分类删除页面失败: {}", e)))?;

        info!("Batch deleted {} pages", result.rows_affected);
        Ok(result.rows_affected)
    }

    /// 清空访客与页面，并将总浏览量归零（单个事务）
    pub async fn reset_all_data(&self) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::database_operation(format!("开始事务失败: {}", e)))?;

        visitor::Entity::delete_many()
            .exec(&txn)
            .await
            .map_err(|e| AppError::database_operation(format!("清空访客失败: {}", e)))?;

        page_view::Entity::delete_many()
            .exec(&txn)
            .await
            .map_err(|e| AppError::database_operation(format!("清空页面失败: {}", e)))?;

        let today = Utc::now().date_naive();
        let updated = total_views::Entity::update_many()
            .col_expr(total_views::Column::ViewCount, Expr::value(0i64))
            .col_expr(total_views::Column::LastUpdateDate, Expr::value(today))
            .filter(total_views::Column::Id.eq(COUNTER_ID))
            .exec(&txn)
            .await
            .map_err(|e| AppError::database_operation(format!("重置计数器失败: {}", e)))?;

        if updated.rows_affected == 0 {
            total_views::ActiveModel {
                id: Set(COUNTER_ID),
                last_update_date: Set(today),
                view_count: Set(0),
            }
            .insert(&txn)
            .await
            .map_err(|e| AppError::database_operation(format!("重建计数器失败: {}", e)))?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::database_operation(format!("提交事务失败: {}", e)))?;

        warn!("All analytics data has been reset");
        Ok(true)
    }
}
