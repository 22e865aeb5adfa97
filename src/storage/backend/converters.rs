use chrono::{DateTime, Utc};

use crate::storage::domain::Domain;
use crate::storage::{PageView, Visitor, VisitorProfile};
use migration::entities::{page_view, visitor};

/// 将 Sea-ORM Model 转换为 Visitor
pub fn model_to_visitor(model: visitor::Model) -> Visitor {
    Visitor {
        id: model.id,
        visitor_type: model.visitor_type,
        stay_duration: model.stay_duration,
        age_bracket: model.age_bracket,
        interest_type: model.interest_type,
        visited_at: model.visited_at,
    }
}

/// 将 Sea-ORM Model 转换为 PageView
pub fn model_to_page_view(model: page_view::Model) -> PageView {
    PageView {
        id: model.id,
        page_name: model.page_name,
        category: model.category,
        view_count: model.view_count.max(0),
        last_viewed_at: model.last_viewed_at,
    }
}

/// 新访客的 ActiveModel（id 由数据库分配）
pub fn profile_to_active_model(
    profile: &VisitorProfile,
    visited_at: DateTime<Utc>,
) -> visitor::ActiveModel {
    use sea_orm::ActiveValue::*;

    visitor::ActiveModel {
        id: NotSet,
        visitor_type: Set(profile.visitor_type.as_str().to_string()),
        stay_duration: Set(profile.stay_duration.as_str().to_string()),
        age_bracket: Set(profile.age_bracket.as_str().to_string()),
        interest_type: Set(profile.interest_type.as_str().to_string()),
        visited_at: Set(visited_at),
    }
}
