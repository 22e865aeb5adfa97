use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{AgeBracket, InterestType, StayDuration, VisitorType};

/// A stored visitor record.
///
/// Columns are read back as text so rows written before the value domains
/// were enforced still load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Visitor {
    pub id: i64,
    pub visitor_type: String,
    pub stay_duration: String,
    pub age_bracket: String,
    pub interest_type: String,
    pub visited_at: DateTime<Utc>,
}

/// The four typed fields of a visitor submission or update.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct VisitorProfile {
    pub visitor_type: VisitorType,
    pub stay_duration: StayDuration,
    pub age_bracket: AgeBracket,
    pub interest_type: InterestType,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageView {
    pub id: i64,
    pub page_name: String,
    pub category: String,
    pub view_count: i64,
    pub last_viewed_at: DateTime<Utc>,
}

/// 单个取值及其出现次数
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryCount {
    pub value: String,
    pub count: i64,
}

/// Per-dimension visitor counts, each ordered by count descending then value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VisitorStats {
    pub visitor_types: Vec<CategoryCount>,
    pub stay_durations: Vec<CategoryCount>,
    pub age_brackets: Vec<CategoryCount>,
    pub interest_types: Vec<CategoryCount>,
}

/// Conjunctive visitor filter; `None` ignores the field.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VisitorFilter {
    pub visitor_type: Option<VisitorType>,
    pub stay_duration: Option<StayDuration>,
    pub age_bracket: Option<AgeBracket>,
    pub interest_type: Option<InterestType>,
}

impl VisitorFilter {
    /// 没有任何过滤条件（将匹配全部访客）
    pub fn is_empty(&self) -> bool {
        self.visitor_type.is_none()
            && self.stay_duration.is_none()
            && self.age_bracket.is_none()
            && self.interest_type.is_none()
    }
}

/// Headline numbers for `/stats` and the `stats` command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalyticsSummary {
    pub total_views: i64,
    pub visitor_count: u64,
    pub page_count: u64,
    pub last_activity: Option<DateTime<Utc>>,
}
