//! API 类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::constants::MAX_PAGE_NAME_LEN;
use crate::backup::BackupInfo;
use crate::errors::{AppError, Result};
use crate::storage::{
    AgeBracket, Domain, InterestType, PageCategory, StayDuration, VisitorFilter, VisitorProfile,
    VisitorType,
};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

/// 访客提交 / 更新请求
///
/// 字段以字符串接收，校验失败时返回列出合法值的错误信息。
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct VisitorPayload {
    pub visitor_type: String,
    pub stay_duration: String,
    pub age_bracket: String,
    pub interest_type: String,
}

impl VisitorPayload {
    pub fn to_profile(&self) -> Result<VisitorProfile> {
        Ok(VisitorProfile {
            visitor_type: VisitorType::parse_value(&self.visitor_type)?,
            stay_duration: StayDuration::parse_value(&self.stay_duration)?,
            age_bracket: AgeBracket::parse_value(&self.age_bracket)?,
            interest_type: InterestType::parse_value(&self.interest_type)?,
        })
    }
}

/// 页面浏览 / 页面更新请求
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PagePayload {
    pub page_name: String,
    pub category: String,
}

impl PagePayload {
    /// 校验页面名（去除首尾空白后 1..=255 个字符）与分类
    pub fn validate(&self) -> Result<(String, PageCategory)> {
        let name = self.page_name.trim();
        let len = name.chars().count();
        if len == 0 || len > MAX_PAGE_NAME_LEN {
            return Err(AppError::validation(format!(
                "page_name must be between 1 and {} characters",
                MAX_PAGE_NAME_LEN
            )));
        }
        let category = PageCategory::parse_value(&self.category)?;
        Ok((name.to_string(), category))
    }
}

/// 批量删除访客请求，未给出的字段不参与过滤
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct DeleteVisitorsRequest {
    pub visitor_type: Option<String>,
    pub stay_duration: Option<String>,
    pub age_bracket: Option<String>,
    pub interest_type: Option<String>,
    /// 没有任何过滤条件时必须为 true
    #[serde(default)]
    pub confirm_all: bool,
}

fn parse_optional<D: Domain>(value: Option<&str>) -> Result<Option<D>> {
    match value {
        None | Some("") => Ok(None),
        Some(v) => D::parse_value(v).map(Some),
    }
}

impl DeleteVisitorsRequest {
    pub fn to_filter(&self) -> Result<VisitorFilter> {
        Ok(VisitorFilter {
            visitor_type: parse_optional(self.visitor_type.as_deref())?,
            stay_duration: parse_optional(self.stay_duration.as_deref())?,
            age_bracket: parse_optional(self.age_bracket.as_deref())?,
            interest_type: parse_optional(self.interest_type.as_deref())?,
        })
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DeletePagesRequest {
    pub categories: Vec<String>,
}

impl DeletePagesRequest {
    pub fn to_categories(&self) -> Result<Vec<PageCategory>> {
        self.categories
            .iter()
            .map(|c| PageCategory::parse_value(c))
            .collect()
    }
}

/// 删除 / 重置类操作的结果
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DeleteResponse {
    pub deleted: u64,
    /// 操作前自动创建的备份文件名
    pub backup: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct CreateBackupRequest {
    pub name: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CleanupQuery {
    pub keep: Option<usize>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CleanupResponse {
    pub removed: usize,
    pub kept: usize,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct BackupResponse {
    pub name: String,
    pub path: String,
    pub size: u64,
    pub modified: DateTime<Utc>,
}

impl From<BackupInfo> for BackupResponse {
    fn from(info: BackupInfo) -> Self {
        Self {
            name: info.name,
            path: info.path.display().to_string(),
            size: info.size,
            modified: info.modified,
        }
    }
}
