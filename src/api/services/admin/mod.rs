//! Admin API 服务模块
//!
//! 需要 Bearer 令牌的管理端点：
//! - 访客查看、修改、删除与统计
//! - 页面修改与删除
//! - 数据重置
//! - 备份管理

mod backups;
pub mod error_code;
mod helpers;
mod maintenance;
mod pages;
pub mod routes;
mod types;
mod visitors;

use tracing::warn;

use crate::api::AppContext;

// 重新导出类型
pub use types::*;

// 重新导出帮助函数
pub use helpers::{
    api_result, error_from_app, error_response, json_error_handler, path_error_handler,
    query_error_handler, success_message, success_response,
};

// 重新导出错误码
pub use error_code::ErrorCode;

/// 破坏性操作前的自动备份，返回备份文件名
///
/// A failed backup is logged and does not block the operation.
pub(crate) fn auto_backup_name(ctx: &AppContext) -> Option<String> {
    let name = ctx
        .backup()
        .auto_backup()
        .and_then(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()));
    if name.is_none() {
        warn!("Auto backup failed, continuing with destructive operation");
    }
    name
}
