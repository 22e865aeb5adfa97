//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::AppError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字。按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 3000-3099: 访客错误
/// - 3100-3199: 页面错误
/// - 4000-4099: 备份错误
/// - 5000-5099: 存储错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    NotFound = 1004,
    InternalServerError = 1005,
    ConfirmationRequired = 1020,
    ServiceUnavailable = 1030,

    // 访客错误 3000-3099
    VisitorNotFound = 3000,

    // 页面错误 3100-3199
    PageNotFound = 3100,
    PageAlreadyExists = 3101,

    // 备份错误 4000-4099
    BackupNotFound = 4000,
    BackupFailed = 4001,
    RestoreFailed = 4002,

    // 存储错误 5000-5099
    DatabaseError = 5000,
}

impl From<AppError> for ErrorCode {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Validation(_) => ErrorCode::BadRequest,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::DatabaseConnection(_) => ErrorCode::ServiceUnavailable,
            AppError::DatabaseOperation(_) => ErrorCode::DatabaseError,
            AppError::Backup(_) => ErrorCode::BackupFailed,
            AppError::DatabaseConfig(_)
            | AppError::FileOperation(_)
            | AppError::Serialization(_) => ErrorCode::InternalServerError,
        }
    }
}
