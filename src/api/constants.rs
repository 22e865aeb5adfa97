//! API 模块常量定义

/// API 名称，`GET /` 返回
pub const API_NAME: &str = "Tourism Office Analytics API";

/// 管理接口前缀
pub const ADMIN_PREFIX: &str = "/admin";

/// `GET /visitors` 未指定 limit 时返回的数量
pub const DEFAULT_VISITOR_LIMIT: usize = 100;

/// 页面名称最大长度（字符数）
pub const MAX_PAGE_NAME_LEN: usize = 255;

/// 请求体大小上限（批量上报）
pub const MAX_PAYLOAD_BYTES: usize = 1024 * 1024;
