//! API 帮助函数

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, error};
use serde::Serialize;
use tracing::debug;

use crate::errors::AppError;

use super::error_code::ErrorCode;
use super::types::ApiResponse;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

/// 构建带自定义消息的成功响应
pub fn success_message<T: Serialize>(message: impl Into<String>, data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, message, Some(data))
}

/// 构建错误响应
pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// 从 AppError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
pub fn error_from_app(err: &AppError) -> HttpResponse {
    let status = err.http_status();
    let error_code = ErrorCode::from(err.clone());
    error_response(status, error_code, err.message())
}

/// 统一 Result → HttpResponse 转换
///
/// 成功时返回 200 OK + JSON 数据，失败时自动映射 AppError。
pub fn api_result<T, E>(result: Result<T, E>) -> HttpResponse
where
    T: Serialize,
    E: Into<AppError>,
{
    match result {
        Ok(data) => success_response(data),
        Err(e) => {
            let err: AppError = e.into();
            error_from_app(&err)
        }
    }
}

/// JSON 请求体解析失败时返回统一格式的 400
pub fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> error::Error {
    debug!("Rejected JSON payload: {}", err);
    let message = format!("Invalid JSON body: {}", err);
    error::InternalError::from_response(
        err,
        error_response(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, &message),
    )
    .into()
}

/// 查询参数解析失败时返回统一格式的 400
pub fn query_error_handler(err: error::QueryPayloadError, _req: &HttpRequest) -> error::Error {
    debug!("Rejected query string: {}", err);
    let message = format!("Invalid query parameters: {}", err);
    error::InternalError::from_response(
        err,
        error_response(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, &message),
    )
    .into()
}

/// 路径参数解析失败时返回统一格式的 400
pub fn path_error_handler(err: error::PathError, _req: &HttpRequest) -> error::Error {
    debug!("Rejected path parameter: {}", err);
    let message = format!("Invalid path parameter: {}", err);
    error::InternalError::from_response(
        err,
        error_response(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, &message),
    )
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response() {
        let response = success_response("success_data");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_error_response_not_found() {
        let response = error_response(
            StatusCode::NOT_FOUND,
            ErrorCode::VisitorNotFound,
            "Visitor not found",
        );
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_error_from_app_maps_status() {
        let response = error_from_app(&AppError::validation("bad category"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = error_from_app(&AppError::database_operation("disk I/O error"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_api_result() {
        let ok: Result<u32, AppError> = Ok(3);
        assert_eq!(api_result(ok).status(), StatusCode::OK);

        let err: Result<u32, AppError> = Err(AppError::not_found("nothing"));
        assert_eq!(api_result(err).status(), StatusCode::NOT_FOUND);
    }
}
