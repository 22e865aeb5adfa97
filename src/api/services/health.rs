use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{error, trace};

use crate::api::AppContext;
use crate::api::services::admin::{ApiResponse, ErrorCode};

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime: u64,
    pub database: String,
    pub total_views: Option<i64>,
    pub error: Option<String>,
    pub response_time_ms: u32,
}

/// Health Service
///
/// 读取总浏览量计数器来确认数据库可用
pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        ctx: web::Data<AppContext>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received health check request");

        let storage = ctx.storage();
        let (total_views, error) =
            match tokio::time::timeout(Duration::from_secs(5), storage.get_total_views()).await {
                Ok(Ok(total)) => (Some(total), None),
                Ok(Err(e)) => {
                    error!("Storage health check failed: {}", e);
                    (None, Some(format!("database error: {}", e)))
                }
                Err(_) => {
                    error!("Storage health check timeout");
                    (None, Some("timeout".to_string()))
                }
            };

        let is_healthy = error.is_none();
        let now = chrono::Utc::now();

        let health_data = HealthResponse {
            status: if is_healthy { "healthy" } else { "unhealthy" }.to_string(),
            timestamp: now.to_rfc3339(),
            uptime: (now - app_start_time.start_datetime).num_seconds().max(0) as u64,
            database: if is_healthy { "connected" } else { "unavailable" }.to_string(),
            total_views,
            error,
            response_time_ms: start_time.elapsed().as_millis() as u32,
        };

        let (status, code, message) = if is_healthy {
            (actix_web::http::StatusCode::OK, ErrorCode::Success, "OK")
        } else {
            (
                actix_web::http::StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::ServiceUnavailable,
                "Service Unavailable",
            )
        };

        HttpResponse::build(status)
            .append_header(("Content-Type", "application/json; charset=utf-8"))
            .json(ApiResponse {
                code: code as i32,
                message: message.to_string(),
                data: Some(health_data),
            })
    }
}

/// 健康检查路由 `/health`
pub fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
}
