//! Public tracking endpoints
//!
//! Called by the tourism office website: visitor profile submissions, page
//! views, the site-wide view counter and read-only listings.

use actix_web::{Responder, Result as ActixResult, web};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info, trace, warn};

use crate::api::AppContext;
use crate::api::constants::{API_NAME, DEFAULT_VISITOR_LIMIT};
use crate::storage::{PageView, ValidValues, Visitor};

use super::admin::{
    PagePayload, VisitorPayload, api_result, error_from_app, success_message, success_response,
};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct VisitorsQuery {
    pub limit: Option<usize>,
}

/// 批量上报请求
///
/// Every field is kept as raw JSON so one malformed field or item cannot fail
/// the batch. `visitors` and `pages` must be arrays and `total_views` a
/// non-negative integer; anything else is logged and ignored.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct BulkTrackingRequest {
    #[serde(default)]
    pub visitors: Value,
    #[serde(default)]
    pub pages: Value,
    #[serde(default)]
    pub total_views: Value,
}

/// 取出数组字段的各项；缺省为空，其他类型忽略
fn bulk_items(field: &str, value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => {
            warn!("Bulk tracking: '{}' is not a list, ignored: {}", field, other);
            Vec::new()
        }
    }
}

/// 浏览量字段只接受非负整数
fn bulk_view_count(value: &Value) -> u32 {
    match value {
        Value::Null => 0,
        other => match other.as_u64().map(u32::try_from) {
            Some(Ok(count)) => count,
            _ => {
                warn!(
                    "Bulk tracking: 'total_views' is not a non-negative integer, ignored: {}",
                    other
                );
                0
            }
        },
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct BulkTrackingResponse {
    pub visitors_added: usize,
    pub visitors_skipped: usize,
    pub pages_added: usize,
    pub pages_skipped: usize,
    pub total_views_added: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TotalViewsResponse {
    pub total_views: i64,
}

/// `GET /` API 信息
pub async fn api_info() -> ActixResult<impl Responder> {
    Ok(success_response(json!({
        "name": API_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "POST /visitor": "Add a visitor profile",
            "POST /page-view": "Record a page view",
            "POST /total-view": "Increment the site-wide view counter",
            "GET /stats": "Overall statistics",
            "GET /visitors": "List visitors (newest first, ?limit=N)",
            "GET /pages": "List pages by view count",
            "POST /tracking/bulk": "Submit visitors, page views and views in one request",
            "GET /health": "Health check",
            "GET /valid-values": "Allowed values for every field",
        }
    })))
}

pub async fn add_visitor(
    payload: web::Json<VisitorPayload>,
    ctx: web::Data<AppContext>,
) -> ActixResult<impl Responder> {
    let profile = match payload.to_profile() {
        Ok(profile) => profile,
        Err(e) => {
            debug!("Rejected visitor submission: {}", e);
            return Ok(error_from_app(&e));
        }
    };

    Ok(match ctx.storage().add_visitor(&profile).await {
        Ok(visitor) => {
            trace!("Visitor {} added", visitor.id);
            success_message("Visitor added", visitor)
        }
        Err(e) => error_from_app(&e),
    })
}

pub async fn record_page_view(
    payload: web::Json<PagePayload>,
    ctx: web::Data<AppContext>,
) -> ActixResult<impl Responder> {
    let (page_name, category) = match payload.validate() {
        Ok(valid) => valid,
        Err(e) => return Ok(error_from_app(&e)),
    };

    Ok(match ctx.storage().add_page_view(&page_name, category).await {
        Ok(()) => success_message(
            "Page view recorded",
            json!({ "page_name": page_name, "category": category }),
        ),
        Err(e) => error_from_app(&e),
    })
}

/// 总浏览量 +1，返回新的总数
pub async fn increment_total_view(ctx: web::Data<AppContext>) -> ActixResult<impl Responder> {
    let storage = ctx.storage();
    if let Err(e) = storage.increment_total_views().await {
        return Ok(error_from_app(&e));
    }
    Ok(api_result(
        storage
            .get_total_views()
            .await
            .map(|total_views| TotalViewsResponse { total_views }),
    ))
}

pub async fn get_stats(ctx: web::Data<AppContext>) -> ActixResult<impl Responder> {
    Ok(api_result(ctx.storage().summary().await))
}

/// 最新的访客在前，默认最多 100 条
pub async fn list_visitors(
    query: web::Query<VisitorsQuery>,
    ctx: web::Data<AppContext>,
) -> ActixResult<impl Responder> {
    let limit = query.limit.unwrap_or(DEFAULT_VISITOR_LIMIT);
    Ok(api_result(ctx.storage().list_visitors().await.map(
        |visitors| -> Vec<Visitor> { visitors.into_iter().take(limit).collect() },
    )))
}

pub async fn list_pages(ctx: web::Data<AppContext>) -> ActixResult<impl Responder> {
    Ok(api_result::<Vec<PageView>, _>(
        ctx.storage().list_page_views_with_id().await,
    ))
}

/// 批量上报：每一项独立校验，失败的项记录日志后跳过
pub async fn tracking_bulk(
    payload: web::Json<BulkTrackingRequest>,
    ctx: web::Data<AppContext>,
) -> ActixResult<impl Responder> {
    let request = payload.into_inner();
    let storage = ctx.storage();
    let mut result = BulkTrackingResponse::default();

    let total_views = bulk_view_count(&request.total_views);

    let visitors = bulk_items("visitors", request.visitors);
    for (idx, item) in visitors.into_iter().enumerate() {
        let outcome = match serde_json::from_value::<VisitorPayload>(item) {
            Ok(visitor) => match visitor.to_profile() {
                Ok(profile) => storage.add_visitor(&profile).await.map(|_| ()),
                Err(e) => Err(e),
            },
            Err(e) => Err(e.into()),
        };
        match outcome {
            Ok(()) => result.visitors_added += 1,
            Err(e) => {
                warn!("Bulk tracking: visitor #{} skipped: {}", idx, e);
                result.visitors_skipped += 1;
            }
        }
    }

    let pages = bulk_items("pages", request.pages);
    for (idx, item) in pages.into_iter().enumerate() {
        let outcome = match serde_json::from_value::<PagePayload>(item) {
            Ok(page) => match page.validate() {
                Ok((name, category)) => storage.add_page_view(&name, category).await,
                Err(e) => Err(e),
            },
            Err(e) => Err(e.into()),
        };
        match outcome {
            Ok(()) => result.pages_added += 1,
            Err(e) => {
                warn!("Bulk tracking: page #{} skipped: {}", idx, e);
                result.pages_skipped += 1;
            }
        }
    }

    if total_views > 0 {
        match storage.add_total_views(i64::from(total_views)).await {
            Ok(()) => result.total_views_added = total_views,
            Err(e) => warn!("Bulk tracking: total views skipped: {}", e),
        }
    }

    info!(
        "Bulk tracking processed: {} visitors, {} pages, {} views",
        result.visitors_added, result.pages_added, result.total_views_added
    );
    Ok(success_message("Bulk data processed", result))
}

/// 所有取值域的合法值，供前端动态生成表单
pub async fn valid_values() -> ActixResult<impl Responder> {
    Ok(success_response(ValidValues::collect()))
}

/// Public routes, mounted at the application root
pub fn public_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(api_info))
        .route("/visitor", web::post().to(add_visitor))
        .route("/page-view", web::post().to(record_page_view))
        .route("/total-view", web::post().to(increment_total_view))
        .route("/stats", web::get().to(get_stats))
        .route("/visitors", web::get().to(list_visitors))
        .route("/pages", web::get().to(list_pages))
        .route("/tracking/bulk", web::post().to(tracking_bulk))
        .route("/valid-values", web::get().to(valid_values));
}
