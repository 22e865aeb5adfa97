//! Admin API 访客管理

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, Result as ActixResult, web};
use tracing::{info, trace, warn};

use crate::api::AppContext;

use super::error_code::ErrorCode;
use super::helpers::{api_result, error_from_app, error_response, success_response};
use super::types::{DeleteResponse, DeleteVisitorsRequest, VisitorPayload};
use super::auto_backup_name;

/// 各维度访客分布
pub async fn get_visitor_stats(ctx: web::Data<AppContext>) -> ActixResult<impl Responder> {
    trace!("Admin API: request visitor stats");
    Ok(api_result(ctx.storage().get_visitor_stats().await))
}

pub async fn get_visitor(
    path: web::Path<i64>,
    ctx: web::Data<AppContext>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    trace!("Admin API: request visitor {}", id);

    Ok(match ctx.storage().get_visitor(id).await {
        Ok(Some(visitor)) => success_response(visitor),
        Ok(None) => visitor_not_found(id),
        Err(e) => error_from_app(&e),
    })
}

/// 替换访客的四个字段
pub async fn update_visitor(
    path: web::Path<i64>,
    payload: web::Json<VisitorPayload>,
    ctx: web::Data<AppContext>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    let profile = match payload.to_profile() {
        Ok(profile) => profile,
        Err(e) => return Ok(error_from_app(&e)),
    };

    let storage = ctx.storage();
    Ok(match storage.update_visitor(id, &profile).await {
        Ok(true) => {
            info!("Admin API: visitor {} updated", id);
            api_result(storage.get_visitor(id).await)
        }
        Ok(false) => visitor_not_found(id),
        Err(e) => error_from_app(&e),
    })
}

pub async fn delete_visitor(
    path: web::Path<i64>,
    ctx: web::Data<AppContext>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    let storage = ctx.storage();

    // 先确认记录存在，未知 id 不产生备份
    match storage.get_visitor(id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(visitor_not_found(id)),
        Err(e) => return Ok(error_from_app(&e)),
    }

    let backup = auto_backup_name(&ctx);
    Ok(match storage.delete_visitor(id).await {
        Ok(true) => success_response(DeleteResponse { deleted: 1, backup }),
        Ok(false) => visitor_not_found(id),
        Err(e) => error_from_app(&e),
    })
}

/// 按条件批量删除访客
///
/// With no filter at all the request must set `confirm_all`, since it
/// empties the table.
pub async fn delete_visitors(
    payload: web::Json<DeleteVisitorsRequest>,
    ctx: web::Data<AppContext>,
) -> ActixResult<impl Responder> {
    let filter = match payload.to_filter() {
        Ok(filter) => filter,
        Err(e) => return Ok(error_from_app(&e)),
    };

    if filter.is_empty() && !payload.confirm_all {
        warn!("Admin API: refused unfiltered visitor delete without confirm_all");
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::ConfirmationRequired,
            "No filter given: set confirm_all to delete every visitor",
        ));
    }

    let backup = auto_backup_name(&ctx);
    Ok(match ctx.storage().delete_visitors_by_criteria(&filter).await {
        Ok(deleted) => {
            info!("Admin API: deleted {} visitors ({:?})", deleted, filter);
            success_response(DeleteResponse { deleted, backup })
        }
        Err(e) => error_from_app(&e),
    })
}

fn visitor_not_found(id: i64) -> HttpResponse {
    error_response(
        StatusCode::NOT_FOUND,
        ErrorCode::VisitorNotFound,
        &format!("Visitor not found: {}", id),
    )
}
