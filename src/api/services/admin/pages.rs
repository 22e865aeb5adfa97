//! Admin API 页面管理

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, Result as ActixResult, web};
use tracing::{info, trace};

use crate::api::AppContext;
use crate::errors::AppError;

use super::auto_backup_name;
use super::error_code::ErrorCode;
use super::helpers::{api_result, error_from_app, error_response, success_response};
use super::types::{DeletePagesRequest, DeleteResponse, PagePayload};

pub async fn get_page(
    path: web::Path<i64>,
    ctx: web::Data<AppContext>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    trace!("Admin API: request page {}", id);

    Ok(match ctx.storage().get_page(id).await {
        Ok(Some(page)) => success_response(page),
        Ok(None) => page_not_found(id),
        Err(e) => error_from_app(&e),
    })
}

/// 修改页面名称与分类
pub async fn update_page(
    path: web::Path<i64>,
    payload: web::Json<PagePayload>,
    ctx: web::Data<AppContext>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    let (page_name, category) = match payload.validate() {
        Ok(valid) => valid,
        Err(e) => return Ok(error_from_app(&e)),
    };

    let storage = ctx.storage();
    Ok(match storage.update_page(id, &page_name, category).await {
        Ok(true) => {
            info!("Admin API: page {} updated", id);
            api_result(storage.get_page(id).await)
        }
        Ok(false) => page_not_found(id),
        // 改名撞上已有的 (page_name, category)
        Err(AppError::DatabaseOperation(msg)) if msg.contains("UNIQUE") => error_response(
            StatusCode::CONFLICT,
            ErrorCode::PageAlreadyExists,
            &format!("A page named '{}' already exists in {}", page_name, category),
        ),
        Err(e) => error_from_app(&e),
    })
}

pub async fn delete_page(
    path: web::Path<i64>,
    ctx: web::Data<AppContext>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    let storage = ctx.storage();

    // 先确认记录存在，未知 id 不产生备份
    match storage.get_page(id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(page_not_found(id)),
        Err(e) => return Ok(error_from_app(&e)),
    }

    let backup = auto_backup_name(&ctx);
    Ok(match storage.delete_page(id).await {
        Ok(true) => success_response(DeleteResponse { deleted: 1, backup }),
        Ok(false) => page_not_found(id),
        Err(e) => error_from_app(&e),
    })
}

/// 删除属于给定分类的所有页面
pub async fn delete_pages(
    payload: web::Json<DeletePagesRequest>,
    ctx: web::Data<AppContext>,
) -> ActixResult<impl Responder> {
    let categories = match payload.to_categories() {
        Ok(categories) => categories,
        Err(e) => return Ok(error_from_app(&e)),
    };

    let backup = if categories.is_empty() {
        None
    } else {
        auto_backup_name(&ctx)
    };

    Ok(
        match ctx.storage().delete_pages_by_categories(&categories).await {
            Ok(deleted) => success_response(DeleteResponse { deleted, backup }),
            Err(e) => error_from_app(&e),
        },
    )
}

fn page_not_found(id: i64) -> HttpResponse {
    error_response(
        StatusCode::NOT_FOUND,
        ErrorCode::PageNotFound,
        &format!("Page not found: {}", id),
    )
}
