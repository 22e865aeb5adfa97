//! Admin API 备份管理

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, Result as ActixResult, web};
use tracing::{error, info, warn};

use crate::api::AppContext;

use super::error_code::ErrorCode;
use super::helpers::{error_response, success_message, success_response};
use super::types::{BackupResponse, CleanupQuery, CleanupResponse, CreateBackupRequest};

pub async fn list_backups(ctx: web::Data<AppContext>) -> ActixResult<impl Responder> {
    let backups: Vec<BackupResponse> = ctx
        .backup()
        .list_backups()
        .into_iter()
        .map(BackupResponse::from)
        .collect();
    Ok(success_response(backups))
}

/// 创建备份，未提供名称时使用时间戳命名
pub async fn create_backup(
    payload: Option<web::Json<CreateBackupRequest>>,
    ctx: web::Data<AppContext>,
) -> ActixResult<impl Responder> {
    let name = payload.and_then(|p| p.into_inner().name);
    let name = name.as_deref().map(str::trim).filter(|n| !n.is_empty());

    let manager = ctx.backup();
    let created = manager
        .create_backup(name)
        .and_then(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
        .and_then(|name| manager.list_backups().into_iter().find(|b| b.name == name));

    Ok(match created {
        Some(info) => success_message("Backup created", BackupResponse::from(info)),
        None => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::BackupFailed,
            "Backup could not be created",
        ),
    })
}

/// 只保留最新的 N 个备份
pub async fn cleanup_backups(
    query: web::Query<CleanupQuery>,
    ctx: web::Data<AppContext>,
) -> ActixResult<impl Responder> {
    let keep = query.keep.unwrap_or_else(|| ctx.keep_count());
    let removed = ctx.backup().cleanup_old_backups(keep);
    let kept = ctx.backup().list_backups().len();
    Ok(success_response(CleanupResponse { removed, kept }))
}

/// 从备份恢复数据文件，然后重新连接存储
pub async fn restore_backup(
    path: web::Path<String>,
    ctx: web::Data<AppContext>,
) -> ActixResult<impl Responder> {
    let name = path.into_inner();
    let manager = ctx.backup();
    let Some(backup_path) = manager.resolve(&name) else {
        return Ok(backup_not_found(&name));
    };

    if !manager.restore_backup(&backup_path) {
        return Ok(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::RestoreFailed,
            &format!("Failed to restore backup: {}", name),
        ));
    }

    if let Err(e) = ctx.reconnect().await {
        error!("Storage reconnect after restore failed: {}", e);
        return Ok(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::RestoreFailed,
            &format!("Backup restored but storage could not reconnect: {}", e),
        ));
    }

    warn!("Admin API: data restored from backup {}", name);
    Ok(success_message("Backup restored", name))
}

pub async fn delete_backup(
    path: web::Path<String>,
    ctx: web::Data<AppContext>,
) -> ActixResult<impl Responder> {
    let name = path.into_inner();
    let manager = ctx.backup();
    let Some(backup_path) = manager.resolve(&name) else {
        return Ok(backup_not_found(&name));
    };

    Ok(if manager.delete_backup(&backup_path) {
        info!("Admin API: backup {} deleted", name);
        success_message("Backup deleted", name)
    } else {
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::BackupFailed,
            &format!("Failed to delete backup: {}", name),
        )
    })
}

fn backup_not_found(name: &str) -> HttpResponse {
    error_response(
        StatusCode::NOT_FOUND,
        ErrorCode::BackupNotFound,
        &format!("Backup not found: {}", name),
    )
}
