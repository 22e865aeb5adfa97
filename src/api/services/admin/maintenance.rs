//! Admin API 数据维护

use actix_web::{Responder, Result as ActixResult, web};
use tracing::warn;

use crate::api::AppContext;

use super::auto_backup_name;
use super::helpers::{error_from_app, success_message};
use super::types::DeleteResponse;

/// 清空访客与页面，总浏览量归零
pub async fn reset_all_data(ctx: web::Data<AppContext>) -> ActixResult<impl Responder> {
    let backup = auto_backup_name(&ctx);
    let storage = ctx.storage();

    let removed = match storage.summary().await {
        Ok(summary) => summary.visitor_count + summary.page_count,
        Err(e) => return Ok(error_from_app(&e)),
    };

    Ok(match storage.reset_all_data().await {
        Ok(_) => {
            warn!("Admin API: all analytics data reset (backup: {:?})", backup);
            success_message(
                "All data reset",
                DeleteResponse {
                    deleted: removed,
                    backup,
                },
            )
        }
        Err(e) => error_from_app(&e),
    })
}
