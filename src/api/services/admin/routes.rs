//! Admin API 路由配置

use actix_web::web;

use super::backups::{cleanup_backups, create_backup, delete_backup, list_backups, restore_backup};
use super::maintenance::reset_all_data;
use super::pages::{delete_page, delete_pages, get_page, update_page};
use super::visitors::{
    delete_visitor, delete_visitors, get_visitor, get_visitor_stats, update_visitor,
};

/// 访客管理路由 `/visitors`
///
/// - GET /visitors/stats - 各维度分布
/// - POST /visitors/delete - 按条件批量删除
/// - GET/PUT/DELETE /visitors/{id}
pub fn visitors_routes() -> actix_web::Scope {
    web::scope("/visitors")
        // Fixed segments must be before /{id}
        .route("/stats", web::get().to(get_visitor_stats))
        .route("/delete", web::post().to(delete_visitors))
        .route("/{id}", web::get().to(get_visitor))
        .route("/{id}", web::put().to(update_visitor))
        .route("/{id}", web::delete().to(delete_visitor))
}

/// 页面管理路由 `/pages`
pub fn pages_routes() -> actix_web::Scope {
    web::scope("/pages")
        .route("/delete", web::post().to(delete_pages))
        .route("/{id}", web::get().to(get_page))
        .route("/{id}", web::put().to(update_page))
        .route("/{id}", web::delete().to(delete_page))
}

/// 备份路由 `/backups`
///
/// - GET /backups - 列表
/// - POST /backups - 创建
/// - POST /backups/cleanup?keep=N - 清理旧备份
/// - POST /backups/{name}/restore - 恢复
/// - DELETE /backups/{name} - 删除
pub fn backups_routes() -> actix_web::Scope {
    web::scope("/backups")
        .route("", web::get().to(list_backups))
        .route("", web::post().to(create_backup))
        .route("/cleanup", web::post().to(cleanup_backups))
        .route("/{name}/restore", web::post().to(restore_backup))
        .route("/{name}", web::delete().to(delete_backup))
}

/// Admin API v1 路由
pub fn admin_v1_routes() -> actix_web::Scope {
    web::scope("/v1")
        .service(visitors_routes())
        .service(pages_routes())
        .service(backups_routes())
        .route("/reset", web::post().to(reset_all_data))
}
