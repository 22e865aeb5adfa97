//! Server mode
//!
//! Configures and starts the HTTP server with the public, health and
//! admin routes.

use std::time::Duration;

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::Result;
use tracing::warn;

use crate::api::AppContext;
use crate::api::constants::{ADMIN_PREFIX, MAX_PAYLOAD_BYTES};
use crate::api::middleware::AdminAuth;
use crate::api::services::admin::{
    json_error_handler, path_error_handler, query_error_handler, routes::admin_v1_routes,
};
use crate::api::services::{AppStartTime, health_routes, public_routes};
use crate::config::get_config;
use crate::runtime::lifetime;

/// Build CORS middleware from the configured origin list
///
/// An empty list keeps the browser's same-origin policy, `"*"` allows any
/// origin.
pub fn build_cors_middleware(allowed_origins: &[String]) -> Cors {
    if allowed_origins.is_empty() {
        return Cors::default();
    }

    let mut cors = if allowed_origins.iter().any(|o| o == "*") {
        Cors::default().allow_any_origin()
    } else {
        allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors = cors.allow_any_method().allow_any_header().max_age(3600);
    cors
}

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    let startup = lifetime::startup::prepare_server_startup()
        .await
        .map_err(|e| {
            tracing::error!("Server startup failed: {}", e);
            e
        })?;

    let config = get_config();
    let ctx = web::Data::new(AppContext::new(
        startup.storage,
        startup.backup,
        config.backup.keep_count,
    ));

    let admin_token = config.api.admin_token.clone();
    let cors_origins = config.api.cors_allowed_origins.clone();

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let server_ctx = ctx.clone();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(build_cors_middleware(&cors_origins))
            .wrap(Compress::default())
            .wrap(DefaultHeaders::new().add(("Cache-Control", "no-cache, no-store, must-revalidate")))
            .app_data(server_ctx.clone())
            .app_data(web::Data::new(app_start_time.clone()))
            .app_data(
                web::JsonConfig::default()
                    .limit(MAX_PAYLOAD_BYTES)
                    .error_handler(json_error_handler),
            )
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .service(
                web::scope(ADMIN_PREFIX)
                    .wrap(AdminAuth::new(admin_token.clone()))
                    .service(admin_v1_routes()),
            )
            .service(health_routes())
            .configure(public_routes)
    })
    .keep_alive(Duration::from_secs(30))
    .client_request_timeout(Duration::from_millis(5000))
    .client_disconnect_timeout(Duration::from_millis(1000))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    let server = server.bind(&bind_address)?.run();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(&ctx) => {
            warn!("Graceful shutdown: storage closed");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{HttpResponse, http::header, test};

    #[actix_rt::test]
    async fn test_cors_wildcard_echoes_any_origin() {
        let app = test::init_service(
            App::new()
                .wrap(build_cors_middleware(&["*".to_string()]))
                .route("/", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((header::ORIGIN, "http://example.org"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(
            resp.headers()
                .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        );
    }

    #[actix_rt::test]
    async fn test_cors_listed_origin_only() {
        let app = test::init_service(
            App::new()
                .wrap(build_cors_middleware(&["http://allowed.test".to_string()]))
                .route("/", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((header::ORIGIN, "http://allowed.test"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some("http://allowed.test")
        );
    }
}
