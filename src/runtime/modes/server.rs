//! 服务器模式
//!
//! 根据启动上下文构建 actix-web 应用，运行到服务停止或收到 Ctrl+C。

use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use tracing::warn;

use crate::api::middleware::RequestIdMiddleware;
use crate::api::services::AppStartTime;
use crate::api::tracker_routes;
use crate::config::StaticConfig;
use crate::runtime::lifetime::{self, StartupContext};

/// JSON / 表单请求体上限
const MAX_PAYLOAD_BYTES: usize = 64 * 1024;

/// 注册共享状态与路由
///
/// 服务器与集成测试共用，保证两者的应用一致。
pub fn configure_app(
    context: &StartupContext,
    app_start_time: &AppStartTime,
) -> impl Fn(&mut web::ServiceConfig) + Clone + Send + 'static {
    let context = context.clone();
    let app_start_time = app_start_time.clone();

    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(context.storage.clone()))
            .app_data(web::Data::new(context.geoip.clone()))
            .app_data(web::Data::new(context.link_service.clone()))
            .app_data(web::Data::new(context.visit_service.clone()))
            .app_data(web::Data::new(context.stats_service.clone()))
            .app_data(web::Data::new(context.export_service.clone()))
            .app_data(web::Data::new(context.settings.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .app_data(web::JsonConfig::default().limit(MAX_PAYLOAD_BYTES))
            .app_data(web::FormConfig::default().limit(MAX_PAYLOAD_BYTES))
            .configure(tracker_routes);
    }
}

/// 启动 HTTP 服务器
///
/// **注意**：调用前必须先初始化日志系统
pub async fn run_server(config: &StaticConfig) -> Result<()> {
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    let context = lifetime::prepare_server_startup(config)
        .await
        .inspect_err(|e| tracing::error!("Server startup failed: {:#}", e))?;

    if context.settings.trusted_proxies.is_empty() {
        warn!(
            "Client IP: auto-detect mode. Connections from private IPs will use X-Forwarded-For. \
             Configure server.trusted_proxies to restrict this."
        );
    } else {
        warn!(
            "Client IP: trusted proxies configured: {:?}",
            context.settings.trusted_proxies
        );
    }

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let db_for_shutdown = context.storage.get_db().clone();
    let app_config = configure_app(&context, &app_start_time);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(Compress::default())
            .wrap(DefaultHeaders::new().add(("Cache-Control", "no-cache, no-store, must-revalidate")))
            .configure(app_config.clone())
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    let server = server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run();

    tokio::select! {
        res = server => {
            res.context("HTTP server error")?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(&db_for_shutdown) => {
            warn!("Graceful shutdown completed");
        }
    }

    Ok(())
}
