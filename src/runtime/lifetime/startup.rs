use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::api::TrackerSettings;
use crate::config::StaticConfig;
use crate::services::{ExportService, GeoIpProvider, LinkService, StatsService, VisitService};
use crate::storage::{SeaOrmStorage, StorageFactory};

/// HTTP worker 共享的全部状态
#[derive(Clone)]
pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub geoip: GeoIpProvider,
    pub link_service: Arc<LinkService>,
    pub visit_service: Arc<VisitService>,
    pub stats_service: Arc<StatsService>,
    pub export_service: Arc<ExportService>,
    pub settings: TrackerSettings,
}

impl StartupContext {
    /// 基于已有的存储实例组装各 service
    pub fn build(storage: Arc<SeaOrmStorage>, geoip: GeoIpProvider, config: &StaticConfig) -> Self {
        Self {
            link_service: Arc::new(LinkService::new(storage.clone(), config.links.clone())),
            visit_service: Arc::new(VisitService::new(storage.clone(), geoip.clone())),
            stats_service: Arc::new(StatsService::new(
                storage.clone(),
                config.links.recent_logs_limit,
            )),
            export_service: Arc::new(ExportService::new(storage.clone())),
            settings: TrackerSettings::from_config(config),
            storage,
            geoip,
        }
    }
}

/// 准备服务器启动的上下文：TLS provider、存储（含迁移）、GeoIP 与各 service
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    // ureq / sqlx 的 rustls 需要进程级 crypto provider；重复安装返回 Err，可忽略
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    let storage = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    info!(
        "Using storage backend: {}",
        storage.get_backend_config().storage_type
    );

    let geoip = GeoIpProvider::new(&config.analytics);
    let context = StartupContext::build(storage, geoip, config);

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );
    Ok(context)
}
