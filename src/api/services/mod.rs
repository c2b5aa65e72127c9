//! HTTP 处理器
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | GET | `/` | [`HomeService::index`] |
//! | POST | `/create` | [`LinkHandlers::create_link`] |
//! | GET / POST | `/track/{link_id}` | [`TrackService`] |
//! | GET | `/show_map/{link_id}` | [`MapService::show_map`] |
//! | GET | `/stats/{link_id}` | [`StatsPage::show_stats`]（需凭证） |
//! | GET | `/export/{link_id}/csv` | [`ExportHandler::export_csv`]（需凭证） |
//! | GET | `/health` | [`HealthService::health_check`] |

pub mod export;
pub mod health;
pub mod home;
pub mod links;
pub mod map;
pub mod stats;
pub mod track;

use actix_web::web;

use crate::api::middleware::LinkAccessGuard;
use crate::config::StaticConfig;

pub use export::ExportHandler;
pub use health::{AppStartTime, HealthService};
pub use home::HomeService;
pub use links::LinkHandlers;
pub use map::MapService;
pub use stats::StatsPage;
pub use track::TrackService;

/// 所有 worker 共享的请求处理配置
#[derive(Clone, Debug)]
pub struct TrackerSettings {
    pub trusted_proxies: Vec<String>,
    pub cookie_max_age_secs: i64,
}

impl TrackerSettings {
    pub fn from_config(config: &StaticConfig) -> Self {
        Self {
            trusted_proxies: config.server.trusted_proxies.clone(),
            cookie_max_age_secs: config.links.cookie_max_age_secs,
        }
    }
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self::from_config(&StaticConfig::default())
    }
}

/// 注册全部路由
pub fn tracker_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(HomeService::index))
        .route("/create", web::post().to(LinkHandlers::create_link))
        .service(
            web::resource("/track/{link_id}")
                .route(web::get().to(TrackService::track_visit))
                .route(web::post().to(TrackService::report_location)),
        )
        .route("/show_map/{link_id}", web::get().to(MapService::show_map))
        .service(
            web::resource("/stats/{link_id}")
                .wrap(LinkAccessGuard)
                .route(web::get().to(StatsPage::show_stats)),
        )
        .service(
            web::resource("/export/{link_id}/csv")
                .wrap(LinkAccessGuard)
                .route(web::get().to(ExportHandler::export_csv)),
        )
        .route("/health", web::get().to(HealthService::health_check));
}
