//! 业务逻辑服务层
//!
//! `api::services` 里的 handler 只负责提取请求数据，
//! 校验和存储访问都在这里完成。

mod export_service;
pub mod geoip;
mod link_service;
mod stats_service;
pub mod user_agent;
mod visit_service;

pub use export_service::*;
pub use geoip::{GeoInfo, GeoIpLookup, GeoIpProvider};
pub use link_service::*;
pub use stats_service::*;
pub use visit_service::*;
