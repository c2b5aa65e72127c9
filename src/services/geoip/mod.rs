//! GeoIP 服务模块
//!
//! 访问记录的 country 字段来自这里，支持：
//! - MaxMind GeoLite2 本地数据库
//! - 外部 API (ip-api.com)
//!
//! 任何失败都不会中断访问记录，调用方拿到的是 "Unknown"

mod external_api;
mod maxmind;
mod provider;

pub use external_api::ExternalApiProvider;
pub use maxmind::MaxMindProvider;
pub use provider::{GeoInfo, GeoIpLookup, GeoIpProvider};
