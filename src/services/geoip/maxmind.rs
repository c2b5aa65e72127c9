//! MaxMind GeoLite2 数据库实现
//!
//! 使用本地 GeoLite2-Country.mmdb / GeoLite2-City.mmdb 文件查询国家代码

use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use maxminddb::Reader;
use tracing::trace;

use super::provider::{GeoInfo, GeoIpLookup};
use crate::errors::{LinkTrackerError, Result};

/// MaxMind 本地数据库 Provider
pub struct MaxMindProvider {
    reader: Arc<Reader<Vec<u8>>>,
}

impl MaxMindProvider {
    /// 从文件路径创建 MaxMind Provider
    pub fn new(path: &str) -> std::result::Result<Self, maxminddb::MaxMindDbError> {
        let reader = Reader::open_readfile(path)?;
        Ok(Self {
            reader: Arc::new(reader),
        })
    }
}

#[async_trait]
impl GeoIpLookup for MaxMindProvider {
    async fn lookup(&self, ip: &str) -> Result<GeoInfo> {
        let ip_addr: IpAddr = ip
            .parse()
            .map_err(|_| LinkTrackerError::geolocation(format!("invalid IP address: {}", ip)))?;

        let result = self
            .reader
            .lookup(ip_addr)
            .map_err(|e| LinkTrackerError::geolocation(format!("MaxMind lookup failed: {}", e)))?;

        // Country 结构同时适用于 Country 与 City 数据库
        let record: Option<maxminddb::geoip2::Country> = result
            .decode()
            .map_err(|e| LinkTrackerError::geolocation(format!("MaxMind decode failed: {}", e)))?;

        let country = record.and_then(|r| r.country.iso_code.map(String::from));
        trace!("MaxMind lookup for {}: country={:?}", ip, country);

        Ok(GeoInfo { country })
    }

    fn name(&self) -> &'static str {
        "MaxMind"
    }
}
