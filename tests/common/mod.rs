//! Shared helpers for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use linktracker::config::{DatabaseConfig, StaticConfig};
use linktracker::errors::{LinkTrackerError, Result};
use linktracker::runtime::lifetime::StartupContext;
use linktracker::services::{GeoInfo, GeoIpLookup, GeoIpProvider};
use linktracker::storage::{SeaOrmStorage, StorageFactory};
use tempfile::TempDir;

pub const CHROME_WINDOWS_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// 创建临时 SQLite 数据库的存储实例（已运行迁移）
///
/// TempDir 必须在测试期间保持存活
pub async fn create_temp_storage() -> (Arc<SeaOrmStorage>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");

    let config = DatabaseConfig {
        database_url: format!("sqlite://{}", db_path.display()),
        ..DatabaseConfig::default()
    };

    let storage = StorageFactory::create(&config)
        .await
        .expect("Failed to create storage");

    (storage, temp_dir)
}

/// 服务全部就绪的上下文，GeoIP 使用给定的实现
pub async fn create_context(geoip: GeoIpProvider) -> (StartupContext, TempDir) {
    let (storage, temp_dir) = create_temp_storage().await;
    let context = StartupContext::build(storage, geoip, &StaticConfig::default());
    (context, temp_dir)
}

/// 总是失败的 GeoIP 实现
pub struct FailingLookup;

#[async_trait]
impl GeoIpLookup for FailingLookup {
    async fn lookup(&self, _ip: &str) -> Result<GeoInfo> {
        Err(LinkTrackerError::geolocation("lookup service unreachable"))
    }

    fn name(&self) -> &'static str {
        "Failing"
    }
}

/// 总是返回固定国家的 GeoIP 实现
pub struct FixedCountry(pub &'static str);

#[async_trait]
impl GeoIpLookup for FixedCountry {
    async fn lookup(&self, _ip: &str) -> Result<GeoInfo> {
        Ok(GeoInfo {
            country: Some(self.0.to_string()),
        })
    }

    fn name(&self) -> &'static str {
        "Fixed"
    }
}

pub fn failing_geoip() -> GeoIpProvider {
    GeoIpProvider::from_lookup(Arc::new(FailingLookup))
}

pub fn fixed_geoip(country: &'static str) -> GeoIpProvider {
    GeoIpProvider::from_lookup(Arc::new(FixedCountry(country)))
}
