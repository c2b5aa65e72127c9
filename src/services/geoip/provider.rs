//! GeoIP Provider 抽象层
//!
//! 启动时根据配置选择实现：
//! 1. enable_geo_lookup = false → 不查询
//! 2. maxminddb_path 配置且可读 → MaxMindProvider
//! 3. 否则 → ExternalApiProvider

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::external_api::ExternalApiProvider;
use super::maxmind::MaxMindProvider;
use crate::config::AnalyticsConfig;
use crate::errors::{LinkTrackerError, Result};
use crate::storage::UNKNOWN;
use crate::utils::ip::{is_private_or_local, parse_ip};

/// 地理位置信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoInfo {
    /// ISO 3166-1 alpha-2 国家代码 (e.g., "CN", "US")
    pub country: Option<String>,
}

/// GeoIP 查询 trait
#[async_trait]
pub trait GeoIpLookup: Send + Sync {
    /// 查询 IP 地址的地理位置，失败返回 Geolocation 错误
    async fn lookup(&self, ip: &str) -> Result<GeoInfo>;

    /// 获取 provider 名称（用于日志）
    fn name(&self) -> &'static str;
}

/// 统一 GeoIP Provider
#[derive(Clone)]
pub struct GeoIpProvider {
    inner: Option<Arc<dyn GeoIpLookup>>,
}

impl GeoIpProvider {
    /// 根据 AnalyticsConfig 初始化
    pub fn new(config: &AnalyticsConfig) -> Self {
        if !config.enable_geo_lookup {
            info!("GeoIP: lookups disabled, every visit is recorded as {}", UNKNOWN);
            return Self::disabled();
        }

        let external = || {
            Arc::new(ExternalApiProvider::new(
                &config.geoip_api_url,
                config.geoip_timeout_secs,
            )) as Arc<dyn GeoIpLookup>
        };

        let inner = match config.maxminddb_path.as_deref() {
            Some(path) => match MaxMindProvider::new(path) {
                Ok(provider) => {
                    info!("GeoIP: Using MaxMind database at {}", path);
                    Arc::new(provider) as Arc<dyn GeoIpLookup>
                }
                Err(e) => {
                    warn!(
                        "GeoIP: Failed to load MaxMind database at {}: {}, falling back to external API",
                        path, e
                    );
                    external()
                }
            },
            None => {
                debug!("GeoIP: No MaxMind database configured, using external API");
                external()
            }
        };

        info!("GeoIP: Initialized with {} provider", inner.name());
        Self { inner: Some(inner) }
    }

    /// 使用自定义实现（测试或嵌入场景）
    pub fn from_lookup(lookup: Arc<dyn GeoIpLookup>) -> Self {
        Self {
            inner: Some(lookup),
        }
    }

    pub fn disabled() -> Self {
        Self { inner: None }
    }

    /// 查询 IP 地址的地理位置
    pub async fn lookup(&self, ip: &str) -> Result<GeoInfo> {
        match self.inner {
            Some(ref inner) => inner.lookup(ip).await,
            None => Err(LinkTrackerError::geolocation("GeoIP lookup is disabled")),
        }
    }

    /// 访问记录使用的国家代码，任何失败都返回 "Unknown"
    pub async fn lookup_country(&self, ip: Option<&str>) -> String {
        let Some(ip) = ip else {
            return UNKNOWN.to_string();
        };
        let Some(addr) = parse_ip(ip) else {
            debug!("GeoIP: unparsable client address {:?}", ip);
            return UNKNOWN.to_string();
        };
        if is_private_or_local(&addr) || addr.is_unspecified() {
            return UNKNOWN.to_string();
        }
        if self.inner.is_none() {
            return UNKNOWN.to_string();
        }

        match self.lookup(&addr.to_string()).await {
            Ok(GeoInfo {
                country: Some(country),
            }) if !country.is_empty() => country,
            Ok(_) => {
                debug!("GeoIP: no country for {}", ip);
                UNKNOWN.to_string()
            }
            Err(e) => {
                warn!("GeoIP lookup for {} failed: {}", ip, e);
                UNKNOWN.to_string()
            }
        }
    }

    /// 获取当前使用的 provider 名称
    pub fn provider_name(&self) -> &'static str {
        self.inner.as_ref().map(|i| i.name()).unwrap_or("Disabled")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedLookup {
        answer: Result<GeoInfo>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GeoIpLookup for FixedLookup {
        async fn lookup(&self, _ip: &str) -> Result<GeoInfo> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer.clone()
        }

        fn name(&self) -> &'static str {
            "Fixed"
        }
    }

    fn provider_with(answer: Result<GeoInfo>) -> (GeoIpProvider, Arc<FixedLookup>) {
        let lookup = Arc::new(FixedLookup {
            answer,
            calls: AtomicUsize::new(0),
        });
        (GeoIpProvider::from_lookup(lookup.clone()), lookup)
    }

    #[tokio::test]
    async fn test_country_from_lookup() {
        let (provider, _) = provider_with(Ok(GeoInfo {
            country: Some("NL".to_string()),
        }));
        assert_eq!(provider.lookup_country(Some("203.0.113.5")).await, "NL");
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_unknown() {
        let (provider, _) = provider_with(Err(LinkTrackerError::geolocation("timeout")));
        assert_eq!(provider.lookup_country(Some("203.0.113.5")).await, "Unknown");

        let (provider, _) = provider_with(Ok(GeoInfo { country: None }));
        assert_eq!(provider.lookup_country(Some("203.0.113.5")).await, "Unknown");
    }

    #[tokio::test]
    async fn test_private_and_missing_ips_skip_lookup() {
        let (provider, lookup) = provider_with(Ok(GeoInfo {
            country: Some("US".to_string()),
        }));

        assert_eq!(provider.lookup_country(None).await, "Unknown");
        assert_eq!(provider.lookup_country(Some("not-an-ip")).await, "Unknown");
        assert_eq!(provider.lookup_country(Some("192.168.1.10")).await, "Unknown");
        assert_eq!(provider.lookup_country(Some("::1")).await, "Unknown");
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_disabled_provider() {
        let provider = GeoIpProvider::disabled();
        assert_eq!(provider.provider_name(), "Disabled");
        assert_eq!(provider.lookup_country(Some("8.8.8.8")).await, "Unknown");
        assert!(provider.lookup("8.8.8.8").await.is_err());
    }

    #[test]
    fn test_new_respects_disable_flag() {
        let config = AnalyticsConfig {
            enable_geo_lookup: false,
            ..AnalyticsConfig::default()
        };
        assert_eq!(GeoIpProvider::new(&config).provider_name(), "Disabled");
    }

    #[test]
    fn test_missing_maxmind_file_falls_back_to_external() {
        let config = AnalyticsConfig {
            maxminddb_path: Some("/nonexistent/GeoLite2-Country.mmdb".to_string()),
            ..AnalyticsConfig::default()
        };
        assert_eq!(GeoIpProvider::new(&config).provider_name(), "ExternalAPI");
    }
}
