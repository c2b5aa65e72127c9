//! 外部 GeoIP API 实现
//!
//! 使用外部 HTTP API 进行 IP 地理位置查询（如 ip-api.com）
//! 内置 Moka 缓存 + Singleflight 语义，失败结果同样缓存

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::trace;
use ureq::Agent;

use super::provider::{GeoInfo, GeoIpLookup};
use crate::errors::{LinkTrackerError, Result};

/// GeoIP 缓存 TTL（15 分钟）
const GEOIP_CACHE_TTL_SECS: u64 = 15 * 60;
/// GeoIP 缓存最大容量
const GEOIP_CACHE_MAX_CAPACITY: u64 = 10_000;

/// 外部 API GeoIP Provider
///
/// 内置 Moka 缓存：
/// - 最大 10000 条，TTL 15 分钟
/// - Singleflight：同一 IP 的并发请求只发一次 HTTP
/// - 失败结果也缓存，避免对不可达的 API 反复等待超时
pub struct ExternalApiProvider {
    api_url_template: String,
    agent: Agent,
    cache: Cache<String, Result<GeoInfo>>,
}

impl ExternalApiProvider {
    /// 创建外部 API Provider
    ///
    /// `api_url_template` 使用 `{ip}` 作为占位符
    /// 例如: `http://ip-api.com/json/{ip}?fields=status,countryCode`
    pub fn new(api_url_template: &str, timeout_secs: u64) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(timeout_secs.max(1))))
            .build()
            .into();

        let cache = Cache::builder()
            .time_to_live(Duration::from_secs(GEOIP_CACHE_TTL_SECS))
            .max_capacity(GEOIP_CACHE_MAX_CAPACITY)
            .build();

        Self {
            api_url_template: api_url_template.to_string(),
            agent,
            cache,
        }
    }

    fn request_url(&self, ip: &str) -> String {
        self.api_url_template.replace("{ip}", ip)
    }

    /// 同步请求（在 spawn_blocking 中调用）
    fn fetch_from_api_sync(agent: Agent, url: String) -> Result<GeoInfo> {
        let resp = agent.get(&url).call().map_err(|e| {
            LinkTrackerError::geolocation(format!("request to \"{}\" failed: {}", url, e))
        })?;

        let json: serde_json::Value = resp.into_body().read_json().map_err(|e| {
            LinkTrackerError::geolocation(format!("response from \"{}\" unreadable: {}", url, e))
        })?;

        parse_api_response(&json)
    }

    async fn fetch_from_api(&self, ip: &str) -> Result<GeoInfo> {
        let url = self.request_url(ip);
        let agent = self.agent.clone();

        tokio::task::spawn_blocking(move || Self::fetch_from_api_sync(agent, url))
            .await
            .map_err(|e| LinkTrackerError::geolocation(format!("lookup task failed: {}", e)))?
    }
}

/// 解析 API 响应
///
/// ip-api.com: `{"status":"success","countryCode":"CN"}`，失败时 `{"status":"fail",...}`；
/// 也接受其他服务常见的 `country_code` / `country` 字段
fn parse_api_response(json: &serde_json::Value) -> Result<GeoInfo> {
    if json["status"].as_str() == Some("fail") {
        let reason = json["message"].as_str().unwrap_or("unknown reason");
        return Err(LinkTrackerError::geolocation(format!(
            "API returned fail status: {}",
            reason
        )));
    }

    let country = json["countryCode"]
        .as_str()
        .or_else(|| json["country_code"].as_str())
        .or_else(|| json["country"].as_str())
        .map(String::from);

    trace!("External API lookup: country={:?}", country);
    Ok(GeoInfo { country })
}

#[async_trait]
impl GeoIpLookup for ExternalApiProvider {
    async fn lookup(&self, ip: &str) -> Result<GeoInfo> {
        self.cache
            .get_with(ip.to_string(), async {
                trace!("GeoIP cache miss for {}, fetching from API", ip);
                self.fetch_from_api(ip).await
            })
            .await
    }

    fn name(&self) -> &'static str {
        "ExternalAPI"
    }
}
