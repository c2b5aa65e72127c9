//! 访问记录服务
//!
//! 识别客户端、查询国家，每次访问写入一行 `logs`。
//! 追踪页随后回报该行的精确坐标。

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::geoip::GeoIpProvider;
use super::user_agent::{classify_browser, classify_platform};
use crate::errors::{LinkTrackerError, Result};
use crate::storage::{Link, Location, NewVisit, SeaOrmStorage};
use crate::utils::is_valid_link_id;

/// 一次 `/track/<id>` 访问的客户端信息
#[derive(Debug, Clone, Default)]
pub struct VisitRequest<'a> {
    pub ip: Option<&'a str>,
    pub user_agent: Option<&'a str>,
    pub referrer: Option<&'a str>,
}

/// 访问记录结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedVisit {
    pub visit_id: i64,
    pub link_id: String,
    pub target_url: String,
}

pub struct VisitService {
    storage: Arc<SeaOrmStorage>,
    geoip: GeoIpProvider,
}

impl VisitService {
    pub fn new(storage: Arc<SeaOrmStorage>, geoip: GeoIpProvider) -> Self {
        Self { storage, geoip }
    }

    /// 记录 `link_id` 的一次访问
    ///
    /// 未知链接返回 `LinkNotFound`，不写入任何数据。
    /// GeoIP 失败不影响记录，country 记为 "Unknown"。
    pub async fn record_visit(
        &self,
        link_id: &str,
        request: VisitRequest<'_>,
    ) -> Result<RecordedVisit> {
        let link = self
            .find_link(link_id)
            .await?
            .ok_or_else(|| LinkTrackerError::link_not_found(format!("Link not found: {}", link_id)))?;

        let platform = classify_platform(request.user_agent);
        let browser = classify_browser(request.user_agent);
        let country = self.geoip.lookup_country(request.ip).await;

        let visit = NewVisit {
            link_id: link.id.clone(),
            ip: request.ip.map(String::from),
            country,
            platform: platform.to_string(),
            browser: browser.to_string(),
            referrer: request.referrer.map(String::from),
            timestamp: Utc::now(),
        };

        let visit_id = self.storage.insert_visit(&visit).await?;
        info!(
            "Visit {} on {}: country={}, platform={}, browser={}",
            visit_id, link.id, visit.country, visit.platform, visit.browser
        );

        Ok(RecordedVisit {
            visit_id,
            link_id: link.id,
            target_url: link.target_url,
        })
    }

    /// 保存追踪页回报的坐标
    ///
    /// 覆盖之前的值，重复调用结果相同。
    pub async fn update_visit_coordinates(
        &self,
        link_id: &str,
        visit_id: i64,
        latitude: f64,
        longitude: f64,
    ) -> Result<()> {
        validate_coordinates(latitude, longitude)?;

        if !is_valid_link_id(link_id) || !self.storage.link_exists(link_id).await? {
            return Err(LinkTrackerError::link_not_found(format!(
                "Link not found: {}",
                link_id
            )));
        }

        self.storage
            .update_visit_coordinates(link_id, visit_id, latitude, longitude)
            .await?;
        debug!(
            "Visit {} on {} located at ({}, {})",
            visit_id, link_id, latitude, longitude
        );
        Ok(())
    }

    /// 最近一次访问的坐标；从未被访问时为 `None`
    pub async fn latest_location(&self, link_id: &str) -> Result<Option<Location>> {
        if !is_valid_link_id(link_id) {
            return Ok(None);
        }
        self.storage.latest_location(link_id).await
    }

    async fn find_link(&self, link_id: &str) -> Result<Option<Link>> {
        if !is_valid_link_id(link_id) {
            return Ok(None);
        }
        self.storage.get_link(link_id).await
    }
}

/// 纬度 [-90, 90]，经度 [-180, 180]，且都是有限值
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(LinkTrackerError::validation(format!(
            "Latitude out of range: {}",
            latitude
        )));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(LinkTrackerError::validation(format!(
            "Longitude out of range: {}",
            longitude
        )));
    }
    Ok(())
}
