use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// country / platform / browser 的缺省值
pub const UNKNOWN: &str = "Unknown";

/// 追踪链接
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: String,
    pub target_url: String,
    pub created_at: DateTime<Utc>,
}

/// 一次访问记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    pub id: i64,
    pub link_id: String,
    pub ip: Option<String>,
    pub country: Option<String>,
    pub platform: Option<String>,
    pub browser: Option<String>,
    pub referrer: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

/// 待写入的访问记录（坐标初始为空）
#[derive(Debug, Clone)]
pub struct NewVisit {
    pub link_id: String,
    pub ip: Option<String>,
    pub country: String,
    pub platform: String,
    pub browser: String,
    pub referrer: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// 单个 (country, platform, browser, latitude, longitude) 组合的访问计数
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisitGroup {
    pub country: Option<String>,
    pub platform: Option<String>,
    pub browser: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub total_clicks: u64,
    pub unique_visitors: u64,
}

/// 链接最近一次访问的坐标（回填前为空）
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StorageConfig {
    pub storage_type: String,
}
