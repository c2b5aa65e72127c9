//! 访问日志 CSV 导出

use std::sync::Arc;

use tracing::debug;

use crate::errors::{LinkTrackerError, Result};
use crate::storage::{SeaOrmStorage, Visit};

/// 固定表头，没有数据时也会写出
pub const CSV_HEADER: [&str; 10] = [
    "ID",
    "Link ID",
    "IP",
    "Country",
    "Platform",
    "Browser",
    "Referrer",
    "Latitude",
    "Longitude",
    "Timestamp",
];

pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

pub struct ExportService {
    storage: Arc<SeaOrmStorage>,
}

impl ExportService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// 导出该链接的全部访问记录（按 id 升序）
    pub async fn export_csv(&self, link_id: &str) -> Result<Vec<u8>> {
        let visits = self.storage.all_visits(link_id).await?;
        debug!("Exporting {} visits of {}", visits.len(), link_id);
        visits_to_csv(&visits)
    }
}

/// 下载文件名
pub fn csv_filename(link_id: &str) -> String {
    format!("{}_logs.csv", link_id)
}

/// 序列化访问记录：空字段写成空单元格，时间为 RFC 3339
pub fn visits_to_csv(visits: &[Visit]) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(CSV_HEADER)?;

    for visit in visits {
        wtr.write_record([
            visit.id.to_string(),
            visit.link_id.clone(),
            visit.ip.clone().unwrap_or_default(),
            visit.country.clone().unwrap_or_default(),
            visit.platform.clone().unwrap_or_default(),
            visit.browser.clone().unwrap_or_default(),
            visit.referrer.clone().unwrap_or_default(),
            visit.latitude.map(|v| v.to_string()).unwrap_or_default(),
            visit.longitude.map(|v| v.to_string()).unwrap_or_default(),
            visit.timestamp.to_rfc3339(),
        ])?;
    }

    wtr.into_inner()
        .map_err(|e| LinkTrackerError::serialization(format!("CSV flush failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn visit(id: i64, referrer: Option<&str>, coords: Option<(f64, f64)>) -> Visit {
        Visit {
            id,
            link_id: "0a1b2c3d".to_string(),
            ip: Some("203.0.113.1".to_string()),
            country: Some("FR".to_string()),
            platform: Some("Linux".to_string()),
            browser: Some("Firefox".to_string()),
            referrer: referrer.map(String::from),
            latitude: coords.map(|c| c.0),
            longitude: coords.map(|c| c.1),
            timestamp: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_empty_export_has_header_only() {
        let bytes = visits_to_csv(&[]).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "ID,Link ID,IP,Country,Platform,Browser,Referrer,Latitude,Longitude,Timestamp\n"
        );
    }

    #[test]
    fn test_rows_and_null_cells() {
        let bytes = visits_to_csv(&[
            visit(1, None, None),
            visit(2, Some("https://a.example/?q=1,2"), Some((12.3, 45.6))),
        ])
        .unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "1,0a1b2c3d,203.0.113.1,FR,Linux,Firefox,,,,2025-03-01T12:00:00+00:00"
        );
        // 含逗号的字段被引号包裹
        assert_eq!(
            lines[2],
            "2,0a1b2c3d,203.0.113.1,FR,Linux,Firefox,\"https://a.example/?q=1,2\",12.3,45.6,2025-03-01T12:00:00+00:00"
        );
    }

    #[test]
    fn test_csv_filename() {
        assert_eq!(csv_filename("0a1b2c3d"), "0a1b2c3d_logs.csv");
    }
}
