//! 单个链接的访问统计

use std::sync::Arc;

use crate::errors::Result;
use crate::storage::{SeaOrmStorage, Visit, VisitGroup};

pub struct StatsService {
    storage: Arc<SeaOrmStorage>,
    recent_limit: u64,
}

impl StatsService {
    pub fn new(storage: Arc<SeaOrmStorage>, recent_limit: u64) -> Self {
        Self {
            storage,
            recent_limit,
        }
    }

    /// 按 (country, platform, browser, latitude, longitude) 分组，
    /// 点击数多的组在前
    pub async fn get_stats(&self, link_id: &str) -> Result<Vec<VisitGroup>> {
        self.storage.grouped_stats(link_id).await
    }

    /// 最近的访问记录（新的在前），`None` 时使用配置的条数
    pub async fn get_recent_logs(&self, link_id: &str, limit: Option<u64>) -> Result<Vec<Visit>> {
        self.storage
            .recent_visits(link_id, limit.unwrap_or(self.recent_limit))
            .await
    }

    /// 该链接的访问总数
    pub async fn total_clicks(&self, link_id: &str) -> Result<u64> {
        self.storage.count_visits(link_id).await
    }

    pub fn recent_limit(&self) -> u64 {
        self.recent_limit
    }
}
