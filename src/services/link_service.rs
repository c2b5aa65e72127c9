//! 链接注册服务
//!
//! 为新的追踪链接分配短 id，并把 id 解析回跳转目标

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::config::LinksConfig;
use crate::errors::{LinkTrackerError, Result};
use crate::storage::{Link, SeaOrmStorage};
use crate::utils::{generate_link_id, is_valid_link_id};
use crate::utils::url_validator::validate_target_url;

/// 未指定目标时的默认跳转地址
pub fn default_target_url(link_id: &str) -> String {
    format!("/show_map/{}", link_id)
}

/// 链接注册相关操作
pub struct LinkService {
    storage: Arc<SeaOrmStorage>,
    config: LinksConfig,
}

impl LinkService {
    pub fn new(storage: Arc<SeaOrmStorage>, config: LinksConfig) -> Self {
        Self { storage, config }
    }

    /// 创建追踪链接
    ///
    /// 目标为空时使用该链接自己的地图页。
    /// 候选 id 与存储中已有的比对，冲突则重新生成，
    /// 最多尝试 `id_max_attempts` 次。
    pub async fn create_link(&self, target_url: Option<&str>) -> Result<Link> {
        let target = target_url.map(str::trim).filter(|t| !t.is_empty());
        if let Some(target) = target {
            validate_target_url(target)?;
        }

        let attempts = self.config.id_max_attempts.max(1);
        for attempt in 1..=attempts {
            let id = generate_link_id();

            if self.storage.link_exists(&id).await? {
                warn!(
                    "Link id collision on {} (attempt {}/{})",
                    id, attempt, attempts
                );
                continue;
            }

            let link = Link {
                target_url: target
                    .map(String::from)
                    .unwrap_or_else(|| default_target_url(&id)),
                id,
                created_at: Utc::now(),
            };

            self.storage.insert_link(&link).await?;
            info!("Link created: {} -> {}", link.id, link.target_url);
            return Ok(link);
        }

        Err(LinkTrackerError::id_exhausted(format!(
            "Could not generate a unique link id after {} attempts",
            attempts
        )))
    }

    /// 链接保存的跳转目标
    pub async fn resolve_link(&self, link_id: &str) -> Result<String> {
        self.get_link(link_id).await.map(|link| link.target_url)
    }

    /// 形状不对的 id 直接返回 `LinkNotFound`，不查询存储
    pub async fn get_link(&self, link_id: &str) -> Result<Link> {
        if !is_valid_link_id(link_id) {
            return Err(LinkTrackerError::link_not_found(format!(
                "Link not found: {}",
                link_id
            )));
        }

        self.storage
            .get_link(link_id)
            .await?
            .ok_or_else(|| LinkTrackerError::link_not_found(format!("Link not found: {}", link_id)))
    }
}
