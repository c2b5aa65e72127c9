//! SeaOrmStorage 的链接表操作

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use tracing::debug;

use super::SeaOrmStorage;
use super::converters::{link_to_active_model, model_to_link};
use crate::errors::{LinkTrackerError, Result};
use crate::storage::models::Link;

use migration::entities::link;

impl SeaOrmStorage {
    /// 插入新链接（id 冲突时返回错误，由调用方决定是否重试）
    pub async fn insert_link(&self, new_link: &Link) -> Result<()> {
        link::Entity::insert(link_to_active_model(new_link))
            .exec(&self.db)
            .await
            .map_err(|e| {
                LinkTrackerError::database_operation(format!(
                    "Failed to insert link '{}': {}",
                    new_link.id, e
                ))
            })?;

        debug!("Link inserted: {} -> {}", new_link.id, new_link.target_url);
        Ok(())
    }

    pub async fn get_link(&self, id: &str) -> Result<Option<Link>> {
        let model = link::Entity::find_by_id(id.to_string()).one(&self.db).await?;
        Ok(model.map(model_to_link))
    }

    pub async fn link_exists(&self, id: &str) -> Result<bool> {
        let count = link::Entity::find()
            .filter(link::Column::Id.eq(id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    pub async fn count_links(&self) -> Result<u64> {
        Ok(link::Entity::find().count(&self.db).await?)
    }
}
