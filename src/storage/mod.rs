use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::errors::Result;

pub mod backend;
pub mod models;

pub use backend::SeaOrmStorage;
pub use models::{Link, Location, NewVisit, StorageConfig, UNKNOWN, Visit, VisitGroup};

pub struct StorageFactory;

impl StorageFactory {
    /// 根据数据库配置创建存储（自动推断后端并运行迁移）
    pub async fn create(config: &DatabaseConfig) -> Result<Arc<SeaOrmStorage>> {
        let storage = SeaOrmStorage::new(config).await?;
        Ok(Arc::new(storage))
    }
}
