//! 每次访问追踪链接对应一行

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// 逻辑关联 links.id（无外键）
    pub link_id: String,
    pub ip: Option<String>,
    pub country: Option<String>,
    pub platform: Option<String>,
    pub browser: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub referrer: Option<String>,
    /// 仅由坐标回填写入，与 longitude 一起更新
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timestamp: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
