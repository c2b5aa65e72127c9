//! SeaOrmStorage 的访问日志操作
//!
//! 写入、坐标回填，以及地图页、统计页和导出用到的按链接查询。

use sea_orm::{
    ColumnTrait, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
    sea_query::{Expr, Func, SimpleExpr},
};
use tracing::debug;

use super::SeaOrmStorage;
use super::converters::{model_to_visit, new_visit_to_active_model};
use crate::errors::{LinkTrackerError, Result};
use crate::storage::models::{Location, NewVisit, Visit, VisitGroup};

use migration::entities::visit_log;

/// 分组统计查询结果行
#[derive(Debug, FromQueryResult)]
struct VisitGroupRow {
    country: Option<String>,
    platform: Option<String>,
    browser: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    total_clicks: i64,
    unique_visitors: i64,
}

impl From<VisitGroupRow> for VisitGroup {
    fn from(row: VisitGroupRow) -> Self {
        VisitGroup {
            country: row.country,
            platform: row.platform,
            browser: row.browser,
            latitude: row.latitude,
            longitude: row.longitude,
            total_clicks: row.total_clicks.max(0) as u64,
            unique_visitors: row.unique_visitors.max(0) as u64,
        }
    }
}

impl SeaOrmStorage {
    /// 写入一条访问记录，返回数据库分配的 id
    pub async fn insert_visit(&self, visit: &NewVisit) -> Result<i64> {
        let result = visit_log::Entity::insert(new_visit_to_active_model(visit))
            .exec(&self.db)
            .await
            .map_err(|e| {
                LinkTrackerError::database_operation(format!(
                    "Failed to insert visit for '{}': {}",
                    visit.link_id, e
                ))
            })?;

        debug!(
            "Visit {} recorded for link {}",
            result.last_insert_id, visit.link_id
        );
        Ok(result.last_insert_id)
    }

    /// 回填坐标，仅当 visit 属于该 link 时生效
    pub async fn update_visit_coordinates(
        &self,
        link_id: &str,
        visit_id: i64,
        latitude: f64,
        longitude: f64,
    ) -> Result<()> {
        let result = visit_log::Entity::update_many()
            .col_expr(visit_log::Column::Latitude, Expr::value(latitude))
            .col_expr(visit_log::Column::Longitude, Expr::value(longitude))
            .filter(visit_log::Column::Id.eq(visit_id))
            .filter(visit_log::Column::LinkId.eq(link_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(LinkTrackerError::visit_not_found(format!(
                "Visit {} not found for link {}",
                visit_id, link_id
            )));
        }

        debug!("Coordinates stored for visit {} ({})", visit_id, link_id);
        Ok(())
    }

    /// 最近一次访问的坐标（可能尚未回填）
    pub async fn latest_location(&self, link_id: &str) -> Result<Option<Location>> {
        let model = visit_log::Entity::find()
            .filter(visit_log::Column::LinkId.eq(link_id))
            .order_by_desc(visit_log::Column::Timestamp)
            .order_by_desc(visit_log::Column::Id)
            .one(&self.db)
            .await?;

        Ok(model.map(|m| Location {
            latitude: m.latitude,
            longitude: m.longitude,
            timestamp: m.timestamp,
        }))
    }

    /// 按时间倒序取最近的访问记录
    pub async fn recent_visits(&self, link_id: &str, limit: u64) -> Result<Vec<Visit>> {
        let models = visit_log::Entity::find()
            .filter(visit_log::Column::LinkId.eq(link_id))
            .order_by_desc(visit_log::Column::Timestamp)
            .order_by_desc(visit_log::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(model_to_visit).collect())
    }

    /// 该链接的全部访问记录，按 id 升序
    pub async fn all_visits(&self, link_id: &str) -> Result<Vec<Visit>> {
        let models = visit_log::Entity::find()
            .filter(visit_log::Column::LinkId.eq(link_id))
            .order_by_asc(visit_log::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(model_to_visit).collect())
    }

    /// 按 (country, platform, browser, latitude, longitude) 分组统计
    ///
    /// 排序：total_clicks 降序，相同时按组内最早的 id 升序
    pub async fn grouped_stats(&self, link_id: &str) -> Result<Vec<VisitGroup>> {
        let rows = visit_log::Entity::find()
            .select_only()
            .column(visit_log::Column::Country)
            .column(visit_log::Column::Platform)
            .column(visit_log::Column::Browser)
            .column(visit_log::Column::Latitude)
            .column(visit_log::Column::Longitude)
            .column_as(visit_log::Column::Id.count(), "total_clicks")
            .column_as(
                SimpleExpr::from(Func::count_distinct(Expr::col(visit_log::Column::Ip))),
                "unique_visitors",
            )
            .column_as(visit_log::Column::Id.min(), "first_id")
            .filter(visit_log::Column::LinkId.eq(link_id))
            .group_by(visit_log::Column::Country)
            .group_by(visit_log::Column::Platform)
            .group_by(visit_log::Column::Browser)
            .group_by(visit_log::Column::Latitude)
            .group_by(visit_log::Column::Longitude)
            .order_by_desc(Expr::cust("total_clicks"))
            .order_by_asc(Expr::cust("first_id"))
            .into_model::<VisitGroupRow>()
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(VisitGroup::from).collect())
    }

    pub async fn count_visits(&self, link_id: &str) -> Result<u64> {
        Ok(visit_log::Entity::find()
            .filter(visit_log::Column::LinkId.eq(link_id))
            .count(&self.db)
            .await?)
    }
}
