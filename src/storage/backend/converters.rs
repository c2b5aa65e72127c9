use crate::storage::models::{Link, NewVisit, Visit};
use migration::entities::{link, visit_log};

/// 将 Sea-ORM Model 转换为 Link
pub fn model_to_link(model: link::Model) -> Link {
    Link {
        id: model.id,
        target_url: model.target_url,
        created_at: model.created_at,
    }
}

/// 将 Link 转换为 ActiveModel（用于插入）
pub fn link_to_active_model(link: &Link) -> link::ActiveModel {
    use sea_orm::ActiveValue::*;

    link::ActiveModel {
        id: Set(link.id.clone()),
        created_at: Set(link.created_at),
        target_url: Set(link.target_url.clone()),
    }
}

/// 将 Sea-ORM Model 转换为 Visit
pub fn model_to_visit(model: visit_log::Model) -> Visit {
    Visit {
        id: model.id,
        link_id: model.link_id,
        ip: model.ip,
        country: model.country,
        platform: model.platform,
        browser: model.browser,
        referrer: model.referrer,
        latitude: model.latitude,
        longitude: model.longitude,
        timestamp: model.timestamp,
    }
}

/// 新访问记录 → ActiveModel
///
/// id 由数据库分配，坐标留空等待后续回填
pub fn new_visit_to_active_model(visit: &NewVisit) -> visit_log::ActiveModel {
    use sea_orm::ActiveValue::*;

    visit_log::ActiveModel {
        id: NotSet,
        link_id: Set(visit.link_id.clone()),
        ip: Set(visit.ip.clone()),
        country: Set(Some(visit.country.clone())),
        platform: Set(Some(visit.platform.clone())),
        browser: Set(Some(visit.browser.clone())),
        referrer: Set(visit.referrer.clone()),
        latitude: Set(None),
        longitude: Set(None),
        timestamp: Set(visit.timestamp),
    }
}
