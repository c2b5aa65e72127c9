use std::sync::Arc;

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::http::header::LOCATION;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use super::TrackerSettings;
use crate::api::middleware::access::{ACCESS_GRANTED, access_cookie_name};
use crate::errors::Result;
use crate::services::LinkService;

/// `POST /create` 表单
#[derive(Debug, Deserialize)]
pub struct CreateLinkForm {
    #[serde(default)]
    pub target_url: Option<String>,
}

pub struct LinkHandlers;

impl LinkHandlers {
    /// 创建链接，下发凭证 cookie 并跳转到统计页
    ///
    /// 没有表单（或不是表单编码）时按未指定目标处理
    pub async fn create_link(
        form: Option<web::Form<CreateLinkForm>>,
        link_service: web::Data<Arc<LinkService>>,
        settings: web::Data<TrackerSettings>,
    ) -> Result<HttpResponse> {
        let link = link_service
            .create_link(form.as_ref().and_then(|f| f.target_url.as_deref()))
            .await?;

        let cookie = access_cookie(&link.id, settings.cookie_max_age_secs);

        Ok(HttpResponse::Found()
            .insert_header((LOCATION, format!("/stats/{}", link.id)))
            .cookie(cookie)
            .finish())
    }
}

/// `access_<id>=true`，全站路径可用，脚本不可读
pub fn access_cookie(link_id: &str, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build(access_cookie_name(link_id), ACCESS_GRANTED)
        .path("/")
        .max_age(Duration::seconds(max_age_secs))
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}
