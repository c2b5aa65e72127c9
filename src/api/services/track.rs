use std::sync::Arc;

use actix_web::http::header::{REFERER, USER_AGENT};
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use tracing::trace;

use super::TrackerSettings;
use crate::api::templates::{html_escape, render, script_json};
use crate::errors::Result;
use crate::services::{VisitRequest, VisitService};
use crate::utils::ip::extract_client_ip;

/// 追踪页回传的坐标
#[derive(Debug, Deserialize)]
pub struct LocationReport {
    pub lat: f64,
    pub lon: f64,
    pub log_id: i64,
}

pub struct TrackService;

impl TrackService {
    /// `GET /track/{link_id}`：记录访问，返回获取坐标后再跳转的页面
    pub async fn track_visit(
        req: HttpRequest,
        path: web::Path<String>,
        visit_service: web::Data<Arc<VisitService>>,
        settings: web::Data<TrackerSettings>,
    ) -> Result<HttpResponse> {
        let link_id = path.into_inner();

        let ip = extract_client_ip(&req, &settings.trusted_proxies);
        let user_agent = header_str(&req, USER_AGENT);
        let referrer = header_str(&req, REFERER);

        let recorded = visit_service
            .record_visit(
                &link_id,
                VisitRequest {
                    ip: ip.as_deref(),
                    user_agent,
                    referrer,
                },
            )
            .await?;

        let track_url = format!("/track/{}", recorded.link_id);
        let redirect_url_json = script_json(&recorded.target_url)?;
        let track_url_json = script_json(&track_url)?;
        let log_id = recorded.visit_id.to_string();
        let redirect_url = html_escape(&recorded.target_url);

        let html = render(
            "get_location.html",
            &[
                ("REDIRECT_URL", redirect_url.as_str()),
                ("REDIRECT_URL_JSON", redirect_url_json.as_str()),
                ("TRACK_URL_JSON", track_url_json.as_str()),
                ("LOG_ID", log_id.as_str()),
            ],
        )?;

        Ok(HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(html))
    }

    /// `POST /track/{link_id}`：保存某次访问的坐标
    pub async fn report_location(
        path: web::Path<String>,
        body: web::Json<LocationReport>,
        visit_service: web::Data<Arc<VisitService>>,
    ) -> Result<HttpResponse> {
        let link_id = path.into_inner();
        trace!("Location report for visit {} on {}", body.log_id, link_id);

        visit_service
            .update_visit_coordinates(&link_id, body.log_id, body.lat, body.lon)
            .await?;

        Ok(HttpResponse::Ok()
            .content_type("text/plain; charset=utf-8")
            .body("OK"))
    }
}

fn header_str(req: &HttpRequest, name: actix_web::http::header::HeaderName) -> Option<&str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}
