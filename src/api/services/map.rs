use std::sync::Arc;

use actix_web::{HttpResponse, web};

use crate::api::templates::{html_escape, render, script_json};
use crate::errors::Result;
use crate::services::VisitService;

pub const NO_LOCATION_MESSAGE: &str =
    "No location data found yet. Please visit the tracking link first.";

pub struct MapService;

impl MapService {
    /// `GET /show_map/{link_id}`：最近一次访问的地图
    pub async fn show_map(
        path: web::Path<String>,
        visit_service: web::Data<Arc<VisitService>>,
    ) -> Result<HttpResponse> {
        let link_id = path.into_inner();

        let Some(location) = visit_service.latest_location(&link_id).await? else {
            return Ok(HttpResponse::NotFound()
                .content_type("text/plain; charset=utf-8")
                .body(NO_LOCATION_MESSAGE));
        };

        let link_id = html_escape(&link_id);
        let latitude = script_json(&location.latitude)?;
        let longitude = script_json(&location.longitude)?;
        let visited_at = location.timestamp.to_rfc3339();

        let html = render(
            "map.html",
            &[
                ("LINK_ID", link_id.as_str()),
                ("LATITUDE_JSON", latitude.as_str()),
                ("LONGITUDE_JSON", longitude.as_str()),
                ("VISITED_AT", visited_at.as_str()),
            ],
        )?;

        Ok(HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(html))
    }
}
