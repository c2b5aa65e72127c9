use std::fmt::Write;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, web};

use crate::api::templates::{html_escape, render};
use crate::errors::Result;
use crate::services::StatsService;
use crate::storage::{Visit, VisitGroup};

pub struct StatsPage;

impl StatsPage {
    /// `GET /stats/{link_id}`：分组统计与最近访问
    pub async fn show_stats(
        req: HttpRequest,
        path: web::Path<String>,
        stats_service: web::Data<Arc<StatsService>>,
    ) -> Result<HttpResponse> {
        let link_id = path.into_inner();

        let groups = stats_service.get_stats(&link_id).await?;
        let recent = stats_service.get_recent_logs(&link_id, None).await?;
        let total_clicks = stats_service.total_clicks(&link_id).await?;

        let tracking_url = {
            let conn = req.connection_info();
            format!("{}://{}/track/{}", conn.scheme(), conn.host(), link_id)
        };

        let escaped_id = html_escape(&link_id);
        let tracking_url = html_escape(&tracking_url);
        let export_url = format!("/export/{}/csv", escaped_id);
        let total_clicks = total_clicks.to_string();
        let recent_limit = stats_service.recent_limit().to_string();
        let stats_rows = group_rows(&groups);
        let log_rows = visit_rows(&recent);

        let html = render(
            "stats.html",
            &[
                ("LINK_ID", escaped_id.as_str()),
                ("TRACKING_URL", tracking_url.as_str()),
                ("EXPORT_URL", export_url.as_str()),
                ("TOTAL_CLICKS", total_clicks.as_str()),
                ("RECENT_LIMIT", recent_limit.as_str()),
                ("STATS_ROWS", stats_rows.as_str()),
                ("LOG_ROWS", log_rows.as_str()),
            ],
        )?;

        Ok(HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(html))
    }
}

fn cell(value: Option<&str>) -> String {
    html_escape(value.unwrap_or(""))
}

fn coord(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn group_rows(groups: &[VisitGroup]) -> String {
    if groups.is_empty() {
        return "            <tr><td colspan=\"7\" class=\"empty\">No visits yet.</td></tr>"
            .to_string();
    }

    let mut out = String::new();
    for g in groups {
        let _ = writeln!(
            out,
            "            <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            g.total_clicks,
            g.unique_visitors,
            cell(g.country.as_deref()),
            cell(g.platform.as_deref()),
            cell(g.browser.as_deref()),
            coord(g.latitude),
            coord(g.longitude),
        );
    }
    out
}

fn visit_rows(visits: &[Visit]) -> String {
    if visits.is_empty() {
        return "            <tr><td colspan=\"8\" class=\"empty\">No visits yet.</td></tr>"
            .to_string();
    }

    let mut out = String::new();
    for v in visits {
        let _ = writeln!(
            out,
            "            <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            v.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            cell(v.ip.as_deref()),
            cell(v.country.as_deref()),
            cell(v.platform.as_deref()),
            cell(v.browser.as_deref()),
            cell(v.referrer.as_deref()),
            coord(v.latitude),
            coord(v.longitude),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_escape_user_data() {
        let rows = group_rows(&[VisitGroup {
            country: Some("<b>XX</b>".to_string()),
            platform: Some("Linux".to_string()),
            browser: None,
            latitude: Some(1.5),
            longitude: None,
            total_clicks: 3,
            unique_visitors: 2,
        }]);

        assert!(rows.contains("<td>3</td><td>2</td>"));
        assert!(rows.contains("&lt;b&gt;XX&lt;/b&gt;"));
        assert!(rows.contains("<td>1.5</td><td></td>"));
    }

    #[test]
    fn test_empty_tables_show_placeholder() {
        assert!(group_rows(&[]).contains("No visits yet."));
        assert!(visit_rows(&[]).contains("No visits yet."));
    }
}
