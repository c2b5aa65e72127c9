use actix_web::HttpResponse;
use tracing::trace;

use crate::api::templates::render;
use crate::errors::Result;

pub struct HomeService;

impl HomeService {
    /// 首页，包含创建链接的表单
    pub async fn index() -> Result<HttpResponse> {
        trace!("Serving home page");
        let html = render("index.html", &[])?;
        Ok(HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(html))
    }
}
