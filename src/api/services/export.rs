use std::sync::Arc;

use actix_web::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use actix_web::{HttpResponse, web};
use tracing::info;

use crate::errors::Result;
use crate::services::{CSV_CONTENT_TYPE, ExportService, csv_filename};

pub struct ExportHandler;

impl ExportHandler {
    /// `GET /export/{link_id}/csv`：以附件形式下载全部访问记录
    pub async fn export_csv(
        path: web::Path<String>,
        export_service: web::Data<Arc<ExportService>>,
    ) -> Result<HttpResponse> {
        let link_id = path.into_inner();
        let body = export_service.export_csv(&link_id).await?;

        info!("CSV export of {} ({} bytes)", link_id, body.len());

        Ok(HttpResponse::Ok()
            .insert_header((CONTENT_TYPE, CSV_CONTENT_TYPE))
            .insert_header((
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", csv_filename(&link_id)),
            ))
            .body(body))
    }
}
