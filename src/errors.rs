use std::fmt;

use actix_web::http::StatusCode;
use actix_web::http::header::{CONTENT_TYPE, LOCATION};
use actix_web::{HttpResponse, ResponseError};

#[derive(Debug, Clone)]
pub enum LinkTrackerError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    LinkNotFound(String),
    VisitNotFound(String),
    MissingCredential(String),
    Geolocation(String),
    IdExhausted(String),
    Serialization(String),
    Template(String),
}

impl LinkTrackerError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            LinkTrackerError::DatabaseConfig(_) => "E001",
            LinkTrackerError::DatabaseConnection(_) => "E002",
            LinkTrackerError::DatabaseOperation(_) => "E003",
            LinkTrackerError::FileOperation(_) => "E004",
            LinkTrackerError::Validation(_) => "E005",
            LinkTrackerError::LinkNotFound(_) => "E006",
            LinkTrackerError::VisitNotFound(_) => "E007",
            LinkTrackerError::MissingCredential(_) => "E008",
            LinkTrackerError::Geolocation(_) => "E009",
            LinkTrackerError::IdExhausted(_) => "E010",
            LinkTrackerError::Serialization(_) => "E011",
            LinkTrackerError::Template(_) => "E012",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            LinkTrackerError::DatabaseConfig(_) => "Database Configuration Error",
            LinkTrackerError::DatabaseConnection(_) => "Database Connection Error",
            LinkTrackerError::DatabaseOperation(_) => "Database Operation Error",
            LinkTrackerError::FileOperation(_) => "File Operation Error",
            LinkTrackerError::Validation(_) => "Validation Error",
            LinkTrackerError::LinkNotFound(_) => "Link Not Found",
            LinkTrackerError::VisitNotFound(_) => "Visit Not Found",
            LinkTrackerError::MissingCredential(_) => "Missing Credential",
            LinkTrackerError::Geolocation(_) => "Geolocation Error",
            LinkTrackerError::IdExhausted(_) => "Link Id Exhausted",
            LinkTrackerError::Serialization(_) => "Serialization Error",
            LinkTrackerError::Template(_) => "Template Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            LinkTrackerError::DatabaseConfig(msg)
            | LinkTrackerError::DatabaseConnection(msg)
            | LinkTrackerError::DatabaseOperation(msg)
            | LinkTrackerError::FileOperation(msg)
            | LinkTrackerError::Validation(msg)
            | LinkTrackerError::LinkNotFound(msg)
            | LinkTrackerError::VisitNotFound(msg)
            | LinkTrackerError::MissingCredential(msg)
            | LinkTrackerError::Geolocation(msg)
            | LinkTrackerError::IdExhausted(msg)
            | LinkTrackerError::Serialization(msg)
            | LinkTrackerError::Template(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于启动失败时的终端输出）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for LinkTrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LinkTrackerError {}

// 便捷的构造函数
impl LinkTrackerError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        LinkTrackerError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        LinkTrackerError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        LinkTrackerError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        LinkTrackerError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        LinkTrackerError::Validation(msg.into())
    }

    pub fn link_not_found<T: Into<String>>(msg: T) -> Self {
        LinkTrackerError::LinkNotFound(msg.into())
    }

    pub fn visit_not_found<T: Into<String>>(msg: T) -> Self {
        LinkTrackerError::VisitNotFound(msg.into())
    }

    pub fn missing_credential<T: Into<String>>(msg: T) -> Self {
        LinkTrackerError::MissingCredential(msg.into())
    }

    pub fn geolocation<T: Into<String>>(msg: T) -> Self {
        LinkTrackerError::Geolocation(msg.into())
    }

    pub fn id_exhausted<T: Into<String>>(msg: T) -> Self {
        LinkTrackerError::IdExhausted(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        LinkTrackerError::Serialization(msg.into())
    }

    pub fn template<T: Into<String>>(msg: T) -> Self {
        LinkTrackerError::Template(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LinkTrackerError::LinkNotFound(_) | LinkTrackerError::VisitNotFound(_)
        )
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for LinkTrackerError {
    fn from(err: sea_orm::DbErr) -> Self {
        LinkTrackerError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for LinkTrackerError {
    fn from(err: std::io::Error) -> Self {
        LinkTrackerError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for LinkTrackerError {
    fn from(err: serde_json::Error) -> Self {
        LinkTrackerError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for LinkTrackerError {
    fn from(err: csv::Error) -> Self {
        LinkTrackerError::Serialization(err.to_string())
    }
}

/// HTTP 映射：未找到 → 404，输入错误 → 400，缺少凭证 → 302 回首页，其余 → 500
///
/// 5xx 只返回通用文本，详细原因留在日志里
impl ResponseError for LinkTrackerError {
    fn status_code(&self) -> StatusCode {
        match self {
            LinkTrackerError::LinkNotFound(_) | LinkTrackerError::VisitNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            LinkTrackerError::Validation(_) => StatusCode::BAD_REQUEST,
            LinkTrackerError::MissingCredential(_) => StatusCode::FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let LinkTrackerError::MissingCredential(_) = self {
            return HttpResponse::Found()
                .insert_header((LOCATION, "/"))
                .finish();
        }

        let status = self.status_code();
        let body = if status.is_server_error() {
            tracing::error!("{} {}", self.code(), self);
            "Internal Server Error".to_string()
        } else {
            self.message().to_string()
        };

        HttpResponse::build(status)
            .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
            .body(body)
    }
}

pub type Result<T> = std::result::Result<T, LinkTrackerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_variants_map_to_404() {
        assert_eq!(
            LinkTrackerError::link_not_found("abc").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            LinkTrackerError::visit_not_found("42").status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_validation_maps_to_400() {
        assert_eq!(
            LinkTrackerError::validation("bad url").status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_missing_credential_redirects_home() {
        let resp = LinkTrackerError::missing_credential("access_0a1b2c3d").error_response();
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.headers().get(LOCATION).unwrap(), "/");
    }

    #[test]
    fn test_storage_errors_map_to_500() {
        let err: LinkTrackerError = sea_orm::DbErr::Custom("boom".into()).into();
        assert_eq!(err.code(), "E003");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_format_simple() {
        let err = LinkTrackerError::link_not_found("Link not found: abc");
        assert_eq!(err.format_simple(), "Link Not Found: Link not found: abc");
        assert_eq!(err.to_string(), err.format_simple());
        assert!(err.is_not_found());
    }
}
