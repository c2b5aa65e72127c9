//! 跳转目标校验
//!
//! 只接受 http(s) 绝对地址，或以单个 `/` 开头的站内路径（默认的
//! `/show_map/<id>` 就是这种）。

use url::Url;

use crate::errors::LinkTrackerError;

#[derive(Debug, PartialEq, Eq)]
pub enum TargetUrlError {
    Empty,
    /// `//host` 或 `/\host`，浏览器会当成外站地址
    ProtocolRelative,
    SchemeNotAllowed(String),
    Malformed(String),
}

impl std::fmt::Display for TargetUrlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "Target URL is empty"),
            Self::ProtocolRelative => {
                write!(f, "Target URL must be absolute or start with a single /")
            }
            Self::SchemeNotAllowed(scheme) => write!(
                f,
                "Scheme '{}' is not allowed, use http:// or https://",
                scheme
            ),
            Self::Malformed(reason) => write!(f, "Malformed target URL: {}", reason),
        }
    }
}

impl std::error::Error for TargetUrlError {}

impl From<TargetUrlError> for LinkTrackerError {
    fn from(err: TargetUrlError) -> Self {
        LinkTrackerError::validation(err.to_string())
    }
}

/// 校验（去除首尾空白后的）跳转目标
pub fn validate_target_url(target: &str) -> Result<(), TargetUrlError> {
    let target = target.trim();

    if target.is_empty() {
        return Err(TargetUrlError::Empty);
    }
    if target.starts_with("//") || target.starts_with("/\\") {
        return Err(TargetUrlError::ProtocolRelative);
    }
    if target.starts_with('/') {
        return Ok(());
    }

    // Url 会把 scheme 转成小写
    let parsed = Url::parse(target).map_err(|e| TargetUrlError::Malformed(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" if parsed.has_host() => Ok(()),
        "http" | "https" => Err(TargetUrlError::Malformed("missing host".to_string())),
        other => Err(TargetUrlError::SchemeNotAllowed(other.to_string())),
    }
}
