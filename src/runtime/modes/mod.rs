//! 运行模式
//!
//! `serve` 启动 HTTP 服务器；`generate-config` 写出示例配置后退出。

pub mod server;

pub use server::{configure_app, run_server};

use crate::config::StaticConfig;
use crate::errors::{LinkTrackerError, Result};

/// 将示例 TOML 配置写入 `path`
pub fn generate_config(path: &str) -> Result<()> {
    StaticConfig::default()
        .save_to_file(path)
        .map_err(|e| LinkTrackerError::file_operation(format!("Failed to write {}: {}", path, e)))
}
