//! linktracker - 带访问分析的追踪链接服务
//!
//! 每个链接包装一个目标地址。每次访问 `/track/<id>` 都会记录客户端地址、
//! 国家、平台、浏览器和来源，追踪页回报后再补上精确坐标。
//! 链接创建者持有 `access_<id>` cookie，可查看统计页并导出 CSV。
//!
//! # 架构
//! - `storage`：基于 sea-orm 的 `links` / `logs` 表
//! - `services`：链接注册、访问记录、统计与导出
//! - `api`：actix-web 处理器、凭证中间件、HTML 模板
//! - `config`：TOML 与环境变量分层配置
//! - `runtime`：启动组装与 HTTP 服务循环
//! - `system`：日志

pub mod api;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
