//! HTTP 层：处理器、中间件与内嵌页面模板

pub mod middleware;
pub mod services;
pub mod templates;

pub use services::{TrackerSettings, tracker_routes};
