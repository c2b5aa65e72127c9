pub mod link;
pub mod visit_log;
