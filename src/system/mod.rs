//! 各运行模式共用的进程级组件

pub mod logging;

pub use logging::init_logging;
