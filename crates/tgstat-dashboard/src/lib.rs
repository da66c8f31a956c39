//! Telegram channel statistics dashboard generator

pub mod context;
pub mod render;
pub mod request_log;

pub use context::DashboardContext;
pub use request_log::{log_statistics_request, RequestLogEntry};
