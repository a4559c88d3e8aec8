pub mod auth;
pub mod categories;
pub mod common;
pub mod courses;
pub mod departments;
pub mod evaluations;
pub mod forms;
pub mod questions;
pub mod reports;
pub mod users;

pub use common::{
    ApiResponse, ErrorCode, FieldError, PaginationInfo, ResponseStatus, pagination::PageRequest,
};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
