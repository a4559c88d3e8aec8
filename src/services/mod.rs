pub mod auth;
pub mod categories;
pub mod courses;
pub mod departments;
pub mod evaluations;
pub mod forms;
pub mod questions;
pub mod reports;
pub mod users;

pub use auth::AuthService;
pub use categories::CategoryService;
pub use courses::CourseService;
pub use departments::DepartmentService;
pub use evaluations::EvaluationService;
pub use forms::FormService;
pub use questions::QuestionService;
pub use reports::ReportService;
pub use users::UserService;

use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode, web};
use std::sync::Arc;

use crate::errors::EvalSystemError;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, FieldError, users::entities::User};
use crate::storage::Storage;

/// 从 app_data 取出存储实例
pub(crate) fn storage_from_request(
    injected: &Option<Arc<dyn Storage>>,
    request: &HttpRequest,
) -> Result<Arc<dyn Storage>, EvalSystemError> {
    if let Some(storage) = injected {
        return Ok(storage.clone());
    }
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| EvalSystemError::database_config("Storage not found in app data"))
}

/// 当前登录用户（由 RequireJWT 写入）
pub(crate) fn current_user(request: &HttpRequest) -> Result<User, EvalSystemError> {
    RequireJWT::extract_user(request)
        .ok_or_else(|| EvalSystemError::authentication("Unauthorized access, please login"))
}

/// 400 + 字段错误列表
pub(crate) fn validation_failed(code: ErrorCode, errors: Vec<FieldError>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::validation_error(code, errors))
}

/// 存储层错误转响应，冲突类错误换成资源自己的错误码
pub(crate) fn conflict_or_error(err: EvalSystemError, conflict_code: ErrorCode) -> HttpResponse {
    if err.http_status() == StatusCode::CONFLICT {
        HttpResponse::Conflict().json(ApiResponse::error_empty(conflict_code, err.message()))
    } else {
        err.error_response()
    }
}
