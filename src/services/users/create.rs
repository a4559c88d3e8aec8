use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{UserService, check_detail_role};
use crate::models::{ApiResponse, ErrorCode, FieldError, users::requests::CreateUserRequest};
use crate::services::validation_failed;
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_name, validate_password};

pub async fn create_user(
    service: &UserService,
    mut user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    user_data.email = user_data.email.trim().to_lowercase();

    let mut errors = Vec::new();
    if let Err(msg) = validate_name(&user_data.first_name) {
        errors.push(FieldError::new("first_name", msg));
    }
    if let Err(msg) = validate_name(&user_data.last_name) {
        errors.push(FieldError::new("last_name", msg));
    }
    if let Err(msg) = validate_email(&user_data.email) {
        errors.push(FieldError::new("email", msg));
    }
    if let Err(msg) = validate_password(&user_data.password) {
        errors.push(FieldError::new("password", msg));
    }
    if let Some(err) = check_detail_role(user_data.role, user_data.detail.as_ref()) {
        errors.push(err);
    }
    if let Some(department_id) = user_data.department_id
        && storage.get_department_by_id(department_id).await?.is_none()
    {
        errors.push(FieldError::new("department_id", "department does not exist"));
    }
    if !errors.is_empty() {
        return Ok(validation_failed(ErrorCode::UserCreationFailed, errors));
    }

    if storage.get_user_by_email(&user_data.email).await?.is_some() {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::UserAlreadyExists,
            "Email already exists",
        )));
    }

    user_data.password = match hash_password(&user_data.password) {
        Ok(hash) => hash,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Password hashing failed: {e}"),
                )),
            );
        }
    };

    let user = storage.create_user(user_data).await?;
    info!("User {} created with role {}", user.id, user.role);

    let detail_user = storage.get_user_with_detail(user.id).await?;
    match detail_user {
        Some(detail_user) => {
            Ok(HttpResponse::Created().json(ApiResponse::success(detail_user, "用户创建成功")))
        }
        None => Ok(HttpResponse::Created().json(ApiResponse::success(user, "用户创建成功"))),
    }
}
