use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use super::{UserService, check_detail_role};
use crate::cache::ObjectCache;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, FieldError, users::requests::UpdateUserRequest};
use crate::services::validation_failed;
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_name, validate_password};

pub async fn update_user(
    service: &UserService,
    user_id: i64,
    mut update_data: UpdateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    // 与删除一致，不允许停用自己
    if update_data.is_active == Some(false) && RequireJWT::extract_user_id(request) == Some(user_id)
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::CanNotDeleteCurrentUser,
            "Cannot deactivate current user",
        )));
    }

    let Some(existing) = storage.get_user_by_id(user_id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        )));
    };

    let mut errors = Vec::new();
    if let Some(first_name) = &update_data.first_name
        && let Err(msg) = validate_name(first_name)
    {
        errors.push(FieldError::new("first_name", msg));
    }
    if let Some(last_name) = &update_data.last_name
        && let Err(msg) = validate_name(last_name)
    {
        errors.push(FieldError::new("last_name", msg));
    }
    if let Some(email) = update_data.email.as_mut() {
        *email = email.trim().to_lowercase();
        if let Err(msg) = validate_email(email) {
            errors.push(FieldError::new("email", msg));
        }
    }
    if let Some(password) = &update_data.password
        && let Err(msg) = validate_password(password)
    {
        errors.push(FieldError::new("password", msg));
    }
    let target_role = update_data.role.unwrap_or(existing.role);
    if let Some(err) = check_detail_role(target_role, update_data.detail.as_ref()) {
        errors.push(err);
    }
    if let Some(department_id) = update_data.department_id
        && storage.get_department_by_id(department_id).await?.is_none()
    {
        errors.push(FieldError::new("department_id", "department does not exist"));
    }
    if !errors.is_empty() {
        return Ok(validation_failed(ErrorCode::UserUpdateFailed, errors));
    }

    if let Some(email) = &update_data.email
        && let Some(other) = storage.get_user_by_email(email).await?
        && other.id != user_id
    {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::UserAlreadyExists,
            "Email already exists",
        )));
    }

    if let Some(password) = update_data.password.take() {
        match hash_password(&password) {
            Ok(hash) => update_data.password = Some(hash),
            Err(e) => {
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        format!("Password hashing failed: {e}"),
                    )),
                );
            }
        }
    }

    match storage.update_user(user_id, update_data).await {
        Ok(Some(user)) => {
            // 角色或状态可能已变更
            if let Some(cache) = request.app_data::<web::Data<Arc<dyn ObjectCache>>>() {
                cache.get_ref().evict_user(user.id).await;
            }
            let body = storage.get_user_with_detail(user.id).await?;
            match body {
                Some(with_detail) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                    with_detail,
                    "User information updated successfully",
                ))),
                None => Ok(HttpResponse::Ok().json(ApiResponse::success(
                    user,
                    "User information updated successfully",
                ))),
            }
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Err(e.into()),
    }
}
