use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{
    ApiResponse, ErrorCode, FieldError,
    auth::requests::RegisterRequest,
    users::{entities::UserType, requests::CreateUserRequest},
};
use crate::services::validation_failed;
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_name, validate_password};

use super::AuthService;

pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let email = register_request.email.trim().to_lowercase();

    // 1. 字段校验
    let mut errors = Vec::new();
    if let Err(msg) = validate_name(&register_request.first_name) {
        errors.push(FieldError::new("first_name", msg));
    }
    if let Err(msg) = validate_name(&register_request.last_name) {
        errors.push(FieldError::new("last_name", msg));
    }
    if let Err(msg) = validate_email(&email) {
        errors.push(FieldError::new("email", msg));
    }
    if let Err(msg) = validate_password(&register_request.password) {
        errors.push(FieldError::new("password", msg));
    }
    if !errors.is_empty() {
        return Ok(validation_failed(ErrorCode::RegisterFailed, errors));
    }

    // 2. 检查邮箱是否已存在
    match storage.get_user_by_email(&email).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::UserAlreadyExists,
                "Email already exists",
            )));
        }
        Ok(None) => {}
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::RegisterFailed,
                    format!("Register failed: {e}"),
                )),
            );
        }
    }

    // 3. 哈希密码
    let password_hash = match hash_password(&register_request.password) {
        Ok(hash) => hash,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::RegisterFailed,
                    format!("密码哈希失败: {e}"),
                )),
            );
        }
    };

    // 4. 创建普通账户
    let create_request = CreateUserRequest {
        first_name: register_request.first_name.trim().to_string(),
        middle_name: register_request.middle_name,
        last_name: register_request.last_name.trim().to_string(),
        email,
        password: password_hash,
        user_type: UserType::User,
        role: register_request.role,
        department_id: register_request.department_id,
        detail: None,
    };

    match storage.create_user(create_request).await {
        Ok(user) => {
            tracing::info!("User {} registered as {}", user.email, user.role);
            Ok(HttpResponse::Created().json(ApiResponse::success(user, "注册成功")))
        }
        Err(e) => Err(e.into()),
    }
}
