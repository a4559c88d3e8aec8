use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};

use crate::middlewares::require_jwt::RequireJWT;
use crate::models::auth::responses::{
    CurrentUserResponse, RefreshTokenResponse, TOKEN_TYPE_BEARER, TokenVerificationResponse,
};
use crate::models::users::entities::UserWithDetail;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;
use crate::utils::jwt::JwtUtils;

use super::AuthService;

fn expired_login_response() -> HttpResponse {
    // 清除无效的 refresh token cookie
    HttpResponse::Unauthorized()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Login expired or invalid, please login again",
        ))
}

pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(refresh_token) = JwtUtils::extract_refresh_token_from_cookie(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "No refresh token, please login",
        )));
    };

    let claims = match JwtUtils::verify_refresh_token(&refresh_token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::info!("Refresh token rejected: {}", e);
            return Ok(expired_login_response());
        }
    };

    let Some(user_id) = claims.user_id() else {
        return Ok(expired_login_response());
    };

    // 停用或已删除的账户不再签发新令牌
    let storage = service.get_storage(request)?;
    let user = match storage.get_user_by_id(user_id).await? {
        Some(user) if user.is_active => user,
        _ => {
            tracing::info!("Refresh refused for inactive or missing user {}", user_id);
            return Ok(expired_login_response());
        }
    };

    match JwtUtils::generate_access_token(&user) {
        Ok(access_token) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RefreshTokenResponse {
                access_token,
                token_type: TOKEN_TYPE_BEARER.to_string(),
                expires_in: JwtUtils::access_token_expires_in(),
            },
            "Token refreshed successfully",
        ))),
        Err(e) => {
            tracing::error!("Failed to generate access token for user {}: {}", user.id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Unable to generate token",
                )),
            )
        }
    }
}

// 中间件已完成校验，这里只回显令牌信息
pub async fn handle_verify_token(
    _service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let expires_at = RequireJWT::bearer_token(request.headers())
        .and_then(|token| JwtUtils::verify_access_token(token).ok())
        .and_then(|claims| DateTime::<Utc>::from_timestamp(claims.exp as i64, 0));

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TokenVerificationResponse {
            user_id: user.id,
            user_type: user.user_type,
            role: user.role,
            expires_at,
        },
        "Token is valid",
    )))
}

pub async fn handle_get_user(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let detail_available = storage.role_detail_tables().has(user.role);
    let user = match storage.get_user_with_detail(user.id).await? {
        Some(with_detail) => with_detail,
        None => UserWithDetail { user, detail: None },
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        CurrentUserResponse {
            user,
            detail_available,
        },
        "User information retrieved successfully",
    )))
}
