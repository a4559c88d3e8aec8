use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::utils::jwt::JwtUtils;

/// 处理用户登出
/// 清除 refresh_token cookie，并移除缓存中的用户
pub async fn handle_logout(request: &HttpRequest) -> ActixResult<HttpResponse> {
    let user_id = RequireJWT::extract_user_id(request).or_else(|| {
        JwtUtils::extract_refresh_token_from_cookie(request)
            .and_then(|token| JwtUtils::verify_refresh_token(&token).ok())
            .and_then(|claims| claims.user_id())
    });

    if let (Some(user_id), Some(cache)) = (
        user_id,
        request.app_data::<web::Data<Arc<dyn ObjectCache>>>(),
    ) {
        cache.get_ref().evict_user(user_id).await;
        tracing::debug!("Evicted cached user {} on logout", user_id);
    }

    // max_age=0 会让浏览器删除该 cookie
    let empty_cookie = JwtUtils::create_empty_refresh_token_cookie();

    Ok(HttpResponse::Ok()
        .cookie(empty_cookie)
        .json(ApiResponse::success_empty("登出成功")))
}
