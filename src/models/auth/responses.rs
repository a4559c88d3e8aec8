use crate::models::users::entities::{UserRole, UserType, UserWithDetail};
use serde::Serialize;
use ts_rs::TS;

pub const TOKEN_TYPE_BEARER: &str = "Bearer";

// 登录成功，refresh token 另以 http-only cookie 下发
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserWithDetail,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// 当前登录用户及其角色详情
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct CurrentUserResponse {
    pub user: UserWithDetail,
    /// 角色详情表是否存在
    pub detail_available: bool,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct TokenVerificationResponse {
    pub user_id: i64,
    pub user_type: UserType,
    pub role: UserRole,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
}
