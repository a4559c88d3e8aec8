//! 访问令牌与刷新令牌
//!
//! access token 放在响应体中由客户端以 Bearer 方式携带；
//! refresh token 只通过 http-only cookie 传递。两者用 `kind` 区分，互不通用。

use crate::config::AppConfig;
use crate::models::users::entities::{User, UserRole, UserType};
use actix_web::cookie::{Cookie, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";
const ISSUER: &str = "faculty-eval";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // 用户 ID
    pub user_type: UserType,
    pub role: UserRole,
    pub kind: TokenKind,
    pub iss: String,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

#[derive(Debug)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct JwtUtils;

impl JwtUtils {
    fn secret() -> &'static [u8] {
        AppConfig::get().jwt.secret.as_bytes()
    }

    /// 为用户签发指定类型的令牌
    pub fn issue(user: &User, kind: TokenKind, ttl: Duration) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            user_type: user.user_type,
            role: user.role,
            kind,
            iss: ISSUER.to_string(),
            exp: (now + ttl).timestamp().max(0) as usize,
            iat: now.timestamp().max(0) as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(Self::secret()),
        )
    }

    pub fn generate_access_token(user: &User) -> Result<String, JwtError> {
        let minutes = AppConfig::get().jwt.access_token_expiry;
        Self::issue(user, TokenKind::Access, Duration::minutes(minutes))
    }

    pub fn generate_token_pair(user: &User, refresh_ttl: Duration) -> Result<TokenPair, JwtError> {
        Ok(TokenPair {
            access_token: Self::generate_access_token(user)?,
            refresh_token: Self::issue(user, TokenKind::Refresh, refresh_ttl)?,
        })
    }

    /// 校验签名、签发方、有效期与令牌类型
    pub fn verify(token: &str, expected: TokenKind) -> Result<Claims, JwtError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[ISSUER]);

        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(Self::secret()),
            &validation,
        )?
        .claims;

        if claims.kind != expected {
            return Err(ErrorKind::InvalidToken.into());
        }
        Ok(claims)
    }

    pub fn verify_access_token(token: &str) -> Result<Claims, JwtError> {
        Self::verify(token, TokenKind::Access)
    }

    pub fn verify_refresh_token(token: &str) -> Result<Claims, JwtError> {
        Self::verify(token, TokenKind::Refresh)
    }

    /// Access Token 有效期（秒）
    pub fn access_token_expires_in() -> i64 {
        AppConfig::get().jwt.access_token_expiry * 60
    }

    /// Refresh Token 有效期，记住我时使用更长的期限
    pub fn refresh_token_expiry(remember_me: bool) -> Duration {
        let jwt = &AppConfig::get().jwt;
        let days = if remember_me {
            jwt.refresh_token_remember_me_expiry
        } else {
            jwt.refresh_token_expiry
        };
        Duration::days(days)
    }

    fn refresh_cookie(value: String, max_age_secs: i64) -> Cookie<'static> {
        Cookie::build(REFRESH_TOKEN_COOKIE, value)
            .path("/api/v1/auth")
            .max_age(actix_web::cookie::time::Duration::seconds(max_age_secs))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    pub fn create_refresh_token_cookie(refresh_token: &str, expiry: Duration) -> Cookie<'static> {
        Self::refresh_cookie(refresh_token.to_string(), expiry.num_seconds())
    }

    /// max_age=0 让浏览器删除 cookie
    pub fn create_empty_refresh_token_cookie() -> Cookie<'static> {
        Self::refresh_cookie(String::new(), 0)
    }

    pub fn extract_refresh_token_from_cookie(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie(REFRESH_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, user_type: UserType, role: UserRole) -> User {
        let now = Utc::now();
        User {
            id,
            first_name: "Ada".to_string(),
            middle_name: None,
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: String::new(),
            user_type,
            role,
            department_id: None,
            is_active: true,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_token_pair_kinds_are_not_interchangeable() {
        let u = user(12, UserType::User, UserRole::Faculty);
        let pair = JwtUtils::generate_token_pair(&u, Duration::days(1)).unwrap();

        let access = JwtUtils::verify_access_token(&pair.access_token).unwrap();
        assert_eq!(access.user_id(), Some(12));
        assert_eq!(access.role, UserRole::Faculty);
        assert_eq!(access.user_type, UserType::User);

        assert!(JwtUtils::verify_access_token(&pair.refresh_token).is_err());
        assert!(JwtUtils::verify_refresh_token(&pair.access_token).is_err());
        assert_eq!(
            JwtUtils::verify_refresh_token(&pair.refresh_token)
                .unwrap()
                .kind,
            TokenKind::Refresh
        );
    }

    #[test]
    fn test_expired_token_rejected() {
        let u = user(1, UserType::Admin, UserRole::Supervisor);
        let token = JwtUtils::issue(&u, TokenKind::Access, Duration::hours(-2)).unwrap();
        assert!(JwtUtils::verify_access_token(&token).is_err());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let u = user(5, UserType::User, UserRole::Student);
        let mut token = JwtUtils::generate_access_token(&u).unwrap();
        token.push('x');
        assert!(JwtUtils::verify_access_token(&token).is_err());
    }

    #[test]
    fn test_remember_me_extends_refresh_expiry() {
        assert!(JwtUtils::refresh_token_expiry(true) > JwtUtils::refresh_token_expiry(false));
    }
}
