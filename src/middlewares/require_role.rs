/*!
 * 基于角色的访问控制中间件
 *
 * 必须放在 RequireJWT 之后。管理员账户（user_type = admin）总是放行。
 *
 * ```rust,ignore
 * web::scope("/departments")
 *     .wrap(RequireRole::admin())
 *
 * web::scope("/reports")
 *     .wrap(RequireRole::new_any(UserRole::report_viewer_roles()))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::models::{
    ErrorCode,
    users::entities::{User, UserRole},
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireRole {
    // 为空表示仅管理员
    allowed_roles: Vec<UserRole>,
}

impl RequireRole {
    /// 仅管理员
    pub fn admin() -> Self {
        Self {
            allowed_roles: Vec::new(),
        }
    }

    /// 管理员或任一给定角色
    pub fn new_any(roles: &[UserRole]) -> Self {
        Self {
            allowed_roles: roles.to_vec(),
        }
    }

    pub(crate) fn permits(allowed_roles: &[UserRole], user: &User) -> bool {
        user.is_admin() || allowed_roles.contains(&user.role)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            allowed_roles: self.allowed_roles.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    allowed_roles: Vec<UserRole>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let allowed_roles = self.allowed_roles.clone();

        Box::pin(async move {
            let user = req.extensions().get::<User>().cloned();

            match user {
                Some(user) if RequireRole::permits(&allowed_roles, &user) => {
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Some(user) => {
                    info!(
                        "Access denied for user {} (type: {}, role: {}). Allowed roles: {:?}",
                        user.id, user.user_type, user.role, allowed_roles
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::FORBIDDEN,
                            ErrorCode::Forbidden,
                            "Access denied.",
                        )
                        .map_into_right_body(),
                    ))
                }
                None => {
                    info!(
                        "Role check failed: No user found in request. Make sure RequireJWT middleware is applied first."
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            "Authentication required",
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserType;

    fn user(user_type: UserType, role: UserRole) -> User {
        let now = chrono::Utc::now();
        User {
            id: 1,
            first_name: "Ada".into(),
            middle_name: None,
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
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
    fn test_admin_always_permitted() {
        let admin = user(UserType::Admin, UserRole::Faculty);
        assert!(RequireRole::permits(&[], &admin));
        assert!(RequireRole::permits(&[UserRole::Supervisor], &admin));
    }

    #[test]
    fn test_role_membership() {
        let supervisor = user(UserType::User, UserRole::Supervisor);
        assert!(!RequireRole::permits(&[], &supervisor));
        assert!(RequireRole::permits(&[UserRole::Supervisor], &supervisor));
        assert!(!RequireRole::permits(&[UserRole::Student], &supervisor));
    }
}
