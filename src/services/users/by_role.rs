use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{entities::UserRole, responses::RoleUsersResponse},
};
use crate::services::current_user;

/// 管理员与督导可列出任意角色，其他用户只能列出教师
pub async fn list_users_by_role(
    service: &UserService,
    role: UserRole,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    let may_list = caller.is_admin()
        || caller.role == UserRole::Supervisor
        || role == UserRole::Faculty;
    if !may_list {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Access denied.",
        )));
    }

    let storage = service.get_storage(request)?;
    let detail_available = storage.role_detail_tables().has(role);
    let items = storage.list_users_by_role(role).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        RoleUsersResponse {
            role,
            detail_available,
            items,
        },
        "User list retrieved successfully",
    )))
}
