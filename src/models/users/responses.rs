use super::entities::{User, UserRole, UserWithDetail};
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

// 用户列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserListResponse {
    pub items: Vec<User>,
    pub pagination: PaginationInfo,
}

// 按角色查询用户的响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct RoleUsersResponse {
    pub role: UserRole,
    /// 当前数据库是否存在该角色的详情表
    pub detail_available: bool,
    pub items: Vec<UserWithDetail>,
}
