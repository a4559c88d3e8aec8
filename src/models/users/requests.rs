use super::entities::{RoleDetail, UserRole, UserType};
use serde::Deserialize;
use ts_rs::TS;

// 用户列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub role: Option<UserRole>,
    pub user_type: Option<UserType>,
    pub department_id: Option<i64>,
    /// 按姓名或邮箱模糊搜索
    pub search: Option<String>,
    /// 默认只返回启用的用户
    pub include_inactive: Option<bool>,
}

// 用户创建请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct CreateUserRequest {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(default = "default_user_type")]
    pub user_type: UserType,
    pub role: UserRole,
    pub department_id: Option<i64>,
    /// 角色详情，role 必须与用户角色一致
    pub detail: Option<RoleDetail>,
}

fn default_user_type() -> UserType {
    UserType::User
}

// 用户更新请求
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub user_type: Option<UserType>,
    pub role: Option<UserRole>,
    pub department_id: Option<i64>,
    pub is_active: Option<bool>,
    /// 写入或替换角色详情
    pub detail: Option<RoleDetail>,
}
