pub mod by_role;
pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::FieldError;
use crate::models::users::entities::{RoleDetail, UserRole};
use crate::models::users::requests::{CreateUserRequest, UpdateUserRequest, UserListQuery};
use crate::storage::Storage;

pub struct UserService {
    storage: Option<Arc<dyn Storage>>,
}

impl UserService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        Ok(super::storage_from_request(&self.storage, request)?)
    }

    // 获取用户列表
    pub async fn list_users(
        &self,
        query: UserListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_users(self, query, request).await
    }

    // 创建用户
    pub async fn create_user(
        &self,
        user_data: CreateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_user(self, user_data, request).await
    }

    // 根据ID获取用户（含角色详情）
    pub async fn get_user(&self, user_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_user(self, user_id, request).await
    }

    // 更新用户信息
    pub async fn update_user(
        &self,
        user_id: i64,
        update_data: UpdateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_user(self, user_id, update_data, request).await
    }

    // 停用用户
    pub async fn delete_user(
        &self,
        user_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_user(self, user_id, request).await
    }

    // 按角色列出用户
    pub async fn list_users_by_role(
        &self,
        role: UserRole,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        by_role::list_users_by_role(self, role, request).await
    }
}

/// 角色详情必须与用户角色一致
pub(crate) fn check_detail_role(role: UserRole, detail: Option<&RoleDetail>) -> Option<FieldError> {
    match detail {
        Some(detail) if detail.role() != role => Some(FieldError::new(
            "detail.role",
            format!("detail is for role '{}' but the user role is '{}'", detail.role(), role),
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_role_must_match() {
        let detail = RoleDetail::Faculty {
            employee_no: Some("F-001".into()),
            academic_rank: None,
        };
        assert!(check_detail_role(UserRole::Faculty, Some(&detail)).is_none());
        assert!(check_detail_role(UserRole::Student, Some(&detail)).is_some());
        assert!(check_detail_role(UserRole::Student, None).is_none());
    }
}
