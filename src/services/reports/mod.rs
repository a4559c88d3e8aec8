pub mod faculty;
pub mod ranking;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::reports::{CategoryReportQuery, FacultyReportQuery, TopFacultyQuery};
use crate::models::users::entities::{User, UserRole};
use crate::storage::Storage;

pub struct ReportService {
    storage: Option<Arc<dyn Storage>>,
}

impl ReportService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        Ok(super::storage_from_request(&self.storage, request)?)
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    pub async fn faculty_report(
        &self,
        query: FacultyReportQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        faculty::faculty_report(self, query, request).await
    }

    pub async fn faculty_summary(
        &self,
        faculty_id: i64,
        query: CategoryReportQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        faculty::faculty_summary(self, faculty_id, query, request).await
    }

    pub async fn faculty_categories(
        &self,
        faculty_id: i64,
        query: CategoryReportQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        faculty::faculty_categories(self, faculty_id, query, request).await
    }

    pub async fn top_faculty(
        &self,
        query: TopFacultyQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        ranking::top_faculty(self, query, request).await
    }

    pub async fn overview(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        ranking::overview(self, request).await
    }
}

/// 管理员与督导可查看全部报表
pub(crate) fn can_view_all(user: &User) -> bool {
    user.is_admin() || UserRole::report_viewer_roles().contains(&user.role)
}

/// 教师只能查看自己的报表
pub(crate) fn can_view_faculty(user: &User, faculty_id: i64) -> bool {
    can_view_all(user) || (user.role == UserRole::Faculty && user.id == faculty_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserType;

    fn user(id: i64, user_type: UserType, role: UserRole) -> User {
        let now = chrono::Utc::now();
        User {
            id,
            first_name: "Maria".into(),
            middle_name: None,
            last_name: "Santos".into(),
            email: format!("u{id}@example.com"),
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
    fn test_report_access() {
        let admin = user(1, UserType::Admin, UserRole::Faculty);
        let supervisor = user(2, UserType::User, UserRole::Supervisor);
        let faculty = user(3, UserType::User, UserRole::Faculty);
        let student = user(4, UserType::User, UserRole::Student);

        assert!(can_view_all(&admin));
        assert!(can_view_all(&supervisor));
        assert!(!can_view_all(&faculty));

        assert!(can_view_faculty(&faculty, 3));
        assert!(!can_view_faculty(&faculty, 5));
        assert!(can_view_faculty(&supervisor, 5));
        assert!(!can_view_faculty(&student, 4));
    }
}
