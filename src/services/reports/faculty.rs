use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::{ReportService, can_view_all, can_view_faculty};
use crate::errors::EvalSystemError;
use crate::models::{
    ApiResponse, ErrorCode,
    reports::{
        CategoryReportQuery, FacultyCategoryReportResponse, FacultyReportQuery,
        FacultyReportResponse, FacultyScoreSummary,
    },
    users::entities::{User, UserRole},
};
use crate::services::current_user;
use crate::storage::Storage;

fn forbidden() -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(
        ErrorCode::Forbidden,
        "You do not have access to this report",
    ))
}

async fn load_faculty(
    storage: &Arc<dyn Storage>,
    faculty_id: i64,
) -> Result<Option<User>, EvalSystemError> {
    Ok(storage
        .get_user_by_id(faculty_id)
        .await?
        .filter(|user| user.role == UserRole::Faculty))
}

fn faculty_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::UserNotFound,
        "Faculty member not found",
    ))
}

pub async fn faculty_report(
    service: &ReportService,
    query: FacultyReportQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    if !can_view_all(&caller) {
        return Ok(forbidden());
    }

    let storage = service.get_storage(request)?;
    let items = storage.faculty_score_summaries(query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        FacultyReportResponse { items },
        "Faculty report generated successfully",
    )))
}

/// 没有评教记录的教师返回 0 分、0 条
pub async fn faculty_summary(
    service: &ReportService,
    faculty_id: i64,
    query: CategoryReportQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    if !can_view_faculty(&caller, faculty_id) {
        return Ok(forbidden());
    }

    let storage = service.get_storage(request)?;
    let Some(faculty) = load_faculty(&storage, faculty_id).await? else {
        return Ok(faculty_not_found());
    };

    let summary = storage
        .faculty_score_summary(faculty_id, query.form_id)
        .await?
        .unwrap_or(FacultyScoreSummary {
            faculty_id: faculty.id,
            first_name: faculty.first_name,
            last_name: faculty.last_name,
            department_id: faculty.department_id,
            average_score: 0.0,
            evaluation_count: 0,
        });

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        summary,
        "Faculty summary generated successfully",
    )))
}

pub async fn faculty_categories(
    service: &ReportService,
    faculty_id: i64,
    query: CategoryReportQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    if !can_view_faculty(&caller, faculty_id) {
        return Ok(forbidden());
    }

    let storage = service.get_storage(request)?;
    if load_faculty(&storage, faculty_id).await?.is_none() {
        return Ok(faculty_not_found());
    }

    let categories = storage
        .faculty_category_averages(faculty_id, query.form_id)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        FacultyCategoryReportResponse {
            faculty_id,
            categories,
        },
        "Category report generated successfully",
    )))
}
