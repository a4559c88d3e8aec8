use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ReportService, can_view_all};
use crate::models::{
    ApiResponse, ErrorCode,
    reports::{TopFacultyQuery, TopFacultyResponse},
};
use crate::services::current_user;

fn forbidden() -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(
        ErrorCode::Forbidden,
        "You do not have access to this report",
    ))
}

/// 按平均分降序，limit 限制在 1..=100
pub async fn top_faculty(
    service: &ReportService,
    query: TopFacultyQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    if !can_view_all(&caller) {
        return Ok(forbidden());
    }

    let limit = query.effective_limit(service.get_config().evaluation.top_faculty_default_limit);
    let storage = service.get_storage(request)?;
    let items = storage.top_faculty(limit, query.form_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TopFacultyResponse { limit, items },
        "Top faculty generated successfully",
    )))
}

pub async fn overview(service: &ReportService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    if !can_view_all(&caller) {
        return Ok(forbidden());
    }

    let storage = service.get_storage(request)?;
    let report = storage.overview_report(chrono::Utc::now()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        report,
        "Overview generated successfully",
    )))
}
