use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::reports::{CategoryReportQuery, FacultyReportQuery, TopFacultyQuery};
use crate::services::ReportService;
use crate::utils::SafeIDI64;

static REPORT_SERVICE: Lazy<ReportService> = Lazy::new(ReportService::new_lazy);

pub async fn faculty_report(
    req: HttpRequest,
    query: web::Query<FacultyReportQuery>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.faculty_report(query.into_inner(), &req).await
}

pub async fn faculty_summary(
    req: HttpRequest,
    id: SafeIDI64,
    query: web::Query<CategoryReportQuery>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE
        .faculty_summary(id.0, query.into_inner(), &req)
        .await
}

pub async fn faculty_categories(
    req: HttpRequest,
    id: SafeIDI64,
    query: web::Query<CategoryReportQuery>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE
        .faculty_categories(id.0, query.into_inner(), &req)
        .await
}

pub async fn top_faculty(
    req: HttpRequest,
    query: web::Query<TopFacultyQuery>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.top_faculty(query.into_inner(), &req).await
}

pub async fn overview(req: HttpRequest) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.overview(&req).await
}

// 访问控制在服务层按角色判断（教师可看自己的报表）
pub fn configure_report_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/reports")
            .wrap(middlewares::RequireJWT)
            .route("/faculty", web::get().to(faculty_report))
            .route("/faculty/{id}", web::get().to(faculty_summary))
            .route("/faculty/{id}/categories", web::get().to(faculty_categories))
            .route("/top-faculty", web::get().to(top_faculty))
            .route("/overview", web::get().to(overview)),
    );
}
