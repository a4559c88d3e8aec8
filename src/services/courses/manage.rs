use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::CourseService;
use crate::errors::EvalSystemError;
use crate::models::{
    ApiResponse, ErrorCode, FieldError,
    courses::requests::{CreateCourseRequest, UpdateCourseRequest},
};
use crate::services::{conflict_or_error, validation_failed};
use crate::storage::Storage;

fn check_text(field: &str, value: &str, max_len: usize, errors: &mut Vec<FieldError>) {
    let len = value.trim().chars().count();
    if len == 0 {
        errors.push(FieldError::new(field, "must not be empty"));
    } else if len > max_len {
        errors.push(FieldError::new(
            field,
            format!("must be at most {max_len} characters"),
        ));
    }
}

async fn check_department(
    storage: &Arc<dyn Storage>,
    department_id: i64,
    errors: &mut Vec<FieldError>,
) -> Result<(), EvalSystemError> {
    if storage.get_department_by_id(department_id).await?.is_none() {
        errors.push(FieldError::new("department_id", "department does not exist"));
    }
    Ok(())
}

pub async fn create_course(
    service: &CourseService,
    mut req: CreateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let mut errors = Vec::new();
    check_text("code", &req.code, 32, &mut errors);
    check_text("title", &req.title, 200, &mut errors);
    check_department(&storage, req.department_id, &mut errors).await?;
    if !errors.is_empty() {
        return Ok(validation_failed(ErrorCode::BadRequest, errors));
    }
    req.code = req.code.trim().to_uppercase();
    req.title = req.title.trim().to_string();

    match storage.create_course(req).await {
        Ok(course) => {
            tracing::info!("Course {} ({}) created", course.id, course.code);
            Ok(HttpResponse::Created().json(ApiResponse::success(course, "课程创建成功")))
        }
        Err(e) => Ok(conflict_or_error(e, ErrorCode::CourseAlreadyExists)),
    }
}

pub async fn update_course(
    service: &CourseService,
    id: i64,
    mut req: UpdateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let mut errors = Vec::new();
    if let Some(code) = &req.code {
        check_text("code", code, 32, &mut errors);
    }
    if let Some(title) = &req.title {
        check_text("title", title, 200, &mut errors);
    }
    if let Some(department_id) = req.department_id {
        check_department(&storage, department_id, &mut errors).await?;
    }
    if !errors.is_empty() {
        return Ok(validation_failed(ErrorCode::BadRequest, errors));
    }
    req.code = req.code.map(|c| c.trim().to_uppercase());
    req.title = req.title.map(|t| t.trim().to_string());

    match storage.update_course(id, req).await {
        Ok(Some(course)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(course, "课程更新成功")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CourseNotFound,
            "Course not found",
        ))),
        Err(e) => Ok(conflict_or_error(e, ErrorCode::CourseAlreadyExists)),
    }
}

pub async fn delete_course(
    service: &CourseService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.delete_course(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("课程删除成功"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CourseNotFound,
            "Course not found",
        ))),
        Err(e) => Ok(conflict_or_error(e, ErrorCode::CourseInUse)),
    }
}
