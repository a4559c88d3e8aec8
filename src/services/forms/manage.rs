use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};

use super::FormService;
use crate::models::{
    ApiResponse, ErrorCode, FieldError,
    forms::requests::{CreateFormRequest, UpdateFormRequest},
};
use crate::services::{conflict_or_error, validation_failed};
use crate::utils::validate::validate_school_year;

const MAX_TITLE_LEN: usize = 200;

/// 表单字段校验：标题非空、学年格式、开始早于结束
fn validate_form(
    title: &str,
    school_year: &str,
    start_at: DateTime<Utc>,
    end_at: DateTime<Utc>,
) -> Vec<FieldError> {
    let mut errors = Vec::new();

    let title_len = title.trim().chars().count();
    if title_len == 0 {
        errors.push(FieldError::new("title", "must not be empty"));
    } else if title_len > MAX_TITLE_LEN {
        errors.push(FieldError::new(
            "title",
            format!("must be at most {MAX_TITLE_LEN} characters"),
        ));
    }

    if let Err(msg) = validate_school_year(school_year) {
        errors.push(FieldError::new("school_year", msg));
    }

    if start_at >= end_at {
        errors.push(FieldError::new("end_at", "must be later than start_at"));
    }

    errors
}

pub async fn create_form(
    service: &FormService,
    mut req: CreateFormRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let errors = validate_form(&req.title, &req.school_year, req.start_at, req.end_at);
    if !errors.is_empty() {
        return Ok(validation_failed(ErrorCode::FormInvalid, errors));
    }
    req.title = req.title.trim().to_string();

    let storage = service.get_storage(request)?;
    let form = storage.create_form(req).await?;
    tracing::info!(
        "Evaluation form {} created for {} {}",
        form.id,
        form.school_year,
        form.semester
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(form, "评教表单创建成功")))
}

pub async fn update_form(
    service: &FormService,
    id: i64,
    mut req: UpdateFormRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let Some(existing) = storage.get_form_by_id(id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::FormNotFound,
            "Form not found",
        )));
    };

    // 与现有值合并后整体校验
    let errors = validate_form(
        req.title.as_deref().unwrap_or(&existing.title),
        req.school_year.as_deref().unwrap_or(&existing.school_year),
        req.start_at.unwrap_or(existing.start_at),
        req.end_at.unwrap_or(existing.end_at),
    );
    if !errors.is_empty() {
        return Ok(validation_failed(ErrorCode::FormInvalid, errors));
    }
    req.title = req.title.map(|t| t.trim().to_string());

    match storage.update_form(id, req).await? {
        Some(form) => Ok(HttpResponse::Ok().json(ApiResponse::success(form, "评教表单更新成功"))),
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::FormNotFound,
            "Form not found",
        ))),
    }
}

/// 已有评教记录的表单不可删除
pub async fn delete_form(
    service: &FormService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.delete_form(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("评教表单删除成功"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::FormNotFound,
            "Form not found",
        ))),
        Err(e) => Ok(conflict_or_error(e, ErrorCode::FormInUse)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_valid_form() {
        assert!(validate_form("Midterm evaluation", "2024-2025", at(1), at(15)).is_empty());
    }

    #[test]
    fn test_invalid_form_collects_all_errors() {
        let errors = validate_form(" ", "2024-2026", at(15), at(1));
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "school_year", "end_at"]);
    }

    #[test]
    fn test_equal_bounds_rejected() {
        let errors = validate_form("Final", "2024-2025", at(3), at(3));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "end_at");
    }
}
