use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CategoryService;
use crate::models::{
    ApiResponse, ErrorCode, FieldError,
    categories::requests::{CreateCategoryRequest, UpdateCategoryRequest},
};
use crate::services::{conflict_or_error, validation_failed};
use crate::utils::validate::{validate_name, validate_weight};

fn validate_fields(name: Option<&str>, weight: Option<f64>) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if let Some(name) = name
        && let Err(msg) = validate_name(name)
    {
        errors.push(FieldError::new("name", msg));
    }
    if let Some(weight) = weight
        && let Err(msg) = validate_weight(weight)
    {
        errors.push(FieldError::new("weight", msg));
    }
    errors
}

pub async fn create_category(
    service: &CategoryService,
    mut req: CreateCategoryRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let errors = validate_fields(Some(&req.name), req.weight);
    if !errors.is_empty() {
        return Ok(validation_failed(ErrorCode::CategoryWeightInvalid, errors));
    }
    req.name = req.name.trim().to_string();

    let storage = service.get_storage(request)?;
    match storage.create_category(req).await {
        Ok(category) => {
            tracing::info!("Category {} created with weight {}", category.id, category.weight);
            Ok(HttpResponse::Created().json(ApiResponse::success(category, "分类创建成功")))
        }
        Err(e) => Ok(conflict_or_error(e, ErrorCode::CategoryAlreadyExists)),
    }
}

pub async fn update_category(
    service: &CategoryService,
    id: i64,
    mut req: UpdateCategoryRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let errors = validate_fields(req.name.as_deref(), req.weight);
    if !errors.is_empty() {
        return Ok(validation_failed(ErrorCode::CategoryWeightInvalid, errors));
    }
    req.name = req.name.map(|n| n.trim().to_string());

    let storage = service.get_storage(request)?;
    match storage.update_category(id, req).await {
        Ok(Some(category)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(category, "分类更新成功")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CategoryNotFound,
            "Category not found",
        ))),
        Err(e) => Ok(conflict_or_error(e, ErrorCode::CategoryAlreadyExists)),
    }
}

/// 分类下仍有题目时返回 409
pub async fn delete_category(
    service: &CategoryService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.delete_category(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("分类删除成功"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CategoryNotFound,
            "Category not found",
        ))),
        Err(e) => Ok(conflict_or_error(e, ErrorCode::CategoryInUse)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_must_be_positive() {
        assert!(validate_fields(Some("Teaching"), Some(1.5)).is_empty());
        let errors = validate_fields(Some("Teaching"), Some(0.0));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "weight");
    }

    #[test]
    fn test_blank_name_rejected() {
        let errors = validate_fields(Some("   "), None);
        assert_eq!(errors[0].field, "name");
    }
}
