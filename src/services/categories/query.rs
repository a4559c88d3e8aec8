use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CategoryService;
use crate::models::{ApiResponse, ErrorCode, categories::responses::CategoryListResponse};

pub async fn list_categories(
    service: &CategoryService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let items = storage.list_categories().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        CategoryListResponse { items },
        "Category list retrieved successfully",
    )))
}

pub async fn get_category(
    service: &CategoryService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.get_category_by_id(id).await? {
        Some(category) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            category,
            "Category retrieved successfully",
        ))),
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CategoryNotFound,
            "Category not found",
        ))),
    }
}
