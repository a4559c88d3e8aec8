use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FormService;
use crate::models::{
    ApiResponse, ErrorCode,
    forms::{
        requests::FormListQuery,
        responses::{FormQuestionsResponse, OpenFormsResponse},
    },
};

pub async fn list_forms(
    service: &FormService,
    query: FormListQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let response = storage.list_forms_with_pagination(query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Form list retrieved successfully",
    )))
}

pub async fn list_open_forms(
    service: &FormService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let items = storage.list_open_forms(chrono::Utc::now()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        OpenFormsResponse { items },
        "Open forms retrieved successfully",
    )))
}

pub async fn get_form(
    service: &FormService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.get_form_by_id(id).await? {
        Some(form) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            form,
            "Form retrieved successfully",
        ))),
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::FormNotFound,
            "Form not found",
        ))),
    }
}

pub async fn get_form_questions(
    service: &FormService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let Some(form) = storage.get_form_by_id(id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::FormNotFound,
            "Form not found",
        )));
    };

    let categories = storage.list_active_questions_grouped().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        FormQuestionsResponse { form, categories },
        "Form questions retrieved successfully",
    )))
}
