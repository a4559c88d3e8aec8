use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::QuestionService;
use crate::models::{
    ApiResponse, ErrorCode, FieldError,
    questions::requests::{CreateQuestionRequest, UpdateQuestionRequest},
};
use crate::services::{conflict_or_error, validation_failed};
use crate::utils::validate::validate_weight;

const MAX_QUESTION_LEN: usize = 1000;

fn validate_text(text: &str) -> Option<FieldError> {
    let len = text.trim().chars().count();
    if len == 0 {
        Some(FieldError::new("text", "must not be empty"))
    } else if len > MAX_QUESTION_LEN {
        Some(FieldError::new(
            "text",
            format!("must be at most {MAX_QUESTION_LEN} characters"),
        ))
    } else {
        None
    }
}

pub async fn create_question(
    service: &QuestionService,
    mut req: CreateQuestionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let mut errors = Vec::new();
    errors.extend(validate_text(&req.text));
    if let Some(weight) = req.weight
        && let Err(msg) = validate_weight(weight)
    {
        errors.push(FieldError::new("weight", msg));
    }
    if storage.get_category_by_id(req.category_id).await?.is_none() {
        errors.push(FieldError::new("category_id", "category does not exist"));
    }
    if !errors.is_empty() {
        return Ok(validation_failed(ErrorCode::QuestionInvalid, errors));
    }
    req.text = req.text.trim().to_string();

    match storage.create_question(req).await {
        Ok(question) => {
            tracing::info!(
                "Question {} created in category {}",
                question.id,
                question.category_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(question, "题目创建成功")))
        }
        Err(e) => Ok(conflict_or_error(e, ErrorCode::QuestionAlreadyExists)),
    }
}

pub async fn update_question(
    service: &QuestionService,
    id: i64,
    mut req: UpdateQuestionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let mut errors = Vec::new();
    if let Some(text) = &req.text {
        errors.extend(validate_text(text));
    }
    if let Some(weight) = req.weight
        && let Err(msg) = validate_weight(weight)
    {
        errors.push(FieldError::new("weight", msg));
    }
    if let Some(category_id) = req.category_id
        && storage.get_category_by_id(category_id).await?.is_none()
    {
        errors.push(FieldError::new("category_id", "category does not exist"));
    }
    if !errors.is_empty() {
        return Ok(validation_failed(ErrorCode::QuestionInvalid, errors));
    }
    req.text = req.text.map(|t| t.trim().to_string());

    match storage.update_question(id, req).await {
        Ok(Some(question)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(question, "题目更新成功")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::QuestionNotFound,
            "Question not found",
        ))),
        Err(e) => Ok(conflict_or_error(e, ErrorCode::QuestionAlreadyExists)),
    }
}

/// 已有评分仍引用题目，因此只做停用
pub async fn deactivate_question(
    service: &QuestionService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    if storage.deactivate_question(id).await? {
        tracing::info!("Question {} deactivated", id);
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("题目已停用")))
    } else {
        Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::QuestionNotFound,
            "Question not found",
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_text_bounds() {
        assert!(validate_text("Explains concepts clearly").is_none());
        assert!(validate_text("  ").is_some());
        assert!(validate_text(&"x".repeat(MAX_QUESTION_LEN + 1)).is_some());
    }
}
