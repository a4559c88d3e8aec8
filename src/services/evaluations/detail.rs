use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EvaluationService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;

pub async fn get_evaluation(
    service: &EvaluationService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    let storage = service.get_storage(request)?;

    let Some(detail) = storage.get_evaluation_detail(id).await? else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EvaluationNotFound,
            "Evaluation not found",
        )));
    };

    let evaluation = &detail.evaluation;
    let participant = caller.id == evaluation.evaluator_id || caller.id == evaluation.evaluatee_id;
    if !caller.is_admin() && !participant {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::EvaluationPermissionDenied,
            "You do not have access to this evaluation",
        )));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        detail,
        "Evaluation retrieved successfully",
    )))
}
