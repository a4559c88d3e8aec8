use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EvaluationService;
use crate::models::{ApiResponse, evaluations::requests::EvaluationListQuery};
use crate::services::current_user;

/// 非管理员只能看到自己参与（评价或被评价）的评教
pub async fn list_evaluations(
    service: &EvaluationService,
    query: EvaluationListQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let caller = current_user(request)?;
    let visible_to = (!caller.is_admin()).then_some(caller.id);

    let storage = service.get_storage(request)?;
    let response = storage
        .list_evaluations_with_pagination(query, visible_to)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Evaluation list retrieved successfully",
    )))
}
