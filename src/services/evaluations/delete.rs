use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EvaluationService;
use crate::models::{ApiResponse, ErrorCode};

/// 连同评分一起删除（仅管理员，由路由限制）
pub async fn delete_evaluation(
    service: &EvaluationService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    if storage.delete_evaluation(id).await? {
        tracing::info!("Evaluation {} deleted", id);
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("评教记录已删除")))
    } else {
        Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EvaluationNotFound,
            "Evaluation not found",
        )))
    }
}
