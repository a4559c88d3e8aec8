use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, guard, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit, RequireRole};
use crate::models::evaluations::requests::{EvaluationListQuery, SubmitEvaluationRequest};
use crate::services::EvaluationService;
use crate::utils::SafeIDI64;

static EVALUATION_SERVICE: Lazy<EvaluationService> = Lazy::new(EvaluationService::new_lazy);

pub async fn submit_evaluation(
    req: HttpRequest,
    data: web::Json<SubmitEvaluationRequest>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .submit_evaluation(data.into_inner(), &req)
        .await
}

pub async fn list_evaluations(
    req: HttpRequest,
    query: web::Query<EvaluationListQuery>,
) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE
        .list_evaluations(query.into_inner(), &req)
        .await
}

pub async fn get_evaluation(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE.get_evaluation(id.0, &req).await
}

pub async fn delete_evaluation(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    EVALUATION_SERVICE.delete_evaluation(id.0, &req).await
}

pub fn configure_evaluation_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/evaluations")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .guard(guard::Post())
                    .wrap(RateLimit::evaluation_submit())
                    .route(web::post().to(submit_evaluation)),
            )
            .route("", web::get().to(list_evaluations))
            .service(
                web::resource("/{id}")
                    .guard(guard::Delete())
                    .wrap(RequireRole::admin())
                    .route(web::delete().to(delete_evaluation)),
            )
            .route("/{id}", web::get().to(get_evaluation)),
    );
}
