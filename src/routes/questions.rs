use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, guard, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireRole};
use crate::models::questions::requests::{
    CreateQuestionRequest, QuestionListQuery, UpdateQuestionRequest,
};
use crate::services::QuestionService;
use crate::utils::SafeIDI64;

static QUESTION_SERVICE: Lazy<QuestionService> = Lazy::new(QuestionService::new_lazy);

pub async fn list_questions(
    req: HttpRequest,
    query: web::Query<QuestionListQuery>,
) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE.list_questions(query.into_inner(), &req).await
}

pub async fn create_question(
    req: HttpRequest,
    data: web::Json<CreateQuestionRequest>,
) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE.create_question(data.into_inner(), &req).await
}

pub async fn get_question(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE.get_question(id.0, &req).await
}

pub async fn update_question(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<UpdateQuestionRequest>,
) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE
        .update_question(id.0, data.into_inner(), &req)
        .await
}

pub async fn delete_question(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE.delete_question(id.0, &req).await
}

pub fn configure_question_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/questions")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .guard(guard::Post())
                    .wrap(RequireRole::admin())
                    .route(web::post().to(create_question)),
            )
            .route("", web::get().to(list_questions))
            .service(
                web::resource("/{id}")
                    .guard(guard::Any(guard::Put()).or(guard::Delete()))
                    .wrap(RequireRole::admin())
                    .route(web::put().to(update_question))
                    .route(web::delete().to(delete_question)),
            )
            .route("/{id}", web::get().to(get_question)),
    );
}
