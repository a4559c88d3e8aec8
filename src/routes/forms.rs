use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, guard, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireRole};
use crate::models::forms::requests::{CreateFormRequest, FormListQuery, UpdateFormRequest};
use crate::services::FormService;
use crate::utils::SafeIDI64;

static FORM_SERVICE: Lazy<FormService> = Lazy::new(FormService::new_lazy);

pub async fn list_forms(
    req: HttpRequest,
    query: web::Query<FormListQuery>,
) -> ActixResult<HttpResponse> {
    FORM_SERVICE.list_forms(query.into_inner(), &req).await
}

pub async fn list_open_forms(req: HttpRequest) -> ActixResult<HttpResponse> {
    FORM_SERVICE.list_open_forms(&req).await
}

pub async fn create_form(
    req: HttpRequest,
    data: web::Json<CreateFormRequest>,
) -> ActixResult<HttpResponse> {
    FORM_SERVICE.create_form(data.into_inner(), &req).await
}

pub async fn get_form(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FORM_SERVICE.get_form(id.0, &req).await
}

pub async fn get_form_questions(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FORM_SERVICE.get_form_questions(id.0, &req).await
}

pub async fn update_form(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<UpdateFormRequest>,
) -> ActixResult<HttpResponse> {
    FORM_SERVICE.update_form(id.0, data.into_inner(), &req).await
}

pub async fn delete_form(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FORM_SERVICE.delete_form(id.0, &req).await
}

pub fn configure_form_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/forms")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .guard(guard::Post())
                    .wrap(RequireRole::admin())
                    .route(web::post().to(create_form)),
            )
            .route("", web::get().to(list_forms))
            // 必须在 /{id} 之前注册
            .route("/open", web::get().to(list_open_forms))
            .route("/{id}/questions", web::get().to(get_form_questions))
            .service(
                web::resource("/{id}")
                    .guard(guard::Any(guard::Put()).or(guard::Delete()))
                    .wrap(RequireRole::admin())
                    .route(web::put().to(update_form))
                    .route(web::delete().to(delete_form)),
            )
            .route("/{id}", web::get().to(get_form)),
    );
}
