use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, guard, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequireRole};
use crate::models::categories::requests::{CreateCategoryRequest, UpdateCategoryRequest};
use crate::services::CategoryService;
use crate::utils::SafeIDI64;

static CATEGORY_SERVICE: Lazy<CategoryService> = Lazy::new(CategoryService::new_lazy);

pub async fn list_categories(req: HttpRequest) -> ActixResult<HttpResponse> {
    CATEGORY_SERVICE.list_categories(&req).await
}

pub async fn create_category(
    req: HttpRequest,
    data: web::Json<CreateCategoryRequest>,
) -> ActixResult<HttpResponse> {
    CATEGORY_SERVICE.create_category(data.into_inner(), &req).await
}

pub async fn get_category(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    CATEGORY_SERVICE.get_category(id.0, &req).await
}

pub async fn update_category(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<UpdateCategoryRequest>,
) -> ActixResult<HttpResponse> {
    CATEGORY_SERVICE
        .update_category(id.0, data.into_inner(), &req)
        .await
}

pub async fn delete_category(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    CATEGORY_SERVICE.delete_category(id.0, &req).await
}

pub fn configure_category_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/categories")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .guard(guard::Post())
                    .wrap(RequireRole::admin())
                    .route(web::post().to(create_category)),
            )
            .route("", web::get().to(list_categories))
            .service(
                web::resource("/{id}")
                    .guard(guard::Any(guard::Put()).or(guard::Delete()))
                    .wrap(RequireRole::admin())
                    .route(web::put().to(update_category))
                    .route(web::delete().to(delete_category)),
            )
            .route("/{id}", web::get().to(get_category)),
    );
}
