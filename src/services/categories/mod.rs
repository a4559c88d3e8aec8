pub mod manage;
pub mod query;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::categories::requests::{CreateCategoryRequest, UpdateCategoryRequest};
use crate::storage::Storage;

pub struct CategoryService {
    storage: Option<Arc<dyn Storage>>,
}

impl CategoryService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        Ok(super::storage_from_request(&self.storage, request)?)
    }

    pub async fn list_categories(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        query::list_categories(self, request).await
    }

    pub async fn get_category(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        query::get_category(self, id, request).await
    }

    pub async fn create_category(
        &self,
        req: CreateCategoryRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::create_category(self, req, request).await
    }

    pub async fn update_category(
        &self,
        id: i64,
        req: UpdateCategoryRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_category(self, id, req, request).await
    }

    pub async fn delete_category(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::delete_category(self, id, request).await
    }
}
