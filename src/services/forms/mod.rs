pub mod manage;
pub mod query;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::forms::requests::{CreateFormRequest, FormListQuery, UpdateFormRequest};
use crate::storage::Storage;

pub struct FormService {
    storage: Option<Arc<dyn Storage>>,
}

impl FormService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        Ok(super::storage_from_request(&self.storage, request)?)
    }

    pub async fn list_forms(
        &self,
        query: FormListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        query::list_forms(self, query, request).await
    }

    // 当前开放的表单
    pub async fn list_open_forms(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        query::list_open_forms(self, request).await
    }

    pub async fn get_form(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        query::get_form(self, id, request).await
    }

    // 表单题目，按分类分组
    pub async fn get_form_questions(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        query::get_form_questions(self, id, request).await
    }

    pub async fn create_form(
        &self,
        req: CreateFormRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::create_form(self, req, request).await
    }

    pub async fn update_form(
        &self,
        id: i64,
        req: UpdateFormRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_form(self, id, req, request).await
    }

    pub async fn delete_form(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        manage::delete_form(self, id, request).await
    }
}
