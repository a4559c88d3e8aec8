pub mod manage;
pub mod query;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::questions::requests::{
    CreateQuestionRequest, QuestionListQuery, UpdateQuestionRequest,
};
use crate::storage::Storage;

pub struct QuestionService {
    storage: Option<Arc<dyn Storage>>,
}

impl QuestionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        Ok(super::storage_from_request(&self.storage, request)?)
    }

    pub async fn list_questions(
        &self,
        query: QuestionListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        query::list_questions(self, query, request).await
    }

    pub async fn get_question(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        query::get_question(self, id, request).await
    }

    pub async fn create_question(
        &self,
        req: CreateQuestionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::create_question(self, req, request).await
    }

    pub async fn update_question(
        &self,
        id: i64,
        req: UpdateQuestionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_question(self, id, req, request).await
    }

    // 删除即停用
    pub async fn delete_question(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::deactivate_question(self, id, request).await
    }
}
