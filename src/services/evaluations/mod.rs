pub mod delete;
pub mod detail;
pub mod list;
pub mod submit;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::evaluations::requests::{EvaluationListQuery, SubmitEvaluationRequest};
use crate::storage::Storage;

pub struct EvaluationService {
    storage: Option<Arc<dyn Storage>>,
}

impl EvaluationService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        Ok(super::storage_from_request(&self.storage, request)?)
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 提交评教
    pub async fn submit_evaluation(
        &self,
        req: SubmitEvaluationRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_evaluation(self, req, request).await
    }

    pub async fn list_evaluations(
        &self,
        query: EvaluationListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_evaluations(self, query, request).await
    }

    pub async fn get_evaluation(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        detail::get_evaluation(self, id, request).await
    }

    pub async fn delete_evaluation(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_evaluation(self, id, request).await
    }
}
