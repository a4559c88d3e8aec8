pub mod manage;
pub mod query;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::departments::requests::{
    CreateDepartmentRequest, DepartmentListQuery, UpdateDepartmentRequest,
};
use crate::storage::Storage;

pub struct DepartmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl DepartmentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        Ok(super::storage_from_request(&self.storage, request)?)
    }

    pub async fn list_departments(
        &self,
        query: DepartmentListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        query::list_departments(self, query, request).await
    }

    pub async fn get_department(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        query::get_department(self, id, request).await
    }

    pub async fn create_department(
        &self,
        req: CreateDepartmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::create_department(self, req, request).await
    }

    pub async fn update_department(
        &self,
        id: i64,
        req: UpdateDepartmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_department(self, id, req, request).await
    }

    pub async fn delete_department(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::delete_department(self, id, request).await
    }
}
