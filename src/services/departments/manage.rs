use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DepartmentService;
use crate::models::{
    ApiResponse, ErrorCode, FieldError,
    departments::requests::{CreateDepartmentRequest, UpdateDepartmentRequest},
};
use crate::services::{conflict_or_error, validation_failed};
use crate::utils::validate::validate_name;

fn normalize_code(code: Option<String>) -> Option<String> {
    code.map(|c| c.trim().to_uppercase()).filter(|c| !c.is_empty())
}

pub async fn create_department(
    service: &DepartmentService,
    mut req: CreateDepartmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_name(&req.name) {
        return Ok(validation_failed(
            ErrorCode::BadRequest,
            vec![FieldError::new("name", msg)],
        ));
    }
    req.name = req.name.trim().to_string();
    req.code = normalize_code(req.code);

    let storage = service.get_storage(request)?;
    match storage.create_department(req).await {
        Ok(department) => {
            tracing::info!("Department {} created", department.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(department, "院系创建成功")))
        }
        Err(e) => Ok(conflict_or_error(e, ErrorCode::DepartmentAlreadyExists)),
    }
}

pub async fn update_department(
    service: &DepartmentService,
    id: i64,
    mut req: UpdateDepartmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(name) = &req.name {
        if let Err(msg) = validate_name(name) {
            return Ok(validation_failed(
                ErrorCode::BadRequest,
                vec![FieldError::new("name", msg)],
            ));
        }
        req.name = Some(name.trim().to_string());
    }
    req.code = normalize_code(req.code);

    let storage = service.get_storage(request)?;
    match storage.update_department(id, req).await {
        Ok(Some(department)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            department,
            "院系更新成功",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::DepartmentNotFound,
            "Department not found",
        ))),
        Err(e) => Ok(conflict_or_error(e, ErrorCode::DepartmentAlreadyExists)),
    }
}

/// 仍被用户或课程引用时返回 409
pub async fn delete_department(
    service: &DepartmentService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.delete_department(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("院系删除成功"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::DepartmentNotFound,
            "Department not found",
        ))),
        Err(e) => Ok(conflict_or_error(e, ErrorCode::DepartmentInUse)),
    }
}
