//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码、类型名称和 HTTP 状态码。

use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use sea_orm::{DbErr, SqlErr};

use crate::models::{ApiResponse, ErrorCode};

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - http_status() 方法 - 返回对应的 HTTP 状态码
/// - 便捷构造函数
macro_rules! define_eval_system_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal, $status:ident)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum EvalSystemError {
            $($variant(String),)*
        }

        impl EvalSystemError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(EvalSystemError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(EvalSystemError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(EvalSystemError::$variant(msg) => msg,)*
                }
            }

            /// 获取 HTTP 状态码
            pub fn http_status(&self) -> StatusCode {
                match self {
                    $(EvalSystemError::$variant(_) => StatusCode::$status,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl EvalSystemError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        EvalSystemError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_eval_system_errors! {
    CacheConnection("E001", "Cache Connection Error", INTERNAL_SERVER_ERROR),
    CachePluginNotFound("E002", "Cache Plugin Not Found", INTERNAL_SERVER_ERROR),
    DatabaseConfig("E003", "Database Configuration Error", INTERNAL_SERVER_ERROR),
    DatabaseConnection("E004", "Database Connection Error", INTERNAL_SERVER_ERROR),
    DatabaseOperation("E005", "Database Operation Error", INTERNAL_SERVER_ERROR),
    FileOperation("E006", "File Operation Error", INTERNAL_SERVER_ERROR),
    Validation("E007", "Validation Error", BAD_REQUEST),
    NotFound("E008", "Resource Not Found", NOT_FOUND),
    Serialization("E009", "Serialization Error", INTERNAL_SERVER_ERROR),
    DateParse("E011", "Date Parse Error", BAD_REQUEST),
    Authentication("E012", "Authentication Error", UNAUTHORIZED),
    Authorization("E013", "Authorization Error", FORBIDDEN),
    Conflict("E014", "Resource Conflict", CONFLICT),
    InvalidReference("E015", "Invalid Reference", BAD_REQUEST),
    Unprocessable("E016", "Unprocessable Request", UNPROCESSABLE_ENTITY),
}

impl EvalSystemError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 根据数据库约束类型归类 DbErr
    ///
    /// 唯一约束冲突 -> Conflict，外键约束 -> InvalidReference，其余 -> DatabaseOperation
    pub fn from_db_err(context: &str, err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                EvalSystemError::conflict(format!("{context}: {detail}"))
            }
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                EvalSystemError::invalid_reference(format!("{context}: {detail}"))
            }
            _ => EvalSystemError::database_operation(format!("{context}: {err}")),
        }
    }

    /// 对应的业务错误码
    pub fn error_code(&self) -> ErrorCode {
        match self.http_status() {
            StatusCode::BAD_REQUEST => ErrorCode::BadRequest,
            StatusCode::UNAUTHORIZED => ErrorCode::Unauthorized,
            StatusCode::FORBIDDEN => ErrorCode::Forbidden,
            StatusCode::NOT_FOUND => ErrorCode::NotFound,
            StatusCode::CONFLICT => ErrorCode::Conflict,
            StatusCode::UNPROCESSABLE_ENTITY => ErrorCode::Unprocessable,
            _ => ErrorCode::InternalServerError,
        }
    }
}

impl fmt::Display for EvalSystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for EvalSystemError {}

impl ResponseError for EvalSystemError {
    fn status_code(&self) -> StatusCode {
        self.http_status()
    }

    fn error_response(&self) -> HttpResponse {
        if self.http_status().is_server_error() {
            tracing::error!("[{}] {}", self.code(), self.format_simple());
        }
        HttpResponse::build(self.http_status())
            .json(ApiResponse::error_empty(self.error_code(), self.message()))
    }
}

// 为常见的错误类型实现 From trait
impl From<DbErr> for EvalSystemError {
    fn from(err: DbErr) -> Self {
        EvalSystemError::from_db_err("数据库操作失败", err)
    }
}

impl From<std::io::Error> for EvalSystemError {
    fn from(err: std::io::Error) -> Self {
        EvalSystemError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for EvalSystemError {
    fn from(err: serde_json::Error) -> Self {
        EvalSystemError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for EvalSystemError {
    fn from(err: chrono::ParseError) -> Self {
        EvalSystemError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EvalSystemError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(EvalSystemError::cache_connection("test").code(), "E001");
        assert_eq!(EvalSystemError::database_config("test").code(), "E003");
        assert_eq!(EvalSystemError::validation("test").code(), "E007");
        assert_eq!(EvalSystemError::authentication("test").code(), "E012");
        assert_eq!(EvalSystemError::conflict("test").code(), "E014");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            EvalSystemError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(
            EvalSystemError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            EvalSystemError::validation("x").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            EvalSystemError::not_found("x").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            EvalSystemError::conflict("x").http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            EvalSystemError::unprocessable("x").http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            EvalSystemError::database_operation("x").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_code_follows_status() {
        assert_eq!(
            EvalSystemError::conflict("dup").error_code(),
            ErrorCode::Conflict
        );
        assert_eq!(
            EvalSystemError::invalid_reference("fk").error_code(),
            ErrorCode::BadRequest
        );
        assert_eq!(
            EvalSystemError::cache_connection("down").error_code(),
            ErrorCode::InternalServerError
        );
    }

    #[test]
    fn test_generic_db_err_is_operation_error() {
        let err = EvalSystemError::from_db_err("查询失败", DbErr::Custom("boom".into()));
        assert_eq!(err.code(), "E005");
        assert!(err.message().contains("查询失败"));
    }

    #[test]
    fn test_format_simple() {
        let err = EvalSystemError::validation("Invalid rating");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid rating"));
    }
}
