//! 路径参数提取器
//!
//! 非正整数的 ID 直接返回 400，避免进入业务层。

use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};

use crate::errors::EvalSystemError;

/// 解析正整数 ID
pub fn parse_positive_id(raw: &str, field: &str) -> Result<i64, EvalSystemError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(EvalSystemError::validation(format!(
            "{field} must be a positive integer, got '{raw}'"
        ))),
    }
}

/// 定义从路径参数中提取 i64 ID 的提取器
macro_rules! define_safe_i64_extractor {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = EvalSystemError;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                let result = match req.match_info().get($param) {
                    Some(raw) => parse_positive_id(raw, $param).map($name),
                    None => Err(EvalSystemError::validation(concat!(
                        "missing path parameter: ",
                        $param
                    ))),
                };
                ready(result)
            }
        }
    };
}

define_safe_i64_extractor!(SafeIDI64, "id");

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_parse_positive_id() {
        assert_eq!(parse_positive_id("42", "id").unwrap(), 42);
        assert!(parse_positive_id("0", "id").is_err());
        assert!(parse_positive_id("-1", "id").is_err());
        assert!(parse_positive_id("abc", "id").is_err());
        assert!(parse_positive_id("9999999999999999999999", "id").is_err());
    }

    #[actix_web::test]
    async fn test_extractor_reads_match_info() {
        let req = TestRequest::default().param("id", "7").to_http_request();
        let id = SafeIDI64::extract(&req).await.unwrap();
        assert_eq!(id, SafeIDI64(7));

        let req = TestRequest::default().param("id", "x").to_http_request();
        assert!(SafeIDI64::extract(&req).await.is_err());
    }
}
