//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod categories;
pub mod courses;
pub mod departments;
pub mod evaluation_forms;
pub mod evaluation_responses;
pub mod evaluations;
pub mod faculty_profiles;
pub mod questions;
pub mod student_profiles;
pub mod supervisor_profiles;
pub mod users;

use chrono::{DateTime, Utc};

/// 数据库中的秒级时间戳转换为 UTC 时间
pub(crate) fn timestamp_to_utc(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}
