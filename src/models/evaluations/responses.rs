use super::entities::{EvaluationAnswer, Evaluation};
use super::scoring::CategoryScore;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

// 提交成功后的结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct SubmitEvaluationResponse {
    pub evaluation_id: i64,
    pub overall_score: f64,
    pub category_scores: Vec<CategoryScore>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct EvaluationDetailResponse {
    pub evaluation: Evaluation,
    pub responses: Vec<EvaluationAnswer>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct EvaluationListResponse {
    pub items: Vec<Evaluation>,
    pub pagination: PaginationInfo,
}
