use super::entities::EvaluationForm;
use crate::models::categories::entities::Category;
use crate::models::common::PaginationInfo;
use crate::models::questions::entities::Question;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/form.ts")]
pub struct FormListResponse {
    pub items: Vec<EvaluationForm>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/form.ts")]
pub struct OpenFormsResponse {
    pub items: Vec<EvaluationForm>,
}

// 按分类分组的题目
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/form.ts")]
pub struct CategoryQuestions {
    pub category: Category,
    pub questions: Vec<Question>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/form.ts")]
pub struct FormQuestionsResponse {
    pub form: EvaluationForm,
    pub categories: Vec<CategoryQuestions>,
}
