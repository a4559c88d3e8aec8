use serde::Deserialize;
use std::collections::HashSet;
use ts_rs::TS;

use super::entities::EvaluationType;
use crate::models::FieldError;

// 单题作答
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct AnswerInput {
    pub question_id: i64,
    pub rating: f64,
}

// 提交评教请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct SubmitEvaluationRequest {
    pub evaluator_id: i64,
    pub evaluatee_id: i64,
    pub course_id: i64,
    pub form_id: i64,
    #[serde(default)]
    pub responses: Vec<AnswerInput>,
    pub comments: Option<String>,
}

impl SubmitEvaluationRequest {
    /// 校验请求本身的格式，返回全部字段错误
    pub fn validate(&self, rating_min: f64, rating_max: f64) -> Vec<FieldError> {
        let mut errors = Vec::new();

        for (field, value) in [
            ("evaluator_id", self.evaluator_id),
            ("evaluatee_id", self.evaluatee_id),
            ("course_id", self.course_id),
            ("form_id", self.form_id),
        ] {
            if value <= 0 {
                errors.push(FieldError::new(field, "must be a positive integer"));
            }
        }

        if self.responses.is_empty() {
            errors.push(FieldError::new("responses", "must contain at least one answer"));
        }

        let mut seen = HashSet::new();
        for (idx, answer) in self.responses.iter().enumerate() {
            if answer.question_id <= 0 {
                errors.push(FieldError::new(
                    format!("responses[{idx}].question_id"),
                    "must be a positive integer",
                ));
            } else if !seen.insert(answer.question_id) {
                errors.push(FieldError::new(
                    format!("responses[{idx}].question_id"),
                    format!("question {} is answered more than once", answer.question_id),
                ));
            }

            if !answer.rating.is_finite() || answer.rating < rating_min || answer.rating > rating_max
            {
                errors.push(FieldError::new(
                    format!("responses[{idx}].rating"),
                    format!("must be between {rating_min} and {rating_max}"),
                ));
            }
        }

        errors
    }

    pub fn question_ids(&self) -> Vec<i64> {
        self.responses.iter().map(|a| a.question_id).collect()
    }
}

/// 已通过校验、待写入的评教（用于存储层）
#[derive(Debug, Clone)]
pub struct NewEvaluation {
    pub evaluator_id: i64,
    pub evaluatee_id: i64,
    pub course_id: i64,
    pub form_id: i64,
    pub evaluation_type: EvaluationType,
    pub comments: Option<String>,
    pub responses: Vec<AnswerInput>,
}

// 评教列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct EvaluationListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub evaluator_id: Option<i64>,
    pub evaluatee_id: Option<i64>,
    pub course_id: Option<i64>,
    pub form_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(responses: Vec<AnswerInput>) -> SubmitEvaluationRequest {
        SubmitEvaluationRequest {
            evaluator_id: 2,
            evaluatee_id: 1,
            course_id: 1,
            form_id: 1,
            responses,
            comments: None,
        }
    }

    fn answer(question_id: i64, rating: f64) -> AnswerInput {
        AnswerInput {
            question_id,
            rating,
        }
    }

    #[test]
    fn test_valid_request_has_no_errors() {
        let req = request(vec![answer(1, 5.0), answer(2, 3.5)]);
        assert!(req.validate(1.0, 5.0).is_empty());
    }

    #[test]
    fn test_empty_responses_rejected() {
        let errors = request(vec![]).validate(1.0, 5.0);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "responses");
    }

    #[test]
    fn test_duplicate_question_rejected() {
        let errors = request(vec![answer(7, 4.0), answer(7, 5.0)]).validate(1.0, 5.0);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "responses[1].question_id");
    }

    #[test]
    fn test_rating_bounds_and_nan() {
        let errors =
            request(vec![answer(1, 0.5), answer(2, 5.5), answer(3, f64::NAN)]).validate(1.0, 5.0);
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "responses[0].rating",
                "responses[1].rating",
                "responses[2].rating"
            ]
        );
    }

    #[test]
    fn test_non_positive_ids_rejected() {
        let mut req = request(vec![answer(1, 3.0)]);
        req.form_id = 0;
        req.evaluator_id = -4;
        let errors = req.validate(1.0, 5.0);
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["evaluator_id", "form_id"]);
    }
}
