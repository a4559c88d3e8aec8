//! 评教提交
//!
//! 校验顺序：请求格式 -> 提交身份 -> 参与人与评教流程 -> 课程与表单
//! -> 题目 -> 重复提交。通过后由存储层在单个事务内写入并计算总分。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;
use tracing::info;

use super::EvaluationService;
use crate::models::{
    ApiResponse, ErrorCode, FieldError,
    evaluations::{
        entities::EvaluationType,
        requests::{NewEvaluation, SubmitEvaluationRequest},
    },
    questions::entities::Question,
    users::entities::User,
};
use crate::services::{conflict_or_error, current_user, validation_failed};

/// 非管理员只能以自己的身份提交
pub(crate) fn may_submit_as(caller: &User, evaluator_id: i64) -> bool {
    caller.is_admin() || caller.id == evaluator_id
}

/// 每道作答题目必须存在且处于启用状态
pub(crate) fn check_questions(req: &SubmitEvaluationRequest, questions: &[Question]) -> Vec<FieldError> {
    let by_id: HashMap<i64, &Question> = questions.iter().map(|q| (q.id, q)).collect();

    req.responses
        .iter()
        .enumerate()
        .filter_map(|(idx, answer)| match by_id.get(&answer.question_id) {
            None => Some(FieldError::new(
                format!("responses[{idx}].question_id"),
                format!("question {} does not exist", answer.question_id),
            )),
            Some(q) if !q.is_active => Some(FieldError::new(
                format!("responses[{idx}].question_id"),
                format!("question {} is no longer active", answer.question_id),
            )),
            Some(_) => None,
        })
        .collect()
}

fn not_found(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(code, message))
}

pub async fn submit_evaluation(
    service: &EvaluationService,
    req: SubmitEvaluationRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = service.get_config();

    // 1-2. 请求格式
    let errors = req.validate(config.evaluation.rating_min, config.evaluation.rating_max);
    if !errors.is_empty() {
        return Ok(validation_failed(ErrorCode::EvaluationInvalid, errors));
    }

    // 3. 提交身份
    let caller = current_user(request)?;
    if !may_submit_as(&caller, req.evaluator_id) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::EvaluationPermissionDenied,
            "You can only submit evaluations as yourself",
        )));
    }

    let storage = service.get_storage(request)?;

    // 4. 参与人与评教流程
    let evaluator = match storage.get_user_by_id(req.evaluator_id).await? {
        Some(user) if user.is_active => user,
        _ => return Ok(not_found(ErrorCode::UserNotFound, "Evaluator not found")),
    };
    let evaluatee = match storage.get_user_by_id(req.evaluatee_id).await? {
        Some(user) if user.is_active => user,
        _ => return Ok(not_found(ErrorCode::UserNotFound, "Evaluatee not found")),
    };
    let Some(evaluation_type) = EvaluationType::for_flow(&evaluator, &evaluatee) else {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::EvaluationFlowNotAllowed,
            format!(
                "A {} may not evaluate this {} user",
                evaluator.role, evaluatee.role
            ),
        )));
    };

    // 5. 课程与表单
    if storage.get_course_by_id(req.course_id).await?.is_none() {
        return Ok(not_found(ErrorCode::CourseNotFound, "Course not found"));
    }
    let Some(form) = storage.get_form_by_id(req.form_id).await? else {
        return Ok(not_found(ErrorCode::FormNotFound, "Form not found"));
    };
    if !form.is_open_at(chrono::Utc::now()) {
        return Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(
            ErrorCode::FormNotOpen,
            format!(
                "Form {} is not open for submissions ({} - {})",
                form.id,
                form.start_at.to_rfc3339(),
                form.end_at.to_rfc3339()
            ),
        )));
    }

    // 6. 题目
    let questions = storage.get_questions_by_ids(&req.question_ids()).await?;
    let errors = check_questions(&req, &questions);
    if !errors.is_empty() {
        return Ok(validation_failed(ErrorCode::EvaluationInvalid, errors));
    }

    // 7. 重复提交
    if storage
        .evaluation_exists(req.evaluator_id, req.evaluatee_id, req.course_id, req.form_id)
        .await?
    {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::EvaluationAlreadyExists,
            "This evaluation has already been submitted",
        )));
    }

    let new_evaluation = NewEvaluation {
        evaluator_id: req.evaluator_id,
        evaluatee_id: req.evaluatee_id,
        course_id: req.course_id,
        form_id: req.form_id,
        evaluation_type,
        comments: req
            .comments
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty()),
        responses: req.responses,
    };

    match storage.submit_evaluation(new_evaluation).await {
        Ok(response) => {
            info!(
                "Evaluation {} submitted by user {} ({})",
                response.evaluation_id, caller.id, evaluation_type
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(response, "评教提交成功")))
        }
        Err(e) => Ok(conflict_or_error(e, ErrorCode::EvaluationAlreadyExists)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluations::requests::AnswerInput;
    use crate::models::users::entities::{UserRole, UserType};

    fn question(id: i64, is_active: bool) -> Question {
        let now = chrono::Utc::now();
        Question {
            id,
            category_id: 1,
            text: format!("Question {id}"),
            weight: 1.0,
            is_active,
            created_at: now,
            updated_at: now,
        }
    }

    fn request(question_ids: &[i64]) -> SubmitEvaluationRequest {
        SubmitEvaluationRequest {
            evaluator_id: 2,
            evaluatee_id: 1,
            course_id: 1,
            form_id: 1,
            responses: question_ids
                .iter()
                .map(|&question_id| AnswerInput {
                    question_id,
                    rating: 4.0,
                })
                .collect(),
            comments: None,
        }
    }

    fn user(id: i64, user_type: UserType) -> User {
        let now = chrono::Utc::now();
        User {
            id,
            first_name: "Juan".into(),
            middle_name: None,
            last_name: "Dela Cruz".into(),
            email: format!("user{id}@example.com"),
            password_hash: String::new(),
            user_type,
            role: UserRole::Student,
            department_id: None,
            is_active: true,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_unknown_and_inactive_questions_reported() {
        let req = request(&[1, 2, 3]);
        let errors = check_questions(&req, &[question(1, true), question(2, false)]);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "responses[1].question_id");
        assert!(errors[0].message.contains("no longer active"));
        assert_eq!(errors[1].field, "responses[2].question_id");
        assert!(errors[1].message.contains("does not exist"));
    }

    #[test]
    fn test_submit_identity() {
        assert!(may_submit_as(&user(2, UserType::User), 2));
        assert!(!may_submit_as(&user(3, UserType::User), 2));
        assert!(may_submit_as(&user(9, UserType::Admin), 2));
    }
}
