use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::evaluations::{ActiveModel, Column, Entity as Evaluations};
use crate::entity::{categories, evaluation_responses, questions};
use crate::errors::{EvalSystemError, Result};
use crate::models::{
    PageRequest,
    evaluations::{
        entities::Evaluation,
        requests::{EvaluationListQuery, NewEvaluation},
        responses::{EvaluationDetailResponse, EvaluationListResponse, SubmitEvaluationResponse},
        scoring::{ScoredAnswer, compute_overall_score},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 提交评教
    ///
    /// 评教记录与全部评分在同一事务内写入，随后在事务内计算总分并回写，
    /// 任一步失败都会回滚（事务在 drop 时自动回滚）。
    pub async fn submit_evaluation_impl(
        &self,
        new: NewEvaluation,
    ) -> Result<SubmitEvaluationResponse> {
        if new.responses.is_empty() {
            return Err(EvalSystemError::validation("评教至少需要一条评分"));
        }

        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let evaluation = ActiveModel {
            evaluator_id: Set(new.evaluator_id),
            evaluatee_id: Set(new.evaluatee_id),
            course_id: Set(new.course_id),
            form_id: Set(new.form_id),
            evaluation_type: Set(new.evaluation_type.to_string()),
            overall_score: Set(0.0),
            comments: Set(new.comments),
            submitted_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| match EvalSystemError::from_db_err("写入评教失败", e) {
            EvalSystemError::Conflict(_) => {
                EvalSystemError::conflict("该评价人已在此表单下评价过该教师的这门课程")
            }
            other => other,
        })?;

        let rows = new
            .responses
            .iter()
            .map(|answer| evaluation_responses::ActiveModel {
                evaluation_id: Set(evaluation.id),
                question_id: Set(answer.question_id),
                rating: Set(answer.rating),
                ..Default::default()
            })
            .collect::<Vec<_>>();

        evaluation_responses::Entity::insert_many(rows)
            .exec(&txn)
            .await
            .map_err(|e| EvalSystemError::from_db_err("写入评分失败", e))?;

        // 读取题目权重与分类权重
        let question_ids: Vec<i64> = new.responses.iter().map(|a| a.question_id).collect();
        let weights: HashMap<i64, (i64, f64, f64)> = questions::Entity::find()
            .filter(questions::Column::Id.is_in(question_ids))
            .find_also_related(categories::Entity)
            .all(&txn)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询题目权重失败: {e}")))?
            .into_iter()
            .filter_map(|(question, category)| {
                category.map(|c| (question.id, (c.id, c.weight, question.weight)))
            })
            .collect();

        let mut scored = Vec::with_capacity(new.responses.len());
        for answer in &new.responses {
            let Some(&(category_id, category_weight, question_weight)) =
                weights.get(&answer.question_id)
            else {
                return Err(EvalSystemError::validation(format!(
                    "题目 {} 不存在",
                    answer.question_id
                )));
            };
            scored.push(ScoredAnswer {
                category_id,
                category_weight,
                question_weight,
                rating: answer.rating,
            });
        }

        let breakdown = compute_overall_score(&scored);

        ActiveModel {
            id: Set(evaluation.id),
            overall_score: Set(breakdown.overall),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(|e| EvalSystemError::database_operation(format!("回写总分失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("提交事务失败: {e}")))?;

        tracing::info!(
            "评教已提交: id={}, evaluator={}, evaluatee={}, score={}",
            evaluation.id,
            new.evaluator_id,
            new.evaluatee_id,
            breakdown.overall
        );

        Ok(SubmitEvaluationResponse {
            evaluation_id: evaluation.id,
            overall_score: breakdown.overall,
            category_scores: breakdown.categories,
        })
    }

    pub async fn evaluation_exists_impl(
        &self,
        evaluator_id: i64,
        evaluatee_id: i64,
        course_id: i64,
        form_id: i64,
    ) -> Result<bool> {
        let count = Evaluations::find()
            .filter(Column::EvaluatorId.eq(evaluator_id))
            .filter(Column::EvaluateeId.eq(evaluatee_id))
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::FormId.eq(form_id))
            .count(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询评教记录失败: {e}")))?;

        Ok(count > 0)
    }

    pub async fn get_evaluation_by_id_impl(&self, id: i64) -> Result<Option<Evaluation>> {
        let result = Evaluations::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询评教记录失败: {e}")))?;

        Ok(result.map(|m| m.into_evaluation()))
    }

    pub async fn get_evaluation_detail_impl(
        &self,
        id: i64,
    ) -> Result<Option<EvaluationDetailResponse>> {
        let Some(evaluation) = self.get_evaluation_by_id_impl(id).await? else {
            return Ok(None);
        };

        let responses = evaluation_responses::Entity::find()
            .filter(evaluation_responses::Column::EvaluationId.eq(id))
            .order_by_asc(evaluation_responses::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询评分失败: {e}")))?;

        Ok(Some(EvaluationDetailResponse {
            evaluation,
            responses: responses.into_iter().map(|m| m.into_answer()).collect(),
        }))
    }

    pub async fn list_evaluations_with_pagination_impl(
        &self,
        query: EvaluationListQuery,
        visible_to: Option<i64>,
    ) -> Result<EvaluationListResponse> {
        let page = PageRequest::new(query.page, query.size);

        let mut select = Evaluations::find();

        if let Some(user_id) = visible_to {
            select = select.filter(
                Condition::any()
                    .add(Column::EvaluatorId.eq(user_id))
                    .add(Column::EvaluateeId.eq(user_id)),
            );
        }

        if let Some(evaluator_id) = query.evaluator_id {
            select = select.filter(Column::EvaluatorId.eq(evaluator_id));
        }

        if let Some(evaluatee_id) = query.evaluatee_id {
            select = select.filter(Column::EvaluateeId.eq(evaluatee_id));
        }

        if let Some(course_id) = query.course_id {
            select = select.filter(Column::CourseId.eq(course_id));
        }

        if let Some(form_id) = query.form_id {
            select = select.filter(Column::FormId.eq(form_id));
        }

        let paginator = select
            .order_by_desc(Column::SubmittedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, page.size);
        let total = paginator.num_items().await.map_err(|e| {
            EvalSystemError::database_operation(format!("查询评教总数失败: {e}"))
        })?;
        let pages = paginator.num_pages().await.map_err(|e| {
            EvalSystemError::database_operation(format!("查询评教页数失败: {e}"))
        })?;
        let items = paginator.fetch_page(page.page_index()).await.map_err(|e| {
            EvalSystemError::database_operation(format!("查询评教列表失败: {e}"))
        })?;

        Ok(EvaluationListResponse {
            items: items.into_iter().map(|m| m.into_evaluation()).collect(),
            pagination: page.info(total, pages),
        })
    }

    /// 删除评教及其评分
    pub async fn delete_evaluation_impl(&self, id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("开启事务失败: {e}")))?;

        evaluation_responses::Entity::delete_many()
            .filter(evaluation_responses::Column::EvaluationId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("删除评分失败: {e}")))?;

        let result = Evaluations::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("删除评教失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
