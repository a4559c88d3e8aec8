use std::collections::BTreeMap;

use super::SeaOrmStorage;
use crate::entity::categories;
use crate::entity::questions::{ActiveModel, Column, Entity as Questions};
use crate::errors::{EvalSystemError, Result};
use crate::models::{
    PageRequest,
    forms::responses::CategoryQuestions,
    questions::{
        entities::Question,
        requests::{CreateQuestionRequest, QuestionListQuery, UpdateQuestionRequest},
        responses::QuestionListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_question_impl(&self, req: CreateQuestionRequest) -> Result<Question> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            category_id: Set(req.category_id),
            text: Set(req.text),
            weight: Set(req.weight.unwrap_or(1.0)),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EvalSystemError::from_db_err("创建题目失败", e))?;

        Ok(result.into_question())
    }

    pub async fn get_question_by_id_impl(&self, id: i64) -> Result<Option<Question>> {
        let result = Questions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询题目失败: {e}")))?;

        Ok(result.map(|m| m.into_question()))
    }

    pub async fn get_questions_by_ids_impl(&self, ids: &[i64]) -> Result<Vec<Question>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let items = Questions::find()
            .filter(Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询题目失败: {e}")))?;

        Ok(items.into_iter().map(|m| m.into_question()).collect())
    }

    pub async fn list_questions_with_pagination_impl(
        &self,
        query: QuestionListQuery,
    ) -> Result<QuestionListResponse> {
        let page = PageRequest::new(query.page, query.size);

        let mut select = Questions::find();

        if let Some(category_id) = query.category_id {
            select = select.filter(Column::CategoryId.eq(category_id));
        }

        if !query.include_inactive.unwrap_or(false) {
            select = select.filter(Column::IsActive.eq(true));
        }

        let paginator = select
            .order_by_asc(Column::CategoryId)
            .order_by_asc(Column::Id)
            .paginate(&self.db, page.size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询题目总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询题目页数失败: {e}")))?;
        let items = paginator
            .fetch_page(page.page_index())
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询题目列表失败: {e}")))?;

        Ok(QuestionListResponse {
            items: items.into_iter().map(|m| m.into_question()).collect(),
            pagination: page.info(total, pages),
        })
    }

    pub async fn update_question_impl(
        &self,
        id: i64,
        update: UpdateQuestionRequest,
    ) -> Result<Option<Question>> {
        if self.get_question_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(category_id) = update.category_id {
            model.category_id = Set(category_id);
        }

        if let Some(text) = update.text {
            model.text = Set(text);
        }

        if let Some(weight) = update.weight {
            model.weight = Set(weight);
        }

        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| EvalSystemError::from_db_err("更新题目失败", e))?;

        Ok(Some(updated.into_question()))
    }

    /// 停用题目
    pub async fn deactivate_question_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Questions::update_many()
            .col_expr(Column::IsActive, sea_orm::sea_query::Expr::value(false))
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("停用题目失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 启用的题目按分类分组，分类按名称排序，没有启用题目的分类不返回
    pub async fn list_active_questions_grouped_impl(&self) -> Result<Vec<CategoryQuestions>> {
        let rows = Questions::find()
            .filter(Column::IsActive.eq(true))
            .find_also_related(categories::Entity)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询表单题目失败: {e}")))?;

        let mut groups: BTreeMap<(String, i64), CategoryQuestions> = BTreeMap::new();
        for (question, category) in rows {
            let Some(category) = category else {
                continue;
            };
            groups
                .entry((category.name.clone(), category.id))
                .or_insert_with(|| CategoryQuestions {
                    category: category.into_category(),
                    questions: Vec::new(),
                })
                .questions
                .push(question.into_question());
        }

        Ok(groups.into_values().collect())
    }
}
