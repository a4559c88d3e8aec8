use super::SeaOrmStorage;
use crate::entity::evaluation_forms::{ActiveModel, Column, Entity as EvaluationForms};
use crate::errors::{EvalSystemError, Result};
use crate::models::{
    PageRequest,
    forms::{
        entities::EvaluationForm,
        requests::{CreateFormRequest, FormListQuery, UpdateFormRequest},
        responses::FormListResponse,
    },
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_form_impl(&self, req: CreateFormRequest) -> Result<EvaluationForm> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            title: Set(req.title),
            description: Set(req.description),
            school_year: Set(req.school_year),
            semester: Set(req.semester.to_string()),
            start_at: Set(req.start_at.timestamp()),
            end_at: Set(req.end_at.timestamp()),
            is_active: Set(req.is_active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EvalSystemError::from_db_err("创建评教表单失败", e))?;

        Ok(result.into_form())
    }

    pub async fn get_form_by_id_impl(&self, id: i64) -> Result<Option<EvaluationForm>> {
        let result = EvaluationForms::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询评教表单失败: {e}")))?;

        Ok(result.map(|m| m.into_form()))
    }

    pub async fn list_forms_with_pagination_impl(
        &self,
        query: FormListQuery,
    ) -> Result<FormListResponse> {
        let page = PageRequest::new(query.page, query.size);

        let mut select = EvaluationForms::find();

        if let Some(is_active) = query.is_active {
            select = select.filter(Column::IsActive.eq(is_active));
        }

        if let Some(ref school_year) = query.school_year {
            select = select.filter(Column::SchoolYear.eq(school_year.as_str()));
        }

        if let Some(semester) = query.semester {
            select = select.filter(Column::Semester.eq(semester.to_string()));
        }

        let paginator = select
            .order_by_desc(Column::StartAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, page.size);
        let total = paginator.num_items().await.map_err(|e| {
            EvalSystemError::database_operation(format!("查询评教表单总数失败: {e}"))
        })?;
        let pages = paginator.num_pages().await.map_err(|e| {
            EvalSystemError::database_operation(format!("查询评教表单页数失败: {e}"))
        })?;
        let items = paginator.fetch_page(page.page_index()).await.map_err(|e| {
            EvalSystemError::database_operation(format!("查询评教表单列表失败: {e}"))
        })?;

        Ok(FormListResponse {
            items: items.into_iter().map(|m| m.into_form()).collect(),
            pagination: page.info(total, pages),
        })
    }

    /// 在时间点 `at` 开放的表单
    pub async fn list_open_forms_impl(&self, at: DateTime<Utc>) -> Result<Vec<EvaluationForm>> {
        let ts = at.timestamp();

        let items = EvaluationForms::find()
            .filter(Column::IsActive.eq(true))
            .filter(Column::StartAt.lte(ts))
            .filter(Column::EndAt.gte(ts))
            .order_by_asc(Column::EndAt)
            .all(&self.db)
            .await
            .map_err(|e| {
                EvalSystemError::database_operation(format!("查询开放的评教表单失败: {e}"))
            })?;

        Ok(items.into_iter().map(|m| m.into_form()).collect())
    }

    pub async fn update_form_impl(
        &self,
        id: i64,
        update: UpdateFormRequest,
    ) -> Result<Option<EvaluationForm>> {
        if self.get_form_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }

        if let Some(description) = update.description {
            model.description = Set(Some(description).filter(|d| !d.is_empty()));
        }

        if let Some(school_year) = update.school_year {
            model.school_year = Set(school_year);
        }

        if let Some(semester) = update.semester {
            model.semester = Set(semester.to_string());
        }

        if let Some(start_at) = update.start_at {
            model.start_at = Set(start_at.timestamp());
        }

        if let Some(end_at) = update.end_at {
            model.end_at = Set(end_at.timestamp());
        }

        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| EvalSystemError::from_db_err("更新评教表单失败", e))?;

        Ok(Some(updated.into_form()))
    }

    /// 删除表单，已有评教记录时返回冲突
    pub async fn delete_form_impl(&self, id: i64) -> Result<bool> {
        let referenced = crate::entity::evaluations::Entity::find()
            .filter(crate::entity::evaluations::Column::FormId.eq(id))
            .count(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("删除评教表单失败: {e}")))?;
        if referenced > 0 {
            return Err(EvalSystemError::conflict(format!("评教表单已有评教记录 ({referenced})")));
        }

        let result = EvaluationForms::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| match EvalSystemError::from_db_err("删除评教表单失败", e) {
                EvalSystemError::InvalidReference(msg) => {
                    EvalSystemError::conflict(format!("评教表单已有评教记录: {msg}"))
                }
                other => other,
            })?;

        Ok(result.rows_affected > 0)
    }
}
