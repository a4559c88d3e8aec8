use super::SeaOrmStorage;
use crate::entity::categories::{ActiveModel, Column, Entity as Categories};
use crate::errors::{EvalSystemError, Result};
use crate::models::categories::{
    entities::Category,
    requests::{CreateCategoryRequest, UpdateCategoryRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_category_impl(&self, req: CreateCategoryRequest) -> Result<Category> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            description: Set(req.description),
            weight: Set(req.weight.unwrap_or(1.0)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EvalSystemError::from_db_err("创建分类失败", e))?;

        Ok(result.into_category())
    }

    pub async fn get_category_by_id_impl(&self, id: i64) -> Result<Option<Category>> {
        let result = Categories::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询分类失败: {e}")))?;

        Ok(result.map(|m| m.into_category()))
    }

    /// 分类数量有限，不分页
    pub async fn list_categories_impl(&self) -> Result<Vec<Category>> {
        let items = Categories::find()
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询分类列表失败: {e}")))?;

        Ok(items.into_iter().map(|m| m.into_category()).collect())
    }

    pub async fn update_category_impl(
        &self,
        id: i64,
        update: UpdateCategoryRequest,
    ) -> Result<Option<Category>> {
        if self.get_category_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }

        if let Some(description) = update.description {
            model.description = Set(Some(description).filter(|d| !d.is_empty()));
        }

        if let Some(weight) = update.weight {
            model.weight = Set(weight);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| EvalSystemError::from_db_err("更新分类失败", e))?;

        Ok(Some(updated.into_category()))
    }

    /// 删除分类，分类下仍有题目时返回冲突
    pub async fn delete_category_impl(&self, id: i64) -> Result<bool> {
        let referenced = crate::entity::questions::Entity::find()
            .filter(crate::entity::questions::Column::CategoryId.eq(id))
            .count(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("删除分类失败: {e}")))?;
        if referenced > 0 {
            return Err(EvalSystemError::conflict(format!("分类下仍有题目 ({referenced})")));
        }

        let result = Categories::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| match EvalSystemError::from_db_err("删除分类失败", e) {
                EvalSystemError::InvalidReference(msg) => {
                    EvalSystemError::conflict(format!("分类下仍有题目: {msg}"))
                }
                other => other,
            })?;

        Ok(result.rows_affected > 0)
    }
}
