use super::SeaOrmStorage;
use crate::entity::departments::{ActiveModel, Column, Entity as Departments};
use crate::errors::{EvalSystemError, Result};
use crate::models::{
    PageRequest,
    departments::{
        entities::Department,
        requests::{CreateDepartmentRequest, DepartmentListQuery, UpdateDepartmentRequest},
        responses::DepartmentListResponse,
    },
};
use crate::utils::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    pub async fn create_department_impl(&self, req: CreateDepartmentRequest) -> Result<Department> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            code: Set(req.code),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EvalSystemError::from_db_err("创建院系失败", e))?;

        Ok(result.into_department())
    }

    pub async fn get_department_by_id_impl(&self, id: i64) -> Result<Option<Department>> {
        let result = Departments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询院系失败: {e}")))?;

        Ok(result.map(|m| m.into_department()))
    }

    pub async fn list_departments_with_pagination_impl(
        &self,
        query: DepartmentListQuery,
    ) -> Result<DepartmentListResponse> {
        let page = PageRequest::new(query.page, query.size);

        let mut select = Departments::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::Name.like(contains_pattern(search)))
                    .add(Column::Code.like(contains_pattern(search))),
            );
        }

        let paginator = select
            .order_by_asc(Column::Name)
            .paginate(&self.db, page.size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询院系总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询院系页数失败: {e}")))?;
        let items = paginator
            .fetch_page(page.page_index())
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询院系列表失败: {e}")))?;

        Ok(DepartmentListResponse {
            items: items.into_iter().map(|m| m.into_department()).collect(),
            pagination: page.info(total, pages),
        })
    }

    pub async fn update_department_impl(
        &self,
        id: i64,
        update: UpdateDepartmentRequest,
    ) -> Result<Option<Department>> {
        if self.get_department_by_id_impl(id).await?.is_none() {
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

        if let Some(code) = update.code {
            // 空字符串表示清除代码
            model.code = Set(Some(code).filter(|c| !c.is_empty()));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| EvalSystemError::from_db_err("更新院系失败", e))?;

        Ok(Some(updated.into_department()))
    }

    /// 删除院系，仍被课程引用时返回冲突
    pub async fn delete_department_impl(&self, id: i64) -> Result<bool> {
        let referenced = crate::entity::courses::Entity::find()
            .filter(crate::entity::courses::Column::DepartmentId.eq(id))
            .count(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("删除院系失败: {e}")))?;
        if referenced > 0 {
            return Err(EvalSystemError::conflict(format!("院系仍被课程引用 ({referenced})")));
        }

        let result = Departments::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| match EvalSystemError::from_db_err("删除院系失败", e) {
                EvalSystemError::InvalidReference(msg) => {
                    EvalSystemError::conflict(format!("院系仍被课程引用: {msg}"))
                }
                other => other,
            })?;

        Ok(result.rows_affected > 0)
    }
}
