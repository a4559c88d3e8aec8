use super::SeaOrmStorage;
use crate::entity::courses::{ActiveModel, Column, Entity as Courses};
use crate::errors::{EvalSystemError, Result};
use crate::models::{
    PageRequest,
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
        responses::CourseListResponse,
    },
};
use crate::utils::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    pub async fn create_course_impl(&self, req: CreateCourseRequest) -> Result<Course> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            department_id: Set(req.department_id),
            code: Set(req.code),
            title: Set(req.title),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EvalSystemError::from_db_err("创建课程失败", e))?;

        Ok(result.into_course())
    }

    pub async fn get_course_by_id_impl(&self, id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    pub async fn list_courses_with_pagination_impl(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        let page = PageRequest::new(query.page, query.size);

        let mut select = Courses::find();

        if let Some(department_id) = query.department_id {
            select = select.filter(Column::DepartmentId.eq(department_id));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::Code.like(contains_pattern(search)))
                    .add(Column::Title.like(contains_pattern(search))),
            );
        }

        let paginator = select
            .order_by_asc(Column::Code)
            .order_by_asc(Column::Id)
            .paginate(&self.db, page.size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询课程总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询课程页数失败: {e}")))?;
        let items = paginator
            .fetch_page(page.page_index())
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询课程列表失败: {e}")))?;

        Ok(CourseListResponse {
            items: items.into_iter().map(|m| m.into_course()).collect(),
            pagination: page.info(total, pages),
        })
    }

    pub async fn update_course_impl(
        &self,
        id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        if self.get_course_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(department_id) = update.department_id {
            model.department_id = Set(department_id);
        }

        if let Some(code) = update.code {
            model.code = Set(code);
        }

        if let Some(title) = update.title {
            model.title = Set(title);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| EvalSystemError::from_db_err("更新课程失败", e))?;

        Ok(Some(updated.into_course()))
    }

    /// 删除课程，已有评教记录时返回冲突
    pub async fn delete_course_impl(&self, id: i64) -> Result<bool> {
        let referenced = crate::entity::evaluations::Entity::find()
            .filter(crate::entity::evaluations::Column::CourseId.eq(id))
            .count(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("删除课程失败: {e}")))?;
        if referenced > 0 {
            return Err(EvalSystemError::conflict(format!("课程已有评教记录 ({referenced})")));
        }

        let result = Courses::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| match EvalSystemError::from_db_err("删除课程失败", e) {
                EvalSystemError::InvalidReference(msg) => {
                    EvalSystemError::conflict(format!("课程已有评教记录: {msg}"))
                }
                other => other,
            })?;

        Ok(result.rows_affected > 0)
    }
}
