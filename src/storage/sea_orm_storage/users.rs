use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{EvalSystemError, Result};
use crate::models::{
    PageRequest,
    users::{
        entities::{User, UserRole, UserWithDetail},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::utils::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建用户，附带角色详情时与用户在同一事务内写入
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            first_name: Set(req.first_name),
            middle_name: Set(req.middle_name),
            last_name: Set(req.last_name),
            email: Set(req.email),
            password_hash: Set(req.password),
            user_type: Set(req.user_type.to_string()),
            role: Set(req.role.to_string()),
            department_id: Set(req.department_id),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let created = model
            .insert(&txn)
            .await
            .map_err(|e| EvalSystemError::from_db_err("创建用户失败", e))?;

        if let Some(detail) = req.detail {
            self.upsert_role_detail_impl(&txn, created.id, detail)
                .await?;
        }

        txn.commit()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(created.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 获取用户及角色详情
    pub async fn get_user_with_detail_impl(&self, id: i64) -> Result<Option<UserWithDetail>> {
        let Some(user) = self.get_user_by_id_impl(id).await? else {
            return Ok(None);
        };

        let mut details = self.load_role_details_impl(user.role, &[user.id]).await?;
        let detail = details.remove(&user.id);
        Ok(Some(UserWithDetail { user, detail }))
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let page = PageRequest::new(query.page, query.size);

        let mut select = Users::find();

        // 默认只列出启用的用户
        if !query.include_inactive.unwrap_or(false) {
            select = select.filter(Column::IsActive.eq(true));
        }

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::FirstName.like(contains_pattern(search)))
                    .add(Column::MiddleName.like(contains_pattern(search)))
                    .add(Column::LastName.like(contains_pattern(search)))
                    .add(Column::Email.like(contains_pattern(search))),
            );
        }

        if let Some(role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        if let Some(user_type) = query.user_type {
            select = select.filter(Column::UserType.eq(user_type.to_string()));
        }

        if let Some(department_id) = query.department_id {
            select = select.filter(Column::DepartmentId.eq(department_id));
        }

        select = select
            .order_by_asc(Column::LastName)
            .order_by_asc(Column::FirstName)
            .order_by_asc(Column::Id);

        // 分页查询
        let paginator = select.paginate(&self.db, page.size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询用户总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询用户页数失败: {e}")))?;

        let users = paginator
            .fetch_page(page.page_index())
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询用户列表失败: {e}")))?;

        Ok(UserListResponse {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            pagination: page.info(total, pages),
        })
    }

    /// 按角色列出启用的用户，详情表存在时附带角色详情
    pub async fn list_users_by_role_impl(&self, role: UserRole) -> Result<Vec<UserWithDetail>> {
        let users: Vec<User> = Users::find()
            .filter(Column::Role.eq(role.to_string()))
            .filter(Column::IsActive.eq(true))
            .order_by_asc(Column::LastName)
            .order_by_asc(Column::FirstName)
            .all(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("按角色查询用户失败: {e}")))?
            .into_iter()
            .map(|m| m.into_user())
            .collect();

        let ids: Vec<i64> = users.iter().map(|u| u.id).collect();
        let mut details = self.load_role_details_impl(role, &ids).await?;

        Ok(users
            .into_iter()
            .map(|user| {
                let detail = details.remove(&user.id);
                UserWithDetail { user, detail }
            })
            .collect())
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                EvalSystemError::database_operation(format!("更新最后登录时间失败: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }

    /// 更新用户信息（password 为哈希后的值）
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        // 先检查用户是否存在
        let Some(existing) = self.get_user_by_id_impl(id).await? else {
            return Ok(None);
        };
        let replaced_role = update
            .role
            .filter(|role| *role != existing.role)
            .map(|_| existing.role);

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(first_name) = update.first_name {
            model.first_name = Set(first_name);
        }

        if let Some(middle_name) = update.middle_name {
            model.middle_name = Set(Some(middle_name).filter(|m| !m.is_empty()));
        }

        if let Some(last_name) = update.last_name {
            model.last_name = Set(last_name);
        }

        if let Some(email) = update.email {
            model.email = Set(email);
        }

        if let Some(password) = update.password {
            model.password_hash = Set(password);
        }

        if let Some(user_type) = update.user_type {
            model.user_type = Set(user_type.to_string());
        }

        if let Some(role) = update.role {
            model.role = Set(role.to_string());
        }

        if let Some(department_id) = update.department_id {
            model.department_id = Set(Some(department_id));
        }

        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("开启事务失败: {e}")))?;

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| EvalSystemError::from_db_err("更新用户失败", e))?;

        // 角色变更时移除旧角色的详情
        if let Some(old_role) = replaced_role {
            self.delete_role_detail_impl(&txn, id, old_role).await?;
        }

        if let Some(detail) = update.detail {
            self.upsert_role_detail_impl(&txn, id, detail).await?;
        }

        txn.commit()
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(updated.into_user()))
    }

    /// 停用用户（软删除）
    pub async fn deactivate_user_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::IsActive, sea_orm::sea_query::Expr::value(false))
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("停用用户失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        let count = Users::find()
            .count(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("统计用户数量失败: {e}")))?;

        Ok(count)
    }
}
