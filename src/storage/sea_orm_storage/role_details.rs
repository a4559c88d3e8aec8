//! 角色详情表
//!
//! 三张详情表由后续迁移创建，旧库中可能不存在。启动时探测一次，
//! 读取时只关联存在的表，写入缺失的表时跳过并记录警告。

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::{faculty_profiles, student_profiles, supervisor_profiles};
use crate::errors::{EvalSystemError, Result};
use crate::models::users::entities::{RoleDetail, UserRole};
use migration::SchemaManager;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set,
};

/// 各角色详情表是否存在
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleDetailTables {
    pub faculty: bool,
    pub student: bool,
    pub supervisor: bool,
}

impl RoleDetailTables {
    pub async fn detect(db: &DatabaseConnection) -> Result<Self> {
        let manager = SchemaManager::new(db);
        let probe = |table: &'static str| {
            let manager = &manager;
            async move {
                manager.has_table(table).await.map_err(|e| {
                    EvalSystemError::database_operation(format!("探测数据表 {table} 失败: {e}"))
                })
            }
        };

        Ok(Self {
            faculty: probe("faculty_profiles").await?,
            student: probe("student_profiles").await?,
            supervisor: probe("supervisor_profiles").await?,
        })
    }

    pub fn has(&self, role: UserRole) -> bool {
        match role {
            UserRole::Faculty => self.faculty,
            UserRole::Student => self.student,
            UserRole::Supervisor => self.supervisor,
        }
    }
}

impl SeaOrmStorage {
    /// 写入或替换角色详情，表不存在时返回 false
    pub(crate) async fn upsert_role_detail_impl<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i64,
        detail: RoleDetail,
    ) -> Result<bool> {
        let role = detail.role();
        if !self.role_tables.has(role) {
            tracing::warn!("角色详情表缺失，跳过写入: role={}, user_id={}", role, user_id);
            return Ok(false);
        }

        let context = "写入角色详情失败";
        match detail {
            RoleDetail::Faculty {
                employee_no,
                academic_rank,
            } => {
                let exists = faculty_profiles::Entity::find_by_id(user_id)
                    .one(conn)
                    .await
                    .map_err(|e| EvalSystemError::from_db_err(context, e))?
                    .is_some();
                let model = faculty_profiles::ActiveModel {
                    user_id: Set(user_id),
                    employee_no: Set(employee_no),
                    academic_rank: Set(academic_rank),
                };
                if exists {
                    model.update(conn).await
                } else {
                    model.insert(conn).await
                }
                .map_err(|e| EvalSystemError::from_db_err(context, e))?;
            }
            RoleDetail::Student {
                student_no,
                year_level,
                section,
            } => {
                let exists = student_profiles::Entity::find_by_id(user_id)
                    .one(conn)
                    .await
                    .map_err(|e| EvalSystemError::from_db_err(context, e))?
                    .is_some();
                let model = student_profiles::ActiveModel {
                    user_id: Set(user_id),
                    student_no: Set(student_no),
                    year_level: Set(year_level),
                    section: Set(section),
                };
                if exists {
                    model.update(conn).await
                } else {
                    model.insert(conn).await
                }
                .map_err(|e| EvalSystemError::from_db_err(context, e))?;
            }
            RoleDetail::Supervisor {
                employee_no,
                position,
            } => {
                let exists = supervisor_profiles::Entity::find_by_id(user_id)
                    .one(conn)
                    .await
                    .map_err(|e| EvalSystemError::from_db_err(context, e))?
                    .is_some();
                let model = supervisor_profiles::ActiveModel {
                    user_id: Set(user_id),
                    employee_no: Set(employee_no),
                    position: Set(position),
                };
                if exists {
                    model.update(conn).await
                } else {
                    model.insert(conn).await
                }
                .map_err(|e| EvalSystemError::from_db_err(context, e))?;
            }
        }

        Ok(true)
    }

    /// 删除某个角色的详情行，表不存在时跳过
    pub(crate) async fn delete_role_detail_impl<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i64,
        role: UserRole,
    ) -> Result<()> {
        if !self.role_tables.has(role) {
            return Ok(());
        }

        match role {
            UserRole::Faculty => faculty_profiles::Entity::delete_by_id(user_id).exec(conn).await,
            UserRole::Student => student_profiles::Entity::delete_by_id(user_id).exec(conn).await,
            UserRole::Supervisor => {
                supervisor_profiles::Entity::delete_by_id(user_id)
                    .exec(conn)
                    .await
            }
        }
        .map_err(|e| EvalSystemError::from_db_err("删除角色详情失败", e))?;

        Ok(())
    }

    /// 批量读取某个角色的详情，表不存在时返回空
    pub(crate) async fn load_role_details_impl(
        &self,
        role: UserRole,
        user_ids: &[i64],
    ) -> Result<HashMap<i64, RoleDetail>> {
        if !self.role_tables.has(role) || user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let ids = user_ids.iter().copied();
        let err = |e: sea_orm::DbErr| EvalSystemError::from_db_err("查询角色详情失败", e);
        let details = match role {
            UserRole::Faculty => faculty_profiles::Entity::find()
                .filter(faculty_profiles::Column::UserId.is_in(ids))
                .all(&self.db)
                .await
                .map_err(err)?
                .into_iter()
                .map(|m| (m.user_id, m.into_detail()))
                .collect(),
            UserRole::Student => student_profiles::Entity::find()
                .filter(student_profiles::Column::UserId.is_in(ids))
                .all(&self.db)
                .await
                .map_err(err)?
                .into_iter()
                .map(|m| (m.user_id, m.into_detail()))
                .collect(),
            UserRole::Supervisor => supervisor_profiles::Entity::find()
                .filter(supervisor_profiles::Column::UserId.is_in(ids))
                .all(&self.db)
                .await
                .map_err(err)?
                .into_iter()
                .map(|m| (m.user_id, m.into_detail()))
                .collect(),
        };

        Ok(details)
    }
}
