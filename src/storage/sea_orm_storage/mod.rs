//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod categories;
mod courses;
mod departments;
mod evaluations;
mod forms;
mod questions;
mod reports;
mod role_details;
mod users;

pub use role_details::RoleDetailTables;

use crate::config::AppConfig;
use crate::errors::{EvalSystemError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
    pub(crate) role_tables: RoleDetailTables,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Self::from_connection(db).await
    }

    /// 基于已有连接创建存储实例（不运行迁移），并探测角色详情表
    pub async fn from_connection(db: DatabaseConnection) -> Result<Self> {
        let role_tables = RoleDetailTables::detect(&db).await?;
        info!(
            "角色详情表: faculty={}, student={}, supervisor={}",
            role_tables.faculty, role_tables.student, role_tables.supervisor
        );
        Ok(Self { db, role_tables })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| EvalSystemError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| EvalSystemError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(2)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| EvalSystemError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(EvalSystemError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    categories::{
        entities::Category,
        requests::{CreateCategoryRequest, UpdateCategoryRequest},
    },
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
        responses::CourseListResponse,
    },
    departments::{
        entities::Department,
        requests::{CreateDepartmentRequest, DepartmentListQuery, UpdateDepartmentRequest},
        responses::DepartmentListResponse,
    },
    evaluations::{
        entities::Evaluation,
        requests::{EvaluationListQuery, NewEvaluation},
        responses::{EvaluationDetailResponse, EvaluationListResponse, SubmitEvaluationResponse},
    },
    forms::{
        entities::EvaluationForm,
        requests::{CreateFormRequest, FormListQuery, UpdateFormRequest},
        responses::{CategoryQuestions, FormListResponse},
    },
    questions::{
        entities::Question,
        requests::{CreateQuestionRequest, QuestionListQuery, UpdateQuestionRequest},
        responses::QuestionListResponse,
    },
    reports::{CategoryAverage, FacultyReportQuery, FacultyScoreSummary, OverviewReport},
    users::{
        entities::{User, UserRole, UserWithDetail},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
impl Storage for SeaOrmStorage {
    fn role_detail_tables(&self) -> RoleDetailTables {
        self.role_tables
    }

    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_with_detail(&self, id: i64) -> Result<Option<UserWithDetail>> {
        self.get_user_with_detail_impl(id).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn list_users_by_role(&self, role: UserRole) -> Result<Vec<UserWithDetail>> {
        self.list_users_by_role_impl(role).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn deactivate_user(&self, id: i64) -> Result<bool> {
        self.deactivate_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 院系模块
    async fn create_department(&self, req: CreateDepartmentRequest) -> Result<Department> {
        self.create_department_impl(req).await
    }

    async fn get_department_by_id(&self, id: i64) -> Result<Option<Department>> {
        self.get_department_by_id_impl(id).await
    }

    async fn list_departments_with_pagination(
        &self,
        query: DepartmentListQuery,
    ) -> Result<DepartmentListResponse> {
        self.list_departments_with_pagination_impl(query).await
    }

    async fn update_department(
        &self,
        id: i64,
        update: UpdateDepartmentRequest,
    ) -> Result<Option<Department>> {
        self.update_department_impl(id, update).await
    }

    async fn delete_department(&self, id: i64) -> Result<bool> {
        self.delete_department_impl(id).await
    }

    // 课程模块
    async fn create_course(&self, req: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(req).await
    }

    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(id).await
    }

    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        self.list_courses_with_pagination_impl(query).await
    }

    async fn update_course(
        &self,
        id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        self.update_course_impl(id, update).await
    }

    async fn delete_course(&self, id: i64) -> Result<bool> {
        self.delete_course_impl(id).await
    }

    // 分类模块
    async fn create_category(&self, req: CreateCategoryRequest) -> Result<Category> {
        self.create_category_impl(req).await
    }

    async fn get_category_by_id(&self, id: i64) -> Result<Option<Category>> {
        self.get_category_by_id_impl(id).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        self.list_categories_impl().await
    }

    async fn update_category(
        &self,
        id: i64,
        update: UpdateCategoryRequest,
    ) -> Result<Option<Category>> {
        self.update_category_impl(id, update).await
    }

    async fn delete_category(&self, id: i64) -> Result<bool> {
        self.delete_category_impl(id).await
    }

    // 题目模块
    async fn create_question(&self, req: CreateQuestionRequest) -> Result<Question> {
        self.create_question_impl(req).await
    }

    async fn get_question_by_id(&self, id: i64) -> Result<Option<Question>> {
        self.get_question_by_id_impl(id).await
    }

    async fn get_questions_by_ids(&self, ids: &[i64]) -> Result<Vec<Question>> {
        self.get_questions_by_ids_impl(ids).await
    }

    async fn list_questions_with_pagination(
        &self,
        query: QuestionListQuery,
    ) -> Result<QuestionListResponse> {
        self.list_questions_with_pagination_impl(query).await
    }

    async fn update_question(
        &self,
        id: i64,
        update: UpdateQuestionRequest,
    ) -> Result<Option<Question>> {
        self.update_question_impl(id, update).await
    }

    async fn deactivate_question(&self, id: i64) -> Result<bool> {
        self.deactivate_question_impl(id).await
    }

    async fn list_active_questions_grouped(&self) -> Result<Vec<CategoryQuestions>> {
        self.list_active_questions_grouped_impl().await
    }

    // 表单模块
    async fn create_form(&self, req: CreateFormRequest) -> Result<EvaluationForm> {
        self.create_form_impl(req).await
    }

    async fn get_form_by_id(&self, id: i64) -> Result<Option<EvaluationForm>> {
        self.get_form_by_id_impl(id).await
    }

    async fn list_forms_with_pagination(&self, query: FormListQuery) -> Result<FormListResponse> {
        self.list_forms_with_pagination_impl(query).await
    }

    async fn list_open_forms(&self, at: DateTime<Utc>) -> Result<Vec<EvaluationForm>> {
        self.list_open_forms_impl(at).await
    }

    async fn update_form(
        &self,
        id: i64,
        update: UpdateFormRequest,
    ) -> Result<Option<EvaluationForm>> {
        self.update_form_impl(id, update).await
    }

    async fn delete_form(&self, id: i64) -> Result<bool> {
        self.delete_form_impl(id).await
    }

    // 评教模块
    async fn submit_evaluation(
        &self,
        evaluation: NewEvaluation,
    ) -> Result<SubmitEvaluationResponse> {
        self.submit_evaluation_impl(evaluation).await
    }

    async fn evaluation_exists(
        &self,
        evaluator_id: i64,
        evaluatee_id: i64,
        course_id: i64,
        form_id: i64,
    ) -> Result<bool> {
        self.evaluation_exists_impl(evaluator_id, evaluatee_id, course_id, form_id)
            .await
    }

    async fn get_evaluation_by_id(&self, id: i64) -> Result<Option<Evaluation>> {
        self.get_evaluation_by_id_impl(id).await
    }

    async fn get_evaluation_detail(&self, id: i64) -> Result<Option<EvaluationDetailResponse>> {
        self.get_evaluation_detail_impl(id).await
    }

    async fn list_evaluations_with_pagination(
        &self,
        query: EvaluationListQuery,
        visible_to: Option<i64>,
    ) -> Result<EvaluationListResponse> {
        self.list_evaluations_with_pagination_impl(query, visible_to)
            .await
    }

    async fn delete_evaluation(&self, id: i64) -> Result<bool> {
        self.delete_evaluation_impl(id).await
    }

    // 报表模块
    async fn faculty_score_summaries(
        &self,
        query: FacultyReportQuery,
    ) -> Result<Vec<FacultyScoreSummary>> {
        self.faculty_score_summaries_impl(query).await
    }

    async fn faculty_score_summary(
        &self,
        faculty_id: i64,
        form_id: Option<i64>,
    ) -> Result<Option<FacultyScoreSummary>> {
        self.faculty_score_summary_impl(faculty_id, form_id).await
    }

    async fn faculty_category_averages(
        &self,
        faculty_id: i64,
        form_id: Option<i64>,
    ) -> Result<Vec<CategoryAverage>> {
        self.faculty_category_averages_impl(faculty_id, form_id)
            .await
    }

    async fn top_faculty(
        &self,
        limit: u64,
        form_id: Option<i64>,
    ) -> Result<Vec<FacultyScoreSummary>> {
        self.top_faculty_impl(limit, form_id).await
    }

    async fn overview_report(&self, at: DateTime<Utc>) -> Result<OverviewReport> {
        self.overview_report_impl(at).await
    }
}
