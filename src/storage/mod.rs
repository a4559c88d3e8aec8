use std::sync::Arc;

use chrono::{DateTime, Utc};

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

use crate::errors::Result;

pub mod sea_orm_storage;

pub use sea_orm_storage::RoleDetailTables;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 当前数据库中存在的角色详情表
    fn role_detail_tables(&self) -> RoleDetailTables;

    /// 用户管理方法
    // 创建用户（password 字段为哈希后的值），附带角色详情时在同一事务内写入
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 获取用户及其角色详情
    async fn get_user_with_detail(&self, id: i64) -> Result<Option<UserWithDetail>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 按角色列出启用的用户，并关联角色详情
    async fn list_users_by_role(&self, role: UserRole) -> Result<Vec<UserWithDetail>>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 停用用户（软删除）
    async fn deactivate_user(&self, id: i64) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;

    /// 院系管理方法
    async fn create_department(&self, req: CreateDepartmentRequest) -> Result<Department>;
    async fn get_department_by_id(&self, id: i64) -> Result<Option<Department>>;
    async fn list_departments_with_pagination(
        &self,
        query: DepartmentListQuery,
    ) -> Result<DepartmentListResponse>;
    async fn update_department(
        &self,
        id: i64,
        update: UpdateDepartmentRequest,
    ) -> Result<Option<Department>>;
    async fn delete_department(&self, id: i64) -> Result<bool>;

    /// 课程管理方法
    async fn create_course(&self, req: CreateCourseRequest) -> Result<Course>;
    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>>;
    async fn list_courses_with_pagination(&self, query: CourseListQuery)
    -> Result<CourseListResponse>;
    async fn update_course(&self, id: i64, update: UpdateCourseRequest)
    -> Result<Option<Course>>;
    async fn delete_course(&self, id: i64) -> Result<bool>;

    /// 分类管理方法
    async fn create_category(&self, req: CreateCategoryRequest) -> Result<Category>;
    async fn get_category_by_id(&self, id: i64) -> Result<Option<Category>>;
    async fn list_categories(&self) -> Result<Vec<Category>>;
    async fn update_category(
        &self,
        id: i64,
        update: UpdateCategoryRequest,
    ) -> Result<Option<Category>>;
    async fn delete_category(&self, id: i64) -> Result<bool>;

    /// 题目管理方法
    async fn create_question(&self, req: CreateQuestionRequest) -> Result<Question>;
    async fn get_question_by_id(&self, id: i64) -> Result<Option<Question>>;
    async fn get_questions_by_ids(&self, ids: &[i64]) -> Result<Vec<Question>>;
    async fn list_questions_with_pagination(
        &self,
        query: QuestionListQuery,
    ) -> Result<QuestionListResponse>;
    async fn update_question(
        &self,
        id: i64,
        update: UpdateQuestionRequest,
    ) -> Result<Option<Question>>;
    // 停用题目，已有评分仍引用该题目
    async fn deactivate_question(&self, id: i64) -> Result<bool>;
    // 按分类分组的启用题目
    async fn list_active_questions_grouped(&self) -> Result<Vec<CategoryQuestions>>;

    /// 评教表单管理方法
    async fn create_form(&self, req: CreateFormRequest) -> Result<EvaluationForm>;
    async fn get_form_by_id(&self, id: i64) -> Result<Option<EvaluationForm>>;
    async fn list_forms_with_pagination(&self, query: FormListQuery) -> Result<FormListResponse>;
    async fn list_open_forms(&self, at: DateTime<Utc>) -> Result<Vec<EvaluationForm>>;
    async fn update_form(&self, id: i64, update: UpdateFormRequest)
    -> Result<Option<EvaluationForm>>;
    async fn delete_form(&self, id: i64) -> Result<bool>;

    /// 评教方法
    // 在单个事务内写入评教、评分并回写总分
    async fn submit_evaluation(&self, evaluation: NewEvaluation)
    -> Result<SubmitEvaluationResponse>;
    async fn evaluation_exists(
        &self,
        evaluator_id: i64,
        evaluatee_id: i64,
        course_id: i64,
        form_id: i64,
    ) -> Result<bool>;
    async fn get_evaluation_by_id(&self, id: i64) -> Result<Option<Evaluation>>;
    async fn get_evaluation_detail(&self, id: i64) -> Result<Option<EvaluationDetailResponse>>;
    // visible_to 为 Some 时只返回该用户参与的评教
    async fn list_evaluations_with_pagination(
        &self,
        query: EvaluationListQuery,
        visible_to: Option<i64>,
    ) -> Result<EvaluationListResponse>;
    async fn delete_evaluation(&self, id: i64) -> Result<bool>;

    /// 报表方法
    async fn faculty_score_summaries(
        &self,
        query: FacultyReportQuery,
    ) -> Result<Vec<FacultyScoreSummary>>;
    async fn faculty_score_summary(
        &self,
        faculty_id: i64,
        form_id: Option<i64>,
    ) -> Result<Option<FacultyScoreSummary>>;
    async fn faculty_category_averages(
        &self,
        faculty_id: i64,
        form_id: Option<i64>,
    ) -> Result<Vec<CategoryAverage>>;
    async fn top_faculty(&self, limit: u64, form_id: Option<i64>)
    -> Result<Vec<FacultyScoreSummary>>;
    async fn overview_report(&self, at: DateTime<Utc>) -> Result<OverviewReport>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
