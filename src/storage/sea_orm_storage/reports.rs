//! 报表聚合查询，每次请求实时计算

use super::SeaOrmStorage;
use crate::entity::{categories, evaluation_forms, evaluation_responses, evaluations, questions, users};
use crate::errors::{EvalSystemError, Result};
use crate::models::{
    evaluations::scoring::round4,
    reports::{CategoryAverage, FacultyReportQuery, FacultyScoreSummary, OverviewReport},
    users::entities::UserRole,
};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ColumnTrait, EntityTrait, FromQueryResult, JoinType, Order, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select,
};

#[derive(Debug, FromQueryResult)]
struct FacultyScoreRow {
    faculty_id: i64,
    first_name: String,
    last_name: String,
    department_id: Option<i64>,
    average_score: f64,
    evaluation_count: i64,
}

impl FacultyScoreRow {
    fn into_summary(self) -> FacultyScoreSummary {
        FacultyScoreSummary {
            faculty_id: self.faculty_id,
            first_name: self.first_name,
            last_name: self.last_name,
            department_id: self.department_id,
            average_score: round4(self.average_score),
            evaluation_count: self.evaluation_count,
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct CategoryAverageRow {
    category_id: i64,
    category_name: String,
    category_weight: f64,
    average_rating: f64,
    response_count: i64,
}

fn average_score_expr() -> SimpleExpr {
    SimpleExpr::FunctionCall(Func::avg(Expr::col((
        evaluations::Entity,
        evaluations::Column::OverallScore,
    ))))
}

/// 按被评价人分组的总分聚合
fn faculty_scores_select(form_id: Option<i64>) -> Select<evaluations::Entity> {
    let mut select = evaluations::Entity::find()
        .select_only()
        .column_as(evaluations::Column::EvaluateeId, "faculty_id")
        .column_as(users::Column::FirstName, "first_name")
        .column_as(users::Column::LastName, "last_name")
        .column_as(users::Column::DepartmentId, "department_id")
        .column_as(average_score_expr(), "average_score")
        .column_as(evaluations::Column::Id.count(), "evaluation_count")
        .join(JoinType::InnerJoin, evaluations::Relation::Evaluatee.def())
        // 角色已变更的用户不再计入教师报表
        .filter(users::Column::Role.eq(UserRole::Faculty.to_string()))
        .group_by(evaluations::Column::EvaluateeId)
        .group_by(users::Column::FirstName)
        .group_by(users::Column::LastName)
        .group_by(users::Column::DepartmentId);

    if let Some(form_id) = form_id {
        select = select.filter(evaluations::Column::FormId.eq(form_id));
    }

    select
}

impl SeaOrmStorage {
    /// 启用教师的平均分与评教数，按姓名排序
    pub async fn faculty_score_summaries_impl(
        &self,
        query: FacultyReportQuery,
    ) -> Result<Vec<FacultyScoreSummary>> {
        let mut select =
            faculty_scores_select(query.form_id).filter(users::Column::IsActive.eq(true));

        if let Some(department_id) = query.department_id {
            select = select.filter(users::Column::DepartmentId.eq(department_id));
        }

        let rows = select
            .order_by_asc(users::Column::LastName)
            .order_by_asc(users::Column::FirstName)
            .order_by_asc(evaluations::Column::EvaluateeId)
            .into_model::<FacultyScoreRow>()
            .all(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询教师报表失败: {e}")))?;

        Ok(rows.into_iter().map(FacultyScoreRow::into_summary).collect())
    }

    /// 单个教师的汇总，没有评教记录时返回 None
    pub async fn faculty_score_summary_impl(
        &self,
        faculty_id: i64,
        form_id: Option<i64>,
    ) -> Result<Option<FacultyScoreSummary>> {
        let row = faculty_scores_select(form_id)
            .filter(evaluations::Column::EvaluateeId.eq(faculty_id))
            .into_model::<FacultyScoreRow>()
            .one(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询教师报表失败: {e}")))?;

        Ok(row.map(FacultyScoreRow::into_summary))
    }

    /// 教师在各分类下的平均评分
    pub async fn faculty_category_averages_impl(
        &self,
        faculty_id: i64,
        form_id: Option<i64>,
    ) -> Result<Vec<CategoryAverage>> {
        let mut select = evaluation_responses::Entity::find()
            .select_only()
            .column_as(categories::Column::Id, "category_id")
            .column_as(categories::Column::Name, "category_name")
            .column_as(categories::Column::Weight, "category_weight")
            .column_as(
                SimpleExpr::FunctionCall(Func::avg(Expr::col((
                    evaluation_responses::Entity,
                    evaluation_responses::Column::Rating,
                )))),
                "average_rating",
            )
            .column_as(evaluation_responses::Column::Id.count(), "response_count")
            .join(
                JoinType::InnerJoin,
                evaluation_responses::Relation::Evaluation.def(),
            )
            .join(JoinType::InnerJoin, evaluation_responses::Relation::Question.def())
            .join(JoinType::InnerJoin, questions::Relation::Category.def())
            .filter(evaluations::Column::EvaluateeId.eq(faculty_id));

        if let Some(form_id) = form_id {
            select = select.filter(evaluations::Column::FormId.eq(form_id));
        }

        let rows = select
            .group_by(categories::Column::Id)
            .group_by(categories::Column::Name)
            .group_by(categories::Column::Weight)
            .order_by_asc(categories::Column::Name)
            .into_model::<CategoryAverageRow>()
            .all(&self.db)
            .await
            .map_err(|e| {
                EvalSystemError::database_operation(format!("查询分类平均分失败: {e}"))
            })?;

        Ok(rows
            .into_iter()
            .map(|row| CategoryAverage {
                category_id: row.category_id,
                category_name: row.category_name,
                category_weight: row.category_weight,
                average_rating: round4(row.average_rating),
                response_count: row.response_count,
            })
            .collect())
    }

    /// 按平均分降序排名的启用教师
    pub async fn top_faculty_impl(
        &self,
        limit: u64,
        form_id: Option<i64>,
    ) -> Result<Vec<FacultyScoreSummary>> {
        let rows = faculty_scores_select(form_id)
            .filter(users::Column::IsActive.eq(true))
            .order_by(average_score_expr(), Order::Desc)
            .order_by(evaluations::Column::Id.count(), Order::Desc)
            .order_by_asc(evaluations::Column::EvaluateeId)
            .limit(limit)
            .into_model::<FacultyScoreRow>()
            .all(&self.db)
            .await
            .map_err(|e| EvalSystemError::database_operation(format!("查询教师排名失败: {e}")))?;

        Ok(rows.into_iter().map(FacultyScoreRow::into_summary).collect())
    }

    pub async fn overview_report_impl(&self, at: DateTime<Utc>) -> Result<OverviewReport> {
        let err = |e: sea_orm::DbErr| {
            EvalSystemError::database_operation(format!("查询总览报表失败: {e}"))
        };
        let ts = at.timestamp();

        let total_evaluations = evaluations::Entity::find()
            .count(&self.db)
            .await
            .map_err(err)?;

        let active_faculty = users::Entity::find()
            .filter(users::Column::Role.eq(UserRole::Faculty.to_string()))
            .filter(users::Column::IsActive.eq(true))
            .count(&self.db)
            .await
            .map_err(err)?;

        let open_forms = evaluation_forms::Entity::find()
            .filter(evaluation_forms::Column::IsActive.eq(true))
            .filter(evaluation_forms::Column::StartAt.lte(ts))
            .filter(evaluation_forms::Column::EndAt.gte(ts))
            .count(&self.db)
            .await
            .map_err(err)?;

        let overall_average = evaluations::Entity::find()
            .select_only()
            .column_as(average_score_expr(), "overall_average")
            .into_tuple::<Option<f64>>()
            .one(&self.db)
            .await
            .map_err(err)?
            .flatten()
            .map(round4);

        Ok(OverviewReport {
            total_evaluations: total_evaluations as i64,
            active_faculty: active_faculty as i64,
            open_forms: open_forms as i64,
            overall_average,
        })
    }
}
