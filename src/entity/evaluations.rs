//! 评教记录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "evaluations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub evaluator_id: i64,
    pub evaluatee_id: i64,
    pub course_id: i64,
    pub form_id: i64,
    pub evaluation_type: String,
    #[sea_orm(column_type = "Double")]
    pub overall_score: f64,
    #[sea_orm(column_type = "Text", nullable)]
    pub comments: Option<String>,
    pub submitted_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::EvaluatorId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Evaluator,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::EvaluateeId",
        to = "super::users::Column::Id",
        on_delete = "Cascade"
    )]
    Evaluatee,
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id",
        on_delete = "Restrict"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::evaluation_forms::Entity",
        from = "Column::FormId",
        to = "super::evaluation_forms::Column::Id",
        on_delete = "Restrict"
    )]
    Form,
    #[sea_orm(has_many = "super::evaluation_responses::Entity")]
    Responses,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::evaluation_forms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Form.def()
    }
}

impl Related<super::evaluation_responses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Responses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_evaluation(self) -> crate::models::evaluations::entities::Evaluation {
        use super::timestamp_to_utc;
        use crate::models::evaluations::entities::{Evaluation, EvaluationType};

        Evaluation {
            id: self.id,
            evaluator_id: self.evaluator_id,
            evaluatee_id: self.evaluatee_id,
            course_id: self.course_id,
            form_id: self.form_id,
            evaluation_type: self
                .evaluation_type
                .parse::<EvaluationType>()
                .unwrap_or(EvaluationType::Student),
            overall_score: self.overall_score,
            comments: self.comments,
            submitted_at: timestamp_to_utc(self.submitted_at),
        }
    }
}
