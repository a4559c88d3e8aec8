//! 评教表单实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "evaluation_forms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub school_year: String,
    pub semester: String,
    pub start_at: i64,
    pub end_at: i64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::evaluations::Entity")]
    Evaluations,
}

impl Related<super::evaluations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Evaluations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_form(self) -> crate::models::forms::entities::EvaluationForm {
        use super::timestamp_to_utc;
        use crate::models::forms::entities::{EvaluationForm, Semester};

        EvaluationForm {
            id: self.id,
            title: self.title,
            description: self.description,
            school_year: self.school_year,
            semester: self.semester.parse::<Semester>().unwrap_or(Semester::First),
            start_at: timestamp_to_utc(self.start_at),
            end_at: timestamp_to_utc(self.end_at),
            is_active: self.is_active,
            created_at: timestamp_to_utc(self.created_at),
            updated_at: timestamp_to_utc(self.updated_at),
        }
    }
}
