use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::users::entities::{User, UserRole};

// 评教类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub enum EvaluationType {
    Student, // 学生评教师
    Peer,    // 督导评教师
    #[serde(rename = "self")]
    SelfReview, // 教师自评
}

impl EvaluationType {
    /// 根据评价人与被评价人推导评教类型，流程不被允许时返回 None
    ///
    /// 被评价人必须是教师：
    /// - 学生评价其他教师 -> student
    /// - 督导评价教师 -> peer
    /// - 教师评价自己 -> self
    pub fn for_flow(evaluator: &User, evaluatee: &User) -> Option<Self> {
        if evaluatee.role != UserRole::Faculty {
            return None;
        }
        let same_person = evaluator.id == evaluatee.id;
        match (evaluator.role, same_person) {
            (UserRole::Student, false) => Some(EvaluationType::Student),
            (UserRole::Supervisor, false) => Some(EvaluationType::Peer),
            (UserRole::Faculty, true) => Some(EvaluationType::SelfReview),
            _ => None,
        }
    }
}

impl std::fmt::Display for EvaluationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvaluationType::Student => write!(f, "student"),
            EvaluationType::Peer => write!(f, "peer"),
            EvaluationType::SelfReview => write!(f, "self"),
        }
    }
}

impl std::str::FromStr for EvaluationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(EvaluationType::Student),
            "peer" => Ok(EvaluationType::Peer),
            "self" => Ok(EvaluationType::SelfReview),
            _ => Err(format!("Invalid evaluation type: {s}")),
        }
    }
}

// 评教记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct Evaluation {
    pub id: i64,
    pub evaluator_id: i64,
    pub evaluatee_id: i64,
    pub course_id: i64,
    pub form_id: i64,
    pub evaluation_type: EvaluationType,
    pub overall_score: f64,
    pub comments: Option<String>,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

// 单题评分
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct EvaluationAnswer {
    pub id: i64,
    pub evaluation_id: i64,
    pub question_id: i64,
    pub rating: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserType;

    fn user(id: i64, role: UserRole) -> User {
        let now = chrono::Utc::now();
        User {
            id,
            first_name: "A".into(),
            middle_name: None,
            last_name: "B".into(),
            email: format!("u{id}@example.edu"),
            password_hash: String::new(),
            user_type: UserType::User,
            role,
            department_id: None,
            is_active: true,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_permitted_flows() {
        let faculty = user(1, UserRole::Faculty);
        let student = user(2, UserRole::Student);
        let supervisor = user(3, UserRole::Supervisor);

        assert_eq!(
            EvaluationType::for_flow(&student, &faculty),
            Some(EvaluationType::Student)
        );
        assert_eq!(
            EvaluationType::for_flow(&supervisor, &faculty),
            Some(EvaluationType::Peer)
        );
        assert_eq!(
            EvaluationType::for_flow(&faculty, &faculty),
            Some(EvaluationType::SelfReview)
        );
    }

    #[test]
    fn test_rejected_flows() {
        let faculty = user(1, UserRole::Faculty);
        let other_faculty = user(4, UserRole::Faculty);
        let student = user(2, UserRole::Student);

        // 教师之间互评不属于允许的流程
        assert_eq!(EvaluationType::for_flow(&faculty, &other_faculty), None);
        // 被评价人必须是教师
        assert_eq!(EvaluationType::for_flow(&faculty, &student), None);
        assert_eq!(EvaluationType::for_flow(&student, &student), None);
    }

    #[test]
    fn test_self_type_serializes_as_self() {
        assert_eq!(
            serde_json::to_value(EvaluationType::SelfReview).unwrap(),
            "self"
        );
        assert_eq!("self".parse::<EvaluationType>(), Ok(EvaluationType::SelfReview));
    }
}
