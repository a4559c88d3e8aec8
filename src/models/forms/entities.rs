use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 学期
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/form.ts")]
pub enum Semester {
    First,
    Second,
    Summer,
}

impl std::fmt::Display for Semester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Semester::First => write!(f, "first"),
            Semester::Second => write!(f, "second"),
            Semester::Summer => write!(f, "summer"),
        }
    }
}

impl std::str::FromStr for Semester {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(Semester::First),
            "second" => Ok(Semester::Second),
            "summer" => Ok(Semester::Summer),
            _ => Err(format!("Invalid semester: {s}")),
        }
    }
}

// 评教表单
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/form.ts")]
pub struct EvaluationForm {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    /// 形如 2024-2025
    pub school_year: String,
    pub semester: Semester,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EvaluationForm {
    /// 表单在时间点 `at` 是否开放（起止时间均为闭区间）
    pub fn is_open_at(&self, at: DateTime<Utc>) -> bool {
        self.is_active && self.start_at <= at && at <= self.end_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn form(start: DateTime<Utc>, end: DateTime<Utc>, is_active: bool) -> EvaluationForm {
        EvaluationForm {
            id: 1,
            title: "Midterm".into(),
            description: None,
            school_year: "2024-2025".into(),
            semester: Semester::First,
            start_at: start,
            end_at: end,
            is_active,
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn test_open_window_is_inclusive() {
        let now = Utc::now();
        let f = form(now, now + Duration::days(1), true);
        assert!(f.is_open_at(now));
        assert!(f.is_open_at(now + Duration::days(1)));
        assert!(!f.is_open_at(now - Duration::seconds(1)));
        assert!(!f.is_open_at(now + Duration::days(1) + Duration::seconds(1)));
    }

    #[test]
    fn test_inactive_form_is_closed() {
        let now = Utc::now();
        let f = form(now - Duration::days(1), now + Duration::days(1), false);
        assert!(!f.is_open_at(now));
    }

    #[test]
    fn test_semester_round_trip_through_str() {
        assert_eq!("summer".parse::<Semester>(), Ok(Semester::Summer));
        assert_eq!(Semester::Second.to_string(), "second");
        assert!("third".parse::<Semester>().is_err());
    }
}
