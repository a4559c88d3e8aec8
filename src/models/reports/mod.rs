//! 报表模型（按请求实时聚合，不缓存）

use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub const MAX_TOP_FACULTY_LIMIT: u64 = 100;

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct FacultyReportQuery {
    pub form_id: Option<i64>,
    pub department_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct CategoryReportQuery {
    pub form_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct TopFacultyQuery {
    pub limit: Option<i64>,
    pub form_id: Option<i64>,
}

impl TopFacultyQuery {
    /// 缺省使用配置值，并限制在 1..=100
    pub fn effective_limit(&self, default_limit: u64) -> u64 {
        match self.limit {
            Some(limit) => limit.clamp(1, MAX_TOP_FACULTY_LIMIT as i64) as u64,
            None => default_limit.clamp(1, MAX_TOP_FACULTY_LIMIT),
        }
    }
}

// 教师得分汇总
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct FacultyScoreSummary {
    pub faculty_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub department_id: Option<i64>,
    pub average_score: f64,
    pub evaluation_count: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct FacultyReportResponse {
    pub items: Vec<FacultyScoreSummary>,
}

// 分类平均分
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct CategoryAverage {
    pub category_id: i64,
    pub category_name: String,
    pub category_weight: f64,
    pub average_rating: f64,
    pub response_count: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct FacultyCategoryReportResponse {
    pub faculty_id: i64,
    pub categories: Vec<CategoryAverage>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct TopFacultyResponse {
    pub limit: u64,
    pub items: Vec<FacultyScoreSummary>,
}

// 总览
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct OverviewReport {
    pub total_evaluations: i64,
    pub active_faculty: i64,
    pub open_forms: i64,
    /// 尚无评教时为 null
    pub overall_average: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_faculty_limit_clamping() {
        let q = |limit| TopFacultyQuery {
            limit,
            form_id: None,
        };
        assert_eq!(q(None).effective_limit(10), 10);
        assert_eq!(q(Some(0)).effective_limit(10), 1);
        assert_eq!(q(Some(-5)).effective_limit(10), 1);
        assert_eq!(q(Some(1000)).effective_limit(10), 100);
        assert_eq!(q(Some(25)).effective_limit(10), 25);
    }
}
