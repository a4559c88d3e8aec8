//! 评教总分计算
//!
//! 分类内按题目权重求加权平均，分类间再按分类权重求加权平均。
//! 分类权重之和为 0 时退化为全部评分的算术平均。

use serde::Serialize;
use std::collections::BTreeMap;
use ts_rs::TS;

/// 参与计分的一条评分
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredAnswer {
    pub category_id: i64,
    pub category_weight: f64,
    pub question_weight: f64,
    pub rating: f64,
}

// 分类得分
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/evaluation.ts")]
pub struct CategoryScore {
    pub category_id: i64,
    pub weight: f64,
    pub mean_rating: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub overall: f64,
    pub categories: Vec<CategoryScore>,
}

/// 保留 4 位小数
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

pub fn compute_overall_score(answers: &[ScoredAnswer]) -> ScoreBreakdown {
    // category_id -> (分类权重, Σ题目权重×评分, Σ题目权重, 评分列表)
    let mut groups: BTreeMap<i64, (f64, f64, f64, Vec<f64>)> = BTreeMap::new();
    for a in answers {
        let entry = groups
            .entry(a.category_id)
            .or_insert((a.category_weight, 0.0, 0.0, Vec::new()));
        entry.1 += a.question_weight * a.rating;
        entry.2 += a.question_weight;
        entry.3.push(a.rating);
    }

    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;
    let mut categories = Vec::with_capacity(groups.len());
    for (category_id, (weight, weighted_ratings, question_weights, ratings)) in groups {
        let category_mean = if question_weights > 0.0 {
            weighted_ratings / question_weights
        } else {
            mean(ratings.into_iter())
        };
        weighted_sum += weight * category_mean;
        weight_total += weight;
        categories.push(CategoryScore {
            category_id,
            weight,
            mean_rating: round4(category_mean),
        });
    }

    let overall = if weight_total > 0.0 {
        weighted_sum / weight_total
    } else {
        mean(answers.iter().map(|a| a.rating))
    };

    ScoreBreakdown {
        overall: round4(overall),
        categories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(category_id: i64, category_weight: f64, question_weight: f64, rating: f64) -> ScoredAnswer {
        ScoredAnswer {
            category_id,
            category_weight,
            question_weight,
            rating,
        }
    }

    #[test]
    fn test_single_rating() {
        let result = compute_overall_score(&[answer(1, 1.0, 1.0, 5.0)]);
        assert_eq!(result.overall, 5.0);
        assert_eq!(result.categories.len(), 1);
        assert_eq!(result.categories[0].mean_rating, 5.0);
    }

    #[test]
    fn test_equal_weights_is_mean_of_category_means() {
        // 分类1 均值 4，分类2 均值 2
        let result = compute_overall_score(&[
            answer(1, 1.0, 1.0, 5.0),
            answer(1, 1.0, 1.0, 3.0),
            answer(2, 1.0, 1.0, 2.0),
        ]);
        assert_eq!(result.overall, 3.0);
    }

    #[test]
    fn test_category_weights_shift_score() {
        // (3×4 + 1×2) / 4 = 3.5
        let result = compute_overall_score(&[answer(1, 3.0, 1.0, 4.0), answer(2, 1.0, 1.0, 2.0)]);
        assert_eq!(result.overall, 3.5);
    }

    #[test]
    fn test_question_weights_inside_category() {
        // (2×5 + 1×2) / 3 = 4
        let result = compute_overall_score(&[answer(1, 1.0, 2.0, 5.0), answer(1, 1.0, 1.0, 2.0)]);
        assert_eq!(result.overall, 4.0);
        assert_eq!(result.categories[0].mean_rating, 4.0);
    }

    #[test]
    fn test_zero_category_weights_fall_back_to_plain_mean() {
        let result = compute_overall_score(&[
            answer(1, 0.0, 1.0, 5.0),
            answer(1, 0.0, 1.0, 4.0),
            answer(2, 0.0, 1.0, 3.0),
        ]);
        assert_eq!(result.overall, 4.0);
    }

    #[test]
    fn test_rounded_to_four_decimals() {
        let result = compute_overall_score(&[
            answer(1, 1.0, 1.0, 5.0),
            answer(1, 1.0, 1.0, 4.0),
            answer(1, 1.0, 1.0, 4.0),
        ]);
        assert_eq!(result.overall, 4.3333);
    }

    #[test]
    fn test_empty_answers() {
        let result = compute_overall_score(&[]);
        assert_eq!(result.overall, 0.0);
        assert!(result.categories.is_empty());
    }
}
