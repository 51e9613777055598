use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{ToPrimitive, Zero};

use super::progress::{exact_progress, goal_progress};
use super::validation::MAX_SCORE;
use crate::goals::Goal;

#[derive(Debug, Clone, PartialEq)]
pub struct GoalContribution {
    pub goal_id: u64,
    pub progress: f64, // Capped completion percentage
    pub weight: u32,
    pub weighted: f64, // progress * weight
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub total_weight: u64,
    pub weighted_sum: f64,
    pub goals: Vec<GoalContribution>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub score: u32,
    pub mean: f64, // Weighted mean before truncation
    pub breakdown: ScoreBreakdown,
}

/// Weighted-mean progress across `goals`, truncated to an integer in
/// [0, 100]. Empty input and all-zero weights both score 0.
pub fn compute_score(goals: &[Goal]) -> u32 {
    calculate_score(goals).score
}

/// Same as [`compute_score`] but keeps the per-goal breakdown.
pub fn calculate_score(goals: &[Goal]) -> ScoreResult {
    let contributions: Vec<GoalContribution> = goals
        .iter()
        .map(|goal| {
            let progress = goal_progress(goal);
            GoalContribution {
                goal_id: goal.id,
                progress,
                weight: goal.weight,
                weighted: progress * goal.weight as f64,
            }
        })
        .collect();

    let total_weight: u64 = contributions.iter().map(|c| c.weight as u64).sum();
    let weighted_sum: f64 = contributions.iter().map(|c| c.weighted).sum();

    let mean = if total_weight == 0 {
        0.0
    } else {
        weighted_sum / total_weight as f64
    };
    let score = truncated_mean(goals, total_weight);

    tracing::trace!(goals = goals.len(), total_weight, weighted_sum, score, "computed score");

    ScoreResult {
        score,
        mean,
        breakdown: ScoreBreakdown {
            total_weight,
            weighted_sum,
            goals: contributions,
        },
    }
}

/// Floor of the weighted mean, decided in exact rational arithmetic. The f64
/// mean is for display only; it can land on the wrong side of an integer.
fn truncated_mean(goals: &[Goal], total_weight: u64) -> u32 {
    if total_weight == 0 {
        return 0;
    }
    let weighted_sum: BigRational = goals
        .iter()
        .map(|g| exact_progress(g.current_value, g.target_value) * BigInt::from(g.weight))
        .fold(BigRational::zero(), |acc, term| acc + term);

    let mean = weighted_sum / BigInt::from(total_weight);
    mean.floor()
        .to_integer()
        .to_u32()
        .map_or(MAX_SCORE, |score| score.min(MAX_SCORE))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(current: u64, target: u64, weight: u32) -> Goal {
        Goal::new(0, 1, current, target, weight)
    }

    #[test]
    fn test_empty_goals() {
        assert_eq!(compute_score(&[]), 0);
        let result = calculate_score(&[]);
        assert_eq!(result.breakdown.total_weight, 0);
        assert!(result.breakdown.goals.is_empty());
    }

    #[test]
    fn test_weighted_mean_truncates() {
        // progress 50 and 20, (500 + 100) / 15 = 40
        let goals = vec![goal(50, 100, 10), goal(10, 50, 5)];
        assert_eq!(compute_score(&goals), 40);
    }

    #[test]
    fn test_overachieved_goal_capped() {
        // progress 75 and 100, (600 + 300) / 11 = 81.8
        let goals = vec![goal(75, 100, 8), goal(25, 25, 3)];
        let result = calculate_score(&goals);
        assert_eq!(result.score, 81);
        assert!((result.mean - 81.818).abs() < 0.01);
        assert_eq!(result.breakdown.total_weight, 11);
        assert_eq!(result.breakdown.weighted_sum, 900.0);
    }

    #[test]
    fn test_zero_total_weight() {
        let goals = vec![goal(100, 100, 0), goal(50, 100, 0)];
        assert_eq!(compute_score(&goals), 0);
    }

    #[test]
    fn test_zero_weight_goal_ignored() {
        let goals = vec![goal(100, 100, 4), goal(0, 100, 0)];
        assert_eq!(compute_score(&goals), 100);
    }

    #[test]
    fn test_zero_target_sole_goal() {
        assert_eq!(compute_score(&[goal(5, 0, 5)]), 100);
        assert_eq!(compute_score(&[goal(0, 0, 5)]), 0);
    }

    #[test]
    fn test_exact_mean_not_floored_below() {
        // 33.33.. and 66.66.. average to exactly 50
        let goals = vec![goal(1, 3, 1), goal(2, 3, 1)];
        assert_eq!(compute_score(&goals), 50);
    }

    #[test]
    fn test_mean_just_below_floor_truncates() {
        // 89.9999999999 must stay Gold territory, not round up to 90
        let goals = vec![goal(899_999_999_999, 1_000_000_000_000, 5)];
        let result = calculate_score(&goals);
        assert_eq!(result.score, 89);
        assert!(result.mean > 89.9);

        let goals = vec![goal(499_999_999_999, 1_000_000_000_000, 5)];
        assert_eq!(compute_score(&goals), 49);
    }

    #[test]
    fn test_weighted_mean_just_below_floor() {
        // (3 * 100 + 1 * 59.999999999) / 4 = 89.99999999975
        let goals = vec![goal(10, 10, 3), goal(59_999_999_999, 100_000_000_000, 1)];
        assert_eq!(compute_score(&goals), 89);
    }

    #[test]
    fn test_huge_overshoot_stays_in_range() {
        let goals = vec![goal(u64::MAX, 1, u32::MAX), goal(u64::MAX, 1, 1)];
        assert_eq!(compute_score(&goals), 100);
    }

    #[test]
    fn test_breakdown_per_goal() {
        let goals = vec![goal(50, 100, 10), goal(10, 50, 5)];
        let result = calculate_score(&goals);
        let progress: Vec<f64> = result.breakdown.goals.iter().map(|c| c.progress).collect();
        assert_eq!(progress, vec![50.0, 20.0]);
        assert_eq!(result.breakdown.goals[0].weighted, 500.0);
        assert_eq!(result.breakdown.goals[1].weighted, 100.0);
    }
}
