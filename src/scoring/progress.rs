use num_bigint::BigInt;
use num_rational::BigRational;

use crate::goals::Goal;

/// Progress never reported above this, however far a target is overshot
pub const MAX_PROGRESS: f64 = 100.0;

/// Completion percentage of a goal in [0, 100].
pub fn goal_progress(goal: &Goal) -> f64 {
    progress_percent(goal.current_value, goal.target_value)
}

/// Completion percentage for a raw current/target pair.
///
/// A zero target counts as fully met by any effort and unmet by none.
pub fn progress_percent(current: u64, target: u64) -> f64 {
    if target == 0 {
        return if current > 0 { MAX_PROGRESS } else { 0.0 };
    }
    // Scale before dividing so whole percentages come out exact
    let progress = current as f64 * 100.0 / target as f64;
    progress.min(MAX_PROGRESS)
}

/// [`progress_percent`] as an exact fraction, used where truncation has to
/// be decided without float error.
pub fn exact_progress(current: u64, target: u64) -> BigRational {
    if target == 0 {
        let pct: u32 = if current > 0 { 100 } else { 0 };
        return BigRational::from_integer(BigInt::from(pct));
    }
    let achieved = current.min(target);
    BigRational::new(BigInt::from(achieved) * BigInt::from(100u32), BigInt::from(target))
}
