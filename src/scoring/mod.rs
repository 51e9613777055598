pub mod config;
pub mod engine;
pub mod league;
pub mod progress;
pub mod validation;

pub use config::*;
pub use engine::{calculate_score, compute_score, GoalContribution, ScoreBreakdown, ScoreResult};
pub use league::{League, LeagueTable, Promotion};
pub use progress::{exact_progress, goal_progress, progress_percent};
pub use validation::{validate_scoring, validate_tiers};
