pub mod formatter;

pub use formatter::{
    format_goal_table, format_league, format_outcome, format_overview, format_progress,
    format_score_breakdown, format_team_table, format_update_history, format_user_score, should_use_colors,
};
