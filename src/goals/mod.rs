pub mod log;
pub mod types;

pub use log::ProgressLog;
pub use types::{Goal, GoalStatus, NewGoal, ProgressUpdate, Role, User};
