pub mod dashboard;
pub mod storage;
pub mod types;

pub use dashboard::{organization_overview, team_scores, ManagerSummary, MemberScore};
pub use storage::{get_roster_path, load_roster};
pub use types::{Roster, RosterError, ROSTER_VERSION};
