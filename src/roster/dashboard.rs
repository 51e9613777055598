use serde::Serialize;

use super::types::{Roster, RosterError};
use crate::scoring::{goal_progress, League, LeagueTable};

/// A direct report as shown on a manager's dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberScore {
    pub user_id: u64,
    pub full_name: String,
    pub score: u32,
    pub league: League,
    /// League the current score would earn; differs from `league` when a
    /// promotion has not been recorded yet
    pub projected: League,
}

/// One row of the organization overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManagerSummary {
    pub manager_id: u64,
    pub full_name: String,
    pub team_size: usize,
    pub goal_count: usize,
    pub avg_progress: u32,
}

/// Scores of every direct report of `manager_id`, best first. Ties keep
/// alphabetical order by name.
pub fn team_scores(roster: &Roster, manager_id: u64, table: &LeagueTable) -> Result<Vec<MemberScore>, RosterError> {
    roster.manager(manager_id)?;

    let mut members: Vec<MemberScore> = roster
        .reports_of(manager_id)
        .map(|record| {
            let score = record.score();
            MemberScore {
                user_id: record.user.id,
                full_name: record.user.full_name.clone(),
                score,
                league: record.user.league,
                projected: table.classify(score, record.user.league),
            }
        })
        .collect();

    members.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.full_name.cmp(&b.full_name)));
    Ok(members)
}

/// Average goal progress across each manager's whole team.
pub fn organization_overview(roster: &Roster) -> Vec<ManagerSummary> {
    roster
        .managers()
        .map(|manager| {
            let manager_id = manager.user.id;
            let team: Vec<_> = roster.reports_of(manager_id).collect();
            let progress: Vec<f64> = team
                .iter()
                .flat_map(|r| r.goals.iter().map(goal_progress))
                .collect();

            let avg_progress = if progress.is_empty() {
                0
            } else {
                (progress.iter().sum::<f64>() / progress.len() as f64).floor() as u32
            };

            ManagerSummary {
                manager_id,
                full_name: manager.user.full_name.clone(),
                team_size: team.len(),
                goal_count: progress.len(),
                avg_progress,
            }
        })
        .collect()
}
