use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::goals::{Goal, GoalStatus, NewGoal, Role};
use crate::scoring::LeagueTable;
use crate::workflow::{EmployeeRecord, ProgressError, ProgressOutcome, ProgressSubmission};

pub const ROSTER_VERSION: u32 = 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RosterError {
    #[error("User {0} not found")]
    UnknownUser(u64),

    #[error("Goal {0} not found")]
    UnknownGoal(u64),

    #[error("User {0} is not a manager")]
    NotAManager(u64),

    #[error("User {user_id} does not report to manager {manager_id}")]
    NotDirectReport { manager_id: u64, user_id: u64 },

    #[error("Feedback text must not be empty")]
    EmptyFeedback,

    #[error("Goal id {0} appears more than once")]
    DuplicateGoalId(u64),

    #[error("User id {0} appears more than once")]
    DuplicateUserId(u64),

    #[error("No goal ids left above {0}")]
    GoalIdsExhausted(u64),

    #[error(transparent)]
    Progress(#[from] ProgressError),
}

/// Snapshot of every user, their goals and their progress trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub version: u32,
    #[serde(default)]
    pub employees: Vec<EmployeeRecord>,
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}

impl Roster {
    pub fn new() -> Self {
        Self {
            version: ROSTER_VERSION,
            employees: Vec::new(),
        }
    }

    pub fn find(&self, user_id: u64) -> Option<&EmployeeRecord> {
        self.employees.iter().find(|e| e.user.id == user_id)
    }

    pub fn find_mut(&mut self, user_id: u64) -> Option<&mut EmployeeRecord> {
        self.employees.iter_mut().find(|e| e.user.id == user_id)
    }

    /// Look up a user and require the Manager role
    pub fn manager(&self, manager_id: u64) -> Result<&EmployeeRecord, RosterError> {
        let record = self.find(manager_id).ok_or(RosterError::UnknownUser(manager_id))?;
        if record.user.role != Role::Manager {
            return Err(RosterError::NotAManager(manager_id));
        }
        Ok(record)
    }

    pub fn managers(&self) -> impl Iterator<Item = &EmployeeRecord> {
        self.employees.iter().filter(|e| e.user.role == Role::Manager)
    }

    /// Direct reports of `manager_id`, in roster order
    pub fn reports_of(&self, manager_id: u64) -> impl Iterator<Item = &EmployeeRecord> {
        self.employees
            .iter()
            .filter(move |e| e.user.manager_id == Some(manager_id))
    }

    /// The record owning `goal_id`
    pub fn goal_owner(&self, goal_id: u64) -> Option<&EmployeeRecord> {
        self.employees.iter().find(|e| e.goal(goal_id).is_some())
    }

    pub fn next_goal_id(&self) -> Result<u64, RosterError> {
        match self.employees.iter().flat_map(|e| e.goals.iter().map(|g| g.id)).max() {
            None => Ok(1),
            Some(max) => max.checked_add(1).ok_or(RosterError::GoalIdsExhausted(max)),
        }
    }

    /// User ids must be unique or lookups silently pick the first record.
    pub fn check_user_ids(&self) -> Result<(), RosterError> {
        let mut seen = HashSet::new();
        for record in &self.employees {
            if !seen.insert(record.user.id) {
                return Err(RosterError::DuplicateUserId(record.user.id));
            }
        }
        Ok(())
    }

    /// Goal ids are global; a repeat makes updates ambiguous.
    pub fn check_goal_ids(&self) -> Result<(), RosterError> {
        let mut seen = HashSet::new();
        for goal in self.employees.iter().flat_map(|e| e.goals.iter()) {
            if !seen.insert(goal.id) {
                return Err(RosterError::DuplicateGoalId(goal.id));
            }
        }
        Ok(())
    }

    /// Assign a new goal from a manager to one of their direct reports.
    /// Returns the new goal's id.
    pub fn assign_goal(
        &mut self,
        manager_id: u64,
        assignee_id: u64,
        new_goal: NewGoal,
        default_weight: u32,
    ) -> Result<u64, RosterError> {
        self.manager(manager_id)?;
        let assignee = self.find(assignee_id).ok_or(RosterError::UnknownUser(assignee_id))?;
        if assignee.user.manager_id != Some(manager_id) {
            return Err(RosterError::NotDirectReport {
                manager_id,
                user_id: assignee_id,
            });
        }

        let id = self.next_goal_id()?;
        let goal = Goal {
            id,
            owner_id: assignee_id,
            title: new_goal.title,
            description: new_goal.description,
            kpi_name: new_goal.kpi_name,
            current_value: 0,
            target_value: new_goal.target_value.unwrap_or(crate::goals::types::DEFAULT_TARGET),
            weight: new_goal.weight.unwrap_or(default_weight),
            status: GoalStatus::InProgress,
            due_date: new_goal.due_date,
            manager_feedback: None,
        };

        let Some(assignee) = self.find_mut(assignee_id) else {
            return Err(RosterError::UnknownUser(assignee_id));
        };
        assignee.goals.push(goal);

        tracing::info!(manager_id, assignee_id, goal_id = id, "assigned goal");
        Ok(id)
    }

    /// Replace the manager feedback on a direct report's goal.
    pub fn give_feedback(&mut self, manager_id: u64, goal_id: u64, text: &str) -> Result<(), RosterError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(RosterError::EmptyFeedback);
        }
        self.manager(manager_id)?;

        let owner = self.goal_owner(goal_id).ok_or(RosterError::UnknownGoal(goal_id))?;
        if owner.user.manager_id != Some(manager_id) {
            return Err(RosterError::NotDirectReport {
                manager_id,
                user_id: owner.user.id,
            });
        }
        let owner_id = owner.user.id;

        let goal = self
            .find_mut(owner_id)
            .and_then(|e| e.goals.iter_mut().find(|g| g.id == goal_id))
            .ok_or(RosterError::UnknownGoal(goal_id))?;
        goal.manager_feedback = Some(text.to_string());
        Ok(())
    }

    /// Record progress on behalf of `user_id`. See
    /// [`EmployeeRecord::record_progress`].
    pub fn record_progress(
        &mut self,
        user_id: u64,
        goal_id: u64,
        submission: ProgressSubmission,
        table: &LeagueTable,
        now: DateTime<Utc>,
    ) -> Result<ProgressOutcome, RosterError> {
        let record = self.find_mut(user_id).ok_or(RosterError::UnknownUser(user_id))?;
        Ok(record.record_progress(goal_id, submission, table, now)?)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::goals::User;
    use crate::scoring::League;

    pub(crate) fn person(id: u64, name: &str, role: Role, manager_id: Option<u64>) -> EmployeeRecord {
        EmployeeRecord::new(User {
            id,
            full_name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            role,
            manager_id,
            league: League::Bronze,
        })
    }

    /// One admin, two managers, three employees.
    pub(crate) fn sample_roster() -> Roster {
        let mut roster = Roster::new();
        roster.employees.push(person(1, "Avery Admin", Role::Administrator, None));
        roster.employees.push(person(2, "Morgan Lee", Role::Manager, None));
        roster.employees.push(person(3, "Riley Chen", Role::Manager, None));

        let mut ana = person(10, "Ana Park", Role::Employee, Some(2));
        ana.goals = vec![Goal::new(100, 10, 50, 100, 10), Goal::new(101, 10, 10, 50, 5)];
        let mut ben = person(11, "Ben Cole", Role::Employee, Some(2));
        ben.goals = vec![Goal::new(102, 11, 75, 100, 8), Goal::new(103, 11, 25, 25, 3)];
        let cy = person(12, "Cy Diaz", Role::Employee, Some(3));

        roster.employees.extend([ana, ben, cy]);
        roster
    }

    #[test]
    fn test_reports_of() {
        let roster = sample_roster();
        let ids: Vec<u64> = roster.reports_of(2).map(|e| e.user.id).collect();
        assert_eq!(ids, vec![10, 11]);
        assert_eq!(roster.reports_of(1).count(), 0);
    }

    #[test]
    fn test_next_goal_id() {
        assert_eq!(sample_roster().next_goal_id(), Ok(104));
        assert_eq!(Roster::new().next_goal_id(), Ok(1));
    }

    #[test]
    fn test_goal_ids_exhausted() {
        let mut roster = sample_roster();
        roster.employees[5].goals.push(Goal::new(u64::MAX, 12, 0, 10, 5));
        assert_eq!(roster.next_goal_id(), Err(RosterError::GoalIdsExhausted(u64::MAX)));

        let goal = NewGoal {
            title: "one more".to_string(),
            ..Default::default()
        };
        assert_eq!(
            roster.assign_goal(3, 12, goal, 5),
            Err(RosterError::GoalIdsExhausted(u64::MAX))
        );
        assert_eq!(roster.find(12).map(|e| e.goals.len()), Some(1));
    }

    #[test]
    fn test_duplicate_user_ids() {
        let mut roster = sample_roster();
        assert!(roster.check_user_ids().is_ok());
        roster.employees.push(person(11, "Ben Clone", Role::Employee, Some(2)));
        assert_eq!(roster.check_user_ids(), Err(RosterError::DuplicateUserId(11)));
    }

    #[test]
    fn test_duplicate_goal_ids() {
        let mut roster = sample_roster();
        assert!(roster.check_goal_ids().is_ok());
        roster.employees[5].goals.push(Goal::new(101, 12, 0, 10, 5));
        assert_eq!(roster.check_goal_ids(), Err(RosterError::DuplicateGoalId(101)));
    }

    #[test]
    fn test_assign_goal_to_report() {
        let mut roster = sample_roster();
        let id = roster
            .assign_goal(
                3,
                12,
                NewGoal {
                    title: "Onboard two clients".to_string(),
                    target_value: Some(2),
                    ..Default::default()
                },
                5,
            )
            .unwrap();

        assert_eq!(id, 104);
        let goal = roster.find(12).unwrap().goal(104).unwrap();
        assert_eq!(goal.owner_id, 12);
        assert_eq!(goal.current_value, 0);
        assert_eq!(goal.target_value, 2);
        assert_eq!(goal.weight, 5);
        assert_eq!(goal.status, GoalStatus::InProgress);
    }

    #[test]
    fn test_assign_goal_rules() {
        let mut roster = sample_roster();
        let goal = NewGoal {
            title: "x".to_string(),
            ..Default::default()
        };

        assert_eq!(
            roster.assign_goal(2, 12, goal.clone(), 5),
            Err(RosterError::NotDirectReport { manager_id: 2, user_id: 12 })
        );
        assert_eq!(roster.assign_goal(10, 11, goal.clone(), 5), Err(RosterError::NotAManager(10)));
        assert_eq!(roster.assign_goal(99, 11, goal.clone(), 5), Err(RosterError::UnknownUser(99)));
        assert_eq!(roster.assign_goal(2, 99, goal, 5), Err(RosterError::UnknownUser(99)));
    }

    #[test]
    fn test_give_feedback() {
        let mut roster = sample_roster();
        roster.give_feedback(2, 102, "  Great pace  ").unwrap();
        let goal = roster.find(11).unwrap().goal(102).unwrap();
        assert_eq!(goal.manager_feedback.as_deref(), Some("Great pace"));
    }

    #[test]
    fn test_give_feedback_rules() {
        let mut roster = sample_roster();
        assert_eq!(roster.give_feedback(2, 102, " "), Err(RosterError::EmptyFeedback));
        assert_eq!(
            roster.give_feedback(3, 102, "hi"),
            Err(RosterError::NotDirectReport { manager_id: 3, user_id: 11 })
        );
        assert_eq!(roster.give_feedback(2, 999, "hi"), Err(RosterError::UnknownGoal(999)));
        assert_eq!(roster.give_feedback(1, 102, "hi"), Err(RosterError::NotAManager(1)));
    }

    #[test]
    fn test_record_progress_through_roster() {
        let mut roster = sample_roster();
        let outcome = roster
            .record_progress(10, 101, ProgressSubmission::new(50, "hit target"), &LeagueTable::standard(), Utc::now())
            .unwrap();
        // progress 50 and 100: (500 + 500) / 15 = 66
        assert_eq!(outcome.score, 66);
        assert_eq!(roster.find(10).unwrap().user.league, League::Silver);
    }

    #[test]
    fn test_record_progress_errors_wrap() {
        let mut roster = sample_roster();
        let err = roster
            .record_progress(10, 102, ProgressSubmission::new(1, "not mine"), &LeagueTable::standard(), Utc::now())
            .unwrap_err();
        assert_eq!(err, RosterError::Progress(ProgressError::UnknownGoal(102)));
        assert_eq!(
            roster
                .record_progress(77, 1, ProgressSubmission::new(1, "x"), &LeagueTable::standard(), Utc::now())
                .unwrap_err(),
            RosterError::UnknownUser(77)
        );
    }
}
