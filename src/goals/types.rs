use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::scoring::League;

/// Weight given to a goal when the assigning manager does not pick one.
pub const DEFAULT_WEIGHT: u32 = 5;

/// Target given to a goal when none is provided.
pub const DEFAULT_TARGET: u64 = 100;

/// Goal status. Stored as a free-form string so unknown values survive a
/// load/print cycle unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GoalStatus {
    #[default]
    InProgress,
    Completed,
    Other(String),
}

impl GoalStatus {
    pub fn as_str(&self) -> &str {
        match self {
            GoalStatus::InProgress => "In Progress",
            GoalStatus::Completed => "Completed",
            GoalStatus::Other(s) => s,
        }
    }
}

impl From<String> for GoalStatus {
    fn from(s: String) -> Self {
        let known = match s.trim() {
            "In Progress" => Some(GoalStatus::InProgress),
            "Completed" => Some(GoalStatus::Completed),
            _ => None,
        };
        known.unwrap_or(GoalStatus::Other(s))
    }
}

impl From<&str> for GoalStatus {
    fn from(s: &str) -> Self {
        GoalStatus::from(s.to_string())
    }
}

impl From<GoalStatus> for String {
    fn from(status: GoalStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One assigned, weighted objective.
///
/// Values are unsigned, so the non-negativity precondition of the score
/// calculator holds by construction. Negative input is rejected when the
/// roster is deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: u64,
    pub owner_id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub kpi_name: Option<String>,
    #[serde(default)]
    pub current_value: u64,
    #[serde(default = "default_target")]
    pub target_value: u64,
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default)]
    pub status: GoalStatus,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub manager_feedback: Option<String>,
}

fn default_target() -> u64 {
    DEFAULT_TARGET
}

fn default_weight() -> u32 {
    DEFAULT_WEIGHT
}

impl Goal {
    /// Build a goal with only the fields that matter for scoring set.
    pub fn new(id: u64, owner_id: u64, current_value: u64, target_value: u64, weight: u32) -> Self {
        Self {
            id,
            owner_id,
            title: format!("Goal {}", id),
            description: None,
            kpi_name: None,
            current_value,
            target_value,
            weight,
            status: GoalStatus::InProgress,
            due_date: None,
            manager_feedback: None,
        }
    }
}

/// Goal fields a manager supplies when assigning work.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewGoal {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub kpi_name: Option<String>,
    #[serde(default)]
    pub target_value: Option<u64>,
    #[serde(default)]
    pub weight: Option<u32>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

/// Audit record of a single progress submission. Never edited after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub goal_id: u64,
    pub author_id: u64,
    pub update_value: u64,
    pub comment: String,
    #[serde(default)]
    pub proof_reference: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Role {
    #[default]
    Employee,
    Manager,
    Administrator,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Employee => "Employee",
            Role::Manager => "Manager",
            Role::Administrator => "Administrator",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub manager_id: Option<u64>,
    #[serde(default)]
    pub league: League,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_known_values() {
        assert_eq!(GoalStatus::from("In Progress"), GoalStatus::InProgress);
        assert_eq!(GoalStatus::from("Completed"), GoalStatus::Completed);
    }

    #[test]
    fn test_status_unknown_value_is_kept() {
        let status = GoalStatus::from("Blocked");
        assert_eq!(status, GoalStatus::Other("Blocked".to_string()));
        assert_eq!(status.to_string(), "Blocked");
    }

    #[test]
    fn test_goal_defaults_from_json() {
        let json = r#"{"id": 7, "owner_id": 2, "title": "Ship the report"}"#;
        let goal: Goal = serde_json::from_str(json).unwrap();
        assert_eq!(goal.current_value, 0);
        assert_eq!(goal.target_value, DEFAULT_TARGET);
        assert_eq!(goal.weight, DEFAULT_WEIGHT);
        assert_eq!(goal.status, GoalStatus::InProgress);
        assert!(goal.manager_feedback.is_none());
    }

    #[test]
    fn test_goal_rejects_negative_values() {
        let json = r#"{"id": 7, "owner_id": 2, "title": "x", "current_value": -3}"#;
        assert!(serde_json::from_str::<Goal>(json).is_err());
    }

    #[test]
    fn test_goal_status_serializes_as_string() {
        let mut goal = Goal::new(1, 1, 0, 10, 5);
        goal.status = GoalStatus::Completed;
        let json = serde_json::to_value(&goal).unwrap();
        assert_eq!(json["status"], "Completed");
    }

    #[test]
    fn test_user_defaults() {
        let json = r#"{"id": 3, "full_name": "Dana Reyes", "email": "dana@example.com"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, Role::Employee);
        assert_eq!(user.league, League::Bronze);
        assert!(user.manager_id.is_none());
    }
}
