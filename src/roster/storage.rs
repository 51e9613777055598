use super::types::{Roster, ROSTER_VERSION};
use anyhow::{Context, Result};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Get the default roster snapshot path (~/.config/goal-league/roster.json)
pub fn get_roster_path() -> Result<PathBuf> {
    Ok(crate::config::get_config_dir()?.join("roster.json"))
}

/// Load a roster snapshot from a JSON file
///
/// Unlike config, a missing roster is an error: there is nothing to score.
/// Fails on an unsupported version or when a user or goal id is used twice.
pub fn load_roster(path: &Path) -> Result<Roster> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open roster file at {}", path.display()))?;

    let roster: Roster = serde_json::from_reader(file)
        .with_context(|| format!("Failed to parse roster JSON in {}", path.display()))?;

    if roster.version != ROSTER_VERSION {
        anyhow::bail!("Unsupported roster version: {}", roster.version);
    }

    roster
        .check_user_ids()
        .and_then(|()| roster.check_goal_ids())
        .with_context(|| format!("Invalid roster in {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        employees = roster.employees.len(),
        "loaded roster"
    );

    Ok(roster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::League;
    use std::env;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = env::temp_dir().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_missing_file_errors() {
        let temp_path = env::temp_dir().join("goal_league_test_missing_roster.json");
        let _ = std::fs::remove_file(&temp_path);

        let err = load_roster(&temp_path).unwrap_err();
        assert!(err.to_string().contains("Failed to open roster file"));
    }

    #[test]
    fn test_load_roster() {
        let path = write_temp(
            "goal_league_test_roster.json",
            r#"{
  "version": 1,
  "employees": [
    {
      "user": {"id": 2, "full_name": "Morgan Lee", "email": "morgan@example.com", "role": "Manager"},
      "goals": []
    },
    {
      "user": {"id": 10, "full_name": "Ana Park", "email": "ana@example.com", "manager_id": 2, "league": "silver"},
      "goals": [
        {"id": 1, "owner_id": 10, "title": "Close tickets", "current_value": 40, "target_value": 50, "weight": 3}
      ],
      "updates": [
        {"goal_id": 1, "author_id": 10, "update_value": 40, "comment": "closed 40", "timestamp": "2026-03-01T09:30:00Z"}
      ]
    }
  ]
}"#,
        );

        let roster = load_roster(&path).unwrap();
        assert_eq!(roster.employees.len(), 2);

        let ana = roster.find(10).unwrap();
        assert_eq!(ana.user.league, League::Silver);
        assert_eq!(ana.score(), 80);
        assert_eq!(ana.updates.len(), 1);
        assert!(roster.find(2).unwrap().updates.is_empty());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_rejects_unknown_version() {
        let path = write_temp("goal_league_test_roster_v2.json", r#"{"version": 2, "employees": []}"#);
        let err = load_roster(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported roster version"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_rejects_duplicate_goal_ids() {
        let path = write_temp(
            "goal_league_test_roster_dup.json",
            r#"{"version": 1, "employees": [
  {"user": {"id": 1, "full_name": "A", "email": "a@example.com"},
   "goals": [{"id": 5, "owner_id": 1, "title": "a"}, {"id": 5, "owner_id": 1, "title": "b"}]}
]}"#,
        );
        let err = load_roster(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Goal id 5 appears more than once"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_rejects_duplicate_user_ids() {
        let path = write_temp(
            "goal_league_test_roster_dup_user.json",
            r#"{"version": 1, "employees": [
  {"user": {"id": 1, "full_name": "A", "email": "a@example.com"}},
  {"user": {"id": 1, "full_name": "B", "email": "b@example.com"}}
]}"#,
        );
        let err = load_roster(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("User id 1 appears more than once"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_rejects_negative_values() {
        let path = write_temp(
            "goal_league_test_roster_negative.json",
            r#"{"version": 1, "employees": [
  {"user": {"id": 1, "full_name": "A", "email": "a@example.com"},
   "goals": [{"id": 5, "owner_id": 1, "title": "a", "weight": -1}]}
]}"#,
        );
        assert!(load_roster(&path).is_err());
        let _ = std::fs::remove_file(&path);
    }
}
