use serde::{Deserialize, Serialize};

use super::types::ProgressUpdate;

/// Append-only audit trail of progress submissions.
///
/// There is no way to edit or remove an entry once pushed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressLog {
    entries: Vec<ProgressUpdate>,
}

impl ProgressLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, update: ProgressUpdate) {
        self.entries.push(update);
    }

    pub fn entries(&self) -> &[ProgressUpdate] {
        &self.entries
    }

    /// Updates for one goal, oldest first
    pub fn for_goal(&self, goal_id: u64) -> impl Iterator<Item = &ProgressUpdate> {
        self.entries.iter().filter(move |u| u.goal_id == goal_id)
    }

    pub fn latest_for_goal(&self, goal_id: u64) -> Option<&ProgressUpdate> {
        self.for_goal(goal_id).last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
