use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::ProgressError;
use crate::goals::{Goal, GoalStatus, ProgressLog, ProgressUpdate, User};
use crate::scoring::{calculate_score, compute_score, LeagueTable, Promotion, ScoreResult};

/// A user together with the goals they own and the audit trail on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub user: User,
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub updates: ProgressLog,
}

/// What an employee submits when logging progress.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSubmission {
    pub value: u64,
    pub status: Option<GoalStatus>,
    pub comment: String,
    pub proof_reference: Option<String>,
}

impl ProgressSubmission {
    pub fn new(value: u64, comment: impl Into<String>) -> Self {
        Self {
            value,
            status: None,
            comment: comment.into(),
            proof_reference: None,
        }
    }

    pub fn with_status(mut self, status: GoalStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_proof(mut self, proof: impl Into<String>) -> Self {
        self.proof_reference = Some(proof.into());
        self
    }
}

/// Result of a recorded submission. `promotion.to` is the league now held.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressOutcome {
    pub goal_id: u64,
    pub score: u32,
    pub promotion: Promotion,
}

impl EmployeeRecord {
    pub fn new(user: User) -> Self {
        Self {
            user,
            goals: Vec::new(),
            updates: ProgressLog::new(),
        }
    }

    pub fn goal(&self, goal_id: u64) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == goal_id)
    }

    pub fn score(&self) -> u32 {
        compute_score(&self.goals)
    }

    pub fn score_result(&self) -> ScoreResult {
        calculate_score(&self.goals)
    }

    /// Record one progress submission and re-rank the user.
    ///
    /// Validation runs before anything is touched. Once it passes, the audit
    /// entry, goal mutation, rescoring and league change are applied
    /// together, so an error never leaves a partial update behind.
    pub fn record_progress(
        &mut self,
        goal_id: u64,
        submission: ProgressSubmission,
        table: &LeagueTable,
        now: DateTime<Utc>,
    ) -> Result<ProgressOutcome, ProgressError> {
        let comment = submission.comment.trim().to_string();
        if comment.is_empty() {
            return Err(ProgressError::MissingComment { goal_id });
        }

        let index = self
            .goals
            .iter()
            .position(|g| g.id == goal_id)
            .ok_or(ProgressError::UnknownGoal(goal_id))?;

        if self.goals[index].owner_id != self.user.id {
            return Err(ProgressError::NotOwner {
                goal_id,
                user_id: self.user.id,
            });
        }

        // Nothing below can fail
        self.updates.append(ProgressUpdate {
            goal_id,
            author_id: self.user.id,
            update_value: submission.value,
            comment,
            proof_reference: submission
                .proof_reference
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            timestamp: now,
        });

        let goal = &mut self.goals[index];
        goal.current_value = submission.value;
        if let Some(status) = submission.status {
            goal.status = status;
        }

        let score = compute_score(&self.goals);
        let promotion = self.apply_score(score, table);

        tracing::debug!(user_id = self.user.id, goal_id, value = submission.value, score, "recorded progress");

        Ok(ProgressOutcome {
            goal_id,
            score,
            promotion,
        })
    }

    fn apply_score(&mut self, score: u32, table: &LeagueTable) -> Promotion {
        let promotion = table.assess(score, self.user.league);
        if promotion.is_promotion() {
            tracing::info!(
                user = %self.user.full_name,
                from = %promotion.from,
                to = %promotion.to,
                score,
                "user promoted"
            );
            self.user.league = promotion.to;
        }
        promotion
    }
}
