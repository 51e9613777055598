use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::league::{League, LeagueTable};
use crate::goals::types::DEFAULT_WEIGHT;

/// Main scoring configuration.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   default_weight: 5
///   league:
///     policy: absolute
///     tiers:
///       - { tier: silver, min_score: 50 }
///       - { tier: gold, min_score: 75 }
///       - { tier: diamond, min_score: 90 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Weight applied to newly assigned goals that do not set one (default: 5)
    #[serde(default)]
    pub default_weight: Option<u32>,

    /// League thresholds and promotion policy
    #[serde(default)]
    pub league: Option<LeagueConfig>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            default_weight: Some(DEFAULT_WEIGHT),
            league: Some(LeagueConfig {
                preset: Some("standard".to_string()),
                policy: Some(PromotionPolicy::Absolute),
                tiers: None,
            }),
        }
    }
}

impl ScoringConfig {
    pub fn effective_default_weight(&self) -> u32 {
        self.default_weight.unwrap_or(DEFAULT_WEIGHT)
    }

    /// Resolve the configured league table.
    ///
    /// Explicit `tiers` win over `preset`; with neither set the standard
    /// table is used.
    pub fn league_table(&self) -> Result<LeagueTable> {
        let Some(ref league) = self.league else {
            return Ok(LeagueTable::standard());
        };
        let policy = league.policy.unwrap_or_default();

        if let Some(ref tiers) = league.tiers {
            return LeagueTable::new(tiers, policy).context("Failed to build league table from scoring.league.tiers");
        }

        let table = match league.preset {
            Some(ref name) => LeagueTable::preset(name)
                .with_context(|| format!("Unknown league preset '{}'", name))?,
            None => LeagueTable::standard(),
        };
        Ok(table.with_policy(policy))
    }
}

/// League section of the scoring config.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LeagueConfig {
    /// Named threshold table: "standard" (50/75/90) or "legacy" (50/70/90)
    #[serde(default)]
    pub preset: Option<String>,

    /// How a score moves a user between tiers (default: absolute)
    #[serde(default)]
    pub policy: Option<PromotionPolicy>,

    /// Explicit floors, lowest tier first. Overrides `preset`.
    #[serde(default)]
    pub tiers: Option<Vec<TierThreshold>>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PromotionPolicy {
    /// Jump straight to the highest tier the score reaches
    #[default]
    Absolute,
    /// Climb at most one tier per recomputation
    Sequential,
}

/// Minimum score for holding a tier.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TierThreshold {
    pub tier: League,
    pub min_score: u32,
}
