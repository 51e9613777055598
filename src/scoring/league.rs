use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::config::{PromotionPolicy, TierThreshold};
use super::validation::validate_tiers;

/// Ranking tier. Ordering follows declaration: Bronze is lowest, Diamond is
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum League {
    #[default]
    Bronze,
    Silver,
    Gold,
    Diamond,
}

impl League {
    pub const ALL: [League; 4] = [League::Bronze, League::Silver, League::Gold, League::Diamond];

    pub fn name(&self) -> &'static str {
        match self {
            League::Bronze => "Bronze",
            League::Silver => "Silver",
            League::Gold => "Gold",
            League::Diamond => "Diamond",
        }
    }

    /// The tier directly above this one, `None` for Diamond
    pub fn next(&self) -> Option<League> {
        match self {
            League::Bronze => Some(League::Silver),
            League::Silver => Some(League::Gold),
            League::Gold => Some(League::Diamond),
            League::Diamond => None,
        }
    }

    pub fn is_top(&self) -> bool {
        self.next().is_none()
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for League {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        League::ALL
            .into_iter()
            .find(|l| l.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow::anyhow!("Unknown league '{}' (expected bronze, silver, gold or diamond)", s))
    }
}

impl TryFrom<String> for League {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<League> for String {
    fn from(league: League) -> Self {
        league.name().to_string()
    }
}

/// Outcome of classifying a fresh score against the tier a user holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Promotion {
    pub from: League,
    pub to: League,
}

impl Promotion {
    pub fn is_promotion(&self) -> bool {
        self.to > self.from
    }
}

/// Injectable league thresholds plus the policy used to move between them.
///
/// Always holds exactly one floor per league in tier order, Bronze at 0.
#[derive(Debug, Clone, PartialEq)]
pub struct LeagueTable {
    tiers: Vec<TierThreshold>,
    policy: PromotionPolicy,
}

impl Default for LeagueTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl LeagueTable {
    /// Build a table from configured floors. Bronze may be omitted and is
    /// pinned at 0; every other tier must be present.
    pub fn new(tiers: &[TierThreshold], policy: PromotionPolicy) -> Result<Self> {
        let errors = validate_tiers(tiers, "tiers");
        if !errors.is_empty() {
            bail!("Invalid league table: {}", errors.join("; "));
        }

        let mut full = Vec::with_capacity(League::ALL.len());
        if tiers.first().map(|t| t.tier) != Some(League::Bronze) {
            full.push(TierThreshold {
                tier: League::Bronze,
                min_score: 0,
            });
        }
        full.extend_from_slice(tiers);

        Ok(Self { tiers: full, policy })
    }

    /// Silver 50, Gold 75, Diamond 90
    pub fn standard() -> Self {
        Self::from_floors(50, 75, 90, PromotionPolicy::Absolute)
    }

    /// Silver 50, Gold 70, Diamond 90
    pub fn legacy() -> Self {
        Self::from_floors(50, 70, 90, PromotionPolicy::Absolute)
    }

    /// Resolve a preset by name
    pub fn preset(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "standard" => Some(Self::standard()),
            "legacy" => Some(Self::legacy()),
            _ => None,
        }
    }

    fn from_floors(silver: u32, gold: u32, diamond: u32, policy: PromotionPolicy) -> Self {
        let floors = [0, silver, gold, diamond];
        Self {
            tiers: League::ALL
                .into_iter()
                .zip(floors)
                .map(|(tier, min_score)| TierThreshold { tier, min_score })
                .collect(),
            policy,
        }
    }

    pub fn with_policy(mut self, policy: PromotionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> PromotionPolicy {
        self.policy
    }

    pub fn tiers(&self) -> &[TierThreshold] {
        &self.tiers
    }

    /// Minimum score for holding `league`
    pub fn floor(&self, league: League) -> u32 {
        self.tiers[league.index()].min_score
    }

    /// Highest tier whose floor the score reaches, ignoring the current tier
    pub fn lookup(&self, score: u32) -> League {
        self.tiers
            .iter()
            .rev()
            .find(|t| score >= t.min_score)
            .map(|t| t.tier)
            .unwrap_or(League::Bronze)
    }

    /// League the user should hold after scoring `score`.
    ///
    /// Never lower than `current`. Under the sequential policy at most one
    /// tier is climbed per call.
    pub fn classify(&self, score: u32, current: League) -> League {
        if current.is_top() {
            return current;
        }
        match self.policy {
            PromotionPolicy::Absolute => current.max(self.lookup(score)),
            PromotionPolicy::Sequential => match current.next() {
                Some(next) if score >= self.floor(next) => next,
                _ => current,
            },
        }
    }

    pub fn assess(&self, score: u32, current: League) -> Promotion {
        let to = self.classify(score, current);
        tracing::debug!(score, from = %current, to = %to, policy = ?self.policy, "classified score");
        Promotion { from: current, to }
    }
}
