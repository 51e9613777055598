use super::config::{ScoringConfig, TierThreshold};
use super::league::{League, LeagueTable};

/// Highest score the calculator can produce
pub const MAX_SCORE: u32 = 100;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref league) = config.league {
        if let Some(ref tiers) = league.tiers {
            errors.extend(validate_tiers(tiers, "scoring.league.tiers"));
        } else if let Some(ref preset) = league.preset {
            if LeagueTable::preset(preset).is_none() {
                errors.push(format!(
                    "scoring.league.preset: unknown preset '{}' (expected standard or legacy)",
                    preset
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check a list of tier floors. `path` prefixes every message.
///
/// Bronze may be omitted (its floor is always 0); Silver, Gold and Diamond
/// must each appear once, in tier order, with strictly increasing floors.
pub fn validate_tiers(tiers: &[TierThreshold], path: &str) -> Vec<String> {
    let mut errors = Vec::new();

    for (i, t) in tiers.iter().enumerate() {
        if t.min_score > MAX_SCORE {
            errors.push(format!(
                "{}[{}].min_score: {} exceeds the maximum score {}",
                path, i, t.min_score, MAX_SCORE
            ));
        }
        if t.tier == League::Bronze && t.min_score != 0 {
            errors.push(format!("{}[{}]: Bronze floor must be 0", path, i));
        }
    }

    for (i, pair) in tiers.windows(2).enumerate() {
        let (prev, cur) = (pair[0], pair[1]);
        if cur.tier <= prev.tier {
            errors.push(format!(
                "{}[{}]: {} listed after {} (tiers must be unique and lowest first)",
                path,
                i + 1,
                cur.tier,
                prev.tier
            ));
        } else if cur.min_score <= prev.min_score {
            errors.push(format!(
                "{}[{}].min_score: {} floor {} must be above {} floor {}",
                path,
                i + 1,
                cur.tier,
                cur.min_score,
                prev.tier,
                prev.min_score
            ));
        }
    }

    for league in [League::Silver, League::Gold, League::Diamond] {
        if !tiers.iter().any(|t| t.tier == league) {
            errors.push(format!("{}: missing tier {}", path, league));
        }
    }

    errors
}
