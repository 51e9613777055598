use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{get_config_path, Config};
use crate::scoring::{
    validate_tiers, League, LeagueConfig, PromotionPolicy, ScoringConfig, TierThreshold,
};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Keep asking until the answer parses as a score floor in [0, 100].
fn prompt_floor(league: League, default: u32) -> Result<u32> {
    loop {
        let input = prompt_with_default(&format!("  {} floor", league), &default.to_string())?;
        match input.parse::<u32>() {
            Ok(v) if v <= 100 => return Ok(v),
            Ok(_) => println!("  Invalid: must be at most 100. Try again."),
            Err(_) => println!("  Invalid: must be a whole number. Try again."),
        }
    }
}

/// Silver, Gold and Diamond floors as a tier list
pub fn custom_tiers(silver: u32, gold: u32, diamond: u32) -> Vec<TierThreshold> {
    vec![
        TierThreshold {
            tier: League::Silver,
            min_score: silver,
        },
        TierThreshold {
            tier: League::Gold,
            min_score: gold,
        },
        TierThreshold {
            tier: League::Diamond,
            min_score: diamond,
        },
    ]
}

/// Serialize a config the way the wizard writes it
pub fn render_config(config: &Config) -> Result<String> {
    serde_saphyr::to_string(config).map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("Goal League Configuration Wizard");
    println!("================================");
    println!();

    // 1. Scoring
    let configure_scoring = prompt_yes_no("Configure scoring? (n accepts defaults)", true)?;

    let scoring = if configure_scoring {
        println!();
        println!("Goals without an explicit weight get the default weight when assigned.");
        let default_weight: u32 = loop {
            let input = prompt_with_default("Default goal weight", "5")?;
            match input.parse::<u32>() {
                Ok(v) => break v,
                Err(_) => println!("  Invalid: must be a non-negative whole number. Try again."),
            }
        };

        println!();
        println!("League thresholds decide which tier a score earns.");
        println!("  standard -- Silver 50, Gold 75, Diamond 90");
        println!("  legacy   -- Silver 50, Gold 70, Diamond 90");
        println!("  custom   -- enter your own floors");
        let (preset, tiers) = loop {
            let input = prompt_with_default("Threshold table", "standard")?.to_lowercase();
            match input.as_str() {
                "standard" | "legacy" => break (Some(input.clone()), None),
                "custom" => {
                    let tiers = custom_tiers(
                        prompt_floor(League::Silver, 50)?,
                        prompt_floor(League::Gold, 75)?,
                        prompt_floor(League::Diamond, 90)?,
                    );
                    let errors = validate_tiers(&tiers, "tiers");
                    if errors.is_empty() {
                        break (None, Some(tiers));
                    }
                    for error in errors {
                        println!("  Invalid: {}", error);
                    }
                    println!("  Try again.");
                }
                _ => println!("  Invalid: choose standard, legacy or custom."),
            }
        };

        println!();
        println!("absolute   -- jump straight to the highest tier the score reaches");
        println!("sequential -- climb one tier per score update");
        let policy = loop {
            let input = prompt_with_default("Promotion policy", "absolute")?.to_lowercase();
            match input.as_str() {
                "absolute" => break PromotionPolicy::Absolute,
                "sequential" => break PromotionPolicy::Sequential,
                _ => println!("  Invalid: choose absolute or sequential."),
            }
        };

        ScoringConfig {
            default_weight: Some(default_weight),
            league: Some(LeagueConfig {
                preset,
                policy: Some(policy),
                tiers,
            }),
        }
    } else {
        ScoringConfig::default()
    };

    // 2. Roster
    println!();
    let roster_input = prompt_with_default("Default roster snapshot (JSON), or 'none'", "none")?;
    let roster = if roster_input == "none" || roster_input.is_empty() {
        None
    } else {
        Some(PathBuf::from(roster_input))
    };

    // 3. Config path
    let default_config_path = match default_path {
        Some(p) => p,
        None => get_config_path()?,
    };
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 4. Write config
    let config = Config {
        roster,
        scoring: Some(scoring),
    };
    let yaml = render_config(&config)?;

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(&config_path, &yaml)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `goal-league score --user <ID>` to get started.");

    Ok(())
}
