use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use goal_league::goals::{GoalStatus, NewGoal};
use goal_league::output;
use goal_league::roster::{
    get_roster_path, load_roster, organization_overview, team_scores, Roster,
};
use goal_league::scoring::LeagueTable;
use goal_league::workflow::{EmployeeRecord, ProgressSubmission};

const EXIT_SUCCESS: i32 = 0;
const EXIT_REJECTED: i32 = 1;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show a user's goals, score and league
    Score {
        /// User id
        #[arg(short, long)]
        user: u64,
    },
    /// Rank a manager's direct reports by score
    Team {
        /// Manager user id
        #[arg(short, long)]
        manager: u64,
    },
    /// Average goal progress for every manager's team
    Org,
    /// Record progress on a goal and re-rank its owner
    Record {
        /// User id of the goal owner
        #[arg(short, long)]
        user: u64,
        /// Goal id
        #[arg(short, long)]
        goal: u64,
        /// New current value
        #[arg(long)]
        value: u64,
        /// Justification for the update (required)
        #[arg(long)]
        comment: String,
        /// New status, e.g. "Completed"
        #[arg(long)]
        status: Option<String>,
        /// Link or reference backing the update
        #[arg(long)]
        proof: Option<String>,
        /// Print the updated employee record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Assign a new goal to a direct report
    Assign {
        /// Manager user id
        #[arg(short, long)]
        manager: u64,
        /// User id of the report receiving the goal
        #[arg(short, long)]
        assignee: u64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        target: Option<u64>,
        /// Defaults to scoring.default_weight
        #[arg(long)]
        weight: Option<u32>,
        /// Print the updated employee record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Leave feedback on a direct report's goal
    Feedback {
        /// Manager user id
        #[arg(short, long)]
        manager: u64,
        /// Goal id
        #[arg(short, long)]
        goal: u64,
        text: String,
        /// Print the updated employee record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "goal-league")]
#[command(about = "Weighted goal scoring and league promotion", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log detail (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Silence all logging
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to config file (defaults to ~/.config/goal-league/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Roster snapshot (JSON). Overrides the config's roster path.
    #[arg(short, long, global = true)]
    roster: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = goal_league::logging::setup_logging(cli.verbose, cli.quiet) {
        eprintln!("{:#}", e);
    }

    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init = cli.command {
        if let Err(e) = goal_league::config::init::run_init_wizard(config_path) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config = match goal_league::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate scoring config at startup
    let scoring = config.effective_scoring();
    if let Err(errors) = goal_league::scoring::validate_scoring(&scoring) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }
    let table = match scoring.league_table() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    tracing::debug!(tiers = ?table.tiers(), policy = ?table.policy(), "league table");

    // Load roster
    let roster_path = match cli.roster.map(PathBuf::from).or(config.roster) {
        Some(p) => Ok(p),
        None => get_roster_path(),
    };
    let mut roster = match roster_path.and_then(|p| load_roster(&p)) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Roster error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let use_colors = output::should_use_colors();
    let verbose = cli.verbose > 0;

    let result = match cli.command {
        Commands::Score { user } => show_score(&roster, user, &table, use_colors, verbose),
        Commands::Team { manager } => team_scores(&roster, manager, &table)
            .map(|members| println!("{}", output::format_team_table(&members, use_colors)))
            .map_err(anyhow::Error::from),
        Commands::Org => {
            let overview = organization_overview(&roster);
            println!("{}", output::format_overview(&overview, use_colors));
            Ok(())
        }
        Commands::Record {
            user,
            goal,
            value,
            comment,
            status,
            proof,
            json,
        } => {
            let mut submission = ProgressSubmission::new(value, comment);
            submission.status = status.map(GoalStatus::from);
            submission.proof_reference = proof;

            roster
                .record_progress(user, goal, submission, &table, Utc::now())
                .map_err(anyhow::Error::from)
                .and_then(|outcome| {
                    if json {
                        print_record(&roster, user)
                    } else {
                        println!("{}", output::format_outcome(&outcome, use_colors));
                        Ok(())
                    }
                })
        }
        Commands::Assign {
            manager,
            assignee,
            title,
            description,
            target,
            weight,
            json,
        } => {
            let new_goal = NewGoal {
                title,
                description,
                target_value: target,
                weight,
                ..Default::default()
            };
            roster
                .assign_goal(manager, assignee, new_goal, scoring.effective_default_weight())
                .map_err(anyhow::Error::from)
                .and_then(|id| {
                    if json {
                        print_record(&roster, assignee)
                    } else {
                        println!("Assigned goal {} to user {}", id, assignee);
                        Ok(())
                    }
                })
        }
        Commands::Feedback {
            manager,
            goal,
            text,
            json,
        } => roster
            .give_feedback(manager, goal, &text)
            .map_err(anyhow::Error::from)
            .and_then(|()| {
                if json {
                    let owner = roster.goal_owner(goal).map(|e| e.user.id).unwrap_or_default();
                    print_record(&roster, owner)
                } else {
                    println!("Feedback saved on goal {}", goal);
                    Ok(())
                }
            }),
        Commands::Init => Ok(()),
    };

    if let Err(e) = result {
        eprintln!("{:#}", e);
        std::process::exit(EXIT_REJECTED);
    }

    std::process::exit(EXIT_SUCCESS);
}

fn find_user(roster: &Roster, user_id: u64) -> anyhow::Result<&EmployeeRecord> {
    roster
        .find(user_id)
        .ok_or_else(|| anyhow::anyhow!("User {} not found", user_id))
}

fn show_score(
    roster: &Roster,
    user_id: u64,
    table: &LeagueTable,
    use_colors: bool,
    verbose: bool,
) -> anyhow::Result<()> {
    let record = find_user(roster, user_id)?;
    let result = record.score_result();

    println!("{}", output::format_user_score(record, result.score, use_colors));
    let promotion = table.assess(result.score, record.user.league);
    if promotion.is_promotion() {
        println!(
            "Qualifies for {} on next update",
            output::format_league(promotion.to, use_colors)
        );
    }
    println!();
    println!("{}", output::format_goal_table(record, use_colors));

    if verbose && !record.goals.is_empty() {
        println!();
        println!("{}", output::format_score_breakdown(&result));
        println!();
        println!("{}", output::format_update_history(record));
    }
    Ok(())
}

/// Print the employee record so an external store can persist it
fn print_record(roster: &Roster, user_id: u64) -> anyhow::Result<()> {
    let record = find_user(roster, user_id)?;
    println!("{}", serde_json::to_string_pretty(record)?);
    Ok(())
}
