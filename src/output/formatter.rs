use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::roster::{ManagerSummary, MemberScore};
use crate::scoring::{League, ScoreResult};
use crate::workflow::{EmployeeRecord, ProgressOutcome};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// League name, colored by tier when colors are on
pub fn format_league(league: League, use_colors: bool) -> String {
    if !use_colors {
        return league.to_string();
    }
    match league {
        League::Bronze => league.yellow().to_string(),
        League::Silver => league.white().to_string(),
        League::Gold => league.bright_yellow().bold().to_string(),
        League::Diamond => league.bright_cyan().bold().to_string(),
    }
}

/// Format a progress percentage with at most one decimal (50%, 33.3%)
pub fn format_progress(progress: f64) -> String {
    format!("{:.1}%", progress).replace(".0%", "%")
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate title to fit available width, accounting for Unicode
fn truncate_title(title: &str, max_width: usize) -> String {
    let chars: Vec<char> = title.chars().collect();
    if chars.len() <= max_width {
        title.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Fit a title into whatever the terminal leaves after `fixed_width` columns
fn fit_title(title: &str, fixed_width: usize) -> String {
    match get_terminal_width() {
        Some(width) if width > fixed_width + 10 => truncate_title(title, width - fixed_width),
        // Very narrow terminal, show truncated
        Some(_) => truncate_title(title, 20),
        // No terminal (pipe), don't truncate
        None => title.to_string(),
    }
}

/// Format a user's goals, one per line.
/// Columns: id, progress, current/target, weight, status, title
pub fn format_goal_table(record: &EmployeeRecord, use_colors: bool) -> String {
    if record.goals.is_empty() {
        return "No goals assigned.".to_string();
    }

    let result = record.score_result();
    record
        .goals
        .iter()
        .zip(result.breakdown.goals.iter())
        .map(|(goal, contribution)| {
            let progress = format!("{:>6}", format_progress(contribution.progress));
            let values = format!("{}/{}", goal.current_value, goal.target_value);
            let prefix = format!(
                "{:>4}  {}  {:>11}  w{:<3} {:<12}",
                goal.id, progress, values, goal.weight, goal.status
            );
            let title = fit_title(&goal.title, prefix.chars().count() + 2);

            if use_colors {
                let progress = if contribution.progress >= 100.0 {
                    progress.green().to_string()
                } else {
                    progress.to_string()
                };
                format!(
                    "{}  {}  {:>11}  w{:<3} {:<12}  {}",
                    format!("{:>4}", goal.id).dimmed(),
                    progress,
                    values,
                    goal.weight,
                    goal.status,
                    title
                )
            } else {
                format!("{}  {}", prefix, title)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Header line for one user's score
pub fn format_user_score(record: &EmployeeRecord, score: u32, use_colors: bool) -> String {
    if use_colors {
        format!(
            "{} ({})  Score: {}  League: {}",
            record.user.full_name.bold(),
            record.user.role,
            score.bold(),
            format_league(record.user.league, true)
        )
    } else {
        format!(
            "{} ({})  Score: {}  League: {}",
            record.user.full_name, record.user.role, score, record.user.league
        )
    }
}

/// Latest logged update per goal plus the total count (for verbose mode)
pub fn format_update_history(record: &EmployeeRecord) -> String {
    let mut lines = vec![format!("Progress updates logged: {}", record.updates.entries().len())];
    for goal in &record.goals {
        let line = match record.updates.latest_for_goal(goal.id) {
            Some(update) => format!(
                "  Goal {}: {} on {} \"{}\"",
                goal.id,
                update.update_value,
                update.timestamp.format("%Y-%m-%d"),
                update.comment
            ),
            None => format!("  Goal {}: no updates", goal.id),
        };
        lines.push(line);
    }
    lines.join("\n")
}

/// Weighted breakdown of a score (for verbose mode)
pub fn format_score_breakdown(result: &ScoreResult) -> String {
    let mut lines: Vec<String> = result
        .breakdown
        .goals
        .iter()
        .map(|c| {
            format!(
                "  Goal {}: {} x {} = {:.1}",
                c.goal_id,
                format_progress(c.progress),
                c.weight,
                c.weighted
            )
        })
        .collect();
    lines.push(format!(
        "  Total: {:.1} / {} = {:.2} -> {}",
        result.breakdown.weighted_sum, result.breakdown.total_weight, result.mean, result.score
    ));
    lines.join("\n")
}

/// Format a manager's team as a ranked table: index, score, league, name.
/// A pending promotion is shown as "Bronze -> Gold".
pub fn format_team_table(members: &[MemberScore], use_colors: bool) -> String {
    if members.is_empty() {
        return "No direct reports.".to_string();
    }

    members
        .iter()
        .enumerate()
        .map(|(idx, m)| {
            let index_str = format!("{:>2}.", idx + 1);
            let score_str = format!("{:>3}", m.score);
            let league = if m.projected > m.league {
                format!(
                    "{} -> {}",
                    format_league(m.league, use_colors),
                    format_league(m.projected, use_colors)
                )
            } else {
                format_league(m.league, use_colors)
            };

            if use_colors {
                format!("{} {}  {}  {}", index_str.dimmed(), score_str.bold(), m.full_name, league)
            } else {
                format!("{} {}  {}  {}", index_str, score_str, m.full_name, league)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the organization overview: manager, team size, goals, average progress
pub fn format_overview(summaries: &[ManagerSummary], use_colors: bool) -> String {
    if summaries.is_empty() {
        return "No managers found.".to_string();
    }

    summaries
        .iter()
        .map(|s| {
            let stats = format!(
                "{} reports, {} goals, avg progress {}%",
                s.team_size, s.goal_count, s.avg_progress
            );
            if use_colors {
                format!("{}  {}", s.full_name.bold(), stats.dimmed())
            } else {
                format!("{}  {}", s.full_name, stats)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Summarize a recorded progress update
pub fn format_outcome(outcome: &ProgressOutcome, use_colors: bool) -> String {
    let promotion = &outcome.promotion;
    if promotion.is_promotion() {
        let line = format!(
            "Goal {} updated. Score: {}. Promoted from {} to {}!",
            outcome.goal_id,
            outcome.score,
            format_league(promotion.from, use_colors),
            format_league(promotion.to, use_colors)
        );
        if use_colors {
            line.green().to_string()
        } else {
            line
        }
    } else {
        format!(
            "Goal {} updated. Score: {}. League: {}",
            outcome.goal_id,
            outcome.score,
            format_league(promotion.to, use_colors)
        )
    }
}
