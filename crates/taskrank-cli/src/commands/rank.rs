//! Ranking commands for CLI.

use clap::Args;
use taskrank_core::{Config, FixedClock, RankingService, ScoreBreakdown, ScoredTask};

use super::{parse_now, SourceArgs};

#[derive(Args, Debug)]
pub struct RankArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Rank as of this instant (RFC 3339 or "YYYY-MM-DD HH:MM:SS"); default now
    #[arg(long)]
    pub now: Option<String>,
    /// Only tasks in this category (id or name)
    #[arg(long)]
    pub category: Option<String>,
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
    /// Show at most this many tasks
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Args, Debug)]
pub struct ExplainArgs {
    /// Task ID
    pub task_id: String,
    #[command(flatten)]
    pub source: SourceArgs,
    /// Score as of this instant; default now
    #[arg(long)]
    pub now: Option<String>,
    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: RankArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let (snapshot, user_id) = args.source.open(&config)?;
    let clock = FixedClock(parse_now(args.now.as_deref())?);
    let service = RankingService::new(&snapshot, &snapshot, clock)
        .with_fallback_preferences(config.ranking.default_preferences);

    let mut ranked = match &args.category {
        Some(key) => {
            let category = snapshot
                .find_category(&user_id, key)
                .ok_or_else(|| format!("category not found: {key}"))?;
            service.rank_for_user_in_category(&user_id, &category.id)?
        }
        None => service.rank_for_user(&user_id)?,
    };
    tracing::info!(user_id = %user_id, count = ranked.len(), "ranked tasks");
    if let Some(limit) = args.limit {
        ranked.truncate(limit);
    }

    if args.json || config.output.json {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
    } else if ranked.is_empty() {
        println!("No open tasks.");
    } else {
        for (i, scored) in ranked.iter().enumerate() {
            println!("{}", format_row(i + 1, scored, config.output.show_scores));
        }
    }
    Ok(())
}

pub fn explain(args: ExplainArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let (snapshot, user_id) = args.source.open(&config)?;
    let clock = FixedClock(parse_now(args.now.as_deref())?);
    let service = RankingService::new(&snapshot, &snapshot, clock)
        .with_fallback_preferences(config.ranking.default_preferences);

    let breakdown = service
        .explain_for_user(&user_id, &args.task_id)?
        .ok_or_else(|| format!("Task not found: {}", args.task_id))?;

    if args.json || config.output.json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
    } else {
        print!("{}", format_breakdown(&breakdown));
    }
    Ok(())
}

fn format_row(position: usize, scored: &ScoredTask, show_scores: bool) -> String {
    let pin = if scored.task.is_pinned { "*" } else { " " };
    let due = scored
        .task
        .deadline
        .map(|d| format!("  (due {})", d.format("%Y-%m-%d %H:%M")))
        .unwrap_or_default();
    if show_scores {
        format!(
            "{position:>3}. {pin} {:>8.2}  {} [{}]{due}",
            scored.priority_score, scored.task.title, scored.task.id
        )
    } else {
        format!("{position:>3}. {pin} {} [{}]{due}", scored.task.title, scored.task.id)
    }
}

fn format_breakdown(breakdown: &ScoreBreakdown) -> String {
    let mut out = format!("Task {}\n", breakdown.task_id);
    for term in &breakdown.terms {
        out.push_str(&format!(
            "  {:<11} {:>6.2} x {:<5.2} = {:>8.2}\n",
            term.name, term.factor, term.weight, term.contribution
        ));
    }
    if let Some(days) = breakdown.days_until_deadline {
        out.push_str(&format!("  deadline in {days:.2} days\n"));
    }
    out.push_str(&format!("  total       {:>8.2}\n", breakdown.total));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskrank_core::Task;

    #[test]
    fn row_marks_pinned_tasks() {
        let scored = ScoredTask {
            task: Task::new("7", "Write report").pinned(true),
            priority_score: 212.5,
        };
        assert_eq!(format_row(1, &scored, true), "  1. *   212.50  Write report [7]");
        assert_eq!(format_row(1, &scored, false), "  1. * Write report [7]");
    }
}
