use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use nag_core::{StreakBook, StreakCategory, TaskCategory};
use std::path::PathBuf;

use crate::config::load_config;
use crate::state::{read_json_or_default, write_json};

#[derive(Subcommand, Debug)]
pub enum StreakCommand {
    /// Record a completed task for a day
    Record {
        /// Streak book JSON (created when missing)
        #[arg(long)]
        streaks: PathBuf,

        #[arg(long)]
        category: TaskCategory,

        /// Day of the completion (default: today in the configured timezone)
        #[arg(long)]
        date: Option<String>,

        #[arg(long, default_value_t = false)]
        write: bool,
    },
}

pub fn run(cmd: StreakCommand) -> Result<()> {
    match cmd {
        StreakCommand::Record {
            streaks,
            category,
            date,
            write,
        } => {
            let today = match date {
                Some(d) => NaiveDate::parse_from_str(&d, "%Y-%m-%d")
                    .with_context(|| format!("invalid --date '{d}' (expected YYYY-MM-DD)"))?,
                None => Utc::now().with_timezone(&load_config()?.tz()?).date_naive(),
            };

            let book: StreakBook = read_json_or_default(&streaks)?;
            let book = book.record_completion(category, today);

            for key in [StreakCategory::from(category), StreakCategory::Overall] {
                let s = book.get(key);
                println!(
                    "{:<8} current={} longest={} momentum={:.2}",
                    key.as_str(),
                    s.current_count,
                    s.longest_count,
                    s.momentum_score
                );
            }

            if write {
                write_json(&streaks, &book)?;
                println!("Wrote {}", streaks.display());
            } else {
                println!("(dry-run; pass --write to save)");
            }
            Ok(())
        }
    }
}
