use anyhow::Result;
use clap::Subcommand;
use nag_core::time::parse_local_deadline_to_utc;
use nag_core::{EnergyProfile, EnergySlot, FocusInterval};
use std::path::PathBuf;

use crate::config::load_config;
use crate::state::{read_json_or_default, write_json};

#[derive(Subcommand, Debug)]
pub enum EnergyCommand {
    /// Fold one finished focus interval into the profile
    Record {
        /// Energy profile JSON (created when missing)
        #[arg(long)]
        profile: PathBuf,

        /// Local start time, "YYYY-MM-DD HH:MM" in the configured timezone
        #[arg(long)]
        started_at: String,

        #[arg(long)]
        planned: u32,

        #[arg(long)]
        actual: u32,

        #[arg(long, default_value_t = false)]
        completed: bool,

        /// Save the updated profile (otherwise dry-run)
        #[arg(long, default_value_t = false)]
        write: bool,
    },

    /// Hours of a weekday whose observed productivity meets a threshold
    Peaks {
        #[arg(long)]
        profile: PathBuf,

        /// 1 = Sunday ... 7 = Saturday
        #[arg(long)]
        weekday: u32,

        #[arg(long, default_value_t = 0.7)]
        min: f64,
    },
}

pub fn run(cmd: EnergyCommand) -> Result<()> {
    match cmd {
        EnergyCommand::Record {
            profile,
            started_at,
            planned,
            actual,
            completed,
            write,
        } => {
            let cfg = load_config()?;
            let tz = cfg.tz()?;
            let started = parse_local_deadline_to_utc(&started_at, &cfg.timezone)?.with_timezone(&tz);
            let slot = EnergySlot::at(&started);

            let mut energy: EnergyProfile = read_json_or_default(&profile)?;
            let interval = FocusInterval {
                planned_minutes: planned,
                actual_minutes: actual,
                completed,
            };
            match energy.record_interval(slot, &interval) {
                Some(sample) => println!(
                    "slot {:02}:00 weekday {}: sample {:.2}, average {:.2}",
                    slot.hour(),
                    slot.weekday(),
                    sample,
                    energy.productivity(slot)
                ),
                None => {
                    println!("Nothing to record (no minutes tracked).");
                    return Ok(());
                }
            }

            if write {
                write_json(&profile, &energy)?;
                println!("Wrote {}", profile.display());
            } else {
                println!("(dry-run; pass --write to save)");
            }
            Ok(())
        }
        EnergyCommand::Peaks { profile, weekday, min } => {
            // Validates the weekday range.
            EnergySlot::new(0, weekday)?;
            let energy: EnergyProfile = read_json_or_default(&profile)?;
            let hours = energy.peak_hours(weekday, min);
            if hours.is_empty() {
                println!("No hours at or above {min:.2} yet.");
            } else {
                let labels: Vec<String> = hours.iter().map(|h| format!("{h:02}:00")).collect();
                println!("{}", labels.join(" "));
            }
            Ok(())
        }
    }
}
