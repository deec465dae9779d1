use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod energy_cmd;
mod state;
mod streak_cmd;
mod tasks_cmd;

#[derive(Parser, Debug)]
#[command(
    name = "nag",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("NAG_BUILD_SHA"), ")"),
    about = "Deadline reminders, urgency and energy-aware ordering"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage ~/.nag/config.toml (timezone and aggression overrides)
    Config {
        #[command(subcommand)]
        command: config::ConfigCommand,
    },

    /// Rank tasks by urgency with a per-component breakdown
    Score {
        /// JSON array of tasks
        #[arg(long)]
        tasks: PathBuf,

        /// Evaluation instant (RFC3339, default: now)
        #[arg(long)]
        now: Option<String>,
    },

    /// Project reminder schedules, or diff them against installed ids
    Schedule {
        #[arg(long)]
        tasks: PathBuf,

        #[arg(long)]
        now: Option<String>,

        /// JSON array of notification ids already installed on the device
        #[arg(long)]
        installed: Option<PathBuf>,
    },

    /// Order tasks for the current energy slot
    Order {
        #[arg(long)]
        tasks: PathBuf,

        /// Energy profile JSON (default: empty profile)
        #[arg(long)]
        profile: Option<PathBuf>,

        #[arg(long)]
        now: Option<String>,
    },

    /// Open tasks due before the end of the local day, overdue included
    Today {
        #[arg(long)]
        tasks: PathBuf,

        #[arg(long)]
        now: Option<String>,
    },

    /// Overdue / due-soon counters and the 7-day pressure map
    Pressure {
        #[arg(long)]
        tasks: PathBuf,

        #[arg(long)]
        now: Option<String>,
    },

    /// Focus interval tracking
    Energy {
        #[command(subcommand)]
        command: energy_cmd::EnergyCommand,
    },

    /// Completion streaks
    Streak {
        #[command(subcommand)]
        command: streak_cmd::StreakCommand,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("NAG_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Config { command } => config::run(command)?,

        Command::Score { tasks, now } => {
            let now = tasks_cmd::resolve_now(now.as_deref())?;
            tasks_cmd::score(&tasks, now)?;
        }

        Command::Schedule { tasks, now, installed } => {
            let cfg = config::load_config()?;
            let now = tasks_cmd::resolve_now(now.as_deref())?;
            tasks_cmd::schedule_cmd(&cfg, &tasks, installed.as_deref(), now)?;
        }

        Command::Order { tasks, profile, now } => {
            let tz = config::load_config()?.tz()?;
            let now = tasks_cmd::resolve_now(now.as_deref())?;
            tasks_cmd::order(tz, &tasks, profile.as_deref(), now)?;
        }

        Command::Today { tasks, now } => {
            let tz = config::load_config()?.tz()?;
            let now = tasks_cmd::resolve_now(now.as_deref())?;
            tasks_cmd::today(tz, &tasks, now)?;
        }

        Command::Pressure { tasks, now } => {
            let tz = config::load_config()?.tz()?;
            let now = tasks_cmd::resolve_now(now.as_deref())?;
            tasks_cmd::pressure(tz, &tasks, now)?;
        }

        Command::Energy { command } => energy_cmd::run(command)?,

        Command::Streak { command } => streak_cmd::run(command)?,
    }

    Ok(())
}
