use anyhow::{Context, Result};
use chrono_tz::Tz;
use clap::Subcommand;
use nag_core::{AggressionConfig, AggressionLevel, AggressionTable};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_nag_home;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// IANA zone used for local deadlines, energy slots and "today".
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Per-level overrides; levels not listed use the built-in defaults.
    #[serde(default)]
    pub aggression: AggressionTable,
}

fn default_timezone() -> String {
    "America/Chicago".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            aggression: AggressionTable::new(),
        }
    }
}

impl Config {
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid timezone in config: {}", self.timezone))
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_nag_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).context("parse config.toml")
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write ~/.nag/config.toml with defaults (no-op if present)
    Init,

    /// Print the timezone and the effective table for every level
    Show,

    /// Override one level; unspecified fields keep their current value
    Set {
        level: AggressionLevel,

        #[arg(long)]
        count: Option<i64>,

        #[arg(long)]
        first_minutes: Option<i64>,

        #[arg(long)]
        overdue_interval: Option<i64>,

        #[arg(long)]
        overdue_count: Option<i64>,
    },

    /// Drop the override for a level
    Reset { level: AggressionLevel },
}

pub fn run(cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Init => init_config(),
        ConfigCommand::Show => show(),
        ConfigCommand::Set {
            level,
            count,
            first_minutes,
            overdue_interval,
            overdue_count,
        } => {
            let mut cfg = load_config()?;
            let current = cfg.aggression.config_for(level);
            let next = AggressionConfig::new(
                count.unwrap_or(current.notification_count),
                first_minutes.unwrap_or(current.first_reminder_minutes),
                overdue_interval.unwrap_or(current.overdue_interval_minutes),
                overdue_count.unwrap_or(current.overdue_count),
            );
            cfg.aggression.set(level, next);
            save_config(&cfg)?;
            print_level(&cfg.aggression, level);
            Ok(())
        }
        ConfigCommand::Reset { level } => {
            let mut cfg = load_config()?;
            if cfg.aggression.reset(level).is_none() {
                println!("{level}: already using defaults");
                return Ok(());
            }
            save_config(&cfg)?;
            print_level(&cfg.aggression, level);
            Ok(())
        }
    }
}

fn show() -> Result<()> {
    let cfg = load_config()?;
    println!("Config: {}", config_path()?.display());
    println!("timezone = {}\n", cfg.timezone);
    for level in AggressionLevel::ALL {
        print_level(&cfg.aggression, *level);
    }
    Ok(())
}

fn print_level(table: &AggressionTable, level: AggressionLevel) {
    let c = table.config_for(level);
    let marker = if table.is_overridden(level) { " (custom)" } else { "" };
    println!(
        "{level:<10} count={} first={}min overdue_every={}min overdue_count={}{marker}",
        c.notification_count, c.first_reminder_minutes, c.overdue_interval_minutes, c.overdue_count
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg, Config::default());
        assert!(cfg.tz().is_ok());
    }

    #[test]
    fn overrides_round_trip_through_toml() {
        let mut cfg = Config::default();
        cfg.aggression
            .set(AggressionLevel::Moderate, AggressionConfig::new(3, 600, 0, 0));
        let s = toml::to_string_pretty(&cfg).unwrap();
        assert!(s.contains("[aggression.moderate]"));
        assert!(!s.contains("nuclear"));

        let back: Config = toml::from_str(&s).unwrap();
        assert_eq!(
            back.aggression.config_for(AggressionLevel::Moderate),
            AggressionConfig::new(3, 600, 0, 0)
        );
        assert_eq!(
            back.aggression.config_for(AggressionLevel::Nuclear),
            AggressionConfig::NUCLEAR
        );
    }

    #[test]
    fn bad_timezone_is_reported() {
        let cfg = Config {
            timezone: "Mars/Olympus".to_string(),
            ..Config::default()
        };
        assert!(cfg.tz().is_err());
    }
}
