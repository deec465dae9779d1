use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use nag_core::time::{CountdownTone, format_countdown};
use nag_core::{
    EnergyProfile, PressureSummary, Task, UrgencyBreakdown, break_minutes, diff_schedule, order_tasks,
    pressure_map, rank_by_urgency, schedule, todays_tasks,
};
use std::path::Path;

use crate::config::Config;
use crate::state::{read_json, read_json_or_default};

/// Parse `--now`, falling back to the wall clock.
pub fn resolve_now(now: Option<&str>) -> Result<DateTime<Utc>> {
    match now {
        Some(s) => Ok(DateTime::parse_from_rfc3339(s)
            .with_context(|| format!("invalid --now '{s}' (expected RFC3339)"))?
            .with_timezone(&Utc)),
        None => Ok(Utc::now()),
    }
}

fn load_tasks(path: &Path) -> Result<Vec<Task>> {
    let tasks: Vec<Task> = read_json(path)?;
    tracing::info!(count = tasks.len(), path = %path.display(), "loaded tasks");
    Ok(tasks)
}

fn countdown(task: &Task, now: DateTime<Utc>) -> String {
    task.deadline
        .map(|d| format_countdown(d, now))
        .unwrap_or_else(|| "-".to_string())
}

pub fn score(tasks: &Path, now: DateTime<Utc>) -> Result<()> {
    let tasks = load_tasks(tasks)?;
    for scored in rank_by_urgency(&tasks, now) {
        let b = UrgencyBreakdown::for_task(&scored.task, now);
        println!(
            "{:>5.1}  {:<12} {:<10} deadline={:.0} priority={:.0} aggression={:.0} progress={:.0}  {}",
            scored.score,
            scored.task.id,
            countdown(&scored.task, now),
            b.deadline,
            b.priority,
            b.aggression,
            b.progress_bonus,
            scored.task.title
        );
    }
    Ok(())
}

pub fn schedule_cmd(cfg: &Config, tasks: &Path, installed: Option<&Path>, now: DateTime<Utc>) -> Result<()> {
    let tasks = load_tasks(tasks)?;
    let installed: Option<Vec<String>> = installed.map(read_json::<Vec<String>>).transpose()?;

    for task in &tasks {
        let fresh = schedule(task, cfg.aggression.config_for(task.aggression), now);

        if let Some(installed) = &installed {
            let diff = diff_schedule(&task.id, installed, &fresh);
            if diff.is_empty() {
                continue;
            }
            println!("## {} ({})", task.title, task.id);
            for id in &diff.cancel {
                println!("  cancel  {id}");
            }
            for n in &diff.install {
                println!("  install {}  {}  {}", n.id, n.fire_at.to_rfc3339(), n.title);
            }
            continue;
        }

        if fresh.is_empty() {
            continue;
        }
        println!("## {} ({}, {})", task.title, task.id, task.aggression);
        for n in &fresh {
            println!(
                "  {}  [{}] {}: {}",
                n.fire_at.to_rfc3339(),
                n.channel.identifier(),
                n.title,
                n.body
            );
        }
    }
    Ok(())
}

pub fn order(tz: Tz, tasks: &Path, profile: Option<&Path>, now: DateTime<Utc>) -> Result<()> {
    let tasks = load_tasks(tasks)?;
    let profile: EnergyProfile = match profile {
        Some(p) => read_json_or_default(p)?,
        None => EnergyProfile::new(),
    };
    let local_now = now.with_timezone(&tz);

    println!(
        "Energy now: {:.2} ({} {})",
        profile.productivity_at(&local_now),
        local_now.format("%a"),
        local_now.format("%H:00")
    );
    let ordered = order_tasks(&tasks, &profile, &local_now);
    for (i, task) in ordered.iter().enumerate() {
        let load = task.cognitive_load.map(|c| c.as_str()).unwrap_or("-");
        println!(
            "{:>2}. {:<12} {:<9} {:<10} {}",
            i + 1,
            task.id,
            load,
            countdown(task, now),
            task.title
        );
    }
    if let Some(first) = ordered.first() {
        println!("\nBreak after the first block: {} min", break_minutes(first.cognitive_load));
    }
    Ok(())
}

pub fn today(tz: Tz, tasks: &Path, now: DateTime<Utc>) -> Result<()> {
    let tasks = load_tasks(tasks)?;
    let local_now = now.with_timezone(&tz);
    let due = todays_tasks(&tasks, &local_now);

    println!("# Today ({})", local_now.format("%Y-%m-%d"));
    if due.is_empty() {
        println!("Nothing due today.");
        return Ok(());
    }
    for task in &due {
        let marker = match task.deadline.map(|d| CountdownTone::for_remaining(d - now)) {
            Some(CountdownTone::Overdue) => "!!",
            Some(CountdownTone::Critical) => "! ",
            _ => "  ",
        };
        println!("{marker} {:<10} {:<12} {}", countdown(task, now), task.id, task.title);
    }
    Ok(())
}

pub fn pressure(tz: Tz, tasks: &Path, now: DateTime<Utc>) -> Result<()> {
    let tasks = load_tasks(tasks)?;
    let summary = PressureSummary::from_tasks(&tasks, now);
    println!(
        "overdue={} due_soon={} active={}",
        summary.overdue, summary.due_soon, summary.active
    );

    let local_now = now.with_timezone(&tz);
    for row in pressure_map(&tasks, &local_now) {
        let cells: Vec<String> = row.cells.iter().map(|p| format!("{p:.1}")).collect();
        println!("{:<9} {}", row.category.as_str(), cells.join(" "));
    }
    Ok(())
}
