//! Urgency scoring: a single 0-100 number per task.
//!
//! The score is additive (deadline + priority + aggression + progress bonus)
//! and clamped once on the grand total.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::{AggressionLevel, Priority, Task};
use crate::time::{clamp_score, hours_since};

const NO_DEADLINE_POINTS: f64 = 5.0;
const OVERDUE_POINTS: f64 = 50.0;
const OVERDUE_FLOOR: f64 = 45.0;

/// Per-component contributions to an urgency score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UrgencyBreakdown {
    pub deadline: f64,
    pub priority: f64,
    pub aggression: f64,
    pub progress_bonus: f64,
}

impl UrgencyBreakdown {
    pub fn for_task(task: &Task, now: DateTime<Utc>) -> Self {
        Self {
            deadline: deadline_points(task, now),
            priority: priority_points(task.priority),
            aggression: aggression_points(task.aggression),
            progress_bonus: progress_bonus(task.step_ratio()),
        }
    }

    /// Sum of the components clamped to [0, 100].
    pub fn total(&self) -> f64 {
        clamp_score(self.deadline + self.priority + self.aggression + self.progress_bonus)
    }
}

/// Urgency of `task` at `now`, in [0, 100].
pub fn urgency_score(task: &Task, now: DateTime<Utc>) -> f64 {
    UrgencyBreakdown::for_task(task, now).total()
}

fn deadline_points(task: &Task, now: DateTime<Utc>) -> f64 {
    let Some(deadline) = task.deadline else {
        return NO_DEADLINE_POINTS;
    };

    if task.is_overdue(now) {
        // Nominally grows with time overdue, but the cap at 50 wins for any
        // positive overdue span; the floor keeps overdue dominant.
        let hours_overdue = hours_since(deadline, now);
        let points = (OVERDUE_POINTS + hours_overdue / 24.0 * 2.0).min(OVERDUE_POINTS);
        return points.max(OVERDUE_FLOOR);
    }

    let hours_left = -hours_since(deadline, now);
    match hours_left {
        h if h < 6.0 => 42.0,
        h if h < 24.0 => 35.0,
        h if h < 48.0 => 28.0,
        h if h < 24.0 * 7.0 => 18.0,
        _ => 8.0,
    }
}

fn priority_points(priority: Priority) -> f64 {
    match priority {
        Priority::Critical => 20.0,
        Priority::High => 14.0,
        Priority::Medium => 8.0,
        Priority::Low => 3.0,
    }
}

fn aggression_points(level: AggressionLevel) -> f64 {
    match level {
        AggressionLevel::Nuclear => 15.0,
        AggressionLevel::Aggressive => 10.0,
        AggressionLevel::Moderate => 5.0,
        AggressionLevel::Gentle => 0.0,
    }
}

fn progress_bonus(ratio: Option<f64>) -> f64 {
    match ratio {
        Some(r) if r > 0.7 => 10.0,
        Some(r) if r > 0.4 => 5.0,
        Some(r) if r > 0.0 => 2.0,
        _ => 0.0,
    }
}

/// A task paired with its urgency score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTask {
    pub task: Task,
    pub score: f64,
}

/// Score every task and sort by descending urgency, ties by ascending id.
pub fn rank_by_urgency(tasks: &[Task], now: DateTime<Utc>) -> Vec<ScoredTask> {
    let mut scored: Vec<ScoredTask> = tasks
        .iter()
        .map(|t| ScoredTask {
            score: urgency_score(t, now),
            task: t.clone(),
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.task.id.cmp(&b.task.id))
    });
    scored
}
