//! Reminder schedule projection.
//!
//! A task's deadline plus an aggression config become a deterministic list of
//! notifications. Ids encode task, level and sequence index so a caller can
//! diff against what it installed earlier and cancel by id prefix.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::aggression::AggressionConfig;
use crate::task::{AggressionLevel, Task};
use crate::time::format_lead_minutes;

/// Position fraction above which a pre-deadline reminder is urgent.
const URGENT_FRACTION: f64 = 0.6;

/// Which notification category the delivery layer should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationChannel {
    MissionReminder,
    UrgentReminder,
}

impl NotificationChannel {
    pub fn for_urgency(is_urgent: bool) -> Self {
        if is_urgent {
            NotificationChannel::UrgentReminder
        } else {
            NotificationChannel::MissionReminder
        }
    }

    /// Category identifier registered with the platform notification center.
    pub fn identifier(&self) -> &'static str {
        match self {
            NotificationChannel::MissionReminder => "MISSION_REMINDER",
            NotificationChannel::UrgentReminder => "URGENT_REMINDER",
        }
    }
}

/// Tone band of a reminder, escalating with its position in the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderTone {
    Informational,
    Nudging,
    Insistent,
    Commanding,
    Overdue,
}

impl ReminderTone {
    /// Band for a pre-deadline reminder at `progress` (0 = first, 1 = last).
    ///
    /// gentle has one band, moderate three, aggressive and nuclear four.
    pub fn for_position(level: AggressionLevel, progress: f64) -> Self {
        match level {
            AggressionLevel::Gentle => ReminderTone::Informational,
            AggressionLevel::Moderate => {
                if progress < 0.5 {
                    ReminderTone::Informational
                } else if progress < 0.8 {
                    ReminderTone::Insistent
                } else {
                    ReminderTone::Commanding
                }
            }
            AggressionLevel::Aggressive | AggressionLevel::Nuclear => {
                if progress < 0.3 {
                    ReminderTone::Informational
                } else if progress < 0.6 {
                    ReminderTone::Nudging
                } else if progress < 0.85 {
                    ReminderTone::Insistent
                } else {
                    ReminderTone::Commanding
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledNotification {
    pub id: String,
    pub title: String,
    pub body: String,
    pub fire_at: DateTime<Utc>,
    pub is_urgent: bool,
    pub tone: ReminderTone,
    pub channel: NotificationChannel,
}

/// Id prefix shared by every reminder of `task_id`, for cancel-by-prefix.
///
/// Another task's id may extend this prefix (`a` vs `a-b`); use
/// [`is_reminder_of`] to tell them apart.
pub fn task_id_prefix(task_id: &str) -> String {
    format!("{task_id}-")
}

/// True when `id` is exactly `{task_id}-{level}-{n}` or
/// `{task_id}-{level}-overdue-{n}`.
pub fn is_reminder_of(task_id: &str, id: &str) -> bool {
    let Some(rest) = id.strip_prefix(&task_id_prefix(task_id)) else {
        return false;
    };
    let Some((level, index)) = rest.split_once('-') else {
        return false;
    };
    let index = index.strip_prefix("overdue-").unwrap_or(index);
    level.parse::<AggressionLevel>().is_ok() && !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit())
}

fn pre_deadline_id(task_id: &str, level: AggressionLevel, index: i64) -> String {
    format!("{task_id}-{level}-{index}")
}

fn overdue_id(task_id: &str, level: AggressionLevel, index: i64) -> String {
    format!("{task_id}-{level}-overdue-{index}")
}

/// Project a task into its reminder schedule.
///
/// Nothing is returned for tasks without a deadline or already closed.
/// Reminders whose fire time is at or before `now` are dropped.
pub fn schedule(task: &Task, config: AggressionConfig, now: DateTime<Utc>) -> Vec<ScheduledNotification> {
    let Some(deadline) = task.deadline else {
        return vec![];
    };
    if task.status.is_closed() {
        return vec![];
    }

    let config = config.normalized();
    let mut out = pre_deadline(task, deadline, config, now);

    if task.aggression == AggressionLevel::Nuclear && config.has_overdue_phase() {
        out.extend(post_deadline(task, deadline, config, now));
    }

    debug!(
        task_id = %task.id,
        aggression = %task.aggression,
        count = out.len(),
        "projected reminder schedule"
    );
    out
}

fn pre_deadline(
    task: &Task,
    deadline: DateTime<Utc>,
    config: AggressionConfig,
    now: DateTime<Utc>,
) -> Vec<ScheduledNotification> {
    let count = config.notification_count;
    let total_seconds = config.first_reminder_minutes.saturating_mul(60);
    let level = task.aggression;

    let mut out = Vec::new();
    for i in 0..count {
        // A lone reminder sits at the full lead time.
        let fraction = if count == 1 {
            0.0
        } else {
            i as f64 / (count - 1) as f64
        };
        // Round to whole seconds so fire times are stable across runs.
        let offset_secs = (total_seconds as f64 * (1.0 - fraction)).round() as i64;
        // Lead times beyond the calendar range land before `now` anyway.
        let fire_at = match Duration::try_seconds(offset_secs).and_then(|d| deadline.checked_sub_signed(d)) {
            Some(at) if at > now => at,
            _ => {
                trace!(task_id = %task.id, index = i, "reminder already past, skipping");
                continue;
            }
        };

        let tone = ReminderTone::for_position(level, fraction);
        let (title, body) = pre_deadline_text(level, tone, &task.title, offset_secs / 60);
        let is_urgent = fraction > URGENT_FRACTION;

        out.push(ScheduledNotification {
            id: pre_deadline_id(&task.id, level, i),
            title,
            body,
            fire_at,
            is_urgent,
            tone,
            channel: NotificationChannel::for_urgency(is_urgent),
        });
    }
    out
}

fn post_deadline(
    task: &Task,
    deadline: DateTime<Utc>,
    config: AggressionConfig,
    now: DateTime<Utc>,
) -> Vec<ScheduledNotification> {
    (1..=config.overdue_count)
        .filter_map(|i| {
            let minutes_overdue = i.checked_mul(config.overdue_interval_minutes)?;
            let fire_at = Duration::try_minutes(minutes_overdue)
                .and_then(|d| deadline.checked_add_signed(d))?;
            if fire_at <= now {
                return None;
            }
            Some(ScheduledNotification {
                id: overdue_id(&task.id, task.aggression, i),
                title: format!("OVERDUE: {}", task.title),
                body: overdue_body(&task.title, minutes_overdue),
                fire_at,
                is_urgent: true,
                tone: ReminderTone::Overdue,
                channel: NotificationChannel::UrgentReminder,
            })
        })
        .collect()
}

fn pre_deadline_text(
    level: AggressionLevel,
    tone: ReminderTone,
    title: &str,
    minutes_before: i64,
) -> (String, String) {
    let lead = format_lead_minutes(minutes_before);

    if level == AggressionLevel::Gentle {
        return (format!("Reminder: {title}"), format!("Due in {lead}. You've got this."));
    }

    match (level, tone) {
        (AggressionLevel::Moderate, ReminderTone::Informational) => {
            (format!("Heads up: {title}"), format!("'{title}' is due in {lead}."))
        }
        (AggressionLevel::Moderate, ReminderTone::Insistent) => {
            (format!("{lead} left"), format!("'{title}' needs your attention now."))
        }
        (AggressionLevel::Moderate, _) => (format!("{lead} left"), format!("'{title}': finish it now.")),
        (_, ReminderTone::Informational) => {
            (format!("{lead} out"), format!("'{title}': start now to stay ahead."))
        }
        (_, ReminderTone::Nudging) => {
            (format!("{lead} left"), format!("'{title}': you need to move on this."))
        }
        (_, ReminderTone::Insistent) => {
            (format!("{lead} left"), format!("'{title}': seriously, do it now."))
        }
        _ => (lead, format!("'{title}': you're about to miss this.")),
    }
}

fn overdue_body(title: &str, minutes_overdue: i64) -> String {
    if minutes_overdue < 30 {
        format!("'{title}' is overdue. Submit it NOW.")
    } else if minutes_overdue < 60 {
        format!("'{title}' is {minutes_overdue}min overdue. This is unacceptable.")
    } else {
        format!("'{title}' is {minutes_overdue}min overdue. Every minute counts. DO IT.")
    }
}

/// What to change on the device to move from `installed` to `fresh`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDiff {
    /// Installed ids that are no longer part of the fresh schedule.
    pub cancel: Vec<String>,
    /// Fresh notifications not yet installed.
    pub install: Vec<ScheduledNotification>,
}

impl ScheduleDiff {
    pub fn is_empty(&self) -> bool {
        self.cancel.is_empty() && self.install.is_empty()
    }
}

/// Diff previously installed ids for one task against a freshly projected schedule.
///
/// Only installed ids that are reminders of `task_id` are considered, so the
/// caller can pass every pending id on the device.
pub fn diff_schedule(task_id: &str, installed: &[String], fresh: &[ScheduledNotification]) -> ScheduleDiff {
    let fresh_ids: HashSet<&str> = fresh.iter().map(|n| n.id.as_str()).collect();
    let installed_ids: HashSet<&str> = installed
        .iter()
        .map(String::as_str)
        .filter(|id| is_reminder_of(task_id, id))
        .collect();

    let mut cancel: Vec<String> = installed_ids
        .iter()
        .filter(|id| !fresh_ids.contains(*id))
        .map(|id| id.to_string())
        .collect();
    cancel.sort();

    let install = fresh
        .iter()
        .filter(|n| !installed_ids.contains(n.id.as_str()))
        .cloned()
        .collect();

    ScheduleDiff { cancel, install }
}
