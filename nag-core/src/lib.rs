//! nag-core: deterministic decision core for the nag deadline enforcer.
//!
//! Everything here is a pure function of its inputs and an explicit `now`.
//! Persistence, notification delivery and UI live in the callers.

pub mod aggression;
pub mod energy;
pub mod error;
pub mod ordering;
pub mod pressure;
pub mod reminders;
pub mod streak;
pub mod task;
pub mod time;
pub mod urgency;

pub use aggression::{AggressionConfig, AggressionTable};
pub use energy::{EnergyBand, EnergyProfile, EnergySlot, FocusInterval, SlotStats, break_minutes};
pub use error::{NagError, Result};
pub use ordering::{compare_tasks, order_tasks, todays_tasks};
pub use pressure::{PressureRow, PressureSummary, pressure_map};
pub use reminders::{
    NotificationChannel, ReminderTone, ScheduleDiff, ScheduledNotification, diff_schedule,
    is_reminder_of, schedule, task_id_prefix,
};
pub use streak::{Streak, StreakBook, StreakCategory, record_activity};
pub use task::{AggressionLevel, CognitiveLoad, Priority, Task, TaskCategory, TaskStatus};
pub use urgency::{ScoredTask, UrgencyBreakdown, rank_by_urgency, urgency_score};
