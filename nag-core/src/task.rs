//! Task snapshot consumed by the decision core.
//!
//! The storage layer owns the real record; the core only ever sees this
//! read-only copy plus an explicit `now`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time::clamp_unit;

/// Implements `as_str`, `Display` and `FromStr` for a snake_case enum.
///
/// Unknown strings are a configuration error, never silently defaulted.
macro_rules! string_enum {
    ($ty:ident, $kind:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl ::std::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl ::std::str::FromStr for $ty {
            type Err = $crate::error::NagError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($name => Ok($ty::$variant),)+
                    other => Err($crate::error::NagError::unknown($kind, other)),
                }
            }
        }
    };
}

pub(crate) use string_enum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Abandoned,
}

string_enum!(TaskStatus, "task status", {
    Pending => "pending",
    InProgress => "in_progress",
    Completed => "completed",
    Abandoned => "abandoned",
});

impl TaskStatus {
    /// Completed and abandoned tasks need no further attention.
    pub fn is_closed(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Abandoned)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

string_enum!(Priority, "priority", {
    Low => "low",
    Medium => "medium",
    High => "high",
    Critical => "critical",
});

/// Reminder intensity chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggressionLevel {
    Gentle,
    Moderate,
    Aggressive,
    Nuclear,
}

string_enum!(AggressionLevel, "aggression level", {
    Gentle => "gentle",
    Moderate => "moderate",
    Aggressive => "aggressive",
    Nuclear => "nuclear",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    School,
    Work,
    Personal,
}

string_enum!(TaskCategory, "task category", {
    School => "school",
    Work => "work",
    Personal => "personal",
});

/// How mentally demanding a task is. Ordered light < extreme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CognitiveLoad {
    Light,
    Moderate,
    Heavy,
    Extreme,
}

string_enum!(CognitiveLoad, "cognitive load", {
    Light => "light",
    Moderate => "moderate",
    Heavy => "heavy",
    Extreme => "extreme",
});

impl CognitiveLoad {
    /// Sort weight; an unset load weighs 0.
    pub fn weight(load: Option<CognitiveLoad>) -> u8 {
        match load {
            None => 0,
            Some(CognitiveLoad::Light) => 1,
            Some(CognitiveLoad::Moderate) => 2,
            Some(CognitiveLoad::Heavy) => 3,
            Some(CognitiveLoad::Extreme) => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,

    #[serde(default = "default_status")]
    pub status: TaskStatus,
    pub priority: Priority,
    pub aggression: AggressionLevel,
    pub category: TaskCategory,

    #[serde(default)]
    pub cognitive_load: Option<CognitiveLoad>,

    /// Optional hard deadline (UTC).
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,

    /// Checklist completion ratio. `None` when the task has no steps.
    #[serde(default)]
    pub step_progress: Option<f64>,
}

fn default_status() -> TaskStatus {
    TaskStatus::Pending
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status: TaskStatus::Pending,
            priority: Priority::Medium,
            aggression: AggressionLevel::Moderate,
            category: TaskCategory::School,
            cognitive_load: None,
            deadline: None,
            step_progress: None,
        }
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_aggression(mut self, aggression: AggressionLevel) -> Self {
        self.aggression = aggression;
        self
    }

    pub fn with_category(mut self, category: TaskCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_cognitive(mut self, load: CognitiveLoad) -> Self {
        self.cognitive_load = Some(load);
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Derive step progress from a checklist. An empty checklist means "no steps".
    pub fn with_steps(mut self, completed: usize, total: usize) -> Self {
        self.step_progress = if total == 0 {
            None
        } else {
            Some(completed as f64 / total as f64)
        };
        self
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        match self.deadline {
            Some(deadline) => deadline < now && self.status != TaskStatus::Completed,
            None => false,
        }
    }

    /// Step progress clamped to [0, 1], `None` without steps.
    pub fn step_ratio(&self) -> Option<f64> {
        self.step_progress.map(clamp_unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NagError;
    use chrono::{Duration, TimeZone};

    #[test]
    fn overdue_requires_deadline_in_past_and_not_completed() {
        let now = Utc.with_ymd_and_hms(2026, 2, 21, 8, 0, 0).unwrap();
        let past = Task::new("t1", "essay").with_deadline(now - Duration::hours(1));
        assert!(past.is_overdue(now));
        assert!(!past.clone().with_status(TaskStatus::Completed).is_overdue(now));
        assert!(past.clone().with_status(TaskStatus::Abandoned).is_overdue(now));
        assert!(!Task::new("t2", "no deadline").is_overdue(now));
        assert!(!Task::new("t3", "future").with_deadline(now + Duration::hours(1)).is_overdue(now));
    }

    #[test]
    fn unknown_enum_values_are_errors() {
        assert_eq!("Nuclear".parse::<AggressionLevel>().unwrap(), AggressionLevel::Nuclear);
        let err = "apocalyptic".parse::<AggressionLevel>().unwrap_err();
        assert_eq!(
            err,
            NagError::UnknownVariant {
                kind: "aggression level",
                value: "apocalyptic".to_string()
            }
        );
        assert!("brutal".parse::<CognitiveLoad>().is_err());
    }

    #[test]
    fn deserialize_rejects_unknown_level() {
        let json = r#"{"id":"a","title":"x","priority":"high","aggression":"ludicrous","category":"work"}"#;
        assert!(serde_json::from_str::<Task>(json).is_err());
    }

    #[test]
    fn deserialize_fills_defaults() {
        let json = r#"{"id":"a","title":"x","priority":"high","aggression":"gentle","category":"work"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.deadline.is_none());
        assert!(task.step_progress.is_none());
    }

    #[test]
    fn step_ratio_is_clamped() {
        let mut t = Task::new("t", "steps");
        t.step_progress = Some(1.0000002);
        assert_eq!(t.step_ratio(), Some(1.0));
        assert_eq!(Task::new("t", "x").with_steps(0, 0).step_ratio(), None);
        assert_eq!(Task::new("t", "x").with_steps(1, 4).step_ratio(), Some(0.25));
    }

    #[test]
    fn display_honours_width() {
        assert_eq!(format!("{:<10}|", AggressionLevel::Gentle), "gentle    |");
        assert_eq!(format!("{:>8}", Priority::High), "    high");
        assert_eq!(AggressionLevel::Nuclear.to_string(), "nuclear");
    }

    #[test]
    fn cognitive_weight_puts_unset_last() {
        assert!(CognitiveLoad::weight(None) < CognitiveLoad::weight(Some(CognitiveLoad::Light)));
        assert!(CognitiveLoad::Extreme > CognitiveLoad::Heavy);
    }
}
