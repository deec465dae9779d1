//! Aggression level configuration: per-level reminder tuning plus the
//! default table and user overrides.

use serde::{Deserialize, Serialize};

use crate::task::AggressionLevel;

/// Reminder tuning for one aggression level.
///
/// Only `nuclear` uses the overdue fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggressionConfig {
    pub notification_count: i64,
    pub first_reminder_minutes: i64,
    #[serde(default)]
    pub overdue_interval_minutes: i64,
    #[serde(default)]
    pub overdue_count: i64,
}

impl AggressionConfig {
    pub const GENTLE: Self = Self::new(1, 1440, 0, 0);
    pub const MODERATE: Self = Self::new(5, 2880, 0, 0);
    pub const AGGRESSIVE: Self = Self::new(8, 4320, 0, 0);
    pub const NUCLEAR: Self = Self::new(8, 4320, 15, 8);

    pub const fn new(
        notification_count: i64,
        first_reminder_minutes: i64,
        overdue_interval_minutes: i64,
        overdue_count: i64,
    ) -> Self {
        Self {
            notification_count,
            first_reminder_minutes,
            overdue_interval_minutes,
            overdue_count,
        }
    }

    pub fn default_for(level: AggressionLevel) -> Self {
        match level {
            AggressionLevel::Gentle => Self::GENTLE,
            AggressionLevel::Moderate => Self::MODERATE,
            AggressionLevel::Aggressive => Self::AGGRESSIVE,
            AggressionLevel::Nuclear => Self::NUCLEAR,
        }
    }

    /// Degenerate values are normalized, not rejected: a count of zero
    /// becomes one, negative minutes and counts become zero.
    pub fn normalized(self) -> Self {
        Self {
            notification_count: self.notification_count.max(1),
            first_reminder_minutes: self.first_reminder_minutes.max(0),
            overdue_interval_minutes: self.overdue_interval_minutes.max(0),
            overdue_count: self.overdue_count.max(0),
        }
    }

    /// Whether the post-deadline phase has anything to emit.
    pub fn has_overdue_phase(&self) -> bool {
        self.overdue_count > 0 && self.overdue_interval_minutes > 0
    }
}

/// Defaults plus per-level user overrides.
///
/// Serializes as one optional table per level, so a config file only lists
/// the levels the user changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggressionTable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gentle: Option<AggressionConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    moderate: Option<AggressionConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    aggressive: Option<AggressionConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nuclear: Option<AggressionConfig>,
}

impl AggressionTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, level: AggressionLevel) -> &Option<AggressionConfig> {
        match level {
            AggressionLevel::Gentle => &self.gentle,
            AggressionLevel::Moderate => &self.moderate,
            AggressionLevel::Aggressive => &self.aggressive,
            AggressionLevel::Nuclear => &self.nuclear,
        }
    }

    fn slot_mut(&mut self, level: AggressionLevel) -> &mut Option<AggressionConfig> {
        match level {
            AggressionLevel::Gentle => &mut self.gentle,
            AggressionLevel::Moderate => &mut self.moderate,
            AggressionLevel::Aggressive => &mut self.aggressive,
            AggressionLevel::Nuclear => &mut self.nuclear,
        }
    }

    /// Effective config for `level`: the override when present, else the default.
    /// Overrides loaded from a file are normalized on read.
    pub fn config_for(&self, level: AggressionLevel) -> AggressionConfig {
        self.slot(level)
            .map(AggressionConfig::normalized)
            .unwrap_or_else(|| AggressionConfig::default_for(level))
    }

    pub fn set(&mut self, level: AggressionLevel, config: AggressionConfig) {
        *self.slot_mut(level) = Some(config.normalized());
    }

    /// Drop the override so `level` falls back to its default.
    pub fn reset(&mut self, level: AggressionLevel) -> Option<AggressionConfig> {
        self.slot_mut(level).take()
    }

    pub fn is_overridden(&self, level: AggressionLevel) -> bool {
        self.slot(level).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_matches_levels() {
        let table = AggressionTable::new();
        assert_eq!(table.config_for(AggressionLevel::Gentle), AggressionConfig::new(1, 1440, 0, 0));
        assert_eq!(table.config_for(AggressionLevel::Moderate), AggressionConfig::new(5, 2880, 0, 0));
        assert_eq!(table.config_for(AggressionLevel::Aggressive), AggressionConfig::new(8, 4320, 0, 0));
        assert_eq!(table.config_for(AggressionLevel::Nuclear), AggressionConfig::new(8, 4320, 15, 8));
        assert!(AggressionConfig::NUCLEAR.has_overdue_phase());
        assert!(!AggressionConfig::AGGRESSIVE.has_overdue_phase());
    }

    #[test]
    fn override_and_reset() {
        let mut table = AggressionTable::new();
        table.set(AggressionLevel::Gentle, AggressionConfig::new(0, 60, 0, 0));
        assert!(table.is_overridden(AggressionLevel::Gentle));
        assert_eq!(table.config_for(AggressionLevel::Gentle).notification_count, 1);
        assert_eq!(table.config_for(AggressionLevel::Gentle).first_reminder_minutes, 60);

        table.reset(AggressionLevel::Gentle);
        assert_eq!(table.config_for(AggressionLevel::Gentle), AggressionConfig::GENTLE);
    }

    #[test]
    fn normalized_clamps_negatives() {
        let cfg = AggressionConfig::new(-3, -10, -1, -2).normalized();
        assert_eq!(cfg, AggressionConfig::new(1, 0, 0, 0));
    }

    #[test]
    fn table_serializes_only_overrides() {
        let mut table = AggressionTable::new();
        table.set(AggressionLevel::Nuclear, AggressionConfig::new(4, 600, 10, 3));
        let json = serde_json::to_string(&table).unwrap();
        assert!(json.contains("\"nuclear\""));
        assert!(!json.contains("\"gentle\""));
        let back: AggressionTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }
}
