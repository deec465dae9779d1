//! Energy profile: observed productivity per (hour of day, weekday) slot.
//!
//! Each slot is an incremental mean accumulator, so recording a focus
//! interval is O(1) and never replays history. There are at most 24 x 7 slots.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{NagError, Result};
use crate::task::CognitiveLoad;
use crate::time::{clamp_unit, weekday_number};

/// Productivity assumed for a slot with no samples.
pub const DEFAULT_PRODUCTIVITY: f64 = 0.5;

const HIGH_ENERGY: f64 = 0.7;
const LOW_ENERGY: f64 = 0.4;

/// Hour of day (0-23) and weekday (1 = Sunday ... 7 = Saturday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EnergySlot {
    hour: u32,
    weekday: u32,
}

impl EnergySlot {
    pub fn new(hour: u32, weekday: u32) -> Result<Self> {
        if hour > 23 || !(1..=7).contains(&weekday) {
            return Err(NagError::InvalidSlot { hour, weekday });
        }
        Ok(Self { hour, weekday })
    }

    /// Slot containing `at`, in `at`'s own timezone.
    pub fn at<Z: TimeZone>(at: &DateTime<Z>) -> Self {
        Self {
            hour: at.hour(),
            weekday: weekday_number(at),
        }
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn weekday(&self) -> u32 {
        self.weekday
    }
}

/// Coarse classification of a productivity value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyBand {
    High,
    Normal,
    Low,
}

impl EnergyBand {
    pub fn classify(productivity: f64) -> Self {
        if productivity > HIGH_ENERGY {
            EnergyBand::High
        } else if productivity < LOW_ENERGY {
            EnergyBand::Low
        } else {
            EnergyBand::Normal
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlotStats {
    pub average_productivity: f64,
    pub sample_count: u64,
}

impl SlotStats {
    fn push(&mut self, sample: f64) {
        let n = self.sample_count as f64;
        self.average_productivity = (self.average_productivity * n + sample) / (n + 1.0);
        self.sample_count += 1;
    }
}

/// A finished (completed or cut short) focus interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusInterval {
    pub planned_minutes: u32,
    pub actual_minutes: u32,
    pub completed: bool,
}

impl FocusInterval {
    /// Productivity sample: 1.0 when run to completion, else actual / planned.
    ///
    /// `None` when the interval has nothing to measure.
    pub fn productivity_sample(&self) -> Option<f64> {
        if self.actual_minutes == 0 {
            return None;
        }
        if self.completed {
            return Some(1.0);
        }
        if self.planned_minutes == 0 {
            return None;
        }
        Some(clamp_unit(self.actual_minutes as f64 / self.planned_minutes as f64))
    }
}

/// Break length after a focus interval on a task of `load`.
pub fn break_minutes(load: Option<CognitiveLoad>) -> u32 {
    match load {
        Some(CognitiveLoad::Heavy | CognitiveLoad::Extreme) => 10,
        Some(CognitiveLoad::Moderate) => 7,
        _ => 5,
    }
}

/// Serialized shape of one slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotRecord {
    pub hour: u32,
    pub weekday: u32,
    pub average_productivity: f64,
    pub sample_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SlotRecord>", into = "Vec<SlotRecord>")]
pub struct EnergyProfile {
    slots: BTreeMap<EnergySlot, SlotStats>,
}

impl TryFrom<Vec<SlotRecord>> for EnergyProfile {
    type Error = NagError;

    fn try_from(records: Vec<SlotRecord>) -> Result<Self> {
        let mut slots = BTreeMap::new();
        for r in records {
            let slot = EnergySlot::new(r.hour, r.weekday)?;
            slots.insert(
                slot,
                SlotStats {
                    average_productivity: clamp_unit(r.average_productivity),
                    sample_count: r.sample_count,
                },
            );
        }
        Ok(Self { slots })
    }
}

impl From<EnergyProfile> for Vec<SlotRecord> {
    fn from(profile: EnergyProfile) -> Self {
        profile
            .slots
            .into_iter()
            .map(|(slot, stats)| SlotRecord {
                hour: slot.hour,
                weekday: slot.weekday,
                average_productivity: stats.average_productivity,
                sample_count: stats.sample_count,
            })
            .collect()
    }
}

impl EnergyProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn stats(&self, slot: EnergySlot) -> Option<&SlotStats> {
        self.slots.get(&slot)
    }

    /// Average productivity for `slot`, or 0.5 when never observed.
    pub fn productivity(&self, slot: EnergySlot) -> f64 {
        self.slots
            .get(&slot)
            .filter(|s| s.sample_count > 0)
            .map(|s| s.average_productivity)
            .unwrap_or(DEFAULT_PRODUCTIVITY)
    }

    /// Productivity for the slot containing `now` (local to `now`'s zone).
    pub fn productivity_at<Z: TimeZone>(&self, now: &DateTime<Z>) -> f64 {
        self.productivity(EnergySlot::at(now))
    }

    /// Fold one focus interval into `slot`. Returns the sample recorded, if any.
    pub fn record_interval(&mut self, slot: EnergySlot, interval: &FocusInterval) -> Option<f64> {
        let sample = interval.productivity_sample()?;
        let stats = self.slots.entry(slot).or_insert(SlotStats {
            average_productivity: DEFAULT_PRODUCTIVITY,
            sample_count: 0,
        });
        stats.push(sample);
        debug!(
            hour = slot.hour,
            weekday = slot.weekday,
            sample,
            average = stats.average_productivity,
            samples = stats.sample_count,
            "recorded focus interval"
        );
        Some(sample)
    }

    /// Hours of `weekday` whose observed productivity is at least `min`, ascending.
    pub fn peak_hours(&self, weekday: u32, min: f64) -> Vec<u32> {
        self.slots
            .iter()
            .filter(|(slot, stats)| {
                slot.weekday == weekday && stats.sample_count > 0 && stats.average_productivity >= min
            })
            .map(|(slot, _)| slot.hour)
            .collect()
    }
}
