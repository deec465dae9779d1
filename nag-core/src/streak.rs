//! Day-over-day completion streaks with a decaying momentum score.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::task::{TaskCategory, string_enum};
use crate::time::{clamp_unit, days_between, is_day_after};

/// Weight kept from the previous momentum on each update.
const MOMENTUM_DECAY: f64 = 0.7;
/// Streak length at which the momentum target saturates.
const MOMENTUM_CAP_DAYS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakCategory {
    School,
    Work,
    Personal,
    Overall,
}

string_enum!(StreakCategory, "streak category", {
    School => "school",
    Work => "work",
    Personal => "personal",
    Overall => "overall",
});

impl From<TaskCategory> for StreakCategory {
    fn from(category: TaskCategory) -> Self {
        match category {
            TaskCategory::School => StreakCategory::School,
            TaskCategory::Work => StreakCategory::Work,
            TaskCategory::Personal => StreakCategory::Personal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Streak {
    pub category: StreakCategory,
    pub current_count: u32,
    pub longest_count: u32,
    /// `None` until the first recorded activity.
    #[serde(default)]
    pub last_active_date: Option<NaiveDate>,
    pub momentum_score: f64,
}

impl Streak {
    pub fn new(category: StreakCategory) -> Self {
        Self {
            category,
            current_count: 0,
            longest_count: 0,
            last_active_date: None,
            momentum_score: 0.0,
        }
    }

    /// Still unbroken as of `today`: active today or yesterday.
    pub fn is_alive(&self, today: NaiveDate) -> bool {
        self.last_active_date
            .is_some_and(|last| matches!(days_between(last, today), 0 | 1))
    }
}

/// Apply one day's activity to `streak`. Repeat calls on the same day are no-ops.
pub fn record_activity(streak: &Streak, today: NaiveDate) -> Streak {
    if streak.last_active_date == Some(today) {
        return streak.clone();
    }

    let extends = streak.last_active_date.is_some_and(|last| is_day_after(last, today));
    let mut next = streak.clone();
    next.current_count = if extends {
        streak.current_count.saturating_add(1)
    } else {
        1
    };
    next.longest_count = next.longest_count.max(next.current_count);
    next.last_active_date = Some(today);

    let target = next.current_count.min(MOMENTUM_CAP_DAYS) as f64 / MOMENTUM_CAP_DAYS as f64;
    next.momentum_score =
        clamp_unit(clamp_unit(streak.momentum_score) * MOMENTUM_DECAY + target * (1.0 - MOMENTUM_DECAY));

    debug!(
        category = %next.category,
        current = next.current_count,
        longest = next.longest_count,
        momentum = next.momentum_score,
        "streak advanced"
    );
    next
}

/// One streak per category plus the overall streak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakBook {
    pub school: Streak,
    pub work: Streak,
    pub personal: Streak,
    pub overall: Streak,
}

impl Default for StreakBook {
    fn default() -> Self {
        Self {
            school: Streak::new(StreakCategory::School),
            work: Streak::new(StreakCategory::Work),
            personal: Streak::new(StreakCategory::Personal),
            overall: Streak::new(StreakCategory::Overall),
        }
    }
}

impl StreakBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: StreakCategory) -> &Streak {
        match category {
            StreakCategory::School => &self.school,
            StreakCategory::Work => &self.work,
            StreakCategory::Personal => &self.personal,
            StreakCategory::Overall => &self.overall,
        }
    }

    fn get_mut(&mut self, category: StreakCategory) -> &mut Streak {
        match category {
            StreakCategory::School => &mut self.school,
            StreakCategory::Work => &mut self.work,
            StreakCategory::Personal => &mut self.personal,
            StreakCategory::Overall => &mut self.overall,
        }
    }

    /// A completed task advances its category streak and the overall one.
    pub fn record_completion(&self, category: TaskCategory, today: NaiveDate) -> StreakBook {
        let mut next = self.clone();
        for key in [StreakCategory::from(category), StreakCategory::Overall] {
            let updated = record_activity(next.get(key), today);
            *next.get_mut(key) = updated;
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn first_activity_starts_at_one() {
        let s = record_activity(&Streak::new(StreakCategory::Work), day(1));
        assert_eq!(s.current_count, 1);
        assert_eq!(s.longest_count, 1);
        assert_eq!(s.last_active_date, Some(day(1)));
        assert!((s.momentum_score - 0.03).abs() < 1e-9);
    }

    #[test]
    fn same_day_is_noop() {
        let once = record_activity(&Streak::new(StreakCategory::Work), day(1));
        let twice = record_activity(&once, day(1));
        assert_eq!(once, twice);
    }

    #[test]
    fn consecutive_days_extend_and_gaps_reset() {
        let mut s = Streak::new(StreakCategory::School);
        s = record_activity(&s, day(1));
        s = record_activity(&s, day(2));
        assert_eq!(s.current_count, 2);

        // One missed day (3rd) breaks the chain.
        s = record_activity(&s, day(4));
        assert_eq!(s.current_count, 1);
        assert_eq!(s.longest_count, 2);

        s = record_activity(&s, day(5));
        assert_eq!(s.current_count, 2);

        // Two missed days.
        s = record_activity(&s, day(8));
        assert_eq!(s.current_count, 1);
    }

    #[test]
    fn momentum_rises_gradually_and_saturates() {
        let mut s = Streak::new(StreakCategory::Overall);
        let mut last = 0.0;
        for d in 1..=28 {
            s = record_activity(&s, day(d));
            assert!(s.momentum_score >= last);
            assert!(s.momentum_score <= 1.0);
            last = s.momentum_score;
        }
        assert_eq!(s.current_count, 28);
        assert!(s.momentum_score > 0.9);
    }

    #[test]
    fn momentum_decays_after_reset() {
        let mut s = Streak::new(StreakCategory::Overall);
        for d in 1..=10 {
            s = record_activity(&s, day(d));
        }
        let before = s.momentum_score;
        s = record_activity(&s, day(20));
        assert_eq!(s.current_count, 1);
        assert!(s.momentum_score < before);
        assert!((s.momentum_score - (before * 0.7 + 0.03)).abs() < 1e-9);
    }

    #[test]
    fn completion_updates_category_and_overall() {
        let book = StreakBook::new().record_completion(TaskCategory::Work, day(1));
        assert_eq!(book.work.current_count, 1);
        assert_eq!(book.overall.current_count, 1);
        assert_eq!(book.school.current_count, 0);

        let book = book.record_completion(TaskCategory::School, day(1));
        assert_eq!(book.school.current_count, 1);
        // Overall already counted today.
        assert_eq!(book.overall.current_count, 1);
    }

    #[test]
    fn alive_only_through_yesterday() {
        let s = record_activity(&Streak::new(StreakCategory::Work), day(1));
        assert!(s.is_alive(day(1)));
        assert!(s.is_alive(day(2)));
        assert!(!s.is_alive(day(3)));
        assert!(!Streak::new(StreakCategory::Work).is_alive(day(1)));
    }

    #[test]
    fn category_parse() {
        assert_eq!("overall".parse::<StreakCategory>().unwrap(), StreakCategory::Overall);
        assert!("hobby".parse::<StreakCategory>().is_err());
    }
}
