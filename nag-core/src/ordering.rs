//! Energy-aware task ordering.
//!
//! Overdue work always leads. Within that split, the current slot's observed
//! productivity decides whether demanding or light tasks come first, then the
//! soonest deadline wins and the id settles anything left.

use std::cmp::Ordering;

use chrono::{DateTime, TimeZone, Utc};

use crate::energy::{EnergyBand, EnergyProfile};
use crate::task::{CognitiveLoad, Task};
use crate::time::end_of_local_day;

/// Total order over `a` and `b` for a given energy band.
pub fn compare_tasks(a: &Task, b: &Task, band: EnergyBand, now: DateTime<Utc>) -> Ordering {
    // Overdue first.
    b.is_overdue(now)
        .cmp(&a.is_overdue(now))
        .then_with(|| {
            let wa = CognitiveLoad::weight(a.cognitive_load);
            let wb = CognitiveLoad::weight(b.cognitive_load);
            match band {
                EnergyBand::High => wb.cmp(&wa),
                EnergyBand::Low => wa.cmp(&wb),
                EnergyBand::Normal => Ordering::Equal,
            }
        })
        .then_with(|| match (a.deadline, b.deadline) {
            (Some(da), Some(db)) => da.cmp(&db),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.id.cmp(&b.id))
}

/// Order tasks for the slot containing `now` (hour and weekday taken from
/// `now`'s own timezone).
pub fn order_tasks<Z: TimeZone>(tasks: &[Task], profile: &EnergyProfile, now: &DateTime<Z>) -> Vec<Task> {
    let band = EnergyBand::classify(profile.productivity_at(now));
    let now_utc = now.with_timezone(&Utc);

    let mut ordered = tasks.to_vec();
    ordered.sort_by(|a, b| compare_tasks(a, b, band, now_utc));
    ordered
}

/// Open tasks due before the end of `now`'s local day, overdue included,
/// soonest deadline first.
pub fn todays_tasks<Z: TimeZone>(tasks: &[Task], now: &DateTime<Z>) -> Vec<Task> {
    let end_of_day = end_of_local_day(now);

    let mut today: Vec<Task> = tasks
        .iter()
        .filter(|t| !t.status.is_closed())
        .filter(|t| t.deadline.is_some_and(|d| d <= end_of_day))
        .cloned()
        .collect();
    today.sort_by(|a, b| a.deadline.cmp(&b.deadline).then_with(|| a.id.cmp(&b.id)));
    today
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::energy::{EnergySlot, FocusInterval};
    use crate::task::TaskStatus;
    use chrono::Duration;

    // 2026-03-03 14:00 UTC is a Tuesday (weekday 3).
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 3, 14, 0, 0).unwrap()
    }

    fn profile_with(productivity_minutes: u32) -> EnergyProfile {
        let mut profile = EnergyProfile::new();
        profile.record_interval(
            EnergySlot::new(14, 3).unwrap(),
            &FocusInterval {
                planned_minutes: 100,
                actual_minutes: productivity_minutes,
                completed: false,
            },
        );
        profile
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    fn sample_tasks() -> Vec<Task> {
        let later = now() + Duration::days(2);
        vec![
            Task::new("light", "inbox").with_cognitive(CognitiveLoad::Light).with_deadline(later),
            Task::new("unset", "misc").with_deadline(later),
            Task::new("extreme", "thesis").with_cognitive(CognitiveLoad::Extreme).with_deadline(later),
            Task::new("heavy", "proof").with_cognitive(CognitiveLoad::Heavy).with_deadline(later),
            Task::new("late", "overdue form")
                .with_cognitive(CognitiveLoad::Light)
                .with_deadline(now() - Duration::hours(2)),
        ]
    }

    #[test]
    fn high_energy_puts_heavy_first_after_overdue() {
        let ordered = order_tasks(&sample_tasks(), &profile_with(90), &now());
        assert_eq!(ids(&ordered), vec!["late", "extreme", "heavy", "light", "unset"]);
    }

    #[test]
    fn low_energy_puts_light_first_after_overdue() {
        let ordered = order_tasks(&sample_tasks(), &profile_with(20), &now());
        assert_eq!(ids(&ordered), vec!["late", "unset", "light", "heavy", "extreme"]);
    }

    #[test]
    fn normal_energy_falls_back_to_deadline_then_id() {
        let mut tasks = sample_tasks();
        tasks[0].deadline = Some(now() + Duration::hours(3));
        tasks[1].deadline = None;
        // Unseen slot -> 0.5 -> normal band.
        let ordered = order_tasks(&tasks, &EnergyProfile::new(), &now());
        assert_eq!(ids(&ordered), vec!["late", "light", "extreme", "heavy", "unset"]);
    }

    #[test]
    fn ordering_is_deterministic_regardless_of_input_order() {
        let profile = profile_with(90);
        let mut reversed = sample_tasks();
        reversed.reverse();
        assert_eq!(
            order_tasks(&sample_tasks(), &profile, &now()),
            order_tasks(&reversed, &profile, &now())
        );
    }

    #[test]
    fn todays_tasks_includes_overdue_and_skips_closed() {
        let tasks = vec![
            Task::new("tomorrow", "x").with_deadline(now() + Duration::days(1)),
            Task::new("tonight", "x").with_deadline(now() + Duration::hours(5)),
            Task::new("late", "x").with_deadline(now() - Duration::days(1)),
            Task::new("done", "x")
                .with_deadline(now() + Duration::hours(1))
                .with_status(TaskStatus::Completed),
            Task::new("open", "no deadline"),
        ];
        assert_eq!(ids(&todays_tasks(&tasks, &now())), vec!["late", "tonight"]);
    }
}
