//! Dashboard pressure: headline counters and the 7-day category heat map.

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::task::{AggressionLevel, Task, TaskCategory};
use crate::time::clamp_unit;

pub const PRESSURE_DAYS: usize = 7;

/// Window for "due soon".
const DUE_SOON_HOURS: i64 = 48;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PressureSummary {
    pub overdue: usize,
    /// Not yet due, but due within the next 48 hours.
    pub due_soon: usize,
    pub active: usize,
}

impl PressureSummary {
    /// Counts over open (not completed or abandoned) tasks.
    pub fn from_tasks(tasks: &[Task], now: DateTime<Utc>) -> Self {
        let open: Vec<&Task> = tasks.iter().filter(|t| !t.status.is_closed()).collect();
        let horizon = now + Duration::hours(DUE_SOON_HOURS);

        Self {
            overdue: open.iter().filter(|t| t.is_overdue(now)).count(),
            due_soon: open
                .iter()
                .filter(|t| t.deadline.is_some_and(|d| d > now && d < horizon))
                .count(),
            active: open.len(),
        }
    }
}

fn aggression_weight(level: AggressionLevel) -> f64 {
    match level {
        AggressionLevel::Nuclear => 0.3,
        AggressionLevel::Aggressive => 0.2,
        AggressionLevel::Moderate => 0.1,
        AggressionLevel::Gentle => 0.0,
    }
}

/// Pressure of one map cell: task count, overdue and aggression, capped at 1.
pub fn cell_pressure(tasks: &[&Task], now: DateTime<Utc>) -> f64 {
    if tasks.is_empty() {
        return 0.0;
    }
    let mut pressure = tasks.len() as f64 * 0.3;
    for task in tasks {
        if task.is_overdue(now) {
            pressure += 0.4;
        }
        pressure += aggression_weight(task.aggression);
    }
    clamp_unit(pressure)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressureRow {
    pub category: TaskCategory,
    /// Day 0 is today (overdue included), then the next six days.
    pub cells: [f64; PRESSURE_DAYS],
    pub task_counts: [usize; PRESSURE_DAYS],
}

/// One row per category across the 7 local days starting at `now`.
pub fn pressure_map<Z: TimeZone>(tasks: &[Task], now: &DateTime<Z>) -> Vec<PressureRow> {
    let tz = now.timezone();
    let now_utc = now.with_timezone(&Utc);
    let today = now.date_naive();

    // Local midnights bounding each day, in UTC.
    let bounds: Vec<DateTime<Utc>> = (0..=PRESSURE_DAYS as i64)
        .map(|offset| {
            let day = today + Duration::days(offset);
            tz.from_local_datetime(&day.and_time(NaiveTime::MIN))
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|| now_utc + Duration::days(offset))
        })
        .collect();

    [TaskCategory::School, TaskCategory::Work, TaskCategory::Personal]
        .into_iter()
        .map(|category| {
            let mut cells = [0.0; PRESSURE_DAYS];
            let mut task_counts = [0; PRESSURE_DAYS];
            for day in 0..PRESSURE_DAYS {
                let in_cell: Vec<&Task> = tasks
                    .iter()
                    .filter(|t| t.category == category && !t.status.is_closed())
                    .filter(|t| match t.deadline {
                        Some(d) if day == 0 => d < bounds[1],
                        Some(d) => d >= bounds[day] && d < bounds[day + 1],
                        None => false,
                    })
                    .collect();
                cells[day] = cell_pressure(&in_cell, now_utc);
                task_counts[day] = in_cell.len();
            }
            PressureRow {
                category,
                cells,
                task_counts,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskStatus;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 3, 10, 0, 0).unwrap()
    }

    #[test]
    fn summary_counts() {
        let tasks = vec![
            Task::new("a", "late").with_deadline(now() - Duration::hours(1)),
            Task::new("b", "soon").with_deadline(now() + Duration::hours(20)),
            Task::new("c", "later").with_deadline(now() + Duration::days(5)),
            Task::new("d", "open"),
            Task::new("e", "done")
                .with_deadline(now() + Duration::hours(2))
                .with_status(TaskStatus::Completed),
        ];
        let summary = PressureSummary::from_tasks(&tasks, now());
        assert_eq!(
            summary,
            PressureSummary {
                overdue: 1,
                due_soon: 1,
                active: 4
            }
        );
    }

    #[test]
    fn cell_pressure_caps_at_one() {
        let late = Task::new("a", "x")
            .with_deadline(now() - Duration::hours(1))
            .with_aggression(AggressionLevel::Nuclear);
        assert_eq!(cell_pressure(&[], now()), 0.0);
        assert!((cell_pressure(&[&late], now()) - 1.0).abs() < 1e-9);
        assert_eq!(cell_pressure(&[&late, &late], now()), 1.0);

        let calm = Task::new("b", "x").with_aggression(AggressionLevel::Gentle);
        assert!((cell_pressure(&[&calm], now()) - 0.3).abs() < 1e-9);
    }

    #[test]
    fn map_buckets_by_category_and_day() {
        let tasks = vec![
            Task::new("a", "late")
                .with_category(TaskCategory::Work)
                .with_deadline(now() - Duration::days(3)),
            Task::new("b", "today")
                .with_category(TaskCategory::Work)
                .with_deadline(now() + Duration::hours(4)),
            Task::new("c", "in two days")
                .with_category(TaskCategory::School)
                .with_aggression(AggressionLevel::Gentle)
                .with_deadline(now() + Duration::days(2)),
            Task::new("d", "next week")
                .with_category(TaskCategory::Personal)
                .with_deadline(now() + Duration::days(9)),
        ];
        let map = pressure_map(&tasks, &now());
        assert_eq!(map.len(), 3);

        let work = map.iter().find(|r| r.category == TaskCategory::Work).unwrap();
        assert_eq!(work.task_counts[0], 2);

        let school = map.iter().find(|r| r.category == TaskCategory::School).unwrap();
        assert_eq!(school.task_counts, [0, 0, 1, 0, 0, 0, 0]);
        assert!((school.cells[2] - 0.3).abs() < 1e-9);

        let personal = map.iter().find(|r| r.category == TaskCategory::Personal).unwrap();
        assert!(personal.task_counts.iter().all(|&n| n == 0));
    }
}
