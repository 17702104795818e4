//! Pure derived-view builders: no side effects, recomputed from current
//! state on every refresh.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};

use crate::models::Task;
use crate::state::StatusFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub percentage: u32,
}

pub fn completion_stats(tasks: &[Task]) -> CompletionStats {
    let total = tasks.len();
    let completed = tasks.iter().filter(|t| t.completed).count();
    let pending = total - completed;
    let percentage = if total == 0 {
        0
    } else {
        ((completed as f64 / total as f64) * 100.0).round() as u32
    };
    CompletionStats {
        total,
        completed,
        pending,
        percentage,
    }
}

/// Restrict to tasks due on `date`, then apply the status filter.
/// Order is preserved from the underlying collection (newest first, since
/// creates prepend).
pub fn filter_tasks<'a>(tasks: &'a [Task], date: &str, filter: StatusFilter) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| t.due_date == date)
        .filter(|t| match filter {
            StatusFilter::All => true,
            StatusFilter::Active => !t.completed,
            StatusFilter::Completed => t.completed,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    /// YYYY-MM-DD
    pub date: String,
    /// Day of month, 1-based
    pub day: u32,
    /// Whether any task in the full collection is due on this date
    pub has_tasks: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    /// Blank cells before day 1, equal to its Sunday-based weekday offset
    pub leading_blanks: usize,
    pub days: Vec<DayCell>,
}

impl MonthGrid {
    /// Total cell count including leading blanks (render in rows of 7)
    pub fn cell_count(&self) -> usize {
        self.leading_blanks + self.days.len()
    }
}

/// Build the month grid for (year, month). Task-presence markers span the
/// whole collection regardless of the current date/status filter.
/// Returns None for an out-of-range month.
pub fn month_grid(year: i32, month: u32, tasks: &[Task]) -> Option<MonthGrid> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let leading_blanks = first.weekday().num_days_from_sunday() as usize;

    let (next_year, next_month) = next_month(year, month);
    let days_in_month = NaiveDate::from_ymd_opt(next_year, next_month, 1)?
        .pred_opt()?
        .day();

    let due_dates: BTreeSet<&str> = tasks.iter().map(|t| t.due_date.as_str()).collect();

    let days = (1..=days_in_month)
        .map(|day| {
            let date = format!("{:04}-{:02}-{:02}", year, month, day);
            let has_tasks = due_dates.contains(date.as_str());
            DayCell {
                date,
                day,
                has_tasks,
            }
        })
        .collect();

    Some(MonthGrid {
        year,
        month,
        leading_blanks,
        days,
    })
}

pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

pub fn prev_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 { (year - 1, 12) } else { (year, month - 1) }
}

/// "February 2024" style header for the calendar
pub fn month_label(year: i32, month: u32) -> String {
    match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(date) => date.format("%B %Y").to_string(),
        None => format!("{:04}-{:02}", year, month),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use pretty_assertions::assert_eq;

    fn task(title: &str, due: &str, completed: bool) -> Task {
        let mut t = Task::new("user-demo".into(), title.into(), Priority::Medium, due.into());
        t.completed = completed;
        t
    }

    #[test]
    fn stats_on_empty_collection_are_all_zero() {
        let stats = completion_stats(&[]);
        assert_eq!(
            stats,
            CompletionStats {
                total: 0,
                completed: 0,
                pending: 0,
                percentage: 0
            }
        );
    }

    #[test]
    fn stats_percentage_rounds() {
        let tasks = vec![
            task("a", "2024-05-01", true),
            task("b", "2024-05-01", false),
            task("c", "2024-05-01", false),
        ];
        let stats = completion_stats(&tasks);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 2);
        // 100 / 3 = 33.33 -> 33
        assert_eq!(stats.percentage, 33);

        let tasks = vec![
            task("a", "2024-05-01", true),
            task("b", "2024-05-01", true),
            task("c", "2024-05-01", false),
        ];
        // 200 / 3 = 66.67 -> 67
        assert_eq!(completion_stats(&tasks).percentage, 67);
    }

    #[test]
    fn stats_percentage_sweeps_small_collections() {
        for total in 0..=40usize {
            for completed in 0..=total {
                let mut tasks = Vec::new();
                for i in 0..total {
                    tasks.push(task(&format!("t{}", i), "2024-05-01", i < completed));
                }
                let stats = completion_stats(&tasks);
                let expected = if total == 0 {
                    0
                } else {
                    ((completed as f64 / total as f64) * 100.0).round() as u32
                };
                assert_eq!(stats.percentage, expected);
                assert_eq!(stats.pending, total - completed);
            }
        }
    }

    #[test]
    fn stats_percentage_at_larger_sizes() {
        let mut tasks = Vec::new();
        for i in 0..500usize {
            tasks.push(task(&format!("t{}", i), "2024-05-01", i < 137));
        }
        let stats = completion_stats(&tasks);
        assert_eq!(stats.total, 500);
        // 137 / 500 = 27.4% -> 27
        assert_eq!(stats.percentage, 27);
    }

    #[test]
    fn filter_restricts_by_date_then_status() {
        let tasks = vec![
            task("a", "2024-05-01", false),
            task("b", "2024-05-02", false),
            task("c", "2024-05-01", true),
            task("d", "2024-05-01", false),
        ];

        let all = filter_tasks(&tasks, "2024-05-01", StatusFilter::All);
        assert_eq!(
            all.iter().map(|t| t.title.as_str()).collect::<Vec<_>>(),
            vec!["a", "c", "d"]
        );

        let active = filter_tasks(&tasks, "2024-05-01", StatusFilter::Active);
        assert!(active.iter().all(|t| t.due_date == "2024-05-01" && !t.completed));
        assert_eq!(active.len(), 2);

        let completed = filter_tasks(&tasks, "2024-05-01", StatusFilter::Completed);
        assert_eq!(
            completed.iter().map(|t| t.title.as_str()).collect::<Vec<_>>(),
            vec!["c"]
        );

        assert!(filter_tasks(&tasks, "2024-06-01", StatusFilter::All).is_empty());
    }

    #[test]
    fn february_2024_grid_has_29_days_and_thursday_offset() {
        let grid = month_grid(2024, 2, &[]).unwrap();
        assert_eq!(grid.days.len(), 29);
        // 2024-02-01 was a Thursday: Su=0 .. Th=4
        assert_eq!(grid.leading_blanks, 4);
        assert_eq!(grid.cell_count(), 33);
        assert_eq!(grid.days[0].date, "2024-02-01");
        assert_eq!(grid.days[28].date, "2024-02-29");
    }

    #[test]
    fn grid_markers_span_the_full_collection() {
        let tasks = vec![
            task("a", "2024-02-10", true),
            task("b", "2024-03-05", false),
        ];
        let grid = month_grid(2024, 2, &tasks).unwrap();
        let marked: Vec<u32> = grid
            .days
            .iter()
            .filter(|c| c.has_tasks)
            .map(|c| c.day)
            .collect();
        // Completion state and selected date play no part in the markers
        assert_eq!(marked, vec![10]);
    }

    #[test]
    fn month_grid_rejects_invalid_month() {
        assert!(month_grid(2024, 13, &[]).is_none());
        assert!(month_grid(2024, 0, &[]).is_none());
    }

    #[test]
    fn month_navigation_carries_the_year() {
        assert_eq!(next_month(2024, 12), (2025, 1));
        assert_eq!(next_month(2024, 5), (2024, 6));
        assert_eq!(prev_month(2024, 1), (2023, 12));
        assert_eq!(prev_month(2024, 5), (2024, 4));
    }

    #[test]
    fn month_label_is_human_readable() {
        assert_eq!(month_label(2024, 2), "February 2024");
    }
}
