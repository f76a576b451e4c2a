use std::collections::{BTreeSet, HashSet};

use chrono::{Datelike, Duration, NaiveDate};
use common::model::record::HabitRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub completed: bool,
}

/// Monday-first week; `None` pads the days outside the month.
pub type Week = [Option<CalendarDay>; 7];

fn completed_dates(records: &[HabitRecord]) -> HashSet<NaiveDate> {
    records
        .iter()
        .filter(|r| r.completed)
        .map(|r| r.date)
        .collect()
}

/// Calendar grid for one month. Returns `None` for an invalid month.
pub fn month_grid(year: i32, month: u32, records: &[HabitRecord]) -> Option<Vec<Week>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let done = completed_dates(records);

    let mut weeks = Vec::new();
    let mut week: Week = [None; 7];
    let mut column = first.weekday().num_days_from_monday() as usize;

    for date in first.iter_days().take_while(|d| d.month() == month) {
        week[column] = Some(CalendarDay {
            date,
            completed: done.contains(&date),
        });
        column += 1;
        if column == 7 {
            weeks.push(week);
            week = [None; 7];
            column = 0;
        }
    }
    if column > 0 {
        weeks.push(week);
    }
    Some(weeks)
}

/// `(year, month)` shifted by `delta` months.
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 + delta;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HabitStats {
    pub total: usize,
    pub completed: usize,
    /// Percentage, one decimal.
    pub completion_rate: f64,
    pub current_streak: u32,
    pub best_streak: u32,
}

impl HabitStats {
    pub fn compute(records: &[HabitRecord], today: NaiveDate) -> Self {
        let total = records.len();
        let completed = records.iter().filter(|r| r.completed).count();
        let completion_rate = if total == 0 {
            0.0
        } else {
            (completed as f64 * 1000.0 / total as f64).round() / 10.0
        };

        let days: BTreeSet<NaiveDate> = completed_dates(records).into_iter().collect();

        Self {
            total,
            completed,
            completion_rate,
            current_streak: current_streak(&days, today),
            best_streak: best_streak(&days),
        }
    }
}

// A streak is still current if it ends today or yesterday.
fn current_streak(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let yesterday = today - Duration::days(1);
    let mut cursor = if days.contains(&today) {
        today
    } else if days.contains(&yesterday) {
        yesterday
    } else {
        return 0;
    };

    let mut streak = 0;
    while days.contains(&cursor) {
        streak += 1;
        cursor -= Duration::days(1);
    }
    streak
}

fn best_streak(days: &BTreeSet<NaiveDate>) -> u32 {
    let mut best = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;
    for &day in days {
        run = match previous {
            Some(p) if day - p == Duration::days(1) => run + 1,
            _ => 1,
        };
        best = best.max(run);
        previous = Some(day);
    }
    best
}
