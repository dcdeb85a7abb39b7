//! Calendar grouping and month grid.
//!
//! # Invariants
//! - Keys are `YYYY-MM-DD` in the given time zone, derived from `created_at`.
//! - Entries inside one day keep their input order.
//! - A month grid always has a multiple of seven cells, Sunday first.

use crate::model::entry::Entry;
use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Utc};
use std::collections::BTreeMap;

/// Entries grouped by local date key.
pub type DayGroups = BTreeMap<String, Vec<Entry>>;

/// Formats a date as a calendar key.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Calendar key of a timestamp in `tz`.
pub fn date_key_in<Tz: TimeZone>(timestamp: &DateTime<Utc>, tz: &Tz) -> String {
    day_key(timestamp.with_timezone(tz).date_naive())
}

/// Calendar key of a timestamp on the deployment's local clock.
pub fn date_key(timestamp: &DateTime<Utc>) -> String {
    date_key_in(timestamp, &Local)
}

/// Groups entries by the local date of `created_at` in `tz`.
pub fn group_by_day_in<Tz: TimeZone>(entries: &[Entry], tz: &Tz) -> DayGroups {
    let mut groups = DayGroups::new();
    for entry in entries {
        groups
            .entry(date_key_in(&entry.created_at, tz))
            .or_default()
            .push(entry.clone());
    }
    groups
}

/// Groups entries by local date on the deployment clock.
pub fn group_by_day(entries: &[Entry]) -> DayGroups {
    group_by_day_in(entries, &Local)
}

/// A displayed month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarMonth {
    year: i32,
    /// 1-based.
    month: u32,
}

impl CalendarMonth {
    /// Returns `None` unless `month` is within `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// First day of the month.
    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Number of days in the month.
    pub fn days(self) -> u32 {
        match (self.first_day(), self.next().first_day()) {
            (Some(first), Some(next)) => (next - first).num_days() as u32,
            _ => 0,
        }
    }

    /// Display label such as `March 2024`.
    pub fn label(self) -> String {
        self.first_day()
            .map(|date| date.format("%B %Y").to_string())
            .unwrap_or_default()
    }
}

/// One cell of the month grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarCell {
    /// Day of month shown in the cell.
    pub day: u32,
    /// `false` for filler days borrowed from adjacent months.
    pub current: bool,
    /// Key into [`DayGroups`]; only set for current-month cells.
    pub date_key: Option<String>,
    pub entry_count: usize,
    pub has_entries: bool,
    pub is_today: bool,
}

impl CalendarCell {
    fn filler(day: u32) -> Self {
        Self {
            day,
            current: false,
            date_key: None,
            entry_count: 0,
            has_entries: false,
            is_today: false,
        }
    }
}

/// Builds a Sunday-first grid for `month`, marking days that have entries.
pub fn month_grid(month: CalendarMonth, groups: &DayGroups, today: NaiveDate) -> Vec<CalendarCell> {
    let Some(first) = month.first_day() else {
        return Vec::new();
    };
    let leading = first.weekday().num_days_from_sunday();
    let days_in_month = month.days();
    let prev_days = month.prev().days();

    let mut cells = Vec::with_capacity(42);
    for offset in (0..leading).rev() {
        cells.push(CalendarCell::filler(prev_days - offset));
    }

    for day in 1..=days_in_month {
        let Some(date) = NaiveDate::from_ymd_opt(month.year, month.month, day) else {
            continue;
        };
        let key = day_key(date);
        let entry_count = groups.get(&key).map_or(0, Vec::len);
        cells.push(CalendarCell {
            day,
            current: true,
            date_key: Some(key),
            entry_count,
            has_entries: entry_count > 0,
            is_today: date == today,
        });
    }

    let trailing = (7 - cells.len() % 7) % 7;
    for day in 1..=trailing as u32 {
        cells.push(CalendarCell::filler(day));
    }

    cells
}
