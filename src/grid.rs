use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::model::cell::CalendarCell;
use crate::model::event::Event;

/// First day of the week in the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn first_day(self) -> Weekday {
        match self {
            WeekStart::Sunday => Weekday::Sun,
            WeekStart::Monday => Weekday::Mon,
        }
    }

    pub fn last_day(self) -> Weekday {
        self.first_day().pred()
    }

    /// Days between the start of the week and `date`, 0..=6.
    fn offset(self, date: NaiveDate) -> u64 {
        let from_monday = date.weekday().num_days_from_monday();
        let start = self.first_day().num_days_from_monday();
        u64::from((from_monday + 7 - start) % 7)
    }
}

impl FromStr for WeekStart {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sunday" | "sun" => Ok(WeekStart::Sunday),
            "monday" | "mon" => Ok(WeekStart::Monday),
            other => Err(format!("unknown week start: {other}")),
        }
    }
}

impl fmt::Display for WeekStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekStart::Sunday => f.write_str("sunday"),
            WeekStart::Monday => f.write_str("monday"),
        }
    }
}

/// First and last day of the month containing `date`.
pub fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let last = (28..=31).rev().find_map(|day| date.with_day(day)).unwrap_or(date);
    (first, last)
}

/// First and last day of the whole-week grid around the month containing `reference`, or
/// `None` when that padding falls outside the representable date range.
pub fn grid_span(reference: NaiveDate, week_start: WeekStart) -> Option<(NaiveDate, NaiveDate)> {
    let (first, last) = month_bounds(reference);
    let start = first.checked_sub_days(Days::new(week_start.offset(first)))?;
    let end = last.checked_add_days(Days::new(6 - week_start.offset(last)))?;
    Some((start, end))
}

/// A month view: every day from the week boundary on or before the 1st to the week boundary
/// on or after the last day, each with the events falling on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarGrid {
    pub year: i32,
    pub month: u32,
    pub week_start: WeekStart,
    pub cells: Vec<CalendarCell>,
}

impl CalendarGrid {
    /// Build the grid for the month containing `reference` from already-filtered events.
    /// Events whose date does not parse appear in no cell. Per-cell order follows `events`.
    ///
    /// At the very ends of the date range the padding is clipped to the month itself; see
    /// `grid_span` to detect that case up front.
    #[instrument(level = "debug", skip(events), fields(count = events.len()))]
    pub fn build(reference: NaiveDate, week_start: WeekStart, events: &[Event]) -> Self {
        let (first, last) = month_bounds(reference);
        let start = first.checked_sub_days(Days::new(week_start.offset(first))).unwrap_or(first);
        let end = last.checked_add_days(Days::new(6 - week_start.offset(last))).unwrap_or(last);

        let mut by_day: HashMap<NaiveDate, Vec<Event>> = HashMap::new();
        for event in events {
            if let Some(day) = event.day() {
                if day >= start && day <= end {
                    by_day.entry(day).or_default().push(event.clone());
                }
            }
        }

        let cells: Vec<CalendarCell> = std::iter::successors(Some(start), |d| d.succ_opt())
            .take_while(|d| *d <= end)
            .map(|date| CalendarCell {
                date,
                is_current_month: date.month() == first.month() && date.year() == first.year(),
                events: by_day.remove(&date).unwrap_or_default(),
            })
            .collect();

        debug!(cells = cells.len(), %start, %end, "Built calendar grid");
        CalendarGrid { year: first.year(), month: first.month(), week_start, cells }
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.cells.first().map(|c| c.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.cells.last().map(|c| c.date)
    }

    /// The cell for `date`, if it is in the grid. Constant time: cells are contiguous days.
    pub fn cell(&self, date: NaiveDate) -> Option<&CalendarCell> {
        let first = self.first_date()?;
        let idx = usize::try_from((date - first).num_days()).ok()?;
        self.cells.get(idx)
    }

    /// Events on `date` as held by its cell.
    pub fn day(&self, date: NaiveDate) -> Option<&[Event]> {
        self.cell(date).map(|c| c.events.as_slice())
    }

    /// Rows of seven cells.
    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarCell]> {
        self.cells.chunks(7)
    }

    pub fn week_count(&self) -> usize {
        self.cells.len() / 7
    }
}
