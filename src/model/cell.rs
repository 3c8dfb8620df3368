use chrono::NaiveDate;
use serde::Serialize;

use crate::model::event::Event;

/// One slot of a month grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub is_current_month: bool,
    pub events: Vec<Event>,
}

/// What a grid cell actually shows: the first few events and how many were left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPreview<'a> {
    pub visible: &'a [Event],
    pub more: usize,
}

impl CalendarCell {
    pub fn preview(&self, max_visible: usize) -> CellPreview<'_> {
        let shown = self.events.len().min(max_visible);
        CellPreview { visible: &self.events[..shown], more: self.events.len() - shown }
    }
}
