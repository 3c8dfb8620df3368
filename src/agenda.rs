use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::filter::GroupFilter;
use crate::grid::{CalendarGrid, WeekStart, month_bounds};
use crate::model::event::{Event, Provenance};
use crate::model::event_type::EventType;
use crate::model::group::Group;
use crate::roster::GroupCache;
use crate::store::{DataSource, EventSource, RosterSource, Snapshot};

/// Which dashboard is looking at the agenda.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Coach,
}

impl Role {
    /// Admins may change anything. Coaches may only change their own events that are not in
    /// the past; an event whose date cannot be read counts as past.
    pub fn can_modify(self, event: &Event, today: NaiveDate) -> bool {
        match self {
            Role::Admin => true,
            Role::Coach => {
                event.created_by == Provenance::Coach && event.day().is_some_and(|d| d >= today)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCounts {
    pub total: usize,
    pub training: usize,
    pub matches: usize,
    pub meetings: usize,
}

impl EventCounts {
    pub fn tally(events: &[Event]) -> Self {
        let mut counts = EventCounts { total: events.len(), ..Default::default() };
        for event in events {
            match event.event_type {
                EventType::Training => counts.training += 1,
                EventType::Match => counts.matches += 1,
                EventType::Meeting => counts.meetings += 1,
                EventType::Unknown => {}
            }
        }
        counts
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayEntry {
    pub event: Event,
    pub can_edit: bool,
    pub can_delete: bool,
}

/// Contents of the day modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayDetail {
    pub date: NaiveDate,
    pub is_past: bool,
    pub entries: Vec<DayEntry>,
}

/// Month agenda for one dashboard: the reference month, the filter chips, the derived groups
/// and the grid built from them.
///
/// Nothing is recomputed eagerly. Inputs are marked stale and `refresh` rebuilds what is stale
/// against the current collaborators.
#[derive(Debug, Clone)]
pub struct Agenda {
    role: Role,
    week_start: WeekStart,
    reference: NaiveDate,
    filter: GroupFilter,
    groups: GroupCache,
    filtered: Vec<Event>,
    grid: CalendarGrid,
    // Event store state the grid was last built from.
    seen_events: Option<Snapshot>,
    stale: bool,
}

impl Agenda {
    pub fn new(role: Role, week_start: WeekStart, reference: NaiveDate) -> Self {
        Self {
            role,
            week_start,
            reference,
            filter: GroupFilter::default(),
            groups: GroupCache::new(),
            filtered: Vec::new(),
            grid: CalendarGrid::build(reference, week_start, &[]),
            seen_events: None,
            stale: true,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn reference(&self) -> NaiveDate {
        self.reference
    }

    pub fn filter(&self) -> &GroupFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: GroupFilter) {
        if filter != self.filter {
            self.filter = filter;
            self.stale = true;
        }
    }

    pub fn toggle_group(&mut self, group: &str) {
        self.filter.toggle_group(group);
        self.stale = true;
    }

    pub fn toggle_subgroup(&mut self, subgroup: &str) {
        self.filter.toggle_subgroup(subgroup);
        self.stale = true;
    }

    pub fn clear_filter(&mut self) {
        if !self.filter.is_empty() {
            self.filter.clear();
            self.stale = true;
        }
    }

    /// Show the month containing `date`.
    pub fn go_to(&mut self, date: NaiveDate) {
        if month_bounds(date) != month_bounds(self.reference) {
            self.stale = true;
        }
        self.reference = date;
    }

    pub fn next_month(&mut self) {
        let (first, _) = month_bounds(self.reference);
        if let Some(next) = first.checked_add_months(Months::new(1)) {
            self.go_to(next);
        }
    }

    pub fn previous_month(&mut self) {
        let (first, _) = month_bounds(self.reference);
        if let Some(prev) = first.checked_sub_months(Months::new(1)) {
            self.go_to(prev);
        }
    }

    pub fn today(&mut self, today: NaiveDate) {
        self.go_to(today);
    }

    /// Change signal from a collaborator, for sources that do not bump a version.
    pub fn on_data_changed(&mut self, source: DataSource) {
        debug!(?source, "Agenda inputs changed");
        match source {
            DataSource::Events => self.stale = true,
            DataSource::Roster => self.groups.invalidate(),
        }
    }

    /// Bring derived state up to date. Returns true when the grid was rebuilt.
    #[instrument(level = "debug", skip_all, fields(role = ?self.role, reference = %self.reference))]
    pub fn refresh(&mut self, events: &dyn EventSource, roster: &dyn RosterSource) -> bool {
        self.groups.get(roster.snapshot(), roster.players());

        let snapshot = events.snapshot();
        if !self.stale && self.seen_events == Some(snapshot) {
            return false;
        }

        self.filtered = self.filter.apply(events.events());
        self.grid = CalendarGrid::build(self.reference, self.week_start, &self.filtered);
        self.seen_events = Some(snapshot);
        self.stale = false;
        info!(filtered = self.filtered.len(), cells = self.grid.cells.len(), "Rebuilt agenda");
        true
    }

    pub fn groups(&self) -> &[Group] {
        self.groups.groups()
    }

    pub fn filtered_events(&self) -> &[Event] {
        &self.filtered
    }

    pub fn counts(&self) -> EventCounts {
        EventCounts::tally(&self.filtered)
    }

    pub fn grid(&self) -> &CalendarGrid {
        &self.grid
    }

    /// Events of `date` straight from the built grid.
    pub fn day(&self, date: NaiveDate) -> Option<&[Event]> {
        self.grid.day(date)
    }

    /// Day modal for `date`, with edit and delete rights resolved for this agenda's role.
    pub fn day_detail(&self, date: NaiveDate, today: NaiveDate) -> Option<DayDetail> {
        let events = self.grid.day(date)?;
        let entries = events
            .iter()
            .map(|event| {
                let allowed = self.role.can_modify(event, today);
                DayEntry { event: event.clone(), can_edit: allowed, can_delete: allowed }
            })
            .collect();
        Some(DayDetail { date, is_past: date < today, entries })
    }
}
