use chrono::{NaiveDate, NaiveDateTime};
use icalendar::{
    Calendar, CalendarComponent, CalendarDateTime, Component, DatePerhapsTime, EventLike,
};
use tracing::{debug, info, instrument, warn};

use crate::error::{AgendaError, Result};
use crate::model::event::{DATE_FORMAT, Event, Provenance, TIME_FORMAT};
use crate::model::event_type::EventType;

const GROUPS_PROP: &str = "X-ACADEMY-GROUPS";
const SUBGROUPS_PROP: &str = "X-ACADEMY-SUBGROUPS";
const TYPE_PROP: &str = "X-ACADEMY-TYPE";
const SUBTYPE_PROP: &str = "X-ACADEMY-SUBTYPE";

/// Render events as a VCALENDAR feed. Events without a readable date are left out; events
/// without a readable start time become all-day entries.
#[instrument(level = "info", skip(events), fields(count = events.len()))]
pub fn to_ics(events: &[Event], calendar_name: &str) -> String {
    let mut calendar = Calendar::new();
    calendar.name(calendar_name);

    let mut written = 0usize;
    for event in events {
        let Some(day) = event.day() else {
            warn!(id = %event.id, date = %event.date, "Skipping event with unreadable date");
            continue;
        };

        let mut vevent = icalendar::Event::new();
        vevent.add_property("UID", &event.id);
        vevent.add_property("SUMMARY", event.label());

        match event.start() {
            Some(start) => {
                let start = day.and_time(start);
                // Missing or inverted end times fall back to a one-hour slot.
                let end = event
                    .end()
                    .map(|end| day.and_time(end))
                    .filter(|end| *end > start)
                    .unwrap_or_else(|| start + chrono::Duration::minutes(60));
                vevent.starts(floating(start));
                vevent.ends(floating(end));
            }
            None => {
                vevent.all_day(day);
            }
        }

        // CATEGORIES is for calendar clients; the X- properties carry what the agenda reads back.
        let categories: Vec<&str> = event
            .assigned_groups
            .iter()
            .chain(event.assigned_subgroups.iter())
            .map(String::as_str)
            .collect();
        if !categories.is_empty() {
            vevent.add_property("CATEGORIES", categories.join(","));
        }
        if !event.assigned_groups.is_empty() {
            vevent.add_property(GROUPS_PROP, event.assigned_groups.join(","));
        }
        if !event.assigned_subgroups.is_empty() {
            vevent.add_property(SUBGROUPS_PROP, event.assigned_subgroups.join(","));
        }
        if event.event_type != EventType::Unknown {
            vevent.add_property(TYPE_PROP, event.event_type.as_str());
        }
        if let Some(sub_type) = event.sub_type.as_deref().filter(|s| !s.trim().is_empty()) {
            vevent.add_property(SUBTYPE_PROP, sub_type);
        }
        if let Some(location) = event.location.as_deref().filter(|l| !l.trim().is_empty()) {
            vevent.add_property("LOCATION", location);
        }
        if let Some(notes) = event.notes.as_deref().filter(|n| !n.trim().is_empty()) {
            vevent.add_property("DESCRIPTION", notes);
        }

        calendar.push(vevent.done());
        written += 1;
    }

    info!(written, "Rendered iCalendar feed");
    calendar.done().to_string()
}

/// Read VEVENTs from an ICS document into events attributed to `created_by`. Entries without
/// a readable DTSTART are skipped; a document that does not parse at all is an error.
///
/// Groups, subgroups and the event type come from the `X-ACADEMY-*` properties written by
/// `to_ics`; foreign feeds without them import as unassigned events of unknown type.
#[instrument(level = "info", skip(ics), fields(bytes = ics.len()))]
pub fn events_from_ics(ics: &str, created_by: Provenance) -> Result<Vec<Event>> {
    let parsed = icalendar::parser::read_calendar(ics).map_err(|e| AgendaError::Ical(e.to_string()))?;
    let calendar: Calendar = parsed.into();

    let mut events = Vec::new();
    for component in &calendar.components {
        let CalendarComponent::Event(vevent) = component else {
            continue;
        };
        let dtstart = vevent.property_value("DTSTART").unwrap_or("");
        let Some((day, start)) = parse_dt(dtstart) else {
            debug!(dtstart, "Skipping VEVENT without a readable start");
            continue;
        };
        let end = vevent.property_value("DTEND").and_then(parse_dt).and_then(|(_, t)| t);

        let text = |key: &str| {
            vevent
                .property_value(key)
                .map(unescape)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let list = |key: &str| vevent.property_value(key).map(split_list).unwrap_or_default();

        events.push(Event {
            id: text("UID").unwrap_or_default(),
            title: text("SUMMARY"),
            date: day.format(DATE_FORMAT).to_string(),
            start_time: start.map(|t| t.format(TIME_FORMAT).to_string()),
            end_time: end.map(|t| t.format(TIME_FORMAT).to_string()),
            event_type: text(TYPE_PROP).map(|t| EventType::from_name(&t)).unwrap_or_default(),
            sub_type: text(SUBTYPE_PROP),
            assigned_groups: list(GROUPS_PROP),
            assigned_subgroups: list(SUBGROUPS_PROP),
            created_by,
            location: text("LOCATION"),
            notes: text("DESCRIPTION"),
        });
    }

    info!(events = events.len(), "Imported events from iCalendar");
    Ok(events)
}

/// Undo RFC 5545 text escaping. Values may reach us escaped or already unescaped.
fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

/// Split an id list written by `to_ics`. The comma separator may arrive escaped (`\,`).
fn split_list(value: &str) -> Vec<String> {
    unescape(value).split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
}

fn floating(dt: NaiveDateTime) -> DatePerhapsTime {
    DatePerhapsTime::DateTime(CalendarDateTime::Floating(dt))
}

/// Parse an ICS date or date-time value into a day and an optional time of day.
fn parse_dt(s: &str) -> Option<(NaiveDate, Option<chrono::NaiveTime>)> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    // A trailing Z is read as wall-clock time; the agenda has no timezone on events.
    let s = s.strip_suffix('Z').unwrap_or(s);
    for pat in ["%Y%m%dT%H%M%S", "%Y%m%dT%H%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, pat) {
            return Some((dt.date(), Some(dt.time())));
        }
    }
    NaiveDate::parse_from_str(s, "%Y%m%d").ok().map(|d| (d, None))
}
