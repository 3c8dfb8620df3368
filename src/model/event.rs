use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::model::event_type::{EventKind, EventType};
use crate::model::null_as_default;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Who created an event. Only coach-created events are editable from the coach view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Admin,
    Coach,
    #[default]
    #[serde(other)]
    Unknown,
}

/// A scheduled training, match or meeting as stored by the admin and coach dashboards.
///
/// Fields are kept close to the stored shape: `date` and the times stay raw strings and are
/// parsed on demand, so one malformed record never poisons a whole collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub event_type: EventType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub assigned_groups: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub assigned_subgroups: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_by: Provenance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Event {
    /// Minimal event on `date` with the given kind; everything else empty.
    pub fn new(id: impl Into<String>, date: NaiveDate, kind: EventKind) -> Self {
        Self {
            id: id.into(),
            title: None,
            date: date.format(DATE_FORMAT).to_string(),
            start_time: None,
            end_time: None,
            event_type: kind.event_type(),
            sub_type: Some(kind.sub_type()),
            assigned_groups: Vec::new(),
            assigned_subgroups: Vec::new(),
            created_by: Provenance::Unknown,
            location: None,
            notes: None,
        }
    }

    pub fn with_times(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.start_time = Some(start.format(TIME_FORMAT).to_string());
        self.end_time = Some(end.format(TIME_FORMAT).to_string());
        self
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assigned_groups = groups.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_subgroups<I, S>(mut self, subgroups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assigned_subgroups = subgroups.into_iter().map(Into::into).collect();
        self
    }

    pub fn created_by(mut self, provenance: Provenance) -> Self {
        self.created_by = provenance;
        self
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// The calendar day of this event, or `None` unless the stored date is exactly the
    /// zero-padded `YYYY-MM-DD` form of a real day.
    pub fn day(&self) -> Option<NaiveDate> {
        let day = NaiveDate::parse_from_str(&self.date, DATE_FORMAT).ok()?;
        (day.format(DATE_FORMAT).to_string() == self.date).then_some(day)
    }

    pub fn start(&self) -> Option<NaiveTime> {
        parse_time(self.start_time.as_deref())
    }

    pub fn end(&self) -> Option<NaiveTime> {
        parse_time(self.end_time.as_deref())
    }

    /// Decoded type and sub-type, when both are recognised.
    pub fn kind(&self) -> Option<EventKind> {
        EventKind::decode(self.event_type, self.sub_type.as_deref()?)
    }

    /// Title if set, otherwise a label built from the type.
    pub fn label(&self) -> String {
        match (&self.title, self.kind()) {
            (Some(title), _) if !title.trim().is_empty() => title.trim().to_string(),
            (_, Some(kind)) => kind.to_string(),
            _ => self.event_type.to_string(),
        }
    }
}

fn parse_time(raw: Option<&str>) -> Option<NaiveTime> {
    let raw = raw?.trim();
    NaiveTime::parse_from_str(raw, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}
