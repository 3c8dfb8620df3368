use std::env;

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::error::{AgendaError, Result};
use crate::grid::WeekStart;

pub const TIMEZONE_VAR: &str = "AGENDA_TIMEZONE";
pub const WEEK_START_VAR: &str = "AGENDA_WEEK_START";
pub const MAX_EVENTS_VAR: &str = "AGENDA_MAX_EVENTS_PER_CELL";

const DEFAULT_MAX_EVENTS_PER_CELL: usize = 3;

/// Runtime settings for the agenda service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    /// Timezone the academy lives in; decides what "today" is.
    pub timezone: Tz,
    pub week_start: WeekStart,
    /// How many events a grid cell shows before collapsing into "+K more".
    pub max_events_per_cell: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            week_start: WeekStart::default(),
            max_events_per_cell: DEFAULT_MAX_EVENTS_PER_CELL,
        }
    }
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup. Missing keys fall back to defaults,
    /// present but unparsable values are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        if let Some(raw) = lookup(TIMEZONE_VAR) {
            settings.timezone = raw
                .trim()
                .parse::<Tz>()
                .map_err(|e| AgendaError::Config(format!("{TIMEZONE_VAR}={raw}: {e}")))?;
        }
        if let Some(raw) = lookup(WEEK_START_VAR) {
            settings.week_start = raw
                .parse::<WeekStart>()
                .map_err(|e| AgendaError::Config(format!("{WEEK_START_VAR}: {e}")))?;
        }
        if let Some(raw) = lookup(MAX_EVENTS_VAR) {
            settings.max_events_per_cell = raw
                .trim()
                .parse::<usize>()
                .map_err(|e| AgendaError::Config(format!("{MAX_EVENTS_VAR}={raw}: {e}")))?;
        }

        debug!(timezone = %settings.timezone, week_start = ?settings.week_start, max_events_per_cell = settings.max_events_per_cell, "Loaded settings");
        Ok(settings)
    }

    /// Today's date in the configured timezone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }
}
