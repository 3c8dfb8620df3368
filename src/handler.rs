use chrono::NaiveDate;
use lambda_runtime::{Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::agenda::{Agenda, DayDetail, EventCounts, Role};
use crate::config::Settings;
use crate::filter::GroupFilter;
use crate::error::{AgendaError, Result};
use crate::grid::{WeekStart, grid_span};
use crate::ical;
use crate::model::cell::CalendarCell;
use crate::model::event::Event;
use crate::model::group::Group;
use crate::model::null_as_default;
use crate::model::player::Player;
use crate::store::{EventSource, EventStore, Roster};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Output {
    Calendar,
    Ical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub role: Role,
    /// Any day of the month to show; today when absent.
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
    #[serde(default)]
    pub week_start: Option<WeekStart>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub selected_groups: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub selected_subgroups: Vec<String>,
    #[serde(default)]
    pub selected_day: Option<NaiveDate>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub events: Vec<Event>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub players: Vec<Player>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub outputs: Vec<Output>,
}

/// A grid cell as sent to the dashboard: the visible events plus the hidden count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellView {
    pub date: NaiveDate,
    pub is_current_month: bool,
    pub events: Vec<Event>,
    pub more: usize,
}

impl CellView {
    fn from_cell(cell: &CalendarCell, max_visible: usize) -> Self {
        let preview = cell.preview(max_visible);
        Self {
            date: cell.date,
            is_current_month: cell.is_current_month,
            events: preview.visible.to_vec(),
            more: preview.more,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<Group>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counts: Option<EventCounts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cells: Option<Vec<CellView>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<DayDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ics: Option<String>,
}

#[instrument(skip(event))]
pub async fn handler(event: LambdaEvent<Request>) -> std::result::Result<Response, Error> {
    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "Invalid agenda settings");
            return Err(e.into());
        }
    };
    match render(event.payload, &settings, settings.today()) {
        Ok(response) => Ok(response),
        Err(e) => {
            error!(error = %e, "Rejected agenda request");
            Err(e.into())
        }
    }
}

/// Build the response for `request` as of `today`. Separate from `handler` so the clock and
/// environment can be pinned. Fails only for a reference date whose month grid cannot be
/// represented.
pub fn render(request: Request, settings: &Settings, today: NaiveDate) -> Result<Response> {
    let week_start = request.week_start.unwrap_or(settings.week_start);
    let reference = request.reference_date.unwrap_or(today);
    if grid_span(reference, week_start).is_none() {
        return Err(AgendaError::InvalidDate(format!("{reference} is too close to the edge of the calendar")));
    }

    // Default to the calendar view when no outputs are requested
    let outputs = if request.outputs.is_empty() { vec![Output::Calendar] } else { request.outputs };

    let events = EventStore::with_events(request.events);
    let roster = Roster::with_players(request.players);

    let mut agenda = Agenda::new(request.role, week_start, reference);
    agenda.set_filter(GroupFilter::new(request.selected_groups, request.selected_subgroups));
    agenda.refresh(&events, &roster);

    let mut response = Response {
        message: format!(
            "{} of {} events shown for {}-{:02}.",
            agenda.filtered_events().len(),
            events.events().len(),
            agenda.grid().year,
            agenda.grid().month,
        ),
        groups: None,
        counts: None,
        cells: None,
        day: None,
        ics: None,
    };

    for output in outputs {
        match output {
            Output::Calendar => {
                response.groups = Some(agenda.groups().to_vec());
                response.counts = Some(agenda.counts());
                response.cells = Some(
                    agenda
                        .grid()
                        .cells
                        .iter()
                        .map(|c| CellView::from_cell(c, settings.max_events_per_cell))
                        .collect(),
                );
                response.day = request.selected_day.and_then(|d| agenda.day_detail(d, today));
            }
            Output::Ical => {
                response.ics = Some(ical::to_ics(agenda.filtered_events(), "Academy agenda"));
            }
        }
    }

    info!(message = %response.message, "Prepared agenda response");
    Ok(response)
}
