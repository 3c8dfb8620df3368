use chrono::NaiveDate;
use lambda_runtime::{Context, LambdaEvent};

use academy_agenda::agenda::Role;
use academy_agenda::config::Settings;
use academy_agenda::error::AgendaError;
use academy_agenda::grid::WeekStart;
use academy_agenda::handler::{Output, Request, handler, render};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_request(extra: serde_json::Value) -> Request {
    let json = std::fs::read_to_string("tests/sample_agenda.json").expect("failed to read sample_agenda.json");
    let mut doc: serde_json::Value = serde_json::from_str(&json).unwrap();
    let obj = doc.as_object_mut().unwrap();
    for (k, v) in extra.as_object().unwrap() {
        obj.insert(k.clone(), v.clone());
    }
    serde_json::from_value(doc).unwrap()
}

#[test]
fn serde_role_and_output_lowercase() {
    let r: Role = serde_json::from_str("\"coach\"").unwrap();
    assert_eq!(r, Role::Coach);
    let o: Output = serde_json::from_str("\"ical\"").unwrap();
    assert_eq!(o, Output::Ical);
    assert_eq!(serde_json::to_string(&Output::Calendar).unwrap(), "\"calendar\"");
}

#[test]
fn request_deserializes_with_defaults() {
    let req: Request = serde_json::from_value(serde_json::json!({ "role": "admin" })).unwrap();
    assert!(req.outputs.is_empty(), "outputs should default to empty vec");
    assert!(req.events.is_empty());
    assert!(req.reference_date.is_none());
    assert!(req.week_start.is_none());

    let req2: Request = serde_json::from_value(serde_json::json!({
        "role": "coach",
        "reference_date": "2024-03-15",
        "week_start": "monday",
        "selected_groups": ["U14"],
        "outputs": ["calendar", "ical"]
    }))
    .unwrap();
    assert_eq!(req2.reference_date, Some(ymd(2024, 3, 15)));
    assert_eq!(req2.week_start, Some(WeekStart::Monday));
    assert_eq!(req2.outputs, vec![Output::Calendar, Output::Ical]);
}

#[test]
fn renders_calendar_view_by_default() {
    let req = sample_request(serde_json::json!({
        "role": "coach",
        "reference_date": "2024-03-01",
        "selected_day": "2024-03-15"
    }));
    let settings = Settings { max_events_per_cell: 2, ..Settings::default() };
    let resp = render(req, &settings, ymd(2024, 3, 10)).expect("render");

    assert_eq!(resp.message, "7 of 7 events shown for 2024-03.");
    assert_eq!(resp.groups.as_ref().unwrap().len(), 3);
    assert_eq!(resp.counts.unwrap().total, 7);
    assert!(resp.ics.is_none());

    let cells = resp.cells.unwrap();
    assert_eq!(cells.len(), 42);
    let fifteenth = cells.iter().find(|c| c.date == ymd(2024, 3, 15)).unwrap();
    assert_eq!(fifteenth.events.len(), 2);
    assert_eq!(fifteenth.more, 2);

    let day = resp.day.unwrap();
    assert_eq!(day.entries.len(), 4, "the day view is not truncated");
    assert!(!day.is_past);
}

#[test]
fn filters_and_exports_ical_only() {
    let req = sample_request(serde_json::json!({
        "role": "admin",
        "reference_date": "2024-03-20",
        "selected_groups": ["U16"],
        "outputs": ["ical"]
    }));
    let resp = render(req, &Settings::default(), ymd(2024, 3, 1)).expect("render");

    assert_eq!(resp.message, "2 of 7 events shown for 2024-03.");
    assert!(resp.cells.is_none());
    let ics = resp.ics.unwrap();
    assert!(ics.contains("UID:e3"), "ics was: {}", ics);
    assert!(ics.contains("UID:e4"), "ics was: {}", ics);
    assert!(!ics.contains("UID:e1"), "ics was: {}", ics);
}

#[test]
fn response_serializes_without_empty_sections() {
    let req = sample_request(serde_json::json!({ "role": "admin", "reference_date": "2024-03-01", "outputs": ["ical"] }));
    let resp = render(req, &Settings::default(), ymd(2024, 3, 1)).expect("render");
    let json = serde_json::to_value(&resp).unwrap();
    assert!(json.get("cells").is_none());
    assert!(json.get("ics").is_some());
}

#[test]
fn rejects_reference_dates_at_the_edge_of_the_calendar() {
    let req: Request = serde_json::from_value(serde_json::json!({
        "role": "admin",
        "reference_date": "-262143-01-01"
    }))
    .unwrap();
    let err = render(req, &Settings::default(), ymd(2024, 3, 1)).unwrap_err();
    assert!(matches!(err, AgendaError::InvalidDate(_)), "unexpected error: {err}");
}

#[test]
fn null_fields_do_not_sink_the_request() {
    let req: Request = serde_json::from_value(serde_json::json!({
        "role": "admin",
        "reference_date": "2024-03-01",
        "selected_subgroups": null,
        "outputs": null,
        "events": [
            {
                "id": "broken",
                "date": null,
                "type": null,
                "assignedGroups": null,
                "assignedSubgroups": null,
                "createdBy": null
            },
            {
                "id": "ok",
                "date": "2024-03-15",
                "type": "training",
                "subType": "physique-A",
                "assignedGroups": ["U12"]
            }
        ],
        "players": [{ "id": null, "name": null, "group": "U12", "subgroup": null }]
    }))
    .expect("request with null fields");
    let resp = render(req, &Settings::default(), ymd(2024, 3, 1)).expect("render");

    assert_eq!(resp.message, "2 of 2 events shown for 2024-03.");
    let cells = resp.cells.unwrap();
    let placed: Vec<&str> = cells.iter().flat_map(|c| c.events.iter().map(|e| e.id.as_str())).collect();
    assert_eq!(placed, vec!["ok"]);
    assert_eq!(resp.groups.unwrap()[0].id, "U12");
}

#[tokio::test]
async fn handler_answers_a_lambda_event() {
    let req = sample_request(serde_json::json!({ "role": "admin", "reference_date": "2024-03-01" }));
    let resp = handler(LambdaEvent::new(req, Context::default())).await.expect("handler");
    assert!(resp.message.ends_with("for 2024-03."), "message was: {}", resp.message);
    assert!(resp.cells.is_some());
}
