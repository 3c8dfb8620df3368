use std::collections::HashMap;

use academy_agenda::config::{MAX_EVENTS_VAR, Settings, TIMEZONE_VAR, WEEK_START_VAR};
use academy_agenda::error::AgendaError;
use academy_agenda::grid::WeekStart;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_when_nothing_is_set() {
    let settings = Settings::from_lookup(lookup(&[])).unwrap();
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.week_start, WeekStart::Sunday);
    assert_eq!(settings.max_events_per_cell, 3);
    assert_eq!(settings.timezone, chrono_tz::UTC);
}

#[test]
fn reads_all_keys() {
    let settings = Settings::from_lookup(lookup(&[
        (TIMEZONE_VAR, "Africa/Casablanca"),
        (WEEK_START_VAR, "monday"),
        (MAX_EVENTS_VAR, "5"),
    ]))
    .unwrap();
    assert_eq!(settings.timezone, chrono_tz::Africa::Casablanca);
    assert_eq!(settings.week_start, WeekStart::Monday);
    assert_eq!(settings.max_events_per_cell, 5);
}

#[test]
fn rejects_bad_values() {
    for pairs in [
        [(TIMEZONE_VAR, "Mars/Olympus")],
        [(WEEK_START_VAR, "wednesday")],
        [(MAX_EVENTS_VAR, "lots")],
    ] {
        let err = Settings::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, AgendaError::Config(_)), "unexpected error: {err}");
    }
}
