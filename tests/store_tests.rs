use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;

use academy_agenda::error::AgendaError;
use academy_agenda::model::event::Event;
use academy_agenda::model::event_type::{EventKind, MeetingType};
use academy_agenda::model::player::Player;
use academy_agenda::store::{ChangeFeed, DataSource, EventSource, EventStore, Roster, RosterSource};

fn meeting(id: &str) -> Event {
    Event::new(id, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(), EventKind::Meeting(MeetingType::Staff))
}

#[test]
fn create_update_delete_by_id() {
    let mut store = EventStore::new();
    assert_eq!(store.create(meeting("a")).unwrap(), "a");
    store.create(meeting("b")).unwrap();

    let mut changed = meeting("a");
    changed.title = Some("Moved".to_string());
    store.update(changed).unwrap();
    assert_eq!(store.get("a").unwrap().title.as_deref(), Some("Moved"));
    assert_eq!(store.events()[0].id, "a", "update keeps position");

    let removed = store.delete("a").unwrap();
    assert_eq!(removed.id, "a");
    assert_eq!(store.events().len(), 1);
}

#[test]
fn rejects_duplicates_and_unknown_ids() {
    let mut store = EventStore::with_events(vec![meeting("a")]);
    assert_eq!(store.create(meeting("a")), Err(AgendaError::DuplicateEvent("a".to_string())));
    assert_eq!(store.update(meeting("zz")), Err(AgendaError::UnknownEvent("zz".to_string())));
    assert_eq!(store.delete("zz").unwrap_err(), AgendaError::UnknownEvent("zz".to_string()));
    assert_eq!(store.version(), 1, "failed mutations do not bump the version");
}

#[test]
fn blank_ids_get_a_fresh_uuid() {
    let mut store = EventStore::new();
    let first = store.create(meeting("")).unwrap();
    let second = store.create(meeting("  ")).unwrap();
    assert_ne!(first, second);
    assert_eq!(first.len(), 36);
    assert!(store.get(&first).is_some());
}

#[test]
fn mutations_bump_version_and_notify() {
    let seen: Rc<RefCell<Vec<DataSource>>> = Rc::new(RefCell::new(Vec::new()));
    let mut store = EventStore::new();
    let sink = Rc::clone(&seen);
    store.feed_mut().subscribe(move |source| sink.borrow_mut().push(source));

    let v0 = store.version();
    store.create(meeting("a")).unwrap();
    store.update(meeting("a")).unwrap();
    store.delete("a").unwrap();
    assert_eq!(store.version(), v0 + 3);
    assert_eq!(*seen.borrow(), vec![DataSource::Events; 3]);
}

#[test]
fn roster_changes_notify_roster_listeners() {
    let seen: Rc<RefCell<Vec<DataSource>>> = Rc::new(RefCell::new(Vec::new()));
    let mut roster = Roster::with_players(vec![Player::new("1", "A").in_group("U14")]);
    let sink = Rc::clone(&seen);
    roster.feed_mut().subscribe(move |source| sink.borrow_mut().push(source));

    roster.add(Player::new("2", "B").in_group("U16"));
    assert_eq!(roster.remove("1"), 1);
    assert_eq!(roster.remove("missing"), 0);

    assert_eq!(roster.players().len(), 1);
    assert_eq!(roster.version(), 3);
    assert_eq!(*seen.borrow(), vec![DataSource::Roster; 2]);
}

#[test]
fn unsubscribed_listeners_stop_hearing() {
    let count = Rc::new(RefCell::new(0));
    let mut feed = ChangeFeed::new();
    let sink = Rc::clone(&count);
    let id = feed.subscribe(move |_| *sink.borrow_mut() += 1);

    feed.notify(DataSource::Events);
    assert!(feed.unsubscribe(id));
    assert!(!feed.unsubscribe(id));
    feed.notify(DataSource::Events);

    assert_eq!(*count.borrow(), 1);
    assert!(feed.is_empty());
}
