use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::{AgendaError, Result};
use crate::model::event::Event;
use crate::model::player::Player;

/// Which collaborator changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataSource {
    Events,
    Roster,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(DataSource)>;

/// Callbacks to run after a collaborator's data changed. How the signal reaches a listener
/// (push from a store, a poll loop, a manual refresh button) is up to the caller.
#[derive(Default)]
pub struct ChangeFeed {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl fmt::Debug for ChangeFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeFeed").field("listeners", &self.listeners.len()).finish()
    }
}

impl ChangeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(DataSource) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false when `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    pub fn notify(&mut self, source: DataSource) {
        debug!(?source, listeners = self.listeners.len(), "Notifying change listeners");
        for (_, listener) in self.listeners.iter_mut() {
            listener(source);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

static NEXT_SOURCE_ID: AtomicU64 = AtomicU64::new(1);

fn next_source_id() -> u64 {
    NEXT_SOURCE_ID.fetch_add(1, Ordering::Relaxed)
}

/// Identifies one state of one collaborator: which store, and which version of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Snapshot {
    pub source: u64,
    pub version: u64,
}

/// Read side of the event collaborator.
pub trait EventSource {
    fn events(&self) -> &[Event];
    /// Distinct per store instance.
    fn source_id(&self) -> u64;
    /// Bumped on every mutation.
    fn version(&self) -> u64;

    fn snapshot(&self) -> Snapshot {
        Snapshot { source: self.source_id(), version: self.version() }
    }
}

/// Read side of the roster collaborator.
pub trait RosterSource {
    fn players(&self) -> &[Player];
    fn source_id(&self) -> u64;
    fn version(&self) -> u64;

    fn snapshot(&self) -> Snapshot {
        Snapshot { source: self.source_id(), version: self.version() }
    }
}

/// Ordered in-memory event collection with id-keyed mutations.
#[derive(Debug)]
pub struct EventStore {
    id: u64,
    events: Vec<Event>,
    version: u64,
    feed: ChangeFeed,
}

impl Default for EventStore {
    fn default() -> Self {
        Self { id: next_source_id(), events: Vec::new(), version: 0, feed: ChangeFeed::new() }
    }
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: Vec<Event>) -> Self {
        Self { events, version: 1, ..Self::default() }
    }

    pub fn feed_mut(&mut self) -> &mut ChangeFeed {
        &mut self.feed
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Append an event. An empty id is replaced with a fresh UUID. Returns the stored id.
    #[instrument(level = "info", skip(self, event), fields(date = %event.date))]
    pub fn create(&mut self, mut event: Event) -> Result<String> {
        if event.id.trim().is_empty() {
            event.id = Uuid::new_v4().to_string();
        } else if self.get(&event.id).is_some() {
            warn!(id = %event.id, "Rejected event with duplicate id");
            return Err(AgendaError::DuplicateEvent(event.id));
        }
        let id = event.id.clone();
        self.events.push(event);
        self.touch();
        info!(id = %id, "Created event");
        Ok(id)
    }

    /// Replace the event with the same id, keeping its position.
    #[instrument(level = "info", skip(self, event), fields(id = %event.id))]
    pub fn update(&mut self, event: Event) -> Result<()> {
        let slot = self
            .events
            .iter_mut()
            .find(|e| e.id == event.id)
            .ok_or_else(|| AgendaError::UnknownEvent(event.id.clone()))?;
        *slot = event;
        self.touch();
        Ok(())
    }

    #[instrument(level = "info", skip(self))]
    pub fn delete(&mut self, id: &str) -> Result<Event> {
        let idx = self
            .events
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| AgendaError::UnknownEvent(id.to_string()))?;
        let removed = self.events.remove(idx);
        self.touch();
        Ok(removed)
    }

    /// Swap in a whole new collection, e.g. after reloading from storage.
    pub fn replace_all(&mut self, events: Vec<Event>) {
        self.events = events;
        self.touch();
    }

    fn touch(&mut self) {
        self.version += 1;
        self.feed.notify(DataSource::Events);
    }
}

impl EventSource for EventStore {
    fn events(&self) -> &[Event] {
        &self.events
    }

    fn source_id(&self) -> u64 {
        self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// In-memory player directory.
#[derive(Debug)]
pub struct Roster {
    id: u64,
    players: Vec<Player>,
    version: u64,
    feed: ChangeFeed,
}

impl Default for Roster {
    fn default() -> Self {
        Self { id: next_source_id(), players: Vec::new(), version: 0, feed: ChangeFeed::new() }
    }
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_players(players: Vec<Player>) -> Self {
        Self { players, version: 1, ..Self::default() }
    }

    pub fn feed_mut(&mut self) -> &mut ChangeFeed {
        &mut self.feed
    }

    pub fn add(&mut self, player: Player) {
        self.players.push(player);
        self.touch();
    }

    /// Remove every player with `id`; returns how many were removed.
    pub fn remove(&mut self, id: &str) -> usize {
        let before = self.players.len();
        self.players.retain(|p| p.id != id);
        let removed = before - self.players.len();
        if removed > 0 {
            self.touch();
        }
        removed
    }

    pub fn replace_all(&mut self, players: Vec<Player>) {
        self.players = players;
        self.touch();
    }

    fn touch(&mut self) {
        self.version += 1;
        self.feed.notify(DataSource::Roster);
    }
}

impl RosterSource for Roster {
    fn players(&self) -> &[Player] {
        &self.players
    }

    fn source_id(&self) -> u64 {
        self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}
