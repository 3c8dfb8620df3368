use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::model::event::Event;

/// Group and subgroup selections from the agenda's filter chips.
///
/// Within one dimension an event matches if it references any selected id. When both
/// dimensions have a selection the event must match both; it is a narrowing filter.
/// An event with no assignments never matches an active dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupFilter {
    #[serde(default)]
    pub groups: HashSet<String>,
    #[serde(default)]
    pub subgroups: HashSet<String>,
}

impl GroupFilter {
    pub fn new<G, S>(groups: G, subgroups: S) -> Self
    where
        G: IntoIterator,
        G::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            groups: groups.into_iter().map(Into::into).collect(),
            subgroups: subgroups.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.subgroups.is_empty()
    }

    /// Flip a group chip on or off.
    pub fn toggle_group(&mut self, group: &str) {
        if !self.groups.remove(group) {
            self.groups.insert(group.to_string());
        }
    }

    pub fn toggle_subgroup(&mut self, subgroup: &str) {
        if !self.subgroups.remove(subgroup) {
            self.subgroups.insert(subgroup.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.groups.clear();
        self.subgroups.clear();
    }

    pub fn matches(&self, event: &Event) -> bool {
        let group_ok = self.groups.is_empty() || intersects(&self.groups, &event.assigned_groups);
        let subgroup_ok = self.subgroups.is_empty() || intersects(&self.subgroups, &event.assigned_subgroups);
        group_ok && subgroup_ok
    }

    /// The events passing this filter, in their original order.
    #[instrument(level = "debug", skip_all, fields(events = events.len(), groups = self.groups.len(), subgroups = self.subgroups.len()))]
    pub fn apply(&self, events: &[Event]) -> Vec<Event> {
        if self.is_empty() {
            return events.to_vec();
        }
        let filtered: Vec<Event> = events.iter().filter(|e| self.matches(e)).cloned().collect();
        debug!(kept = filtered.len(), "Filtered events");
        filtered
    }
}

fn intersects(selected: &HashSet<String>, assigned: &[String]) -> bool {
    assigned.iter().any(|a| selected.contains(a))
}
