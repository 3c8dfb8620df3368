use tracing::{debug, instrument};

use crate::model::group::Group;
use crate::model::player::Player;
use crate::store::Snapshot;

/// Derive the distinct groups of a roster, each with its distinct non-empty subgroups, in
/// first-seen order. Players without a group are skipped entirely.
#[instrument(level = "debug", skip(players), fields(roster = players.len()))]
pub fn derive_groups(players: &[Player]) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();

    for player in players {
        let Some(group_id) = player.group() else {
            continue;
        };

        // Rosters are a few hundred players at most; a linear scan keeps first-seen order.
        let idx = match groups.iter().position(|g| g.id == group_id) {
            Some(idx) => idx,
            None => {
                groups.push(Group::new(group_id));
                groups.len() - 1
            }
        };
        let group = &mut groups[idx];
        group.member_count += 1;

        if let Some(subgroup) = player.subgroup() {
            if !group.has_subgroup(subgroup) {
                group.subgroups.push(subgroup.to_string());
            }
        }
    }

    debug!(groups = groups.len(), "Derived groups from roster");
    groups
}

/// Memo of `derive_groups` keyed by roster snapshot. Recomputes when the roster instance or
/// its version changes.
#[derive(Debug, Default, Clone)]
pub struct GroupCache {
    snapshot: Option<Snapshot>,
    groups: Vec<Group>,
}

impl GroupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups for the roster state identified by `snapshot`.
    pub fn get(&mut self, snapshot: Snapshot, players: &[Player]) -> &[Group] {
        if self.snapshot != Some(snapshot) {
            self.groups = derive_groups(players);
            self.snapshot = Some(snapshot);
        }
        &self.groups
    }

    /// Last derived groups, without checking freshness.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        self.snapshot
    }

    pub fn invalidate(&mut self) {
        self.snapshot = None;
    }
}
