use serde::{Deserialize, Serialize};

/// A group derived from the roster, with its distinct subgroups in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub subgroups: Vec<String>,
    /// Number of roster players tagged with this group.
    pub member_count: usize,
}

impl Group {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), subgroups: Vec::new(), member_count: 0 }
    }

    pub fn has_subgroup(&self, subgroup: &str) -> bool {
        self.subgroups.iter().any(|s| s == subgroup)
    }
}
