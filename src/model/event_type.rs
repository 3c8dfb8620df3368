use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Training,
    Match,
    Meeting,
    #[default]
    #[serde(other)]
    Unknown,
}

impl EventType {
    /// The stored (JSON) name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Training => "training",
            EventType::Match => "match",
            EventType::Meeting => "meeting",
            EventType::Unknown => "unknown",
        }
    }

    /// Lenient counterpart of `as_str`: anything unrecognised is `Unknown`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "training" => EventType::Training,
            "match" => EventType::Match,
            "meeting" => EventType::Meeting,
            _ => EventType::Unknown,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventType::Training => "Training",
            EventType::Match => "Match",
            EventType::Meeting => "Meeting",
            EventType::Unknown => "Event",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrainingCategory {
    Physique,
    Tactique,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrainingLevel {
    A,
    B,
    C,
    D,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchType {
    Friendly,
    League,
    Tournament,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeetingType {
    General,
    Staff,
    Players,
}

/// A decoded `type` + `subType` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Training { category: TrainingCategory, level: TrainingLevel },
    Match(MatchType),
    Meeting(MeetingType),
}

impl EventKind {
    /// Decode a sub-type string for the given event type. Training sub-types are written
    /// `<category>-<level>`, e.g. `physique-A`.
    pub fn decode(event_type: EventType, sub_type: &str) -> Option<Self> {
        let sub_type = sub_type.trim();
        match event_type {
            EventType::Training => {
                let (category, level) = sub_type.split_once('-')?;
                Some(EventKind::Training { category: category.parse().ok()?, level: level.parse().ok()? })
            }
            EventType::Match => sub_type.parse().ok().map(EventKind::Match),
            EventType::Meeting => sub_type.parse().ok().map(EventKind::Meeting),
            EventType::Unknown => None,
        }
    }

    pub fn event_type(&self) -> EventType {
        match self {
            EventKind::Training { .. } => EventType::Training,
            EventKind::Match(_) => EventType::Match,
            EventKind::Meeting(_) => EventType::Meeting,
        }
    }

    /// The `subType` string this kind is stored as.
    pub fn sub_type(&self) -> String {
        match self {
            EventKind::Training { category, level } => format!("{category}-{level}"),
            EventKind::Match(m) => m.to_string(),
            EventKind::Meeting(m) => m.to_string(),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Training { category, level } => write!(f, "Training {category} {level}"),
            EventKind::Match(m) => write!(f, "{m} match"),
            EventKind::Meeting(m) => write!(f, "{m} meeting"),
        }
    }
}

// Sub-type names are matched case-insensitively; they are displayed the way the dashboard writes them.
macro_rules! named_variants {
    ($ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s.trim().eq_ignore_ascii_case($name) {
                        return Ok($ty::$variant);
                    }
                )+
                Err(format!("unknown {}: {}", stringify!($ty), s))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $($ty::$variant => f.write_str($name),)+
                }
            }
        }
    };
}

named_variants!(TrainingCategory { Physique => "physique", Tactique => "tactique" });
named_variants!(TrainingLevel { A => "A", B => "B", C => "C", D => "D" });
named_variants!(MatchType { Friendly => "Friendly", League => "League", Tournament => "Tournament" });
named_variants!(MeetingType { General => "General", Staff => "Staff", Players => "Players" });
