use thiserror::Error;

/// Errors raised around the calendar core: configuration, store mutations and iCalendar I/O.
/// Filtering and grid building never fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgendaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No event with id {0}")]
    UnknownEvent(String),

    #[error("An event with id {0} already exists")]
    DuplicateEvent(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("iCalendar error: {0}")]
    Ical(String),
}

pub type Result<T> = std::result::Result<T, AgendaError>;
