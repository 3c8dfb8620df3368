pub mod agenda;
pub mod config;
pub mod error;
pub mod filter;
pub mod grid;
pub mod handler;
pub mod ical;
pub mod model;
pub mod roster;
pub mod store;

pub use agenda::{Agenda, Role};
pub use error::{AgendaError, Result};
pub use filter::GroupFilter;
pub use grid::{CalendarGrid, WeekStart};
