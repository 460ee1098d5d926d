//! Reading and writing competition calendars (RFC 5545).

mod generate;
mod parse;

pub use generate::{CalendarMeta, generate_ics, write_calendar};
pub use parse::{ExistingCalendar, parse_calendar, read_calendar};
