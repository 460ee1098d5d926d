//! Core of superliga-cal: keeps one `.ics` file per Superliga competition
//! in step with the Volleyball World schedule API.
//!
//! - `api`: HTTP boundary (competitions, match days, schedules) with retries
//! - `plan`: which match days are new, grouped into 7-day fetch windows
//! - `merge`: combining fetched events with the persisted ones by UID
//! - `ics`: reading and writing the calendar files
//! - `sync`: one pass for one competition

pub mod api;
pub mod competition;
pub mod config;
pub mod error;
pub mod event;
pub mod ics;
pub mod merge;
pub mod plan;
pub mod sync;

pub use competition::Competition;
pub use error::{SuperligaError, SuperligaResult};
pub use event::MatchEvent;
