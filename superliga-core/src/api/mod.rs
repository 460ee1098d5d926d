//! Volleyball World API boundary.
//!
//! The sync core only sees [`ScheduleSource`]; [`VolleyballWorldClient`] is
//! the HTTP implementation used by the CLI.

mod client;
mod retry;
pub mod types;

pub use client::{ApiConfig, VolleyballWorldClient};
pub use retry::{RetryPolicy, Sleeper, TokioSleeper};

use std::future::Future;

use chrono::NaiveDate;

use crate::plan::FetchWindow;
use types::ScheduleResponse;

/// Where match days and schedules come from.
///
/// Failures are absorbed by the implementation: an unreachable index is an
/// empty list, an unreachable schedule is `None`.
pub trait ScheduleSource {
    fn match_days(&self, tournament_id: &str, year: i32) -> impl Future<Output = Vec<NaiveDate>>;

    fn schedule(
        &self,
        tournament_id: &str,
        window: FetchWindow,
    ) -> impl Future<Output = Option<ScheduleResponse>>;
}
