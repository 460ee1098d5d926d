//! Deciding which match days still need fetching, and in which windows.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Days covered by one schedule query, inclusive on both ends.
pub const WINDOW_DAYS: i64 = 7;

/// A contiguous 7-day date range queried in one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FetchWindow {
    pub fn starting(start: NaiveDate) -> Self {
        FetchWindow {
            start,
            end: start + Duration::days(WINDOW_DAYS - 1),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for FetchWindow {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} → {}", self.start, self.end)
    }
}

/// Keep match days strictly after the date of `latest`.
pub fn filter_new_match_days(days: &[NaiveDate], latest: Option<DateTime<Utc>>) -> Vec<NaiveDate> {
    match latest {
        Some(latest) => {
            let cutoff = latest.date_naive();
            days.iter().copied().filter(|d| *d > cutoff).collect()
        }
        None => days.to_vec(),
    }
}

/// Greedily cover `days` with 7-day windows, earliest first.
pub fn plan_windows(days: &[NaiveDate]) -> Vec<FetchWindow> {
    let mut remaining = days.to_vec();
    remaining.sort_unstable();
    remaining.dedup();

    let mut windows: Vec<FetchWindow> = Vec::new();
    for day in remaining {
        if windows.last().is_some_and(|w| w.contains(day)) {
            continue;
        }
        windows.push(FetchWindow::starting(day));
    }

    windows
}

/// Windows still worth querying given the latest event already on disk.
pub fn plan(days: &[NaiveDate], latest: Option<DateTime<Utc>>) -> Vec<FetchWindow> {
    plan_windows(&filter_new_match_days(days, latest))
}
