//! One sync pass for one competition: read, plan, fetch, merge, write.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::api::{ScheduleSource, Sleeper};
use crate::competition::Competition;
use crate::error::SuperligaResult;
use crate::event::{MatchEvent, events_from_schedule};
use crate::ics::{CalendarMeta, read_calendar, write_calendar};
use crate::merge::{ConflictPolicy, merge_events};
use crate::plan::{FetchWindow, plan};

#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Plan only; nothing is fetched or written.
    pub dry_run: bool,
    /// Pause between two window fetches.
    pub request_delay: Duration,
    pub conflict_policy: ConflictPolicy,
    /// Written as X-WR-TIMEZONE.
    pub timezone: String,
}

impl Default for SyncOptions {
    fn default() -> Self {
        SyncOptions {
            dry_run: false,
            request_delay: Duration::from_millis(500),
            conflict_policy: ConflictPolicy::default(),
            timezone: "America/Sao_Paulo".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// The match-day index returned nothing for any season year.
    NoMatchDays,
    /// No match day newer than the calendar's latest event.
    UpToDate,
    DryRun {
        windows: Vec<FetchWindow>,
    },
    /// Windows were fetched but there is nothing to persist.
    NoEvents,
    Written {
        path: PathBuf,
        added: usize,
        refreshed: usize,
        total: usize,
    },
}

pub async fn sync_competition<S, C>(
    source: &S,
    clock: &C,
    competition: &Competition,
    path: &Path,
    options: &SyncOptions,
) -> SuperligaResult<SyncOutcome>
where
    S: ScheduleSource,
    C: Sleeper,
{
    let existing = read_calendar(path);
    if let Some(latest) = existing.latest_start {
        info!(
            "Found existing calendar with events up to {}",
            latest.format("%Y-%m-%d")
        );
    }

    let mut match_days = Vec::new();
    for year in competition.season_years() {
        match_days.extend(source.match_days(&competition.tournament_id, year).await);
    }

    if match_days.is_empty() {
        warn!(
            "No match days found for {} in {:?}",
            competition,
            competition.season_years()
        );
        return Ok(SyncOutcome::NoMatchDays);
    }

    let windows = plan(&match_days, existing.latest_start);
    if windows.is_empty() {
        debug!("{} is up to date", competition);
        return Ok(SyncOutcome::UpToDate);
    }

    info!(
        "{}: {} fetch windows to cover new match days",
        competition,
        windows.len()
    );

    if options.dry_run {
        return Ok(SyncOutcome::DryRun { windows });
    }

    let mut fetched: Vec<MatchEvent> = Vec::new();
    for (i, window) in windows.iter().enumerate() {
        if i > 0 {
            clock.sleep(options.request_delay).await;
        }

        match source.schedule(&competition.tournament_id, *window).await {
            Some(schedule) => {
                let events = events_from_schedule(&schedule, competition);
                debug!("{}: {} matches", window, events.len());
                fetched.extend(events);
            }
            None => warn!("No schedule data for {} ({})", competition, window),
        }
    }

    let outcome = merge_events(existing.events, fetched, options.conflict_policy);
    if outcome.events.is_empty() {
        return Ok(SyncOutcome::NoEvents);
    }

    let meta = CalendarMeta::for_competition(competition, &options.timezone);
    write_calendar(path, &meta, &outcome.events)?;
    info!(
        "Added {} new events to {} ({} total)",
        outcome.added,
        path.display(),
        outcome.events.len()
    );

    Ok(SyncOutcome::Written {
        path: path.to_path_buf(),
        added: outcome.added,
        refreshed: outcome.refreshed,
        total: outcome.events.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{RawMatch, RawTeam, ScheduleResponse};
    use crate::competition::tests::competition;
    use crate::ics::read_calendar;
    use chrono::NaiveDate;
    use std::cell::RefCell;

    /// Serves a fixed set of matches; records every window asked for.
    struct FakeSource {
        days: Vec<NaiveDate>,
        matches: Vec<(NaiveDate, &'static str, &'static str)>,
        requested: RefCell<Vec<FetchWindow>>,
        fail_schedule: bool,
    }

    impl FakeSource {
        fn new(matches: Vec<(NaiveDate, &'static str, &'static str)>) -> Self {
            FakeSource {
                days: matches.iter().map(|(d, _, _)| *d).collect(),
                matches,
                requested: RefCell::new(Vec::new()),
                fail_schedule: false,
            }
        }
    }

    impl ScheduleSource for FakeSource {
        async fn match_days(&self, _tournament_id: &str, year: i32) -> Vec<NaiveDate> {
            use chrono::Datelike;
            self.days.iter().copied().filter(|d| d.year() == year).collect()
        }

        async fn schedule(&self, _tournament_id: &str, window: FetchWindow) -> Option<ScheduleResponse> {
            self.requested.borrow_mut().push(window);
            if self.fail_schedule {
                return None;
            }

            let matches = self
                .matches
                .iter()
                .filter(|(d, _, _)| window.contains(*d))
                .map(|(d, no, time)| RawMatch {
                    match_no: Some(no.to_string()),
                    team_a_no: Some("1".to_string()),
                    team_b_no: Some("2".to_string()),
                    match_date_utc: Some(format!("{}T{}Z", d.format("%Y-%m-%d"), time)),
                    city: Some("Saquarema".to_string()),
                })
                .collect();

            Some(ScheduleResponse {
                matches,
                all_teams: vec![
                    RawTeam {
                        no: Some("1".to_string()),
                        name: Some("Praia Clube".to_string()),
                    },
                    RawTeam {
                        no: Some("2".to_string()),
                        name: Some("Sesc Flamengo".to_string()),
                    },
                ],
            })
        }
    }

    #[derive(Default)]
    struct NoSleep {
        slept: RefCell<Vec<Duration>>,
    }

    impl Sleeper for NoSleep {
        async fn sleep(&self, duration: Duration) {
            self.slept.borrow_mut().push(duration);
        }
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        let year = if m >= 7 { 2025 } else { 2026 };
        NaiveDate::from_ymd_opt(year, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_first_run_fetches_windows_in_order_and_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cal.ics");
        let source = FakeSource::new(vec![
            (date(10, 18), "1", "22:00:00"),
            (date(10, 20), "2", "19:00:00"),
            (date(10, 30), "3", "21:30:00"),
            (date(1, 10), "4", "20:00:00"),
        ]);
        let clock = NoSleep::default();

        let outcome = sync_competition(&source, &clock, &competition(), &path, &SyncOptions::default())
            .await
            .unwrap();

        assert_eq!(
            outcome,
            SyncOutcome::Written {
                path: path.clone(),
                added: 4,
                refreshed: 0,
                total: 4
            }
        );
        assert_eq!(
            *source.requested.borrow(),
            vec![
                FetchWindow::starting(date(10, 18)),
                FetchWindow::starting(date(10, 30)),
                FetchWindow::starting(date(1, 10)),
            ]
        );
        // Delay between fetches, not before the first
        assert_eq!(clock.slept.borrow().len(), 2);
        assert_eq!(read_calendar(&path).events.len(), 4);
    }

    #[tokio::test]
    async fn test_second_run_is_up_to_date() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cal.ics");
        let source = FakeSource::new(vec![(date(10, 18), "1", "22:00:00"), (date(11, 2), "2", "19:00:00")]);
        let clock = NoSleep::default();
        let options = SyncOptions::default();

        sync_competition(&source, &clock, &competition(), &path, &options)
            .await
            .unwrap();
        let before = std::fs::read_to_string(&path).unwrap();
        source.requested.borrow_mut().clear();

        let outcome = sync_competition(&source, &clock, &competition(), &path, &options)
            .await
            .unwrap();

        assert_eq!(outcome, SyncOutcome::UpToDate);
        assert!(source.requested.borrow().is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn test_incremental_run_only_fetches_newer_days() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cal.ics");
        let clock = NoSleep::default();
        let options = SyncOptions::default();

        let first = FakeSource::new(vec![(date(10, 18), "1", "22:00:00")]);
        sync_competition(&first, &clock, &competition(), &path, &options)
            .await
            .unwrap();

        let second = FakeSource::new(vec![
            (date(10, 18), "1", "22:00:00"),
            (date(11, 8), "2", "19:00:00"),
        ]);
        let outcome = sync_competition(&second, &clock, &competition(), &path, &options)
            .await
            .unwrap();

        assert_eq!(*second.requested.borrow(), vec![FetchWindow::starting(date(11, 8))]);
        match outcome {
            SyncOutcome::Written { added, total, .. } => {
                assert_eq!(added, 1);
                assert_eq!(total, 2);
            }
            other => panic!("Expected Written, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_dry_run_plans_without_fetching() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cal.ics");
        let source = FakeSource::new(vec![(date(10, 18), "1", "22:00:00")]);
        let options = SyncOptions {
            dry_run: true,
            ..SyncOptions::default()
        };

        let outcome = sync_competition(&source, &NoSleep::default(), &competition(), &path, &options)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            SyncOutcome::DryRun {
                windows: vec![FetchWindow::starting(date(10, 18))]
            }
        );
        assert!(source.requested.borrow().is_empty());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_no_match_days_means_no_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cal.ics");
        let source = FakeSource::new(vec![]);

        let outcome = sync_competition(
            &source,
            &NoSleep::default(),
            &competition(),
            &path,
            &SyncOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(outcome, SyncOutcome::NoMatchDays);
        assert!(source.requested.borrow().is_empty());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_empty_index_is_not_reported_as_up_to_date() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cal.ics");
        let clock = NoSleep::default();
        let options = SyncOptions::default();

        let first = FakeSource::new(vec![(date(10, 18), "1", "22:00:00")]);
        sync_competition(&first, &clock, &competition(), &path, &options)
            .await
            .unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        let outcome = sync_competition(&FakeSource::new(vec![]), &clock, &competition(), &path, &options)
            .await
            .unwrap();

        assert_eq!(outcome, SyncOutcome::NoMatchDays);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn test_failed_fetches_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cal.ics");
        let mut source = FakeSource::new(vec![(date(10, 18), "1", "22:00:00")]);
        source.fail_schedule = true;

        let outcome = sync_competition(
            &source,
            &NoSleep::default(),
            &competition(),
            &path,
            &SyncOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(outcome, SyncOutcome::NoEvents);
        assert!(!path.exists());
    }
}
