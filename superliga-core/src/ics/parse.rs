//! Reading a previously written calendar back into events.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use icalendar::parser::{Component, read_calendar as read_ical, unfold};
use icalendar::{CalendarDateTime, DatePerhapsTime};
use tracing::{debug, warn};

use crate::error::{SuperligaError, SuperligaResult};
use crate::event::{MATCH_DURATION_HOURS, MatchEvent};

/// Events already persisted for a competition.
#[derive(Debug, Default, Clone)]
pub struct ExistingCalendar {
    pub events: HashMap<String, MatchEvent>,
    /// Latest start over `events`, in UTC.
    pub latest_start: Option<DateTime<Utc>>,
}

impl ExistingCalendar {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn from_events(events: impl IntoIterator<Item = MatchEvent>) -> Self {
        let events: HashMap<String, MatchEvent> =
            events.into_iter().map(|e| (e.uid.clone(), e)).collect();
        let latest_start = events.values().map(|e| e.start).max();

        ExistingCalendar {
            events,
            latest_start,
        }
    }
}

/// Read the calendar at `path`. A missing, unreadable or malformed file is
/// an empty calendar; the caller simply fetches everything again.
pub fn read_calendar(path: &Path) -> ExistingCalendar {
    if !path.exists() {
        return ExistingCalendar::default();
    }

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!(
                "Could not read existing calendar {}, it will be rebuilt: {}",
                path.display(),
                e
            );
            return ExistingCalendar::default();
        }
    };

    match parse_calendar(&content) {
        Ok(calendar) => calendar,
        Err(e) => {
            warn!(
                "Could not parse existing calendar {}, it will be rebuilt: {}",
                path.display(),
                e
            );
            ExistingCalendar::default()
        }
    }
}

pub fn parse_calendar(content: &str) -> SuperligaResult<ExistingCalendar> {
    let unfolded = unfold(content);
    let calendar = read_ical(&unfolded).map_err(|e| SuperligaError::IcsParse(e.to_string()))?;

    let events = calendar
        .components
        .iter()
        .filter(|c| c.name == "VEVENT")
        .filter_map(parse_vevent);

    Ok(ExistingCalendar::from_events(events))
}

fn parse_vevent(vevent: &Component) -> Option<MatchEvent> {
    let uid = vevent
        .find_prop("UID")
        .map(|p| p.val.as_ref().trim().to_string())
        .filter(|uid| !uid.is_empty());
    let Some(uid) = uid else {
        debug!("Dropping event without UID");
        return None;
    };

    let Some(start) = vevent
        .find_prop("DTSTART")
        .and_then(|p| DatePerhapsTime::try_from(p).ok())
        .map(to_utc)
    else {
        warn!("Dropping stored event {} without a usable DTSTART", uid);
        return None;
    };

    let end = vevent
        .find_prop("DTEND")
        .and_then(|p| DatePerhapsTime::try_from(p).ok())
        .map(to_utc)
        .unwrap_or_else(|| start + Duration::hours(MATCH_DURATION_HOURS));

    let text = |name: &str| {
        vevent
            .find_prop(name)
            .map(|p| p.val.to_string())
            .unwrap_or_default()
    };

    Some(MatchEvent {
        summary: text("SUMMARY"),
        description: text("DESCRIPTION"),
        location: text("LOCATION"),
        uid,
        start,
        end,
    })
}

/// Normalize any DTSTART/DTEND form to UTC. Floating times and unknown
/// zones are taken as UTC; dates become midnight UTC.
fn to_utc(dpt: DatePerhapsTime) -> DateTime<Utc> {
    match dpt {
        DatePerhapsTime::Date(d) => d.and_time(NaiveTime::MIN).and_utc(),
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(dt)) => dt,
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(naive)) => naive.and_utc(),
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, tzid }) => {
            match tzid.parse::<chrono_tz::Tz>() {
                Ok(tz) => tz
                    .from_local_datetime(&date_time)
                    .earliest()
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|| date_time.and_utc()),
                Err(_) => {
                    warn!("Unknown timezone '{}', treating as UTC", tzid);
                    date_time.and_utc()
                }
            }
        }
    }
}
