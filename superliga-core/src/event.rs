//! Match events as they are written to and read from calendars.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use tracing::warn;

use crate::api::types::{RawMatch, ScheduleResponse};
use crate::competition::Competition;
use crate::error::{SuperligaError, SuperligaResult};

/// Matches have no published end time; assume this long.
pub const MATCH_DURATION_HOURS: i64 = 2;

pub const UNKNOWN_TEAM: &str = "N/A";
pub const UNKNOWN_LOCATION: &str = "Local Desconhecido";

/// One scheduled match.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchEvent {
    /// Stable across reschedules: built from the competition slug and match number only.
    pub uid: String,
    pub summary: String,
    pub description: String,
    pub location: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl MatchEvent {
    pub fn uid_for(competition: &Competition, match_no: &str) -> String {
        format!("volleyballworld-{}-{}", competition.slug, match_no)
    }

    /// Build an event from an API match record. Records without a match
    /// number or a usable timestamp are rejected.
    pub fn from_match(
        record: &RawMatch,
        teams: &HashMap<String, String>,
        competition: &Competition,
    ) -> SuperligaResult<Self> {
        let match_no = record
            .match_no
            .as_deref()
            .ok_or_else(|| SuperligaError::InvalidMatch("missing match number".into()))?;

        let timestamp = record.match_date_utc.as_deref().ok_or_else(|| {
            SuperligaError::InvalidMatch(format!("match {match_no}: no match time provided"))
        })?;

        let start = parse_utc(timestamp).ok_or_else(|| {
            SuperligaError::InvalidMatch(format!("match {match_no}: bad timestamp '{timestamp}'"))
        })?;

        let team_name = |no: Option<&String>| {
            no.and_then(|n| teams.get(n))
                .map(String::as_str)
                .unwrap_or(UNKNOWN_TEAM)
                .to_string()
        };
        let home = team_name(record.team_a_no.as_ref());
        let away = team_name(record.team_b_no.as_ref());

        let location = record
            .city
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(UNKNOWN_LOCATION)
            .to_string();

        Ok(MatchEvent {
            uid: Self::uid_for(competition, match_no),
            summary: format!("{} x {} - {}", home, away, competition.name),
            description: format!("{} - Match ID: {}", competition.name, match_no),
            location,
            start,
            end: start + Duration::hours(MATCH_DURATION_HOURS),
        })
    }
}

impl fmt::Display for MatchEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.summary)
    }
}

/// Convert every usable match in a schedule response, skipping the rest.
pub fn events_from_schedule(schedule: &ScheduleResponse, competition: &Competition) -> Vec<MatchEvent> {
    let teams = schedule.team_names();

    schedule
        .matches
        .iter()
        .filter_map(|record| match MatchEvent::from_match(record, &teams, competition) {
            Ok(event) => Some(event),
            Err(e) => {
                warn!("Skipping match: {}", e);
                None
            }
        })
        .collect()
}

/// Parse an API timestamp. Values without an offset are taken as UTC.
pub(crate) fn parse_utc(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::competition::tests::competition;
    use chrono::TimeZone;

    fn teams() -> HashMap<String, String> {
        HashMap::from([
            ("1".to_string(), "Sada Cruzeiro".to_string()),
            ("2".to_string(), "Itambé Minas".to_string()),
        ])
    }

    fn record(no: &str, when: Option<&str>) -> RawMatch {
        RawMatch {
            match_no: Some(no.to_string()),
            team_a_no: Some("1".to_string()),
            team_b_no: Some("2".to_string()),
            match_date_utc: when.map(str::to_string),
            city: Some("Contagem".to_string()),
        }
    }

    #[test]
    fn test_from_match_builds_fields() {
        let comp = competition();
        let event =
            MatchEvent::from_match(&record("42", Some("2025-10-18T22:00:00Z")), &teams(), &comp)
                .unwrap();

        assert_eq!(event.uid, "volleyballworld-superliga-masculina-42");
        assert_eq!(
            event.summary,
            "Sada Cruzeiro x Itambé Minas - Superliga Masculina 2025-2026"
        );
        assert_eq!(event.description, "Superliga Masculina 2025-2026 - Match ID: 42");
        assert_eq!(event.location, "Contagem");
        assert_eq!(event.start, Utc.with_ymd_and_hms(2025, 10, 18, 22, 0, 0).unwrap());
        assert_eq!(event.end, Utc.with_ymd_and_hms(2025, 10, 19, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_uid_ignores_match_time() {
        let comp = competition();
        let before =
            MatchEvent::from_match(&record("7", Some("2025-10-18T22:00:00Z")), &teams(), &comp)
                .unwrap();
        let after =
            MatchEvent::from_match(&record("7", Some("2025-10-25T19:00:00Z")), &teams(), &comp)
                .unwrap();

        assert_eq!(before.uid, after.uid);
        assert_ne!(before.start, after.start);
    }

    #[test]
    fn test_missing_time_rejected() {
        let comp = competition();
        let result = MatchEvent::from_match(&record("9", None), &teams(), &comp);
        assert!(matches!(result, Err(SuperligaError::InvalidMatch(_))));
    }

    #[test]
    fn test_unknown_teams_and_city() {
        let comp = competition();
        let raw = RawMatch {
            match_no: Some("3".to_string()),
            team_a_no: Some("99".to_string()),
            team_b_no: None,
            match_date_utc: Some("2025-11-01T18:30:00Z".to_string()),
            city: None,
        };

        let event = MatchEvent::from_match(&raw, &teams(), &comp).unwrap();
        assert!(event.summary.starts_with("N/A x N/A"));
        assert_eq!(event.location, UNKNOWN_LOCATION);
    }

    #[test]
    fn test_schedule_skips_bad_records() {
        let comp = competition();
        let schedule = ScheduleResponse {
            matches: vec![
                record("1", Some("2025-10-18T22:00:00Z")),
                record("2", None),
                record("3", Some("garbage")),
                record("4", Some("2025-10-19T20:00:00")),
            ],
            all_teams: vec![],
        };

        let events = events_from_schedule(&schedule, &comp);
        let uids: Vec<_> = events.iter().map(|e| e.uid.as_str()).collect();
        assert_eq!(
            uids,
            vec![
                "volleyballworld-superliga-masculina-1",
                "volleyballworld-superliga-masculina-4"
            ]
        );
    }

    #[test]
    fn test_parse_utc_variants() {
        let expected = Utc.with_ymd_and_hms(2025, 10, 18, 22, 0, 0).unwrap();
        assert_eq!(parse_utc("2025-10-18T22:00:00Z"), Some(expected));
        assert_eq!(parse_utc("2025-10-18T19:00:00-03:00"), Some(expected));
        assert_eq!(parse_utc("2025-10-18T22:00:00"), Some(expected));
        assert_eq!(parse_utc("18/10/2025"), None);
    }
}
