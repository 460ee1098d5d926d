//! ICS file generation.

use std::path::Path;

use chrono::Utc;
use icalendar::{Calendar, Component, EventLike, Property};
use tracing::debug;

use crate::competition::Competition;
use crate::error::SuperligaResult;
use crate::event::MatchEvent;

/// Calendar-level properties.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarMeta {
    pub product_id: String,
    pub name: String,
    pub timezone: String,
}

impl CalendarMeta {
    pub fn for_competition(competition: &Competition, timezone: &str) -> Self {
        CalendarMeta {
            product_id: format!("-//Volleyball World {} Calendar//EN", competition.name),
            name: competition.name.clone(),
            timezone: timezone.to_string(),
        }
    }
}

fn format_utc(dt: &chrono::DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Generate the full calendar document for `events`.
pub fn generate_ics(meta: &CalendarMeta, events: &[MatchEvent]) -> String {
    let mut cal = Calendar::new();
    cal.append_property(Property::new("X-WR-CALNAME", &meta.name));
    cal.append_property(Property::new("X-WR-TIMEZONE", &meta.timezone));

    let dtstamp = format_utc(&Utc::now());

    for event in events {
        let mut ics_event = icalendar::Event::new();
        ics_event.uid(&event.uid);
        ics_event.summary(&event.summary);
        ics_event.add_property("DTSTART", format_utc(&event.start));
        ics_event.add_property("DTEND", format_utc(&event.end));
        ics_event.location(&event.location);
        ics_event.description(&event.description);
        ics_event.add_property("DTSTAMP", &dtstamp);
        cal.push(ics_event.done());
    }

    let cal = cal.done();
    replace_prodid(&cal.to_string(), &meta.product_id)
}

/// The icalendar crate always stamps its own PRODID; swap in ours.
fn replace_prodid(ics: &str, product_id: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            fold_line(&format!("PRODID:{product_id}"), &mut result);
        } else {
            result.push_str(line);
            result.push_str("\r\n");
        }
    }

    result
}

/// Content lines are limited to 75 octets; continuations start with a space.
fn fold_line(line: &str, out: &mut String) {
    const MAX_OCTETS: usize = 75;

    let mut limit = MAX_OCTETS;
    let mut current = 0;
    for ch in line.chars() {
        if current + ch.len_utf8() > limit {
            out.push_str("\r\n ");
            current = 0;
            limit = MAX_OCTETS - 1;
        }
        out.push(ch);
        current += ch.len_utf8();
    }
    out.push_str("\r\n");
}

/// Replace the calendar at `path` with `events`, creating parent
/// directories. Written to a sibling temp file first, then renamed.
pub fn write_calendar(path: &Path, meta: &CalendarMeta, events: &[MatchEvent]) -> SuperligaResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = generate_ics(meta, events);
    let tmp_path = path.with_extension("ics.tmp");
    std::fs::write(&tmp_path, content)?;
    std::fs::rename(&tmp_path, path)?;

    debug!("Wrote {} events to {}", events.len(), path.display());
    Ok(())
}
