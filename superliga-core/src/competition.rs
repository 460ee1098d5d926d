//! Competitions (one league season) discovered from the API listing.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Utc};
use tracing::warn;

use crate::api::types::RawCompetition;
use crate::config::{Division, League};
use crate::error::{SuperligaError, SuperligaResult};
use crate::event::parse_utc;

#[derive(Debug, Clone, PartialEq)]
pub struct Competition {
    pub tournament_id: String,
    /// e.g. "Superliga Masculina 2025-2026"
    pub name: String,
    /// File-name and UID safe, stable across seasons.
    pub slug: String,
    pub season: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Competition {
    pub fn from_raw(raw: &RawCompetition, league: &League) -> SuperligaResult<Self> {
        let tournament_id = match league.division {
            Division::Men => raw.men_tournaments.clone(),
            Division::Women => raw.women_tournaments.clone(),
        }
        .ok_or_else(|| {
            SuperligaError::InvalidCompetition(format!(
                "{}: tournament id not found",
                league.short_name
            ))
        })?;

        let season = raw
            .season
            .clone()
            .unwrap_or_else(|| "UnknownSeason".to_string());

        let start = raw
            .start_date
            .as_deref()
            .and_then(parse_utc)
            .ok_or_else(|| {
                SuperligaError::InvalidCompetition(format!("{}: missing start date", league.short_name))
            })?;
        let end = raw.end_date.as_deref().and_then(parse_utc).ok_or_else(|| {
            SuperligaError::InvalidCompetition(format!("{}: missing end date", league.short_name))
        })?;

        if start > end {
            return Err(SuperligaError::InvalidCompetition(format!(
                "{}: starts {} after it ends {}",
                league.short_name, start, end
            )));
        }

        let name = match season.parse::<i32>() {
            Ok(year) => format!("{} {}-{}", league.display_name, year, year + 1),
            Err(_) => format!("{} {}", league.display_name, season),
        };

        Ok(Competition {
            tournament_id,
            name,
            slug: slug::slugify(&league.short_name),
            season,
            start,
            end,
        })
    }

    /// Keep the listing entries belonging to tracked leagues.
    pub fn from_listing(listing: &[RawCompetition], leagues: &[League]) -> Vec<Competition> {
        listing
            .iter()
            .filter_map(|raw| {
                let short_name = raw.competition_short_name.as_deref()?;
                let league = leagues.iter().find(|l| l.short_name == short_name)?;
                match Competition::from_raw(raw, league) {
                    Ok(comp) => Some(comp),
                    Err(e) => {
                        warn!("Skipping competition: {}", e);
                        None
                    }
                }
            })
            .collect()
    }

    /// Every calendar year the season touches.
    pub fn season_years(&self) -> Vec<i32> {
        (self.start.year()..=self.end.year()).collect()
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.start <= now && now <= self.end
    }

    /// `{output_dir}/{start year}-{end year}/{slug}.ics`
    pub fn calendar_path(&self, output_dir: &Path) -> PathBuf {
        output_dir
            .join(format!("{}-{}", self.start.year(), self.end.year()))
            .join(format!("{}.ics", self.slug))
    }
}

impl fmt::Display for Competition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
