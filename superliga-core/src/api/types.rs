//! Wire types for the Volleyball World API.
//!
//! Everything here mirrors the JSON bodies loosely: every field is optional
//! and identifiers may arrive as numbers or strings. Validation happens when
//! these are turned into [`Competition`](crate::competition::Competition)
//! and [`MatchEvent`](crate::event::MatchEvent).

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

#[derive(Debug, Default, Deserialize)]
pub struct CompetitionsResponse {
    #[serde(default)]
    pub competitions: Vec<RawCompetition>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCompetition {
    pub competition_short_name: Option<String>,
    #[serde(default, deserialize_with = "id_string")]
    pub season: Option<String>,
    #[serde(default, deserialize_with = "id_string")]
    pub men_tournaments: Option<String>,
    #[serde(default, deserialize_with = "id_string")]
    pub women_tournaments: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDaysResponse {
    #[serde(default)]
    pub match_days: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    #[serde(default)]
    pub matches: Vec<RawMatch>,
    #[serde(default)]
    pub all_teams: Vec<RawTeam>,
}

impl ScheduleResponse {
    /// Team number → team name lookup.
    pub fn team_names(&self) -> HashMap<String, String> {
        self.all_teams
            .iter()
            .filter_map(|t| Some((t.no.clone()?, t.name.clone()?)))
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMatch {
    #[serde(default, deserialize_with = "id_string")]
    pub match_no: Option<String>,
    #[serde(default, deserialize_with = "id_string")]
    pub team_a_no: Option<String>,
    #[serde(default, deserialize_with = "id_string")]
    pub team_b_no: Option<String>,
    pub match_date_utc: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTeam {
    #[serde(default, deserialize_with = "id_string")]
    pub no: Option<String>,
    pub name: Option<String>,
}

/// Accept `123`, `"123"` or `null` for identifier-like fields.
fn id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Int(i64),
        Float(f64),
        Str(String),
    }

    Ok(match Option::<Id>::deserialize(deserializer)? {
        Some(Id::Int(n)) => Some(n.to_string()),
        Some(Id::Float(f)) => Some(f.to_string()),
        Some(Id::Str(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    })
}
