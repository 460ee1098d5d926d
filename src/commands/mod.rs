pub mod competitions;
pub mod sync;

use anyhow::Result;
use chrono::{Datelike, Utc};
use superliga_core::api::VolleyballWorldClient;
use superliga_core::config::Settings;
use superliga_core::{Competition, SuperligaError};

use crate::render::Render;
use crate::utils::tui;

/// Fetch the competitions listing. Finding none ends the run.
pub async fn discover(
    client: &VolleyballWorldClient,
    settings: &Settings,
    year: Option<i32>,
) -> Result<Vec<Competition>> {
    let year = year.unwrap_or_else(|| Utc::now().year());

    let spinner = tui::create_spinner(format!("Fetching competitions for {}", year));
    let competitions = client.competitions(year, &settings.leagues).await;
    spinner.finish_and_clear();

    if competitions.is_empty() {
        return Err(SuperligaError::NoCompetitions(year).into());
    }

    for comp in &competitions {
        tracing::debug!("Discovered {}", comp.render());
    }

    Ok(competitions)
}
