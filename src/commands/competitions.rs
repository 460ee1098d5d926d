use anyhow::Result;
use chrono::Utc;
use owo_colors::OwoColorize;
use superliga_core::api::VolleyballWorldClient;
use superliga_core::config::Settings;

use crate::render::Render;

pub async fn run(client: &VolleyballWorldClient, settings: &Settings, year: Option<i32>) -> Result<()> {
    let competitions = super::discover(client, settings, year).await?;
    let output_dir = settings.output_path();
    let now = Utc::now();

    for comp in &competitions {
        let path = comp.calendar_path(&output_dir);
        let status = match (comp.is_active(now), path.exists()) {
            (true, true) => "active, calendar exists".green().to_string(),
            (true, false) => "active, no calendar yet".yellow().to_string(),
            (false, true) => "calendar exists".dimmed().to_string(),
            (false, false) => "inactive".dimmed().to_string(),
        };

        println!("{}", comp.render());
        println!("   {} {}", status, path.display().dimmed());
    }

    Ok(())
}
