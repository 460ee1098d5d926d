use std::io::IsTerminal;
use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use dialoguer::MultiSelect;
use owo_colors::OwoColorize;
use superliga_core::Competition;
use superliga_core::api::{TokioSleeper, VolleyballWorldClient};
use superliga_core::config::Settings;
use superliga_core::merge::ConflictPolicy;
use superliga_core::sync::{SyncOptions, SyncOutcome, sync_competition};

use crate::render::{Render, selection_label};
use crate::utils::tui;

pub struct SyncArgs {
    pub dry_run: bool,
    pub update_existing: bool,
    pub refresh: bool,
    pub all: bool,
    pub year: Option<i32>,
}

pub async fn run(client: &VolleyballWorldClient, settings: &Settings, args: SyncArgs) -> Result<()> {
    if args.dry_run {
        println!("{}\n", "Dry run: nothing will be fetched or written".yellow());
    }

    let competitions = super::discover(client, settings, args.year).await?;
    let output_dir = settings.output_path();

    let selected = if args.update_existing {
        with_existing_calendar(competitions, &output_dir)
    } else {
        select_competitions(competitions, settings, args.all)?
    };

    if selected.is_empty() {
        println!("No competitions to update.");
        return Ok(());
    }

    let options = SyncOptions {
        dry_run: args.dry_run,
        request_delay: settings.request_delay(),
        conflict_policy: if args.refresh {
            ConflictPolicy::PreferFetched
        } else {
            ConflictPolicy::KeepExisting
        },
        timezone: settings.timezone.clone(),
    };

    let mut total_added = 0;
    let mut total_refreshed = 0;

    for (i, comp) in selected.iter().enumerate() {
        let path = comp.calendar_path(&output_dir);

        let spinner = tui::create_spinner(comp.render());
        let result = sync_competition(client, &TokioSleeper, comp, &path, &options).await;
        spinner.finish_and_clear();

        println!("{}", comp.render());

        match result {
            Ok(outcome) => {
                println!("{}", outcome.render());
                if let SyncOutcome::Written {
                    added, refreshed, ..
                } = outcome
                {
                    total_added += added;
                    total_refreshed += refreshed;
                }
            }
            Err(e) => println!("   {}", e.to_string().red()),
        }

        if i < selected.len() - 1 {
            println!();
        }
    }

    if total_added > 0 || total_refreshed > 0 {
        println!(
            "\nAdded {} new events, refreshed {}. Calendars are in {}",
            total_added,
            total_refreshed,
            output_dir.display()
        );
    }

    Ok(())
}

/// Competitions that already have a calendar file under `output_dir`.
fn with_existing_calendar(competitions: Vec<Competition>, output_dir: &Path) -> Vec<Competition> {
    competitions
        .into_iter()
        .filter(|c| c.calendar_path(output_dir).exists())
        .collect()
}

/// Ask which competitions to sync. Active ones (or all, with `--all`) are
/// offered, pre-selected. Without a terminal the whole offer is taken.
fn select_competitions(
    competitions: Vec<Competition>,
    settings: &Settings,
    all: bool,
) -> Result<Vec<Competition>> {
    let now = Utc::now();
    let output_dir = settings.output_path();

    let offered: Vec<Competition> = competitions
        .into_iter()
        .filter(|c| all || c.is_active(now))
        .collect();

    if offered.is_empty() {
        println!("No active Superliga season found for the current date.");
        return Ok(offered);
    }

    if !std::io::stdin().is_terminal() {
        return Ok(offered);
    }

    let items: Vec<String> = offered
        .iter()
        .map(|c| selection_label(c, c.calendar_path(&output_dir).exists(), now))
        .collect();
    let defaults = vec![true; items.len()];

    let selections = MultiSelect::new()
        .with_prompt("Select competitions to sync (space to toggle, enter to confirm)")
        .items(&items)
        .defaults(&defaults)
        .interact()?;

    Ok(offered
        .into_iter()
        .enumerate()
        .filter(|(i, _)| selections.contains(i))
        .map(|(_, c)| c)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn competition(tournament_id: &str, slug: &str) -> Competition {
        Competition {
            tournament_id: tournament_id.to_string(),
            name: format!("{slug} 2025-2026"),
            slug: slug.to_string(),
            season: "2025".to_string(),
            start: Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_update_existing_keeps_only_competitions_with_calendars() {
        let dir = tempfile::tempdir().unwrap();
        let men = competition("1539", "superliga-masculina");
        let women = competition("1540", "superliga-feminina");

        let path = women.calendar_path(dir.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n").unwrap();

        let kept = with_existing_calendar(vec![men, women], dir.path());

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].tournament_id, "1540");
    }

    #[test]
    fn test_update_existing_with_empty_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let kept = with_existing_calendar(vec![competition("1539", "superliga-masculina")], dir.path());
        assert!(kept.is_empty());
    }
}
