//! Terminal rendering for competitions and sync outcomes.

use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use superliga_core::Competition;
use superliga_core::sync::SyncOutcome;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for Competition {
    fn render(&self) -> String {
        format!(
            "🏐 {} {}",
            self.name,
            format!(
                "({} → {})",
                self.start.format("%Y-%m-%d"),
                self.end.format("%Y-%m-%d")
            )
            .dimmed()
        )
    }
}

impl Render for SyncOutcome {
    fn render(&self) -> String {
        match self {
            SyncOutcome::NoMatchDays => format!(
                "   {}",
                "No match days returned by the schedule index".yellow()
            ),
            SyncOutcome::UpToDate => format!("   {}", "Already up to date".dimmed()),
            SyncOutcome::DryRun { windows } => {
                let mut lines = vec![format!(
                    "   Would perform {} weekly {}",
                    windows.len(),
                    pluralize("fetch", windows.len())
                )];
                lines.extend(windows.iter().map(|w| format!("   {} {}", "·".dimmed(), w)));
                lines.join("\n")
            }
            SyncOutcome::NoEvents => format!("   {}", "No events found".yellow()),
            SyncOutcome::Written {
                path,
                added,
                refreshed,
                total,
            } => {
                let mut summary = format!(
                    "   {} {} {}",
                    "+".green(),
                    added.green(),
                    format!("new {}", pluralize("event", *added)).green()
                );
                if *refreshed > 0 {
                    summary.push_str(&format!(
                        ", {} {}",
                        refreshed.yellow(),
                        "refreshed".yellow()
                    ));
                }
                format!(
                    "{}\n   {}",
                    summary,
                    format!("{} events in {}", total, path.display()).dimmed()
                )
            }
        }
    }
}

/// Label used in the selection prompt.
pub fn selection_label(competition: &Competition, has_calendar: bool, now: DateTime<Utc>) -> String {
    let mut label = competition.name.clone();
    if competition.is_active(now) {
        label.push_str(" [active]");
    }
    if has_calendar {
        label.push_str(" [calendar exists]");
    }
    label
}

fn pluralize(word: &str, count: usize) -> String {
    match (word, count) {
        (_, 1) => word.to_string(),
        ("fetch", _) => "fetches".to_string(),
        _ => format!("{}s", word),
    }
}
