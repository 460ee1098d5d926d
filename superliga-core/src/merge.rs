//! Combining freshly fetched events with the ones already on disk.

use std::collections::{HashMap, HashSet};

use crate::event::MatchEvent;

/// What to do when a fetched event's UID is already stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Stored copy wins, the fetched one is discarded.
    #[default]
    KeepExisting,
    /// Fetched copy replaces the stored one when they differ.
    PreferFetched,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    /// Sorted by start time, then UID.
    pub events: Vec<MatchEvent>,
    pub added: usize,
    pub refreshed: usize,
}

pub fn merge_events(
    existing: HashMap<String, MatchEvent>,
    fetched: impl IntoIterator<Item = MatchEvent>,
    policy: ConflictPolicy,
) -> MergeOutcome {
    let mut merged = existing;
    let mut seen: HashSet<String> = HashSet::new();
    let mut added = 0;
    let mut refreshed = 0;

    for event in fetched {
        // First fetched copy of a UID wins within one run
        if !seen.insert(event.uid.clone()) {
            continue;
        }

        match merged.get(&event.uid) {
            None => {
                merged.insert(event.uid.clone(), event);
                added += 1;
            }
            Some(stored) => {
                if policy == ConflictPolicy::PreferFetched && *stored != event {
                    merged.insert(event.uid.clone(), event);
                    refreshed += 1;
                }
            }
        }
    }

    let mut events: Vec<MatchEvent> = merged.into_values().collect();
    events.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.uid.cmp(&b.uid)));

    MergeOutcome {
        events,
        added,
        refreshed,
    }
}
