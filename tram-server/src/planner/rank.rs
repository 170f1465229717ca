//! Journey ranking for search results.
//!
//! Ranks journeys by a combination of factors to present the most useful
//! options first.

use std::collections::HashSet;

use crate::domain::Journey;

/// Rank journeys by preference.
///
/// Journeys are ranked by:
/// 1. Arrival time (earlier is better)
/// 2. Number of changes (fewer is better)
/// 3. Total duration (shorter is better)
///
/// Returns journeys sorted best-first. The sort is stable, so equally good
/// journeys keep their order.
pub fn rank_journeys(mut journeys: Vec<Journey>) -> Vec<Journey> {
    journeys.sort_by(|a, b| {
        // Primary: arrival time
        let arr_cmp = a.arrival_time().cmp(&b.arrival_time());
        if arr_cmp != std::cmp::Ordering::Equal {
            return arr_cmp;
        }

        // Secondary: fewer changes
        let changes_cmp = a.change_count().cmp(&b.change_count());
        if changes_cmp != std::cmp::Ordering::Equal {
            return changes_cmp;
        }

        // Tertiary: shorter duration
        a.duration_minutes().cmp(&b.duration_minutes())
    });

    journeys
}

/// Deduplicate journeys that are the same itinerary.
///
/// Two journeys are duplicates if they ride the same trips between the
/// same stations and walk the same links at the same times; how long is
/// spent waiting does not matter. Of each set of duplicates the best
/// ranked is kept.
pub fn deduplicate(journeys: Vec<Journey>) -> Vec<Journey> {
    if journeys.len() <= 1 {
        return journeys;
    }

    let mut seen = HashSet::new();
    rank_journeys(journeys)
        .into_iter()
        .filter(|journey| seen.insert(journey.signature()))
        .collect()
}
