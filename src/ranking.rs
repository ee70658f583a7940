//! Gym leaderboard aggregation.
//!
//! The ranking recomputes on demand from raw topped-by rows; nothing is
//! persisted. For each member with at least one ascent in the gym inside
//! the recency window, the hardest N windowed ascents are scored and
//! summed, and the total resolves to a level with progress.
//!
//! The selected gym arrives as an explicit parameter (the app's config
//! layer owns "which gym is selected"); a missing or unresolvable
//! selection is a reported error, never a silent empty leaderboard.

use std::collections::HashMap;

use chrono::{DateTime, Months, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{CruxMapError, OptionExt, Result};
use crate::grades::compare_harder_first;
use crate::points::{level_for_points, points_for_ascent};
use crate::{Ascent, Boulder, Climber, Gender, RankingConfig};

/// One leaderboard row. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub climber_id: String,
    /// "first last"
    pub display_name: String,
    pub total_points: u32,
    pub gender: Gender,
    /// Level name for the total ("Beginner", "6B+", ...)
    pub level: String,
    /// Progress toward the next level, e.g. "+40%"
    pub progress: String,
}

/// Resolve the app's selected-gym setting to a gym id.
///
/// `None` means no gym was ever selected; a non-integer value means the
/// stored selection is corrupt. Both are configuration errors the caller
/// must surface (typically by redirecting to gym selection).
pub fn resolve_gym_id(selected_gym: Option<&str>) -> Result<i64> {
    let raw = selected_gym.ok_or_no_gym()?;
    raw.trim()
        .parse()
        .map_err(|_| CruxMapError::InvalidGymId {
            raw: raw.to_string(),
        })
}

/// Group each climber's windowed ascents in the gym, joined to grades.
///
/// Ascents on other gyms' boulders, on unknown boulders, or older than the
/// window are dropped here; a climber absent from the result has nothing
/// to rank.
fn windowed_ascents<'a>(
    gym_id: i64,
    ascents: &'a [Ascent],
    boulders: &'a [Boulder],
    config: &RankingConfig,
    now: DateTime<Utc>,
) -> HashMap<&'a str, Vec<(&'a str, bool)>> {
    let grades_by_boulder: HashMap<&str, &str> = boulders
        .iter()
        .filter(|b| b.gym_id == gym_id)
        .map(|b| (b.id.as_str(), b.grade.as_str()))
        .collect();

    let window_start = now - Months::new(config.window_months);

    let mut per_climber: HashMap<&str, Vec<(&str, bool)>> = HashMap::new();
    for ascent in ascents {
        let Some(&grade) = grades_by_boulder.get(ascent.boulder_id.as_str()) else {
            continue;
        };
        if ascent.created_at < window_start {
            continue;
        }
        per_climber
            .entry(ascent.climber_id.as_str())
            .or_default()
            .push((grade, ascent.flashed));
    }
    per_climber
}

/// Score one climber: hardest N windowed ascents, summed.
fn score_climber(
    climber: &Climber,
    mut climbs: Vec<(&str, bool)>,
    config: &RankingConfig,
) -> RankingEntry {
    climbs.sort_by(|a, b| compare_harder_first(a.0, b.0));

    let total_points: u32 = climbs
        .iter()
        .take(config.best_ascent_count)
        .map(|&(grade, flashed)| points_for_ascent(grade, flashed))
        .sum();

    let level = level_for_points(total_points);

    RankingEntry {
        climber_id: climber.id.clone(),
        display_name: climber.display_name(),
        total_points,
        gender: climber.gender,
        level: level.level,
        progress: level.progress,
    }
}

/// Compute a gym's leaderboard, descending by points.
///
/// Climbers with no windowed ascent in the gym are excluded entirely (they
/// never appear with 0 points). A gym with no ascents yields an empty
/// leaderboard. Ties keep input order (stable sort).
pub fn rank_gym(
    selected_gym: Option<&str>,
    climbers: &[Climber],
    ascents: &[Ascent],
    boulders: &[Boulder],
    config: &RankingConfig,
    now: DateTime<Utc>,
) -> Result<Vec<RankingEntry>> {
    let gym_id = resolve_gym_id(selected_gym)?;
    let mut per_climber = windowed_ascents(gym_id, ascents, boulders, config, now);

    let mut entries: Vec<RankingEntry> = climbers
        .iter()
        .filter_map(|climber| {
            per_climber
                .remove(climber.id.as_str())
                .map(|climbs| score_climber(climber, climbs, config))
        })
        .collect();

    entries.sort_by(|a, b| b.total_points.cmp(&a.total_points));

    debug!(
        "[Ranking] gym {}: ranked {} of {} climbers",
        gym_id,
        entries.len(),
        climbers.len()
    );
    Ok(entries)
}

/// Parallel version of [`rank_gym`]. Scoring fans out per climber; output
/// ordering is identical to the serial version.
#[cfg(feature = "parallel")]
pub fn rank_gym_parallel(
    selected_gym: Option<&str>,
    climbers: &[Climber],
    ascents: &[Ascent],
    boulders: &[Boulder],
    config: &RankingConfig,
    now: DateTime<Utc>,
) -> Result<Vec<RankingEntry>> {
    let gym_id = resolve_gym_id(selected_gym)?;
    let per_climber = windowed_ascents(gym_id, ascents, boulders, config, now);

    let mut entries: Vec<RankingEntry> = climbers
        .par_iter()
        .filter_map(|climber| {
            per_climber
                .get(climber.id.as_str())
                .map(|climbs| score_climber(climber, climbs.clone(), config))
        })
        .collect();

    entries.sort_by(|a, b| b.total_points.cmp(&a.total_points));
    Ok(entries)
}
