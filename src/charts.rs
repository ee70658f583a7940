//! Chart series aggregation.
//!
//! Three display aggregations over vote and ascent rows:
//! - a grade-vote histogram windowed around a boulder's own grade,
//! - a five-month progress series of earned points,
//! - a six-bucket difficulty histogram walking down from the hardest
//!   grade a climber has topped.
//!
//! Series are always fully materialized for display: windows are
//! zero-filled and the monthly series is always exactly
//! [`PROGRESS_MONTHS`] entries long, never shortened by missing data.

use std::collections::HashMap;

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::grades::{grade_index_or_floor, grade_window, DIFFICULTY_SCALE};
use crate::points::points_for_ascent;
use crate::{Ascent, Boulder, GradeVote, StarVote};

/// Grades shown on each side of a boulder's own grade in the vote chart.
pub const VOTE_WINDOW_SPREAD: usize = 4;

/// Number of calendar months in the progress series (oldest first).
pub const PROGRESS_MONTHS: usize = 5;

/// Buckets in the difficulty histogram.
pub const HISTOGRAM_BUCKETS: usize = 6;

/// One bar of a grade histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeBucket {
    pub grade: String,
    pub count: u32,
}

/// One point of the monthly progress series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthPoint {
    /// Short month name ("Feb")
    pub month: String,
    /// Points earned that month
    pub points: u32,
}

/// Grade-vote histogram for one boulder.
///
/// The window spans [`VOTE_WINDOW_SPREAD`] grades below through the same
/// above the boulder's own grade, clamped at the scale ends and kept in
/// scale order. Grades nobody voted for report zero; votes outside the
/// window are not shown. An unknown boulder grade clamps to the scale
/// floor.
pub fn grade_vote_histogram(votes: &[GradeVote], boulder_grade: &str) -> Vec<GradeBucket> {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for vote in votes {
        *counts.entry(vote.grade.as_str()).or_insert(0) += 1;
    }

    grade_window(boulder_grade, VOTE_WINDOW_SPREAD, VOTE_WINDOW_SPREAD)
        .iter()
        .map(|&grade| GradeBucket {
            grade: grade.to_string(),
            count: counts.get(grade).copied().unwrap_or(0),
        })
        .collect()
}

/// Monthly progress series for one climber.
///
/// Exactly [`PROGRESS_MONTHS`] entries, one per calendar month from four
/// months ago through the current month, oldest first. Each value sums
/// the points of the climber's ascents logged that month; empty months
/// report zero.
///
/// Ascents are bucketed by short month name only, so an ascent from the
/// same-named month of an earlier year merges into the bucket. Inherited
/// from the original scoring behavior.
pub fn monthly_progress(
    ascents: &[Ascent],
    boulders: &[Boulder],
    climber_id: &str,
    now: DateTime<Utc>,
) -> Vec<MonthPoint> {
    let grades_by_boulder: HashMap<&str, &str> = boulders
        .iter()
        .map(|b| (b.id.as_str(), b.grade.as_str()))
        .collect();

    let mut totals: HashMap<String, u32> = HashMap::new();
    for ascent in ascents {
        if ascent.climber_id != climber_id {
            continue;
        }
        let Some(&grade) = grades_by_boulder.get(ascent.boulder_id.as_str()) else {
            continue;
        };
        let label = ascent.created_at.format("%b").to_string();
        *totals.entry(label).or_insert(0) += points_for_ascent(grade, ascent.flashed);
    }

    (0..PROGRESS_MONTHS as u32)
        .rev()
        .map(|months_back| {
            let month = (now - Months::new(months_back)).format("%b").to_string();
            let points = totals.get(&month).copied().unwrap_or(0);
            MonthPoint { month, points }
        })
        .collect()
}

/// Difficulty histogram for one climber.
///
/// Counts the climber's ascents per exact grade label, then emits up to
/// [`HISTOGRAM_BUCKETS`] buckets walking down the scale from the hardest
/// completed grade (stopping early at the scale floor), returned in
/// ascending difficulty order. A climber with no ascents gets an empty
/// histogram.
pub fn difficulty_histogram(
    ascents: &[Ascent],
    boulders: &[Boulder],
    climber_id: &str,
) -> Vec<GradeBucket> {
    let grades_by_boulder: HashMap<&str, &str> = boulders
        .iter()
        .map(|b| (b.id.as_str(), b.grade.as_str()))
        .collect();

    let mut counts: HashMap<&str, u32> = HashMap::new();
    for ascent in ascents {
        if ascent.climber_id != climber_id {
            continue;
        }
        if let Some(&grade) = grades_by_boulder.get(ascent.boulder_id.as_str()) {
            *counts.entry(grade).or_insert(0) += 1;
        }
    }

    let Some(hardest) = counts.keys().map(|g| grade_index_or_floor(g)).max() else {
        return Vec::new();
    };

    let mut buckets: Vec<GradeBucket> = (0..HISTOGRAM_BUCKETS)
        .map_while(|step| hardest.checked_sub(step))
        .map(|idx| {
            let grade = DIFFICULTY_SCALE[idx];
            GradeBucket {
                grade: grade.to_string(),
                count: counts.get(grade).copied().unwrap_or(0),
            }
        })
        .collect();

    buckets.reverse();
    buckets
}

/// Average star rating over a boulder's votes, `None` when nobody voted.
pub fn average_stars(votes: &[StarVote]) -> Option<f32> {
    if votes.is_empty() {
        return None;
    }
    let sum: u32 = votes.iter().map(|v| v.stars as u32).sum();
    Some(sum as f32 / votes.len() as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn vote(grade: &str) -> GradeVote {
        GradeVote {
            climber_id: "u1".to_string(),
            boulder_id: "b1".to_string(),
            grade: grade.to_string(),
            created_at: now(),
        }
    }

    fn boulder(id: &str, grade: &str) -> Boulder {
        Boulder {
            id: id.to_string(),
            gym_id: 1,
            x: 0.0,
            y: 0.0,
            grade: grade.to_string(),
            color: "blue".to_string(),
            sector_id: "s1".to_string(),
        }
    }

    fn ascent_at(boulder_id: &str, at: DateTime<Utc>) -> Ascent {
        Ascent {
            climber_id: "u1".to_string(),
            boulder_id: boulder_id.to_string(),
            flashed: false,
            created_at: at,
        }
    }

    #[test]
    fn test_vote_histogram_window() {
        let votes = [vote("6B"), vote("6B"), vote("6C+"), vote("9C+")];
        let histogram = grade_vote_histogram(&votes, "6C");

        assert_eq!(histogram.len(), 9);
        let grades: Vec<&str> = histogram.iter().map(|b| b.grade.as_str()).collect();
        assert_eq!(grades[0], "6A");
        assert_eq!(grades[4], "6C");
        assert_eq!(grades[8], "7B");

        let count_of = |g: &str| {
            histogram
                .iter()
                .find(|b| b.grade == g)
                .map(|b| b.count)
                .unwrap()
        };
        assert_eq!(count_of("6B"), 2);
        assert_eq!(count_of("6C+"), 1);
        // Zero-filled window grade
        assert_eq!(count_of("7A"), 0);
        // The 9C+ vote is outside the window and simply not shown
        assert!(histogram.iter().all(|b| b.grade != "9C+"));
    }

    #[test]
    fn test_vote_histogram_clamped_at_floor() {
        let histogram = grade_vote_histogram(&[], "4B");
        assert_eq!(histogram[0].grade, "4A");
        assert!(histogram.len() <= 9);
        assert!(histogram.iter().any(|b| b.grade == "4B"));

        // Unknown boulder grade clamps to the scale floor
        let histogram = grade_vote_histogram(&[], "V9");
        assert_eq!(histogram[0].grade, "4A");
        assert_eq!(histogram.len(), 5);
    }

    #[test]
    fn test_monthly_progress_shape() {
        let series = monthly_progress(&[], &[], "u1", now());
        assert_eq!(series.len(), PROGRESS_MONTHS);
        assert!(series.iter().all(|p| p.points == 0));

        let months: Vec<&str> = series.iter().map(|p| p.month.as_str()).collect();
        assert_eq!(months, vec!["Feb", "Mar", "Apr", "May", "Jun"]);
    }

    #[test]
    fn test_monthly_progress_sums() {
        let boulders = [boulder("b1", "6C"), boulder("b2", "5A")];
        let ascents = [
            // Two ascents in May, one in June
            ascent_at("b1", Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap()),
            ascent_at("b2", Utc.with_ymd_and_hms(2024, 5, 20, 9, 0, 0).unwrap()),
            ascent_at("b2", Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()),
        ];

        let series = monthly_progress(&ascents, &boulders, "u1", now());
        let value_of = |m: &str| series.iter().find(|p| p.month == m).map(|p| p.points);

        assert_eq!(value_of("May"), Some(85)); // 65 + 20
        assert_eq!(value_of("Jun"), Some(20));
        assert_eq!(value_of("Apr"), Some(0));
    }

    #[test]
    fn test_monthly_progress_other_climbers_excluded() {
        let boulders = [boulder("b1", "6C")];
        let mut foreign = ascent_at("b1", now());
        foreign.climber_id = "u2".to_string();

        let series = monthly_progress(&[foreign], &boulders, "u1", now());
        assert!(series.iter().all(|p| p.points == 0));
    }

    #[test]
    fn test_monthly_progress_merges_same_month_name_across_years() {
        // Inherited behavior: bucketing is by month name only
        let boulders = [boulder("b1", "6C")];
        let ascents = [
            ascent_at("b1", Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap()),
            ascent_at("b1", Utc.with_ymd_and_hms(2023, 6, 10, 9, 0, 0).unwrap()),
        ];

        let series = monthly_progress(&ascents, &boulders, "u1", now());
        let june = series.iter().find(|p| p.month == "Jun").unwrap();
        assert_eq!(june.points, 130);
    }

    #[test]
    fn test_difficulty_histogram_walks_down() {
        let boulders = [
            boulder("b1", "6C"),
            boulder("b2", "6A+"),
            boulder("b3", "6B"),
        ];
        let ascents = [
            ascent_at("b1", now()),
            ascent_at("b2", now()),
            ascent_at("b2", now()),
            ascent_at("b3", now()),
        ];

        let histogram = difficulty_histogram(&ascents, &boulders, "u1");

        // Six buckets walking down from 6C, ascending for display
        let grades: Vec<&str> = histogram.iter().map(|b| b.grade.as_str()).collect();
        assert_eq!(grades, vec!["5C+", "6A", "6A+", "6B", "6B+", "6C"]);
        assert_eq!(histogram.len(), 6);
        assert_eq!(histogram.last().unwrap().grade, "6C");
        assert_eq!(histogram.last().unwrap().count, 1);

        let count_of = |g: &str| {
            histogram
                .iter()
                .find(|b| b.grade == g)
                .map(|b| b.count)
                .unwrap()
        };
        assert_eq!(count_of("6A+"), 2);
        assert_eq!(count_of("6B"), 1);
        assert_eq!(count_of("6B+"), 0);
    }

    #[test]
    fn test_difficulty_histogram_clamped_at_floor() {
        let boulders = [boulder("b1", "4B")];
        let ascents = [ascent_at("b1", now())];

        let histogram = difficulty_histogram(&ascents, &boulders, "u1");

        // 4B is index 2; only three buckets exist down to the floor
        let grades: Vec<&str> = histogram.iter().map(|b| b.grade.as_str()).collect();
        assert_eq!(grades, vec!["4A", "4A+", "4B"]);
    }

    #[test]
    fn test_difficulty_histogram_empty() {
        assert!(difficulty_histogram(&[], &[], "u1").is_empty());
    }

    #[test]
    fn test_average_stars() {
        assert_eq!(average_stars(&[]), None);

        let votes: Vec<StarVote> = [3, 4, 5]
            .iter()
            .map(|&stars| StarVote {
                climber_id: "u1".to_string(),
                boulder_id: "b1".to_string(),
                stars,
                created_at: now(),
            })
            .collect();
        assert_eq!(average_stars(&votes), Some(4.0));
    }
}
