//! Difficulty scale and level threshold tables.
//!
//! All grade comparisons in the crate go through the Fontainebleau scale
//! defined here: an ordered, immutable list of grade labels from `4A` to
//! `9C+`. A second table maps a subset of those labels (plus a "Beginner"
//! floor) to cumulative point thresholds used for scoring and levels.
//!
//! Unknown grade labels are never an error: lookups fall back to the scale
//! floor (index 0) or a zero threshold.

use std::cmp::Ordering;
use std::collections::HashMap;

use once_cell::sync::Lazy;

/// The full boulder grade scale, in increasing difficulty order.
pub const DIFFICULTY_SCALE: &[&str] = &[
    "4A", "4A+", "4B", "4B+", "4C", "4C+", //
    "5A", "5A+", "5B", "5B+", "5C", "5C+", //
    "6A", "6A+", "6B", "6B+", "6C", "6C+", //
    "7A", "7A+", "7B", "7B+", "7C", "7C+", //
    "8A", "8A+", "8B", "8B+", "8C", "8C+", //
    "9A", "9A+", "9B", "9B+", "9C", "9C+",
];

/// Cumulative point thresholds per level, in increasing difficulty order.
///
/// The "Beginner" floor guarantees `level_for_points` is total. Thresholds
/// are strictly increasing, which keeps progress interpolation free of
/// division by zero.
pub const LEVEL_THRESHOLDS: &[(&str, u32)] = &[
    ("Beginner", 0),
    ("4A", 50),
    ("4B", 100),
    ("4C", 150),
    ("5A", 200),
    ("5B", 250),
    ("5C", 300),
    ("6A", 400),
    ("6A+", 450),
    ("6B", 500),
    ("6B+", 575),
    ("6C", 650),
    ("6C+", 725),
    ("7A", 800),
    ("7A+", 900),
    ("7B", 1000),
    ("7B+", 1100),
    ("7C", 1200),
    ("7C+", 1300),
    ("8A", 1400),
    ("8A+", 1500),
    ("8B", 1600),
    ("8B+", 1700),
    ("8C", 1800),
    ("8C+", 1900),
    ("9A", 2000),
    ("9B", 2200),
    ("9C", 2400),
];

static GRADE_INDEX: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    DIFFICULTY_SCALE
        .iter()
        .enumerate()
        .map(|(i, &g)| (g, i))
        .collect()
});

static BASE_POINTS: Lazy<HashMap<&'static str, u32>> =
    Lazy::new(|| LEVEL_THRESHOLDS.iter().copied().collect());

/// Position of a grade label on the difficulty scale.
pub fn grade_index(grade: &str) -> Option<usize> {
    GRADE_INDEX.get(grade).copied()
}

/// Position of a grade label, treating unknown labels as the scale floor.
pub fn grade_index_or_floor(grade: &str) -> usize {
    grade_index(grade).unwrap_or(0)
}

/// Base point value for a grade label (0 for labels without a threshold).
pub fn base_points(grade: &str) -> u32 {
    BASE_POINTS.get(grade).copied().unwrap_or(0)
}

/// Slice of the scale spanning `below` grades under `center` through `above`
/// grades over it, clamped at both ends. The center grade is always included;
/// an unknown center clamps to the scale floor.
pub fn grade_window(center: &str, below: usize, above: usize) -> &'static [&'static str] {
    let idx = grade_index_or_floor(center);
    let start = idx.saturating_sub(below);
    let end = (idx + above + 1).min(DIFFICULTY_SCALE.len());
    &DIFFICULTY_SCALE[start..end]
}

/// Ordering for "hardest grade first" sorts.
pub fn compare_harder_first(a: &str, b: &str) -> Ordering {
    grade_index_or_floor(b).cmp(&grade_index_or_floor(a))
}
