//! Ascent scoring and level progression.
//!
//! A single ascent is worth 10% of its grade's base threshold, with a 20%
//! bonus on the base for a flash. Both percentages truncate toward zero, so
//! a 6C (base 650) scores 65 points, or 78 flashed. Levels are the inverse
//! mapping: a total point count resolves to the highest threshold reached,
//! plus a "+N%" progress label toward the next one.

use serde::{Deserialize, Serialize};

use crate::grades::{base_points, LEVEL_THRESHOLDS};

/// A resolved level with progress toward the next threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgress {
    /// Level name ("Beginner", "6B+", ...)
    pub level: String,
    /// Progress label toward the next level, e.g. "+40%"
    pub progress: String,
}

/// Points awarded for one ascent of a boulder at `grade`.
///
/// Unknown grade labels score 0; this function is total and never fails.
pub fn points_for_ascent(grade: &str, flashed: bool) -> u32 {
    let base = base_points(grade);
    let bonus = if flashed { base / 5 } else { 0 };
    (base + bonus) / 10
}

/// Resolve a total point count to a level name and progress label.
///
/// The level is the highest threshold at or below `points`. Progress is
/// linearly interpolated between consecutive thresholds and truncated;
/// at or above the top threshold it reports "+0%".
pub fn level_for_points(points: u32) -> LevelProgress {
    let mut current = 0;
    for (i, &(_, threshold)) in LEVEL_THRESHOLDS.iter().enumerate() {
        if threshold <= points {
            current = i;
        } else {
            break;
        }
    }

    let (level, threshold) = LEVEL_THRESHOLDS[current];
    let progress = match LEVEL_THRESHOLDS.get(current + 1) {
        Some(&(_, next)) => {
            // Thresholds are strictly increasing, so next > threshold here.
            let pct = 100 * (points - threshold) / (next - threshold);
            format!("+{}%", pct)
        }
        None => "+0%".to_string(),
    };

    LevelProgress {
        level: level.to_string(),
        progress,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_for_ascent() {
        // 6C has base 650: 10% = 65, flash adds 20% of base first
        assert_eq!(points_for_ascent("6C", false), 65);
        assert_eq!(points_for_ascent("6C", true), 78);
        assert!(points_for_ascent("6C", true) > points_for_ascent("6C", false));
    }

    #[test]
    fn test_points_unknown_grade() {
        assert_eq!(points_for_ascent("V7", false), 0);
        assert_eq!(points_for_ascent("V7", true), 0);
        assert_eq!(points_for_ascent("", true), 0);
    }

    #[test]
    fn test_points_truncation() {
        // 6B+ has base 575: flash bonus 575/5 = 115, (575+115)/10 = 69
        assert_eq!(points_for_ascent("6B+", false), 57);
        assert_eq!(points_for_ascent("6B+", true), 69);
    }

    #[test]
    fn test_level_for_zero_points() {
        let lp = level_for_points(0);
        assert_eq!(lp.level, "Beginner");
        assert_eq!(lp.progress, "+0%");
    }

    #[test]
    fn test_level_progress_interpolation() {
        // Between Beginner (0) and 4A (50): 25 points is halfway
        let lp = level_for_points(25);
        assert_eq!(lp.level, "Beginner");
        assert_eq!(lp.progress, "+50%");

        // Exactly on a threshold
        let lp = level_for_points(650);
        assert_eq!(lp.level, "6C");
        assert_eq!(lp.progress, "+0%");
    }

    #[test]
    fn test_level_above_top_threshold() {
        let lp = level_for_points(99_999);
        assert_eq!(lp.level, "9C");
        assert_eq!(lp.progress, "+0%");
    }

    #[test]
    fn test_level_monotonic() {
        let mut last_index = 0;
        for points in (0..3000).step_by(7) {
            let lp = level_for_points(points);
            let index = LEVEL_THRESHOLDS
                .iter()
                .position(|&(name, _)| name == lp.level)
                .unwrap();
            assert!(index >= last_index, "level regressed at {} points", points);
            last_index = index;
        }
    }
}
