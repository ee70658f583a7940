//! # Cruxmap
//!
//! Floor-plan parsing and ascent ranking engine for climbing gym apps.
//!
//! This library is the algorithmic core behind a gym companion app: the
//! surrounding application fetches rows (boulders, ascents, votes, member
//! profiles) and map SVG text from a hosted backend, then hands immutable
//! snapshots to this crate for parsing, scoring and aggregation. Nothing
//! here performs I/O; every entry point is a pure, synchronous computation
//! safe to call from any number of threads.
//!
//! It provides:
//! - SVG floor-plan parsing into interactive sector geometry
//! - Point scoring and level progression for logged ascents
//! - Gym leaderboards over a recency window
//! - Grade-vote and progress chart aggregation
//!
//! ## Quick Start
//!
//! ```rust
//! use cruxmap::{parse_floor_plan, points_for_ascent, level_for_points};
//!
//! // Parse a gym's floor plan into sectors
//! let svg = r##"<svg><g id="overhang">
//!     <path id="base" d="M0,0 L40,0 L40,30 L0,30 Z" fill="#E8D44D"/>
//! </g></svg>"##;
//! let sectors = parse_floor_plan(svg);
//! assert_eq!(sectors[0].id, "overhang");
//!
//! // Score an ascent and resolve the climber's level
//! let total = points_for_ascent("6C", true);
//! assert_eq!(total, 78);
//! assert_eq!(level_for_points(total).level, "4A");
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{CruxMapError, OptionExt, Result};

// Grade scale and level threshold tables
pub mod grades;
pub use grades::{
    base_points, compare_harder_first, grade_index, grade_index_or_floor, grade_window,
    DIFFICULTY_SCALE, LEVEL_THRESHOLDS,
};

// Ascent scoring and level progression
pub mod points;
pub use points::{level_for_points, points_for_ascent, LevelProgress};

// Floor-plan parsing and hit-testing
pub mod map;
pub use map::{
    parse_floor_plan, parse_path_data, FillColor, FloorPlan, NamedPath, PathBounds, PathOp,
    PathPoint, PathState, Sector, SectorBounds, NON_INTERACTIVE_SECTOR_ID,
};

// Gym leaderboard aggregation
pub mod ranking;
pub use ranking::{rank_gym, resolve_gym_id, RankingEntry};
#[cfg(feature = "parallel")]
pub use ranking::rank_gym_parallel;

// Chart series aggregation (grade votes, monthly progress, difficulty histogram)
pub mod charts;
pub use charts::{
    average_stars, difficulty_histogram, grade_vote_histogram, monthly_progress, GradeBucket,
    MonthPoint, PROGRESS_MONTHS,
};

// Parsed floor-plan cache
pub mod cache;
pub use cache::{PlanCache, DEFAULT_PLAN_CAPACITY};

// Stateful map engine (singleton caching parsed plans per gym)
pub mod engine;
pub use engine::{with_map_engine, EngineStats, MapEngine, MAP_ENGINE};

// ============================================================================
// Row Model
// ============================================================================
//
// Plain in-memory rows, shaped like what the hosted backend returns. The
// aggregators take slices of these; fetching and persistence live outside
// this crate.

/// Gender label on a member profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Unspecified,
}

impl Gender {
    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Unspecified => "unspecified",
        }
    }
}

/// A gym member profile row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Climber {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
}

impl Climber {
    /// "first last" label used on leaderboards.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A boulder marker row: a problem placed on the floor plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boulder {
    pub id: String,
    /// Owning gym
    pub gym_id: i64,
    /// Marker position, in floor-plan user-space units
    pub x: f64,
    pub y: f64,
    /// Difficulty grade label on the scale (e.g. "6C+")
    pub grade: String,
    /// Hold color name
    pub color: String,
    /// Sector the boulder sits in
    pub sector_id: String,
}

/// A topped-by row: one member's recorded ascent state for one boulder.
/// At most one row exists per member and boulder (upsert semantics).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ascent {
    pub climber_id: String,
    pub boulder_id: String,
    /// Topped on the first attempt
    pub flashed: bool,
    pub created_at: DateTime<Utc>,
}

/// A difficulty-grade vote row (one per member and boulder).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeVote {
    pub climber_id: String,
    pub boulder_id: String,
    /// Voted grade label
    pub grade: String,
    pub created_at: DateTime<Utc>,
}

/// A star-rating vote row (one per member and boulder).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarVote {
    pub climber_id: String,
    pub boulder_id: String,
    /// 1 to 5 stars
    pub stars: u8,
    pub created_at: DateTime<Utc>,
}

/// Configuration for leaderboard aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Only ascents within this many months of "now" count toward the
    /// ranking. Default: 2
    pub window_months: u32,

    /// Each climber's score sums their hardest N windowed ascents.
    /// Default: 10
    pub best_ascent_count: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            window_months: 2,
            best_ascent_count: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        let climber = Climber {
            id: "u1".to_string(),
            first_name: "Lena".to_string(),
            last_name: "Berger".to_string(),
            gender: Gender::Female,
        };
        assert_eq!(climber.display_name(), "Lena Berger");
        assert_eq!(climber.gender.label(), "female");
    }

    #[test]
    fn test_ranking_config_defaults() {
        let config = RankingConfig::default();
        assert_eq!(config.window_months, 2);
        assert_eq!(config.best_ascent_count, 10);
    }

    #[test]
    fn test_row_serde_round_trip() {
        let boulder = Boulder {
            id: "b1".to_string(),
            gym_id: 3,
            x: 12.5,
            y: 40.0,
            grade: "7A".to_string(),
            color: "red".to_string(),
            sector_id: "overhang".to_string(),
        };
        let json = serde_json::to_string(&boulder).unwrap();
        let back: Boulder = serde_json::from_str(&json).unwrap();
        assert_eq!(back, boulder);
    }
}
