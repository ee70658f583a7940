//! Gym floor-plan geometry.
//!
//! The map subsystem turns a hand-authored floor-plan SVG into structured
//! sectors (`svg`), interprets raw path data into absolute drawing
//! operations (`path_data`), and wraps the result in a [`FloorPlan`] with
//! a spatial index for tap hit-testing.

pub mod path_data;
pub mod svg;

pub use path_data::{parse_path_data, PathBounds, PathOp, PathPoint, PathState};
pub use svg::{parse_floor_plan, FillColor, NamedPath, Sector, NON_INTERACTIVE_SECTOR_ID};

use geo::{Contains, Coord, LineString, Point, Polygon};
use rstar::{RTree, RTreeObject, AABB};
use serde::{Deserialize, Serialize};

/// Number of line segments a cubic curve is flattened into for
/// hit-test polygons.
const CURVE_SAMPLES: usize = 8;

/// Sector bounds wrapper for R-tree spatial indexing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorBounds {
    /// Index into the owning plan's sector list
    pub sector_index: usize,
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl RTreeObject for SectorBounds {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.min_x, self.min_y], [self.max_x, self.max_y])
    }
}

/// A parsed gym floor plan: sectors in document order plus a spatial
/// index and pre-flattened outlines for hit-testing.
#[derive(Debug, Clone)]
pub struct FloorPlan {
    sectors: Vec<Sector>,
    outlines: Vec<Option<Polygon<f64>>>,
    index: RTree<SectorBounds>,
}

impl FloorPlan {
    /// Parse an SVG document and build the indexed plan.
    pub fn from_svg(svg_text: &str) -> Self {
        Self::from_sectors(parse_floor_plan(svg_text))
    }

    /// Build the indexed plan from already-parsed sectors.
    pub fn from_sectors(sectors: Vec<Sector>) -> Self {
        let outlines: Vec<Option<Polygon<f64>>> =
            sectors.iter().map(sector_outline).collect();

        let entries: Vec<SectorBounds> = sectors
            .iter()
            .enumerate()
            .filter_map(|(i, sector)| {
                let b = sector.bounds()?;
                Some(SectorBounds {
                    sector_index: i,
                    min_x: b.min_x,
                    min_y: b.min_y,
                    max_x: b.max_x,
                    max_y: b.max_y,
                })
            })
            .collect();

        Self {
            sectors,
            outlines,
            index: RTree::bulk_load(entries),
        }
    }

    /// Sectors in document order.
    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    pub fn sector_count(&self) -> usize {
        self.sectors.len()
    }

    /// Overall map bounds, for viewport fitting.
    pub fn bounds(&self) -> Option<PathBounds> {
        let mut bounds: Option<PathBounds> = None;
        for sector in &self.sectors {
            if let Some(b) = sector.bounds() {
                bounds = Some(match bounds {
                    Some(acc) => acc.merge(&b),
                    None => b,
                });
            }
        }
        bounds
    }

    /// Find the interactive sector containing `point`, if any.
    ///
    /// Candidates come from the spatial index; the exact test is
    /// point-in-polygon against each candidate's base (first) path with
    /// cubic segments flattened. When overlapping sectors both contain
    /// the point, the earliest in document order wins.
    pub fn sector_at(&self, point: PathPoint) -> Option<&Sector> {
        if !point.is_finite() {
            return None;
        }
        let probe = AABB::from_point([point.x, point.y]);
        let target = Point::new(point.x, point.y);

        self.index
            .locate_in_envelope_intersecting(&probe)
            .filter(|entry| {
                let sector = &self.sectors[entry.sector_index];
                if !sector.is_interactive() {
                    return false;
                }
                match &self.outlines[entry.sector_index] {
                    Some(outline) => outline.contains(&target),
                    None => false,
                }
            })
            .map(|entry| entry.sector_index)
            .min()
            .map(|i| &self.sectors[i])
    }
}

/// Flatten a sector's base path into a closed polygon. Sectors whose base
/// path has fewer than three distinct vertices are not hittable.
fn sector_outline(sector: &Sector) -> Option<Polygon<f64>> {
    let base = sector.base_path()?;
    let coords = flatten_ops(&base.ops);
    if coords.len() < 3 {
        return None;
    }
    Some(Polygon::new(LineString::new(coords), vec![]))
}

/// Flatten drawing operations into polygon vertices. Only the first
/// subpath contributes; the sector base polygon is a single closed loop.
fn flatten_ops(ops: &[PathOp]) -> Vec<Coord<f64>> {
    let mut coords: Vec<Coord<f64>> = Vec::new();
    let mut current = PathPoint::default();

    for op in ops {
        match op {
            PathOp::MoveTo(p) | PathOp::LineTo(p) => {
                current = *p;
                coords.push(Coord { x: p.x, y: p.y });
            }
            PathOp::CubicTo {
                control1,
                control2,
                to,
            } => {
                for i in 1..=CURVE_SAMPLES {
                    let t = i as f64 / CURVE_SAMPLES as f64;
                    let p = cubic_at(current, *control1, *control2, *to, t);
                    coords.push(Coord { x: p.x, y: p.y });
                }
                current = *to;
            }
            PathOp::Close => break,
        }
    }

    coords
}

/// Evaluate a cubic Bezier at parameter `t`.
fn cubic_at(p0: PathPoint, c1: PathPoint, c2: PathPoint, p1: PathPoint, t: f64) -> PathPoint {
    let u = 1.0 - t;
    let b0 = u * u * u;
    let b1 = 3.0 * u * u * t;
    let b2 = 3.0 * u * t * t;
    let b3 = t * t * t;
    PathPoint::new(
        b0 * p0.x + b1 * c1.x + b2 * c2.x + b3 * p1.x,
        b0 * p0.y + b1 * c1.y + b2 * c2.y + b3 * p1.y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_sector(id: &str, x: f64, y: f64, size: f64) -> String {
        format!(
            r##"<g id="{id}"><path id="base" d="M{x},{y} h{size} v{size} h-{size} Z" fill="#CCCCCC"/></g>"##,
        )
    }

    #[test]
    fn test_sector_at_basic() {
        let svg = format!(
            "{}{}",
            square_sector("left", 0.0, 0.0, 10.0),
            square_sector("right", 20.0, 0.0, 10.0)
        );
        let plan = FloorPlan::from_svg(&svg);

        assert_eq!(plan.sector_count(), 2);
        assert_eq!(
            plan.sector_at(PathPoint::new(5.0, 5.0)).map(|s| s.id.as_str()),
            Some("left")
        );
        assert_eq!(
            plan.sector_at(PathPoint::new(25.0, 5.0)).map(|s| s.id.as_str()),
            Some("right")
        );
        // Gap between the sectors
        assert!(plan.sector_at(PathPoint::new(15.0, 5.0)).is_none());
    }

    #[test]
    fn test_sector_at_skips_non_interactive() {
        let svg = square_sector(NON_INTERACTIVE_SECTOR_ID, 0.0, 0.0, 10.0);
        let plan = FloorPlan::from_svg(&svg);

        assert_eq!(plan.sector_count(), 1);
        assert!(plan.sector_at(PathPoint::new(5.0, 5.0)).is_none());
    }

    #[test]
    fn test_sector_at_curved_outline() {
        // A bulging square: the right edge curves out to x≈14
        let svg = r#"<g id="bulge">
            <path id="base" d="M0,0 L10,0 C14,3 14,7 10,10 L0,10 Z" fill="none"/>
        </g>"#;
        let plan = FloorPlan::from_svg(svg);

        assert!(plan.sector_at(PathPoint::new(5.0, 5.0)).is_some());
        // Inside the bulge, outside the straight-edged square
        assert!(plan.sector_at(PathPoint::new(11.5, 5.0)).is_some());
        assert!(plan.sector_at(PathPoint::new(20.0, 5.0)).is_none());
    }

    #[test]
    fn test_overlap_earliest_sector_wins() {
        let svg = format!(
            "{}{}",
            square_sector("under", 0.0, 0.0, 10.0),
            square_sector("over", 5.0, 5.0, 10.0)
        );
        let plan = FloorPlan::from_svg(&svg);

        assert_eq!(
            plan.sector_at(PathPoint::new(7.0, 7.0)).map(|s| s.id.as_str()),
            Some("under")
        );
    }

    #[test]
    fn test_degenerate_base_path_not_hittable() {
        let svg = r#"<g id="line"><path id="base" d="M0,0 L10,0" fill="none"/></g>"#;
        let plan = FloorPlan::from_svg(svg);

        assert_eq!(plan.sector_count(), 1);
        assert!(plan.sector_at(PathPoint::new(5.0, 0.0)).is_none());
    }

    #[test]
    fn test_plan_bounds() {
        let svg = format!(
            "{}{}",
            square_sector("a", 0.0, 0.0, 10.0),
            square_sector("b", 30.0, 20.0, 10.0)
        );
        let plan = FloorPlan::from_svg(&svg);
        let bounds = plan.bounds().unwrap();

        assert_eq!(bounds.min_x, 0.0);
        assert_eq!(bounds.max_x, 40.0);
        assert_eq!(bounds.max_y, 30.0);
    }

    #[test]
    fn test_empty_plan() {
        let plan = FloorPlan::from_svg("<svg></svg>");
        assert_eq!(plan.sector_count(), 0);
        assert!(plan.bounds().is_none());
        assert!(plan.sector_at(PathPoint::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn test_cubic_at_endpoints() {
        let p0 = PathPoint::new(0.0, 0.0);
        let c1 = PathPoint::new(1.0, 2.0);
        let c2 = PathPoint::new(3.0, 2.0);
        let p1 = PathPoint::new(4.0, 0.0);

        assert_eq!(cubic_at(p0, c1, c2, p1, 0.0), p0);
        assert_eq!(cubic_at(p0, c1, c2, p1, 1.0), p1);
        // Symmetric curve peaks at the midpoint
        let mid = cubic_at(p0, c1, c2, p1, 0.5);
        assert!((mid.x - 2.0).abs() < 1e-9);
        assert!(mid.y > 0.0);
    }
}
