//! Floor-plan SVG extraction.
//!
//! Gym floor plans are hand-authored SVG documents restricted to a small
//! grammar: `<g id="...">` groups (one per climbing sector) wrapping
//! `<path id="..." d="..." fill="..."/>` elements. This module scans the
//! raw text for that grammar with a small hand-written scanner instead of
//! a full XML parse; attributes are extracted by name, so attribute order
//! inside a tag does not matter.
//!
//! Failure semantics are deliberately soft: a group with no usable paths
//! still produces an empty sector, a path whose `d` yields no geometry is
//! dropped, and duplicate group ids produce separate sector entries in
//! document order.

use log::debug;
use serde::{Deserialize, Serialize};

use super::path_data::{parse_path_data, PathBounds, PathOp};

/// Reserved sector id for decorative regions: rendered, never hit-tested.
pub const NON_INTERACTIVE_SECTOR_ID: &str = "noclick";

/// A fill color as authored in the floor plan.
///
/// `none` maps to transparent and hex tokens are decoded; anything else is
/// passed through by name for the presentation layer's palette to resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FillColor {
    Transparent,
    Rgb { r: u8, g: u8, b: u8 },
    Rgba { a: u8, r: u8, g: u8, b: u8 },
    Named(String),
}

impl FillColor {
    /// Parse a fill attribute token (`none`, `#RGB`, `#ARGB`, `#RRGGBB`,
    /// or a palette color name).
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        if token.eq_ignore_ascii_case("none") {
            return FillColor::Transparent;
        }
        if let Some(hex) = token.strip_prefix('#') {
            if let Some(color) = Self::from_hex(hex) {
                return color;
            }
            debug!("[Map] unparseable hex fill '{}'", token);
        }
        FillColor::Named(token.to_string())
    }

    fn from_hex(hex: &str) -> Option<Self> {
        let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok();
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            // #RGB: each nibble doubled
            3 => Some(FillColor::Rgb {
                r: nibble(0)? * 17,
                g: nibble(1)? * 17,
                b: nibble(2)? * 17,
            }),
            // #ARGB: alpha nibble first
            4 => Some(FillColor::Rgba {
                a: nibble(0)? * 17,
                r: nibble(1)? * 17,
                g: nibble(2)? * 17,
                b: nibble(3)? * 17,
            }),
            6 => Some(FillColor::Rgb {
                r: byte(0)?,
                g: byte(2)?,
                b: byte(4)?,
            }),
            _ => None,
        }
    }

    /// True for fills that paint nothing.
    pub fn is_transparent(&self) -> bool {
        matches!(self, FillColor::Transparent) || matches!(self, FillColor::Rgba { a: 0, .. })
    }
}

/// A named, colored sub-path of a sector. Geometry is always non-empty;
/// sources that fail to parse are never constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedPath {
    /// Identifier, unique within a sector (not globally)
    pub id: String,
    /// Resolved absolute drawing operations
    pub ops: Vec<PathOp>,
    /// Fill color for rendering
    pub fill: FillColor,
}

impl NamedPath {
    /// Bounding box of the path geometry.
    pub fn bounds(&self) -> Option<PathBounds> {
        PathBounds::from_ops(&self.ops)
    }
}

/// One physical climbing area on the floor plan.
///
/// Path order matters: later paths render on top. A conventional sector is
/// a base polygon, a highlight polygon and an accent polygon, in that
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    /// Identifier, unique within a gym map (duplicates are tolerated and
    /// kept as separate entries)
    pub id: String,
    /// Sub-paths in document order
    pub paths: Vec<NamedPath>,
}

impl Sector {
    /// Whether taps on this sector should resolve to it.
    pub fn is_interactive(&self) -> bool {
        self.id != NON_INTERACTIVE_SECTOR_ID
    }

    /// The base polygon (first path), used for hit-testing.
    pub fn base_path(&self) -> Option<&NamedPath> {
        self.paths.first()
    }

    /// Union of all path bounds.
    pub fn bounds(&self) -> Option<PathBounds> {
        let mut bounds: Option<PathBounds> = None;
        for path in &self.paths {
            if let Some(b) = path.bounds() {
                bounds = Some(match bounds {
                    Some(acc) => acc.merge(&b),
                    None => b,
                });
            }
        }
        bounds
    }
}

/// Extract a quoted attribute value from a single tag's text.
///
/// Name matching requires a whitespace boundary before the attribute name
/// so `id` never matches inside e.g. `data-id`.
fn find_attr<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let bytes = tag.as_bytes();
    let pattern = format!("{}=\"", name);
    let mut from = 0;
    while let Some(pos) = tag[from..].find(&pattern) {
        let at = from + pos;
        let start = at + pattern.len();
        let boundary = at > 0 && bytes[at - 1].is_ascii_whitespace();
        if boundary {
            let end = tag[start..].find('"')? + start;
            return Some(&tag[start..end]);
        }
        from = start;
    }
    None
}

/// Scan group content for `<path>` tags and build named paths from them.
fn parse_paths(content: &str) -> Vec<NamedPath> {
    let mut paths = Vec::new();
    let mut cursor = 0;

    while let Some(open) = content[cursor..].find("<path") {
        let at = cursor + open;
        let rest = &content[at..];
        let Some(tag_len) = rest.find('>') else {
            break;
        };
        let tag = &rest[..tag_len + 1];
        cursor = at + tag_len + 1;

        let Some(id) = find_attr(tag, "id") else {
            debug!("[Map] skipping <path> without id");
            continue;
        };
        let Some(d) = find_attr(tag, "d") else {
            debug!("[Map] skipping <path> '{}' without path data", id);
            continue;
        };

        let ops = parse_path_data(d);
        if ops.is_empty() {
            debug!("[Map] dropping <path> '{}': no usable geometry", id);
            continue;
        }

        let fill = find_attr(tag, "fill")
            .map(FillColor::parse)
            .unwrap_or(FillColor::Transparent);

        paths.push(NamedPath {
            id: id.to_string(),
            ops,
            fill,
        });
    }

    paths
}

/// Parse a full floor-plan SVG document into sectors, in document order.
///
/// # Example
/// ```
/// use cruxmap::parse_floor_plan;
///
/// let svg = r##"<svg><g id="slab">
///     <path id="base" d="M0,0 L40,0 L40,30 Z" fill="#E8D44D"/>
/// </g></svg>"##;
///
/// let sectors = parse_floor_plan(svg);
/// assert_eq!(sectors.len(), 1);
/// assert_eq!(sectors[0].id, "slab");
/// assert_eq!(sectors[0].paths.len(), 1);
/// ```
pub fn parse_floor_plan(svg: &str) -> Vec<Sector> {
    let mut sectors = Vec::new();
    let mut cursor = 0;

    while let Some(open) = svg[cursor..].find("<g") {
        let at = cursor + open;
        let rest = &svg[at + 2..];
        // Tag boundary check so "<glyph" or similar never matches
        match rest.chars().next() {
            Some(c) if c.is_whitespace() || c == '>' => {}
            _ => {
                cursor = at + 2;
                continue;
            }
        }
        let Some(tag_len) = rest.find('>') else {
            break;
        };
        let tag = &svg[at..at + 2 + tag_len + 1];
        let inner_start = at + 2 + tag_len + 1;

        let Some(close) = svg[inner_start..].find("</g>") else {
            debug!("[Map] unclosed <g> tag, stopping scan");
            break;
        };
        let inner = &svg[inner_start..inner_start + close];
        cursor = inner_start + close + 4;

        let Some(id) = find_attr(tag, "id") else {
            debug!("[Map] skipping <g> without id");
            continue;
        };

        sectors.push(Sector {
            id: id.to_string(),
            paths: parse_paths(inner),
        });
    }

    debug!("[Map] parsed {} sectors", sectors.len());
    sectors
}
