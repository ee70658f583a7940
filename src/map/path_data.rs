//! SVG path data interpreter.
//!
//! Converts the `d` attribute grammar (single-letter command codes mixed
//! with signed decimal parameters, whitespace/comma insensitive) into a
//! sequence of absolute drawing operations. Only the six command families
//! used by gym floor plans are supported: move, line, horizontal line,
//! vertical line, cubic curve and close. Anything else (arcs, quadratics,
//! shorthand curves) is skipped without producing geometry.
//!
//! Malformed input never fails the whole path: a command flushed with too
//! few parameters, or an unsupported command letter, drops that segment and
//! parsing continues.

use log::debug;
use serde::{Deserialize, Serialize};

/// A 2D coordinate in SVG user-space units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
}

impl PathPoint {
    /// Create a new path point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Check that both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// An absolute drawing operation. Horizontal and vertical input commands
/// resolve to plain line operations, so consumers only see four shapes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathOp {
    MoveTo(PathPoint),
    LineTo(PathPoint),
    CubicTo {
        control1: PathPoint,
        control2: PathPoint,
        to: PathPoint,
    },
    Close,
}

/// Running interpreter state: the pen position and the start of the
/// current subpath (where a close operation returns to).
///
/// Kept as a small value struct so individual commands are testable in
/// isolation and the interpreter stays reentrant.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PathState {
    pub current: PathPoint,
    pub subpath_start: PathPoint,
}

/// Axis-aligned bounding box over a path's emitted points.
///
/// Cubic control points are included, which makes the box conservative
/// (never smaller than the drawn curve).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl PathBounds {
    /// Compute bounds over a sequence of operations. Returns `None` when
    /// the sequence emits no points.
    pub fn from_ops(ops: &[PathOp]) -> Option<Self> {
        let mut bounds: Option<PathBounds> = None;
        for op in ops {
            match op {
                PathOp::MoveTo(p) | PathOp::LineTo(p) => include(&mut bounds, *p),
                PathOp::CubicTo {
                    control1,
                    control2,
                    to,
                } => {
                    include(&mut bounds, *control1);
                    include(&mut bounds, *control2);
                    include(&mut bounds, *to);
                }
                PathOp::Close => {}
            }
        }
        bounds
    }

    /// Smallest box covering both boxes.
    pub fn merge(&self, other: &PathBounds) -> PathBounds {
        PathBounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Center point of the box.
    pub fn center(&self) -> PathPoint {
        PathPoint::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }
}

fn include(bounds: &mut Option<PathBounds>, p: PathPoint) {
    match bounds {
        Some(b) => {
            b.min_x = b.min_x.min(p.x);
            b.min_y = b.min_y.min(p.y);
            b.max_x = b.max_x.max(p.x);
            b.max_y = b.max_y.max(p.y);
        }
        None => {
            *bounds = Some(PathBounds {
                min_x: p.x,
                min_y: p.y,
                max_x: p.x,
                max_y: p.y,
            });
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Command(char),
    Number(f64),
}

/// Scan path data into alternating command-letter and number tokens.
/// Separators (whitespace, commas) and unparseable runs are skipped.
fn tokenize(d: &str) -> Vec<Token> {
    let bytes = d.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i] as char;
        if c.is_ascii_alphabetic() {
            tokens.push(Token::Command(c));
            i += 1;
        } else if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' {
            let start = i;
            if c == '-' || c == '+' {
                i += 1;
            }
            let mut seen_dot = false;
            while i < bytes.len() {
                let ch = bytes[i] as char;
                if ch.is_ascii_digit() {
                    i += 1;
                } else if ch == '.' && !seen_dot {
                    seen_dot = true;
                    i += 1;
                } else {
                    break;
                }
            }
            if let Ok(n) = d[start..i].parse::<f64>() {
                tokens.push(Token::Number(n));
            }
            if i == start {
                // Lone sign with nothing behind it
                i += 1;
            }
        } else {
            i += 1;
        }
    }

    tokens
}

fn is_supported(cmd: char) -> bool {
    matches!(cmd.to_ascii_uppercase(), 'M' | 'L' | 'H' | 'V' | 'C')
}

fn arity(cmd: char) -> usize {
    match cmd.to_ascii_uppercase() {
        'M' | 'L' => 2,
        'H' | 'V' => 1,
        'C' => 6,
        _ => 0,
    }
}

/// Apply one fully-parameterized command against the running state,
/// producing the absolute operation it draws.
fn apply_command(cmd: char, params: &[f64], state: &mut PathState) -> Option<PathOp> {
    let relative = cmd.is_ascii_lowercase();
    let base = state.current;
    let resolve = |x: f64, y: f64| {
        if relative {
            PathPoint::new(base.x + x, base.y + y)
        } else {
            PathPoint::new(x, y)
        }
    };

    match cmd.to_ascii_uppercase() {
        'M' => {
            let to = resolve(params[0], params[1]);
            state.current = to;
            state.subpath_start = to;
            Some(PathOp::MoveTo(to))
        }
        'L' => {
            let to = resolve(params[0], params[1]);
            state.current = to;
            Some(PathOp::LineTo(to))
        }
        'H' => {
            let x = if relative {
                base.x + params[0]
            } else {
                params[0]
            };
            let to = PathPoint::new(x, base.y);
            state.current = to;
            Some(PathOp::LineTo(to))
        }
        'V' => {
            let y = if relative {
                base.y + params[0]
            } else {
                params[0]
            };
            let to = PathPoint::new(base.x, y);
            state.current = to;
            Some(PathOp::LineTo(to))
        }
        'C' => {
            let control1 = resolve(params[0], params[1]);
            let control2 = resolve(params[2], params[3]);
            let to = resolve(params[4], params[5]);
            state.current = to;
            Some(PathOp::CubicTo {
                control1,
                control2,
                to,
            })
        }
        _ => None,
    }
}

/// Interpret an SVG path `d` attribute into absolute drawing operations.
///
/// Implements standard implicit repetition: a command flushes as soon as
/// its parameter count is satisfied, and extra coordinate pairs after a
/// moveto continue as linetos (so `"M0,0 10,10 20,20"` draws two lines).
///
/// # Example
/// ```
/// use cruxmap::{parse_path_data, PathOp, PathPoint};
///
/// let ops = parse_path_data("M0,0 L10,0 L10,10 Z");
/// assert_eq!(ops.len(), 4);
/// assert_eq!(ops[0], PathOp::MoveTo(PathPoint::new(0.0, 0.0)));
/// assert_eq!(ops[3], PathOp::Close);
/// ```
pub fn parse_path_data(d: &str) -> Vec<PathOp> {
    let mut ops = Vec::new();
    let mut state = PathState::default();
    let mut pending: Option<char> = None;
    let mut params: Vec<f64> = Vec::new();

    for token in tokenize(d) {
        match token {
            Token::Command(cmd) => {
                if !params.is_empty() {
                    // Short parameter group: drop the segment, keep going
                    debug!(
                        "[Map] dropping short '{}' segment ({} of {} params)",
                        pending.unwrap_or('?'),
                        params.len(),
                        pending.map(arity).unwrap_or(0)
                    );
                    params.clear();
                }
                if cmd == 'Z' || cmd == 'z' {
                    ops.push(PathOp::Close);
                    state.current = state.subpath_start;
                    pending = None;
                } else if is_supported(cmd) {
                    pending = Some(cmd);
                } else {
                    debug!("[Map] unsupported path command '{}'", cmd);
                    pending = None;
                }
            }
            Token::Number(n) => {
                let Some(cmd) = pending else {
                    // Parameters of an unsupported command
                    continue;
                };
                params.push(n);
                if params.len() == arity(cmd) {
                    if let Some(op) = apply_command(cmd, &params, &mut state) {
                        ops.push(op);
                    }
                    params.clear();
                    // Implicit repetition: a moveto continues as a lineto
                    pending = Some(match cmd {
                        'M' => 'L',
                        'm' => 'l',
                        other => other,
                    });
                }
            }
        }
    }

    if !params.is_empty() {
        debug!(
            "[Map] dropping trailing short '{}' segment",
            pending.unwrap_or('?')
        );
    }

    ops
}
