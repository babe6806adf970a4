use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MalformedBoundsError;

// ============================================================================
// Bounds: axis-aligned pixel rectangle
// ============================================================================

/// Axis-aligned pixel rectangle `[left,top][right,bottom]`.
///
/// Always satisfies `left <= right` and `top <= bottom`. Zero-area
/// rectangles are legal and stand for effectively invisible elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Bounds {
    /// Build a rectangle, rejecting inverted edges.
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Result<Self, MalformedBoundsError> {
        if right < left {
            return Err(MalformedBoundsError::new(
                &format!("[{left},{top}][{right},{bottom}]"),
                "right edge is left of left edge",
            ));
        }
        if bottom < top {
            return Err(MalformedBoundsError::new(
                &format!("[{left},{top}][{right},{bottom}]"),
                "bottom edge is above top edge",
            ));
        }
        Ok(Self {
            left,
            top,
            right,
            bottom,
        })
    }

    /// `[0,0][width,height]`, negative sizes clamp to zero.
    pub fn from_size(width: i32, height: i32) -> Self {
        Self {
            left: 0,
            top: 0,
            right: width.max(0),
            bottom: height.max(0),
        }
    }

    pub const fn zero() -> Self {
        Self {
            left: 0,
            top: 0,
            right: 0,
            bottom: 0,
        }
    }

    /// Parse the `[l,t][r,b]` notation used by UI dumps.
    pub fn parse(raw: &str) -> Result<Self, MalformedBoundsError> {
        let trimmed = raw.trim();
        let rest = trimmed
            .strip_prefix('[')
            .ok_or_else(|| MalformedBoundsError::new(raw, "expected '[l,t][r,b]'"))?;
        let (first, rest) = rest
            .split_once(']')
            .ok_or_else(|| MalformedBoundsError::new(raw, "unterminated first coordinate pair"))?;
        let second = rest
            .trim_start()
            .strip_prefix('[')
            .and_then(|r| r.strip_suffix(']'))
            .ok_or_else(|| MalformedBoundsError::new(raw, "expected second '[r,b]' pair"))?;

        let (left, top) = parse_pair(raw, first)?;
        let (right, bottom) = parse_pair(raw, second)?;

        Self::new(left, top, right, bottom).map_err(|e| MalformedBoundsError::new(raw, e.reason))
    }

    /// Like [`Bounds::parse`], but also accepts the whitespace separated
    /// `l t r b` form some dumping tools write.
    pub fn parse_lenient(raw: &str) -> Result<Self, MalformedBoundsError> {
        let trimmed = raw.trim().trim_matches(|c| c == '"' || c == '\'');
        if trimmed.starts_with('[') {
            return Self::parse(trimmed).map_err(|e| MalformedBoundsError::new(raw, e.reason));
        }

        let coords: Vec<&str> = trimmed.split_whitespace().collect();
        if coords.len() != 4 {
            return Err(MalformedBoundsError::new(
                raw,
                format!("expected 4 coordinates, found {}", coords.len()),
            ));
        }

        let mut values = [0i32; 4];
        for (slot, token) in values.iter_mut().zip(&coords) {
            *slot = parse_coordinate(raw, token)?;
        }

        Self::new(values[0], values[1], values[2], values[3])
            .map_err(|e| MalformedBoundsError::new(raw, e.reason))
    }

    pub fn width(&self) -> i64 {
        i64::from(self.right) - i64::from(self.left)
    }

    pub fn height(&self) -> i64 {
        i64::from(self.bottom) - i64::from(self.top)
    }

    /// `(right-left) * (bottom-top)`; zero for degenerate rectangles.
    pub fn area(&self) -> i64 {
        self.width() * self.height()
    }

    pub fn is_degenerate(&self) -> bool {
        self.area() == 0
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (f64::from(self.left) + f64::from(self.right)) / 2.0,
            (f64::from(self.top) + f64::from(self.bottom)) / 2.0,
        )
    }

    /// Overlapping rectangle, `None` when the two do not meet at all.
    ///
    /// Rectangles that only share an edge yield a zero-area result.
    pub fn intersect(&self, other: &Bounds) -> Option<Bounds> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right.min(other.right);
        let bottom = self.bottom.min(other.bottom);

        if left > right || top > bottom {
            return None;
        }

        Some(Bounds {
            left,
            top,
            right,
            bottom,
        })
    }

    /// Smallest rectangle enclosing both.
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    pub fn contains(&self, other: &Bounds) -> bool {
        self.left <= other.left
            && self.top <= other.top
            && self.right >= other.right
            && self.bottom >= other.bottom
    }

    pub fn translate(&self, dx: i32, dy: i32) -> Bounds {
        Bounds {
            left: self.left.saturating_add(dx),
            top: self.top.saturating_add(dy),
            right: self.right.saturating_add(dx),
            bottom: self.bottom.saturating_add(dy),
        }
    }

    /// Share of `self` covered by `other`: `area(self ∩ other) / area(self)`.
    ///
    /// Intersection over self, not IoU. Zero when `self` has no area.
    pub fn overlap_ratio(&self, other: &Bounds) -> f64 {
        let own = self.area();
        if own <= 0 {
            return 0.0;
        }
        let shared = self.intersect(other).map_or(0, |b| b.area());
        shared as f64 / own as f64
    }

    /// Intersection over union, in `[0, 1]`.
    pub fn iou(&self, other: &Bounds) -> f64 {
        let shared = self.intersect(other).map_or(0, |b| b.area());
        let union = self.area() + other.area() - shared;
        if union <= 0 {
            return 0.0;
        }
        shared as f64 / union as f64
    }

    /// Euclidean distance between the two centers.
    pub fn center_distance(&self, other: &Bounds) -> f64 {
        let (ax, ay) = self.center();
        let (bx, by) = other.center();
        (ax - bx).hypot(ay - by)
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{},{}][{},{}]",
            self.left, self.top, self.right, self.bottom
        )
    }
}

impl FromStr for Bounds {
    type Err = MalformedBoundsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Bounds::parse(s)
    }
}

// ============================================================================
// Free-function forms
// ============================================================================

pub fn intersect(a: &Bounds, b: &Bounds) -> Option<Bounds> {
    a.intersect(b)
}

pub fn area(b: &Bounds) -> i64 {
    b.area()
}

pub fn overlap_ratio(a: &Bounds, b: &Bounds) -> f64 {
    a.overlap_ratio(b)
}

pub fn iou(a: &Bounds, b: &Bounds) -> f64 {
    a.iou(b)
}

pub fn center_distance(a: &Bounds, b: &Bounds) -> f64 {
    a.center_distance(b)
}

fn parse_pair(raw: &str, pair: &str) -> Result<(i32, i32), MalformedBoundsError> {
    let (x, y) = pair
        .split_once(',')
        .ok_or_else(|| MalformedBoundsError::new(raw, format!("'{pair}' is not an 'x,y' pair")))?;
    Ok((parse_coordinate(raw, x)?, parse_coordinate(raw, y)?))
}

fn parse_coordinate(raw: &str, token: &str) -> Result<i32, MalformedBoundsError> {
    token
        .trim()
        .parse::<i32>()
        .map_err(|_| {
            MalformedBoundsError::new(raw, format!("'{}' is not an integer", token.trim()))
        })
}
