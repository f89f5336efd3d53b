use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

// ─── Grid ───────────────────────────────────────────────────────────────────

/// One of the three bands along a canvas axis.
///
/// Serialized as its 1-based index so policy files read `[1, 2, 3]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Band {
    First = 1,
    Middle = 2,
    Last = 3,
}

impl Band {
    pub const ALL: [Band; 3] = [Band::First, Band::Middle, Band::Last];

    /// 1-based band index.
    pub fn index(self) -> u8 {
        self as u8
    }

    /// 0-based offset into a 3-element axis table.
    pub fn offset(self) -> usize {
        self as usize - 1
    }
}

impl TryFrom<u8> for Band {
    type Error = LayoutError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Band::First),
            2 => Ok(Band::Middle),
            3 => Ok(Band::Last),
            other => Err(LayoutError::InvalidBand(other)),
        }
    }
}

impl From<Band> for u8 {
    fn from(band: Band) -> Self {
        band.index()
    }
}

/// A grid cell, addressed as (vertical band, horizontal band).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub vertical: Band,
    pub horizontal: Band,
}

impl Cell {
    pub fn new(vertical: Band, horizontal: Band) -> Self {
        Self {
            vertical,
            horizontal,
        }
    }

    /// Build a cell from raw 1-based indices.
    pub fn from_indices(vertical: u8, horizontal: u8) -> Result<Self, LayoutError> {
        Ok(Self::new(Band::try_from(vertical)?, Band::try_from(horizontal)?))
    }

    /// All nine cells, vertical-major.
    pub fn all() -> impl Iterator<Item = Cell> {
        Band::ALL
            .into_iter()
            .flat_map(|v| Band::ALL.into_iter().map(move |h| Cell::new(v, h)))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.vertical.index(), self.horizontal.index())
    }
}

// ─── Geometry ───────────────────────────────────────────────────────────────

/// A closed interval `[start, end]` along one axis, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start: f64,
    pub end: f64,
}

impl Span {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> f64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 0.0
    }
}

/// A pixel point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// An axis-aligned rectangle: start point plus dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub start: Point,
    pub size: Size,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            start: Point { x, y },
            size: Size { width, height },
        }
    }

    pub fn right(&self) -> f64 {
        self.start.x + self.size.width
    }

    pub fn bottom(&self) -> f64 {
        self.start.y + self.size.height
    }

    pub fn area(&self) -> f64 {
        self.size.width * self.size.height
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.start.x + self.size.width / 2.0,
            y: self.start.y + self.size.height / 2.0,
        }
    }

    /// True when the two rectangles share interior area. Touching edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.start.x < other.right()
            && other.start.x < self.right()
            && self.start.y < other.bottom()
            && other.start.y < self.bottom()
    }

    /// True when `other` lies inside `self`, allowing `eps` of floating-point slack.
    pub fn contains(&self, other: &Rect, eps: f64) -> bool {
        other.start.x >= self.start.x - eps
            && other.start.y >= self.start.y - eps
            && other.right() <= self.right() + eps
            && other.bottom() <= self.bottom() + eps
    }
}

// ─── Canvas proportions ─────────────────────────────────────────────────────

/// Fractions of each canvas axis given to the middle band and to each outer band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Proportions {
    pub vertical_mid: f64,
    pub vertical_outer: f64,
    pub horizontal_mid: f64,
    pub horizontal_outer: f64,
}

impl Proportions {
    /// Reject fractions that are negative, non-finite, or whose bands overflow the axis.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let fractions = [
            ("vertical_mid", self.vertical_mid),
            ("vertical_outer", self.vertical_outer),
            ("horizontal_mid", self.horizontal_mid),
            ("horizontal_outer", self.horizontal_outer),
        ];
        for (name, value) in fractions {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutError::InvalidProportions(format!(
                    "{name} must be a non-negative fraction, got {value}"
                )));
            }
        }
        if self.vertical_mid + self.vertical_outer * 2.0 > 1.0 {
            return Err(LayoutError::InvalidProportions(format!(
                "vertical bands exceed the canvas: {} + 2 x {} > 1",
                self.vertical_mid, self.vertical_outer
            )));
        }
        if self.horizontal_mid + self.horizontal_outer * 2.0 > 1.0 {
            return Err(LayoutError::InvalidProportions(format!(
                "horizontal bands exceed the canvas: {} + 2 x {} > 1",
                self.horizontal_mid, self.horizontal_outer
            )));
        }
        Ok(())
    }
}

impl Default for Proportions {
    fn default() -> Self {
        Self {
            vertical_mid: 0.6,
            vertical_outer: 0.2,
            horizontal_mid: 0.6,
            horizontal_outer: 0.2,
        }
    }
}
