//! Units, rectangles and colors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// English Metric Units per inch.
pub const EMU_PER_INCH: i64 = 914_400;

/// English Metric Units per typographic point.
pub const EMU_PER_POINT: i64 = 12_700;

/// Largest offset or extent accepted for new shapes, in points.
pub const MAX_COORDINATE_PT: f64 = 50_000.0;

/// [`MAX_COORDINATE_PT`] in EMU.
pub const MAX_COORDINATE_EMU: i64 = 50_000 * EMU_PER_POINT;

/// Convert points to EMU, rounding to the nearest unit.
pub fn points_to_emu(points: f64) -> i64 {
    (points * EMU_PER_POINT as f64).round() as i64
}

/// Convert EMU to whole points, truncating toward zero.
pub fn emu_to_points(emu: i64) -> i64 {
    emu / EMU_PER_POINT
}

/// A rectangle in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub left: i64,
    /// Top edge
    pub top: i64,
    /// Width
    pub width: i64,
    /// Height
    pub height: i64,
}

impl Rect {
    /// Create a rectangle from EMU values.
    pub fn new(left: i64, top: i64, width: i64, height: i64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Create a rectangle from point values.
    pub fn from_points(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left: points_to_emu(left),
            top: points_to_emu(top),
            width: points_to_emu(width),
            height: points_to_emu(height),
        }
    }

    /// Whether every field lies within [`MAX_COORDINATE_EMU`] and the
    /// extents are non-negative.
    pub fn is_in_bounds(&self) -> bool {
        let within = |v: i64| v.abs() <= MAX_COORDINATE_EMU;
        within(self.left)
            && within(self.top)
            && (0..=MAX_COORDINATE_EMU).contains(&self.width)
            && (0..=MAX_COORDINATE_EMU).contains(&self.height)
    }

    /// Right edge.
    pub fn right(&self) -> i64 {
        self.left.saturating_add(self.width)
    }

    /// Bottom edge.
    pub fn bottom(&self) -> i64 {
        self.top.saturating_add(self.height)
    }

    /// Vertical center.
    pub fn center_y(&self) -> i64 {
        self.top.saturating_add(self.height / 2)
    }

    /// Horizontal center.
    pub fn center_x(&self) -> i64 {
        self.left.saturating_add(self.width / 2)
    }
}

/// A 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse `RRGGBB` or `#RRGGBB`.
    pub fn from_hex(value: &str) -> Option<Self> {
        let hex = value.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Uppercase `RRGGBB` without the leading `#`, as written into `a:srgbClr`.
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.hex())
    }
}

impl FromStr for Rgb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgb::from_hex(s).ok_or_else(|| format!("invalid color '{}', expected #RRGGBB", s))
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}
