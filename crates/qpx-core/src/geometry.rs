//! Target rectangles for area operations.
//!
//! A [`Geometry`] is an axis-aligned pixel rectangle: a signed origin and a
//! strictly positive size. The origin may place the rectangle partially or
//! fully outside an image. Validation never resizes it; clipping against an
//! image happens only when pixels are committed or read.
//!
//! # Coordinate System
//!
//! ```text
//! (0,0) ────────► X
//!   │
//!   │   ┌──────────┐
//!   │   │ Geometry │
//!   │   └──────────┘
//!   ▼
//!   Y
//! ```
//!
//! # Usage
//!
//! ```rust
//! use qpx_core::Geometry;
//!
//! let geometry = Geometry::new(10, 10, 113, 108).unwrap();
//! assert_eq!(geometry.area(), 113 * 108);
//! assert_eq!(geometry.to_string(), "113x108+10+10");
//!
//! let parsed: Geometry = "113x108+10+10".parse().unwrap();
//! assert_eq!(parsed, geometry);
//!
//! // Only the part inside a 100x100 image survives clipping
//! let clipped = geometry.intersect_bounds(100, 100).unwrap();
//! assert_eq!(clipped, Geometry::new(10, 10, 90, 90).unwrap());
//! ```

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A rectangle defined by origin (x, y) and dimensions (width, height).
///
/// # Invariants
///
/// - `width > 0` and `height > 0`
/// - `x` and `y` are unrestricted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Geometry {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
}

impl Geometry {
    /// Creates a new geometry.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] naming `width` or `height` when either is zero.
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Result<Self> {
        if width == 0 {
            return Err(Error::invalid_argument("width", "width must be positive"));
        }
        if height == 0 {
            return Err(Error::invalid_argument("height", "height must be positive"));
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// Creates a geometry whose size is already known to be positive.
    #[inline]
    pub(crate) const fn new_unchecked(x: i32, y: i32, width: u32, height: u32) -> Self {
        debug_assert!(width > 0 && height > 0);
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a geometry at the origin.
    pub fn from_size(width: u32, height: u32) -> Result<Self> {
        Self::new(0, 0, width, height)
    }

    /// Left edge.
    #[inline]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Top edge.
    #[inline]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Width in pixels.
    #[inline]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// Number of pixels covered, ignoring any image bounds.
    #[inline]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Number of flat-array elements this geometry needs at `channels`
    /// values per pixel, or `None` if that overflows `usize`.
    #[inline]
    pub fn element_count(&self, channels: usize) -> Option<usize> {
        usize::try_from(self.area()).ok()?.checked_mul(channels)
    }

    /// Returns `true` if the point lies inside this geometry.
    #[inline]
    pub const fn contains(&self, px: i32, py: i32) -> bool {
        (px as i64) >= self.x as i64
            && (px as i64) < self.right()
            && (py as i64) >= self.y as i64
            && (py as i64) < self.bottom()
    }

    /// Returns the part of this geometry inside a `width` x `height` image
    /// anchored at the origin, or `None` if they do not overlap.
    pub fn intersect_bounds(&self, width: u32, height: u32) -> Option<Geometry> {
        let left = (self.x as i64).max(0);
        let top = (self.y as i64).max(0);
        let right = self.right().min(width as i64);
        let bottom = self.bottom().min(height as i64);

        if left < right && top < bottom {
            Some(Geometry {
                x: left as i32,
                y: top as i32,
                width: (right - left) as u32,
                height: (bottom - top) as u32,
            })
        } else {
            None
        }
    }

    /// Returns the bounding box covering both geometries.
    ///
    /// Edges are saturated to the `i32`/`u32` coordinate space.
    pub fn union(&self, other: &Geometry) -> Geometry {
        let left = (self.x as i64).min(other.x as i64);
        let top = (self.y as i64).min(other.y as i64);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Geometry {
            x: left as i32,
            y: top as i32,
            width: (right - left).min(u32::MAX as i64) as u32,
            height: (bottom - top).min(u32::MAX as i64) as u32,
        }
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}{:+}{:+}", self.width, self.height, self.x, self.y)
    }
}

impl FromStr for Geometry {
    type Err = Error;

    /// Parses `WxH`, `WxH+X+Y` or `WxH-X-Y` (signs may be mixed).
    fn from_str(s: &str) -> Result<Self> {
        let bad = || Error::invalid_argument("geometry", format!("cannot parse '{s}'"));
        let s_trim = s.trim();

        let offset_start = s_trim.find(['+', '-']).unwrap_or(s_trim.len());
        let (size, offsets) = s_trim.split_at(offset_start);

        let (w, h) = size.split_once(['x', 'X']).ok_or_else(bad)?;
        let width: u32 = w.parse().map_err(|_| bad())?;
        let height: u32 = h.parse().map_err(|_| bad())?;

        let (x, y) = if offsets.is_empty() {
            (0, 0)
        } else {
            // Second signed number starts at the next sign after the first.
            let second = offsets[1..].find(['+', '-']).ok_or_else(bad)? + 1;
            let (xs, ys) = offsets.split_at(second);
            (
                xs.parse::<i32>().map_err(|_| bad())?,
                ys.parse::<i32>().map_err(|_| bad())?,
            )
        };

        Geometry::new(x, y, width, height)
    }
}
