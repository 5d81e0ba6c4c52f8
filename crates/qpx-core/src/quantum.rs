//! Quantum types: the per-channel storage representation of an image.
//!
//! An image stores every (pixel, channel) pair as one *quantum*. The depth
//! of that quantum is one of three fixed representations:
//!
//! | Depth | Storage | Range |
//! |---|---|---|
//! | [`QuantumDepth::Q8`] | `u8` | 0 - 255 |
//! | [`QuantumDepth::Q16`] | `u16` | 0 - 65535 |
//! | [`QuantumDepth::Hdri`] | `f32` | 0.0 - 65535.0 (values outside are kept) |
//!
//! The [`Quantum`] trait carries the scalar conversion rules between a
//! quantum and each caller-facing numeric domain. None of them can fail:
//! integer storage clamps, float storage keeps what it is given.
//!
//! # Build-time quantum
//!
//! [`QuantumType`] is the default quantum for [`Image`](crate::Image) and is
//! selected by cargo features:
//!
//! - no feature: HDRI (`f32`)
//! - `q16`: `u16`
//! - `q8`: `u8` (takes precedence over `q16`)
//!
//! # Example
//!
//! ```
//! use qpx_core::{Quantum, QuantumDepth};
//!
//! // 8-bit values scale linearly into the 16-bit range
//! assert_eq!(u16::from_char(255), 65535);
//! assert_eq!(u16::from_char(128).to_char(), 128);
//!
//! // Integer input is already in the native range and clamps
//! assert_eq!(u8::from_int(300), 255);
//! assert_eq!(f32::DEPTH, QuantumDepth::Hdri);
//! ```

use std::fmt;

/// The build-time default quantum.
#[cfg(feature = "q8")]
pub type QuantumType = u8;

/// The build-time default quantum.
#[cfg(all(feature = "q16", not(feature = "q8")))]
pub type QuantumType = u16;

/// The build-time default quantum.
#[cfg(not(any(feature = "q8", feature = "q16")))]
pub type QuantumType = f32;

/// Runtime tag for a quantum depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuantumDepth {
    /// 8-bit unsigned integer quantum.
    Q8,
    /// 16-bit unsigned integer quantum.
    Q16,
    /// 32-bit float quantum over the 16-bit range (high dynamic range).
    Hdri,
}

impl QuantumDepth {
    /// Number of bits in the storage type.
    #[inline]
    pub const fn bits(&self) -> u32 {
        match self {
            Self::Q8 => 8,
            Self::Q16 => 16,
            Self::Hdri => 32,
        }
    }

    /// Maximum nominal quantum value.
    #[inline]
    pub const fn range(&self) -> f64 {
        match self {
            Self::Q8 => 255.0,
            Self::Q16 | Self::Hdri => 65535.0,
        }
    }

    /// Whether the storage is floating point.
    #[inline]
    pub const fn is_hdri(&self) -> bool {
        matches!(self, Self::Hdri)
    }

    /// Bytes per stored channel value.
    #[inline]
    pub const fn bytes_per_channel(&self) -> usize {
        (self.bits() / 8) as usize
    }
}

impl fmt::Display for QuantumDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Q8 => "Q8",
            Self::Q16 => "Q16",
            Self::Hdri => "Q16HDRI",
        };
        f.write_str(name)
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
    impl Sealed for f32 {}
}

/// A per-channel storage type.
///
/// Implemented for `u8` (Q8), `u16` (Q16) and `f32` (HDRI). The trait is
/// sealed: the set of depths is closed.
///
/// The `char` / `short` conversions scale linearly between the full 8-bit
/// or 16-bit range and the quantum range. The `int` / `double` conversions
/// treat the value as already expressed in the quantum's native range.
pub trait Quantum:
    Copy + Default + PartialEq + PartialOrd + fmt::Debug + Send + Sync + 'static + sealed::Sealed
{
    /// Depth tag of this storage type.
    const DEPTH: QuantumDepth;

    /// Maximum nominal value, as `f64`.
    const RANGE: f64 = Self::DEPTH.range();

    /// Scale an 8-bit value into the quantum range.
    fn from_char(v: u8) -> Self;

    /// Scale a quantum down to 8 bits.
    fn to_char(self) -> u8;

    /// Scale a 16-bit value into the quantum range.
    fn from_short(v: u16) -> Self;

    /// Scale a quantum to 16 bits.
    fn to_short(self) -> u16;

    /// Convert a native-range integer. Integer storage clamps.
    fn from_int(v: i32) -> Self;

    /// Native-range integer value of this quantum.
    fn to_int(self) -> i32;

    /// Convert a native-range float, rounding for integer storage.
    fn from_double(v: f64) -> Self;

    /// Native-range float value of this quantum.
    fn to_double(self) -> f64;

    /// Zero value (black).
    #[inline]
    fn zero() -> Self {
        Self::default()
    }

    /// Full-range value (white).
    #[inline]
    fn full_range() -> Self {
        Self::from_double(Self::RANGE)
    }
}

/// Clamps `v` to `[0, max]` and rounds half up. NaN maps to zero.
#[inline]
fn clamp_round(v: f64, max: f64) -> f64 {
    if !(v > 0.0) {
        0.0
    } else if v >= max {
        max
    } else {
        (v + 0.5).floor()
    }
}

impl Quantum for u8 {
    const DEPTH: QuantumDepth = QuantumDepth::Q8;

    #[inline]
    fn from_char(v: u8) -> Self {
        v
    }

    #[inline]
    fn to_char(self) -> u8 {
        self
    }

    #[inline]
    fn from_short(v: u16) -> Self {
        ((v as u32 + 128) / 257) as u8
    }

    #[inline]
    fn to_short(self) -> u16 {
        self as u16 * 257
    }

    #[inline]
    fn from_int(v: i32) -> Self {
        v.clamp(0, u8::MAX as i32) as u8
    }

    #[inline]
    fn to_int(self) -> i32 {
        self as i32
    }

    #[inline]
    fn from_double(v: f64) -> Self {
        clamp_round(v, 255.0) as u8
    }

    #[inline]
    fn to_double(self) -> f64 {
        self as f64
    }
}

impl Quantum for u16 {
    const DEPTH: QuantumDepth = QuantumDepth::Q16;

    #[inline]
    fn from_char(v: u8) -> Self {
        v as u16 * 257
    }

    #[inline]
    fn to_char(self) -> u8 {
        ((self as u32 + 128) / 257) as u8
    }

    #[inline]
    fn from_short(v: u16) -> Self {
        v
    }

    #[inline]
    fn to_short(self) -> u16 {
        self
    }

    #[inline]
    fn from_int(v: i32) -> Self {
        v.clamp(0, u16::MAX as i32) as u16
    }

    #[inline]
    fn to_int(self) -> i32 {
        self as i32
    }

    #[inline]
    fn from_double(v: f64) -> Self {
        clamp_round(v, 65535.0) as u16
    }

    #[inline]
    fn to_double(self) -> f64 {
        self as f64
    }
}

impl Quantum for f32 {
    const DEPTH: QuantumDepth = QuantumDepth::Hdri;

    #[inline]
    fn from_char(v: u8) -> Self {
        v as f32 * 257.0
    }

    #[inline]
    fn to_char(self) -> u8 {
        clamp_round(self as f64 / 257.0, 255.0) as u8
    }

    #[inline]
    fn from_short(v: u16) -> Self {
        v as f32
    }

    #[inline]
    fn to_short(self) -> u16 {
        clamp_round(self as f64, 65535.0) as u16
    }

    // HDRI keeps out-of-range values; only integer storage clamps.
    #[inline]
    fn from_int(v: i32) -> Self {
        v as f32
    }

    #[inline]
    fn to_int(self) -> i32 {
        (self as f64).round() as i32
    }

    #[inline]
    fn from_double(v: f64) -> Self {
        v as f32
    }

    #[inline]
    fn to_double(self) -> f64 {
        self as f64
    }
}
