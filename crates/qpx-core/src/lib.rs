//! # qpx-core
//!
//! Region-based pixel access for raster images.
//!
//! This crate provides the pieces needed to read and write rectangular
//! pixel regions through flat value arrays:
//!
//! - [`Quantum`] - Per-channel storage type (`u8`, `u16` or `f32` HDRI)
//! - [`Element`] - Caller-facing scalar families for value arrays
//! - [`Geometry`] - Target rectangles, possibly extending past the image
//! - [`Image`] - Owned pixel buffer with a fixed color model
//! - [`PixelCollection`] - Scoped accessor with `set_area` / `get_area`
//!
//! ## Design Philosophy
//!
//! Every area write is validated in full before a single quantum changes.
//! A value array must match the *unclipped* rectangle exactly; the part of
//! the rectangle outside the image is then skipped silently.
//!
//! ```rust
//! use qpx_core::prelude::*;
//!
//! let mut img: Image<u16> = Image::new(123, 118, ColorModel::Rgb).unwrap();
//! let mut pixels = img.pixels_mut();
//!
//! // 4 values for a 1000x1000 RGB region: rejected, nothing written
//! let err = pixels.set_area(10, 10, 1000, 1000, Some(&[0u8; 4][..])).unwrap_err();
//! assert!(err.is_invalid_argument());
//! ```
//!
//! ## Quantum Depth
//!
//! Generic code takes any `Q: Quantum`. [`QuantumType`] is the build-wide
//! default picked by cargo features:
//!
//! - `q8` - 8-bit storage
//! - `q16` - 16-bit storage
//! - neither - 32-bit float HDRI storage
//!
//! ## Feature Flags
//!
//! - `parallel` - Parallel depth conversion via rayon (enabled by default)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod color_model;
pub mod element;
pub mod error;
pub mod geometry;
pub mod image;
pub mod pixels;
pub mod quantum;

// Re-exports for convenience
pub use color_model::{ColorModel, PixelChannel};
pub use element::Element;
pub use error::{Error, Result};
pub use geometry::Geometry;
pub use image::Image;
pub use pixels::PixelCollection;
pub use quantum::{Quantum, QuantumDepth, QuantumType};

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```
/// use qpx_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::color_model::{ColorModel, PixelChannel};
    pub use crate::element::Element;
    pub use crate::error::{Error, Result};
    pub use crate::geometry::Geometry;
    pub use crate::image::Image;
    pub use crate::pixels::PixelCollection;
    pub use crate::quantum::{Quantum, QuantumDepth, QuantumType};
}
