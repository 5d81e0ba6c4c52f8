//! Image buffer owning the pixel quanta.
//!
//! [`Image`] holds exactly one pixel buffer: a contiguous, row-major store of
//! quanta with the channel as the fastest-varying index.
//!
//! # Memory Layout
//!
//! ```text
//! offset = (row * width + col) * channel_count + channel
//!
//! Memory: [R G B R G B R G B ...]  ← Row 0
//!         [R G B R G B R G B ...]  ← Row 1
//!         ...
//! ```
//!
//! Width, height and color model are fixed for the lifetime of the image.
//! Pixel data is reached for region access through
//! [`pixels_mut`](Image::pixels_mut), which hands out a scoped
//! [`PixelCollection`].
//!
//! # Usage
//!
//! ```rust
//! use qpx_core::{ColorModel, Image};
//!
//! let mut img: Image<u16> = Image::new(64, 32, ColorModel::Rgb).unwrap();
//! assert_eq!(img.channel_count(), 3);
//!
//! {
//!     let mut pixels = img.pixels_mut();
//!     pixels.set_area(0, 0, 1, 1, Some(&[255u8, 0, 0][..])).unwrap();
//! }
//! assert_eq!(img.pixel(0, 0), Some(&[65535u16, 0, 0][..]));
//! ```
//!
//! # Dependencies
//!
//! - [`crate::quantum::Quantum`] - Storage type of each channel value
//! - [`crate::color_model::ColorModel`] - Channel count and order
//! - [`rayon`] - Parallel depth conversion (optional)

use crate::color_model::ColorModel;
use crate::error::{Error, Result};
use crate::geometry::Geometry;
use crate::pixels::PixelCollection;
use crate::quantum::{Quantum, QuantumDepth, QuantumType};
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Owned image with a fixed quantum depth.
///
/// `Image<Q>` stores pixel data where `Q` is the quantum type (`u8`, `u16`
/// or `f32`). The default is the build-time [`QuantumType`].
///
/// # Memory Management
///
/// The pixel buffer lives in an [`Arc<Vec<Q>>`]: clones share data and the
/// first mutation through a shared clone copies it.
#[derive(Clone)]
pub struct Image<Q: Quantum = QuantumType> {
    data: Arc<Vec<Q>>,
    width: u32,
    height: u32,
    color_model: ColorModel,
    generation: u64,
}

impl<Q: Quantum> Image<Q> {
    /// Creates a new black image.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDimensions`] if either dimension is zero or the buffer
    /// size overflows.
    pub fn new(width: u32, height: u32, color_model: ColorModel) -> Result<Self> {
        let len = buffer_len(width, height, color_model)?;
        Ok(Self::from_parts(vec![Q::zero(); len], width, height, color_model))
    }

    /// Creates an image from existing quanta.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDimensions`] if `data.len()` is not exactly
    /// `width * height * channel_count`.
    pub fn from_data(width: u32, height: u32, color_model: ColorModel, data: Vec<Q>) -> Result<Self> {
        let expected = buffer_len(width, height, color_model)?;
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} elements, got {}", expected, data.len()),
            ));
        }
        Ok(Self::from_parts(data, width, height, color_model))
    }

    /// Creates an image with every pixel set to `pixel`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use qpx_core::{ColorModel, Image};
    ///
    /// let white: Image<u8> = Image::filled(4, 4, ColorModel::Rgb, &[255, 255, 255]).unwrap();
    /// assert_eq!(white.pixel(3, 3), Some(&[255u8, 255, 255][..]));
    /// ```
    pub fn filled(width: u32, height: u32, color_model: ColorModel, pixel: &[Q]) -> Result<Self> {
        let channels = color_model.channel_count();
        if pixel.len() != channels {
            return Err(Error::channel_mismatch(channels, pixel.len()));
        }
        let len = buffer_len(width, height, color_model)?;
        let mut data = Vec::with_capacity(len);
        for _ in 0..len / channels {
            data.extend_from_slice(pixel);
        }
        Ok(Self::from_parts(data, width, height, color_model))
    }

    fn from_parts(data: Vec<Q>, width: u32, height: u32, color_model: ColorModel) -> Self {
        Self {
            data: Arc::new(data),
            width,
            height,
            color_model,
            generation: 0,
        }
    }

    /// Returns the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the image dimensions as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the color model.
    #[inline]
    pub fn color_model(&self) -> ColorModel {
        self.color_model
    }

    /// Returns the number of quanta per pixel.
    #[inline]
    pub fn channel_count(&self) -> usize {
        self.color_model.channel_count()
    }

    /// Returns the quantum depth.
    #[inline]
    pub fn depth(&self) -> QuantumDepth {
        Q::DEPTH
    }

    /// Returns a geometry covering the entire image.
    #[inline]
    pub fn bounds(&self) -> Geometry {
        Geometry::new_unchecked(0, 0, self.width, self.height)
    }

    /// Returns the raw pixel buffer.
    #[inline]
    pub fn data(&self) -> &[Q] {
        &self.data
    }

    /// Returns the buffer mutably, copying it first if it is shared.
    #[inline]
    pub(crate) fn data_mut(&mut self) -> &mut [Q] {
        Arc::make_mut(&mut self.data).as_mut_slice()
    }

    /// Number of accessor releases that committed writes.
    ///
    /// Starts at zero and grows by one each time a [`PixelCollection`] that
    /// wrote pixels is released.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn bump_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Returns the channels of the pixel at (x, y), or `None` outside.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[Q]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let channels = self.channel_count();
        let offset = (y as usize * self.width as usize + x as usize) * channels;
        self.data.get(offset..offset + channels)
    }

    /// Acquires the pixel accessor.
    ///
    /// The accessor borrows the image exclusively until it is released or
    /// dropped, so no other access can interleave with it.
    pub fn pixels_mut(&mut self) -> PixelCollection<'_, Q> {
        PixelCollection::acquire(self)
    }

    /// Converts to a different quantum depth.
    ///
    /// Each quantum is carried through its native-range value, so HDRI
    /// values outside the integer range clamp when narrowing.
    ///
    /// # Example
    ///
    /// ```rust
    /// use qpx_core::{ColorModel, Image};
    ///
    /// let img: Image<u8> = Image::filled(2, 2, ColorModel::Gray, &[255]).unwrap();
    /// let deep: Image<u16> = img.convert_depth();
    /// assert_eq!(deep.pixel(0, 0), Some(&[65535u16][..]));
    /// ```
    pub fn convert_depth<Q2: Quantum>(&self) -> Image<Q2> {
        let scale = Q2::RANGE / Q::RANGE;
        let convert = |q: &Q| Q2::from_double(q.to_double() * scale);

        #[cfg(feature = "parallel")]
        let data: Vec<Q2> = self.data.par_iter().map(convert).collect();
        #[cfg(not(feature = "parallel"))]
        let data: Vec<Q2> = self.data.iter().map(convert).collect();

        Image::<Q2>::from_parts(data, self.width, self.height, self.color_model)
    }
}

impl<Q: Quantum> std::fmt::Debug for Image<Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("color_model", &self.color_model)
            .field("depth", &Q::DEPTH)
            .field("generation", &self.generation)
            .finish()
    }
}

fn buffer_len(width: u32, height: u32, color_model: ColorModel) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(Error::invalid_dimensions(width, height, "dimensions must be positive"));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(color_model.channel_count()))
        .ok_or_else(|| Error::invalid_dimensions(width, height, "buffer size overflows"))
}
