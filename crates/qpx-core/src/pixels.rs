//! Scoped, bounds-checked access to rectangular pixel regions.
//!
//! A [`PixelCollection`] is acquired from an [`Image`] with
//! [`Image::pixels_mut`] and exposes get/set operations over rectangles using
//! flat value arrays of any [`Element`] family.
//!
//! # Flat array layout
//!
//! Values are ordered row, then column, then channel:
//!
//! ```text
//! index = (row * geometry.width + col) * channel_count + channel
//! ```
//!
//! # Contract
//!
//! - An absent geometry or value array fails with
//!   [`Error::NullArgument`] naming `geometry` or `values`.
//! - A value array must hold exactly `width * height * channel_count`
//!   elements of the *unclipped* rectangle. Shorter and longer arrays both
//!   fail with [`Error::InvalidArgument`] naming `values`.
//! - Every check runs before the first quantum is written.
//! - Pixels of the rectangle that fall outside the image are skipped on
//!   write and read back as zero. This is never an error.
//!
//! # Lifecycle
//!
//! The collection mutably borrows its image, so two collections can never
//! be alive over the same image. Dropping it (or calling
//! [`release`](PixelCollection::release)) ends the access session; if
//! anything was written the image [`generation`](Image::generation) advances.
//!
//! # Example
//!
//! ```rust
//! use qpx_core::{ColorModel, Image};
//!
//! let mut img: Image<u8> = Image::filled(123, 118, ColorModel::Rgb, &[255, 255, 255]).unwrap();
//!
//! let mut pixels = img.pixels_mut();
//! let black = vec![0i32; 113 * 108 * 3];
//! pixels.set_area(10, 10, 113, 108, Some(&black[..])).unwrap();
//!
//! let err = pixels.set_area(10, 10, 1000, 1000, Some(&[0i32, 0, 0, 0][..])).unwrap_err();
//! assert_eq!(err.param(), Some("values"));
//! pixels.release();
//!
//! assert_eq!(img.pixel(122, 117), Some(&[0u8, 0, 0][..]));
//! assert_eq!(img.generation(), 1);
//! ```

use crate::color_model::PixelChannel;
use crate::element::Element;
use crate::error::{Error, Result};
use crate::geometry::Geometry;
use crate::image::Image;
use crate::quantum::{Quantum, QuantumType};
use tracing::{debug, trace};

/// Scoped pixel accessor over one image.
///
/// Obtained from [`Image::pixels_mut`]. See the [module docs](self) for the
/// argument contract.
pub struct PixelCollection<'a, Q: Quantum = QuantumType> {
    image: &'a mut Image<Q>,
    dirty: Option<Geometry>,
}

impl<'a, Q: Quantum> PixelCollection<'a, Q> {
    pub(crate) fn acquire(image: &'a mut Image<Q>) -> Self {
        trace!(
            width = image.width(),
            height = image.height(),
            channels = image.channel_count(),
            depth = %image.depth(),
            "pixel collection acquired"
        );
        Self { image, dirty: None }
    }

    /// Width of the underlying image.
    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height of the underlying image.
    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Quanta per pixel of the underlying image.
    #[inline]
    pub fn channel_count(&self) -> usize {
        self.image.channel_count()
    }

    /// Read-only view of the underlying image.
    #[inline]
    pub fn image(&self) -> &Image<Q> {
        self.image
    }

    /// Bounding box of everything written so far in this session.
    #[inline]
    pub fn dirty_region(&self) -> Option<Geometry> {
        self.dirty
    }

    /// Storage slot of `channel` in each pixel, if the color model has it.
    #[inline]
    pub fn channel_index(&self, channel: PixelChannel) -> Option<usize> {
        self.image.color_model().channel_index(channel)
    }

    // ------------------------------------------------------------------
    // Write path
    // ------------------------------------------------------------------

    /// Writes a rectangle given by its origin and size.
    ///
    /// Equivalent to [`set_area_geometry`](Self::set_area_geometry) with a
    /// geometry built from the four coordinates.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] naming `width` / `height` if either is zero
    /// - [`Error::NullArgument`] naming `values` if `values` is `None`
    /// - [`Error::InvalidArgument`] naming `values` on any length mismatch
    pub fn set_area<E: Element>(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        values: Option<&[E]>,
    ) -> Result<()> {
        let geometry = Geometry::new(x, y, width, height)?;
        self.set_area_geometry(Some(&geometry), values)
    }

    /// Writes a rectangle of values converted into the image's quanta.
    ///
    /// # Errors
    ///
    /// - [`Error::NullArgument`] naming `geometry`, then `values`, if absent
    /// - [`Error::InvalidArgument`] naming `values` unless
    ///   `values.len() == geometry.area() * channel_count`
    pub fn set_area_geometry<E: Element>(
        &mut self,
        geometry: Option<&Geometry>,
        values: Option<&[E]>,
    ) -> Result<()> {
        let geometry = geometry.ok_or_else(|| Error::null_argument("geometry"))?;
        let values = values.ok_or_else(|| Error::null_argument("values"))?;
        trace!(%geometry, element = E::NAME, len = values.len(), "set_area");

        self.check_len(geometry, values.len(), "values")?;
        self.commit(geometry, values);
        Ok(())
    }

    /// Writes every pixel of the image.
    ///
    /// `values` must hold exactly `width * height * channel_count` elements.
    pub fn set_values<E: Element>(&mut self, values: Option<&[E]>) -> Result<()> {
        let bounds = self.image.bounds();
        self.set_area_geometry(Some(&bounds), values)
    }

    /// Writes a single pixel.
    ///
    /// # Errors
    ///
    /// - [`Error::OutOfBounds`] if (x, y) is outside the image
    /// - [`Error::InvalidArgument`] naming `value` unless it holds exactly
    ///   one value per channel
    pub fn set_pixel<E: Element>(&mut self, x: i32, y: i32, value: &[E]) -> Result<()> {
        if self.pixel(x, y).is_none() {
            return Err(Error::out_of_bounds(x, y, self.width(), self.height()));
        }
        let geometry = Geometry::new_unchecked(x, y, 1, 1);
        self.check_len(&geometry, value.len(), "value")?;
        self.commit(&geometry, value);
        Ok(())
    }

    fn check_len(&self, geometry: &Geometry, len: usize, param: &'static str) -> Result<()> {
        let channels = self.channel_count();
        match geometry.element_count(channels) {
            Some(expected) if expected == len => Ok(()),
            Some(expected) => {
                debug!(%geometry, expected, got = len, "rejected value array");
                Err(Error::invalid_argument(
                    param,
                    format!(
                        "expected {} elements for {} at {} channels, got {}",
                        expected, geometry, channels, len
                    ),
                ))
            }
            None => Err(Error::invalid_argument(
                param,
                format!("element count of {geometry} overflows"),
            )),
        }
    }

    /// Converts and stores the in-bounds part of a validated rectangle.
    fn commit<E: Element>(&mut self, geometry: &Geometry, values: &[E]) {
        let Some(clip) = geometry.intersect_bounds(self.width(), self.height()) else {
            debug!(%geometry, "area lies outside the image, nothing written");
            return;
        };
        if clip != *geometry {
            debug!(%geometry, %clip, "area clipped to image bounds");
        }

        let channels = self.channel_count();
        let image_width = self.width() as usize;
        let src_stride = geometry.width() as usize * channels;
        let col_skip = (clip.x() as i64 - geometry.x() as i64) as usize;
        let row_skip = (clip.y() as i64 - geometry.y() as i64) as usize;
        let run = clip.width() as usize * channels;

        let data = self.image.data_mut();
        for row in 0..clip.height() as usize {
            let src_start = (row_skip + row) * src_stride + col_skip * channels;
            let dst_start = ((clip.y() as usize + row) * image_width + clip.x() as usize) * channels;

            let src = &values[src_start..src_start + run];
            let dst = &mut data[dst_start..dst_start + run];
            for (q, &v) in dst.iter_mut().zip(src) {
                *q = v.to_quantum();
            }
        }

        self.dirty = Some(match self.dirty {
            Some(dirty) => dirty.union(&clip),
            None => clip,
        });
    }

    // ------------------------------------------------------------------
    // Read path
    // ------------------------------------------------------------------

    /// Reads a rectangle given by its origin and size.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] naming `width` / `height` if either is zero.
    pub fn get_area<E: Element>(&self, x: i32, y: i32, width: u32, height: u32) -> Result<Vec<E>> {
        let geometry = Geometry::new(x, y, width, height)?;
        self.get_area_geometry(Some(&geometry))
    }

    /// Reads a rectangle into a flat array of `E`.
    ///
    /// The result always holds `geometry.area() * channel_count` elements.
    /// Positions outside the image are zero.
    ///
    /// # Example
    ///
    /// ```rust
    /// use qpx_core::{ColorModel, Geometry, Image};
    ///
    /// let mut img: Image<u16> = Image::filled(2, 2, ColorModel::Gray, &[65535]).unwrap();
    /// let pixels = img.pixels_mut();
    ///
    /// let geometry = Geometry::new(1, 1, 2, 1).unwrap();
    /// let area: Vec<u8> = pixels.get_area_geometry(Some(&geometry)).unwrap();
    /// assert_eq!(area, vec![255, 0]);
    /// ```
    pub fn get_area_geometry<E: Element>(&self, geometry: Option<&Geometry>) -> Result<Vec<E>> {
        let geometry = geometry.ok_or_else(|| Error::null_argument("geometry"))?;
        trace!(%geometry, element = E::NAME, "get_area");

        let channels = self.channel_count();
        let len = geometry
            .element_count(channels)
            .ok_or_else(|| Error::invalid_argument("geometry", format!("element count of {geometry} overflows")))?;

        let mut out = vec![E::default(); len];
        let Some(clip) = geometry.intersect_bounds(self.width(), self.height()) else {
            return Ok(out);
        };

        let image_width = self.width() as usize;
        let dst_stride = geometry.width() as usize * channels;
        let col_skip = (clip.x() as i64 - geometry.x() as i64) as usize;
        let row_skip = (clip.y() as i64 - geometry.y() as i64) as usize;
        let run = clip.width() as usize * channels;

        let data = self.image.data();
        for row in 0..clip.height() as usize {
            let src_start = ((clip.y() as usize + row) * image_width + clip.x() as usize) * channels;
            let dst_start = (row_skip + row) * dst_stride + col_skip * channels;

            let src = &data[src_start..src_start + run];
            let dst = &mut out[dst_start..dst_start + run];
            for (v, &q) in dst.iter_mut().zip(src) {
                *v = E::from_quantum(q);
            }
        }
        Ok(out)
    }

    /// Reads the whole image into a flat array of `E`.
    pub fn values<E: Element>(&self) -> Vec<E> {
        self.image.data().iter().map(|&q| E::from_quantum(q)).collect()
    }

    /// Channels of the pixel at (x, y), or `None` outside the image.
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> Option<&[Q]> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        self.image.pixel(x, y)
    }

    // ------------------------------------------------------------------
    // Channel-mapped export
    // ------------------------------------------------------------------

    /// Reads a rectangle with channels reordered by `mapping`.
    ///
    /// Each letter of `mapping` (`R G B A C M Y K I`) selects one channel of
    /// the image's color model, so `"BGR"` on an RGB image swaps red and
    /// blue and `"R"` extracts a single plane.
    ///
    /// # Errors
    ///
    /// - [`Error::NullArgument`] naming `geometry` if absent
    /// - [`Error::InvalidArgument`] naming `mapping` if it is empty or names
    ///   a channel the image does not have
    ///
    /// # Example
    ///
    /// ```rust
    /// use qpx_core::{ColorModel, Image};
    ///
    /// let mut img: Image<u8> = Image::filled(2, 1, ColorModel::Rgb, &[10, 20, 30]).unwrap();
    /// let pixels = img.pixels_mut();
    /// let bgr = pixels.to_byte_array(Some(&pixels.image().bounds()), "BGR").unwrap();
    /// assert_eq!(bgr, vec![30, 20, 10, 30, 20, 10]);
    /// ```
    pub fn export_area<E: Element>(&self, geometry: Option<&Geometry>, mapping: &str) -> Result<Vec<E>> {
        let geometry = geometry.ok_or_else(|| Error::null_argument("geometry"))?;
        let indices = self.mapping_indices(mapping)?;

        let channels = self.channel_count();
        let area: Vec<E> = self.get_area_geometry(Some(geometry))?;
        if indices.len() == channels && indices.iter().enumerate().all(|(i, &c)| i == c) {
            return Ok(area);
        }

        let mut out = Vec::with_capacity(area.len() / channels * indices.len());
        for pixel in area.chunks_exact(channels) {
            out.extend(indices.iter().map(|&i| pixel[i]));
        }
        Ok(out)
    }

    /// [`export_area`](Self::export_area) as 8-bit values.
    pub fn to_byte_array(&self, geometry: Option<&Geometry>, mapping: &str) -> Result<Vec<u8>> {
        self.export_area(geometry, mapping)
    }

    /// [`export_area`](Self::export_area) as 16-bit values.
    pub fn to_short_array(&self, geometry: Option<&Geometry>, mapping: &str) -> Result<Vec<u16>> {
        self.export_area(geometry, mapping)
    }

    fn mapping_indices(&self, mapping: &str) -> Result<Vec<usize>> {
        if mapping.is_empty() {
            return Err(Error::invalid_argument("mapping", "mapping cannot be empty"));
        }
        let model = self.image.color_model();
        mapping
            .chars()
            .map(|c| {
                PixelChannel::from_mapping_char(c)
                    .and_then(|channel| model.channel_index(channel))
                    .ok_or_else(|| {
                        Error::invalid_argument(
                            "mapping",
                            format!("channel '{c}' is not available in {model}"),
                        )
                    })
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Release
    // ------------------------------------------------------------------

    /// Ends the access session and returns the region written, if any.
    ///
    /// Dropping the collection has the same effect.
    pub fn release(self) -> Option<Geometry> {
        self.dirty
    }
}

impl<Q: Quantum> Drop for PixelCollection<'_, Q> {
    fn drop(&mut self) {
        match self.dirty {
            Some(region) => {
                let generation = self.image.bump_generation();
                trace!(%region, generation, "pixel collection released");
            }
            None => trace!("pixel collection released without writes"),
        }
    }
}

impl<Q: Quantum> std::fmt::Debug for PixelCollection<'_, Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelCollection")
            .field("image", &self.image)
            .field("dirty", &self.dirty)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ColorModel;
    use approx::assert_relative_eq;

    fn white_rgb<Q: Quantum>(width: u32, height: u32) -> Image<Q> {
        let white = Q::full_range();
        Image::filled(width, height, ColorModel::Rgb, &[white, white, white]).unwrap()
    }

    #[test]
    fn test_set_area_row_column_channel_order() {
        let mut img: Image<u8> = Image::new(4, 3, ColorModel::Rgb).unwrap();
        let values: Vec<u8> = (0..2 * 2 * 3).map(|i| i as u8 + 1).collect();
        {
            let mut pixels = img.pixels_mut();
            pixels.set_area(1, 1, 2, 2, Some(&values[..])).unwrap();
        }
        assert_eq!(img.pixel(1, 1), Some(&[1u8, 2, 3][..]));
        assert_eq!(img.pixel(2, 1), Some(&[4u8, 5, 6][..]));
        assert_eq!(img.pixel(1, 2), Some(&[7u8, 8, 9][..]));
        assert_eq!(img.pixel(2, 2), Some(&[10u8, 11, 12][..]));
        assert_eq!(img.pixel(0, 0), Some(&[0u8, 0, 0][..]));
        assert_eq!(img.pixel(3, 1), Some(&[0u8, 0, 0][..]));
    }

    #[test]
    fn test_set_area_null_arguments() {
        let mut img = white_rgb::<u16>(8, 8);
        let mut pixels = img.pixels_mut();

        let err = pixels.set_area::<u8>(1, 1, 2, 2, None).unwrap_err();
        assert_eq!(err, Error::null_argument("values"));

        let err = pixels.set_area_geometry(None, Some(&[0u8][..])).unwrap_err();
        assert_eq!(err, Error::null_argument("geometry"));

        // Geometry is checked before values.
        let err = pixels.set_area_geometry::<f64>(None, None).unwrap_err();
        assert_eq!(err.param(), Some("geometry"));
    }

    #[test]
    fn test_set_area_length_mismatch_leaves_buffer_untouched() {
        let mut img = white_rgb::<u8>(8, 8);
        let before = img.data().to_vec();
        {
            let mut pixels = img.pixels_mut();
            let short = vec![0u8; 2 * 2 * 3 - 1];
            let long = vec![0u8; 2 * 2 * 3 + 1];
            assert!(pixels.set_area(0, 0, 2, 2, Some(&short[..])).unwrap_err().is_invalid_argument());
            assert!(pixels.set_area(0, 0, 2, 2, Some(&long[..])).unwrap_err().is_invalid_argument());
            assert_eq!(pixels.dirty_region(), None);
        }
        assert_eq!(img.data(), &before[..]);
        assert_eq!(img.generation(), 0);
    }

    #[test]
    fn test_set_area_zero_size() {
        let mut img = white_rgb::<u8>(8, 8);
        let mut pixels = img.pixels_mut();
        let err = pixels.set_area::<u8>(0, 0, 0, 2, Some(&[][..])).unwrap_err();
        assert_eq!(err.param(), Some("width"));
    }

    #[test]
    fn test_set_area_clips_right_and_bottom() {
        let mut img = white_rgb::<u8>(4, 4);
        {
            let mut pixels = img.pixels_mut();
            let values = vec![7u8; 3 * 3 * 3];
            pixels.set_area(2, 2, 3, 3, Some(&values[..])).unwrap();
            assert_eq!(pixels.dirty_region(), Some(Geometry::new(2, 2, 2, 2).unwrap()));
        }
        assert_eq!(img.pixel(3, 3), Some(&[7u8, 7, 7][..]));
        assert_eq!(img.pixel(2, 2), Some(&[7u8, 7, 7][..]));
        assert_eq!(img.pixel(1, 3), Some(&[255u8, 255, 255][..]));
    }

    #[test]
    fn test_set_area_clips_negative_origin() {
        let mut img: Image<u8> = Image::new(3, 3, ColorModel::Gray).unwrap();
        // 3x3 rectangle at (-1, -1): only its lower-right 2x2 lands in the image.
        let values: Vec<u8> = (1..=9).collect();
        {
            let mut pixels = img.pixels_mut();
            pixels.set_area(-1, -1, 3, 3, Some(&values[..])).unwrap();
        }
        assert_eq!(img.pixel(0, 0), Some(&[5u8][..]));
        assert_eq!(img.pixel(1, 0), Some(&[6u8][..]));
        assert_eq!(img.pixel(0, 1), Some(&[8u8][..]));
        assert_eq!(img.pixel(1, 1), Some(&[9u8][..]));
        assert_eq!(img.pixel(2, 2), Some(&[0u8][..]));
    }

    #[test]
    fn test_set_area_fully_outside() {
        let mut img = white_rgb::<u8>(4, 4);
        let before = img.data().to_vec();
        {
            let mut pixels = img.pixels_mut();
            let values = vec![0u8; 2 * 2 * 3];
            pixels.set_area(10, 10, 2, 2, Some(&values[..])).unwrap();
            assert_eq!(pixels.release(), None);
        }
        assert_eq!(img.data(), &before[..]);
        assert_eq!(img.generation(), 0);
    }

    #[test]
    fn test_get_area_zero_fills_outside() {
        let mut img = white_rgb::<u16>(2, 2);
        let pixels = img.pixels_mut();
        let area: Vec<u16> = pixels.get_area(1, -1, 2, 2).unwrap();
        assert_eq!(
            area,
            vec![0, 0, 0, 0, 0, 0, 65535, 65535, 65535, 0, 0, 0]
        );
    }

    #[test]
    fn test_get_area_null_geometry() {
        let mut img = white_rgb::<u8>(2, 2);
        let pixels = img.pixels_mut();
        let err = pixels.get_area_geometry::<u8>(None).unwrap_err();
        assert_eq!(err, Error::null_argument("geometry"));
    }

    #[test]
    fn test_roundtrip_native_and_float() {
        let mut img: Image<f32> = Image::new(5, 4, ColorModel::Rgba).unwrap();
        let values: Vec<f32> = (0..3 * 2 * 4).map(|i| i as f32 * 1000.5 - 3.0).collect();
        let mut pixels = img.pixels_mut();
        pixels.set_area(1, 1, 3, 2, Some(&values[..])).unwrap();
        let back: Vec<f32> = pixels.get_area(1, 1, 3, 2).unwrap();
        assert_eq!(back, values);

        let doubles: Vec<f64> = pixels.get_area(1, 1, 3, 2).unwrap();
        for (d, v) in doubles.iter().zip(&values) {
            assert_relative_eq!(*d, *v as f64);
        }
    }

    #[test]
    fn test_release_bumps_generation_once() {
        let mut img = white_rgb::<u8>(4, 4);
        {
            let mut pixels = img.pixels_mut();
            pixels.set_pixel(0, 0, &[1u8, 2, 3]).unwrap();
            pixels.set_pixel(3, 2, &[1u8, 2, 3]).unwrap();
            assert_eq!(pixels.release(), Some(Geometry::new(0, 0, 4, 3).unwrap()));
        }
        assert_eq!(img.generation(), 1);

        // Read-only sessions do not advance the generation.
        {
            let pixels = img.pixels_mut();
            let _ = pixels.values::<u8>();
        }
        assert_eq!(img.generation(), 1);
    }

    #[test]
    fn test_set_pixel_errors() {
        let mut img = white_rgb::<u8>(4, 4);
        let mut pixels = img.pixels_mut();
        let err = pixels.set_pixel(4, 0, &[0u8, 0, 0]).unwrap_err();
        assert!(err.is_bounds_error());
        let err = pixels.set_pixel(-1, 0, &[0u8, 0, 0]).unwrap_err();
        assert!(err.is_bounds_error());
        let err = pixels.set_pixel(0, 0, &[0u8, 0]).unwrap_err();
        assert_eq!(err.param(), Some("value"));
    }

    #[test]
    fn test_values_and_set_values() {
        let mut img: Image<u16> = Image::new(2, 2, ColorModel::Gray).unwrap();
        let mut pixels = img.pixels_mut();
        pixels.set_values(Some(&[0u8, 1, 254, 255][..])).unwrap();
        assert_eq!(pixels.values::<u16>(), vec![0, 257, 65278, 65535]);
        assert!(pixels.set_values(Some(&[0u8; 3][..])).is_err());
        assert!(pixels.set_values::<u8>(None).unwrap_err().is_null_argument());
    }

    #[test]
    fn test_export_area_mapping() {
        let mut img: Image<u8> = Image::filled(2, 1, ColorModel::Rgba, &[1, 2, 3, 4]).unwrap();
        let pixels = img.pixels_mut();
        let bounds = pixels.image().bounds();

        assert_eq!(pixels.to_byte_array(Some(&bounds), "A").unwrap(), vec![4, 4]);
        assert_eq!(
            pixels.to_byte_array(Some(&bounds), "argb").unwrap(),
            vec![4, 1, 2, 3, 4, 1, 2, 3]
        );
        assert_eq!(
            pixels.to_short_array(Some(&bounds), "R").unwrap(),
            vec![257, 257]
        );

        let err = pixels.to_byte_array(Some(&bounds), "").unwrap_err();
        assert_eq!(err.param(), Some("mapping"));
        let err = pixels.to_byte_array(Some(&bounds), "RGBK").unwrap_err();
        assert_eq!(err.param(), Some("mapping"));
        let err = pixels.to_byte_array(None, "RGB").unwrap_err();
        assert_eq!(err, Error::null_argument("geometry"));
    }

    #[test]
    fn test_channel_index() {
        let mut img: Image<u8> = Image::new(1, 1, ColorModel::Cmyk).unwrap();
        let pixels = img.pixels_mut();
        assert_eq!(pixels.channel_index(PixelChannel::Yellow), Some(2));
        assert_eq!(pixels.channel_index(PixelChannel::Red), None);
    }
}
