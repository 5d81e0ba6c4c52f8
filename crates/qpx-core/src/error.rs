//! Error types for qpx-core operations.
//!
//! Every failure in the pixel-access layer is a caller-recoverable argument
//! or shape error. Nothing here is fatal and nothing is retried internally.
//!
//! # Overview
//!
//! The [`Error`] enum covers:
//! - Missing arguments ([`NullArgument`](Error::NullArgument))
//! - Malformed arguments such as wrongly sized value arrays
//!   ([`InvalidArgument`](Error::InvalidArgument))
//! - Single-pixel access outside the image ([`OutOfBounds`](Error::OutOfBounds))
//! - Image construction failures ([`InvalidDimensions`](Error::InvalidDimensions),
//!   [`ChannelMismatch`](Error::ChannelMismatch))
//!
//! # Usage
//!
//! ```rust
//! use qpx_core::{Error, Result};
//!
//! fn check_len(values: &[u8], expected: usize) -> Result<()> {
//!     if values.len() != expected {
//!         return Err(Error::invalid_argument("values", "wrong length"));
//!     }
//!     Ok(())
//! }
//!
//! let err = check_len(&[0, 0, 0, 0], 3).unwrap_err();
//! assert_eq!(err.param(), Some("values"));
//! ```
//!
//! # Dependencies
//!
//! - [`thiserror`] - For derive macro error implementation

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while accessing image pixels.
///
/// # Categories
///
/// - **Argument errors**: [`NullArgument`](Error::NullArgument), [`InvalidArgument`](Error::InvalidArgument)
/// - **Bounds errors**: [`OutOfBounds`](Error::OutOfBounds)
/// - **Construction errors**: [`InvalidDimensions`](Error::InvalidDimensions), [`ChannelMismatch`](Error::ChannelMismatch)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A required argument was not supplied.
    ///
    /// # Example
    ///
    /// ```rust
    /// use qpx_core::Error;
    ///
    /// let err = Error::null_argument("geometry");
    /// assert!(err.to_string().contains("geometry"));
    /// ```
    #[error("value cannot be null (parameter '{param}')")]
    NullArgument {
        /// Name of the missing parameter
        param: &'static str,
    },

    /// A supplied argument has the wrong shape or value.
    ///
    /// Raised for value arrays whose length differs from the element count
    /// the target region requires, in either direction.
    #[error("invalid argument '{param}': {reason}")]
    InvalidArgument {
        /// Name of the offending parameter
        param: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// Pixel coordinates are outside image bounds.
    ///
    /// Only single-pixel operations report this. Area operations clip
    /// silently instead.
    #[error("pixel ({x}, {y}) out of bounds for image {width}x{height}")]
    OutOfBounds {
        /// X coordinate that was out of bounds
        x: i32,
        /// Y coordinate that was out of bounds
        y: i32,
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },

    /// Invalid image dimensions.
    ///
    /// Returned when width or height is zero, or dimensions would cause
    /// integer overflow in buffer size calculations.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// Channel count mismatch between a pixel value and the image.
    #[error("channel mismatch: expected {expected}, got {got}")]
    ChannelMismatch {
        /// Expected channel count
        expected: usize,
        /// Actual channel count
        got: usize,
    },
}

impl Error {
    /// Creates an [`Error::NullArgument`] error.
    #[inline]
    pub fn null_argument(param: &'static str) -> Self {
        Self::NullArgument { param }
    }

    /// Creates an [`Error::InvalidArgument`] error.
    #[inline]
    pub fn invalid_argument(param: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            param,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::OutOfBounds`] error.
    #[inline]
    pub fn out_of_bounds(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self::OutOfBounds {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::ChannelMismatch`] error.
    #[inline]
    pub fn channel_mismatch(expected: usize, got: usize) -> Self {
        Self::ChannelMismatch { expected, got }
    }

    /// Returns the parameter name carried by argument errors.
    ///
    /// `None` for every other category.
    #[inline]
    pub fn param(&self) -> Option<&'static str> {
        match self {
            Self::NullArgument { param } | Self::InvalidArgument { param, .. } => Some(param),
            _ => None,
        }
    }

    /// Returns `true` if this is a [`Error::NullArgument`].
    #[inline]
    pub fn is_null_argument(&self) -> bool {
        matches!(self, Self::NullArgument { .. })
    }

    /// Returns `true` if this is an [`Error::InvalidArgument`].
    #[inline]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    /// Returns `true` if this is a bounds-related error.
    #[inline]
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_argument() {
        let err = Error::null_argument("values");
        assert!(err.is_null_argument());
        assert!(!err.is_invalid_argument());
        assert_eq!(err.param(), Some("values"));
        assert!(err.to_string().contains("'values'"));
    }

    #[test]
    fn test_invalid_argument() {
        let err = Error::invalid_argument("values", "expected 3 elements, got 4");
        assert!(err.is_invalid_argument());
        assert_eq!(err.param(), Some("values"));
        let msg = err.to_string();
        assert!(msg.contains("expected 3 elements"));
    }

    #[test]
    fn test_out_of_bounds() {
        let err = Error::out_of_bounds(-1, 50, 80, 60);
        let msg = err.to_string();
        assert!(msg.contains("-1"));
        assert!(msg.contains("80x60"));
        assert!(err.is_bounds_error());
        assert_eq!(err.param(), None);
    }

    #[test]
    fn test_channel_mismatch() {
        let err = Error::channel_mismatch(3, 4);
        assert_eq!(err.to_string(), "channel mismatch: expected 3, got 4");
    }
}
