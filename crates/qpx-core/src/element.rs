//! Caller-facing element families for flat value arrays.
//!
//! Area operations accept and produce flat arrays of one of these element
//! types. Each family knows how to move a single scalar into and out of any
//! [`Quantum`]:
//!
//! | Element | Meaning | Into quantum |
//! |---|---|---|
//! | `u8` | full 8-bit range | linear scale (identity for Q8) |
//! | `u16` | full 16-bit range | linear scale (identity for Q16) |
//! | `i32` | native quantum range | clamp for integer storage |
//! | `f32` | native quantum range | round + clamp for integer storage (identity for HDRI) |
//! | [`half::f16`] | native quantum range | as `f32` |
//! | `f64` | native quantum range | round + clamp for integer storage |
//!
//! The element type equal to an image's quantum is its *native* family and
//! converts by identity.
//!
//! # Example
//!
//! ```
//! use qpx_core::Element;
//!
//! let q: u16 = 255u8.to_quantum();
//! assert_eq!(q, 65535);
//! assert_eq!(u8::from_quantum(q), 255);
//!
//! let q: u8 = 1000i32.to_quantum();
//! assert_eq!(q, 255);
//! ```

use crate::quantum::Quantum;
use half::f16;

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
    impl Sealed for i32 {}
    impl Sealed for f32 {}
    impl Sealed for half::f16 {}
    impl Sealed for f64 {}
}

/// A scalar type usable in a flat value array.
///
/// The set of families is closed. Conversions never fail.
pub trait Element: Copy + Default + Send + Sync + 'static + sealed::Sealed {
    /// Short name used in diagnostics.
    const NAME: &'static str;

    /// Convert this element into a quantum.
    fn to_quantum<Q: Quantum>(self) -> Q;

    /// Convert a quantum into this element family.
    fn from_quantum<Q: Quantum>(q: Q) -> Self;
}

impl Element for u8 {
    const NAME: &'static str = "u8";

    #[inline]
    fn to_quantum<Q: Quantum>(self) -> Q {
        Q::from_char(self)
    }

    #[inline]
    fn from_quantum<Q: Quantum>(q: Q) -> Self {
        q.to_char()
    }
}

impl Element for u16 {
    const NAME: &'static str = "u16";

    #[inline]
    fn to_quantum<Q: Quantum>(self) -> Q {
        Q::from_short(self)
    }

    #[inline]
    fn from_quantum<Q: Quantum>(q: Q) -> Self {
        q.to_short()
    }
}

impl Element for i32 {
    const NAME: &'static str = "i32";

    #[inline]
    fn to_quantum<Q: Quantum>(self) -> Q {
        Q::from_int(self)
    }

    #[inline]
    fn from_quantum<Q: Quantum>(q: Q) -> Self {
        q.to_int()
    }
}

impl Element for f32 {
    const NAME: &'static str = "f32";

    #[inline]
    fn to_quantum<Q: Quantum>(self) -> Q {
        Q::from_double(self as f64)
    }

    #[inline]
    fn from_quantum<Q: Quantum>(q: Q) -> Self {
        q.to_double() as f32
    }
}

impl Element for f16 {
    const NAME: &'static str = "f16";

    #[inline]
    fn to_quantum<Q: Quantum>(self) -> Q {
        Q::from_double(self.to_f64())
    }

    #[inline]
    fn from_quantum<Q: Quantum>(q: Q) -> Self {
        f16::from_f64(q.to_double())
    }
}

impl Element for f64 {
    const NAME: &'static str = "f64";

    #[inline]
    fn to_quantum<Q: Quantum>(self) -> Q {
        Q::from_double(self)
    }

    #[inline]
    fn from_quantum<Q: Quantum>(q: Q) -> Self {
        q.to_double()
    }
}
