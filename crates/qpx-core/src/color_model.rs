//! Channel layouts.
//!
//! The color model of an image fixes how many quanta each pixel holds and
//! what each slot means. Area operations only need the count; channel-mapped
//! exports use the slot order.

use std::fmt;

/// A named pixel channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelChannel {
    /// Intensity of a grayscale image.
    Gray,
    /// Red.
    Red,
    /// Green.
    Green,
    /// Blue.
    Blue,
    /// Cyan.
    Cyan,
    /// Magenta.
    Magenta,
    /// Yellow.
    Yellow,
    /// Black (CMYK key).
    Black,
    /// Alpha (opacity).
    Alpha,
}

impl PixelChannel {
    /// Parses a single mapping letter (`R G B A C M Y K I`, case-insensitive).
    ///
    /// `I` selects intensity, i.e. [`PixelChannel::Gray`].
    pub fn from_mapping_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'I' => Some(Self::Gray),
            'R' => Some(Self::Red),
            'G' => Some(Self::Green),
            'B' => Some(Self::Blue),
            'C' => Some(Self::Cyan),
            'M' => Some(Self::Magenta),
            'Y' => Some(Self::Yellow),
            'K' => Some(Self::Black),
            'A' => Some(Self::Alpha),
            _ => None,
        }
    }
}

/// Channel layout of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorModel {
    /// One intensity channel.
    Gray,
    /// Intensity plus alpha.
    GrayAlpha,
    /// Red, green, blue.
    #[default]
    Rgb,
    /// Red, green, blue, alpha.
    Rgba,
    /// Cyan, magenta, yellow, black.
    Cmyk,
    /// Cyan, magenta, yellow, black, alpha.
    Cmyka,
}

impl ColorModel {
    /// Channels in storage order.
    pub const fn channels(&self) -> &'static [PixelChannel] {
        use PixelChannel::*;
        match self {
            Self::Gray => &[Gray],
            Self::GrayAlpha => &[Gray, Alpha],
            Self::Rgb => &[Red, Green, Blue],
            Self::Rgba => &[Red, Green, Blue, Alpha],
            Self::Cmyk => &[Cyan, Magenta, Yellow, Black],
            Self::Cmyka => &[Cyan, Magenta, Yellow, Black, Alpha],
        }
    }

    /// Number of quanta per pixel.
    #[inline]
    pub const fn channel_count(&self) -> usize {
        self.channels().len()
    }

    /// Whether the layout carries an alpha channel.
    #[inline]
    pub const fn has_alpha(&self) -> bool {
        matches!(self, Self::GrayAlpha | Self::Rgba | Self::Cmyka)
    }

    /// Storage slot of `channel`, if this layout has it.
    pub fn channel_index(&self, channel: PixelChannel) -> Option<usize> {
        self.channels().iter().position(|&c| c == channel)
    }
}

impl fmt::Display for ColorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Gray => "Gray",
            Self::GrayAlpha => "GrayAlpha",
            Self::Rgb => "RGB",
            Self::Rgba => "RGBA",
            Self::Cmyk => "CMYK",
            Self::Cmyka => "CMYKA",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_counts() {
        assert_eq!(ColorModel::Gray.channel_count(), 1);
        assert_eq!(ColorModel::GrayAlpha.channel_count(), 2);
        assert_eq!(ColorModel::Rgb.channel_count(), 3);
        assert_eq!(ColorModel::Rgba.channel_count(), 4);
        assert_eq!(ColorModel::Cmyk.channel_count(), 4);
        assert_eq!(ColorModel::Cmyka.channel_count(), 5);
    }

    #[test]
    fn test_channel_index() {
        assert_eq!(ColorModel::Rgba.channel_index(PixelChannel::Alpha), Some(3));
        assert_eq!(ColorModel::Rgb.channel_index(PixelChannel::Alpha), None);
        assert_eq!(ColorModel::Cmyk.channel_index(PixelChannel::Black), Some(3));
        assert!(!ColorModel::Cmyk.has_alpha());
        assert!(ColorModel::GrayAlpha.has_alpha());
    }

    #[test]
    fn test_mapping_chars() {
        assert_eq!(PixelChannel::from_mapping_char('r'), Some(PixelChannel::Red));
        assert_eq!(PixelChannel::from_mapping_char('I'), Some(PixelChannel::Gray));
        assert_eq!(PixelChannel::from_mapping_char('x'), None);
    }
}
