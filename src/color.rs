//! 24-bit RGB colors and the chart's fixed palette.
//!
//! A color has three interchangeable encodings:
//!
//! - a 6-digit hex string `RRGGBB` (written upper-case, read in either case),
//! - a packed integer `r + g·256 + b·256²`,
//! - an `(r, g, b)` byte triple.

use std::fmt;
use std::str::FromStr;

use crate::error::ColorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a 6-digit hex string such as `"F79D53"`.
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let invalid = || ColorError::InvalidHex(hex.to_string());
        if hex.len() != 6 || !hex.bytes().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::new(byte(0)?, byte(2)?, byte(4)?))
    }

    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Decode `r + g·256 + b·256²`; values of 2²⁴ and above are rejected.
    pub fn from_packed(rgb: u32) -> Result<Self, ColorError> {
        if rgb >= 1 << 24 {
            return Err(ColorError::OutOfRange(rgb));
        }
        Ok(Self::new(
            (rgb & 0xFF) as u8,
            ((rgb >> 8) & 0xFF) as u8,
            ((rgb >> 16) & 0xFF) as u8,
        ))
    }

    pub fn to_packed(&self) -> u32 {
        self.r as u32 + ((self.g as u32) << 8) + ((self.b as u32) << 16)
    }

    pub fn to_tuple(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(feature = "image")]
impl From<Color> for image::Rgb<u8> {
    fn from(c: Color) -> Self {
        image::Rgb([c.r, c.g, c.b])
    }
}

/// Named colors used by the render modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Palette {
    White,
    Gray,
    Black,
    Red,
    Orange,
    Yellow,
    Green,
    Turquoise,
    Blue,
    Purple,
    Pink,
    Brown,
}

impl Palette {
    pub const ALL: [Palette; 12] = [
        Palette::White,
        Palette::Gray,
        Palette::Black,
        Palette::Red,
        Palette::Orange,
        Palette::Yellow,
        Palette::Green,
        Palette::Turquoise,
        Palette::Blue,
        Palette::Purple,
        Palette::Pink,
        Palette::Brown,
    ];

    pub const fn color(self) -> Color {
        match self {
            Palette::White => Color::new(255, 255, 255),
            Palette::Gray => Color::new(178, 178, 178),
            Palette::Black => Color::new(0, 0, 0),
            Palette::Red => Color::new(255, 0, 0),
            Palette::Orange => Color::new(247, 157, 83),
            Palette::Yellow => Color::new(255, 255, 0),
            Palette::Green => Color::new(0, 176, 80),
            Palette::Turquoise => Color::new(93, 179, 203),
            Palette::Blue => Color::new(105, 216, 255),
            Palette::Purple => Color::new(158, 94, 206),
            Palette::Pink => Color::new(255, 102, 255),
            Palette::Brown => Color::new(188, 180, 138),
        }
    }
}

impl From<Palette> for Color {
    fn from(p: Palette) -> Self {
        p.color()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn encodings_round_trip() {
        let mut rng = StdRng::seed_from_u64(1234);
        for _ in 0..500 {
            let (r, g, b): (u8, u8, u8) = (rng.random(), rng.random(), rng.random());

            let hex1 = Color::from((r, g, b)).to_hex();
            let int1 = Color::from_hex(&hex1).unwrap().to_packed();
            let tup1 = Color::from_packed(int1).unwrap().to_tuple();
            let int2 = Color::from(tup1).to_packed();
            let hex2 = Color::from_packed(int2).unwrap().to_hex();
            let tup2 = Color::from_hex(&hex2).unwrap().to_tuple();

            assert_eq!(tup1, (r, g, b));
            assert_eq!(tup2, (r, g, b));
            assert_eq!(hex1, hex2);
            assert_eq!(int1, int2);
        }
    }

    #[test]
    fn packed_layout_is_little_endian_rgb() {
        let c = Color::from_hex("F79D53").unwrap();
        assert_eq!(c, Palette::Orange.color());
        assert_eq!(c.to_packed(), 0xF7 + 0x9D * 256 + 0x53 * 256 * 256);
        assert_eq!(Color::from_packed(0x0000FF).unwrap(), Color::new(255, 0, 0));
    }

    #[test]
    fn hex_accepts_lower_case_and_writes_upper_case() {
        let c: Color = "5db3cb".parse().unwrap();
        assert_eq!(c, Palette::Turquoise.color());
        assert_eq!(c.to_string(), "5DB3CB");
    }

    #[test]
    fn invalid_inputs_are_errors() {
        assert!(matches!(Color::from_hex("FFF"), Err(ColorError::InvalidHex(_))));
        assert!(matches!(Color::from_hex("GG0000"), Err(ColorError::InvalidHex(_))));
        assert!(matches!(Color::from_hex("+F0000"), Err(ColorError::InvalidHex(_))));
        assert_eq!(
            Color::from_packed(1 << 24),
            Err(ColorError::OutOfRange(1 << 24))
        );
    }

    #[test]
    fn palette_entries_are_distinct() {
        for (i, a) in Palette::ALL.iter().enumerate() {
            for b in &Palette::ALL[i + 1..] {
                assert_ne!(a.color(), b.color(), "{a:?} and {b:?} share a color");
            }
        }
    }
}
