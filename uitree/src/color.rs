//! ARGB colors for backgrounds and masks.

use palette::{LinSrgba, Mix, Srgba};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "ColorRepr")]
pub struct Color {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid color {0:?}")]
pub struct ColorParseError(pub String);

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Argb(u32),
    Hex(String),
}

impl TryFrom<ColorRepr> for Color {
    type Error = ColorParseError;

    fn try_from(value: ColorRepr) -> Result<Self, Self::Error> {
        match value {
            ColorRepr::Argb(argb) => Ok(Color::from_argb(argb)),
            ColorRepr::Hex(hex) => Color::parse_hex(&hex),
        }
    }
}

impl Color {
    pub const TRANSPARENT: Color = Color::from_argb(0x0000_0000);
    pub const BLACK: Color = Color::from_argb(0xff00_0000);
    pub const WHITE: Color = Color::from_argb(0xffff_ffff);

    pub const fn from_argb(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }

    pub const fn argb(&self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Parse `#RRGGBB` or `#AARRGGBB`.
    pub fn parse_hex(hex: &str) -> Result<Self, ColorParseError> {
        let digits = hex.trim().trim_start_matches('#');
        let value = u32::from_str_radix(digits, 16).map_err(|_| ColorParseError(hex.to_string()))?;
        match digits.len() {
            6 => Ok(Color::from_argb(0xff00_0000 | value)),
            8 => Ok(Color::from_argb(value)),
            _ => Err(ColorParseError(hex.to_string())),
        }
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Blend toward `to` in linear light.
    pub fn lerp(self, to: Color, t: f32) -> Color {
        let from: LinSrgba = self.to_srgba().into_linear();
        let to: LinSrgba = to.to_srgba().into_linear();
        let mixed = from.mix(to, t.clamp(0.0, 1.0));
        let out: Srgba = Srgba::from_linear(mixed);
        let out: Srgba<u8> = out.into_format();
        Color {
            a: out.alpha,
            r: out.red,
            g: out.green,
            b: out.blue,
        }
    }

    fn to_srgba(self) -> Srgba {
        Srgba::new(self.r, self.g, self.b, self.a).into_format()
    }
}
