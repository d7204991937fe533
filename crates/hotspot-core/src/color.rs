//! sRGB colors as written in the viewer configuration
//!
//! Colors can be given as hex strings (`"#00cc44"`, `"#00cc44ff"`), as a
//! handful of CSS names (`"green"`, `"black"`), or as `[r, g, b]` /
//! `[r, g, b, a]` arrays of floats in `0.0..=1.0`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ColorError {
    #[error("Invalid hex color: {0}")]
    InvalidHex(String),
    #[error("Unknown color name: {0}")]
    UnknownName(String),
    #[error("Color component out of range: {0}")]
    OutOfRange(f32),
}

/// Non-linear sRGB color with straight alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Rgba = Rgba::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` or `#rrggbbaa` (leading `#` optional)
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let digits = hex.trim().trim_start_matches('#');
        let invalid = || ColorError::InvalidHex(hex.to_string());

        if !matches!(digits.len(), 6 | 8) || !digits.is_ascii() {
            return Err(invalid());
        }

        let channel = |i: usize| -> Result<f32, ColorError> {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| invalid())
        };

        let alpha = if digits.len() == 8 { channel(6)? } else { 1.0 };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, alpha))
    }

    /// Look up a CSS color name
    pub fn from_name(name: &str) -> Result<Self, ColorError> {
        let color = match name.trim().to_ascii_lowercase().as_str() {
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "green" => Self::rgb(0.0, 128.0 / 255.0, 0.0),
            "lime" => Self::rgb(0.0, 1.0, 0.0),
            "red" => Self::rgb(1.0, 0.0, 0.0),
            "blue" => Self::rgb(0.0, 0.0, 1.0),
            "gray" | "grey" => Self::rgb(128.0 / 255.0, 128.0 / 255.0, 128.0 / 255.0),
            "transparent" => Self::rgba(0.0, 0.0, 0.0, 0.0),
            _ => return Err(ColorError::UnknownName(name.to_string())),
        };
        Ok(color)
    }

    /// Build from float components, rejecting values outside `0.0..=1.0`
    pub fn from_components(components: &[f32]) -> Result<Self, ColorError> {
        if let Some(bad) = components
            .iter()
            .find(|c| !(0.0..=1.0).contains(*c))
        {
            return Err(ColorError::OutOfRange(*bad));
        }
        match *components {
            [r, g, b] => Ok(Self::rgb(r, g, b)),
            [r, g, b, a] => Ok(Self::rgba(r, g, b, a)),
            _ => Err(ColorError::InvalidHex(format!("{components:?}"))),
        }
    }

    /// Same color with a different alpha
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Quantize to 8-bit channels
    pub fn to_rgba8(self) -> [u8; 4] {
        self.to_array()
            .map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
    }
}

impl FromStr for Rgba {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().starts_with('#') {
            Self::from_hex(s)
        } else {
            Self::from_name(s)
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Text(String),
    Components(Vec<f32>),
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match ColorRepr::deserialize(deserializer)? {
            ColorRepr::Text(text) => text.parse().map_err(serde::de::Error::custom),
            ColorRepr::Components(components) => {
                Self::from_components(&components).map_err(serde::de::Error::custom)
            }
        }
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_array().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        let color = Rgba::from_hex("#00cc44").unwrap();
        assert_eq!(color.to_rgba8(), [0x00, 0xcc, 0x44, 0xff]);

        let color: Rgba = "#ff000080".parse().unwrap();
        assert_eq!(color.to_rgba8(), [0xff, 0x00, 0x00, 0x80]);
    }

    #[test]
    fn test_parse_invalid_hex() {
        assert!(matches!(Rgba::from_hex("#0c4"), Err(ColorError::InvalidHex(_))));
        assert!(matches!(Rgba::from_hex("#zzzzzz"), Err(ColorError::InvalidHex(_))));
        assert!(matches!(Rgba::from_hex("#ééé"), Err(ColorError::InvalidHex(_))));
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("black".parse::<Rgba>().unwrap(), Rgba::BLACK);
        assert_eq!("Green".parse::<Rgba>().unwrap().to_rgba8(), [0, 128, 0, 255]);
        assert!(matches!(
            "chartreuse".parse::<Rgba>(),
            Err(ColorError::UnknownName(_))
        ));
    }

    #[test]
    fn test_components() {
        assert_eq!(
            Rgba::from_components(&[0.7, 0.9, 0.7]).unwrap(),
            Rgba::rgb(0.7, 0.9, 0.7)
        );
        assert!(matches!(
            Rgba::from_components(&[1.5, 0.0, 0.0]),
            Err(ColorError::OutOfRange(_))
        ));
        assert!(Rgba::from_components(&[0.1, 0.2]).is_err());
    }

    #[test]
    fn test_deserialize_forms() {
        #[derive(Deserialize)]
        struct Doc {
            a: Rgba,
            b: Rgba,
            c: Rgba,
        }

        let doc: Doc = toml::from_str(
            r##"
            a = "#00ff00"
            b = "black"
            c = [0.05, 0.05, 0.05, 1.0]
            "##,
        )
        .unwrap();

        assert_eq!(doc.a, Rgba::rgb(0.0, 1.0, 0.0));
        assert_eq!(doc.b, Rgba::BLACK);
        assert_eq!(doc.c, Rgba::rgba(0.05, 0.05, 0.05, 1.0));
    }
}
