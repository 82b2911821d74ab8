//! Opaque sRGB colors as used for group wedges, legends and dataset encodings.

use crate::{Error, Result};
use palette::Srgb;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An 8-bit sRGB color. Serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(Srgb<u8>);

impl Rgb {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self(Srgb::new(red, green, blue))
    }

    pub fn red(self) -> u8 {
        self.0.red
    }

    pub fn green(self) -> u8 {
        self.0.green
    }

    pub fn blue(self) -> u8 {
        self.0.blue
    }

    /// Parses `#rgb`, `#rrggbb` (the leading `#` is optional).
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        trimmed
            .parse::<Srgb<u8>>()
            .map(Self)
            .map_err(|err| Error::InvalidColor {
                value: trimmed.to_string(),
                message: err.to_string(),
            })
    }

    pub fn to_hex(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}",
            self.0.red, self.0.green, self.0.blue
        )
    }
}

impl FromStr for Rgb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(Rgb::parse("#F3467C").unwrap(), Rgb::new(0xf3, 0x46, 0x7c));
        assert_eq!(Rgb::parse("0af").unwrap(), Rgb::new(0x00, 0xaa, 0xff));
        assert_eq!(Rgb::new(0, 173, 187).to_hex(), "#00adbb");
    }

    #[test]
    fn rejects_garbage() {
        let err = Rgb::parse("#12345").unwrap_err();
        assert!(matches!(err, Error::InvalidColor { .. }), "{err}");
        assert!(Rgb::parse("tomato").is_err());
    }

    #[test]
    fn serde_uses_hex_strings() {
        let c: Rgb = serde_json::from_str(r##""#FFC728""##).unwrap();
        assert_eq!(c, Rgb::new(0xff, 0xc7, 0x28));
        assert_eq!(serde_json::to_string(&c).unwrap(), r##""#ffc728""##);
    }
}
