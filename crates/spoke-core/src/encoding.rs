//! Per-series visual encoding (fill/stroke color plus stroke pattern).
//!
//! The encoding is resolved once per render into a concrete `Vec<SeriesStyle>`; renderers never
//! call back into caller code while painting.

use crate::color::Rgb;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
}

impl StrokeStyle {
    /// SVG `stroke-dasharray` value, if any.
    pub fn dasharray(self) -> Option<&'static str> {
        match self {
            StrokeStyle::Solid => None,
            StrokeStyle::Dashed => Some("6,4"),
        }
    }
}

impl FromStr for StrokeStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "solid" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            other => Err(Error::config(
                "styles",
                format!("unknown stroke style `{other}` (expected solid|dashed)"),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesStyle {
    pub color: Rgb,
    pub stroke: StrokeStyle,
}

/// A categorical color list, cycled by series index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette(Vec<Rgb>);

impl Palette {
    /// d3 `schemeCategory10`.
    pub fn category10() -> Self {
        Self(vec![
            Rgb::new(0x1f, 0x77, 0xb4),
            Rgb::new(0xff, 0x7f, 0x0e),
            Rgb::new(0x2c, 0xa0, 0x2c),
            Rgb::new(0xd6, 0x27, 0x28),
            Rgb::new(0x94, 0x67, 0xbd),
            Rgb::new(0x8c, 0x56, 0x4b),
            Rgb::new(0xe3, 0x77, 0xc2),
            Rgb::new(0x7f, 0x7f, 0x7f),
            Rgb::new(0xbc, 0xbd, 0x22),
            Rgb::new(0x17, 0xbe, 0xcf),
        ])
    }

    pub fn new(colors: Vec<Rgb>) -> Result<Self> {
        if colors.is_empty() {
            return Err(Error::config("colors", "palette must not be empty"));
        }
        Ok(Self(colors))
    }

    pub fn color(&self, index: usize) -> Rgb {
        self.0[index % self.0.len()]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::category10()
    }
}

type EncodeFn = dyn Fn(usize) -> SeriesStyle + Send + Sync;

/// How a series index maps to its visual style.
#[derive(Clone)]
pub enum SeriesEncoding {
    /// Colors cycle through the palette; every series is solid.
    Palette(Palette),
    /// Caller-provided mapping from series index to style.
    Custom(Arc<EncodeFn>),
}

impl SeriesEncoding {
    pub fn custom(f: impl Fn(usize) -> SeriesStyle + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    /// Builds a custom encoding from explicit color/style lists, cycling each list.
    ///
    /// An empty color list falls back to the default palette; an empty style list means solid.
    pub fn from_lists(colors: Vec<Rgb>, styles: Vec<StrokeStyle>) -> Self {
        if styles.is_empty() && colors.is_empty() {
            return Self::Palette(Palette::default());
        }
        let palette = Palette::new(colors).unwrap_or_default();
        Self::custom(move |index| SeriesStyle {
            color: palette.color(index),
            stroke: if styles.is_empty() {
                StrokeStyle::Solid
            } else {
                styles[index % styles.len()]
            },
        })
    }

    pub fn style(&self, index: usize) -> SeriesStyle {
        match self {
            SeriesEncoding::Palette(palette) => SeriesStyle {
                color: palette.color(index),
                stroke: StrokeStyle::Solid,
            },
            SeriesEncoding::Custom(f) => f(index),
        }
    }

    /// Materializes the styles for `count` series, in series order.
    pub fn resolve(&self, count: usize) -> Vec<SeriesStyle> {
        (0..count).map(|i| self.style(i)).collect()
    }
}

impl Default for SeriesEncoding {
    fn default() -> Self {
        Self::Palette(Palette::default())
    }
}

impl fmt::Debug for SeriesEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesEncoding::Palette(p) => f.debug_tuple("Palette").field(p).finish(),
            SeriesEncoding::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_palette_cycles_category10() {
        let enc = SeriesEncoding::default();
        let styles = enc.resolve(11);
        assert_eq!(styles.len(), 11);
        assert_eq!(styles[0].color.to_hex(), "#1f77b4");
        assert_eq!(styles[1].color.to_hex(), "#ff7f0e");
        assert_eq!(styles[10].color, styles[0].color);
        assert!(styles.iter().all(|s| s.stroke == StrokeStyle::Solid));
    }

    #[test]
    fn custom_mapping_is_consulted_per_index() {
        let enc = SeriesEncoding::custom(|i| SeriesStyle {
            color: Rgb::new(i as u8, 0, 0),
            stroke: if i % 2 == 1 {
                StrokeStyle::Dashed
            } else {
                StrokeStyle::Solid
            },
        });
        let styles = enc.resolve(3);
        assert_eq!(styles[2].color, Rgb::new(2, 0, 0));
        assert_eq!(styles[1].stroke, StrokeStyle::Dashed);
    }

    #[test]
    fn list_encoding_keeps_palette_when_only_styles_given() {
        let enc = SeriesEncoding::from_lists(Vec::new(), vec![StrokeStyle::Solid, StrokeStyle::Dashed]);
        let styles = enc.resolve(3);
        assert_eq!(styles[0].color, Palette::category10().color(0));
        assert_eq!(styles[1].stroke, StrokeStyle::Dashed);
        assert_eq!(styles[2].stroke, StrokeStyle::Solid);
    }

    #[test]
    fn stroke_style_parses_case_insensitively() {
        assert_eq!("Dashed".parse::<StrokeStyle>().unwrap(), StrokeStyle::Dashed);
        assert!("dotted".parse::<StrokeStyle>().is_err());
    }
}
