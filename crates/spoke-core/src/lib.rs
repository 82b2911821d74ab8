#![forbid(unsafe_code)]

//! Radar chart data model + layered render configuration (headless).
//!
//! Design goals:
//! - axis order comes from the group ("pillar") definitions and never changes during a render
//! - configuration is resolved once, from defaults plus caller layers, into an immutable value
//! - invalid inputs are rejected up front instead of producing degenerate geometry

pub mod color;
pub mod config;
pub mod encoding;
pub mod error;
pub mod format;
pub mod model;

pub use color::Rgb;
pub use config::{AnimationConfig, AnimationOverrides, ConfigOverrides, Margin, RenderConfig};
pub use encoding::{Palette, SeriesEncoding, SeriesStyle, StrokeStyle};
pub use error::{Error, Result};
pub use format::LevelFormat;
pub use model::{AxisDefinition, ChartData, Dataset, Group, GroupColors, Score};
