//! Layered render configuration.
//!
//! Resolution is explicit: start from [`RenderConfig::default`], apply each
//! [`ConfigOverrides`] layer in order (later layers win, field by field), then validate once.
//! The resulting [`RenderConfig`] is never mutated by the engine.

use crate::color::Rgb;
use crate::encoding::{SeriesEncoding, StrokeStyle};
use crate::format::LevelFormat;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }
}

impl Default for Margin {
    fn default() -> Self {
        Self::uniform(100.0)
    }
}

/// Timings of the two-phase sweep reveal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationConfig {
    /// One full 360° sweep (used for both phases).
    pub sweep: Duration,
    /// Growth of a single grid ring from radius 0.
    pub ring: Duration,
    /// Delay between consecutive rings.
    pub ring_stagger: Duration,
    pub spoke_fade: Duration,
    /// Fade-out of the sweep line after the data sweep.
    pub fade_out: Duration,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            sweep: Duration::from_millis(500),
            ring: Duration::from_millis(500),
            ring_stagger: Duration::from_millis(50),
            spoke_fade: Duration::from_millis(50),
            fade_out: Duration::from_millis(250),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AnimationOverrides {
    pub sweep_ms: Option<u64>,
    pub ring_ms: Option<u64>,
    pub ring_stagger_ms: Option<u64>,
    pub spoke_fade_ms: Option<u64>,
    pub fade_out_ms: Option<u64>,
}

/// One configuration layer. Every field is optional; `None` keeps the value from earlier layers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigOverrides {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub margin: Option<Margin>,
    pub levels: Option<i64>,
    pub max_value: Option<f64>,
    pub label_factor: Option<f64>,
    pub wrap_width: Option<f64>,
    pub opacity_area: Option<f64>,
    pub opacity_circles: Option<f64>,
    pub wedge_opacity: Option<f64>,
    pub dot_radius: Option<f64>,
    pub stroke_width: Option<f64>,
    pub round_strokes: Option<bool>,
    pub rotation_degrees: Option<f64>,
    pub angle_offset_degrees: Option<f64>,
    pub tooltip: Option<bool>,
    pub highlight_opacity: Option<f64>,
    pub dim_opacity: Option<f64>,
    pub font_size: Option<f64>,
    /// Dataset colors, cycled by dataset index.
    pub colors: Option<Vec<Rgb>>,
    /// Dataset stroke styles, cycled by dataset index.
    pub styles: Option<Vec<StrokeStyle>>,
    /// d3-style level label format, e.g. `.0f`.
    pub format: Option<String>,
    pub animation: Option<AnimationOverrides>,
    /// Programmatic encoding; takes precedence over `colors`/`styles` of the same layer.
    #[serde(skip)]
    pub encoding: Option<SeriesEncoding>,
    /// Programmatic level formatter; takes precedence over `format` of the same layer.
    #[serde(skip)]
    pub level_format: Option<LevelFormat>,
}

macro_rules! later_wins {
    ($base:expr, $layer:expr, [$($field:ident),* $(,)?]) => {
        $(
            if $layer.$field.is_some() {
                $base.$field = $layer.$field.clone();
            }
        )*
    };
}

impl ConfigOverrides {
    /// Returns `self` with every field set in `later` replaced.
    pub fn merged(mut self, later: &ConfigOverrides) -> ConfigOverrides {
        later_wins!(
            self,
            later,
            [
                width,
                height,
                margin,
                levels,
                max_value,
                label_factor,
                wrap_width,
                opacity_area,
                opacity_circles,
                wedge_opacity,
                dot_radius,
                stroke_width,
                round_strokes,
                rotation_degrees,
                angle_offset_degrees,
                tooltip,
                highlight_opacity,
                dim_opacity,
                font_size,
                format,
            ]
        );
        // Color and style lists merge independently; a programmatic encoding replaces both.
        if later.colors.is_some() || later.styles.is_some() {
            self.encoding = None;
        }
        later_wins!(self, later, [colors, styles]);
        if later.encoding.is_some() {
            self.encoding = later.encoding.clone();
            self.colors = None;
            self.styles = None;
        }
        if later.level_format.is_some() || later.format.is_some() {
            self.level_format = later.level_format.clone();
        }
        if let Some(anim) = &later.animation {
            let base = self.animation.get_or_insert_with(AnimationOverrides::default);
            later_wins!(
                base,
                anim,
                [sweep_ms, ring_ms, ring_stagger_ms, spoke_fade_ms, fade_out_ms]
            );
        }
        self
    }
}

/// Fully resolved, validated render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Inner drawing width (the canvas adds left/right margins).
    pub width: f64,
    /// Inner drawing height (the canvas adds top/bottom margins).
    pub height: f64,
    pub margin: Margin,
    pub levels: u32,
    pub max_value: f64,
    pub label_factor: f64,
    pub wrap_width: f64,
    pub opacity_area: f64,
    pub opacity_circles: f64,
    pub wedge_opacity: f64,
    pub dot_radius: f64,
    pub stroke_width: f64,
    pub round_strokes: bool,
    pub rotation_degrees: f64,
    pub angle_offset_degrees: f64,
    pub tooltip: bool,
    pub highlight_opacity: f64,
    pub dim_opacity: f64,
    pub font_size: f64,
    pub encoding: SeriesEncoding,
    pub format: LevelFormat,
    pub animation: AnimationConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 800.0,
            margin: Margin::default(),
            levels: 5,
            max_value: 8.0,
            label_factor: 1.15,
            wrap_width: 100.0,
            opacity_area: 0.35,
            opacity_circles: 0.1,
            wedge_opacity: 0.1,
            dot_radius: 4.0,
            stroke_width: 2.0,
            round_strokes: true,
            rotation_degrees: 0.0,
            angle_offset_degrees: 0.0,
            tooltip: true,
            highlight_opacity: 0.7,
            dim_opacity: 0.1,
            font_size: 14.0,
            encoding: SeriesEncoding::default(),
            format: LevelFormat::default(),
            animation: AnimationConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Resolves defaults plus `layers` (in order) into a validated config.
    pub fn resolve<'a>(layers: impl IntoIterator<Item = &'a ConfigOverrides>) -> Result<Self> {
        let mut count = 0usize;
        let merged = layers
            .into_iter()
            .inspect(|_| count += 1)
            .fold(ConfigOverrides::default(), |acc, layer| acc.merged(layer));
        let cfg = Self::from_overrides(&merged)?;
        tracing::debug!(
            layers = count,
            levels = cfg.levels,
            max_value = cfg.max_value,
            "resolved render config"
        );
        Ok(cfg)
    }

    fn from_overrides(o: &ConfigOverrides) -> Result<Self> {
        let d = Self::default();

        let levels = match o.levels {
            None => d.levels,
            Some(n) if n >= 1 && n <= i64::from(u32::MAX) => n as u32,
            Some(n) => return Err(Error::config("levels", format!("must be >= 1, got {n}"))),
        };

        let encoding = match (&o.encoding, &o.colors, &o.styles) {
            (Some(enc), _, _) => enc.clone(),
            (None, None, None) => d.encoding,
            (None, colors, styles) => SeriesEncoding::from_lists(
                colors.clone().unwrap_or_default(),
                styles.clone().unwrap_or_default(),
            ),
        };

        let format = match (&o.level_format, &o.format) {
            (Some(f), _) => f.clone(),
            (None, Some(spec)) => LevelFormat::parse(spec)?,
            (None, None) => d.format,
        };

        let mut animation = d.animation;
        if let Some(a) = &o.animation {
            if let Some(ms) = a.sweep_ms {
                animation.sweep = Duration::from_millis(ms);
            }
            if let Some(ms) = a.ring_ms {
                animation.ring = Duration::from_millis(ms);
            }
            if let Some(ms) = a.ring_stagger_ms {
                animation.ring_stagger = Duration::from_millis(ms);
            }
            if let Some(ms) = a.spoke_fade_ms {
                animation.spoke_fade = Duration::from_millis(ms);
            }
            if let Some(ms) = a.fade_out_ms {
                animation.fade_out = Duration::from_millis(ms);
            }
        }

        let cfg = Self {
            width: o.width.unwrap_or(d.width),
            height: o.height.unwrap_or(d.height),
            margin: o.margin.unwrap_or(d.margin),
            levels,
            max_value: o.max_value.unwrap_or(d.max_value),
            label_factor: o.label_factor.unwrap_or(d.label_factor),
            wrap_width: o.wrap_width.unwrap_or(d.wrap_width),
            opacity_area: o.opacity_area.unwrap_or(d.opacity_area),
            opacity_circles: o.opacity_circles.unwrap_or(d.opacity_circles),
            wedge_opacity: o.wedge_opacity.unwrap_or(d.wedge_opacity),
            dot_radius: o.dot_radius.unwrap_or(d.dot_radius),
            stroke_width: o.stroke_width.unwrap_or(d.stroke_width),
            round_strokes: o.round_strokes.unwrap_or(d.round_strokes),
            rotation_degrees: o.rotation_degrees.unwrap_or(d.rotation_degrees),
            angle_offset_degrees: o.angle_offset_degrees.unwrap_or(d.angle_offset_degrees),
            tooltip: o.tooltip.unwrap_or(d.tooltip),
            highlight_opacity: o.highlight_opacity.unwrap_or(d.highlight_opacity),
            dim_opacity: o.dim_opacity.unwrap_or(d.dim_opacity),
            font_size: o.font_size.unwrap_or(d.font_size),
            encoding,
            format,
            animation,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Checks every numeric invariant the geometry relies on.
    pub fn validate(&self) -> Result<()> {
        fn finite(field: &str, v: f64) -> Result<()> {
            if v.is_finite() {
                Ok(())
            } else {
                Err(Error::config(field, format!("must be finite, got {v}")))
            }
        }
        fn positive(field: &str, v: f64) -> Result<()> {
            finite(field, v)?;
            if v > 0.0 {
                Ok(())
            } else {
                Err(Error::config(field, format!("must be > 0, got {v}")))
            }
        }
        fn non_negative(field: &str, v: f64) -> Result<()> {
            finite(field, v)?;
            if v >= 0.0 {
                Ok(())
            } else {
                Err(Error::config(field, format!("must be >= 0, got {v}")))
            }
        }
        fn unit(field: &str, v: f64) -> Result<()> {
            finite(field, v)?;
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(Error::config(field, format!("must be within [0, 1], got {v}")))
            }
        }

        if self.levels == 0 {
            return Err(Error::config("levels", "must be >= 1, got 0"));
        }
        positive("width", self.width)?;
        positive("height", self.height)?;
        non_negative("margin.top", self.margin.top)?;
        non_negative("margin.right", self.margin.right)?;
        non_negative("margin.bottom", self.margin.bottom)?;
        non_negative("margin.left", self.margin.left)?;
        positive("maxValue", self.max_value)?;
        finite("labelFactor", self.label_factor)?;
        if self.label_factor <= 1.0 {
            return Err(Error::config(
                "labelFactor",
                format!("must be > 1, got {}", self.label_factor),
            ));
        }
        positive("wrapWidth", self.wrap_width)?;
        unit("opacityArea", self.opacity_area)?;
        unit("opacityCircles", self.opacity_circles)?;
        unit("wedgeOpacity", self.wedge_opacity)?;
        unit("highlightOpacity", self.highlight_opacity)?;
        unit("dimOpacity", self.dim_opacity)?;
        non_negative("dotRadius", self.dot_radius)?;
        non_negative("strokeWidth", self.stroke_width)?;
        finite("rotationDegrees", self.rotation_degrees)?;
        finite("angleOffsetDegrees", self.angle_offset_degrees)?;
        positive("fontSize", self.font_size)?;

        let radius = self.available_radius();
        if !(radius.is_finite() && radius > 0.0) {
            return Err(Error::config(
                "margin",
                format!(
                    "margins leave no room for the chart (available radius {radius}); \
                     increase width/height or reduce margins"
                ),
            ));
        }
        Ok(())
    }

    /// `min(width, height) / 2 - max(margin.left, margin.top)`.
    pub fn available_radius(&self) -> f64 {
        self.width.min(self.height) / 2.0 - self.margin.left.max(self.margin.top)
    }

    pub fn canvas_width(&self) -> f64 {
        self.width + self.margin.left + self.margin.right
    }

    pub fn canvas_height(&self) -> f64 {
        self.height + self.margin.top + self.margin.bottom
    }

    pub fn rotation_radians(&self) -> f64 {
        self.rotation_degrees.to_radians()
    }

    pub fn angle_offset_radians(&self) -> f64 {
        self.angle_offset_degrees.to_radians()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(json: serde_json::Value) -> ConfigOverrides {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn defaults_resolve_and_validate() {
        let cfg = RenderConfig::resolve([]).unwrap();
        assert_eq!(cfg.levels, 5);
        assert_eq!(cfg.max_value, 8.0);
        assert_eq!(cfg.available_radius(), 300.0);
        assert_eq!(cfg.canvas_width(), 1000.0);
        assert_eq!(cfg.format.format(1.6), "2");
    }

    #[test]
    fn later_layers_win_field_by_field() {
        let a = layer(serde_json::json!({ "levels": 4, "maxValue": 10 }));
        let b = layer(serde_json::json!({ "maxValue": 12, "roundStrokes": false }));
        let cfg = RenderConfig::resolve([&a, &b]).unwrap();
        assert_eq!(cfg.levels, 4);
        assert_eq!(cfg.max_value, 12.0);
        assert!(!cfg.round_strokes);
        assert_eq!(cfg.dot_radius, 4.0);
    }

    #[test]
    fn margin_layer_fills_missing_sides_from_defaults() {
        let a = layer(serde_json::json!({ "margin": { "top": 40 } }));
        let cfg = RenderConfig::resolve([&a]).unwrap();
        assert_eq!(cfg.margin.top, 40.0);
        assert_eq!(cfg.margin.left, 100.0);
    }

    #[test]
    fn colors_and_styles_become_an_encoding() {
        let a = layer(serde_json::json!({
            "colors": ["#ff0000", "#00ff00"],
            "styles": ["solid", "dashed"]
        }));
        let cfg = RenderConfig::resolve([&a]).unwrap();
        let styles = cfg.encoding.resolve(3);
        assert_eq!(styles[1].color, Rgb::new(0, 255, 0));
        assert_eq!(styles[1].stroke, StrokeStyle::Dashed);
        assert_eq!(styles[2].color, Rgb::new(255, 0, 0));
    }

    #[test]
    fn colors_and_styles_merge_independently_across_layers() {
        let a = layer(serde_json::json!({ "colors": ["#ff0000"] }));
        let b = layer(serde_json::json!({ "styles": ["dashed"] }));
        let cfg = RenderConfig::resolve([&a, &b]).unwrap();
        let style = cfg.encoding.style(0);
        assert_eq!(style.color, Rgb::new(255, 0, 0));
        assert_eq!(style.stroke, StrokeStyle::Dashed);

        let cfg = RenderConfig::resolve([&b, &a]).unwrap();
        assert_eq!(cfg.encoding.style(1).stroke, StrokeStyle::Dashed);
        assert_eq!(cfg.encoding.style(1).color, Rgb::new(255, 0, 0));
    }

    #[test]
    fn programmatic_encoding_replaces_both_lists() {
        let a = layer(serde_json::json!({ "colors": ["#ff0000"], "styles": ["dashed"] }));
        let b = ConfigOverrides {
            encoding: Some(SeriesEncoding::default()),
            ..ConfigOverrides::default()
        };
        let cfg = RenderConfig::resolve([&a, &b]).unwrap();
        assert_eq!(cfg.encoding.style(0).stroke, StrokeStyle::Solid);
        assert_eq!(cfg.encoding.style(0).color, Rgb::new(0x1f, 0x77, 0xb4));
    }

    #[test]
    fn non_positive_levels_and_max_value_are_rejected() {
        for bad in [
            serde_json::json!({ "levels": 0 }),
            serde_json::json!({ "levels": -3 }),
            serde_json::json!({ "maxValue": 0 }),
            serde_json::json!({ "maxValue": -1.5 }),
        ] {
            let err = RenderConfig::resolve([&layer(bad.clone())]).unwrap_err();
            assert!(matches!(err, Error::InvalidConfig { .. }), "{bad}: {err}");
        }
    }

    #[test]
    fn margins_that_swallow_the_radius_are_rejected() {
        let a = layer(serde_json::json!({ "width": 150, "height": 150 }));
        let err = RenderConfig::resolve([&a]).unwrap_err();
        assert!(
            matches!(err, Error::InvalidConfig { ref field, .. } if field == "margin"),
            "{err}"
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let res: std::result::Result<ConfigOverrides, _> =
            serde_yaml::from_str("levels: 3\nlevelz: 4\n");
        assert!(res.is_err());
    }

    #[test]
    fn bad_format_specifier_is_a_config_error() {
        let a = layer(serde_json::json!({ "format": "%Y" }));
        assert!(RenderConfig::resolve([&a]).is_err());
    }

    #[test]
    fn animation_overrides_merge_per_field() {
        let a = layer(serde_json::json!({ "animation": { "sweepMs": 1000 } }));
        let b = layer(serde_json::json!({ "animation": { "fadeOutMs": 0 } }));
        let cfg = RenderConfig::resolve([&a, &b]).unwrap();
        assert_eq!(cfg.animation.sweep, Duration::from_millis(1000));
        assert_eq!(cfg.animation.fade_out, Duration::ZERO);
        assert_eq!(cfg.animation.ring, Duration::from_millis(500));
    }
}
