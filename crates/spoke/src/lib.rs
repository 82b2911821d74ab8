#![forbid(unsafe_code)]

//! `spoke` renders pillar radar charts headlessly.
//!
//! A chart is a list of groups ("pillars"), each owning a few axes and a color, plus any number
//! of datasets scoring those axes. This crate ties the pieces together: it reads chart
//! documents, resolves layered configuration, and hands the result to the layout engine and
//! renderer in `spoke-render`.
//!
//! # Features
//!
//! - `raster`: enable PNG output via pure-Rust SVG rasterization (`spoke::raster`)

pub mod document;
#[cfg(feature = "raster")]
pub mod raster;

pub use document::{ChartDocument, DocumentFormat, parse_overrides};
pub use spoke_core::{
    AnimationConfig, AxisDefinition, ChartData, ConfigOverrides, Dataset, Group, GroupColors,
    LevelFormat, Margin, Palette, RenderConfig, Rgb, Score, SeriesEncoding, SeriesStyle,
    StrokeStyle,
};

pub mod render {
    pub use spoke_render::animate::{SweepPhase, Timeline};
    pub use spoke_render::interaction::{HitTarget, Tooltip, TooltipContent};
    pub use spoke_render::model::RadarLayout;
    pub use spoke_render::scene::{Layer, Scene};
    pub use spoke_render::text::{DeterministicTextMeasurer, TextMeasurer};
    pub use spoke_render::{LayoutOptions, MountPoint, RenderHandle};
}

use spoke_render::{LayoutOptions, MountPoint, RadarLayout, RenderHandle};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] spoke_core::Error),
    #[error(transparent)]
    Render(#[from] spoke_render::Error),
    #[error("invalid YAML document: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A validated chart: ordered axes, datasets and a resolved config, ready to lay out.
#[derive(Debug, Clone)]
pub struct Chart {
    axes: Vec<AxisDefinition>,
    datasets: Vec<Dataset>,
    groups: GroupColors,
    config: RenderConfig,
    layout_options: LayoutOptions,
}

impl Chart {
    pub fn new(data: &ChartData, config: RenderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            axes: data.axes()?,
            datasets: data.datasets.clone(),
            groups: data.group_colors(),
            config,
            layout_options: LayoutOptions::default(),
        })
    }

    /// Builds a chart from a document. `extra_layers` apply after the document's own `config`
    /// block, later layers winning.
    pub fn from_document(doc: &ChartDocument, extra_layers: &[ConfigOverrides]) -> Result<Self> {
        let config =
            RenderConfig::resolve(std::iter::once(&doc.config).chain(extra_layers.iter()))?;
        Self::new(&doc.data(), config)
    }

    pub fn with_layout_options(mut self, options: LayoutOptions) -> Self {
        self.layout_options = options;
        self
    }

    pub fn axes(&self) -> &[AxisDefinition] {
        &self.axes
    }

    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn layout(&self) -> Result<RadarLayout> {
        Ok(spoke_render::compute_layout(
            &self.axes,
            &self.datasets,
            &self.groups,
            &self.config,
            self.layout_options.text_measurer.as_ref(),
        )?)
    }

    /// Fully revealed SVG.
    pub fn render_svg(&self) -> Result<String> {
        let layout = self.layout()?;
        Ok(spoke_render::Scene::build(&layout, &self.config).to_svg())
    }

    /// Lays out and mounts the chart, replacing whatever `mount` held.
    pub fn mount(&self, mount: &mut MountPoint, animated: bool) -> Result<RenderHandle> {
        let layout = self.layout()?;
        Ok(if animated {
            mount.render_animated(&layout, &self.config)
        } else {
            mount.render(&layout, &self.config)
        })
    }

    /// SVG of the animated reveal sampled `seconds` after it starts.
    pub fn frame_at(&self, seconds: f64) -> Result<String> {
        let mut mount = MountPoint::new("radar");
        let handle = self.mount(&mut mount, true)?;
        mount.advance(handle, seconds.max(0.0));
        let svg = mount.svg().unwrap_or_default();
        tracing::debug!(seconds, phase = ?mount.phase(), "sampled reveal frame");
        Ok(svg)
    }
}

/// Parses a chart document (format sniffed from the text) and renders it to SVG.
pub fn render_svg(text: &str) -> Result<String> {
    let doc = ChartDocument::parse(text, DocumentFormat::sniff(text))?;
    Chart::from_document(&doc, &[])?.render_svg()
}
