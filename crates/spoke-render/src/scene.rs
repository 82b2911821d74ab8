//! Retained scene: typed element layers painted back to front, plus the mutable state the
//! animator and hover logic drive (ring radii, spoke opacity, fill opacity, reveal clips).

use crate::geom::{Point, fmt_number as fmt, polar, sector_path, sweep_angle};
use crate::model::{LegendLayout, RadarLayout};
use spoke_core::{RenderConfig, Rgb};
use std::f64::consts::TAU;
use std::fmt::Write as _;

const GRID_COLOR: &str = "#CDCDCD";
const SPOKE_COLOR: &str = "white";
const TEXT_COLOR: &str = "#000";
const MARKER_FILL_OPACITY: f64 = 0.8;
const LABEL_LINE_HEIGHT_EM: f64 = 1.4;
const LABEL_DY_EM: f64 = 0.35;
const RING_LABEL_DY_EM: f64 = 0.4;
const LEGEND_FONT_SIZE: f64 = 12.0;
const LEGEND_TEXT_DX: f64 = 16.0;
const SWEEP_LINE_FACTOR: f64 = 1.1;

/// Paint layers, back to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Wedges,
    Rings,
    RingLabels,
    Spokes,
    AxisLabels,
    Fills,
    Outlines,
    Markers,
    GroupLegend,
    DatasetLegend,
}

impl Layer {
    pub const PAINT_ORDER: [Layer; 10] = [
        Layer::Wedges,
        Layer::Rings,
        Layer::RingLabels,
        Layer::Spokes,
        Layer::AxisLabels,
        Layer::Fills,
        Layer::Outlines,
        Layer::Markers,
        Layer::GroupLegend,
        Layer::DatasetLegend,
    ];

    pub fn class(self) -> &'static str {
        match self {
            Layer::Wedges => "wedges",
            Layer::Rings => "rings",
            Layer::RingLabels => "ring-labels",
            Layer::Spokes => "spokes",
            Layer::AxisLabels => "axis-labels",
            Layer::Fills => "fills",
            Layer::Outlines => "outlines",
            Layer::Markers => "markers",
            Layer::GroupLegend => "group-legend",
            Layer::DatasetLegend => "dataset-legend",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WedgeNode {
    pub axis: String,
    pub path_d: String,
    pub color: Rgb,
    pub fill_opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RingNode {
    pub level: u32,
    /// Current (possibly animated) radius.
    pub r: f64,
    pub target_r: f64,
    pub fill_opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RingLabelNode {
    pub position: Point,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpokeNode {
    pub slot: usize,
    pub angle: f64,
    pub end: Point,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabelNode {
    pub axis: String,
    pub position: Point,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerNode {
    pub axis: String,
    pub value: f64,
    pub explanation: Option<String>,
    pub center: Point,
    pub r: f64,
    /// Radius of the invisible pointer target; `None` when tooltips are disabled.
    pub hit_r: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesNode {
    pub name: String,
    pub index: usize,
    pub color: Rgb,
    pub dasharray: Option<String>,
    pub path_d: String,
    pub stroke_width: f64,
    pub base_fill_opacity: f64,
    pub fill_opacity: f64,
    pub markers: Vec<MarkerNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SweepLineNode {
    /// Clockwise turn from twelve o'clock; runs 0..720 across both phases.
    pub degrees: f64,
    pub length: f64,
    pub opacity: f64,
    pub visible: bool,
}

/// Clip regions driven by the sweep reveal, both measured in degrees swept (0..=360).
#[derive(Debug, Clone, PartialEq)]
pub struct RevealState {
    pub clip_radius: f64,
    pub wedge_clip_degrees: f64,
    pub data_clip_degrees: f64,
    pub sweep: SweepLineNode,
}

impl RevealState {
    pub fn is_fully_revealed(&self) -> bool {
        self.wedge_clip_degrees >= 360.0 && self.data_clip_degrees >= 360.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub id: String,
    pub width: f64,
    pub height: f64,
    pub center: Point,
    pub radius: f64,
    pub rotation: f64,
    pub font_size: f64,
    pub wedges: Vec<WedgeNode>,
    pub rings: Vec<RingNode>,
    pub ring_labels: Vec<RingLabelNode>,
    pub spokes: Vec<SpokeNode>,
    pub axis_labels: Vec<AxisLabelNode>,
    pub series: Vec<SeriesNode>,
    pub group_legend: LegendLayout,
    pub dataset_legend: LegendLayout,
    /// Present only for animated renders.
    pub reveal: Option<RevealState>,
}

impl Scene {
    /// Paints `layout` into a fully drawn (settled) scene.
    pub fn build(layout: &RadarLayout, config: &RenderConfig) -> Self {
        let wedges = layout
            .wedges
            .iter()
            .map(|w| WedgeNode {
                axis: w.axis.clone(),
                path_d: w.path_d.clone(),
                color: w.color,
                fill_opacity: config.wedge_opacity,
            })
            .collect();

        let rings = layout
            .rings
            .iter()
            .map(|r| RingNode {
                level: r.level,
                r: r.r,
                target_r: r.r,
                fill_opacity: config.opacity_circles,
            })
            .collect();

        let ring_labels = layout
            .rings
            .iter()
            .map(|r| RingLabelNode {
                position: Point::new(r.label_x, r.label_y),
                text: r.label.clone(),
            })
            .collect();

        let spokes = layout
            .spokes
            .iter()
            .map(|s| SpokeNode {
                slot: s.slot,
                angle: s.angle,
                end: s.end,
                opacity: 1.0,
            })
            .collect();

        let axis_labels = layout
            .axis_labels
            .iter()
            .map(|l| AxisLabelNode {
                axis: l.axis.clone(),
                position: l.position,
                lines: l.lines.clone(),
            })
            .collect();

        let series = layout
            .series
            .iter()
            .map(|s| SeriesNode {
                name: s.name.clone(),
                index: s.index,
                color: s.style.color,
                dasharray: s.style.stroke.dasharray().map(str::to_string),
                path_d: s.path_d.clone(),
                stroke_width: config.stroke_width,
                base_fill_opacity: config.opacity_area,
                fill_opacity: config.opacity_area,
                markers: s
                    .vertices
                    .iter()
                    .map(|v| MarkerNode {
                        axis: v.axis.clone(),
                        value: v.value,
                        explanation: v.explanation.clone(),
                        center: v.point,
                        r: s.marker_radius,
                        hit_r: config.tooltip.then_some(s.hit_radius),
                    })
                    .collect(),
            })
            .collect();

        let scene = Self {
            id: "radar".to_string(),
            width: layout.canvas_width,
            height: layout.canvas_height,
            center: layout.center,
            radius: layout.radius,
            rotation: layout.rotation,
            font_size: config.font_size,
            wedges,
            rings,
            ring_labels,
            spokes,
            axis_labels,
            series,
            group_legend: layout.group_legend.clone(),
            dataset_legend: layout.dataset_legend.clone(),
            reveal: None,
        };
        tracing::debug!(
            wedges = scene.wedges.len(),
            series = scene.series.len(),
            "built scene"
        );
        scene
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Resets the animated elements to the start of the reveal: rings collapsed, spokes hidden,
    /// both clip regions empty and the sweep line at twelve o'clock.
    pub fn prepare_reveal(&mut self) {
        for ring in &mut self.rings {
            ring.r = 0.0;
        }
        for spoke in &mut self.spokes {
            spoke.opacity = 0.0;
        }
        self.reveal = Some(RevealState {
            clip_radius: self.clip_radius(),
            wedge_clip_degrees: 0.0,
            data_clip_degrees: 0.0,
            sweep: SweepLineNode {
                degrees: 0.0,
                length: self.radius * SWEEP_LINE_FACTOR,
                opacity: 1.0,
                visible: true,
            },
        });
    }

    /// Jumps every animated element to its final state.
    pub fn settle_reveal(&mut self) {
        for ring in &mut self.rings {
            ring.r = ring.target_r;
        }
        for spoke in &mut self.spokes {
            spoke.opacity = 1.0;
        }
        if let Some(reveal) = &mut self.reveal {
            reveal.wedge_clip_degrees = 360.0;
            reveal.data_clip_degrees = 360.0;
            reveal.sweep.opacity = 0.0;
            reveal.sweep.visible = false;
        }
    }

    /// Whether the data clip currently shows chart-space point `p`. Always true for static
    /// scenes and once the reveal has settled.
    pub fn data_visible_at(&self, p: Point) -> bool {
        let Some(reveal) = &self.reveal else {
            return true;
        };
        if reveal.data_clip_degrees >= 360.0 {
            return true;
        }
        if reveal.data_clip_degrees <= 0.0 {
            return false;
        }
        if p.distance(Point::ORIGIN) < 1e-9 {
            return true;
        }
        let swept = (p.y.atan2(p.x) - sweep_angle(0.0, self.rotation)).rem_euclid(TAU);
        swept.to_degrees() <= reveal.data_clip_degrees
    }

    /// Large enough to cover every drawn element, including scores past the outer ring.
    fn clip_radius(&self) -> f64 {
        let spoke_reach = self
            .spokes
            .iter()
            .map(|s| s.end.distance(Point::ORIGIN))
            .fold(self.radius * SWEEP_LINE_FACTOR, f64::max);
        self.series
            .iter()
            .flat_map(|s| s.markers.iter())
            .map(|m| m.center.distance(Point::ORIGIN) + m.hit_r.unwrap_or(m.r))
            .fold(spoke_reach, f64::max)
    }

    fn wedge_clip_id(&self) -> String {
        format!("{}-wedge-clip", self.id)
    }

    fn data_clip_id(&self) -> String {
        format!("{}-data-clip", self.id)
    }

    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        let id = escape_xml(&self.id);
        let _ = write!(
            &mut out,
            r#"<svg id="{id}" class="radar" xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" preserveAspectRatio="xMidYMid meet">"#,
            w = fmt(self.width),
            h = fmt(self.height),
        );

        if let Some(reveal) = &self.reveal {
            let start = sweep_angle(0.0, self.rotation);
            out.push_str("<defs>");
            for (clip_id, degrees) in [
                (self.wedge_clip_id(), reveal.wedge_clip_degrees),
                (self.data_clip_id(), reveal.data_clip_degrees),
            ] {
                let end = sweep_angle(degrees.clamp(0.0, 360.0), self.rotation);
                let _ = write!(
                    &mut out,
                    r#"<clipPath id="{}"><path d="{}"/></clipPath>"#,
                    escape_xml(&clip_id),
                    sector_path(reveal.clip_radius, start, end)
                );
            }
            out.push_str("</defs>");
        }

        let _ = write!(
            &mut out,
            r#"<g class="chart" transform="translate({x}, {y})">"#,
            x = fmt(self.center.x),
            y = fmt(self.center.y)
        );
        for layer in Layer::PAINT_ORDER {
            match layer {
                Layer::GroupLegend | Layer::DatasetLegend => {}
                _ => self.write_layer(&mut out, layer),
            }
        }
        self.write_sweep_line(&mut out);
        out.push_str("</g>");

        self.write_layer(&mut out, Layer::GroupLegend);
        self.write_layer(&mut out, Layer::DatasetLegend);
        out.push_str("</svg>");
        out
    }

    fn open_layer(&self, out: &mut String, layer: Layer) {
        let clip = match (&self.reveal, layer) {
            (Some(_), Layer::Wedges) => Some(self.wedge_clip_id()),
            (Some(_), Layer::Fills | Layer::Outlines | Layer::Markers) => Some(self.data_clip_id()),
            _ => None,
        };
        match clip {
            Some(clip) => {
                let _ = write!(
                    out,
                    r#"<g class="{}" clip-path="url(#{})">"#,
                    layer.class(),
                    escape_xml(&clip)
                );
            }
            None => {
                let _ = write!(out, r#"<g class="{}">"#, layer.class());
            }
        }
    }

    fn write_layer(&self, out: &mut String, layer: Layer) {
        match layer {
            Layer::GroupLegend => {
                write_legend(out, layer, &self.group_legend);
                return;
            }
            Layer::DatasetLegend => {
                write_legend(out, layer, &self.dataset_legend);
                return;
            }
            _ => {}
        }

        self.open_layer(out, layer);
        match layer {
            Layer::Wedges => {
                for w in &self.wedges {
                    let _ = write!(
                        out,
                        r#"<path class="wedge" d="{d}" fill="{c}" fill-opacity="{o}"/>"#,
                        d = w.path_d,
                        c = w.color,
                        o = fmt(w.fill_opacity)
                    );
                }
            }
            Layer::Rings => {
                for r in &self.rings {
                    let _ = write!(
                        out,
                        r#"<circle class="ring" r="{r}" fill="{GRID_COLOR}" stroke="{GRID_COLOR}" fill-opacity="{o}"/>"#,
                        r = fmt(r.r),
                        o = fmt(r.fill_opacity)
                    );
                }
            }
            Layer::RingLabels => {
                for l in &self.ring_labels {
                    let _ = write!(
                        out,
                        r#"<text class="ring-label" x="{x}" y="{y}" dy="{RING_LABEL_DY_EM}em" font-size="{fs}" fill="{TEXT_COLOR}">{t}</text>"#,
                        x = fmt(l.position.x),
                        y = fmt(l.position.y),
                        fs = fmt(self.font_size),
                        t = escape_xml(&l.text)
                    );
                }
            }
            Layer::Spokes => {
                for s in &self.spokes {
                    let _ = write!(
                        out,
                        r#"<line class="spoke" x1="0" y1="0" x2="{x}" y2="{y}" stroke="{SPOKE_COLOR}" stroke-width="2" opacity="{o}"/>"#,
                        x = fmt(s.end.x),
                        y = fmt(s.end.y),
                        o = fmt(s.opacity)
                    );
                }
            }
            Layer::AxisLabels => {
                for l in &self.axis_labels {
                    let x = fmt(l.position.x);
                    let y = fmt(l.position.y);
                    let _ = write!(
                        out,
                        r#"<text class="axis-label" x="{x}" y="{y}" text-anchor="middle" font-size="{fs}" fill="{TEXT_COLOR}">"#,
                        fs = fmt(self.font_size)
                    );
                    for (i, line) in l.lines.iter().enumerate() {
                        let dy = i as f64 * LABEL_LINE_HEIGHT_EM + LABEL_DY_EM;
                        let _ = write!(
                            out,
                            r#"<tspan x="{x}" y="{y}" dy="{dy}em">{t}</tspan>"#,
                            dy = fmt(dy),
                            t = escape_xml(line)
                        );
                    }
                    out.push_str("</text>");
                }
            }
            Layer::Fills => {
                for s in &self.series {
                    let _ = write!(
                        out,
                        r#"<path class="fill" data-series="{i}" d="{d}" fill="{c}" fill-opacity="{o}"/>"#,
                        i = s.index,
                        d = s.path_d,
                        c = s.color,
                        o = fmt(s.fill_opacity)
                    );
                }
            }
            Layer::Outlines => {
                for s in &self.series {
                    let _ = write!(
                        out,
                        r#"<path class="outline" data-series="{i}" d="{d}" fill="none" stroke="{c}" stroke-width="{w}""#,
                        i = s.index,
                        d = s.path_d,
                        c = s.color,
                        w = fmt(s.stroke_width)
                    );
                    if let Some(dash) = &s.dasharray {
                        let _ = write!(out, r#" stroke-dasharray="{dash}""#);
                    }
                    out.push_str("/>");
                }
            }
            Layer::Markers => {
                for s in &self.series {
                    let _ = write!(out, r#"<g class="series" data-series="{}">"#, s.index);
                    for (j, m) in s.markers.iter().enumerate() {
                        let _ = write!(
                            out,
                            r#"<circle class="marker" data-vertex="{j}" cx="{x}" cy="{y}" r="{r}" fill="{c}" fill-opacity="{MARKER_FILL_OPACITY}"/>"#,
                            x = fmt(m.center.x),
                            y = fmt(m.center.y),
                            r = fmt(m.r),
                            c = s.color
                        );
                    }
                    for (j, m) in s.markers.iter().enumerate() {
                        let Some(hit_r) = m.hit_r else { continue };
                        let _ = write!(
                            out,
                            r#"<circle class="hit-target" data-series="{i}" data-vertex="{j}" cx="{x}" cy="{y}" r="{r}" fill="none" pointer-events="all"/>"#,
                            i = s.index,
                            x = fmt(m.center.x),
                            y = fmt(m.center.y),
                            r = fmt(hit_r)
                        );
                    }
                    out.push_str("</g>");
                }
            }
            Layer::GroupLegend | Layer::DatasetLegend => {}
        }
        out.push_str("</g>");
    }

    fn write_sweep_line(&self, out: &mut String) {
        let Some(reveal) = &self.reveal else { return };
        let sweep = &reveal.sweep;
        let end = polar(sweep.length, sweep_angle(sweep.degrees, self.rotation));
        let _ = write!(
            out,
            r#"<line class="sweep-line" x1="0" y1="0" x2="{x}" y2="{y}" stroke="black" stroke-width="2" opacity="{o}""#,
            x = fmt(end.x),
            y = fmt(end.y),
            o = fmt(sweep.opacity)
        );
        if !sweep.visible {
            out.push_str(r#" display="none""#);
        }
        out.push_str("/>");
    }
}

fn write_legend(out: &mut String, layer: Layer, legend: &LegendLayout) {
    let _ = write!(
        out,
        r#"<g class="{}" transform="translate({}, {})">"#,
        layer.class(),
        fmt(legend.origin.x),
        fmt(legend.origin.y)
    );
    for item in &legend.items {
        let _ = write!(
            out,
            r#"<g class="legend-item" transform="translate({}, {})">"#,
            fmt(item.offset.x),
            fmt(item.offset.y)
        );
        let _ = write!(
            out,
            r#"<rect width="{s}" height="{s}" fill="{c}""#,
            s = fmt(legend.swatch),
            c = item.color
        );
        if let Some(dash) = &item.dasharray {
            let _ = write!(
                out,
                r#" stroke="{c}" stroke-dasharray="{dash}" fill-opacity="0.35""#,
                c = item.color
            );
        }
        out.push_str("/>");
        let _ = write!(
            out,
            r#"<text x="{dx}" y="{y}" font-size="{LEGEND_FONT_SIZE}" fill="{TEXT_COLOR}">{t}</text>"#,
            dx = fmt(LEGEND_TEXT_DX),
            y = fmt(legend.swatch - 2.0),
            t = escape_xml(&item.label)
        );
        out.push_str("</g>");
    }
    out.push_str("</g>");
}

pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compute_layout;
    use crate::text::DeterministicTextMeasurer;
    use spoke_core::{AxisDefinition, Dataset, GroupColors};

    fn scene(config: &RenderConfig) -> Scene {
        let axes = vec![
            AxisDefinition::new("Speed & Power", "Build"),
            AxisDefinition::new("Quality", "Build"),
            AxisDefinition::new("Reach", "Grow"),
        ];
        let mut groups = GroupColors::new();
        groups.insert("Build".to_string(), Rgb::new(0xf3, 0x46, 0x7c));
        groups.insert("Grow".to_string(), Rgb::new(0x00, 0xad, 0xbb));
        let datasets = vec![
            Dataset::new("Before").with_point("Quality", 3.0),
            Dataset::new("After").with_point("Reach", 9.0),
        ];
        let layout = compute_layout(
            &axes,
            &datasets,
            &groups,
            config,
            &DeterministicTextMeasurer::default(),
        )
        .unwrap();
        Scene::build(&layout, config)
    }

    #[test]
    fn svg_is_well_formed_and_escaped() {
        let svg = scene(&RenderConfig::default()).to_svg();
        let doc = roxmltree::Document::parse(&svg).unwrap();
        let root = doc.root_element();
        assert_eq!(root.attribute("width"), Some("1000"));
        assert_eq!(root.attribute("viewBox"), Some("0 0 1000 1000"));
        assert_eq!(root.attribute("preserveAspectRatio"), Some("xMidYMid meet"));
        assert!(svg.contains(">Speed &amp;</tspan>"));
        assert!(svg.contains(">Power</tspan>"));
    }

    #[test]
    fn hit_targets_follow_the_tooltip_flag() {
        let with = scene(&RenderConfig::default()).to_svg();
        assert_eq!(with.matches(r#"class="hit-target""#).count(), 6);

        let config = RenderConfig {
            tooltip: false,
            ..RenderConfig::default()
        };
        let without = scene(&config).to_svg();
        assert!(!without.contains("hit-target"));
        assert_eq!(without.matches(r#"class="marker""#).count(), 6);
    }

    #[test]
    fn static_scene_has_no_clips() {
        let svg = scene(&RenderConfig::default()).to_svg();
        assert!(!svg.contains("clipPath"));
        assert!(!svg.contains("sweep-line"));
    }

    #[test]
    fn reveal_starts_collapsed_and_settles_open() {
        let mut s = scene(&RenderConfig::default());
        s.prepare_reveal();
        assert!(s.rings.iter().all(|r| r.r == 0.0));
        assert!(s.spokes.iter().all(|sp| sp.opacity == 0.0));
        let reveal = s.reveal.as_ref().unwrap();
        assert!(!reveal.is_fully_revealed());
        assert!(reveal.clip_radius >= s.radius * 1.1);
        assert!(s.to_svg().contains(r#"<path d="M0,0Z"/>"#));

        s.settle_reveal();
        let reveal = s.reveal.as_ref().unwrap();
        assert!(reveal.is_fully_revealed());
        assert!(!reveal.sweep.visible);
        assert!(s.rings.iter().all(|r| r.r == r.target_r));
        assert!(s.to_svg().contains(r#"display="none""#));
    }

    #[test]
    fn clip_radius_covers_scores_past_the_outer_ring() {
        let mut s = scene(&RenderConfig::default());
        s.prepare_reveal();
        let farthest = s.series[1].markers[2].center.distance(Point::ORIGIN);
        assert!(farthest > s.radius);
        assert!(s.reveal.unwrap().clip_radius > farthest);
    }
}
