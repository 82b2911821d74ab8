//! Layout output: every element the renderer draws, already positioned.
//!
//! Chart geometry (slots, rings, spokes, labels, wedges, series) is relative to the chart
//! [`RadarLayout::center`]; legends are in canvas coordinates.

use crate::geom::Point;
use serde::{Deserialize, Serialize};
use spoke_core::{Rgb, SeriesStyle};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotLayout {
    pub index: usize,
    pub angle: f64,
    /// Even slots carry a spoke and label; odd slots carry data vertices.
    pub visible: bool,
    /// Index of the axis that owns this slot.
    pub axis: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingLayout {
    pub level: u32,
    pub r: f64,
    pub value: f64,
    pub label: String,
    pub label_x: f64,
    pub label_y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpokeLayout {
    pub slot: usize,
    pub angle: f64,
    pub end: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisLabelLayout {
    pub axis: String,
    pub slot: usize,
    pub angle: f64,
    pub position: Point,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WedgeLayout {
    pub axis: String,
    pub group: String,
    pub color: Rgb,
    pub start_angle: f64,
    pub end_angle: f64,
    pub radius: f64,
    pub path_d: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexLayout {
    pub axis: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub angle: f64,
    pub radius: f64,
    pub point: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesLayout {
    pub name: String,
    pub index: usize,
    pub style: SeriesStyle,
    pub vertices: Vec<VertexLayout>,
    pub path_d: String,
    pub marker_radius: f64,
    pub hit_radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendItemLayout {
    pub label: String,
    pub color: Rgb,
    /// Offset of the swatch from the legend origin.
    pub offset: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dasharray: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendLayout {
    pub origin: Point,
    pub swatch: f64,
    #[serde(default)]
    pub items: Vec<LegendItemLayout>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarLayout {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub center: Point,
    /// Radius of the outermost grid ring.
    pub radius: f64,
    pub max_value: f64,
    pub angle_step: f64,
    pub rotation: f64,
    #[serde(default)]
    pub slots: Vec<SlotLayout>,
    #[serde(default)]
    pub rings: Vec<RingLayout>,
    #[serde(default)]
    pub spokes: Vec<SpokeLayout>,
    #[serde(default)]
    pub axis_labels: Vec<AxisLabelLayout>,
    #[serde(default)]
    pub wedges: Vec<WedgeLayout>,
    #[serde(default)]
    pub series: Vec<SeriesLayout>,
    pub group_legend: LegendLayout,
    pub dataset_legend: LegendLayout,
}

impl RadarLayout {
    pub fn to_json_string(&self, pretty: bool) -> crate::Result<String> {
        Ok(if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        })
    }

    /// Converts a canvas position into chart (center-relative) coordinates.
    pub fn to_chart_space(&self, canvas: Point) -> Point {
        Point::new(canvas.x - self.center.x, canvas.y - self.center.y)
    }
}
