//! The geometry engine: axes + datasets + config → [`RadarLayout`].
//!
//! Every real axis owns two angular slots: an even "visible" slot carrying its spoke and label,
//! and the following odd slot where data vertices sit. Vertices therefore land between two
//! labelled spokes, centered on the axis's wedge.

use crate::geom::{LinearScale, Point, closed_cardinal_path, closed_linear_path, polar, sector_path};
use crate::model::{
    AxisLabelLayout, LegendItemLayout, LegendLayout, RadarLayout, RingLayout, SeriesLayout,
    SlotLayout, SpokeLayout, VertexLayout, WedgeLayout,
};
use crate::text::{TextMeasurer, TextStyle, wrap_words};
use crate::Result;
use spoke_core::{AxisDefinition, Dataset, Error, GroupColors, RenderConfig};
use std::collections::HashSet;
use std::f64::consts::{FRAC_PI_2, TAU};

/// Spokes overshoot the outer ring by this factor of `maxValue`.
const SPOKE_OVERSHOOT: f64 = 1.1;
const HIT_RADIUS_FACTOR: f64 = 1.5;
const RING_LABEL_DX: f64 = 4.0;
const LEGEND_SWATCH: f64 = 12.0;
const GROUP_LEGEND_GAP: f64 = 20.0;
const GROUP_LEGEND_STEP_X: f64 = 150.0;
const DATASET_LEGEND_GAP: f64 = 20.0;
const DATASET_LEGEND_STEP_Y: f64 = 25.0;

/// Screen angle of slot `k`.
pub fn slot_angle(k: usize, angle_step: f64, rotation: f64) -> f64 {
    k as f64 * angle_step - FRAC_PI_2 + rotation
}

pub fn radius_scale(config: &RenderConfig) -> LinearScale {
    LinearScale::new((0.0, config.max_value), (0.0, config.available_radius()))
}

pub fn compute_layout(
    axes: &[AxisDefinition],
    datasets: &[Dataset],
    groups: &GroupColors,
    config: &RenderConfig,
    measurer: &dyn TextMeasurer,
) -> Result<RadarLayout> {
    config.validate()?;
    if axes.is_empty() {
        return Err(Error::NoAxes.into());
    }
    let mut seen: HashSet<&str> = HashSet::new();
    for axis in axes {
        if !seen.insert(axis.name.as_str()) {
            return Err(Error::DuplicateAxis {
                axis: axis.name.clone(),
            }
            .into());
        }
    }

    let radius = config.available_radius();
    let scale = radius_scale(config);
    let rotation = config.rotation_radians();
    let slot_count = axes.len() * 2;
    let angle_step = TAU / slot_count as f64;

    let slots: Vec<SlotLayout> = (0..slot_count)
        .map(|k| SlotLayout {
            index: k,
            angle: slot_angle(k, angle_step, rotation),
            visible: k % 2 == 0,
            axis: k / 2,
        })
        .collect();

    let rings: Vec<RingLayout> = (1..=config.levels)
        .map(|level| {
            let frac = f64::from(level) / f64::from(config.levels);
            let r = radius * frac;
            let value = config.max_value * frac;
            RingLayout {
                level,
                r,
                value,
                label: config.format.format(value),
                label_x: RING_LABEL_DX,
                label_y: -r,
            }
        })
        .collect();

    let spoke_len = scale.apply(config.max_value * SPOKE_OVERSHOOT);
    let spokes: Vec<SpokeLayout> = slots
        .iter()
        .filter(|s| s.visible)
        .map(|s| SpokeLayout {
            slot: s.index,
            angle: s.angle,
            end: polar(spoke_len, s.angle),
        })
        .collect();

    let label_style = TextStyle::sized(config.font_size);
    let label_r = scale.apply(config.max_value * config.label_factor);
    let axis_labels: Vec<AxisLabelLayout> = axes
        .iter()
        .enumerate()
        .map(|(i, axis)| {
            let slot = &slots[2 * i];
            AxisLabelLayout {
                axis: axis.name.clone(),
                slot: slot.index,
                angle: slot.angle,
                position: polar(label_r, slot.angle),
                lines: wrap_words(&axis.name, config.wrap_width, &label_style, measurer),
            }
        })
        .collect();

    let mut wedges: Vec<WedgeLayout> = Vec::with_capacity(axes.len());
    for (i, axis) in axes.iter().enumerate() {
        let color = groups
            .get(&axis.group)
            .copied()
            .ok_or_else(|| Error::UnknownGroup {
                axis: axis.name.clone(),
                group: axis.group.clone(),
            })?;
        let start_angle = slot_angle(2 * i, angle_step, rotation);
        let end_angle = slot_angle(2 * i + 2, angle_step, rotation);
        wedges.push(WedgeLayout {
            axis: axis.name.clone(),
            group: axis.group.clone(),
            color,
            start_angle,
            end_angle,
            radius,
            path_d: sector_path(radius, start_angle, end_angle),
        });
    }

    let styles = config.encoding.resolve(datasets.len());
    let offset = config.angle_offset_radians();
    let mut series: Vec<SeriesLayout> = Vec::with_capacity(datasets.len());
    for (index, (dataset, style)) in datasets.iter().zip(styles.iter()).enumerate() {
        for unknown in dataset.unknown_axes(axes) {
            tracing::warn!(
                dataset = %dataset.name,
                axis = unknown,
                "ignoring point for an axis that is not part of the chart"
            );
        }
        let vertices: Vec<VertexLayout> = axes
            .iter()
            .enumerate()
            .map(|(i, axis)| {
                let value = dataset.value_for(&axis.name);
                let angle = slot_angle(2 * i + 1, angle_step, rotation) + offset;
                let r = scale.apply(value);
                VertexLayout {
                    axis: axis.name.clone(),
                    value,
                    explanation: dataset
                        .point(&axis.name)
                        .and_then(|p| p.explanation.clone()),
                    angle,
                    radius: r,
                    point: polar(r, angle),
                }
            })
            .collect();
        let points: Vec<Point> = vertices.iter().map(|v| v.point).collect();
        let path_d = if config.round_strokes {
            closed_cardinal_path(&points, 0.0)
        } else {
            closed_linear_path(&points)
        };
        series.push(SeriesLayout {
            name: dataset.name.clone(),
            index,
            style: *style,
            vertices,
            path_d,
            marker_radius: config.dot_radius,
            hit_radius: config.dot_radius * HIT_RADIUS_FACTOR,
        });
    }

    let mut group_names: Vec<&str> = Vec::new();
    for axis in axes {
        if !group_names.contains(&axis.group.as_str()) {
            group_names.push(axis.group.as_str());
        }
    }
    let group_legend = LegendLayout {
        origin: Point::new(
            config.margin.left,
            config.height + config.margin.top + GROUP_LEGEND_GAP,
        ),
        swatch: LEGEND_SWATCH,
        items: group_names
            .iter()
            .filter_map(|name| groups.get(*name).map(|color| (*name, *color)))
            .enumerate()
            .map(|(i, (name, color))| LegendItemLayout {
                label: name.to_string(),
                color,
                offset: Point::new(i as f64 * GROUP_LEGEND_STEP_X, 0.0),
                dasharray: None,
            })
            .collect(),
    };

    let dataset_legend = LegendLayout {
        origin: Point::new(
            config.width + config.margin.left + DATASET_LEGEND_GAP,
            config.margin.top,
        ),
        swatch: LEGEND_SWATCH,
        items: series
            .iter()
            .map(|s| LegendItemLayout {
                label: s.name.clone(),
                color: s.style.color,
                offset: Point::new(0.0, s.index as f64 * DATASET_LEGEND_STEP_Y),
                dasharray: s.style.stroke.dasharray().map(str::to_string),
            })
            .collect(),
    };

    let canvas_width = config.canvas_width();
    let canvas_height = config.canvas_height();
    tracing::debug!(
        axes = axes.len(),
        datasets = datasets.len(),
        radius,
        "computed radar layout"
    );

    Ok(RadarLayout {
        canvas_width,
        canvas_height,
        center: Point::new(canvas_width / 2.0, canvas_height / 2.0),
        radius,
        max_value: config.max_value,
        angle_step,
        rotation,
        slots,
        rings,
        spokes,
        axis_labels,
        wedges,
        series,
        group_legend,
        dataset_legend,
    })
}
