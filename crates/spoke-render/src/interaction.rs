//! Pointer interaction: hit testing, hover emphasis and the tooltip overlay.

use crate::geom::{Point, fmt_number};
use crate::scene::{Scene, escape_xml};
use serde::Serialize;

/// Tooltip offset from the pointer, in canvas pixels.
pub const TOOLTIP_OFFSET: Point = Point { x: 10.0, y: -10.0 };

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HitTarget {
    pub series: usize,
    pub vertex: usize,
}

/// Finds the topmost hit target under `canvas_point`. Later series paint over earlier ones, so
/// they win ties. Markers still hidden by the data reveal clip are skipped.
pub fn hit_test(scene: &Scene, canvas_point: Point) -> Option<HitTarget> {
    let p = Point::new(canvas_point.x - scene.center.x, canvas_point.y - scene.center.y);
    if !scene.data_visible_at(p) {
        return None;
    }
    scene.series.iter().rev().find_map(|s| {
        s.markers
            .iter()
            .enumerate()
            .rev()
            .find(|(_, m)| m.hit_r.is_some_and(|r| m.center.distance(p) <= r))
            .map(|(vertex, _)| HitTarget {
                series: s.index,
                vertex,
            })
    })
}

/// Raises the hovered series' fill to `highlight` and dims the rest to `dim`; `None` restores
/// every fill to its base opacity.
pub fn apply_emphasis(scene: &mut Scene, hovered: Option<usize>, highlight: f64, dim: f64) {
    for s in &mut scene.series {
        s.fill_opacity = match hovered {
            None => s.base_fill_opacity,
            Some(h) if h == s.index => highlight,
            Some(_) => dim,
        };
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TooltipContent {
    pub axis: String,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

impl TooltipContent {
    pub fn for_target(scene: &Scene, target: HitTarget) -> Option<Self> {
        let marker = scene
            .series
            .iter()
            .find(|s| s.index == target.series)?
            .markers
            .get(target.vertex)?;
        Some(Self {
            axis: marker.axis.clone(),
            score: marker.value,
            explanation: marker.explanation.clone(),
        })
    }

    pub fn to_html(&self) -> String {
        let mut out = format!(
            "<strong>{}</strong><br/>Score: {}",
            escape_xml(&self.axis),
            format_score(self.score)
        );
        if let Some(explanation) = &self.explanation {
            out.push_str("<br/><em>");
            out.push_str(&escape_xml(explanation));
            out.push_str("</em>");
        }
        out
    }
}

/// Formats a raw score the way a JavaScript host prints numbers (`4`, not `4.0`).
pub fn format_score(v: f64) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    if v == 0.0 {
        return "0".to_string();
    }
    ryu_js::Buffer::new().format(v).to_string()
}

/// The single tooltip of a chart. Hidden tooltips keep their last content; visibility toggles
/// through opacity only.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Tooltip {
    pub opacity: f64,
    pub position: Point,
    pub content: Option<TooltipContent>,
}

impl Tooltip {
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }

    pub fn show(&mut self, content: TooltipContent, pointer: Point) {
        self.position = Point::new(pointer.x + TOOLTIP_OFFSET.x, pointer.y + TOOLTIP_OFFSET.y);
        self.content = Some(content);
        self.opacity = 1.0;
    }

    pub fn hide(&mut self) {
        self.opacity = 0.0;
    }

    pub fn to_markup(&self) -> String {
        format!(
            r#"<div class="tooltip" style="position:absolute;left:{x}px;top:{y}px;opacity:{o};pointer-events:none;background-color:white;color:black;padding:5px;border:1px solid #ccc;border-radius:5px">{body}</div>"#,
            x = fmt_number(self.position.x),
            y = fmt_number(self.position.y),
            o = fmt_number(self.opacity),
            body = self
                .content
                .as_ref()
                .map(TooltipContent::to_html)
                .unwrap_or_default()
        )
    }
}
