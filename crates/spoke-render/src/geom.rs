//! Geometry primitives and SVG path builders.
//!
//! Angles are screen angles in radians: 0 points along +x and positive angles turn clockwise
//! (y grows downwards), so `-π/2` is twelve o'clock.

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

pub fn polar(radius: f64, angle: f64) -> Point {
    Point {
        x: radius * angle.cos(),
        y: radius * angle.sin(),
    }
}

/// Linear map from `domain` onto `range`, not clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn apply(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span == 0.0 {
            return r0;
        }
        r0 + (v - d0) / span * (r1 - r0)
    }
}

/// Formats path/attribute numbers with at most three decimals, no `-0`.
pub fn fmt_number(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let mut r = (v * 1000.0).round() / 1000.0;
    if r.abs() < 0.0005 {
        r = 0.0;
    }
    let mut s = format!("{r:.3}");
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" { "0".to_string() } else { s }
}

/// Closed cardinal spline through `points` (d3 `curveCardinalClosed`).
pub fn closed_cardinal_path(points: &[Point], tension: f64) -> String {
    if points.is_empty() {
        return String::new();
    }
    if points.len() < 3 {
        return closed_linear_path(points);
    }

    let k = ((1.0 - tension).clamp(0.0, 1.0)) / 6.0;
    let mut out = String::new();
    let p0 = points[0];
    let _ = write!(out, "M{},{}", fmt_number(p0.x), fmt_number(p0.y));

    let n = points.len();
    for i in 0..n {
        let p_prev = points[(i + n - 1) % n];
        let p = points[i];
        let p_next = points[(i + 1) % n];
        let p_next2 = points[(i + 2) % n];

        let cp1 = Point::new(p.x + k * (p_next.x - p_prev.x), p.y + k * (p_next.y - p_prev.y));
        let cp2 = Point::new(
            p_next.x - k * (p_next2.x - p.x),
            p_next.y - k * (p_next2.y - p.y),
        );

        let _ = write!(
            out,
            "C{},{},{},{},{},{}",
            fmt_number(cp1.x),
            fmt_number(cp1.y),
            fmt_number(cp2.x),
            fmt_number(cp2.y),
            fmt_number(p_next.x),
            fmt_number(p_next.y)
        );
    }
    out.push('Z');
    out
}

/// Closed polyline through `points` (d3 `curveLinearClosed`).
pub fn closed_linear_path(points: &[Point]) -> String {
    let mut out = String::new();
    for (i, p) in points.iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        let _ = write!(out, "{cmd}{},{}", fmt_number(p.x), fmt_number(p.y));
    }
    if !out.is_empty() {
        out.push('Z');
    }
    out
}

/// Pie sector from the center, sweeping clockwise from `start` to `end`.
///
/// Spans of a full turn or more produce a full disc; empty spans produce an empty path.
pub fn sector_path(radius: f64, start: f64, end: f64) -> String {
    let span = end - start;
    if !(radius > 0.0) || !(span > 0.0) {
        return "M0,0Z".to_string();
    }
    let r = fmt_number(radius);
    if span >= TAU - 1e-9 {
        let a = polar(radius, start);
        let b = polar(radius, start + std::f64::consts::PI);
        return format!(
            "M{ax},{ay}A{r},{r},0,1,1,{bx},{by}A{r},{r},0,1,1,{ax},{ay}Z",
            ax = fmt_number(a.x),
            ay = fmt_number(a.y),
            bx = fmt_number(b.x),
            by = fmt_number(b.y),
        );
    }
    let a = polar(radius, start);
    let b = polar(radius, end);
    let large_arc = if span > std::f64::consts::PI { 1 } else { 0 };
    format!(
        "M0,0L{},{}A{r},{r},0,{large_arc},1,{},{}Z",
        fmt_number(a.x),
        fmt_number(a.y),
        fmt_number(b.x),
        fmt_number(b.y),
    )
}

/// Screen angle of a sweep that started at twelve o'clock (plus `rotation`) and has turned
/// `degrees` clockwise.
pub fn sweep_angle(degrees: f64, rotation: f64) -> f64 {
    degrees.to_radians() - FRAC_PI_2 + rotation
}
