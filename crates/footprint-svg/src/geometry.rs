//! Angle helpers and arc parameterization.
//!
//! Board primitives describe arcs by center, radius and angles; SVG paths want
//! the endpoints plus the large-arc and sweep flags. The two conversions here
//! bridge those forms.

use std::f64::consts::PI;

use log::warn;

use crate::types::Point;

const TAU: f64 = 2.0 * PI;

/// Radii closer than this are treated as a circle by the three-point form.
const RADIUS_TOLERANCE: f64 = 0.001;

/// Round a float to N decimal places.
pub fn round_f64(v: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (v * factor).round() / factor
}

/// Format a number the way it appears in SVG output: 6 decimals at most,
/// no trailing `.0`, and never `-0`.
pub fn fmt_num(v: f64) -> String {
    let r = round_f64(v, 6);
    if r == 0.0 {
        "0".to_string()
    } else {
        format!("{r}")
    }
}

pub fn deg2rad(deg: f64) -> f64 {
    deg * PI / 180.0
}

pub fn rad2deg(rad: f64) -> f64 {
    rad * 180.0 / PI
}

pub fn distance(p1: Point, p2: Point) -> f64 {
    let dx = p1.x - p2.x;
    let dy = p1.y - p2.y;
    (dx * dx + dy * dy).sqrt()
}

/// Reduce an angle into `[0, 2π)`.
pub fn normalize_angle_rad(rad: f64) -> f64 {
    if !rad.is_finite() {
        return rad;
    }
    let mut r = rad % TAU;
    if r < 0.0 {
        r += TAU;
    }
    // -tiny % TAU + TAU rounds up to TAU itself
    if r >= TAU {
        r -= TAU;
    }
    r
}

/// An arc in SVG endpoint parameterization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvgArc {
    pub x0: f64,
    pub y0: f64,
    pub rx: f64,
    pub ry: f64,
    /// x-axis rotation in degrees
    pub phi: f64,
    pub large_arc: u8,
    pub sweep: u8,
    pub x1: f64,
    pub y1: f64,
}

impl SvgArc {
    /// Path data `M x0 y0 A rx ry phi large-arc sweep x1 y1`.
    pub fn path_data(&self) -> String {
        format!(
            "M {} {} A {} {} {} {} {} {} {}",
            fmt_num(self.x0),
            fmt_num(self.y0),
            fmt_num(self.rx),
            fmt_num(self.ry),
            fmt_num(self.phi),
            self.large_arc,
            self.sweep,
            fmt_num(self.x1),
            fmt_num(self.y1)
        )
    }
}

/// Convert an elliptical arc given by center, radii, start angle `theta1`,
/// extent `delta` and x-axis rotation `phi` (all degrees) into SVG form.
///
/// `delta` is used as given; callers normalize it first if they need to.
pub fn convert_center_arc_to_svg(
    center: Point,
    rx: f64,
    ry: f64,
    theta1: f64,
    delta: f64,
    phi: f64,
) -> SvgArc {
    let theta2 = deg2rad(theta1 + delta);
    let theta1 = deg2rad(theta1);
    let phi_r = deg2rad(phi);

    let point_at = |theta: f64| {
        let x = center.x + phi_r.cos() * rx * theta.cos() - phi_r.sin() * ry * theta.sin();
        let y = center.y + phi_r.sin() * rx * theta.cos() + phi_r.cos() * ry * theta.sin();
        (x, y)
    };
    let (x0, y0) = point_at(theta1);
    let (x1, y1) = point_at(theta2);

    SvgArc {
        x0,
        y0,
        rx,
        ry,
        phi,
        large_arc: u8::from(delta.abs() > 180.0),
        sweep: u8::from(delta > 0.0),
        x1,
        y1,
    }
}

/// Convert an arc given by its center and two endpoints into SVG form,
/// sweeping counter-clockwise (in board coordinates) from `start` to `end`.
///
/// Only circular arcs are supported. When the endpoints are at different
/// distances from the center a warning is logged and both radii are passed
/// through, which distorts the result.
pub fn convert_center_start_end_arc_to_svg(center: Point, start: Point, end: Point) -> SvgArc {
    let start_angle = normalize_angle_rad((start.y - center.y).atan2(start.x - center.x));
    let end_angle = normalize_angle_rad((end.y - center.y).atan2(end.x - center.x));
    let delta = normalize_angle_rad(end_angle - start_angle);

    let rx = distance(center, start);
    let ry = distance(center, end);
    if (rx - ry).abs() > RADIUS_TOLERANCE {
        warn!("convert_center_start_end_arc_to_svg: ellipses not supported (rx={rx}, ry={ry})");
    }

    SvgArc {
        x0: start.x,
        y0: start.y,
        rx,
        ry,
        phi: 0.0,
        large_arc: u8::from(delta.abs() > PI),
        sweep: u8::from(delta > 0.0),
        x1: end.x,
        y1: end.y,
    }
}
