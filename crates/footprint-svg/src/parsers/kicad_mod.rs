use log::{debug, warn};

use crate::error::ConvertError;
use crate::geometry::{deg2rad, normalize_angle_rad, rad2deg};
use crate::layers::{layer_id, layer_mask_bits, LAYER_UNMAPPED};
use crate::parsers::sexpr::{self, Sexp};
use crate::types::*;

/// Parse a KiCad `.kicad_mod` footprint (or a `(module ...)` block) into a Module.
pub fn parse(data: &[u8]) -> Result<Module, ConvertError> {
    let root = sexpr::parse(data)?;

    if !matches!(root.head(), Some("footprint") | Some("module")) {
        return Err(ConvertError::ParseError(
            "not a KiCad footprint".to_string(),
        ));
    }

    let mut module = Module {
        name: root.atom(0).map(str::to_string),
        ..Module::default()
    };

    for child in root.args() {
        let tag = match child.head() {
            Some(t) => t,
            None => continue,
        };

        match tag {
            "fp_line" | "fp_circle" | "fp_arc" | "fp_poly" | "fp_rect" => {
                let drawing = match tag {
                    "fp_line" => parse_fp_line(child),
                    "fp_circle" => parse_fp_circle(child),
                    "fp_arc" => parse_fp_arc(child),
                    "fp_poly" => parse_fp_poly(child),
                    _ => parse_fp_rect(child),
                };
                match drawing {
                    Some(d) => module.draw.push(d),
                    None => warn!("skipping malformed {tag}"),
                }
            }
            "fp_text" | "property" => {
                if let Some(text) = parse_text(child, tag) {
                    module.text.push(text);
                }
            }
            "pad" => match parse_pad(child) {
                Some(pad) => module.pads.push(pad),
                None => warn!("skipping malformed pad {:?}", child.atom(0)),
            },
            other => debug!("ignoring footprint item {other}"),
        }
    }

    debug!(
        "footprint {:?}: {} drawing(s), {} pad(s), {} text(s)",
        module.name,
        module.draw.len(),
        module.pads.len(),
        module.text.len()
    );
    Ok(module)
}

// ─── Graphic items ───────────────────────────────────────────────────

fn get_layer(node: &Sexp) -> i64 {
    match node.value("layer") {
        Some(name) => layer_id(name).unwrap_or_else(|| {
            debug!("layer {name} has no board layer id");
            LAYER_UNMAPPED
        }),
        None => LAYER_UNMAPPED,
    }
}

fn parse_width(node: &Sexp) -> f64 {
    node.value_f64("width")
        .or_else(|| {
            // KiCad 7+ uses (stroke (width N))
            node.child("stroke").and_then(|s| s.value_f64("width"))
        })
        .unwrap_or(0.0)
}

fn parse_points(node: &Sexp) -> Vec<Point> {
    node.child("pts")
        .map(|pts| {
            pts.children_tagged("xy")
                .filter_map(|xy| Some(Point::new(xy.number(0)?, xy.number(1)?)))
                .collect()
        })
        .unwrap_or_default()
}

fn parse_fp_line(node: &Sexp) -> Option<Draw> {
    Some(Draw::Segment {
        start: node.point("start")?,
        end: node.point("end")?,
        width: parse_width(node),
        layer: get_layer(node),
    })
}

fn parse_fp_circle(node: &Sexp) -> Option<Draw> {
    let center = node.point("center").or_else(|| node.point("start"))?;
    Some(Draw::Circle {
        start: center,
        end: node.point("end")?,
        width: parse_width(node),
        layer: get_layer(node),
    })
}

fn parse_fp_arc(node: &Sexp) -> Option<Draw> {
    let width = parse_width(node);
    let layer = get_layer(node);

    if let Some(mid) = node.point("mid") {
        // KiCad 7+: three points on the arc
        let start = node.point("start")?;
        let end = node.point("end")?;
        return Some(match arc_through(start, mid, end) {
            Some((center, sweep_deg)) => {
                let (start, sweep_deg) = if sweep_deg < 0.0 {
                    (end, -sweep_deg)
                } else {
                    (start, sweep_deg)
                };
                Draw::Arc {
                    start,
                    center,
                    angle: sweep_deg * 10.0,
                    width,
                    layer,
                }
            }
            None => Draw::Segment {
                start,
                end,
                width,
                layer,
            },
        });
    }

    // Legacy: start is the center, end the arc start, angle in degrees
    let center = node.point("start")?;
    let start = node.point("end")?;
    let sweep_deg = node.value_f64("angle").unwrap_or(0.0);
    let (start, sweep_deg) = if sweep_deg < 0.0 {
        (rotate_about(start, center, sweep_deg), -sweep_deg)
    } else {
        (start, sweep_deg)
    };
    Some(Draw::Arc {
        start,
        center,
        angle: sweep_deg * 10.0,
        width,
        layer,
    })
}

/// `p` rotated counter-clockwise about `center` by `angle_deg`.
fn rotate_about(p: Point, center: Point, angle_deg: f64) -> Point {
    let (sin, cos) = deg2rad(angle_deg).sin_cos();
    let (dx, dy) = (p.x - center.x, p.y - center.y);
    Point::new(
        center.x + dx * cos - dy * sin,
        center.y + dx * sin + dy * cos,
    )
}

fn parse_fp_poly(node: &Sexp) -> Option<Draw> {
    let points = parse_points(node);
    if points.is_empty() {
        return None;
    }
    Some(Draw::Polygon {
        points,
        width: parse_width(node),
        layer: get_layer(node),
    })
}

fn parse_fp_rect(node: &Sexp) -> Option<Draw> {
    let a = node.point("start")?;
    let b = node.point("end")?;
    Some(Draw::Polygon {
        points: vec![a, Point::new(b.x, a.y), b, Point::new(a.x, b.y), a],
        width: parse_width(node),
        layer: get_layer(node),
    })
}

/// Center and signed sweep (degrees, negative when clockwise) of the circular arc from `start` through
/// `mid` to `end`. None when the points are collinear.
fn arc_through(start: Point, mid: Point, end: Point) -> Option<(Point, f64)> {
    let (ax, ay) = (start.x, start.y);
    let (bx, by) = (mid.x, mid.y);
    let (cx, cy) = (end.x, end.y);

    let d = 2.0 * (ax * (by - cy) + bx * (cy - ay) + cx * (ay - by));
    if d.abs() < 1e-10 {
        return None;
    }
    let a2 = ax * ax + ay * ay;
    let b2 = bx * bx + by * by;
    let c2 = cx * cx + cy * cy;
    let center = Point::new(
        (a2 * (by - cy) + b2 * (cy - ay) + c2 * (ay - by)) / d,
        (a2 * (cx - bx) + b2 * (ax - cx) + c2 * (bx - ax)) / d,
    );

    let angle_of = |p: Point| (p.y - center.y).atan2(p.x - center.x);
    let start_angle = angle_of(start);
    let ccw = normalize_angle_rad(angle_of(end) - start_angle);
    let to_mid = normalize_angle_rad(angle_of(mid) - start_angle);
    let sweep = if to_mid <= ccw {
        ccw
    } else {
        ccw - 2.0 * std::f64::consts::PI
    };
    Some((center, rad2deg(sweep)))
}

// ─── Text ────────────────────────────────────────────────────────────

fn parse_text(node: &Sexp, tag: &str) -> Option<TextLabel> {
    // (fp_text reference "R1" ...) vs (property "Reference" "R1" ...)
    let value = match tag {
        "fp_text" => node.atom(1)?,
        _ => {
            node.child("layer")?;
            node.atom(1)?
        }
    };
    let at = node.child("at")?;
    let size = node
        .child("effects")
        .and_then(|e| e.child("font"))
        .and_then(|f| f.child("size"))
        .map(|s| TextSize {
            height: s.number(0).unwrap_or(0.0),
            width: s.number(1).unwrap_or(0.0),
        })
        .unwrap_or_default();
    Some(TextLabel {
        value: value.to_string(),
        pos: Point::new(at.number(0)?, at.number(1)?),
        size,
        orientation: at.number(2).unwrap_or(0.0) * 10.0,
        layer: get_layer(node),
    })
}

// ─── Pads ────────────────────────────────────────────────────────────

fn pad_shape(name: &str) -> PadShape {
    match name {
        "circle" => PadShape::Circle,
        // Corner rounding is not drawn.
        "rect" | "roundrect" => PadShape::Rect,
        "trapezoid" => PadShape::Trapezoid,
        "oval" => PadShape::Oblong,
        other => PadShape::Unsupported(other.to_string()),
    }
}

fn parse_drill(node: &Sexp) -> Option<Drill> {
    let oval = node.atoms().any(|a| a == "oval");
    let dims: Vec<f64> = node.atoms().filter_map(|a| a.parse().ok()).collect();
    let dx = *dims.first()?;
    if dx <= 0.0 {
        return None;
    }
    let dy = dims.get(1).copied().unwrap_or(dx);
    Some(Drill {
        shape: if oval {
            DrillShape::Oblong
        } else {
            DrillShape::Circle
        },
        pos: Point::new(dx, dy),
        dx,
        dy,
    })
}

fn parse_pad(node: &Sexp) -> Option<Pad> {
    let at = node.child("at")?;
    let size = node.point("size")?;

    let parts = node.child("layers").map(|layers| {
        let layer_mask = layers.atoms().fold(0u32, |mask, name| mask | layer_mask_bits(name));
        vec![PadPart::Attribute { layer_mask }]
    });

    Some(Pad {
        name: node.atom(0).map(str::to_string),
        pos: Point::new(at.number(0)?, at.number(1)?),
        size,
        shape: pad_shape(node.atom(2)?),
        orientation: at.number(2).unwrap_or(0.0) * 10.0,
        drill: node.child("drill").and_then(parse_drill),
        parts,
    })
}
