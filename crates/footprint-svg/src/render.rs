//! Per-primitive conversion into SVG elements.
//!
//! Every renderer records the coordinates its primitive covers in the
//! [`Extents`] before deciding visibility, so the viewport fits the whole
//! footprint whichever side is drawn.

use log::debug;

use crate::element::Element;
use crate::error::ConvertError;
use crate::extents::Extents;
use crate::geometry::{self, fmt_num};
use crate::layers;
use crate::types::{Draw, Drill, DrillShape, Pad, PadShape, Point, Side};

/// Fixed colours of the rendered board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub pcb: &'static str,
    pub silkscreen: &'static str,
    pub drill: &'static str,
    pub pad: &'static str,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            pcb: "rgb(30,80,30)",
            silkscreen: "rgb(240,240,240)",
            drill: "rgb(0,0,0)",
            pad: "rgb(150,150,150)",
        }
    }
}

/// Per-conversion settings shared by all renderers.
#[derive(Debug, Clone, Copy)]
pub struct DrawOptions {
    pub side: Side,
    pub palette: Palette,
}

impl DrawOptions {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            palette: Palette::default(),
        }
    }

    fn stroke_style(&self, width: f64) -> String {
        format!(
            "stroke: {}; stroke-width: {};",
            self.palette.silkscreen,
            fmt_num(width)
        )
    }
}

fn rotate_about(angle: f64, center: Point) -> String {
    format!(
        "rotate({}, {}, {})",
        fmt_num(angle),
        fmt_num(center.x),
        fmt_num(center.y)
    )
}

// ─── Graphic primitives ──────────────────────────────────────────────

pub fn draw_to_svg(
    draw: &Draw,
    opts: &DrawOptions,
    extents: &mut Extents,
) -> Result<Vec<Element>, ConvertError> {
    let elements = match draw {
        Draw::Segment {
            start,
            end,
            width,
            layer,
        } => segment_to_svg(*start, *end, *width, *layer, opts, extents),
        Draw::Circle {
            start,
            end,
            width,
            layer,
        } => circle_to_svg(*start, *end, *width, *layer, opts, extents),
        Draw::Arc {
            start,
            center,
            angle,
            width,
            layer,
        } => arc_to_svg(*start, *center, *angle, *width, *layer, opts, extents),
        Draw::Polygon {
            points,
            width,
            layer,
        } => polygon_to_svg(points, *width, *layer, opts, extents),
        Draw::Unsupported => return Err(ConvertError::UnsupportedDraw),
    };
    debug!(
        "{} on layer {:?}: {} element(s)",
        draw.kind(),
        draw.layer(),
        elements.len()
    );
    Ok(elements)
}

pub fn segment_to_svg(
    start: Point,
    end: Point,
    width: f64,
    layer: i64,
    opts: &DrawOptions,
    extents: &mut Extents,
) -> Vec<Element> {
    extents.update(start.x, start.y);
    extents.update(end.x, end.y);

    if !layers::is_visible(layer, opts.side) {
        return Vec::new();
    }
    vec![Element::new("line")
        .attr("x1", start.x)
        .attr("y1", start.y)
        .attr("x2", end.x)
        .attr("y2", end.y)
        .attr("stroke-linecap", "round")
        .attr("style", opts.stroke_style(width))]
}

/// `center` is the circle center, `rim` any point on the circumference.
pub fn circle_to_svg(
    center: Point,
    rim: Point,
    width: f64,
    layer: i64,
    opts: &DrawOptions,
    extents: &mut Extents,
) -> Vec<Element> {
    let radius = geometry::distance(center, rim);
    extents.update(center.x - radius, center.y);
    extents.update(center.x + radius, center.y);
    extents.update(center.x, center.y - radius);
    extents.update(center.x, center.y + radius);

    if !layers::is_visible(layer, opts.side) {
        return Vec::new();
    }
    vec![Element::new("circle")
        .attr("cx", center.x)
        .attr("cy", center.y)
        .attr("r", radius)
        .attr("fill", "none")
        .attr("style", opts.stroke_style(width))]
}

/// `angle` is the sweep in tenths of a degree. Only `start` and `center` feed
/// the extents; the arc's true bounding box is not computed.
pub fn arc_to_svg(
    start: Point,
    center: Point,
    angle: f64,
    width: f64,
    layer: i64,
    opts: &DrawOptions,
    extents: &mut Extents,
) -> Vec<Element> {
    extents.update(start.x, start.y);
    extents.update(center.x, center.y);

    if !layers::is_visible(layer, opts.side) {
        return Vec::new();
    }

    let radius = geometry::distance(center, start);
    let theta1 = geometry::rad2deg((start.y - center.y).atan2(start.x - center.x));
    let delta = (angle / 10.0).rem_euclid(360.0);
    let arc = geometry::convert_center_arc_to_svg(center, radius, radius, theta1, delta, 0.0);

    vec![Element::new("path")
        .attr("d", arc.path_data())
        .attr("fill", "none")
        .attr("style", opts.stroke_style(width))]
}

/// Open polyline through the vertices in order.
pub fn polygon_to_svg(
    points: &[Point],
    width: f64,
    layer: i64,
    opts: &DrawOptions,
    extents: &mut Extents,
) -> Vec<Element> {
    for pt in points {
        extents.update(pt.x, pt.y);
    }

    if !layers::is_visible(layer, opts.side) {
        return Vec::new();
    }
    let coords: Vec<String> = points
        .iter()
        .map(|pt| format!("{},{}", fmt_num(pt.x), fmt_num(pt.y)))
        .collect();
    vec![Element::new("polyline")
        .attr("points", coords.join(" "))
        .attr("fill", "none")
        .attr("style", opts.stroke_style(width))]
}

// ─── Pads and drills ─────────────────────────────────────────────────

/// A rounded slot: a rectangle capped by two half-circles, long axis vertical
/// before rotation about `center`.
struct Capsule {
    center: Point,
    width: f64,
    height: f64,
    rotation: f64,
}

impl Capsule {
    fn new(center: Point, a: f64, b: f64, rotation: f64) -> Self {
        Self {
            center,
            width: a.min(b),
            height: a.max(b),
            rotation,
        }
    }

    fn top(&self) -> f64 {
        self.center.y - self.height / 2.0 + self.width / 2.0
    }

    /// Returns the two end circles and the connecting rectangle.
    fn pieces(&self, paint: impl Fn(Element) -> Element) -> [Element; 3] {
        let top = self.top();
        let transform = rotate_about(self.rotation, self.center);
        let cap = |cy: f64| {
            paint(
                Element::new("circle")
                    .attr("cx", self.center.x)
                    .attr("cy", cy)
                    .attr("r", self.width / 2.0),
            )
            .attr("transform", transform.clone())
        };
        let body = paint(
            Element::new("rect")
                .attr("x", self.center.x - self.width / 2.0)
                .attr("y", top)
                .attr("width", self.width)
                .attr("height", self.height - self.width),
        )
        .attr("transform", transform.clone());
        [cap(top), cap(top + self.height - self.width), body]
    }
}

/// Rotation in degrees; a drill that is wider than tall turns the slot sideways.
fn slot_rotation(pad: &Pad) -> f64 {
    let rotation = pad.orientation / 10.0;
    match &pad.drill {
        Some(drill) if drill.dx > drill.dy => rotation + 90.0,
        _ => rotation,
    }
}

/// Pad copper. Pad outlines do not contribute to the extents; only drills do.
pub fn pad_to_svg(pad: &Pad, opts: &DrawOptions) -> Result<Vec<Element>, ConvertError> {
    if let PadShape::Unsupported(code) = &pad.shape {
        return Err(ConvertError::UnsupportedPadShape(code.clone()));
    }

    if !layers::is_pad_visible(pad, opts.side) {
        debug!(
            "pad {} hidden on {} (layer mask 0x{:x})",
            pad.name.as_deref().unwrap_or("?"),
            opts.side,
            layers::pad_layer_mask(pad)
        );
        return Ok(Vec::new());
    }

    let paint = |el: Element, style: &'static str| {
        el.attr("fill", opts.palette.pad).attr("style", style)
    };
    let fill = |el: Element| paint(el, "stroke-width: 1");
    let body_rect = |style: &'static str| {
        paint(
            Element::new("rect")
                .attr("x", pad.pos.x - pad.size.x / 2.0)
                .attr("y", pad.pos.y - pad.size.y / 2.0)
                .attr("width", pad.size.x)
                .attr("height", pad.size.y),
            style,
        )
        .attr("transform", rotate_about(pad.orientation / 10.0, pad.pos))
    };
    let elements = match &pad.shape {
        PadShape::Circle => vec![fill(
            Element::new("circle")
                .attr("cx", pad.pos.x)
                .attr("cy", pad.pos.y)
                .attr("r", pad.size.x / 2.0),
        )],
        PadShape::Rect => vec![body_rect("stroke-width: 999")],
        // Trapezoids are drawn as their bounding rectangle.
        PadShape::Trapezoid => vec![body_rect("stroke-width: 1")],
        PadShape::Oblong => {
            Capsule::new(pad.pos, pad.size.x, pad.size.y, slot_rotation(pad))
                .pieces(fill)
                .into()
        }
        PadShape::Unsupported(code) => {
            return Err(ConvertError::UnsupportedPadShape(code.clone()))
        }
    };
    Ok(elements)
}

/// Drill hole, drawn on both sides. The drill diameter is read from `drill.pos.x`.
pub fn pad_drill_to_svg(
    pad: &Pad,
    drill: &Drill,
    opts: &DrawOptions,
    extents: &mut Extents,
) -> Vec<Element> {
    let radius = drill.pos.x / 2.0;
    extents.update(pad.pos.x - radius, pad.pos.y - radius);
    extents.update(pad.pos.x + radius, pad.pos.y + radius);

    let style = format!("fill: {}; stroke-width: 1", opts.palette.drill);
    match drill.shape {
        DrillShape::Oblong => {
            let [first, second, body] =
                Capsule::new(pad.pos, drill.dx, drill.dy, slot_rotation(pad))
                    .pieces(|el| el.attr("style", style.clone()));
            vec![body, first, second]
        }
        DrillShape::Circle => vec![Element::new("circle")
            .attr("cx", pad.pos.x)
            .attr("cy", pad.pos.y)
            .attr("r", radius)
            .attr("style", style)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{LAYER_SOLDERMASK_BACK, LAYER_SOLDERMASK_FRONT};
    use crate::types::PadPart;
    use approx::assert_abs_diff_eq;

    fn opts(side: Side) -> DrawOptions {
        DrawOptions::new(side)
    }

    fn pad(shape: PadShape, size: Point) -> Pad {
        Pad {
            name: Some("1".to_string()),
            pos: Point::new(100.0, 200.0),
            size,
            shape,
            orientation: 0.0,
            drill: None,
            parts: None,
        }
    }

    fn oblong_drill(dx: f64, dy: f64) -> Drill {
        Drill {
            shape: DrillShape::Oblong,
            pos: Point::new(dx, 0.0),
            dx,
            dy,
        }
    }

    #[test]
    fn test_segment_line() {
        let mut ext = Extents::empty();
        let out = segment_to_svg(
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            10.0,
            21,
            &opts(Side::Front),
            &mut ext,
        );
        assert_eq!(out.len(), 1);
        let line = &out[0];
        assert_eq!(line.name, "line");
        assert_eq!(line.get_f64("x2"), Some(100.0));
        assert_eq!(line.get_str("stroke-linecap"), Some("round"));
        assert_eq!(
            line.get_str("style"),
            Some("stroke: rgb(240,240,240); stroke-width: 10;")
        );
    }

    #[test]
    fn test_hidden_primitives_still_update_extents() {
        let back = opts(Side::Back);
        let mut ext = Extents::empty();

        let out = segment_to_svg(
            Point::new(-5.0, 1.0),
            Point::new(5.0, 2.0),
            1.0,
            21,
            &back,
            &mut ext,
        );
        assert!(out.is_empty());
        let out = polygon_to_svg(
            &[Point::new(0.0, 0.0), Point::new(0.0, 30.0)],
            1.0,
            21,
            &back,
            &mut ext,
        );
        assert!(out.is_empty());
        assert_eq!((ext.minx, ext.miny, ext.maxx, ext.maxy), (-5.0, 0.0, 5.0, 30.0));
    }

    #[test]
    fn test_circle_extents_cover_radius() {
        let mut ext = Extents::empty();
        let out = circle_to_svg(
            Point::new(10.0, 10.0),
            Point::new(13.0, 14.0),
            0.5,
            20,
            &opts(Side::Back),
            &mut ext,
        );
        assert_eq!((ext.minx, ext.miny, ext.maxx, ext.maxy), (5.0, 5.0, 15.0, 15.0));
        assert_eq!(out[0].name, "circle");
        assert_eq!(out[0].get_f64("r"), Some(5.0));
        assert_eq!(out[0].get_str("fill"), Some("none"));
    }

    #[test]
    fn test_arc_path() {
        let mut ext = Extents::empty();
        let out = arc_to_svg(
            Point::new(500.0, 0.0),
            Point::new(0.0, 0.0),
            900.0,
            50.0,
            21,
            &opts(Side::Front),
            &mut ext,
        );
        assert_eq!(out[0].name, "path");
        assert_eq!(out[0].get_str("d"), Some("M 500 0 A 500 500 0 0 1 0 500"));
        assert_eq!((ext.minx, ext.maxx, ext.maxy), (0.0, 500.0, 0.0));
    }

    #[test]
    fn test_arc_delta_normalized() {
        let front = opts(Side::Front);
        let mut ext = Extents::empty();
        let full_turn_plus = arc_to_svg(
            Point::new(1.0, 0.0),
            Point::default(),
            4500.0,
            1.0,
            21,
            &front,
            &mut ext,
        );
        assert_eq!(
            full_turn_plus[0].get_str("d"),
            Some("M 1 0 A 1 1 0 0 1 0 1")
        );
        // -90 degrees becomes +270
        let negative = arc_to_svg(
            Point::new(1.0, 0.0),
            Point::default(),
            -900.0,
            1.0,
            21,
            &front,
            &mut ext,
        );
        assert_eq!(negative[0].get_str("d"), Some("M 1 0 A 1 1 0 1 1 0 -1"));
    }

    #[test]
    fn test_polyline_not_closed() {
        let mut ext = Extents::empty();
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 5.5),
        ];
        let out = polygon_to_svg(&pts, 2.0, 24, &opts(Side::Front), &mut ext);
        assert_eq!(out[0].name, "polyline");
        assert_eq!(out[0].get_str("points"), Some("0,0 10,0 10,5.5"));
    }

    #[test]
    fn test_unsupported_draw() {
        let mut ext = Extents::empty();
        let err = draw_to_svg(&Draw::Unsupported, &opts(Side::Front), &mut ext);
        assert!(matches!(err, Err(ConvertError::UnsupportedDraw)));
    }

    #[test]
    fn test_circle_pad() {
        let p = pad(PadShape::Circle, Point::new(60.0, 60.0));
        let out = pad_to_svg(&p, &opts(Side::Back)).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].get_f64("r"), Some(30.0));
        assert_eq!(out[0].get_str("fill"), Some("rgb(150,150,150)"));
        assert!(out[0].get("transform").is_none());
    }

    #[test]
    fn test_rect_pad_rotation() {
        let mut p = pad(PadShape::Rect, Point::new(40.0, 20.0));
        p.orientation = 450.0;
        let out = pad_to_svg(&p, &opts(Side::Front)).unwrap();
        assert_eq!(out[0].name, "rect");
        assert_eq!(out[0].get_f64("x"), Some(80.0));
        assert_eq!(out[0].get_f64("y"), Some(190.0));
        assert_eq!(out[0].get_str("transform"), Some("rotate(45, 100, 200)"));
        assert_eq!(out[0].get_str("style"), Some("stroke-width: 999"));

        let trap = pad_to_svg(
            &Pad {
                shape: PadShape::Trapezoid,
                ..p.clone()
            },
            &opts(Side::Front),
        )
        .unwrap();
        assert_eq!(trap[0].get_str("style"), Some("stroke-width: 1"));
        assert_eq!(trap[0].get_str("x"), None);
        assert_eq!(trap[0].get_f64("x"), Some(80.0));
        assert_eq!(trap[0].get_str("transform"), out[0].get_str("transform"));
    }

    #[test]
    fn test_oblong_pad_decomposition() {
        let mut p = pad(PadShape::Oblong, Point::new(30.0, 60.0));
        p.drill = Some(oblong_drill(40.0, 20.0));
        let out = pad_to_svg(&p, &opts(Side::Front)).unwrap();

        let circles: Vec<&Element> = out.iter().filter(|e| e.name == "circle").collect();
        let rects: Vec<&Element> = out.iter().filter(|e| e.name == "rect").collect();
        assert_eq!(circles.len(), 2);
        assert_eq!(rects.len(), 1);
        for c in &circles {
            assert_eq!(c.get_f64("r"), Some(15.0));
        }
        // top = 200 - 30 + 15
        assert_eq!(circles[0].get_f64("cy"), Some(185.0));
        assert_eq!(circles[1].get_f64("cy"), Some(215.0));
        assert_eq!(rects[0].get_f64("y"), Some(185.0));
        assert_eq!(rects[0].get_f64("height"), Some(30.0));
        for el in &out {
            assert_eq!(el.get_str("transform"), Some("rotate(90, 100, 200)"));
        }
    }

    #[test]
    fn test_oblong_pad_without_wide_drill_keeps_orientation() {
        let mut p = pad(PadShape::Oblong, Point::new(30.0, 60.0));
        p.orientation = 900.0;
        let out = pad_to_svg(&p, &opts(Side::Front)).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].get_str("transform"), Some("rotate(90, 100, 200)"));
    }

    #[test]
    fn test_pad_mask_filtering() {
        let mut p = pad(PadShape::Circle, Point::new(10.0, 10.0));
        p.parts = Some(vec![PadPart::Attribute {
            layer_mask: LAYER_SOLDERMASK_BACK,
        }]);
        assert!(pad_to_svg(&p, &opts(Side::Front)).unwrap().is_empty());
        assert_eq!(pad_to_svg(&p, &opts(Side::Back)).unwrap().len(), 1);

        p.parts = Some(vec![PadPart::Attribute {
            layer_mask: LAYER_SOLDERMASK_FRONT,
        }]);
        assert_eq!(pad_to_svg(&p, &opts(Side::Front)).unwrap().len(), 1);
    }

    #[test]
    fn test_unsupported_pad_shape() {
        let p = pad(PadShape::Unsupported("Z".to_string()), Point::new(1.0, 1.0));
        match pad_to_svg(&p, &opts(Side::Front)) {
            Err(ConvertError::UnsupportedPadShape(code)) => assert_eq!(code, "Z"),
            other => panic!("expected UnsupportedPadShape, got: {other:?}"),
        }
    }

    #[test]
    fn test_round_drill() {
        let mut ext = Extents::empty();
        let p = pad(PadShape::Circle, Point::new(60.0, 60.0));
        let drill = Drill {
            shape: DrillShape::Circle,
            pos: Point::new(30.0, 0.0),
            dx: 0.0,
            dy: 0.0,
        };
        let out = pad_drill_to_svg(&p, &drill, &opts(Side::Back), &mut ext);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].get_f64("r"), Some(15.0));
        assert_eq!(
            out[0].get_str("style"),
            Some("fill: rgb(0,0,0); stroke-width: 1")
        );
        assert_eq!((ext.minx, ext.miny, ext.maxx, ext.maxy), (85.0, 185.0, 115.0, 215.0));
    }

    #[test]
    fn test_oblong_drill() {
        let mut ext = Extents::empty();
        let mut p = pad(PadShape::Oblong, Point::new(60.0, 30.0));
        let drill = oblong_drill(40.0, 20.0);
        p.drill = Some(drill.clone());
        let out = pad_drill_to_svg(&p, &drill, &opts(Side::Front), &mut ext);
        let names: Vec<&str> = out.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["rect", "circle", "circle"]);
        assert_eq!(out[0].get_f64("width"), Some(20.0));
        assert_eq!(out[0].get_f64("height"), Some(20.0));
        assert_abs_diff_eq!(out[1].get_f64("r").unwrap(), 10.0);
        assert_eq!(out[1].get_str("transform"), Some("rotate(90, 100, 200)"));
        assert_eq!((ext.minx, ext.maxx), (80.0, 120.0));
    }
}
