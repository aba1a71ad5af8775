use log::debug;
use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::error::ConvertError;
use crate::extents::Extents;
use crate::render::{self, DrawOptions};
use crate::types::{Module, Side};

pub const DEFAULT_SIZE: f64 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Edge length of the square output canvas.
    pub size: f64,
    pub side: Side,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            side: Side::Front,
        }
    }
}

/// Convert a module into an `<svg>` element tree.
///
/// Output order is every draw primitive, then every pad body, then every
/// drill. Any unsupported primitive aborts the conversion.
pub fn to_svg_tree(module: &Module, opts: &RenderOptions) -> Result<Element, ConvertError> {
    let draw_opts = DrawOptions::new(opts.side);
    let mut extents = Extents::empty();

    let elements = module
        .draw
        .iter()
        .try_fold(Vec::new(), |mut acc, draw| {
            acc.extend(render::draw_to_svg(draw, &draw_opts, &mut extents)?);
            Ok::<_, ConvertError>(acc)
        })?;
    let elements = module.pads.iter().try_fold(elements, |mut acc, pad| {
        acc.extend(render::pad_to_svg(pad, &draw_opts)?);
        Ok::<_, ConvertError>(acc)
    })?;
    let elements = module
        .pads
        .iter()
        .filter_map(|pad| pad.drill.as_ref().map(|drill| (pad, drill)))
        .fold(elements, |mut acc, (pad, drill)| {
            acc.extend(render::pad_drill_to_svg(pad, drill, &draw_opts, &mut extents));
            acc
        });

    debug!(
        "{} element(s) for {} side, extents {:?}",
        elements.len(),
        opts.side,
        extents
    );

    let viewport = Element::new("g")
        .attr("class", "viewport")
        .attr("transform", extents.calculate_transform(opts.size))
        .children(elements);

    Ok(Element::new("svg")
        .attr("xmlns", "http://www.w3.org/2000/svg")
        .attr("version", "1.1")
        .attr("width", opts.size)
        .attr("height", opts.size)
        .attr(
            "style",
            format!("background-color: {};", draw_opts.palette.pcb),
        )
        .child(viewport))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Draw, Drill, DrillShape, Pad, PadShape, Point};

    fn silk_segment(layer: i64) -> Draw {
        Draw::Segment {
            start: Point::new(0.0, 0.0),
            end: Point::new(100.0, 0.0),
            width: 10.0,
            layer,
        }
    }

    fn round_pad(x: f64, drill: Option<f64>) -> Pad {
        Pad {
            name: None,
            pos: Point::new(x, 0.0),
            size: Point::new(20.0, 20.0),
            shape: PadShape::Circle,
            orientation: 0.0,
            drill: drill.map(|d| Drill {
                shape: DrillShape::Circle,
                pos: Point::new(d, 0.0),
                dx: 0.0,
                dy: 0.0,
            }),
            parts: None,
        }
    }

    fn viewport(tree: &Element) -> &Element {
        &tree.children[0]
    }

    #[test]
    fn test_single_segment_front() {
        let module = Module {
            draw: vec![silk_segment(21)],
            ..Module::default()
        };
        let tree = to_svg_tree(&module, &RenderOptions::default()).unwrap();

        assert_eq!(tree.name, "svg");
        assert_eq!(tree.get_f64("width"), Some(500.0));
        assert_eq!(tree.get_f64("height"), Some(500.0));
        assert_eq!(
            tree.get_str("style"),
            Some("background-color: rgb(30,80,30);")
        );

        let g = viewport(&tree);
        assert_eq!(g.name, "g");
        assert_eq!(
            g.get_str("transform"),
            Some("translate(250, 250) scale(4.8) translate(-50, 0)")
        );
        let lines: Vec<&Element> = g.children.iter().filter(|e| e.name == "line").collect();
        assert_eq!(lines.len(), 1);
        let line = lines[0];
        assert_eq!(line.get_f64("x1"), Some(0.0));
        assert_eq!(line.get_f64("y1"), Some(0.0));
        assert_eq!(line.get_f64("x2"), Some(100.0));
        assert_eq!(line.get_f64("y2"), Some(0.0));
    }

    #[test]
    fn test_back_side_keeps_viewport() {
        let module = Module {
            draw: vec![silk_segment(21)],
            ..Module::default()
        };
        let front = to_svg_tree(&module, &RenderOptions::default()).unwrap();
        let back = to_svg_tree(
            &module,
            &RenderOptions {
                side: Side::Back,
                ..RenderOptions::default()
            },
        )
        .unwrap();
        assert!(viewport(&back).children.is_empty());
        assert_eq!(
            viewport(&back).get("transform"),
            viewport(&front).get("transform")
        );

        let mirrored = Module {
            draw: vec![silk_segment(20)],
            ..Module::default()
        };
        let tree = to_svg_tree(
            &mirrored,
            &RenderOptions {
                side: Side::Back,
                ..RenderOptions::default()
            },
        )
        .unwrap();
        assert_eq!(viewport(&tree).children.len(), 1);
        let tree = to_svg_tree(&mirrored, &RenderOptions::default()).unwrap();
        assert!(viewport(&tree).children.is_empty());
    }

    #[test]
    fn test_drills_follow_all_pads() {
        let module = Module {
            draw: vec![silk_segment(21)],
            pads: vec![round_pad(0.0, Some(8.0)), round_pad(50.0, None), round_pad(100.0, Some(8.0))],
            ..Module::default()
        };
        let tree = to_svg_tree(&module, &RenderOptions::default()).unwrap();
        let g = viewport(&tree);
        let kinds: Vec<(&str, Option<&str>)> = g
            .children
            .iter()
            .map(|e| (e.name.as_str(), e.get_str("fill")))
            .collect();
        let pad_fill = Some("rgb(150,150,150)");
        assert_eq!(
            kinds,
            [
                ("line", None),
                ("circle", pad_fill),
                ("circle", pad_fill),
                ("circle", pad_fill),
                ("circle", None),
                ("circle", None),
            ]
        );
        assert_eq!(g.children[4].get_f64("cx"), Some(0.0));
        assert_eq!(g.children[5].get_f64("cx"), Some(100.0));
    }

    #[test]
    fn test_pad_without_parts_on_both_sides() {
        let module = Module {
            pads: vec![round_pad(0.0, None)],
            ..Module::default()
        };
        for side in [Side::Front, Side::Back] {
            let tree = to_svg_tree(&module, &RenderOptions { size: 200.0, side }).unwrap();
            assert_eq!(viewport(&tree).children.len(), 1);
        }
    }

    #[test]
    fn test_pad_body_does_not_move_viewport() {
        let module = Module {
            pads: vec![round_pad(40.0, None)],
            ..Module::default()
        };
        let tree = to_svg_tree(&module, &RenderOptions::default()).unwrap();
        assert_eq!(
            viewport(&tree).get_str("transform"),
            Some("translate(250, 250) scale(1) translate(0, 0)")
        );
    }

    #[test]
    fn test_unsupported_pad_aborts() {
        let mut bad = round_pad(0.0, None);
        bad.shape = PadShape::Unsupported("Z".to_string());
        let module = Module {
            draw: vec![silk_segment(21)],
            pads: vec![round_pad(10.0, None), bad],
            ..Module::default()
        };
        let err = to_svg_tree(&module, &RenderOptions::default()).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedPadShape(ref s) if s == "Z"));
    }

    #[test]
    fn test_unsupported_draw_aborts() {
        let module = Module {
            draw: vec![silk_segment(21), Draw::Unsupported],
            ..Module::default()
        };
        assert!(matches!(
            to_svg_tree(&module, &RenderOptions::default()),
            Err(ConvertError::UnsupportedDraw)
        ));
    }

    #[test]
    fn test_options_from_json() {
        let opts: RenderOptions = serde_json::from_str(r#"{"side": "back"}"#).unwrap();
        assert_eq!(opts.side, Side::Back);
        assert_eq!(opts.size, DEFAULT_SIZE);
    }
}
