use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ─── Point ───────────────────────────────────────────────────────────

/// A coordinate in board units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

// ─── Module ──────────────────────────────────────────────────────────

/// A parsed footprint: graphic primitives, pads and text labels, in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Module {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub draw: Vec<Draw>,
    #[serde(default)]
    pub pads: Vec<Pad>,
    #[serde(default)]
    pub text: Vec<TextLabel>,
}

// ─── Draw primitives ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Draw {
    Segment {
        start: Point,
        end: Point,
        width: f64,
        layer: i64,
    },
    /// `start` is the center, `end` any point on the circumference.
    Circle {
        start: Point,
        end: Point,
        width: f64,
        layer: i64,
    },
    /// `angle` is the signed sweep in tenths of a degree, starting at `start`.
    Arc {
        start: Point,
        center: Point,
        angle: f64,
        width: f64,
        layer: i64,
    },
    Polygon {
        points: Vec<Point>,
        width: f64,
        layer: i64,
    },
    #[serde(other)]
    Unsupported,
}

impl Draw {
    pub fn layer(&self) -> Option<i64> {
        match self {
            Draw::Segment { layer, .. }
            | Draw::Circle { layer, .. }
            | Draw::Arc { layer, .. }
            | Draw::Polygon { layer, .. } => Some(*layer),
            Draw::Unsupported => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Draw::Segment { .. } => "segment",
            Draw::Circle { .. } => "circle",
            Draw::Arc { .. } => "arc",
            Draw::Polygon { .. } => "polygon",
            Draw::Unsupported => "unsupported",
        }
    }
}

// ─── Pad ─────────────────────────────────────────────────────────────

/// Pad outline, stored in input files as a one-letter code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PadShape {
    Circle,
    Rect,
    Trapezoid,
    Oblong,
    Unsupported(String),
}

impl From<String> for PadShape {
    fn from(code: String) -> Self {
        match code.as_str() {
            "C" => PadShape::Circle,
            "R" => PadShape::Rect,
            "T" => PadShape::Trapezoid,
            "O" => PadShape::Oblong,
            _ => PadShape::Unsupported(code),
        }
    }
}

impl From<PadShape> for String {
    fn from(shape: PadShape) -> Self {
        match shape {
            PadShape::Circle => "C".to_string(),
            PadShape::Rect => "R".to_string(),
            PadShape::Trapezoid => "T".to_string(),
            PadShape::Oblong => "O".to_string(),
            PadShape::Unsupported(code) => code,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DrillShape {
    #[default]
    Circle,
    Oblong,
}

impl From<String> for DrillShape {
    fn from(code: String) -> Self {
        if code == "O" {
            DrillShape::Oblong
        } else {
            DrillShape::Circle
        }
    }
}

impl From<DrillShape> for String {
    fn from(shape: DrillShape) -> Self {
        match shape {
            DrillShape::Circle => "C".to_string(),
            DrillShape::Oblong => "O".to_string(),
        }
    }
}

/// Drill hole. `pos.x` holds the drill diameter; `dx`/`dy` the oblong extents.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Drill {
    #[serde(default)]
    pub shape: DrillShape,
    pub pos: Point,
    #[serde(default)]
    pub dx: f64,
    #[serde(default)]
    pub dy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PadPart {
    Attribute {
        #[serde(rename = "layerMask")]
        layer_mask: u32,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pad {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub pos: Point,
    pub size: Point,
    pub shape: PadShape,
    /// Rotation in tenths of a degree.
    #[serde(default)]
    pub orientation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drill: Option<Drill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<PadPart>>,
}

// ─── Text ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TextSize {
    pub width: f64,
    pub height: f64,
}

/// Reference/value/user text. Carried through the model but not rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLabel {
    pub value: String,
    pub pos: Point,
    #[serde(default)]
    pub size: TextSize,
    #[serde(default)]
    pub orientation: f64,
    pub layer: i64,
}

// ─── Side helper ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Front,
    Back,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Front => "front",
            Side::Back => "back",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "front" => Ok(Side::Front),
            "back" => Ok(Side::Back),
            _ => Err(format!("Unknown side: {s}. Use: front, back")),
        }
    }
}
