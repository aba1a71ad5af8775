use crate::geometry::fmt_num;

/// Space kept free around the drawing on each side of the canvas.
pub const CANVAS_MARGIN: f64 = 10.0;

/// Running bounding box of every coordinate touched while rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extents {
    pub minx: f64,
    pub miny: f64,
    pub maxx: f64,
    pub maxy: f64,
}

impl Default for Extents {
    fn default() -> Self {
        Self::empty()
    }
}

impl Extents {
    pub fn empty() -> Self {
        Self {
            minx: f64::INFINITY,
            miny: f64::INFINITY,
            maxx: f64::NEG_INFINITY,
            maxy: f64::NEG_INFINITY,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.minx > self.maxx || self.miny > self.maxy
    }

    pub fn update(&mut self, x: f64, y: f64) {
        self.minx = self.minx.min(x);
        self.miny = self.miny.min(y);
        self.maxx = self.maxx.max(x);
        self.maxy = self.maxy.max(y);
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.maxx - self.minx
        }
    }

    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.maxy - self.miny
        }
    }

    /// Center of the box, or the origin when nothing was recorded.
    pub fn center(&self) -> (f64, f64) {
        if self.is_empty() {
            (0.0, 0.0)
        } else {
            (
                (self.minx + self.maxx) / 2.0,
                (self.miny + self.maxy) / 2.0,
            )
        }
    }

    /// Uniform scale fitting the box into a `size` x `size` canvas minus margins.
    /// Falls back to 1 for an empty or zero-area box.
    pub fn scale_for(&self, size: f64) -> f64 {
        let extent = self.width().max(self.height());
        let usable = size - 2.0 * CANVAS_MARGIN;
        if extent > 0.0 && usable > 0.0 {
            usable / extent
        } else {
            1.0
        }
    }

    /// SVG transform that centers the box in a `size` x `size` canvas.
    pub fn calculate_transform(&self, size: f64) -> String {
        let half = size / 2.0;
        let (cx, cy) = self.center();
        format!(
            "translate({}, {}) scale({}) translate({}, {})",
            fmt_num(half),
            fmt_num(half),
            fmt_num(self.scale_for(size)),
            fmt_num(0.0 - cx),
            fmt_num(0.0 - cy)
        )
    }
}
