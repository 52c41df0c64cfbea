use kurbo::{Arc, Circle, Shape};

use crate::foundation::core::{Affine, BezPath, Point, Rect, Rgba8, Vec2, Viewport};

const PATH_TOLERANCE: f64 = 0.1;
const DEFAULT_LINE_WIDTH: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Start,
    Center,
}

#[derive(Clone, Debug)]
/// Backend-agnostic draw operation in viewport (CSS pixel) coordinates.
pub enum DrawOp {
    Fill {
        path: BezPath,
        color: Rgba8,
    },
    Stroke {
        path: BezPath,
        color: Rgba8,
        width: f64,
    },
    Text {
        text: String,
        /// Baseline anchor.
        origin: Point,
        size_px: f32,
        color: Rgba8,
        align: TextAlign,
    },
}

impl DrawOp {
    pub fn color(&self) -> Rgba8 {
        match self {
            Self::Fill { color, .. } | Self::Stroke { color, .. } | Self::Text { color, .. } => {
                *color
            }
        }
    }

    /// Geometric bounds; text reports a zero-sized rect at its anchor.
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Fill { path, .. } | Self::Stroke { path, .. } => path.bounding_box(),
            Self::Text { origin, .. } => Rect::from_points(*origin, *origin),
        }
    }
}

#[derive(Clone, Debug)]
/// Everything needed to rasterize one frame.
pub struct DrawList {
    pub viewport: Viewport,
    pub background: Rgba8,
    pub ops: Vec<DrawOp>,
}

impl DrawList {
    pub fn new(viewport: Viewport, background: Rgba8) -> Self {
        Self {
            viewport,
            background,
            ops: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn with_color(&self, color: Rgba8) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(move |op| op.color() == color)
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Immediate-mode painter with a canvas-style transform stack.
///
/// Shapes are flattened into device-independent paths and appended to a [`DrawList`]. Fully
/// transparent colors emit nothing.
pub struct Painter<'a> {
    list: &'a mut DrawList,
    transform: Affine,
    line_width: f64,
    stack: Vec<(Affine, f64)>,
}

impl<'a> Painter<'a> {
    pub fn new(list: &'a mut DrawList) -> Self {
        Self {
            list,
            transform: Affine::IDENTITY,
            line_width: DEFAULT_LINE_WIDTH,
            stack: Vec::new(),
        }
    }

    pub fn save(&mut self) {
        self.stack.push((self.transform, self.line_width));
    }

    pub fn restore(&mut self) {
        if let Some((t, w)) = self.stack.pop() {
            self.transform = t;
            self.line_width = w;
        }
    }

    /// Stroke width for subsequent strokes; restored by [`Painter::restore`].
    pub fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }

    pub fn translate(&mut self, x: f64, y: f64) {
        self.transform *= Affine::translate(Vec2::new(x, y));
    }

    /// Map a local point to viewport coordinates.
    pub fn to_viewport(&self, p: Point) -> Point {
        self.transform * p
    }

    pub fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba8) {
        if radius <= 0.0 {
            return;
        }
        let path = Circle::new(center, radius).to_path(PATH_TOLERANCE);
        self.fill(path, color);
    }

    pub fn stroke_circle(&mut self, center: Point, radius: f64, color: Rgba8) {
        if radius <= 0.0 {
            return;
        }
        let path = Circle::new(center, radius).to_path(PATH_TOLERANCE);
        self.stroke(path, color);
    }

    pub fn stroke_arc(&mut self, center: Point, radius: f64, start: f64, sweep: f64, color: Rgba8) {
        let arc = Arc::new(center, Vec2::new(radius, radius), start, sweep, 0.0);
        self.stroke(arc.to_path(PATH_TOLERANCE), color);
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        self.fill(rect.to_path(PATH_TOLERANCE), color);
    }

    pub fn line(&mut self, a: Point, b: Point, color: Rgba8) {
        self.polyline(&[a, b], color);
    }

    pub fn polyline(&mut self, points: &[Point], color: Rgba8) {
        let mut iter = points.iter();
        let Some(first) = iter.next() else {
            return;
        };
        let mut path = BezPath::new();
        path.move_to(*first);
        for p in iter {
            path.line_to(*p);
        }
        self.stroke(path, color);
    }

    pub fn text(
        &mut self,
        text: impl Into<String>,
        at: Point,
        size_px: f32,
        color: Rgba8,
        align: TextAlign,
    ) {
        if color.is_transparent() {
            return;
        }
        self.list.ops.push(DrawOp::Text {
            text: text.into(),
            origin: self.transform * at,
            size_px,
            color,
            align,
        });
    }

    fn fill(&mut self, path: BezPath, color: Rgba8) {
        if color.is_transparent() {
            return;
        }
        self.list.ops.push(DrawOp::Fill {
            path: self.transform * path,
            color,
        });
    }

    fn stroke(&mut self, path: BezPath, color: Rgba8) {
        if color.is_transparent() {
            return;
        }
        self.list.ops.push(DrawOp::Stroke {
            path: self.transform * path,
            color,
            width: self.line_width,
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/plan.rs"]
mod tests;
