use crate::{
    foundation::core::{CHANNELS, Point, Rect, Rgba8, STEPS, Vec2, Viewport},
    model::pattern::Cell,
    render::plan::Painter,
};

/// Frame-level geometry derived from the viewport.
///
/// Scene coordinates put the origin at the viewport center with y pointing down; every renderer
/// draws in scene coordinates after [`SceneLayout::enter`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneLayout {
    pub viewport: Viewport,
    /// Grid height; also the base unit of the whole scene.
    pub grid_height: f64,
    pub grid_width: f64,
    /// Latent graph unit (`1.2 · grid_height`).
    pub dist: f64,
    /// Grid center in scene coordinates.
    pub grid_center: Point,
}

impl SceneLayout {
    pub fn compute(viewport: Viewport) -> Self {
        let grid_height = viewport.width.min(viewport.height) * 0.18;
        Self {
            viewport,
            grid_height,
            grid_width: viewport.width * 0.5,
            dist: grid_height * 1.2,
            grid_center: Point::new(0.0, -1.5 * grid_height),
        }
    }

    /// Viewport pixel position to scene coordinates.
    pub fn to_scene(&self, p: Point) -> Point {
        p - self.viewport.center().to_vec2()
    }

    /// Move the painter origin to the viewport center.
    pub fn enter(&self, painter: &mut Painter<'_>) {
        let c = self.viewport.center();
        painter.translate(c.x, c.y);
    }

    /// Grid bounds in scene coordinates.
    pub fn grid_rect(&self) -> Rect {
        Rect::from_center_size(self.grid_center, (self.grid_width, self.grid_height))
    }

    /// Width and height of one cell.
    pub fn step_size(&self) -> Vec2 {
        Vec2::new(
            self.grid_width / STEPS as f64,
            self.grid_height / CHANNELS as f64,
        )
    }

    /// Cell center in scene coordinates. Channel 0 is the bottom row.
    pub fn cell_center(&self, cell: Cell) -> Point {
        let origin = self.grid_rect().origin();
        let s = self.step_size();
        Point::new(
            origin.x + (cell.step as f64 + 0.5) * s.x,
            origin.y + (cell.visual_row() as f64 + 0.5) * s.y,
        )
    }

    /// Length of one corner-bracket arm.
    pub fn frame_unit(&self) -> f64 {
        self.dist * 0.04
    }

    pub fn encoder_center(&self) -> Point {
        Point::new(self.grid_width * 0.25, self.grid_height * -0.4)
    }

    pub fn decoder_center(&self) -> Point {
        Point::new(self.grid_width * -0.25, self.grid_height * -0.4)
    }

    pub fn diagram_frame_size(&self) -> Vec2 {
        Vec2::new(self.grid_width * 0.4, self.grid_height * 0.6)
    }
}

/// Four corner brackets around a `w × h` box centered on the painter origin.
pub fn draw_corner_frame(painter: &mut Painter<'_>, w: f64, h: f64, unit: f64, color: Rgba8) {
    let (hw, hh) = (0.5 * w, 0.5 * h);
    for (sx, sy) in [(1.0, 1.0), (-1.0, 1.0), (1.0, -1.0), (-1.0, -1.0)] {
        let corner = Point::new(sx * hw, sy * hh);
        painter.polyline(
            &[
                Point::new(corner.x, corner.y - sy * unit),
                corner,
                Point::new(corner.x - sx * unit, corner.y),
            ],
            color,
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/layout.rs"]
mod tests;
