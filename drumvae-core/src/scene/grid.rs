use crate::{
    foundation::core::{CHANNELS, Point, Rect, Rgba8, STEPS, palette},
    model::pattern::{Cell, DiffSet, GatedPattern},
    render::plan::Painter,
    scene::layout::{SceneLayout, draw_corner_frame},
};

/// Visual state of one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    OffDim,
    /// Off, on a 6-step boundary.
    OffAccent,
    On,
    /// On and within two steps of the playing beat.
    OnNearBeat,
    Hovered,
}

/// Fill color and size (as fractions of one step) for a cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellStyle {
    pub kind: CellKind,
    pub color: Rgba8,
    pub width: f64,
    pub height: f64,
}

pub fn cell_style(on: bool, step: usize, beat: usize, hovered: bool) -> CellStyle {
    let style = |kind, color, width, height| CellStyle {
        kind,
        color,
        width,
        height,
    };
    if hovered {
        return style(CellKind::Hovered, palette::GREEN, 1.0, 0.5);
    }
    if on {
        if step.abs_diff(beat) < 2 {
            return style(CellKind::OnNearBeat, palette::RED, 1.5, 0.8);
        }
        return if step % 6 == 0 {
            style(CellKind::On, palette::WHITE, 1.0, 0.5)
        } else {
            style(CellKind::On, palette::WHITE, 0.8, 0.4)
        };
    }
    let color = if step % 24 == 0 {
        palette::WHITE
    } else {
        palette::GREEN
    };
    if step % 6 == 0 {
        style(CellKind::OffAccent, color, 0.1, 0.3)
    } else {
        style(CellKind::OffDim, color, 0.08, 0.15)
    }
}

/// Inverse of the cell layout: the cell under `p` (scene coordinates), if any.
pub fn pointer_to_cell(layout: &SceneLayout, p: Point) -> Option<Cell> {
    let r = layout.grid_rect();
    if !(p.x > r.x0 && p.x < r.x1 && p.y > r.y0 && p.y < r.y1) {
        return None;
    }
    let s = layout.step_size();
    let step = (((p.x - r.x0) / s.x).floor() as usize).min(STEPS - 1);
    let row = (((p.y - r.y0) / s.y).floor() as usize).min(CHANNELS - 1);
    Cell::new(step, CHANNELS - 1 - row).ok()
}

/// Everything the grid needs for one frame.
pub struct GridView<'a> {
    pub pattern: &'a GatedPattern,
    pub beat: usize,
    pub hover: Option<Cell>,
    pub diff: &'a DiffSet,
    pub diff_alpha: f64,
    pub diff_radius_ratio: f64,
    /// Latent graph base radius; sizes the hover ring.
    pub graph_radius: f64,
    pub frame_count: u64,
}

impl GridView<'_> {
    pub fn draw(&self, painter: &mut Painter<'_>, layout: &SceneLayout) {
        painter.save();
        painter.translate(layout.grid_center.x, layout.grid_center.y);
        draw_corner_frame(
            painter,
            layout.grid_width * 1.1,
            layout.grid_height * 1.1,
            layout.frame_unit(),
            palette::WHITE,
        );
        painter.translate(-0.5 * layout.grid_width, -0.5 * layout.grid_height);
        let s = layout.step_size();

        if self.diff_alpha > 0.0 {
            let radius = s.x * (1.0 - self.diff_alpha) * self.diff_radius_ratio;
            for e in self.diff.iter() {
                let color = if e.value > 0 {
                    palette::WHITE
                } else {
                    palette::RED
                };
                let c = Point::new(
                    (e.cell.step as f64 + 0.5) * s.x,
                    (e.cell.visual_row() as f64 + 0.5) * s.y,
                );
                painter.stroke_circle(c, radius, color.with_alpha(self.diff_alpha));
            }
        }

        let marker_y = 9.5 * s.y;
        let group = (self.beat / 6) * 6;
        for step in 0..STEPS {
            let x = (step as f64 + 0.5) * s.x;
            if step == self.beat {
                let gx = (group as f64 + 0.5) * s.x;
                painter.fill_circle(Point::new(gx, marker_y), s.x * 0.5, palette::RED);
            } else if step % 6 == 0 {
                painter.stroke_circle(Point::new(x, marker_y), s.x * 0.1, palette::RED);
            }

            for row in 0..CHANNELS {
                let cell = Cell {
                    step,
                    channel: CHANNELS - 1 - row,
                };
                let hovered = self.hover == Some(cell);
                let st = cell_style(self.pattern.is_on(cell), step, self.beat, hovered);
                let c = Point::new(x, (row as f64 + 0.5) * s.y);

                if hovered {
                    let wave = (self.frame_count as f64 * 0.05).sin();
                    painter.stroke_circle(
                        c,
                        self.graph_radius * 0.15 * (1.0 + 0.3 * wave),
                        palette::WHITE.with_alpha(0.5 - 0.2 * wave),
                    );
                }

                let (w, h) = (st.width * s.x, st.height * s.y);
                painter.fill_rect(Rect::from_center_size(c, (w, h)), st.color);
            }
        }
        painter.restore();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/grid.rs"]
mod tests;
