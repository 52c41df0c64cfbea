use std::f64::consts::TAU;

use crate::{
    foundation::core::{Point, Rect, Vec2, palette},
    foundation::math::clamp,
    render::plan::{Painter, TextAlign},
    scene::layout::{SceneLayout, draw_corner_frame},
};

/// Symmetric range a drag can write into a latent dimension.
pub const DRAG_RANGE: f64 = 0.1;

const HOVER_SWELL: f64 = 0.02;
const HOVER_SMOOTHING: f64 = 0.1;
const TEXT_SIZE_PX: f32 = 16.0;

/// Placement and decoration switches for one latent graph instance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GraphConfig {
    /// Resting base radius as a fraction of `dist`.
    pub radius_ratio: f64,
    pub width_ratio: f64,
    pub height_ratio: f64,
    pub x_shift_ratio: f64,
    pub y_shift_ratio: f64,
    pub show_dash_circle: bool,
    pub show_diff: bool,
    pub show_text: bool,
    pub show_diagram: bool,
    pub show_indication: bool,
    /// Base radius eases toward `radius_ratio + 0.02` while the pointer is inside the frame.
    pub hover_swell: bool,
    pub dash_count: usize,
}

impl GraphConfig {
    /// The interactive graph in the default display.
    pub fn primary() -> Self {
        Self {
            radius_ratio: 0.6,
            width_ratio: 1.0,
            height_ratio: 1.7,
            x_shift_ratio: 0.0,
            y_shift_ratio: 1.0,
            show_dash_circle: true,
            show_diff: true,
            show_text: true,
            show_diagram: false,
            show_indication: true,
            hover_swell: true,
            dash_count: 40,
        }
    }

    /// The interactive graph while the decorative graphs are shown.
    pub fn primary_multi() -> Self {
        Self {
            radius_ratio: 0.5,
            width_ratio: 0.5,
            height_ratio: 2.0,
            x_shift_ratio: -0.25,
            y_shift_ratio: 0.6,
            ..Self::primary()
        }
    }

    /// Compact bar-diagram instance stacked on the right.
    pub fn decorative(y_shift_ratio: f64) -> Self {
        Self {
            radius_ratio: 0.2,
            width_ratio: 0.5,
            height_ratio: 0.5,
            x_shift_ratio: 0.25,
            y_shift_ratio,
            show_dash_circle: true,
            show_diff: false,
            show_text: false,
            show_diagram: true,
            show_indication: false,
            hover_swell: false,
            dash_count: 20,
        }
    }
}

/// Resolved placement of a graph for one frame, in scene coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GraphGeometry {
    pub center: Point,
    pub base_radius: f64,
    pub width: f64,
    pub height: f64,
    /// Radial pixels per unit of latent value.
    pub scale: f64,
    /// Layout distance unit; bounds the drag annulus.
    pub unit: f64,
}

impl GraphGeometry {
    pub fn frame_rect(&self) -> Rect {
        Rect::from_center_size(self.center, (self.width, self.height))
    }

    /// Position of dimension `i` of `dims` carrying `value`, relative to the graph center.
    pub fn dim_offset(&self, i: usize, dims: usize, value: f64) -> Vec2 {
        let angle = TAU * i as f64 / dims as f64;
        let r = self.base_radius + value * self.scale;
        Vec2::new(r * angle.cos(), r * angle.sin())
    }

    fn polar(&self, p: Point) -> (f64, f64) {
        let v = p - self.center;
        (v.hypot(), v.y.atan2(v.x))
    }

    fn in_annulus(&self, d: f64) -> bool {
        d >= 0.1 * self.base_radius && d <= 1.2 * self.base_radius
    }

    fn in_drag_annulus(&self, d: f64) -> bool {
        let (d2, u2) = (d * d, self.unit * self.unit);
        d2 > 0.1 * u2 && d2 < 1.2 * u2
    }
}

/// Sector of `p` among `dims` equal sectors centered on each dimension's angle.
///
/// Only points inside the 10%..120% annulus of the base radius hit. A point exactly on a sector
/// boundary belongs to the following sector.
pub fn pointer_to_dimension(geom: &GraphGeometry, p: Point, dims: usize) -> Option<usize> {
    if dims == 0 {
        return None;
    }
    let (d, angle) = geom.polar(p);
    if !geom.in_annulus(d) {
        return None;
    }
    let sector = TAU / dims as f64;
    let mut theta = angle + 0.5 * sector;
    if theta < 0.0 {
        theta += TAU;
    }
    // absorb rounding so exact boundaries land in the next sector
    let idx = ((theta / sector) + 1e-9).floor() as usize;
    Some(idx % dims)
}

/// Latent value for a drag at `p`, or `None` outside the drag annulus.
///
/// The drag annulus (squared distance within 10%..120% of the squared layout unit) is wider
/// than the hit annulus and covers the whole `±DRAG_RANGE`.
pub fn drag_value(geom: &GraphGeometry, p: Point) -> Option<f64> {
    let (d, _) = geom.polar(p);
    if !geom.in_drag_annulus(d) || geom.scale <= 0.0 {
        return None;
    }
    Some(clamp((d - geom.base_radius) / geom.scale, -DRAG_RANGE, DRAG_RANGE))
}

/// Angular quadrant of a latent dimension, used to place its value label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quadrant {
    LowerRight,
    LowerLeft,
    UpperLeft,
    UpperRight,
}

impl Quadrant {
    pub fn of(i: usize, dims: usize) -> Self {
        let q = dims / 4;
        if i > 3 * q {
            Self::UpperRight
        } else if i > 2 * q {
            Self::UpperLeft
        } else if i > q {
            Self::LowerLeft
        } else {
            Self::LowerRight
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct TextPlacement {
    flip_x: bool,
    flip_y: bool,
    gap: f64,
}

const TEXT_PLACEMENT: [(Quadrant, TextPlacement); 4] = [
    (
        Quadrant::LowerRight,
        TextPlacement {
            flip_x: false,
            flip_y: false,
            gap: 5.0,
        },
    ),
    (
        Quadrant::LowerLeft,
        TextPlacement {
            flip_x: true,
            flip_y: false,
            gap: -50.0,
        },
    ),
    (
        Quadrant::UpperLeft,
        TextPlacement {
            flip_x: true,
            flip_y: true,
            gap: -50.0,
        },
    ),
    (
        Quadrant::UpperRight,
        TextPlacement {
            flip_x: false,
            flip_y: true,
            gap: 5.0,
        },
    ),
];

fn placement(q: Quadrant) -> TextPlacement {
    TEXT_PLACEMENT
        .iter()
        .find(|(k, _)| *k == q)
        .map(|(_, p)| *p)
        .unwrap_or(TEXT_PLACEMENT[0].1)
}

/// Leader-line knee, leader end, and text anchor for a label at local `radius`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueLabel {
    pub knee: Point,
    pub end: Point,
    pub anchor: Point,
}

pub fn value_label(quadrant: Quadrant, radius: f64, graph_width: f64) -> ValueLabel {
    let k = graph_width / 500.0;
    let p = placement(quadrant);
    let sx = if p.flip_x { -1.0 } else { 1.0 };
    let sy = if p.flip_y { -1.0 } else { 1.0 };
    let x0 = sx * (40.0 + 0.35 * (160.0 - radius)) * k;
    let x1 = sx * (60.0 + 0.35 * (160.0 - radius)) * k;
    let y = sy * (40.0 + radius * 0.08) * k;
    ValueLabel {
        knee: Point::new(x0, y),
        end: Point::new(x1, y),
        anchor: Point::new(x1 + p.gap, y),
    }
}

/// Value rounded to four decimals, without a trailing `.0` or negative zero.
pub fn format_value(v: f64) -> String {
    let r = (v * 10_000.0).round() / 10_000.0;
    if r == 0.0 { "0".to_owned() } else { format!("{r}") }
}

/// Server fetch indicator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Indication {
    Hidden,
    /// Blinking green dot.
    Awaiting,
    /// Steady red dot.
    Failed,
}

/// Per-frame inputs that are not owned by the graph.
#[derive(Clone, Copy, Debug)]
pub struct GraphDecorations {
    pub selected: Option<usize>,
    pub blink: f64,
    pub change: f64,
    pub indication: Indication,
    pub frame_count: u64,
}

impl Default for GraphDecorations {
    fn default() -> Self {
        Self {
            selected: None,
            blink: 0.0,
            change: 0.0,
            indication: Indication::Hidden,
            frame_count: 0,
        }
    }
}

/// Radial latent-vector diagram.
#[derive(Clone, Debug)]
pub struct LatentGraph {
    config: GraphConfig,
    radius_ratio: f64,
    hover_inside: bool,
}

impl LatentGraph {
    pub fn new(config: GraphConfig) -> Self {
        Self {
            radius_ratio: config.radius_ratio,
            config,
            hover_inside: false,
        }
    }

    /// Start from `radius_ratio` and ease toward the configured one.
    pub fn with_initial_radius_ratio(mut self, radius_ratio: f64) -> Self {
        self.radius_ratio = radius_ratio;
        self
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Switch placement; the base radius eases from its current value.
    pub fn set_config(&mut self, config: GraphConfig) {
        self.config = config;
    }

    pub fn radius_ratio(&self) -> f64 {
        self.radius_ratio
    }

    pub fn geometry(&self, layout: &SceneLayout) -> GraphGeometry {
        let c = &self.config;
        GraphGeometry {
            center: Point::new(
                layout.grid_width * 1.1 * c.x_shift_ratio,
                layout.dist * c.y_shift_ratio,
            ),
            base_radius: layout.dist * self.radius_ratio,
            width: layout.grid_width * 1.1 * c.width_ratio,
            height: layout.dist * c.height_ratio,
            scale: 2.0 * layout.dist,
            unit: layout.dist,
        }
    }

    /// Track whether the pointer (scene coordinates) is inside the graph frame.
    pub fn set_pointer(&mut self, layout: &SceneLayout, p: Point) {
        let r = self.geometry(layout).frame_rect();
        self.hover_inside = p.x > r.x0 && p.x < r.x1 && p.y > r.y0 && p.y < r.y1;
    }

    pub fn hover_inside(&self) -> bool {
        self.hover_inside
    }

    /// One frame of base-radius smoothing.
    pub fn advance(&mut self) {
        let rest = self.config.radius_ratio;
        let target = if self.config.hover_swell && self.hover_inside {
            rest + HOVER_SWELL
        } else {
            rest
        };
        self.radius_ratio += (target - self.radius_ratio) * HOVER_SMOOTHING;
    }

    pub fn draw(
        &self,
        painter: &mut Painter<'_>,
        layout: &SceneLayout,
        values: &[f64],
        deco: &GraphDecorations,
    ) {
        let geom = self.geometry(layout);
        let c = &self.config;
        painter.save();
        painter.translate(geom.center.x, geom.center.y);
        draw_corner_frame(
            painter,
            geom.width,
            geom.height,
            layout.frame_unit(),
            palette::WHITE,
        );

        if c.show_diagram {
            draw_bars(painter, &geom, values);
        }
        if c.show_dash_circle {
            let a = TAU / c.dash_count.max(1) as f64;
            for i in 0..c.dash_count {
                painter.stroke_arc(
                    Point::ZERO,
                    geom.base_radius,
                    i as f64 * a,
                    0.1,
                    palette::DASH,
                );
            }
            if deco.change > 0.0 {
                let r = geom.base_radius * (0.95 + (1.0 - deco.change) * 0.5);
                painter.stroke_circle(Point::ZERO, r, palette::RED.with_alpha(deco.change));
            }
        }
        if c.show_indication {
            let at = Point::new(-0.5 * geom.width + 15.0, -0.5 * geom.height + 15.0);
            match deco.indication {
                Indication::Hidden => {}
                Indication::Awaiting => {
                    if deco.frame_count % 20 < 10 {
                        painter.fill_circle(at, 5.0, palette::INDICATOR_GREEN);
                    }
                }
                Indication::Failed => painter.fill_circle(at, 5.0, palette::RED),
            }
        }

        self.draw_points(painter, &geom, values, deco);
        painter.restore();
    }

    fn draw_points(
        &self,
        painter: &mut Painter<'_>,
        geom: &GraphGeometry,
        values: &[f64],
        deco: &GraphDecorations,
    ) {
        let dims = values.len();
        let points: Vec<Point> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| geom.dim_offset(i, dims, v).to_point())
            .collect();

        for (i, (&p, &value)) in points.iter().zip(values).enumerate() {
            if self.config.show_diff {
                let base = geom.dim_offset(i, dims, 0.0).to_point();
                painter.line(base, p, palette::RED);
            }
            if i > 0 {
                painter.line(points[i - 1], p, palette::LINK);
            }
            if i + 1 == dims {
                painter.line(p, points[0], palette::LINK);
            }

            let selected = deco.selected == Some(i);
            painter.save();
            painter.translate(p.x, p.y);

            if selected && deco.blink > 0.0 {
                painter.stroke_circle(
                    Point::ZERO,
                    geom.base_radius * 0.3 * (1.0 - deco.blink),
                    palette::RED.with_alpha(deco.blink),
                );
            }

            if selected && self.config.show_text {
                let radius = geom.base_radius + value * geom.scale;
                let label = value_label(Quadrant::of(i, dims), radius, geom.width);
                painter.text(
                    format_value(value),
                    label.anchor,
                    TEXT_SIZE_PX,
                    palette::RED,
                    TextAlign::Start,
                );
                painter.polyline(&[Point::ZERO, label.knee, label.end], palette::LABEL);
            }

            let (ratio, color) = if selected {
                (0.04, palette::RED)
            } else {
                (0.03, palette::DOT)
            };
            painter.fill_circle(Point::ZERO, geom.base_radius * ratio, color);

            if selected {
                let wave = (deco.frame_count as f64 * 0.05).sin();
                painter.stroke_circle(
                    Point::ZERO,
                    geom.base_radius * 0.15 * (1.0 + 0.3 * wave),
                    palette::RED.with_alpha(0.5 - 0.2 * wave),
                );
            }
            painter.restore();
        }
    }
}

/// Magnitude bars: first half of the dimensions on the left edge, second half on the right.
fn draw_bars(painter: &mut Painter<'_>, geom: &GraphGeometry, values: &[f64]) {
    const BAR_LENGTH: f64 = 15.0;
    const BAR_WIDTH: f64 = 3.0;
    let unit = geom.height / 6.0;
    let half = values.len().div_ceil(2);
    let (left, right) = values.split_at(half);
    let x_left = -0.5 * geom.width + unit;
    let x_right = 0.5 * geom.width - unit;
    for (row, v) in left.iter().enumerate() {
        let y = -0.5 * geom.height + (row as f64 + 0.5) * unit;
        let len = BAR_LENGTH * geom.width * v.abs();
        painter.fill_rect(
            Rect::new(x_left, y, x_left + len, y + BAR_WIDTH),
            palette::BAR_DARK,
        );
    }
    for (row, v) in right.iter().enumerate() {
        let y = -0.5 * geom.height + (row as f64 + 0.5) * unit;
        let len = BAR_LENGTH * geom.width * v.abs();
        painter.fill_rect(
            Rect::new(x_right - len, y, x_right, y + BAR_WIDTH),
            palette::BAR_LIGHT,
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/latent_graph.rs"]
mod tests;
