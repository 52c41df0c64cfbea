use super::*;
use crate::foundation::core::palette;
use crate::render::plan::{DrawList, DrawOp};

fn layout() -> SceneLayout {
    SceneLayout::compute(Viewport::new(1000.0, 600.0, 2.0).unwrap())
}

#[test]
fn derives_units_from_the_short_side() {
    let l = layout();
    assert!((l.grid_height - 108.0).abs() < 1e-9);
    assert!((l.grid_width - 500.0).abs() < 1e-9);
    assert!((l.dist - 129.6).abs() < 1e-9);
    assert_eq!(l.grid_center, Point::new(0.0, -162.0));
    assert_eq!(l.to_scene(Point::new(500.0, 300.0)), Point::ZERO);
}

#[test]
fn cell_centers_put_channel_zero_at_the_bottom() {
    let l = layout();
    let r = l.grid_rect();
    let s = l.step_size();
    let bottom_left = l.cell_center(Cell::new(0, 0).unwrap());
    assert!((bottom_left.x - (r.x0 + 0.5 * s.x)).abs() < 1e-9);
    assert!((bottom_left.y - (r.y1 - 0.5 * s.y)).abs() < 1e-9);
    let top_right = l.cell_center(Cell::new(95, 8).unwrap());
    assert!((top_right.x - (r.x1 - 0.5 * s.x)).abs() < 1e-9);
    assert!((top_right.y - (r.y0 + 0.5 * s.y)).abs() < 1e-9);
}

#[test]
fn corner_frame_draws_four_brackets() {
    let mut list = DrawList::new(Viewport::default(), palette::BACKGROUND);
    {
        let mut p = Painter::new(&mut list);
        draw_corner_frame(&mut p, 100.0, 40.0, 5.0, palette::WHITE);
    }
    assert_eq!(list.len(), 4);
    for op in &list.ops {
        assert!(matches!(op, DrawOp::Stroke { .. }));
        let b = op.bounds();
        assert!((b.width() - 5.0).abs() < 1e-9 && (b.height() - 5.0).abs() < 1e-9);
    }
}
