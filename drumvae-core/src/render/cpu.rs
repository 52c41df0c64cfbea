use crate::{
    foundation::core::{Affine, BezPath, Point, Rgba8},
    foundation::error::{DrumVaeError, DrumVaeResult},
    render::backend::{FrameRGBA, RenderBackend, RenderSettings},
    render::plan::{DrawList, DrawOp, TextAlign},
    render::text::TextLayoutEngine,
};

/// CPU raster backend built on `vello_cpu`.
///
/// Text ops need a font in [`RenderSettings::font_bytes`]; without one they are skipped.
pub struct CpuBackend {
    text: Option<(TextLayoutEngine, vello_cpu::peniko::FontData)>,
}

impl CpuBackend {
    pub fn new(settings: RenderSettings) -> DrumVaeResult<Self> {
        let text = match settings.font_bytes {
            Some(bytes) => {
                let engine = TextLayoutEngine::new(&bytes)?;
                let font = vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(bytes.as_ref().clone()),
                    0,
                );
                Some((engine, font))
            }
            None => None,
        };
        Ok(Self { text })
    }

    pub fn has_font(&self) -> bool {
        self.text.is_some()
    }
}

impl RenderBackend for CpuBackend {
    #[tracing::instrument(skip_all, fields(ops = list.len()))]
    fn render_list(&mut self, list: &DrawList) -> DrumVaeResult<FrameRGBA> {
        list.viewport.validate()?;
        let (width, height) = list.viewport.device_size();
        let width_u16: u16 = width
            .try_into()
            .map_err(|_| DrumVaeError::validation("frame width exceeds u16"))?;
        let height_u16: u16 = height
            .try_into()
            .map_err(|_| DrumVaeError::validation("frame height exceeds u16"))?;

        let device = Affine::scale(list.viewport.pixel_ratio);
        let mut ctx = vello_cpu::RenderContext::new(width_u16, height_u16);

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        set_color(&mut ctx, list.background);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(width),
            f64::from(height),
        ));

        let mut skipped_text = 0usize;
        for op in &list.ops {
            if !self.draw_op(&mut ctx, device, op)? {
                skipped_text += 1;
            }
        }
        if skipped_text > 0 {
            tracing::debug!(skipped_text, "no font configured; text ops skipped");
        }

        let mut pixmap = vello_cpu::Pixmap::new(width_u16, height_u16);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        Ok(FrameRGBA {
            width,
            height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

impl CpuBackend {
    /// Returns `false` when the op could not be drawn (text without a font).
    fn draw_op(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        device: Affine,
        op: &DrawOp,
    ) -> DrumVaeResult<bool> {
        match op {
            DrawOp::Fill { path, color } => {
                ctx.set_transform(affine_to_cpu(device));
                set_color(ctx, *color);
                ctx.fill_path(&bezpath_to_cpu(path));
                Ok(true)
            }
            DrawOp::Stroke { path, color, width } => {
                ctx.set_transform(affine_to_cpu(device));
                set_color(ctx, *color);
                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(*width));
                ctx.stroke_path(&bezpath_to_cpu(path));
                Ok(true)
            }
            DrawOp::Text {
                text,
                origin,
                size_px,
                color,
                align,
            } => {
                let Some((engine, font)) = self.text.as_mut() else {
                    return Ok(false);
                };
                if text.is_empty() {
                    return Ok(true);
                }
                let layout = engine.layout_line(text, *size_px, *color)?;
                let baseline = layout
                    .lines()
                    .next()
                    .map(|line| f64::from(line.metrics().baseline))
                    .unwrap_or(0.0);
                let dx = match align {
                    TextAlign::Start => 0.0,
                    TextAlign::Center => f64::from(layout.width()) * 0.5,
                };
                let transform =
                    device * Affine::translate((origin.x - dx, origin.y - baseline));
                ctx.set_transform(affine_to_cpu(transform));

                for line in layout.lines() {
                    for item in line.items() {
                        let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                            continue;
                        };
                        set_color(ctx, run.style().brush);
                        let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                            id: g.id,
                            x: g.x,
                            y: g.y,
                        });
                        ctx.glyph_run(font)
                            .font_size(run.run().font_size())
                            .fill_glyphs(glyphs);
                    }
                }
                Ok(true)
            }
        }
    }
}

fn set_color(ctx: &mut vello_cpu::RenderContext, c: Rgba8) {
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
