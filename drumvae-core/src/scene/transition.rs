use crate::{
    animation::ease::Ease,
    animation::scheduler::Scheduler,
    animation::tween::{TweenId, TweenSpec},
    foundation::core::{Point, Rgba8, palette},
    foundation::error::DrumVaeResult,
    foundation::math::{lerp_color, pulse},
    render::plan::{Painter, TextAlign},
    scene::layout::{SceneLayout, draw_corner_frame},
    scene::params::{DiagramRole, NnParam, SceneParam, SceneSignal},
};

const INPUTS: usize = 3;
const OUTPUTS: usize = 4;
const SLIDE_MS: f64 = 500.0;
const PULSE_MS: f64 = 300.0;
const LABEL_SIZE_PX: f32 = 16.0;

pub type SceneScheduler = Scheduler<SceneParam, SceneSignal>;

/// Snapshot of one diagram's animated fields.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NnState {
    pub shift_in: f64,
    pub lines_alpha: f64,
    pub shift_out: f64,
    pub more_alpha: f64,
    pub less_alpha: f64,
}

impl NnState {
    pub fn read(sched: &SceneScheduler, role: DiagramRole) -> Self {
        let v = |p| sched.value(SceneParam::Nn(role, p));
        Self {
            shift_in: v(NnParam::ShiftIn),
            lines_alpha: v(NnParam::LinesAlpha),
            shift_out: v(NnParam::ShiftOut),
            more_alpha: v(NnParam::MoreAlpha),
            less_alpha: v(NnParam::LessAlpha),
        }
    }
}

/// Whether any stage of `role`'s transition is still running.
pub fn is_running(sched: &SceneScheduler, role: DiagramRole) -> bool {
    NnParam::ALL
        .iter()
        .any(|p| sched.is_animating(SceneParam::Nn(role, *p)))
}

fn cancel(sched: &mut SceneScheduler, role: DiagramRole) {
    sched.cancel_where(|k| matches!(k, SceneParam::Nn(r, _) if r == role));
}

fn tween(role: DiagramRole, p: NnParam, from: f64, to: f64, ms: f64) -> TweenSpec<SceneParam> {
    TweenSpec::new(SceneParam::Nn(role, p), from, to, ms)
}

/// Latent to grid: inputs slide in, links and emphasis pulse, outputs slide out.
///
/// `done` fires when the outputs finish sliding. Returns the id of that final stage.
pub fn schedule_decode(
    sched: &mut SceneScheduler,
    role: DiagramRole,
    done: SceneSignal,
) -> DrumVaeResult<TweenId> {
    cancel(sched, role);
    let slide_in = sched.add(tween(role, NnParam::ShiftIn, 1.0, 0.0, SLIDE_MS).ease(Ease::InExpo))?;
    let lines = sched.add(tween(role, NnParam::LinesAlpha, 0.2, 1.8, PULSE_MS).delay(100.0))?;
    let more = sched.add(tween(role, NnParam::MoreAlpha, 0.0, 2.0, PULSE_MS).delay(200.0))?;
    let less = sched.add(tween(role, NnParam::LessAlpha, 0.0, 2.0, PULSE_MS))?;
    let slide_out =
        sched.add(tween(role, NnParam::ShiftOut, 0.0, 1.0, SLIDE_MS).ease(Ease::InExpo))?;

    sched.chain(slide_in, &[lines, more, less])?;
    sched.chain(more, &[slide_out])?;
    sched.on_done(slide_out, done)?;
    sched.start(slide_in)?;
    tracing::debug!(?role, "decode transition scheduled");
    Ok(slide_out)
}

/// Grid to latent: the mirror of [`schedule_decode`].
pub fn schedule_encode(
    sched: &mut SceneScheduler,
    role: DiagramRole,
    done: SceneSignal,
) -> DrumVaeResult<TweenId> {
    cancel(sched, role);
    let slide_out =
        sched.add(tween(role, NnParam::ShiftOut, 1.0, 0.0, SLIDE_MS).ease(Ease::InExpo))?;
    let lines = sched.add(tween(role, NnParam::LinesAlpha, 0.2, 1.8, PULSE_MS).delay(100.0))?;
    let more = sched.add(tween(role, NnParam::MoreAlpha, 0.0, 2.0, PULSE_MS))?;
    let less = sched.add(tween(role, NnParam::LessAlpha, 0.0, 2.0, PULSE_MS).delay(200.0))?;
    let slide_in = sched.add(tween(role, NnParam::ShiftIn, 0.0, 1.0, SLIDE_MS).ease(Ease::InExpo))?;

    sched.chain(slide_out, &[lines, more, less])?;
    sched.chain(more, &[slide_in])?;
    sched.on_done(slide_in, done)?;
    sched.start(slide_out)?;
    tracing::debug!(?role, "encode transition scheduled");
    Ok(slide_in)
}

/// Frame and label; drawn every frame.
pub fn draw_shell(painter: &mut Painter<'_>, layout: &SceneLayout, role: DiagramRole) {
    let (center, label) = match role {
        DiagramRole::Encoder => (layout.encoder_center(), "encoder"),
        DiagramRole::Decoder => (layout.decoder_center(), "decoder"),
    };
    let size = layout.diagram_frame_size();
    painter.save();
    painter.translate(center.x, center.y);
    draw_corner_frame(painter, size.x, size.y, layout.frame_unit(), palette::WHITE);
    painter.text(
        label,
        Point::new(layout.grid_width * -0.08, layout.grid_height * -0.3),
        LABEL_SIZE_PX,
        palette::LABEL,
        TextAlign::Center,
    );
    painter.restore();
}

/// Nodes and links of the 3 → 4 layered diagram.
pub fn draw_body(
    painter: &mut Painter<'_>,
    layout: &SceneLayout,
    role: DiagramRole,
    s: &NnState,
) {
    let center = match role {
        DiagramRole::Encoder => layout.encoder_center(),
        DiagramRole::Decoder => layout.decoder_center(),
    };
    let radius = layout.dist * 0.02;
    let unit = layout.dist * 0.15;
    let y_shift = layout.dist * 0.08;

    painter.save();
    painter.translate(center.x, center.y);

    let input = |i: usize| Point::new(unit * (i as f64 - 1.0), y_shift);
    let output = |j: usize| Point::new(unit * (j as f64 - 1.5), -y_shift);

    let link = palette::WHITE.with_alpha(pulse(s.lines_alpha));
    for i in 0..INPUTS {
        for j in 0..OUTPUTS {
            painter.line(input(i), output(j), link);
        }
    }

    let node_color = |amt: f64| lerp_color(palette::WHITE, palette::RED, pulse(amt));
    for i in 0..INPUTS {
        let p = input(i);
        draw_ghost(painter, p, s.shift_in, 6.0 * y_shift, radius);
        painter.fill_circle(p, radius, node_color(s.less_alpha));
    }
    for j in 0..OUTPUTS {
        let p = output(j);
        draw_ghost(painter, p, s.shift_out, -6.0 * y_shift, radius);
        painter.fill_circle(p, radius, node_color(s.more_alpha));
    }
    painter.restore();
}

/// Sliding copy of a node, visible only mid-slide.
fn draw_ghost(painter: &mut Painter<'_>, at: Point, shift: f64, travel: f64, radius: f64) {
    if shift > 0.01 && shift < 0.99 {
        let ghost: Rgba8 = palette::WHITE.with_alpha(1.0 - shift);
        painter.fill_circle(Point::new(at.x, at.y + shift * travel), radius, ghost);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/transition.rs"]
mod tests;
