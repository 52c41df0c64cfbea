use super::*;
use crate::foundation::core::{TimeMs, Viewport};
use crate::render::plan::DrawList;

fn sched() -> SceneScheduler {
    Scheduler::new()
}

fn run_until(s: &mut SceneScheduler, end_ms: f64) -> Vec<(f64, SceneSignal)> {
    let mut out = Vec::new();
    let mut t = 0.0;
    while t <= end_ms {
        for sig in s.tick(TimeMs(t)) {
            out.push((t, sig));
        }
        t += 10.0;
    }
    out
}

#[test]
fn resting_values_match_an_idle_diagram() {
    let s = NnState::read(&sched(), DiagramRole::Decoder);
    assert_eq!(s.shift_in, 1.0);
    assert_eq!(s.lines_alpha, 0.2);
    assert_eq!(s.shift_out, 0.0);
    assert_eq!(s.more_alpha, 0.0);
    assert_eq!(s.less_alpha, 0.0);
}

#[test]
fn decode_finishes_after_slide_in_pulse_and_slide_out() {
    let mut s = sched();
    s.tick(TimeMs(0.0));
    schedule_decode(&mut s, DiagramRole::Decoder, SceneSignal::DecodeFinished).unwrap();
    assert!(is_running(&s, DiagramRole::Decoder));
    assert!(!is_running(&s, DiagramRole::Encoder));

    let signals = run_until(&mut s, 2000.0);
    assert_eq!(signals, vec![(1500.0, SceneSignal::DecodeFinished)]);
    assert!(!is_running(&s, DiagramRole::Decoder));

    let end = NnState::read(&s, DiagramRole::Decoder);
    assert_eq!(end.shift_in, 0.0);
    assert_eq!(end.shift_out, 1.0);
    assert_eq!(end.more_alpha, 2.0);
}

#[test]
fn decode_stages_overlap_as_chained() {
    let mut s = sched();
    s.tick(TimeMs(0.0));
    schedule_decode(&mut s, DiagramRole::Decoder, SceneSignal::DecodeFinished).unwrap();

    s.tick(TimeMs(250.0));
    let mid = NnState::read(&s, DiagramRole::Decoder);
    assert!(mid.shift_in > 0.9 && mid.shift_in < 1.0, "in-expo is slow early");
    assert_eq!(mid.less_alpha, 0.0);

    // less starts at 500 without delay; lines waits 100 ms
    s.tick(TimeMs(650.0));
    let st = NnState::read(&s, DiagramRole::Decoder);
    assert!((st.less_alpha - 1.0).abs() < 1e-9);
    assert!((st.lines_alpha - (0.2 + 1.6 * 0.5 / 3.0 * 1.0)).abs() < 1e-9);
    assert_eq!(st.more_alpha, 0.0);
    assert_eq!(st.shift_out, 0.0);
}

#[test]
fn encode_is_the_mirror_and_finishes_sooner() {
    let mut s = sched();
    s.tick(TimeMs(0.0));
    let last = schedule_encode(&mut s, DiagramRole::Encoder, SceneSignal::EncodeFinished).unwrap();
    s.tick(TimeMs(10.0));
    assert!(NnState::read(&s, DiagramRole::Encoder).shift_out > 0.99);

    let signals = run_until(&mut s, 2000.0);
    assert_eq!(signals, vec![(1300.0, SceneSignal::EncodeFinished)]);
    assert_eq!(s.state(last), None, "finished tweens are pruned on the next tick");
    assert_eq!(NnState::read(&s, DiagramRole::Encoder).shift_in, 1.0);
}

#[test]
fn rescheduling_restarts_the_story() {
    let mut s = sched();
    s.tick(TimeMs(0.0));
    schedule_decode(&mut s, DiagramRole::Decoder, SceneSignal::DecodeFinished).unwrap();
    s.tick(TimeMs(700.0));
    schedule_decode(&mut s, DiagramRole::Decoder, SceneSignal::DecodeFinished).unwrap();

    let mut fired = Vec::new();
    let mut t = 700.0;
    while t <= 3000.0 {
        for sig in s.tick(TimeMs(t)) {
            fired.push((t, sig));
        }
        t += 10.0;
    }
    assert_eq!(fired, vec![(2200.0, SceneSignal::DecodeFinished)]);
}

#[test]
fn body_draws_links_nodes_and_ghosts() {
    let layout = SceneLayout::compute(Viewport::default());
    let draw = |state: &NnState| {
        let mut list = DrawList::new(layout.viewport, palette::BACKGROUND);
        {
            let mut p = Painter::new(&mut list);
            layout.enter(&mut p);
            draw_body(&mut p, &layout, DiagramRole::Decoder, state);
        }
        list
    };

    let idle = NnState {
        shift_in: 1.0,
        lines_alpha: 0.2,
        shift_out: 0.0,
        more_alpha: 0.0,
        less_alpha: 0.0,
    };
    let list = draw(&idle);
    assert_eq!(list.len(), 12 + 3 + 4);
    assert_eq!(list.with_color(palette::WHITE).count(), 7);

    let sliding = NnState {
        shift_in: 0.5,
        more_alpha: 1.0,
        ..idle
    };
    let list = draw(&sliding);
    assert_eq!(list.len(), 12 + 3 + 3 + 4);
    assert_eq!(list.with_color(palette::RED).count(), 4);
}

#[test]
fn shell_labels_each_diagram() {
    let layout = SceneLayout::compute(Viewport::default());
    let mut list = DrawList::new(layout.viewport, palette::BACKGROUND);
    {
        let mut p = Painter::new(&mut list);
        draw_shell(&mut p, &layout, DiagramRole::Encoder);
        draw_shell(&mut p, &layout, DiagramRole::Decoder);
    }
    assert_eq!(list.texts().collect::<Vec<_>>(), vec!["encoder", "decoder"]);
    assert_eq!(list.len(), 2 * (4 + 1));
}
