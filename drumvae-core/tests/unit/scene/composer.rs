use super::*;
use crate::audio::sequencer::{ManualClock, StepSequencer};
use crate::server::client::RecordingClient;

struct Rig {
    composer: SceneComposer,
    seq: StepSequencer,
    client: RecordingClient,
}

fn rig() -> Rig {
    let clock = ManualClock::new();
    let seq = StepSequencer::new(clock, 120.0);
    let client = RecordingClient::default();
    let composer = SceneComposer::new(
        SceneConfig::default(),
        Viewport::default(),
        Box::new(seq.clone()),
        Box::new(client.clone()),
    )
    .unwrap();
    Rig {
        composer,
        seq,
        client,
    }
}

fn payload(on: &[Cell], latent: Latent) -> InferenceResponse {
    let raw = RawPattern::from_fn(|c| if on.contains(&c) { 0.9 } else { 0.0 }).unwrap();
    ServerPayload::new(raw, latent).into()
}

fn latent_with(dim: usize, v: f64) -> Latent {
    let mut l = Latent::zeros();
    l.set(dim, v).unwrap();
    l
}

/// Started, splash dismissed, initial static fetch answered with an empty pattern.
fn ready() -> Rig {
    let mut r = rig();
    r.composer.start().unwrap();
    r.composer.dismiss_splash();
    let (ticket, req) = r.client.take().pop().unwrap();
    assert_eq!(req, InferenceRequest::Static);
    r.composer
        .on_response(ticket, payload(&[], Latent::zeros()))
        .unwrap();
    r.composer.frame(TimeMs(0.0)).unwrap();
    r
}

fn cell(step: usize, channel: usize) -> Cell {
    Cell::new(step, channel).unwrap()
}

#[test]
fn key_codes_map_to_commands() {
    assert_eq!(Key::from_code(32), Some(Key::PlayPause));
    assert_eq!(Key::from_code(65), Some(Key::MultiDisplay));
    assert_eq!(Key::from_code(82), Some(Key::Random));
    assert_eq!(Key::from_code(84), Some(Key::Static));
    assert_eq!(Key::from_code(13), None);
}

#[test]
fn rejects_invalid_config() {
    let cfg = SceneConfig {
        bpm: 400.0,
        ..SceneConfig::default()
    };
    let clock = ManualClock::new();
    let res = SceneComposer::new(
        cfg,
        Viewport::default(),
        Box::new(StepSequencer::new(clock, 120.0)),
        Box::new(RecordingClient::default()),
    );
    assert!(res.is_err());
}

#[test]
fn modes_follow_startup_sequence() {
    let mut r = rig();
    assert_eq!(r.composer.mode(), SceneMode::Splash);
    assert_eq!(r.composer.loading_label(), "loading..0/9");

    r.composer.start().unwrap();
    assert_eq!(r.composer.loading_label(), "play");
    assert_eq!(r.composer.mode(), SceneMode::Splash);

    r.composer.dismiss_splash();
    assert_eq!(r.composer.mode(), SceneMode::AwaitingServer);
    assert_eq!(r.composer.fetch_status(), FetchStatus::Awaiting);

    let (ticket, _) = r.client.last().unwrap();
    let out = r
        .composer
        .on_response(ticket, payload(&[cell(0, 0)], Latent::zeros()))
        .unwrap();
    assert_eq!(
        out,
        ResponseOutcome::Applied {
            pattern: true,
            latent: true
        }
    );
    assert_eq!(r.composer.mode(), SceneMode::Playing);
    assert!(r.seq.is_playing());
    assert!(r.seq.pattern().is_on(cell(0, 0)));
}

#[test]
fn splash_and_loading_frames_are_background_only() {
    let mut r = rig();
    let list = r.composer.frame(TimeMs(0.0)).unwrap();
    assert!(list.is_empty());

    r.composer.dismiss_splash();
    r.composer.on_samples_loaded(4);
    assert_eq!(r.composer.mode(), SceneMode::LoadingSamples);
    assert_eq!(r.composer.loading_label(), "loading..4/9");
    assert!(r.composer.frame(TimeMs(16.0)).unwrap().is_empty());

    r.composer.on_samples_loaded(9);
    assert!(!r.composer.frame(TimeMs(32.0)).unwrap().is_empty());
}

#[test]
fn placeholder_shows_until_first_commit() {
    let mut r = rig();
    r.composer.start().unwrap();
    r.composer.dismiss_splash();
    assert!(r.composer.displayed_pattern().count_on() > 0);
    assert_eq!(r.composer.state().pattern.count_on(), 0);

    let (ticket, _) = r.client.last().unwrap();
    r.composer
        .on_response(ticket, payload(&[], Latent::zeros()))
        .unwrap();
    assert_eq!(r.composer.displayed_pattern().count_on(), 0);
}

#[test]
fn toggling_a_cell_commits_locally_and_runs_encode() {
    let mut r = ready();
    let p = r.composer.cell_point(cell(0, 0));
    r.composer.pointer_down(p).unwrap();

    let state = r.composer.state();
    assert!(state.pattern.is_on(cell(0, 0)));
    assert_eq!(state.diff.len(), 1);
    assert!(r.seq.pattern().is_on(cell(0, 0)));
    assert_eq!(r.seq.cues(), vec![0]);
    assert!(r.composer.latent_gate_held());
    assert_eq!(r.composer.diff_radius_ratio(), 8.0);
    assert!(r.composer.is_transitioning(DiagramRole::Encoder));
    assert_eq!(r.composer.instruction_stage(), 1);

    let (_, req) = r.client.last().unwrap();
    match req {
        InferenceRequest::AdjustData { data } => assert!(data.get(cell(0, 0)) > 0.2),
        other => panic!("unexpected request {other:?}"),
    }
}

#[test]
fn encoded_latent_waits_for_encode_to_finish() {
    let mut r = ready();
    r.composer
        .pointer_down(r.composer.cell_point(cell(3, 2)))
        .unwrap();
    let (ticket, _) = r.client.last().unwrap();

    r.composer.frame(TimeMs(100.0)).unwrap();
    let out = r
        .composer
        .on_response(ticket, payload(&[cell(7, 7)], latent_with(4, 0.08)))
        .unwrap();
    assert_eq!(
        out,
        ResponseOutcome::Applied {
            pattern: false,
            latent: true
        }
    );
    assert_eq!(r.composer.state().latent.get(4), Some(0.0));
    assert!(r.composer.pending_latent().is_some());
    assert!(!r.composer.state().pattern.is_on(cell(7, 7)));

    r.composer.frame(TimeMs(1200.0)).unwrap();
    assert_eq!(r.composer.state().latent.get(4), Some(0.0));

    r.composer.frame(TimeMs(1301.0)).unwrap();
    assert_eq!(r.composer.state().latent.get(4), Some(0.08));
    assert!(!r.composer.latent_gate_held());
    // change ring starts as the encode ends
    let ring = r.composer.param(SceneParam::Change);
    assert!(ring > 0.9 && ring <= 1.0, "ring {ring}");
}

#[test]
fn dragging_a_dimension_sets_value_and_decodes_on_release() {
    let mut r = ready();
    let start = r.composer.latent_point(5, 0.0);
    r.composer.pointer_down(start).unwrap();
    assert_eq!(r.composer.mode(), SceneMode::DraggingLatent);
    assert_eq!(r.composer.state().selected, 5);

    let to = r.composer.latent_point(5, 0.05);
    r.composer.pointer_move(to).unwrap();
    let v = r.composer.state().latent.get(5).unwrap();
    assert!((v - 0.05).abs() < 1e-9, "v {v}");
    assert!(r.client.is_empty());

    r.composer.pointer_up(to).unwrap();
    assert!(r.composer.pattern_gate_held());
    assert_eq!(r.composer.diff_radius_ratio(), 4.0);
    assert!(r.composer.is_transitioning(DiagramRole::Decoder));
    assert_eq!(r.seq.cues(), vec![0]);

    let (ticket, req) = r.client.last().unwrap();
    match req {
        InferenceRequest::AdjustLatent { latent } => {
            assert!((latent.get(5).unwrap() - 0.05).abs() < 1e-9)
        }
        other => panic!("unexpected request {other:?}"),
    }

    r.composer.frame(TimeMs(10.0)).unwrap();
    assert!(r.composer.param(SceneParam::Blink) > 0.9);
    r.composer
        .on_response(ticket, payload(&[cell(10, 1)], Latent::zeros()))
        .unwrap();
    assert!(r.composer.pending_pattern().is_some());
    assert!(!r.seq.pattern().is_on(cell(10, 1)));

    r.composer.frame(TimeMs(1501.0)).unwrap();
    assert!(r.composer.state().pattern.is_on(cell(10, 1)));
    assert!(r.seq.pattern().is_on(cell(10, 1)));
    assert!(!r.composer.pattern_gate_held());
    assert_eq!(r.composer.state().diff.len(), 1);

    r.composer.frame(TimeMs(1511.0)).unwrap();
    let fade = r.composer.param(SceneParam::DiffAlpha);
    assert!(fade > 0.5 && fade < 1.0, "fade {fade}");
}

#[test]
fn dragged_value_is_clamped() {
    let mut r = ready();
    r.composer
        .pointer_down(r.composer.latent_point(0, 0.0))
        .unwrap();
    let g = r.composer.graph_geometry();
    let edge = r.composer.viewport().center()
        + g.center.to_vec2()
        + kurbo::Vec2::new(1.05 * g.unit, 0.0);
    r.composer.pointer_move(edge).unwrap();
    assert_eq!(
        r.composer.state().latent.get(0),
        Some(crate::scene::latent_graph::DRAG_RANGE)
    );
}

#[test]
fn buffered_latent_is_dropped_by_a_newer_encode() {
    let mut r = ready();
    r.composer
        .pointer_down(r.composer.cell_point(cell(3, 2)))
        .unwrap();
    let (first, _) = r.client.last().unwrap();
    r.composer.frame(TimeMs(100.0)).unwrap();
    r.composer
        .on_response(first, payload(&[], latent_with(4, 0.08)))
        .unwrap();
    assert!(r.composer.pending_latent().is_some());

    r.composer.frame(TimeMs(200.0)).unwrap();
    r.composer
        .pointer_down(r.composer.cell_point(cell(9, 1)))
        .unwrap();
    assert!(r.composer.pending_latent().is_none());

    r.composer.frame(TimeMs(3000.0)).unwrap();
    assert!(!r.composer.latent_gate_held());
    assert_eq!(r.composer.state().latent.get(4), Some(0.0));

    let (second, _) = r.client.last().unwrap();
    r.composer
        .on_response(second, payload(&[], latent_with(4, 0.02)))
        .unwrap();
    assert_eq!(r.composer.state().latent.get(4), Some(0.02));
}

#[test]
fn buffered_pattern_is_dropped_by_a_newer_decode() {
    let mut r = ready();
    let drag = |r: &mut Rig, dim: usize, v: f64| {
        let from = r.composer.latent_point(dim, 0.0);
        let to = r.composer.latent_point(dim, v);
        r.composer.pointer_down(from).unwrap();
        r.composer.pointer_move(to).unwrap();
        r.composer.pointer_up(to).unwrap();
    };

    drag(&mut r, 5, 0.03);
    let (first, _) = r.client.last().unwrap();
    r.composer.frame(TimeMs(100.0)).unwrap();
    r.composer
        .on_response(first, payload(&[cell(10, 1)], Latent::zeros()))
        .unwrap();
    assert!(r.composer.pending_pattern().is_some());

    r.composer.frame(TimeMs(200.0)).unwrap();
    drag(&mut r, 7, -0.02);
    assert!(r.composer.pending_pattern().is_none());

    r.composer.frame(TimeMs(3000.0)).unwrap();
    assert!(!r.composer.pattern_gate_held());
    assert!(!r.composer.state().pattern.is_on(cell(10, 1)));
    assert!(!r.seq.pattern().is_on(cell(10, 1)));
}

#[test]
fn click_without_drag_does_not_request() {
    let mut r = ready();
    let p = r.composer.latent_point(12, 0.0);
    r.composer.pointer_down(p).unwrap();
    r.composer.pointer_up(p).unwrap();
    assert_eq!(r.composer.state().selected, 12);
    assert!(r.client.is_empty());
    assert!(!r.composer.pattern_gate_held());
}

#[test]
fn hover_selects_dimension_and_cell() {
    let mut r = ready();
    r.composer
        .pointer_move(r.composer.latent_point(9, 0.0))
        .unwrap();
    assert_eq!(r.composer.state().selected, 9);

    let c = cell(40, 4);
    r.composer.pointer_move(r.composer.cell_point(c)).unwrap();
    assert_eq!(r.composer.state().hover, Some(c));
}

#[test]
fn local_drag_supersedes_in_flight_latent() {
    let mut r = ready();
    r.composer.key(Key::Static).unwrap();
    let (ticket, _) = r.client.take().pop().unwrap();

    let p = r.composer.latent_point(2, 0.0);
    r.composer.pointer_down(p).unwrap();
    r.composer
        .pointer_move(r.composer.latent_point(2, -0.04))
        .unwrap();

    let out = r
        .composer
        .on_response(ticket, payload(&[cell(1, 1)], latent_with(2, 0.09)))
        .unwrap();
    assert_eq!(
        out,
        ResponseOutcome::Applied {
            pattern: true,
            latent: false
        }
    );
    let v = r.composer.state().latent.get(2).unwrap();
    assert!((v + 0.04).abs() < 1e-9);
}

#[test]
fn older_response_is_stale_after_newer_request() {
    let mut r = ready();
    r.composer.key(Key::Static).unwrap();
    r.composer.key(Key::Random).unwrap();
    let mut issued = r.client.take();
    let (rand_ticket, rand_req) = issued.pop().unwrap();
    let (static_ticket, _) = issued.pop().unwrap();
    assert_eq!(rand_req, InferenceRequest::Rand);

    let out = r
        .composer
        .on_response(rand_ticket, payload(&[cell(5, 5)], latent_with(0, 0.01)))
        .unwrap();
    assert!(matches!(out, ResponseOutcome::Applied { .. }));
    let out = r
        .composer
        .on_response(static_ticket, payload(&[cell(6, 6)], latent_with(0, 0.02)))
        .unwrap();
    assert_eq!(out, ResponseOutcome::Stale);
    assert!(r.composer.state().pattern.is_on(cell(5, 5)));
    assert_eq!(r.composer.state().latent.get(0), Some(0.01));

    assert_eq!(
        r.composer
            .on_response(static_ticket, payload(&[], Latent::zeros()))
            .unwrap(),
        ResponseOutcome::Unknown
    );
}

#[test]
fn random_restarts_playback() {
    let mut r = ready();
    r.composer.key(Key::PlayPause).unwrap();
    assert!(!r.composer.is_playing());

    r.composer.key(Key::Random).unwrap();
    let (ticket, _) = r.client.last().unwrap();
    r.composer
        .on_response(ticket, payload(&[], Latent::zeros()))
        .unwrap();
    assert!(r.composer.is_playing());
    assert!(r.seq.is_playing());
}

#[test]
fn malformed_payload_marks_failure() {
    let mut r = ready();
    r.composer.key(Key::Static).unwrap();
    let (ticket, _) = r.client.last().unwrap();
    let bad = InferenceResponse {
        result: Some(vec![vec![0.5; 3]]),
        latent: Some(vec![0.0; LATENT_DIMS]),
    };
    let out = r.composer.on_response(ticket, bad).unwrap();
    assert_eq!(out, ResponseOutcome::Rejected);
    assert_eq!(r.composer.fetch_status(), FetchStatus::Failed);
    assert_eq!(r.composer.state().pattern.count_on(), 0);
}

#[test]
fn transport_failure_marks_failure() {
    let mut r = ready();
    r.composer.key(Key::Random).unwrap();
    let (ticket, _) = r.client.last().unwrap();
    r.composer.on_request_failed(ticket, "connection refused");
    assert_eq!(r.composer.fetch_status(), FetchStatus::Failed);
    assert_eq!(r.composer.in_flight(), 0);

    r.composer.key(Key::Static).unwrap();
    assert_eq!(r.composer.fetch_status(), FetchStatus::Awaiting);
}

#[test]
fn keys_are_ignored_before_interactive() {
    let mut r = rig();
    r.composer.key(Key::Random).unwrap();
    r.composer.key(Key::MultiDisplay).unwrap();
    assert!(r.client.is_empty());
    assert!(!r.composer.multi_display());
}

#[test]
fn multi_display_adds_decorative_graphs() {
    let mut r = ready();
    let single = r.composer.frame(TimeMs(16.0)).unwrap().len();
    r.composer.key(Key::MultiDisplay).unwrap();
    assert!(r.composer.multi_display());
    let multi = r.composer.frame(TimeMs(32.0)).unwrap().len();
    assert!(multi > single);
}

#[test]
fn instruction_stage_caps_at_two() {
    let mut r = ready();
    for step in [0, 1, 2] {
        r.composer
            .pointer_down(r.composer.cell_point(cell(step, 3)))
            .unwrap();
    }
    assert_eq!(r.composer.instruction_stage(), 1);

    for _ in 0..2 {
        let p = r.composer.latent_point(7, 0.0);
        r.composer.pointer_down(p).unwrap();
        r.composer
            .pointer_move(r.composer.latent_point(7, 0.03))
            .unwrap();
        r.composer.pointer_up(p).unwrap();
    }
    assert_eq!(r.composer.instruction_stage(), 2);
}

#[test]
fn gate_change_regates_current_pattern() {
    let mut r = ready();
    let (ticket_raw, raw) = {
        r.composer.key(Key::Static).unwrap();
        let (t, _) = r.client.last().unwrap();
        let raw = RawPattern::from_fn(|c| if c == cell(0, 8) { 0.5 } else { 0.0 }).unwrap();
        (t, raw)
    };
    r.composer
        .on_response(ticket_raw, ServerPayload::new(raw, Latent::zeros()).into())
        .unwrap();
    assert!(r.composer.state().pattern.is_on(cell(0, 8)));

    r.composer.set_gate(Gate::new(0.6).unwrap()).unwrap();
    assert!(!r.composer.state().pattern.is_on(cell(0, 8)));
    assert!(!r.seq.pattern().is_on(cell(0, 8)));
}

#[test]
fn tempo_is_validated() {
    let mut r = ready();
    assert!(r.composer.set_tempo(200.0).is_err());
    r.composer.set_tempo(90.0).unwrap();
    assert_eq!(r.seq.bpm(), 90.0);
}

#[test]
fn frame_draws_both_diagram_labels() {
    let mut r = ready();
    let list = r.composer.frame(TimeMs(16.0)).unwrap();
    let texts: Vec<&str> = list.texts().collect();
    assert!(texts.contains(&"encoder"));
    assert!(texts.contains(&"decoder"));
}
