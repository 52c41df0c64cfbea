use super::*;
use crate::foundation::core::Viewport;
use crate::model::latent::Latent;
use crate::model::pattern::RawPattern;
use crate::scene::composer::{FetchStatus, Key};
use crate::scene::config::SceneConfig;
use crate::server::protocol::{Endpoint, ServerPayload};
use crate::session::script::CannedResponse;

fn silent_static() -> CannedResponse {
    CannedResponse {
        endpoint: Endpoint::Static,
        response: Some(ServerPayload::new(RawPattern::zeros(), Latent::zeros()).into()),
        error: None,
    }
}

fn script(events: Vec<TimedEvent>, responses: Vec<CannedResponse>) -> SessionScript {
    SessionScript {
        viewport: Viewport::new(320.0, 200.0, 1.0).unwrap(),
        config: SceneConfig::default(),
        fps: 10.0,
        duration_ms: 3000.0,
        latency_ms: 100.0,
        responses,
        events,
    }
}

fn at(ms: f64, event: SessionEvent) -> TimedEvent {
    TimedEvent { at_ms: ms, event }
}

fn session(events: Vec<TimedEvent>) -> HeadlessSession {
    HeadlessSession::new(
        script(events, vec![silent_static()]),
        &RenderSettings::default(),
    )
    .unwrap()
}

#[test]
fn initial_static_reply_starts_playback() {
    let mut s = session(vec![at(0.0, SessionEvent::DismissSplash)]);
    s.advance_to(TimeMs(50.0)).unwrap();
    assert_eq!(s.composer().fetch_status(), FetchStatus::Awaiting);
    assert!(!s.sequencer().is_playing());

    s.advance_to(TimeMs(150.0)).unwrap();
    assert_eq!(s.composer().fetch_status(), FetchStatus::Idle);
    assert!(s.composer().is_playing());
    assert!(s.sequencer().is_playing());
    assert_eq!(s.sequencer().samples_loaded(), 9);
}

#[test]
fn cell_press_round_trip_commits_latent_after_encode() {
    let mut s = session(vec![
        at(0.0, SessionEvent::DismissSplash),
        at(
            500.0,
            SessionEvent::PressCell {
                step: 4,
                channel: 0,
            },
        ),
    ]);
    for i in 0..=5 {
        s.plan_at(TimeMs(i as f64 * 100.0)).unwrap();
    }
    let cell = Cell::new(4, 0).unwrap();
    assert!(s.composer().state().pattern.is_on(cell));
    assert!(s.sequencer().pattern().is_on(cell));
    assert!(s.composer().latent_gate_held());
    assert_eq!(s.server().submitted(), 2);

    // the reply lands at 600 but waits for the encode to finish
    s.plan_at(TimeMs(700.0)).unwrap();
    assert!(s.composer().pending_latent().is_some());
    assert_eq!(s.composer().state().latent, Latent::zeros());

    let mut t = 800.0;
    while t <= 2200.0 {
        s.plan_at(TimeMs(t)).unwrap();
        t += 100.0;
    }
    assert!(!s.composer().latent_gate_held());
    assert_ne!(s.composer().state().latent, Latent::zeros());
}

#[test]
fn drag_event_sets_dimension_and_holds_pattern() {
    let mut s = session(vec![
        at(0.0, SessionEvent::DismissSplash),
        at(300.0, SessionEvent::DragLatent { dim: 3, value: 0.04 }),
    ]);
    s.plan_at(TimeMs(0.0)).unwrap();
    s.plan_at(TimeMs(200.0)).unwrap();
    s.plan_at(TimeMs(300.0)).unwrap();
    let v = s.composer().state().latent.get(3).unwrap();
    assert!((v - 0.04).abs() < 1e-9, "v {v}");
    assert!(s.composer().pattern_gate_held());
}

#[test]
fn failed_request_is_reported() {
    let mut s = HeadlessSession::new(
        script(
            vec![
                at(0.0, SessionEvent::DismissSplash),
                at(200.0, SessionEvent::Key { key: Key::Random }),
            ],
            vec![
                silent_static(),
                CannedResponse {
                    endpoint: Endpoint::Rand,
                    response: None,
                    error: Some("offline".to_owned()),
                },
            ],
        ),
        &RenderSettings::default(),
    )
    .unwrap();
    s.advance_to(TimeMs(250.0)).unwrap();
    assert_eq!(s.composer().fetch_status(), FetchStatus::Awaiting);
    s.advance_to(TimeMs(300.0)).unwrap();
    assert_eq!(s.composer().fetch_status(), FetchStatus::Failed);
}

#[test]
fn time_cannot_go_backwards() {
    let mut s = session(Vec::new());
    s.advance_to(TimeMs(100.0)).unwrap();
    assert!(s.advance_to(TimeMs(50.0)).is_err());
}

#[test]
fn out_of_range_drag_is_an_error() {
    let mut s = session(vec![
        at(0.0, SessionEvent::DismissSplash),
        at(10.0, SessionEvent::DragLatent { dim: 40, value: 0.0 }),
    ]);
    assert!(s.advance_to(TimeMs(20.0)).is_err());
}

#[test]
fn renders_every_frame_at_device_size() {
    let mut sc = script(vec![at(0.0, SessionEvent::DismissSplash)], vec![silent_static()]);
    sc.duration_ms = 400.0;
    sc.fps = 5.0;
    let mut s = HeadlessSession::new(sc, &RenderSettings::default()).unwrap();
    let frames = s.render_frames().unwrap();
    assert_eq!(frames.len(), 3);
    for f in &frames {
        assert_eq!((f.width, f.height), (320, 200));
        assert_eq!(f.data.len(), 320 * 200 * 4);
        assert!(f.premultiplied);
    }
    assert_eq!(s.now(), TimeMs(400.0));
}
