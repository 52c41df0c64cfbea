//! DrumVAE is the animated scene engine behind an interactive drum-pattern VAE demo.
//!
//! A 96×9 step-sequencer grid and a 32-dimensional radial latent graph stay synchronized with a
//! running beat clock, asynchronous inference-server replies and live pointer edits. Encoder and
//! decoder diagrams narrate each round trip, and commit gates hold incoming data back until the
//! matching transition has finished.
//!
//! # Pipeline overview
//!
//! 1. **Input**: pointer, key and server events enter through [`SceneComposer`].
//! 2. **Animate**: [`Scheduler`] advances chained tweens and emits completion signals that
//!    release the commit gates.
//! 3. **Plan**: every frame becomes a backend-agnostic [`DrawList`] in viewport pixels.
//! 4. **Render** (optional): [`CpuBackend`] rasterizes the list into premultiplied [`FrameRGBA`].
//!
//! Audio playback and the inference server are collaborators behind [`AudioPlayback`] and
//! [`InferenceClient`]. [`HeadlessSession`] wires the composer to in-process stand-ins so scripted
//! sessions can be rendered without a browser.
#![forbid(unsafe_code)]

mod animation;
mod audio;
mod foundation;
mod model;
mod render;
mod scene;
mod server;
mod session;

pub use animation::ease::Ease;
pub use animation::scheduler::Scheduler;
pub use animation::tween::{AnimParam, TweenId, TweenSpec, TweenState};
pub use audio::playback::AudioPlayback;
pub use audio::sequencer::{
    CHANNEL_GAIN_DB, ManualClock, SAMPLE_COUNT, StepSequencer, step_duration_ms,
};
pub use foundation::core::{
    Affine, BezPath, CHANNELS, DIAGRAM_DIMS, LATENT_DIMS, Point, Rect, Rgba8, STEPS, TimeMs, Vec2,
    Viewport, palette,
};
pub use foundation::error::{DrumVaeError, DrumVaeResult};
pub use foundation::math::{clamp, lerp, lerp_color, map_range, pulse};
pub use model::latent::{DiagramLatent, Latent, LatentVector};
pub use model::pattern::{Cell, DiffEntry, DiffSet, Gate, GatedPattern, RawPattern};
pub use render::backend::{BackendKind, FrameRGBA, RenderBackend, RenderSettings, create_backend};
pub use render::cpu::CpuBackend;
pub use render::plan::{DrawList, DrawOp, Painter, TextAlign};
pub use render::text::TextLayoutEngine;
pub use scene::composer::{
    FetchStatus, Key, ResponseOutcome, SceneComposer, SceneMode, SceneState,
};
pub use scene::config::{MAX_BPM, MIN_BPM, SceneConfig};
pub use scene::decor::{DECOR_AMPLITUDE, DECOR_GRAPHS, DecorNoise};
pub use scene::grid::{CellKind, CellStyle, GridView, cell_style, pointer_to_cell};
pub use scene::latent_graph::{
    DRAG_RANGE, GraphConfig, GraphDecorations, GraphGeometry, Indication, LatentGraph, Quadrant,
    ValueLabel, drag_value, format_value, pointer_to_dimension, value_label,
};
pub use scene::layout::{SceneLayout, draw_corner_frame};
pub use scene::params::{DiagramRole, NnParam, SceneParam, SceneSignal};
pub use scene::transition::{
    NnState, SceneScheduler, draw_body, draw_shell, is_running, schedule_decode, schedule_encode,
};
pub use server::client::{InferenceClient, RecordingClient, RequestTicket};
pub use server::protocol::{
    Endpoint, HttpMethod, InferenceRequest, InferenceResponse, ServerPayload,
};
pub use session::fixture::{DueReply, FixtureReply, FixtureServer};
pub use session::headless::HeadlessSession;
pub use session::script::{CannedResponse, SessionEvent, SessionScript, TimedEvent};
