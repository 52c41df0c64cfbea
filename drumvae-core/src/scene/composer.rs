use std::collections::BTreeMap;

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    animation::ease::Ease,
    animation::scheduler::Scheduler,
    animation::tween::TweenSpec,
    audio::playback::AudioPlayback,
    foundation::core::{LATENT_DIMS, Point, TimeMs, Viewport, palette},
    foundation::error::{DrumVaeError, DrumVaeResult},
    model::latent::Latent,
    model::pattern::{Cell, DiffSet, Gate, GatedPattern, RawPattern},
    render::plan::{DrawList, Painter},
    scene::config::{MAX_BPM, MIN_BPM, SceneConfig},
    scene::decor::{DECOR_GRAPHS, DecorNoise},
    scene::grid::{GridView, pointer_to_cell},
    scene::latent_graph::{
        GraphConfig, GraphDecorations, GraphGeometry, Indication, LatentGraph, drag_value,
        pointer_to_dimension,
    },
    scene::layout::SceneLayout,
    scene::params::{DiagramRole, SceneParam, SceneSignal},
    scene::transition::{self, NnState},
    server::client::{InferenceClient, RequestTicket},
    server::protocol::{InferenceRequest, InferenceResponse, ServerPayload},
};

const INITIAL_RADIUS_RATIO: f64 = 0.65;
const RING_DECAY_MS: f64 = 600.0;
const PLACEHOLDER_EVERY: u64 = 5;
const MAX_INSTRUCTION_STAGE: u8 = 2;
const DECODE_DIFF_RADIUS: f64 = 4.0;
const ENCODE_DIFF_RADIUS: f64 = 8.0;
const EDIT_CUE: usize = 0;

/// Discrete keyboard commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    PlayPause,
    MultiDisplay,
    Random,
    Static,
}

impl Key {
    /// Map a DOM key code (space, `a`, `r`, `t`).
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            32 => Some(Self::PlayPause),
            65 => Some(Self::MultiDisplay),
            82 => Some(Self::Random),
            84 => Some(Self::Static),
            _ => None,
        }
    }
}

/// Coarse state exposed to the application shell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneMode {
    Splash,
    LoadingSamples,
    Playing,
    Paused,
    DraggingLatent,
    AwaitingServer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchStatus {
    Idle,
    Awaiting,
    /// The most recent request settled with an error and nothing is in flight.
    Failed,
}

/// What happened to a server completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// At least one channel was applied (possibly deferred behind a commit gate).
    Applied { pattern: bool, latent: bool },
    /// Newer requests or local edits superseded every channel it carried.
    Stale,
    /// The payload failed validation; prior state is kept.
    Rejected,
    /// No such request in flight.
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OnArrival {
    Nothing,
    TogglePlayback,
    RestartPlayback,
}

#[derive(Clone, Copy, Debug)]
struct InFlight {
    ticket: RequestTicket,
    pattern_gen: Option<u64>,
    latent_gen: Option<u64>,
    on_arrival: OnArrival,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Gesture {
    Idle,
    Dragging { moved: bool },
}

/// Data owned by the composer and read by every renderer.
#[derive(Clone, Debug)]
pub struct SceneState {
    pub raw: RawPattern,
    /// Committed gated pattern: what is drawn and played.
    pub pattern: GatedPattern,
    pub latent: Latent,
    pub diff: DiffSet,
    pub selected: usize,
    pub hover: Option<Cell>,
}

/// Top-level scene: owns all state, advances animations, renders frames, and routes input and
/// server completions through the gated commit paths.
pub struct SceneComposer {
    config: SceneConfig,
    viewport: Viewport,
    state: SceneState,
    sched: Scheduler<SceneParam, SceneSignal>,
    graph: LatentGraph,
    decor_graphs: [LatentGraph; DECOR_GRAPHS],
    decor: DecorNoise,
    rng: StdRng,
    placeholder: Option<GatedPattern>,

    hold_pattern: bool,
    hold_latent: bool,
    pending_pattern: Option<(GatedPattern, DiffSet)>,
    pending_latent: Option<Latent>,
    diff_radius_ratio: f64,

    next_seq: u64,
    pattern_gen: u64,
    latent_gen: u64,
    in_flight: BTreeMap<u64, InFlight>,
    last_failed: bool,

    splash_visible: bool,
    samples_loaded: u32,
    playing: bool,
    gesture: Gesture,
    multi_display: bool,
    instruction_stage: u8,
    toggled_once: bool,
    dragged_once: bool,
    frame_count: u64,

    audio: Box<dyn AudioPlayback>,
    client: Box<dyn InferenceClient>,
}

impl SceneComposer {
    pub fn new(
        config: SceneConfig,
        viewport: Viewport,
        audio: Box<dyn AudioPlayback>,
        client: Box<dyn InferenceClient>,
    ) -> DrumVaeResult<Self> {
        config.validate()?;
        viewport.validate()?;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let placeholder = GatedPattern::random(&mut rng, config.placeholder_density);
        let decor = DecorNoise::new(&mut rng);

        Ok(Self {
            state: SceneState {
                raw: RawPattern::zeros(),
                pattern: GatedPattern::empty(),
                latent: Latent::zeros(),
                diff: DiffSet::default(),
                selected: config.initial_selection,
                hover: None,
            },
            config,
            viewport,
            sched: Scheduler::new(),
            graph: LatentGraph::new(GraphConfig::primary())
                .with_initial_radius_ratio(INITIAL_RADIUS_RATIO),
            decor_graphs: [
                LatentGraph::new(GraphConfig::decorative(0.6 + 0.75)),
                LatentGraph::new(GraphConfig::decorative(0.6)),
                LatentGraph::new(GraphConfig::decorative(0.6 - 0.75)),
            ],
            decor,
            rng,
            placeholder: Some(placeholder),
            hold_pattern: false,
            hold_latent: false,
            pending_pattern: None,
            pending_latent: None,
            diff_radius_ratio: DECODE_DIFF_RADIUS,
            next_seq: 0,
            pattern_gen: 0,
            latent_gen: 0,
            in_flight: BTreeMap::new(),
            last_failed: false,
            splash_visible: true,
            samples_loaded: 0,
            playing: false,
            gesture: Gesture::Idle,
            multi_display: false,
            instruction_stage: 0,
            toggled_once: false,
            dragged_once: false,
            frame_count: 0,
            audio,
            client,
        })
    }

    // ---- accessors ------------------------------------------------------------------------

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn layout(&self) -> SceneLayout {
        SceneLayout::compute(self.viewport)
    }

    /// Placement of the interactive latent graph for the current frame.
    pub fn graph_geometry(&self) -> GraphGeometry {
        self.graph.geometry(&self.layout())
    }

    /// Pattern the grid shows: the placeholder until real data is committed.
    pub fn displayed_pattern(&self) -> &GatedPattern {
        self.placeholder.as_ref().unwrap_or(&self.state.pattern)
    }

    pub fn param(&self, p: SceneParam) -> f64 {
        self.sched.value(p)
    }

    pub fn diff_radius_ratio(&self) -> f64 {
        self.diff_radius_ratio
    }

    pub fn pattern_gate_held(&self) -> bool {
        self.hold_pattern
    }

    pub fn latent_gate_held(&self) -> bool {
        self.hold_latent
    }

    pub fn pending_latent(&self) -> Option<&Latent> {
        self.pending_latent.as_ref()
    }

    pub fn pending_pattern(&self) -> Option<&GatedPattern> {
        self.pending_pattern.as_ref().map(|(p, _)| p)
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn multi_display(&self) -> bool {
        self.multi_display
    }

    pub fn instruction_stage(&self) -> u8 {
        self.instruction_stage
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_transitioning(&self, role: DiagramRole) -> bool {
        transition::is_running(&self.sched, role)
    }

    pub fn fetch_status(&self) -> FetchStatus {
        if !self.in_flight.is_empty() {
            FetchStatus::Awaiting
        } else if self.last_failed {
            FetchStatus::Failed
        } else {
            FetchStatus::Idle
        }
    }

    pub fn mode(&self) -> SceneMode {
        if self.splash_visible {
            SceneMode::Splash
        } else if self.samples_loaded < self.config.sample_count {
            SceneMode::LoadingSamples
        } else if matches!(self.gesture, Gesture::Dragging { .. }) {
            SceneMode::DraggingLatent
        } else if !self.in_flight.is_empty() {
            SceneMode::AwaitingServer
        } else if self.playing {
            SceneMode::Playing
        } else {
            SceneMode::Paused
        }
    }

    /// Text for the shell's play button.
    pub fn loading_label(&self) -> String {
        if self.samples_loaded < self.config.sample_count {
            format!("loading..{}/{}", self.samples_loaded, self.config.sample_count)
        } else {
            "play".to_owned()
        }
    }

    /// Viewport position of a cell center.
    pub fn cell_point(&self, cell: Cell) -> Point {
        self.viewport.center() + self.layout().cell_center(cell).to_vec2()
    }

    /// Viewport position where dimension `dim` would sit carrying `value`.
    pub fn latent_point(&self, dim: usize, value: f64) -> Point {
        let g = self.graph_geometry();
        self.viewport.center() + g.center.to_vec2() + g.dim_offset(dim, LATENT_DIMS, value)
    }

    // ---- shell lifecycle ------------------------------------------------------------------

    /// Apply tempo, load samples, and request the initial pattern (which starts playback).
    pub fn start(&mut self) -> DrumVaeResult<()> {
        self.audio.set_tempo(self.config.bpm);
        let mut counts = Vec::new();
        self.audio.load_samples(&mut |n| counts.push(n))?;
        for n in counts {
            self.on_samples_loaded(n);
        }
        self.issue(InferenceRequest::Static, OnArrival::TogglePlayback);
        Ok(())
    }

    pub fn on_samples_loaded(&mut self, count: u32) {
        self.samples_loaded = self.samples_loaded.max(count);
        if self.samples_loaded >= self.config.sample_count {
            tracing::debug!(count = self.samples_loaded, "all samples loaded");
        }
    }

    pub fn dismiss_splash(&mut self) {
        self.splash_visible = false;
    }

    pub fn resize(&mut self, viewport: Viewport) -> DrumVaeResult<()> {
        viewport.validate()?;
        self.viewport = viewport;
        Ok(())
    }

    /// Change the binarization threshold and re-gate the current raw pattern.
    pub fn set_gate(&mut self, gate: Gate) -> DrumVaeResult<()> {
        self.config.gate = gate;
        let raw = self.state.raw.clone();
        self.set_pattern_from_raw(raw)
    }

    pub fn set_tempo(&mut self, bpm: f64) -> DrumVaeResult<()> {
        if !(bpm.is_finite() && (MIN_BPM..=MAX_BPM).contains(&bpm)) {
            return Err(DrumVaeError::validation(format!(
                "bpm must be within [{MIN_BPM}, {MAX_BPM}], got {bpm}"
            )));
        }
        self.config.bpm = bpm;
        self.audio.set_tempo(bpm);
        Ok(())
    }

    pub fn toggle_multi_display(&mut self) {
        self.multi_display = !self.multi_display;
        let config = if self.multi_display {
            GraphConfig::primary_multi()
        } else {
            GraphConfig::primary()
        };
        self.graph.set_config(config);
    }

    fn interactive(&self) -> bool {
        !self.splash_visible && self.samples_loaded >= self.config.sample_count
    }

    // ---- gated commit paths ---------------------------------------------------------------

    /// Binarize `raw`, diff it against the committed pattern, and commit it unless the pattern
    /// gate is held, in which case it waits for the decode transition to finish.
    pub fn set_pattern_from_raw(&mut self, raw: RawPattern) -> DrumVaeResult<()> {
        let gated = raw.gated(self.config.gate);
        self.state.raw = raw;
        let diff = self.state.pattern.diff(&gated);
        if self.hold_pattern {
            tracing::debug!(changed = diff.len(), "pattern deferred behind decode");
            self.pending_pattern = Some((gated, diff));
            return Ok(());
        }
        self.commit_pattern(gated, diff)
    }

    /// Commit `latent` unless the latent gate is held by an encode transition.
    pub fn set_latent(&mut self, latent: Latent) {
        if self.hold_latent {
            tracing::debug!("latent deferred behind encode");
            self.pending_latent = Some(latent);
            return;
        }
        self.state.latent = latent;
    }

    fn commit_pattern(&mut self, gated: GatedPattern, diff: DiffSet) -> DrumVaeResult<()> {
        let changed = !diff.is_empty();
        self.state.diff = diff;
        if changed {
            self.sched.spawn(
                TweenSpec::new(SceneParam::DiffAlpha, 1.0, 0.0, self.config.diff_fade_ms)
                    .ease(Ease::OutExpo),
            )?;
        }
        self.state.pattern = gated;
        self.placeholder = None;
        self.audio.set_pattern(&self.state.pattern);
        Ok(())
    }

    fn on_signal(&mut self, signal: SceneSignal) -> DrumVaeResult<()> {
        match signal {
            SceneSignal::DecodeFinished => {
                self.hold_pattern = false;
                if let Some((pattern, diff)) = self.pending_pattern.take() {
                    tracing::debug!("decode finished; committing deferred pattern");
                    self.commit_pattern(pattern, diff)?;
                }
            }
            SceneSignal::EncodeFinished => {
                self.hold_latent = false;
                if let Some(latent) = self.pending_latent.take() {
                    tracing::debug!("encode finished; committing deferred latent");
                    self.state.latent = latent;
                }
            }
        }
        Ok(())
    }

    // ---- requests -------------------------------------------------------------------------

    fn issue(&mut self, request: InferenceRequest, on_arrival: OnArrival) -> RequestTicket {
        self.next_seq += 1;
        let endpoint = request.endpoint();
        let ticket = RequestTicket {
            seq: self.next_seq,
            endpoint,
        };
        let mut pattern_gen = None;
        if endpoint.writes_pattern() {
            self.pattern_gen += 1;
            pattern_gen = Some(self.pattern_gen);
            self.pending_pattern = None;
        }
        let mut latent_gen = None;
        if endpoint.writes_latent() {
            self.latent_gen += 1;
            latent_gen = Some(self.latent_gen);
            self.pending_latent = None;
        }
        self.in_flight.insert(
            ticket.seq,
            InFlight {
                ticket,
                pattern_gen,
                latent_gen,
                on_arrival,
            },
        );
        self.last_failed = false;

        tracing::debug!(seq = ticket.seq, ?endpoint, "request issued");
        if let Err(err) = self.client.submit(ticket, request) {
            tracing::warn!(seq = ticket.seq, ?endpoint, %err, "request could not be submitted");
            self.in_flight.remove(&ticket.seq);
            self.last_failed = true;
        }
        ticket
    }

    /// Deliver a server completion. Channels superseded by newer requests or local edits are
    /// discarded; malformed payloads are rejected and leave state untouched.
    pub fn on_response(
        &mut self,
        ticket: RequestTicket,
        response: InferenceResponse,
    ) -> DrumVaeResult<ResponseOutcome> {
        let Some(flight) = self.in_flight.remove(&ticket.seq) else {
            tracing::debug!(seq = ticket.seq, "response for unknown request ignored");
            return Ok(ResponseOutcome::Unknown);
        };

        let payload = match ServerPayload::try_from(response) {
            Ok(p) => p,
            Err(err) => {
                tracing::warn!(seq = ticket.seq, endpoint = ?flight.ticket.endpoint, %err, "payload rejected");
                self.last_failed = true;
                return Ok(ResponseOutcome::Rejected);
            }
        };

        match flight.on_arrival {
            OnArrival::Nothing => {}
            OnArrival::TogglePlayback => self.playing = self.audio.toggle_start_stop(),
            OnArrival::RestartPlayback => {
                self.audio.start_clock();
                self.playing = true;
            }
        }

        let pattern = flight.pattern_gen == Some(self.pattern_gen);
        let latent = flight.latent_gen == Some(self.latent_gen);
        if !pattern && !latent {
            tracing::debug!(seq = ticket.seq, "stale response discarded");
            return Ok(ResponseOutcome::Stale);
        }
        if pattern {
            self.set_pattern_from_raw(payload.result)?;
        }
        if latent {
            self.set_latent(payload.latent);
        }
        Ok(ResponseOutcome::Applied { pattern, latent })
    }

    pub fn on_request_failed(&mut self, ticket: RequestTicket, reason: &str) {
        if self.in_flight.remove(&ticket.seq).is_some() {
            tracing::warn!(seq = ticket.seq, endpoint = ?ticket.endpoint, reason, "request failed");
            self.last_failed = true;
        }
    }

    // ---- input ----------------------------------------------------------------------------

    /// Press at a viewport position: the latent graph wins over the grid.
    pub fn pointer_down(&mut self, p: Point) -> DrumVaeResult<()> {
        if !self.interactive() {
            return Ok(());
        }
        let layout = self.layout();
        let sp = layout.to_scene(p);
        let geom = self.graph.geometry(&layout);
        if let Some(dim) = pointer_to_dimension(&geom, sp, LATENT_DIMS) {
            self.state.selected = dim;
            self.gesture = Gesture::Dragging { moved: false };
            return Ok(());
        }
        if let Some(cell) = pointer_to_cell(&layout, sp) {
            self.toggle_cell(cell)?;
        }
        Ok(())
    }

    pub fn pointer_move(&mut self, p: Point) -> DrumVaeResult<()> {
        let layout = self.layout();
        let sp = layout.to_scene(p);
        self.graph.set_pointer(&layout, sp);
        if !self.interactive() {
            return Ok(());
        }
        let geom = self.graph.geometry(&layout);
        match self.gesture {
            Gesture::Dragging { .. } => {
                if let Some(v) = drag_value(&geom, sp) {
                    self.state.latent.set(self.state.selected, v)?;
                    self.latent_gen += 1;
                    self.pending_latent = None;
                    self.gesture = Gesture::Dragging { moved: true };
                }
            }
            Gesture::Idle => {
                self.state.hover = pointer_to_cell(&layout, sp);
                if let Some(dim) = pointer_to_dimension(&geom, sp, LATENT_DIMS) {
                    self.state.selected = dim;
                }
            }
        }
        Ok(())
    }

    pub fn pointer_up(&mut self, _p: Point) -> DrumVaeResult<()> {
        let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);
        if gesture == (Gesture::Dragging { moved: true }) {
            self.release_drag()?;
        }
        Ok(())
    }

    pub fn key(&mut self, key: Key) -> DrumVaeResult<()> {
        if !self.interactive() {
            return Ok(());
        }
        match key {
            Key::PlayPause => self.playing = self.audio.toggle_start_stop(),
            Key::MultiDisplay => self.toggle_multi_display(),
            Key::Random => {
                self.issue(InferenceRequest::Rand, OnArrival::RestartPlayback);
            }
            Key::Static => {
                self.issue(InferenceRequest::Static, OnArrival::Nothing);
            }
        }
        Ok(())
    }

    /// Grid edit: commit locally, then tell the encode story and ask for the new latent.
    fn toggle_cell(&mut self, cell: Cell) -> DrumVaeResult<()> {
        self.state.raw.toggle(cell, self.config.gate);
        self.pattern_gen += 1;
        let raw = self.state.raw.clone();
        self.set_pattern_from_raw(raw)?;
        self.audio.play_cue(EDIT_CUE);

        self.hold_latent = true;
        self.diff_radius_ratio = ENCODE_DIFF_RADIUS;
        let last = transition::schedule_encode(
            &mut self.sched,
            DiagramRole::Encoder,
            SceneSignal::EncodeFinished,
        )?;
        let change = self.sched.add(
            TweenSpec::new(SceneParam::Change, 1.0, 0.0, RING_DECAY_MS).ease(Ease::OutQuad),
        )?;
        self.sched.chain(last, &[change])?;

        let data = self.state.raw.clone();
        self.issue(InferenceRequest::AdjustData { data }, OnArrival::Nothing);
        if !std::mem::replace(&mut self.toggled_once, true) {
            self.advance_instruction();
        }
        Ok(())
    }

    /// Latent edit finished: tell the decode story and ask for the new pattern.
    fn release_drag(&mut self) -> DrumVaeResult<()> {
        self.hold_pattern = true;
        self.audio.play_cue(EDIT_CUE);
        self.diff_radius_ratio = DECODE_DIFF_RADIUS;
        self.sched.spawn(
            TweenSpec::new(SceneParam::Blink, 1.0, 0.0, RING_DECAY_MS).ease(Ease::OutQuad),
        )?;
        transition::schedule_decode(
            &mut self.sched,
            DiagramRole::Decoder,
            SceneSignal::DecodeFinished,
        )?;

        let latent = self.state.latent;
        self.issue(InferenceRequest::AdjustLatent { latent }, OnArrival::Nothing);
        if !std::mem::replace(&mut self.dragged_once, true) {
            self.advance_instruction();
        }
        Ok(())
    }

    fn advance_instruction(&mut self) {
        self.instruction_stage = (self.instruction_stage + 1).min(MAX_INSTRUCTION_STAGE);
    }

    // ---- frame ----------------------------------------------------------------------------

    /// Advance animations to `now`, apply any transition completions, then draw.
    #[tracing::instrument(skip(self), fields(frame = self.frame_count))]
    pub fn frame(&mut self, now: TimeMs) -> DrumVaeResult<DrawList> {
        for signal in self.sched.tick(now) {
            self.on_signal(signal)?;
        }

        if self.placeholder.is_some() && self.frame_count % PLACEHOLDER_EVERY == 0 {
            self.placeholder = Some(GatedPattern::random(
                &mut self.rng,
                self.config.placeholder_density,
            ));
        }
        self.frame_count += 1;

        let mut list = DrawList::new(self.viewport, palette::BACKGROUND);
        if !self.interactive() {
            return Ok(list);
        }

        let layout = self.layout();
        let beat = self.audio.current_beat_index();
        let geom = self.graph.geometry(&layout);
        let indication = if !self.config.show_indication {
            Indication::Hidden
        } else {
            match self.fetch_status() {
                FetchStatus::Idle => Indication::Hidden,
                FetchStatus::Awaiting => Indication::Awaiting,
                FetchStatus::Failed => Indication::Failed,
            }
        };

        {
            let mut painter = Painter::new(&mut list);
            layout.enter(&mut painter);

            for role in [DiagramRole::Encoder, DiagramRole::Decoder] {
                transition::draw_shell(&mut painter, &layout, role);
                if transition::is_running(&self.sched, role) {
                    let s = NnState::read(&self.sched, role);
                    transition::draw_body(&mut painter, &layout, role, &s);
                }
            }

            GridView {
                pattern: self.placeholder.as_ref().unwrap_or(&self.state.pattern),
                beat,
                hover: self.state.hover,
                diff: &self.state.diff,
                diff_alpha: self.sched.value(SceneParam::DiffAlpha),
                diff_radius_ratio: self.diff_radius_ratio,
                graph_radius: geom.base_radius,
                frame_count: self.frame_count,
            }
            .draw(&mut painter, &layout);

            self.graph.draw(
                &mut painter,
                &layout,
                self.state.latent.values(),
                &GraphDecorations {
                    selected: Some(self.state.selected),
                    blink: self.sched.value(SceneParam::Blink),
                    change: self.sched.value(SceneParam::Change),
                    indication,
                    frame_count: self.frame_count,
                },
            );

            if self.multi_display {
                let values = self.decor.sample(&mut self.rng, self.frame_count);
                let deco = GraphDecorations {
                    frame_count: self.frame_count,
                    ..GraphDecorations::default()
                };
                for (graph, latent) in self.decor_graphs.iter().zip(values.iter()) {
                    graph.draw(&mut painter, &layout, latent.values(), &deco);
                }
            }
        }

        self.graph.advance();
        Ok(list)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/composer.rs"]
mod tests;
