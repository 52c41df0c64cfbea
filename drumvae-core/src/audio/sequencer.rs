use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use crate::{
    audio::playback::AudioPlayback,
    foundation::core::{CHANNELS, STEPS, TimeMs},
    foundation::error::DrumVaeResult,
    model::pattern::GatedPattern,
};

/// Per-channel playback gain in dB: kick, snare, closed hat, open hat, low/mid/high tom, crash,
/// ride.
pub const CHANNEL_GAIN_DB: [f64; CHANNELS] = [
    -5.0, -7.0, -15.0, -12.0, -11.0, -11.0, -11.0, -12.0, -12.0,
];

/// Number of drum samples a player loads, one per channel.
pub const SAMPLE_COUNT: u32 = CHANNELS as u32;

/// Shared, manually advanced time source.
#[derive(Clone, Debug, Default)]
pub struct ManualClock(Rc<Cell<TimeMs>>);

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> TimeMs {
        self.0.get()
    }

    pub fn set(&self, now: TimeMs) {
        self.0.set(now);
    }
}

/// Duration of one step: the 96 steps span one 4/4 bar (a 96th note each).
pub fn step_duration_ms(bpm: f64) -> f64 {
    240_000.0 / (bpm * STEPS as f64)
}

#[derive(Clone, Debug)]
struct SequencerState {
    pattern: GatedPattern,
    bpm: f64,
    running: bool,
    anchor: TimeMs,
    anchor_step: usize,
    loaded: u32,
    cues: Vec<usize>,
}

/// Silent 96-step sequencer that keeps time against a [`ManualClock`].
///
/// It produces no sound but tracks everything a real player would: the active pattern, tempo,
/// transport state, and which cues were requested. Clones share state.
#[derive(Clone, Debug)]
pub struct StepSequencer {
    clock: ManualClock,
    state: Rc<RefCell<SequencerState>>,
}

impl StepSequencer {
    pub fn new(clock: ManualClock, bpm: f64) -> Self {
        Self {
            clock,
            state: Rc::new(RefCell::new(SequencerState {
                pattern: GatedPattern::empty(),
                bpm,
                running: false,
                anchor: TimeMs(0.0),
                anchor_step: 0,
                loaded: 0,
                cues: Vec::new(),
            })),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state.borrow().running
    }

    pub fn bpm(&self) -> f64 {
        self.state.borrow().bpm
    }

    pub fn pattern(&self) -> GatedPattern {
        self.state.borrow().pattern.clone()
    }

    pub fn samples_loaded(&self) -> u32 {
        self.state.borrow().loaded
    }

    pub fn cues(&self) -> Vec<usize> {
        self.state.borrow().cues.clone()
    }

    /// Channels that would be triggered when the sequence reaches `step`.
    pub fn triggered_channels(&self, step: usize) -> Vec<usize> {
        let state = self.state.borrow();
        state
            .pattern
            .step(step)
            .map(|row| (0..CHANNELS).filter(|&c| row[c] == 1).collect())
            .unwrap_or_default()
    }

    fn beat_at(state: &SequencerState, now: TimeMs) -> usize {
        if !state.running {
            return state.anchor_step;
        }
        let elapsed = now.since(state.anchor).max(0.0);
        let steps = (elapsed / step_duration_ms(state.bpm)).floor() as usize;
        (state.anchor_step + steps) % STEPS
    }

    fn restart(&self) {
        let now = self.clock.now();
        let mut state = self.state.borrow_mut();
        state.running = true;
        state.anchor = now;
        state.anchor_step = 0;
    }
}

impl AudioPlayback for StepSequencer {
    fn load_samples(&mut self, on_each_loaded: &mut dyn FnMut(u32)) -> DrumVaeResult<()> {
        tracing::debug!(count = SAMPLE_COUNT, "loading samples");
        for n in 1..=SAMPLE_COUNT {
            self.state.borrow_mut().loaded = n;
            on_each_loaded(n);
        }
        Ok(())
    }

    fn set_pattern(&mut self, pattern: &GatedPattern) {
        self.state.borrow_mut().pattern = pattern.clone();
    }

    fn set_tempo(&mut self, bpm: f64) {
        let now = self.clock.now();
        let mut state = self.state.borrow_mut();
        let beat = Self::beat_at(&state, now);
        state.anchor = now;
        state.anchor_step = beat;
        state.bpm = bpm;
    }

    fn start_clock(&mut self) {
        self.restart();
    }

    fn toggle_start_stop(&mut self) -> bool {
        let now = self.clock.now();
        if self.is_playing() {
            let mut state = self.state.borrow_mut();
            state.anchor_step = Self::beat_at(&state, now);
            state.running = false;
            false
        } else {
            self.restart();
            true
        }
    }

    fn play_cue(&mut self, cue: usize) {
        self.state.borrow_mut().cues.push(cue);
    }

    fn current_beat_index(&self) -> usize {
        Self::beat_at(&self.state.borrow(), self.clock.now())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/sequencer.rs"]
mod tests;
