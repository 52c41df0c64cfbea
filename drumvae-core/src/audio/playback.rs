use crate::{foundation::error::DrumVaeResult, model::pattern::GatedPattern};

/// Sample-playback collaborator that sonifies the committed pattern.
///
/// The clock behind `current_beat_index` advances on its own; the composer only reads it once per
/// frame.
pub trait AudioPlayback {
    /// Start loading the drum samples; `on_each_loaded` receives the running count.
    ///
    /// Hosts that load asynchronously may return immediately and report progress through
    /// `SceneComposer::on_samples_loaded` instead.
    fn load_samples(&mut self, on_each_loaded: &mut dyn FnMut(u32)) -> DrumVaeResult<()>;

    fn set_pattern(&mut self, pattern: &GatedPattern);

    fn set_tempo(&mut self, bpm: f64);

    /// Restart the step sequence from step 0.
    fn start_clock(&mut self);

    /// Start or stop the step sequence; returns whether it is now playing.
    fn toggle_start_stop(&mut self) -> bool;

    fn play_cue(&mut self, cue: usize);

    /// Step (0..96) most recently reached by the sequence.
    fn current_beat_index(&self) -> usize;
}
