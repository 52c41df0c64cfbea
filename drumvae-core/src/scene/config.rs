use crate::{
    foundation::error::{DrumVaeError, DrumVaeResult},
    model::pattern::Gate,
};

pub const MIN_BPM: f64 = 60.0;
pub const MAX_BPM: f64 = 180.0;

/// Scene-level settings. Every field has a default so partial JSON is accepted.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub gate: Gate,
    pub bpm: f64,
    /// Seed for the placeholder shimmer and decorative noise.
    pub seed: u64,
    pub server_base_url: String,
    /// Samples the audio collaborator must report before the scene is drawn.
    pub sample_count: u32,
    pub diff_fade_ms: f64,
    /// Fraction of cells lit in the placeholder pattern.
    pub placeholder_density: f64,
    /// Show the fetch indicator on the main latent graph.
    pub show_indication: bool,
    /// Latent dimension selected at startup.
    pub initial_selection: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            gate: Gate::DEFAULT,
            bpm: 120.0,
            seed: 0,
            server_base_url: "http://127.0.0.1:5002/".to_owned(),
            sample_count: 9,
            diff_fade_ms: 500.0,
            placeholder_density: 0.1,
            show_indication: true,
            initial_selection: 20,
        }
    }
}

impl SceneConfig {
    pub fn validate(&self) -> DrumVaeResult<()> {
        if !(self.bpm.is_finite() && (MIN_BPM..=MAX_BPM).contains(&self.bpm)) {
            return Err(DrumVaeError::validation(format!(
                "bpm must be within [{MIN_BPM}, {MAX_BPM}], got {}",
                self.bpm
            )));
        }
        if self.server_base_url.trim().is_empty() {
            return Err(DrumVaeError::validation("server_base_url must not be empty"));
        }
        if self.sample_count == 0 {
            return Err(DrumVaeError::validation("sample_count must be > 0"));
        }
        if !(self.diff_fade_ms.is_finite() && self.diff_fade_ms > 0.0) {
            return Err(DrumVaeError::validation(
                "diff_fade_ms must be finite and > 0",
            ));
        }
        if !(0.0..=1.0).contains(&self.placeholder_density) {
            return Err(DrumVaeError::validation(
                "placeholder_density must be within [0, 1]",
            ));
        }
        if self.initial_selection >= crate::foundation::core::LATENT_DIMS {
            return Err(DrumVaeError::validation(
                "initial_selection must index a latent dimension",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/config.rs"]
mod tests;
