use std::{fs::File, io::BufReader, path::Path};

use crate::{
    foundation::core::Viewport,
    foundation::error::{DrumVaeError, DrumVaeResult},
    scene::composer::Key,
    scene::config::SceneConfig,
    server::protocol::{Endpoint, InferenceResponse},
};

fn default_fps() -> f64 {
    60.0
}

fn default_latency_ms() -> f64 {
    120.0
}

/// A scripted interactive session: what the viewer sees, how the fake server behaves, and
/// which inputs arrive when.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionScript {
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default)]
    pub config: SceneConfig,
    #[serde(default = "default_fps")]
    pub fps: f64,
    pub duration_ms: f64,
    /// Delay between a request and its simulated completion.
    #[serde(default = "default_latency_ms")]
    pub latency_ms: f64,
    /// Replies consumed in order per endpoint; requests beyond them get seeded random payloads.
    #[serde(default)]
    pub responses: Vec<CannedResponse>,
    #[serde(default)]
    pub events: Vec<TimedEvent>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CannedResponse {
    pub endpoint: Endpoint,
    #[serde(default)]
    pub response: Option<InferenceResponse>,
    /// Simulate a transport failure instead of replying.
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimedEvent {
    pub at_ms: f64,
    #[serde(flatten)]
    pub event: SessionEvent,
}

/// Inputs a script can inject. Pointer coordinates are viewport pixels.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    DismissSplash,
    Press { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Release { x: f64, y: f64 },
    /// Click the center of a grid cell.
    PressCell { step: usize, channel: usize },
    /// Grab a latent dimension at its base radius and drag it to `value`.
    DragLatent { dim: usize, value: f64 },
    Key { key: Key },
    SetGate { gate: f32 },
    SetTempo { bpm: f64 },
}

impl SessionScript {
    /// Parse a session script from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> DrumVaeResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| DrumVaeError::serde(format!("parse session script JSON: {e}")))
    }

    /// Parse a session script from a JSON file on disk.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_path(path: impl AsRef<Path>) -> DrumVaeResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            DrumVaeError::validation(format!("open session script '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> DrumVaeResult<()> {
        self.viewport.validate()?;
        self.config.validate()?;
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(DrumVaeError::validation("fps must be finite and > 0"));
        }
        if !(self.duration_ms.is_finite() && self.duration_ms >= 0.0) {
            return Err(DrumVaeError::validation("duration_ms must be finite and >= 0"));
        }
        if !(self.latency_ms.is_finite() && self.latency_ms >= 0.0) {
            return Err(DrumVaeError::validation("latency_ms must be finite and >= 0"));
        }
        for (i, r) in self.responses.iter().enumerate() {
            if r.response.is_some() == r.error.is_some() {
                return Err(DrumVaeError::validation(format!(
                    "responses[{i}] must set exactly one of 'response' or 'error'"
                )));
            }
        }
        for (i, ev) in self.events.iter().enumerate() {
            if !(ev.at_ms.is_finite() && ev.at_ms >= 0.0) {
                return Err(DrumVaeError::validation(format!(
                    "events[{i}].at_ms must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }

    /// Number of frames covering `duration_ms` at `fps`, including the frame at t = 0.
    pub fn frame_count(&self) -> u64 {
        (self.duration_ms * self.fps / 1000.0).floor() as u64 + 1
    }

    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.fps
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/script.rs"]
mod tests;
