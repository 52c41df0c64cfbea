use crate::{
    foundation::error::{DrumVaeError, DrumVaeResult},
    model::latent::Latent,
    model::pattern::RawPattern,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// The four calls the inference server answers.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Rand,
    Static,
    AdjustData,
    AdjustLatent,
}

impl Endpoint {
    pub fn method(self) -> HttpMethod {
        match self {
            Self::Rand | Self::Static => HttpMethod::Get,
            Self::AdjustData | Self::AdjustLatent => HttpMethod::Post,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Self::Rand => "/rand",
            Self::Static => "/static",
            Self::AdjustData => "/adjust-data",
            Self::AdjustLatent => "/adjust-latent",
        }
    }

    /// Full URL under `base`, tolerating a trailing slash on the base.
    pub fn url(self, base: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), self.path())
    }

    /// Whether a response to this call replaces the pattern.
    pub fn writes_pattern(self) -> bool {
        !matches!(self, Self::AdjustData)
    }

    /// Whether a response to this call replaces the latent vector.
    pub fn writes_latent(self) -> bool {
        !matches!(self, Self::AdjustLatent)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum InferenceRequest {
    Rand,
    Static,
    AdjustData { data: RawPattern },
    AdjustLatent { latent: Latent },
}

#[derive(serde::Serialize)]
struct AdjustDataBody<'a> {
    data: &'a RawPattern,
}

#[derive(serde::Serialize)]
struct AdjustLatentBody<'a> {
    latent: &'a Latent,
}

impl InferenceRequest {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::Rand => Endpoint::Rand,
            Self::Static => Endpoint::Static,
            Self::AdjustData { .. } => Endpoint::AdjustData,
            Self::AdjustLatent { .. } => Endpoint::AdjustLatent,
        }
    }

    /// JSON body for `POST` calls; `None` for `GET`.
    pub fn body_json(&self) -> DrumVaeResult<Option<String>> {
        let body = match self {
            Self::Rand | Self::Static => return Ok(None),
            Self::AdjustData { data } => serde_json::to_string(&AdjustDataBody { data }),
            Self::AdjustLatent { latent } => serde_json::to_string(&AdjustLatentBody { latent }),
        };
        body.map(Some)
            .map_err(|e| DrumVaeError::serde(format!("encode request body: {e}")))
    }
}

/// Response as it arrives on the wire. Both fields are optional so that a missing field is
/// reported as a validation error rather than a parse error.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct InferenceResponse {
    #[serde(default)]
    pub result: Option<Vec<Vec<f64>>>,
    #[serde(default)]
    pub latent: Option<Vec<f64>>,
}

impl InferenceResponse {
    pub fn from_json(s: &str) -> DrumVaeResult<Self> {
        serde_json::from_str(s).map_err(|e| DrumVaeError::serde(format!("parse response: {e}")))
    }
}

/// A fully validated server payload.
#[derive(Clone, Debug, PartialEq)]
pub struct ServerPayload {
    pub result: RawPattern,
    pub latent: Latent,
}

impl ServerPayload {
    pub fn new(result: RawPattern, latent: Latent) -> Self {
        Self { result, latent }
    }
}

impl TryFrom<InferenceResponse> for ServerPayload {
    type Error = DrumVaeError;

    fn try_from(r: InferenceResponse) -> Result<Self, Self::Error> {
        let result = r
            .result
            .ok_or_else(|| DrumVaeError::validation("response is missing `result`"))?;
        let latent = r
            .latent
            .ok_or_else(|| DrumVaeError::validation("response is missing `latent`"))?;
        Ok(Self {
            result: RawPattern::try_from(result)?,
            latent: Latent::try_from(latent)?,
        })
    }
}

impl From<ServerPayload> for InferenceResponse {
    fn from(p: ServerPayload) -> Self {
        Self {
            result: Some(p.result.into()),
            latent: Some(p.latent.into()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/server/protocol.rs"]
mod tests;
