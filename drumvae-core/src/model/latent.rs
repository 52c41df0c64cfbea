use crate::foundation::core::{DIAGRAM_DIMS, LATENT_DIMS};
use crate::foundation::error::{DrumVaeError, DrumVaeResult};

/// Fixed-size point in the generative model's latent space.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct LatentVector<const N: usize>([f64; N]);

/// Primary 32-dimensional latent vector.
pub type Latent = LatentVector<LATENT_DIMS>;
/// Reduced vector shown by the decorative diagram graphs.
pub type DiagramLatent = LatentVector<DIAGRAM_DIMS>;

impl<const N: usize> Default for LatentVector<N> {
    fn default() -> Self {
        Self::zeros()
    }
}

impl<const N: usize> LatentVector<N> {
    pub const DIMS: usize = N;

    pub fn zeros() -> Self {
        Self([0.0; N])
    }

    pub fn from_array(values: [f64; N]) -> DrumVaeResult<Self> {
        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(DrumVaeError::validation(format!(
                "latent dimension {i} is not finite"
            )));
        }
        Ok(Self(values))
    }

    pub fn dims(&self) -> usize {
        N
    }

    pub fn get(&self, i: usize) -> Option<f64> {
        self.0.get(i).copied()
    }

    pub fn set(&mut self, i: usize, v: f64) -> DrumVaeResult<()> {
        if !v.is_finite() {
            return Err(DrumVaeError::validation(format!(
                "latent dimension {i} must be finite"
            )));
        }
        let slot = self.0.get_mut(i).ok_or_else(|| {
            DrumVaeError::validation(format!("latent dimension {i} out of range 0..{N}"))
        })?;
        *slot = v;
        Ok(())
    }

    pub fn values(&self) -> &[f64; N] {
        &self.0
    }
}

impl<const N: usize> TryFrom<Vec<f64>> for LatentVector<N> {
    type Error = DrumVaeError;

    fn try_from(v: Vec<f64>) -> Result<Self, Self::Error> {
        let len = v.len();
        let arr: [f64; N] = v.try_into().map_err(|_| {
            DrumVaeError::validation(format!("latent vector must have {N} dimensions, got {len}"))
        })?;
        Self::from_array(arr)
    }
}

impl<const N: usize> From<LatentVector<N>> for Vec<f64> {
    fn from(v: LatentVector<N>) -> Self {
        v.0.to_vec()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/latent.rs"]
mod tests;
