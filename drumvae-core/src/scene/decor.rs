use rand::{Rng, rngs::StdRng};

use crate::{
    foundation::core::DIAGRAM_DIMS,
    foundation::math::lerp,
    model::latent::DiagramLatent,
};

/// Number of decorative graphs in the multi-latent display.
pub const DECOR_GRAPHS: usize = 3;
/// Amplitude of decorative latent values.
pub const DECOR_AMPLITUDE: f64 = 0.01;
const FRAMES_PER_KNOT: u64 = 200;

/// Smoothly wandering latent values for the decorative graphs.
///
/// Each dimension glides between random knots, one knot every 200 frames, with smoothstep
/// interpolation so the bars never jump.
#[derive(Clone, Debug)]
pub struct DecorNoise {
    from: [[f64; DIAGRAM_DIMS]; DECOR_GRAPHS],
    to: [[f64; DIAGRAM_DIMS]; DECOR_GRAPHS],
    knot: u64,
}

impl DecorNoise {
    pub fn new(rng: &mut StdRng) -> Self {
        let mut noise = Self {
            from: [[0.0; DIAGRAM_DIMS]; DECOR_GRAPHS],
            to: [[0.0; DIAGRAM_DIMS]; DECOR_GRAPHS],
            knot: 0,
        };
        noise.from = Self::roll(rng);
        noise.to = Self::roll(rng);
        noise
    }

    fn roll(rng: &mut StdRng) -> [[f64; DIAGRAM_DIMS]; DECOR_GRAPHS] {
        let mut out = [[0.0; DIAGRAM_DIMS]; DECOR_GRAPHS];
        for v in out.iter_mut().flatten() {
            *v = rng.gen_range(-DECOR_AMPLITUDE..=DECOR_AMPLITUDE);
        }
        out
    }

    /// Values of every decorative graph at `frame`. Frames must not go backwards.
    pub fn sample(&mut self, rng: &mut StdRng, frame: u64) -> [DiagramLatent; DECOR_GRAPHS] {
        let knot = frame / FRAMES_PER_KNOT;
        while self.knot < knot {
            self.from = self.to;
            self.to = Self::roll(rng);
            self.knot += 1;
        }
        let t = (frame % FRAMES_PER_KNOT) as f64 / FRAMES_PER_KNOT as f64;
        let t = t * t * (3.0 - 2.0 * t);

        let mut out = [DiagramLatent::zeros(); DECOR_GRAPHS];
        for (g, latent) in out.iter_mut().enumerate() {
            let mut values = [0.0; DIAGRAM_DIMS];
            for (d, v) in values.iter_mut().enumerate() {
                *v = lerp(self.from[g][d], self.to[g][d], t);
            }
            *latent = DiagramLatent::from_array(values).unwrap_or_default();
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/decor.rs"]
mod tests;
