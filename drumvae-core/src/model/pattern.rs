use rand::Rng;

use crate::foundation::core::{CHANNELS, STEPS};
use crate::foundation::error::{DrumVaeError, DrumVaeResult};

/// Logical grid coordinate. `channel` 0 is drawn on the bottom row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Cell {
    pub step: usize,
    pub channel: usize,
}

impl Cell {
    pub fn new(step: usize, channel: usize) -> DrumVaeResult<Self> {
        if step >= STEPS {
            return Err(DrumVaeError::validation(format!(
                "cell step {step} out of range 0..{STEPS}"
            )));
        }
        if channel >= CHANNELS {
            return Err(DrumVaeError::validation(format!(
                "cell channel {channel} out of range 0..{CHANNELS}"
            )));
        }
        Ok(Self { step, channel })
    }

    /// Row index counted from the top of the grid.
    pub fn visual_row(self) -> usize {
        CHANNELS - 1 - self.channel
    }
}

/// Binarization threshold: a raw intensity is "on" iff it is strictly greater than the gate.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct Gate(f32);

impl Gate {
    pub const DEFAULT: Gate = Gate(0.2);

    pub fn new(v: f32) -> DrumVaeResult<Self> {
        if !v.is_finite() || !(0.0..=1.0).contains(&v) {
            return Err(DrumVaeError::validation(format!(
                "gate must be within [0, 1], got {v}"
            )));
        }
        Ok(Self(v))
    }

    pub fn value(self) -> f32 {
        self.0
    }

    pub fn passes(self, raw: f32) -> bool {
        raw > self.0
    }
}

impl Default for Gate {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f32> for Gate {
    type Error = DrumVaeError;

    fn try_from(v: f32) -> Result<Self, Self::Error> {
        Self::new(v)
    }
}

impl From<Gate> for f32 {
    fn from(g: Gate) -> Self {
        g.0
    }
}

/// Continuous 96×9 pattern as authored by the server or the user.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct RawPattern {
    cells: [[f32; CHANNELS]; STEPS],
}

impl Default for RawPattern {
    fn default() -> Self {
        Self::zeros()
    }
}

impl RawPattern {
    pub fn zeros() -> Self {
        Self {
            cells: [[0.0; CHANNELS]; STEPS],
        }
    }

    pub fn from_fn(mut f: impl FnMut(Cell) -> f32) -> DrumVaeResult<Self> {
        let mut out = Self::zeros();
        for step in 0..STEPS {
            for channel in 0..CHANNELS {
                let cell = Cell { step, channel };
                out.set(cell, f(cell))?;
            }
        }
        Ok(out)
    }

    pub fn get(&self, cell: Cell) -> f32 {
        self.cells[cell.step][cell.channel]
    }

    pub fn set(&mut self, cell: Cell, v: f32) -> DrumVaeResult<()> {
        if !v.is_finite() || !(0.0..=1.0).contains(&v) {
            return Err(DrumVaeError::validation(format!(
                "raw intensity at ({}, {}) must be within [0, 1], got {v}",
                cell.step, cell.channel
            )));
        }
        self.cells[cell.step][cell.channel] = v;
        Ok(())
    }

    pub fn gated(&self, gate: Gate) -> GatedPattern {
        let mut out = GatedPattern::empty();
        for (dst, src) in out.cells.iter_mut().zip(self.cells.iter()) {
            for (d, &s) in dst.iter_mut().zip(src.iter()) {
                *d = u8::from(gate.passes(s));
            }
        }
        out
    }

    /// Flip the gated state of one cell by writing a full-on or full-off intensity.
    pub fn toggle(&mut self, cell: Cell, gate: Gate) {
        let raw = &mut self.cells[cell.step][cell.channel];
        *raw = if gate.passes(*raw) { 0.0 } else { 1.0 };
    }

    pub fn steps(&self) -> &[[f32; CHANNELS]; STEPS] {
        &self.cells
    }
}

impl TryFrom<Vec<Vec<f64>>> for RawPattern {
    type Error = DrumVaeError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        if rows.len() != STEPS {
            return Err(DrumVaeError::validation(format!(
                "pattern must have {STEPS} steps, got {}",
                rows.len()
            )));
        }
        let mut out = Self::zeros();
        for (step, row) in rows.iter().enumerate() {
            if row.len() != CHANNELS {
                return Err(DrumVaeError::validation(format!(
                    "pattern step {step} must have {CHANNELS} channels, got {}",
                    row.len()
                )));
            }
            for (channel, &v) in row.iter().enumerate() {
                out.set(Cell { step, channel }, v as f32)?;
            }
        }
        Ok(out)
    }
}

impl From<RawPattern> for Vec<Vec<f64>> {
    fn from(p: RawPattern) -> Self {
        p.cells
            .iter()
            .map(|row| row.iter().map(|&v| f64::from(v)).collect())
            .collect()
    }
}

/// Binarized pattern: what is drawn and what the sequencer plays.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct GatedPattern {
    cells: [[u8; CHANNELS]; STEPS],
}

impl Default for GatedPattern {
    fn default() -> Self {
        Self::empty()
    }
}

impl GatedPattern {
    pub fn empty() -> Self {
        Self {
            cells: [[0; CHANNELS]; STEPS],
        }
    }

    /// Random pattern where each cell is on with probability `density`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, density: f64) -> Self {
        let density = density.clamp(0.0, 1.0);
        let mut out = Self::empty();
        for row in out.cells.iter_mut() {
            for v in row.iter_mut() {
                *v = u8::from(rng.gen_bool(density));
            }
        }
        out
    }

    pub fn get(&self, cell: Cell) -> u8 {
        self.cells[cell.step][cell.channel]
    }

    pub fn is_on(&self, cell: Cell) -> bool {
        self.get(cell) > 0
    }

    pub fn set(&mut self, cell: Cell, on: bool) {
        self.cells[cell.step][cell.channel] = u8::from(on);
    }

    pub fn step(&self, step: usize) -> Option<&[u8; CHANNELS]> {
        self.cells.get(step)
    }

    pub fn count_on(&self) -> usize {
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&v| v > 0)
            .count()
    }

    /// Every cell whose value differs in `next`, carrying the new value, in step-major order.
    pub fn diff(&self, next: &GatedPattern) -> DiffSet {
        let mut entries = Vec::new();
        for step in 0..STEPS {
            for channel in 0..CHANNELS {
                let v = next.cells[step][channel];
                if self.cells[step][channel] != v {
                    entries.push(DiffEntry {
                        cell: Cell { step, channel },
                        value: v,
                    });
                }
            }
        }
        DiffSet(entries)
    }
}

impl TryFrom<Vec<Vec<u8>>> for GatedPattern {
    type Error = DrumVaeError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        if rows.len() != STEPS {
            return Err(DrumVaeError::validation(format!(
                "gated pattern must have {STEPS} steps, got {}",
                rows.len()
            )));
        }
        let mut out = Self::empty();
        for (step, row) in rows.iter().enumerate() {
            if row.len() != CHANNELS {
                return Err(DrumVaeError::validation(format!(
                    "gated pattern step {step} must have {CHANNELS} channels, got {}",
                    row.len()
                )));
            }
            for (channel, &v) in row.iter().enumerate() {
                if v > 1 {
                    return Err(DrumVaeError::validation(format!(
                        "gated value at ({step}, {channel}) must be 0 or 1, got {v}"
                    )));
                }
                out.cells[step][channel] = v;
            }
        }
        Ok(out)
    }
}

impl From<GatedPattern> for Vec<Vec<u8>> {
    fn from(p: GatedPattern) -> Self {
        p.cells.iter().map(|row| row.to_vec()).collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct DiffEntry {
    pub cell: Cell,
    /// Value in the newer pattern.
    pub value: u8,
}

/// Transient set of changed cells between two successive gated patterns.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct DiffSet(Vec<DiffEntry>);

impl DiffSet {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiffEntry> {
        self.0.iter()
    }

    pub fn entries(&self) -> &[DiffEntry] {
        &self.0
    }

    pub fn apply_to(&self, pattern: &mut GatedPattern) {
        for e in &self.0 {
            pattern.set(e.cell, e.value > 0);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/pattern.rs"]
mod tests;
