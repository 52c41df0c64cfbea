use crate::animation::tween::AnimParam;

/// Which of the two transition diagrams.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagramRole {
    /// Grid to latent.
    Encoder,
    /// Latent to grid.
    Decoder,
}

/// Animated fields of one transition diagram.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NnParam {
    /// Slide fraction of the input (bottom) row; 1 is fully slid away.
    ShiftIn,
    /// Link opacity ramp, folded through [`crate::foundation::math::pulse`].
    LinesAlpha,
    /// Slide fraction of the output (top) row.
    ShiftOut,
    /// Output-row emphasis ramp (0..2).
    MoreAlpha,
    /// Input-row emphasis ramp (0..2).
    LessAlpha,
}

impl NnParam {
    pub const ALL: [NnParam; 5] = [
        Self::ShiftIn,
        Self::LinesAlpha,
        Self::ShiftOut,
        Self::MoreAlpha,
        Self::LessAlpha,
    ];
}

/// Every scalar the scene animates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SceneParam {
    /// Diff highlight opacity; decays 1 -> 0.
    DiffAlpha,
    /// Ring on the selected latent dot when a decode starts.
    Blink,
    /// Ring around the latent graph after a new latent is committed.
    Change,
    Nn(DiagramRole, NnParam),
}

impl AnimParam for SceneParam {
    fn initial(self) -> f64 {
        match self {
            Self::DiffAlpha | Self::Blink | Self::Change => 0.0,
            Self::Nn(_, p) => match p {
                NnParam::ShiftIn => 1.0,
                NnParam::LinesAlpha => 0.2,
                NnParam::ShiftOut | NnParam::MoreAlpha | NnParam::LessAlpha => 0.0,
            },
        }
    }
}

/// Completion signals emitted by the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneSignal {
    DecodeFinished,
    EncodeFinished,
}
