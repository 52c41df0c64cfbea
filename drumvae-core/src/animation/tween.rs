use crate::{
    animation::ease::Ease,
    foundation::core::TimeMs,
    foundation::error::{DrumVaeError, DrumVaeResult},
    foundation::math::lerp,
};

/// A named scalar animation parameter with a resting value.
pub trait AnimParam: Copy + Eq + std::hash::Hash + std::fmt::Debug {
    /// Value reported before any tween has written the parameter.
    fn initial(self) -> f64;
}

/// Time-based interpolation of one parameter from `from` to `to`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenSpec<K> {
    pub param: K,
    pub from: f64,
    pub to: f64,
    pub duration_ms: f64,
    pub delay_ms: f64,
    pub ease: Ease,
}

impl<K: AnimParam> TweenSpec<K> {
    pub fn new(param: K, from: f64, to: f64, duration_ms: f64) -> Self {
        Self {
            param,
            from,
            to,
            duration_ms,
            delay_ms: 0.0,
            ease: Ease::Linear,
        }
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn delay(mut self, delay_ms: f64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn validate(&self) -> DrumVaeResult<()> {
        if !self.from.is_finite() || !self.to.is_finite() {
            return Err(DrumVaeError::animation(format!(
                "tween endpoints for {:?} must be finite",
                self.param
            )));
        }
        if !self.duration_ms.is_finite() || self.duration_ms < 0.0 {
            return Err(DrumVaeError::animation("tween duration must be finite and >= 0"));
        }
        if !self.delay_ms.is_finite() || self.delay_ms < 0.0 {
            return Err(DrumVaeError::animation("tween delay must be finite and >= 0"));
        }
        Ok(())
    }

    /// Eased value at normalized progress `p`.
    pub fn value_at(&self, p: f64) -> f64 {
        lerp(self.from, self.to, self.ease.apply(p))
    }

    /// Normalized progress at `now` for a tween started at `started_at`, or `None` while delayed.
    pub fn progress(&self, started_at: TimeMs, now: TimeMs) -> Option<f64> {
        let begin = started_at.after(self.delay_ms);
        if now < begin {
            return None;
        }
        if self.duration_ms <= 0.0 {
            return Some(1.0);
        }
        Some((now.since(begin) / self.duration_ms).min(1.0))
    }

    /// Instant at which a tween started at `started_at` reaches its end value.
    pub fn end_time(&self, started_at: TimeMs) -> TimeMs {
        started_at.after(self.delay_ms + self.duration_ms)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TweenId(pub(crate) u64);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TweenState {
    /// Created but not started; waits for `start` or a predecessor to finish.
    Pending,
    Running { started_at: TimeMs },
    Done,
}
