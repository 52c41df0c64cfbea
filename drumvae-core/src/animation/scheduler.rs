use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::{
    animation::tween::{AnimParam, TweenId, TweenSpec, TweenState},
    foundation::core::TimeMs,
    foundation::error::{DrumVaeError, DrumVaeResult},
};

#[derive(Clone, Debug)]
struct Slot<K, S> {
    spec: TweenSpec<K>,
    state: TweenState,
    chain: Vec<TweenId>,
    on_done: Vec<S>,
}

/// Cooperative tween scheduler advanced once per frame.
///
/// Each tween is a small state machine (`Pending -> Running -> Done`). A finished tween starts its
/// chained successors at its exact completion instant and emits its `on_done` signals from
/// [`Scheduler::tick`]. Starting a tween cancels any other active tween owning the same parameter.
#[derive(Clone, Debug)]
pub struct Scheduler<K, S> {
    now: TimeMs,
    next_id: u64,
    slots: BTreeMap<TweenId, Slot<K, S>>,
    values: HashMap<K, f64>,
}

impl<K: AnimParam, S: Clone> Default for Scheduler<K, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: AnimParam, S: Clone> Scheduler<K, S> {
    pub fn new() -> Self {
        Self {
            now: TimeMs(0.0),
            next_id: 0,
            slots: BTreeMap::new(),
            values: HashMap::new(),
        }
    }

    pub fn now(&self) -> TimeMs {
        self.now
    }

    pub fn value(&self, param: K) -> f64 {
        self.values
            .get(&param)
            .copied()
            .unwrap_or_else(|| param.initial())
    }

    /// Overwrite a parameter outside of any tween. An active owner keeps writing on later ticks.
    pub fn set_value(&mut self, param: K, v: f64) {
        self.values.insert(param, v);
    }

    /// Register a tween in the `Pending` state.
    pub fn add(&mut self, spec: TweenSpec<K>) -> DrumVaeResult<TweenId> {
        spec.validate()?;
        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.slots.insert(
            id,
            Slot {
                spec,
                state: TweenState::Pending,
                chain: Vec::new(),
                on_done: Vec::new(),
            },
        );
        Ok(id)
    }

    /// Start `next` (all of them) when `prev` finishes.
    pub fn chain(&mut self, prev: TweenId, next: &[TweenId]) -> DrumVaeResult<()> {
        if let Some(missing) = next.iter().find(|id| !self.slots.contains_key(id)) {
            return Err(DrumVaeError::animation(format!(
                "cannot chain unknown tween {missing:?}"
            )));
        }
        let slot = self.slot_mut(prev)?;
        slot.chain.extend_from_slice(next);
        Ok(())
    }

    /// Emit `signal` from `tick` when `id` finishes.
    pub fn on_done(&mut self, id: TweenId, signal: S) -> DrumVaeResult<()> {
        self.slot_mut(id)?.on_done.push(signal);
        Ok(())
    }

    pub fn start(&mut self, id: TweenId) -> DrumVaeResult<()> {
        self.start_at(id, self.now)
    }

    pub fn start_at(&mut self, id: TweenId, at: TimeMs) -> DrumVaeResult<()> {
        let param = {
            let slot = self.slot_mut(id)?;
            slot.state = TweenState::Running { started_at: at };
            slot.spec.param
        };
        let superseded: Vec<TweenId> = self
            .slots
            .iter()
            .filter(|(other, s)| {
                **other != id
                    && s.spec.param == param
                    && matches!(s.state, TweenState::Running { .. })
            })
            .map(|(other, _)| *other)
            .collect();
        for other in superseded {
            tracing::trace!(?param, ?other, "tween superseded");
            self.cancel(other);
        }
        Ok(())
    }

    /// Register and immediately start a standalone tween.
    pub fn spawn(&mut self, spec: TweenSpec<K>) -> DrumVaeResult<TweenId> {
        let id = self.add(spec)?;
        self.start(id)?;
        Ok(id)
    }

    /// Drop a tween and any not-yet-started successors. Its signals never fire.
    pub fn cancel(&mut self, id: TweenId) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            if let Some(slot) = self.slots.remove(&id) {
                stack.extend(slot.chain.iter().copied().filter(|c| {
                    self.slots
                        .get(c)
                        .is_some_and(|s| s.state == TweenState::Pending)
                }));
            }
        }
    }

    /// Cancel every running tween whose parameter matches `pred`.
    pub fn cancel_where(&mut self, pred: impl Fn(K) -> bool) {
        let ids: Vec<TweenId> = self
            .slots
            .iter()
            .filter(|(_, s)| {
                pred(s.spec.param) && matches!(s.state, TweenState::Running { .. })
            })
            .map(|(id, _)| *id)
            .collect();
        for id in ids {
            self.cancel(id);
        }
    }

    pub fn state(&self, id: TweenId) -> Option<TweenState> {
        self.slots.get(&id).map(|s| s.state)
    }

    /// Running tween currently owning `param`, if any.
    pub fn owner(&self, param: K) -> Option<TweenId> {
        self.slots
            .iter()
            .find(|(_, s)| {
                s.spec.param == param && matches!(s.state, TweenState::Running { .. })
            })
            .map(|(id, _)| *id)
    }

    pub fn is_animating(&self, param: K) -> bool {
        self.owner(param).is_some()
    }

    pub fn running_count(&self) -> usize {
        self.slots
            .values()
            .filter(|s| matches!(s.state, TweenState::Running { .. }))
            .count()
    }

    /// Advance every running tween to `now`, cascading through chains.
    pub fn tick(&mut self, now: TimeMs) -> Vec<S> {
        self.slots.retain(|_, s| s.state != TweenState::Done);
        self.now = now;

        let mut signals = Vec::new();
        let mut queue: VecDeque<TweenId> = self
            .slots
            .iter()
            .filter(|(_, s)| matches!(s.state, TweenState::Running { .. }))
            .map(|(id, _)| *id)
            .collect();

        while let Some(id) = queue.pop_front() {
            let Some(slot) = self.slots.get_mut(&id) else {
                continue;
            };
            let TweenState::Running { started_at } = slot.state else {
                continue;
            };
            let Some(p) = slot.spec.progress(started_at, now) else {
                continue;
            };
            self.values.insert(slot.spec.param, slot.spec.value_at(p));
            if p < 1.0 {
                continue;
            }

            slot.state = TweenState::Done;
            let end = slot.spec.end_time(started_at);
            let chain = std::mem::take(&mut slot.chain);
            signals.append(&mut slot.on_done);

            for next in chain {
                if self.start_at(next, end).is_ok() {
                    queue.push_back(next);
                }
            }
        }
        signals
    }

    fn slot_mut(&mut self, id: TweenId) -> DrumVaeResult<&mut Slot<K, S>> {
        self.slots
            .get_mut(&id)
            .ok_or_else(|| DrumVaeError::animation(format!("unknown tween {id:?}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/scheduler.rs"]
mod tests;
