use std::{
    cell::RefCell,
    collections::{HashMap, VecDeque},
    rc::Rc,
};

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    audio::sequencer::ManualClock,
    foundation::core::{CHANNELS, LATENT_DIMS, STEPS, TimeMs},
    foundation::error::DrumVaeResult,
    scene::latent_graph::DRAG_RANGE,
    server::client::{InferenceClient, RequestTicket},
    server::protocol::{Endpoint, InferenceRequest, InferenceResponse},
    session::script::CannedResponse,
};

const HIT_PROBABILITY: f64 = 0.08;

#[derive(Clone, Debug)]
pub enum FixtureReply {
    Respond(InferenceResponse),
    Fail(String),
}

/// A reply together with the instant it becomes visible to the client.
#[derive(Clone, Debug)]
pub struct DueReply {
    pub due: TimeMs,
    pub ticket: RequestTicket,
    pub reply: FixtureReply,
}

#[derive(Debug)]
struct FixtureState {
    latency_ms: f64,
    canned: HashMap<Endpoint, VecDeque<CannedResponse>>,
    rng: StdRng,
    queue: Vec<DueReply>,
    submitted: u64,
}

/// In-process stand-in for the inference server.
///
/// Requests are answered `latency_ms` after submission (read from the shared clock), using the
/// canned replies first and seeded random payloads after that. Clones share the same queue.
#[derive(Clone, Debug)]
pub struct FixtureServer {
    clock: ManualClock,
    state: Rc<RefCell<FixtureState>>,
}

impl FixtureServer {
    pub fn new(
        clock: ManualClock,
        latency_ms: f64,
        seed: u64,
        responses: impl IntoIterator<Item = CannedResponse>,
    ) -> Self {
        let mut canned: HashMap<Endpoint, VecDeque<CannedResponse>> = HashMap::new();
        for r in responses {
            canned.entry(r.endpoint).or_default().push_back(r);
        }
        Self {
            clock,
            state: Rc::new(RefCell::new(FixtureState {
                latency_ms,
                canned,
                rng: StdRng::seed_from_u64(seed.wrapping_add(1)),
                queue: Vec::new(),
                submitted: 0,
            })),
        }
    }

    pub fn submitted(&self) -> u64 {
        self.state.borrow().submitted
    }

    pub fn pending(&self) -> usize {
        self.state.borrow().queue.len()
    }

    /// Remove and return every reply due at or before `now`, oldest request first.
    pub fn take_due(&self, now: TimeMs) -> Vec<DueReply> {
        let mut state = self.state.borrow_mut();
        let (mut due, rest): (Vec<DueReply>, Vec<DueReply>) =
            state.queue.drain(..).partition(|s| s.due <= now);
        state.queue = rest;
        due.sort_by(|a, b| {
            a.due
                .0
                .total_cmp(&b.due.0)
                .then_with(|| a.ticket.cmp(&b.ticket))
        });
        due
    }
}

fn random_response(rng: &mut StdRng) -> InferenceResponse {
    let result = (0..STEPS)
        .map(|_| {
            (0..CHANNELS)
                .map(|_| {
                    if rng.gen_bool(HIT_PROBABILITY) {
                        rng.gen_range(0.5..1.0)
                    } else {
                        rng.gen_range(0.0..0.15)
                    }
                })
                .collect()
        })
        .collect();
    let latent = (0..LATENT_DIMS)
        .map(|_| rng.gen_range(-DRAG_RANGE..DRAG_RANGE))
        .collect();
    InferenceResponse {
        result: Some(result),
        latent: Some(latent),
    }
}

impl InferenceClient for FixtureServer {
    fn submit(&mut self, ticket: RequestTicket, request: InferenceRequest) -> DrumVaeResult<()> {
        request.body_json()?;

        let mut state = self.state.borrow_mut();
        state.submitted += 1;
        let canned = state
            .canned
            .get_mut(&ticket.endpoint)
            .and_then(VecDeque::pop_front);
        let reply = match canned {
            Some(CannedResponse {
                error: Some(msg), ..
            }) => FixtureReply::Fail(msg),
            Some(CannedResponse {
                response: Some(r), ..
            }) => FixtureReply::Respond(r),
            _ => FixtureReply::Respond(random_response(&mut state.rng)),
        };
        let due = self.clock.now().after(state.latency_ms);
        tracing::trace!(seq = ticket.seq, endpoint = ?ticket.endpoint, due = due.0, "fixture reply scheduled");
        state.queue.push(DueReply { due, ticket, reply });
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/fixture.rs"]
mod tests;
