use std::{cell::RefCell, rc::Rc};

use crate::{
    foundation::error::DrumVaeResult,
    server::protocol::{Endpoint, InferenceRequest},
};

/// Identifies one outgoing request. Completions are handed back to the composer with the same
/// ticket so it can match them against the latest request per data channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestTicket {
    pub seq: u64,
    pub endpoint: Endpoint,
}

/// Fire-and-forget transport to the inference server.
///
/// `submit` must not block. The host delivers the outcome later through
/// `SceneComposer::on_response` or `SceneComposer::on_request_failed`.
pub trait InferenceClient {
    fn submit(&mut self, ticket: RequestTicket, request: InferenceRequest) -> DrumVaeResult<()>;
}

/// Client that records submissions without sending them anywhere.
///
/// Clones share one log, so a test can keep a handle after boxing the client into a composer.
#[derive(Clone, Debug, Default)]
pub struct RecordingClient {
    log: Rc<RefCell<Vec<(RequestTicket, InferenceRequest)>>>,
}

impl RecordingClient {
    pub fn len(&self) -> usize {
        self.log.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.borrow().is_empty()
    }

    pub fn last(&self) -> Option<(RequestTicket, InferenceRequest)> {
        self.log.borrow().last().cloned()
    }

    pub fn take(&self) -> Vec<(RequestTicket, InferenceRequest)> {
        std::mem::take(&mut *self.log.borrow_mut())
    }
}

impl InferenceClient for RecordingClient {
    fn submit(&mut self, ticket: RequestTicket, request: InferenceRequest) -> DrumVaeResult<()> {
        tracing::debug!(seq = ticket.seq, endpoint = ?ticket.endpoint, "request recorded");
        self.log.borrow_mut().push((ticket, request));
        Ok(())
    }
}
