//! The request multiplexer: a table of outstanding requests keyed by request
//! id, each completed or failed exactly once.

use std::{cell::RefCell, rc::Rc, time::Instant};

use hashbrown::HashMap;

use opcua_core::ResponseMessage;
use opcua_types::StatusCode;

use crate::Client;

/// The slot a synchronous caller polls while it pumps the event loop.
pub(crate) type SyncWaiter = Rc<RefCell<Option<Result<ResponseMessage, StatusCode>>>>;

/// The completion of an asynchronous request. Invoked exactly once with the
/// request id, the request handle and either the decoded response or the
/// failure status.
pub(crate) type AsyncCallback =
    Box<dyn FnOnce(&mut Client, u32, u32, Result<ResponseMessage, StatusCode>)>;

/// How the outcome of a pending request is delivered.
pub(crate) enum RequestKind {
    /// A synchronous caller is pumping the event loop against this slot.
    Sync(SyncWaiter),
    /// A callback fires when the response arrives or the request fails.
    Async(AsyncCallback),
}

/// A request awaiting its response.
pub(crate) struct PendingRequest {
    pub request_handle: u32,
    pub deadline: Instant,
    #[allow(unused)]
    pub dispatched_at: Instant,
    pub kind: RequestKind,
}

/// The table of outstanding requests. Responses may arrive in any order; an
/// entry is removed the moment its outcome is determined, which is what makes
/// exactly-once delivery structural.
#[derive(Default)]
pub(crate) struct Multiplexer {
    pending: HashMap<u32, PendingRequest>,
}

impl Multiplexer {
    pub fn new() -> Multiplexer {
        Multiplexer {
            pending: HashMap::new(),
        }
    }

    /// Number of outstanding requests.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Register a pending request under its request id. Ids are unique within
    /// a channel so a collision indicates a bug in id allocation.
    pub fn insert(&mut self, request_id: u32, request: PendingRequest) {
        let previous = self.pending.insert(request_id, request);
        debug_assert!(previous.is_none(), "request id {request_id} reused");
    }

    /// Remove and return the entry for a response that just arrived. `None`
    /// when the id is unknown, e.g. the request already timed out.
    pub fn take(&mut self, request_id: u32) -> Option<PendingRequest> {
        self.pending.remove(&request_id)
    }

    /// Remove and return every entry, for failing them all on shutdown or
    /// channel loss.
    pub fn drain_all(&mut self) -> Vec<(u32, PendingRequest)> {
        self.pending.drain().collect()
    }

    /// Remove and return the entries whose deadline has passed.
    pub fn drain_expired(&mut self, now: Instant) -> Vec<(u32, PendingRequest)> {
        let expired: Vec<u32> = self
            .pending
            .iter()
            .filter(|(_, r)| r.deadline <= now)
            .map(|(id, _)| *id)
            .collect();
        expired
            .into_iter()
            .filter_map(|id| self.pending.remove(&id).map(|r| (id, r)))
            .collect()
    }

    /// The earliest deadline over all outstanding requests.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|r| r.deadline).min()
    }
}
