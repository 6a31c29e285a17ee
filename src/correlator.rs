//! Bookkeeping for in-flight requests.
//!
//! A [`Correlator`] maps request ids to whatever the owner needs to finish a request (a
//! callback, a task handle, ...). Every entry leaves the map exactly once: when its
//! response arrives, when it is cancelled, or when its deadline passes.

use std::collections::HashMap;
use std::time::Instant;

use tracing::debug;

use crate::error::{EngineError, Result};

/// Identifier of a request on the wire.
pub type RequestId = i64;

#[derive(Debug)]
struct Pending<T> {
    deadline: Instant,
    payload: T,
}

/// Pending requests keyed by id.
#[derive(Debug)]
pub struct Correlator<T> {
    pending: HashMap<RequestId, Pending<T>>,
}

impl<T> Default for Correlator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Correlator<T> {
    /// Create an empty correlator.
    pub fn new() -> Self {
        Self {
            pending: HashMap::new(),
        }
    }

    /// Registers `payload` under an id chosen by the other side.
    ///
    /// Fails if that id is already pending.
    pub fn insert(&mut self, id: RequestId, payload: T, deadline: Instant) -> Result<()> {
        if self.pending.contains_key(&id) {
            return Err(EngineError::InvalidRequest {
                message: format!("request id {id} is already in flight"),
            });
        }
        self.pending.insert(id, Pending { deadline, payload });
        Ok(())
    }

    /// Removes the entry for a response. `None` means the request was already finished,
    /// cancelled or evicted, and the response should be dropped.
    pub fn complete(&mut self, id: RequestId) -> Option<T> {
        self.pending.remove(&id).map(|pending| pending.payload)
    }

    /// Removes the entry for a request the caller gave up on.
    pub fn cancel(&mut self, id: RequestId) -> Option<T> {
        let payload = self.complete(id);
        if payload.is_some() {
            debug!(id, "request cancelled");
        }
        payload
    }

    /// Removes and returns every entry whose deadline is at or before `now`.
    pub fn evict_expired(&mut self, now: Instant) -> Vec<(RequestId, T)> {
        let expired: Vec<RequestId> = self
            .pending
            .iter()
            .filter(|(_, pending)| pending.deadline <= now)
            .map(|(&id, _)| id)
            .collect();

        let mut evicted: Vec<(RequestId, T)> = expired
            .into_iter()
            .filter_map(|id| self.complete(id).map(|payload| (id, payload)))
            .collect();
        evicted.sort_by_key(|(id, _)| *id);
        evicted
    }

    pub fn contains(&self, id: RequestId) -> bool {
        self.pending.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
