//! Admission gate bounding concurrent extraction attempts.
//!
//! The engine is synchronous and stateless; what needs bounding is the
//! number of attempts in flight against the upstream completion service.
//! [`AdmissionGate`] is a counting gate over a fair (FIFO)
//! [`tokio::sync::Semaphore`]: callers past the ceiling wait and are
//! admitted in arrival order as slots free up.
//!
//! ```
//! use factuur::gate::AdmissionGate;
//!
//! let gate = AdmissionGate::default();
//! assert_eq!(gate.limit(), 500);
//! assert_eq!(gate.available(), 500);
//! ```

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{AcquireError, Semaphore};

/// Ceiling on concurrent in-flight attempts.
pub const DEFAULT_IN_FLIGHT_LIMIT: usize = 500;

/// Cloneable handle to a shared admission gate.
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    permits: Arc<Semaphore>,
    limit: usize,
}

impl AdmissionGate {
    /// Gate admitting at most `limit` attempts at once (at least one).
    pub fn new(limit: usize) -> Self {
        let limit = limit.clamp(1, Semaphore::MAX_PERMITS);
        Self {
            permits: Arc::new(Semaphore::new(limit)),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Free slots right now.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Attempts currently admitted.
    pub fn in_flight(&self) -> usize {
        self.limit - self.available()
    }

    /// Wait for a slot, then run `attempt` while holding it.
    ///
    /// Fails only once the gate has been [closed](Self::close).
    pub async fn admit<F: Future>(&self, attempt: F) -> Result<F::Output, AcquireError> {
        let _permit = self.permits.acquire().await?;
        Ok(attempt.await)
    }

    /// Stop admitting: waiting and future callers fail, running attempts finish.
    pub fn close(&self) {
        self.permits.close();
    }

    pub fn is_closed(&self) -> bool {
        self.permits.is_closed()
    }
}

impl Default for AdmissionGate {
    fn default() -> Self {
        Self::new(DEFAULT_IN_FLIGHT_LIMIT)
    }
}
