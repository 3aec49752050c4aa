//! Caps the number of simultaneously running analyses.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Hands out at most `cap` concurrent [`AdmissionSlot`]s.
///
/// There is no queue: a request that finds the cap reached is dropped by
/// its caller. The change trigger re-fires on subsequent edits, so a lost
/// request self-heals.
#[derive(Debug, Clone)]
pub(crate) struct AdmissionController {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    cap: usize,
    in_flight: AtomicUsize,
}

impl AdmissionController {
    pub fn new(cap: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                cap,
                in_flight: AtomicUsize::new(0),
            }),
        }
    }

    /// Claim a slot, or `None` when the cap is reached.
    ///
    /// A cap of 0 rejects every request: analysis is disabled entirely.
    pub fn try_admit(&self) -> Option<AdmissionSlot> {
        let mut current = self.inner.in_flight.load(Ordering::Acquire);
        loop {
            if current >= self.inner.cap {
                return None;
            }
            match self.inner.in_flight.compare_exchange_weak(
                current,
                current + 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    return Some(AdmissionSlot {
                        inner: Arc::clone(&self.inner),
                    });
                }
                Err(observed) => current = observed,
            }
        }
    }

    /// Number of currently held slots.
    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::Acquire)
    }
}

/// One unit of the concurrency cap, held by exactly one running worker.
///
/// Dropping releases the slot, so release happens on every worker exit
/// path, including unwinds.
#[derive(Debug)]
pub(crate) struct AdmissionSlot {
    inner: Arc<Inner>,
}

impl Drop for AdmissionSlot {
    fn drop(&mut self) {
        self.inner.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}
