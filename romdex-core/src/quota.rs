//! Shared request-allowance tracking.

use std::sync::atomic::{AtomicI64, Ordering};

const UNKNOWN: i64 = -1;

/// Remaining-request counter shared by every worker in a scrape session.
///
/// Starts unknown. A source that reports its allowance stores it; a source
/// that signals exhaustion zeroes it. Once zero, holders skip further
/// network calls for the rest of the session. The counter never goes below
/// zero and never leaves the exhausted state.
#[derive(Debug)]
pub struct QuotaState {
    remaining: AtomicI64,
}

impl QuotaState {
    pub fn new() -> Self {
        QuotaState {
            remaining: AtomicI64::new(UNKNOWN),
        }
    }

    /// Remaining requests, if any source has reported a figure.
    pub fn remaining(&self) -> Option<i64> {
        let value = self.remaining.load(Ordering::Relaxed);
        (value >= 0).then_some(value)
    }

    /// Record an allowance reported by a source. Negative figures are
    /// treated as zero; an exhausted counter stays exhausted.
    pub fn set_remaining(&self, remaining: i64) {
        if self.is_exhausted() {
            return;
        }
        self.remaining.store(remaining.max(0), Ordering::Relaxed);
    }

    /// Mark the allowance as spent.
    pub fn exhaust(&self) {
        self.remaining.store(0, Ordering::Relaxed);
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining.load(Ordering::Relaxed) == 0
    }
}

impl Default for QuotaState {
    fn default() -> Self {
        Self::new()
    }
}
