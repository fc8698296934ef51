//! Cooperative cancellation
//!
//! Cancellation is cooperative, not preemptive: every expensive loop in the
//! pipeline polls a shared flag at its top and aborts early when it is set.
//! The flag is an explicit capability passed into each stage, so unit tests
//! can inject deterministic cancellation at any poll point.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag polled by every pipeline stage.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Takes effect at the next poll point.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_canceled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_starts_clear_and_latches() {
        let token = CancellationToken::new();
        assert!(!token.is_canceled());

        let other = token.clone();
        other.cancel();
        assert!(token.is_canceled());
    }
}
