//! Abort Signal

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A shared flag used to stop a render early. Workers check it between
/// samples and between Markov chain iterations, never in the middle of one.
#[derive(Clone, Debug, Default)]
pub struct AbortSignal(Arc<AtomicBool>);

impl AbortSignal {
    /// Returns a new signal that is not raised.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the signal.
    pub fn abort(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Returns `true` once the signal was raised by any clone.
    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let signal = AbortSignal::new();
        let worker = signal.clone();
        assert!(!worker.is_aborted());
        signal.abort();
        assert!(worker.is_aborted());
    }
}
