//! Cooperative cancellation and the image progress counter.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared stop switch checked before each image check.
///
/// Clones share the same flag, so a caller can keep one handle and pass
/// another to [`crate::Analyzer::with_cancel`].
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Counts completed image checks. Only ever moves forward by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ImageProgress {
    processed: usize,
    total: usize,
}

impl ImageProgress {
    pub(crate) fn new(total: usize) -> Self {
        Self {
            processed: 0,
            total,
        }
    }

    /// Records one finished attempt and returns the new processed count.
    pub(crate) fn advance(&mut self) -> usize {
        debug_assert!(self.processed < self.total, "progress overran total");
        self.processed += 1;
        self.processed
    }

    pub(crate) fn processed(&self) -> usize {
        self.processed
    }

    pub(crate) fn total(&self) -> usize {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_is_visible_through_clones() {
        let flag = CancelFlag::new();
        let handle = flag.clone();
        assert!(!handle.is_cancelled());
        flag.cancel();
        assert!(handle.is_cancelled());
    }

    #[test]
    fn progress_advances_one_at_a_time() {
        let mut progress = ImageProgress::new(3);
        assert_eq!(progress.processed(), 0);
        assert_eq!(progress.advance(), 1);
        assert_eq!(progress.advance(), 2);
        assert_eq!(progress.advance(), 3);
        assert_eq!(progress.total(), 3);
    }
}
