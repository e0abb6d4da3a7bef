//! Animation lock

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Advisory flag held while a trick is in flight
///
/// Clones share the flag, so a timeline's completion callback can release the lock the
/// dispatcher acquired.
#[derive(Clone, Debug, Default)]
pub struct AnimationLock {
    held: Arc<AtomicBool>,
}

impl AnimationLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the lock. Returns false if it was already held.
    pub fn try_acquire(&self) -> bool {
        self.held
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub fn release(&self) {
        self.held.store(false, Ordering::SeqCst);
    }

    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_is_exclusive_and_shared() {
        let lock = AnimationLock::new();
        let clone = lock.clone();
        assert!(lock.try_acquire());
        assert!(!clone.try_acquire());
        clone.release();
        assert!(!lock.is_held());
    }
}
