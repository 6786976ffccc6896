//! Counting semaphore used for the pool's completion signal and the
//! crawler's wake/park handoff
//!
//! Permits persist until consumed: a `release` that happens before the
//! matching `acquire` is never lost.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// A blocking counting semaphore built from a mutex and a condition variable
#[derive(Debug, Default)]
pub struct Semaphore {
    permits: Mutex<usize>,
    available: Condvar,
}

impl Semaphore {
    /// Creates a semaphore holding `permits` initial permits
    pub fn new(permits: usize) -> Self {
        Self {
            permits: Mutex::new(permits),
            available: Condvar::new(),
        }
    }

    /// Blocks until a permit is available, then takes it
    pub fn acquire(&self) {
        let mut permits = self.lock();
        while *permits == 0 {
            permits = self
                .available
                .wait(permits)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *permits -= 1;
    }

    /// Adds one permit and wakes one waiter
    pub fn release(&self) {
        *self.lock() += 1;
        self.available.notify_one();
    }

    // The counter is always left consistent, so a poisoned lock is still usable
    fn lock(&self) -> MutexGuard<'_, usize> {
        self.permits.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
impl Semaphore {
    fn available_permits(&self) -> usize {
        *self.lock()
    }
}
