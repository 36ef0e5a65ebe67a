//! Non-reentrant execution lock.
//!
//! Fill and cancel hand control to external collaborators (the ledger and
//! the directive processor). A hostile collaborator could call straight back
//! into the orchestrator; this lock turns such a nested call into
//! [`TribunalError::ReentrancyGuard`].
//!
//! The lock remembers the thread that holds it. Entry from that thread is
//! nested and fails; entry from any other thread waits until the holder
//! releases. Collaborators must therefore not block on another thread that
//! calls into the same orchestrator.
//!
//! The lock is released by dropping the guard, so every exit path (success,
//! `?` early return, panic unwind) leaves it open again.

use std::thread::{self, ThreadId};

use parking_lot::{Condvar, Mutex};
use tribunal_types::{Result, TribunalError};

/// Per-instance lock rejecting nested entry and serialising other threads.
#[derive(Debug, Default)]
pub struct ReentrancyLock {
    owner: Mutex<Option<ThreadId>>,
    released: Condvar,
}

impl ReentrancyLock {
    /// Create an open lock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the lock, waiting while another thread holds it. The returned
    /// guard releases it on drop.
    ///
    /// # Errors
    /// Returns [`TribunalError::ReentrancyGuard`] if the calling thread
    /// already holds the lock.
    pub fn enter(&self) -> Result<ReentrancyGuard<'_>> {
        let me = thread::current().id();
        let mut owner = self.owner.lock();
        if *owner == Some(me) {
            return Err(TribunalError::ReentrancyGuard);
        }
        while owner.is_some() {
            self.released.wait(&mut owner);
        }
        *owner = Some(me);
        Ok(ReentrancyGuard { lock: self })
    }

    /// Wait for a consistent view for a read-only operation.
    ///
    /// Returns `None` when the calling thread already holds the lock, so a
    /// nested read sees the enclosing operation's writes. Otherwise waits
    /// for the holder and returns a guard.
    pub fn observe(&self) -> Option<ReentrancyGuard<'_>> {
        self.enter().ok()
    }

    /// Whether an operation currently holds the lock.
    #[must_use]
    pub fn is_entered(&self) -> bool {
        self.owner.lock().is_some()
    }
}

/// Proof that the lock is held.
#[derive(Debug)]
pub struct ReentrancyGuard<'a> {
    lock: &'a ReentrancyLock,
}

impl Drop for ReentrancyGuard<'_> {
    fn drop(&mut self) {
        *self.lock.owner.lock() = None;
        self.lock.released.notify_one();
    }
}
