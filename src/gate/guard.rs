//! RAII guards over the raw acquire/release pairs.
//!
//! Additive sugar only — they do not change any predicate or
//! invariant, they just guarantee release on every exit path the way
//! a `parking_lot::MutexGuard` does for `parking_lot::Mutex`.

use super::core::Gate;

/// Holds a read admission on a [`Gate`] for as long as it is alive.
pub struct ReadGuard<'a> {
    pub(super) gate: &'a Gate,
}

impl Drop for ReadGuard<'_> {
    fn drop(&mut self) {
        self.gate.read_release();
    }
}

/// Holds a write admission on a [`Gate`] for as long as it is alive.
pub struct WriteGuard<'a> {
    pub(super) gate: &'a Gate,
}

impl Drop for WriteGuard<'_> {
    fn drop(&mut self) {
        self.gate.write_release();
    }
}

/// Holds the exclusive lock on a [`Gate`] for as long as it is alive.
pub struct ExclusiveGuard<'a> {
    pub(super) gate: &'a Gate,
}

impl Drop for ExclusiveGuard<'_> {
    fn drop(&mut self) {
        self.gate.exclusive_release();
    }
}
