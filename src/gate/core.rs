//! The Gate itself: state, predicate dispatch, acquire/release, phase
//! locks, the reader cap, the turn registry, and waiter notification.

use std::fmt;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, MutexGuard};
use tracing::{debug, trace};

use crate::error::{GateError, Result};

use super::cap;
use super::guard::{ExclusiveGuard, ReadGuard, WriteGuard};
use super::policy::{self, Policy};
use super::state::GateInner;
use super::thread_id::ThreadIdentity;

/// Which of the three roles an operation concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Read,
    Write,
    Exclusive,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Read => "read",
            Role::Write => "write",
            Role::Exclusive => "exclusive",
        };
        f.write_str(s)
    }
}

/// A shared/exclusive synchronization primitive arbitrated by one of
/// five [`Policy`] values, with a single internal mutex and condition
/// variable backing every waiter.
///
/// See `SPEC_FULL.md` §4.1 for the full admission-predicate contract.
pub struct Gate {
    inner: Mutex<GateInner>,
    cv: Condvar,
    policy: Policy,
}

impl Gate {
    /// Creates a new gate arbitrated by `policy`. The policy is fixed
    /// for the lifetime of the gate.
    pub fn new(policy: Policy) -> Self {
        Self {
            inner: Mutex::new(GateInner::new()),
            cv: Condvar::new(),
            policy,
        }
    }

    /// The policy this gate was constructed with.
    pub fn policy(&self) -> Policy {
        self.policy
    }

    // ---------------------------------------------------------------
    // Snapshot counters
    // ---------------------------------------------------------------

    pub fn number_of_readers(&self) -> u32 {
        self.inner.lock().readers
    }

    pub fn number_of_writers(&self) -> u32 {
        self.inner.lock().writers
    }

    pub fn number_of_future_readers(&self) -> u32 {
        self.inner.lock().future_readers
    }

    // ---------------------------------------------------------------
    // Reader cap (process-wide)
    // ---------------------------------------------------------------

    /// Sets the process-wide reader cap shared by every `Gate`
    /// instance. `None` disables it. Does not evict current readers.
    pub fn set_reader_cap(cap: Option<u32>) {
        cap::set_reader_cap(cap);
    }

    /// Returns the process-wide reader cap, `None` if disabled.
    pub fn get_reader_cap() -> Option<u32> {
        cap::get_reader_cap()
    }

    // ---------------------------------------------------------------
    // Phase locks (administrative, orthogonal to the acquire protocol)
    // ---------------------------------------------------------------

    pub fn lock_readers(&self) {
        let mut st = self.inner.lock();
        st.block_readers = true;
        self.cv.notify_all();
    }

    pub fn unlock_readers(&self) {
        let mut st = self.inner.lock();
        st.block_readers = false;
        self.cv.notify_all();
    }

    pub fn lock_writers(&self) {
        let mut st = self.inner.lock();
        st.block_writers = true;
        self.cv.notify_all();
    }

    pub fn unlock_writers(&self) {
        let mut st = self.inner.lock();
        st.block_writers = false;
        self.cv.notify_all();
    }

    pub fn lock_shared(&self) {
        let mut st = self.inner.lock();
        st.block_readers = true;
        st.block_writers = true;
        self.cv.notify_all();
    }

    pub fn unlock_shared(&self) {
        let mut st = self.inner.lock();
        st.block_readers = false;
        st.block_writers = false;
        self.cv.notify_all();
    }

    /// Forces every parked waiter to re-evaluate its predicate, for
    /// out-of-band state changes (e.g. a cap change) that might not
    /// otherwise broadcast.
    pub fn notify(&self) {
        let _st = self.inner.lock();
        self.cv.notify_all();
    }

    // ---------------------------------------------------------------
    // Round-robin turn registry
    // ---------------------------------------------------------------

    pub fn register(&self) {
        let caller = ThreadIdentity::current();
        let mut st = self.inner.lock();
        st.turn_ring.register(caller);
        self.cv.notify_all();
    }

    pub fn unregister(&self) {
        let caller = ThreadIdentity::current();
        let mut st = self.inner.lock();
        st.turn_ring.unregister(caller);
        self.cv.notify_all();
    }

    // ---------------------------------------------------------------
    // Read acquire / release
    // ---------------------------------------------------------------

    /// Blocks until a read admission is granted.
    pub fn read_acquire(&self) -> Result<()> {
        let caller = ThreadIdentity::current();
        let mut st = self.inner.lock();
        if st.running_set.contains(&caller) {
            return Err(GateError::Reentry { role: Role::Read, thread: caller.raw() });
        }
        st.future_readers += 1;
        while !policy::read_admissible(self.policy, &st, caller, cap::get_reader_cap()) {
            self.cv.wait(&mut st);
        }
        st.future_readers -= 1;
        self.admit_read(&mut st, caller);
        Ok(())
    }

    /// Tries to acquire a read admission, parking for at most
    /// `timeout`. A zero timeout is a pure poll and never blocks.
    pub fn try_read_acquire(&self, timeout: Duration) -> bool {
        let caller = ThreadIdentity::current();
        let mut st = self.inner.lock();
        if st.running_set.contains(&caller) {
            return false;
        }
        st.future_readers += 1;
        let deadline = Instant::now() + timeout;
        loop {
            if policy::read_admissible(self.policy, &st, caller, cap::get_reader_cap()) {
                st.future_readers -= 1;
                self.admit_read(&mut st, caller);
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                st.future_readers -= 1;
                return false;
            }
            let _ = self.cv.wait_for(&mut st, deadline - now);
        }
    }

    /// Equivalent to `try_read_acquire(Duration::ZERO)`.
    pub fn try_read(&self) -> bool {
        self.try_read_acquire(Duration::ZERO)
    }

    pub fn read_release(&self) {
        let caller = ThreadIdentity::current();
        let mut st = self.inner.lock();
        debug_assert!(
            st.readers > 0 && st.running_set.contains(&caller),
            "releasing a read lock this thread does not hold"
        );
        st.readers = st.readers.saturating_sub(1);
        st.running_set.remove(&caller);
        trace!(readers = st.readers, "read released");
        self.cv.notify_all();
    }

    fn admit_read(&self, st: &mut MutexGuard<'_, GateInner>, caller: ThreadIdentity) {
        st.readers += 1;
        st.running_set.insert(caller);
        if self.policy == Policy::RoundRobin {
            st.turn_ring.advance();
        }
        trace!(readers = st.readers, "read admitted");
    }

    // ---------------------------------------------------------------
    // Write acquire / release
    // ---------------------------------------------------------------

    pub fn write_acquire(&self) -> Result<()> {
        let caller = ThreadIdentity::current();
        let mut st = self.inner.lock();
        if st.running_set.contains(&caller) {
            return Err(GateError::Reentry { role: Role::Write, thread: caller.raw() });
        }
        while !policy::write_admissible(self.policy, &st, caller) {
            self.cv.wait(&mut st);
        }
        self.admit_write(&mut st, caller);
        Ok(())
    }

    pub fn try_write_acquire(&self, timeout: Duration) -> bool {
        let caller = ThreadIdentity::current();
        let mut st = self.inner.lock();
        if st.running_set.contains(&caller) {
            return false;
        }
        let deadline = Instant::now() + timeout;
        loop {
            if policy::write_admissible(self.policy, &st, caller) {
                self.admit_write(&mut st, caller);
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let _ = self.cv.wait_for(&mut st, deadline - now);
        }
    }

    pub fn try_write(&self) -> bool {
        self.try_write_acquire(Duration::ZERO)
    }

    pub fn write_release(&self) {
        let caller = ThreadIdentity::current();
        let mut st = self.inner.lock();
        debug_assert!(
            st.writers > 0 && st.running_set.contains(&caller),
            "releasing a write lock this thread does not hold"
        );
        st.writers = st.writers.saturating_sub(1);
        st.running_set.remove(&caller);
        trace!(writers = st.writers, "write released");
        self.cv.notify_all();
    }

    fn admit_write(&self, st: &mut MutexGuard<'_, GateInner>, caller: ThreadIdentity) {
        st.writers += 1;
        st.running_set.insert(caller);
        if self.policy == Policy::RoundRobin {
            st.turn_ring.advance();
        }
        trace!(writers = st.writers, "write admitted");
    }

    // ---------------------------------------------------------------
    // Exclusive acquire / release
    //
    // Orthogonal to `policy`: drains every counter and arbitrates
    // purely on `exclusive_acquired`/`readers`/`writers`, regardless
    // of which preference policy the gate was constructed with.
    // ---------------------------------------------------------------

    pub fn exclusive_acquire(&self) -> Result<()> {
        let caller = ThreadIdentity::current();
        let mut st = self.inner.lock();
        if st.running_set.contains(&caller) {
            return Err(GateError::Reentry { role: Role::Exclusive, thread: caller.raw() });
        }
        st.exclusive_asked = true;
        while st.exclusive_acquired || st.readers > 0 || st.writers > 0 {
            self.cv.wait(&mut st);
        }
        st.exclusive_asked = false;
        st.exclusive_acquired = true;
        st.running_set.insert(caller);
        debug!("exclusive admitted");
        Ok(())
    }

    pub fn try_exclusive_acquire(&self, timeout: Duration) -> bool {
        let caller = ThreadIdentity::current();
        let mut st = self.inner.lock();
        if st.running_set.contains(&caller) {
            return false;
        }
        st.exclusive_asked = true;
        let deadline = Instant::now() + timeout;
        loop {
            if !st.exclusive_acquired && st.readers == 0 && st.writers == 0 {
                st.exclusive_asked = false;
                st.exclusive_acquired = true;
                st.running_set.insert(caller);
                debug!("exclusive admitted");
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                st.exclusive_asked = false;
                return false;
            }
            let _ = self.cv.wait_for(&mut st, deadline - now);
        }
    }

    pub fn try_exclusive(&self) -> bool {
        self.try_exclusive_acquire(Duration::ZERO)
    }

    pub fn exclusive_release(&self) {
        let caller = ThreadIdentity::current();
        let mut st = self.inner.lock();
        debug_assert!(
            st.exclusive_acquired && st.running_set.contains(&caller),
            "releasing the exclusive lock while this thread does not hold it"
        );
        st.exclusive_acquired = false;
        st.running_set.remove(&caller);
        debug!("exclusive released");
        self.cv.notify_all();
    }

    // ---------------------------------------------------------------
    // Scoped guards
    // ---------------------------------------------------------------

    pub fn read_guard(&self) -> Result<ReadGuard<'_>> {
        self.read_acquire()?;
        Ok(ReadGuard { gate: self })
    }

    pub fn try_read_guard(&self, timeout: Duration) -> Option<ReadGuard<'_>> {
        self.try_read_acquire(timeout).then_some(ReadGuard { gate: self })
    }

    pub fn write_guard(&self) -> Result<WriteGuard<'_>> {
        self.write_acquire()?;
        Ok(WriteGuard { gate: self })
    }

    pub fn try_write_guard(&self, timeout: Duration) -> Option<WriteGuard<'_>> {
        self.try_write_acquire(timeout).then_some(WriteGuard { gate: self })
    }

    pub fn exclusive_guard(&self) -> Result<ExclusiveGuard<'_>> {
        self.exclusive_acquire()?;
        Ok(ExclusiveGuard { gate: self })
    }

    pub fn try_exclusive_guard(&self, timeout: Duration) -> Option<ExclusiveGuard<'_>> {
        self.try_exclusive_acquire(timeout).then_some(ExclusiveGuard { gate: self })
    }
}
