//! The five preference policies and their admission predicates.
//!
//! Each policy is a pair of pure functions of the Gate's counters plus
//! the caller's identity: `read_admissible` and `write_admissible`.
//! Dispatch is a `match` on [`Policy`] at the acquire site rather than
//! a stored closure table — it is observably identical to the
//! closure-per-policy design the reference implementation uses, but
//! avoids a heap allocation per Gate and keeps the five arms
//! exhaustive-checked by the compiler.

use super::state::GateInner;
use super::thread_id::ThreadIdentity;

/// Preference policy deciding which role wins contention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Readers and writers arbitrate through the same one-at-a-time
    /// predicate; arbitration among waiters is left to the scheduler.
    Xclusive,
    /// Only the identity at the front of the registered turn ring may
    /// acquire, read or write, one at a time.
    RoundRobin,
    /// Readers are never blocked by writer activity; writers wait for
    /// current *and future* readers to drain.
    Reader,
    /// A solitary reader may coexist with a readers-only gate, but no
    /// new reader starts while writers are active; writers are never
    /// blocked by readers.
    Writer,
    /// Writers serialize against each other and against readers;
    /// readers only wait on an active writer.
    None,
}

/// Layer A + Layer B for a read acquire.
pub(crate) fn read_admissible(
    policy: Policy,
    st: &GateInner,
    caller: ThreadIdentity,
    reader_cap: Option<u32>,
) -> bool {
    if st.exclusive_acquired || st.exclusive_asked {
        return false;
    }
    if st.block_readers {
        return false;
    }
    if let Some(cap) = reader_cap {
        if st.readers >= cap {
            return false;
        }
    }
    match policy {
        Policy::None => st.writers == 0,
        Policy::Reader => true,
        Policy::Writer => !(st.readers >= 1 && st.writers > 0),
        Policy::RoundRobin => {
            st.readers + st.writers == 0 && st.turn_ring.current() == Some(caller)
        }
        Policy::Xclusive => st.readers + st.writers == 0,
    }
}

/// Layer A + Layer B for a write acquire.
pub(crate) fn write_admissible(policy: Policy, st: &GateInner, caller: ThreadIdentity) -> bool {
    if st.exclusive_acquired || st.exclusive_asked {
        return false;
    }
    if st.block_writers {
        return false;
    }
    match policy {
        Policy::None => st.writers == 0 && st.readers == 0,
        Policy::Reader => st.readers == 0 && st.future_readers == 0,
        Policy::Writer => true,
        Policy::RoundRobin => {
            st.readers + st.writers == 0 && st.turn_ring.current() == Some(caller)
        }
        Policy::Xclusive => st.readers + st.writers == 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_state() -> GateInner {
        GateInner::new()
    }

    #[test]
    fn none_policy_serializes_writers_but_not_readers() {
        let caller = ThreadIdentity::current();
        let mut st = empty_state();
        assert!(read_admissible(Policy::None, &st, caller, None));
        assert!(write_admissible(Policy::None, &st, caller));
        st.writers = 1;
        assert!(!read_admissible(Policy::None, &st, caller, None));
        assert!(!write_admissible(Policy::None, &st, caller));
    }

    #[test]
    fn reader_policy_write_blocked_by_future_readers() {
        let caller = ThreadIdentity::current();
        let mut st = empty_state();
        assert!(write_admissible(Policy::Reader, &st, caller));
        st.future_readers = 1;
        assert!(!write_admissible(Policy::Reader, &st, caller));
    }

    #[test]
    fn writer_policy_lets_solitary_reader_coexist_with_readers() {
        let caller = ThreadIdentity::current();
        let mut st = empty_state();
        st.readers = 1;
        assert!(read_admissible(Policy::Writer, &st, caller, None));
        st.writers = 1;
        assert!(!read_admissible(Policy::Writer, &st, caller, None));
    }

    #[test]
    fn exclusive_asked_blocks_every_policy() {
        let caller = ThreadIdentity::current();
        let mut st = empty_state();
        st.exclusive_asked = true;
        for policy in [
            Policy::Xclusive,
            Policy::RoundRobin,
            Policy::Reader,
            Policy::Writer,
            Policy::None,
        ] {
            assert!(!read_admissible(policy, &st, caller, None));
            assert!(!write_admissible(policy, &st, caller));
        }
        st.exclusive_asked = false;
    }

    #[test]
    fn reader_cap_refuses_at_the_boundary() {
        let caller = ThreadIdentity::current();
        let mut st = empty_state();
        st.readers = 5;
        assert!(!read_admissible(Policy::Reader, &st, caller, Some(5)));
        st.readers = 4;
        assert!(read_admissible(Policy::Reader, &st, caller, Some(5)));
    }

    #[test]
    fn round_robin_grants_only_to_the_turn_holder() {
        let other = std::thread::spawn(ThreadIdentity::current)
            .join()
            .unwrap();
        let caller = ThreadIdentity::current();
        let mut st = empty_state();
        st.turn_ring.register(other);
        assert!(!read_admissible(Policy::RoundRobin, &st, caller, None));
        st.turn_ring.register(caller);
        // `other` still holds the turn (index 0)
        assert!(!read_admissible(Policy::RoundRobin, &st, caller, None));
        st.turn_ring.advance();
        assert!(read_admissible(Policy::RoundRobin, &st, caller, None));
    }
}
