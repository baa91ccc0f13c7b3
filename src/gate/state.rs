//! The Gate's mutable state, guarded in its entirety by the Gate's
//! internal mutex (see [`super::core::Gate`]).

use std::collections::HashSet;

use super::thread_id::ThreadIdentity;
use super::turn_ring::TurnRing;

/// All fields mutated only while holding the Gate mutex.
///
/// Invariants (see SPEC_FULL.md §3):
/// - `exclusive_acquired` implies `readers == 0 && writers == 0`.
/// - a thread identity is in `running_set` iff it holds exactly one
///   role on this gate.
#[derive(Debug, Default)]
pub(crate) struct GateInner {
    pub readers: u32,
    pub writers: u32,
    pub future_readers: u32,
    pub exclusive_acquired: bool,
    pub exclusive_asked: bool,
    pub block_readers: bool,
    pub block_writers: bool,
    pub turn_ring: TurnRing,
    pub running_set: HashSet<ThreadIdentity>,
}

impl GateInner {
    pub(crate) fn new() -> Self {
        Self {
            turn_ring: TurnRing::new(),
            ..Default::default()
        }
    }
}
