//! Crate-wide error type.
//!
//! The Gate has exactly one fatal error condition: a thread attempting
//! to acquire a second role while it already holds one on the same
//! gate. Timeouts are not errors — timed acquires return `bool`.

use std::thread::ThreadId;

use thiserror::Error;

use crate::gate::Role;

/// Result type alias for gate operations.
pub type Result<T> = std::result::Result<T, GateError>;

/// Errors surfaced by blocking Gate operations.
#[derive(Debug, Error)]
pub enum GateError {
    /// The calling thread already holds a role on this gate.
    #[error("thread {thread:?} attempted to acquire {role} while already holding a role on this gate")]
    Reentry { role: Role, thread: ThreadId },
}
