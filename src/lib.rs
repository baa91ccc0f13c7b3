// Gatekeeper - pluggable shared/exclusive synchronization primitive
// Core library module

//! A shared/exclusive synchronization primitive ("the Gate") governing
//! concurrent access to a resource by readers, writers, and exclusive
//! holders under one of five configurable preference policies.
//!
//! # Module Organization
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`gate`] | The Gate itself: state, predicates, acquire/release, phase locks |
//! | [`resource`] | `ResourceBuffer`, the example protected resource used by tests/demo |
//! | [`workers`] | `Reader`/`Writer` worker drivers used by tests/demo |
//! | [`error`] | Crate-wide error type |
//!
//! # Quick Start
//!
//! ```
//! use gatekeeper::{Gate, Policy};
//!
//! let gate = Gate::new(Policy::Reader);
//! gate.read_acquire().unwrap();
//! assert_eq!(gate.number_of_readers(), 1);
//! gate.read_release();
//! ```

pub mod error;
pub mod gate;
pub mod resource;
pub mod workers;

pub use error::{GateError, Result};
pub use gate::{Gate, Policy, Role};

/// Crate version, reported by the demo binary's startup banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
