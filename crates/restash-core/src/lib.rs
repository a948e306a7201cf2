//! Core domain logic for restash.
//!
//! Everything in this crate is pure composition over the
//! [`restash_git`] traits — no process execution, no parsing. The crate
//! exists so the saga can be exercised against an in-memory stash stack.
//!
//! # Crate layout
//!
//! - [`position`] — live-index arithmetic for the position-addressed stack.
//! - [`classify`] — overwrite-conflict vs unexpected-failure classification.
//! - [`error`] — the [`ReconcileError`] taxonomy and [`SagaStep`].
//! - [`engine`] — the [`ReconciliationEngine`] merge-into-snapshot saga.

pub mod classify;
pub mod engine;
pub mod error;
pub mod position;

pub use classify::{FailureKind, classify};
pub use engine::{ReconciliationEngine, TEMP_LABEL};
pub use error::{ErrorKind, ReconcileError, SagaStep};
