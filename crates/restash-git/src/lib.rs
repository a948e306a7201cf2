//! Git stash abstraction layer for restash.
//!
//! This crate defines the two traits through which all other restash crates
//! interact with the stash stack and the working tree. No restash crate runs
//! git directly; instead, they depend on `restash-git` and program against
//! the traits — which is also how the reconciliation engine's tests swap in
//! an in-memory stack.
//!
//! # Crate layout
//!
//! - [`store`] — the [`SnapshotStore`] trait (save / apply / discard /
//!   apply-and-discard / list).
//! - [`preview`] — the [`PreviewCalculator`] trait (working-tree summaries).
//! - [`types`] — value types used in trait signatures ([`Snapshot`],
//!   [`PreviewSummary`], [`ChangeEntry`], [`SaveFlags`]).
//! - [`error`] — the [`GitError`] enum returned by all trait methods.

pub mod error;
pub mod preview;
pub mod store;
pub mod types;

// git-CLI-backed implementation modules
mod cli_repo;
mod preview_impl;
mod stash_impl;

pub use cli_repo::GitCli;

// Re-export the traits and commonly used types at the crate root for
// ergonomic imports: `use restash_git::{SnapshotStore, Snapshot, GitError};`
pub use error::GitError;
pub use preview::PreviewCalculator;
pub use store::SnapshotStore;
pub use types::{ChangeEntry, PreviewSummary, SaveFlags, Snapshot};
