//! Experiment bookkeeping utilities.
//!
//! Three independent pieces used during an experimentation session:
//!
//! - **[`ledger`]**: append-only run ledger. Each run is persisted as one
//!   JSON document at append time; a fixed-column CSV summary is derived on
//!   demand across all runs.
//! - **[`registry`]**: versioned prompt registry backed by a single TOML
//!   document with plain-text archive exports.
//! - **[`display`]**: plain-text table rendering of the run log.
//!
//! Everything here is single-threaded and synchronous; callers own the
//! instances and pass them explicitly (no process-wide state).

pub mod display;
pub mod ledger;
pub mod registry;

pub use ledger::{RunLedger, RunRecord};
pub use registry::{PromptEntry, PromptRegistry, PromptRole};
