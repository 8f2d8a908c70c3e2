//! Single-topology lifecycle tracker with an append-only action audit log.
//!
//! Tracks one "current topology" record (`.toposync/actionDb.json`) through
//! added → deployed → removed, and records every attempted action in
//! success/failure logs. The architecture enforces a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (precondition checks, state
//!   transitions, log classification). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (config and action-db files).
//!   Isolated to keep storage faults distinct from domain rejections.
//!
//! [`apply`] coordinates core logic with I/O to implement the CLI commands.

pub mod apply;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
