//! Stable exit codes for toposync CLI commands.

/// Action applied, or read-only command succeeded.
pub const OK: i32 = 0;
/// Storage or configuration fault; the audit guarantee is not verifiable.
pub const ERROR: i32 = 1;
/// Action precondition failed; the attempt was logged to `failures`.
pub const REJECTED: i32 = 2;
