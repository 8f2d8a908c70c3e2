//! Deterministic, pure logic for topology lifecycle decisions.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod lifecycle;
pub mod types;
