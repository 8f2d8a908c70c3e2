//! I/O helpers for toposync commands.

pub mod config;
pub mod store;
