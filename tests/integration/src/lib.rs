//! End-to-end tests for external database user federation.
//!
//! The tests live under `tests/`; this crate has no library code.

#![forbid(unsafe_code)]
