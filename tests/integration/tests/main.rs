//! End-to-End Integration Tests
//!
//! These tests drive the external database provider through the federation
//! contracts. The `PostgreSQL` suite uses testcontainers for an ephemeral
//! database and needs Docker; it is ignored by default.

mod common;
mod concurrency;
mod lifecycle;
mod lookup;
mod postgres;
