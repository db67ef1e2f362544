//! # kc-federation-sql
//!
//! Read-only user federation from an external SQL user table.
//!
//! The provider resolves users from a table owned by another application
//! and checks passwords against the hashes stored there. It never writes to
//! that table: password updates are refused with
//! [`FederationError::ReadOnly`](kc_federation::FederationError::ReadOnly).
//!
//! ## Components
//!
//! - [`ExternalDatabaseStorageProvider`] - lookup, validation and lifecycle
//! - [`UserDao`] - the data-access contract, with [`SqlUserDao`] for
//!   PostgreSQL, and an in-memory store for tests behind the `test-util`
//!   feature
//! - [`IdentityCache`] - resolved users keyed by username
//! - [`PasswordHashingAlgorithm`] - how stored hashes are verified

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod cache;
pub mod config;
pub mod connection;
pub mod dao;
pub mod error;
pub mod mapper;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod password;
pub mod provider;

pub use cache::IdentityCache;
pub use config::ExternalDatabaseConfig;
pub use dao::{SqlUserDao, UserDao};
pub use error::{ExternalDbError, ExternalDbResult};
pub use mapper::ExternalUserRecord;
#[cfg(any(test, feature = "test-util"))]
pub use memory::InMemoryUserDao;
pub use password::PasswordHashingAlgorithm;
pub use provider::ExternalDatabaseStorageProvider;
