//! # kc-federation
//!
//! User federation framework for Keycloak Rust.
//!
//! This crate provides the contracts a user federation provider implements
//! to expose an external identity store to the host:
//!
//! - [`UserLookupProvider`] - resolve users by id, username or email
//! - [`CredentialInputValidator`] - check submitted credentials
//! - [`CredentialInputUpdater`] - credential mutation (or its refusal)
//! - [`UserStorageProvider`] - provider metadata and disposal
//!
//! Users handed to the host are immutable [`UserView`] projections.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod credential;
pub mod error;
pub mod provider;
pub mod storage_id;
pub mod user;

pub use config::{CachePolicy, EditMode, FederationConfig};
pub use credential::{CredentialInput, CredentialType};
pub use error::{FederationError, FederationResult};
pub use provider::{
    CredentialInputUpdater, CredentialInputValidator, UserLookupProvider, UserStorageProvider,
};
pub use storage_id::StorageId;
pub use user::UserView;
