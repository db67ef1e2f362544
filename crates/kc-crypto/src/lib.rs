//! # kc-crypto
//!
//! Password hash primitives for external user federation using aws-lc-rs.
//!
//! External user stores keep their own password hashes in whatever format
//! the owning application chose. This crate implements the verification
//! side of those formats so a federation provider can check a submitted
//! password without ever writing to the store.
//!
//! ## Supported formats
//!
//! - [`pkcs5s2`]: `{PKCS5S2}` PBKDF2-HMAC-SHA1 hashes

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod pkcs5s2;

pub use pkcs5s2::{Pkcs5S2Error, encode as encode_pkcs5s2, verify as verify_pkcs5s2};
