//! Foundation types for the Soul registry.
//!
//! This crate provides the addressing, identity, temporal, and access-control
//! types shared by every other Soul crate.
//!
//! # Key Types
//!
//! - [`Address`]: 32-byte account or registry address derived with BLAKE3
//! - [`IdentityId`]: dense integer handle of a soul inside one registry
//! - [`SoulRef`]: a soul named by `(registry address, identity id)`
//! - [`Timestamp`]: ledger time in whole seconds
//! - [`CallContext`]: the caller and current time of one operation
//! - [`AccessControl`]: operator plus admin set for privileged operations
//! - [`ErrorClass`]: failure taxonomy shared by all error enums

pub mod access;
pub mod address;
pub mod error;
pub mod soul;
pub mod temporal;

pub use access::AccessControl;
pub use address::{Address, AddressMaterial};
pub use error::{AccessError, ErrorClass, TypeError};
pub use soul::{IdentityId, SoulRef};
pub use temporal::{CallContext, Timestamp};
