//! Identity registry for the Soul system.
//!
//! An [`IdentityRegistry`] issues non-transferable souls, at most one per
//! address. Minting goes through the shared mint gate; an administrator can
//! mint directly. The only way an identity changes hands is a renewal
//! approved by a strict majority of its owner plus guardians.
//!
//! Other components see the registry through the [`SoulDirectory`] trait.

pub mod error;
pub mod guardian;
pub mod record;
pub mod registry;
pub mod snapshot;
pub mod traits;

pub use error::{RegistryError, RegistryResult};
pub use record::{approval_quorum, IdentityRecord, RenewalRequest, RenewalStatus};
pub use registry::{IdentityRegistry, DEFAULT_CHAIN_ID};
pub use snapshot::{migrate, RegistrySnapshot, SoulEntry, SCHEMA_VERSION};
pub use traits::SoulDirectory;
