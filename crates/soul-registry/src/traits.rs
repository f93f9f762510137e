use soul_types::{Address, IdentityId};

use crate::error::RegistryResult;

/// Read boundary other components use to resolve souls.
///
/// Badge containers and the reputation registry hold an
/// `Arc<dyn SoulDirectory>` rather than a concrete registry, so any
/// registry that can answer these queries can back them.
pub trait SoulDirectory: Send + Sync {
    /// Address the directory is deployed at.
    fn address(&self) -> Address;

    /// Current owner of `id`. Fails `UnknownIdentity` if it does not exist.
    fn owner_of(&self, id: IdentityId) -> RegistryResult<Address>;

    /// Identity held by `owner`. Fails `NoIdentity` if it holds none.
    fn resolve(&self, owner: &Address) -> RegistryResult<IdentityId>;

    /// Whether `id` currently exists.
    fn exists(&self, id: IdentityId) -> RegistryResult<bool> {
        match self.owner_of(id) {
            Ok(_) => Ok(true),
            Err(crate::error::RegistryError::UnknownIdentity(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
