//! A wallet-indexed collectible.
//!
//! Plain non-soulbound tokens held by wallets. Serves as a restriction
//! source for `RestrictedToExternalHolder` minting and as a reputation input
//! counted against an identity's current owner.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use soul_gate::{GatingError, TokenHolder};
use soul_types::{AccessControl, Address, CallContext, SoulRef};

use crate::error::{BadgeError, BadgeResult};
use crate::source::{BadgeKind, BadgeSource, TokenId};

/// Largest batch a single [`Collectible::mint`] call accepts.
pub const MAX_MINT_BATCH: u64 = 1_000;

pub struct Collectible {
    address: Address,
    name: String,
    inner: RwLock<CollectibleState>,
}

struct CollectibleState {
    access: AccessControl,
    owners: Vec<Address>,
    balances: HashMap<Address, u64>,
}

impl Collectible {
    pub fn new(address: Address, name: impl Into<String>, operator: Address) -> Self {
        Self {
            address,
            name: name.into(),
            inner: RwLock::new(CollectibleState {
                access: AccessControl::new(operator),
                owners: Vec::new(),
                balances: HashMap::new(),
            }),
        }
    }

    fn read(&self) -> BadgeResult<RwLockReadGuard<'_, CollectibleState>> {
        self.inner.read().map_err(|_| BadgeError::LockPoisoned)
    }

    fn write(&self) -> BadgeResult<RwLockWriteGuard<'_, CollectibleState>> {
        self.inner.write().map_err(|_| BadgeError::LockPoisoned)
    }

    /// Mint `quantity` tokens to `to`. Returns the first new token id.
    pub fn mint(&self, ctx: &CallContext, to: Address, quantity: u64) -> BadgeResult<TokenId> {
        let mut state = self.write()?;
        state.access.ensure_admin(ctx)?;
        let invalid = BadgeError::InvalidQuantity {
            quantity,
            max: MAX_MINT_BATCH,
        };
        if !(1..=MAX_MINT_BATCH).contains(&quantity) {
            return Err(invalid);
        }
        let held = state.balances.get(&to).copied().unwrap_or(0);
        let balance = held.checked_add(quantity).ok_or(invalid)?;

        let first = TokenId(state.owners.len() as u64);
        state
            .owners
            .extend(std::iter::repeat(to).take(quantity as usize));
        state.balances.insert(to, balance);
        tracing::info!(collectible = %self.address, to = %to, quantity, "collectible minted");
        Ok(first)
    }

    pub fn total_supply(&self) -> BadgeResult<u64> {
        Ok(self.read()?.owners.len() as u64)
    }

    pub fn balance_of(&self, wallet: &Address) -> BadgeResult<u64> {
        Ok(self.read()?.balances.get(wallet).copied().unwrap_or(0))
    }

    pub fn owner_of(&self, token: TokenId) -> BadgeResult<Address> {
        let state = self.read()?;
        usize::try_from(token.0)
            .ok()
            .and_then(|i| state.owners.get(i))
            .copied()
            .ok_or(BadgeError::UnknownToken(token))
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl TokenHolder for Collectible {
    fn balance_of(&self, owner: &Address) -> Result<u64, GatingError> {
        Collectible::balance_of(self, owner).map_err(|e| GatingError::SourceUnavailable(e.to_string()))
    }
}

impl BadgeSource for Collectible {
    fn address(&self) -> Address {
        self.address
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn kind(&self) -> BadgeKind {
        BadgeKind::Collectible
    }

    fn balance_of_soul(&self, _soul: &SoulRef) -> BadgeResult<u64> {
        Ok(0)
    }

    fn balance_of(&self, wallet: &Address) -> BadgeResult<u64> {
        Collectible::balance_of(self, wallet)
    }

    fn owner_soul_of(&self, token: TokenId) -> BadgeResult<Address> {
        self.owner_of(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soul_types::Timestamp;

    fn wallet(seed: u8) -> Address {
        Address::from_raw([seed; 32])
    }

    #[test]
    fn mint_and_balances() {
        let nft = Collectible::new(wallet(0x70), "PFP", wallet(1));
        let ctx = CallContext::new(wallet(1), Timestamp(1));
        assert_eq!(nft.mint(&ctx, wallet(2), 2).unwrap(), TokenId(0));
        assert_eq!(nft.mint(&ctx, wallet(3), 1).unwrap(), TokenId(2));

        assert_eq!(Collectible::balance_of(&nft, &wallet(2)).unwrap(), 2);
        assert_eq!(TokenHolder::balance_of(&nft, &wallet(4)), Ok(0));
        assert_eq!(nft.owner_of(TokenId(2)).unwrap(), wallet(3));
        assert_eq!(nft.total_supply().unwrap(), 3);
        assert_eq!(BadgeSource::kind(&nft), BadgeKind::Collectible);
    }

    #[test]
    fn mint_rejects_empty_and_oversized_batches() {
        let nft = Collectible::new(wallet(0x70), "PFP", wallet(1));
        let ctx = CallContext::new(wallet(1), Timestamp(1));
        for quantity in [0, MAX_MINT_BATCH + 1, u64::MAX] {
            assert_eq!(
                nft.mint(&ctx, wallet(2), quantity),
                Err(BadgeError::InvalidQuantity {
                    quantity,
                    max: MAX_MINT_BATCH
                })
            );
        }
        assert_eq!(nft.total_supply().unwrap(), 0);

        nft.mint(&ctx, wallet(2), MAX_MINT_BATCH).unwrap();
        assert_eq!(Collectible::balance_of(&nft, &wallet(2)).unwrap(), MAX_MINT_BATCH);
    }

    #[test]
    fn mint_is_admin_only() {
        let nft = Collectible::new(wallet(0x70), "PFP", wallet(1));
        let stranger = CallContext::new(wallet(2), Timestamp(1));
        assert!(matches!(
            nft.mint(&stranger, wallet(2), 1),
            Err(BadgeError::Access(_))
        ));
    }
}
