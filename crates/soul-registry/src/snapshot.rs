//! Versioned registry snapshots.
//!
//! A snapshot captures everything an [`IdentityRegistry`] owns except the
//! restriction source handle, which is a live collaborator and must be
//! re-attached after a restore. Older snapshot layouts are upgraded by an
//! explicit [`migrate`] call; nothing is upgraded implicitly on restore.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use soul_crypto::VerifyingKey;
use soul_gate::MintConfig;
use soul_types::{AccessControl, Address, IdentityId};

use crate::error::{RegistryError, RegistryResult};
use crate::record::{IdentityRecord, RenewalRequest};
use crate::registry::{IdentityRegistry, RegistryState};

/// Current snapshot schema version.
pub const SCHEMA_VERSION: u32 = 2;

/// One soul with its recovery state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoulEntry {
    pub record: IdentityRecord,
    #[serde(default)]
    pub guardians: Vec<Address>,
    #[serde(default)]
    pub request: Option<RenewalRequest>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub version: u32,
    pub address: Address,
    pub chain_id: u64,
    pub access: AccessControl,
    pub config: MintConfig,
    /// Hex-encoded whitelist signer key.
    pub signer: Option<String>,
    pub next_id: IdentityId,
    pub souls: Vec<SoulEntry>,
}

/// Version 1 layout: identities only, no recovery tables.
#[derive(Deserialize)]
struct SnapshotV1 {
    address: Address,
    chain_id: u64,
    access: AccessControl,
    config: MintConfig,
    signer: Option<String>,
    next_id: IdentityId,
    records: Vec<IdentityRecord>,
}

impl From<SnapshotV1> for RegistrySnapshot {
    fn from(v1: SnapshotV1) -> Self {
        Self {
            version: SCHEMA_VERSION,
            address: v1.address,
            chain_id: v1.chain_id,
            access: v1.access,
            config: v1.config,
            signer: v1.signer,
            next_id: v1.next_id,
            souls: v1
                .records
                .into_iter()
                .map(|record| SoulEntry {
                    record,
                    guardians: Vec::new(),
                    request: None,
                })
                .collect(),
        }
    }
}

/// Upgrade a serialized snapshot of any supported version to the current
/// layout.
pub fn migrate(value: serde_json::Value) -> RegistryResult<RegistrySnapshot> {
    let version = value
        .get("version")
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| RegistryError::Snapshot("missing version field".into()))?;
    let version = u32::try_from(version).map_err(|_| RegistryError::UnsupportedVersion(u32::MAX))?;

    let decode = |e: serde_json::Error| RegistryError::Snapshot(e.to_string());
    match version {
        1 => {
            let v1: SnapshotV1 = serde_json::from_value(value).map_err(decode)?;
            tracing::info!(address = %v1.address, souls = v1.records.len(), "migrated registry snapshot from v1");
            Ok(v1.into())
        }
        SCHEMA_VERSION => serde_json::from_value(value).map_err(decode),
        other => Err(RegistryError::UnsupportedVersion(other)),
    }
}

impl IdentityRegistry {
    pub fn snapshot(&self) -> RegistryResult<RegistrySnapshot> {
        let state = self.read()?;
        let mut souls: Vec<SoulEntry> = state
            .records
            .values()
            .map(|record| SoulEntry {
                record: record.clone(),
                guardians: state
                    .guardians
                    .get(&record.id)
                    .map(|set| set.iter().copied().collect())
                    .unwrap_or_default(),
                request: state.requests.get(&record.id).cloned(),
            })
            .collect();
        souls.sort_by_key(|entry| entry.record.id);

        Ok(RegistrySnapshot {
            version: SCHEMA_VERSION,
            address: self.address(),
            chain_id: self.domain().chain_id,
            access: state.access.clone(),
            config: state.config.clone(),
            signer: state.signer.as_ref().map(VerifyingKey::to_hex),
            next_id: state.next_id,
            souls,
        })
    }

    /// Rebuild a registry from a current-version snapshot. Run older
    /// snapshots through [`migrate`] first.
    pub fn restore(snapshot: RegistrySnapshot) -> RegistryResult<Self> {
        if snapshot.version != SCHEMA_VERSION {
            return Err(RegistryError::UnsupportedVersion(snapshot.version));
        }

        let mut state = RegistryState::new(snapshot.access.operator());
        state.access = snapshot.access;
        state.config = snapshot.config;
        state.next_id = snapshot.next_id;
        state.signer = snapshot
            .signer
            .as_deref()
            .map(VerifyingKey::from_hex)
            .transpose()
            .map_err(|e| RegistryError::Snapshot(format!("signer key: {e}")))?;

        let mut records = HashMap::with_capacity(snapshot.souls.len());
        for entry in snapshot.souls {
            let id = entry.record.id;
            if id >= state.next_id {
                return Err(RegistryError::Snapshot(format!(
                    "identity {id} is not below next id {}",
                    state.next_id
                )));
            }
            if state.by_owner.insert(entry.record.owner, id).is_some() {
                return Err(RegistryError::Snapshot(format!(
                    "{} owns more than one identity",
                    entry.record.owner
                )));
            }
            if !entry.guardians.is_empty() {
                let set: BTreeSet<Address> = entry.guardians.into_iter().collect();
                state.guardians.insert(id, set);
            }
            if let Some(request) = entry.request {
                state.requests.insert(id, request);
            }
            if records.insert(id, entry.record).is_some() {
                return Err(RegistryError::Snapshot(format!("identity {id} appears twice")));
            }
        }
        state.records = records;

        tracing::info!(
            address = %snapshot.address,
            souls = state.records.len(),
            "registry restored from snapshot"
        );
        Ok(Self::from_state(snapshot.address, snapshot.chain_id, state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soul_crypto::SigningKey;
    use soul_types::{CallContext, Timestamp};

    fn operator() -> Address {
        Address::from_raw([0xAA; 32])
    }

    fn wallet(seed: u8) -> Address {
        Address::from_raw([seed; 32])
    }

    fn ctx(caller: Address) -> CallContext {
        CallContext::new(caller, Timestamp(500))
    }

    fn populated() -> IdentityRegistry {
        let reg = IdentityRegistry::with_chain_id(Address::from_raw([0x50; 32]), operator(), 7);
        let op = ctx(operator());
        reg.set_mint_config(&op, MintConfig::open(100, 0)).unwrap();
        reg.set_signer(&op, Some(SigningKey::from_bytes([3; 32]).verifying_key()))
            .unwrap();
        let id = reg.mint_direct(&op, wallet(1)).unwrap();
        let burned = reg.mint_direct(&op, wallet(2)).unwrap();
        reg.burn(&ctx(wallet(2)), burned).unwrap();
        reg.mint_direct(&op, wallet(3)).unwrap();
        reg.add_guardian(&ctx(wallet(1)), id, wallet(4)).unwrap();
        reg.request_renew(&ctx(wallet(1)), id, 1_000).unwrap();
        reg
    }

    #[test]
    fn restore_reproduces_state() {
        let reg = populated();
        let snap = reg.snapshot().unwrap();
        assert_eq!(snap.souls.len(), 2);
        assert_eq!(snap.next_id, IdentityId(3));

        let json = serde_json::to_value(&snap).unwrap();
        let restored = IdentityRegistry::restore(migrate(json).unwrap()).unwrap();
        assert_eq!(restored.snapshot().unwrap(), snap);
        assert_eq!(restored.domain().chain_id, 7);
        assert_eq!(restored.guardians(IdentityId(0)).unwrap(), vec![wallet(4)]);
        assert_eq!(restored.approval_count(IdentityId(0)).unwrap(), 1);

        // Ids are not reused after a restore either.
        let next = restored.mint_public(&ctx(wallet(9))).unwrap();
        assert_eq!(next, IdentityId(3));
    }

    #[test]
    fn migrate_upgrades_v1() {
        let v1 = serde_json::json!({
            "version": 1,
            "address": Address::from_raw([0x50; 32]),
            "chain_id": 1,
            "access": AccessControl::new(operator()),
            "config": MintConfig::default(),
            "signer": null,
            "next_id": 1,
            "records": [{ "id": 0, "owner": wallet(1), "created_at": 10 }],
        });
        let snap = migrate(v1).unwrap();
        assert_eq!(snap.version, SCHEMA_VERSION);
        assert!(snap.souls[0].guardians.is_empty());

        let reg = IdentityRegistry::restore(snap).unwrap();
        assert_eq!(reg.owner_of(IdentityId(0)).unwrap(), wallet(1));
        assert_eq!(reg.guardian_count(IdentityId(0)).unwrap(), 0);
    }

    #[test]
    fn unknown_versions_are_rejected() {
        let value = serde_json::json!({ "version": 9 });
        assert_eq!(migrate(value), Err(RegistryError::UnsupportedVersion(9)));

        let mut snap = populated().snapshot().unwrap();
        snap.version = 1;
        assert!(matches!(
            IdentityRegistry::restore(snap),
            Err(RegistryError::UnsupportedVersion(1))
        ));
    }

    #[test]
    fn restore_rejects_duplicate_owner() {
        let mut snap = populated().snapshot().unwrap();
        let mut dup = snap.souls[0].clone();
        dup.record.id = IdentityId(1);
        snap.souls.push(dup);
        assert!(matches!(
            IdentityRegistry::restore(snap),
            Err(RegistryError::Snapshot(_))
        ));
    }
}
