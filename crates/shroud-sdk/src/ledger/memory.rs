// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! In-process append-only ledger.
//!
//! Each committed transaction occupies one slot. Per pool it keeps a sparse
//! Merkle tree of commitments and the published note records; nullifiers are
//! global and may be published only once.

use std::collections::{BTreeMap, HashSet};

use ark_bls12_381::Fr;
use shroud_primitives::derive_account_hash;
use shroud_types::{EncryptedNote, MerkleProof, Nullifier, Point, PoolId};
use tokio::sync::RwLock;

use super::{LedgerClient, NoteRecord, NullifierRecord};
use crate::error::{SdkError, SdkResult};
use crate::merkle::{empty_root, SparseMerkleTree, TREE_CAPACITY};
use crate::wallet::fr_to_hex;

/// An output as a transaction publishes it, before the ledger assigns a leaf.
#[derive(Clone, Debug)]
pub struct NewOutput {
    pub commitment: Fr,
    pub encrypted: EncryptedNote,
    pub stealth_ephemeral_pubkey: Option<Point>,
}

struct PoolState {
    tree: SparseMerkleTree,
    notes: Vec<NoteRecord>,
}

#[derive(Default)]
struct State {
    slot: u64,
    pools: BTreeMap<PoolId, PoolState>,
    nullifiers: Vec<NullifierRecord>,
    spent: HashSet<Nullifier>,
}

pub struct MemoryLedger {
    state: RwLock<State>,
    tree_capacity: u64,
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::with_tree_capacity(TREE_CAPACITY)
    }

    /// Ledger whose pools stop accepting outputs after `capacity` leaves.
    pub fn with_tree_capacity(capacity: u64) -> Self {
        Self {
            state: RwLock::new(State::default()),
            tree_capacity: capacity.min(TREE_CAPACITY),
        }
    }

    /// Publish `nullifiers` and append `outputs` to `pool_id` atomically in a
    /// new slot. Fails without side effects if any nullifier was already
    /// published or repeats within the transaction, or if the pool's tree
    /// has no room for every output.
    pub async fn commit_transaction(
        &self,
        pool_id: PoolId,
        nullifiers: &[Nullifier],
        outputs: Vec<NewOutput>,
    ) -> SdkResult<Vec<NoteRecord>> {
        let mut state = self.state.write().await;

        let mut seen = HashSet::new();
        for nf in nullifiers {
            if state.spent.contains(nf) || !seen.insert(*nf) {
                return Err(SdkError::InvalidRequest(format!(
                    "nullifier {} already published",
                    fr_to_hex(nf.as_fe())
                )));
            }
        }

        let used = state.pools.get(&pool_id).map_or(0, |p| p.tree.next_index());
        if used.saturating_add(outputs.len() as u64) > self.tree_capacity {
            return Err(SdkError::TreeFull {
                capacity: self.tree_capacity,
            });
        }

        state.slot += 1;
        let slot = state.slot;

        for nf in nullifiers {
            state.spent.insert(*nf);
            state.nullifiers.push(NullifierRecord {
                pool_id,
                slot,
                nullifier: *nf,
            });
        }

        let capacity = self.tree_capacity;
        let pool = state.pools.entry(pool_id).or_insert_with(|| PoolState {
            tree: SparseMerkleTree::with_capacity(capacity),
            notes: Vec::new(),
        });
        let mut records = Vec::with_capacity(outputs.len());
        for out in outputs {
            let leaf_index = pool.tree.insert(out.commitment)?;
            let record = NoteRecord {
                pool_id,
                slot,
                leaf_index,
                commitment: out.commitment,
                encrypted: out.encrypted,
                stealth_ephemeral_pubkey: out.stealth_ephemeral_pubkey,
                account_hash: Some(derive_account_hash(&out.commitment, pool_id, leaf_index)),
            };
            pool.notes.push(record.clone());
            records.push(record);
        }

        tracing::debug!(
            pool_id,
            slot,
            nullifiers = nullifiers.len(),
            outputs = records.len(),
            "committed transaction"
        );
        Ok(records)
    }

    /// Single-output deposit.
    pub async fn append_note(&self, pool_id: PoolId, output: NewOutput) -> SdkResult<NoteRecord> {
        let mut records = self.commit_transaction(pool_id, &[], vec![output]).await?;
        records
            .pop()
            .ok_or_else(|| SdkError::Indexer("ledger produced no record".into()))
    }

    pub async fn leaf_count(&self, pool_id: PoolId) -> u64 {
        let state = self.state.read().await;
        state.pools.get(&pool_id).map_or(0, |p| p.tree.next_index())
    }
}

impl LedgerClient for MemoryLedger {
    async fn latest_slot(&self) -> SdkResult<u64> {
        Ok(self.state.read().await.slot)
    }

    async fn fetch_notes(
        &self,
        pools: &[PoolId],
        after_slot: u64,
        to_slot: u64,
    ) -> SdkResult<Vec<NoteRecord>> {
        let state = self.state.read().await;
        Ok(pools
            .iter()
            .filter_map(|id| state.pools.get(id))
            .flat_map(|p| p.notes.iter())
            .filter(|r| r.slot > after_slot && r.slot <= to_slot)
            .cloned()
            .collect())
    }

    async fn fetch_nullifiers(
        &self,
        pools: &[PoolId],
        after_slot: u64,
        to_slot: u64,
    ) -> SdkResult<Vec<NullifierRecord>> {
        let state = self.state.read().await;
        Ok(state
            .nullifiers
            .iter()
            .filter(|r| pools.contains(&r.pool_id) && r.slot > after_slot && r.slot <= to_slot)
            .copied()
            .collect())
    }

    async fn is_nullifier_spent(&self, nullifier: &Nullifier) -> SdkResult<bool> {
        Ok(self.state.read().await.spent.contains(nullifier))
    }

    async fn merkle_root(&self, pool_id: PoolId) -> SdkResult<Fr> {
        let state = self.state.read().await;
        Ok(state
            .pools
            .get(&pool_id)
            .map_or_else(empty_root, |p| p.tree.root().0))
    }

    async fn merkle_proof(&self, pool_id: PoolId, commitment: &Fr) -> SdkResult<MerkleProof> {
        let state = self.state.read().await;
        let not_found = || {
            SdkError::Indexer(format!(
                "commitment {} not found in pool {pool_id}",
                fr_to_hex(commitment)
            ))
        };
        let pool = state.pools.get(&pool_id).ok_or_else(not_found)?;
        let index = pool.tree.position(commitment).ok_or_else(not_found)?;
        pool.tree.proof(index).ok_or_else(not_found)
    }
}
