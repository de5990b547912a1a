// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! Read-only boundary to the ledger and its indexer.
//!
//! The engine never writes to the ledger. It reads published note records
//! and nullifiers by slot range, and fetches Merkle roots and inclusion proofs
//! when it needs to spend.
//!
//! | Implementation | Backing |
//! |---|---|
//! | [`IndexerClient`] | HTTP indexer (`/v1/...` JSON endpoints) |
//! | [`MemoryLedger`] | In-process append-only ledger, for tests and embedders |

use std::future::Future;

use ark_bls12_381::Fr;
use shroud_types::{EncryptedNote, MerkleProof, Nullifier, Point, PoolId};

use crate::error::SdkResult;

pub mod indexer;
pub mod memory;

pub use indexer::IndexerClient;
pub use memory::MemoryLedger;

/// One published output as the ledger stores it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoteRecord {
    pub pool_id: PoolId,
    pub slot: u64,
    pub leaf_index: u64,
    pub commitment: Fr,
    pub encrypted: EncryptedNote,
    /// Present when the output was paid to a one-time stealth address.
    pub stealth_ephemeral_pubkey: Option<Point>,
    pub account_hash: Option<Fr>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NullifierRecord {
    pub pool_id: PoolId,
    pub slot: u64,
    pub nullifier: Nullifier,
}

/// Ranges are half-open on the left: `(after_slot, to_slot]`.
pub trait LedgerClient: Send + Sync {
    fn latest_slot(&self) -> impl Future<Output = SdkResult<u64>> + Send;

    fn fetch_notes(
        &self,
        pools: &[PoolId],
        after_slot: u64,
        to_slot: u64,
    ) -> impl Future<Output = SdkResult<Vec<NoteRecord>>> + Send;

    fn fetch_nullifiers(
        &self,
        pools: &[PoolId],
        after_slot: u64,
        to_slot: u64,
    ) -> impl Future<Output = SdkResult<Vec<NullifierRecord>>> + Send;

    fn is_nullifier_spent(
        &self,
        nullifier: &Nullifier,
    ) -> impl Future<Output = SdkResult<bool>> + Send;

    fn merkle_root(&self, pool_id: PoolId) -> impl Future<Output = SdkResult<Fr>> + Send;

    /// Inclusion proof for `commitment` against the pool's current root.
    fn merkle_proof(
        &self,
        pool_id: PoolId,
        commitment: &Fr,
    ) -> impl Future<Output = SdkResult<MerkleProof>> + Send;
}

/// Ask the ledger whether `nullifier` has been published.
pub async fn check_nullifier_spent<L: LedgerClient>(
    ledger: &L,
    nullifier: &Nullifier,
) -> SdkResult<bool> {
    ledger.is_nullifier_spent(nullifier).await
}
