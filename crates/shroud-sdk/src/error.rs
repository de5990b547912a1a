// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! Typed errors for every SDK operation.
//!
//! Variants fall into four groups: cryptographic validation (fatal to the
//! operation), selection (recoverable by asking for less), staleness
//! (recoverable by re-fetching ledger state) and external services
//! (propagated with context, never retried here).

use shroud_primitives::CurveError;
use shroud_types::FieldError;

#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    // -- cryptographic validation --
    #[error("invalid point: {0}")]
    Curve(#[from] CurveError),

    #[error("field encoding: {0}")]
    Field(#[from] FieldError),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("commitment mismatch for note at leaf {leaf_index}")]
    CommitmentMismatch { leaf_index: u64 },

    #[error("note key does not match its stealth address (leaf {leaf_index})")]
    OwnershipMismatch { leaf_index: u64 },

    #[error("note decryption failed: authentication tag did not verify")]
    Decryption,

    #[error("keypair is watch-only and cannot spend")]
    WatchOnly,

    // -- selection --
    #[error("insufficient funds: need {needed}, unspent {available}")]
    InsufficientFunds { needed: u128, available: u128 },

    #[error("insufficient note amount: inputs {inputs}, required {required}")]
    InsufficientNoteAmount { inputs: u128, required: u128 },

    #[error("amount needs {needed} notes but one spend takes at most {max}; merge notes or send less")]
    TooManyInputs { needed: usize, max: usize },

    #[error("spend already attempted for nullifier {0}")]
    AlreadyAttempted(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    // -- staleness --
    #[error("stale merkle root: request uses {expected}, proof for leaf {leaf_index} is against {actual}")]
    StaleRoot {
        expected: String,
        actual: String,
        leaf_index: u64,
    },

    // -- ledger --
    #[error("merkle tree is full ({capacity} leaves)")]
    TreeFull { capacity: u64 },

    // -- external services --
    #[error("indexer: {0}")]
    Indexer(String),

    #[error("prover: {0}")]
    Prover(String),

    #[error("proof layout for {circuit}: expected {expected} bytes, got {actual}")]
    ProofLayout {
        circuit: String,
        expected: usize,
        actual: usize,
    },

    #[error("config: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SdkResult<T> = Result<T, SdkError>;
