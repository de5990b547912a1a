// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! # shroud-sdk
//!
//! Client-side engine for **Shroud** shielded notes: receive, track and spend
//! value recorded as commitments on a public append-only ledger without
//! revealing sender, recipient or amount.
//!
//! The SDK never verifies proofs and never writes to the ledger. It reads the
//! ledger through [`ledger::LedgerClient`], assembles circuit witnesses, calls
//! an external [`prover::Prover`], and hands back a [`witness::ProofBundle`]
//! for submission.
//!
//! ## Crate layout
//!
//! | Module | Purpose |
//! |---|---|
//! | *crate root* | Re-exports core types and primitives |
//! | [`keys`] | Spending / viewing key hierarchy, shielded addresses |
//! | [`stealth`] | One-time stealth addresses |
//! | [`encryption`] | Note encryption (ECDH + BLAKE3 + ChaCha20-Poly1305) |
//! | [`shield`] | Building outputs for a recipient address |
//! | [`merkle`] | Sparse Poseidon Merkle tree and proof checks |
//! | [`ledger`] | Ledger boundary: HTTP indexer client, in-memory ledger |
//! | [`notes`] | Note scanning, balance, coin selection, spend bookkeeping |
//! | [`prover`] | Prover boundary: subprocess, HTTP and in-process backends |
//! | [`witness`] | Transfer / swap / order / vote witness assembly |
//! | [`serialize`] | Arkworks proof → wire conversion |
//! | [`client`] | Session façade tying it all together |
//! | [`wallet`] | Key/note persistence, hex ↔ `Fr` conversion |
//! | [`config`] | `~/.shroud/config.json` and environment overrides |
//!
//! ## Typical flow
//!
//! ```rust,no_run
//! use shroud_sdk::client::{ShieldedClient, TransferParams};
//! use shroud_sdk::ledger::MemoryLedger;
//! use shroud_sdk::notes::NoteManager;
//! use shroud_sdk::prover::{BlockingProver, CircuitId, Groth16Proof, ProofLayouts, SignalVector};
//! use shroud_sdk::{keys::Keypair, wallet, SdkResult};
//! # use ark_bls12_381::Fr;
//!
//! # async fn example() -> SdkResult<()> {
//! let mut rng = wallet::crypto_rng();
//! let keypair = Keypair::random(&mut rng);
//! let token = Fr::from(1u64);
//!
//! let prover = BlockingProver::new(|_c: CircuitId, _s: &SignalVector| -> SdkResult<Groth16Proof> {
//!     unimplemented!("plug in a Groth16 backend")
//! });
//! let client = ShieldedClient::new(
//!     MemoryLedger::new(),
//!     prover,
//!     ProofLayouts::default(),
//!     NoteManager::new(keypair, vec![1]),
//! );
//!
//! // deposit, then scan it back
//! let deposit = client.shield(token, 500, &mut rng)?;
//! client.ledger().append_note(1, deposit.to_new_output()).await?;
//! client.sync().await?;
//!
//! // unshield 200, keep 300 as change
//! let params = TransferParams { token_id: token, outputs: vec![], public_amount: 200, fee: 0 };
//! let bundle = client.transfer(&params, &mut rng).await?;
//! client.ledger().commit_transaction(1, &bundle.nullifiers, bundle.new_outputs()).await?;
//! client.confirm(&bundle).await;
//! # Ok(())
//! # }
//! ```

pub use shroud_types::{
    DecryptedNote, EncryptedNote, FieldElement, MerkleProof, Note, Nullifier, Point, PoolId,
    Scalar, SpendingKey, StealthAddress, TokenId, ViewingKey, MERKLE_DEPTH,
};

pub use shroud_primitives::{
    check_public_key, compute_commitment, derive_account_hash, derive_action_nullifier, derive_nullifier_key,
    derive_public_key, derive_spending_nullifier, generate_randomness, hash, is_in_subgroup,
    is_on_curve, point_add, scalar_mul, verify_commitment,
};

pub use error::{SdkError, SdkResult};

pub mod client;
pub mod config;
pub mod encryption;
pub mod error;
pub mod keys;
pub mod ledger;
pub mod merkle;
pub mod notes;
pub mod prover;
pub mod serialize;
pub mod shield;
pub mod stealth;
pub mod wallet;
pub mod witness;
