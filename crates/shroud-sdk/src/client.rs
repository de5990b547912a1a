// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! High-level session client.
//!
//! Wraps a ledger, a prover and the wallet's [`NoteManager`] into a small
//! surface: construct → sync → shield / transfer / vote → confirm or abort.
//!
//! Spending is two-phase. [`ShieldedClient::transfer`] selects notes,
//! reserves their nullifiers, fetches proofs and returns a [`ProofBundle`]
//! for the caller to submit. After submission the caller either
//! [`confirm`](ShieldedClient::confirm)s (marks spent) or
//! [`abort`](ShieldedClient::abort)s (releases the reservation). A failed
//! transfer releases its own reservation.
//!
//! ```rust,no_run
//! use shroud_sdk::client::ShieldedClient;
//! use shroud_sdk::config::load_config;
//! use shroud_sdk::keys::Keypair;
//! use shroud_sdk::wallet::crypto_rng;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = load_config()?;
//! let keypair = Keypair::random(&mut crypto_rng());
//! let client = ShieldedClient::from_config(&config, keypair)?;
//! client.sync().await?;
//! # Ok(())
//! # }
//! ```

use ark_bls12_381::Fr;
use rand::{CryptoRng, Rng};
use shroud_types::{DecryptedNote, Nullifier, PoolId, TokenId};
use tokio::sync::Mutex;

use crate::config::{ConfiguredProver, SdkConfig};
use crate::error::{SdkError, SdkResult};
use crate::keys::{Keypair, ShieldedAddress};
use crate::ledger::{IndexerClient, LedgerClient};
use crate::notes::NoteManager;
use crate::prover::{ProofLayouts, Prover};
use crate::shield::{shield, ShieldedOutput};
use crate::wallet::NoteSnapshot;
use crate::witness::{
    checked_total, OutputSpec, ProofBundle, SpendInput, TransferRequest, VoteRequest,
    WitnessAssembler, MAX_INPUTS,
};

// ---------------------------------------------------------------------------
// Structs
// ---------------------------------------------------------------------------

pub struct ShieldedClient<L, P> {
    ledger: L,
    assembler: WitnessAssembler<P>,
    keypair: Keypair,
    manager: Mutex<NoteManager>,
}

/// A spend the caller asked for, before note selection.
#[derive(Clone, Debug)]
pub struct TransferParams {
    pub token_id: TokenId,
    pub outputs: Vec<OutputSpec>,
    pub public_amount: u128,
    pub fee: u128,
}

// ---------------------------------------------------------------------------
// Constructors
// ---------------------------------------------------------------------------

impl ShieldedClient<IndexerClient, ConfiguredProver> {
    pub fn from_config(config: &SdkConfig, keypair: Keypair) -> SdkResult<Self> {
        config.validate()?;
        Ok(Self::new(
            IndexerClient::new(&config.indexer_url),
            config.build_prover(),
            config.proof_layouts.clone(),
            NoteManager::new(keypair, config.pools.clone()),
        ))
    }
}

impl<L: LedgerClient, P: Prover> ShieldedClient<L, P> {
    pub fn new(ledger: L, prover: P, layouts: ProofLayouts, manager: NoteManager) -> Self {
        Self {
            ledger,
            assembler: WitnessAssembler::new(prover, layouts),
            keypair: manager.keypair().clone(),
            manager: Mutex::new(manager),
        }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn assembler(&self) -> &WitnessAssembler<P> {
        &self.assembler
    }

    pub fn address(&self) -> ShieldedAddress {
        self.keypair.address()
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub async fn sync(&self) -> SdkResult<Vec<DecryptedNote>> {
        let mut manager = self.manager.lock().await;
        manager.sync(&self.ledger).await
    }

    pub async fn balance(&self, token_id: &TokenId) -> u128 {
        self.manager.lock().await.balance(token_id)
    }

    pub async fn unspent_notes(&self, token_id: &TokenId) -> Vec<DecryptedNote> {
        self.manager.lock().await.unspent_notes(token_id)
    }

    pub async fn snapshot(&self) -> NoteSnapshot {
        self.manager.lock().await.snapshot()
    }

    pub async fn check_nullifier_spent(&self, nullifier: &Nullifier) -> SdkResult<bool> {
        let manager = self.manager.lock().await;
        manager.check_nullifier_spent(&self.ledger, nullifier).await
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Deposit output paying this wallet. Publishing it is up to the caller.
    pub fn shield<R: Rng + CryptoRng + ?Sized>(
        &self,
        token_id: TokenId,
        amount: u128,
        rng: &mut R,
    ) -> SdkResult<ShieldedOutput> {
        shield(&self.address(), token_id, amount, rng)
    }

    /// Select notes, reserve them and prove a transfer. The reservation is
    /// released if anything after it fails. An amount that needs more than
    /// [`MAX_INPUTS`] notes fails with [`SdkError::TooManyInputs`] before
    /// anything is reserved.
    pub async fn transfer<R: Rng + CryptoRng + ?Sized>(
        &self,
        params: &TransferParams,
        rng: &mut R,
    ) -> SdkResult<ProofBundle> {
        let mut parts: Vec<u128> = params.outputs.iter().map(OutputSpec::amount).collect();
        parts.push(params.public_amount);
        parts.push(params.fee);
        let required = checked_total(&parts)?;

        let (notes, nullifiers) = {
            let mut manager = self.manager.lock().await;
            let selection = manager.select_notes_for_amount(&params.token_id, required)?;
            if selection.notes.len() > MAX_INPUTS {
                return Err(SdkError::TooManyInputs {
                    needed: selection.notes.len(),
                    max: MAX_INPUTS,
                });
            }
            let nullifiers = selection.nullifiers(&manager);
            manager.reserve(&nullifiers)?;
            (selection.notes, nullifiers)
        };

        let result = self.prove_selected(params, notes, rng).await;
        if let Err(e) = &result {
            tracing::warn!("transfer failed, releasing reservation: {e}");
            self.manager.lock().await.release(&nullifiers);
        }
        result
    }

    async fn prove_selected<R: Rng + CryptoRng + ?Sized>(
        &self,
        params: &TransferParams,
        notes: Vec<DecryptedNote>,
        rng: &mut R,
    ) -> SdkResult<ProofBundle> {
        let pool_id = single_pool(&notes)?;
        let merkle_root = self.ledger.merkle_root(pool_id).await?;
        let mut inputs = Vec::with_capacity(notes.len());
        for note in notes {
            let merkle_proof = self.ledger.merkle_proof(pool_id, &note.commitment).await?;
            inputs.push(SpendInput { note, merkle_proof });
        }
        let request = TransferRequest {
            inputs,
            outputs: params.outputs.clone(),
            merkle_root,
            token_id: params.token_id,
            public_amount: params.public_amount,
            fee: params.fee,
        };
        self.assembler.prove_transfer(&self.keypair, &request, rng).await
    }

    /// Prove a vote with the tracked note `commitment`. The note stays
    /// spendable.
    pub async fn vote(
        &self,
        commitment: &Fr,
        action_domain: Fr,
        vote_choice: u64,
    ) -> SdkResult<ProofBundle> {
        let note = {
            let manager = self.manager.lock().await;
            let tracked = manager.tracked(commitment).ok_or_else(|| {
                SdkError::InvalidRequest("vote note is not tracked by this wallet".into())
            })?;
            if manager.is_spent(&tracked.nullifier) {
                return Err(SdkError::InvalidRequest("vote note is already spent".into()));
            }
            tracked.note.clone()
        };
        let merkle_root = self.ledger.merkle_root(note.pool_id).await?;
        let merkle_proof = self.ledger.merkle_proof(note.pool_id, commitment).await?;
        let request = VoteRequest {
            input: SpendInput { note, merkle_proof },
            merkle_root,
            action_domain,
            vote_choice,
        };
        self.assembler.prove_vote(&self.keypair, &request).await
    }

    /// The bundle was accepted by the ledger.
    pub async fn confirm(&self, bundle: &ProofBundle) {
        self.manager.lock().await.mark_spent(&bundle.nullifiers);
    }

    /// The bundle will not be submitted.
    pub async fn abort(&self, bundle: &ProofBundle) {
        self.manager.lock().await.release(&bundle.nullifiers);
    }
}

fn single_pool(notes: &[DecryptedNote]) -> SdkResult<PoolId> {
    let first = notes
        .first()
        .ok_or_else(|| SdkError::InvalidRequest("no notes selected".into()))?
        .pool_id;
    if notes.iter().any(|n| n.pool_id != first) {
        return Err(SdkError::InvalidRequest(
            "selected notes span more than one pool".into(),
        ));
    }
    Ok(first)
}
