// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! Limit order placement: locks `sell_amount` of `sell_token` behind an order
//! commitment that a matching engine can fill later.
//!
//! ```text
//! order_commitment = H(ORDER, maker_stealth_pub_x, sell_token, sell_amount,
//!                      buy_token, buy_amount, expiry, order_randomness)
//!
//! public:  merkle_root, nullifiers[2], order_commitment, change_commitment,
//!          sell_token, sell_amount, buy_token, buy_amount, expiry
//! private: <input slots>, order_randomness, maker_stealth_pub_x,
//!          change_amount, change_randomness, change_stealth_pub_x
//! ```
//!
//! The maker key is a fresh stealth address of the maker, so fills can be
//! claimed without linking the order to the maker's long-term key.

use ark_bls12_381::Fr;
use rand::{CryptoRng, Rng};
use shroud_primitives::{generate_randomness, hash};
use shroud_types::{domain, StealthAddress, TokenId};

use super::{
    change_for, check_inputs, nullifiers_of, padded_nullifiers, prepare_output,
    push_input_signals, sum_inputs, OutputSpec, PreparedWitness, ProofBundle, SpendInput,
    WitnessAssembler,
};
use crate::error::{SdkError, SdkResult};
use crate::keys::Keypair;
use crate::prover::{CircuitId, Prover, SignalVector};
use crate::stealth::generate_stealth_address;

#[derive(Clone, Debug)]
pub struct OrderRequest {
    pub inputs: Vec<SpendInput>,
    pub merkle_root: Fr,
    pub sell_token: TokenId,
    pub sell_amount: u128,
    pub buy_token: TokenId,
    pub buy_amount: u128,
    /// Ledger slot after which the order can no longer be filled.
    pub expiry: u64,
    /// Where the unsold remainder goes; must pay the inputs minus
    /// `sell_amount`. Defaults to the maker.
    pub change: Option<OutputSpec>,
}

/// What the maker keeps to track, fill or cancel the order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderTicket {
    pub commitment: Fr,
    pub maker: StealthAddress,
    pub sell_token: TokenId,
    pub sell_amount: u128,
    pub buy_token: TokenId,
    pub buy_amount: u128,
    pub expiry: u64,
    pub randomness: Fr,
}

impl OrderTicket {
    pub fn compute_commitment(&self) -> Fr {
        hash(
            domain::ORDER,
            &[
                self.maker.stealth_pubkey.x,
                self.sell_token,
                Fr::from(self.sell_amount),
                self.buy_token,
                Fr::from(self.buy_amount),
                Fr::from(self.expiry),
                self.randomness,
            ],
        )
    }
}

impl<P: Prover> WitnessAssembler<P> {
    pub fn assemble_order<R: Rng + CryptoRng + ?Sized>(
        &self,
        keypair: &Keypair,
        request: &OrderRequest,
        rng: &mut R,
    ) -> SdkResult<PreparedWitness> {
        if request.sell_token == request.buy_token {
            return Err(SdkError::InvalidRequest("order tokens must differ".into()));
        }
        if request.sell_amount == 0 || request.buy_amount == 0 {
            return Err(SdkError::InvalidRequest("order amounts must be positive".into()));
        }
        let inputs = check_inputs(keypair, &request.inputs, &request.merkle_root, &request.sell_token)?;
        let change_amount = change_for(sum_inputs(&inputs)?, request.sell_amount)?;

        let (maker, _) = generate_stealth_address(&keypair.public_key(), rng)?;
        let mut ticket = OrderTicket {
            commitment: Fr::from(0u64),
            maker,
            sell_token: request.sell_token,
            sell_amount: request.sell_amount,
            buy_token: request.buy_token,
            buy_amount: request.buy_amount,
            expiry: request.expiry,
            randomness: generate_randomness(rng),
        };
        ticket.commitment = ticket.compute_commitment();

        let change_spec =
            OutputSpec::for_slot(request.change.as_ref(), keypair, change_amount, "change")?;
        let change = prepare_output(&change_spec, request.sell_token, rng)?;

        let mut signals = SignalVector::new();
        signals
            .public("merkle_root", request.merkle_root)
            .public("nullifiers", padded_nullifiers(&inputs))
            .public("order_commitment", ticket.commitment)
            .public("change_commitment", change.commitment)
            .public("sell_token", request.sell_token)
            .public("sell_amount", Fr::from(request.sell_amount))
            .public("buy_token", request.buy_token)
            .public("buy_amount", Fr::from(request.buy_amount))
            .public("expiry", Fr::from(request.expiry));
        push_input_signals(&mut signals, &inputs, keypair.nullifier_key());
        signals
            .private("order_randomness", ticket.randomness)
            .private("maker_stealth_pub_x", ticket.maker.stealth_pubkey.x)
            .private("change_amount", Fr::from(change.note.amount))
            .private("change_randomness", change.note.randomness)
            .private("change_stealth_pub_x", change.note.stealth_pub_x);

        tracing::debug!(
            sell_amount = request.sell_amount,
            buy_amount = request.buy_amount,
            expiry = request.expiry,
            "assembled order witness"
        );
        Ok(PreparedWitness {
            circuit: CircuitId::Order,
            signals,
            nullifiers: nullifiers_of(&inputs),
            outputs: vec![change],
            merkle_root: request.merkle_root,
            order: Some(ticket),
        })
    }

    pub async fn prove_order<R: Rng + CryptoRng + ?Sized>(
        &self,
        keypair: &Keypair,
        request: &OrderRequest,
        rng: &mut R,
    ) -> SdkResult<ProofBundle> {
        let witness = self.assemble_order(keypair, request, rng)?;
        self.prove_witness(witness).await
    }
}
