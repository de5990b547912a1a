// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! Shielded swap through an on-ledger adapter.
//!
//! ```text
//! public:  merkle_root, nullifiers[2], change_commitment, output_commitment,
//!          input_token, output_token, swap_amount, min_output_amount, adapter_id
//! private: <input slots>, change_amount, change_randomness, change_stealth_pub_x,
//!          output_amount, output_randomness, output_stealth_pub_x
//! ```
//!
//! The output note commits to `min_output_amount` of `output_token`; the
//! adapter must deliver at least that much for the swap to settle.

use ark_bls12_381::Fr;
use rand::{CryptoRng, Rng};
use shroud_types::TokenId;

use super::{
    change_for, check_inputs, nullifiers_of, padded_nullifiers, prepare_output,
    push_input_signals, sum_inputs, OutputSpec, PreparedWitness, ProofBundle, SpendInput,
    WitnessAssembler,
};
use crate::error::{SdkError, SdkResult};
use crate::keys::Keypair;
use crate::prover::{CircuitId, Prover, SignalVector};

#[derive(Clone, Debug)]
pub struct SwapRequest {
    pub inputs: Vec<SpendInput>,
    pub merkle_root: Fr,
    pub input_token: TokenId,
    pub output_token: TokenId,
    pub swap_amount: u128,
    pub min_output_amount: u128,
    pub adapter_id: Fr,
    /// Where the swapped tokens go; must pay `min_output_amount`. Defaults to
    /// the sender.
    pub output: Option<OutputSpec>,
    /// Where the unswapped remainder goes; must pay the inputs minus
    /// `swap_amount`. Defaults to the sender.
    pub change: Option<OutputSpec>,
}

impl<P: Prover> WitnessAssembler<P> {
    pub fn assemble_swap<R: Rng + CryptoRng + ?Sized>(
        &self,
        keypair: &Keypair,
        request: &SwapRequest,
        rng: &mut R,
    ) -> SdkResult<PreparedWitness> {
        if request.input_token == request.output_token {
            return Err(SdkError::InvalidRequest("swap tokens must differ".into()));
        }
        if request.swap_amount == 0 {
            return Err(SdkError::InvalidRequest("swap amount must be positive".into()));
        }
        let inputs = check_inputs(keypair, &request.inputs, &request.merkle_root, &request.input_token)?;
        let change_amount = change_for(sum_inputs(&inputs)?, request.swap_amount)?;

        let change_spec =
            OutputSpec::for_slot(request.change.as_ref(), keypair, change_amount, "change")?;
        let output_spec = OutputSpec::for_slot(
            request.output.as_ref(),
            keypair,
            request.min_output_amount,
            "swap",
        )?;
        let change = prepare_output(&change_spec, request.input_token, rng)?;
        let output = prepare_output(&output_spec, request.output_token, rng)?;

        let mut signals = SignalVector::new();
        signals
            .public("merkle_root", request.merkle_root)
            .public("nullifiers", padded_nullifiers(&inputs))
            .public("change_commitment", change.commitment)
            .public("output_commitment", output.commitment)
            .public("input_token", request.input_token)
            .public("output_token", request.output_token)
            .public("swap_amount", Fr::from(request.swap_amount))
            .public("min_output_amount", Fr::from(request.min_output_amount))
            .public("adapter_id", request.adapter_id);
        push_input_signals(&mut signals, &inputs, keypair.nullifier_key());
        signals
            .private("change_amount", Fr::from(change.note.amount))
            .private("change_randomness", change.note.randomness)
            .private("change_stealth_pub_x", change.note.stealth_pub_x)
            .private("output_amount", Fr::from(output.note.amount))
            .private("output_randomness", output.note.randomness)
            .private("output_stealth_pub_x", output.note.stealth_pub_x);

        tracing::debug!(
            swap_amount = request.swap_amount,
            min_output = request.min_output_amount,
            "assembled swap witness"
        );
        Ok(PreparedWitness {
            circuit: CircuitId::Swap,
            signals,
            nullifiers: nullifiers_of(&inputs),
            outputs: vec![change, output],
            merkle_root: request.merkle_root,
            order: None,
        })
    }

    pub async fn prove_swap<R: Rng + CryptoRng + ?Sized>(
        &self,
        keypair: &Keypair,
        request: &SwapRequest,
        rng: &mut R,
    ) -> SdkResult<ProofBundle> {
        let witness = self.assemble_swap(keypair, request, rng)?;
        self.prove_witness(witness).await
    }
}
