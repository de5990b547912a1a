// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! Private transfer, optionally unshielding `public_amount` and paying `fee`.
//!
//! ```text
//! public:  merkle_root, nullifiers[2], out_commitments[2], token_id, public_amount, fee
//! private: in_enabled[2], in_amounts[2], in_randomness[2], in_stealth_keys[2],
//!          in_leaf_indices[2], path_elements[2][D], path_indices[2][D], nullifier_key,
//!          out_amounts[2], out_randomness[2], out_stealth_pub_x[2]
//! ```
//!
//! Value balance: `sum(in) = sum(out) + public_amount + fee`. Any surplus
//! becomes a change output to the sender; empty output slots hold a
//! zero-amount note to the sender.

use ark_bls12_381::Fr;
use rand::{CryptoRng, Rng};
use shroud_types::TokenId;

use super::{
    change_for, check_inputs, checked_total, nullifiers_of, padded_nullifiers, prepare_output,
    push_input_signals, sum_inputs, OutputSpec, PreparedWitness, ProofBundle, SpendInput,
    WitnessAssembler, MAX_OUTPUTS,
};
use crate::error::{SdkError, SdkResult};
use crate::keys::Keypair;
use crate::prover::{CircuitId, Prover, SignalVector};

#[derive(Clone, Debug)]
pub struct TransferRequest {
    pub inputs: Vec<SpendInput>,
    pub outputs: Vec<OutputSpec>,
    pub merkle_root: Fr,
    pub token_id: TokenId,
    /// Value leaving the pool to a public account.
    pub public_amount: u128,
    pub fee: u128,
}

impl<P: Prover> WitnessAssembler<P> {
    pub fn assemble_transfer<R: Rng + CryptoRng + ?Sized>(
        &self,
        keypair: &Keypair,
        request: &TransferRequest,
        rng: &mut R,
    ) -> SdkResult<PreparedWitness> {
        let inputs = check_inputs(keypair, &request.inputs, &request.merkle_root, &request.token_id)?;

        let mut parts: Vec<u128> = request.outputs.iter().map(OutputSpec::amount).collect();
        parts.push(request.public_amount);
        parts.push(request.fee);
        let change = change_for(sum_inputs(&inputs)?, checked_total(&parts)?)?;

        let mut specs = request.outputs.clone();
        if change > 0 {
            specs.push(OutputSpec::ToAddress {
                address: keypair.address(),
                amount: change,
            });
        }
        if specs.len() > MAX_OUTPUTS {
            return Err(SdkError::InvalidRequest(format!(
                "transfer needs {} outputs including change, max {MAX_OUTPUTS}",
                specs.len()
            )));
        }
        while specs.len() < MAX_OUTPUTS {
            specs.push(OutputSpec::ToAddress {
                address: keypair.address(),
                amount: 0,
            });
        }

        let mut outputs = Vec::with_capacity(MAX_OUTPUTS);
        for spec in &specs {
            outputs.push(prepare_output(spec, request.token_id, rng)?);
        }

        let mut signals = SignalVector::new();
        signals
            .public("merkle_root", request.merkle_root)
            .public("nullifiers", padded_nullifiers(&inputs))
            .public(
                "out_commitments",
                outputs.iter().map(|o| o.commitment).collect::<Vec<_>>(),
            )
            .public("token_id", request.token_id)
            .public("public_amount", Fr::from(request.public_amount))
            .public("fee", Fr::from(request.fee));
        push_input_signals(&mut signals, &inputs, keypair.nullifier_key());
        signals
            .private(
                "out_amounts",
                outputs.iter().map(|o| Fr::from(o.note.amount)).collect::<Vec<_>>(),
            )
            .private(
                "out_randomness",
                outputs.iter().map(|o| o.note.randomness).collect::<Vec<_>>(),
            )
            .private(
                "out_stealth_pub_x",
                outputs.iter().map(|o| o.note.stealth_pub_x).collect::<Vec<_>>(),
            );

        tracing::debug!(
            inputs = inputs.len(),
            change,
            public_amount = request.public_amount,
            "assembled transfer witness"
        );
        Ok(PreparedWitness {
            circuit: CircuitId::Transfer,
            signals,
            nullifiers: nullifiers_of(&inputs),
            outputs,
            merkle_root: request.merkle_root,
            order: None,
        })
    }

    pub async fn prove_transfer<R: Rng + CryptoRng + ?Sized>(
        &self,
        keypair: &Keypair,
        request: &TransferRequest,
        rng: &mut R,
    ) -> SdkResult<ProofBundle> {
        let witness = self.assemble_transfer(keypair, request, rng)?;
        self.prove_witness(witness).await
    }
}
