// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! Proof-witness assembly.
//!
//! Turns a high-level request into the exact signal layout a circuit expects,
//! calls the [`Prover`], and checks the returned proof against the circuit's
//! [`ProofLayout`](crate::prover::ProofLayout). Every operation has a
//! synchronous `assemble_*` step (all validation, no I/O) and an async
//! `prove_*` wrapper.
//!
//! Every input goes through the same checks before any signal is emitted:
//!
//! 1. private key = stealth-derived if the note carries an ephemeral key,
//!    otherwise the base key; its public x must equal `note.stealth_pub_x`
//! 2. the recomputed commitment must equal the note's commitment
//! 3. the Merkle proof must be against the request's root ([`SdkError::StaleRoot`])
//!    and must verify for the note's leaf
//!
//! Input slots are fixed at [`MAX_INPUTS`]; unused slots are zero-filled with
//! `in_enabled = 0`.

use ark_bls12_381::Fr;
use ark_ff::{AdditiveGroup, Field};
use rand::{CryptoRng, Rng};
use shroud_primitives::{compute_commitment, derive_spending_nullifier};
use shroud_types::field::scalar_to_fe;
use shroud_types::{
    DecryptedNote, EncryptedNote, MerkleProof, Note, Nullifier, NullifierKey, Point, Scalar,
    StealthAddress, TokenId, MERKLE_DEPTH,
};
use zeroize::Zeroizing;

use crate::error::{SdkError, SdkResult};
use crate::keys::{Keypair, ShieldedAddress};
use crate::ledger::memory::NewOutput;
use crate::merkle::verify_proof;
use crate::prover::{CircuitId, Groth16Proof, ProofLayouts, Prover, SignalVector};
use crate::shield::{create_output, create_stealth_output, ShieldedOutput};
use crate::stealth::note_private_key;
use crate::wallet::fr_to_hex;

mod order;
mod swap;
mod transfer;
mod vote;

pub use order::{OrderRequest, OrderTicket};
pub use swap::SwapRequest;
pub use transfer::TransferRequest;
pub use vote::VoteRequest;

pub const MAX_INPUTS: usize = 2;
pub const MAX_OUTPUTS: usize = 2;

#[derive(Clone, Debug)]
pub struct SpendInput {
    pub note: DecryptedNote,
    pub merkle_proof: MerkleProof,
}

#[derive(Clone, Debug)]
pub enum OutputSpec {
    /// Caller already built the note; the assembler only checks the commitment.
    Precomputed {
        commitment: Fr,
        stealth_pub_x: Fr,
        randomness: Fr,
        amount: u128,
    },
    /// Fresh stealth address, randomness and ciphertext for the recipient.
    ToAddress {
        address: ShieldedAddress,
        amount: u128,
    },
    /// Stealth address the caller derived already; the ciphertext goes to
    /// `viewing_pubkey`.
    ToStealth {
        stealth: StealthAddress,
        viewing_pubkey: Point,
        amount: u128,
    },
}

impl OutputSpec {
    pub fn amount(&self) -> u128 {
        match self {
            Self::Precomputed { amount, .. }
            | Self::ToAddress { amount, .. }
            | Self::ToStealth { amount, .. } => *amount,
        }
    }

    /// Spec for a slot whose amount the circuit fixes: `spec` must carry
    /// `amount` exactly, and `None` pays it back to `keypair`.
    pub(crate) fn for_slot(
        spec: Option<&OutputSpec>,
        keypair: &Keypair,
        amount: u128,
        slot: &str,
    ) -> SdkResult<OutputSpec> {
        match spec {
            None => Ok(Self::ToAddress {
                address: keypair.address(),
                amount,
            }),
            Some(spec) if spec.amount() == amount => Ok(spec.clone()),
            Some(spec) => Err(SdkError::InvalidRequest(format!(
                "{slot} output carries {}, expected {amount}",
                spec.amount()
            ))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PreparedOutput {
    pub note: Note,
    pub commitment: Fr,
    /// `None` for precomputed outputs: the caller owns delivery.
    pub encrypted: Option<EncryptedNote>,
    pub stealth_ephemeral_pubkey: Option<Point>,
}

impl PreparedOutput {
    pub fn to_new_output(&self) -> Option<NewOutput> {
        self.encrypted.as_ref().map(|encrypted| NewOutput {
            commitment: self.commitment,
            encrypted: encrypted.clone(),
            stealth_ephemeral_pubkey: self.stealth_ephemeral_pubkey,
        })
    }
}

/// Everything needed to call the prover, before it is called.
#[derive(Clone, Debug)]
pub struct PreparedWitness {
    pub circuit: CircuitId,
    pub signals: SignalVector,
    pub nullifiers: Vec<Nullifier>,
    pub outputs: Vec<PreparedOutput>,
    pub merkle_root: Fr,
    pub order: Option<OrderTicket>,
}

#[derive(Clone, Debug)]
pub struct ProofBundle {
    pub circuit: CircuitId,
    pub proof: Groth16Proof,
    pub public_signals: Vec<Fr>,
    pub nullifiers: Vec<Nullifier>,
    pub outputs: Vec<PreparedOutput>,
    pub merkle_root: Fr,
    pub order: Option<OrderTicket>,
}

impl ProofBundle {
    /// Outputs the ledger should publish, in circuit order.
    pub fn new_outputs(&self) -> Vec<NewOutput> {
        self.outputs.iter().filter_map(PreparedOutput::to_new_output).collect()
    }
}

pub struct WitnessAssembler<P> {
    prover: P,
    layouts: ProofLayouts,
}

impl<P: Prover> WitnessAssembler<P> {
    pub fn new(prover: P, layouts: ProofLayouts) -> Self {
        Self { prover, layouts }
    }

    pub fn prover(&self) -> &P {
        &self.prover
    }

    pub fn layouts(&self) -> &ProofLayouts {
        &self.layouts
    }

    /// Run the prover on an assembled witness and layout-check the result.
    pub async fn prove_witness(&self, witness: PreparedWitness) -> SdkResult<ProofBundle> {
        let circuit = witness.circuit;
        tracing::debug!(
            %circuit,
            public = witness.signals.public_values().len(),
            "requesting proof"
        );
        let proof = self.prover.prove(circuit, &witness.signals).await?;
        proof.check_layout(circuit, &self.layouts.get(circuit))?;
        tracing::info!(%circuit, nullifiers = witness.nullifiers.len(), "proof ready");
        Ok(ProofBundle {
            circuit,
            proof,
            public_signals: witness.signals.public_values(),
            nullifiers: witness.nullifiers,
            outputs: witness.outputs,
            merkle_root: witness.merkle_root,
            order: witness.order,
        })
    }
}

/// An input that passed every check, with its derived secrets.
#[derive(Clone, Debug)]
pub(crate) struct CheckedInput {
    pub note: DecryptedNote,
    pub key: Zeroizing<Scalar>,
    pub proof: MerkleProof,
    pub nullifier: Nullifier,
}

pub(crate) fn check_input(
    keypair: &Keypair,
    input: &SpendInput,
    merkle_root: &Fr,
) -> SdkResult<CheckedInput> {
    let note = &input.note;
    let key = note_private_key(keypair, note)?;

    if compute_commitment(&note.note) != note.commitment {
        return Err(SdkError::CommitmentMismatch {
            leaf_index: note.leaf_index,
        });
    }

    let proof = &input.merkle_proof;
    if proof.root != *merkle_root {
        return Err(SdkError::StaleRoot {
            expected: fr_to_hex(merkle_root),
            actual: fr_to_hex(&proof.root),
            leaf_index: note.leaf_index,
        });
    }
    if proof.leaf_index != note.leaf_index || !verify_proof(note.commitment, proof) {
        return Err(SdkError::InvalidRequest(format!(
            "merkle proof does not open leaf {}",
            note.leaf_index
        )));
    }

    Ok(CheckedInput {
        note: note.clone(),
        key,
        proof: proof.clone(),
        nullifier: derive_spending_nullifier(keypair.nullifier_key(), &note.commitment, note.leaf_index),
    })
}

/// Check every input against `merkle_root` and `token_id`, enforcing the slot
/// limit and rejecting repeated notes.
pub(crate) fn check_inputs(
    keypair: &Keypair,
    inputs: &[SpendInput],
    merkle_root: &Fr,
    token_id: &TokenId,
) -> SdkResult<Vec<CheckedInput>> {
    if inputs.is_empty() || inputs.len() > MAX_INPUTS {
        return Err(SdkError::InvalidRequest(format!(
            "expected 1..={MAX_INPUTS} inputs, got {}",
            inputs.len()
        )));
    }
    let mut checked: Vec<CheckedInput> = Vec::with_capacity(inputs.len());
    for input in inputs {
        if input.note.token_id() != *token_id {
            return Err(SdkError::InvalidRequest(format!(
                "input at leaf {} holds a different token",
                input.note.leaf_index
            )));
        }
        let c = check_input(keypair, input, merkle_root)?;
        if checked.iter().any(|p| p.nullifier == c.nullifier) {
            return Err(SdkError::InvalidRequest(format!(
                "note at leaf {} used twice",
                c.note.leaf_index
            )));
        }
        checked.push(c);
    }
    Ok(checked)
}

pub(crate) fn sum_inputs(inputs: &[CheckedInput]) -> SdkResult<u128> {
    inputs.iter().try_fold(0u128, |acc, i| {
        acc.checked_add(i.note.amount())
            .ok_or_else(|| SdkError::InvalidRequest("input amounts overflow".into()))
    })
}

/// `a + b + ...` with overflow reported as an invalid request.
pub(crate) fn checked_total(parts: &[u128]) -> SdkResult<u128> {
    parts.iter().try_fold(0u128, |acc, p| {
        acc.checked_add(*p)
            .ok_or_else(|| SdkError::InvalidRequest("amounts overflow".into()))
    })
}

/// Require `inputs >= required` and return the change.
pub(crate) fn change_for(inputs: u128, required: u128) -> SdkResult<u128> {
    inputs
        .checked_sub(required)
        .ok_or(SdkError::InsufficientNoteAmount { inputs, required })
}

fn slot<T: Copy>(inputs: &[CheckedInput], default: T, f: impl Fn(&CheckedInput) -> T) -> Vec<T> {
    (0..MAX_INPUTS)
        .map(|i| inputs.get(i).map_or(default, &f))
        .collect()
}

/// Spending nullifiers padded to [`MAX_INPUTS`], zero for unused slots.
pub(crate) fn padded_nullifiers(inputs: &[CheckedInput]) -> Vec<Fr> {
    slot(inputs, Fr::ZERO, |i| i.nullifier.0)
}

/// Private per-input signals shared by transfer, swap and order.
pub(crate) fn push_input_signals(sv: &mut SignalVector, inputs: &[CheckedInput], nk: &NullifierKey) {
    let zero_path = vec![Fr::ZERO; MERKLE_DEPTH];
    let path_elements: Vec<Vec<Fr>> = (0..MAX_INPUTS)
        .map(|i| inputs.get(i).map_or(zero_path.clone(), |c| c.proof.siblings.clone()))
        .collect();
    let path_indices: Vec<Vec<Fr>> = (0..MAX_INPUTS)
        .map(|i| {
            inputs.get(i).map_or(zero_path.clone(), |c| {
                c.proof.indices.iter().map(|b| Fr::from(*b)).collect()
            })
        })
        .collect();

    sv.private("in_enabled", slot(inputs, Fr::ZERO, |_| Fr::ONE))
        .private("in_amounts", slot(inputs, Fr::ZERO, |i| Fr::from(i.note.amount())))
        .private("in_randomness", slot(inputs, Fr::ZERO, |i| i.note.note.randomness))
        .private("in_stealth_keys", slot(inputs, Fr::ZERO, |i| scalar_to_fe(&i.key)))
        .private("in_leaf_indices", slot(inputs, Fr::ZERO, |i| Fr::from(i.note.leaf_index)))
        .private("path_elements", path_elements)
        .private("path_indices", path_indices)
        .private("nullifier_key", nk.0);
}

pub(crate) fn prepare_output<R: Rng + CryptoRng + ?Sized>(
    spec: &OutputSpec,
    token_id: TokenId,
    rng: &mut R,
) -> SdkResult<PreparedOutput> {
    match spec {
        OutputSpec::Precomputed {
            commitment,
            stealth_pub_x,
            randomness,
            amount,
        } => {
            let note = Note::with_randomness(*stealth_pub_x, token_id, *amount, *randomness);
            if compute_commitment(&note) != *commitment {
                return Err(SdkError::InvalidRequest(
                    "precomputed output does not match its commitment".into(),
                ));
            }
            Ok(PreparedOutput {
                note,
                commitment: *commitment,
                encrypted: None,
                stealth_ephemeral_pubkey: None,
            })
        }
        OutputSpec::ToAddress { address, amount } => {
            Ok(delivered(create_output(address, token_id, *amount, rng)?))
        }
        OutputSpec::ToStealth {
            stealth,
            viewing_pubkey,
            amount,
        } => Ok(delivered(create_stealth_output(
            *stealth,
            viewing_pubkey,
            token_id,
            *amount,
            rng,
        )?)),
    }
}

fn delivered(out: ShieldedOutput) -> PreparedOutput {
    PreparedOutput {
        note: out.note,
        commitment: out.commitment,
        encrypted: Some(out.encrypted),
        stealth_ephemeral_pubkey: Some(out.stealth.ephemeral_pubkey),
    }
}

pub(crate) fn nullifiers_of(inputs: &[CheckedInput]) -> Vec<Nullifier> {
    inputs.iter().map(|i| i.nullifier).collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Mutex;

    use super::*;
    use crate::merkle::SparseMerkleTree;
    use crate::prover::ProofLayout;
    use ark_std::rand::rngs::StdRng;

    /// Prover that returns a fixed-size proof and remembers the last request.
    pub struct RecordingProver {
        pub layout: ProofLayout,
        pub last: Mutex<Option<(CircuitId, SignalVector)>>,
    }

    impl RecordingProver {
        pub fn new(layout: ProofLayout) -> Self {
            Self {
                layout,
                last: Mutex::new(None),
            }
        }

        pub fn last_signals(&self) -> SignalVector {
            self.last.lock().unwrap().as_ref().unwrap().1.clone()
        }
    }

    impl Prover for RecordingProver {
        async fn prove(&self, circuit: CircuitId, signals: &SignalVector) -> SdkResult<Groth16Proof> {
            *self.last.lock().unwrap() = Some((circuit, signals.clone()));
            Ok(Groth16Proof {
                a: vec![1; self.layout.a],
                b: vec![2; self.layout.b],
                c: vec![3; self.layout.c],
            })
        }
    }

    pub fn assembler() -> WitnessAssembler<RecordingProver> {
        WitnessAssembler::new(
            RecordingProver::new(ProofLayout::BLS12_381_UNCOMPRESSED),
            ProofLayouts::default(),
        )
    }

    /// Notes paying `amounts` of `token` to `kp`, all in one tree, with
    /// proofs against the final root.
    pub fn funded(kp: &Keypair, token: Fr, amounts: &[u128], rng: &mut StdRng) -> (Vec<SpendInput>, Fr) {
        let mut tree = SparseMerkleTree::new();
        let mut notes = Vec::new();
        for amount in amounts {
            let out = create_output(&kp.address(), token, *amount, rng).unwrap();
            let leaf_index = tree.insert(out.commitment).unwrap();
            notes.push(DecryptedNote {
                note: out.note,
                commitment: out.commitment,
                leaf_index,
                pool_id: 1,
                account_hash: None,
                stealth_ephemeral_pubkey: Some(out.stealth.ephemeral_pubkey),
            });
        }
        let root = tree.root().0;
        let inputs = notes
            .into_iter()
            .map(|note| SpendInput {
                merkle_proof: tree.proof(note.leaf_index).unwrap(),
                note,
            })
            .collect();
        (inputs, root)
    }
}
