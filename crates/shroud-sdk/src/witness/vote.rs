// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! Private vote weighted by a note's amount.
//!
//! ```text
//! public:  merkle_root, action_nullifier, action_domain, token_id, vote_weight, vote_choice
//! private: in_randomness, in_stealth_pub_x, in_stealth_key, in_leaf_index,
//!          path_elements[D], path_indices[D], nullifier_key
//! ```
//!
//! The note is proven, not consumed. Its action nullifier is unique per
//! `(note, action_domain)`, so the same note votes once per domain and its
//! spending nullifier is never revealed.

use ark_bls12_381::Fr;
use shroud_primitives::derive_action_nullifier;
use shroud_types::field::scalar_to_fe;

use super::{check_input, PreparedWitness, ProofBundle, SpendInput, WitnessAssembler};
use crate::error::SdkResult;
use crate::keys::Keypair;
use crate::prover::{CircuitId, Prover, SignalVector};

#[derive(Clone, Debug)]
pub struct VoteRequest {
    pub input: SpendInput,
    pub merkle_root: Fr,
    pub action_domain: Fr,
    pub vote_choice: u64,
}

impl<P: Prover> WitnessAssembler<P> {
    pub fn assemble_vote(&self, keypair: &Keypair, request: &VoteRequest) -> SdkResult<PreparedWitness> {
        let input = check_input(keypair, &request.input, &request.merkle_root)?;
        let nk = keypair.nullifier_key();
        let action_nullifier =
            derive_action_nullifier(nk, &input.note.commitment, &request.action_domain);

        let mut signals = SignalVector::new();
        signals
            .public("merkle_root", request.merkle_root)
            .public("action_nullifier", action_nullifier.0)
            .public("action_domain", request.action_domain)
            .public("token_id", input.note.token_id())
            .public("vote_weight", Fr::from(input.note.amount()))
            .public("vote_choice", Fr::from(request.vote_choice))
            .private("in_randomness", input.note.note.randomness)
            .private("in_stealth_pub_x", input.note.note.stealth_pub_x)
            .private("in_stealth_key", scalar_to_fe(&input.key))
            .private("in_leaf_index", Fr::from(input.note.leaf_index))
            .private("path_elements", input.proof.siblings.clone())
            .private(
                "path_indices",
                input.proof.indices.iter().map(|b| Fr::from(*b)).collect::<Vec<_>>(),
            )
            .private("nullifier_key", nk.0);

        tracing::debug!(weight = input.note.amount(), "assembled vote witness");
        Ok(PreparedWitness {
            circuit: CircuitId::Vote,
            signals,
            nullifiers: vec![action_nullifier],
            outputs: Vec::new(),
            merkle_root: request.merkle_root,
            order: None,
        })
    }

    pub async fn prove_vote(&self, keypair: &Keypair, request: &VoteRequest) -> SdkResult<ProofBundle> {
        let witness = self.assemble_vote(keypair, request)?;
        self.prove_witness(witness).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{assembler, funded};
    use super::*;
    use crate::error::SdkError;
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use shroud_primitives::derive_spending_nullifier;

    fn vote(input: SpendInput, root: Fr, domain: u64) -> VoteRequest {
        VoteRequest {
            input,
            merkle_root: root,
            action_domain: Fr::from(domain),
            vote_choice: 1,
        }
    }

    #[tokio::test]
    async fn vote_uses_action_nullifier() {
        let mut rng = StdRng::seed_from_u64(1);
        let alice = Keypair::random(&mut rng);
        let (inputs, root) = funded(&alice, Fr::from(1u64), &[42], &mut rng);
        let input = inputs[0].clone();
        let bundle = assembler()
            .prove_vote(&alice, &vote(input.clone(), root, 7))
            .await
            .unwrap();

        let spend_nf = derive_spending_nullifier(
            alice.nullifier_key(),
            &input.note.commitment,
            input.note.leaf_index,
        );
        assert_eq!(bundle.nullifiers.len(), 1);
        assert_ne!(bundle.nullifiers[0], spend_nf);
        assert!(!bundle.public_signals.contains(&spend_nf.0));
        assert_eq!(bundle.public_signals.len(), 6);
        assert_eq!(bundle.public_signals[4], Fr::from(42u64));
        assert!(bundle.outputs.is_empty());
    }

    #[test]
    fn one_vote_per_domain() {
        let mut rng = StdRng::seed_from_u64(2);
        let alice = Keypair::random(&mut rng);
        let (inputs, root) = funded(&alice, Fr::from(1u64), &[42], &mut rng);
        let asm = assembler();
        let a = asm.assemble_vote(&alice, &vote(inputs[0].clone(), root, 7)).unwrap();
        let b = asm.assemble_vote(&alice, &vote(inputs[0].clone(), root, 7)).unwrap();
        let c = asm.assemble_vote(&alice, &vote(inputs[0].clone(), root, 8)).unwrap();
        assert_eq!(a.nullifiers, b.nullifiers);
        assert_ne!(a.nullifiers, c.nullifiers);
    }

    #[test]
    fn stale_root() {
        let mut rng = StdRng::seed_from_u64(3);
        let alice = Keypair::random(&mut rng);
        let (inputs, _) = funded(&alice, Fr::from(1u64), &[42], &mut rng);
        assert!(matches!(
            assembler().assemble_vote(&alice, &vote(inputs[0].clone(), Fr::from(1u64), 7)),
            Err(SdkError::StaleRoot { .. })
        ));
    }
}
