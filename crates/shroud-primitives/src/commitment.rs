//! Note commitments and nullifiers.
//!
//! ```text
//! commitment       = H(COMMITMENT,       stealth_pub_x, token_id, amount, randomness)
//! spend nullifier  = H(SPEND_NULLIFIER,  nk, commitment, leaf_index)
//! action nullifier = H(ACTION_NULLIFIER, nk, commitment, action_domain)
//! ```

use ark_bls12_381::Fr;
use ark_ff::UniformRand;
use ark_std::rand::{CryptoRng, Rng};
use shroud_types::{domain, field::scalar_to_fe, Note, Nullifier, NullifierKey, PoolId, SpendingKey};

use crate::poseidon::hash;

pub fn compute_commitment(note: &Note) -> Fr {
    hash(
        domain::COMMITMENT,
        &[
            note.stealth_pub_x,
            note.token_id,
            Fr::from(note.amount),
            note.randomness,
        ],
    )
}

pub fn verify_commitment(commitment: &Fr, note: &Note) -> bool {
    compute_commitment(note) == *commitment
}

/// Blinding factor drawn from a cryptographically secure source.
pub fn generate_randomness<R: Rng + CryptoRng + ?Sized>(rng: &mut R) -> Fr {
    Fr::rand(rng)
}

pub fn derive_nullifier_key(sk: &SpendingKey) -> NullifierKey {
    NullifierKey(hash(domain::NULLIFIER_KEY, &[scalar_to_fe(&sk.0)]))
}

/// Publishing this value on the ledger permanently retires the note.
pub fn derive_spending_nullifier(nk: &NullifierKey, commitment: &Fr, leaf_index: u64) -> Nullifier {
    Nullifier::from_fe(hash(
        domain::SPEND_NULLIFIER,
        &[nk.0, *commitment, Fr::from(leaf_index)],
    ))
}

/// Scoped to one action context; the note stays spendable.
pub fn derive_action_nullifier(nk: &NullifierKey, commitment: &Fr, action_domain: &Fr) -> Nullifier {
    Nullifier::from_fe(hash(
        domain::ACTION_NULLIFIER,
        &[nk.0, *commitment, *action_domain],
    ))
}

/// Binds a commitment to its ledger position.
pub fn derive_account_hash(commitment: &Fr, pool_id: PoolId, leaf_index: u64) -> Fr {
    hash(
        domain::ACCOUNT,
        &[*commitment, Fr::from(pool_id), Fr::from(leaf_index)],
    )
}
