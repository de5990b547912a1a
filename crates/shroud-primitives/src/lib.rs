pub mod commitment;
pub mod curve;
pub mod poseidon;

pub use commitment::{
    compute_commitment, derive_account_hash, derive_action_nullifier, derive_nullifier_key,
    derive_spending_nullifier, generate_randomness, verify_commitment,
};
pub use curve::{
    check_public_key, derive_public_key, generator, is_in_subgroup, is_on_curve, point_add,
    scalar_mul, validate_public_key, CurveError,
};
pub use poseidon::{hash, merkle_hash, poseidon_config, poseidon_hash};
