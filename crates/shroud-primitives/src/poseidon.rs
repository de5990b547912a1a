use std::sync::OnceLock;

use ark_bls12_381::Fr;
use ark_crypto_primitives::sponge::{
    poseidon::{find_poseidon_ark_and_mds, PoseidonConfig, PoseidonSponge},
    CryptographicSponge, FieldBasedCryptographicSponge,
};
use ark_ff::PrimeField;
use shroud_types::domain;

const RATE: usize = 2;
const FULL_ROUNDS: usize = 8;
const PARTIAL_ROUNDS: usize = 31;
const ALPHA: u64 = 17;

static CONFIG: OnceLock<PoseidonConfig<Fr>> = OnceLock::new();

pub fn poseidon_config() -> &'static PoseidonConfig<Fr> {
    CONFIG.get_or_init(|| {
        let (ark, mds) = find_poseidon_ark_and_mds::<Fr>(
            Fr::MODULUS_BIT_SIZE as u64,
            RATE,
            FULL_ROUNDS as u64,
            PARTIAL_ROUNDS as u64,
            0,
        );
        PoseidonConfig::new(FULL_ROUNDS, PARTIAL_ROUNDS, ALPHA, mds, ark, RATE, 1)
    })
}

/// Raw sponge hash with no domain tag. Prefer [`hash`].
pub fn poseidon_hash(inputs: &[Fr]) -> Fr {
    let mut sponge = PoseidonSponge::new(poseidon_config());
    sponge.absorb(&inputs.to_vec());
    sponge.squeeze_native_field_elements(1)[0]
}

/// Domain-separated hash: absorbs `Fr::from(domain)` before `inputs`.
pub fn hash(domain: u64, inputs: &[Fr]) -> Fr {
    let mut tagged = Vec::with_capacity(inputs.len() + 1);
    tagged.push(Fr::from(domain));
    tagged.extend_from_slice(inputs);
    poseidon_hash(&tagged)
}

pub fn merkle_hash(left: Fr, right: Fr) -> Fr {
    hash(domain::MERKLE_NODE, &[left, right])
}
