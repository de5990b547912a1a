// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! Arkworks → wire conversion for proofs and public signals.
//!
//! Embedders that prove in-process with `ark-groth16` use [`proof_from_ark`]
//! to get a [`Groth16Proof`] with the same element lengths the verifier
//! expects.
//!
//! # Byte order
//!
//! - **G1/G2 points**: arkworks canonical form (LE), compressed or not.
//! - **Fr scalars**: big-endian, matching the rest of the engine.

use ark_bls12_381::{Bls12_381, Fr};
use ark_serialize::CanonicalSerialize;

use crate::error::{SdkError, SdkResult};
use crate::prover::{Groth16Proof, ProofLayout};

/// Big-endian hex, 64 chars, no prefix.
pub fn serialize_fr(fr: &Fr) -> String {
    crate::wallet::fr_to_raw_hex(fr)
}

pub fn public_signals_hex(values: &[Fr]) -> Vec<String> {
    values.iter().map(serialize_fr).collect()
}

fn serialize_point<T: CanonicalSerialize>(point: &T, compressed: bool) -> SdkResult<Vec<u8>> {
    let mut bytes = Vec::new();
    let res = if compressed {
        point.serialize_compressed(&mut bytes)
    } else {
        point.serialize_uncompressed(&mut bytes)
    };
    res.map_err(|e| SdkError::Prover(format!("serialize proof element: {e}")))?;
    Ok(bytes)
}

pub fn proof_from_ark(proof: &ark_groth16::Proof<Bls12_381>, compressed: bool) -> SdkResult<Groth16Proof> {
    Ok(Groth16Proof {
        a: serialize_point(&proof.a, compressed)?,
        b: serialize_point(&proof.b, compressed)?,
        c: serialize_point(&proof.c, compressed)?,
    })
}

/// Layout of proofs produced by [`proof_from_ark`].
pub fn ark_layout(compressed: bool) -> ProofLayout {
    if compressed {
        ProofLayout::BLS12_381_COMPRESSED
    } else {
        ProofLayout::BLS12_381_UNCOMPRESSED
    }
}
