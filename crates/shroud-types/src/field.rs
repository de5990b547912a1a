//! Canonical 32-byte big-endian encoding of field elements and scalars.
//!
//! [`FieldElement`] is the Jubjub base field (the BLS12-381 scalar field).
//! [`Scalar`] is the Jubjub prime-subgroup scalar field, whose modulus is
//! strictly smaller than the base modulus.

use alloc::vec::Vec;
use ark_ff::{BigInteger, PrimeField};

pub type FieldElement = ark_bls12_381::Fr;
pub type Scalar = ark_ed_on_bls12_381::Fr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("expected 32 bytes, got {0}")]
    Length(usize),
    #[error("value is not a canonical field element")]
    NonCanonical,
}

pub fn fe_to_bytes(fe: &FieldElement) -> [u8; 32] {
    to_be_32(fe.into_bigint().to_bytes_be())
}

/// Decode a field element, rejecting values at or above the modulus.
pub fn fe_from_bytes(bytes: &[u8]) -> Result<FieldElement, FieldError> {
    if bytes.len() != 32 {
        return Err(FieldError::Length(bytes.len()));
    }
    let fe = FieldElement::from_be_bytes_mod_order(bytes);
    if fe_to_bytes(&fe).as_slice() != bytes {
        return Err(FieldError::NonCanonical);
    }
    Ok(fe)
}

pub fn scalar_to_bytes(s: &Scalar) -> [u8; 32] {
    to_be_32(s.into_bigint().to_bytes_be())
}

pub fn scalar_from_bytes(bytes: &[u8]) -> Result<Scalar, FieldError> {
    if bytes.len() != 32 {
        return Err(FieldError::Length(bytes.len()));
    }
    let s = Scalar::from_be_bytes_mod_order(bytes);
    if scalar_to_bytes(&s).as_slice() != bytes {
        return Err(FieldError::NonCanonical);
    }
    Ok(s)
}

/// Reduce a base-field element modulo the subgroup order.
pub fn fe_to_scalar(fe: &FieldElement) -> Scalar {
    Scalar::from_be_bytes_mod_order(&fe_to_bytes(fe))
}

/// Embed a scalar into the base field. Never reduces since `r_J < p`.
pub fn scalar_to_fe(s: &Scalar) -> FieldElement {
    FieldElement::from_be_bytes_mod_order(&scalar_to_bytes(s))
}

fn to_be_32(bytes: Vec<u8>) -> [u8; 32] {
    let mut out = [0u8; 32];
    let start = 32 - bytes.len().min(32);
    out[start..].copy_from_slice(&bytes[bytes.len().saturating_sub(32)..]);
    out
}
