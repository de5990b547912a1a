//! Jubjub arithmetic over the BLS12-381 scalar field.
//!
//! Points cross this module's boundary as plain [`Point`] coordinates. Every
//! point coming from outside is checked against the curve equation before use;
//! public keys additionally have to sit in the prime-order subgroup.

use ark_ec::{AffineRepr, CurveGroup};
use ark_ed_on_bls12_381::{EdwardsAffine, EdwardsProjective};
use ark_ff::{AdditiveGroup, BigInteger, PrimeField, Zero};
use shroud_types::{Point, Scalar};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CurveError {
    #[error("point is not on the curve")]
    NotOnCurve,
    #[error("point is not in the prime-order subgroup")]
    NotInSubgroup,
    #[error("identity is not a valid public key")]
    Identity,
}

pub fn generator() -> Point {
    from_affine(&EdwardsAffine::generator())
}

pub fn from_affine(p: &EdwardsAffine) -> Point {
    Point::new(p.x, p.y)
}

fn unchecked(p: &Point) -> EdwardsAffine {
    EdwardsAffine::new_unchecked(p.x, p.y)
}

/// Curve-equation check only.
pub fn to_affine(p: &Point) -> Result<EdwardsAffine, CurveError> {
    let affine = unchecked(p);
    if !affine.is_on_curve() {
        return Err(CurveError::NotOnCurve);
    }
    Ok(affine)
}

pub fn is_on_curve(p: &Point) -> bool {
    unchecked(p).is_on_curve()
}

pub fn is_in_subgroup(p: &Point) -> bool {
    let affine = unchecked(p);
    affine.is_on_curve() && affine.is_in_correct_subgroup_assuming_on_curve()
}

/// Full public-key validation: on curve, in the subgroup, not the identity.
pub fn validate_public_key(p: &Point) -> Result<EdwardsAffine, CurveError> {
    let affine = to_affine(p)?;
    if !affine.is_in_correct_subgroup_assuming_on_curve() {
        return Err(CurveError::NotInSubgroup);
    }
    if p.is_identity() {
        return Err(CurveError::Identity);
    }
    Ok(affine)
}

/// [`validate_public_key`] without the decoded point.
pub fn check_public_key(p: &Point) -> Result<(), CurveError> {
    validate_public_key(p).map(|_| ())
}

pub fn point_add(p: &Point, q: &Point) -> Result<Point, CurveError> {
    let sum = to_affine(p)?.into_group() + to_affine(q)?;
    Ok(from_affine(&sum.into_affine()))
}

/// Variable-base multiplication. Rejects points outside the subgroup so that a
/// secret scalar is never multiplied into a small-order component.
pub fn scalar_mul(p: &Point, k: &Scalar) -> Result<Point, CurveError> {
    let base = to_affine(p)?;
    if !base.is_in_correct_subgroup_assuming_on_curve() {
        return Err(CurveError::NotInSubgroup);
    }
    Ok(from_affine(&ladder(base.into_group(), k).into_affine()))
}

pub fn derive_public_key(sk: &Scalar) -> Point {
    from_affine(&ladder(EdwardsAffine::generator().into_group(), sk).into_affine())
}

// Montgomery ladder over the full 256-bit representation: one addition and one
// doubling per bit regardless of the bit value.
fn ladder(base: EdwardsProjective, k: &Scalar) -> EdwardsProjective {
    let mut r0 = EdwardsProjective::zero();
    let mut r1 = base;
    for bit in k.into_bigint().to_bits_be() {
        if bit {
            r0 += r1;
            r1.double_in_place();
        } else {
            r1 += r0;
            r0.double_in_place();
        }
    }
    r0
}
