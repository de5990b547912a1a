use crate::field::FieldElement;
use ark_ff::{One, Zero};

/// Affine point on the protocol curve.
///
/// Plain coordinates only; curve-equation and subgroup checks live in
/// `shroud-primitives`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: FieldElement,
    pub y: FieldElement,
}

impl Point {
    pub fn new(x: FieldElement, y: FieldElement) -> Self {
        Self { x, y }
    }

    /// The twisted-Edwards neutral element `(0, 1)`.
    pub fn identity() -> Self {
        Self {
            x: FieldElement::zero(),
            y: FieldElement::one(),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.x.is_zero() && self.y.is_one()
    }
}

/// One-time address produced by a sender for a single payment.
///
/// `ephemeral_pubkey` must be kept next to the resulting note: it is the only
/// way for the recipient to re-derive the one-time private key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StealthAddress {
    pub stealth_pubkey: Point,
    pub ephemeral_pubkey: Point,
}
