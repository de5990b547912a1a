use core::fmt;

use crate::field::{FieldElement, Scalar};
use ark_ff::{UniformRand, Zero};
use ark_std::rand::Rng;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Root secret of a wallet: a scalar in `[1, r_J)`. Wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SpendingKey(pub Scalar);

impl SpendingKey {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        loop {
            let s = Scalar::rand(rng);
            if !s.is_zero() {
                return Self(s);
            }
        }
    }
}

impl fmt::Debug for SpendingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SpendingKey(..)")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Zeroize)]
pub struct NullifierKey(pub FieldElement);

/// Read-only capability: detect incoming notes and compute their nullifiers.
#[derive(Clone, Debug, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ViewingKey {
    pub nullifier_key: NullifierKey,
    pub incoming_viewing_key: Scalar,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_std::test_rng;

    #[test]
    fn spending_key_random() {
        let mut rng = test_rng();
        let sk1 = SpendingKey::random(&mut rng);
        let sk2 = SpendingKey::random(&mut rng);
        assert_ne!(sk1.0, sk2.0);
        assert!(!sk1.0.is_zero());
    }

    #[test]
    fn spending_key_debug_is_redacted() {
        let mut rng = test_rng();
        let sk = SpendingKey::random(&mut rng);
        assert_eq!(format!("{sk:?}"), "SpendingKey(..)");
    }

    #[test]
    fn keys_zeroize() {
        let mut rng = test_rng();
        let mut sk = SpendingKey::random(&mut rng);
        sk.zeroize();
        assert!(sk.0.is_zero());

        let mut vk = ViewingKey {
            nullifier_key: NullifierKey(FieldElement::from(7u64)),
            incoming_viewing_key: Scalar::from(9u64),
        };
        vk.zeroize();
        assert!(vk.nullifier_key.0.is_zero());
        assert!(vk.incoming_viewing_key.is_zero());
    }
}
