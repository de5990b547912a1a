// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! One-time stealth addresses.
//!
//! ```text
//! sender:    E = e*G    S = e*B    f = H(STEALTH, S.x) mod r_J    P = B + f*G
//! recipient: S' = b*E = S          p = b + f mod r_J              p*G == P
//! ```
//!
//! `f` is reduced modulo the subgroup order, not the base field modulus. The
//! two disagree for roughly half of all hash outputs, so any implementation
//! that reduces by the wrong modulus derives keys that do not match `P`.

use rand::{CryptoRng, Rng};
use shroud_primitives::{check_public_key, derive_public_key, hash, point_add, scalar_mul};
use shroud_types::field::fe_to_scalar;
use shroud_types::{domain, DecryptedNote, Point, Scalar, SpendingKey, StealthAddress};
use zeroize::Zeroizing;

use crate::error::{SdkError, SdkResult};
use crate::keys::Keypair;

fn stealth_factor(shared: &Point) -> Scalar {
    fe_to_scalar(&hash(domain::STEALTH, &[shared.x]))
}

/// Sender side. Returns the address and the ephemeral private scalar `e`.
pub fn generate_stealth_address<R: Rng + CryptoRng + ?Sized>(
    recipient_pubkey: &Point,
    rng: &mut R,
) -> SdkResult<(StealthAddress, Zeroizing<Scalar>)> {
    check_public_key(recipient_pubkey)?;
    let e = Zeroizing::new(SpendingKey::random(rng).0);
    let ephemeral_pubkey = derive_public_key(&e);
    let shared = scalar_mul(recipient_pubkey, &e)?;
    let f = stealth_factor(&shared);
    let stealth_pubkey = point_add(recipient_pubkey, &derive_public_key(&f))?;
    Ok((
        StealthAddress {
            stealth_pubkey,
            ephemeral_pubkey,
        },
        e,
    ))
}

/// Recipient side: one-time private key for a stealth address.
pub fn derive_stealth_private_key(
    sk: &SpendingKey,
    ephemeral_pubkey: &Point,
) -> SdkResult<Zeroizing<Scalar>> {
    check_public_key(ephemeral_pubkey)?;
    let shared = scalar_mul(ephemeral_pubkey, &sk.0)?;
    let factor = Zeroizing::new(stealth_factor(&shared));
    Ok(Zeroizing::new(sk.0 + *factor))
}

/// True when `keypair` can spend from `stealth_pubkey`. The derived private key
/// never leaves this function.
pub fn check_stealth_ownership(
    stealth_pubkey: &Point,
    ephemeral_pubkey: &Point,
    keypair: &Keypair,
) -> SdkResult<bool> {
    let sk = keypair.spending_key()?;
    let derived = derive_stealth_private_key(sk, ephemeral_pubkey)?;
    Ok(derive_public_key(&derived) == *stealth_pubkey)
}

/// Private key that controls a scanned note: stealth-derived when the note
/// carries an ephemeral key, otherwise the base spending key.
pub fn note_private_key(keypair: &Keypair, note: &DecryptedNote) -> SdkResult<Zeroizing<Scalar>> {
    let sk = keypair.spending_key()?;
    let key = match &note.stealth_ephemeral_pubkey {
        Some(eph) => derive_stealth_private_key(sk, eph)?,
        None => Zeroizing::new(sk.0),
    };
    if derive_public_key(&key).x != note.note.stealth_pub_x {
        return Err(SdkError::OwnershipMismatch {
            leaf_index: note.leaf_index,
        });
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use shroud_types::{FieldElement, Note};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(21)
    }

    #[test]
    fn stealth_roundtrip() {
        let mut rng = rng();
        for _ in 0..8 {
            let recipient = Keypair::random(&mut rng);
            let (addr, _) = generate_stealth_address(&recipient.public_key(), &mut rng).unwrap();
            let sk = recipient.spending_key().unwrap();
            let p = derive_stealth_private_key(sk, &addr.ephemeral_pubkey).unwrap();
            assert_eq!(derive_public_key(&p), addr.stealth_pubkey);
        }
    }

    #[test]
    fn ownership_check() {
        let mut rng = rng();
        let alice = Keypair::random(&mut rng);
        let bob = Keypair::random(&mut rng);
        let (addr, _) = generate_stealth_address(&alice.public_key(), &mut rng).unwrap();
        assert!(check_stealth_ownership(&addr.stealth_pubkey, &addr.ephemeral_pubkey, &alice).unwrap());
        assert!(!check_stealth_ownership(&addr.stealth_pubkey, &addr.ephemeral_pubkey, &bob).unwrap());
    }

    #[test]
    fn addresses_are_unlinkable() {
        let mut rng = rng();
        let alice = Keypair::random(&mut rng);
        let (a1, _) = generate_stealth_address(&alice.public_key(), &mut rng).unwrap();
        let (a2, _) = generate_stealth_address(&alice.public_key(), &mut rng).unwrap();
        assert_ne!(a1.stealth_pubkey, a2.stealth_pubkey);
        assert_ne!(a1.stealth_pubkey, alice.public_key());
    }

    #[test]
    fn sender_shared_secret_matches_recipient() {
        let mut rng = rng();
        let alice = Keypair::random(&mut rng);
        let (addr, e) = generate_stealth_address(&alice.public_key(), &mut rng).unwrap();
        let sender_side = scalar_mul(&alice.public_key(), &e).unwrap();
        let recipient_side =
            scalar_mul(&addr.ephemeral_pubkey, &alice.spending_key().unwrap().0).unwrap();
        assert_eq!(sender_side, recipient_side);
    }

    #[test]
    fn factor_reduced_by_subgroup_order() {
        // wrong-modulus reduction would make f*G disagree with P - B
        let mut rng = rng();
        let alice = Keypair::random(&mut rng);
        let (addr, e) = generate_stealth_address(&alice.public_key(), &mut rng).unwrap();
        let shared = scalar_mul(&alice.public_key(), &e).unwrap();
        let f = stealth_factor(&shared);
        let expected = point_add(&alice.public_key(), &derive_public_key(&f)).unwrap();
        assert_eq!(expected, addr.stealth_pubkey);
    }

    #[test]
    fn rejects_invalid_ephemeral_key() {
        let mut rng = rng();
        let alice = Keypair::random(&mut rng);
        let bogus = Point::new(FieldElement::from(3u64), FieldElement::from(4u64));
        assert!(derive_stealth_private_key(alice.spending_key().unwrap(), &bogus).is_err());
        assert!(generate_stealth_address(&bogus, &mut rng).is_err());
    }

    #[test]
    fn watch_only_cannot_check_ownership() {
        let mut rng = rng();
        let alice = Keypair::random(&mut rng);
        let watch = Keypair::watch_only(alice.viewing_key().clone(), alice.public_key()).unwrap();
        let (addr, _) = generate_stealth_address(&alice.public_key(), &mut rng).unwrap();
        assert!(matches!(
            check_stealth_ownership(&addr.stealth_pubkey, &addr.ephemeral_pubkey, &watch),
            Err(SdkError::WatchOnly)
        ));
    }

    #[test]
    fn note_key_selection() {
        let mut rng = rng();
        let alice = Keypair::random(&mut rng);
        let (addr, _) = generate_stealth_address(&alice.public_key(), &mut rng).unwrap();
        let note = Note::new(addr.stealth_pubkey.x, FieldElement::from(1u64), 10, &mut rng);
        let mut dn = DecryptedNote {
            note,
            commitment: shroud_primitives::compute_commitment(&note),
            leaf_index: 0,
            pool_id: 1,
            account_hash: None,
            stealth_ephemeral_pubkey: Some(addr.ephemeral_pubkey),
        };
        let key = note_private_key(&alice, &dn).unwrap();
        assert_eq!(derive_public_key(&key), addr.stealth_pubkey);

        // without the ephemeral key the base key is used and no longer matches
        dn.stealth_ephemeral_pubkey = None;
        assert!(matches!(
            note_private_key(&alice, &dn),
            Err(SdkError::OwnershipMismatch { .. })
        ));
    }
}
