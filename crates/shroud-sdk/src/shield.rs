// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! Building outputs addressed to a [`ShieldedAddress`].
//!
//! Used for deposits into a pool and for every `ToAddress` output of a
//! proved operation: a fresh stealth address is derived from the recipient's
//! spend key, the note is bound to it, and the plaintext is encrypted to the
//! recipient's viewing key. [`create_stealth_output`] does the same for a
//! stealth address the caller derived beforehand.

use ark_bls12_381::Fr;
use rand::{CryptoRng, Rng};
use shroud_primitives::{check_public_key, compute_commitment, generate_randomness};
use shroud_types::{EncryptedNote, Note, Point, StealthAddress, TokenId};

use crate::encryption::encrypt_note;
use crate::error::SdkResult;
use crate::keys::ShieldedAddress;
use crate::ledger::memory::NewOutput;
use crate::stealth::generate_stealth_address;

#[derive(Clone, Debug)]
pub struct ShieldedOutput {
    pub note: Note,
    pub commitment: Fr,
    pub encrypted: EncryptedNote,
    pub stealth: StealthAddress,
}

impl ShieldedOutput {
    /// Ledger form for publishing.
    pub fn to_new_output(&self) -> NewOutput {
        NewOutput {
            commitment: self.commitment,
            encrypted: self.encrypted.clone(),
            stealth_ephemeral_pubkey: Some(self.stealth.ephemeral_pubkey),
        }
    }
}

pub fn create_output<R: Rng + CryptoRng + ?Sized>(
    address: &ShieldedAddress,
    token_id: TokenId,
    amount: u128,
    rng: &mut R,
) -> SdkResult<ShieldedOutput> {
    let (stealth, _) = generate_stealth_address(&address.spend_pubkey, rng)?;
    create_stealth_output(stealth, &address.viewing_pubkey, token_id, amount, rng)
}

/// Output bound to an existing stealth address, encrypted to `viewing_pubkey`.
pub fn create_stealth_output<R: Rng + CryptoRng + ?Sized>(
    stealth: StealthAddress,
    viewing_pubkey: &Point,
    token_id: TokenId,
    amount: u128,
    rng: &mut R,
) -> SdkResult<ShieldedOutput> {
    check_public_key(&stealth.stealth_pubkey)?;
    check_public_key(&stealth.ephemeral_pubkey)?;
    let note = Note::with_randomness(
        stealth.stealth_pubkey.x,
        token_id,
        amount,
        generate_randomness(rng),
    );
    let encrypted = encrypt_note(&note, viewing_pubkey, rng)?;
    Ok(ShieldedOutput {
        commitment: compute_commitment(&note),
        note,
        encrypted,
        stealth,
    })
}

/// Deposit helper: an output paying `amount` of `token_id` to `address`.
pub fn shield<R: Rng + CryptoRng + ?Sized>(
    address: &ShieldedAddress,
    token_id: TokenId,
    amount: u128,
    rng: &mut R,
) -> SdkResult<ShieldedOutput> {
    let out = create_output(address, token_id, amount, rng)?;
    tracing::debug!(amount, "prepared shielded deposit");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encryption::decrypt_note;
    use crate::keys::Keypair;
    use crate::error::SdkError;
    use crate::stealth::{check_stealth_ownership, generate_stealth_address};
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use shroud_primitives::{verify_commitment, CurveError};

    #[test]
    fn output_is_decryptable_and_owned() {
        let mut rng = StdRng::seed_from_u64(11);
        let bob = Keypair::random(&mut rng);
        let out = shield(&bob.address(), Fr::from(1u64), 500, &mut rng).unwrap();

        assert!(verify_commitment(&out.commitment, &out.note));
        let ivk = bob.viewing_key().incoming_viewing_key;
        assert_eq!(decrypt_note(&out.encrypted, &ivk).unwrap(), out.note);
        assert!(check_stealth_ownership(
            &out.stealth.stealth_pubkey,
            &out.stealth.ephemeral_pubkey,
            &bob
        )
        .unwrap());
        assert_eq!(out.note.stealth_pub_x, out.stealth.stealth_pubkey.x);
    }

    #[test]
    fn new_output_carries_ephemeral_key() {
        let mut rng = StdRng::seed_from_u64(12);
        let bob = Keypair::random(&mut rng);
        let out = create_output(&bob.address(), Fr::from(1u64), 1, &mut rng).unwrap();
        let ledger_out = out.to_new_output();
        assert_eq!(ledger_out.commitment, out.commitment);
        assert_eq!(ledger_out.stealth_ephemeral_pubkey, Some(out.stealth.ephemeral_pubkey));
    }

    #[test]
    fn identity_viewing_key_is_rejected() {
        let mut rng = StdRng::seed_from_u64(13);
        let bob = Keypair::random(&mut rng);
        let address = ShieldedAddress {
            spend_pubkey: bob.public_key(),
            viewing_pubkey: Point::identity(),
        };
        assert!(matches!(
            create_output(&address, Fr::from(1u64), 5, &mut rng),
            Err(SdkError::Curve(CurveError::Identity))
        ));
    }

    #[test]
    fn prederived_stealth_output_is_owned() {
        let mut rng = StdRng::seed_from_u64(14);
        let bob = Keypair::random(&mut rng);
        let (stealth, _) = generate_stealth_address(&bob.public_key(), &mut rng).unwrap();
        let out = create_stealth_output(stealth, &bob.viewing_public_key(), Fr::from(2u64), 7, &mut rng)
            .unwrap();
        assert_eq!(out.stealth, stealth);
        assert_eq!(out.note.stealth_pub_x, stealth.stealth_pubkey.x);
        let ivk = bob.viewing_key().incoming_viewing_key;
        assert_eq!(decrypt_note(&out.encrypted, &ivk).unwrap().amount, 7);

        let mut bad = stealth;
        bad.stealth_pubkey = Point::identity();
        assert!(create_stealth_output(bad, &bob.viewing_public_key(), Fr::from(2u64), 7, &mut rng).is_err());
    }
}
