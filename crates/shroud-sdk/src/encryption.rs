// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! Note encryption: Jubjub ECDH + BLAKE3 KDF + ChaCha20-Poly1305.
//!
//! ```text
//! E = e*G, S = e*R
//! (key || nonce) = BLAKE3-derive("shroud note encryption v1", S.x || S.y || E.x || E.y)
//! (ciphertext, tag) = ChaCha20-Poly1305(key, nonce, note plaintext)
//! ```
//!
//! Each ephemeral scalar is used for exactly one note, so key and nonce are
//! never reused.

use ark_ff::Zero;
use chacha20poly1305::aead::{AeadInPlace, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce, Tag};
use rand::{CryptoRng, Rng};
use shroud_primitives::{check_public_key, derive_public_key, scalar_mul};
use shroud_types::field::fe_to_bytes;
use shroud_types::{EncryptedNote, Note, Point, Scalar, SpendingKey, NOTE_PLAINTEXT_LEN};
use zeroize::{Zeroize, Zeroizing};

use crate::error::{SdkError, SdkResult};

const KDF_CONTEXT: &str = "shroud note encryption v1";

fn derive_key_nonce(shared: &Point, ephemeral: &Point) -> (Zeroizing<[u8; 32]>, [u8; 12]) {
    let mut hasher = blake3::Hasher::new_derive_key(KDF_CONTEXT);
    hasher.update(&fe_to_bytes(&shared.x));
    hasher.update(&fe_to_bytes(&shared.y));
    hasher.update(&fe_to_bytes(&ephemeral.x));
    hasher.update(&fe_to_bytes(&ephemeral.y));
    let mut okm = [0u8; 44];
    hasher.finalize_xof().fill(&mut okm);
    let mut key = Zeroizing::new([0u8; 32]);
    let mut nonce = [0u8; 12];
    key.copy_from_slice(&okm[..32]);
    nonce.copy_from_slice(&okm[32..]);
    okm.zeroize();
    (key, nonce)
}

/// Encrypt `note` to `recipient_pubkey`, which must be a valid non-identity
/// subgroup point.
pub fn encrypt_note<R: Rng + CryptoRng + ?Sized>(
    note: &Note,
    recipient_pubkey: &Point,
    rng: &mut R,
) -> SdkResult<EncryptedNote> {
    check_public_key(recipient_pubkey)?;
    let e = Zeroizing::new(SpendingKey::random(rng).0);
    let ephemeral_pubkey = derive_public_key(&e);
    let shared = scalar_mul(recipient_pubkey, &e)?;
    let (key, nonce) = derive_key_nonce(&shared, &ephemeral_pubkey);

    let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_slice()));
    let mut buffer = note.to_plaintext().to_vec();
    let tag = cipher
        .encrypt_in_place_detached(Nonce::from_slice(&nonce), b"", &mut buffer)
        .map_err(|_| SdkError::Other(anyhow::anyhow!("note encryption failed")))?;

    Ok(EncryptedNote {
        ephemeral_pubkey,
        ciphertext: buffer,
        tag: tag.into(),
    })
}

/// Decrypt with the private scalar matching the public key the note was
/// encrypted to. Fails with [`SdkError::Decryption`] when the tag does not verify.
pub fn decrypt_note(encrypted: &EncryptedNote, private_key: &Scalar) -> SdkResult<Note> {
    if private_key.is_zero() {
        return Err(SdkError::InvalidKey("decryption key is zero".to_string()));
    }
    check_public_key(&encrypted.ephemeral_pubkey)?;
    let shared = scalar_mul(&encrypted.ephemeral_pubkey, private_key)?;
    let (key, nonce) = derive_key_nonce(&shared, &encrypted.ephemeral_pubkey);

    if encrypted.ciphertext.len() != NOTE_PLAINTEXT_LEN {
        return Err(SdkError::Decryption);
    }
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_slice()));
    let mut buffer = encrypted.ciphertext.clone();
    cipher
        .decrypt_in_place_detached(
            Nonce::from_slice(&nonce),
            b"",
            &mut buffer,
            Tag::from_slice(&encrypted.tag),
        )
        .map_err(|_| SdkError::Decryption)?;

    Note::from_plaintext(&buffer).map_err(|_| SdkError::Decryption)
}

/// Scanning form of [`decrypt_note`]: most ledger ciphertexts belong to
/// someone else, so failure is `None` rather than an error.
pub fn try_decrypt_note(encrypted: &EncryptedNote, private_key: &Scalar) -> Option<Note> {
    decrypt_note(encrypted, private_key).ok()
}
