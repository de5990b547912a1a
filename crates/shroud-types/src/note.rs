use alloc::vec::Vec;

use crate::field::{fe_from_bytes, fe_to_bytes, FieldElement, FieldError};
use crate::point::Point;
use ark_ff::UniformRand;
use ark_std::rand::Rng;

pub type TokenId = FieldElement;
pub type PoolId = u64;

/// `stealth_pub_x(32) || token_id(32) || amount(16, BE) || randomness(32)`
pub const NOTE_PLAINTEXT_LEN: usize = 112;

/// Plaintext value object. Immutable once created.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Note {
    pub stealth_pub_x: FieldElement,
    pub token_id: TokenId,
    pub amount: u128,
    pub randomness: FieldElement,
}

impl Note {
    pub fn new<R: Rng + ?Sized>(
        stealth_pub_x: FieldElement,
        token_id: TokenId,
        amount: u128,
        rng: &mut R,
    ) -> Self {
        Self {
            stealth_pub_x,
            token_id,
            amount,
            randomness: FieldElement::rand(rng),
        }
    }

    pub fn with_randomness(
        stealth_pub_x: FieldElement,
        token_id: TokenId,
        amount: u128,
        randomness: FieldElement,
    ) -> Self {
        Self {
            stealth_pub_x,
            token_id,
            amount,
            randomness,
        }
    }

    pub fn to_plaintext(&self) -> [u8; NOTE_PLAINTEXT_LEN] {
        let mut out = [0u8; NOTE_PLAINTEXT_LEN];
        out[..32].copy_from_slice(&fe_to_bytes(&self.stealth_pub_x));
        out[32..64].copy_from_slice(&fe_to_bytes(&self.token_id));
        out[64..80].copy_from_slice(&self.amount.to_be_bytes());
        out[80..].copy_from_slice(&fe_to_bytes(&self.randomness));
        out
    }

    pub fn from_plaintext(bytes: &[u8]) -> Result<Self, FieldError> {
        if bytes.len() != NOTE_PLAINTEXT_LEN {
            return Err(FieldError::Length(bytes.len()));
        }
        let mut amount = [0u8; 16];
        amount.copy_from_slice(&bytes[64..80]);
        Ok(Self {
            stealth_pub_x: fe_from_bytes(&bytes[..32])?,
            token_id: fe_from_bytes(&bytes[32..64])?,
            amount: u128::from_be_bytes(amount),
            randomness: fe_from_bytes(&bytes[80..])?,
        })
    }
}

/// Ledger form of a note: ECDH ephemeral key plus AEAD ciphertext and tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptedNote {
    pub ephemeral_pubkey: Point,
    pub ciphertext: Vec<u8>,
    pub tag: [u8; 16],
}

/// A note recovered by scanning, with everything needed to spend it later.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecryptedNote {
    pub note: Note,
    pub commitment: FieldElement,
    pub leaf_index: u64,
    pub pool_id: PoolId,
    pub account_hash: Option<FieldElement>,
    pub stealth_ephemeral_pubkey: Option<Point>,
}

impl DecryptedNote {
    pub fn amount(&self) -> u128 {
        self.note.amount
    }

    pub fn token_id(&self) -> TokenId {
        self.note.token_id
    }
}
