#![cfg_attr(not(any(feature = "std", test)), no_std)]

extern crate alloc;

pub mod domain;
pub mod field;
pub mod keys;
pub mod merkle;
pub mod note;
pub mod nullifier;
pub mod point;

pub use field::{FieldElement, FieldError, Scalar};
pub use keys::{NullifierKey, SpendingKey, ViewingKey};
pub use merkle::{MerkleProof, MerkleRoot, MERKLE_DEPTH};
pub use note::{DecryptedNote, EncryptedNote, Note, PoolId, TokenId, NOTE_PLAINTEXT_LEN};
pub use nullifier::Nullifier;
pub use point::{Point, StealthAddress};
