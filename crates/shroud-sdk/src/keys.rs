// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! Key hierarchy.
//!
//! ```text
//! spending_key (sk)        uniform in [1, r_J)
//!   ├─ public_key          sk * G
//!   ├─ nullifier_key       H(NULLIFIER_KEY, sk)
//!   └─ incoming_viewing    H(INCOMING_VIEWING_KEY, sk) mod r_J
//!        └─ viewing_pubkey ivk * G
//! ```
//!
//! Every derivation is one-way; nothing below `sk` can be used to recover it.

use ark_ff::Zero;
use rand::{CryptoRng, Rng};
use shroud_primitives::{check_public_key, derive_nullifier_key, derive_public_key, hash};
use shroud_types::field::{fe_to_scalar, scalar_from_bytes, scalar_to_bytes, scalar_to_fe};
use shroud_types::{domain, NullifierKey, Point, Scalar, SpendingKey, ViewingKey};

use crate::error::{SdkError, SdkResult};

/// What a sender needs to pay this wallet: stealth addresses are derived from
/// `spend_pubkey`, note ciphertexts are encrypted to `viewing_pubkey`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShieldedAddress {
    pub spend_pubkey: Point,
    pub viewing_pubkey: Point,
}

#[derive(Clone, Debug)]
pub struct Keypair {
    spending_key: Option<SpendingKey>,
    viewing_key: ViewingKey,
    public_key: Point,
    viewing_public_key: Point,
}

pub fn derive_incoming_viewing_key(sk: &SpendingKey) -> Scalar {
    fe_to_scalar(&hash(domain::INCOMING_VIEWING_KEY, &[scalar_to_fe(&sk.0)]))
}

pub fn derive_viewing_key(sk: &SpendingKey) -> ViewingKey {
    ViewingKey {
        nullifier_key: derive_nullifier_key(sk),
        incoming_viewing_key: derive_incoming_viewing_key(sk),
    }
}

impl Keypair {
    pub fn random<R: Rng + CryptoRng + ?Sized>(rng: &mut R) -> Self {
        Self::from_spending_key(SpendingKey::random(rng))
    }

    pub fn from_spending_key(sk: SpendingKey) -> Self {
        let viewing_key = derive_viewing_key(&sk);
        let viewing_public_key = derive_public_key(&viewing_key.incoming_viewing_key);
        Self {
            public_key: derive_public_key(&sk.0),
            spending_key: Some(sk),
            viewing_key,
            viewing_public_key,
        }
    }

    /// Load a 32-byte big-endian spending key. Zero and values `>= r_J` are rejected.
    pub fn from_bytes(bytes: &[u8]) -> SdkResult<Self> {
        let s = scalar_from_bytes(bytes)
            .map_err(|e| SdkError::InvalidKey(format!("spending key: {e}")))?;
        if s.is_zero() {
            return Err(SdkError::InvalidKey("spending key is zero".to_string()));
        }
        Ok(Self::from_spending_key(SpendingKey(s)))
    }

    /// A keypair that can scan and compute nullifiers but never spend.
    pub fn watch_only(viewing_key: ViewingKey, public_key: Point) -> SdkResult<Self> {
        check_public_key(&public_key)?;
        if viewing_key.incoming_viewing_key.is_zero() {
            return Err(SdkError::InvalidKey("incoming viewing key is zero".to_string()));
        }
        let viewing_public_key = derive_public_key(&viewing_key.incoming_viewing_key);
        Ok(Self {
            spending_key: None,
            viewing_key,
            public_key,
            viewing_public_key,
        })
    }

    pub fn to_bytes(&self) -> Option<[u8; 32]> {
        self.spending_key.as_ref().map(|sk| scalar_to_bytes(&sk.0))
    }

    pub fn can_spend(&self) -> bool {
        self.spending_key.is_some()
    }

    pub fn spending_key(&self) -> SdkResult<&SpendingKey> {
        self.spending_key.as_ref().ok_or(SdkError::WatchOnly)
    }

    pub fn viewing_key(&self) -> &ViewingKey {
        &self.viewing_key
    }

    pub fn nullifier_key(&self) -> &NullifierKey {
        &self.viewing_key.nullifier_key
    }

    pub fn public_key(&self) -> Point {
        self.public_key
    }

    pub fn viewing_public_key(&self) -> Point {
        self.viewing_public_key
    }

    pub fn address(&self) -> ShieldedAddress {
        ShieldedAddress {
            spend_pubkey: self.public_key,
            viewing_pubkey: self.viewing_public_key,
        }
    }
}
