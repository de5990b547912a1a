// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! Wallet persistence and field-element ↔ hex conversion.
//!
//! Stores the spending key and the note-manager snapshot as JSON at
//! `~/.shroud/wallet.json`.
//!
//! # Hex format
//!
//! [`fr_to_hex`] produces `0x`-prefixed big-endian hex (66 chars).
//! [`hex_to_fr`] accepts both `0x`-prefixed and raw hex, zero-pads short
//! inputs to 32 bytes and rejects values at or above the field modulus.
//!
//! # Example
//!
//! ```rust,no_run
//! use shroud_sdk::wallet::{load_wallet, save_wallet};
//!
//! # fn example() -> anyhow::Result<()> {
//! let mut w = load_wallet()?;
//! w.snapshot.last_synced_slot = 0; // force a full rescan
//! save_wallet(&w)?;
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use ark_bls12_381::Fr;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use shroud_types::field::{fe_from_bytes, fe_to_bytes, scalar_from_bytes, scalar_to_bytes};
use shroud_types::{DecryptedNote, Note, Point, Scalar};

/// Operating-system CSPRNG. Every key, blinding factor and ephemeral scalar
/// in non-test code is drawn from here.
pub fn crypto_rng() -> OsRng {
    OsRng
}

pub fn fr_to_hex(fr: &Fr) -> String {
    format!("0x{}", fr_to_raw_hex(fr))
}

/// Big-endian hex without the `0x` prefix.
pub fn fr_to_raw_hex(fr: &Fr) -> String {
    hex::encode(fe_to_bytes(fr))
}

pub fn strip_0x(s: &str) -> &str {
    s.strip_prefix("0x").unwrap_or(s)
}

pub fn hex_to_fr(s: &str) -> Result<Fr> {
    let bytes = hex::decode(strip_0x(s)).context("invalid hex")?;
    if bytes.len() > 32 {
        bail!("field element hex is {} bytes, max 32", bytes.len());
    }
    let mut padded = [0u8; 32];
    padded[32 - bytes.len()..].copy_from_slice(&bytes);
    fe_from_bytes(&padded).context("value not in field")
}

pub fn scalar_to_hex(s: &Scalar) -> String {
    format!("0x{}", hex::encode(scalar_to_bytes(s)))
}

pub fn hex_to_scalar(s: &str) -> Result<Scalar> {
    let bytes = hex::decode(strip_0x(s)).context("invalid hex")?;
    scalar_from_bytes(&bytes).context("value not a canonical scalar")
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PointEntry {
    pub x: String,
    pub y: String,
}

impl From<&Point> for PointEntry {
    fn from(p: &Point) -> Self {
        Self {
            x: fr_to_hex(&p.x),
            y: fr_to_hex(&p.y),
        }
    }
}

impl PointEntry {
    /// Parses coordinates only. Curve and subgroup checks happen where the
    /// point is used.
    pub fn to_point(&self) -> Result<Point> {
        Ok(Point::new(hex_to_fr(&self.x)?, hex_to_fr(&self.y)?))
    }
}

/// JSON form of a [`DecryptedNote`]. Amounts are decimal strings so `u128`
/// survives JSON tooling that parses numbers as doubles.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NoteEntry {
    pub stealth_pub_x: String,
    pub token_id: String,
    pub amount: String,
    pub randomness: String,
    pub commitment: String,
    pub leaf_index: u64,
    pub pool_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stealth_ephemeral_pubkey: Option<PointEntry>,
}

impl From<&DecryptedNote> for NoteEntry {
    fn from(n: &DecryptedNote) -> Self {
        Self {
            stealth_pub_x: fr_to_hex(&n.note.stealth_pub_x),
            token_id: fr_to_hex(&n.note.token_id),
            amount: n.note.amount.to_string(),
            randomness: fr_to_hex(&n.note.randomness),
            commitment: fr_to_hex(&n.commitment),
            leaf_index: n.leaf_index,
            pool_id: n.pool_id,
            account_hash: n.account_hash.as_ref().map(fr_to_hex),
            stealth_ephemeral_pubkey: n.stealth_ephemeral_pubkey.as_ref().map(PointEntry::from),
        }
    }
}

impl NoteEntry {
    pub fn to_decrypted(&self) -> Result<DecryptedNote> {
        let amount: u128 = self
            .amount
            .parse()
            .with_context(|| format!("invalid note amount {:?}", self.amount))?;
        Ok(DecryptedNote {
            note: Note::with_randomness(
                hex_to_fr(&self.stealth_pub_x)?,
                hex_to_fr(&self.token_id)?,
                amount,
                hex_to_fr(&self.randomness)?,
            ),
            commitment: hex_to_fr(&self.commitment)?,
            leaf_index: self.leaf_index,
            pool_id: self.pool_id,
            account_hash: self.account_hash.as_deref().map(hex_to_fr).transpose()?,
            stealth_ephemeral_pubkey: self
                .stealth_ephemeral_pubkey
                .as_ref()
                .map(PointEntry::to_point)
                .transpose()?,
        })
    }
}

/// Persisted note-manager state.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct NoteSnapshot {
    pub notes: Vec<NoteEntry>,
    pub spent_nullifiers: Vec<String>,
    pub last_synced_slot: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct WalletData {
    pub spending_key: String,
    #[serde(default)]
    pub snapshot: NoteSnapshot,
}

pub fn wallet_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("cannot determine home directory")?;
    Ok(home.join(".shroud").join("wallet.json"))
}

pub fn load_wallet() -> Result<WalletData> {
    load_wallet_from(&wallet_path()?)
}

pub fn save_wallet(wallet: &WalletData) -> Result<()> {
    save_wallet_to(&wallet_path()?, wallet)
}

pub fn load_wallet_from(path: &Path) -> Result<WalletData> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("cannot read wallet at {}", path.display()))?;
    serde_json::from_str(&data).context("invalid wallet JSON")
}

pub fn save_wallet_to(path: &Path, wallet: &WalletData) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(wallet)?;
    fs::write(path, json).with_context(|| format!("cannot write wallet at {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::{BigInteger, PrimeField, UniformRand};
    use ark_std::rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn fr_hex_roundtrip() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..10 {
            let original = Fr::rand(&mut rng);
            let recovered = hex_to_fr(&fr_to_hex(&original)).unwrap();
            assert_eq!(original, recovered);
        }
    }

    #[test]
    fn hex_to_fr_no_prefix() {
        let val = Fr::from(12345u64);
        let with = fr_to_hex(&val);
        assert_eq!(hex_to_fr(&with).unwrap(), hex_to_fr(strip_0x(&with)).unwrap());
    }

    #[test]
    fn hex_to_fr_short_input() {
        assert_eq!(hex_to_fr("01").unwrap(), Fr::from(1u64));
        assert_eq!(hex_to_fr("0x").unwrap(), Fr::from(0u64));
    }

    #[test]
    fn hex_to_fr_rejects_modulus() {
        let modulus = hex::encode(Fr::MODULUS.to_bytes_be());
        assert!(hex_to_fr(&modulus).is_err());
    }

    #[test]
    fn hex_to_fr_rejects_garbage() {
        assert!(hex_to_fr("zz").is_err());
        assert!(hex_to_fr(&"00".repeat(33)).is_err());
    }

    #[test]
    fn fr_to_hex_has_0x_prefix() {
        let hex = fr_to_hex(&Fr::from(42u64));
        assert!(hex.starts_with("0x"));
        assert_eq!(hex.len(), 66);
    }

    #[test]
    fn note_entry_roundtrip() {
        let mut rng = StdRng::seed_from_u64(1);
        let note = Note::new(Fr::rand(&mut rng), Fr::from(2u64), u128::MAX, &mut rng);
        let dn = DecryptedNote {
            note,
            commitment: Fr::rand(&mut rng),
            leaf_index: 17,
            pool_id: 3,
            account_hash: Some(Fr::from(5u64)),
            stealth_ephemeral_pubkey: Some(Point::new(Fr::from(6u64), Fr::from(7u64))),
        };
        let entry = NoteEntry::from(&dn);
        assert_eq!(entry.amount, u128::MAX.to_string());
        let json = serde_json::to_string(&entry).unwrap();
        let back: NoteEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_decrypted().unwrap(), dn);
    }

    #[test]
    fn wallet_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("wallet.json");
        let wallet = WalletData {
            spending_key: scalar_to_hex(&Scalar::from(9u64)),
            snapshot: NoteSnapshot {
                last_synced_slot: 4,
                ..Default::default()
            },
        };
        save_wallet_to(&path, &wallet).unwrap();
        let loaded = load_wallet_from(&path).unwrap();
        assert_eq!(hex_to_scalar(&loaded.spending_key).unwrap(), Scalar::from(9u64));
        assert_eq!(loaded.snapshot.last_synced_slot, 4);
    }

    #[test]
    fn load_missing_wallet_has_context() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_wallet_from(&dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("cannot read wallet"));
    }
}
