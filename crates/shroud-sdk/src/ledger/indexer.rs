// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! HTTP indexer client.
//!
//! | Endpoint | Response |
//! |---|---|
//! | `GET /v1/slot` | `{"slot": u64}` |
//! | `GET /v1/notes?pools=1,2&after=a&to=b` | `{"notes": [NoteRecordJson]}` |
//! | `GET /v1/nullifiers?pools=1,2&after=a&to=b` | `{"nullifiers": [NullifierRecordJson]}` |
//! | `GET /v1/nullifier/{nf}` | `{"spent": bool}` |
//! | `GET /v1/root/{pool}` | `{"root": hex}` |
//! | `GET /v1/leaf/{pool}/{commitment}` | `{"index": u64}` |
//! | `GET /v1/proof/{pool}/{index}` | `{"root": hex, "siblings": [hex], "indices": [bool]}` |
//!
//! Field elements are `0x`-prefixed big-endian hex; ciphertexts and tags are
//! plain hex.

use anyhow::{Context, Result};
use ark_bls12_381::Fr;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shroud_types::{EncryptedNote, MerkleProof, Nullifier, PoolId};

use super::{LedgerClient, NoteRecord, NullifierRecord};
use crate::error::{SdkError, SdkResult};
use crate::wallet::{fr_to_hex, fr_to_raw_hex, hex_to_fr, PointEntry};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NoteRecordJson {
    pub pool_id: u64,
    pub slot: u64,
    pub leaf_index: u64,
    pub commitment: String,
    pub ephemeral_pubkey: PointEntry,
    pub ciphertext: String,
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stealth_ephemeral_pubkey: Option<PointEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_hash: Option<String>,
}

impl From<&NoteRecord> for NoteRecordJson {
    fn from(r: &NoteRecord) -> Self {
        Self {
            pool_id: r.pool_id,
            slot: r.slot,
            leaf_index: r.leaf_index,
            commitment: fr_to_hex(&r.commitment),
            ephemeral_pubkey: PointEntry::from(&r.encrypted.ephemeral_pubkey),
            ciphertext: hex::encode(&r.encrypted.ciphertext),
            tag: hex::encode(r.encrypted.tag),
            stealth_ephemeral_pubkey: r.stealth_ephemeral_pubkey.as_ref().map(PointEntry::from),
            account_hash: r.account_hash.as_ref().map(fr_to_hex),
        }
    }
}

impl TryFrom<NoteRecordJson> for NoteRecord {
    type Error = anyhow::Error;

    fn try_from(j: NoteRecordJson) -> Result<Self> {
        let tag: [u8; 16] = hex::decode(&j.tag)
            .context("invalid tag hex")?
            .try_into()
            .map_err(|v: Vec<u8>| anyhow::anyhow!("tag is {} bytes, expected 16", v.len()))?;
        Ok(Self {
            pool_id: j.pool_id,
            slot: j.slot,
            leaf_index: j.leaf_index,
            commitment: hex_to_fr(&j.commitment)?,
            encrypted: EncryptedNote {
                ephemeral_pubkey: j.ephemeral_pubkey.to_point()?,
                ciphertext: hex::decode(&j.ciphertext).context("invalid ciphertext hex")?,
                tag,
            },
            stealth_ephemeral_pubkey: j
                .stealth_ephemeral_pubkey
                .as_ref()
                .map(PointEntry::to_point)
                .transpose()?,
            account_hash: j.account_hash.as_deref().map(hex_to_fr).transpose()?,
        })
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NullifierRecordJson {
    pub pool_id: u64,
    pub slot: u64,
    pub nullifier: String,
}

impl From<&NullifierRecord> for NullifierRecordJson {
    fn from(r: &NullifierRecord) -> Self {
        Self {
            pool_id: r.pool_id,
            slot: r.slot,
            nullifier: fr_to_hex(r.nullifier.as_fe()),
        }
    }
}

impl TryFrom<NullifierRecordJson> for NullifierRecord {
    type Error = anyhow::Error;

    fn try_from(j: NullifierRecordJson) -> Result<Self> {
        Ok(Self {
            pool_id: j.pool_id,
            slot: j.slot,
            nullifier: Nullifier(hex_to_fr(&j.nullifier)?),
        })
    }
}

#[derive(Serialize, Deserialize)]
pub struct SlotResponse {
    pub slot: u64,
}

#[derive(Serialize, Deserialize)]
pub struct NotesResponse {
    pub notes: Vec<NoteRecordJson>,
}

#[derive(Serialize, Deserialize)]
pub struct NullifiersResponse {
    pub nullifiers: Vec<NullifierRecordJson>,
}

#[derive(Serialize, Deserialize)]
pub struct SpentResponse {
    pub spent: bool,
}

#[derive(Serialize, Deserialize)]
pub struct RootResponse {
    pub root: String,
}

#[derive(Serialize, Deserialize)]
pub struct LeafResponse {
    pub index: u64,
}

#[derive(Serialize, Deserialize)]
pub struct ProofResponse {
    pub root: String,
    pub siblings: Vec<String>,
    pub indices: Vec<bool>,
}

#[derive(Clone)]
pub struct IndexerClient {
    base_url: String,
    http: reqwest::Client,
}

fn indexer_err(e: impl std::fmt::Display) -> SdkError {
    SdkError::Indexer(e.to_string())
}

fn pool_list(pools: &[PoolId]) -> String {
    pools
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

impl IndexerClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> SdkResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.http.get(&url).send().await.map_err(indexer_err)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SdkError::Indexer(format!("GET {path}: {status} {body}")));
        }
        resp.json()
            .await
            .map_err(|e| SdkError::Indexer(format!("parse {path}: {e}")))
    }

    async fn fetch_leaf_index(&self, pool_id: PoolId, commitment: &Fr) -> SdkResult<u64> {
        let leaf: LeafResponse = self
            .get_json(&format!("/v1/leaf/{pool_id}/{}", fr_to_raw_hex(commitment)))
            .await?;
        Ok(leaf.index)
    }
}

impl LedgerClient for IndexerClient {
    async fn latest_slot(&self) -> SdkResult<u64> {
        let resp: SlotResponse = self.get_json("/v1/slot").await?;
        Ok(resp.slot)
    }

    async fn fetch_notes(
        &self,
        pools: &[PoolId],
        after_slot: u64,
        to_slot: u64,
    ) -> SdkResult<Vec<NoteRecord>> {
        let resp: NotesResponse = self
            .get_json(&format!(
                "/v1/notes?pools={}&after={after_slot}&to={to_slot}",
                pool_list(pools)
            ))
            .await?;
        resp.notes
            .into_iter()
            .map(|j| NoteRecord::try_from(j).map_err(indexer_err))
            .collect()
    }

    async fn fetch_nullifiers(
        &self,
        pools: &[PoolId],
        after_slot: u64,
        to_slot: u64,
    ) -> SdkResult<Vec<NullifierRecord>> {
        let resp: NullifiersResponse = self
            .get_json(&format!(
                "/v1/nullifiers?pools={}&after={after_slot}&to={to_slot}",
                pool_list(pools)
            ))
            .await?;
        resp.nullifiers
            .into_iter()
            .map(|j| NullifierRecord::try_from(j).map_err(indexer_err))
            .collect()
    }

    async fn is_nullifier_spent(&self, nullifier: &Nullifier) -> SdkResult<bool> {
        let resp: SpentResponse = self
            .get_json(&format!("/v1/nullifier/{}", fr_to_raw_hex(nullifier.as_fe())))
            .await?;
        Ok(resp.spent)
    }

    async fn merkle_root(&self, pool_id: PoolId) -> SdkResult<Fr> {
        let resp: RootResponse = self.get_json(&format!("/v1/root/{pool_id}")).await?;
        hex_to_fr(&resp.root).map_err(indexer_err)
    }

    async fn merkle_proof(&self, pool_id: PoolId, commitment: &Fr) -> SdkResult<MerkleProof> {
        let leaf_index = self.fetch_leaf_index(pool_id, commitment).await?;
        let resp: ProofResponse = self
            .get_json(&format!("/v1/proof/{pool_id}/{leaf_index}"))
            .await?;
        let siblings = resp
            .siblings
            .iter()
            .map(|s| hex_to_fr(s))
            .collect::<Result<Vec<_>>>()
            .map_err(indexer_err)?;
        Ok(MerkleProof {
            root: hex_to_fr(&resp.root).map_err(indexer_err)?,
            siblings,
            indices: resp.indices,
            leaf_index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shroud_types::Point;

    #[test]
    fn note_record_json_roundtrip() {
        let record = NoteRecord {
            pool_id: 2,
            slot: 9,
            leaf_index: 4,
            commitment: Fr::from(77u64),
            encrypted: EncryptedNote {
                ephemeral_pubkey: Point::new(Fr::from(1u64), Fr::from(2u64)),
                ciphertext: vec![0xab; 112],
                tag: [7u8; 16],
            },
            stealth_ephemeral_pubkey: Some(Point::new(Fr::from(3u64), Fr::from(4u64))),
            account_hash: None,
        };
        let json = serde_json::to_string(&NoteRecordJson::from(&record)).unwrap();
        assert!(!json.contains("account_hash"));
        let back: NoteRecordJson = serde_json::from_str(&json).unwrap();
        assert_eq!(NoteRecord::try_from(back).unwrap(), record);
    }

    #[test]
    fn bad_tag_length_rejected() {
        let json = NoteRecordJson {
            pool_id: 1,
            slot: 1,
            leaf_index: 0,
            commitment: fr_to_hex(&Fr::from(1u64)),
            ephemeral_pubkey: PointEntry::from(&Point::identity()),
            ciphertext: String::new(),
            tag: "00".repeat(15),
            stealth_ephemeral_pubkey: None,
            account_hash: None,
        };
        assert!(NoteRecord::try_from(json).is_err());
    }

    #[test]
    fn pool_list_format() {
        assert_eq!(pool_list(&[1, 22, 3]), "1,22,3");
        assert_eq!(pool_list(&[]), "");
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        assert_eq!(IndexerClient::new("http://x:1/").base_url(), "http://x:1");
    }
}
