// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! Note lifecycle: scanning, balance, coin selection and spend bookkeeping.
//!
//! A [`NoteManager`] is the per-session view of one wallet. [`NoteManager::sync`]
//! reads `(last_synced_slot, latest_slot]` from the ledger, stages everything it
//! finds, and only then folds the staged results into its state in a single
//! synchronous step. An error or a dropped future before that step leaves the
//! manager exactly as it was.
//!
//! A note is unspent until its spending nullifier is observed on the ledger
//! (or marked spent locally). Nullifiers are kept even when their note has not
//! been scanned yet, so ordering between the two never matters.

use std::collections::{HashMap, HashSet};

use ark_bls12_381::Fr;
use shroud_primitives::{compute_commitment, derive_public_key, derive_spending_nullifier};
use shroud_types::{DecryptedNote, Nullifier, PoolId, Scalar, TokenId};
use zeroize::Zeroizing;

use crate::encryption::try_decrypt_note;
use crate::error::{SdkError, SdkResult};
use crate::keys::Keypair;
use crate::ledger::{LedgerClient, NoteRecord};
use crate::stealth::derive_stealth_private_key;
use crate::wallet::{fr_to_hex, hex_to_fr, NoteEntry, NoteSnapshot};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackedNote {
    pub note: DecryptedNote,
    pub nullifier: Nullifier,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    pub notes: Vec<DecryptedNote>,
    pub total_amount: u128,
}

impl Selection {
    pub fn nullifiers(&self, manager: &NoteManager) -> Vec<Nullifier> {
        self.notes
            .iter()
            .filter_map(|n| manager.nullifier_of(&n.commitment))
            .collect()
    }
}

pub struct NoteManager {
    keypair: Keypair,
    pools: Vec<PoolId>,
    notes: HashMap<Fr, TrackedNote>,
    spent: HashSet<Nullifier>,
    reserved: HashSet<Nullifier>,
    last_synced_slot: u64,
}

impl NoteManager {
    pub fn new(keypair: Keypair, pools: Vec<PoolId>) -> Self {
        Self {
            keypair,
            pools,
            notes: HashMap::new(),
            spent: HashSet::new(),
            reserved: HashSet::new(),
            last_synced_slot: 0,
        }
    }

    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }

    pub fn pools(&self) -> &[PoolId] {
        &self.pools
    }

    pub fn last_synced_slot(&self) -> u64 {
        self.last_synced_slot
    }

    pub fn tracked(&self, commitment: &Fr) -> Option<&TrackedNote> {
        self.notes.get(commitment)
    }

    pub fn nullifier_of(&self, commitment: &Fr) -> Option<Nullifier> {
        self.notes.get(commitment).map(|t| t.nullifier)
    }

    pub fn is_spent(&self, nullifier: &Nullifier) -> bool {
        self.spent.contains(nullifier)
    }

    /// Scan the ledger from the current watermark to its latest slot. Returns
    /// the notes discovered by this call.
    pub async fn sync<L: LedgerClient>(&mut self, ledger: &L) -> SdkResult<Vec<DecryptedNote>> {
        let latest = ledger.latest_slot().await?;
        let from = self.last_synced_slot;
        if latest <= from {
            tracing::debug!(from, latest, "sync: nothing new");
            return Ok(Vec::new());
        }

        let (records, nullifiers) = tokio::try_join!(
            ledger.fetch_notes(&self.pools, from, latest),
            ledger.fetch_nullifiers(&self.pools, from, latest),
        )?;

        let decryption_keys = self.decryption_keys();
        let mut staged: Vec<DecryptedNote> = Vec::new();
        for record in &records {
            if self.notes.contains_key(&record.commitment)
                || staged.iter().any(|n| n.commitment == record.commitment)
            {
                continue;
            }
            if let Some(found) = self.scan_record(record, &decryption_keys) {
                staged.push(found);
            }
        }

        // commit
        for nf in &nullifiers {
            self.reserved.remove(&nf.nullifier);
            self.spent.insert(nf.nullifier);
        }
        for found in &staged {
            let nullifier = self.spending_nullifier(found);
            self.notes.insert(
                found.commitment,
                TrackedNote {
                    note: found.clone(),
                    nullifier,
                },
            );
        }
        self.last_synced_slot = self.last_synced_slot.max(latest);

        tracing::info!(
            from,
            to = latest,
            records = records.len(),
            found = staged.len(),
            nullifiers = nullifiers.len(),
            "sync complete"
        );
        Ok(staged)
    }

    fn decryption_keys(&self) -> Zeroizing<Vec<Scalar>> {
        let mut keys = Zeroizing::new(vec![self.keypair.viewing_key().incoming_viewing_key]);
        if let Ok(sk) = self.keypair.spending_key() {
            keys.push(sk.0);
        }
        keys
    }

    fn scan_record(&self, record: &NoteRecord, base_keys: &[Scalar]) -> Option<DecryptedNote> {
        let stealth_key = match (&record.stealth_ephemeral_pubkey, self.keypair.spending_key()) {
            (Some(eph), Ok(sk)) => match derive_stealth_private_key(sk, eph) {
                Ok(k) => Some(k),
                Err(e) => {
                    tracing::debug!(leaf = record.leaf_index, "skipping stealth key: {e}");
                    None
                }
            },
            _ => None,
        };

        let note = base_keys
            .iter()
            .chain(stealth_key.as_deref())
            .find_map(|k| try_decrypt_note(&record.encrypted, k))?;

        if compute_commitment(&note) != record.commitment {
            tracing::warn!(
                pool_id = record.pool_id,
                leaf = record.leaf_index,
                "decrypted note does not match its commitment, ignoring"
            );
            return None;
        }

        let owner_x = match stealth_key {
            Some(k) => derive_public_key(&k).x,
            None if record.stealth_ephemeral_pubkey.is_some() && !self.keypair.can_spend() => {
                // watch-only: the stealth key cannot be derived, trust the commitment
                note.stealth_pub_x
            }
            None => self.keypair.public_key().x,
        };
        if owner_x != note.stealth_pub_x {
            tracing::warn!(
                pool_id = record.pool_id,
                leaf = record.leaf_index,
                "note is not bound to a key this wallet controls, ignoring"
            );
            return None;
        }

        Some(DecryptedNote {
            note,
            commitment: record.commitment,
            leaf_index: record.leaf_index,
            pool_id: record.pool_id,
            account_hash: record.account_hash,
            stealth_ephemeral_pubkey: record.stealth_ephemeral_pubkey,
        })
    }

    fn spending_nullifier(&self, note: &DecryptedNote) -> Nullifier {
        derive_spending_nullifier(self.keypair.nullifier_key(), &note.commitment, note.leaf_index)
    }

    /// Unspent notes of `token_id`, ordered by pool then leaf index.
    pub fn unspent_notes(&self, token_id: &TokenId) -> Vec<DecryptedNote> {
        let mut out: Vec<DecryptedNote> = self
            .notes
            .values()
            .filter(|t| t.note.token_id() == *token_id && !self.spent.contains(&t.nullifier))
            .map(|t| t.note.clone())
            .collect();
        out.sort_by_key(|n| (n.pool_id, n.leaf_index));
        out
    }

    pub fn balance(&self, token_id: &TokenId) -> u128 {
        self.unspent_notes(token_id)
            .iter()
            .fold(0u128, |acc, n| acc.saturating_add(n.amount()))
    }

    /// Largest-first greedy selection, skipping reserved notes.
    pub fn select_notes_for_amount(&self, token_id: &TokenId, target: u128) -> SdkResult<Selection> {
        let mut candidates: Vec<DecryptedNote> = self
            .unspent_notes(token_id)
            .into_iter()
            .filter(|n| {
                self.nullifier_of(&n.commitment)
                    .is_some_and(|nf| !self.reserved.contains(&nf))
            })
            .collect();
        candidates.sort_by(|a, b| {
            b.amount()
                .cmp(&a.amount())
                .then(a.leaf_index.cmp(&b.leaf_index))
        });

        let mut selection = Selection {
            notes: Vec::new(),
            total_amount: 0,
        };
        for note in candidates.iter() {
            if selection.total_amount >= target {
                break;
            }
            selection.total_amount = selection.total_amount.saturating_add(note.amount());
            selection.notes.push(note.clone());
        }

        if selection.total_amount < target {
            let available = candidates
                .iter()
                .fold(0u128, |acc, n| acc.saturating_add(n.amount()));
            tracing::debug!(target, available, "selection failed");
            return Err(SdkError::InsufficientFunds {
                needed: target,
                available,
            });
        }
        tracing::debug!(
            target,
            selected = selection.notes.len(),
            total = selection.total_amount,
            "selected notes"
        );
        Ok(selection)
    }

    pub fn mark_spent(&mut self, nullifiers: &[Nullifier]) {
        for nf in nullifiers {
            self.reserved.remove(nf);
            self.spent.insert(*nf);
        }
    }

    /// Claim `nullifiers` for an in-flight spend. All-or-nothing: fails with
    /// [`SdkError::AlreadyAttempted`] if any is reserved or already spent.
    pub fn reserve(&mut self, nullifiers: &[Nullifier]) -> SdkResult<()> {
        let mut seen = HashSet::new();
        for nf in nullifiers {
            if self.reserved.contains(nf) || self.spent.contains(nf) || !seen.insert(*nf) {
                return Err(SdkError::AlreadyAttempted(fr_to_hex(nf.as_fe())));
            }
        }
        self.reserved.extend(seen);
        Ok(())
    }

    pub fn release(&mut self, nullifiers: &[Nullifier]) {
        for nf in nullifiers {
            self.reserved.remove(nf);
        }
    }

    pub fn is_reserved(&self, nullifier: &Nullifier) -> bool {
        self.reserved.contains(nullifier)
    }

    /// Spent locally, or published on the ledger.
    pub async fn check_nullifier_spent<L: LedgerClient>(
        &self,
        ledger: &L,
        nullifier: &Nullifier,
    ) -> SdkResult<bool> {
        if self.spent.contains(nullifier) {
            return Ok(true);
        }
        ledger.is_nullifier_spent(nullifier).await
    }

    /// Reservations are session state and are not persisted.
    pub fn snapshot(&self) -> NoteSnapshot {
        let mut notes: Vec<&TrackedNote> = self.notes.values().collect();
        notes.sort_by_key(|t| (t.note.pool_id, t.note.leaf_index));
        let mut spent: Vec<&Nullifier> = self.spent.iter().collect();
        spent.sort();
        NoteSnapshot {
            notes: notes.iter().map(|t| NoteEntry::from(&t.note)).collect(),
            spent_nullifiers: spent.iter().map(|nf| fr_to_hex(nf.as_fe())).collect(),
            last_synced_slot: self.last_synced_slot,
        }
    }

    pub fn restore(keypair: Keypair, pools: Vec<PoolId>, snapshot: &NoteSnapshot) -> SdkResult<Self> {
        let mut manager = Self::new(keypair, pools);
        for entry in &snapshot.notes {
            let note = entry.to_decrypted()?;
            if compute_commitment(&note.note) != note.commitment {
                return Err(SdkError::CommitmentMismatch {
                    leaf_index: note.leaf_index,
                });
            }
            let nullifier = manager.spending_nullifier(&note);
            manager
                .notes
                .insert(note.commitment, TrackedNote { note, nullifier });
        }
        for hex in &snapshot.spent_nullifiers {
            manager.spent.insert(Nullifier(hex_to_fr(hex)?));
        }
        manager.last_synced_slot = snapshot.last_synced_slot;
        Ok(manager)
    }
}
