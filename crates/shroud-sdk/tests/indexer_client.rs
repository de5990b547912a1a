// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! `IndexerClient` against a small axum indexer serving a `MemoryLedger`.

use std::sync::Arc;

use ark_bls12_381::Fr;
use ark_std::rand::{rngs::StdRng, SeedableRng};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use shroud_sdk::keys::Keypair;
use shroud_sdk::ledger::indexer::{
    LeafResponse, NoteRecordJson, NotesResponse, NullifierRecordJson, NullifiersResponse,
    ProofResponse, RootResponse, SlotResponse, SpentResponse,
};
use shroud_sdk::ledger::{IndexerClient, LedgerClient, MemoryLedger};
use shroud_sdk::merkle::verify_proof;
use shroud_sdk::notes::NoteManager;
use shroud_sdk::shield::shield;
use shroud_sdk::wallet::{fr_to_hex, hex_to_fr};
use shroud_sdk::{Nullifier, PoolId, SdkError};

type Shared = Arc<MemoryLedger>;
type ApiError = (StatusCode, String);

#[derive(Deserialize)]
struct RangeQuery {
    pools: String,
    after: u64,
    to: u64,
}

impl RangeQuery {
    fn pools(&self) -> Vec<PoolId> {
        self.pools
            .split(',')
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse().ok())
            .collect()
    }
}

fn bad_request(e: impl std::fmt::Display) -> ApiError {
    (StatusCode::BAD_REQUEST, e.to_string())
}

fn not_found(e: impl std::fmt::Display) -> ApiError {
    (StatusCode::NOT_FOUND, e.to_string())
}

async fn slot(State(ledger): State<Shared>) -> Json<SlotResponse> {
    Json(SlotResponse {
        slot: ledger.latest_slot().await.unwrap(),
    })
}

async fn notes(State(ledger): State<Shared>, Query(q): Query<RangeQuery>) -> Json<NotesResponse> {
    let records = ledger.fetch_notes(&q.pools(), q.after, q.to).await.unwrap();
    Json(NotesResponse {
        notes: records.iter().map(NoteRecordJson::from).collect(),
    })
}

async fn nullifiers(
    State(ledger): State<Shared>,
    Query(q): Query<RangeQuery>,
) -> Json<NullifiersResponse> {
    let records = ledger.fetch_nullifiers(&q.pools(), q.after, q.to).await.unwrap();
    Json(NullifiersResponse {
        nullifiers: records.iter().map(NullifierRecordJson::from).collect(),
    })
}

async fn spent(
    State(ledger): State<Shared>,
    Path(nf): Path<String>,
) -> Result<Json<SpentResponse>, ApiError> {
    let nf = Nullifier(hex_to_fr(&nf).map_err(bad_request)?);
    Ok(Json(SpentResponse {
        spent: ledger.is_nullifier_spent(&nf).await.unwrap(),
    }))
}

async fn root(State(ledger): State<Shared>, Path(pool): Path<PoolId>) -> Json<RootResponse> {
    Json(RootResponse {
        root: fr_to_hex(&ledger.merkle_root(pool).await.unwrap()),
    })
}

async fn leaf(
    State(ledger): State<Shared>,
    Path((pool, cm)): Path<(PoolId, String)>,
) -> Result<Json<LeafResponse>, ApiError> {
    let cm = hex_to_fr(&cm).map_err(bad_request)?;
    let proof = ledger.merkle_proof(pool, &cm).await.map_err(not_found)?;
    Ok(Json(LeafResponse {
        index: proof.leaf_index,
    }))
}

async fn proof(
    State(ledger): State<Shared>,
    Path((pool, index)): Path<(PoolId, u64)>,
) -> Result<Json<ProofResponse>, ApiError> {
    let latest = ledger.latest_slot().await.unwrap();
    let record = ledger
        .fetch_notes(&[pool], 0, latest)
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.leaf_index == index)
        .ok_or_else(|| not_found("index out of bounds"))?;
    let proof = ledger
        .merkle_proof(pool, &record.commitment)
        .await
        .map_err(not_found)?;
    Ok(Json(ProofResponse {
        root: fr_to_hex(&proof.root),
        siblings: proof.siblings.iter().map(fr_to_hex).collect(),
        indices: proof.indices,
    }))
}

fn router(ledger: Shared) -> Router {
    Router::new()
        .route("/v1/slot", get(slot))
        .route("/v1/notes", get(notes))
        .route("/v1/nullifiers", get(nullifiers))
        .route("/v1/nullifier/{nf}", get(spent))
        .route("/v1/root/{pool}", get(root))
        .route("/v1/leaf/{pool}/{cm}", get(leaf))
        .route("/v1/proof/{pool}/{index}", get(proof))
        .with_state(ledger)
}

async fn serve(ledger: Shared) -> IndexerClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(ledger)).await.unwrap();
    });
    IndexerClient::new(&format!("http://{addr}/"))
}

/// Ledger with three deposits to `keypair` in pool 1, one in pool 2 and one
/// spent nullifier.
async fn populated(keypair: &Keypair) -> (Shared, Nullifier) {
    let mut rng = StdRng::seed_from_u64(11);
    let token = Fr::from(1u64);
    let ledger = Arc::new(MemoryLedger::new());
    for amount in [5u128, 6, 7] {
        let out = shield(&keypair.address(), token, amount, &mut rng).unwrap();
        ledger.append_note(1, out.to_new_output()).await.unwrap();
    }
    let out = shield(&keypair.address(), token, 8, &mut rng).unwrap();
    ledger.append_note(2, out.to_new_output()).await.unwrap();
    let nf = Nullifier(Fr::from(1234u64));
    ledger.commit_transaction(1, &[nf], vec![]).await.unwrap();
    (ledger, nf)
}

#[tokio::test]
async fn indexer_matches_memory_ledger() {
    let keypair = Keypair::random(&mut StdRng::seed_from_u64(10));
    let (ledger, nf) = populated(&keypair).await;
    let client = serve(Arc::clone(&ledger)).await;

    let latest = ledger.latest_slot().await.unwrap();
    assert_eq!(client.latest_slot().await.unwrap(), latest);

    for (pools, after) in [(vec![1], 0), (vec![1, 2], 0), (vec![1, 2], 2), (vec![3], 0)] {
        assert_eq!(
            client.fetch_notes(&pools, after, latest).await.unwrap(),
            ledger.fetch_notes(&pools, after, latest).await.unwrap()
        );
        assert_eq!(
            client.fetch_nullifiers(&pools, after, latest).await.unwrap(),
            ledger.fetch_nullifiers(&pools, after, latest).await.unwrap()
        );
    }

    assert!(client.is_nullifier_spent(&nf).await.unwrap());
    assert!(!client
        .is_nullifier_spent(&Nullifier(Fr::from(1u64)))
        .await
        .unwrap());

    for pool in [1, 2] {
        let root = client.merkle_root(pool).await.unwrap();
        assert_eq!(root, ledger.merkle_root(pool).await.unwrap());
        for record in ledger.fetch_notes(&[pool], 0, latest).await.unwrap() {
            let proof = client.merkle_proof(pool, &record.commitment).await.unwrap();
            assert_eq!(proof, ledger.merkle_proof(pool, &record.commitment).await.unwrap());
            assert_eq!(proof.root, root);
            assert!(verify_proof(record.commitment, &proof));
        }
    }
}

#[tokio::test]
async fn sync_through_indexer() {
    let keypair = Keypair::random(&mut StdRng::seed_from_u64(12));
    let (ledger, _) = populated(&keypair).await;
    let client = serve(ledger).await;

    let mut manager = NoteManager::new(keypair, vec![1, 2]);
    let found = manager.sync(&client).await.unwrap();
    assert_eq!(found.len(), 4);
    assert_eq!(manager.balance(&Fr::from(1u64)), 26);
}

#[tokio::test]
async fn unknown_commitment_is_an_indexer_error() {
    let keypair = Keypair::random(&mut StdRng::seed_from_u64(13));
    let (ledger, _) = populated(&keypair).await;
    let client = serve(ledger).await;
    let err = client.merkle_proof(1, &Fr::from(999u64)).await.unwrap_err();
    match err {
        SdkError::Indexer(msg) => assert!(msg.contains("404"), "{msg}"),
        other => panic!("unexpected error: {other}"),
    }
}
