// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! Remote prover over HTTP: `POST {url}/prove` with a [`ProveRequest`] body,
//! answered by a [`ProofJson`].

use super::{CircuitId, Groth16Proof, ProofJson, ProveRequest, Prover, SignalVector};
use crate::error::{SdkError, SdkResult};

#[derive(Clone)]
pub struct HttpProver {
    url: String,
    http: reqwest::Client,
}

impl HttpProver {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }
}

impl Prover for HttpProver {
    async fn prove(&self, circuit: CircuitId, signals: &SignalVector) -> SdkResult<Groth16Proof> {
        let url = format!("{}/prove", self.url);
        let resp = self
            .http
            .post(&url)
            .json(&ProveRequest::new(circuit, signals))
            .send()
            .await
            .map_err(|e| SdkError::Prover(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SdkError::Prover(format!("{circuit}: {status} {body}")));
        }
        let proof: ProofJson = resp
            .json()
            .await
            .map_err(|e| SdkError::Prover(format!("parse proof: {e}")))?;
        Groth16Proof::try_from(proof)
    }
}
