// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! In-process prover: runs a CPU-bound closure on tokio's blocking pool so
//! proving never stalls the async executor.

use std::sync::Arc;

use super::{CircuitId, Groth16Proof, Prover, SignalVector};
use crate::error::{SdkError, SdkResult};

pub struct BlockingProver<F> {
    inner: Arc<F>,
}

impl<F> Clone for BlockingProver<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F> BlockingProver<F>
where
    F: Fn(CircuitId, &SignalVector) -> SdkResult<Groth16Proof> + Send + Sync + 'static,
{
    pub fn new(f: F) -> Self {
        Self { inner: Arc::new(f) }
    }
}

impl<F> Prover for BlockingProver<F>
where
    F: Fn(CircuitId, &SignalVector) -> SdkResult<Groth16Proof> + Send + Sync + 'static,
{
    async fn prove(&self, circuit: CircuitId, signals: &SignalVector) -> SdkResult<Groth16Proof> {
        let f = Arc::clone(&self.inner);
        let signals = signals.clone();
        tokio::task::spawn_blocking(move || f(circuit, &signals))
            .await
            .map_err(|e| SdkError::Prover(format!("proving task for {circuit} failed: {e}")))?
    }
}
