// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! Subprocess prover.
//!
//! Runs `program args...`, writes a [`ProveRequest`] as JSON to its stdin and
//! reads a [`ProofJson`] from its stdout. A non-zero exit status is reported
//! with the child's stderr.

use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{CircuitId, Groth16Proof, ProofJson, ProveRequest, Prover, SignalVector};
use crate::error::{SdkError, SdkResult};

#[derive(Clone, Debug)]
pub struct CommandProver {
    program: String,
    args: Vec<String>,
}

impl CommandProver {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl Prover for CommandProver {
    async fn prove(&self, circuit: CircuitId, signals: &SignalVector) -> SdkResult<Groth16Proof> {
        let request = serde_json::to_vec(&ProveRequest::new(circuit, signals))
            .map_err(|e| SdkError::Prover(format!("encode request: {e}")))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SdkError::Prover(format!("failed to run `{}`: {e}", self.program)))?;

        // Feed stdin while draining stdout/stderr so neither side can block on
        // a full pipe.
        let stdin = child.stdin.take();
        let feed = async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(&request).await?;
                stdin.shutdown().await?;
            }
            Ok::<(), std::io::Error>(())
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output =
            output.map_err(|e| SdkError::Prover(format!("wait for `{}`: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SdkError::Prover(format!(
                "`{}` failed for {circuit}: {}",
                self.program,
                stderr.trim()
            )));
        }

        // a prover may legitimately exit without reading all of its input
        match fed {
            Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => {
                return Err(SdkError::Prover(format!("write request: {e}")));
            }
            _ => {}
        }

        tracing::debug!(%circuit, bytes = output.stdout.len(), "prover subprocess finished");
        let proof: ProofJson = serde_json::from_slice(&output.stdout)
            .map_err(|e| SdkError::Prover(format!("parse proof: {e}")))?;
        Groth16Proof::try_from(proof)
    }
}
