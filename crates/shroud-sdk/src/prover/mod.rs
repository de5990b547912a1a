// Copyright 2026 abhirupbanerjee
// Licensed under the Apache License, Version 2.0

//! Boundary to the external Groth16 prover.
//!
//! The engine assembles a [`SignalVector`] and hands it to a [`Prover`]; it
//! never evaluates circuits itself. The returned proof is checked against the
//! circuit's [`ProofLayout`] by the caller.
//!
//! | Backend | Transport |
//! |---|---|
//! | [`CommandProver`] | subprocess, JSON request on stdin, JSON proof on stdout |
//! | [`HttpProver`] | `POST {url}/prove` |
//! | [`BlockingProver`] | in-process closure on tokio's blocking pool |

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;

use anyhow::Context;
use ark_bls12_381::Fr;
use ark_ff::PrimeField;
use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

pub mod blocking;
pub mod command;
pub mod http;

pub use blocking::BlockingProver;
pub use command::CommandProver;
pub use http::HttpProver;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CircuitId {
    Transfer,
    Swap,
    Order,
    Vote,
}

impl CircuitId {
    pub const ALL: [CircuitId; 4] = [Self::Transfer, Self::Swap, Self::Order, Self::Vote];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Transfer => "transfer",
            Self::Swap => "swap",
            Self::Order => "order",
            Self::Vote => "vote",
        }
    }
}

impl fmt::Display for CircuitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Byte lengths of the three Groth16 proof elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofLayout {
    pub a: usize,
    pub b: usize,
    pub c: usize,
}

impl ProofLayout {
    pub const BLS12_381_COMPRESSED: Self = Self { a: 48, b: 96, c: 48 };
    pub const BLS12_381_UNCOMPRESSED: Self = Self { a: 96, b: 192, c: 96 };
    pub const BN254_COMPRESSED: Self = Self { a: 32, b: 64, c: 32 };
    pub const BN254_UNCOMPRESSED: Self = Self { a: 64, b: 128, c: 64 };

    pub fn total(&self) -> usize {
        self.a + self.b + self.c
    }
}

impl Default for ProofLayout {
    fn default() -> Self {
        Self::BLS12_381_UNCOMPRESSED
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Groth16Proof {
    pub a: Vec<u8>,
    pub b: Vec<u8>,
    pub c: Vec<u8>,
}

impl Groth16Proof {
    /// Split `a || b || c` according to `layout`.
    pub fn from_bytes(circuit: CircuitId, layout: &ProofLayout, bytes: &[u8]) -> SdkResult<Self> {
        if bytes.len() != layout.total() {
            return Err(SdkError::ProofLayout {
                circuit: circuit.name().into(),
                expected: layout.total(),
                actual: bytes.len(),
            });
        }
        let (a, rest) = bytes.split_at(layout.a);
        let (b, c) = rest.split_at(layout.b);
        Ok(Self {
            a: a.to_vec(),
            b: b.to_vec(),
            c: c.to_vec(),
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        [self.a.as_slice(), self.b.as_slice(), self.c.as_slice()].concat()
    }

    pub fn check_layout(&self, circuit: CircuitId, layout: &ProofLayout) -> SdkResult<()> {
        for (part, expected, actual) in [
            ("a", layout.a, self.a.len()),
            ("b", layout.b, self.b.len()),
            ("c", layout.c, self.c.len()),
        ] {
            if expected != actual {
                return Err(SdkError::ProofLayout {
                    circuit: format!("{circuit}.{part}"),
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }
}

/// Wire form of a proof: hex-encoded elements.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ProofJson {
    pub a: String,
    pub b: String,
    pub c: String,
}

impl From<&Groth16Proof> for ProofJson {
    fn from(p: &Groth16Proof) -> Self {
        Self {
            a: hex::encode(&p.a),
            b: hex::encode(&p.b),
            c: hex::encode(&p.c),
        }
    }
}

impl TryFrom<ProofJson> for Groth16Proof {
    type Error = SdkError;

    fn try_from(j: ProofJson) -> SdkResult<Self> {
        let decode = |name: &str, s: &str| {
            hex::decode(crate::wallet::strip_0x(s))
                .with_context(|| format!("proof element {name} is not hex"))
                .map_err(|e| SdkError::Prover(format!("{e:#}")))
        };
        Ok(Self {
            a: decode("a", &j.a)?,
            b: decode("b", &j.b)?,
            c: decode("c", &j.c)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Signal {
    Single(Fr),
    Array(Vec<Fr>),
    Matrix(Vec<Vec<Fr>>),
}

impl Signal {
    pub fn flatten(&self) -> Vec<Fr> {
        match self {
            Self::Single(v) => vec![*v],
            Self::Array(v) => v.clone(),
            Self::Matrix(m) => m.iter().flatten().copied().collect(),
        }
    }

    fn to_json(&self) -> serde_json::Value {
        fn dec(v: &Fr) -> serde_json::Value {
            serde_json::Value::String(v.into_bigint().to_string())
        }
        match self {
            Self::Single(v) => dec(v),
            Self::Array(v) => v.iter().map(dec).collect(),
            Self::Matrix(m) => m
                .iter()
                .map(|row| row.iter().map(dec).collect::<serde_json::Value>())
                .collect(),
        }
    }
}

impl From<Fr> for Signal {
    fn from(v: Fr) -> Self {
        Self::Single(v)
    }
}

impl From<Vec<Fr>> for Signal {
    fn from(v: Vec<Fr>) -> Self {
        Self::Array(v)
    }
}

impl From<Vec<Vec<Fr>>> for Signal {
    fn from(v: Vec<Vec<Fr>>) -> Self {
        Self::Matrix(v)
    }
}

/// Named circuit inputs in declaration order, public signals first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignalVector {
    public: Vec<(String, Signal)>,
    private: Vec<(String, Signal)>,
}

impl SignalVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn public(&mut self, name: &str, value: impl Into<Signal>) -> &mut Self {
        self.public.push((name.to_string(), value.into()));
        self
    }

    pub fn private(&mut self, name: &str, value: impl Into<Signal>) -> &mut Self {
        self.private.push((name.to_string(), value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Signal> {
        self.public
            .iter()
            .chain(self.private.iter())
            .find(|(n, _)| n == name)
            .map(|(_, s)| s)
    }

    pub fn public_names(&self) -> Vec<&str> {
        self.public.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn private_names(&self) -> Vec<&str> {
        self.private.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Public signals flattened in order: what the verifier consumes.
    pub fn public_values(&self) -> Vec<Fr> {
        self.public.iter().flat_map(|(_, s)| s.flatten()).collect()
    }

    /// Circom-style input object, field elements as decimal strings.
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .public
            .iter()
            .chain(self.private.iter())
            .map(|(n, s)| (n.clone(), s.to_json()))
            .collect();
        serde_json::Value::Object(map)
    }
}

/// Body sent to subprocess and HTTP provers.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ProveRequest {
    pub circuit: CircuitId,
    pub inputs: serde_json::Value,
    pub public_signals: Vec<String>,
}

impl ProveRequest {
    pub fn new(circuit: CircuitId, signals: &SignalVector) -> Self {
        Self {
            circuit,
            inputs: signals.to_json(),
            public_signals: signals.public_names().into_iter().map(String::from).collect(),
        }
    }
}

pub trait Prover: Send + Sync {
    fn prove(
        &self,
        circuit: CircuitId,
        signals: &SignalVector,
    ) -> impl Future<Output = SdkResult<Groth16Proof>> + Send;
}

/// Per-circuit proof layouts, defaulting to uncompressed BLS12-381.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofLayouts(pub BTreeMap<CircuitId, ProofLayout>);

impl ProofLayouts {
    pub fn uniform(layout: ProofLayout) -> Self {
        Self(CircuitId::ALL.iter().map(|c| (*c, layout)).collect())
    }

    pub fn get(&self, circuit: CircuitId) -> ProofLayout {
        self.0.get(&circuit).copied().unwrap_or_default()
    }

    pub fn set(&mut self, circuit: CircuitId, layout: ProofLayout) {
        self.0.insert(circuit, layout);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proof(layout: ProofLayout) -> Groth16Proof {
        Groth16Proof {
            a: vec![1; layout.a],
            b: vec![2; layout.b],
            c: vec![3; layout.c],
        }
    }

    #[test]
    fn layout_constants() {
        assert_eq!(ProofLayout::BLS12_381_COMPRESSED.total(), 192);
        assert_eq!(ProofLayout::BLS12_381_UNCOMPRESSED.total(), 384);
        assert_eq!(ProofLayout::BN254_COMPRESSED.total(), 128);
        assert_eq!(ProofLayout::BN254_UNCOMPRESSED.total(), 256);
    }

    #[test]
    fn split_and_join() {
        let layout = ProofLayout::BN254_UNCOMPRESSED;
        let p = proof(layout);
        let bytes = p.to_bytes();
        assert_eq!(Groth16Proof::from_bytes(CircuitId::Vote, &layout, &bytes).unwrap(), p);
        assert!(matches!(
            Groth16Proof::from_bytes(CircuitId::Vote, &layout, &bytes[1..]),
            Err(SdkError::ProofLayout { expected: 256, actual: 255, .. })
        ));
    }

    #[test]
    fn layout_check_names_element() {
        let p = proof(ProofLayout::BLS12_381_COMPRESSED);
        p.check_layout(CircuitId::Transfer, &ProofLayout::BLS12_381_COMPRESSED)
            .unwrap();
        match p.check_layout(CircuitId::Transfer, &ProofLayout::BLS12_381_UNCOMPRESSED) {
            Err(SdkError::ProofLayout {
                circuit,
                expected,
                actual,
            }) => {
                assert_eq!(circuit, "transfer.a");
                assert_eq!((expected, actual), (96, 48));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn proof_json_roundtrip() {
        let p = proof(ProofLayout::BN254_COMPRESSED);
        let j = ProofJson::from(&p);
        assert_eq!(Groth16Proof::try_from(j).unwrap(), p);
        let bad = ProofJson {
            a: "zz".into(),
            b: String::new(),
            c: String::new(),
        };
        assert!(matches!(Groth16Proof::try_from(bad), Err(SdkError::Prover(_))));
    }

    #[test]
    fn signal_vector_order_and_json() {
        let mut sv = SignalVector::new();
        sv.public("root", Fr::from(7u64))
            .public("nullifiers", vec![Fr::from(1u64), Fr::from(2u64)])
            .private("path", vec![vec![Fr::from(3u64)], vec![Fr::from(4u64)]]);
        assert_eq!(sv.public_names(), vec!["root", "nullifiers"]);
        assert_eq!(
            sv.public_values(),
            vec![Fr::from(7u64), Fr::from(1u64), Fr::from(2u64)]
        );
        let json = sv.to_json();
        assert_eq!(json["root"], "7");
        assert_eq!(json["nullifiers"][1], "2");
        assert_eq!(json["path"][1][0], "4");
        assert_eq!(sv.get("path"), Some(&Signal::Matrix(vec![vec![Fr::from(3u64)], vec![Fr::from(4u64)]])));
    }

    #[test]
    fn decimal_encoding_of_large_values() {
        let mut sv = SignalVector::new();
        sv.public("x", -Fr::from(1u64));
        let s = sv.to_json()["x"].as_str().unwrap().to_string();
        assert_eq!(s, (-Fr::from(1u64)).into_bigint().to_string());
        assert!(s.len() > 70);
    }

    #[test]
    fn layouts_default_and_override() {
        let mut layouts = ProofLayouts::default();
        assert_eq!(layouts.get(CircuitId::Swap), ProofLayout::BLS12_381_UNCOMPRESSED);
        layouts.set(CircuitId::Swap, ProofLayout::BN254_COMPRESSED);
        assert_eq!(layouts.get(CircuitId::Swap), ProofLayout::BN254_COMPRESSED);
        let uniform = ProofLayouts::uniform(ProofLayout::BN254_UNCOMPRESSED);
        assert_eq!(uniform.get(CircuitId::Order), ProofLayout::BN254_UNCOMPRESSED);
    }

    #[test]
    fn circuit_serde_names() {
        assert_eq!(serde_json::to_string(&CircuitId::Vote).unwrap(), "\"vote\"");
        let c: CircuitId = serde_json::from_str("\"swap\"").unwrap();
        assert_eq!(c, CircuitId::Swap);
    }
}
