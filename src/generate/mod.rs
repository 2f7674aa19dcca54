//! Synthetic source records
//!
//! Fills every opaque leaf of a schema with a value drawn from a per-kind
//! sample pool, keeping the container structure intact. Useful for
//! exercising a mapping before real data is available.
//!
//! ```rust
//! use schema_remap::generate::{RecordGenerator, SamplePools};
//! use schema_remap::mapping::{FieldValue, OpaqueTypeSet};
//! use serde_json::json;
//!
//! let schema = FieldValue::from_json(json!({"a": {"b": 1}}), &OpaqueTypeSet::default())?;
//! let mut generator = RecordGenerator::with_seed(SamplePools::default(), 7);
//! let record = generator.generate(&schema)?;
//! assert!(record.get("a").unwrap().get("b").unwrap().is_opaque());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;

use std::collections::BTreeMap;

use indexmap::IndexMap;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde_json::{Value, json};
use tracing::debug;

use crate::mapping::{FieldValue, Path, ValueKind};

pub use error::{GenerateError, GenerateResult};

/// Candidate values per leaf kind
#[derive(Debug, Clone, PartialEq)]
pub struct SamplePools {
    pools: BTreeMap<ValueKind, Vec<Value>>,
}

impl Default for SamplePools {
    fn default() -> Self {
        let mut pools = BTreeMap::new();
        pools.insert(
            ValueKind::Text,
            ["abc", "def", "ghi", "jkl", "mno", "pqr", "stu", "vwx", "yz"]
                .iter()
                .map(|s| json!(s))
                .collect(),
        );
        pools.insert(ValueKind::Integer, (0..10).map(|n| json!(n)).collect());
        pools.insert(
            ValueKind::Number,
            [0.5, 1.25, 2.75, 10.0].iter().map(|n| json!(n)).collect(),
        );
        pools.insert(
            ValueKind::List,
            (1..=4).map(|n| json!([n, n, n])).collect(),
        );
        pools.insert(ValueKind::Boolean, vec![json!(true), json!(false)]);
        Self { pools }
    }
}

impl SamplePools {
    /// Pools with nothing in them
    pub fn empty() -> Self {
        Self {
            pools: BTreeMap::new(),
        }
    }

    /// Default pools, replaced kind by kind with `overrides`
    pub fn with_overrides(overrides: &BTreeMap<ValueKind, Vec<Value>>) -> Self {
        let mut pools = Self::default();
        for (kind, values) in overrides {
            pools.pools.insert(*kind, values.clone());
        }
        pools
    }

    pub fn with_pool(mut self, kind: ValueKind, values: Vec<Value>) -> Self {
        self.pools.insert(kind, values);
        self
    }

    pub fn get(&self, kind: ValueKind) -> Option<&[Value]> {
        self.pools
            .get(&kind)
            .map(Vec::as_slice)
            .filter(|p| !p.is_empty())
    }
}

/// Produces records shaped like a schema with randomly chosen leaves
pub struct RecordGenerator {
    pools: SamplePools,
    rng: StdRng,
}

impl RecordGenerator {
    /// Generator seeded from system entropy
    pub fn new(pools: SamplePools) -> Self {
        Self {
            pools,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator; the same seed yields the same records
    pub fn with_seed(pools: SamplePools, seed: u64) -> Self {
        Self {
            pools,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// One record shaped like `schema`
    ///
    /// `null` placeholders stay `null` unless a null pool is configured.
    pub fn generate(&mut self, schema: &FieldValue) -> GenerateResult<FieldValue> {
        if schema.is_opaque() {
            return Err(GenerateError::InvalidSchema(schema.kind()));
        }
        let mut path = Path::empty();
        self.fill(schema, &mut path)
    }

    /// `count` records shaped like `schema`
    pub fn generate_many(
        &mut self,
        schema: &FieldValue,
        count: usize,
    ) -> GenerateResult<Vec<FieldValue>> {
        debug!(count, "Generating synthetic records");
        (0..count).map(|_| self.generate(schema)).collect()
    }

    fn fill(&mut self, node: &FieldValue, path: &mut Path) -> GenerateResult<FieldValue> {
        match node {
            FieldValue::Container(fields) => {
                let mut out = IndexMap::with_capacity(fields.len());
                for (key, child) in fields {
                    path.push(key.as_str());
                    let value = self.fill(child, path)?;
                    path.pop();
                    out.insert(key.clone(), value);
                }
                Ok(FieldValue::Container(out))
            }
            FieldValue::Opaque(leaf) => {
                let kind = leaf.kind();
                let choice = self
                    .pools
                    .get(kind)
                    .and_then(|pool| pool.choose(&mut self.rng));
                match choice {
                    Some(value) => Ok(FieldValue::opaque(value.clone())),
                    None if kind == ValueKind::Null => Ok(FieldValue::placeholder()),
                    None => Err(GenerateError::EmptyPool {
                        kind,
                        path: path.clone(),
                    }),
                }
            }
        }
    }
}
