//! Configured record mapper: schemas and path map built once, reused per record

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, info_span, warn};

use super::config::{MappingConfig, OnError};
use super::error::{MappingError, MappingResult};
use super::mover::{remap, remap_records};
use super::resolver::generate_path_map_with_policy;
use super::tree::{FieldValue, OpaqueTypeSet};
use super::types::PathMap;

/// Remaps records from a source schema to a destination schema
///
/// Holds only immutable state after construction, so a single mapper can be
/// shared across threads and used for any number of records.
#[derive(Debug, Clone)]
pub struct RecordMapper {
    opaque_types: OpaqueTypeSet,
    on_error: OnError,
    source_schema: FieldValue,
    skeleton: FieldValue,
    path_map: PathMap,
}

impl RecordMapper {
    /// Validate `config`, build both schema trees and resolve the path map
    pub fn new(config: &MappingConfig) -> MappingResult<Self> {
        let _span = info_span!("record_mapper_new", fields = config.field_map.len()).entered();
        config.validate()?;

        let source_schema =
            FieldValue::from_json(config.source_schema.clone(), &config.opaque_types)?;
        let skeleton =
            FieldValue::from_json(config.destination_schema.clone(), &config.opaque_types)?;
        let path_map = generate_path_map_with_policy(
            &config.field_map,
            &source_schema,
            &skeleton,
            config.ambiguity,
        )?;

        info!(
            entries = path_map.len(),
            ambiguity = %config.ambiguity,
            "Path map resolved"
        );

        Ok(Self {
            opaque_types: config.opaque_types.clone(),
            on_error: config.on_error,
            source_schema,
            skeleton,
            path_map,
        })
    }

    pub fn path_map(&self) -> &PathMap {
        &self.path_map
    }

    pub fn source_schema(&self) -> &FieldValue {
        &self.source_schema
    }

    /// Destination schema used as the template of every output record
    pub fn skeleton(&self) -> &FieldValue {
        &self.skeleton
    }

    /// Remap one source record
    pub fn remap(&self, record: &FieldValue) -> MappingResult<FieldValue> {
        remap(&self.path_map, record, &self.skeleton)
    }

    /// Remap one JSON record
    ///
    /// Keys outside the mapped paths are never inspected, so an unmapped
    /// value of any kind does not affect the result.
    pub fn remap_json(&self, record: Value) -> MappingResult<Value> {
        let record = FieldValue::from_record(record, &self.opaque_types);
        Ok(self.remap(&record)?.into_json())
    }

    /// Lazily remap a stream of records, one result per record, in order
    pub fn remap_all<'a, I>(
        &'a self,
        records: I,
    ) -> impl Iterator<Item = MappingResult<FieldValue>> + 'a
    where
        I: IntoIterator<Item = FieldValue>,
        I::IntoIter: 'a,
    {
        remap_records(&self.path_map, records, &self.skeleton)
    }

    /// Remap a batch of JSON records, applying the configured error handling
    ///
    /// With [`OnError::Abort`] the first failure is returned. With
    /// [`OnError::Skip`] failing records are logged and left out, and the
    /// report counts them.
    pub fn remap_batch<I>(&self, records: I) -> MappingResult<(Vec<Value>, RemapReport)>
    where
        I: IntoIterator<Item = Value>,
    {
        let _span = info_span!("remap_batch", on_error = %self.on_error).entered();
        let mut output = Vec::new();
        let mut report = RemapReport::default();

        for (index, record) in records.into_iter().enumerate() {
            report.records_read += 1;
            match self.remap_json(record) {
                Ok(value) => {
                    report.records_remapped += 1;
                    output.push(value);
                }
                Err(e) if self.on_error == OnError::Skip && is_record_error(&e) => {
                    warn!(index, error = %e, "Skipping record");
                    report.records_failed += 1;
                }
                Err(e) => return Err(e),
            }
        }

        debug!(
            read = report.records_read,
            remapped = report.records_remapped,
            failed = report.records_failed,
            "Batch complete"
        );
        Ok((output, report))
    }
}

/// Per-record failures that a skipping run may drop
fn is_record_error(err: &MappingError) -> bool {
    matches!(err, MappingError::OutOfShape { .. })
}

/// Summary of a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemapReport {
    /// Source records consumed
    pub records_read: usize,
    /// Destination records produced
    pub records_remapped: usize,
    /// Records dropped because they did not match the source schema
    pub records_failed: usize,
}

impl RemapReport {
    /// Fraction of records remapped successfully
    pub fn success_rate(&self) -> f64 {
        if self.records_read == 0 {
            return 1.0;
        }
        self.records_remapped as f64 / self.records_read as f64
    }
}
