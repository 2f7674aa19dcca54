//! Moving values between record trees along resolved paths

use super::error::{MappingError, MappingResult};
use super::tree::{FieldValue, ValueKind};
use super::types::{Path, PathMap};

/// Value at the end of `path` in `record`
///
/// Fails with [`MappingError::OutOfShape`] if a step is missing or an
/// intermediate step is not a container. The empty path addresses no field
/// and is rejected the same way.
pub fn read_at_path<'a>(record: &'a FieldValue, path: &Path) -> MappingResult<&'a FieldValue> {
    if path.is_empty() {
        return Err(empty_path());
    }

    let mut node = record;
    for (depth, step) in path.iter().enumerate() {
        let fields = node
            .as_container()
            .ok_or_else(|| not_a_container(path, depth, step, node.kind()))?;
        node = fields
            .get(step)
            .ok_or_else(|| missing_key(path, depth, step))?;
    }
    Ok(node)
}

/// Assign `value` under the last key of `path`, replacing whatever is there
///
/// All steps before the last must already exist and be containers; the last
/// key is inserted if it is absent.
pub fn write_at_path(record: &mut FieldValue, path: &Path, value: FieldValue) -> MappingResult<()> {
    let Some((last, steps)) = path.split_last() else {
        return Err(empty_path());
    };

    let mut node = record;
    for (depth, step) in steps.iter().enumerate() {
        let kind = node.kind();
        let FieldValue::Container(fields) = node else {
            return Err(not_a_container(path, depth, step, kind));
        };
        node = fields
            .get_mut(step)
            .ok_or_else(|| missing_key(path, depth, step))?;
    }

    let kind = node.kind();
    let FieldValue::Container(fields) = node else {
        return Err(not_a_container(path, steps.len(), last, kind));
    };
    fields.insert(last.clone(), value);
    Ok(())
}

/// Build one destination record from one source record
///
/// The skeleton is instantiated fresh, then every path-map pair is copied in
/// order. The first failure aborts and the partially filled record is dropped.
pub fn remap(
    path_map: &PathMap,
    source: &FieldValue,
    skeleton: &FieldValue,
) -> MappingResult<FieldValue> {
    let mut destination = skeleton.instantiate();
    for (source_path, destination_path) in path_map.pairs() {
        let value = read_at_path(source, source_path)?;
        write_at_path(&mut destination, destination_path, value.clone())?;
    }
    Ok(destination)
}

/// Lazily remap a stream of source records, preserving order
pub fn remap_records<'a, I>(
    path_map: &'a PathMap,
    records: I,
    skeleton: &'a FieldValue,
) -> impl Iterator<Item = MappingResult<FieldValue>> + 'a
where
    I: IntoIterator<Item = FieldValue>,
    I::IntoIter: 'a,
{
    records
        .into_iter()
        .map(move |record| remap(path_map, &record, skeleton))
}

fn empty_path() -> MappingError {
    MappingError::OutOfShape {
        path: Path::empty(),
        step: String::new(),
        reason: "empty path does not address a field".to_string(),
    }
}

fn missing_key(path: &Path, depth: usize, step: &str) -> MappingError {
    MappingError::OutOfShape {
        path: path.prefix(depth + 1),
        step: step.to_string(),
        reason: "key is missing".to_string(),
    }
}

fn not_a_container(path: &Path, depth: usize, step: &str, found: ValueKind) -> MappingError {
    MappingError::OutOfShape {
        path: path.prefix(depth + 1),
        step: step.to_string(),
        reason: format!("expected a container, found {}", found),
    }
}
