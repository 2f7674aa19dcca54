//! Field path resolution over nested schema trees
//!
//! Resolution is a depth-first, pre-order search that visits container keys
//! in insertion order and never descends into opaque leaves. The first match
//! wins: a name that occurs at several depths resolves to whichever
//! occurrence the traversal reaches first. That is a known limitation, not
//! something this module tries to disambiguate; [`AmbiguityPolicy`] lets
//! callers log or reject such names instead.

use tracing::{debug, warn};

use super::config::AmbiguityPolicy;
use super::error::{MappingError, MappingResult, SchemaSide};
use super::tree::FieldValue;
use super::types::{FieldMap, Path, PathMap, PathMapEntry};

/// Find the path to `field` in `schema`
///
/// Returns an empty path if the field does not occur anywhere reachable.
pub fn resolve(schema: &FieldValue, field: &str) -> Path {
    let mut path = Path::empty();
    if search(schema, field, &mut path) {
        path
    } else {
        Path::empty()
    }
}

/// Depth-first search with backtracking; `path` holds the keys walked so far
fn search(node: &FieldValue, field: &str, path: &mut Path) -> bool {
    let Some(fields) = node.as_container() else {
        return false;
    };

    for (key, value) in fields {
        if key == field {
            path.push(key.as_str());
            return true;
        }

        if value.is_opaque() {
            continue;
        }

        path.push(key.as_str());
        if search(value, field, path) {
            return true;
        }
        path.pop();
    }

    false
}

/// Every path at which `field` occurs, in traversal order
///
/// Uses the same rules as [`resolve`] but keeps going after a match, so the
/// first element (if any) is always what `resolve` returns. A match is not
/// descended into.
pub fn find_occurrences(schema: &FieldValue, field: &str) -> Vec<Path> {
    let mut found = Vec::new();
    let mut path = Path::empty();
    collect(schema, field, &mut path, &mut found);
    found
}

fn collect(node: &FieldValue, field: &str, path: &mut Path, found: &mut Vec<Path>) {
    let Some(fields) = node.as_container() else {
        return;
    };

    for (key, value) in fields {
        path.push(key.as_str());
        if key == field {
            found.push(path.clone());
        } else if !value.is_opaque() {
            collect(value, field, path, found);
        }
        path.pop();
    }
}

/// Build a path map, resolving each entry in both schemas
///
/// Fails with [`MappingError::FieldNotFound`] if any name is missing from its
/// schema; no partial map is returned. Ambiguous names silently resolve to
/// their first occurrence.
pub fn generate_path_map(
    field_map: &FieldMap,
    source_schema: &FieldValue,
    destination_schema: &FieldValue,
) -> MappingResult<PathMap> {
    generate_path_map_with_policy(
        field_map,
        source_schema,
        destination_schema,
        AmbiguityPolicy::Ignore,
    )
}

/// Build a path map, applying `policy` to names that occur more than once
pub fn generate_path_map_with_policy(
    field_map: &FieldMap,
    source_schema: &FieldValue,
    destination_schema: &FieldValue,
    policy: AmbiguityPolicy,
) -> MappingResult<PathMap> {
    let mut path_map = PathMap::new();

    for (source_field, destination_field) in field_map {
        let source_path = resolve_field(source_schema, source_field, SchemaSide::Source, policy)?;
        let destination_path = resolve_field(
            destination_schema,
            destination_field,
            SchemaSide::Destination,
            policy,
        )?;

        debug!(
            source = %source_path,
            destination = %destination_path,
            "Resolved '{}' -> '{}'",
            source_field,
            destination_field
        );

        if let Some(existing) = path_map
            .iter()
            .find(|e| e.destination_path == destination_path)
        {
            warn!(
                destination = %destination_path,
                "Fields '{}' and '{}' both map to the same destination; the later one wins",
                existing.source_field,
                source_field
            );
        }

        path_map.push(PathMapEntry::new(
            source_field.as_str(),
            destination_field.as_str(),
            source_path,
            destination_path,
        ));
    }

    Ok(path_map)
}

fn resolve_field(
    schema: &FieldValue,
    field: &str,
    side: SchemaSide,
    policy: AmbiguityPolicy,
) -> MappingResult<Path> {
    if policy == AmbiguityPolicy::Ignore {
        let path = resolve(schema, field);
        if path.is_empty() {
            return Err(MappingError::FieldNotFound {
                field: field.to_string(),
                side,
            });
        }
        return Ok(path);
    }

    let mut occurrences = find_occurrences(schema, field);
    if occurrences.is_empty() {
        return Err(MappingError::FieldNotFound {
            field: field.to_string(),
            side,
        });
    }

    if occurrences.len() > 1 {
        match policy {
            AmbiguityPolicy::Reject => {
                return Err(MappingError::AmbiguousField {
                    field: field.to_string(),
                    side,
                    occurrences,
                });
            }
            AmbiguityPolicy::Warn => {
                warn!(
                    count = occurrences.len(),
                    chosen = %occurrences[0],
                    "Field '{}' occurs more than once in {} schema; using first match",
                    field,
                    side
                );
            }
            AmbiguityPolicy::Ignore => {}
        }
    }

    Ok(occurrences.swap_remove(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::tree::{OpaqueTypeSet, ValueKind};
    use serde_json::{Value, json};

    fn tree(value: Value) -> FieldValue {
        FieldValue::from_json(value, &OpaqueTypeSet::default()).unwrap()
    }

    fn walk<'a>(root: &'a FieldValue, path: &Path) -> Option<&'a FieldValue> {
        path.iter().try_fold(root, |node, key| node.get(key))
    }

    fn input_schema() -> FieldValue {
        tree(json!({
            "f1": {"f2": 3, "f3": "my string"},
            "f4": [1, 2, 3],
            "f5": {"f6": {"f7": {"f8": false}}}
        }))
    }

    #[test]
    fn test_resolve_top_level_and_nested() {
        let schema = input_schema();

        assert_eq!(resolve(&schema, "f4"), Path::from(["f4"]));
        assert_eq!(resolve(&schema, "f2"), Path::from(["f1", "f2"]));
        assert_eq!(
            resolve(&schema, "f8"),
            Path::from(["f5", "f6", "f7", "f8"])
        );
    }

    #[test]
    fn test_resolve_container_field() {
        let schema = input_schema();
        let path = resolve(&schema, "f6");
        assert_eq!(path, Path::from(["f5", "f6"]));
        assert!(walk(&schema, &path).unwrap().is_container());
    }

    #[test]
    fn test_resolved_path_lands_on_field_at_its_depth() {
        let schema = input_schema();
        for (field, depth) in [("f1", 1), ("f2", 2), ("f3", 2), ("f7", 3), ("f8", 4)] {
            let path = resolve(&schema, field);
            assert_eq!(path.len(), depth, "depth of {}", field);
            assert_eq!(path.keys().last().map(String::as_str), Some(field));

            // every proper prefix is a container
            for n in 1..path.len() {
                assert!(walk(&schema, &path.prefix(n)).unwrap().is_container());
            }
            assert!(walk(&schema, &path).is_some());
        }
    }

    #[test]
    fn test_missing_field_resolves_to_empty_path() {
        let schema = input_schema();
        assert!(resolve(&schema, "f9").is_empty());
        assert!(resolve(&schema, "").is_empty());
    }

    #[test]
    fn test_opaque_root_resolves_to_empty_path() {
        assert!(resolve(&FieldValue::opaque(json!(1)), "x").is_empty());
    }

    #[test]
    fn test_never_descends_into_opaque_values() {
        // "id" only lives inside an opaque list of objects
        let schema = tree(json!({"rows": [{"id": 1}], "meta": {"name": "x"}}));
        assert!(resolve(&schema, "id").is_empty());

        // with objects opaque, nested keys are unreachable too
        let opaque = OpaqueTypeSet::default().with_kind(ValueKind::Object);
        let schema = FieldValue::from_json(json!({"meta": {"name": "x"}}), &opaque).unwrap();
        assert_eq!(resolve(&schema, "meta"), Path::from(["meta"]));
        assert!(resolve(&schema, "name").is_empty());
    }

    #[test]
    fn test_first_match_wins_depth_first() {
        // "id" under "a" is reached before the top-level "id" sibling
        let schema = tree(json!({
            "a": {"b": {"id": 1}},
            "id": 2
        }));
        assert_eq!(resolve(&schema, "id"), Path::from(["a", "b", "id"]));

        // matching key at this level stops before later siblings are searched
        let schema = tree(json!({
            "id": 2,
            "a": {"id": 1}
        }));
        assert_eq!(resolve(&schema, "id"), Path::from(["id"]));
    }

    #[test]
    fn test_backtracks_out_of_dead_ends() {
        let schema = tree(json!({
            "a": {"b": {"c": 1}, "d": null},
            "e": {"target": true}
        }));
        assert_eq!(resolve(&schema, "target"), Path::from(["e", "target"]));
    }

    #[test]
    fn test_find_occurrences() {
        let schema = tree(json!({
            "a": {"id": 1, "b": {"id": 2}},
            "id": 3,
            "rows": [{"id": 4}]
        }));

        let found = find_occurrences(&schema, "id");
        assert_eq!(
            found,
            vec![
                Path::from(["a", "id"]),
                Path::from(["a", "b", "id"]),
                Path::from(["id"]),
            ]
        );
        assert_eq!(found[0], resolve(&schema, "id"));
        assert!(find_occurrences(&schema, "missing").is_empty());
    }

    #[test]
    fn test_generate_path_map() {
        let source = tree(json!({"f1": {"f2": 3, "f3": "s"}, "f4": [1, 2, 3]}));
        let destination = tree(json!({"field2": null, "field4": null}));
        let field_map: FieldMap = [("f2", "field2"), ("f4", "field4")]
            .into_iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect();

        let path_map = generate_path_map(&field_map, &source, &destination).unwrap();
        let pairs: Vec<(Path, Path)> = path_map
            .pairs()
            .map(|(s, d)| (s.clone(), d.clone()))
            .collect();

        assert_eq!(
            pairs,
            vec![
                (Path::from(["f1", "f2"]), Path::from(["field2"])),
                (Path::from(["f4"]), Path::from(["field4"])),
            ]
        );

        // deterministic
        let again = generate_path_map(&field_map, &source, &destination).unwrap();
        assert_eq!(path_map, again);
    }

    #[test]
    fn test_generate_path_map_missing_source_field() {
        let source = tree(json!({"f1": 1}));
        let destination = tree(json!({"field1": null}));
        let mut field_map = FieldMap::new();
        field_map.insert("f1".to_string(), "field1".to_string());
        field_map.insert("nope".to_string(), "field1".to_string());

        let err = generate_path_map(&field_map, &source, &destination).unwrap_err();
        match err {
            MappingError::FieldNotFound { field, side } => {
                assert_eq!(field, "nope");
                assert_eq!(side, SchemaSide::Source);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_generate_path_map_missing_destination_field() {
        let source = tree(json!({"f1": 1}));
        let destination = tree(json!({"field1": null}));
        let mut field_map = FieldMap::new();
        field_map.insert("f1".to_string(), "field9".to_string());

        let err = generate_path_map(&field_map, &source, &destination).unwrap_err();
        assert!(matches!(
            err,
            MappingError::FieldNotFound {
                side: SchemaSide::Destination,
                ..
            }
        ));
    }

    #[test]
    fn test_ambiguity_policies() {
        let source = tree(json!({"a": {"id": 1}, "id": 2}));
        let destination = tree(json!({"out": null}));
        let mut field_map = FieldMap::new();
        field_map.insert("id".to_string(), "out".to_string());

        let warned = generate_path_map_with_policy(
            &field_map,
            &source,
            &destination,
            AmbiguityPolicy::Warn,
        )
        .unwrap();
        let ignored = generate_path_map(&field_map, &source, &destination).unwrap();
        assert_eq!(warned, ignored);
        assert_eq!(
            warned.iter().next().unwrap().source_path,
            Path::from(["a", "id"])
        );

        let err = generate_path_map_with_policy(
            &field_map,
            &source,
            &destination,
            AmbiguityPolicy::Reject,
        )
        .unwrap_err();
        match err {
            MappingError::AmbiguousField {
                field, occurrences, ..
            } => {
                assert_eq!(field, "id");
                assert_eq!(occurrences.len(), 2);
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
