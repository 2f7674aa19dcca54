//! Nested record tree model
//!
//! A record (or a schema, which is just a record whose leaves are
//! placeholders) is a tree of [`FieldValue`]s. Every node carries an explicit
//! tag: either a container that path resolution may descend into, or an
//! opaque leaf that it never enters. Which JSON kinds become opaque leaves is
//! decided once, when the tree is built, from an [`OpaqueTypeSet`].

use std::collections::BTreeSet;
use std::fmt;

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::error::{MappingError, MappingResult};
use super::types::Path;

/// Runtime kind of a JSON value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Null,
    #[serde(alias = "bool")]
    Boolean,
    #[serde(alias = "int")]
    Integer,
    #[serde(alias = "float")]
    Number,
    #[serde(alias = "string")]
    Text,
    #[serde(alias = "array")]
    List,
    Object,
}

impl ValueKind {
    /// Classify a JSON value
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Number(n) if n.is_i64() || n.is_u64() => ValueKind::Integer,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::Text,
            Value::Array(_) => ValueKind::List,
            Value::Object(_) => ValueKind::Object,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Null => write!(f, "null"),
            ValueKind::Boolean => write!(f, "boolean"),
            ValueKind::Integer => write!(f, "integer"),
            ValueKind::Number => write!(f, "number"),
            ValueKind::Text => write!(f, "text"),
            ValueKind::List => write!(f, "list"),
            ValueKind::Object => write!(f, "object"),
        }
    }
}

impl std::str::FromStr for ValueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "null" => Ok(ValueKind::Null),
            "boolean" | "bool" => Ok(ValueKind::Boolean),
            "integer" | "int" => Ok(ValueKind::Integer),
            "number" | "float" => Ok(ValueKind::Number),
            "text" | "string" => Ok(ValueKind::Text),
            "list" | "array" => Ok(ValueKind::List),
            "object" => Ok(ValueKind::Object),
            _ => Err(format!("Unknown value kind: {}", s)),
        }
    }
}

/// The set of value kinds treated as leaves
///
/// `null` is always a leaf: it is the placeholder used in schemas and
/// destination skeletons, and there is nothing inside it to descend into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpaqueTypeSet {
    kinds: BTreeSet<ValueKind>,
}

impl Default for OpaqueTypeSet {
    fn default() -> Self {
        Self::new([
            ValueKind::Text,
            ValueKind::Integer,
            ValueKind::Number,
            ValueKind::Boolean,
            ValueKind::List,
        ])
    }
}

impl OpaqueTypeSet {
    pub fn new(kinds: impl IntoIterator<Item = ValueKind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
        }
    }

    /// Scalars only; lists are rejected when a tree is built
    pub fn scalars() -> Self {
        Self::new([
            ValueKind::Text,
            ValueKind::Integer,
            ValueKind::Number,
            ValueKind::Boolean,
        ])
    }

    pub fn with_kind(mut self, kind: ValueKind) -> Self {
        self.kinds.insert(kind);
        self
    }

    pub fn contains(&self, kind: ValueKind) -> bool {
        kind == ValueKind::Null || self.kinds.contains(&kind)
    }
}

/// A leaf value with its kind tag
#[derive(Debug, Clone, PartialEq)]
pub struct OpaqueValue {
    kind: ValueKind,
    value: Value,
}

impl OpaqueValue {
    pub fn new(value: Value) -> Self {
        Self {
            kind: ValueKind::of(&value),
            value,
        }
    }

    /// The `null` placeholder
    pub fn placeholder() -> Self {
        Self::new(Value::Null)
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

/// A node in a record or schema tree
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Ordered mapping of keys to child nodes; resolution descends into it
    Container(IndexMap<String, FieldValue>),
    /// Leaf that resolution never descends into
    Opaque(OpaqueValue),
}

impl FieldValue {
    /// Build a tagged tree from JSON, classifying leaves with `opaque_types`
    ///
    /// A root object is always a container. Below the root, objects become
    /// containers unless `object` is in the set. Any other value whose kind
    /// is not in the set cannot be represented and is rejected.
    pub fn from_json(value: Value, opaque_types: &OpaqueTypeSet) -> MappingResult<Self> {
        let mut path = Vec::new();
        match value {
            Value::Object(map) => build_container(map, opaque_types, &mut path),
            other => build(other, opaque_types, &mut path),
        }
    }

    /// Build a tree from a data record
    ///
    /// Objects are containers on the same terms as [`FieldValue::from_json`],
    /// but any other value becomes a leaf whatever its kind. Only the paths
    /// the path map walks decide whether a record fits, so keys the schema
    /// does not mention never reject a record.
    pub fn from_record(value: Value, opaque_types: &OpaqueTypeSet) -> Self {
        match value {
            Value::Object(map) => record_container(map, opaque_types),
            other => FieldValue::opaque(other),
        }
    }

    /// Build an empty container
    pub fn container() -> Self {
        FieldValue::Container(IndexMap::new())
    }

    /// Wrap a JSON value as an opaque leaf regardless of its kind
    pub fn opaque(value: Value) -> Self {
        FieldValue::Opaque(OpaqueValue::new(value))
    }

    pub fn placeholder() -> Self {
        FieldValue::Opaque(OpaqueValue::placeholder())
    }

    /// True if resolution must not descend into this value
    pub fn is_opaque(&self) -> bool {
        matches!(self, FieldValue::Opaque(_))
    }

    pub fn is_container(&self) -> bool {
        matches!(self, FieldValue::Container(_))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            FieldValue::Container(_) => ValueKind::Object,
            FieldValue::Opaque(v) => v.kind(),
        }
    }

    pub fn as_container(&self) -> Option<&IndexMap<String, FieldValue>> {
        match self {
            FieldValue::Container(fields) => Some(fields),
            FieldValue::Opaque(_) => None,
        }
    }

    pub fn as_container_mut(&mut self) -> Option<&mut IndexMap<String, FieldValue>> {
        match self {
            FieldValue::Container(fields) => Some(fields),
            FieldValue::Opaque(_) => None,
        }
    }

    /// Child under `key`, if this is a container that has it
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.as_container().and_then(|fields| fields.get(key))
    }

    /// Allocate a fresh, independently owned tree from this skeleton
    ///
    /// Every destination record starts as an instantiation of the
    /// destination schema; the skeleton itself is never mutated.
    pub fn instantiate(&self) -> FieldValue {
        match self {
            FieldValue::Container(fields) => FieldValue::Container(
                fields
                    .iter()
                    .map(|(key, child)| (key.clone(), child.instantiate()))
                    .collect(),
            ),
            FieldValue::Opaque(leaf) => FieldValue::Opaque(leaf.clone()),
        }
    }

    /// Convert back to JSON, keeping key order
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Container(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(key, child)| (key.clone(), child.to_json()))
                    .collect(),
            ),
            FieldValue::Opaque(leaf) => leaf.value().clone(),
        }
    }

    pub fn into_json(self) -> Value {
        match self {
            FieldValue::Container(fields) => Value::Object(
                fields
                    .into_iter()
                    .map(|(key, child)| (key, child.into_json()))
                    .collect(),
            ),
            FieldValue::Opaque(leaf) => leaf.into_value(),
        }
    }

    /// Number of leaves in the tree
    pub fn leaf_count(&self) -> usize {
        match self {
            FieldValue::Container(fields) => fields.values().map(FieldValue::leaf_count).sum(),
            FieldValue::Opaque(_) => 1,
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Container(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, child) in fields {
                    map.serialize_entry(key, child)?;
                }
                map.end()
            }
            FieldValue::Opaque(leaf) => leaf.value().serialize(serializer),
        }
    }
}

fn build(
    value: Value,
    opaque_types: &OpaqueTypeSet,
    path: &mut Vec<String>,
) -> MappingResult<FieldValue> {
    let kind = ValueKind::of(&value);
    if opaque_types.contains(kind) {
        return Ok(FieldValue::opaque(value));
    }

    match value {
        Value::Object(map) => build_container(map, opaque_types, path),
        _ => Err(MappingError::UnsupportedValue {
            path: Path::new(path.clone()),
            kind,
        }),
    }
}

fn build_container(
    map: serde_json::Map<String, Value>,
    opaque_types: &OpaqueTypeSet,
    path: &mut Vec<String>,
) -> MappingResult<FieldValue> {
    let mut fields = IndexMap::with_capacity(map.len());
    for (key, child) in map {
        path.push(key.clone());
        let node = build(child, opaque_types, path)?;
        path.pop();
        fields.insert(key, node);
    }
    Ok(FieldValue::Container(fields))
}

fn record_container(
    map: serde_json::Map<String, Value>,
    opaque_types: &OpaqueTypeSet,
) -> FieldValue {
    let fields = map
        .into_iter()
        .map(|(key, child)| {
            let node = match child {
                Value::Object(inner) if !opaque_types.contains(ValueKind::Object) => {
                    record_container(inner, opaque_types)
                }
                other => FieldValue::opaque(other),
            };
            (key, node)
        })
        .collect();
    FieldValue::Container(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_kind_of() {
        assert_eq!(ValueKind::of(&json!(null)), ValueKind::Null);
        assert_eq!(ValueKind::of(&json!(true)), ValueKind::Boolean);
        assert_eq!(ValueKind::of(&json!(3)), ValueKind::Integer);
        assert_eq!(ValueKind::of(&json!(3.5)), ValueKind::Number);
        assert_eq!(ValueKind::of(&json!("s")), ValueKind::Text);
        assert_eq!(ValueKind::of(&json!([1, 2])), ValueKind::List);
        assert_eq!(ValueKind::of(&json!({})), ValueKind::Object);
    }

    #[test]
    fn test_record_keeps_unlisted_kinds_as_leaves() {
        let opaque = OpaqueTypeSet::new([ValueKind::Integer]);
        let record = FieldValue::from_record(
            json!({"a": 5, "extra": true, "nested": {"list": [1, 2]}}),
            &opaque,
        );

        assert!(record.get("a").unwrap().is_opaque());
        assert_eq!(record.get("extra").unwrap().kind(), ValueKind::Boolean);
        let nested = record.get("nested").unwrap();
        assert!(nested.is_container());
        assert_eq!(nested.get("list").unwrap().kind(), ValueKind::List);

        // the same value is not a valid schema under this set
        assert!(FieldValue::from_json(json!({"a": 5, "extra": true}), &opaque).is_err());
    }

    #[test]
    fn test_record_objects_follow_opaque_set() {
        let opaque = OpaqueTypeSet::default().with_kind(ValueKind::Object);
        let record = FieldValue::from_record(json!({"meta": {"k": 1}}), &opaque);
        assert!(record.is_container());
        assert!(record.get("meta").unwrap().is_opaque());
    }

    #[test]
    fn test_value_kind_parse() {
        assert_eq!("string".parse::<ValueKind>().unwrap(), ValueKind::Text);
        assert_eq!("Array".parse::<ValueKind>().unwrap(), ValueKind::List);
        assert_eq!("int".parse::<ValueKind>().unwrap(), ValueKind::Integer);
        assert!("tuple".parse::<ValueKind>().is_err());
    }

    #[test]
    fn test_null_is_always_opaque() {
        let set = OpaqueTypeSet::new([]);
        assert!(set.contains(ValueKind::Null));
        assert!(!set.contains(ValueKind::Text));
    }

    #[test]
    fn test_from_json_tags_leaves() {
        let tree = FieldValue::from_json(
            json!({"f1": {"f2": 3, "f3": "s"}, "f4": [1, 2, 3]}),
            &OpaqueTypeSet::default(),
        )
        .unwrap();

        assert!(tree.is_container());
        let f1 = tree.get("f1").unwrap();
        assert!(f1.is_container());
        assert!(f1.get("f2").unwrap().is_opaque());
        let f4 = tree.get("f4").unwrap();
        assert!(f4.is_opaque());
        assert_eq!(f4.kind(), ValueKind::List);
        assert_eq!(tree.leaf_count(), 3);
    }

    #[test]
    fn test_list_of_objects_is_opaque() {
        let tree = FieldValue::from_json(
            json!({"rows": [{"id": 1}, {"id": 2}]}),
            &OpaqueTypeSet::default(),
        )
        .unwrap();
        assert!(tree.get("rows").unwrap().is_opaque());
    }

    #[test]
    fn test_object_kind_can_be_opaque() {
        let opaque = OpaqueTypeSet::default().with_kind(ValueKind::Object);
        let tree = FieldValue::from_json(json!({"a": {"b": 1}}), &opaque).unwrap();
        assert!(tree.is_container());
        let a = tree.get("a").unwrap();
        assert!(a.is_opaque());
        assert_eq!(a.kind(), ValueKind::Object);
        assert_eq!(tree.to_json(), json!({"a": {"b": 1}}));
    }

    #[test]
    fn test_unsupported_kind_is_rejected() {
        let err = FieldValue::from_json(
            json!({"outer": {"tags": ["a", "b"]}}),
            &OpaqueTypeSet::scalars(),
        )
        .unwrap_err();

        match err {
            MappingError::UnsupportedValue { path, kind } => {
                assert_eq!(path, Path::from(["outer", "tags"]));
                assert_eq!(kind, ValueKind::List);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_json_round_trip_keeps_order() {
        let source = json!({"z": 1, "a": {"y": null, "b": "x"}, "m": [1]});
        let tree = FieldValue::from_json(source.clone(), &OpaqueTypeSet::default()).unwrap();

        let back = tree.to_json();
        assert_eq!(back, source);
        let keys: Vec<&String> = back.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);

        let rendered = serde_json::to_string(&tree).unwrap();
        assert_eq!(rendered, r#"{"z":1,"a":{"y":null,"b":"x"},"m":[1]}"#);
    }

    #[test]
    fn test_instantiate_is_independent() {
        let skeleton =
            FieldValue::from_json(json!({"a": {"b": null}}), &OpaqueTypeSet::default()).unwrap();
        let mut copy = skeleton.instantiate();

        copy.as_container_mut()
            .unwrap()
            .insert("c".to_string(), FieldValue::opaque(json!(1)));

        assert_eq!(skeleton.to_json(), json!({"a": {"b": null}}));
        assert_eq!(copy.to_json(), json!({"a": {"b": null}, "c": 1}));
    }
}
