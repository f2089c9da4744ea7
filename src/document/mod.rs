//! Tolerant access to API specification documents
//!
//! Specification documents are untyped, arbitrarily nested key-value trees.
//! Rather than deserializing them into fixed records, the engine keeps the
//! `serde_json::Value` tree and reads it through the helpers in this module.
//! Every accessor treats an absent (or wrongly typed) collection as empty, so
//! partial real-world documents always compare cleanly.
//!
//! The only hard failure is a top-level value that is not an object.

use once_cell::sync::Lazy;
use serde_json::{Map, Value};

use crate::error::{DocumentSide, SpecError, SpecResult};

/// HTTP methods walked by the diff engine
pub const DIFF_METHODS: [&str; 8] = [
    "get", "post", "put", "delete", "patch", "options", "head", "trace",
];

/// HTTP methods considered when inferring field mappings
pub const MAPPING_METHODS: [&str; 5] = ["get", "post", "put", "delete", "patch"];

/// Response status codes whose bodies are field-mapped
pub const SUCCESS_CODES: [&str; 4] = ["200", "201", "202", "204"];

/// Media types searched for a schema, highest priority first
pub const CONTENT_TYPE_PRIORITY: [&str; 3] = ["application/json", "application/xml", "text/plain"];

/// Named collections under `components`
pub const COMPONENT_KINDS: [&str; 7] = [
    "schemas",
    "responses",
    "parameters",
    "examples",
    "requestBodies",
    "headers",
    "securitySchemes",
];

/// Scalar fields compared under `info`
pub const INFO_FIELDS: [&str; 3] = ["title", "version", "description"];

static EMPTY_OBJECT: Lazy<Map<String, Value>> = Lazy::new(Map::new);
static EMPTY_ARRAY: Vec<Value> = Vec::new();

/// View a value as an object, defaulting to an empty one
pub fn as_object(value: Option<&Value>) -> &Map<String, Value> {
    match value {
        Some(Value::Object(map)) => map,
        _ => &*EMPTY_OBJECT,
    }
}

/// View a value as an array, defaulting to an empty slice
pub fn as_array(value: Option<&Value>) -> &[Value] {
    match value {
        Some(Value::Array(items)) => items,
        _ => EMPTY_ARRAY.as_slice(),
    }
}

/// JSON type name of a value, used in diagnostics
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// An immutable specification document
#[derive(Debug, Clone, PartialEq)]
pub struct SpecDocument {
    root: Map<String, Value>,
}

impl SpecDocument {
    /// Wrap an already-decoded value
    ///
    /// Fails with [`SpecError::MalformedInput`] when the value is not an object.
    pub fn from_value(value: Value, side: DocumentSide) -> SpecResult<Self> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(SpecError::malformed(
                side,
                format!(
                    "expected an object at the top level, found {}",
                    type_name(&other)
                ),
            )),
        }
    }

    /// Borrow-based variant of [`SpecDocument::from_value`]
    pub fn from_ref(value: &Value, side: DocumentSide) -> SpecResult<Self> {
        Self::from_value(value.clone(), side)
    }

    /// Decode JSON or YAML text into a document
    ///
    /// JSON is tried first. YAML merge keys (`<<: *anchor`) are applied, and
    /// mapping keys that are not strings (for example unquoted status codes)
    /// are converted to their string form.
    pub fn parse(content: &str, side: DocumentSide) -> SpecResult<Self> {
        if let Ok(value) = serde_json::from_str::<Value>(content) {
            return Self::from_value(value, side);
        }

        let parse_error = |e: serde_yaml::Error| SpecError::Parse {
            side,
            message: e.to_string(),
        };
        let mut yaml: serde_yaml::Value = serde_yaml::from_str(content).map_err(parse_error)?;
        yaml.apply_merge().map_err(parse_error)?;

        Self::from_value(yaml_to_json(yaml), side)
    }

    /// The raw top-level object
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Path templates mapped to their path items
    pub fn paths(&self) -> &Map<String, Value> {
        as_object(self.root.get("paths"))
    }

    /// All path templates, in document key order
    pub fn path_keys(&self) -> Vec<&str> {
        self.paths().keys().map(String::as_str).collect()
    }

    /// The path item for a template (empty when absent)
    pub fn path_item(&self, path: &str) -> &Map<String, Value> {
        as_object(self.paths().get(path))
    }

    /// The operation object for a path and lowercase method
    pub fn operation(&self, path: &str, method: &str) -> Option<&Value> {
        self.path_item(path).get(method).filter(|op| op.is_object())
    }

    /// A named collection under `components` (empty when absent)
    pub fn components(&self, kind: &str) -> &Map<String, Value> {
        as_object(as_object(self.root.get("components")).get(kind))
    }

    /// The `info` object (empty when absent)
    pub fn info(&self) -> &Map<String, Value> {
        as_object(self.root.get("info"))
    }

    /// The `servers` list (empty when absent)
    pub fn servers(&self) -> &[Value] {
        as_array(self.root.get("servers"))
    }
}

/// Parameter objects of an operation, skipping non-object entries
pub fn parameters(operation: &Value) -> Vec<&Map<String, Value>> {
    as_array(operation.get("parameters"))
        .iter()
        .filter_map(Value::as_object)
        .collect()
}

/// Parameter name (empty when absent)
pub fn parameter_name(param: &Map<String, Value>) -> &str {
    param.get("name").and_then(Value::as_str).unwrap_or("")
}

/// Parameter location (`query`, `path`, `header`, `cookie`)
pub fn parameter_location(param: &Map<String, Value>) -> Option<&str> {
    param.get("in").and_then(Value::as_str)
}

/// Declared scalar type of a parameter
///
/// Reads `schema.type`, falling back to a top-level `type`.
pub fn declared_type(param: &Map<String, Value>) -> Option<&str> {
    as_object(param.get("schema"))
        .get("type")
        .and_then(Value::as_str)
        .or_else(|| param.get("type").and_then(Value::as_str))
}

/// Value of a `required` flag (absent means `false`)
pub fn is_required(node: &Map<String, Value>) -> bool {
    node.get("required").and_then(Value::as_bool).unwrap_or(false)
}

/// Find the schema of a request body or response
///
/// Media types are searched in [`CONTENT_TYPE_PRIORITY`] order.
pub fn extract_schema(body_or_response: &Value) -> Option<&Value> {
    let content = as_object(body_or_response.get("content"));
    CONTENT_TYPE_PRIORITY
        .iter()
        .find_map(|media_type| content.get(*media_type).and_then(|m| m.get("schema")))
}

fn yaml_to_json(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => {
            Value::Array(items.into_iter().map(yaml_to_json).collect())
        }
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = Map::new();
            for (key, value) in mapping {
                map.insert(yaml_key(key), yaml_to_json(value));
            }
            Value::Object(map)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => "null".to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}
