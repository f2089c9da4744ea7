//! Coercion hints for mapped fields whose declared types differ

use super::types::UNKNOWN_TYPE;

/// Canonical coercion hints, keyed by (source type, target type)
const COERCION_HINTS: &[((&str, &str), &str)] = &[
    (("string", "integer"), "Parse the string as an integer (e.g. parseInt)"),
    (("string", "number"), "Parse the string as a decimal number (e.g. parseFloat)"),
    (("string", "boolean"), "Convert \"true\"/\"false\" strings to a boolean"),
    (("string", "array"), "Split the string into an array (e.g. on ',')"),
    (("integer", "string"), "Format the integer as a string"),
    (("integer", "number"), "Widen the integer to a number"),
    (("integer", "boolean"), "Treat non-zero as true"),
    (("number", "string"), "Format the number as a string"),
    (("number", "integer"), "Round or truncate the number to an integer"),
    (("boolean", "string"), "Format the boolean as \"true\"/\"false\""),
    (("boolean", "integer"), "Convert true/false to 1/0"),
    (("array", "string"), "Join the array elements into a string"),
    (("object", "string"), "Serialize the object as a JSON string"),
];

fn is_unknown(type_name: &str) -> bool {
    type_name.is_empty() || type_name == UNKNOWN_TYPE
}

/// Suggest how to convert a value from `source_type` to `target_type`
///
/// Returns `None` when the types are equal or either is unknown.
pub fn transformation_rule(source_type: &str, target_type: &str) -> Option<String> {
    if source_type == target_type || is_unknown(source_type) || is_unknown(target_type) {
        return None;
    }

    let hint = COERCION_HINTS
        .iter()
        .find(|((from, to), _)| *from == source_type && *to == target_type)
        .map(|(_, hint)| hint.to_string());

    Some(hint.unwrap_or_else(|| {
        format!(
            "manual conversion required from {} to {}",
            source_type, target_type
        )
    }))
}
