//! Structural diff between two specification documents
//!
//! The walk is plain structural recursion: paths, then methods, then the
//! parameters, request body, responses and summary of each shared
//! operation, followed by components, info and servers. Key unions are
//! sorted, so the emitted list is fully determined by the inputs.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};
use tracing::debug;

use super::types::{DiffSummary, Impact, SpecDifference};
use crate::document::{
    COMPONENT_KINDS, DIFF_METHODS, INFO_FIELDS, SpecDocument, as_object, declared_type,
    is_required, parameter_location, parameter_name, parameters,
};

/// Confidence attached to component changes detected only by deep equality
pub const COMPONENT_MODIFIED_CONFIDENCE: f64 = 0.8;

/// Computes classified differences between two documents
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffEngine;

impl DiffEngine {
    /// Create a new diff engine
    pub fn new() -> Self {
        Self
    }

    /// Compare `old` against `new`
    pub fn diff(&self, old: &SpecDocument, new: &SpecDocument) -> Vec<SpecDifference> {
        debug!(
            old_paths = old.paths().len(),
            new_paths = new.paths().len(),
            "Diffing specification documents"
        );

        let mut differences = Vec::new();
        diff_paths(old, new, &mut differences);
        diff_components(old, new, &mut differences);
        diff_info(old.info(), new.info(), &mut differences);
        diff_servers(old.servers(), new.servers(), &mut differences);

        debug!(differences = differences.len(), "Diff complete");
        differences
    }

    /// Reduce a difference list to per-type and per-impact counts
    pub fn summarize(&self, differences: &[SpecDifference]) -> DiffSummary {
        DiffSummary::from_differences(differences)
    }
}

fn key_union<'a>(old: &'a Map<String, Value>, new: &'a Map<String, Value>) -> BTreeSet<&'a str> {
    old.keys().chain(new.keys()).map(String::as_str).collect()
}

fn diff_paths(old: &SpecDocument, new: &SpecDocument, out: &mut Vec<SpecDifference>) {
    let (old_paths, new_paths) = (old.paths(), new.paths());

    for path in key_union(old_paths, new_paths) {
        let address = format!("paths.{}", path);
        match (old_paths.get(path), new_paths.get(path)) {
            (None, Some(item)) => out.push(
                SpecDifference::added(address, item.clone(), Impact::Enhancement)
                    .with_description(format!("New endpoint {} added", path)),
            ),
            (Some(item), None) => out.push(
                SpecDifference::removed(address, item.clone(), Impact::Breaking)
                    .with_description(format!("Endpoint {} removed", path)),
            ),
            (Some(old_item), Some(new_item)) => {
                diff_methods(&address, path, old_item, new_item, out)
            }
            (None, None) => {}
        }
    }
}

fn diff_methods(
    address: &str,
    path: &str,
    old_item: &Value,
    new_item: &Value,
    out: &mut Vec<SpecDifference>,
) {
    let (old_item, new_item) = (as_object(Some(old_item)), as_object(Some(new_item)));

    for method in DIFF_METHODS {
        let method_address = format!("{}.{}", address, method);
        let label = format!("{} {}", method.to_uppercase(), path);
        match (old_item.get(method), new_item.get(method)) {
            (None, Some(op)) => out.push(
                SpecDifference::added(method_address, op.clone(), Impact::Enhancement)
                    .with_description(format!("New operation {} added", label)),
            ),
            (Some(op), None) => out.push(
                SpecDifference::removed(method_address, op.clone(), Impact::Breaking)
                    .with_description(format!("Operation {} removed", label)),
            ),
            (Some(old_op), Some(new_op)) => {
                diff_parameters(&method_address, old_op, new_op, out);
                diff_request_body(&method_address, old_op, new_op, out);
                diff_responses(&method_address, old_op, new_op, out);
                diff_summary(&method_address, old_op, new_op, out);
            }
            (None, None) => {}
        }
    }
}

type ParameterIndex<'a> = BTreeMap<(&'a str, &'a str), &'a Map<String, Value>>;

/// Index parameters by (location, name); the first declaration wins
///
/// Unresolved `$ref` parameters are keyed by their reference string under a
/// `$ref` location, so distinct references stay distinct.
fn index_parameters(operation: &Value) -> ParameterIndex<'_> {
    let mut index = BTreeMap::new();
    for param in parameters(operation) {
        let key = match param.get("$ref").and_then(Value::as_str) {
            Some(reference) => ("$ref", reference),
            None => (
                parameter_location(param).unwrap_or("unknown"),
                parameter_name(param),
            ),
        };
        index.entry(key).or_insert(param);
    }
    index
}

fn diff_parameters(address: &str, old_op: &Value, new_op: &Value, out: &mut Vec<SpecDifference>) {
    let old_params = index_parameters(old_op);
    let new_params = index_parameters(new_op);
    let keys: BTreeSet<_> = old_params.keys().chain(new_params.keys()).copied().collect();

    for key in keys {
        let (location, name) = key;
        let param_address = format!("{}.parameters.{}.{}", address, location, name);
        match (old_params.get(&key), new_params.get(&key)) {
            (None, Some(param)) => {
                let required = is_required(param);
                let (impact, kind) = if required {
                    (Impact::Breaking, "Required")
                } else {
                    (Impact::NonBreaking, "Optional")
                };
                out.push(
                    SpecDifference::added(param_address, Value::Object((*param).clone()), impact)
                        .with_description(format!(
                            "{} parameter '{}' ({}) added",
                            kind, name, location
                        )),
                );
            }
            (Some(param), None) => out.push(
                SpecDifference::removed(
                    param_address,
                    Value::Object((*param).clone()),
                    Impact::Breaking,
                )
                .with_description(format!("Parameter '{}' ({}) removed", name, location)),
            ),
            (Some(old_param), Some(new_param)) => {
                let (was_required, now_required) = (is_required(old_param), is_required(new_param));
                if was_required != now_required {
                    let impact = if now_required {
                        Impact::Breaking
                    } else {
                        Impact::NonBreaking
                    };
                    out.push(
                        SpecDifference::modified(
                            format!("{}.required", param_address),
                            Value::Bool(was_required),
                            Value::Bool(now_required),
                            impact,
                        )
                        .with_description(format!(
                            "Parameter '{}' ({}) is now {}",
                            name,
                            location,
                            if now_required { "required" } else { "optional" }
                        )),
                    );
                }

                let (old_type, new_type) = (declared_type(old_param), declared_type(new_param));
                if old_type != new_type {
                    out.push(
                        SpecDifference::modified(
                            format!("{}.type", param_address),
                            old_type.map(Value::from).unwrap_or(Value::Null),
                            new_type.map(Value::from).unwrap_or(Value::Null),
                            Impact::Breaking,
                        )
                        .with_description(format!(
                            "Parameter '{}' ({}) type changed from {} to {}",
                            name,
                            location,
                            old_type.unwrap_or("unknown"),
                            new_type.unwrap_or("unknown")
                        )),
                    );
                }
            }
            (None, None) => {}
        }
    }
}

fn request_body(operation: &Value) -> Option<&Value> {
    operation.get("requestBody").filter(|body| !body.is_null())
}

fn diff_request_body(
    address: &str,
    old_op: &Value,
    new_op: &Value,
    out: &mut Vec<SpecDifference>,
) {
    let body_address = format!("{}.requestBody", address);
    match (request_body(old_op), request_body(new_op)) {
        (None, Some(body)) => out.push(
            SpecDifference::added(body_address, body.clone(), Impact::Breaking)
                .with_description("Request body added"),
        ),
        (Some(body), None) => out.push(
            SpecDifference::removed(body_address, body.clone(), Impact::Breaking)
                .with_description("Request body removed"),
        ),
        (Some(old_body), Some(new_body)) => {
            let was_required = is_required(as_object(Some(old_body)));
            let now_required = is_required(as_object(Some(new_body)));
            if was_required != now_required {
                let impact = if now_required {
                    Impact::Breaking
                } else {
                    Impact::NonBreaking
                };
                out.push(
                    SpecDifference::modified(
                        format!("{}.required", body_address),
                        Value::Bool(was_required),
                        Value::Bool(now_required),
                        impact,
                    )
                    .with_description(format!(
                        "Request body is now {}",
                        if now_required { "required" } else { "optional" }
                    )),
                );
            }
        }
        (None, None) => {}
    }
}

fn diff_responses(address: &str, old_op: &Value, new_op: &Value, out: &mut Vec<SpecDifference>) {
    let old_responses = as_object(old_op.get("responses"));
    let new_responses = as_object(new_op.get("responses"));

    for code in key_union(old_responses, new_responses) {
        let response_address = format!("{}.responses.{}", address, code);
        match (old_responses.get(code), new_responses.get(code)) {
            (None, Some(response)) => out.push(
                SpecDifference::added(response_address, response.clone(), Impact::Enhancement)
                    .with_description(format!("Response {} added", code)),
            ),
            (Some(response), None) => out.push(
                SpecDifference::removed(response_address, response.clone(), Impact::Breaking)
                    .with_description(format!("Response {} removed", code)),
            ),
            _ => {}
        }
    }
}

fn diff_summary(address: &str, old_op: &Value, new_op: &Value, out: &mut Vec<SpecDifference>) {
    let (old_summary, new_summary) = (old_op.get("summary"), new_op.get("summary"));
    if old_summary != new_summary {
        out.push(
            SpecDifference::modified(
                format!("{}.summary", address),
                old_summary.cloned().unwrap_or(Value::Null),
                new_summary.cloned().unwrap_or(Value::Null),
                Impact::NonBreaking,
            )
            .with_description("Operation summary changed"),
        );
    }
}

fn diff_components(old: &SpecDocument, new: &SpecDocument, out: &mut Vec<SpecDifference>) {
    for kind in COMPONENT_KINDS {
        let (old_components, new_components) = (old.components(kind), new.components(kind));

        for name in key_union(old_components, new_components) {
            let address = format!("components.{}.{}", kind, name);
            match (old_components.get(name), new_components.get(name)) {
                (None, Some(component)) => out.push(
                    SpecDifference::added(address, component.clone(), Impact::Enhancement)
                        .with_description(format!("Component {}/{} added", kind, name)),
                ),
                (Some(component), None) => out.push(
                    SpecDifference::removed(address, component.clone(), Impact::Breaking)
                        .with_description(format!("Component {}/{} removed", kind, name)),
                ),
                (Some(old_component), Some(new_component)) if old_component != new_component => {
                    out.push(
                        SpecDifference::modified(
                            address,
                            old_component.clone(),
                            new_component.clone(),
                            Impact::Breaking,
                        )
                        .with_description(format!("Component {}/{} modified", kind, name))
                        .with_confidence(COMPONENT_MODIFIED_CONFIDENCE),
                    )
                }
                _ => {}
            }
        }
    }
}

fn diff_info(
    old_info: &Map<String, Value>,
    new_info: &Map<String, Value>,
    out: &mut Vec<SpecDifference>,
) {
    for field in INFO_FIELDS {
        let (old_value, new_value) = (old_info.get(field), new_info.get(field));
        if old_value != new_value {
            out.push(
                SpecDifference::modified(
                    format!("info.{}", field),
                    old_value.cloned().unwrap_or(Value::Null),
                    new_value.cloned().unwrap_or(Value::Null),
                    Impact::NonBreaking,
                )
                .with_description(format!("API {} changed", field)),
            );
        }
    }
}

fn diff_servers(old_servers: &[Value], new_servers: &[Value], out: &mut Vec<SpecDifference>) {
    if old_servers.len() != new_servers.len() {
        out.push(
            SpecDifference::modified(
                "servers",
                Value::Array(old_servers.to_vec()),
                Value::Array(new_servers.to_vec()),
                Impact::Breaking,
            )
            .with_description(format!(
                "Server count changed from {} to {}",
                old_servers.len(),
                new_servers.len()
            )),
        );
    }
}
