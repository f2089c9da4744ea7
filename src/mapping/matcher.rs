//! Field matching algorithms for endpoint pairs
//!
//! Parameters and schema properties are matched by name similarity plus
//! small bonuses for agreeing metadata. Every source field independently
//! picks its best candidate, so one target may be chosen by several sources.

use serde_json::{Map, Value};
use tracing::trace;

use super::config::MappingConfig;
use super::transform::transformation_rule;
use super::types::{FieldMapping, MappingType, UnmappedField};
use crate::document::{as_object, declared_type, parameter_location, parameter_name};
use crate::scoring::{clamp_confidence, string_similarity};

/// Parameter locations that earn the location bonus when shared
const BONUS_LOCATIONS: [&str; 3] = ["query", "path", "header"];

/// Where the fields being matched live in each document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldScope<'a> {
    /// Source endpoint path template (used to look up overrides)
    pub endpoint: &'a str,
    /// Address prefix for source fields (e.g. `/pay.get.parameters`)
    pub source_base: String,
    /// Address prefix for target fields
    pub target_base: String,
}

impl<'a> FieldScope<'a> {
    /// Create a new scope
    pub fn new(
        endpoint: &'a str,
        source_base: impl Into<String>,
        target_base: impl Into<String>,
    ) -> Self {
        Self {
            endpoint,
            source_base: source_base.into(),
            target_base: target_base.into(),
        }
    }
}

/// Mappings and diagnostics produced for one set of fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMatchOutcome {
    /// Accepted mappings, in source field order
    pub mappings: Vec<FieldMapping>,
    /// Rejected source fields (only collected with `report_unmapped`)
    pub unmapped: Vec<UnmappedField>,
}

impl FieldMatchOutcome {
    /// Append another outcome
    pub fn extend(&mut self, other: FieldMatchOutcome) {
        self.mappings.extend(other.mappings);
        self.unmapped.extend(other.unmapped);
    }
}

/// Strategy for matching fields within a matched endpoint pair
pub trait FieldMatchingStrategy {
    /// Map the parameters of a source operation onto a target operation
    fn map_parameters(
        &self,
        scope: &FieldScope<'_>,
        source: &[&Map<String, Value>],
        target: &[&Map<String, Value>],
    ) -> FieldMatchOutcome;

    /// Map the properties of a source schema onto a target schema
    fn map_schema_fields(
        &self,
        scope: &FieldScope<'_>,
        source: &Value,
        target: &Value,
    ) -> FieldMatchOutcome;
}

/// Name/type similarity matcher for parameters and schema properties
#[derive(Debug, Clone, Default)]
pub struct SchemaFieldMatcher {
    config: MappingConfig,
}

impl SchemaFieldMatcher {
    /// Create a new matcher with default config
    pub fn new() -> Self {
        Self {
            config: MappingConfig::default(),
        }
    }

    /// Create a matcher with custom config
    pub fn with_config(config: MappingConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &MappingConfig {
        &self.config
    }

    /// Score a parameter against a candidate
    pub fn score_parameter(
        &self,
        param: &Map<String, Value>,
        candidate: &Map<String, Value>,
    ) -> f64 {
        let mut confidence = name_score(parameter_name(param), parameter_name(candidate));

        let location = parameter_location(param);
        if same_declared(location, parameter_location(candidate))
            && location.is_some_and(|l| BONUS_LOCATIONS.contains(&l))
        {
            confidence += self.config.location_bonus;
        }
        if same_declared(declared_type(param), declared_type(candidate)) {
            confidence += self.config.parameter_type_bonus;
        }

        clamp_confidence(confidence)
    }

    /// Best candidate for a parameter regardless of threshold
    ///
    /// Ties keep the earliest candidate.
    pub fn best_parameter<'a>(
        &self,
        param: &Map<String, Value>,
        candidates: &[&'a Map<String, Value>],
    ) -> Option<(&'a Map<String, Value>, f64)> {
        let mut best: Option<(&'a Map<String, Value>, f64)> = None;
        for candidate in candidates {
            let confidence = self.score_parameter(param, candidate);
            if best.is_none_or(|(_, best_confidence)| confidence > best_confidence) {
                best = Some((*candidate, confidence));
            }
        }
        best
    }

    /// Best candidate for a parameter if it clears the parameter threshold
    pub fn match_parameter<'a>(
        &self,
        param: &Map<String, Value>,
        candidates: &[&'a Map<String, Value>],
    ) -> Option<(&'a Map<String, Value>, f64)> {
        self.best_parameter(param, candidates)
            .filter(|(_, confidence)| *confidence > self.config.parameter_threshold)
    }

    /// Score a schema property against a candidate property
    pub fn score_field(
        &self,
        field_name: &str,
        property: &Value,
        candidate_name: &str,
        candidate: &Value,
    ) -> f64 {
        let mut confidence = name_score(field_name, candidate_name);

        if same_declared(property_str(property, "type"), property_str(candidate, "type")) {
            confidence += self.config.field_type_bonus;
        }
        if same_declared(
            property_str(property, "format"),
            property_str(candidate, "format"),
        ) {
            confidence += self.config.format_bonus;
        }

        clamp_confidence(confidence)
    }

    /// Best candidate property regardless of threshold
    pub fn best_field<'a>(
        &self,
        field_name: &str,
        property: &Value,
        candidates: &'a Map<String, Value>,
    ) -> Option<(&'a str, &'a Value, f64)> {
        let mut best: Option<(&'a str, &'a Value, f64)> = None;
        for (candidate_name, candidate) in candidates {
            let confidence = self.score_field(field_name, property, candidate_name, candidate);
            if best.is_none_or(|(_, _, best_confidence)| confidence > best_confidence) {
                best = Some((candidate_name.as_str(), candidate, confidence));
            }
        }
        best
    }

    /// Best candidate property if it clears the field threshold
    pub fn match_field<'a>(
        &self,
        field_name: &str,
        property: &Value,
        candidates: &'a Map<String, Value>,
    ) -> Option<(&'a str, &'a Value, f64)> {
        self.best_field(field_name, property, candidates)
            .filter(|(_, _, confidence)| *confidence > self.config.field_threshold)
    }

    fn unmapped(
        &self,
        scope: &FieldScope<'_>,
        source_field: &str,
        best: Option<(&str, f64)>,
        outcome: &mut FieldMatchOutcome,
    ) {
        trace!(
            endpoint = scope.endpoint,
            source_field,
            best_confidence = best.map(|(_, c)| c).unwrap_or(0.0),
            "No candidate cleared the acceptance threshold"
        );
        if self.config.report_unmapped {
            outcome.unmapped.push(UnmappedField {
                source_path: format!("{}.{}", scope.source_base, source_field),
                source_field: source_field.to_string(),
                best_candidate: best.map(|(name, _)| name.to_string()),
                best_confidence: best.map(|(_, c)| c).unwrap_or(0.0),
            });
        }
    }
}

impl FieldMatchingStrategy for SchemaFieldMatcher {
    fn map_parameters(
        &self,
        scope: &FieldScope<'_>,
        source: &[&Map<String, Value>],
        target: &[&Map<String, Value>],
    ) -> FieldMatchOutcome {
        let mut outcome = FieldMatchOutcome::default();

        for param in source {
            let name = parameter_name(param);

            let manual = self
                .config
                .override_for(scope.endpoint, name)
                .and_then(|target_name| {
                    target
                        .iter()
                        .find(|candidate| parameter_name(candidate) == target_name)
                });
            if let Some(candidate) = manual {
                outcome.mappings.push(build_mapping(
                    scope,
                    name,
                    parameter_name(candidate),
                    declared_type(param),
                    declared_type(candidate),
                    1.0,
                    MappingType::Manual,
                ));
                continue;
            }

            let best = self.best_parameter(param, target);
            match best {
                Some((candidate, confidence)) if confidence > self.config.parameter_threshold => {
                    let target_name = parameter_name(candidate);
                    outcome.mappings.push(build_mapping(
                        scope,
                        name,
                        target_name,
                        declared_type(param),
                        declared_type(candidate),
                        confidence,
                        MappingType::classify(name == target_name, confidence),
                    ));
                }
                _ => self.unmapped(
                    scope,
                    name,
                    best.map(|(candidate, confidence)| (parameter_name(candidate), confidence)),
                    &mut outcome,
                ),
            }
        }

        outcome
    }

    fn map_schema_fields(
        &self,
        scope: &FieldScope<'_>,
        source: &Value,
        target: &Value,
    ) -> FieldMatchOutcome {
        let mut outcome = FieldMatchOutcome::default();

        let (Some(source_props), Some(target_props)) = (
            source.get("properties").and_then(Value::as_object),
            target.get("properties").and_then(Value::as_object),
        ) else {
            return outcome;
        };

        for (name, property) in source_props {
            let manual = self
                .config
                .override_for(scope.endpoint, name)
                .and_then(|target_name| target_props.get_key_value(target_name));
            if let Some((target_name, candidate)) = manual {
                outcome.mappings.push(build_mapping(
                    scope,
                    name,
                    target_name,
                    property_str(property, "type"),
                    property_str(candidate, "type"),
                    1.0,
                    MappingType::Manual,
                ));
                continue;
            }

            let best = self.best_field(name, property, target_props);
            match best {
                Some((target_name, candidate, confidence))
                    if confidence > self.config.field_threshold =>
                {
                    outcome.mappings.push(build_mapping(
                        scope,
                        name,
                        target_name,
                        property_str(property, "type"),
                        property_str(candidate, "type"),
                        confidence,
                        MappingType::classify(name == target_name, confidence),
                    ));
                }
                _ => self.unmapped(
                    scope,
                    name,
                    best.map(|(target_name, _, confidence)| (target_name, confidence)),
                    &mut outcome,
                ),
            }
        }

        outcome
    }
}

fn name_score(a: &str, b: &str) -> f64 {
    if a == b { 1.0 } else { string_similarity(a, b) }
}

fn same_declared(a: Option<&str>, b: Option<&str>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a == b)
}

fn property_str<'a>(property: &'a Value, key: &str) -> Option<&'a str> {
    as_object(Some(property)).get(key).and_then(Value::as_str)
}

fn build_mapping(
    scope: &FieldScope<'_>,
    source_field: &str,
    target_field: &str,
    source_type: Option<&str>,
    target_type: Option<&str>,
    confidence: f64,
    mapping_type: MappingType,
) -> FieldMapping {
    let mapping = FieldMapping::new(
        format!("{}.{}", scope.source_base, source_field),
        format!("{}.{}", scope.target_base, target_field),
        source_field,
        target_field,
    )
    .with_types(source_type, target_type)
    .with_confidence(confidence)
    .with_mapping_type(mapping_type);

    let rule = transformation_rule(&mapping.source_type, &mapping.target_type);
    mapping.with_transformation_rule(rule)
}
