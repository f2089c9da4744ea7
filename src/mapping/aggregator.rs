//! Assembly of field mappings into per-endpoint groups

use serde_json::Value;
use tracing::debug;

use super::config::MappingConfig;
use super::matcher::{FieldMatchOutcome, FieldMatchingStrategy, FieldScope, SchemaFieldMatcher};
use super::paths::{PathMatcher, PathMatchingStrategy};
use super::types::{MappingGroup, PathMatch};
use crate::document::{
    MAPPING_METHODS, SUCCESS_CODES, SpecDocument, as_object, extract_schema, parameters,
};

/// Runs path matching once, then field matching for every matched pair
#[derive(Debug, Clone)]
pub struct MappingAggregator<P = PathMatcher, F = SchemaFieldMatcher> {
    paths: P,
    fields: F,
}

impl MappingAggregator {
    /// Create an aggregator with default config
    pub fn new() -> Self {
        Self::with_config(MappingConfig::default())
    }

    /// Create an aggregator with custom config
    pub fn with_config(config: MappingConfig) -> Self {
        Self {
            paths: PathMatcher::with_threshold(config.path_threshold),
            fields: SchemaFieldMatcher::with_config(config),
        }
    }
}

impl Default for MappingAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, F> MappingAggregator<P, F>
where
    P: PathMatchingStrategy,
    F: FieldMatchingStrategy,
{
    /// Create an aggregator from explicit matching strategies
    pub fn with_strategies(paths: P, fields: F) -> Self {
        Self { paths, fields }
    }

    /// Build one mapping group per matched endpoint pair
    ///
    /// Groups without mappings are kept (with confidence 0); use
    /// [`MappingAggregator::actionable_groups`] to drop them.
    pub fn generate_mappings(&self, old: &SpecDocument, new: &SpecDocument) -> Vec<MappingGroup> {
        let matches = self.paths.match_paths(&old.path_keys(), &new.path_keys());
        debug!(matched_paths = matches.len(), "Matched endpoint paths");

        let groups: Vec<MappingGroup> = matches
            .iter()
            .map(|path_match| self.map_endpoint(old, new, path_match))
            .collect();

        debug!(
            groups = groups.len(),
            mappings = groups.iter().map(|g| g.mappings.len()).sum::<usize>(),
            "Field mapping complete"
        );
        groups
    }

    /// Mapping groups that carry at least one mapping
    pub fn actionable_groups(&self, old: &SpecDocument, new: &SpecDocument) -> Vec<MappingGroup> {
        self.generate_mappings(old, new)
            .into_iter()
            .filter(|group| !group.is_empty())
            .collect()
    }

    fn map_endpoint(
        &self,
        old: &SpecDocument,
        new: &SpecDocument,
        path_match: &PathMatch,
    ) -> MappingGroup {
        let shared: Vec<(&str, &Value, &Value)> = MAPPING_METHODS
            .iter()
            .filter_map(|method| {
                let old_op = old.operation(&path_match.path1, method)?;
                let new_op = new.operation(&path_match.path2, method)?;
                Some((*method, old_op, new_op))
            })
            .collect();

        let mut outcome = FieldMatchOutcome::default();
        for (method, old_op, new_op) in &shared {
            outcome.extend(self.map_operation(path_match, method, old_op, new_op));
        }

        let methods: Vec<&str> = shared.iter().map(|(method, _, _)| *method).collect();
        MappingGroup::new(path_match, &methods, outcome.mappings).with_unmapped(outcome.unmapped)
    }

    fn map_operation(
        &self,
        path_match: &PathMatch,
        method: &str,
        old_op: &Value,
        new_op: &Value,
    ) -> FieldMatchOutcome {
        let endpoint = path_match.path1.as_str();
        let source_base = format!("{}.{}", path_match.path1, method);
        let target_base = format!("{}.{}", path_match.path2, method);
        let scope = |section: &str| {
            FieldScope::new(
                endpoint,
                format!("{}.{}", source_base, section),
                format!("{}.{}", target_base, section),
            )
        };

        let mut outcome = self.fields.map_parameters(
            &scope("parameters"),
            &parameters(old_op),
            &parameters(new_op),
        );

        let old_body = old_op.get("requestBody").and_then(extract_schema);
        let new_body = new_op.get("requestBody").and_then(extract_schema);
        if let (Some(old_schema), Some(new_schema)) = (old_body, new_body) {
            outcome.extend(
                self.fields
                    .map_schema_fields(&scope("requestBody"), old_schema, new_schema),
            );
        }

        let old_responses = as_object(old_op.get("responses"));
        let new_responses = as_object(new_op.get("responses"));
        for code in SUCCESS_CODES {
            let old_schema = old_responses.get(code).and_then(extract_schema);
            let new_schema = new_responses.get(code).and_then(extract_schema);
            if let (Some(old_schema), Some(new_schema)) = (old_schema, new_schema) {
                outcome.extend(self.fields.map_schema_fields(
                    &scope(&format!("responses.{}", code)),
                    old_schema,
                    new_schema,
                ));
            }
        }

        outcome
    }
}
