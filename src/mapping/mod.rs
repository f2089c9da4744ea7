//! Field-mapping inference between two versions of an API
//!
//! This module provides functionality to:
//! - Pair endpoint paths of the old document with the new one
//! - Match parameters and request/response schema properties
//! - Flag type mismatches and suggest coercions
//! - Apply user-supplied overrides
//!
//! # Example
//!
//! ```rust,ignore
//! use api_migration_core::mapping::{MappingAggregator, MappingConfig};
//! use api_migration_core::{DocumentSide, SpecDocument};
//! use serde_json::json;
//!
//! let old = SpecDocument::from_value(json!({"paths": {"/v1/pay": {}}}), DocumentSide::Old)?;
//! let new = SpecDocument::from_value(json!({"paths": {"/v1/payments": {}}}), DocumentSide::New)?;
//!
//! let aggregator = MappingAggregator::with_config(MappingConfig::new().with_field_threshold(0.6));
//! for group in aggregator.actionable_groups(&old, &new) {
//!     println!("{} -> {} ({:.0}%)", group.endpoint, group.target_endpoint, group.confidence * 100.0);
//! }
//! ```

mod aggregator;
mod config;
mod matcher;
mod paths;
mod transform;
mod types;

pub use aggregator::MappingAggregator;
pub use config::{FieldOverride, MappingConfig};
pub use matcher::{FieldMatchOutcome, FieldMatchingStrategy, FieldScope, SchemaFieldMatcher};
pub use paths::{PathMatcher, PathMatchingStrategy};
pub use transform::transformation_rule;
pub use types::{
    EXACT_GROUP_THRESHOLD, FieldMapping, MappingGroup, MappingType, PathMatch, SIMILAR_THRESHOLD,
    UNKNOWN_TYPE, UnmappedField, mean_confidence,
};

use crate::document::SpecDocument;

/// Infer mapping groups between two documents with default configuration
pub fn generate_mappings(old: &SpecDocument, new: &SpecDocument) -> Vec<MappingGroup> {
    MappingAggregator::new().generate_mappings(old, new)
}
