//! Structural comparison of two specification documents
//!
//! This module provides functionality to:
//! - Walk paths, operations, parameters, request bodies and responses
//! - Compare components, info and servers
//! - Classify each difference as breaking, non-breaking or an enhancement
//! - Summarize a difference list by type and impact
//!
//! # Example
//!
//! ```rust,ignore
//! use api_migration_core::diff::diff_documents;
//! use api_migration_core::{DocumentSide, SpecDocument};
//! use serde_json::json;
//!
//! let old = SpecDocument::from_value(json!({"paths": {"/pay": {}}}), DocumentSide::Old)?;
//! let new = SpecDocument::from_value(json!({"paths": {}}), DocumentSide::New)?;
//!
//! let (differences, summary) = diff_documents(&old, &new);
//! assert_eq!(summary.breaking_count, 1);
//! ```

mod engine;
mod types;

pub use engine::{COMPONENT_MODIFIED_CONFIDENCE, DiffEngine};
pub use types::{DiffSummary, DiffType, Impact, SpecDifference};

use crate::document::SpecDocument;

/// Diff two documents and summarize the result
pub fn diff_documents(
    old: &SpecDocument,
    new: &SpecDocument,
) -> (Vec<SpecDifference>, DiffSummary) {
    let engine = DiffEngine::new();
    let differences = engine.diff(old, new);
    let summary = engine.summarize(&differences);
    (differences, summary)
}
