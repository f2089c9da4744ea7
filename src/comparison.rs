//! One-call comparison of two specification documents

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::diff::{DiffEngine, DiffSummary, SpecDifference};
use crate::document::SpecDocument;
use crate::error::{DocumentSide, SpecResult};
use crate::mapping::{MappingAggregator, MappingConfig, MappingGroup};

/// Combined result of diffing and field-mapping two documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    /// Classified structural differences, in walk order
    pub differences: Vec<SpecDifference>,
    /// Counts by type and impact
    pub summary: DiffSummary,
    /// One group per matched endpoint pair, including empty groups
    pub mappings: Vec<MappingGroup>,
}

impl ComparisonReport {
    /// Whether any difference is breaking
    pub fn has_breaking_changes(&self) -> bool {
        self.summary.has_breaking_changes()
    }

    /// Breaking differences, in walk order
    pub fn breaking_changes(&self) -> impl Iterator<Item = &SpecDifference> {
        self.differences.iter().filter(|d| d.is_breaking())
    }

    /// Mapping groups that carry at least one mapping
    pub fn actionable_mappings(&self) -> impl Iterator<Item = &MappingGroup> {
        self.mappings.iter().filter(|g| !g.is_empty())
    }
}

/// Compare two decoded documents with default mapping configuration
pub fn compare(old: &Value, new: &Value) -> SpecResult<ComparisonReport> {
    compare_with_config(old, new, MappingConfig::default())
}

/// Compare two decoded documents
///
/// Fails with a malformed-input error naming the offending side when either
/// value is not an object. The old side is checked first. An out-of-range
/// configuration fails with [`crate::SpecError::Config`] before either side is read.
pub fn compare_with_config(
    old: &Value,
    new: &Value,
    config: MappingConfig,
) -> SpecResult<ComparisonReport> {
    let config = config.validate()?;
    let old = SpecDocument::from_ref(old, DocumentSide::Old)?;
    let new = SpecDocument::from_ref(new, DocumentSide::New)?;
    compare_documents(&old, &new, config)
}

/// Parse two JSON or YAML texts and compare them
pub fn compare_str(
    old: &str,
    new: &str,
    config: MappingConfig,
) -> SpecResult<ComparisonReport> {
    let config = config.validate()?;
    let old = SpecDocument::parse(old, DocumentSide::Old)?;
    let new = SpecDocument::parse(new, DocumentSide::New)?;
    compare_documents(&old, &new, config)
}

/// Compare two already-validated documents
///
/// The configuration is validated here as well, so callers that assemble a
/// [`MappingConfig`] by hand or through serde get the same range checks.
pub fn compare_documents(
    old: &SpecDocument,
    new: &SpecDocument,
    config: MappingConfig,
) -> SpecResult<ComparisonReport> {
    let config = config.validate()?;
    debug!(
        old_paths = old.paths().len(),
        new_paths = new.paths().len(),
        "Comparing documents"
    );

    let engine = DiffEngine::new();
    let differences = engine.diff(old, new);
    let summary = engine.summarize(&differences);
    let mappings = MappingAggregator::with_config(config).generate_mappings(old, new);

    info!(
        differences = summary.total_differences,
        breaking = summary.breaking_count,
        mapping_groups = mappings.len(),
        "Comparison complete"
    );

    Ok(ComparisonReport {
        differences,
        summary,
        mappings,
    })
}
