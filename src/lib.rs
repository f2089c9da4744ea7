//! API Migration Core - comparison and field mapping for API specifications
//!
//! Provides:
//! - Tolerant access to OpenAPI-style documents (JSON or YAML)
//! - Confidence scoring for names and path templates
//! - A classified structural diff (breaking, non-breaking, enhancement)
//! - Field-mapping inference between matched endpoints
//! - JSON and Markdown report rendering
//!
//! The engine is pure and synchronous: it performs no I/O and keeps no
//! state between calls.

pub mod comparison;
pub mod diff;
pub mod document;
pub mod error;
pub mod mapping;
pub mod report;
pub mod scoring;

// Re-export commonly used types
pub use comparison::{ComparisonReport, compare, compare_documents, compare_str, compare_with_config};
pub use diff::{DiffEngine, DiffSummary, DiffType, Impact, SpecDifference, diff_documents};
pub use document::SpecDocument;
pub use error::{DocumentSide, SpecError, SpecResult};
pub use mapping::{
    FieldMapping, FieldOverride, MappingAggregator, MappingConfig, MappingGroup, MappingType,
    PathMatch, PathMatcher, SchemaFieldMatcher, generate_mappings,
};
pub use report::{ReportFormat, render_report};
pub use scoring::{levenshtein_distance, path_similarity, string_similarity};
