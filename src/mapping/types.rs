//! Types for field-mapping results

use serde::{Deserialize, Serialize};

use crate::scoring::clamp_confidence;

/// Group confidence above which a group is an exact correspondence
pub const EXACT_GROUP_THRESHOLD: f64 = 0.9;
/// Confidence above which a mapping or group is a similar correspondence
pub const SIMILAR_THRESHOLD: f64 = 0.7;

/// How a mapping was determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingType {
    /// Identical names
    Exact,
    /// Names differ but score highly
    Similar,
    /// Accepted on a low score
    Inferred,
    /// User-supplied override
    Manual,
}

impl MappingType {
    /// Classify a scored (non-manual) match
    pub fn classify(names_equal: bool, confidence: f64) -> Self {
        if names_equal {
            MappingType::Exact
        } else if confidence > SIMILAR_THRESHOLD {
            MappingType::Similar
        } else {
            MappingType::Inferred
        }
    }
}

impl std::fmt::Display for MappingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MappingType::Exact => write!(f, "exact"),
            MappingType::Similar => write!(f, "similar"),
            MappingType::Inferred => write!(f, "inferred"),
            MappingType::Manual => write!(f, "manual"),
        }
    }
}

/// A proposed correspondence between a source and a target field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMapping {
    /// Address of the source field (e.g. `/users/{id}.get.parameters.id`)
    pub source_path: String,
    /// Address of the target field
    pub target_path: String,
    /// Source field name
    pub source_field: String,
    /// Target field name
    pub target_field: String,
    /// Declared source type (`unknown` when absent)
    pub source_type: String,
    /// Declared target type (`unknown` when absent)
    pub target_type: String,
    /// Confidence score (0.0-1.0)
    pub confidence: f64,
    /// How the mapping was determined
    pub mapping_type: MappingType,
    /// Whether the declared types differ
    pub transformation_required: bool,
    /// Coercion hint when a transformation is required
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transformation_rule: Option<String>,
}

impl FieldMapping {
    /// Create a new field mapping between two addressed fields
    pub fn new(
        source_path: impl Into<String>,
        target_path: impl Into<String>,
        source_field: impl Into<String>,
        target_field: impl Into<String>,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            target_path: target_path.into(),
            source_field: source_field.into(),
            target_field: target_field.into(),
            source_type: UNKNOWN_TYPE.to_string(),
            target_type: UNKNOWN_TYPE.to_string(),
            confidence: 1.0,
            mapping_type: MappingType::Exact,
            transformation_required: false,
            transformation_rule: None,
        }
    }

    /// Set both declared types; keeps `transformation_required` in sync
    pub fn with_types(mut self, source_type: Option<&str>, target_type: Option<&str>) -> Self {
        self.source_type = source_type.unwrap_or(UNKNOWN_TYPE).to_string();
        self.target_type = target_type.unwrap_or(UNKNOWN_TYPE).to_string();
        self.transformation_required = self.source_type != self.target_type;
        self
    }

    /// Set confidence score
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = clamp_confidence(confidence);
        self
    }

    /// Set mapping type
    pub fn with_mapping_type(mut self, mapping_type: MappingType) -> Self {
        self.mapping_type = mapping_type;
        self
    }

    /// Set the coercion hint
    pub fn with_transformation_rule(mut self, rule: Option<String>) -> Self {
        self.transformation_rule = rule;
        self
    }
}

/// Placeholder for an undeclared type
pub const UNKNOWN_TYPE: &str = "unknown";

/// A source field for which no candidate cleared the acceptance threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnmappedField {
    /// Address of the source field
    pub source_path: String,
    /// Source field name
    pub source_field: String,
    /// Highest-scoring rejected candidate, if there were any candidates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_candidate: Option<String>,
    /// Score of the best candidate (0 without candidates)
    pub best_confidence: f64,
}

/// A pair of corresponding endpoint paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathMatch {
    /// Path template in the old document
    pub path1: String,
    /// Path template in the new document
    pub path2: String,
    /// Path similarity (0.0-1.0)
    pub similarity: f64,
}

impl PathMatch {
    /// Create a new path match
    pub fn new(path1: impl Into<String>, path2: impl Into<String>, similarity: f64) -> Self {
        Self {
            path1: path1.into(),
            path2: path2.into(),
            similarity: clamp_confidence(similarity),
        }
    }
}

/// All field mappings for one matched endpoint pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingGroup {
    /// Source endpoint path template
    pub endpoint: String,
    /// Target endpoint path template
    pub target_endpoint: String,
    /// Shared HTTP methods, uppercase, joined with ", "
    pub method: String,
    /// Similarity of the two endpoint paths
    pub path_similarity: f64,
    /// Field mappings across all shared methods
    pub mappings: Vec<FieldMapping>,
    /// Mean mapping confidence (0 without mappings)
    pub confidence: f64,
    /// Below-threshold source fields (only with `report_unmapped`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unmapped: Vec<UnmappedField>,
}

impl MappingGroup {
    /// Build a group, computing its confidence from the mappings
    pub fn new(path_match: &PathMatch, methods: &[&str], mappings: Vec<FieldMapping>) -> Self {
        let confidence = mean_confidence(&mappings);
        Self {
            endpoint: path_match.path1.clone(),
            target_endpoint: path_match.path2.clone(),
            method: methods
                .iter()
                .map(|m| m.to_uppercase())
                .collect::<Vec<_>>()
                .join(", "),
            path_similarity: path_match.similarity,
            mappings,
            confidence,
            unmapped: Vec::new(),
        }
    }

    /// Attach unmapped-field diagnostics
    pub fn with_unmapped(mut self, unmapped: Vec<UnmappedField>) -> Self {
        self.unmapped = unmapped;
        self
    }

    /// Whether the group has no mappings
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Classification of the group as a whole
    pub fn mapping_type(&self) -> MappingType {
        if self.confidence > EXACT_GROUP_THRESHOLD {
            MappingType::Exact
        } else if self.confidence > SIMILAR_THRESHOLD {
            MappingType::Similar
        } else {
            MappingType::Inferred
        }
    }

    /// Whether any mapping in the group needs a type transformation
    pub fn transformation_required(&self) -> bool {
        self.mappings.iter().any(|m| m.transformation_required)
    }
}

/// Arithmetic mean of mapping confidences; 0 for an empty list
pub fn mean_confidence(mappings: &[FieldMapping]) -> f64 {
    if mappings.is_empty() {
        return 0.0;
    }
    let total: f64 = mappings.iter().map(|m| m.confidence).sum();
    clamp_confidence(total / mappings.len() as f64)
}
