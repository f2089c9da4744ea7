//! Types for structural differences between two specification documents

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::scoring::clamp_confidence;

/// Kind of structural difference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffType {
    /// Present only in the new document
    Added,
    /// Present only in the old document
    Removed,
    /// Present in both with different content
    Modified,
}

impl std::fmt::Display for DiffType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiffType::Added => write!(f, "added"),
            DiffType::Removed => write!(f, "removed"),
            DiffType::Modified => write!(f, "modified"),
        }
    }
}

/// Expected effect of a difference on existing clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Impact {
    /// Likely to break existing clients
    Breaking,
    /// Compatible change
    NonBreaking,
    /// New capability; compatible by construction
    Enhancement,
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Impact::Breaking => write!(f, "breaking"),
            Impact::NonBreaking => write!(f, "non-breaking"),
            Impact::Enhancement => write!(f, "enhancement"),
        }
    }
}

/// A single classified difference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecDifference {
    /// Kind of difference
    #[serde(rename = "type")]
    pub diff_type: DiffType,
    /// Dotted address of the changed node (e.g. `paths./pay.get`)
    pub path: String,
    /// Value in the old document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
    /// Value in the new document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
    /// Human-readable description
    pub description: String,
    /// Client impact
    pub impact: Impact,
    /// Certainty of the classification (0.0-1.0)
    pub confidence: f64,
}

impl SpecDifference {
    /// A node present only in the new document
    pub fn added(path: impl Into<String>, new_value: Value, impact: Impact) -> Self {
        let path = path.into();
        Self {
            diff_type: DiffType::Added,
            description: format!("Added {}", path),
            path,
            old_value: None,
            new_value: Some(new_value),
            impact,
            confidence: 1.0,
        }
    }

    /// A node present only in the old document
    pub fn removed(path: impl Into<String>, old_value: Value, impact: Impact) -> Self {
        let path = path.into();
        Self {
            diff_type: DiffType::Removed,
            description: format!("Removed {}", path),
            path,
            old_value: Some(old_value),
            new_value: None,
            impact,
            confidence: 1.0,
        }
    }

    /// A node whose value changed
    pub fn modified(
        path: impl Into<String>,
        old_value: Value,
        new_value: Value,
        impact: Impact,
    ) -> Self {
        let path = path.into();
        Self {
            diff_type: DiffType::Modified,
            description: format!("Modified {}", path),
            path,
            old_value: Some(old_value),
            new_value: Some(new_value),
            impact,
            confidence: 1.0,
        }
    }

    /// Set a custom description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set confidence
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = clamp_confidence(confidence);
        self
    }

    /// Whether this difference is breaking
    pub fn is_breaking(&self) -> bool {
        self.impact == Impact::Breaking
    }
}

/// Counts of differences by type and impact
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffSummary {
    /// Total number of differences
    pub total_differences: usize,
    /// Added nodes
    pub added_count: usize,
    /// Removed nodes
    pub removed_count: usize,
    /// Modified nodes
    pub modified_count: usize,
    /// Breaking differences
    pub breaking_count: usize,
    /// Non-breaking differences
    pub non_breaking_count: usize,
    /// Enhancements
    pub enhancement_count: usize,
}

impl DiffSummary {
    /// Reduce a difference list to its counts
    pub fn from_differences(differences: &[SpecDifference]) -> Self {
        differences
            .iter()
            .fold(Self::default(), |mut summary, difference| {
                summary.total_differences += 1;
                match difference.diff_type {
                    DiffType::Added => summary.added_count += 1,
                    DiffType::Removed => summary.removed_count += 1,
                    DiffType::Modified => summary.modified_count += 1,
                }
                match difference.impact {
                    Impact::Breaking => summary.breaking_count += 1,
                    Impact::NonBreaking => summary.non_breaking_count += 1,
                    Impact::Enhancement => summary.enhancement_count += 1,
                }
                summary
            })
    }

    /// Whether any breaking differences were found
    pub fn has_breaking_changes(&self) -> bool {
        self.breaking_count > 0
    }
}
