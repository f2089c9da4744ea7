//! Configuration for field-mapping inference

use serde::{Deserialize, Serialize};

use crate::error::{SpecError, SpecResult};
use crate::scoring::clamp_confidence;

/// Configuration for path and field matching
///
/// All thresholds are exclusive: a candidate is accepted only when its
/// confidence is strictly greater than the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MappingConfig {
    /// Minimum path similarity for two endpoints to correspond
    pub path_threshold: f64,
    /// Minimum confidence for a parameter match
    pub parameter_threshold: f64,
    /// Minimum confidence for a schema property match
    pub field_threshold: f64,
    /// Bonus when two parameters share a location (`query`, `path`, `header`)
    pub location_bonus: f64,
    /// Bonus when two parameters declare the same scalar type
    pub parameter_type_bonus: f64,
    /// Bonus when two properties declare the same type
    pub field_type_bonus: f64,
    /// Bonus when two properties declare the same format
    pub format_bonus: f64,
    /// Record below-threshold source fields instead of dropping them silently
    pub report_unmapped: bool,
    /// User-supplied correspondences that bypass scoring
    pub overrides: Vec<FieldOverride>,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            path_threshold: 0.6,
            parameter_threshold: 0.5,
            field_threshold: 0.4,
            location_bonus: 0.2,
            parameter_type_bonus: 0.1,
            field_type_bonus: 0.2,
            format_bonus: 0.1,
            report_unmapped: false,
            overrides: Vec::new(),
        }
    }
}

impl MappingConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a strict config (exact, case-insensitive names only)
    pub fn strict() -> Self {
        Self {
            path_threshold: 0.99,
            parameter_threshold: 0.99,
            field_threshold: 0.99,
            location_bonus: 0.0,
            parameter_type_bonus: 0.0,
            field_type_bonus: 0.0,
            format_bonus: 0.0,
            ..Self::default()
        }
    }

    /// Parse a config from TOML; missing keys take their defaults
    pub fn from_toml_str(content: &str) -> SpecResult<Self> {
        let config: MappingConfig =
            toml::from_str(content).map_err(|e| SpecError::Config(e.to_string()))?;
        config.validate()
    }

    /// Check that every threshold and bonus lies in `[0, 1]`
    pub fn validate(self) -> SpecResult<Self> {
        let values = [
            ("pathThreshold", self.path_threshold),
            ("parameterThreshold", self.parameter_threshold),
            ("fieldThreshold", self.field_threshold),
            ("locationBonus", self.location_bonus),
            ("parameterTypeBonus", self.parameter_type_bonus),
            ("fieldTypeBonus", self.field_type_bonus),
            ("formatBonus", self.format_bonus),
        ];
        for (name, value) in values {
            if !(0.0..=1.0).contains(&value) {
                return Err(SpecError::Config(format!(
                    "{} must be between 0 and 1, got {}",
                    name, value
                )));
            }
        }
        Ok(self)
    }

    /// Set the path similarity threshold
    pub fn with_path_threshold(mut self, threshold: f64) -> Self {
        self.path_threshold = clamp_confidence(threshold);
        self
    }

    /// Set the parameter acceptance threshold
    pub fn with_parameter_threshold(mut self, threshold: f64) -> Self {
        self.parameter_threshold = clamp_confidence(threshold);
        self
    }

    /// Set the property acceptance threshold
    pub fn with_field_threshold(mut self, threshold: f64) -> Self {
        self.field_threshold = clamp_confidence(threshold);
        self
    }

    /// Set the bonus for parameters declared in the same location
    pub fn with_location_bonus(mut self, bonus: f64) -> Self {
        self.location_bonus = clamp_confidence(bonus);
        self
    }

    /// Set the bonus for parameters declaring the same type
    pub fn with_parameter_type_bonus(mut self, bonus: f64) -> Self {
        self.parameter_type_bonus = clamp_confidence(bonus);
        self
    }

    /// Set the bonus for properties declaring the same type
    pub fn with_field_type_bonus(mut self, bonus: f64) -> Self {
        self.field_type_bonus = clamp_confidence(bonus);
        self
    }

    /// Set the bonus for properties declaring the same format
    pub fn with_format_bonus(mut self, bonus: f64) -> Self {
        self.format_bonus = clamp_confidence(bonus);
        self
    }

    /// Enable/disable unmapped-field diagnostics
    pub fn with_report_unmapped(mut self, enabled: bool) -> Self {
        self.report_unmapped = enabled;
        self
    }

    /// Add a manual override
    pub fn with_override(mut self, field_override: FieldOverride) -> Self {
        self.overrides.push(field_override);
        self
    }

    /// Find the override target for a source field on a source endpoint
    pub fn override_for(&self, endpoint: &str, source_field: &str) -> Option<&str> {
        self.overrides
            .iter()
            .find(|o| o.endpoint == endpoint && o.source_field == source_field)
            .map(|o| o.target_field.as_str())
    }
}

/// A user-supplied field correspondence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOverride {
    /// Source endpoint path template
    pub endpoint: String,
    /// Field or parameter name in the old document
    pub source_field: String,
    /// Field or parameter name in the new document
    pub target_field: String,
}

impl FieldOverride {
    /// Create a new override
    pub fn new(
        endpoint: impl Into<String>,
        source_field: impl Into<String>,
        target_field: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            source_field: source_field.into(),
            target_field: target_field.into(),
        }
    }
}
