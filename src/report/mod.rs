//! Rendering of comparison reports as JSON or Markdown

use crate::comparison::ComparisonReport;
use crate::diff::SpecDifference;
use crate::error::{SpecError, SpecResult};
use crate::mapping::{FieldMapping, MappingGroup};

/// Output format for rendered reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Pretty-printed JSON with camelCase keys
    #[default]
    Json,
    /// Markdown document
    Markdown,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Json => write!(f, "json"),
            ReportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            _ => Err(SpecError::UnknownFormat(s.to_string())),
        }
    }
}

/// Render a comparison report
pub fn render_report(report: &ComparisonReport, format: ReportFormat) -> SpecResult<String> {
    match format {
        ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        ReportFormat::Markdown => Ok(render_markdown(report)),
    }
}

fn render_markdown(report: &ComparisonReport) -> String {
    let summary = &report.summary;
    let mut lines = Vec::new();

    lines.push("# API Comparison Report".to_string());
    lines.push(String::new());
    lines.push("## Summary".to_string());
    lines.push(String::new());
    lines.push("| Metric | Count |".to_string());
    lines.push("|--------|-------|".to_string());
    for (label, count) in [
        ("Total differences", summary.total_differences),
        ("Added", summary.added_count),
        ("Removed", summary.removed_count),
        ("Modified", summary.modified_count),
        ("Breaking", summary.breaking_count),
        ("Non-breaking", summary.non_breaking_count),
        ("Enhancements", summary.enhancement_count),
    ] {
        lines.push(format!("| {} | {} |", label, count));
    }
    lines.push(String::new());

    let (breaking, other): (Vec<&SpecDifference>, Vec<&SpecDifference>) =
        report.differences.iter().partition(|d| d.is_breaking());

    lines.push("## Breaking Changes".to_string());
    lines.push(String::new());
    push_differences(&mut lines, &breaking, false);

    lines.push("## Other Changes".to_string());
    lines.push(String::new());
    push_differences(&mut lines, &other, true);

    let groups: Vec<&MappingGroup> = report.actionable_mappings().collect();
    lines.push("## Field Mappings".to_string());
    lines.push(String::new());
    if groups.is_empty() {
        lines.push("_No field mappings._".to_string());
        lines.push(String::new());
    }
    for group in groups {
        push_group(&mut lines, group);
    }

    lines.join("\n")
}

fn push_differences(lines: &mut Vec<String>, differences: &[&SpecDifference], with_impact: bool) {
    if differences.is_empty() {
        lines.push("_None._".to_string());
        lines.push(String::new());
        return;
    }

    for difference in differences {
        let impact = if with_impact {
            format!(" ({})", difference.impact)
        } else {
            String::new()
        };
        lines.push(format!(
            "- **{}** `{}`{}: {}",
            difference.diff_type, difference.path, impact, difference.description
        ));
    }
    lines.push(String::new());
}

fn push_group(lines: &mut Vec<String>, group: &MappingGroup) {
    let method = if group.method.is_empty() {
        String::new()
    } else {
        format!("{} ", group.method)
    };
    lines.push(format!(
        "### {}{} -> {}",
        method, group.endpoint, group.target_endpoint
    ));
    lines.push(String::new());
    lines.push(format!(
        "Confidence: {} ({}){}",
        percent(group.confidence),
        group.mapping_type(),
        if group.transformation_required() {
            ", transformation required"
        } else {
            ""
        }
    ));
    lines.push(String::new());
    lines.push("| Source | Target | Match | Confidence | Transformation |".to_string());
    lines.push("|--------|--------|-------|------------|----------------|".to_string());
    for mapping in &group.mappings {
        lines.push(mapping_row(mapping));
    }
    lines.push(String::new());
}

fn mapping_row(mapping: &FieldMapping) -> String {
    format!(
        "| {} ({}) | {} ({}) | {} | {} | {} |",
        cell(&mapping.source_field),
        cell(&mapping.source_type),
        cell(&mapping.target_field),
        cell(&mapping.target_type),
        mapping.mapping_type,
        percent(mapping.confidence),
        cell(mapping.transformation_rule.as_deref().unwrap_or("")),
    )
}

fn percent(confidence: f64) -> String {
    format!("{:.0}%", confidence * 100.0)
}

fn cell(text: &str) -> String {
    text.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::compare;
    use serde_json::json;

    fn sample_report() -> ComparisonReport {
        let old = json!({
            "info": {"title": "Payments", "version": "1"},
            "paths": {
                "/pay": {"get": {"parameters": [{"name": "amount", "in": "query", "schema": {"type": "string"}}]}},
                "/legacy": {"get": {}}
            }
        });
        let new = json!({
            "info": {"title": "Payments", "version": "2"},
            "paths": {
                "/pay": {"get": {"parameters": [{"name": "amount", "in": "query", "schema": {"type": "integer"}}]}}
            }
        });
        compare(&old, &new).unwrap()
    }

    #[test]
    fn test_report_format_parsing() {
        assert_eq!("json".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert_eq!("MD".parse::<ReportFormat>().unwrap(), ReportFormat::Markdown);
        assert_eq!(
            "markdown".parse::<ReportFormat>().unwrap(),
            ReportFormat::Markdown
        );
        assert!(matches!(
            "html".parse::<ReportFormat>(),
            Err(SpecError::UnknownFormat(_))
        ));
        assert_eq!(ReportFormat::Markdown.to_string(), "markdown");
    }

    #[test]
    fn test_render_json() {
        let report = sample_report();
        let rendered = render_report(&report, ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(value["summary"]["totalDifferences"], json!(3));
        assert_eq!(value["differences"][0]["type"], json!("removed"));
        assert_eq!(value["mappings"][0]["mappings"][0]["transformationRequired"], json!(true));
    }

    #[test]
    fn test_render_markdown() {
        let report = sample_report();
        let rendered = render_report(&report, ReportFormat::Markdown).unwrap();

        assert!(rendered.starts_with("# API Comparison Report"));
        assert!(rendered.contains("| Total differences | 3 |"));

        let breaking = rendered.find("## Breaking Changes").unwrap();
        let other = rendered.find("## Other Changes").unwrap();
        let removed = rendered.find("`paths./legacy`").unwrap();
        let version = rendered.find("`info.version`").unwrap();
        assert!(breaking < removed && removed < other && other < version);

        assert!(rendered.contains("### GET /pay -> /pay"));
        assert!(rendered.contains("| amount (string) | amount (integer) | exact | 100% |"));
        assert!(!rendered.contains("/legacy -> "));
    }

    #[test]
    fn test_escape_pipes() {
        assert_eq!(cell("a|b"), "a\\|b");
    }
}
