//! Diff engine tests

use api_migration_core::document::COMPONENT_KINDS;
use api_migration_core::{
    DiffEngine, DiffType, DocumentSide, Impact, SpecDifference, SpecDocument, diff_documents,
};
use serde_json::{Value, json};

fn doc(value: Value, side: DocumentSide) -> SpecDocument {
    SpecDocument::from_value(value, side).unwrap()
}

fn diff(old: &Value, new: &Value) -> Vec<SpecDifference> {
    DiffEngine::new().diff(
        &doc(old.clone(), DocumentSide::Old),
        &doc(new.clone(), DocumentSide::New),
    )
}

fn paths_of(differences: &[SpecDifference], diff_type: DiffType) -> Vec<String> {
    differences
        .iter()
        .filter(|d| d.diff_type == diff_type)
        .map(|d| d.path.clone())
        .collect()
}

fn payments_v1() -> Value {
    json!({
        "openapi": "3.0.0",
        "info": {"title": "Payments", "version": "1.0.0"},
        "servers": [{"url": "https://api.example.com"}],
        "paths": {
            "/pay": {
                "get": {
                    "summary": "Get payment",
                    "parameters": [
                        {"name": "amount", "in": "query", "required": true, "schema": {"type": "string"}}
                    ],
                    "responses": {"200": {"description": "ok"}, "404": {"description": "missing"}}
                }
            },
            "/refund/{id}": {
                "post": {
                    "parameters": [{"name": "id", "in": "path", "required": true, "schema": {"type": "string"}}],
                    "requestBody": {"required": false, "content": {"application/json": {"schema": {"type": "object"}}}}
                }
            }
        },
        "components": {
            "schemas": {
                "Payment": {"type": "object", "properties": {"amount": {"type": "string"}}},
                "Legacy": {"type": "object"}
            }
        }
    })
}

fn payments_v2() -> Value {
    json!({
        "openapi": "3.0.0",
        "info": {"title": "Payments", "version": "2.0.0"},
        "servers": [{"url": "https://api.example.com"}, {"url": "https://eu.api.example.com"}],
        "paths": {
            "/pay": {
                "get": {
                    "summary": "Fetch a payment",
                    "parameters": [
                        {"name": "amount", "in": "query", "required": true, "schema": {"type": "integer"}},
                        {"name": "currency", "in": "query", "schema": {"type": "string"}}
                    ],
                    "responses": {"200": {"description": "ok"}, "201": {"description": "created"}}
                },
                "post": {}
            },
            "/refund/{id}": {
                "post": {
                    "requestBody": {"required": true, "content": {"application/json": {"schema": {"type": "object"}}}}
                }
            }
        },
        "components": {
            "schemas": {
                "Payment": {"type": "object", "properties": {"amount": {"type": "integer"}}},
                "Refund": {"type": "object"}
            }
        }
    })
}

mod determinism_tests {
    use super::*;

    #[test]
    fn test_repeated_diff_is_identical() {
        let (v1, v2) = (payments_v1(), payments_v2());
        let first = serde_json::to_string(&diff(&v1, &v2)).unwrap();
        let second = serde_json::to_string(&diff(&v1, &v2)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_walk_order() {
        let differences = diff(&payments_v1(), &payments_v2());
        let paths: Vec<&str> = differences.iter().map(|d| d.path.as_str()).collect();

        assert_eq!(
            paths,
            vec![
                "paths./pay.get.parameters.query.amount.type",
                "paths./pay.get.parameters.query.currency",
                "paths./pay.get.responses.201",
                "paths./pay.get.responses.404",
                "paths./pay.get.summary",
                "paths./pay.post",
                "paths./refund/{id}.post.parameters.path.id",
                "paths./refund/{id}.post.requestBody.required",
                "components.schemas.Legacy",
                "components.schemas.Payment",
                "components.schemas.Refund",
                "info.version",
                "servers",
            ]
        );
    }
}

mod directional_tests {
    use super::*;

    #[test]
    fn test_added_mirrors_removed() {
        let (v1, v2) = (payments_v1(), payments_v2());
        let forward = diff(&v1, &v2);
        let backward = diff(&v2, &v1);

        assert_eq!(
            paths_of(&forward, DiffType::Added),
            paths_of(&backward, DiffType::Removed)
        );
        assert_eq!(
            paths_of(&forward, DiffType::Removed),
            paths_of(&backward, DiffType::Added)
        );
        assert_eq!(
            paths_of(&forward, DiffType::Modified),
            paths_of(&backward, DiffType::Modified)
        );
    }
}

mod classification_tests {
    use super::*;

    fn find<'a>(differences: &'a [SpecDifference], path: &str) -> &'a SpecDifference {
        differences
            .iter()
            .find(|d| d.path == path)
            .unwrap_or_else(|| panic!("no difference at {}", path))
    }

    #[test]
    fn test_removed_endpoint() {
        let old = json!({"paths": {"/pay": {"get": {"parameters": [
            {"name": "amount", "in": "query", "required": true, "schema": {"type": "string"}}
        ]}}}});
        let new = json!({"paths": {}});

        let differences = diff(&old, &new);
        assert_eq!(differences.len(), 1);
        assert_eq!(differences[0].diff_type, DiffType::Removed);
        assert_eq!(differences[0].path, "paths./pay");
        assert_eq!(differences[0].impact, Impact::Breaking);
        assert_eq!(differences[0].confidence, 1.0);
    }

    #[test]
    fn test_removed_path_parameter() {
        let old = json!({"paths": {"/users/{id}": {"get": {"parameters": [
            {"name": "id", "in": "path", "type": "string"}
        ]}}}});
        let new = json!({"paths": {"/users/{id}": {"get": {}}}});

        let differences = diff(&old, &new);
        assert_eq!(differences.len(), 1);
        assert_eq!(differences[0].diff_type, DiffType::Removed);
        assert_eq!(differences[0].impact, Impact::Breaking);
        assert_eq!(differences[0].path, "paths./users/{id}.get.parameters.path.id");
    }

    #[test]
    fn test_parameter_presence_rules() {
        let old = json!({"paths": {"/pay": {"get": {"parameters": [
            {"name": "token", "in": "header", "required": true}
        ]}}}});
        let new = json!({"paths": {"/pay": {"get": {"parameters": [
            {"name": "page", "in": "query"},
            {"name": "tenant", "in": "header", "required": true}
        ]}}}});

        let differences = diff(&old, &new);
        assert_eq!(differences.len(), 3);
        // Removed parameters and added required ones break clients
        assert_eq!(
            find(&differences, "paths./pay.get.parameters.header.token").impact,
            Impact::Breaking
        );
        assert_eq!(
            find(&differences, "paths./pay.get.parameters.header.tenant").impact,
            Impact::Breaking
        );
        assert_eq!(
            find(&differences, "paths./pay.get.parameters.query.page").impact,
            Impact::NonBreaking
        );
    }

    #[test]
    fn test_same_name_different_location() {
        let old = json!({"paths": {"/pay": {"get": {"parameters": [{"name": "id", "in": "query"}]}}}});
        let new = json!({"paths": {"/pay": {"get": {"parameters": [{"name": "id", "in": "header"}]}}}});

        let differences = diff(&old, &new);
        assert_eq!(paths_of(&differences, DiffType::Added), vec!["paths./pay.get.parameters.header.id"]);
        assert_eq!(paths_of(&differences, DiffType::Removed), vec!["paths./pay.get.parameters.query.id"]);
    }

    #[test]
    fn test_required_flips() {
        let param = |required: bool| json!({"paths": {"/pay": {"get": {"parameters": [
            {"name": "amount", "in": "query", "required": required}
        ]}}}});

        let tightened = diff(&param(false), &param(true));
        assert_eq!(tightened.len(), 1);
        assert_eq!(tightened[0].impact, Impact::Breaking);
        assert_eq!(tightened[0].new_value, Some(json!(true)));

        let relaxed = diff(&param(true), &param(false));
        assert_eq!(relaxed[0].impact, Impact::NonBreaking);
    }

    #[test]
    fn test_v1_to_v2_impacts() {
        let differences = diff(&payments_v1(), &payments_v2());

        let type_change = find(&differences, "paths./pay.get.parameters.query.amount.type");
        assert_eq!(type_change.diff_type, DiffType::Modified);
        assert_eq!(type_change.impact, Impact::Breaking);
        assert_eq!(type_change.old_value, Some(json!("string")));

        assert_eq!(find(&differences, "paths./pay.get.responses.201").impact, Impact::Enhancement);
        assert_eq!(find(&differences, "paths./pay.get.responses.404").impact, Impact::Breaking);
        assert_eq!(find(&differences, "paths./pay.get.summary").impact, Impact::NonBreaking);
        assert_eq!(
            find(&differences, "paths./refund/{id}.post.requestBody.required").impact,
            Impact::Breaking
        );

        let payment = find(&differences, "components.schemas.Payment");
        assert_eq!(payment.impact, Impact::Breaking);
        assert_eq!(payment.confidence, 0.8);
        assert_eq!(find(&differences, "components.schemas.Refund").impact, Impact::Enhancement);
        assert_eq!(find(&differences, "components.schemas.Legacy").impact, Impact::Breaking);

        assert_eq!(find(&differences, "info.version").impact, Impact::NonBreaking);
        assert_eq!(find(&differences, "servers").impact, Impact::Breaking);

        assert!(
            differences
                .iter()
                .filter(|d| d.path != "components.schemas.Payment")
                .all(|d| d.confidence == 1.0)
        );
    }

    #[test]
    fn test_request_body_presence_is_breaking() {
        let with_body = json!({"paths": {"/pay": {"post": {"requestBody": {"content": {}}}}}});
        let without = json!({"paths": {"/pay": {"post": {}}}});

        let added = diff(&without, &with_body);
        assert_eq!(added[0].path, "paths./pay.post.requestBody");
        assert_eq!(added[0].diff_type, DiffType::Added);
        assert_eq!(added[0].impact, Impact::Breaking);

        let removed = diff(&with_body, &without);
        assert_eq!(removed[0].diff_type, DiffType::Removed);
        assert_eq!(removed[0].impact, Impact::Breaking);
    }

    #[test]
    fn test_server_contents_are_not_compared() {
        let old = json!({"servers": [{"url": "https://a.example.com"}]});
        let new = json!({"servers": [{"url": "https://b.example.com"}]});
        assert!(diff(&old, &new).is_empty());
    }

    #[test]
    fn test_partial_documents() {
        let differences = diff(&json!({}), &json!({"paths": {"/pay": {}}, "info": {"title": "Payments"}}));
        assert_eq!(differences.len(), 2);
        assert_eq!(differences[0].path, "paths./pay");
        assert_eq!(differences[1].path, "info.title");
        assert_eq!(differences[1].old_value, Some(Value::Null));
    }
}

mod component_tests {
    use super::*;
    use serde_json::Map;

    fn components(entries: Value) -> Value {
        let mut components = Map::new();
        for kind in COMPONENT_KINDS {
            components.insert(kind.to_string(), entries.clone());
        }
        components.insert("links".to_string(), entries);
        json!({"components": components})
    }

    #[test]
    fn test_every_component_kind_is_compared() {
        let old = components(json!({"Legacy": {"description": "old"}, "Shared": {"description": "v1"}}));
        let new = components(json!({"Fresh": {"description": "new"}, "Shared": {"description": "v2"}}));

        let differences = diff(&old, &new);
        assert_eq!(differences.len(), COMPONENT_KINDS.len() * 3);

        for (kind, chunk) in COMPONENT_KINDS.iter().zip(differences.chunks(3)) {
            let fresh = &chunk[0];
            assert_eq!(fresh.path, format!("components.{}.Fresh", kind));
            assert_eq!(fresh.diff_type, DiffType::Added);
            assert_eq!(fresh.impact, Impact::Enhancement);

            let legacy = &chunk[1];
            assert_eq!(legacy.path, format!("components.{}.Legacy", kind));
            assert_eq!(legacy.diff_type, DiffType::Removed);
            assert_eq!(legacy.impact, Impact::Breaking);

            let shared = &chunk[2];
            assert_eq!(shared.path, format!("components.{}.Shared", kind));
            assert_eq!(shared.diff_type, DiffType::Modified);
            assert_eq!(shared.impact, Impact::Breaking);
            assert_eq!(shared.confidence, 0.8);
        }

        assert!(!differences.iter().any(|d| d.path.starts_with("components.links")));
    }

    #[test]
    fn test_info_title_and_description() {
        let old = json!({"info": {"title": "Payments", "description": "Legacy API", "version": "1"}});
        let new = json!({"info": {"title": "Billing", "version": "1"}});

        let differences = diff(&old, &new);
        let paths: Vec<&str> = differences.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, vec!["info.title", "info.description"]);

        assert_eq!(differences[0].old_value, Some(json!("Payments")));
        assert_eq!(differences[0].new_value, Some(json!("Billing")));
        assert_eq!(differences[1].new_value, Some(Value::Null));
        assert!(
            differences
                .iter()
                .all(|d| d.diff_type == DiffType::Modified && d.impact == Impact::NonBreaking)
        );
    }
}

mod summary_tests {
    use super::*;

    #[test]
    fn test_summary_counts_add_up() {
        let (differences, summary) = diff_documents(
            &doc(payments_v1(), DocumentSide::Old),
            &doc(payments_v2(), DocumentSide::New),
        );

        assert_eq!(summary.total_differences, differences.len());
        assert_eq!(
            summary.added_count + summary.removed_count + summary.modified_count,
            summary.total_differences
        );
        assert_eq!(
            summary.breaking_count + summary.non_breaking_count + summary.enhancement_count,
            summary.total_differences
        );
        assert!(summary.has_breaking_changes());
    }

    #[test]
    fn test_summary_of_nothing() {
        let (differences, summary) = diff_documents(
            &doc(json!({}), DocumentSide::Old),
            &doc(json!({}), DocumentSide::New),
        );
        assert!(differences.is_empty());
        assert_eq!(summary.total_differences, 0);
        assert!(!summary.has_breaking_changes());
    }
}
