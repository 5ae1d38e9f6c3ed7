//! GraphQL operation name extraction
//!
//! Heuristic, not a parser. The name is whatever sits between the first and
//! second `{` of the `query` string, cut at the first `(` and stripped of
//! spaces. For the usual shapes that is the top-level selected field:
//!
//! ```text
//! query DoThing { doThing(id: 1) { result } }   ->  doThing
//! { viewer { login } }                          ->  viewer
//! ```
//!
//! Anything without two opening braces yields nothing. Aliases, leading
//! fragments and tab indentation are known misclassifications (see tests).

use serde_json::Value;

/// Extract the top-level operation/field name from a request body
///
/// Returns `None` when the body is not a JSON object with a string `query`
/// field, or the query does not have two nested selection sets.
pub fn extract_operation_name(body: &str) -> Option<String> {
    if body.is_empty() {
        return None;
    }

    let request: Value = serde_json::from_str(body).ok()?;
    let query = request.get("query")?.as_str()?;
    operation_name_from_query(query)
}

/// Apply the two-brace scan to raw query text
pub fn operation_name_from_query(query: &str) -> Option<String> {
    let query = query.replace('\n', "");

    let first = query.find('{')?;
    let after_first = &query[first + 1..];
    let second = after_first.find('{')?;

    let mut candidate = &after_first[..second];
    if let Some(paren) = candidate.find('(') {
        candidate = &candidate[..paren];
    }

    let name = candidate.replace(' ', "");
    if name.is_empty() { None } else { Some(name) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const PRETTY_BODY: &str = "{\n  \"operationName\": \"DoThing\",\n  \"variables\": {},\n  \"query\": \"query DoThing {\\n  doThing {\\n    result {\\n      name\\n      place\\n}\\n}\\n}\"\n}";

    #[test]
    fn test_pretty_printed_named_query() {
        assert_eq!(
            extract_operation_name(PRETTY_BODY),
            Some("doThing".to_string())
        );
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let first = extract_operation_name(PRETTY_BODY);
        let second = extract_operation_name(PRETTY_BODY);
        assert_eq!(first, second);
    }

    #[rstest]
    #[case("{ viewer { login } }", Some("viewer"))]
    #[case("query { doThing(id: 1, flag: true) { result } }", Some("doThing"))]
    #[case("mutation Update($id: ID!) { updateThing(id: $id) { ok } }", Some("updateThing"))]
    #[case("query Named {\n  doThing\n  {\n ok } }", Some("doThing"))]
    #[case("{ doThing }", None)]
    #[case("query NoBraces", None)]
    #[case("", None)]
    #[case("{ { nested } }", None)]
    fn test_query_shapes(#[case] query: &str, #[case] expected: Option<&str>) {
        assert_eq!(
            operation_name_from_query(query),
            expected.map(str::to_string)
        );
    }

    #[rstest]
    #[case("")]
    #[case("not json at all")]
    #[case("[{\"query\": \"{ viewer { login } }\"}]")]
    #[case("{\"operationName\": \"DoThing\"}")]
    #[case("{\"query\": null}")]
    #[case("{\"query\": 42}")]
    #[case("{\"query\": {\"nested\": \"{ viewer { login } }\"}}")]
    fn test_non_graphql_bodies(#[case] body: &str) {
        assert_eq!(extract_operation_name(body), None);
    }

    #[test]
    fn test_query_field_among_others() {
        let body = r#"{"variables": {"id": 1}, "query": "query Q { thing(id: $id) { name } }", "extensions": {}}"#;
        assert_eq!(extract_operation_name(body), Some("thing".to_string()));
    }

    // Known limitations of the two-brace scan, pinned so changes are deliberate.

    #[test]
    fn test_alias_is_kept_in_name() {
        assert_eq!(
            operation_name_from_query("{ alias: doThing { ok } }"),
            Some("alias:doThing".to_string())
        );
    }

    #[test]
    fn test_fragment_before_operation() {
        let query = "fragment F on Thing { inner { id } } query Q { doThing { ...F } }";
        assert_eq!(operation_name_from_query(query), Some("inner".to_string()));
    }

    #[test]
    fn test_tabs_are_not_stripped() {
        assert_eq!(
            operation_name_from_query("{\tdoThing { ok } }"),
            Some("\tdoThing".to_string())
        );
    }

    #[test]
    fn test_only_first_field_is_seen() {
        assert_eq!(
            operation_name_from_query("{ publicThing privateThing { secret } }"),
            Some("publicThingprivateThing".to_string())
        );
    }
}
