//! Verify query building and error classification against JSON test vectors
//! stored in `test-vectors/`.
//!
//! Each vector file describes inputs and expected outputs. Error vectors are
//! replayed through a scripted transport so the whole executor path runs.

mod common;

use common::{scripted_client, Reply};
use tabular_client::url::build_list_query;
use tabular_client::{ErrorKind, HttpResponse, ListParams};

fn parse_kind(s: &str) -> ErrorKind {
    match s {
        "Http" => ErrorKind::Http,
        "Auth" => ErrorKind::Auth,
        "NotFound" => ErrorKind::NotFound,
        "Validation" => ErrorKind::Validation,
        "RateLimit" => ErrorKind::RateLimit,
        "Network" => ErrorKind::Network,
        other => panic!("unknown kind: {other}"),
    }
}

// ---------------------------------------------------------------------------
// List query
// ---------------------------------------------------------------------------

#[test]
fn list_query_test_vectors() {
    let raw = include_str!("../../test-vectors/list_query.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let params: ListParams = serde_json::from_value(case["params"].clone()).unwrap();
        let expected = case["expected_query"].as_str().unwrap();
        assert_eq!(build_list_query(&params), expected, "{name}");
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn error_test_vectors() {
    let raw = include_str!("../../test-vectors/errors.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let status = case["status"].as_u64().unwrap() as u16;
        let headers = case["content_type"]
            .as_str()
            .map(|ct| vec![("Content-Type".to_string(), ct.to_string())])
            .unwrap_or_default();

        let (client, _) = scripted_client([Reply::Respond(HttpResponse {
            status,
            status_text: case["status_text"].as_str().unwrap().to_string(),
            headers,
            body: case["body"].as_str().unwrap().to_string(),
        })]);

        let err = client
            .get::<serde_json::Value>("Tasks", "rec1")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), parse_kind(case["expected_kind"].as_str().unwrap()), "{name}: kind");
        assert_eq!(err.status(), Some(status), "{name}: status");
        assert_eq!(err.to_string(), case["expected_message"].as_str().unwrap(), "{name}: message");
    }
}
