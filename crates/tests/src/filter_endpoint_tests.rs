use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use shared_types::{CaseData, CaseState};

use crate::common::{entry, post_json, test_app, CaseStore};

fn refs(body: &Value, bucket: &str) -> Vec<String> {
    body[bucket]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["value"]["caseReference"]["CaseReference"].as_str().unwrap().to_string())
        .collect()
}

fn filter_body(members: &[i64], pre: &[&str], post: &[&str]) -> Value {
    let list: Vec<_> = members.iter().copied().map(entry).collect();
    json!({
        "bulk_list_case_details": list,
        "pre_states": pre,
        "post_states": post,
    })
}

// ---------------------------------------------------------------------------
// POST /bulk-actions/filter
// ---------------------------------------------------------------------------

#[tokio::test]
async fn classifies_cases_by_current_state() {
    let store = CaseStore::new();
    store.add_case(1, CaseState::AwaitingPronouncement, CaseData::default());
    store.add_case(2, CaseState::ConditionalOrderPronounced, CaseData::default());
    store.add_case(3, CaseState::Draft, CaseData::default());
    let app = test_app(&store);

    let (status, body) = post_json(
        &app,
        "/bulk-actions/filter",
        &filter_body(
            &[1, 2, 3],
            &["AwaitingPronouncement"],
            &["ConditionalOrderPronounced"],
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "Response: {:?}", body);
    assert_eq!(refs(&body, "unprocessed_cases"), vec!["1"]);
    assert_eq!(refs(&body, "processed_cases"), vec!["2"]);
    assert_eq!(refs(&body, "errored_cases"), vec!["3"]);
    assert!(store.submitted().is_empty());
}

#[tokio::test]
async fn cases_unknown_to_the_store_stay_unprocessed() {
    let store = CaseStore::new();
    store.add_case(1, CaseState::AwaitingPronouncement, CaseData::default());
    let app = test_app(&store);

    let (status, body) = post_json(
        &app,
        "/bulk-actions/filter",
        &filter_body(&[1, 4], &["AwaitingPronouncement"], &["ConditionalOrderPronounced"]),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(refs(&body, "unprocessed_cases"), vec!["1", "4"]);
}

#[tokio::test]
async fn unrecognised_state_is_errored() {
    let store = CaseStore::new();
    store.add_case(1, CaseState::AwaitingPronouncement, CaseData::default());
    store.set_raw_state(1, "SomeRetiredState");
    let app = test_app(&store);

    let (_, body) = post_json(
        &app,
        "/bulk-actions/filter",
        &filter_body(&[1], &["AwaitingPronouncement"], &["ConditionalOrderPronounced"]),
    )
    .await;

    assert_eq!(refs(&body, "errored_cases"), vec!["1"]);
}

#[tokio::test]
async fn overlapping_state_sets_are_rejected() {
    let store = CaseStore::new();
    let app = test_app(&store);

    let (status, body) = post_json(
        &app,
        "/bulk-actions/filter",
        &filter_body(&[1], &["Holding", "AwaitingPronouncement"], &["AwaitingPronouncement"]),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "ValidationError");
    assert!(body["field_errors"]["pre_states"]
        .as_str()
        .unwrap()
        .contains("AwaitingPronouncement"));
}

#[tokio::test]
async fn empty_state_sets_fail_validation() {
    let store = CaseStore::new();
    let app = test_app(&store);

    let (status, _) = post_json(
        &app,
        "/bulk-actions/filter",
        &filter_body(&[1], &[], &["ConditionalOrderPronounced"]),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn empty_bulk_list_yields_empty_buckets() {
    let store = CaseStore::new();
    let app = test_app(&store);

    let (status, body) = post_json(
        &app,
        "/bulk-actions/filter",
        &filter_body(&[], &["AwaitingPronouncement"], &["ConditionalOrderPronounced"]),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "unprocessed_cases": [], "errored_cases": [], "processed_cases": [] })
    );
}
