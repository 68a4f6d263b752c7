use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use shared_types::{BulkActionState, CaseLink, CaseState, ListValue};

use crate::common::{bulk_case, callback_body, linked_case, post_json, test_app, CaseStore};

fn removal_request(
    bulk_id: i64,
    members: &[i64],
    to_remove: &[i64],
) -> crate::common::BulkCase {
    let mut details = bulk_case(bulk_id, BulkActionState::Listed, members);
    details.data.cases_to_be_removed = to_remove
        .iter()
        .map(|id| ListValue::new(CaseLink::new(id.to_string())))
        .collect();
    details
}

fn list_references(body: &serde_json::Value) -> Vec<String> {
    body["data"]["bulkListCaseDetails"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["value"]["caseReference"]["CaseReference"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// POST /callbacks/about-to-submit
// ---------------------------------------------------------------------------

#[tokio::test]
async fn removes_selected_cases_from_the_bulk_list() {
    let store = CaseStore::new();
    for id in [1001, 1002, 1003] {
        store.add_case(id, CaseState::AwaitingPronouncement, linked_case(9101));
    }
    let app = test_app(&store);

    let details = removal_request(9101, &[1001, 1002, 1003], &[1002]);
    let (status, body) = post_json(
        &app,
        "/callbacks/about-to-submit",
        &callback_body("caseworker-remove-cases-bulk-list", &details),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "Response: {:?}", body);
    assert!(body.get("errors").is_none());
    assert_eq!(list_references(&body), vec!["1001", "1003"]);
    assert_eq!(body["data"]["casesToBeRemoved"], serde_json::json!([]));
    assert_eq!(store.case(1002).data.bulk_list_case_reference_link, None);
    assert_eq!(
        store.case(1001).data.bulk_list_case_reference_link,
        Some(CaseLink::new("9101"))
    );
}

#[tokio::test]
async fn failed_removals_stay_on_the_list_and_remain_selected() {
    let store = CaseStore::new();
    for id in [1001, 1002, 1003] {
        store.add_case(id, CaseState::AwaitingPronouncement, linked_case(9102));
    }
    store.fail_case(1003);
    let app = test_app(&store);

    let details = removal_request(9102, &[1001, 1002, 1003], &[1002, 1003]);
    let (status, body) = post_json(
        &app,
        "/callbacks/about-to-submit",
        &callback_body("caseworker-remove-cases-bulk-list", &details),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(list_references(&body), vec!["1001", "1003"]);
    assert_eq!(
        body["data"]["casesToBeRemoved"][0]["value"]["CaseReference"],
        "1003"
    );
}

#[tokio::test]
async fn empty_selection_returns_a_validation_error() {
    let store = CaseStore::new();
    let app = test_app(&store);

    let details = removal_request(9103, &[1001], &[]);
    let (status, body) = post_json(
        &app,
        "/callbacks/about-to-submit",
        &callback_body("caseworker-remove-cases-bulk-list", &details),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["errors"][0], "No cases were selected for removal");
    assert!(store.submitted().is_empty());
}

#[tokio::test]
async fn other_events_have_no_about_to_submit_callback() {
    let store = CaseStore::new();
    let app = test_app(&store);

    let details = removal_request(9104, &[1001], &[1001]);
    let (status, _) = post_json(
        &app,
        "/callbacks/about-to-submit",
        &callback_body("system-pronounce-cases", &details),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
