use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use shared_types::{BulkActionState, CaseState};

use crate::common::{
    bulk_case, callback_body, linked_case, post_json, post_json_as, post_json_no_service_auth,
    references, test_app, CaseStore, OTHER_SERVICE_TOKEN,
};

// ---------------------------------------------------------------------------
// POST /callbacks/submitted
// ---------------------------------------------------------------------------

#[tokio::test]
async fn pronounce_event_returns_immediately_and_pronounces_in_background() {
    let store = CaseStore::new();
    for id in [1001, 1002] {
        store.add_case(id, CaseState::AwaitingPronouncement, linked_case(9001));
    }
    let app = test_app(&store);

    let details = bulk_case(9001, BulkActionState::Listed, &[1001, 1002]);
    let (status, body) = post_json(
        &app,
        "/callbacks/submitted",
        &callback_body("system-pronounce-cases", &details),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "Response: {:?}", body);
    assert_eq!(body, json!({}));

    let (bulk_id, event_id, data) = store.wait_for_bulk_write().await;
    assert_eq!(bulk_id, 9001);
    assert_eq!(event_id, "system-update-errors");
    assert_eq!(references(&data.processed_case_details), vec!["1001", "1002"]);
    assert!(data.errored_case_details.is_empty());
    assert_eq!(
        store.case(1001).state,
        Some(CaseState::ConditionalOrderPronounced)
    );
}

#[tokio::test]
async fn schedule_event_lists_every_case_on_the_bulk_list() {
    let store = CaseStore::new();
    for id in [1001, 1002, 1003] {
        store.add_case(id, CaseState::AwaitingPronouncement, linked_case(9002));
    }
    store.fail_case(1003);
    let app = test_app(&store);

    let details = bulk_case(9002, BulkActionState::Created, &[1001, 1002, 1003]);
    let (status, _) = post_json(
        &app,
        "/callbacks/submitted",
        &callback_body("caseworker-schedule-case", &details),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, _, data) = store.wait_for_bulk_write().await;
    assert_eq!(references(&data.processed_case_details), vec!["1001", "1002"]);
    assert_eq!(references(&data.errored_case_details), vec!["1003"]);

    let listed = store.case(1001);
    assert_eq!(listed.data.conditional_order.date_and_time_of_hearing, details.data.date_and_time_of_hearing);
    assert_eq!(listed.data.conditional_order.court, details.data.court);
}

#[tokio::test]
async fn create_bulk_list_event_also_schedules() {
    let store = CaseStore::new();
    store.add_case(1001, CaseState::AwaitingPronouncement, linked_case(9003));
    let app = test_app(&store);

    let details = bulk_case(9003, BulkActionState::Created, &[1001]);
    let (status, _) = post_json(
        &app,
        "/callbacks/submitted",
        &callback_body("create-bulk-list", &details),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    store.wait_for_bulk_write().await;
    assert_eq!(
        store.submitted(),
        vec![(1001, "system-update-case-court-hearing".to_string())]
    );
}

#[tokio::test]
async fn unknown_event_is_rejected() {
    let store = CaseStore::new();
    let app = test_app(&store);

    let details = bulk_case(9004, BulkActionState::Created, &[]);
    let (status, body) = post_json(
        &app,
        "/callbacks/submitted",
        &callback_body("caseworker-edit-bulk-list", &details),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "BadRequest");
    assert!(store.submitted().is_empty());
}

#[tokio::test]
async fn missing_service_authorization_is_unauthorized() {
    let store = CaseStore::new();
    let app = test_app(&store);

    let details = bulk_case(9005, BulkActionState::Listed, &[1001]);
    let (status, body) = post_json_no_service_auth(
        &app,
        "/callbacks/submitted",
        &callback_body("system-pronounce-cases", &details),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "Unauthorized");
}

#[tokio::test]
async fn service_not_on_the_authorised_list_is_forbidden() {
    let store = CaseStore::new();
    store.add_case(1001, CaseState::AwaitingPronouncement, linked_case(9007));
    let app = test_app(&store);

    let details = bulk_case(9007, BulkActionState::Listed, &[1001]);
    let (status, body) = post_json_as(
        &app,
        "/callbacks/submitted",
        &callback_body("system-pronounce-cases", &details),
        OTHER_SERVICE_TOKEN,
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "Forbidden");
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert!(store.submitted().is_empty());
    assert!(store.bulk_writes().is_empty());
}

#[tokio::test]
async fn service_token_s2s_rejects_is_unauthorized() {
    let store = CaseStore::new();
    let app = test_app(&store);

    let details = bulk_case(9008, BulkActionState::Listed, &[1001]);
    let (status, body) = post_json_as(
        &app,
        "/callbacks/submitted",
        &callback_body("system-pronounce-cases", &details),
        "Bearer forged",
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "Unauthorized");
}

#[tokio::test]
async fn retired_field_names_are_read_from_the_callback() {
    let store = CaseStore::new();
    store.add_case(1001, CaseState::AwaitingPronouncement, linked_case(9006));
    let app = test_app(&store);

    let body = json!({
        "event_id": "system-pronounce-cases",
        "case_details": {
            "id": 9006,
            "state": "Listed",
            "case_data": {
                "court": "birmingham",
                "hearingDateAndTime": "2021-11-10T10:00:00",
                "judgeName": "District Judge Smith",
                "bulkListCaseDetails": [
                    { "id": "e1", "value": { "caseParties": "A vs B", "caseReference": { "CaseReference": "1001" } } }
                ]
            }
        }
    });
    let (status, _) = post_json(&app, "/callbacks/submitted", &body).await;
    assert_eq!(status, StatusCode::OK);

    let (_, _, data) = store.wait_for_bulk_write().await;
    assert_eq!(references(&data.processed_case_details), vec!["1001"]);
    assert_eq!(
        store.case(1001).data.conditional_order.pronouncement_judge.as_deref(),
        Some("District Judge Smith")
    );
}
