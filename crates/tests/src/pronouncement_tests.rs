use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use shared_types::{AppErrorKind, BulkActionState, CaseState};

use crate::common::{bulk_case, linked_case, references, test_services, CaseStore};

#[tokio::test]
async fn pronounces_eligible_cases_and_records_outcomes_in_order() {
    let store = CaseStore::new();
    store.add_case(1001, CaseState::AwaitingPronouncement, linked_case(9201));
    store.add_case(1002, CaseState::ConditionalOrderPronounced, linked_case(9201));
    store.add_case(1003, CaseState::Draft, linked_case(9201));
    store.add_case(1004, CaseState::OfflineDocumentReceived, linked_case(9201));
    store.fail_case(1004);
    let services = test_services(&store);

    let details = bulk_case(9201, BulkActionState::Listed, &[1001, 1002, 1003, 1004]);
    let updated = services.pronouncement.pronounce_cases(details).await.unwrap();

    assert_eq!(
        references(&updated.data.processed_case_details),
        vec!["1001", "1002"]
    );
    assert_eq!(
        references(&updated.data.errored_case_details),
        vec!["1003", "1004"]
    );
    assert_eq!(
        store.submitted(),
        vec![(1001, "system-pronounce-case".to_string())]
    );

    let writes = store.bulk_writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].0, 9201);
    assert_eq!(writes[0].1, "system-update-errors");
    assert_eq!(writes[0].2, updated.data);
}

#[tokio::test]
async fn failed_and_ineligible_cases_are_errored_in_list_order() {
    let store = CaseStore::new();
    store.add_case(1001, CaseState::AwaitingPronouncement, linked_case(9206));
    store.add_case(1002, CaseState::Draft, linked_case(9206));
    store.add_case(1003, CaseState::ConditionalOrderPronounced, linked_case(9206));
    store.add_case(1004, CaseState::AwaitingPronouncement, linked_case(9206));
    store.fail_case(1001);
    let services = test_services(&store);

    let details = bulk_case(9206, BulkActionState::Listed, &[1004, 1001, 1003, 1002]);
    let updated = services.pronouncement.pronounce_cases(details).await.unwrap();

    assert_eq!(
        references(&updated.data.errored_case_details),
        vec!["1001", "1002"]
    );
    assert_eq!(
        references(&updated.data.processed_case_details),
        vec!["1004", "1003"]
    );
}

#[tokio::test]
async fn pronounced_case_carries_grant_and_final_order_dates() {
    let store = CaseStore::new();
    store.add_case(1001, CaseState::AwaitingPronouncement, linked_case(9202));
    let services = test_services(&store);

    services
        .pronouncement
        .pronounce_cases(bulk_case(9202, BulkActionState::Listed, &[1001]))
        .await
        .unwrap();

    let case = store.case(1001);
    assert_eq!(case.state, Some(CaseState::ConditionalOrderPronounced));
    let order = &case.data.conditional_order;
    assert_eq!(order.pronouncement_judge.as_deref(), Some("District Judge"));
    assert_eq!(order.granted_date, NaiveDate::from_ymd_opt(2021, 11, 10));
    assert_eq!(order.outcome_case, Some(true));
    assert_eq!(
        case.data.final_order.date_final_order_eligible_from,
        NaiveDate::from_ymd_opt(2021, 12, 23)
    );
    assert_eq!(
        case.data.final_order.date_final_order_eligible_to_respondent,
        NaiveDate::from_ymd_opt(2022, 3, 23)
    );
}

#[tokio::test]
async fn repronouncing_a_list_submits_nothing_new() {
    let store = CaseStore::new();
    store.add_case(1001, CaseState::AwaitingPronouncement, linked_case(9203));
    let services = test_services(&store);

    let details = bulk_case(9203, BulkActionState::Listed, &[1001]);
    services.pronouncement.pronounce_cases(details.clone()).await.unwrap();
    let again = services.pronouncement.pronounce_cases(details).await.unwrap();

    assert_eq!(store.submitted().len(), 1);
    assert_eq!(references(&again.data.processed_case_details), vec!["1001"]);
    assert!(again.data.errored_case_details.is_empty());
}

#[tokio::test]
async fn missing_judge_errors_every_case() {
    let store = CaseStore::new();
    store.add_case(1001, CaseState::AwaitingPronouncement, linked_case(9204));
    store.add_case(1002, CaseState::AwaitingPronouncement, linked_case(9204));
    let services = test_services(&store);

    let mut details = bulk_case(9204, BulkActionState::Listed, &[1001, 1002]);
    details.data.pronouncement_judge = None;
    let updated = services.pronouncement.pronounce_cases(details).await.unwrap();

    assert!(updated.data.processed_case_details.is_empty());
    assert_eq!(
        references(&updated.data.errored_case_details),
        vec!["1001", "1002"]
    );
    assert!(store.submitted().is_empty());
}

#[tokio::test]
async fn bulk_case_without_id_is_rejected() {
    let store = CaseStore::new();
    let services = test_services(&store);

    let mut details = bulk_case(9205, BulkActionState::Listed, &[1001]);
    details.id = None;
    let err = services.pronouncement.pronounce_cases(details).await.unwrap_err();

    assert_eq!(err.kind, AppErrorKind::BadRequest);
    assert!(store.bulk_writes().is_empty());
}
