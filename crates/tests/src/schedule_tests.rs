use pretty_assertions::assert_eq;
use shared_types::{BulkActionState, CaseState, ConditionalOrderCourt};

use crate::common::{bulk_case, hearing, linked_case, references, test_services, CaseStore};

#[tokio::test]
async fn copies_court_and_hearing_onto_every_listed_case() {
    let store = CaseStore::new();
    for id in [1001, 1002] {
        store.add_case(id, CaseState::AwaitingPronouncement, linked_case(9301));
    }
    let services = test_services(&store);

    let updated = services
        .schedule
        .update_court_hearing_details_for_cases_in_bulk(bulk_case(
            9301,
            BulkActionState::Created,
            &[1001, 1002],
        ))
        .await
        .unwrap();

    assert_eq!(
        references(&updated.data.processed_case_details),
        vec!["1001", "1002"]
    );
    for id in [1001, 1002] {
        let order = store.case(id).data.conditional_order;
        assert_eq!(order.court, Some(ConditionalOrderCourt::Birmingham));
        assert_eq!(order.date_and_time_of_hearing, Some(hearing()));
    }
    // Listing does not move the case on.
    assert_eq!(store.case(1001).state, Some(CaseState::AwaitingPronouncement));
}

#[tokio::test]
async fn failed_case_is_errored_and_the_rest_processed() {
    let store = CaseStore::new();
    for id in [1001, 1002, 1003] {
        store.add_case(id, CaseState::AwaitingPronouncement, linked_case(9302));
    }
    store.fail_case(1002);
    let services = test_services(&store);

    let updated = services
        .schedule
        .update_court_hearing_details_for_cases_in_bulk(bulk_case(
            9302,
            BulkActionState::Created,
            &[1001, 1002, 1003],
        ))
        .await
        .unwrap();

    assert_eq!(
        references(&updated.data.processed_case_details),
        vec!["1001", "1003"]
    );
    assert_eq!(references(&updated.data.errored_case_details), vec!["1002"]);

    let (bulk_id, event_id, data) = store.bulk_writes().pop().unwrap();
    assert_eq!((bulk_id, event_id.as_str()), (9302, "system-update-errors"));
    assert_eq!(data, updated.data);
}

#[tokio::test]
async fn bulk_list_without_court_errors_every_case() {
    let store = CaseStore::new();
    store.add_case(1001, CaseState::AwaitingPronouncement, linked_case(9303));
    let services = test_services(&store);

    let mut details = bulk_case(9303, BulkActionState::Created, &[1001]);
    details.data.court = None;
    let updated = services
        .schedule
        .update_court_hearing_details_for_cases_in_bulk(details)
        .await
        .unwrap();

    assert_eq!(references(&updated.data.errored_case_details), vec!["1001"]);
    assert!(store.submitted().is_empty());
}
