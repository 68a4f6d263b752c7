use pretty_assertions::assert_eq;
use server::tasks::{
    ScheduledTask, SystemProcessFailedPronouncedCasesTask, SystemProcessFailedScheduledCasesTask,
};
use shared_types::{BulkActionState, CaseState};

use crate::common::{bulk_case, entry, linked_case, references, task_deps, BulkCase, CaseStore};

fn with_errors(id: i64, state: BulkActionState, members: &[i64], errored: &[i64]) -> BulkCase {
    let mut details = bulk_case(id, state, members);
    details.data.errored_case_details = errored.iter().copied().map(entry).collect();
    details.data.processed_case_details = members
        .iter()
        .copied()
        .filter(|m| !errored.contains(m))
        .map(entry)
        .collect();
    details
}

#[tokio::test]
async fn retries_pronouncement_of_errored_cases() {
    let store = CaseStore::new();
    store.add_case(1001, CaseState::ConditionalOrderPronounced, linked_case(9401));
    store.add_case(1002, CaseState::AwaitingPronouncement, linked_case(9401));
    store.add_bulk_case(with_errors(9401, BulkActionState::Pronounced, &[1001, 1002], &[1002]));

    SystemProcessFailedPronouncedCasesTask::new(task_deps(&store))
        .run()
        .await
        .unwrap();

    assert_eq!(
        store.submitted(),
        vec![(1002, "system-pronounce-case".to_string())]
    );
    let (bulk_id, event_id, data) = store.bulk_writes().pop().unwrap();
    assert_eq!((bulk_id, event_id.as_str()), (9401, "system-update-errors"));
    assert!(data.errored_case_details.is_empty());
    assert_eq!(references(&data.processed_case_details), vec!["1001", "1002"]);
    assert_eq!(
        store.case(1002).state,
        Some(CaseState::ConditionalOrderPronounced)
    );
}

#[tokio::test]
async fn case_that_fails_again_stays_errored() {
    let store = CaseStore::new();
    store.add_case(1001, CaseState::AwaitingPronouncement, linked_case(9402));
    store.add_case(1002, CaseState::AwaitingPronouncement, linked_case(9402));
    store.fail_case(1002);
    store.add_bulk_case(with_errors(9402, BulkActionState::Listed, &[1001, 1002], &[1002]));

    SystemProcessFailedScheduledCasesTask::new(task_deps(&store))
        .run()
        .await
        .unwrap();

    let (_, _, data) = store.bulk_writes().pop().unwrap();
    assert_eq!(references(&data.errored_case_details), vec!["1002"]);
    assert_eq!(references(&data.processed_case_details), vec!["1001"]);
}

#[tokio::test]
async fn only_bulk_cases_in_the_task_state_are_swept() {
    let store = CaseStore::new();
    store.add_case(1001, CaseState::AwaitingPronouncement, linked_case(9403));
    store.add_bulk_case(with_errors(9403, BulkActionState::Listed, &[1001], &[1001]));
    store.add_bulk_case(bulk_case(9404, BulkActionState::Pronounced, &[1001]));

    SystemProcessFailedPronouncedCasesTask::new(task_deps(&store))
        .run()
        .await
        .unwrap();

    assert!(store.submitted().is_empty());
    assert!(store.bulk_writes().is_empty());
}
