use pretty_assertions::assert_eq;
use server::tasks::{scheduled_tasks, spawn_all};
use shared_types::{BulkActionState, CaseState, FeatureFlags, TaskSchedule, TaskSettings};
use tokio_util::sync::CancellationToken;

use crate::common::{bulk_case, entry, linked_case, task_deps, CaseStore};

fn flags_on() -> FeatureFlags {
    FeatureFlags {
        scheduled_tasks: true,
        ..Default::default()
    }
}

#[test]
fn every_task_is_registered_with_its_schedule() {
    let store = CaseStore::new();
    let settings = TaskSettings {
        progress_held_cases: TaskSchedule {
            enabled: true,
            interval_secs: 60,
        },
        ..Default::default()
    };

    let tasks = scheduled_tasks(&task_deps(&store), &settings);
    let names: Vec<&str> = tasks.iter().map(|(task, _)| task.name()).collect();
    assert_eq!(
        names,
        vec![
            "system-process-failed-pronounced-cases",
            "system-process-failed-scheduled-cases",
            "system-progress-held-cases",
            "system-progress-cases-to-aos-overdue",
        ]
    );
    assert!(tasks[2].1.enabled);
    assert!(!tasks[0].1.enabled);
}

#[tokio::test]
async fn enabled_task_sweeps_on_first_tick_and_stops_on_cancel() {
    let store = CaseStore::new();
    store.add_case(1001, CaseState::AwaitingPronouncement, linked_case(9501));
    let mut bulk = bulk_case(9501, BulkActionState::Pronounced, &[1001]);
    bulk.data.errored_case_details = vec![entry(1001)];
    store.add_bulk_case(bulk);

    let settings = TaskSettings {
        failed_pronounced_cases: TaskSchedule {
            enabled: true,
            interval_secs: 3600,
        },
        ..Default::default()
    };
    let cancel = CancellationToken::new();
    let handles = spawn_all(
        scheduled_tasks(&task_deps(&store), &settings),
        &flags_on(),
        cancel.clone(),
    );
    assert_eq!(handles.len(), 1);

    let (bulk_id, _, data) = store.wait_for_bulk_write().await;
    assert_eq!(bulk_id, 9501);
    assert!(data.errored_case_details.is_empty());

    cancel.cancel();
    for handle in handles {
        handle.await.unwrap();
    }
}

#[tokio::test]
async fn nothing_runs_while_the_flag_is_off() {
    let store = CaseStore::new();
    let settings = TaskSettings {
        progress_held_cases: TaskSchedule {
            enabled: true,
            interval_secs: 1,
        },
        ..Default::default()
    };

    let handles = spawn_all(
        scheduled_tasks(&task_deps(&store), &settings),
        &FeatureFlags::default(),
        CancellationToken::new(),
    );
    assert!(handles.is_empty());
}
