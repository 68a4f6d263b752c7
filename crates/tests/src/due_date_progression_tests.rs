use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use shared_types::{CaseData, CaseState};

use server::tasks::{SystemProgressCasesToAosOverdueTask, SystemProgressHeldCasesTask};

use crate::common::{task_deps, CaseStore};

fn due(date: (i32, u32, u32)) -> CaseData {
    CaseData {
        due_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2),
        ..Default::default()
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 6, 1).unwrap()
}

#[tokio::test]
async fn held_cases_past_their_due_date_are_released() {
    let store = CaseStore::new();
    store.add_case(1, CaseState::Holding, due((2021, 5, 31)));
    store.add_case(2, CaseState::Holding, due((2021, 6, 1)));
    store.add_case(3, CaseState::Holding, due((2021, 6, 2)));
    store.add_case(4, CaseState::Holding, CaseData::default());

    SystemProgressHeldCasesTask::new(task_deps(&store))
        .run_on(today())
        .await
        .unwrap();

    assert_eq!(
        store.submitted(),
        vec![
            (1, "system-progress-held-case".to_string()),
            (2, "system-progress-held-case".to_string()),
        ]
    );
    assert_eq!(store.case(1).state, Some(CaseState::AwaitingConditionalOrder));
    assert_eq!(store.case(3).state, Some(CaseState::Holding));
    assert_eq!(store.case(4).state, Some(CaseState::Holding));
}

#[tokio::test]
async fn overdue_acknowledgements_move_to_aos_overdue() {
    let store = CaseStore::new();
    store.add_case(1, CaseState::AwaitingAos, due((2021, 5, 1)));
    store.add_case(2, CaseState::Holding, due((2021, 5, 1)));

    SystemProgressCasesToAosOverdueTask::new(task_deps(&store))
        .run_on(today())
        .await
        .unwrap();

    assert_eq!(
        store.submitted(),
        vec![(1, "system-progress-to-aos-overdue".to_string())]
    );
    assert_eq!(store.case(1).state, Some(CaseState::AosOverdue));
}

#[tokio::test]
async fn one_failing_case_does_not_stop_the_sweep() {
    let store = CaseStore::new();
    store.add_case(1, CaseState::Holding, due((2021, 5, 1)));
    store.add_case(2, CaseState::Holding, due((2021, 5, 1)));
    store.fail_case(1);

    SystemProgressHeldCasesTask::new(task_deps(&store))
        .run_on(today())
        .await
        .unwrap();

    assert_eq!(
        store.submitted(),
        vec![(2, "system-progress-held-case".to_string())]
    );
    assert_eq!(store.case(1).state, Some(CaseState::Holding));
}
