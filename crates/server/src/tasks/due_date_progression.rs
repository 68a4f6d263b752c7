use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde_json::json;
use shared_types::{AppError, CaseData, CaseDetails, CaseState};
use std::sync::Arc;

use super::{ScheduledTask, TaskDeps};
use crate::bulk::CaseTask;
use crate::ccd::submit_event_with_retry;

pub const SYSTEM_PROGRESS_HELD_CASE: &str = "system-progress-held-case";
pub const SYSTEM_PROGRESS_TO_AOS_OVERDUE: &str = "system-progress-to-aos-overdue";

/// Search clause for cases whose due date is on or before `today`.
pub fn due_on_or_before(today: NaiveDate) -> serde_json::Value {
    json!({ "range": { "data.dueDate": { "lte": today.format("%Y-%m-%d").to_string() } } })
}

/// Moves cases in `state` whose due date has passed on to the next state.
struct DueDateProgression {
    deps: TaskDeps,
    state: CaseState,
    event_id: &'static str,
}

impl DueDateProgression {
    async fn run_on(&self, task: &'static str, today: NaiveDate) -> Result<(), AppError> {
        let (user, service_auth) = self.deps.auth.credentials().await?;
        let cases = self
            .deps
            .search
            .search_for_cases_in_state(
                self.state,
                vec![due_on_or_before(today)],
                &user,
                &service_auth,
            )
            .await?;

        // State changes are made by the event itself.
        let unchanged: CaseTask = Arc::new(|details: CaseDetails<CaseData, CaseState>| Ok(details));
        let mut progressed = 0usize;

        for case in cases {
            let Some(case_id) = case.id else {
                continue;
            };
            if !case.data.due_date.is_some_and(|due| due <= today) {
                tracing::debug!(task, case_id, "Case not yet due, skipping");
                continue;
            }

            match submit_event_with_retry(
                self.deps.submission.as_ref(),
                self.deps.retry,
                case_id,
                self.event_id,
                &unchanged,
                &user,
                &service_auth,
            )
            .await
            {
                Ok(()) => progressed += 1,
                Err(e) => tracing::error!(
                    task,
                    case_id,
                    event_id = self.event_id,
                    error = %e,
                    "Failed to progress case"
                ),
            }
        }

        tracing::info!(task, progressed, "Due date progression complete");
        Ok(())
    }
}

/// Releases cases from `Holding` once their holding period has ended.
pub struct SystemProgressHeldCasesTask(DueDateProgression);

impl SystemProgressHeldCasesTask {
    pub fn new(deps: TaskDeps) -> Self {
        Self(DueDateProgression {
            deps,
            state: CaseState::Holding,
            event_id: SYSTEM_PROGRESS_HELD_CASE,
        })
    }

    pub async fn run_on(&self, today: NaiveDate) -> Result<(), AppError> {
        self.0.run_on(self.name(), today).await
    }
}

#[async_trait]
impl ScheduledTask for SystemProgressHeldCasesTask {
    fn name(&self) -> &'static str {
        "system-progress-held-cases"
    }

    async fn run(&self) -> Result<(), AppError> {
        self.run_on(Utc::now().date_naive()).await
    }
}

/// Moves cases awaiting acknowledgement of service to `AosOverdue` once the
/// response window has closed.
pub struct SystemProgressCasesToAosOverdueTask(DueDateProgression);

impl SystemProgressCasesToAosOverdueTask {
    pub fn new(deps: TaskDeps) -> Self {
        Self(DueDateProgression {
            deps,
            state: CaseState::AwaitingAos,
            event_id: SYSTEM_PROGRESS_TO_AOS_OVERDUE,
        })
    }

    pub async fn run_on(&self, today: NaiveDate) -> Result<(), AppError> {
        self.0.run_on(self.name(), today).await
    }
}

#[async_trait]
impl ScheduledTask for SystemProgressCasesToAosOverdueTask {
    fn name(&self) -> &'static str {
        "system-progress-cases-to-aos-overdue"
    }

    async fn run(&self) -> Result<(), AppError> {
        self.run_on(Utc::now().date_naive()).await
    }
}
