use async_trait::async_trait;
use shared_types::{AppError, BulkActionState};

use super::{ScheduledTask, TaskDeps};
use crate::bulk::{SYSTEM_PRONOUNCE_CASE, SYSTEM_UPDATE_CASE_COURT_HEARING, SYSTEM_UPDATE_ERRORS};

/// Re-runs a bulk event over the errored cases of every bulk-action case in
/// `state`, then writes the new outcome back.
struct FailedBulkCaseRetry {
    deps: TaskDeps,
    state: BulkActionState,
    event_id: &'static str,
}

impl FailedBulkCaseRetry {
    async fn run(&self, task: &'static str) -> Result<(), AppError> {
        let (user, service_auth) = self.deps.auth.credentials().await?;
        let bulk_cases = self
            .deps
            .search
            .search_for_bulk_actions_with_errors(self.state, &user, &service_auth)
            .await?;

        tracing::info!(task, found = bulk_cases.len(), "Bulk cases with errors");

        for details in bulk_cases {
            let Some(bulk_case_id) = details.id else {
                tracing::warn!(task, "Skipping bulk case without id");
                continue;
            };
            let errored = details.data.errored_case_details.clone();

            let outcome = async {
                let updated = self
                    .deps
                    .task_util
                    .process_cases(details, &errored, self.event_id, &user, &service_auth)
                    .await?;
                self.deps
                    .submission
                    .submit_bulk_action_event(
                        bulk_case_id,
                        SYSTEM_UPDATE_ERRORS,
                        &updated.data,
                        &user,
                        &service_auth,
                    )
                    .await?;
                Ok::<usize, AppError>(updated.data.errored_case_details.len())
            }
            .await;

            match outcome {
                Ok(still_errored) => tracing::info!(
                    task,
                    bulk_case_id,
                    retried = errored.len(),
                    still_errored,
                    "Reprocessed errored cases"
                ),
                Err(e) => tracing::error!(
                    task,
                    bulk_case_id,
                    error = %e,
                    "Failed to reprocess errored cases"
                ),
            }
        }
        Ok(())
    }
}

/// Retries pronouncement of cases that failed on a pronounced bulk list.
pub struct SystemProcessFailedPronouncedCasesTask(FailedBulkCaseRetry);

impl SystemProcessFailedPronouncedCasesTask {
    pub fn new(deps: TaskDeps) -> Self {
        Self(FailedBulkCaseRetry {
            deps,
            state: BulkActionState::Pronounced,
            event_id: SYSTEM_PRONOUNCE_CASE,
        })
    }
}

#[async_trait]
impl ScheduledTask for SystemProcessFailedPronouncedCasesTask {
    fn name(&self) -> &'static str {
        "system-process-failed-pronounced-cases"
    }

    async fn run(&self) -> Result<(), AppError> {
        self.0.run(self.name()).await
    }
}

/// Retries hearing updates of cases that failed on a listed bulk list.
pub struct SystemProcessFailedScheduledCasesTask(FailedBulkCaseRetry);

impl SystemProcessFailedScheduledCasesTask {
    pub fn new(deps: TaskDeps) -> Self {
        Self(FailedBulkCaseRetry {
            deps,
            state: BulkActionState::Listed,
            event_id: SYSTEM_UPDATE_CASE_COURT_HEARING,
        })
    }
}

#[async_trait]
impl ScheduledTask for SystemProcessFailedScheduledCasesTask {
    fn name(&self) -> &'static str {
        "system-process-failed-scheduled-cases"
    }

    async fn run(&self) -> Result<(), AppError> {
        self.0.run(self.name()).await
    }
}
