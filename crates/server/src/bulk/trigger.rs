use async_trait::async_trait;
use shared_types::{AppError, BulkListCaseDetails, ListValue, User};
use std::sync::Arc;

use super::case_task::CaseTask;
use crate::ccd::{submit_event_with_retry, CaseSubmissionGateway, RetryPolicy};

/// Submits one event against every case of a bulk list.
#[async_trait]
pub trait BulkTriggerService: Send + Sync {
    /// Returns the entries whose submission failed, in input order.
    async fn bulk_trigger(
        &self,
        cases: &[ListValue<BulkListCaseDetails>],
        event_id: &str,
        task: &CaseTask,
        user: &User,
        service_auth: &str,
    ) -> Vec<ListValue<BulkListCaseDetails>>;
}

/// Sequential [`BulkTriggerService`] over the case data store.
pub struct CcdBulkTriggerService {
    submission: Arc<dyn CaseSubmissionGateway>,
    retry: RetryPolicy,
}

impl CcdBulkTriggerService {
    pub fn new(submission: Arc<dyn CaseSubmissionGateway>, retry: RetryPolicy) -> Self {
        Self { submission, retry }
    }
}

#[async_trait]
impl BulkTriggerService for CcdBulkTriggerService {
    #[tracing::instrument(skip_all, fields(event_id = %event_id, count = cases.len()))]
    async fn bulk_trigger(
        &self,
        cases: &[ListValue<BulkListCaseDetails>],
        event_id: &str,
        task: &CaseTask,
        user: &User,
        service_auth: &str,
    ) -> Vec<ListValue<BulkListCaseDetails>> {
        let mut failed = Vec::new();

        for case in cases {
            let reference = case.case_reference();
            let case_id = match reference.parse::<i64>() {
                Ok(id) => id,
                Err(_) => {
                    tracing::error!(reference, event_id, "Case reference is not a case id");
                    failed.push(case.clone());
                    continue;
                }
            };

            if let Err(e) = submit_event_with_retry(
                self.submission.as_ref(),
                self.retry,
                case_id,
                event_id,
                task,
                user,
                service_auth,
            )
            .await
            {
                tracing::error!(case_id, event_id, error = %e, "Submit event failed");
                failed.push(case.clone());
            }
        }

        if !failed.is_empty() {
            tracing::warn!(event_id, failed = failed.len(), "Bulk trigger finished with failures");
        }
        failed
    }
}
