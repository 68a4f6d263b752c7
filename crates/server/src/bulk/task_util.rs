use shared_types::{
    without_references, AppError, BulkActionCaseData, BulkActionState, BulkListCaseDetails,
    CaseDetails, ListValue, User,
};
use std::sync::Arc;

use super::case_task::CaseTaskFactory;
use super::trigger::BulkTriggerService;

/// Runs one bulk event over a list of cases and records the outcome on the
/// bulk-action case.
#[derive(Clone)]
pub struct BulkCaseTaskUtil {
    trigger: Arc<dyn BulkTriggerService>,
    factory: Arc<dyn CaseTaskFactory>,
}

impl BulkCaseTaskUtil {
    pub fn new(trigger: Arc<dyn BulkTriggerService>, factory: Arc<dyn CaseTaskFactory>) -> Self {
        Self { trigger, factory }
    }

    /// Overwrites `errored_case_details` with the cases that failed and
    /// `processed_case_details` with the rest of the full bulk list.
    pub async fn process_cases(
        &self,
        mut details: CaseDetails<BulkActionCaseData, BulkActionState>,
        cases: &[ListValue<BulkListCaseDetails>],
        event_id: &str,
        user: &User,
        service_auth: &str,
    ) -> Result<CaseDetails<BulkActionCaseData, BulkActionState>, AppError> {
        let task = self.factory.get_case_task(&details, event_id)?;
        let failed = self
            .trigger
            .bulk_trigger(cases, event_id, &task, user, service_auth)
            .await;

        let data = &mut details.data;
        data.processed_case_details = without_references(&data.bulk_list_case_details, &failed);
        data.errored_case_details = failed;

        tracing::info!(
            bulk_case_id = details.id,
            event_id,
            errored = details.data.errored_case_details.len(),
            processed = details.data.processed_case_details.len(),
            "Processed bulk list"
        );
        Ok(details)
    }
}
