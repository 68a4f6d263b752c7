use shared_types::{
    state_set, with_references, without_references, AppError, BulkActionCaseData,
    BulkActionState, CaseDetails, CaseState, StateSets,
};
use std::sync::Arc;

use super::case_task::CaseTaskFactory;
use super::filter::CaseProcessingStateFilter;
use super::trigger::BulkTriggerService;
use super::{SYSTEM_PRONOUNCE_CASE, SYSTEM_UPDATE_ERRORS};
use crate::auth::SystemAuth;
use crate::ccd::CaseSubmissionGateway;

/// States a case may be pronounced from, and the state it is in afterwards.
pub fn pronouncement_states() -> Result<StateSets, AppError> {
    StateSets::new(
        state_set(&[
            CaseState::AwaitingPronouncement,
            CaseState::OfflineDocumentReceived,
        ]),
        state_set(&[CaseState::ConditionalOrderPronounced]),
    )
}

/// Pronounces every eligible case of a bulk list.
#[derive(Clone)]
pub struct CasePronouncementService {
    filter: CaseProcessingStateFilter,
    trigger: Arc<dyn BulkTriggerService>,
    factory: Arc<dyn CaseTaskFactory>,
    submission: Arc<dyn CaseSubmissionGateway>,
    auth: SystemAuth,
}

impl CasePronouncementService {
    pub fn new(
        filter: CaseProcessingStateFilter,
        trigger: Arc<dyn BulkTriggerService>,
        factory: Arc<dyn CaseTaskFactory>,
        submission: Arc<dyn CaseSubmissionGateway>,
        auth: SystemAuth,
    ) -> Self {
        Self {
            filter,
            trigger,
            factory,
            submission,
            auth,
        }
    }

    /// Cases already pronounced count as processed and are not touched
    /// again. Cases in an unexpected state are reported as errored.
    #[tracing::instrument(skip_all, fields(bulk_case_id = details.id))]
    pub async fn pronounce_cases(
        &self,
        mut details: CaseDetails<BulkActionCaseData, BulkActionState>,
    ) -> Result<CaseDetails<BulkActionCaseData, BulkActionState>, AppError> {
        let bulk_case_id = details
            .id
            .ok_or_else(|| AppError::bad_request("Bulk action case has no id"))?;
        let (user, service_auth) = self.auth.credentials().await?;
        let states = pronouncement_states()?;

        let filtered = self
            .filter
            .filter_processing_state(
                &details.data.bulk_list_case_details,
                &user,
                &service_auth,
                &states.pre_states,
                &states.post_states,
            )
            .await?;

        let task = self.factory.get_case_task(&details, SYSTEM_PRONOUNCE_CASE)?;
        let failed = self
            .trigger
            .bulk_trigger(
                &filtered.unprocessed_cases,
                SYSTEM_PRONOUNCE_CASE,
                &task,
                &user,
                &service_auth,
            )
            .await;

        let mut errored = filtered.errored_cases;
        errored.extend(failed);

        let data = &mut details.data;
        data.errored_case_details = with_references(&data.bulk_list_case_details, &errored);
        data.processed_case_details = without_references(&data.bulk_list_case_details, &errored);

        self.submission
            .submit_bulk_action_event(
                bulk_case_id,
                SYSTEM_UPDATE_ERRORS,
                &details.data,
                &user,
                &service_auth,
            )
            .await?;

        tracing::info!(
            errored = details.data.errored_case_details.len(),
            processed = details.data.processed_case_details.len(),
            "Pronounced bulk list"
        );
        Ok(details)
    }
}
