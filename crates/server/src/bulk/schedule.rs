use shared_types::{AppError, BulkActionCaseData, BulkActionState, CaseDetails};
use std::sync::Arc;

use super::task_util::BulkCaseTaskUtil;
use super::{SYSTEM_UPDATE_CASE_COURT_HEARING, SYSTEM_UPDATE_ERRORS};
use crate::auth::SystemAuth;
use crate::ccd::CaseSubmissionGateway;

/// Copies the hearing details of a bulk list onto every listed case.
#[derive(Clone)]
pub struct ScheduleCaseService {
    task_util: BulkCaseTaskUtil,
    submission: Arc<dyn CaseSubmissionGateway>,
    auth: SystemAuth,
}

impl ScheduleCaseService {
    pub fn new(
        task_util: BulkCaseTaskUtil,
        submission: Arc<dyn CaseSubmissionGateway>,
        auth: SystemAuth,
    ) -> Self {
        Self {
            task_util,
            submission,
            auth,
        }
    }

    #[tracing::instrument(skip_all, fields(bulk_case_id = details.id))]
    pub async fn update_court_hearing_details_for_cases_in_bulk(
        &self,
        details: CaseDetails<BulkActionCaseData, BulkActionState>,
    ) -> Result<CaseDetails<BulkActionCaseData, BulkActionState>, AppError> {
        let bulk_case_id = details
            .id
            .ok_or_else(|| AppError::bad_request("Bulk action case has no id"))?;
        let (user, service_auth) = self.auth.credentials().await?;

        let cases = details.data.bulk_list_case_details.clone();
        let details = self
            .task_util
            .process_cases(
                details,
                &cases,
                SYSTEM_UPDATE_CASE_COURT_HEARING,
                &user,
                &service_auth,
            )
            .await?;

        self.submission
            .submit_bulk_action_event(
                bulk_case_id,
                SYSTEM_UPDATE_ERRORS,
                &details.data,
                &user,
                &service_auth,
            )
            .await?;

        Ok(details)
    }
}
