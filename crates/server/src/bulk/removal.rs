use shared_types::{
    AppError, BulkActionCaseData, BulkActionState, BulkListCaseDetails, CaseDetails, ListValue,
};
use std::collections::HashSet;
use std::sync::Arc;

use super::case_task::CaseTaskFactory;
use super::trigger::BulkTriggerService;
use super::SYSTEM_REMOVE_BULK_CASE;
use crate::auth::SystemAuth;

/// Unlinks selected cases from a bulk list.
#[derive(Clone)]
pub struct CaseRemovalService {
    trigger: Arc<dyn BulkTriggerService>,
    factory: Arc<dyn CaseTaskFactory>,
    auth: SystemAuth,
}

impl CaseRemovalService {
    pub fn new(
        trigger: Arc<dyn BulkTriggerService>,
        factory: Arc<dyn CaseTaskFactory>,
        auth: SystemAuth,
    ) -> Self {
        Self {
            trigger,
            factory,
            auth,
        }
    }

    /// Returns the references that could not be unlinked. References not on
    /// the bulk list are passed through to the trigger as bare entries.
    #[tracing::instrument(skip_all, fields(bulk_case_id = details.id, count = references.len()))]
    pub async fn remove_cases(
        &self,
        details: &CaseDetails<BulkActionCaseData, BulkActionState>,
        references: &[String],
    ) -> Result<Vec<String>, AppError> {
        if references.is_empty() {
            return Ok(Vec::new());
        }

        let (user, service_auth) = self.auth.credentials().await?;
        let task = self.factory.get_case_task(details, SYSTEM_REMOVE_BULK_CASE)?;

        let cases: Vec<ListValue<BulkListCaseDetails>> = references
            .iter()
            .map(|reference| {
                details
                    .data
                    .bulk_list_case_details
                    .iter()
                    .find(|c| c.case_reference() == reference.as_str())
                    .cloned()
                    .unwrap_or_else(|| ListValue::new(BulkListCaseDetails::new("", reference)))
            })
            .collect();

        let failed = self
            .trigger
            .bulk_trigger(&cases, SYSTEM_REMOVE_BULK_CASE, &task, &user, &service_auth)
            .await;

        Ok(failed
            .iter()
            .map(|c| c.case_reference().to_string())
            .collect())
    }
}

/// The bulk list with every removed reference dropped. References in
/// `failed` stay on the list.
pub fn remaining_after_removal(
    data: &BulkActionCaseData,
    requested: &[String],
    failed: &[String],
) -> Vec<ListValue<BulkListCaseDetails>> {
    let failed: HashSet<&str> = failed.iter().map(String::as_str).collect();
    let removed: HashSet<&str> = requested
        .iter()
        .map(String::as_str)
        .filter(|r| !failed.contains(r))
        .collect();

    data.bulk_list_case_details
        .iter()
        .filter(|c| !removed.contains(c.case_reference()))
        .cloned()
        .collect()
}
