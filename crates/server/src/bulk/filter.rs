use shared_types::{
    case_references, AppError, BulkListCaseDetails, CaseFilterProcessingState, CaseState,
    ListValue, StateSet, User,
};
use std::collections::HashSet;
use std::sync::Arc;

use crate::ccd::CaseSearchGateway;

/// Splits a bulk list into processed, errored and still-eligible cases by
/// their current state in the case data store.
#[derive(Clone)]
pub struct CaseProcessingStateFilter {
    search: Arc<dyn CaseSearchGateway>,
}

impl CaseProcessingStateFilter {
    pub fn new(search: Arc<dyn CaseSearchGateway>) -> Self {
        Self { search }
    }

    /// One search call for the whole list. A case in a post-state is
    /// processed even if the state is also a pre-state. A case in neither set
    /// is errored. Cases the store does not return stay unprocessed. An empty
    /// list makes no search call.
    pub async fn filter_processing_state(
        &self,
        cases: &[ListValue<BulkListCaseDetails>],
        user: &User,
        service_auth: &str,
        pre_states: &StateSet,
        post_states: &StateSet,
    ) -> Result<CaseFilterProcessingState, AppError> {
        if cases.is_empty() {
            return Ok(CaseFilterProcessingState::default());
        }

        let references = case_references(cases);
        let found = self
            .search
            .search_for_cases_with_references(&references, user, service_auth)
            .await?;

        let mut processed = HashSet::new();
        let mut errored = HashSet::new();

        for summary in &found {
            let reference = summary.id.to_string();
            match summary.state.parse::<CaseState>() {
                Ok(state) if post_states.contains(&state) => {
                    processed.insert(reference);
                }
                Ok(state) if pre_states.contains(&state) => {}
                Ok(_) => {
                    errored.insert(reference);
                }
                Err(_) => {
                    tracing::warn!(
                        case_id = summary.id,
                        state = %summary.state,
                        "Case in unrecognised state, marking as errored"
                    );
                    errored.insert(reference);
                }
            }
        }

        let mut result = CaseFilterProcessingState::default();
        for case in cases {
            let reference = case.case_reference();
            if processed.contains(reference) {
                result.processed_cases.push(case.clone());
            } else if errored.contains(reference) {
                result.errored_cases.push(case.clone());
            } else {
                result.unprocessed_cases.push(case.clone());
            }
        }

        tracing::info!(
            requested = cases.len(),
            found = found.len(),
            unprocessed = result.unprocessed_cases.len(),
            errored = result.errored_cases.len(),
            processed = result.processed_cases.len(),
            "Filtered bulk list by case state"
        );
        Ok(result)
    }
}
