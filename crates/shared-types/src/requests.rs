use serde::{Deserialize, Serialize};

use crate::{BulkListCaseDetails, CaseState, ListValue};

/// Body of `POST /bulk-actions/filter`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(validator::Validate))]
pub struct FilterCasesRequest {
    pub bulk_list_case_details: Vec<ListValue<BulkListCaseDetails>>,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "At least one pre-state is required"))
    )]
    pub pre_states: Vec<CaseState>,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "At least one post-state is required"))
    )]
    pub post_states: Vec<CaseState>,
}
