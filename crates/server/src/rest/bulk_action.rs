use axum::{extract::State, Json};

use shared_types::{
    AppError, CaseFilterProcessingState, FilterCasesRequest, StateSets, User, UserDetails,
};

use crate::auth::{Credentials, SystemAuth};
use crate::bulk::BulkActionServices;
use crate::error_convert::ValidateRequest;

// ---------------------------------------------------------------------------
// POST /bulk-actions/filter
// ---------------------------------------------------------------------------

/// Classify a bulk list by the current state of each case, as the caller
/// sees it. Nothing is submitted.
#[utoipa::path(
    post,
    path = "/bulk-actions/filter",
    request_body = FilterCasesRequest,
    responses(
        (status = 200, description = "Cases by processing state", body = CaseFilterProcessingState),
        (status = 401, description = "Missing or rejected credentials"),
        (status = 403, description = "Calling service is not authorised"),
        (status = 422, description = "Invalid or overlapping state sets"),
        (status = 502, description = "Case data store unavailable")
    ),
    tag = "bulk-actions"
)]
pub async fn filter_cases(
    State(services): State<BulkActionServices>,
    State(auth): State<SystemAuth>,
    credentials: Credentials,
    Json(body): Json<FilterCasesRequest>,
) -> Result<Json<CaseFilterProcessingState>, AppError> {
    body.validate_request()?;

    let states = StateSets::new(
        body.pre_states.iter().copied().collect(),
        body.post_states.iter().copied().collect(),
    )?;

    let user = User::new(credentials.user_token, UserDetails::default());
    let service_auth = auth.service_token().await?;

    let result = services
        .filter
        .filter_processing_state(
            &body.bulk_list_case_details,
            &user,
            &service_auth,
            &states.pre_states,
            &states.post_states,
        )
        .await?;

    Ok(Json(result))
}
