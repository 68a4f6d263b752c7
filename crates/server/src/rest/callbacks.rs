use axum::{extract::State, Json};
use serde_json::Value;

use shared_types::{
    AboutToStartOrSubmitResponse, AppError, BulkActionCaseData, BulkActionState, CallbackRequest,
    CaseLink, ListValue, SubmittedCallbackResponse,
};

use crate::auth::Credentials;
use crate::bulk::removal::remaining_after_removal;
use crate::bulk::{BulkActionServices, CREATE_BULK_LIST, PRONOUNCE_CASES, REMOVE_CASES, SCHEDULE_CASES};
use crate::retired_fields;

type BulkCallback = CallbackRequest<BulkActionCaseData, BulkActionState>;
type BulkResponse = AboutToStartOrSubmitResponse<BulkActionCaseData, BulkActionState>;

/// Migrate retired fields on the posted case data, then read the typed request.
pub fn parse_bulk_callback(mut body: Value) -> Result<BulkCallback, AppError> {
    for details in ["case_details", "case_details_before"] {
        let Some(case) = body.get_mut(details).and_then(Value::as_object_mut) else {
            continue;
        };
        let key = if case.contains_key("case_data") { "case_data" } else { "data" };
        if let Some(data) = case.remove(key) {
            case.insert(key.to_string(), retired_fields::migrate(data));
        }
    }

    serde_json::from_value(body)
        .map_err(|e| AppError::bad_request(format!("Invalid callback request: {e}")))
}

// ---------------------------------------------------------------------------
// POST /callbacks/submitted
// ---------------------------------------------------------------------------

/// Start the bulk work for a bulk-action event and return straight away.
/// Outcomes are written back to the bulk-action case by the work itself.
#[utoipa::path(
    post,
    path = "/callbacks/submitted",
    request_body(content = Object, description = "Case data store callback request"),
    responses(
        (status = 200, description = "Bulk processing started", body = Object),
        (status = 400, description = "Unsupported event"),
        (status = 401, description = "Missing or rejected credentials"),
        (status = 403, description = "Calling service is not authorised")
    ),
    tag = "callbacks"
)]
pub async fn submitted(
    State(services): State<BulkActionServices>,
    credentials: Credentials,
    Json(body): Json<Value>,
) -> Result<Json<SubmittedCallbackResponse>, AppError> {
    let request = parse_bulk_callback(body)?;
    let details = request.case_details;
    let bulk_case_id = details.id;

    match request.event_id.as_str() {
        CREATE_BULK_LIST | SCHEDULE_CASES => {
            let schedule = services.schedule.clone();
            tokio::spawn(async move {
                if let Err(e) = schedule
                    .update_court_hearing_details_for_cases_in_bulk(details)
                    .await
                {
                    tracing::error!(bulk_case_id, error = %e, "Scheduling cases failed");
                }
            });
        }
        PRONOUNCE_CASES => {
            let pronouncement = services.pronouncement.clone();
            tokio::spawn(async move {
                if let Err(e) = pronouncement.pronounce_cases(details).await {
                    tracing::error!(bulk_case_id, error = %e, "Pronouncing cases failed");
                }
            });
        }
        other => {
            return Err(AppError::bad_request(format!(
                "No submitted callback for event '{other}'"
            )))
        }
    }

    tracing::info!(
        bulk_case_id,
        event_id = %request.event_id,
        caller = %credentials.service_name,
        "Bulk processing started"
    );
    Ok(Json(SubmittedCallbackResponse::default()))
}

// ---------------------------------------------------------------------------
// POST /callbacks/about-to-submit
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/callbacks/about-to-submit",
    request_body(content = Object, description = "Case data store callback request"),
    responses(
        (status = 200, description = "Updated bulk-action data or validation errors", body = Object),
        (status = 400, description = "Unsupported event"),
        (status = 401, description = "Missing or rejected credentials"),
        (status = 403, description = "Calling service is not authorised")
    ),
    tag = "callbacks"
)]
pub async fn about_to_submit(
    State(services): State<BulkActionServices>,
    credentials: Credentials,
    Json(body): Json<Value>,
) -> Result<Json<BulkResponse>, AppError> {
    let request = parse_bulk_callback(body)?;
    if request.event_id != REMOVE_CASES {
        return Err(AppError::bad_request(format!(
            "No about-to-submit callback for event '{}'",
            request.event_id
        )));
    }

    let details = request.case_details;
    let requested: Vec<String> = details
        .data
        .cases_to_be_removed
        .iter()
        .map(|c| c.value.case_reference.clone())
        .filter(|r| !r.is_empty())
        .collect();

    if requested.is_empty() {
        return Ok(Json(BulkResponse::with_errors(
            details.data,
            vec!["No cases were selected for removal".to_string()],
        )));
    }

    let failed = services.removal.remove_cases(&details, &requested).await?;
    if !failed.is_empty() {
        tracing::warn!(
            bulk_case_id = details.id,
            caller = %credentials.service_name,
            failed = failed.len(),
            "Some cases could not be removed from the bulk list"
        );
    }

    let mut data = details.data;
    data.bulk_list_case_details = remaining_after_removal(&data, &requested, &failed);
    data.cases_to_be_removed = failed
        .into_iter()
        .map(|reference| ListValue::new(CaseLink::new(reference)))
        .collect();

    Ok(Json(BulkResponse::with_data(data)))
}
