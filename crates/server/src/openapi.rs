use axum::Router;
use shared_types::{
    AppError, AppErrorKind, BulkListCaseDetails, CaseFilterProcessingState, CaseLink, CaseState,
    FilterCasesRequest,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::health;
use crate::rest;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        rest::callbacks::submitted,
        rest::callbacks::about_to_submit,
        rest::bulk_action::filter_cases,
    ),
    components(schemas(
        AppError,
        AppErrorKind,
        BulkListCaseDetails,
        CaseFilterProcessingState,
        CaseLink,
        CaseState,
        FilterCasesRequest,
        health::HealthResponse,
    )),
    tags(
        (name = "callbacks", description = "Case data store event callbacks for bulk-action cases"),
        (name = "bulk-actions", description = "Bulk list diagnostics"),
        (name = "health", description = "Health check endpoint")
    ),
    info(
        title = "No Fault Divorce Bulk Action API",
        description = "Court listing and pronouncement of cases in bulk",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

/// Build the full application router: callbacks, bulk actions, health and,
/// when the `swagger` flag is on, the API docs.
pub fn api_router(state: AppState) -> Router {
    let flags = crate::config::feature_flags();

    let router = Router::new()
        .merge(rest::api_router())
        .route("/health", axum::routing::get(health::health_check))
        .with_state(state);

    if flags.swagger {
        router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
    } else {
        router
    }
}
