pub mod bulk_action;
pub mod callbacks;

use axum::{routing::post, Router};
use crate::state::AppState;

/// Build the callback and bulk-action router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Case data store callbacks
        .route("/callbacks/submitted", post(callbacks::submitted))
        .route("/callbacks/about-to-submit", post(callbacks::about_to_submit))
        // Bulk actions
        .route("/bulk-actions/filter", post(bulk_action::filter_cases))
}
