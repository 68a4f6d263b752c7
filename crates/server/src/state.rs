use axum::extract::FromRef;

use crate::auth::{ServiceAuthorisation, SystemAuth};
use crate::bulk::BulkActionServices;

/// Shared application state passed to all Axum handlers.
///
/// Derives `FromRef` so handlers can extract `State<BulkActionServices>`
/// or `State<SystemAuth>` directly, and so the `Credentials` extractor can
/// reach the `ServiceAuthorisation`.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub services: BulkActionServices,
    pub auth: SystemAuth,
    pub service_authorisation: ServiceAuthorisation,
}
