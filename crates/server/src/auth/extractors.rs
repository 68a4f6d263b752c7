use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use shared_types::AppError;
use std::sync::Arc;

use super::service_auth::ServiceAuthValidator;

/// Header carrying the service-to-service token.
pub const SERVICE_AUTHORIZATION: &str = "serviceauthorization";

/// Which services may call this API, and how to tell who is calling.
#[derive(Clone)]
pub struct ServiceAuthorisation {
    validator: Arc<dyn ServiceAuthValidator>,
    authorised: Arc<[String]>,
}

impl ServiceAuthorisation {
    pub fn new(validator: Arc<dyn ServiceAuthValidator>, authorised: &[String]) -> Self {
        Self {
            validator,
            authorised: authorised.into(),
        }
    }

    /// Name of the service owning `token`. 403 when that service is not on
    /// the authorised list.
    pub async fn authorise(&self, token: &str) -> Result<String, AppError> {
        let service = self.validator.service_name(token).await?;
        if self.authorised.iter().any(|s| *s == service) {
            Ok(service)
        } else {
            tracing::warn!(service = %service, "Rejected call from unauthorised service");
            Err(AppError::forbidden(format!(
                "Service '{service}' is not authorised to call this API"
            )))
        }
    }
}

/// Extractor that requires the user token (`Authorization`) and a service
/// token (`ServiceAuthorization`) belonging to an authorised service.
/// Missing headers are 401. A token from a service not on the list is 403.
///
/// The user token is passed through as-is. Work started from a callback runs
/// as the system update user, so the service check is what gates it.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user_token: String,
    pub service_token: String,
    pub service_name: String,
}

fn header_value(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl<S> FromRequestParts<S> for Credentials
where
    S: Send + Sync,
    ServiceAuthorisation: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user_token = header_value(parts, "authorization")
            .ok_or_else(|| AppError::unauthorized("Authorization header required"))?;
        let service_token = header_value(parts, SERVICE_AUTHORIZATION)
            .ok_or_else(|| AppError::unauthorized("ServiceAuthorization header required"))?;

        let service_name = ServiceAuthorisation::from_ref(state)
            .authorise(&service_token)
            .await?;

        Ok(Credentials {
            user_token,
            service_token,
            service_name,
        })
    }
}
