use shared_types::AppError;

/// Convert a transport-level `reqwest::Error` into an AppError.
pub fn reqwest_to_app_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::upstream(format!("Upstream request timed out: {err}"))
    } else if err.is_decode() {
        AppError::internal(format!("Failed to decode upstream response: {err}"))
    } else {
        AppError::upstream(err.to_string())
    }
}

/// Extension trait providing `.into_app_error()` on reqwest::Error.
pub trait ReqwestErrorExt {
    fn into_app_error(self) -> AppError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_app_error(self) -> AppError {
        reqwest_to_app_error(self)
    }
}

/// Map a non-2xx upstream status to an AppError, naming the collaborator.
pub fn status_to_app_error(service: &str, status: reqwest::StatusCode, body: &str) -> AppError {
    let message = format!("{service} returned {status}: {body}");
    match status.as_u16() {
        401 => AppError::unauthorized(message),
        403 => AppError::forbidden(message),
        404 => AppError::not_found(message),
        409 => AppError::conflict(message),
        400 | 422 => AppError::bad_request(message),
        _ => AppError::upstream(message),
    }
}

/// Turn a response into `Ok(response)` when 2xx, otherwise read the body and
/// map the status with [`status_to_app_error`].
pub async fn ensure_success(
    service: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, AppError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(status_to_app_error(service, status, &body))
}

/// Trait for validating request DTOs before processing.
pub trait ValidateRequest {
    fn validate_request(&self) -> Result<(), AppError>;
}

impl<T: validator::Validate> ValidateRequest for T {
    fn validate_request(&self) -> Result<(), AppError> {
        self.validate().map_err(AppError::from)
    }
}
