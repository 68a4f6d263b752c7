pub mod extractors;
pub mod idam;
pub mod service_auth;

pub use extractors::{Credentials, ServiceAuthorisation};
pub use idam::{HttpIdamService, IdamService};
pub use service_auth::{
    S2sTokenGenerator, S2sTokenValidator, ServiceAuthTokenGenerator, ServiceAuthValidator,
};

use shared_types::{AppError, User};
use std::sync::Arc;

/// The system update user and a service token, fetched together for work
/// that runs outside a caseworker's request.
#[derive(Clone)]
pub struct SystemAuth {
    idam: Arc<dyn IdamService>,
    s2s: Arc<dyn ServiceAuthTokenGenerator>,
}

impl SystemAuth {
    pub fn new(idam: Arc<dyn IdamService>, s2s: Arc<dyn ServiceAuthTokenGenerator>) -> Self {
        Self { idam, s2s }
    }

    pub async fn credentials(&self) -> Result<(User, String), AppError> {
        let user = self.idam.retrieve_system_update_user().await?;
        let service_auth = self.service_token().await?;
        Ok((user, service_auth))
    }

    /// This service's own token, for calls made on behalf of a caller.
    pub async fn service_token(&self) -> Result<String, AppError> {
        self.s2s.generate().await
    }
}
