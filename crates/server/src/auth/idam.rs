//! System-update user lookup against IDAM.

use async_trait::async_trait;
use serde::Deserialize;
use shared_types::{AppError, User, UserDetails};

use crate::config::GatewayConfig;
use crate::error_convert::{ensure_success, ReqwestErrorExt};

/// Supplies the credentials bulk events and scheduled tasks run as.
#[async_trait]
pub trait IdamService: Send + Sync {
    async fn retrieve_system_update_user(&self) -> Result<User, AppError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// IDAM over HTTP: password grant for the system-update account, then
/// `/o/userinfo` for its identity.
pub struct HttpIdamService {
    client: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl HttpIdamService {
    pub fn new(client: reqwest::Client, config: &GatewayConfig) -> Self {
        Self {
            client,
            base_url: config.idam_api_url.trim_end_matches('/').to_string(),
            username: config.system_update_username.clone(),
            password: config.system_update_password.clone(),
            client_id: config.idam_client_id.clone(),
            client_secret: config.idam_client_secret.clone(),
            redirect_uri: config.idam_redirect_uri.clone(),
        }
    }

    async fn access_token(&self) -> Result<String, AppError> {
        let response = self
            .client
            .post(format!("{}/o/token", self.base_url))
            .form(&[
                ("grant_type", "password"),
                ("username", self.username.as_str()),
                ("password", self.password.as_str()),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", "openid profile roles"),
            ])
            .send()
            .await
            .map_err(ReqwestErrorExt::into_app_error)?;

        let token: TokenResponse = ensure_success("idam", response)
            .await?
            .json()
            .await
            .map_err(ReqwestErrorExt::into_app_error)?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl IdamService for HttpIdamService {
    #[tracing::instrument(skip(self))]
    async fn retrieve_system_update_user(&self) -> Result<User, AppError> {
        let token = format!("Bearer {}", self.access_token().await?);

        let response = self
            .client
            .get(format!("{}/o/userinfo", self.base_url))
            .header("Authorization", &token)
            .send()
            .await
            .map_err(ReqwestErrorExt::into_app_error)?;

        let user_details: UserDetails = ensure_success("idam", response)
            .await?
            .json()
            .await
            .map_err(ReqwestErrorExt::into_app_error)?;

        tracing::debug!(user_id = %user_details.id, "Retrieved system update user");
        Ok(User::new(token, user_details))
    }
}
