use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::AppError;

use crate::config::GatewayConfig;
use crate::error_convert::{ensure_success, ReqwestErrorExt};

/// Thin HTTP client for the case data store. Implements both
/// [`super::CaseSearchGateway`] and [`super::CaseSubmissionGateway`].
#[derive(Clone)]
pub struct CcdClient {
    pub(crate) client: reqwest::Client,
    pub(crate) base_url: String,
}

impl CcdClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(client: reqwest::Client, config: &GatewayConfig) -> Self {
        Self::new(client, config.case_data_store_url.clone())
    }

    pub(crate) async fn get_json<R: DeserializeOwned>(
        &self,
        path: &str,
        user_token: &str,
        service_auth: &str,
    ) -> Result<R, AppError> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .header("Authorization", user_token)
            .header("ServiceAuthorization", service_auth)
            .send()
            .await
            .map_err(ReqwestErrorExt::into_app_error)?;

        ensure_success("case data store", response)
            .await?
            .json()
            .await
            .map_err(ReqwestErrorExt::into_app_error)
    }

    pub(crate) async fn post_json<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        user_token: &str,
        service_auth: &str,
    ) -> Result<R, AppError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .header("Authorization", user_token)
            .header("ServiceAuthorization", service_auth)
            .json(body)
            .send()
            .await
            .map_err(ReqwestErrorExt::into_app_error)?;

        ensure_success("case data store", response)
            .await?
            .json()
            .await
            .map_err(ReqwestErrorExt::into_app_error)
    }
}
