//! Service-to-service token leasing with expiry-aware caching.

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::Deserialize;
use sha1::Sha1;
use shared_types::AppError;
use tokio::sync::Mutex;

use crate::config::GatewayConfig;
use crate::error_convert::{ensure_success, ReqwestErrorExt};

/// Seconds before a token's `exp` at which a fresh lease is taken.
const REFRESH_MARGIN_SECS: i64 = 60;

/// One-time passwords step every 30 seconds.
const OTP_STEP_SECS: i64 = 30;

/// Issues the `ServiceAuthorization` token sent with every remote call.
#[async_trait]
pub trait ServiceAuthTokenGenerator: Send + Sync {
    async fn generate(&self) -> Result<String, AppError>;
}

/// Decode a base32 shared secret. Padding, whitespace and letter case are
/// ignored.
fn decode_secret(secret: &str) -> Result<Vec<u8>, AppError> {
    let normalized: String = secret
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '=')
        .map(|c| c.to_ascii_uppercase())
        .collect();
    data_encoding::BASE32_NOPAD
        .decode(normalized.as_bytes())
        .map_err(|e| AppError::internal(format!("S2S secret is not base32: {e}")))
}

/// RFC 6238 six-digit code (HMAC-SHA1, 30 second step) for the given unix
/// time, keyed by the base32 `secret`.
pub fn one_time_password(secret: &str, unix_secs: i64) -> Result<String, AppError> {
    let key = decode_secret(secret)?;
    let counter = (unix_secs / OTP_STEP_SECS) as u64;
    let mut mac = Hmac::<Sha1>::new_from_slice(&key)
        .map_err(|e| AppError::internal(format!("Invalid S2S secret: {e}")))?;
    mac.update(&counter.to_be_bytes());
    let digest = mac.finalize().into_bytes();

    let offset = (digest[digest.len() - 1] & 0x0f) as usize;
    let code = ((u32::from(digest[offset]) & 0x7f) << 24)
        | (u32::from(digest[offset + 1]) << 16)
        | (u32::from(digest[offset + 2]) << 8)
        | u32::from(digest[offset + 3]);

    Ok(format!("{:06}", code % 1_000_000))
}

#[derive(Debug, Deserialize)]
struct ExpiryClaim {
    exp: i64,
}

/// Read `exp` from a JWT without checking its signature.
pub fn token_expiry(token: &str) -> Option<i64> {
    let raw = token.strip_prefix("Bearer ").unwrap_or(token);
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    decode::<ExpiryClaim>(raw, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims.exp)
        .ok()
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    refresh_at: i64,
}

/// Leases tokens from the S2S service and reuses them until shortly before
/// they expire. Tokens without a readable `exp` are never cached.
pub struct S2sTokenGenerator {
    client: reqwest::Client,
    base_url: String,
    microservice: String,
    secret: String,
    cached: Mutex<Option<CachedToken>>,
}

impl S2sTokenGenerator {
    pub fn new(client: reqwest::Client, config: &GatewayConfig) -> Self {
        Self {
            client,
            base_url: config.s2s_url.trim_end_matches('/').to_string(),
            microservice: config.s2s_microservice.clone(),
            secret: config.s2s_secret.clone(),
            cached: Mutex::new(None),
        }
    }

    async fn lease(&self, now: i64) -> Result<String, AppError> {
        let body = serde_json::json!({
            "microservice": self.microservice,
            "oneTimePassword": one_time_password(&self.secret, now)?,
        });

        let response = self
            .client
            .post(format!("{}/lease", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(ReqwestErrorExt::into_app_error)?;

        let token = ensure_success("s2s", response)
            .await?
            .text()
            .await
            .map_err(ReqwestErrorExt::into_app_error)?;

        Ok(format!("Bearer {}", token.trim()))
    }
}

#[async_trait]
impl ServiceAuthTokenGenerator for S2sTokenGenerator {
    async fn generate(&self) -> Result<String, AppError> {
        let now = chrono::Utc::now().timestamp();
        let mut cached = self.cached.lock().await;

        if let Some(entry) = cached.as_ref() {
            if now < entry.refresh_at {
                return Ok(entry.token.clone());
            }
        }

        let token = self.lease(now).await?;
        *cached = token_expiry(&token).map(|exp| CachedToken {
            token: token.clone(),
            refresh_at: exp - REFRESH_MARGIN_SECS,
        });
        tracing::debug!(microservice = %self.microservice, "Leased service token");
        Ok(token)
    }
}

/// Resolves an inbound `ServiceAuthorization` token to the calling service.
#[async_trait]
pub trait ServiceAuthValidator: Send + Sync {
    async fn service_name(&self, token: &str) -> Result<String, AppError>;
}

fn bearer(token: &str) -> String {
    if token.starts_with("Bearer ") {
        token.to_string()
    } else {
        format!("Bearer {token}")
    }
}

/// Asks the S2S service (`GET /details`) which service a token belongs to.
/// A token S2S rejects comes back as `Unauthorized`.
pub struct S2sTokenValidator {
    client: reqwest::Client,
    base_url: String,
}

impl S2sTokenValidator {
    pub fn new(client: reqwest::Client, config: &GatewayConfig) -> Self {
        Self {
            client,
            base_url: config.s2s_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ServiceAuthValidator for S2sTokenValidator {
    async fn service_name(&self, token: &str) -> Result<String, AppError> {
        let response = self
            .client
            .get(format!("{}/details", self.base_url))
            .header("Authorization", bearer(token))
            .send()
            .await
            .map_err(ReqwestErrorExt::into_app_error)?;

        let name = ensure_success("s2s", response)
            .await?
            .text()
            .await
            .map_err(ReqwestErrorExt::into_app_error)?;

        Ok(name.trim().to_string())
    }
}
