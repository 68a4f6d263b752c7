use shared_types::{AppConfig, AppError, AuthSettings, FeatureFlags, TaskSettings};
use std::sync::OnceLock;
use std::time::Duration;

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Path to the config file, relative to the working directory.
const CONFIG_PATH: &str = "config.toml";

/// Parse a config file body. An unparseable body yields the defaults.
pub fn parse_config(contents: &str) -> AppConfig {
    toml::from_str(contents).unwrap_or_else(|e| {
        tracing::warn!(error = %e, path = CONFIG_PATH, "Failed to parse config, using defaults");
        AppConfig::default()
    })
}

/// Read `config.toml` and store it in the global `OnceLock`. Only the first
/// call has effect.
///
/// If the file is missing or unparseable, all flags are off and every task
/// keeps its default schedule (disabled).
pub fn load_config() {
    CONFIG.get_or_init(|| match std::fs::read_to_string(CONFIG_PATH) {
        Ok(contents) => {
            let config = parse_config(&contents);
            tracing::info!(features = ?config.features, "Loaded {CONFIG_PATH}");
            config
        }
        Err(e) => {
            tracing::info!(error = %e, "{CONFIG_PATH} not found, using defaults");
            AppConfig::default()
        }
    });
}

/// The loaded feature flags, or all-off defaults before `load_config()`.
pub fn feature_flags() -> &'static FeatureFlags {
    static DEFAULT: FeatureFlags = FeatureFlags {
        telemetry: false,
        scheduled_tasks: false,
        swagger: false,
    };
    CONFIG.get().map(|c| &c.features).unwrap_or(&DEFAULT)
}

/// The loaded `[tasks]` settings, or defaults before `load_config()`.
pub fn task_settings() -> &'static TaskSettings {
    static DEFAULT: OnceLock<TaskSettings> = OnceLock::new();
    CONFIG
        .get()
        .map(|c| &c.tasks)
        .unwrap_or_else(|| DEFAULT.get_or_init(TaskSettings::default))
}

/// The loaded `[auth]` settings, or defaults before `load_config()`.
pub fn auth_settings() -> &'static AuthSettings {
    static DEFAULT: OnceLock<AuthSettings> = OnceLock::new();
    CONFIG
        .get()
        .map(|c| &c.auth)
        .unwrap_or_else(|| DEFAULT.get_or_init(AuthSettings::default))
}

// ── Environment ─────────────────────────────────────────────────────

fn required_env(name: &str) -> Result<String, AppError> {
    std::env::var(name).map_err(|_| AppError::internal(format!("{name} is not configured")))
}

fn optional_env(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Endpoints and credentials of the remote collaborators.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub case_data_store_url: String,
    pub idam_api_url: String,
    pub s2s_url: String,
    pub s2s_microservice: String,
    pub s2s_secret: String,
    pub system_update_username: String,
    pub system_update_password: String,
    pub idam_client_id: String,
    pub idam_client_secret: String,
    pub idam_redirect_uri: String,
    pub http_timeout: Duration,
}

impl GatewayConfig {
    /// Read gateway settings from the environment (after loading `.env`).
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        let timeout_secs = optional_env("HTTP_TIMEOUT_SECS", "30")
            .parse::<u64>()
            .map_err(|_| AppError::internal("HTTP_TIMEOUT_SECS must be a whole number"))?;

        Ok(Self {
            case_data_store_url: required_env("CASE_DATA_STORE_BASEURL")?,
            idam_api_url: required_env("IDAM_API_BASEURL")?,
            s2s_url: required_env("S2S_URL")?,
            s2s_microservice: optional_env("S2S_MICROSERVICE", "nfdiv_case_api"),
            s2s_secret: required_env("S2S_SECRET")?,
            system_update_username: required_env("IDAM_SYSTEM_UPDATE_USERNAME")?,
            system_update_password: required_env("IDAM_SYSTEM_UPDATE_PASSWORD")?,
            idam_client_id: optional_env("IDAM_CLIENT_ID", "divorce"),
            idam_client_secret: required_env("IDAM_CLIENT_SECRET")?,
            idam_redirect_uri: optional_env("IDAM_REDIRECT_URI", "http://localhost:3001/oauth2/callback"),
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Build the shared HTTP client every gateway uses.
    pub fn http_client(&self) -> Result<reqwest::Client, AppError> {
        reqwest::Client::builder()
            .timeout(self.http_timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))
    }
}

/// Address the HTTP server binds to.
pub fn bind_addr() -> String {
    optional_env("BIND_ADDR", "0.0.0.0:4013")
}
