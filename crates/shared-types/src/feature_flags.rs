use serde::{Deserialize, Serialize};

/// Feature flags controlling which optional subsystems are active.
///
/// Loaded from `config.toml` at startup. Every field defaults to `false` so
/// that a missing or incomplete config file disables all optional features.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FeatureFlags {
    #[serde(default)]
    pub telemetry: bool,
    #[serde(default)]
    pub scheduled_tasks: bool,
    #[serde(default)]
    pub swagger: bool,
}

/// How often a single scheduled task runs, and whether it runs at all.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TaskSchedule {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for TaskSchedule {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_secs: default_interval_secs(),
        }
    }
}

fn default_interval_secs() -> u64 {
    3600
}

/// `[tasks]` section: search paging, submit retries and per-task schedules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskSettings {
    #[serde(default = "default_page_size")]
    pub search_page_size: u32,
    #[serde(default = "default_submit_attempts")]
    pub submit_attempts: u32,
    #[serde(default = "default_submit_backoff_ms")]
    pub submit_backoff_ms: u64,
    #[serde(default)]
    pub failed_pronounced_cases: TaskSchedule,
    #[serde(default)]
    pub failed_scheduled_cases: TaskSchedule,
    #[serde(default)]
    pub progress_held_cases: TaskSchedule,
    #[serde(default)]
    pub progress_aos_overdue: TaskSchedule,
}

impl Default for TaskSettings {
    fn default() -> Self {
        Self {
            search_page_size: default_page_size(),
            submit_attempts: default_submit_attempts(),
            submit_backoff_ms: default_submit_backoff_ms(),
            failed_pronounced_cases: TaskSchedule::default(),
            failed_scheduled_cases: TaskSchedule::default(),
            progress_held_cases: TaskSchedule::default(),
            progress_aos_overdue: TaskSchedule::default(),
        }
    }
}

fn default_page_size() -> u32 {
    100
}

fn default_submit_attempts() -> u32 {
    3
}

fn default_submit_backoff_ms() -> u64 {
    200
}

/// `[auth]` section: services allowed to call this API, by the name the S2S
/// service reports for their token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthSettings {
    #[serde(default = "default_authorised_services")]
    pub authorised_services: Vec<String>,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            authorised_services: default_authorised_services(),
        }
    }
}

fn default_authorised_services() -> Vec<String> {
    vec!["ccd_data".to_string()]
}

/// Top-level config file structure matching `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub features: FeatureFlags,
    #[serde(default)]
    pub tasks: TaskSettings,
    #[serde(default)]
    pub auth: AuthSettings,
}
