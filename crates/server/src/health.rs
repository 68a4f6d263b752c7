use axum::Json;
use serde::Serialize;
use shared_types::TaskSettings;
use std::sync::OnceLock;
use std::time::Instant;

static STARTED: OnceLock<Instant> = OnceLock::new();

/// Mark the process as started. Later calls keep the first instant.
pub fn record_start_time() {
    STARTED.get_or_init(Instant::now);
}

/// Liveness report. The case data store is not called, so a slow remote
/// never fails the check.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_seconds: u64,
    pub version: String,
    /// Whether the `scheduled_tasks` flag is on.
    pub scheduled_tasks: bool,
    /// Names of the tasks enabled in `[tasks]`, whether or not the flag is on.
    pub enabled_tasks: Vec<String>,
}

fn enabled_tasks(settings: &TaskSettings) -> Vec<String> {
    [
        ("system-process-failed-pronounced-cases", settings.failed_pronounced_cases),
        ("system-process-failed-scheduled-cases", settings.failed_scheduled_cases),
        ("system-progress-held-cases", settings.progress_held_cases),
        ("system-progress-cases-to-aos-overdue", settings.progress_aos_overdue),
    ]
    .into_iter()
    .filter(|(_, schedule)| schedule.enabled)
    .map(|(name, _)| name.to_string())
    .collect()
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Process is up", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_seconds: STARTED.get().map_or(0, |t| t.elapsed().as_secs()),
        version: env!("CARGO_PKG_VERSION").to_string(),
        scheduled_tasks: crate::config::feature_flags().scheduled_tasks,
        enabled_tasks: enabled_tasks(crate::config::task_settings()),
    })
}
