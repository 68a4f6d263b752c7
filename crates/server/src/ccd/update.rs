use async_trait::async_trait;
use shared_types::{
    AppError, AppErrorKind, BulkActionCaseData, CaseData, CaseDataContent, CaseDetails, CaseState,
    Event, StartEventResponse, User, BULK_ACTION_CASE_TYPE, CASE_TYPE, JURISDICTION,
};
use std::time::Duration;

use super::CcdClient;
use crate::bulk::case_task::CaseTask;

/// Write side of the case data store.
#[async_trait]
pub trait CaseSubmissionGateway: Send + Sync {
    /// Start `event_id` on the case, run `task` over its current data and
    /// submit the result.
    async fn submit_event(
        &self,
        case_id: i64,
        event_id: &str,
        task: &CaseTask,
        user: &User,
        service_auth: &str,
    ) -> Result<(), AppError>;

    /// Submit `event_id` on a bulk-action case, replacing its data with `data`.
    async fn submit_bulk_action_event(
        &self,
        bulk_case_id: i64,
        event_id: &str,
        data: &BulkActionCaseData,
        user: &User,
        service_auth: &str,
    ) -> Result<(), AppError>;
}

/// How many times a single case submission is attempted, and the pause that
/// grows linearly between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn from_settings() -> Self {
        let settings = crate::config::task_settings();
        Self {
            attempts: settings.submit_attempts.max(1),
            backoff: Duration::from_millis(settings.submit_backoff_ms),
        }
    }

    pub fn no_retry() -> Self {
        Self {
            attempts: 1,
            backoff: Duration::ZERO,
        }
    }
}

fn should_retry(err: &AppError) -> bool {
    // 409 means another event changed the case between start and submit.
    err.is_retryable() || err.kind == AppErrorKind::Conflict
}

/// [`CaseSubmissionGateway::submit_event`] with bounded retries on upstream
/// failures and concurrent-modification conflicts.
pub async fn submit_event_with_retry(
    gateway: &dyn CaseSubmissionGateway,
    policy: RetryPolicy,
    case_id: i64,
    event_id: &str,
    task: &CaseTask,
    user: &User,
    service_auth: &str,
) -> Result<(), AppError> {
    let mut attempt = 1;
    loop {
        match gateway
            .submit_event(case_id, event_id, task, user, service_auth)
            .await
        {
            Ok(()) => return Ok(()),
            Err(e) if attempt < policy.attempts && should_retry(&e) => {
                tracing::warn!(
                    case_id,
                    event_id,
                    attempt,
                    error = %e,
                    "Submit event failed, retrying"
                );
                tokio::time::sleep(policy.backoff * attempt).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Convert the raw case from a start-event response into the typed shape a
/// [`CaseTask`] works on.
pub fn typed_case_details(
    raw: CaseDetails<serde_json::Value, String>,
) -> Result<CaseDetails<CaseData, CaseState>, AppError> {
    let state = raw.state.as_deref().map(str::parse::<CaseState>).transpose()?;
    let data: CaseData = serde_json::from_value(raw.data)
        .map_err(|e| AppError::internal(format!("Unreadable case data: {e}")))?;

    Ok(CaseDetails {
        id: raw.id,
        jurisdiction: raw.jurisdiction,
        case_type_id: raw.case_type_id,
        state,
        data,
        created_date: raw.created_date,
        last_modified: raw.last_modified,
    })
}

fn event_path(user: &User, case_type: &str, case_id: i64) -> String {
    format!(
        "/caseworkers/{}/jurisdictions/{}/case-types/{}/cases/{}",
        user.user_details.id, JURISDICTION, case_type, case_id
    )
}

impl CcdClient {
    async fn start_event(
        &self,
        case_type: &str,
        case_id: i64,
        event_id: &str,
        user: &User,
        service_auth: &str,
    ) -> Result<StartEventResponse, AppError> {
        let path = format!(
            "{}/event-triggers/{}/token",
            event_path(user, case_type, case_id),
            event_id
        );
        self.get_json(&path, &user.bearer(), service_auth).await
    }

    async fn submit(
        &self,
        case_type: &str,
        case_id: i64,
        content: &CaseDataContent,
        user: &User,
        service_auth: &str,
    ) -> Result<(), AppError> {
        let path = format!("{}/events", event_path(user, case_type, case_id));
        let _: serde_json::Value = self
            .post_json(&path, content, &user.bearer(), service_auth)
            .await?;
        Ok(())
    }
}

fn content(event_id: &str, token: String, data: serde_json::Value) -> CaseDataContent {
    CaseDataContent {
        event: Event {
            id: event_id.to_string(),
            summary: Some(format!("Bulk event {event_id}")),
            description: None,
        },
        event_token: token,
        data,
        ignore_warning: false,
    }
}

#[async_trait]
impl CaseSubmissionGateway for CcdClient {
    #[tracing::instrument(skip(self, task, user, service_auth))]
    async fn submit_event(
        &self,
        case_id: i64,
        event_id: &str,
        task: &CaseTask,
        user: &User,
        service_auth: &str,
    ) -> Result<(), AppError> {
        let started = self
            .start_event(CASE_TYPE, case_id, event_id, user, service_auth)
            .await?;

        let updated = task(typed_case_details(started.case_details)?)?;
        let data = serde_json::to_value(&updated.data)
            .map_err(|e| AppError::internal(format!("Failed to serialise case data: {e}")))?;

        self.submit(
            CASE_TYPE,
            case_id,
            &content(event_id, started.token, data),
            user,
            service_auth,
        )
        .await?;

        tracing::info!(case_id, event_id, "Submitted event");
        Ok(())
    }

    #[tracing::instrument(skip(self, data, user, service_auth))]
    async fn submit_bulk_action_event(
        &self,
        bulk_case_id: i64,
        event_id: &str,
        data: &BulkActionCaseData,
        user: &User,
        service_auth: &str,
    ) -> Result<(), AppError> {
        let started = self
            .start_event(BULK_ACTION_CASE_TYPE, bulk_case_id, event_id, user, service_auth)
            .await?;

        let data = serde_json::to_value(data)
            .map_err(|e| AppError::internal(format!("Failed to serialise bulk data: {e}")))?;

        self.submit(
            BULK_ACTION_CASE_TYPE,
            bulk_case_id,
            &content(event_id, started.token, data),
            user,
            service_auth,
        )
        .await?;

        tracing::info!(bulk_case_id, event_id, "Submitted bulk action event");
        Ok(())
    }
}
