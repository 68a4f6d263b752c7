//! Background jobs that sweep the case data store on a fixed interval.

pub mod due_date_progression;
pub mod failed_bulk_cases;

pub use due_date_progression::{SystemProgressCasesToAosOverdueTask, SystemProgressHeldCasesTask};
pub use failed_bulk_cases::{
    SystemProcessFailedPronouncedCasesTask, SystemProcessFailedScheduledCasesTask,
};

use async_trait::async_trait;
use shared_types::{AppError, FeatureFlags, TaskSchedule, TaskSettings};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::auth::SystemAuth;
use crate::bulk::BulkCaseTaskUtil;
use crate::ccd::{CaseSearchGateway, CaseSubmissionGateway, RetryPolicy};

#[async_trait]
pub trait ScheduledTask: Send + Sync {
    fn name(&self) -> &'static str;

    /// One sweep. Per-case failures are logged inside; an error here means
    /// the sweep could not run at all.
    async fn run(&self) -> Result<(), AppError>;
}

/// Gateways and services every task is built from.
#[derive(Clone)]
pub struct TaskDeps {
    pub search: Arc<dyn CaseSearchGateway>,
    pub submission: Arc<dyn CaseSubmissionGateway>,
    pub task_util: BulkCaseTaskUtil,
    pub auth: SystemAuth,
    pub retry: RetryPolicy,
}

/// Every task paired with its configured schedule.
pub fn scheduled_tasks(
    deps: &TaskDeps,
    settings: &TaskSettings,
) -> Vec<(Arc<dyn ScheduledTask>, TaskSchedule)> {
    vec![
        (
            Arc::new(SystemProcessFailedPronouncedCasesTask::new(deps.clone()))
                as Arc<dyn ScheduledTask>,
            settings.failed_pronounced_cases,
        ),
        (
            Arc::new(SystemProcessFailedScheduledCasesTask::new(deps.clone()))
                as Arc<dyn ScheduledTask>,
            settings.failed_scheduled_cases,
        ),
        (
            Arc::new(SystemProgressHeldCasesTask::new(deps.clone()))
                as Arc<dyn ScheduledTask>,
            settings.progress_held_cases,
        ),
        (
            Arc::new(SystemProgressCasesToAosOverdueTask::new(deps.clone()))
                as Arc<dyn ScheduledTask>,
            settings.progress_aos_overdue,
        ),
    ]
}

/// Spawn a loop per enabled task. Nothing is spawned unless the
/// `scheduled_tasks` feature flag is on.
pub fn spawn_all(
    tasks: Vec<(Arc<dyn ScheduledTask>, TaskSchedule)>,
    flags: &FeatureFlags,
    cancel: CancellationToken,
) -> Vec<JoinHandle<()>> {
    if !flags.scheduled_tasks {
        tracing::info!("Scheduled tasks disabled");
        return Vec::new();
    }

    tasks
        .into_iter()
        .filter(|(task, schedule)| {
            if !schedule.enabled {
                tracing::info!(task = task.name(), "Scheduled task disabled");
            }
            schedule.enabled
        })
        .map(|(task, schedule)| {
            let cancel = cancel.clone();
            tokio::spawn(run_loop(
                task,
                Duration::from_secs(schedule.interval_secs.max(1)),
                cancel,
            ))
        })
        .collect()
}

async fn run_loop(task: Arc<dyn ScheduledTask>, period: Duration, cancel: CancellationToken) {
    tracing::info!(
        task = task.name(),
        interval_secs = period.as_secs(),
        "Scheduled task started"
    );
    let mut interval = tokio::time::interval(period);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(task = task.name(), "Scheduled task stopping");
                break;
            }
            _ = interval.tick() => {
                match task.run().await {
                    Ok(()) => tracing::debug!(task = task.name(), "Scheduled task completed"),
                    Err(e) => tracing::error!(task = task.name(), error = %e, "Scheduled task failed"),
                }
            }
        }
    }
}
