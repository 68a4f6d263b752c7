//! Bulk-action pipeline: state filtering, per-case event submission and
//! outcome tracking on the bulk-action case.

pub mod case_task;
pub mod filter;
pub mod pronouncement;
pub mod removal;
pub mod schedule;
pub mod task_util;
pub mod trigger;

pub use case_task::{BulkCaseCaseTaskFactory, CaseTask, CaseTaskFactory};
pub use filter::CaseProcessingStateFilter;
pub use pronouncement::CasePronouncementService;
pub use removal::CaseRemovalService;
pub use schedule::ScheduleCaseService;
pub use task_util::BulkCaseTaskUtil;
pub use trigger::{BulkTriggerService, CcdBulkTriggerService};

use std::sync::Arc;

use crate::auth::SystemAuth;
use crate::ccd::{CaseSearchGateway, CaseSubmissionGateway, RetryPolicy};

// ── Individual case events ──────────────────────────────────────────

pub const SYSTEM_UPDATE_CASE_COURT_HEARING: &str = "system-update-case-court-hearing";
pub const SYSTEM_PRONOUNCE_CASE: &str = "system-pronounce-case";
pub const SYSTEM_REMOVE_BULK_CASE: &str = "system-remove-bulk-case";

// ── Bulk-action case events ─────────────────────────────────────────

pub const SYSTEM_UPDATE_ERRORS: &str = "system-update-errors";
pub const CREATE_BULK_LIST: &str = "create-bulk-list";
pub const SCHEDULE_CASES: &str = "caseworker-schedule-case";
pub const PRONOUNCE_CASES: &str = "system-pronounce-cases";
pub const REMOVE_CASES: &str = "caseworker-remove-cases-bulk-list";

/// Every bulk-action service, wired over one pair of gateways.
#[derive(Clone)]
pub struct BulkActionServices {
    pub filter: CaseProcessingStateFilter,
    pub task_util: BulkCaseTaskUtil,
    pub pronouncement: CasePronouncementService,
    pub schedule: ScheduleCaseService,
    pub removal: CaseRemovalService,
}

impl BulkActionServices {
    pub fn new(
        search: Arc<dyn CaseSearchGateway>,
        submission: Arc<dyn CaseSubmissionGateway>,
        auth: SystemAuth,
        retry: RetryPolicy,
    ) -> Self {
        let trigger: Arc<dyn BulkTriggerService> =
            Arc::new(CcdBulkTriggerService::new(submission.clone(), retry));
        let factory: Arc<dyn CaseTaskFactory> = Arc::new(BulkCaseCaseTaskFactory);

        let filter = CaseProcessingStateFilter::new(search);
        let task_util = BulkCaseTaskUtil::new(trigger.clone(), factory.clone());

        Self {
            pronouncement: CasePronouncementService::new(
                filter.clone(),
                trigger.clone(),
                factory.clone(),
                submission.clone(),
                auth.clone(),
            ),
            schedule: ScheduleCaseService::new(task_util.clone(), submission, auth.clone()),
            removal: CaseRemovalService::new(trigger, factory, auth),
            filter,
            task_util,
        }
    }
}
