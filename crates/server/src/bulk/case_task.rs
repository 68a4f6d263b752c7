//! Per-case transformations applied when a bulk event reaches each case.

use chrono::{Duration, Months, NaiveDate};
use shared_types::{
    AppError, BulkActionCaseData, BulkActionState, CaseData, CaseDetails, CaseState,
    ConditionalOrderCourt,
};
use std::sync::Arc;

use super::{SYSTEM_PRONOUNCE_CASE, SYSTEM_REMOVE_BULK_CASE, SYSTEM_UPDATE_CASE_COURT_HEARING};
use crate::updater::{CaseDataContext, CaseDataUpdaterChain};

/// Transformation applied to a case between starting and submitting an event.
/// An error marks the case as failed for this run.
pub type CaseTask = Arc<
    dyn Fn(CaseDetails<CaseData, CaseState>) -> Result<CaseDetails<CaseData, CaseState>, AppError>
        + Send
        + Sync,
>;

/// Resolves the [`CaseTask`] for a bulk event.
pub trait CaseTaskFactory: Send + Sync {
    fn get_case_task(
        &self,
        details: &CaseDetails<BulkActionCaseData, BulkActionState>,
        event_id: &str,
    ) -> Result<CaseTask, AppError>;
}

/// Days from conditional order grant until a final order can be applied for.
const FINAL_ORDER_WAIT_DAYS: i64 = 43;

/// Months after the applicant's window opens before the respondent may apply.
const RESPONDENT_WAIT_MONTHS: u32 = 3;

/// Date the applicant may apply for a final order (six weeks and one day).
pub fn final_order_eligible_from(granted: NaiveDate) -> NaiveDate {
    granted + Duration::days(FINAL_ORDER_WAIT_DAYS)
}

/// Date the respondent may apply for a final order.
pub fn final_order_eligible_to_respondent(eligible_from: NaiveDate) -> Option<NaiveDate> {
    eligible_from.checked_add_months(Months::new(RESPONDENT_WAIT_MONTHS))
}

fn hearing_chain(
    court: Option<ConditionalOrderCourt>,
    hearing: Option<chrono::NaiveDateTime>,
) -> CaseDataUpdaterChain {
    CaseDataUpdaterChain::new()
        .then(move |mut ctx: CaseDataContext| {
            let court = court.ok_or_else(|| AppError::bad_request("Bulk list has no court"))?;
            ctx.case_data.conditional_order.court = Some(court);
            Ok(ctx)
        })
        .then(move |mut ctx: CaseDataContext| {
            let hearing = hearing
                .ok_or_else(|| AppError::bad_request("Bulk list has no hearing date"))?;
            ctx.case_data.conditional_order.date_and_time_of_hearing = Some(hearing);
            Ok(ctx)
        })
}

fn pronouncement_chain(
    judge: Option<String>,
    hearing: Option<chrono::NaiveDateTime>,
) -> CaseDataUpdaterChain {
    CaseDataUpdaterChain::new()
        .then(move |mut ctx: CaseDataContext| {
            let judge = judge
                .clone()
                .ok_or_else(|| AppError::bad_request("Bulk list has no pronouncement judge"))?;
            ctx.case_data.conditional_order.pronouncement_judge = Some(judge);
            Ok(ctx)
        })
        .then(move |mut ctx: CaseDataContext| {
            let granted = hearing
                .map(|h| h.date())
                .ok_or_else(|| AppError::bad_request("Bulk list has no hearing date"))?;
            ctx.case_data.conditional_order.granted_date = Some(granted);
            ctx.case_data.conditional_order.outcome_case = Some(true);
            Ok(ctx)
        })
        .then(|mut ctx: CaseDataContext| {
            let eligible_from = ctx
                .case_data
                .conditional_order
                .granted_date
                .map(final_order_eligible_from);
            ctx.case_data.final_order.date_final_order_eligible_from = eligible_from;
            ctx.case_data.final_order.date_final_order_eligible_to_respondent =
                eligible_from.and_then(final_order_eligible_to_respondent);
            Ok(ctx)
        })
}

fn remove_chain() -> CaseDataUpdaterChain {
    CaseDataUpdaterChain::new().then(|mut ctx: CaseDataContext| {
        ctx.case_data.bulk_list_case_reference_link = None;
        Ok(ctx)
    })
}

/// Wrap an updater chain as a [`CaseTask`].
fn chain_task(chain: CaseDataUpdaterChain) -> CaseTask {
    Arc::new(move |mut details: CaseDetails<CaseData, CaseState>| {
        let context = chain.process(CaseDataContext::new(details.id, details.data))?;
        details.data = context.case_data;
        Ok(details)
    })
}

/// The production factory: tasks copy hearing or pronouncement details from
/// the bulk list onto each case, or unlink the case from the list.
#[derive(Debug, Clone, Default)]
pub struct BulkCaseCaseTaskFactory;

impl CaseTaskFactory for BulkCaseCaseTaskFactory {
    fn get_case_task(
        &self,
        details: &CaseDetails<BulkActionCaseData, BulkActionState>,
        event_id: &str,
    ) -> Result<CaseTask, AppError> {
        let data = &details.data;
        let chain = match event_id {
            SYSTEM_UPDATE_CASE_COURT_HEARING => {
                hearing_chain(data.court, data.date_and_time_of_hearing)
            }
            SYSTEM_PRONOUNCE_CASE => pronouncement_chain(
                data.pronouncement_judge.clone(),
                data.date_and_time_of_hearing,
            ),
            SYSTEM_REMOVE_BULK_CASE => remove_chain(),
            other => {
                return Err(AppError::bad_request(format!(
                    "Cannot create CaseTask for Event Id: {other}"
                )))
            }
        };
        Ok(chain_task(chain))
    }
}
