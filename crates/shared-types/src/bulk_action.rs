use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::{CaseLink, ListValue};

// ── Constants ───────────────────────────────────────────────────────

/// Case type id of bulk-action cases in the case data store.
pub const BULK_ACTION_CASE_TYPE: &str = "NO_FAULT_DIVORCE_BulkAction";

// ── Bulk list entries ───────────────────────────────────────────────

/// One case reference entry inside a bulk action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct BulkListCaseDetails {
    #[serde(default)]
    pub case_parties: String,
    pub case_reference: CaseLink,
}

impl BulkListCaseDetails {
    pub fn new(case_parties: impl Into<String>, case_reference: impl Into<String>) -> Self {
        Self {
            case_parties: case_parties.into(),
            case_reference: CaseLink::new(case_reference),
        }
    }
}

/// A bulk list as stored on the bulk-action case.
pub type BulkList = Vec<ListValue<BulkListCaseDetails>>;

impl ListValue<BulkListCaseDetails> {
    /// The identity of a bulk list entry.
    pub fn case_reference(&self) -> &str {
        &self.value.case_reference.case_reference
    }
}

/// Ordered case references of a bulk list.
pub fn case_references(cases: &[ListValue<BulkListCaseDetails>]) -> Vec<String> {
    cases.iter().map(|c| c.case_reference().to_string()).collect()
}

/// Entries of `cases` whose reference does not appear in `excluded`, in order.
pub fn without_references(
    cases: &[ListValue<BulkListCaseDetails>],
    excluded: &[ListValue<BulkListCaseDetails>],
) -> BulkList {
    let excluded: HashSet<&str> = excluded.iter().map(|c| c.case_reference()).collect();
    cases
        .iter()
        .filter(|c| !excluded.contains(c.case_reference()))
        .cloned()
        .collect()
}

/// Entries of `cases` whose reference appears in `included`, in the order of
/// `cases`.
pub fn with_references(
    cases: &[ListValue<BulkListCaseDetails>],
    included: &[ListValue<BulkListCaseDetails>],
) -> BulkList {
    let included: HashSet<&str> = included.iter().map(|c| c.case_reference()).collect();
    cases
        .iter()
        .filter(|c| included.contains(c.case_reference()))
        .cloned()
        .collect()
}

// ── Bulk-action aggregate ───────────────────────────────────────────

/// Court venues a conditional order hearing can be listed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub enum ConditionalOrderCourt {
    Birmingham,
    BuryStEdmunds,
}

/// Data of a bulk-action case. Fields this service does not model are kept
/// in `extra` so a write-back never drops them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkActionCaseData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub court: Option<ConditionalOrderCourt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_and_time_of_hearing: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronouncement_judge: Option<String>,
    #[serde(default)]
    pub bulk_list_case_details: BulkList,
    #[serde(default)]
    pub errored_case_details: BulkList,
    #[serde(default)]
    pub processed_case_details: BulkList,
    #[serde(default)]
    pub cases_to_be_removed: Vec<ListValue<CaseLink>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_version: Option<u32>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Filter result ───────────────────────────────────────────────────

/// Result of one state-filter pass: every input entry lands in exactly one
/// bucket, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CaseFilterProcessingState {
    pub unprocessed_cases: Vec<ListValue<BulkListCaseDetails>>,
    pub errored_cases: Vec<ListValue<BulkListCaseDetails>>,
    pub processed_cases: Vec<ListValue<BulkListCaseDetails>>,
}
