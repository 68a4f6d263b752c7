use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{CaseLink, ConditionalOrderCourt};

/// Case type id of individual dissolution cases in the case data store.
pub const CASE_TYPE: &str = "NFD";

/// Jurisdiction both case types live under.
pub const JURISDICTION: &str = "DIVORCE";

/// Conditional order fields written by bulk listing and pronouncement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalOrder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub court: Option<ConditionalOrderCourt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_and_time_of_hearing: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronouncement_judge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub granted_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome_case: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Final order dates derived from the conditional order grant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalOrder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_final_order_eligible_from: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_final_order_eligible_to_respondent: Option<NaiveDate>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The slice of an individual case that bulk events and scheduled tasks
/// read or write. Everything else round-trips through `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bulk_list_case_reference_link: Option<CaseLink>,
    #[serde(default)]
    pub conditional_order: ConditionalOrder,
    #[serde(default)]
    pub final_order: FinalOrder,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
