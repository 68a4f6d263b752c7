//! Envelope types of the case data store API: collection entries, case links,
//! case details, event start/submit payloads and search results.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One entry of a case-data collection field. The case data store assigns
/// `id` when the entry is first persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ListValue<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub value: T,
}

impl<T> ListValue<T> {
    pub fn new(value: T) -> Self {
        Self { id: None, value }
    }

    pub fn with_id(id: impl Into<String>, value: T) -> Self {
        Self {
            id: Some(id.into()),
            value,
        }
    }
}

/// A pointer to another case by its reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CaseLink {
    #[serde(rename = "CaseReference")]
    pub case_reference: String,
}

impl CaseLink {
    pub fn new(case_reference: impl Into<String>) -> Self {
        Self {
            case_reference: case_reference.into(),
        }
    }
}

/// A case as returned by the case data store, typed over its data and state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>, S: Deserialize<'de>"))]
pub struct CaseDetails<T, S> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub jurisdiction: String,
    #[serde(default, alias = "case_type")]
    pub case_type_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<S>,
    #[serde(rename = "case_data", alias = "data")]
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<NaiveDateTime>,
}

impl<T, S> CaseDetails<T, S> {
    pub fn new(id: i64, state: S, data: T) -> Self {
        Self {
            id: Some(id),
            jurisdiction: String::new(),
            case_type_id: String::new(),
            state: Some(state),
            data,
            created_date: None,
            last_modified: None,
        }
    }
}

/// The minimal projection of a case the state filter needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseSummary {
    pub id: i64,
    pub state: String,
}

/// Response of starting an event: the token to submit with and the case as
/// it stands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartEventResponse {
    pub token: String,
    pub case_details: CaseDetails<serde_json::Value, String>,
    #[serde(default)]
    pub event_id: String,
}

/// Event descriptor sent with a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body of an event submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseDataContent {
    pub event: Event,
    pub event_token: String,
    pub data: serde_json::Value,
    #[serde(default)]
    pub ignore_warning: bool,
}

/// A page of search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult<T> {
    pub total: u64,
    pub cases: Vec<T>,
}
