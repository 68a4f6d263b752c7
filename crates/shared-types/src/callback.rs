use serde::{Deserialize, Serialize};

use crate::CaseDetails;

/// Body the case data store posts to a callback endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>, S: Deserialize<'de>"))]
pub struct CallbackRequest<T, S> {
    pub event_id: String,
    pub case_details: CaseDetails<T, S>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_details_before: Option<CaseDetails<T, S>>,
}

/// Response to an about-to-start or about-to-submit callback. A non-empty
/// `errors` list blocks the event in the case data store UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>, S: Deserialize<'de>"))]
pub struct AboutToStartOrSubmitResponse<T, S> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<S>,
}

impl<T, S> AboutToStartOrSubmitResponse<T, S> {
    pub fn with_data(data: T) -> Self {
        Self {
            data: Some(data),
            errors: Vec::new(),
            warnings: Vec::new(),
            state: None,
        }
    }

    pub fn with_errors(data: T, errors: Vec<String>) -> Self {
        Self {
            data: Some(data),
            errors,
            warnings: Vec::new(),
            state: None,
        }
    }
}

/// Response to a submitted callback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmittedCallbackResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_header: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_body: Option<String>,
}
