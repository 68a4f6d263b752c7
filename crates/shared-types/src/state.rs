use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use crate::AppError;

/// Declares a state enum whose variant names are also its wire labels, along
/// with `ALL`, `as_str` and `FromStr`.
macro_rules! state_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($variant) => Ok($name::$variant),)+
                    other => Err(AppError::bad_request(format!(
                        "Unknown {} '{}'",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }
    };
}

state_enum! {
    /// Lifecycle state of an individual dissolution case.
    CaseState {
        Draft,
        AwaitingPayment,
        AwaitingHWFDecision,
        Submitted,
        AwaitingDocuments,
        AwaitingApplicant2Response,
        Applicant2Approved,
        AwaitingService,
        AwaitingAos,
        AosDrafted,
        AosOverdue,
        Holding,
        AwaitingConditionalOrder,
        ConditionalOrderDrafted,
        ConditionalOrderPending,
        AwaitingLegalAdvisorReferral,
        AwaitingClarification,
        AwaitingPronouncement,
        ConditionalOrderPronounced,
        ConditionalOrderRefused,
        OfflineDocumentReceived,
        AwaitingFinalOrder,
        FinalOrderRequested,
        FinalOrderComplete,
        Withdrawn,
        Rejected,
        Archived,
    }
}

state_enum! {
    /// Lifecycle state of a bulk-action (listing/pronouncement) case.
    BulkActionState {
        Created,
        Listed,
        Pronounced,
        Dropped,
        Empty,
    }
}

/// A set of case states; ordered so log output and comparisons are stable.
pub type StateSet = BTreeSet<CaseState>;

/// Build a [`StateSet`] from a slice of states.
pub fn state_set(states: &[CaseState]) -> StateSet {
    states.iter().copied().collect()
}

/// The pre-state / post-state pair a bulk event is filtered against.
///
/// Construction rejects overlapping sets. The filter still classifies a
/// post-state match first, so a `StateSets` built by hand from overlapping
/// sets keeps post-state precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSets {
    pub pre_states: StateSet,
    pub post_states: StateSet,
}

impl StateSets {
    pub fn new(pre_states: StateSet, post_states: StateSet) -> Result<Self, AppError> {
        let overlap: Vec<&str> = pre_states
            .intersection(&post_states)
            .map(CaseState::as_str)
            .collect();

        if !overlap.is_empty() {
            let mut field_errors = HashMap::new();
            field_errors.insert(
                "pre_states".to_string(),
                format!("States also listed as post-states: {}", overlap.join(", ")),
            );
            return Err(AppError::validation(
                "Pre-states and post-states must not overlap",
                field_errors,
            ));
        }

        Ok(Self {
            pre_states,
            post_states,
        })
    }
}
