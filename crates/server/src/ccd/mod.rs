//! Gateways onto the case data store: search and event submission.

pub mod client;
pub mod search;
pub mod update;

pub use client::CcdClient;
pub use search::CaseSearchGateway;
pub use update::{submit_event_with_retry, CaseSubmissionGateway, RetryPolicy};
