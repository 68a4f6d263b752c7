//! Sequential, short-circuiting application of case data updates.

use shared_types::{AppError, CaseData};

/// The record an updater chain threads through its steps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseDataContext {
    pub case_id: Option<i64>,
    pub case_data: CaseData,
}

impl CaseDataContext {
    pub fn new(case_id: Option<i64>, case_data: CaseData) -> Self {
        Self { case_id, case_data }
    }
}

/// A single step of a [`CaseDataUpdaterChain`].
pub type CaseDataUpdater =
    Box<dyn Fn(CaseDataContext) -> Result<CaseDataContext, AppError> + Send + Sync>;

/// An ordered list of updaters applied left to right. The first error stops
/// the chain and is returned unchanged.
#[derive(Default)]
pub struct CaseDataUpdaterChain {
    updaters: Vec<CaseDataUpdater>,
}

impl CaseDataUpdaterChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step.
    pub fn then<F>(mut self, updater: F) -> Self
    where
        F: Fn(CaseDataContext) -> Result<CaseDataContext, AppError> + Send + Sync + 'static,
    {
        self.updaters.push(Box::new(updater));
        self
    }

    pub fn len(&self) -> usize {
        self.updaters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updaters.is_empty()
    }

    pub fn process(&self, context: CaseDataContext) -> Result<CaseDataContext, AppError> {
        self.updaters
            .iter()
            .try_fold(context, |context, updater| updater(context))
    }
}
