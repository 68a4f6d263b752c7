use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use shared_types::{
    AppError, BulkActionCaseData, BulkActionState, CaseData, CaseDetails, CaseState, CaseSummary,
    SearchResult, User, BULK_ACTION_CASE_TYPE, CASE_TYPE,
};

use super::CcdClient;

/// Read side of the case data store.
#[async_trait]
pub trait CaseSearchGateway: Send + Sync {
    /// Current id and state of every case among `references` the store knows
    /// about. References the store does not return are simply absent.
    async fn search_for_cases_with_references(
        &self,
        references: &[String],
        user: &User,
        service_auth: &str,
    ) -> Result<Vec<CaseSummary>, AppError>;

    /// Every individual case in `state` that also matches the extra `must`
    /// clauses, across all pages.
    async fn search_for_cases_in_state(
        &self,
        state: CaseState,
        must: Vec<Value>,
        user: &User,
        service_auth: &str,
    ) -> Result<Vec<CaseDetails<CaseData, CaseState>>, AppError>;

    /// Bulk-action cases in `state` whose errored list is non-empty.
    async fn search_for_bulk_actions_with_errors(
        &self,
        state: BulkActionState,
        user: &User,
        service_auth: &str,
    ) -> Result<Vec<CaseDetails<BulkActionCaseData, BulkActionState>>, AppError>;
}

/// Query for the current state of a fixed set of case references.
pub fn references_query(references: &[String]) -> Value {
    json!({
        "query": { "terms": { "reference": references } },
        "_source": ["reference", "state"],
        "size": references.len(),
    })
}

/// Paged query for cases in `state` matching `must`, sorted for stable paging.
pub fn state_query(state: &str, must: &[Value], from: u64, size: u32) -> Value {
    let mut clauses = vec![json!({ "match": { "state": state } })];
    clauses.extend(must.iter().cloned());
    json!({
        "query": { "bool": { "must": clauses } },
        "sort": [{ "_id": "asc" }],
        "from": from,
        "size": size,
    })
}

impl CcdClient {
    async fn search<T: DeserializeOwned>(
        &self,
        case_type: &str,
        query: &Value,
        user: &User,
        service_auth: &str,
    ) -> Result<SearchResult<T>, AppError> {
        self.post_json(
            &format!("/searchCases?ctid={case_type}"),
            query,
            &user.bearer(),
            service_auth,
        )
        .await
    }

    /// Every case in `state` across all pages. Each case is converted on its
    /// own, and a case the typed model rejects is logged and skipped so the
    /// rest of the sweep still runs.
    async fn search_all_pages<T: DeserializeOwned + Send>(
        &self,
        case_type: &str,
        state: &str,
        must: &[Value],
        user: &User,
        service_auth: &str,
    ) -> Result<Vec<T>, AppError> {
        let page_size = crate::config::task_settings().search_page_size.max(1);
        let mut from: u64 = 0;
        let mut all = Vec::new();
        let mut skipped = 0usize;

        loop {
            let query = state_query(state, must, from, page_size);
            let page: SearchResult<Value> =
                self.search(case_type, &query, user, service_auth).await?;
            let fetched = page.cases.len() as u64;
            for raw in page.cases {
                let case_id = raw.get("id").and_then(Value::as_i64);
                match serde_json::from_value::<T>(raw) {
                    Ok(case) => all.push(case),
                    Err(e) => {
                        skipped += 1;
                        tracing::warn!(
                            case_type,
                            case_id,
                            error = %e,
                            "Skipping case that does not match the case model"
                        );
                    }
                }
            }
            from += fetched;

            if fetched == 0 || from >= page.total {
                break;
            }
        }

        tracing::debug!(case_type, state, found = all.len(), skipped, "Search complete");
        Ok(all)
    }
}

#[async_trait]
impl CaseSearchGateway for CcdClient {
    #[tracing::instrument(skip(self, user, service_auth), fields(count = references.len()))]
    async fn search_for_cases_with_references(
        &self,
        references: &[String],
        user: &User,
        service_auth: &str,
    ) -> Result<Vec<CaseSummary>, AppError> {
        if references.is_empty() {
            return Ok(Vec::new());
        }

        let page: SearchResult<CaseSummary> = self
            .search(CASE_TYPE, &references_query(references), user, service_auth)
            .await?;
        Ok(page.cases)
    }

    async fn search_for_cases_in_state(
        &self,
        state: CaseState,
        must: Vec<Value>,
        user: &User,
        service_auth: &str,
    ) -> Result<Vec<CaseDetails<CaseData, CaseState>>, AppError> {
        self.search_all_pages(CASE_TYPE, state.as_str(), &must, user, service_auth)
            .await
    }

    async fn search_for_bulk_actions_with_errors(
        &self,
        state: BulkActionState,
        user: &User,
        service_auth: &str,
    ) -> Result<Vec<CaseDetails<BulkActionCaseData, BulkActionState>>, AppError> {
        let must = vec![json!({ "exists": { "field": "data.erroredCaseDetails" } })];
        let found: Vec<CaseDetails<BulkActionCaseData, BulkActionState>> = self
            .search_all_pages(BULK_ACTION_CASE_TYPE, state.as_str(), &must, user, service_auth)
            .await?;

        Ok(found
            .into_iter()
            .filter(|details| !details.data.errored_case_details.is_empty())
            .collect())
    }
}
