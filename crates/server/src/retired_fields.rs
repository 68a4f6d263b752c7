//! Versioned migrations of retired bulk-action fields.
//!
//! Each bulk-action record carries a `dataVersion`. On load, every migration
//! with a higher version runs in order and the record is stamped with the
//! latest version, so a record is migrated at most once per version.

use serde_json::{Map, Value};
use std::sync::LazyLock;

type Migration = fn(&mut Map<String, Value>);

const DATA_VERSION: &str = "dataVersion";

static MIGRATIONS: LazyLock<Vec<(u32, Migration)>> = LazyLock::new(|| {
    vec![
        (1, rename_hearing_date as Migration),
        (2, rename_judge),
        (3, drop_bulk_case_errors),
    ]
});

fn rename_hearing_date(data: &mut Map<String, Value>) {
    rename(data, "hearingDateAndTime", "dateAndTimeOfHearing");
}

fn rename_judge(data: &mut Map<String, Value>) {
    rename(data, "judgeName", "pronouncementJudge");
}

// Errors are tracked in erroredCaseDetails.
fn drop_bulk_case_errors(data: &mut Map<String, Value>) {
    data.remove("bulkCaseErrors");
}

/// Move `from` to `to` unless `to` is already set.
fn rename(data: &mut Map<String, Value>, from: &str, to: &str) {
    if let Some(value) = data.remove(from) {
        let current = data.get(to).map_or(true, Value::is_null);
        if current {
            data.insert(to.to_string(), value);
        }
    }
}

pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |(version, _)| *version)
}

/// Apply pending migrations to a bulk-action data object. Non-object values
/// are returned as they are.
pub fn migrate(mut data: Value) -> Value {
    if let Some(fields) = data.as_object_mut() {
        let from = fields
            .get(DATA_VERSION)
            .and_then(Value::as_u64)
            .unwrap_or(0);

        let pending: Vec<&(u32, Migration)> = MIGRATIONS
            .iter()
            .filter(|(version, _)| u64::from(*version) > from)
            .collect();

        for (_, migration) in &pending {
            migration(&mut *fields);
        }

        if !pending.is_empty() {
            tracing::debug!(from, applied = pending.len(), "Migrated retired bulk-action fields");
            fields.insert(DATA_VERSION.to_string(), Value::from(latest_version()));
        }
    }
    data
}
