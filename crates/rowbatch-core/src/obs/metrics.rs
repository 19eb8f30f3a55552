use serde::{Deserialize, Serialize};
use std::{
    cell::RefCell,
    collections::BTreeMap,
    time::{SystemTime, UNIX_EPOCH},
};

///
/// EventState
/// Ephemeral, in-memory counters and simple perf totals for batch inserts.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EventState {
    pub ops: EventOps,
    pub perf: EventPerf,
    pub entities: BTreeMap<String, EntityCounters>,
    pub since_ms: u64,
}

impl Default for EventState {
    fn default() -> Self {
        Self {
            ops: EventOps::default(),
            perf: EventPerf::default(),
            entities: BTreeMap::new(),
            since_ms: now_ms(),
        }
    }
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventOps {
    // Executor entrypoints
    pub batch_calls: u64,
    pub statements: u64,

    // Rows
    pub rows_requested: u64,
    pub rows_written: u64,

    // Failures
    pub stale_batches: u64,
    pub too_many_rows: u64,
    pub backend_failures: u64,
    pub constraint_violations: u64,

    // Eligibility decisions, counted once per entity type per thread
    pub plans_eligible: u64,
    pub plans_ineligible: u64,
}

///
/// EntityCounters
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EntityCounters {
    pub batch_calls: u64,
    pub statements: u64,
    pub rows_requested: u64,
    pub rows_written: u64,
    pub row_count_mismatches: u64,
    pub backend_failures: u64,
    pub eligible: Option<bool>,
    pub ineligible_reason: Option<String>,
}

///
/// EventPerf
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventPerf {
    // Wall-clock microseconds per batch call
    pub batch_us_total: u128,
    pub batch_us_max: u64,
}

// Counters are per thread. Eligibility events reach each thread on its
// first lookup of an entity type, not only the thread that ran analysis.
thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all event state.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

/// Accumulate elapsed time and track a max.
pub(crate) fn add_elapsed(total: &mut u128, max: &mut u64, delta: u64) {
    *total = total.saturating_add(u128::from(delta));
    if delta > *max {
        *max = delta;
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

///
/// EventReport
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EventReport {
    /// Ephemeral runtime counters since `since_ms`.
    pub counters: Option<EventState>,
    /// Per-entity counters and averages.
    pub entity_counters: Vec<EntitySummary>,
}

///
/// EntitySummary
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct EntitySummary {
    pub path: String,
    pub batch_calls: u64,
    pub statements: u64,
    pub rows_written: u64,
    pub avg_rows_per_batch: f64,
    pub avg_rows_per_statement: f64,
    pub row_count_mismatches: u64,
    pub backend_failures: u64,
    pub eligible: Option<bool>,
    pub ineligible_reason: Option<String>,
}

/// Build a metrics report from in-memory counters only.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub(crate) fn report() -> EventReport {
    let snap = with_state(Clone::clone);

    let mut entity_counters: Vec<EntitySummary> = snap
        .entities
        .iter()
        .map(|(path, ops)| EntitySummary {
            path: path.clone(),
            batch_calls: ops.batch_calls,
            statements: ops.statements,
            rows_written: ops.rows_written,
            avg_rows_per_batch: average(ops.rows_written, ops.batch_calls),
            avg_rows_per_statement: average(ops.rows_written, ops.statements),
            row_count_mismatches: ops.row_count_mismatches,
            backend_failures: ops.backend_failures,
            eligible: ops.eligible,
            ineligible_reason: ops.ineligible_reason.clone(),
        })
        .collect();

    // busiest entities first, then by path for stable output
    entity_counters.sort_by(|a, b| {
        b.rows_written
            .cmp(&a.rows_written)
            .then_with(|| a.path.cmp(&b.path))
    });

    EventReport {
        counters: Some(snap),
        entity_counters,
    }
}

#[allow(clippy::cast_precision_loss)]
fn average(total: u64, count: u64) -> f64 {
    if count > 0 {
        total as f64 / count as f64
    } else {
        0.0
    }
}
