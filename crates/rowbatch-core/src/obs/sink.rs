//! Metrics sink boundary.
//!
//! Executor logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
use crate::{error::PersistenceErrorKind, obs::metrics};
use std::{cell::RefCell, rc::Rc, time::Instant};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = const { RefCell::new(None) };
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    BatchStart {
        entity_path: &'static str,
        rows: u64,
    },
    BatchFinish {
        entity_path: &'static str,
        rows_written: u64,
        statements: u64,
        elapsed_us: u64,
    },
    RowCountMismatch {
        entity_path: &'static str,
        expected: u64,
        actual: u64,
    },
    BackendFailure {
        entity_path: &'static str,
        kind: PersistenceErrorKind,
    },
    /// `reason` is the snake_case label of the ineligibility reason, or
    /// `None` for an eligible type.
    Eligibility {
        entity_path: &'static str,
        reason: Option<&'static str>,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default sink writing into the thread's metrics state.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::BatchStart { entity_path, rows } => {
                metrics::with_state_mut(|m| {
                    m.ops.batch_calls = m.ops.batch_calls.saturating_add(1);
                    m.ops.rows_requested = m.ops.rows_requested.saturating_add(rows);

                    let entry = m.entities.entry(entity_path.to_string()).or_default();
                    entry.batch_calls = entry.batch_calls.saturating_add(1);
                    entry.rows_requested = entry.rows_requested.saturating_add(rows);
                });
            }

            MetricsEvent::BatchFinish {
                entity_path,
                rows_written,
                statements,
                elapsed_us,
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.rows_written = m.ops.rows_written.saturating_add(rows_written);
                    m.ops.statements = m.ops.statements.saturating_add(statements);
                    metrics::add_elapsed(
                        &mut m.perf.batch_us_total,
                        &mut m.perf.batch_us_max,
                        elapsed_us,
                    );

                    let entry = m.entities.entry(entity_path.to_string()).or_default();
                    entry.rows_written = entry.rows_written.saturating_add(rows_written);
                    entry.statements = entry.statements.saturating_add(statements);
                });
            }

            MetricsEvent::RowCountMismatch {
                entity_path,
                expected,
                actual,
            } => {
                metrics::with_state_mut(|m| {
                    if actual < expected {
                        m.ops.stale_batches = m.ops.stale_batches.saturating_add(1);
                    } else {
                        m.ops.too_many_rows = m.ops.too_many_rows.saturating_add(1);
                    }

                    let entry = m.entities.entry(entity_path.to_string()).or_default();
                    entry.row_count_mismatches = entry.row_count_mismatches.saturating_add(1);
                });
            }

            MetricsEvent::BackendFailure { entity_path, kind } => {
                metrics::with_state_mut(|m| {
                    m.ops.backend_failures = m.ops.backend_failures.saturating_add(1);
                    if kind == PersistenceErrorKind::ConstraintViolation {
                        m.ops.constraint_violations = m.ops.constraint_violations.saturating_add(1);
                    }

                    let entry = m.entities.entry(entity_path.to_string()).or_default();
                    entry.backend_failures = entry.backend_failures.saturating_add(1);
                });
            }

            MetricsEvent::Eligibility {
                entity_path,
                reason,
            } => {
                metrics::with_state_mut(|m| {
                    if reason.is_none() {
                        m.ops.plans_eligible = m.ops.plans_eligible.saturating_add(1);
                    } else {
                        m.ops.plans_ineligible = m.ops.plans_ineligible.saturating_add(1);
                    }

                    let entry = m.entities.entry(entity_path.to_string()).or_default();
                    entry.eligible = Some(reason.is_none());
                    entry.ineligible_reason = reason.map(str::to_string);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    // clone out of the slot so a sink may itself record without re-borrowing
    let sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());

    match sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current thread's metrics state.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all metrics state (counters + perf).
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override on this thread.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}

///
/// Span
/// RAII guard that emits start/finish metrics events for one batch call.
/// Finish accounting happens on drop, so error returns are counted too.
///

pub(crate) struct Span {
    entity_path: &'static str,
    start: Instant,
    rows_written: u64,
    statements: u64,
}

impl Span {
    #[must_use]
    pub(crate) fn new(entity_path: &'static str, rows: u64) -> Self {
        record(MetricsEvent::BatchStart { entity_path, rows });

        Self {
            entity_path,
            start: Instant::now(),
            rows_written: 0,
            statements: 0,
        }
    }

    /// Account for one executed statement and the rows it wrote.
    pub(crate) const fn add_statement(&mut self, rows: u64) {
        self.statements = self.statements.saturating_add(1);
        self.rows_written = self.rows_written.saturating_add(rows);
    }
}

impl Drop for Span {
    fn drop(&mut self) {
        let elapsed_us = u64::try_from(self.start.elapsed().as_micros()).unwrap_or(u64::MAX);

        record(MetricsEvent::BatchFinish {
            entity_path: self.entity_path,
            rows_written: self.rows_written,
            statements: self.statements,
            elapsed_us,
        });
    }
}
