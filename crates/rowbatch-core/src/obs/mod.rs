//! Observability: runtime telemetry (metrics) and sink abstractions.
//!
//! Executor code records `MetricsEvent`s through `sink`; nothing outside
//! this module touches the counters directly.

pub(crate) mod metrics;
pub(crate) mod sink;


// re-exports
pub use metrics::{EntityCounters, EntitySummary, EventOps, EventPerf, EventReport, EventState};
pub use sink::{MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink};
