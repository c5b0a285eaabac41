use std::sync::OnceLock;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus exporter and register all application metrics.
/// Returns a `PrometheusHandle` whose `render()` method produces the
/// text/plain Prometheus scrape payload. Safe to call more than once; only
/// the first call installs the recorder.
pub fn init_metrics() -> PrometheusHandle {
    HANDLE
        .get_or_init(|| {
            let handle = PrometheusBuilder::new()
                .install_recorder()
                .expect("failed to install Prometheus recorder");

            // Pre-register counters so they appear even before the first increment.
            counter!("settlement_runs_total").absolute(0);
            counter!("settlement_matches_settled_total").absolute(0);
            counter!("settlement_scores_updated_total").absolute(0);
            counter!("settlement_errors_total").absolute(0);
            gauge!("settlement_in_progress").set(0.0);

            // Histogram is lazily created on first record; force creation.
            histogram!("settlement_duration_seconds").record(0.0);

            handle
        })
        .clone()
}
