//! Prometheus metrics for scoring runs.
//!
//! Recording goes through the `metrics` facade and is a no-op until a
//! recorder is installed. `Metrics::init` installs the Prometheus recorder
//! once per process; the exposition text is returned by `render()`.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

use crate::model::Dimension;

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder (first call) and describe all series.
    pub fn init() -> Self {
        let handle = HANDLE
            .get_or_init(|| {
                let handle = PrometheusBuilder::new()
                    .install_recorder()
                    .expect("prometheus: install recorder");
                describe_all();
                handle
            })
            .clone();
        Self { handle }
    }

    /// Prometheus exposition format.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

fn describe_all() {
    describe_counter!(
        "scoring_materials_scored_total",
        "Materials scored successfully in batch runs."
    );
    describe_counter!(
        "scoring_material_failures_total",
        "Materials rejected during batch runs."
    );
    describe_counter!(
        "scoring_records_total",
        "Score records produced, by dimension."
    );
    describe_histogram!(
        "scoring_batch_duration_ms",
        "Wall time of a batch recalculation in milliseconds."
    );
    describe_gauge!(
        "coverage_cache_materials",
        "Materials in the most recently built coverage cache."
    );
    describe_counter!(
        "confidence_mismatches_total",
        "Stated confidence levels not backed by enough sources."
    );
}

pub(crate) fn record_score(dimension: Dimension) {
    counter!("scoring_records_total", "dimension" => dimension.code()).increment(1);
}

pub(crate) fn record_batch(scored: usize, failed: usize, elapsed_ms: f64) {
    counter!("scoring_materials_scored_total").increment(scored as u64);
    counter!("scoring_material_failures_total").increment(failed as u64);
    histogram!("scoring_batch_duration_ms").record(elapsed_ms);
}

pub(crate) fn record_cache_build(materials: usize) {
    gauge!("coverage_cache_materials").set(materials as f64);
}

pub(crate) fn record_confidence_mismatch() {
    counter!("confidence_mismatches_total").increment(1);
}
