//! Decision metrics with Prometheus text export

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use super::decision::BatchOutcome;
use crate::error::AuthzError;
use crate::types::Grant;

/// Engine metrics snapshot
#[derive(Debug, Clone, Default)]
pub struct EngineMetrics {
    /// Total number of per-item decisions
    pub total_decisions: u64,

    /// Decisions that granted access
    pub granted: u64,

    /// Decisions refused with one of the member errors
    pub denied: u64,

    /// Decisions aborted on corrupt grant data
    pub faults: u64,

    /// Collaborator failures (item not found, store errors)
    pub resolver_errors: u64,

    /// Number of batch calls
    pub batches: u64,

    pub latency_p50_ms: f64,
    pub latency_p99_ms: f64,
    pub avg_latency_ms: f64,
}

impl EngineMetrics {
    /// Fraction of decisions that granted access
    pub fn grant_rate(&self) -> f64 {
        if self.total_decisions == 0 {
            0.0
        } else {
            self.granted as f64 / self.total_decisions as f64
        }
    }
}

/// Counts of one decision call, single or batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecisionCounts {
    pub granted: u64,
    pub denied: u64,
    pub faults: u64,
    pub resolver_errors: u64,
}

impl DecisionCounts {
    fn count_error(&mut self, error: &AuthzError) {
        match error.as_decision() {
            Some(e) if e.is_denial() => self.denied += 1,
            Some(_) => self.faults += 1,
            None => self.resolver_errors += 1,
        }
    }

    /// Counts for one single-item decision
    pub fn from_result(result: &Result<Option<Grant>, AuthzError>) -> Self {
        let mut counts = Self::default();
        match result {
            Ok(_) => counts.granted += 1,
            Err(e) => counts.count_error(e),
        }
        counts
    }

    /// Counts for every entry of a batch outcome
    pub fn from_batch(outcome: &BatchOutcome) -> Self {
        let mut counts = Self {
            granted: outcome.data.len() as u64,
            ..Self::default()
        };
        for error in &outcome.errors {
            counts.count_error(error);
        }
        counts
    }

    pub fn total(&self) -> u64 {
        self.granted + self.denied + self.faults + self.resolver_errors
    }
}

/// Metrics collector
pub struct MetricsCollector {
    metrics: Arc<RwLock<EngineMetrics>>,

    /// Latency samples for percentile calculation
    latency_samples: Arc<RwLock<Vec<f64>>>,

    max_samples: usize,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            metrics: Arc::new(RwLock::new(EngineMetrics::default())),
            latency_samples: Arc::new(RwLock::new(Vec::with_capacity(10_000))),
            max_samples: 10_000,
        }
    }

    /// Record the outcome of one `decide` call
    pub async fn record_decision(&self, counts: DecisionCounts, latency: Duration) {
        self.add_counts(counts, false).await;
        self.record_latency(latency).await;
    }

    /// Record the outcome of one `decide_many` call
    pub async fn record_batch(&self, counts: DecisionCounts, latency: Duration) {
        self.add_counts(counts, true).await;
        self.record_latency(latency).await;
    }

    async fn add_counts(&self, counts: DecisionCounts, batch: bool) {
        let mut metrics = self.metrics.write().await;
        metrics.total_decisions += counts.total();
        metrics.granted += counts.granted;
        metrics.denied += counts.denied;
        metrics.faults += counts.faults;
        metrics.resolver_errors += counts.resolver_errors;
        if batch {
            metrics.batches += 1;
        }
    }

    async fn record_latency(&self, latency: Duration) {
        let latency_ms = latency.as_secs_f64() * 1000.0;

        let mut samples = self.latency_samples.write().await;
        samples.push(latency_ms);

        // Keep only recent samples
        if samples.len() > self.max_samples {
            samples.drain(0..1_000);
        }

        let mut metrics = self.metrics.write().await;

        let sum: f64 = samples.iter().sum();
        metrics.avg_latency_ms = sum / samples.len() as f64;

        let mut sorted = samples.clone();
        sorted.sort_by(f64::total_cmp);

        metrics.latency_p50_ms = Self::percentile(&sorted, 0.50);
        metrics.latency_p99_ms = Self::percentile(&sorted, 0.99);
    }

    /// Get current metrics snapshot
    pub async fn get_metrics(&self) -> EngineMetrics {
        self.metrics.read().await.clone()
    }

    /// Reset all metrics
    pub async fn reset(&self) {
        *self.metrics.write().await = EngineMetrics::default();
        self.latency_samples.write().await.clear();
    }

    /// Export metrics in Prometheus format
    pub async fn export_prometheus(&self) -> String {
        let metrics = self.metrics.read().await;

        format!(
            r#"# HELP folio_authz_decisions_total Per-item authorization decisions
# TYPE folio_authz_decisions_total counter
folio_authz_decisions_total{{outcome="granted"}} {}
folio_authz_decisions_total{{outcome="denied"}} {}
folio_authz_decisions_total{{outcome="fault"}} {}
folio_authz_decisions_total{{outcome="resolver_error"}} {}

# HELP folio_authz_batches_total Batch decision calls
# TYPE folio_authz_batches_total counter
folio_authz_batches_total {}

# HELP folio_authz_latency_seconds Decision call latency percentiles
# TYPE folio_authz_latency_seconds summary
folio_authz_latency_seconds{{quantile="0.5"}} {}
folio_authz_latency_seconds{{quantile="0.99"}} {}
"#,
            metrics.granted,
            metrics.denied,
            metrics.faults,
            metrics.resolver_errors,
            metrics.batches,
            metrics.latency_p50_ms / 1000.0,
            metrics.latency_p99_ms / 1000.0,
        )
    }

    fn percentile(sorted: &[f64], p: f64) -> f64 {
        if sorted.is_empty() {
            return 0.0;
        }

        let idx = ((sorted.len() as f64) * p) as usize;
        let idx = idx.min(sorted.len() - 1);
        sorted[idx]
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
