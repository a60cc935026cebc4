//! Scoring counters and latency statistics, exported in Prometheus text format.

use crate::types::verdict::{BatchOutcome, Confidence, Verdict};
use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Upper bound on retained latency samples
const MAX_SAMPLES: usize = 10_000;

/// Metrics collector shared by all request handlers
pub struct ScoringMetrics {
    /// Successful single predictions
    pub predictions: AtomicU64,
    /// Batch requests that were accepted
    pub batch_requests: AtomicU64,
    /// Batch items scored successfully
    pub batch_items_scored: AtomicU64,
    /// Batch items reported with an error
    pub batch_items_failed: AtomicU64,
    /// Verdicts with `is_fraud = true`, both endpoints
    pub fraud_verdicts: AtomicU64,
    high_confidence: AtomicU64,
    medium_confidence: AtomicU64,
    /// Request-level errors by kind
    errors_by_kind: RwLock<BTreeMap<&'static str, u64>>,
    /// Request processing times (in microseconds)
    processing_times: RwLock<Vec<u64>>,
    /// Fraud probability distribution buckets
    score_buckets: RwLock<[u64; 10]>,
    start_time: Instant,
}

impl ScoringMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            predictions: AtomicU64::new(0),
            batch_requests: AtomicU64::new(0),
            batch_items_scored: AtomicU64::new(0),
            batch_items_failed: AtomicU64::new(0),
            fraud_verdicts: AtomicU64::new(0),
            high_confidence: AtomicU64::new(0),
            medium_confidence: AtomicU64::new(0),
            errors_by_kind: RwLock::new(BTreeMap::new()),
            processing_times: RwLock::new(Vec::with_capacity(1000)),
            score_buckets: RwLock::new([0; 10]),
            start_time: Instant::now(),
        }
    }

    /// Record a successful single prediction
    pub fn record_prediction(&self, verdict: &Verdict, processing_time: Duration) {
        self.predictions.fetch_add(1, Ordering::Relaxed);
        self.record_verdict(verdict);
        self.record_time(processing_time);
    }

    /// Record an accepted batch and the outcome of each of its items
    pub fn record_batch(&self, outcomes: &[BatchOutcome], processing_time: Duration) {
        self.batch_requests.fetch_add(1, Ordering::Relaxed);
        for outcome in outcomes {
            match outcome.verdict() {
                Some(verdict) => {
                    self.batch_items_scored.fetch_add(1, Ordering::Relaxed);
                    self.record_verdict(verdict);
                }
                None => {
                    self.batch_items_failed.fetch_add(1, Ordering::Relaxed);
                }
            }
        }
        self.record_time(processing_time);
    }

    /// Record a request-level error
    pub fn record_error(&self, kind: &'static str) {
        if let Ok(mut by_kind) = self.errors_by_kind.write() {
            *by_kind.entry(kind).or_insert(0) += 1;
        }
    }

    fn record_verdict(&self, verdict: &Verdict) {
        if verdict.is_fraud {
            self.fraud_verdicts.fetch_add(1, Ordering::Relaxed);
        }

        match verdict.confidence {
            Confidence::High => self.high_confidence.fetch_add(1, Ordering::Relaxed),
            Confidence::Medium => self.medium_confidence.fetch_add(1, Ordering::Relaxed),
        };

        let bucket = (verdict.fraud_probability * 10.0).clamp(0.0, 9.0) as usize;
        if let Ok(mut buckets) = self.score_buckets.write() {
            buckets[bucket] += 1;
        }
    }

    fn record_time(&self, processing_time: Duration) {
        if let Ok(mut times) = self.processing_times.write() {
            times.push(processing_time.as_micros() as u64);
            // Keep the most recent half once full
            if times.len() > MAX_SAMPLES {
                times.drain(0..MAX_SAMPLES / 2);
            }
        }
    }

    /// Get processing time statistics
    pub fn get_processing_stats(&self) -> ProcessingStats {
        let sorted = match self.processing_times.read() {
            Ok(times) if !times.is_empty() => {
                let mut sorted = times.clone();
                sorted.sort_unstable();
                sorted
            }
            _ => return ProcessingStats::default(),
        };

        let count = sorted.len();

        ProcessingStats {
            count: count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[(count as f64 * 0.95) as usize],
            p99_us: sorted[(count as f64 * 0.99) as usize],
        }
    }

    /// Get request-level errors by kind
    pub fn get_errors_by_kind(&self) -> BTreeMap<&'static str, u64> {
        self.errors_by_kind
            .read()
            .map(|by_kind| by_kind.clone())
            .unwrap_or_default()
    }

    /// Get fraud probability distribution
    pub fn get_score_distribution(&self) -> [u64; 10] {
        self.score_buckets.read().map(|b| *b).unwrap_or([0; 10])
    }

    /// Prometheus text exposition of every counter
    pub fn render_prometheus(&self) -> String {
        let mut out = String::new();
        let load = |counter: &AtomicU64| counter.load(Ordering::Relaxed);

        let counters = [
            ("fraud_scoring_predictions_total", "Successful single predictions", load(&self.predictions)),
            ("fraud_scoring_batch_requests_total", "Accepted batch requests", load(&self.batch_requests)),
            ("fraud_scoring_batch_items_scored_total", "Batch items scored", load(&self.batch_items_scored)),
            ("fraud_scoring_batch_items_failed_total", "Batch items reported with an error", load(&self.batch_items_failed)),
            ("fraud_scoring_fraud_verdicts_total", "Verdicts flagged as fraud", load(&self.fraud_verdicts)),
        ];
        for (name, help, value) in counters {
            let _ = writeln!(out, "# HELP {name} {help}\n# TYPE {name} counter\n{name} {value}");
        }

        let _ = writeln!(
            out,
            "# HELP fraud_scoring_confidence_total Verdicts by confidence tier\n\
             # TYPE fraud_scoring_confidence_total counter\n\
             fraud_scoring_confidence_total{{confidence=\"high\"}} {}\n\
             fraud_scoring_confidence_total{{confidence=\"medium\"}} {}",
            load(&self.high_confidence),
            load(&self.medium_confidence)
        );

        let _ = writeln!(
            out,
            "# HELP fraud_scoring_errors_total Request-level errors by kind\n\
             # TYPE fraud_scoring_errors_total counter"
        );
        for (kind, count) in self.get_errors_by_kind() {
            let _ = writeln!(out, "fraud_scoring_errors_total{{kind=\"{kind}\"}} {count}");
        }

        let _ = writeln!(
            out,
            "# HELP fraud_scoring_probability_bucket Verdicts by fraud probability decile\n\
             # TYPE fraud_scoring_probability_bucket counter"
        );
        for (i, count) in self.get_score_distribution().iter().enumerate() {
            let _ = writeln!(
                out,
                "fraud_scoring_probability_bucket{{range=\"{:.1}-{:.1}\"}} {}",
                i as f64 / 10.0,
                (i + 1) as f64 / 10.0,
                count
            );
        }

        let stats = self.get_processing_stats();
        let _ = writeln!(
            out,
            "# HELP fraud_scoring_processing_microseconds Request processing time\n\
             # TYPE fraud_scoring_processing_microseconds summary\n\
             fraud_scoring_processing_microseconds{{quantile=\"0.5\"}} {}\n\
             fraud_scoring_processing_microseconds{{quantile=\"0.95\"}} {}\n\
             fraud_scoring_processing_microseconds{{quantile=\"0.99\"}} {}\n\
             fraud_scoring_processing_microseconds_count {}",
            stats.p50_us, stats.p95_us, stats.p99_us, stats.count
        );

        let _ = writeln!(
            out,
            "# HELP fraud_scoring_uptime_seconds Seconds since the service started\n\
             # TYPE fraud_scoring_uptime_seconds gauge\n\
             fraud_scoring_uptime_seconds {}",
            self.start_time.elapsed().as_secs()
        );

        out
    }
}

impl Default for ScoringMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Processing time statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub count: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
}
