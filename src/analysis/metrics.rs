use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use serde::Serialize;

const LATENCY_BUCKETS_US: [u64; 6] = [100, 1_000, 10_000, 100_000, 1_000_000, u64::MAX];
const BUCKET_MIDPOINTS_US: [f64; 6] = [50.0, 550.0, 5_500.0, 55_000.0, 550_000.0, 2_000_000.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    VideoExtraction,
    Fusion,
    IndicatorScoring,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::VideoExtraction, Stage::Fusion, Stage::IndicatorScoring];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VideoExtraction => "videoExtraction",
            Self::Fusion => "fusion",
            Self::IndicatorScoring => "indicatorScoring",
        }
    }
}

#[derive(Default)]
struct StageMetrics {
    call_count: AtomicU64,
    error_count: AtomicU64,
    total_latency_us: AtomicU64,
    last_called_at: AtomicI64,
    latency_buckets: [AtomicU64; 6],
}

impl StageMetrics {
    fn record(&self, latency_us: u64, is_error: bool) {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.total_latency_us.fetch_add(latency_us, Ordering::Relaxed);
        if is_error {
            self.error_count.fetch_add(1, Ordering::Relaxed);
        }
        if let Some(i) = LATENCY_BUCKETS_US.iter().position(|t| latency_us <= *t) {
            self.latency_buckets[i].fetch_add(1, Ordering::Relaxed);
        }
        self.last_called_at
            .store(chrono::Utc::now().timestamp_millis(), Ordering::Relaxed);
    }

    fn percentile_us(&self, counts: &[u64; 6], pct: f64) -> f64 {
        let total: u64 = counts.iter().sum();
        if total == 0 {
            return 0.0;
        }
        let target = (pct / 100.0 * total as f64).ceil() as u64;
        let mut cumulative = 0;
        for (i, count) in counts.iter().enumerate() {
            cumulative += count;
            if cumulative >= target {
                return BUCKET_MIDPOINTS_US[i];
            }
        }
        BUCKET_MIDPOINTS_US[5]
    }

    fn snapshot(&self) -> StageSnapshot {
        let counts: [u64; 6] =
            std::array::from_fn(|i| self.latency_buckets[i].load(Ordering::Relaxed));
        let call_count = self.call_count.load(Ordering::Relaxed);
        let total_latency_us = self.total_latency_us.load(Ordering::Relaxed);
        StageSnapshot {
            call_count,
            error_count: self.error_count.load(Ordering::Relaxed),
            avg_latency_us: if call_count > 0 {
                total_latency_us as f64 / call_count as f64
            } else {
                0.0
            },
            p50_latency_us: self.percentile_us(&counts, 50.0),
            p95_latency_us: self.percentile_us(&counts, 95.0),
            last_called_at: self.last_called_at.load(Ordering::Relaxed),
        }
    }
}

/// Lock-free per-stage counters, shared by every request.
pub struct MetricsRegistry {
    stages: BTreeMap<Stage, StageMetrics>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self {
            stages: Stage::ALL
                .iter()
                .map(|s| (*s, StageMetrics::default()))
                .collect(),
        }
    }

    pub fn record_call(&self, stage: Stage, latency_us: u64, is_error: bool) {
        if let Some(metric) = self.stages.get(&stage) {
            metric.record(latency_us, is_error);
        }
    }

    pub fn snapshot(&self) -> BTreeMap<&'static str, StageSnapshot> {
        self.stages
            .iter()
            .map(|(stage, metric)| (stage.as_str(), metric.snapshot()))
            .collect()
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageSnapshot {
    pub call_count: u64,
    pub error_count: u64,
    pub avg_latency_us: f64,
    pub p50_latency_us: f64,
    pub p95_latency_us: f64,
    pub last_called_at: i64,
}
