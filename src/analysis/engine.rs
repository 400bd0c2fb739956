use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{RwLock, Semaphore};

use crate::analysis::config::AnalysisConfig;
use crate::analysis::deviation;
use crate::analysis::error::AnalysisError;
use crate::analysis::fusion;
use crate::analysis::metrics::{MetricsRegistry, Stage};
use crate::analysis::types::*;
use crate::analysis::video::{
    extract_video_metrics, FrameSource, LandmarkDetector, LandmarkTrack, PreAnnotated,
};

/// Fusion verdict plus the metrics it was computed from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub analysis_id: String,
    #[serde(flatten)]
    pub result: FusionResult,
    pub audio: Option<AudioMetrics>,
    pub video: Option<VideoMetrics>,
    pub analyzed_at: DateTime<Utc>,
}

/// Owns the active scoring policy and runs video extraction off the async
/// runtime. Each video gets its own blocking worker and state machine;
/// nothing mutable is shared between videos.
pub struct AnalysisEngine {
    config: Arc<RwLock<AnalysisConfig>>,
    metrics_registry: Arc<MetricsRegistry>,
    video_slots: Arc<Semaphore>,
}

impl AnalysisEngine {
    pub fn new(config: AnalysisConfig, max_concurrent_videos: usize) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            metrics_registry: Arc::new(MetricsRegistry::new()),
            video_slots: Arc::new(Semaphore::new(max_concurrent_videos.max(1))),
        }
    }

    pub async fn reload_config(&self, new_config: AnalysisConfig) -> Result<(), AnalysisError> {
        new_config.validate().map_err(AnalysisError::InvalidConfig)?;
        let mut cfg = self.config.write().await;
        *cfg = new_config;
        tracing::info!("Analysis config reloaded");
        Ok(())
    }

    pub async fn get_config(&self) -> AnalysisConfig {
        self.config.read().await.clone()
    }

    pub fn metrics_registry(&self) -> &Arc<MetricsRegistry> {
        &self.metrics_registry
    }

    /// Runs the frame pipeline for one video on a blocking worker.
    pub async fn extract_video<S, D>(
        &self,
        mut source: S,
        mut detector: D,
    ) -> Result<VideoMetrics, AnalysisError>
    where
        S: FrameSource + Send + 'static,
        D: LandmarkDetector<S::Frame> + Send + 'static,
    {
        let config = self.get_config().await;
        let permit = self
            .video_slots
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| AnalysisError::WorkerFailed(e.to_string()))?;

        let start = Instant::now();
        let outcome = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            extract_video_metrics(&mut source, &mut detector, &config.video)
        })
        .await
        .map_err(AnalysisError::from)
        .and_then(|r| r);

        let latency_us = start.elapsed().as_micros() as u64;
        self.metrics_registry
            .record_call(Stage::VideoExtraction, latency_us, outcome.is_err());
        if let Err(e) = &outcome {
            tracing::warn!(error = %e, "video extraction failed");
        }
        outcome
    }

    /// Analyzes independent videos concurrently; results keep input order.
    pub async fn extract_videos<S, D>(
        &self,
        jobs: Vec<(S, D)>,
    ) -> Vec<Result<VideoMetrics, AnalysisError>>
    where
        S: FrameSource + Send + 'static,
        D: LandmarkDetector<S::Frame> + Send + 'static,
    {
        let futures = jobs
            .into_iter()
            .map(|(source, detector)| self.extract_video(source, detector));
        futures::future::join_all(futures).await
    }

    pub async fn fuse(
        &self,
        audio: Option<&AudioMetrics>,
        video: Option<&VideoMetrics>,
        baseline: &Baseline,
    ) -> FusionResult {
        let config = self.config.read().await;
        let start = Instant::now();
        let result = fusion::fuse(audio, video, baseline, &config);
        self.metrics_registry.record_call(
            Stage::Fusion,
            start.elapsed().as_micros() as u64,
            false,
        );
        result
    }

    pub async fn score_indicator(
        &self,
        kind: Indicator,
        value: f64,
        baseline: Option<f64>,
    ) -> f64 {
        let config = self.config.read().await;
        let start = Instant::now();
        let deviation = deviation::score_indicator(kind, value, baseline, &config.scoring);
        self.metrics_registry.record_call(
            Stage::IndicatorScoring,
            start.elapsed().as_micros() as u64,
            false,
        );
        deviation
    }

    /// Full pipeline for pre-detected inputs: optional acoustic metrics and an
    /// optional landmark track.
    pub async fn analyze(
        &self,
        audio: Option<AudioMetrics>,
        track: Option<LandmarkTrack>,
        baseline: &Baseline,
    ) -> Result<AnalysisReport, AnalysisError> {
        let video = match track {
            Some(track) => Some(self.extract_video(track.into_source(), PreAnnotated).await?),
            None => None,
        };
        let result = self.fuse(audio.as_ref(), video.as_ref(), baseline).await;

        let report = AnalysisReport {
            analysis_id: uuid::Uuid::new_v4().to_string(),
            result,
            audio,
            video,
            analyzed_at: Utc::now(),
        };
        tracing::info!(
            analysis_id = %report.analysis_id,
            risk_level = %report.result.risk_level,
            confidence = report.result.confidence,
            "analysis complete"
        );
        Ok(report)
    }
}
