//! Video metric aggregation.
//!
//! Drives geometry → blink detection over a frame stream and reduces the
//! result to one `VideoMetrics`. Frame decoding and landmark detection are
//! injected through `FrameSource` / `LandmarkDetector`, so tests (and the
//! HTTP layer, which receives landmarks already detected) can feed
//! synthetic sequences.

use std::vec::IntoIter;

use serde::{Deserialize, Serialize};

use crate::analysis::blink::BlinkDetector;
use crate::analysis::config::VideoConfig;
use crate::analysis::error::AnalysisError;
use crate::analysis::geometry::{frame_features, FrameFeatures};
use crate::analysis::types::{Landmarks, VideoMetrics, VideoStatus};

/// Container metadata as reported by the source. Either value may be absent
/// or nonsense; see `resolve_timing`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StreamInfo {
    pub fps: Option<f64>,
    pub frame_count: Option<u64>,
}

pub trait FrameSource {
    type Frame;

    /// Opens the stream. Failure here is fatal for the whole video.
    fn open(&mut self) -> Result<StreamInfo, AnalysisError>;

    /// Next decoded frame in presentation order, `None` at end of stream.
    fn next_frame(&mut self) -> Option<Self::Frame>;
}

pub trait LandmarkDetector<F> {
    /// `None` when no face was found. Sporadic failures are reported the same
    /// way and only skip the frame.
    fn detect(&mut self, frame: &F) -> Option<Landmarks>;
}

impl<F, T> LandmarkDetector<F> for T
where
    T: FnMut(&F) -> Option<Landmarks>,
{
    fn detect(&mut self, frame: &F) -> Option<Landmarks> {
        self(frame)
    }
}

/// Landmarks produced upstream, one entry per decoded frame (`null` = no
/// face on that frame).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandmarkTrack {
    pub fps: f64,
    /// Declared frame count; defaults to `frames.len()`.
    #[serde(default)]
    pub frame_count: Option<u64>,
    pub frames: Vec<Option<Landmarks>>,
}

impl LandmarkTrack {
    pub fn into_source(self) -> TrackSource {
        let declared = self.frame_count.unwrap_or(self.frames.len() as u64);
        TrackSource {
            info: StreamInfo {
                fps: Some(self.fps),
                frame_count: Some(declared),
            },
            frames: self.frames.into_iter(),
        }
    }
}

pub struct TrackSource {
    info: StreamInfo,
    frames: IntoIter<Option<Landmarks>>,
}

impl FrameSource for TrackSource {
    type Frame = Option<Landmarks>;

    fn open(&mut self) -> Result<StreamInfo, AnalysisError> {
        Ok(self.info)
    }

    fn next_frame(&mut self) -> Option<Self::Frame> {
        self.frames.next()
    }
}

/// Detector for frames that already carry their landmarks.
#[derive(Debug, Default, Clone, Copy)]
pub struct PreAnnotated;

impl LandmarkDetector<Option<Landmarks>> for PreAnnotated {
    fn detect(&mut self, frame: &Option<Landmarks>) -> Option<Landmarks> {
        frame.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    pub fps: f64,
    /// Both fps and frame count are plausible.
    pub trusted: bool,
    pub declared_frames: Option<u64>,
}

impl Timing {
    pub fn declared_duration_s(&self) -> Option<f64> {
        if !self.trusted {
            return None;
        }
        self.declared_frames.map(|n| n as f64 / self.fps)
    }
}

pub fn resolve_timing(info: &StreamInfo, cfg: &VideoConfig) -> Timing {
    let fps_ok = info
        .fps
        .is_some_and(|f| f.is_finite() && f > 0.0 && f <= cfg.max_fps);
    let count_implausible = info.frame_count.is_some_and(|c| c > cfg.max_frame_count);

    // one implausible field discredits the whole container header
    let fps = match info.fps {
        Some(f) if fps_ok && !count_implausible => f,
        _ => cfg.default_fps,
    };

    Timing {
        fps,
        trusted: fps_ok && info.frame_count.is_some() && !count_implausible,
        declared_frames: info.frame_count,
    }
}

/// Reducer over analyzed frames.
#[derive(Debug)]
pub struct VideoAggregator {
    blinks: BlinkDetector,
    lip_sum: f64,
    ear_sum: f64,
    samples: u32,
}

impl VideoAggregator {
    pub fn new(ear_threshold: f64, fps: f64) -> Self {
        Self {
            blinks: BlinkDetector::new(ear_threshold, fps),
            lip_sum: 0.0,
            ear_sum: 0.0,
            samples: 0,
        }
    }

    pub fn observe(&mut self, frame_index: u64, features: &FrameFeatures) {
        let avg_ear = features.avg_ear();
        self.blinks.update(avg_ear, frame_index);
        self.ear_sum += avg_ear;
        self.lip_sum += features.lip_tension;
        self.samples += 1;
    }

    pub fn frames_analyzed(&self) -> u32 {
        self.samples
    }

    pub fn finish(self, duration_s: f64, min_rate_duration_s: f64) -> VideoMetrics {
        let blink_count = self.blinks.blink_count();
        let avg_blink_duration_ms = self.blinks.avg_duration_ms();
        let effective_s = if duration_s > f64::EPSILON {
            duration_s
        } else {
            min_rate_duration_s
        };
        let duration_minutes = effective_s / 60.0;
        let (avg_lip_tension, avg_ear) = if self.samples > 0 {
            (
                self.lip_sum / self.samples as f64,
                self.ear_sum / self.samples as f64,
            )
        } else {
            (0.0, 0.0)
        };
        self.blinks.finish();

        VideoMetrics {
            blink_count,
            blink_rate_per_min: blink_count as f64 / duration_minutes,
            avg_blink_duration_ms,
            avg_lip_tension,
            avg_ear,
            duration_s,
            frames_analyzed: self.samples,
            frames_decoded: 0,
            metadata_corrected: false,
            status: VideoStatus::Analyzed,
        }
    }
}

/// Single sequential pass over one video. Fails only when the source cannot
/// be opened.
pub fn extract_video_metrics<S, D>(
    source: &mut S,
    detector: &mut D,
    cfg: &VideoConfig,
) -> Result<VideoMetrics, AnalysisError>
where
    S: FrameSource,
    D: LandmarkDetector<S::Frame>,
{
    let info = source.open()?;
    let timing = resolve_timing(&info, cfg);

    if let Some(duration_s) = timing.declared_duration_s() {
        let frames = timing.declared_frames.unwrap_or(0);
        if frames < cfg.min_frame_count || duration_s < cfg.min_duration_s {
            tracing::warn!(frames, duration_s, "clip too short, skipping frame analysis");
            return Ok(VideoMetrics::degenerate(
                VideoStatus::InsufficientInput,
                duration_s,
                0,
            ));
        }
    } else {
        tracing::warn!(
            reported_fps = ?info.fps,
            reported_frames = ?info.frame_count,
            fps = timing.fps,
            "implausible stream metadata, timing from decoded frames"
        );
    }

    let stride = u64::from(cfg.frame_stride.max(1));
    let mut aggregator = VideoAggregator::new(cfg.ear_threshold, timing.fps);
    let mut decoded: u64 = 0;

    while let Some(frame) = source.next_frame() {
        decoded += 1;
        if decoded % stride != 0 {
            continue;
        }
        let Some(landmarks) = detector.detect(&frame) else {
            continue;
        };
        let Some(features) = frame_features(&landmarks, &cfg.layout) else {
            continue;
        };
        aggregator.observe(decoded, &features);
    }

    let duration_s = timing
        .declared_duration_s()
        .unwrap_or(decoded as f64 / timing.fps);
    let frames_decoded = u32::try_from(decoded).unwrap_or(u32::MAX);
    let corrected = !timing.trusted;

    if !timing.trusted && (decoded < cfg.min_frame_count || duration_s < cfg.min_duration_s) {
        tracing::warn!(decoded, duration_s, "clip too short after decoding");
        let mut metrics =
            VideoMetrics::degenerate(VideoStatus::InsufficientInput, duration_s, frames_decoded);
        metrics.metadata_corrected = corrected;
        return Ok(metrics);
    }

    if aggregator.frames_analyzed() == 0 {
        tracing::warn!(decoded, "no face detected in any sampled frame");
        let mut metrics =
            VideoMetrics::degenerate(VideoStatus::NoFaceDetected, duration_s, frames_decoded);
        metrics.metadata_corrected = corrected;
        return Ok(metrics);
    }

    let mut metrics = aggregator.finish(duration_s, cfg.min_rate_duration_s);
    metrics.frames_decoded = frames_decoded;
    metrics.metadata_corrected = corrected;

    tracing::debug!(
        decoded,
        analyzed = metrics.frames_analyzed,
        blinks = metrics.blink_count,
        blink_rate = metrics.blink_rate_per_min,
        "video metrics extracted"
    );

    Ok(metrics)
}
