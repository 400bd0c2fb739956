//! Request payload checks shared by the analysis routes.
//!
//! serde_json already refuses NaN/Infinity literals, so these mostly guard
//! the library entry points and the size/sign limits the pipeline relies on.

use crate::analysis::{AnalysisError, AudioMetrics, Baseline, LandmarkTrack, VideoMetrics};
use crate::constants::{MAX_BATCH_VIDEOS, MAX_TRACK_FRAMES};

fn invalid(message: String) -> AnalysisError {
    AnalysisError::InvalidInput(message)
}

/// Every present acoustic value must be finite; percentages, SD and duration
/// cannot be negative. HNR may legitimately be negative.
pub fn validate_audio(audio: &AudioMetrics) -> Result<(), AnalysisError> {
    let non_negative = [
        ("jitterPercent", audio.jitter_percent),
        ("shimmerPercent", audio.shimmer_percent),
        ("pitchSdHz", audio.pitch_sd_hz),
        ("meanPitchHz", audio.mean_pitch_hz),
        ("durationS", audio.duration_s),
    ];
    for (field, value) in non_negative {
        if let Some(v) = value {
            if !v.is_finite() || v < 0.0 {
                return Err(invalid(format!("audio.{field} must be a finite value >= 0")));
            }
        }
    }
    if audio.hnr_db.is_some_and(|v| !v.is_finite()) {
        return Err(invalid("audio.hnrDb must be finite".to_string()));
    }
    Ok(())
}

/// Implausible fps is tolerated (the aggregator corrects it); non-finite
/// coordinates are not.
pub fn validate_track(track: &LandmarkTrack) -> Result<(), AnalysisError> {
    if !track.fps.is_finite() {
        return Err(invalid("track.fps must be finite".to_string()));
    }
    if track.frames.len() > MAX_TRACK_FRAMES {
        return Err(invalid(format!(
            "track holds {} frames, limit is {MAX_TRACK_FRAMES}",
            track.frames.len()
        )));
    }
    for (i, frame) in track.frames.iter().enumerate() {
        let Some(landmarks) = frame else { continue };
        if let Some((index, _)) = landmarks.iter().find(|(_, p)| !p.is_finite()) {
            return Err(invalid(format!(
                "track.frames[{i}] landmark {index} has a non-finite coordinate"
            )));
        }
    }
    Ok(())
}

/// Precomputed video metrics submitted for fusion only.
pub fn validate_video_metrics(video: &VideoMetrics) -> Result<(), AnalysisError> {
    let values = [
        ("blinkRatePerMin", video.blink_rate_per_min),
        ("avgBlinkDurationMs", video.avg_blink_duration_ms),
        ("avgLipTension", video.avg_lip_tension),
        ("avgEar", video.avg_ear),
        ("durationS", video.duration_s),
    ];
    match values.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
        Some((field, _)) => Err(invalid(format!("video.{field} must be a finite value >= 0"))),
        None => Ok(()),
    }
}

/// Zero means "unknown" and is ignored by the scorer; negatives are rejected.
pub fn validate_baseline(baseline: &Baseline) -> Result<(), AnalysisError> {
    match baseline.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
        Some((indicator, _)) => Err(invalid(format!(
            "baseline.{indicator} must be a finite value >= 0"
        ))),
        None => Ok(()),
    }
}

pub fn validate_batch_size(len: usize) -> Result<(), AnalysisError> {
    if len == 0 {
        return Err(invalid("tracks must not be empty".to_string()));
    }
    if len > MAX_BATCH_VIDEOS {
        return Err(invalid(format!(
            "at most {MAX_BATCH_VIDEOS} tracks per batch, got {len}"
        )));
    }
    Ok(())
}
