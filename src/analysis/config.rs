use serde::{Deserialize, Serialize};

use crate::analysis::types::Indicator;
use crate::constants;

/// Landmark indices the geometric features read, per detector mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceLayout {
    /// Outer corner, two upper-lid points, inner corner, two lower-lid points.
    pub right_eye: [u16; 6],
    pub left_eye: [u16; 6],
    pub upper_lip_top: u16,
    pub lower_lip_bottom: u16,
    pub lip_left_corner: u16,
    pub lip_right_corner: u16,
}

impl Default for FaceLayout {
    fn default() -> Self {
        Self {
            right_eye: constants::RIGHT_EYE_INDICES,
            left_eye: constants::LEFT_EYE_INDICES,
            upper_lip_top: constants::UPPER_LIP_TOP,
            lower_lip_bottom: constants::LOWER_LIP_BOTTOM,
            lip_left_corner: constants::LIP_LEFT_CORNER,
            lip_right_corner: constants::LIP_RIGHT_CORNER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoConfig {
    /// Averaged EAR below this counts as eyes closed.
    pub ear_threshold: f64,
    /// Analyze every Nth decoded frame.
    pub frame_stride: u32,
    /// Substituted when container fps is implausible.
    pub default_fps: f64,
    pub max_fps: f64,
    pub max_frame_count: u64,
    /// Trusted clips shorter than this many frames are short-circuited.
    pub min_frame_count: u64,
    /// Trusted clips shorter than this are short-circuited.
    pub min_duration_s: f64,
    /// Duration substituted for a zero-length clip when computing blinks per minute.
    #[serde(default = "default_min_rate_duration_s")]
    pub min_rate_duration_s: f64,
    #[serde(default)]
    pub layout: FaceLayout,
}

fn default_min_rate_duration_s() -> f64 {
    1.0
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            ear_threshold: 0.21,
            frame_stride: 3,
            default_fps: 30.0,
            max_fps: 240.0,
            max_frame_count: 100_000,
            min_frame_count: 5,
            min_duration_s: 0.5,
            min_rate_duration_s: 1.0,
            layout: FaceLayout::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringConfig {
    /// Population default used when the caller's baseline omits jitter (%).
    pub default_jitter_baseline: f64,
    /// Population default used when the caller's baseline omits pitch SD (Hz).
    pub default_pitch_sd_baseline: f64,
    /// Jitter / pitch SD deviation is divided by `baseline * baseline_scale`.
    pub baseline_scale: f64,
    pub shimmer_threshold: f64,
    pub shimmer_scale: f64,
    pub hnr_floor_db: f64,
    pub hnr_scale: f64,
    pub blink_normal_min: f64,
    pub blink_normal_max: f64,
    /// Clips shorter than this cannot establish a near-zero blink rate.
    pub short_clip_s: f64,
    pub near_zero_blink_rate: f64,
    /// Relative lip compression at or below this is treated as noise.
    pub lip_tension_floor: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            default_jitter_baseline: constants::DEFAULT_JITTER_BASELINE,
            default_pitch_sd_baseline: constants::DEFAULT_PITCH_SD_BASELINE,
            baseline_scale: 5.0,
            shimmer_threshold: 3.0,
            shimmer_scale: 10.0,
            hnr_floor_db: 12.0,
            hnr_scale: 15.0,
            blink_normal_min: 12.0,
            blink_normal_max: 25.0,
            short_clip_s: 10.0,
            near_zero_blink_rate: 1.0,
            lip_tension_floor: 0.20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorWeights {
    pub jitter: f64,
    pub pitch_sd: f64,
    pub shimmer: f64,
    pub hnr: f64,
    pub blink_rate: f64,
    pub lip_tension: f64,
}

impl Default for IndicatorWeights {
    fn default() -> Self {
        Self {
            jitter: 0.30,
            pitch_sd: 0.15,
            shimmer: 0.10,
            hnr: 0.10,
            blink_rate: 0.20,
            lip_tension: 0.15,
        }
    }
}

impl IndicatorWeights {
    pub fn weight(&self, indicator: Indicator) -> f64 {
        match indicator {
            Indicator::Jitter => self.jitter,
            Indicator::PitchSd => self.pitch_sd,
            Indicator::Shimmer => self.shimmer,
            Indicator::Hnr => self.hnr,
            Indicator::BlinkRate => self.blink_rate,
            Indicator::LipTension => self.lip_tension,
        }
    }

    /// Sum of every weight; weights need not add up to 1.
    pub fn total(&self) -> f64 {
        Indicator::ALL.iter().map(|i| self.weight(*i)).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FusionConfig {
    pub weights: IndicatorWeights,
    /// Normalized score strictly above this is HIGH.
    pub high_risk_cutoff: f64,
    /// Normalized score strictly above this (and not HIGH) is MEDIUM.
    pub medium_risk_cutoff: f64,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            weights: IndicatorWeights::default(),
            high_risk_cutoff: 0.45,
            medium_risk_cutoff: 0.20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    #[serde(default)]
    pub video: VideoConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub fusion: FusionConfig,
}

impl AnalysisConfig {
    pub fn from_env(env_config: &crate::config::AnalysisEnvConfig) -> Self {
        let mut config = Self::default();
        config.video.frame_stride = env_config.frame_stride;
        config.video.ear_threshold = env_config.ear_threshold;
        config.video.default_fps = env_config.default_fps;
        config.fusion.high_risk_cutoff = env_config.high_risk_cutoff;
        config.fusion.medium_risk_cutoff = env_config.medium_risk_cutoff;
        config
    }

    pub fn validate(&self) -> Result<(), String> {
        let video = &self.video;
        if video.frame_stride == 0 {
            return Err("video.frame_stride must be >= 1".to_string());
        }
        if !(video.ear_threshold > 0.0 && video.ear_threshold < 1.0) {
            return Err("video.ear_threshold must be in (0,1)".to_string());
        }
        if !(video.default_fps > 0.0 && video.default_fps <= video.max_fps) {
            return Err("video.default_fps must be in (0, max_fps]".to_string());
        }
        if video.min_duration_s < 0.0 || video.min_rate_duration_s <= 0.0 {
            return Err("video duration floors must be non-negative and rate floor > 0".to_string());
        }

        let scoring = &self.scoring;
        if scoring.default_jitter_baseline <= 0.0 || scoring.default_pitch_sd_baseline <= 0.0 {
            return Err("scoring default baselines must be > 0".to_string());
        }
        if scoring.baseline_scale <= 0.0
            || scoring.shimmer_scale <= 0.0
            || scoring.hnr_scale <= 0.0
        {
            return Err("scoring scales must be > 0".to_string());
        }
        if !(scoring.blink_normal_min > 0.0 && scoring.blink_normal_min <= scoring.blink_normal_max)
        {
            return Err("scoring blink normal range must satisfy 0 < min <= max".to_string());
        }
        if !(0.0..1.0).contains(&scoring.lip_tension_floor) {
            return Err("scoring.lip_tension_floor must be in [0,1)".to_string());
        }

        let weights = &self.fusion.weights;
        if Indicator::ALL
            .iter()
            .any(|i| !(0.0..=1.0).contains(&weights.weight(*i)))
        {
            return Err("fusion weights must be in [0,1]".to_string());
        }
        if weights.total() <= 0.0 {
            return Err("fusion weights sum must be > 0".to_string());
        }
        if self.fusion.medium_risk_cutoff < 0.0
            || self.fusion.medium_risk_cutoff >= self.fusion.high_risk_cutoff
        {
            return Err(format!(
                "fusion cutoffs must satisfy 0 <= medium < high (got medium={:.3}, high={:.3})",
                self.fusion.medium_risk_cutoff, self.fusion.high_risk_cutoff
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn default_weights_sum_to_one() {
        let total = IndicatorWeights::default().total();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut cfg = AnalysisConfig::default();
        cfg.video.frame_stride = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = AnalysisConfig::default();
        cfg.fusion.medium_risk_cutoff = 0.5;
        assert!(cfg.validate().is_err());

        let mut cfg = AnalysisConfig::default();
        cfg.fusion.weights = IndicatorWeights {
            jitter: 0.0,
            pitch_sd: 0.0,
            shimmer: 0.0,
            hnr: 0.0,
            blink_rate: 0.0,
            lip_tension: 0.0,
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: AnalysisConfig =
            serde_json::from_str(r#"{"video": {"earThreshold": 0.2, "frameStride": 1, "defaultFps": 25.0, "maxFps": 240.0, "maxFrameCount": 100000, "minFrameCount": 5, "minDurationS": 0.5}}"#)
                .unwrap();
        assert_eq!(cfg.video.frame_stride, 1);
        assert_eq!(cfg.video.layout, FaceLayout::default());
        assert_eq!(cfg.fusion, FusionConfig::default());
    }
}
