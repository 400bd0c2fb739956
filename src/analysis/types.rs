use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// 2-D landmark coordinate, normalized to image size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// One frame's facial landmarks, addressed by detector index.
///
/// Stored sparsely so callers can ship only the contour points the
/// pipeline reads instead of the full mesh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Landmarks {
    points: BTreeMap<u16, Point>,
}

impl Landmarks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds from a dense detector output where position == landmark index.
    pub fn from_dense(points: impl IntoIterator<Item = Point>) -> Self {
        points
            .into_iter()
            .enumerate()
            .filter_map(|(i, p)| u16::try_from(i).ok().map(|idx| (idx, p)))
            .collect()
    }

    pub fn insert(&mut self, index: u16, point: Point) {
        self.points.insert(index, point);
    }

    pub fn get(&self, index: u16) -> Option<Point> {
        self.points.get(&index).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, Point)> + '_ {
        self.points.iter().map(|(k, v)| (*k, *v))
    }
}

impl FromIterator<(u16, Point)> for Landmarks {
    fn from_iter<I: IntoIterator<Item = (u16, Point)>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    Jitter,
    PitchSd,
    Shimmer,
    Hnr,
    BlinkRate,
    LipTension,
}

impl Indicator {
    pub const ALL: [Indicator; 6] = [
        Indicator::Jitter,
        Indicator::PitchSd,
        Indicator::Shimmer,
        Indicator::Hnr,
        Indicator::BlinkRate,
        Indicator::LipTension,
    ];

    pub const AUDIO: [Indicator; 4] = [
        Indicator::Jitter,
        Indicator::PitchSd,
        Indicator::Shimmer,
        Indicator::Hnr,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Indicator::Jitter => "jitter",
            Indicator::PitchSd => "pitch_sd",
            Indicator::Shimmer => "shimmer",
            Indicator::Hnr => "hnr",
            Indicator::BlinkRate => "blink_rate",
            Indicator::LipTension => "lip_tension",
        }
    }

    pub fn is_audio(&self) -> bool {
        Self::AUDIO.contains(self)
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied reference values per indicator. May be partial.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Baseline(BTreeMap<Indicator, f64>);

impl Baseline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, indicator: Indicator, value: f64) -> Self {
        self.0.insert(indicator, value);
        self
    }

    pub fn insert(&mut self, indicator: Indicator, value: f64) {
        self.0.insert(indicator, value);
    }

    pub fn get(&self, indicator: Indicator) -> Option<f64> {
        self.0.get(&indicator).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Indicator, f64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Output of the external acoustic extractor for one clip.
///
/// Every measure is optional: a missing value simply removes that indicator
/// from fusion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioMetrics {
    #[serde(default)]
    pub jitter_percent: Option<f64>,
    #[serde(default)]
    pub shimmer_percent: Option<f64>,
    #[serde(default)]
    pub pitch_sd_hz: Option<f64>,
    #[serde(default)]
    pub mean_pitch_hz: Option<f64>,
    #[serde(default)]
    pub hnr_db: Option<f64>,
    #[serde(default)]
    pub duration_s: Option<f64>,
    /// Set by the extractor when the clip carries no usable voice signal.
    #[serde(default)]
    pub noise_only: bool,
}

impl AudioMetrics {
    pub fn value(&self, indicator: Indicator) -> Option<f64> {
        match indicator {
            Indicator::Jitter => self.jitter_percent,
            Indicator::PitchSd => self.pitch_sd_hz,
            Indicator::Shimmer => self.shimmer_percent,
            Indicator::Hnr => self.hnr_db,
            Indicator::BlinkRate | Indicator::LipTension => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VideoStatus {
    #[default]
    Analyzed,
    /// Clip too short to sample; the per-frame pipeline was skipped.
    InsufficientInput,
    /// Frames were decoded but none yielded landmarks.
    NoFaceDetected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetrics {
    pub blink_count: u32,
    pub blink_rate_per_min: f64,
    pub avg_blink_duration_ms: f64,
    pub avg_lip_tension: f64,
    pub avg_ear: f64,
    pub duration_s: f64,
    pub frames_analyzed: u32,
    #[serde(default)]
    pub frames_decoded: u32,
    #[serde(default)]
    pub metadata_corrected: bool,
    #[serde(default)]
    pub status: VideoStatus,
}

impl VideoMetrics {
    /// Zeroed record for inputs that produced no usable evidence.
    pub fn degenerate(status: VideoStatus, duration_s: f64, frames_decoded: u32) -> Self {
        Self {
            blink_count: 0,
            blink_rate_per_min: 0.0,
            avg_blink_duration_ms: 0.0,
            avg_lip_tension: 0.0,
            avg_ear: 0.0,
            duration_s,
            frames_analyzed: 0,
            frames_decoded,
            metadata_corrected: false,
            status,
        }
    }

    pub fn is_usable(&self) -> bool {
        self.status == VideoStatus::Analyzed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlinkEvent {
    pub start_frame: u64,
    pub end_frame: u64,
    pub duration_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorScore {
    pub deviation: f64,
    pub weight: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FusionResult {
    pub risk_level: RiskLevel,
    /// Breadth of available evidence in [0, 1], independent of the score.
    pub confidence: f64,
    pub score: f64,
    pub indicators: BTreeMap<Indicator, IndicatorScore>,
    pub audio_suppressed: bool,
}

impl FusionResult {
    pub fn neutral() -> Self {
        Self {
            risk_level: RiskLevel::Low,
            confidence: 0.0,
            score: 0.0,
            indicators: BTreeMap::new(),
            audio_suppressed: false,
        }
    }
}
