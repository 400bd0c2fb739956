//! Weighted fusion of indicator deviations into one risk verdict.
//!
//! score = Σ(deviation × weight) / Σ(weight of indicators with usable input)
//! confidence = Σ(weight of usable indicators) / Σ(all weights), capped at 1
//!
//! Missing data never fails fusion; it only lowers confidence.

use std::collections::BTreeMap;

use crate::analysis::config::{AnalysisConfig, FusionConfig};
use crate::analysis::deviation::{is_insufficient_blink_evidence, score_indicator};
use crate::analysis::types::{
    AudioMetrics, Baseline, FusionResult, Indicator, IndicatorScore, RiskLevel, VideoMetrics,
};

struct Accumulator<'a> {
    fusion: &'a FusionConfig,
    weighted_score: f64,
    total_weight: f64,
    indicators: BTreeMap<Indicator, IndicatorScore>,
}

impl<'a> Accumulator<'a> {
    fn new(fusion: &'a FusionConfig) -> Self {
        Self {
            fusion,
            weighted_score: 0.0,
            total_weight: 0.0,
            indicators: BTreeMap::new(),
        }
    }

    fn add(&mut self, indicator: Indicator, deviation: f64) {
        let weight = self.fusion.weights.weight(indicator);
        let contribution = deviation * weight;
        self.weighted_score += contribution;
        self.total_weight += weight;
        self.indicators.insert(
            indicator,
            IndicatorScore {
                deviation,
                weight,
                contribution,
            },
        );
    }
}

pub fn classify(score: f64, fusion: &FusionConfig) -> RiskLevel {
    if score > fusion.high_risk_cutoff {
        RiskLevel::High
    } else if score > fusion.medium_risk_cutoff {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Pure and stateless; inputs are never mutated.
pub fn fuse(
    audio: Option<&AudioMetrics>,
    video: Option<&VideoMetrics>,
    baseline: &Baseline,
    cfg: &AnalysisConfig,
) -> FusionResult {
    if audio.is_none() && video.is_none() {
        return FusionResult::neutral();
    }

    let scoring = &cfg.scoring;
    let mut acc = Accumulator::new(&cfg.fusion);
    let mut audio_suppressed = false;

    if let Some(audio) = audio {
        if audio.noise_only {
            // noise metrics must not masquerade as vocal stress
            audio_suppressed = true;
        } else {
            for indicator in Indicator::AUDIO {
                let Some(value) = audio.value(indicator).filter(|v| v.is_finite()) else {
                    continue;
                };
                let dev = score_indicator(indicator, value, baseline.get(indicator), scoring);
                acc.add(indicator, dev);
            }
        }
    }

    if let Some(video) = video.filter(|v| v.is_usable()) {
        let rate = video.blink_rate_per_min;
        if rate.is_finite() && !is_insufficient_blink_evidence(rate, video.duration_s, scoring) {
            let dev = score_indicator(Indicator::BlinkRate, rate, None, scoring);
            acc.add(Indicator::BlinkRate, dev);
        }

        let lip_baseline = baseline
            .get(Indicator::LipTension)
            .filter(|b| b.is_finite() && *b > 0.0);
        if let Some(lip_baseline) = lip_baseline {
            let tension = video.avg_lip_tension;
            if tension.is_finite() && tension > 0.0 {
                let dev =
                    score_indicator(Indicator::LipTension, tension, Some(lip_baseline), scoring);
                // compression at or below the floor is no evidence at all
                if dev > 0.0 {
                    acc.add(Indicator::LipTension, dev);
                }
            }
        }
    }

    let score = if acc.total_weight > 0.0 {
        acc.weighted_score / acc.total_weight
    } else {
        0.0
    };
    let all_weights = cfg.fusion.weights.total();
    let confidence = if all_weights > 0.0 {
        (acc.total_weight / all_weights).min(1.0)
    } else {
        0.0
    };
    let risk_level = classify(score, &cfg.fusion);

    tracing::debug!(
        risk_level = %risk_level,
        score,
        confidence,
        indicators = acc.indicators.len(),
        audio_suppressed,
        "fusion complete"
    );

    FusionResult {
        risk_level,
        confidence,
        score,
        indicators: acc.indicators,
        audio_suppressed,
    }
}
