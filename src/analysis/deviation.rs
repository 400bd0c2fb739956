//! Baseline-relative deviation per indicator.
//!
//! Every score is non-negative and roughly in [0, 1+]; 0 means "within the
//! normal range".

use crate::analysis::config::ScoringConfig;
use crate::analysis::types::Indicator;

fn usable_baseline(baseline: Option<f64>) -> Option<f64> {
    baseline.filter(|b| b.is_finite() && *b > 0.0)
}

fn relative_increase(value: f64, baseline: f64, scale: f64) -> f64 {
    ((value - baseline) / (baseline * scale)).max(0.0)
}

/// Deviation of one observed value. `baseline` is the caller's reference for
/// this indicator, if any; jitter and pitch SD fall back to population
/// defaults, lip tension scores 0 without one, the rest ignore it.
pub fn score_indicator(
    kind: Indicator,
    value: f64,
    baseline: Option<f64>,
    cfg: &ScoringConfig,
) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }

    match kind {
        Indicator::Jitter => {
            let b = usable_baseline(baseline).unwrap_or(cfg.default_jitter_baseline);
            relative_increase(value, b, cfg.baseline_scale)
        }
        Indicator::PitchSd => {
            let b = usable_baseline(baseline).unwrap_or(cfg.default_pitch_sd_baseline);
            relative_increase(value, b, cfg.baseline_scale)
        }
        Indicator::Shimmer => ((value - cfg.shimmer_threshold) / cfg.shimmer_scale).max(0.0),
        Indicator::Hnr => ((cfg.hnr_floor_db - value) / cfg.hnr_scale).max(0.0),
        Indicator::BlinkRate => blink_rate_deviation(value, cfg),
        Indicator::LipTension => {
            let Some(b) = usable_baseline(baseline) else {
                return 0.0;
            };
            let raw = ((b - value) / b).max(0.0);
            if raw > cfg.lip_tension_floor {
                raw
            } else {
                0.0
            }
        }
    }
}

/// Both under- and over-blinking are abnormal; the normal range is a dead
/// zone.
fn blink_rate_deviation(rate: f64, cfg: &ScoringConfig) -> f64 {
    if rate < cfg.blink_normal_min {
        (cfg.blink_normal_min - rate) / cfg.blink_normal_min
    } else if rate > cfg.blink_normal_max {
        (rate - cfg.blink_normal_max) / cfg.blink_normal_max
    } else {
        0.0
    }
}

/// A near-zero blink rate on a short clip says nothing about the subject.
pub fn is_insufficient_blink_evidence(rate: f64, duration_s: f64, cfg: &ScoringConfig) -> bool {
    duration_s < cfg.short_clip_s && rate < cfg.near_zero_blink_rate
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> ScoringConfig {
        ScoringConfig::default()
    }

    #[test]
    fn jitter_at_baseline_is_zero() {
        assert_eq!(score_indicator(Indicator::Jitter, 0.8, Some(0.8), &cfg()), 0.0);
    }

    #[test]
    fn jitter_above_baseline() {
        let dev = score_indicator(Indicator::Jitter, 4.0, Some(0.8), &cfg());
        assert!((dev - 0.8).abs() < 1e-9);
    }

    #[test]
    fn jitter_below_baseline_is_clamped() {
        assert_eq!(score_indicator(Indicator::Jitter, 0.2, Some(0.8), &cfg()), 0.0);
    }

    #[test]
    fn missing_or_bad_baseline_uses_population_default() {
        let with_default = score_indicator(Indicator::PitchSd, 30.0, None, &cfg());
        let with_zero = score_indicator(Indicator::PitchSd, 30.0, Some(0.0), &cfg());
        // (30 - 15) / (15 * 5)
        assert!((with_default - 0.2).abs() < 1e-9);
        assert_eq!(with_default, with_zero);
    }

    #[test]
    fn shimmer_uses_fixed_threshold() {
        assert_eq!(score_indicator(Indicator::Shimmer, 2.5, None, &cfg()), 0.0);
        let dev = score_indicator(Indicator::Shimmer, 8.0, Some(99.0), &cfg());
        assert!((dev - 0.5).abs() < 1e-9);
    }

    #[test]
    fn low_hnr_is_abnormal() {
        assert_eq!(score_indicator(Indicator::Hnr, 20.0, None, &cfg()), 0.0);
        let dev = score_indicator(Indicator::Hnr, 6.0, None, &cfg());
        assert!((dev - 0.4).abs() < 1e-9);
    }

    #[test]
    fn blink_rate_is_bidirectional() {
        let low = score_indicator(Indicator::BlinkRate, 5.0, None, &cfg());
        assert!((low - 7.0 / 12.0).abs() < 1e-9);
        let high = score_indicator(Indicator::BlinkRate, 40.0, None, &cfg());
        assert!((high - 0.6).abs() < 1e-9);
        assert_eq!(score_indicator(Indicator::BlinkRate, 12.0, None, &cfg()), 0.0);
        assert_eq!(score_indicator(Indicator::BlinkRate, 25.0, None, &cfg()), 0.0);
    }

    #[test]
    fn lip_tension_needs_effect_above_floor() {
        // 10% compression is noise
        assert_eq!(
            score_indicator(Indicator::LipTension, 0.405, Some(0.45), &cfg()),
            0.0
        );
        // 50% compression
        let dev = score_indicator(Indicator::LipTension, 0.225, Some(0.45), &cfg());
        assert!((dev - 0.5).abs() < 1e-9);
        // wider than baseline
        assert_eq!(
            score_indicator(Indicator::LipTension, 0.9, Some(0.45), &cfg()),
            0.0
        );
    }

    #[test]
    fn lip_tension_without_baseline_is_zero() {
        assert_eq!(score_indicator(Indicator::LipTension, 0.1, None, &cfg()), 0.0);
    }

    #[test]
    fn non_finite_values_score_zero() {
        for kind in Indicator::ALL {
            assert_eq!(score_indicator(kind, f64::NAN, Some(1.0), &cfg()), 0.0);
        }
    }

    #[test]
    fn short_clip_near_zero_rate_is_insufficient() {
        assert!(is_insufficient_blink_evidence(0.0, 6.0, &cfg()));
        assert!(!is_insufficient_blink_evidence(0.0, 30.0, &cfg()));
        assert!(!is_insufficient_blink_evidence(10.0, 6.0, &cfg()));
    }
}
