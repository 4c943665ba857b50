//! Recovery assessment from wearable signals.
//!
//! Each present signal is scored into [0, 1] by a continuous piecewise
//! function, then blended into a weighted composite. Missing signals are
//! left out of the average entirely rather than counted as zero.

use crate::config::RecoveryConfig;
use crate::types::round_to;
use crate::{RecoveryAssessment, RecoveryZone, WearableInput};

/// Number of distinct wearable signals
pub const SIGNAL_COUNT: usize = 6;

/// Wearable signal kind
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignalKind {
    Hrv,
    RestingHr,
    SleepDuration,
    DeepSleep,
    RecoveryScore,
    Strain,
}

impl SignalKind {
    /// Add-on recommendation when this signal scores poorly
    fn weak_signal_text(&self) -> &'static str {
        match self {
            SignalKind::Hrv => {
                "HRV is well below baseline; favor parasympathetic work such as breathwork."
            }
            SignalKind::RestingHr => {
                "Resting heart rate is elevated; watch for illness or accumulated fatigue."
            }
            SignalKind::SleepDuration => "Sleep was short; plan for at least 8 hours tonight.",
            SignalKind::DeepSleep => {
                "Deep sleep was low; avoid alcohol and large meals close to bedtime."
            }
            SignalKind::RecoveryScore => "Device recovery score is low; keep today's load modest.",
            SignalKind::Strain => "Yesterday's strain was high; keep today's training light.",
        }
    }
}

/// A scored signal with its weight
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecoverySignal {
    pub kind: SignalKind,
    pub score: f64,
    pub weight: f64,
}

// ============================================================================
// Signal Scoring
// ============================================================================

/// HRV relative to baseline: 1.2x or more is full recovery
fn score_hrv(hrv_ms: f64, baseline: f64) -> f64 {
    let ratio = hrv_ms / baseline;
    if ratio >= 1.2 {
        1.0
    } else if ratio >= 1.0 {
        0.75 + (ratio - 1.0) / 0.2 * 0.25
    } else if ratio >= 0.8 {
        0.4 + (ratio - 0.8) / 0.2 * 0.35
    } else if ratio >= 0.6 {
        0.1 + (ratio - 0.6) / 0.2 * 0.3
    } else {
        (ratio / 0.6 * 0.1).max(0.0)
    }
}

/// Resting HR relative to baseline: 5 bpm below or more is full recovery
fn score_resting_hr(resting_hr: f64, baseline: f64) -> f64 {
    let diff = resting_hr - baseline;
    if diff <= -5.0 {
        1.0
    } else if diff <= 0.0 {
        0.8 + (-diff) / 5.0 * 0.2
    } else if diff <= 5.0 {
        0.8 - diff / 5.0 * 0.3
    } else if diff <= 10.0 {
        0.5 - (diff - 5.0) / 5.0 * 0.3
    } else {
        (0.2 - (diff - 10.0) / 10.0 * 0.2).max(0.0)
    }
}

fn score_sleep_hours(hours: f64) -> f64 {
    if hours >= 8.0 {
        1.0
    } else if hours >= 7.0 {
        0.75 + (hours - 7.0) * 0.25
    } else if hours >= 6.0 {
        0.45 + (hours - 6.0) * 0.3
    } else if hours >= 5.0 {
        0.2 + (hours - 5.0) * 0.25
    } else {
        (hours / 5.0 * 0.2).max(0.0)
    }
}

fn score_deep_sleep(minutes: f64) -> f64 {
    if minutes >= 90.0 {
        1.0
    } else if minutes >= 60.0 {
        0.6 + (minutes - 60.0) / 30.0 * 0.4
    } else if minutes >= 30.0 {
        0.25 + (minutes - 30.0) / 30.0 * 0.35
    } else {
        (minutes / 30.0 * 0.25).max(0.0)
    }
}

/// Vendor recovery score on a 0-100 scale
fn score_recovery_score(score: f64) -> f64 {
    (score / 100.0).clamp(0.0, 1.0)
}

/// Strain is inverted: higher strain means less recovered
fn score_strain(strain: f64, strain_max: f64) -> f64 {
    (1.0 - strain / strain_max).clamp(0.0, 1.0)
}

// ============================================================================
// Adaptor
// ============================================================================

const NO_DATA_RECOMMENDATIONS: [&str; 2] = [
    "No wearable data available; defaulting to moderate intensity.",
    "Connect a wearable or log sleep to personalize recovery guidance.",
];

/// Turns wearable signals into a recovery zone and intensity modifier
pub struct RecoveryAdaptor<'a> {
    config: &'a RecoveryConfig,
}

impl<'a> RecoveryAdaptor<'a> {
    pub fn new(config: &'a RecoveryConfig) -> Self {
        Self { config }
    }

    /// Score every present signal, in a fixed order
    pub fn signals(&self, input: &WearableInput) -> Vec<RecoverySignal> {
        let cfg = self.config;
        let w = &cfg.weights;

        let candidates = [
            (
                SignalKind::Hrv,
                input.hrv_ms.map(|v| score_hrv(v, cfg.hrv_baseline_ms)),
                w.hrv,
            ),
            (
                SignalKind::RestingHr,
                input
                    .resting_hr
                    .map(|v| score_resting_hr(v, cfg.resting_hr_baseline)),
                w.resting_hr,
            ),
            (
                SignalKind::SleepDuration,
                input.sleep_hours.map(score_sleep_hours),
                w.sleep_duration,
            ),
            (
                SignalKind::DeepSleep,
                input.deep_sleep_minutes.map(score_deep_sleep),
                w.deep_sleep,
            ),
            (
                SignalKind::RecoveryScore,
                input.recovery_score.map(score_recovery_score),
                w.recovery_score,
            ),
            (
                SignalKind::Strain,
                input.strain.map(|v| score_strain(v, cfg.strain_max)),
                w.strain,
            ),
        ];

        candidates
            .into_iter()
            .filter_map(|(kind, score, weight)| {
                score.map(|score| RecoverySignal {
                    kind,
                    score: score.clamp(0.0, 1.0),
                    weight,
                })
            })
            .collect()
    }

    /// Weighted average of the present signals
    fn composite(signals: &[RecoverySignal]) -> Option<f64> {
        let total_weight: f64 = signals.iter().map(|s| s.weight).sum();
        if signals.is_empty() || total_weight <= 0.0 {
            return None;
        }
        let weighted: f64 = signals.iter().map(|s| s.score * s.weight).sum();
        Some((weighted / total_weight).clamp(0.0, 1.0))
    }

    fn zone_for(&self, score: f64) -> RecoveryZone {
        if score >= self.config.green_threshold {
            RecoveryZone::Green
        } else if score >= self.config.red_threshold {
            RecoveryZone::Yellow
        } else {
            RecoveryZone::Red
        }
    }

    /// Training-intensity modifier for a composite score
    fn modifier_for(&self, zone: RecoveryZone, score: f64) -> f64 {
        let cfg = self.config;
        match zone {
            RecoveryZone::Green => 1.0,
            RecoveryZone::Yellow => {
                let band = cfg.green_threshold - cfg.red_threshold;
                let t = ((cfg.green_threshold - score) / band).clamp(0.0, 1.0);
                let reduction = cfg.yellow_base_reduction + t * cfg.yellow_max_additional_reduction;
                (1.0 - reduction).max(cfg.yellow_modifier_floor)
            }
            RecoveryZone::Red => score.max(0.0),
        }
    }

    fn zone_recommendations(zone: RecoveryZone) -> [&'static str; 2] {
        match zone {
            RecoveryZone::Green => [
                "Recovery is strong; train as planned.",
                "Good day for high-intensity or heavy work.",
            ],
            RecoveryZone::Yellow => [
                "Recovery is moderate; reduce training volume and intensity.",
                "Prioritize hydration and an early night.",
            ],
            RecoveryZone::Red => [
                "Recovery is poor; replace training with rest or gentle movement.",
                "Aim for extra sleep tonight.",
            ],
        }
    }

    /// Assess recovery from whatever signals are present
    pub fn assess_recovery(&self, input: &WearableInput) -> RecoveryAssessment {
        let signals = self.signals(input);

        let Some(score) = Self::composite(&signals) else {
            tracing::info!("No wearable signals present, using neutral recovery");
            return RecoveryAssessment {
                zone: RecoveryZone::Yellow,
                confidence: 0.0,
                training_intensity_modifier: self.config.neutral_modifier,
                recommendations: NO_DATA_RECOMMENDATIONS.iter().map(|s| s.to_string()).collect(),
                composite_score: None,
                signal_count: 0,
            };
        };

        let zone = self.zone_for(score);
        let modifier = self.modifier_for(zone, score);
        let count = signals.len();
        let confidence = (count as f64 / SIGNAL_COUNT as f64).min(1.0);

        let mut recommendations: Vec<String> = Self::zone_recommendations(zone)
            .iter()
            .map(|s| s.to_string())
            .collect();
        for signal in &signals {
            if signal.score < self.config.weak_signal_threshold {
                recommendations.push(signal.kind.weak_signal_text().to_string());
            }
        }
        if count < self.config.min_confident_signals {
            recommendations.push(format!(
                "Limited wearable data ({} of {} signals); recovery estimate has low confidence.",
                count, SIGNAL_COUNT
            ));
        }

        tracing::debug!(
            "Recovery composite {:.3} from {} signals -> {}",
            score,
            count,
            zone
        );

        RecoveryAssessment {
            zone,
            confidence: round_to(confidence, 2),
            training_intensity_modifier: round_to(modifier, 2),
            recommendations,
            composite_score: Some(round_to(score, 2)),
            signal_count: count,
        }
    }
}

/// Assess recovery with the given configuration
pub fn assess_recovery(input: &WearableInput, config: &RecoveryConfig) -> RecoveryAssessment {
    RecoveryAdaptor::new(config).assess_recovery(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_input() -> WearableInput {
        WearableInput {
            hrv_ms: Some(70.0),
            resting_hr: Some(58.0),
            sleep_hours: Some(8.0),
            deep_sleep_minutes: Some(100.0),
            rem_sleep_minutes: None,
            recovery_score: Some(85.0),
            strain: Some(5.0),
        }
    }

    #[test]
    fn test_all_signals_green() {
        let config = RecoveryConfig::default();
        let assessment = assess_recovery(&full_input(), &config);

        assert_eq!(assessment.zone, RecoveryZone::Green);
        assert_eq!(assessment.training_intensity_modifier, 1.0);
        assert_eq!(assessment.confidence, 1.0);
        assert_eq!(assessment.signal_count, 6);
    }

    #[test]
    fn test_no_signals_neutral_fallback() {
        let config = RecoveryConfig::default();
        let assessment = assess_recovery(&WearableInput::default(), &config);

        assert_eq!(assessment.zone, RecoveryZone::Yellow);
        assert_eq!(assessment.confidence, 0.0);
        assert_eq!(assessment.training_intensity_modifier, 0.7);
        assert_eq!(assessment.recommendations.len(), 2);
        assert_eq!(assessment.composite_score, None);
    }

    #[test]
    fn test_rem_only_is_no_signal() {
        let config = RecoveryConfig::default();
        let input = WearableInput {
            rem_sleep_minutes: Some(100.0),
            ..Default::default()
        };
        assert_eq!(assess_recovery(&input, &config).signal_count, 0);
    }

    #[test]
    fn test_absent_signals_are_not_zero_filled() {
        let config = RecoveryConfig::default();
        let input = WearableInput {
            hrv_ms: Some(70.0),
            ..Default::default()
        };
        let assessment = assess_recovery(&input, &config);

        // One excellent signal alone is green, not dragged down by missing ones
        assert_eq!(assessment.zone, RecoveryZone::Green);
        assert_eq!(assessment.confidence, 0.17);
        assert!(assessment
            .recommendations
            .iter()
            .any(|r| r.contains("1 of 6 signals")));
    }

    #[test]
    fn test_red_zone_modifier_is_score() {
        let config = RecoveryConfig::default();
        let input = WearableInput {
            hrv_ms: Some(25.0),
            resting_hr: Some(75.0),
            sleep_hours: Some(4.5),
            ..Default::default()
        };
        let assessment = assess_recovery(&input, &config);

        assert_eq!(assessment.zone, RecoveryZone::Red);
        assert_eq!(
            Some(assessment.training_intensity_modifier),
            assessment.composite_score
        );
        assert!(assessment
            .recommendations
            .iter()
            .any(|r| r.contains("HRV is well below baseline")));
    }

    #[test]
    fn test_yellow_modifier_bounds() {
        let config = RecoveryConfig::default();
        let adaptor = RecoveryAdaptor::new(&config);

        assert_eq!(round_to(adaptor.modifier_for(RecoveryZone::Yellow, 0.649), 2), 0.8);
        assert_eq!(adaptor.modifier_for(RecoveryZone::Yellow, 0.35), 0.6);
        let mid = adaptor.modifier_for(RecoveryZone::Yellow, 0.55);
        assert!(mid < 0.8 && mid > 0.6);
    }

    #[test]
    fn test_scoring_functions_are_continuous() {
        let eps = 1e-9;
        for ratio in [0.6, 0.8, 1.0, 1.2] {
            let hrv = ratio * 55.0;
            assert!((score_hrv(hrv - eps, 55.0) - score_hrv(hrv, 55.0)).abs() < 1e-6);
        }
        for diff in [-5.0, 0.0, 5.0, 10.0] {
            let rhr = 62.0 + diff;
            assert!((score_resting_hr(rhr + eps, 62.0) - score_resting_hr(rhr, 62.0)).abs() < 1e-6);
        }
        for hours in [5.0, 6.0, 7.0, 8.0] {
            assert!((score_sleep_hours(hours - eps) - score_sleep_hours(hours)).abs() < 1e-6);
        }
        for minutes in [30.0, 60.0, 90.0] {
            assert!((score_deep_sleep(minutes - eps) - score_deep_sleep(minutes)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_monotone_in_each_signal() {
        let config = RecoveryConfig::default();
        let base = WearableInput {
            hrv_ms: Some(45.0),
            resting_hr: Some(66.0),
            sleep_hours: Some(6.5),
            deep_sleep_minutes: Some(50.0),
            rem_sleep_minutes: None,
            recovery_score: Some(50.0),
            strain: Some(12.0),
        };
        let score = |input: &WearableInput| {
            assess_recovery(input, &config)
                .composite_score
                .unwrap_or_default()
        };
        let baseline = score(&base);
        let baseline_zone = assess_recovery(&base, &config).zone;

        let improved = [
            WearableInput { hrv_ms: Some(60.0), ..base.clone() },
            WearableInput { resting_hr: Some(58.0), ..base.clone() },
            WearableInput { sleep_hours: Some(8.0), ..base.clone() },
            WearableInput { deep_sleep_minutes: Some(95.0), ..base.clone() },
            WearableInput { recovery_score: Some(80.0), ..base.clone() },
            WearableInput { strain: Some(4.0), ..base.clone() },
        ];
        for input in &improved {
            assert!(score(input) >= baseline);
            let zone = assess_recovery(input, &config).zone;
            assert!(zone.severity() <= baseline_zone.severity());
        }
    }

    #[test]
    fn test_strain_is_inverted() {
        assert_eq!(score_strain(0.0, 21.0), 1.0);
        assert_eq!(score_strain(21.0, 21.0), 0.0);
        assert_eq!(score_strain(30.0, 21.0), 0.0);
    }
}
