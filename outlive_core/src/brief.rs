//! The three things that matter most today.

use crate::{RecoveryZone, SynthesizedProtocol, TrainingType};

/// Maximum number of priority lines
pub const MAX_PRIORITIES: usize = 3;

/// Short, ordered action items for the day
///
/// Candidates in order: recovery focus (red or green only), the first three
/// supplements, the first intervention, the sleep target. The list is cut
/// to [`MAX_PRIORITIES`].
pub fn top_priorities(protocol: &SynthesizedProtocol) -> Vec<String> {
    let mut items = Vec::new();

    match protocol.recovery_zone {
        RecoveryZone::Red => {
            items.push("Recovery first: rest day with easy movement only.".to_string());
        }
        RecoveryZone::Green if protocol.training.training_type != TrainingType::Rest => {
            items.push(format!(
                "Train: {} session, {} minutes at RPE {}.",
                protocol.training.training_type,
                protocol.training.duration_minutes,
                protocol.training.rpe_target
            ));
        }
        _ => {}
    }

    if !protocol.supplements.is_empty() {
        let names: Vec<&str> = protocol
            .supplements
            .iter()
            .take(3)
            .map(|s| s.name.as_str())
            .collect();
        items.push(format!("Take: {}", names.join(", ")));
    }

    if let Some(first) = protocol.interventions.first() {
        items.push(format!(
            "{} for {} minutes.",
            capitalize(first.intervention_type.as_str()),
            first.duration_minutes
        ));
    }

    items.push(format!(
        "Sleep {} hours: lights out by {}.",
        protocol.sleep.target_hours, protocol.sleep.target_bedtime
    ));

    items.truncate(MAX_PRIORITIES);
    items
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        synthesize, Config, Exercise, InterventionBlock, InterventionType, SupplementDose,
        SupplementTiming, SynthesisInput, TrainingBlock,
    };
    use chrono::NaiveDate;

    fn protocol(zone: RecoveryZone, training_type: TrainingType) -> SynthesizedProtocol {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let mut protocol = synthesize(&SynthesisInput::default(), date, &Config::default());

        protocol.recovery_zone = zone;
        protocol.training = TrainingBlock {
            training_type,
            exercises: vec![Exercise::new("Back squat", 4, "6")],
            duration_minutes: 45,
            rpe_target: 7.0,
            notes: None,
        };
        protocol.supplements = ["Vitamin D3", "Magnesium Glycinate", "Creatine", "Omega-3"]
            .iter()
            .map(|name| SupplementDose::new(name, "1 serving", SupplementTiming::Morning, "test"))
            .collect();
        protocol.interventions = vec![InterventionBlock {
            intervention_type: InterventionType::SunlightExposure,
            duration_minutes: 10,
            temperature_c: None,
            notes: None,
        }];
        protocol.sleep.target_hours = 8.0;
        protocol.sleep.target_bedtime = "22:30".into();
        protocol
    }

    #[test]
    fn test_red_zone_leads_with_recovery() {
        let items = top_priorities(&protocol(RecoveryZone::Red, TrainingType::Rest));
        assert_eq!(
            items,
            vec![
                "Recovery first: rest day with easy movement only.",
                "Take: Vitamin D3, Magnesium Glycinate, Creatine",
                "Morning sunlight for 10 minutes.",
            ]
        );
    }

    #[test]
    fn test_green_training_day_is_truncated() {
        let items = top_priorities(&protocol(RecoveryZone::Green, TrainingType::Strength));
        assert_eq!(items.len(), MAX_PRIORITIES);
        assert_eq!(items[0], "Train: strength session, 45 minutes at RPE 7.");
        assert!(items.iter().all(|i| !i.starts_with("Sleep")));
    }

    #[test]
    fn test_green_rest_and_yellow_skip_training_line() {
        for (zone, training_type) in [
            (RecoveryZone::Green, TrainingType::Rest),
            (RecoveryZone::Yellow, TrainingType::Strength),
        ] {
            let items = top_priorities(&protocol(zone, training_type));
            assert_eq!(items.len(), 3);
            assert!(items[0].starts_with("Take: "));
            assert_eq!(items[2], "Sleep 8 hours: lights out by 22:30.");
        }
    }

    #[test]
    fn test_sleep_only_when_nothing_else() {
        let mut protocol = protocol(RecoveryZone::Yellow, TrainingType::Deload);
        protocol.supplements.clear();
        protocol.interventions.clear();

        let items = top_priorities(&protocol);
        assert_eq!(items, vec!["Sleep 8 hours: lights out by 22:30."]);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("morning sunlight"), "Morning sunlight");
        assert_eq!(capitalize("NSDR"), "NSDR");
        assert_eq!(capitalize(""), "");
    }
}
