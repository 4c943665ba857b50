//! Draft supplement stack, interventions and sleep guidance.
//!
//! These builders produce the pre-resolution protocol pieces. Duplicates
//! and contradictions are left for the conflict resolver.

use crate::biomarkers::{lookup, KnownMarker};
use crate::config::{Config, GeneticsConfig};
use crate::dose::{infer_timing, name_prefix, parse_dose};
use crate::genetics::{category_is_high_risk, is_high_risk, RiskMap};
use crate::SupplementTiming::*;
use crate::{
    BloodworkMarker, GeneticCategory, Goal, InterventionBlock, InterventionType, MarkerStatus,
    RecoveryZone, SleepProtocol, SupplementDose, WearableInput,
};
use chrono::{Duration, NaiveTime};

// ============================================================================
// Supplements
// ============================================================================

fn baseline_stack() -> Vec<SupplementDose> {
    vec![
        SupplementDose::new("Vitamin D3", "2000 IU", WithBreakfast, "Baseline vitamin D support"),
        SupplementDose::new(
            "Magnesium Glycinate",
            "300 mg",
            Bedtime,
            "Baseline magnesium for sleep and recovery",
        ),
    ]
}

/// Fixed entries for a goal
pub fn goal_stack(goal: Goal) -> Vec<SupplementDose> {
    let s = SupplementDose::new;
    match goal {
        Goal::Longevity => vec![
            s("Omega-3 (EPA/DHA)", "2 g", WithBreakfast, "Fish oil for cardiovascular and brain health"),
            s("Creatine Monohydrate", "5 g", WithBreakfast, "Muscle and cognitive reserve"),
        ],
        Goal::MuscleGain => vec![
            s("Creatine Monohydrate", "5 g", WithBreakfast, "Strength and lean mass"),
            s("Whey Protein", "30 g", PostWorkout, "Post-training protein"),
            s("Pre-Workout (Caffeine 150 mg)", "1 serving", PreWorkout, "Training output"),
        ],
        Goal::FatLoss => vec![
            s("Green Tea Extract (EGCG)", "400 mg", WithBreakfast, "Fat oxidation"),
            s("Fiber (Psyllium)", "5 g", WithDinner, "Satiety"),
            s("Calcium Citrate", "500 mg", WithBreakfast, "Bone health during a deficit"),
        ],
        Goal::Endurance => vec![
            s("Beetroot Nitrate", "500 mg", PreWorkout, "Oxygen efficiency"),
            s("Electrolytes", "1 serving", PreWorkout, "Sodium and potassium for long sessions"),
        ],
        Goal::Cognitive => vec![
            s("Caffeine + L-Theanine", "100 mg + 200 mg", Morning, "Calm focus"),
            s("Omega-3 (EPA/DHA)", "2 g", WithBreakfast, "Fish oil DHA for brain health"),
        ],
        Goal::Metabolic => vec![s("Berberine", "500 mg", WithDinner, "Glucose control")],
        Goal::Hormonal => vec![
            s("Zinc", "15 mg", WithDinner, "Testosterone and thyroid support"),
            s("Ashwagandha (KSM-66)", "600 mg", Evening, "Cortisol control"),
        ],
        Goal::Cardiovascular => vec![
            s("Omega-3 (EPA/DHA)", "2 g", WithBreakfast, "Fish oil for triglycerides"),
            s("CoQ10", "100 mg", WithLunch, "Mitochondrial and heart support"),
            s("Folic Acid", "400 mcg", WithBreakfast, "Homocysteine control"),
        ],
        Goal::SleepQuality => vec![
            s("Glycine", "3 g", Bedtime, "Core temperature drop for sleep onset"),
            s("L-Theanine", "200 mg", Bedtime, "Relaxation before sleep"),
        ],
        Goal::StressResilience => vec![
            s("Ashwagandha (KSM-66)", "600 mg", Evening, "Cortisol control"),
            s("Rhodiola Rosea", "200 mg", Morning, "Stress adaptation"),
        ],
    }
}

fn has_prefix(stack: &[SupplementDose], prefix: &str) -> bool {
    stack.iter().any(|s| name_prefix(&s.name) == prefix)
}

/// Add parsed supplement adjustments from high-risk genes
fn add_genetic_supplements(stack: &mut Vec<SupplementDose>, risks: &RiskMap, config: &GeneticsConfig) {
    for assessment in risks.values().filter(|a| is_high_risk(a, config)) {
        for text in &assessment.supplement_adjustments {
            let parsed = parse_dose(text);
            if !parsed.parsed {
                tracing::debug!("Skipping unparsed genetic supplement '{}'", text);
                continue;
            }
            if has_prefix(stack, &name_prefix(&parsed.name)) {
                continue;
            }
            stack.push(SupplementDose::new(
                &parsed.name,
                &parsed.dose,
                infer_timing(text),
                &format!("{} {} variant", assessment.category, assessment.tier.as_str()),
            ));
        }
    }
}

/// Vitamin D escalation, B12 and iron from the current panel
///
/// Only markers flagged critical or suboptimal are considered.
fn add_bloodwork_supplements(stack: &mut Vec<SupplementDose>, markers: &[BloodworkMarker]) {
    let flagged = markers
        .iter()
        .filter(|m| matches!(m.status, MarkerStatus::Critical | MarkerStatus::Suboptimal));

    for marker in flagged {
        match lookup(&marker.name) {
            Some(KnownMarker::VitaminD) => {
                let dose = match marker.status {
                    MarkerStatus::Critical => "5000 IU",
                    _ => "4000 IU",
                };
                let rationale = format!(
                    "Vitamin D {} at {} {}",
                    marker.status, marker.value, marker.unit
                );
                let existing = stack
                    .iter_mut()
                    .find(|s| s.name.to_lowercase().starts_with("vitamin d"));
                match existing {
                    Some(existing) => {
                        existing.dose = dose.to_string();
                        existing.rationale = rationale;
                    }
                    None => stack.push(SupplementDose::new(
                        "Vitamin D3",
                        dose,
                        WithBreakfast,
                        &rationale,
                    )),
                }
            }
            Some(KnownMarker::VitaminB12)
                if marker.value < marker.optimal_low && !has_prefix(stack, "methylcobalamin") =>
            {
                stack.push(SupplementDose::new(
                    "Methylcobalamin (B12)",
                    "1000 mcg",
                    WithBreakfast,
                    &format!("B12 below optimal at {} {}", marker.value, marker.unit),
                ));
            }
            Some(KnownMarker::Ferritin) if marker.value < marker.optimal_low => {
                stack.push(SupplementDose::new(
                    "Iron Bisglycinate",
                    "25 mg",
                    WithBreakfast,
                    &format!("Ferritin below optimal at {} {}", marker.value, marker.unit),
                ));
            }
            _ => {}
        }
    }
}

/// Assemble the draft supplement stack
///
/// Order: baseline, goal sets, genetic additions, bloodwork rules.
pub fn build_supplement_stack(
    goals: &[Goal],
    risks: &RiskMap,
    markers: &[BloodworkMarker],
    config: &GeneticsConfig,
) -> Vec<SupplementDose> {
    let mut stack = baseline_stack();
    for goal in goals {
        stack.extend(goal_stack(*goal));
    }
    add_genetic_supplements(&mut stack, risks, config);
    add_bloodwork_supplements(&mut stack, markers);

    tracing::debug!("Draft supplement stack has {} entries", stack.len());
    stack
}

// ============================================================================
// Interventions
// ============================================================================

fn intervention(
    intervention_type: InterventionType,
    duration_minutes: u32,
    temperature_c: Option<f64>,
    notes: &str,
) -> InterventionBlock {
    InterventionBlock {
        intervention_type,
        duration_minutes,
        temperature_c,
        notes: Some(notes.to_string()),
    }
}

/// Recovery interventions for the zone, plus goal-specific extras
pub fn build_interventions(zone: RecoveryZone, goals: &[Goal]) -> Vec<InterventionBlock> {
    use InterventionType::*;

    let mut blocks = vec![intervention(
        SunlightExposure,
        10,
        None,
        "Outdoors within 30 minutes of waking",
    )];

    match zone {
        RecoveryZone::Green => {
            blocks.push(intervention(
                ColdExposure,
                3,
                Some(10.0),
                "Cold plunge or shower, not within 4 hours after strength work",
            ));
            blocks.push(intervention(Sauna, 20, Some(80.0), "Hydrate with electrolytes afterwards"));
        }
        RecoveryZone::Yellow => {
            blocks.push(intervention(Sauna, 15, Some(75.0), "Keep the session gentle"));
            blocks.push(intervention(Breathwork, 10, None, "Box breathing 4-4-4-4"));
        }
        RecoveryZone::Red => {
            blocks.push(intervention(Breathwork, 10, None, "Slow breathing with long exhales"));
            blocks.push(intervention(Nsdr, 20, None, "Yoga nidra in the early afternoon"));
        }
    }

    let has = |blocks: &[InterventionBlock], kind| blocks.iter().any(|b| b.intervention_type == kind);

    if (goals.contains(&Goal::StressResilience) || goals.contains(&Goal::Cognitive))
        && !has(&blocks, Meditation)
    {
        blocks.push(intervention(Meditation, 10, None, "Focused-attention meditation"));
    }
    if goals.contains(&Goal::SleepQuality) && !has(&blocks, Nsdr) {
        blocks.push(intervention(Nsdr, 10, None, "Short NSDR session to downshift in the evening"));
    }

    blocks
}

// ============================================================================
// Sleep
// ============================================================================

fn wake_time(config: &Config) -> NaiveTime {
    NaiveTime::parse_from_str(&config.synthesis.wake_time, "%H:%M").unwrap_or_else(|e| {
        tracing::warn!(
            "Invalid wake time '{}' ({}), using 06:30",
            config.synthesis.wake_time,
            e
        );
        NaiveTime::from_hms_opt(6, 30, 0).unwrap_or_default()
    })
}

/// Sleep target, bedtime and evening checklist
pub fn build_sleep_protocol(
    zone: RecoveryZone,
    goals: &[Goal],
    risks: &RiskMap,
    wearable: Option<&WearableInput>,
    config: &Config,
) -> SleepProtocol {
    let synthesis = &config.synthesis;
    let mut hours = match zone {
        RecoveryZone::Green => synthesis.sleep_hours_green,
        RecoveryZone::Yellow => synthesis.sleep_hours_yellow,
        RecoveryZone::Red => synthesis.sleep_hours_red,
    };
    if goals.contains(&Goal::SleepQuality) {
        hours = hours.max(synthesis.sleep_quality_min_hours);
    }

    let wake = wake_time(config);
    let bedtime = wake - Duration::minutes((hours * 60.0).round() as i64);

    let caffeine_cutoff =
        if category_is_high_risk(risks, GeneticCategory::Cyp1a2, &config.genetics) {
            "No caffeine after 10:00 (slow caffeine metabolism)"
        } else {
            "No caffeine after 14:00"
        };

    let mut checklist = vec![
        caffeine_cutoff.to_string(),
        "Last meal 3 hours before bed".to_string(),
        "Dim lights 1 hour before bed".to_string(),
        "No screens 30 minutes before bed".to_string(),
        "Bedroom at 18-19°C".to_string(),
    ];
    if zone == RecoveryZone::Red {
        checklist.push("Skip alcohol and evening training".to_string());
    }

    let mut notes = Vec::new();
    if let Some(w) = wearable {
        if let Some(deep) = w.deep_sleep_minutes.filter(|m| *m < 60.0) {
            notes.push(format!(
                "Deep sleep was low last night ({:.0} min); keep the room cool and avoid alcohol.",
                deep
            ));
        }
        if let Some(rem) = w.rem_sleep_minutes.filter(|m| *m < 90.0) {
            notes.push(format!(
                "REM sleep was short ({:.0} min); keep a consistent wake time.",
                rem
            ));
        }
    }

    SleepProtocol {
        target_bedtime: bedtime.format("%H:%M").to_string(),
        target_wake_time: wake.format("%H:%M").to_string(),
        target_hours: hours,
        evening_checklist: checklist,
        notes,
    }
}
