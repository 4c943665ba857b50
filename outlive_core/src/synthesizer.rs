//! Daily protocol synthesis.
//!
//! Runs every engine in a fixed order and reconciles the result. The output
//! depends only on the input bundle, the reference date and the config.

use crate::biomarkers::{self, TrendDirection};
use crate::circaseptan::{plan_week, DayPlan};
use crate::conflicts::ConflictResolver;
use crate::genetics::{is_high_risk, map_risks, RiskMap};
use crate::meals::{Anthropometrics, MealPlanner, MealRequest};
use crate::recovery::RecoveryAdaptor;
use crate::{brief, stack};
use crate::{
    BloodworkMarker, Config, Exercise, SynthesisInput, SynthesizedProtocol, TrainingBlock,
    TrainingType, WearableInput,
};
use chrono::{Datelike, NaiveDate};

/// Minimum session length after scaling by the intensity modifier
const MIN_SESSION_MINUTES: f64 = 10.0;

/// Exercises, base duration and base RPE for a training type
fn session_template(training_type: TrainingType) -> (Vec<Exercise>, f64, f64) {
    match training_type {
        TrainingType::Strength => (
            vec![
                Exercise::new("Back squat", 5, "5"),
                Exercise::new("Bench press", 5, "5"),
                Exercise::new("Romanian deadlift", 3, "8"),
                Exercise::new("Weighted pull-up", 3, "6"),
            ],
            60.0,
            8.0,
        ),
        TrainingType::Hypertrophy => (
            vec![
                Exercise::new("Front squat", 4, "8-10"),
                Exercise::new("Incline dumbbell press", 4, "10-12"),
                Exercise::new("Chest-supported row", 4, "10-12"),
                Exercise::new("Walking lunge", 3, "12 each"),
                Exercise::new("Cable curl", 3, "12-15"),
            ],
            60.0,
            8.0,
        ),
        TrainingType::Endurance => (
            vec![
                Exercise::new("Zone 2 ride or run", 1, "45 min"),
                Exercise::new("Strides", 6, "20 s"),
            ],
            50.0,
            6.0,
        ),
        TrainingType::Mobility => (
            vec![
                Exercise::new("Hip 90/90 switches", 2, "10"),
                Exercise::new("Thoracic rotations", 2, "10 each"),
                Exercise::new("Couch stretch", 2, "60 s each"),
            ],
            30.0,
            3.0,
        ),
        TrainingType::Deload => (
            vec![
                Exercise::new("Goblet squat", 3, "8"),
                Exercise::new("Push-up", 3, "10"),
                Exercise::new("Band pull-apart", 3, "15"),
            ],
            40.0,
            6.0,
        ),
        TrainingType::Rest => (
            vec![Exercise::new("Easy walk", 1, "20 min")],
            20.0,
            2.0,
        ),
    }
}

/// Build today's session from the planned focus
///
/// The intensity modifier scales session length, never the RPE target.
pub fn build_training_block(day: &DayPlan, modifier: f64) -> TrainingBlock {
    let (exercises, base_minutes, rpe) = session_template(day.focus);
    let minutes = (base_minutes * modifier).round().max(MIN_SESSION_MINUTES);

    let mut block = TrainingBlock {
        training_type: day.focus,
        exercises,
        duration_minutes: minutes as u32,
        rpe_target: rpe,
        notes: None,
    };
    if modifier < 1.0 {
        block.push_note(&format!(
            "Volume scaled to {:.0}% for today's recovery.",
            modifier * 100.0
        ));
    }
    block
}

fn anthropometrics(input: &SynthesisInput, date: NaiveDate) -> Option<Anthropometrics> {
    let profile = &input.profile;
    let height_cm = profile.height_cm?;
    let age_years = date.years_since(profile.birth_date?)?;
    Some(Anthropometrics {
        height_cm,
        age_years: f64::from(age_years),
        sex: profile.biological_sex,
    })
}

/// Synthesize the protocol for `date`
///
/// ## Stage order
///
/// 1. Genetics → per-gene assessments
/// 2. Bloodwork → insights and trends
/// 3. Wearables → recovery zone and intensity modifier
/// 4. Weekly cycle for the primary goal, adjusted to the zone
/// 5. Training block, nutrition, supplements, interventions, sleep
/// 6. Conflict resolution
/// 7. Insight log and top priorities
pub fn synthesize(input: &SynthesisInput, date: NaiveDate, config: &Config) -> SynthesizedProtocol {
    let profile = &input.profile;
    let mut insights = Vec::new();

    // Genetics
    let risks: RiskMap = match &input.genomics {
        Some(genomics) => {
            let risks = map_risks(&genomics.risks);
            let high: Vec<&str> = risks
                .values()
                .filter(|a| is_high_risk(a, &config.genetics))
                .map(|a| a.category.as_str())
                .collect();
            insights.push(if high.is_empty() {
                format!("Genetics: {} genes mapped, none high risk.", risks.len())
            } else {
                format!(
                    "Genetics: {} genes mapped, high risk: {}.",
                    risks.len(),
                    high.join(", ")
                )
            });
            risks
        }
        None => {
            insights.push("No genomic data provided; genetic adjustments skipped.".to_string());
            RiskMap::new()
        }
    };

    // Bloodwork
    let markers: &[BloodworkMarker] = match &input.bloodwork {
        Some(bloodwork) => {
            let analysis = biomarkers::analyze(&bloodwork.markers);
            let attention = analysis.iter().filter(|i| i.needs_attention()).count();
            insights.push(format!(
                "Bloodwork ({}): {} markers, {} need attention.",
                bloodwork.lab_date,
                bloodwork.markers.len(),
                attention
            ));
            insights.extend(
                analysis
                    .iter()
                    .filter(|i| i.priority == 1)
                    .map(|i| i.recommendation.clone()),
            );
            if let Some(previous) = &bloodwork.previous_markers {
                for trend in biomarkers::trends(&bloodwork.markers, previous, &config.biomarkers) {
                    if trend.direction != TrendDirection::Stable {
                        insights.push(format!(
                            "Trend: {} {} ({:+.1}% since last panel).",
                            trend.marker,
                            trend.direction.as_str(),
                            trend.percent_change
                        ));
                    }
                }
            }
            bloodwork.markers.as_slice()
        }
        None => {
            insights.push("No bloodwork provided; biomarker recommendations skipped.".to_string());
            &[]
        }
    };

    // Recovery
    let no_signals = WearableInput::default();
    let wearable = input.wearable.as_ref().unwrap_or(&no_signals);
    let recovery = RecoveryAdaptor::new(&config.recovery).assess_recovery(wearable);
    let zone = recovery.zone;
    insights.push(format!(
        "Recovery: {} zone from {} signals (confidence {}, intensity x{}).",
        zone, recovery.signal_count, recovery.confidence, recovery.training_intensity_modifier
    ));

    // Weekly cycle
    let day_of_week = date.weekday().number_from_monday() as u8;
    let weekly_plan = plan_week(&profile.goals, day_of_week, zone);
    let today = weekly_plan
        .day(day_of_week)
        .cloned()
        .unwrap_or_else(|| DayPlan {
            day: day_of_week,
            focus: TrainingType::Rest,
            nutrition_focus: String::new(),
            recovery_day: true,
        });
    insights.push(format!(
        "Day {}: {} focus. {}",
        today.day, today.focus, today.nutrition_focus
    ));

    // Training
    let training = build_training_block(&today, recovery.training_intensity_modifier);

    // Nutrition
    let weight_kg = match &input.body_comp {
        Some(body_comp) => body_comp.weight_kg,
        None => {
            insights.push(format!(
                "No body composition data; using reference weight {} kg.",
                config.synthesis.reference_weight_kg
            ));
            config.synthesis.reference_weight_kg
        }
    };
    let genetic_adjustments: Vec<String> = risks
        .values()
        .filter(|a| is_high_risk(a, &config.genetics))
        .flat_map(|a| a.dietary_adjustments.iter().cloned())
        .collect();
    let request = MealRequest {
        weight_kg,
        body_fat_percent: input.body_comp.as_ref().and_then(|b| b.body_fat_percent),
        goals: profile.goals.clone(),
        training_type: today.focus,
        allergies: profile.allergies.clone(),
        dietary_restrictions: profile.dietary_restrictions.clone(),
        genetic_adjustments,
        anthropometrics: anthropometrics(input, date),
    };
    let nutrition = MealPlanner::new(&config.nutrition).plan(&request);
    insights.push(format!(
        "Nutrition: {} kcal (protein {} g, carbs {} g, fat {} g).",
        nutrition.tdee, nutrition.protein_g, nutrition.carbs_g, nutrition.fat_g
    ));

    // Supplements, interventions, sleep
    let supplements =
        stack::build_supplement_stack(&profile.goals, &risks, markers, &config.genetics);
    let interventions = stack::build_interventions(zone, &profile.goals);
    let sleep = stack::build_sleep_protocol(
        zone,
        &profile.goals,
        &risks,
        input.wearable.as_ref(),
        config,
    );

    // Conflicts
    let resolved = ConflictResolver::new(&config.conflicts, &config.genetics).resolve(
        Some(training.clone()),
        Some(nutrition.clone()),
        supplements,
        &risks,
        zone,
        &profile.allergies,
    );
    for note in &resolved.notes {
        insights.push(format!(
            "Resolved (priority {}): {}. {}.",
            note.priority, note.description, note.resolution
        ));
    }

    let mut protocol = SynthesizedProtocol {
        date,
        day_of_week,
        recovery_zone: zone,
        recovery,
        weekly_plan,
        training: resolved.training.unwrap_or(training),
        nutrition: resolved.nutrition.unwrap_or(nutrition),
        supplements: resolved.supplements,
        interventions,
        sleep,
        conflicts: resolved.notes,
        insights,
        priorities: Vec::new(),
    };
    protocol.priorities = brief::top_priorities(&protocol);

    tracing::info!(
        "Synthesized protocol for {} ({} zone, {} supplements, {} conflicts)",
        date,
        zone,
        protocol.supplements.len(),
        protocol.conflicts.len()
    );
    protocol
}
