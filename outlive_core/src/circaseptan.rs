//! Seven-day training and nutrition cycle.
//!
//! Each goal has a fixed weekly template. The recovery zone then adjusts
//! the current day (and, in the red zone, the day after it).

use crate::{Goal, RecoveryZone, TrainingType};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One day of the weekly cycle
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DayPlan {
    /// 1 = Monday ... 7 = Sunday
    pub day: u8,
    pub focus: TrainingType,
    pub nutrition_focus: String,
    pub recovery_day: bool,
}

/// Seven days of plans keyed to one goal
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WeeklyPlan {
    pub goal: Goal,
    pub days: Vec<DayPlan>,
}

impl WeeklyPlan {
    /// Plan for a day number, if it is in range
    pub fn day(&self, day: u8) -> Option<&DayPlan> {
        self.days.iter().find(|d| d.day == day)
    }
}

const RED_REST_TEXT: &str =
    "Red-zone rest day: maintenance calories, extra protein and hydration, no deficit.";
const RED_NEXT_DAY_TEXT: &str =
    "Gentle recovery: light mobility, anti-inflammatory whole foods and steady hydration.";
const YELLOW_ADJUSTED_TEXT: &str =
    "Recovery-adjusted: keep carbohydrates moderate and prioritize protein and fluids.";

type Template = [(TrainingType, &'static str, bool); 7];

/// Fixed weekly templates, one per goal
static TEMPLATES: Lazy<HashMap<Goal, Template>> = Lazy::new(|| {
    use TrainingType::*;

    let mut map: HashMap<Goal, Template> = HashMap::new();
    map.insert(
        Goal::Longevity,
        [
            (Strength, "Protein-forward, moderate carbohydrates around training", false),
            (Endurance, "Zone 2 fueling: complex carbohydrates, steady hydration", false),
            (Hypertrophy, "Higher protein, carbohydrates pre and post training", false),
            (Endurance, "Zone 2 fueling with polyphenol-rich plants", false),
            (Strength, "Protein-forward, moderate carbohydrates around training", false),
            (Mobility, "Lower carbohydrates, colorful vegetables and omega-3 fats", true),
            (Rest, "Time-restricted eating window, fiber-rich whole foods", true),
        ],
    );
    map.insert(
        Goal::MuscleGain,
        [
            (Hypertrophy, "Surplus day: high protein, high carbohydrates", false),
            (Strength, "Surplus day: carbohydrates around training", false),
            (Mobility, "Maintenance calories, protein every 3-4 hours", true),
            (Hypertrophy, "Surplus day: high protein, high carbohydrates", false),
            (Strength, "Surplus day: carbohydrates around training", false),
            (Hypertrophy, "Surplus day: extra post-workout carbohydrates", false),
            (Rest, "Maintenance calories, casein before bed", true),
        ],
    );
    map.insert(
        Goal::FatLoss,
        [
            (Strength, "Deficit with protein held high", false),
            (Endurance, "Deficit, carbohydrates only around the session", false),
            (Strength, "Deficit with protein held high", false),
            (Endurance, "Deficit, high-volume vegetables", false),
            (Hypertrophy, "Small deficit, carbohydrates pre-workout", false),
            (Mobility, "Diet break at maintenance", true),
            (Rest, "Deficit, high-fiber whole foods", true),
        ],
    );
    map.insert(
        Goal::Endurance,
        [
            (Endurance, "Carbohydrate-fueled long aerobic session", false),
            (Strength, "Protein-forward, moderate carbohydrates", false),
            (Endurance, "Intervals: carbohydrates before and during", false),
            (Mobility, "Glycogen restoration, electrolytes", true),
            (Endurance, "Tempo session: carbohydrates before and during", false),
            (Strength, "Protein-forward, moderate carbohydrates", false),
            (Rest, "Anti-inflammatory whole foods, replenish electrolytes", true),
        ],
    );
    map.insert(
        Goal::Cognitive,
        [
            (Endurance, "Omega-3 rich fish, low-glycemic carbohydrates", false),
            (Strength, "Choline-rich eggs, steady blood sugar", false),
            (Mobility, "Polyphenol-rich berries and greens", true),
            (Endurance, "Omega-3 rich fish, low-glycemic carbohydrates", false),
            (Strength, "Choline-rich eggs, steady blood sugar", false),
            (Endurance, "Ketogenic-leaning day, MCT fats", false),
            (Rest, "Time-restricted eating window", true),
        ],
    );
    map.insert(
        Goal::Metabolic,
        [
            (Strength, "Low-glycemic meals, walk after each meal", false),
            (Endurance, "Fasted zone 2 session, fiber-first meals", false),
            (Strength, "Low-glycemic meals, walk after each meal", false),
            (Endurance, "Carbohydrates only after training", false),
            (Hypertrophy, "Carbohydrates around training, protein at every meal", false),
            (Mobility, "Lower carbohydrates, vinegar before meals", true),
            (Rest, "Extended overnight fast, fiber-rich whole foods", true),
        ],
    );
    map.insert(
        Goal::Hormonal,
        [
            (Strength, "Adequate dietary fat, zinc-rich foods", false),
            (Mobility, "Cruciferous vegetables, healthy fats", true),
            (Strength, "Adequate dietary fat, zinc-rich foods", false),
            (Endurance, "Moderate carbohydrates, avoid a deep deficit", false),
            (Hypertrophy, "Carbohydrates around training", false),
            (Mobility, "Magnesium-rich foods, no alcohol", true),
            (Rest, "Maintenance calories, whole foods", true),
        ],
    );
    map.insert(
        Goal::Cardiovascular,
        [
            (Endurance, "Zone 2 fueling, low sodium", false),
            (Strength, "Mediterranean plate, olive oil and fish", false),
            (Endurance, "Intervals: nitrate-rich beets and greens", false),
            (Mobility, "Soluble fiber: oats, beans, lentils", true),
            (Endurance, "Zone 2 fueling, potassium-rich foods", false),
            (Strength, "Mediterranean plate, olive oil and fish", false),
            (Rest, "Low sodium, omega-3 rich fish", true),
        ],
    );
    map.insert(
        Goal::SleepQuality,
        [
            (Strength, "Earlier dinner, carbohydrates in the evening meal", false),
            (Endurance, "Morning session, no caffeine after noon", false),
            (Mobility, "Magnesium-rich foods, tart cherry", true),
            (Strength, "Earlier dinner, carbohydrates in the evening meal", false),
            (Endurance, "Morning session, no caffeine after noon", false),
            (Mobility, "Tryptophan-rich dinner", true),
            (Rest, "No alcohol, light early dinner", true),
        ],
    );
    map.insert(
        Goal::StressResilience,
        [
            (Endurance, "Steady blood sugar, regular meal times", false),
            (Strength, "Protein-forward, magnesium-rich foods", false),
            (Mobility, "Fermented foods for gut health", true),
            (Endurance, "Steady blood sugar, regular meal times", false),
            (Strength, "Protein-forward, magnesium-rich foods", false),
            (Mobility, "Omega-3 rich fish, dark leafy greens", true),
            (Rest, "Relaxed meals, no caffeine", true),
        ],
    );
    map
});

/// The unadjusted weekly template for a goal
pub fn base_cycle(goal: Goal) -> WeeklyPlan {
    let days = TEMPLATES
        .get(&goal)
        .map(|template| {
            template
                .iter()
                .enumerate()
                .map(|(i, (focus, nutrition, recovery_day))| DayPlan {
                    day: i as u8 + 1,
                    focus: *focus,
                    nutrition_focus: nutrition.to_string(),
                    recovery_day: *recovery_day,
                })
                .collect()
        })
        .unwrap_or_default();

    WeeklyPlan { goal, days }
}

/// Day number after `day`, wrapping Sunday back to Monday
fn next_day(day: u8) -> u8 {
    if day >= 7 {
        1
    } else {
        day + 1
    }
}

/// Adjust the current day (and the following one for red) to the recovery zone
pub fn apply_recovery_overrides(plan: &mut WeeklyPlan, current_day: u8, zone: RecoveryZone) {
    match zone {
        RecoveryZone::Green => {}
        RecoveryZone::Yellow => {
            if let Some(day) = plan.days.iter_mut().find(|d| d.day == current_day) {
                match day.focus {
                    TrainingType::Strength | TrainingType::Hypertrophy => {
                        day.focus = TrainingType::Deload;
                    }
                    _ => day.nutrition_focus = YELLOW_ADJUSTED_TEXT.to_string(),
                }
            }
        }
        RecoveryZone::Red => {
            if let Some(day) = plan.days.iter_mut().find(|d| d.day == current_day) {
                day.focus = TrainingType::Rest;
                day.nutrition_focus = RED_REST_TEXT.to_string();
                day.recovery_day = true;
            }

            let following = next_day(current_day);
            if let Some(day) = plan.days.iter_mut().find(|d| d.day == following) {
                if !day.recovery_day {
                    day.focus = TrainingType::Mobility;
                    day.nutrition_focus = RED_NEXT_DAY_TEXT.to_string();
                    day.recovery_day = true;
                }
            }
        }
    }
}

/// Build the week for the primary goal, adjusted to today's recovery zone
pub fn plan_week(goals: &[Goal], current_day: u8, zone: RecoveryZone) -> WeeklyPlan {
    let goal = Goal::primary(goals);
    let current_day = current_day.clamp(1, 7);

    let mut plan = base_cycle(goal);
    apply_recovery_overrides(&mut plan, current_day, zone);

    tracing::debug!("Planned week for {} (day {}, zone {})", goal, current_day, zone);
    plan
}
