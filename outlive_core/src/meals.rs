//! Calorie and macro targets plus a four-meal day.
//!
//! Energy is estimated from body composition, scaled by the day's training
//! type and the primary goal, then split into macros. The reported `tdee`
//! is always recomputed from the rounded macro grams, so it can drift a few
//! calories from the estimate.

use crate::config::NutritionConfig;
use crate::{BiologicalSex, Goal, MealPlan, MealSlot, NutritionPlan, TrainingType};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Mifflin-St Jeor coefficients
const MIFFLIN_WEIGHT: f64 = 10.0;
const MIFFLIN_HEIGHT: f64 = 6.25;
const MIFFLIN_AGE: f64 = 5.0;

/// Height, age and sex, when the profile has them
#[derive(Clone, Debug, PartialEq)]
pub struct Anthropometrics {
    pub height_cm: f64,
    pub age_years: f64,
    pub sex: Option<BiologicalSex>,
}

/// Everything the planner needs for one day
#[derive(Clone, Debug, PartialEq)]
pub struct MealRequest {
    pub weight_kg: f64,
    pub body_fat_percent: Option<f64>,
    pub goals: Vec<Goal>,
    pub training_type: TrainingType,
    pub allergies: Vec<String>,
    pub dietary_restrictions: Vec<String>,
    /// Dietary adjustment strings from high-risk genetic assessments
    pub genetic_adjustments: Vec<String>,
    pub anthropometrics: Option<Anthropometrics>,
}

// ============================================================================
// Meal Catalog
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum MealStyle {
    Vegan,
    Vegetarian,
    DairyFree,
    GlutenFree,
    SeafoodFree,
    Performance,
    EnduranceFuel,
    Balanced,
}

/// Breakfast, lunch, dinner and snack descriptions per style
static MEAL_CATALOG: Lazy<HashMap<MealStyle, [&'static str; 4]>> = Lazy::new(|| {
    let mut catalog = HashMap::new();
    catalog.insert(
        MealStyle::Vegan,
        [
            "Tofu scramble with spinach, black beans and whole-grain toast",
            "Lentil and quinoa bowl with roasted vegetables and tahini",
            "Tempeh stir-fry with brown rice and broccoli",
            "Soy yogurt with berries and hemp seeds",
        ],
    );
    catalog.insert(
        MealStyle::Vegetarian,
        [
            "Greek yogurt with berries, walnuts and oats",
            "Egg and vegetable frittata with mixed greens",
            "Paneer and chickpea curry with basmati rice",
            "Cottage cheese with sliced apple",
        ],
    );
    catalog.insert(
        MealStyle::DairyFree,
        [
            "Eggs with avocado, sautéed greens and sweet potato",
            "Grilled chicken salad with olive oil and quinoa",
            "Salmon with roasted vegetables and wild rice",
            "Almonds and a banana",
        ],
    );
    catalog.insert(
        MealStyle::GlutenFree,
        [
            "Eggs with sautéed spinach and roasted potatoes",
            "Chicken and rice bowl with vegetables",
            "Grass-fed steak with sweet potato and asparagus",
            "Greek yogurt with berries",
        ],
    );
    catalog.insert(
        MealStyle::SeafoodFree,
        [
            "Omelette with vegetables and whole-grain toast",
            "Turkey and avocado wrap with mixed greens",
            "Chicken thighs with quinoa and roasted vegetables",
            "Greek yogurt with walnuts",
        ],
    );
    catalog.insert(
        MealStyle::Performance,
        [
            "Oats with whey, banana and peanut butter",
            "Chicken, rice and vegetables",
            "Salmon with potatoes and greens",
            "Greek yogurt with honey and berries",
        ],
    );
    catalog.insert(
        MealStyle::EnduranceFuel,
        [
            "Oatmeal with berries, honey and eggs",
            "Whole-grain pasta with chicken and tomato sauce",
            "Rice bowl with salmon, vegetables and miso",
            "Banana with almond butter",
        ],
    );
    catalog.insert(
        MealStyle::Balanced,
        [
            "Eggs with avocado and sautéed greens",
            "Large salad with grilled chicken, olive oil and chickpeas",
            "Baked fish with roasted vegetables and quinoa",
            "Mixed nuts and berries",
        ],
    );
    catalog
});

fn mentions_any(entries: &[String], keywords: &[&str]) -> bool {
    entries.iter().any(|entry| {
        let lower = entry.to_lowercase();
        keywords.iter().any(|k| lower.contains(k))
    })
}

/// Decision tree: vegan, vegetarian, allergens, then training type
fn meal_style(request: &MealRequest) -> MealStyle {
    let restrictions = &request.dietary_restrictions;
    let avoid: Vec<String> = restrictions
        .iter()
        .chain(request.allergies.iter())
        .cloned()
        .collect();

    if mentions_any(restrictions, &["vegan"]) {
        MealStyle::Vegan
    } else if mentions_any(restrictions, &["vegetarian"]) {
        MealStyle::Vegetarian
    } else if mentions_any(&avoid, &["dairy", "milk", "lactose"]) {
        MealStyle::DairyFree
    } else if mentions_any(&avoid, &["gluten", "wheat", "celiac"]) {
        MealStyle::GlutenFree
    } else if mentions_any(&avoid, &["fish", "shellfish", "seafood"]) {
        MealStyle::SeafoodFree
    } else {
        match request.training_type {
            TrainingType::Strength | TrainingType::Hypertrophy => MealStyle::Performance,
            TrainingType::Endurance => MealStyle::EnduranceFuel,
            TrainingType::Mobility | TrainingType::Deload | TrainingType::Rest => {
                MealStyle::Balanced
            }
        }
    }
}

// ============================================================================
// Planner
// ============================================================================

/// Body weights outside this range are clamped before planning
const WEIGHT_RANGE_KG: (f64, f64) = (20.0, 350.0);

fn macro_calories(protein_g: u32, carbs_g: u32, fat_g: u32) -> u32 {
    protein_g
        .saturating_add(carbs_g)
        .saturating_mul(4)
        .saturating_add(fat_g.saturating_mul(9))
}

fn plausible_weight(weight_kg: f64) -> f64 {
    let clamped = weight_kg.clamp(WEIGHT_RANGE_KG.0, WEIGHT_RANGE_KG.1);
    if clamped != weight_kg && !weight_kg.is_nan() {
        tracing::warn!("Body weight {} kg clamped to {} kg", weight_kg, clamped);
    }
    clamped
}

fn round_grams(value: f64) -> u32 {
    value.max(0.0).round() as u32
}

/// Builds daily nutrition plans from a borrowed configuration
pub struct MealPlanner<'a> {
    config: &'a NutritionConfig,
}

impl<'a> MealPlanner<'a> {
    pub fn new(config: &'a NutritionConfig) -> Self {
        Self { config }
    }

    /// Basal metabolic rate and the formula that produced it
    pub fn bmr(&self, request: &MealRequest) -> (f64, &'static str) {
        let weight = plausible_weight(request.weight_kg);

        if let Some(body_fat) = request.body_fat_percent.filter(|bf| *bf > 0.0 && *bf < 100.0) {
            let lean_mass = weight * (1.0 - body_fat / 100.0);
            return (
                self.config.katch_base + self.config.katch_lean_factor * lean_mass,
                "Katch-McArdle",
            );
        }

        if let Some(a) = &request.anthropometrics {
            let sex_constant = match a.sex {
                Some(BiologicalSex::Male) => 5.0,
                Some(BiologicalSex::Female) => -161.0,
                None => -78.0,
            };
            return (
                MIFFLIN_WEIGHT * weight + MIFFLIN_HEIGHT * a.height_cm - MIFFLIN_AGE * a.age_years
                    + sex_constant,
                "Mifflin-St Jeor",
            );
        }

        (
            self.config.fallback_weight_factor * weight + self.config.fallback_base,
            "weight-only estimate",
        )
    }

    /// Produce the day's targets and meals
    pub fn plan(&self, request: &MealRequest) -> NutritionPlan {
        let cfg = self.config;
        let goal = Goal::primary(&request.goals);
        let target = cfg.goals.get(goal);
        let weight = plausible_weight(request.weight_kg);
        let mut notes = Vec::new();

        let (bmr, formula) = self.bmr(request);
        let activity = cfg.activity_multipliers.get(request.training_type);
        let energy_target = bmr * activity + target.calorie_offset;
        notes.push(format!(
            "BMR {:.0} kcal ({}) x {} activity for {} day, {:+.0} kcal for {}.",
            bmr, formula, activity, request.training_type, target.calorie_offset, goal
        ));

        let mut protein = round_grams(weight * target.protein_g_per_kg);
        let mut fat = round_grams(energy_target * target.fat_fraction / 9.0);
        let remaining = (energy_target - f64::from(protein) * 4.0 - f64::from(fat) * 9.0).max(0.0);
        let mut carbs =
            round_grams(remaining / 4.0 * cfg.carb_multipliers.get(request.training_type));

        tracing::debug!(
            "Energy target {:.0} kcal -> P{} C{} F{}",
            energy_target,
            protein,
            carbs,
            fat
        );

        let adjustments: Vec<String> = request
            .genetic_adjustments
            .iter()
            .map(|a| a.to_lowercase())
            .collect();

        if adjustments
            .iter()
            .any(|a| a.contains("fto") && a.contains("protein"))
        {
            let floor = round_grams(weight * cfg.fto_protein_floor_g_per_kg);
            if floor > protein {
                let delta = floor - protein;
                protein = floor;
                carbs = carbs.saturating_sub(delta).max(cfg.carb_floor_g.min(carbs));
                notes.push(format!(
                    "FTO variant: protein raised to {} g for satiety, carbohydrates reduced.",
                    protein
                ));
            }
        }

        if adjustments
            .iter()
            .any(|a| a.contains("apoe") && a.contains("sat"))
        {
            let cut = round_grams(f64::from(fat) * cfg.apoe_fat_reduction);
            fat -= cut;
            carbs = carbs.saturating_add(round_grams(f64::from(cut) * 9.0 / 4.0));
            notes.push(format!(
                "APOE variant: fat reduced by {} g, favor unsaturated sources.",
                cut
            ));
        }

        let tdee = macro_calories(protein, carbs, fat);
        let meals = self.distribute(request, tdee, protein, carbs, fat);

        tracing::info!(
            "Nutrition plan: {} kcal, P{} C{} F{}",
            tdee,
            protein,
            carbs,
            fat
        );

        NutritionPlan {
            tdee,
            protein_g: protein,
            carbs_g: carbs,
            fat_g: fat,
            meals,
            notes,
        }
    }

    /// Split the day's figures across meals, rounding each one independently
    fn distribute(
        &self,
        request: &MealRequest,
        tdee: u32,
        protein: u32,
        carbs: u32,
        fat: u32,
    ) -> Vec<MealPlan> {
        let style = meal_style(request);
        let descriptions = MEAL_CATALOG
            .get(&style)
            .copied()
            .unwrap_or(["", "", "", ""]);

        MealSlot::ALL
            .iter()
            .zip(descriptions)
            .map(|(slot, description)| {
                let share = self.config.meal_split.get(*slot);
                MealPlan {
                    slot: *slot,
                    description: description.to_string(),
                    calories: round_grams(f64::from(tdee) * share),
                    protein_g: round_grams(f64::from(protein) * share),
                    carbs_g: round_grams(f64::from(carbs) * share),
                    fat_g: round_grams(f64::from(fat) * share),
                }
            })
            .collect()
    }
}

/// Plan a day's nutrition with the given configuration
pub fn plan(request: &MealRequest, config: &NutritionConfig) -> NutritionPlan {
    MealPlanner::new(config).plan(request)
}
