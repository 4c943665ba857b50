//! Configuration file support for Outlive.
//!
//! Every tunable constant of the pipeline (baselines, weights, zone
//! thresholds, per-goal macro targets) lives here. Configuration is loaded
//! from `$XDG_CONFIG_HOME/outlive/config.toml`; anything missing falls back
//! to the built-in defaults. Each engine borrows its own section.

use crate::{Error, Goal, Result, TrainingType};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub recovery: RecoveryConfig,

    #[serde(default)]
    pub nutrition: NutritionConfig,

    #[serde(default)]
    pub biomarkers: BiomarkerConfig,

    #[serde(default)]
    pub genetics: GeneticsConfig,

    #[serde(default)]
    pub conflicts: ConflictConfig,

    #[serde(default)]
    pub synthesis: SynthesisConfig,
}

// ============================================================================
// Recovery
// ============================================================================

/// Importance weight of each wearable signal
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SignalWeights {
    pub hrv: f64,
    pub resting_hr: f64,
    pub sleep_duration: f64,
    pub deep_sleep: f64,
    pub recovery_score: f64,
    pub strain: f64,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            hrv: 0.30,
            resting_hr: 0.15,
            sleep_duration: 0.20,
            deep_sleep: 0.10,
            recovery_score: 0.15,
            strain: 0.10,
        }
    }
}

impl SignalWeights {
    fn as_array(&self) -> [f64; 6] {
        [
            self.hrv,
            self.resting_hr,
            self.sleep_duration,
            self.deep_sleep,
            self.recovery_score,
            self.strain,
        ]
    }
}

/// Recovery adaptor parameters
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecoveryConfig {
    pub hrv_baseline_ms: f64,
    pub resting_hr_baseline: f64,
    /// Upper end of the strain scale (WHOOP uses 0-21)
    pub strain_max: f64,
    pub weights: SignalWeights,
    pub green_threshold: f64,
    pub red_threshold: f64,
    pub yellow_base_reduction: f64,
    pub yellow_max_additional_reduction: f64,
    pub yellow_modifier_floor: f64,
    pub neutral_modifier: f64,
    /// Signal scores below this trigger a signal-specific recommendation
    pub weak_signal_threshold: f64,
    /// Fewer present signals than this adds a low-confidence warning
    pub min_confident_signals: usize,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            hrv_baseline_ms: 55.0,
            resting_hr_baseline: 62.0,
            strain_max: 21.0,
            weights: SignalWeights::default(),
            green_threshold: 0.65,
            red_threshold: 0.35,
            yellow_base_reduction: 0.2,
            yellow_max_additional_reduction: 0.4,
            yellow_modifier_floor: 0.6,
            neutral_modifier: 0.7,
            weak_signal_threshold: 0.4,
            min_confident_signals: 3,
        }
    }
}

// ============================================================================
// Nutrition
// ============================================================================

/// A value per training type
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TrainingTable {
    pub strength: f64,
    pub hypertrophy: f64,
    pub endurance: f64,
    pub mobility: f64,
    pub deload: f64,
    pub rest: f64,
}

impl TrainingTable {
    const ACTIVITY: TrainingTable = TrainingTable {
        strength: 1.55,
        hypertrophy: 1.60,
        endurance: 1.65,
        mobility: 1.375,
        deload: 1.30,
        rest: 1.20,
    };

    const CARBS: TrainingTable = TrainingTable {
        strength: 1.0,
        hypertrophy: 1.05,
        endurance: 1.15,
        mobility: 0.90,
        deload: 0.90,
        rest: 0.85,
    };

    pub fn get(&self, training_type: TrainingType) -> f64 {
        match training_type {
            TrainingType::Strength => self.strength,
            TrainingType::Hypertrophy => self.hypertrophy,
            TrainingType::Endurance => self.endurance,
            TrainingType::Mobility => self.mobility,
            TrainingType::Deload => self.deload,
            TrainingType::Rest => self.rest,
        }
    }

    fn values(&self) -> [f64; 6] {
        [
            self.strength,
            self.hypertrophy,
            self.endurance,
            self.mobility,
            self.deload,
            self.rest,
        ]
    }
}

/// A `TrainingTable` as written in the file; missing entries keep their default
#[derive(Deserialize)]
struct TrainingTableOverride {
    strength: Option<f64>,
    hypertrophy: Option<f64>,
    endurance: Option<f64>,
    mobility: Option<f64>,
    deload: Option<f64>,
    rest: Option<f64>,
}

impl TrainingTableOverride {
    fn apply(self, base: TrainingTable) -> TrainingTable {
        TrainingTable {
            strength: self.strength.unwrap_or(base.strength),
            hypertrophy: self.hypertrophy.unwrap_or(base.hypertrophy),
            endurance: self.endurance.unwrap_or(base.endurance),
            mobility: self.mobility.unwrap_or(base.mobility),
            deload: self.deload.unwrap_or(base.deload),
            rest: self.rest.unwrap_or(base.rest),
        }
    }
}

fn activity_table<'de, D>(deserializer: D) -> std::result::Result<TrainingTable, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(TrainingTableOverride::deserialize(deserializer)?.apply(TrainingTable::ACTIVITY))
}

fn carb_table<'de, D>(deserializer: D) -> std::result::Result<TrainingTable, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(TrainingTableOverride::deserialize(deserializer)?.apply(TrainingTable::CARBS))
}

/// Energy and macro targets for one goal
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GoalTarget {
    pub calorie_offset: f64,
    pub protein_g_per_kg: f64,
    pub fat_fraction: f64,
}

impl GoalTarget {
    const fn new(calorie_offset: f64, protein_g_per_kg: f64, fat_fraction: f64) -> Self {
        Self {
            calorie_offset,
            protein_g_per_kg,
            fat_fraction,
        }
    }
}

/// A `GoalTarget` as written in the file
#[derive(Debug, Deserialize)]
pub struct GoalTargetOverride {
    pub calorie_offset: Option<f64>,
    pub protein_g_per_kg: Option<f64>,
    pub fat_fraction: Option<f64>,
}

/// Macro targets keyed by goal
///
/// Goals and fields left out of the file keep their defaults.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "BTreeMap<String, GoalTargetOverride>")]
pub struct GoalTargets {
    pub longevity: GoalTarget,
    pub muscle_gain: GoalTarget,
    pub fat_loss: GoalTarget,
    pub endurance: GoalTarget,
    pub cognitive: GoalTarget,
    pub metabolic: GoalTarget,
    pub hormonal: GoalTarget,
    pub cardiovascular: GoalTarget,
    pub sleep_quality: GoalTarget,
    pub stress_resilience: GoalTarget,
}

impl Default for GoalTargets {
    fn default() -> Self {
        Self {
            longevity: GoalTarget::new(0.0, 1.8, 0.30),
            muscle_gain: GoalTarget::new(300.0, 2.2, 0.28),
            fat_loss: GoalTarget::new(-400.0, 2.4, 0.30),
            endurance: GoalTarget::new(0.0, 1.6, 0.25),
            cognitive: GoalTarget::new(0.0, 1.8, 0.35),
            metabolic: GoalTarget::new(-100.0, 2.0, 0.35),
            hormonal: GoalTarget::new(100.0, 1.8, 0.35),
            cardiovascular: GoalTarget::new(0.0, 1.8, 0.25),
            sleep_quality: GoalTarget::new(0.0, 1.8, 0.30),
            stress_resilience: GoalTarget::new(0.0, 1.8, 0.30),
        }
    }
}

impl TryFrom<BTreeMap<String, GoalTargetOverride>> for GoalTargets {
    type Error = String;

    fn try_from(
        overrides: BTreeMap<String, GoalTargetOverride>,
    ) -> std::result::Result<Self, Self::Error> {
        let mut targets = GoalTargets::default();
        for (key, patch) in overrides {
            let goal = key
                .parse::<Goal>()
                .map_err(|_| format!("unknown goal '{}' in nutrition.goals", key))?;
            let target = targets.get_mut(goal);
            target.calorie_offset = patch.calorie_offset.unwrap_or(target.calorie_offset);
            target.protein_g_per_kg = patch.protein_g_per_kg.unwrap_or(target.protein_g_per_kg);
            target.fat_fraction = patch.fat_fraction.unwrap_or(target.fat_fraction);
        }
        Ok(targets)
    }
}

impl GoalTargets {
    fn get_mut(&mut self, goal: Goal) -> &mut GoalTarget {
        match goal {
            Goal::Longevity => &mut self.longevity,
            Goal::MuscleGain => &mut self.muscle_gain,
            Goal::FatLoss => &mut self.fat_loss,
            Goal::Endurance => &mut self.endurance,
            Goal::Cognitive => &mut self.cognitive,
            Goal::Metabolic => &mut self.metabolic,
            Goal::Hormonal => &mut self.hormonal,
            Goal::Cardiovascular => &mut self.cardiovascular,
            Goal::SleepQuality => &mut self.sleep_quality,
            Goal::StressResilience => &mut self.stress_resilience,
        }
    }

    pub fn get(&self, goal: Goal) -> &GoalTarget {
        match goal {
            Goal::Longevity => &self.longevity,
            Goal::MuscleGain => &self.muscle_gain,
            Goal::FatLoss => &self.fat_loss,
            Goal::Endurance => &self.endurance,
            Goal::Cognitive => &self.cognitive,
            Goal::Metabolic => &self.metabolic,
            Goal::Hormonal => &self.hormonal,
            Goal::Cardiovascular => &self.cardiovascular,
            Goal::SleepQuality => &self.sleep_quality,
            Goal::StressResilience => &self.stress_resilience,
        }
    }
}

/// Share of the day's figures assigned to each meal
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MealSplit {
    pub breakfast: f64,
    pub lunch: f64,
    pub dinner: f64,
    pub snack: f64,
}

impl Default for MealSplit {
    fn default() -> Self {
        Self {
            breakfast: 0.25,
            lunch: 0.30,
            dinner: 0.30,
            snack: 0.15,
        }
    }
}

impl MealSplit {
    pub fn get(&self, slot: crate::MealSlot) -> f64 {
        match slot {
            crate::MealSlot::Breakfast => self.breakfast,
            crate::MealSlot::Lunch => self.lunch,
            crate::MealSlot::Dinner => self.dinner,
            crate::MealSlot::Snack => self.snack,
        }
    }
}

/// Meal planner parameters
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NutritionConfig {
    pub katch_base: f64,
    pub katch_lean_factor: f64,
    pub fallback_weight_factor: f64,
    pub fallback_base: f64,
    #[serde(deserialize_with = "activity_table")]
    pub activity_multipliers: TrainingTable,
    #[serde(deserialize_with = "carb_table")]
    pub carb_multipliers: TrainingTable,
    pub goals: GoalTargets,
    pub fto_protein_floor_g_per_kg: f64,
    pub carb_floor_g: u32,
    pub apoe_fat_reduction: f64,
    pub meal_split: MealSplit,
}

impl Default for NutritionConfig {
    fn default() -> Self {
        Self {
            katch_base: 370.0,
            katch_lean_factor: 21.6,
            fallback_weight_factor: 10.0,
            fallback_base: 800.0,
            activity_multipliers: TrainingTable::ACTIVITY,
            carb_multipliers: TrainingTable::CARBS,
            goals: GoalTargets::default(),
            fto_protein_floor_g_per_kg: 2.2,
            carb_floor_g: 50,
            apoe_fat_reduction: 0.10,
            meal_split: MealSplit::default(),
        }
    }
}

// ============================================================================
// Biomarkers, Genetics, Conflicts, Synthesis
// ============================================================================

/// Bloodwork trend parameters
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BiomarkerConfig {
    /// Changes within this many percent are stable
    pub trend_stable_band_percent: f64,
    /// Moves larger than this away from an optimal value count as declining
    pub trend_optimal_drift_percent: f64,
}

impl Default for BiomarkerConfig {
    fn default() -> Self {
        Self {
            trend_stable_band_percent: 3.0,
            trend_optimal_drift_percent: 5.0,
        }
    }
}

/// Genetic mapper parameters
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GeneticsConfig {
    /// Assessments at or above this level count as high risk
    #[serde(default = "default_high_risk_threshold")]
    pub high_risk_threshold: f64,
}

impl Default for GeneticsConfig {
    fn default() -> Self {
        Self {
            high_risk_threshold: default_high_risk_threshold(),
        }
    }
}

/// Conflict resolver parameters
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConflictConfig {
    /// Yellow-zone sessions above this RPE are downgraded
    pub yellow_rpe_ceiling: f64,
    pub deload_rpe_cap: f64,
    /// Strength sessions at or above this RPE count as heavy
    pub heavy_strength_rpe: f64,
}

impl Default for ConflictConfig {
    fn default() -> Self {
        Self {
            yellow_rpe_ceiling: 7.0,
            deload_rpe_cap: 6.0,
            heavy_strength_rpe: 7.0,
        }
    }
}

/// Synthesizer parameters
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Used when no body composition record is supplied
    pub reference_weight_kg: f64,
    /// "HH:MM"
    pub wake_time: String,
    pub sleep_hours_green: f64,
    pub sleep_hours_yellow: f64,
    pub sleep_hours_red: f64,
    /// Minimum sleep target when sleep quality is a goal
    pub sleep_quality_min_hours: f64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            reference_weight_kg: 75.0,
            wake_time: "06:30".into(),
            sleep_hours_green: 8.0,
            sleep_hours_yellow: 8.0,
            sleep_hours_red: 8.5,
            sleep_quality_min_hours: 8.5,
        }
    }
}

const MIN_SLEEP_HOURS: f64 = 4.0;
const MAX_SLEEP_HOURS: f64 = 12.0;

fn default_high_risk_threshold() -> f64 {
    0.5
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);

        let problems = config.validate();
        if !problems.is_empty() {
            return Err(Error::Config(problems.join("; ")));
        }
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config")
        });
        base.join("outlive").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Check the configuration for values the engines cannot work with
    ///
    /// Returns a list of human-readable problems (empty if valid).
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let weights = self.recovery.weights.as_array();
        if weights.iter().any(|w| *w < 0.0) {
            errors.push("recovery.weights: weights must not be negative".to_string());
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            errors.push("recovery.weights: at least one weight must be positive".to_string());
        }
        if self.recovery.red_threshold >= self.recovery.green_threshold {
            errors.push(format!(
                "recovery: red_threshold {} must be below green_threshold {}",
                self.recovery.red_threshold, self.recovery.green_threshold
            ));
        }
        if self.recovery.hrv_baseline_ms <= 0.0 {
            errors.push("recovery.hrv_baseline_ms must be positive".to_string());
        }
        if self.recovery.strain_max <= 0.0 {
            errors.push("recovery.strain_max must be positive".to_string());
        }

        let split = &self.nutrition.meal_split;
        let total = split.breakfast + split.lunch + split.dinner + split.snack;
        if (total - 1.0).abs() > 1e-6 {
            errors.push(format!("nutrition.meal_split sums to {} instead of 1.0", total));
        }
        for (label, table) in [
            ("activity_multipliers", &self.nutrition.activity_multipliers),
            ("carb_multipliers", &self.nutrition.carb_multipliers),
        ] {
            if table.values().iter().any(|v| *v <= 0.0) {
                errors.push(format!("nutrition.{}: multipliers must be positive", label));
            }
        }
        for goal in Goal::ALL {
            let target = self.nutrition.goals.get(goal);
            if !(0.0..1.0).contains(&target.fat_fraction) {
                errors.push(format!(
                    "nutrition.goals.{}: fat_fraction {} outside [0, 1)",
                    goal, target.fat_fraction
                ));
            }
        }

        if !(0.0..=1.0).contains(&self.genetics.high_risk_threshold) {
            errors.push(format!(
                "genetics.high_risk_threshold {} outside [0, 1]",
                self.genetics.high_risk_threshold
            ));
        }

        let bio = &self.biomarkers;
        if !(bio.trend_stable_band_percent >= 0.0 && bio.trend_optimal_drift_percent >= 0.0) {
            errors.push("biomarkers: trend percentages must be non-negative".to_string());
        }

        let synthesis = &self.synthesis;
        for (label, hours) in [
            ("sleep_hours_green", synthesis.sleep_hours_green),
            ("sleep_hours_yellow", synthesis.sleep_hours_yellow),
            ("sleep_hours_red", synthesis.sleep_hours_red),
            ("sleep_quality_min_hours", synthesis.sleep_quality_min_hours),
        ] {
            if !(MIN_SLEEP_HOURS..=MAX_SLEEP_HOURS).contains(&hours) {
                errors.push(format!(
                    "synthesis.{} {} outside [{}, {}]",
                    label, hours, MIN_SLEEP_HOURS, MAX_SLEEP_HOURS
                ));
            }
        }

        if chrono::NaiveTime::parse_from_str(&self.synthesis.wake_time, "%H:%M").is_err() {
            errors.push(format!(
                "synthesis.wake_time '{}' is not HH:MM",
                self.synthesis.wake_time
            ));
        }

        errors
    }
}
