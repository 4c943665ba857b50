//! Core domain types for the Outlive protocol engine.
//!
//! This module defines the fundamental records used throughout the pipeline:
//! - Goals, training types and recovery zones
//! - Input records (profile, genomics, bloodwork, wearable, body composition)
//! - Protocol building blocks (training, nutrition, supplements, interventions, sleep)
//! - The synthesized protocol aggregate

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Round to a fixed number of decimal places (half away from zero).
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Lowercase and drop everything that is not alphanumeric.
pub(crate) fn compact_key(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

// ============================================================================
// Goals and Tags
// ============================================================================

/// A user-selected health goal
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Goal {
    Longevity,
    MuscleGain,
    FatLoss,
    Endurance,
    Cognitive,
    Metabolic,
    Hormonal,
    Cardiovascular,
    SleepQuality,
    StressResilience,
}

impl Goal {
    pub const ALL: [Goal; 10] = [
        Goal::Longevity,
        Goal::MuscleGain,
        Goal::FatLoss,
        Goal::Endurance,
        Goal::Cognitive,
        Goal::Metabolic,
        Goal::Hormonal,
        Goal::Cardiovascular,
        Goal::SleepQuality,
        Goal::StressResilience,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::Longevity => "longevity",
            Goal::MuscleGain => "muscleGain",
            Goal::FatLoss => "fatLoss",
            Goal::Endurance => "endurance",
            Goal::Cognitive => "cognitive",
            Goal::Metabolic => "metabolic",
            Goal::Hormonal => "hormonal",
            Goal::Cardiovascular => "cardiovascular",
            Goal::SleepQuality => "sleepQuality",
            Goal::StressResilience => "stressResilience",
        }
    }

    /// First goal of the list, or longevity when none is selected.
    pub fn primary(goals: &[Goal]) -> Goal {
        goals.first().copied().unwrap_or(Goal::Longevity)
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Goal {
    type Err = crate::Error;

    /// Accepts camelCase, snake_case and kebab-case spellings.
    fn from_str(s: &str) -> crate::Result<Self> {
        let key = compact_key(s);
        Goal::ALL
            .iter()
            .copied()
            .find(|g| compact_key(g.as_str()) == key)
            .ok_or_else(|| crate::Error::Input(format!("Unknown goal: {}", s)))
    }
}

/// Type of training session
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TrainingType {
    Strength,
    Hypertrophy,
    Endurance,
    Mobility,
    Deload,
    Rest,
}

impl TrainingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrainingType::Strength => "strength",
            TrainingType::Hypertrophy => "hypertrophy",
            TrainingType::Endurance => "endurance",
            TrainingType::Mobility => "mobility",
            TrainingType::Deload => "deload",
            TrainingType::Rest => "rest",
        }
    }

    /// Strength and hypertrophy sessions
    pub fn is_high_intensity(&self) -> bool {
        matches!(self, TrainingType::Strength | TrainingType::Hypertrophy)
    }
}

impl fmt::Display for TrainingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recovery zone derived from wearable signals
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryZone {
    Green,
    Yellow,
    Red,
}

impl RecoveryZone {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecoveryZone::Green => "green",
            RecoveryZone::Yellow => "yellow",
            RecoveryZone::Red => "red",
        }
    }

    /// Ordinal where a larger value means worse recovery
    pub fn severity(&self) -> u8 {
        match self {
            RecoveryZone::Green => 0,
            RecoveryZone::Yellow => 1,
            RecoveryZone::Red => 2,
        }
    }
}

impl fmt::Display for RecoveryZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecoveryZone {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "green" => Ok(RecoveryZone::Green),
            "yellow" => Ok(RecoveryZone::Yellow),
            "red" => Ok(RecoveryZone::Red),
            other => Err(crate::Error::Input(format!("Unknown recovery zone: {}", other))),
        }
    }
}

// ============================================================================
// Bloodwork
// ============================================================================

/// Lab-assigned (or derived) status of a marker
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MarkerStatus {
    Critical,
    Suboptimal,
    Normal,
    Optimal,
}

impl MarkerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerStatus::Critical => "critical",
            MarkerStatus::Suboptimal => "suboptimal",
            MarkerStatus::Normal => "normal",
            MarkerStatus::Optimal => "optimal",
        }
    }

    /// Derive a status from where `value` falls relative to the ranges.
    ///
    /// Values outside the normal range by at most a quarter of the normal
    /// span are suboptimal; anything further out is critical.
    pub fn classify(value: f64, optimal: (f64, f64), normal: (f64, f64)) -> MarkerStatus {
        if value >= optimal.0 && value <= optimal.1 {
            return MarkerStatus::Optimal;
        }
        if value >= normal.0 && value <= normal.1 {
            return MarkerStatus::Normal;
        }
        let span = (normal.1 - normal.0).abs();
        let distance = if value < normal.0 {
            normal.0 - value
        } else {
            value - normal.1
        };
        if distance <= span * 0.25 {
            MarkerStatus::Suboptimal
        } else {
            MarkerStatus::Critical
        }
    }
}

impl fmt::Display for MarkerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarkerStatus {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "critical" => Ok(MarkerStatus::Critical),
            "suboptimal" => Ok(MarkerStatus::Suboptimal),
            "normal" => Ok(MarkerStatus::Normal),
            "optimal" => Ok(MarkerStatus::Optimal),
            other => Err(crate::Error::Input(format!("Unknown marker status: {}", other))),
        }
    }
}

/// A single blood marker reading
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BloodworkMarker {
    pub name: String,
    pub value: f64,
    pub unit: String,
    pub optimal_low: f64,
    pub optimal_high: f64,
    pub normal_low: f64,
    pub normal_high: f64,
    pub status: MarkerStatus,
}

impl BloodworkMarker {
    /// Midpoint of the optimal range
    pub fn optimal_midpoint(&self) -> f64 {
        (self.optimal_low + self.optimal_high) / 2.0
    }
}

// ============================================================================
// Genetics
// ============================================================================

/// The fixed set of genes the mapper understands
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum GeneticCategory {
    Apoe,
    Mthfr,
    Cyp1a2,
    Actn3,
    Fto,
    Vdr,
    Comt,
    Gstm1,
    Bcmo1,
    Slc23a1,
}

impl GeneticCategory {
    pub const ALL: [GeneticCategory; 10] = [
        GeneticCategory::Apoe,
        GeneticCategory::Mthfr,
        GeneticCategory::Cyp1a2,
        GeneticCategory::Actn3,
        GeneticCategory::Fto,
        GeneticCategory::Vdr,
        GeneticCategory::Comt,
        GeneticCategory::Gstm1,
        GeneticCategory::Bcmo1,
        GeneticCategory::Slc23a1,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GeneticCategory::Apoe => "APOE",
            GeneticCategory::Mthfr => "MTHFR",
            GeneticCategory::Cyp1a2 => "CYP1A2",
            GeneticCategory::Actn3 => "ACTN3",
            GeneticCategory::Fto => "FTO",
            GeneticCategory::Vdr => "VDR",
            GeneticCategory::Comt => "COMT",
            GeneticCategory::Gstm1 => "GSTM1",
            GeneticCategory::Bcmo1 => "BCMO1",
            GeneticCategory::Slc23a1 => "SLC23A1",
        }
    }
}

impl fmt::Display for GeneticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification tier of an observed genotype
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GenotypeTier {
    HomozygousRisk,
    Heterozygous,
    WildType,
}

impl GenotypeTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenotypeTier::HomozygousRisk => "homozygous risk",
            GenotypeTier::Heterozygous => "heterozygous",
            GenotypeTier::WildType => "wild type",
        }
    }
}

/// A genotype record supplied by the genome-parsing collaborator
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GeneticRisk {
    pub category: GeneticCategory,
    pub genotype: String,
    pub risk_level: f64,
    #[serde(default)]
    pub implications: String,
}

/// Per-category recommendations derived from a genotype
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GeneticRiskAssessment {
    pub category: GeneticCategory,
    pub tier: GenotypeTier,
    pub risk_level: f64,
    pub dietary_adjustments: Vec<String>,
    pub supplement_adjustments: Vec<String>,
    pub training_adjustments: Vec<String>,
}

// ============================================================================
// Recovery
// ============================================================================

/// Outcome of the wearable-signal recovery assessment
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RecoveryAssessment {
    pub zone: RecoveryZone,
    pub confidence: f64,
    pub training_intensity_modifier: f64,
    pub recommendations: Vec<String>,
    /// Weighted composite score; `None` when no signal was present
    pub composite_score: Option<f64>,
    pub signal_count: usize,
}

// ============================================================================
// Protocol Building Blocks
// ============================================================================

/// A single exercise prescription
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Exercise {
    pub name: String,
    pub sets: u32,
    pub reps: String,
}

impl Exercise {
    pub fn new(name: &str, sets: u32, reps: &str) -> Self {
        Self {
            name: name.to_string(),
            sets,
            reps: reps.to_string(),
        }
    }
}

/// The day's training session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TrainingBlock {
    pub training_type: TrainingType,
    pub exercises: Vec<Exercise>,
    pub duration_minutes: u32,
    pub rpe_target: f64,
    pub notes: Option<String>,
}

impl TrainingBlock {
    /// Append a note, joining with any existing one
    pub fn push_note(&mut self, note: &str) {
        self.notes = Some(match self.notes.take() {
            Some(existing) if !existing.is_empty() => format!("{} {}", existing, note),
            _ => note.to_string(),
        });
    }
}

/// Meal slot within a day
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealSlot {
    pub const ALL: [MealSlot; 4] = [
        MealSlot::Breakfast,
        MealSlot::Lunch,
        MealSlot::Dinner,
        MealSlot::Snack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
            MealSlot::Snack => "snack",
        }
    }
}

/// One meal with its share of the day's targets
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MealPlan {
    pub slot: MealSlot,
    pub description: String,
    pub calories: u32,
    pub protein_g: u32,
    pub carbs_g: u32,
    pub fat_g: u32,
}

/// Daily energy and macro targets
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NutritionPlan {
    pub tdee: u32,
    pub protein_g: u32,
    pub carbs_g: u32,
    pub fat_g: u32,
    pub meals: Vec<MealPlan>,
    pub notes: Vec<String>,
}

impl NutritionPlan {
    /// Energy implied by the macro grams
    pub fn macro_calories(&self) -> u32 {
        self.protein_g
            .saturating_add(self.carbs_g)
            .saturating_mul(4)
            .saturating_add(self.fat_g.saturating_mul(9))
    }
}

/// When a supplement should be taken
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SupplementTiming {
    Morning,
    WithBreakfast,
    WithLunch,
    WithDinner,
    Evening,
    Bedtime,
    PreWorkout,
    PostWorkout,
}

impl SupplementTiming {
    pub fn as_str(&self) -> &'static str {
        match self {
            SupplementTiming::Morning => "morning",
            SupplementTiming::WithBreakfast => "with breakfast",
            SupplementTiming::WithLunch => "with lunch",
            SupplementTiming::WithDinner => "with dinner",
            SupplementTiming::Evening => "evening",
            SupplementTiming::Bedtime => "bedtime",
            SupplementTiming::PreWorkout => "pre-workout",
            SupplementTiming::PostWorkout => "post-workout",
        }
    }

    /// The slot on the other side of the day, used to separate interacting supplements
    pub fn opposite(&self) -> SupplementTiming {
        match self {
            SupplementTiming::Morning => SupplementTiming::Evening,
            SupplementTiming::WithBreakfast => SupplementTiming::WithDinner,
            SupplementTiming::WithLunch => SupplementTiming::WithDinner,
            SupplementTiming::WithDinner => SupplementTiming::WithBreakfast,
            SupplementTiming::Evening => SupplementTiming::Morning,
            SupplementTiming::Bedtime => SupplementTiming::Morning,
            SupplementTiming::PreWorkout => SupplementTiming::Evening,
            SupplementTiming::PostWorkout => SupplementTiming::Evening,
        }
    }
}

impl fmt::Display for SupplementTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A supplement entry in the day's stack
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SupplementDose {
    pub name: String,
    pub dose: String,
    pub timing: SupplementTiming,
    pub rationale: String,
    /// Set by the consumer once taken; always false when generated
    #[serde(default)]
    pub taken: bool,
}

impl SupplementDose {
    pub fn new(name: &str, dose: &str, timing: SupplementTiming, rationale: &str) -> Self {
        Self {
            name: name.to_string(),
            dose: dose.to_string(),
            timing,
            rationale: rationale.to_string(),
            taken: false,
        }
    }
}

/// Kind of non-training recovery intervention
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InterventionType {
    SunlightExposure,
    ColdExposure,
    Sauna,
    Breathwork,
    Meditation,
    Nsdr,
}

impl InterventionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterventionType::SunlightExposure => "morning sunlight",
            InterventionType::ColdExposure => "cold exposure",
            InterventionType::Sauna => "sauna",
            InterventionType::Breathwork => "breathwork",
            InterventionType::Meditation => "meditation",
            InterventionType::Nsdr => "NSDR",
        }
    }
}

impl fmt::Display for InterventionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scheduled intervention
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct InterventionBlock {
    pub intervention_type: InterventionType,
    pub duration_minutes: u32,
    pub temperature_c: Option<f64>,
    pub notes: Option<String>,
}

/// Evening and sleep guidance
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SleepProtocol {
    pub target_bedtime: String,
    pub target_wake_time: String,
    pub target_hours: f64,
    pub evening_checklist: Vec<String>,
    pub notes: Vec<String>,
}

/// A contradiction found and resolved by the conflict resolver
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ConflictNote {
    pub description: String,
    pub resolution: String,
    pub priority: u8,
}

// ============================================================================
// Inputs
// ============================================================================

/// Biological sex, used only for the Mifflin-St Jeor constant
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BiologicalSex {
    Male,
    Female,
}

/// User profile and preferences
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct UserProfileInput {
    #[serde(default)]
    pub goals: Vec<Goal>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    #[serde(default)]
    pub biological_sex: Option<BiologicalSex>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub height_cm: Option<f64>,
}

/// Genotype records from the genome-parsing collaborator
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct GenomicsInput {
    #[serde(default)]
    pub risks: Vec<GeneticRisk>,
}

/// A bloodwork panel, optionally with the previous panel for trends
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BloodworkInput {
    pub markers: Vec<BloodworkMarker>,
    pub lab_date: NaiveDate,
    #[serde(default)]
    pub previous_markers: Option<Vec<BloodworkMarker>>,
}

/// Wearable signals for the reference date; every field is optional
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct WearableInput {
    #[serde(default)]
    pub hrv_ms: Option<f64>,
    #[serde(default)]
    pub resting_hr: Option<f64>,
    #[serde(default)]
    pub sleep_hours: Option<f64>,
    #[serde(default)]
    pub deep_sleep_minutes: Option<f64>,
    #[serde(default)]
    pub rem_sleep_minutes: Option<f64>,
    #[serde(default)]
    pub recovery_score: Option<f64>,
    #[serde(default)]
    pub strain: Option<f64>,
}

/// Body-composition measurement
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BodyCompInput {
    pub weight_kg: f64,
    #[serde(default)]
    pub body_fat_percent: Option<f64>,
    #[serde(default)]
    pub muscle_mass_kg: Option<f64>,
}

/// Everything one synthesis call consumes, apart from the reference date
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
pub struct SynthesisInput {
    #[serde(default)]
    pub profile: UserProfileInput,
    #[serde(default)]
    pub genomics: Option<GenomicsInput>,
    #[serde(default)]
    pub bloodwork: Option<BloodworkInput>,
    #[serde(default)]
    pub wearable: Option<WearableInput>,
    #[serde(default)]
    pub body_comp: Option<BodyCompInput>,
}

// ============================================================================
// Output
// ============================================================================

/// The day's complete protocol
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SynthesizedProtocol {
    pub date: NaiveDate,
    /// ISO weekday number, Monday = 1 ... Sunday = 7
    pub day_of_week: u8,
    pub recovery_zone: RecoveryZone,
    pub recovery: RecoveryAssessment,
    pub weekly_plan: crate::circaseptan::WeeklyPlan,
    pub training: TrainingBlock,
    pub nutrition: NutritionPlan,
    pub supplements: Vec<SupplementDose>,
    pub interventions: Vec<InterventionBlock>,
    pub sleep: SleepProtocol,
    pub conflicts: Vec<ConflictNote>,
    pub insights: Vec<String>,
    pub priorities: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_parsing_accepts_spellings() {
        assert_eq!("muscleGain".parse::<Goal>().unwrap(), Goal::MuscleGain);
        assert_eq!("muscle_gain".parse::<Goal>().unwrap(), Goal::MuscleGain);
        assert_eq!("FAT-LOSS".parse::<Goal>().unwrap(), Goal::FatLoss);
        assert!("bulk".parse::<Goal>().is_err());
    }

    #[test]
    fn test_goal_serde_tags() {
        let json = serde_json::to_string(&Goal::StressResilience).unwrap();
        assert_eq!(json, "\"stressResilience\"");
        let goal: Goal = serde_json::from_str("\"fatLoss\"").unwrap();
        assert_eq!(goal, Goal::FatLoss);
    }

    #[test]
    fn test_primary_goal_defaults_to_longevity() {
        assert_eq!(Goal::primary(&[]), Goal::Longevity);
        assert_eq!(
            Goal::primary(&[Goal::Endurance, Goal::MuscleGain]),
            Goal::Endurance
        );
    }

    #[test]
    fn test_genetic_category_serde_uppercase() {
        let json = serde_json::to_string(&GeneticCategory::Slc23a1).unwrap();
        assert_eq!(json, "\"SLC23A1\"");
    }

    #[test]
    fn test_marker_status_classification() {
        let optimal = (60.0, 80.0);
        let normal = (30.0, 100.0);
        assert_eq!(MarkerStatus::classify(70.0, optimal, normal), MarkerStatus::Optimal);
        assert_eq!(MarkerStatus::classify(45.0, optimal, normal), MarkerStatus::Normal);
        // span 70, quarter = 17.5
        assert_eq!(MarkerStatus::classify(20.0, optimal, normal), MarkerStatus::Suboptimal);
        assert_eq!(MarkerStatus::classify(10.0, optimal, normal), MarkerStatus::Critical);
        assert_eq!(MarkerStatus::classify(130.0, optimal, normal), MarkerStatus::Critical);
    }

    #[test]
    fn test_timing_opposite_swaps_meals() {
        assert_eq!(
            SupplementTiming::WithBreakfast.opposite(),
            SupplementTiming::WithDinner
        );
        assert_eq!(
            SupplementTiming::WithDinner.opposite(),
            SupplementTiming::WithBreakfast
        );
        assert_eq!(SupplementTiming::Morning.opposite(), SupplementTiming::Evening);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.666_666, 2), 0.67);
        assert_eq!(round_to(12.34, 1), 12.3);
        assert_eq!(round_to(-4.25, 1), -4.3);
    }

    #[test]
    fn test_push_note_joins() {
        let mut block = TrainingBlock {
            training_type: TrainingType::Strength,
            exercises: vec![],
            duration_minutes: 60,
            rpe_target: 8.0,
            notes: None,
        };
        block.push_note("First.");
        block.push_note("Second.");
        assert_eq!(block.notes.as_deref(), Some("First. Second."));
    }
}
