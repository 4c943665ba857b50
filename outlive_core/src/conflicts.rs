//! Reconciles the draft protocol against a fixed priority hierarchy.
//!
//! Tiers run in order and each may change the working state:
//! 1. Allergies (a supplement the user reacts to is always removed)
//! 2. Recovery zone (training is capped or replaced)
//! 3. Genetics (caffeine, folate form, stimulants, warm-up)
//! 4. Supplement interactions (iron/calcium timing, zinc/copper balance)
//! 5. Duplicate supplements
//!
//! Every change is recorded as a [`ConflictNote`] carrying its tier number.

use crate::config::{ConflictConfig, GeneticsConfig};
use crate::genetics::{category_is_high_risk, RiskMap};
use crate::{
    ConflictNote, Exercise, GeneticCategory, NutritionPlan, RecoveryZone, SupplementDose,
    TrainingBlock, TrainingType,
};
use std::collections::HashSet;

const PRIORITY_ALLERGY: u8 = 1;
const PRIORITY_RECOVERY: u8 = 2;
const PRIORITY_GENETICS: u8 = 3;
const PRIORITY_INTERACTION: u8 = 4;
const PRIORITY_DUPLICATE: u8 = 5;

/// Checked in order, so "pre-workout" is reported before a bare "caffeine"
const CAFFEINE_KEYWORDS: [&str; 3] = ["pre-workout", "caffeine", "green tea"];
const STIMULANT_KEYWORDS: [&str; 5] = ["pre-workout", "caffeine", "synephrine", "yohimbine", "guarana"];

/// The protocol after every tier has been applied
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedProtocol {
    pub training: Option<TrainingBlock>,
    pub nutrition: Option<NutritionPlan>,
    pub supplements: Vec<SupplementDose>,
    /// Sorted ascending by priority
    pub notes: Vec<ConflictNote>,
}

fn note(priority: u8, description: String, resolution: String) -> ConflictNote {
    ConflictNote {
        description,
        resolution,
        priority,
    }
}

/// Ingredients implied by an allergen beyond its own name
fn allergen_ingredients(allergen: &str) -> &'static [&'static str] {
    if allergen.contains("fish") || allergen.contains("seafood") {
        &["omega", "fish oil", "krill"]
    } else if allergen.contains("soy") {
        &["phosphatidyl", "lecithin"]
    } else if allergen.contains("dairy") || allergen.contains("milk") || allergen.contains("lactose") {
        &["whey", "casein"]
    } else {
        &[]
    }
}

/// The allergen a supplement conflicts with, if any
fn allergen_match(supplement: &SupplementDose, allergies: &[String]) -> Option<String> {
    let text = format!("{} {}", supplement.name, supplement.rationale).to_lowercase();

    allergies
        .iter()
        .map(|a| a.trim().to_lowercase())
        .filter(|a| !a.is_empty())
        .find(|allergen| {
            text.contains(allergen.as_str())
                || allergen_ingredients(allergen)
                    .iter()
                    .any(|ingredient| text.contains(ingredient))
        })
}

fn name_contains(supplement: &SupplementDose, keyword: &str) -> bool {
    supplement.name.to_lowercase().contains(keyword)
}

fn rest_block() -> TrainingBlock {
    TrainingBlock {
        training_type: TrainingType::Rest,
        exercises: vec![
            Exercise::new("Easy walk", 1, "20 min"),
            Exercise::new("Diaphragmatic breathing", 1, "5 min"),
            Exercise::new("Light stretching", 1, "10 min"),
        ],
        duration_minutes: 20,
        rpe_target: 2.0,
        notes: Some("Recovery is poor today: keep movement easy and conversational.".into()),
    }
}

/// Applies the five tiers with the configured thresholds
pub struct ConflictResolver<'a> {
    config: &'a ConflictConfig,
    genetics: &'a GeneticsConfig,
}

/// Mutable state threaded through the tiers
struct WorkingState<'s> {
    training: Option<TrainingBlock>,
    supplements: Vec<SupplementDose>,
    notes: Vec<ConflictNote>,
    allergies: &'s [String],
}

impl<'a> ConflictResolver<'a> {
    pub fn new(config: &'a ConflictConfig, genetics: &'a GeneticsConfig) -> Self {
        Self { config, genetics }
    }

    /// Run every tier and return the reconciled protocol
    pub fn resolve(
        &self,
        training: Option<TrainingBlock>,
        nutrition: Option<NutritionPlan>,
        supplements: Vec<SupplementDose>,
        genetic_risks: &RiskMap,
        zone: RecoveryZone,
        allergies: &[String],
    ) -> ResolvedProtocol {
        let mut state = WorkingState {
            training,
            supplements,
            notes: Vec::new(),
            allergies,
        };

        self.resolve_allergies(&mut state);
        self.resolve_recovery(&mut state, zone);
        self.resolve_genetics(&mut state, genetic_risks);
        self.resolve_interactions(&mut state);
        self.resolve_duplicates(&mut state);

        state.notes.sort_by_key(|n| n.priority);

        tracing::info!(
            "Resolved {} conflicts, {} supplements remain",
            state.notes.len(),
            state.supplements.len()
        );

        ResolvedProtocol {
            training: state.training,
            nutrition,
            supplements: state.supplements,
            notes: state.notes,
        }
    }

    fn resolve_allergies(&self, state: &mut WorkingState<'_>) {
        let allergies = state.allergies;
        let mut kept = Vec::with_capacity(state.supplements.len());

        for supplement in std::mem::take(&mut state.supplements) {
            match allergen_match(&supplement, allergies) {
                Some(allergen) => {
                    tracing::debug!("Removing {} (allergy: {})", supplement.name, allergen);
                    state.notes.push(note(
                        PRIORITY_ALLERGY,
                        format!("{} conflicts with {} allergy", supplement.name, allergen),
                        format!("Removed {} from the stack", supplement.name),
                    ));
                }
                None => kept.push(supplement),
            }
        }
        state.supplements = kept;
    }

    fn resolve_recovery(&self, state: &mut WorkingState<'_>, zone: RecoveryZone) {
        let Some(training) = state.training.as_mut() else {
            return;
        };

        match zone {
            RecoveryZone::Green => {}
            RecoveryZone::Yellow => {
                if training.training_type.is_high_intensity()
                    && training.rpe_target > self.config.yellow_rpe_ceiling
                {
                    let original = training.training_type;
                    let original_rpe = training.rpe_target;
                    training.training_type = TrainingType::Deload;
                    training.rpe_target = training.rpe_target.min(self.config.deload_rpe_cap);
                    state.notes.push(note(
                        PRIORITY_RECOVERY,
                        format!(
                            "Yellow recovery zone conflicts with {} session at RPE {}",
                            original, original_rpe
                        ),
                        format!("Downgraded to deload at RPE {}", training.rpe_target),
                    ));
                }
            }
            RecoveryZone::Red => {
                if !matches!(
                    training.training_type,
                    TrainingType::Rest | TrainingType::Mobility
                ) {
                    let original = training.training_type;
                    *training = rest_block();
                    state.notes.push(note(
                        PRIORITY_RECOVERY,
                        format!("Red recovery zone conflicts with planned {} session", original),
                        "Replaced with an easy rest-day routine".to_string(),
                    ));
                }
            }
        }
    }

    fn resolve_genetics(&self, state: &mut WorkingState<'_>, risks: &RiskMap) {
        let high = |category| category_is_high_risk(risks, category, self.genetics);

        if high(GeneticCategory::Cyp1a2) {
            strip_by_keywords(
                state,
                &CAFFEINE_KEYWORDS,
                "CYP1A2 slow caffeine metabolism",
            );
        }

        if high(GeneticCategory::Mthfr) {
            for supplement in state.supplements.iter_mut() {
                if name_contains(supplement, "folic acid") {
                    let replacement = SupplementDose::new(
                        "Methylfolate (5-MTHF)",
                        "1000 mcg",
                        supplement.timing,
                        "Active folate form for reduced MTHFR activity",
                    );
                    let original = std::mem::replace(supplement, replacement);
                    state.notes.push(note(
                        PRIORITY_GENETICS,
                        format!("MTHFR variant limits conversion of {}", original.name),
                        "Replaced with methylfolate at the same timing".to_string(),
                    ));
                }
            }
        }

        if high(GeneticCategory::Comt) {
            strip_by_keywords(state, &STIMULANT_KEYWORDS, "COMT slow catecholamine clearance");
        }

        if high(GeneticCategory::Actn3) {
            if let Some(training) = state.training.as_mut() {
                if training.training_type == TrainingType::Strength
                    && training.rpe_target >= self.config.heavy_strength_rpe
                {
                    training.push_note(
                        "ACTN3 variant: extend the warm-up to 10-15 minutes with ramp-up sets.",
                    );
                    state.notes.push(note(
                        PRIORITY_GENETICS,
                        "ACTN3 variant raises injury risk on heavy strength days".to_string(),
                        "Added an extended warm-up".to_string(),
                    ));
                }
            }
        }
    }

    fn resolve_interactions(&self, state: &mut WorkingState<'_>) {
        let iron_timings: Vec<_> = state
            .supplements
            .iter()
            .filter(|s| name_contains(s, "iron"))
            .map(|s| s.timing)
            .collect();

        for supplement in state.supplements.iter_mut() {
            if name_contains(supplement, "calcium") && iron_timings.contains(&supplement.timing) {
                let from = supplement.timing;
                supplement.timing = from.opposite();
                state.notes.push(note(
                    PRIORITY_INTERACTION,
                    format!("{} blocks iron absorption when taken {}", supplement.name, from),
                    format!("Moved {} to {}", supplement.name, supplement.timing),
                ));
            }
        }

        let zinc_timing = state
            .supplements
            .iter()
            .find(|s| name_contains(s, "zinc"))
            .map(|s| s.timing);
        let has_copper = state.supplements.iter().any(|s| name_contains(s, "copper"));

        if let (Some(timing), false) = (zinc_timing, has_copper) {
            let copper = SupplementDose::new(
                "Copper Bisglycinate",
                "2 mg",
                timing,
                "Balances long-term zinc intake",
            );
            if allergen_match(&copper, state.allergies).is_none() {
                state.supplements.push(copper);
                state.notes.push(note(
                    PRIORITY_INTERACTION,
                    "Zinc without copper can deplete copper over time".to_string(),
                    format!("Added Copper Bisglycinate 2 mg {}", timing),
                ));
            }
        }
    }

    fn resolve_duplicates(&self, state: &mut WorkingState<'_>) {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(state.supplements.len());

        for supplement in std::mem::take(&mut state.supplements) {
            if seen.insert(supplement.name.trim().to_lowercase()) {
                kept.push(supplement);
            } else {
                state.notes.push(note(
                    PRIORITY_DUPLICATE,
                    format!("{} appears more than once", supplement.name),
                    "Kept the first entry".to_string(),
                ));
            }
        }
        state.supplements = kept;
    }
}

/// Remove supplements whose name contains one of `keywords`
fn strip_by_keywords(state: &mut WorkingState<'_>, keywords: &[&str], reason: &str) {
    let mut kept = Vec::with_capacity(state.supplements.len());

    for supplement in std::mem::take(&mut state.supplements) {
        match keywords.iter().find(|k| name_contains(&supplement, k)) {
            Some(keyword) => state.notes.push(note(
                PRIORITY_GENETICS,
                format!("{}: {} contains {}", reason, supplement.name, keyword),
                format!("Removed {} from the stack", supplement.name),
            )),
            None => kept.push(supplement),
        }
    }
    state.supplements = kept;
}

/// Resolve with the given configuration sections
pub fn resolve(
    training: Option<TrainingBlock>,
    nutrition: Option<NutritionPlan>,
    supplements: Vec<SupplementDose>,
    genetic_risks: &RiskMap,
    zone: RecoveryZone,
    allergies: &[String],
    config: &crate::Config,
) -> ResolvedProtocol {
    ConflictResolver::new(&config.conflicts, &config.genetics).resolve(
        training,
        nutrition,
        supplements,
        genetic_risks,
        zone,
        allergies,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genetics::map_risks;
    use crate::{Config, GeneticRisk, SupplementTiming};

    fn supp(name: &str, timing: SupplementTiming, rationale: &str) -> SupplementDose {
        SupplementDose::new(name, "1 dose", timing, rationale)
    }

    fn block(training_type: TrainingType, rpe: f64) -> TrainingBlock {
        TrainingBlock {
            training_type,
            exercises: vec![Exercise::new("Back squat", 5, "5")],
            duration_minutes: 60,
            rpe_target: rpe,
            notes: None,
        }
    }

    fn risks(entries: &[(GeneticCategory, &str)]) -> RiskMap {
        let records: Vec<GeneticRisk> = entries
            .iter()
            .map(|(category, genotype)| GeneticRisk {
                category: *category,
                genotype: genotype.to_string(),
                risk_level: 0.8,
                implications: String::new(),
            })
            .collect();
        map_risks(&records)
    }

    #[test]
    fn test_fish_allergy_removes_omega3() {
        let config = Config::default();
        let resolved = resolve(
            None,
            None,
            vec![supp(
                "Omega-3 (EPA/DHA)",
                SupplementTiming::WithBreakfast,
                "Fish oil for cardiovascular and brain health",
            )],
            &RiskMap::new(),
            RecoveryZone::Green,
            &["fish".to_string()],
            &config,
        );

        assert!(resolved.supplements.is_empty());
        assert_eq!(resolved.notes.len(), 1);
        assert_eq!(resolved.notes[0].priority, 1);
    }

    #[test]
    fn test_dairy_allergy_matches_whey() {
        let config = Config::default();
        let resolved = resolve(
            None,
            None,
            vec![
                supp("Whey Protein", SupplementTiming::PostWorkout, "Post-training protein"),
                supp("Creatine Monohydrate", SupplementTiming::WithBreakfast, "Strength"),
            ],
            &RiskMap::new(),
            RecoveryZone::Green,
            &["Dairy".to_string()],
            &config,
        );
        assert_eq!(resolved.supplements.len(), 1);
        assert_eq!(resolved.supplements[0].name, "Creatine Monohydrate");
    }

    #[test]
    fn test_yellow_downgrades_heavy_session() {
        let config = Config::default();
        let resolved = resolve(
            Some(block(TrainingType::Strength, 8.0)),
            None,
            vec![],
            &RiskMap::new(),
            RecoveryZone::Yellow,
            &[],
            &config,
        );

        let training = resolved.training.unwrap();
        assert_eq!(training.training_type, TrainingType::Deload);
        assert_eq!(training.rpe_target, 6.0);
        assert_eq!(resolved.notes[0].priority, 2);
    }

    #[test]
    fn test_yellow_leaves_moderate_session() {
        let config = Config::default();
        let resolved = resolve(
            Some(block(TrainingType::Strength, 7.0)),
            None,
            vec![],
            &RiskMap::new(),
            RecoveryZone::Yellow,
            &[],
            &config,
        );
        assert_eq!(resolved.training.unwrap().training_type, TrainingType::Strength);
        assert!(resolved.notes.is_empty());
    }

    #[test]
    fn test_red_replaces_with_rest_block() {
        let config = Config::default();
        let resolved = resolve(
            Some(block(TrainingType::Endurance, 6.0)),
            None,
            vec![],
            &RiskMap::new(),
            RecoveryZone::Red,
            &[],
            &config,
        );

        let training = resolved.training.unwrap();
        assert_eq!(training.training_type, TrainingType::Rest);
        assert_eq!(training.exercises.len(), 3);
        assert_eq!(training.rpe_target, 2.0);

        let mobility = resolve(
            Some(block(TrainingType::Mobility, 3.0)),
            None,
            vec![],
            &RiskMap::new(),
            RecoveryZone::Red,
            &[],
            &config,
        );
        assert_eq!(mobility.training.unwrap().training_type, TrainingType::Mobility);
    }

    #[test]
    fn test_cyp1a2_strips_caffeine_sources() {
        let config = Config::default();
        let resolved = resolve(
            None,
            None,
            vec![
                supp("Pre-Workout (Caffeine 150 mg)", SupplementTiming::PreWorkout, ""),
                supp("Green Tea Extract (EGCG)", SupplementTiming::WithBreakfast, ""),
                supp("L-Theanine", SupplementTiming::Morning, "Instead of caffeine"),
            ],
            &risks(&[(GeneticCategory::Cyp1a2, "AC")]),
            RecoveryZone::Green,
            &[],
            &config,
        );

        assert_eq!(resolved.supplements.len(), 1);
        assert_eq!(resolved.supplements[0].name, "L-Theanine");
        assert!(resolved.notes[0].description.contains("pre-workout"));
    }

    #[test]
    fn test_mthfr_rewrites_folic_acid() {
        let config = Config::default();
        let resolved = resolve(
            None,
            None,
            vec![supp("Folic Acid", SupplementTiming::WithLunch, "Homocysteine")],
            &risks(&[(GeneticCategory::Mthfr, "TT")]),
            RecoveryZone::Green,
            &[],
            &config,
        );

        assert_eq!(resolved.supplements[0].name, "Methylfolate (5-MTHF)");
        assert_eq!(resolved.supplements[0].timing, SupplementTiming::WithLunch);
        assert_eq!(resolved.notes[0].priority, 3);
    }

    #[test]
    fn test_low_risk_gene_has_no_effect() {
        let config = Config::default();
        let records = [GeneticRisk {
            category: GeneticCategory::Cyp1a2,
            genotype: "CC".into(),
            risk_level: 0.2,
            implications: String::new(),
        }];
        let resolved = resolve(
            None,
            None,
            vec![supp("Caffeine + L-Theanine", SupplementTiming::Morning, "")],
            &map_risks(&records),
            RecoveryZone::Green,
            &[],
            &config,
        );
        assert_eq!(resolved.supplements.len(), 1);
    }

    #[test]
    fn test_actn3_adds_warm_up_on_heavy_day() {
        let config = Config::default();
        let resolved = resolve(
            Some(block(TrainingType::Strength, 8.0)),
            None,
            vec![],
            &risks(&[(GeneticCategory::Actn3, "XX")]),
            RecoveryZone::Green,
            &[],
            &config,
        );
        let notes = resolved.training.unwrap().notes.unwrap();
        assert!(notes.contains("warm-up"));
    }

    #[test]
    fn test_iron_calcium_separated() {
        let config = Config::default();
        let resolved = resolve(
            None,
            None,
            vec![
                supp("Iron Bisglycinate", SupplementTiming::WithBreakfast, ""),
                supp("Calcium Citrate", SupplementTiming::WithBreakfast, ""),
            ],
            &RiskMap::new(),
            RecoveryZone::Green,
            &[],
            &config,
        );
        assert_eq!(resolved.supplements[1].timing, SupplementTiming::WithDinner);
        assert_eq!(resolved.notes[0].priority, 4);
    }

    #[test]
    fn test_zinc_gets_copper() {
        let config = Config::default();
        let resolved = resolve(
            None,
            None,
            vec![supp("Zinc Picolinate", SupplementTiming::WithDinner, "")],
            &RiskMap::new(),
            RecoveryZone::Green,
            &[],
            &config,
        );
        assert_eq!(resolved.supplements.len(), 2);
        assert_eq!(resolved.supplements[1].name, "Copper Bisglycinate");
        assert_eq!(resolved.supplements[1].timing, SupplementTiming::WithDinner);
    }

    #[test]
    fn test_duplicates_first_wins() {
        let config = Config::default();
        let resolved = resolve(
            None,
            None,
            vec![
                supp("Vitamin D3", SupplementTiming::WithBreakfast, "baseline"),
                supp("vitamin d3", SupplementTiming::Morning, "escalated"),
            ],
            &RiskMap::new(),
            RecoveryZone::Green,
            &[],
            &config,
        );
        assert_eq!(resolved.supplements.len(), 1);
        assert_eq!(resolved.supplements[0].rationale, "baseline");
        assert_eq!(resolved.notes[0].priority, 5);
    }

    #[test]
    fn test_notes_sorted_and_allergens_never_return() {
        let config = Config::default();
        let allergies = vec!["fish".to_string(), "soy".to_string()];
        let resolved = resolve(
            Some(block(TrainingType::Strength, 8.0)),
            None,
            vec![
                supp("Zinc", SupplementTiming::WithDinner, ""),
                supp("Zinc", SupplementTiming::WithDinner, ""),
                supp("Krill Oil", SupplementTiming::WithBreakfast, ""),
                supp("Phosphatidylserine", SupplementTiming::Bedtime, ""),
                supp("Caffeine", SupplementTiming::Morning, ""),
            ],
            &risks(&[(GeneticCategory::Comt, "Met/Met")]),
            RecoveryZone::Yellow,
            &allergies,
            &config,
        );

        let priorities: Vec<u8> = resolved.notes.iter().map(|n| n.priority).collect();
        let mut sorted = priorities.clone();
        sorted.sort();
        assert_eq!(priorities, sorted);
        assert_eq!(priorities.first(), Some(&1));

        for supplement in &resolved.supplements {
            assert!(allergen_match(supplement, &allergies).is_none());
        }
    }
}
