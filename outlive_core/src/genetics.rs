//! Genotype → recommendation mapping.
//!
//! Each of the ten supported genes has an ordered list of genotype patterns.
//! The first tier whose pattern occurs in the normalized genotype wins, so
//! specific patterns ("4/4") must precede loose ones ("4"). Each tier maps
//! to a fixed set of dietary, supplement and training recommendations.

use crate::config::GeneticsConfig;
use crate::{Error, GeneticCategory, GeneticRisk, GeneticRiskAssessment, GenotypeTier, Result};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Assessments keyed by gene, iterated in a fixed order
pub type RiskMap = BTreeMap<GeneticCategory, GeneticRiskAssessment>;

/// Representative SNP for each gene (GSTM1 is a deletion and has none)
const RSIDS: [(&str, GeneticCategory); 9] = [
    ("rs429358", GeneticCategory::Apoe),
    ("rs1801133", GeneticCategory::Mthfr),
    ("rs762551", GeneticCategory::Cyp1a2),
    ("rs1815739", GeneticCategory::Actn3),
    ("rs9939609", GeneticCategory::Fto),
    ("rs2228570", GeneticCategory::Vdr),
    ("rs4680", GeneticCategory::Comt),
    ("rs12934922", GeneticCategory::Bcmo1),
    ("rs33972313", GeneticCategory::Slc23a1),
];

impl GeneticCategory {
    /// Look up a gene by its representative rsID
    pub fn from_rsid(rsid: &str) -> Option<GeneticCategory> {
        let rsid = rsid.trim().to_lowercase();
        RSIDS
            .iter()
            .find(|(id, _)| *id == rsid)
            .map(|(_, category)| *category)
    }
}

impl FromStr for GeneticCategory {
    type Err = Error;

    /// Accepts a gene symbol (any case) or its representative rsID
    fn from_str(s: &str) -> Result<Self> {
        let symbol = s.trim().to_uppercase();
        GeneticCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == symbol)
            .or_else(|| GeneticCategory::from_rsid(s))
            .ok_or_else(|| Error::Input(format!("Unknown genetic category: {}", s)))
    }
}

// ============================================================================
// Genotype Classification
// ============================================================================

struct TierRule {
    patterns: &'static [&'static str],
    tier: GenotypeTier,
}

const fn rule(patterns: &'static [&'static str], tier: GenotypeTier) -> TierRule {
    TierRule { patterns, tier }
}

use crate::GenotypeTier::{Heterozygous as Het, HomozygousRisk as Hom};

const APOE_RULES: &[TierRule] = &[
    rule(&["4/4", "e4/e4", "e4e4"], Hom),
    rule(&["4"], Het),
];
const MTHFR_RULES: &[TierRule] = &[
    rule(&["tt", "t/t"], Hom),
    rule(&["ct", "tc", "c/t", "t/c"], Het),
];
const CYP1A2_RULES: &[TierRule] = &[
    rule(&["cc", "c/c"], Hom),
    rule(&["ac", "ca", "a/c", "c/a"], Het),
];
const ACTN3_RULES: &[TierRule] = &[
    rule(&["xx", "x/x", "tt", "t/t"], Hom),
    rule(&["rx", "xr", "r/x", "x/r", "ct", "tc", "c/t", "t/c"], Het),
];
const FTO_RULES: &[TierRule] = &[
    rule(&["aa", "a/a"], Hom),
    rule(&["at", "ta", "a/t", "t/a"], Het),
];
const VDR_RULES: &[TierRule] = &[
    rule(&["aa", "a/a"], Hom),
    rule(&["ag", "ga", "a/g", "g/a"], Het),
];
const COMT_RULES: &[TierRule] = &[
    rule(&["met/met", "aa", "a/a"], Hom),
    rule(&["met", "ag", "ga", "a/g", "g/a"], Het),
];
const GSTM1_RULES: &[TierRule] = &[rule(&["null", "0/0", "del", "absent"], Hom)];
const BCMO1_RULES: &[TierRule] = &[
    rule(&["tt", "t/t"], Hom),
    rule(&["t"], Het),
];
const SLC23A1_RULES: &[TierRule] = &[
    rule(&["tt", "t/t"], Hom),
    rule(&["ct", "tc", "c/t", "t/c"], Het),
];

fn tier_rules(category: GeneticCategory) -> &'static [TierRule] {
    match category {
        GeneticCategory::Apoe => APOE_RULES,
        GeneticCategory::Mthfr => MTHFR_RULES,
        GeneticCategory::Cyp1a2 => CYP1A2_RULES,
        GeneticCategory::Actn3 => ACTN3_RULES,
        GeneticCategory::Fto => FTO_RULES,
        GeneticCategory::Vdr => VDR_RULES,
        GeneticCategory::Comt => COMT_RULES,
        GeneticCategory::Gstm1 => GSTM1_RULES,
        GeneticCategory::Bcmo1 => BCMO1_RULES,
        GeneticCategory::Slc23a1 => SLC23A1_RULES,
    }
}

/// Classify a genotype string for a gene
///
/// The genotype is lowercased and stripped of whitespace before matching.
/// Anything that matches no risk pattern is wild type.
pub fn classify_genotype(category: GeneticCategory, genotype: &str) -> GenotypeTier {
    let normalized: String = genotype
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();

    tier_rules(category)
        .iter()
        .find(|r| r.patterns.iter().any(|p| normalized.contains(p)))
        .map(|r| r.tier)
        .unwrap_or(GenotypeTier::WildType)
}

// ============================================================================
// Recommendation Tables
// ============================================================================

struct TierAdvice {
    dietary: &'static [&'static str],
    supplements: &'static [&'static str],
    training: &'static [&'static str],
}

const NONE: &[&str] = &[];

fn advice(category: GeneticCategory, tier: GenotypeTier) -> TierAdvice {
    use crate::GeneticCategory as G;
    use crate::GenotypeTier::*;

    match (category, tier) {
        (G::Apoe, HomozygousRisk) => TierAdvice {
            dietary: &[
                "APOE4/4: limit saturated fat to under 7% of calories",
                "APOE4/4: favor a Mediterranean pattern rich in olive oil, fish and leafy greens",
            ],
            supplements: &[
                "Omega-3 (EPA/DHA) 2000 mg daily with breakfast",
                "Curcumin 500 mg with dinner",
            ],
            training: &[
                "Prioritize 150+ minutes of zone 2 cardio per week for cerebrovascular health",
                "Keep two strength sessions in every week",
            ],
        },
        (G::Apoe, Heterozygous) => TierAdvice {
            dietary: &[
                "APOE4 carrier: keep saturated fat under 10% of calories",
                "Emphasize soluble fiber and monounsaturated fats",
            ],
            supplements: &["Omega-3 (EPA/DHA) 1000 mg daily with breakfast"],
            training: &["Train aerobically at least four days per week"],
        },
        (G::Apoe, WildType) => TierAdvice {
            dietary: &["APOE: standard heart-healthy fat intake"],
            supplements: NONE,
            training: NONE,
        },

        (G::Mthfr, HomozygousRisk) => TierAdvice {
            dietary: &[
                "MTHFR: eat folate-rich leafy greens daily",
                "Avoid foods fortified with synthetic folic acid",
            ],
            supplements: &[
                "Methylfolate (5-MTHF) 1000 mcg daily with breakfast",
                "Methylcobalamin (B12) 1000 mcg with breakfast",
            ],
            training: &["Monitor homocysteine; very high endurance volume can raise it"],
        },
        (G::Mthfr, Heterozygous) => TierAdvice {
            dietary: &["MTHFR: include folate-rich leafy greens and legumes"],
            supplements: &["Methylfolate (5-MTHF) 400 mcg daily with breakfast"],
            training: NONE,
        },
        (G::Mthfr, WildType) => TierAdvice {
            dietary: &["MTHFR: no methylation-specific changes needed"],
            supplements: NONE,
            training: NONE,
        },

        (G::Cyp1a2, HomozygousRisk) => TierAdvice {
            dietary: &["CYP1A2 slow metabolizer: limit caffeine to 100 mg before 10:00"],
            supplements: &["L-Theanine 200 mg in the morning instead of caffeine"],
            training: &["Skip caffeinated pre-workout products"],
        },
        (G::Cyp1a2, Heterozygous) => TierAdvice {
            dietary: &["CYP1A2 intermediate: cap caffeine at 200 mg with none after noon"],
            supplements: NONE,
            training: NONE,
        },
        (G::Cyp1a2, WildType) => TierAdvice {
            dietary: &["CYP1A2 fast metabolizer: moderate coffee intake is well tolerated"],
            supplements: NONE,
            training: &["Caffeine at 3 mg/kg before training may improve performance"],
        },

        (G::Actn3, HomozygousRisk) => TierAdvice {
            dietary: &["ACTN3 XX: support connective tissue with collagen and vitamin C around training"],
            supplements: &["Collagen Peptides 15 g with vitamin C before training"],
            training: &[
                "Extend warm-ups to 10-15 minutes before heavy lifts",
                "Favor higher-rep ranges and endurance-oriented work",
            ],
        },
        (G::Actn3, Heterozygous) => TierAdvice {
            dietary: &["ACTN3 RX: balanced power and endurance profile"],
            supplements: &["Creatine Monohydrate 5 g daily post-workout"],
            training: &["Mix power and endurance work across the week"],
        },
        (G::Actn3, WildType) => TierAdvice {
            dietary: &["ACTN3 RR: fuel heavy sessions with carbohydrate"],
            supplements: &["Creatine Monohydrate 5 g daily post-workout"],
            training: &["Responds well to heavy, low-rep strength work"],
        },

        (G::Fto, HomozygousRisk) => TierAdvice {
            dietary: &[
                "FTO AA: raise protein to 2.2 g/kg to improve satiety",
                "FTO AA: favor high-fiber, minimally processed carbohydrates",
            ],
            supplements: &["Fiber (Psyllium) 5 g before dinner"],
            training: &["Aim for 10,000+ daily steps to blunt FTO-associated weight gain"],
        },
        (G::Fto, Heterozygous) => TierAdvice {
            dietary: &["FTO AT: keep portions structured and limit ultra-processed foods"],
            supplements: NONE,
            training: &["Include daily low-intensity activity"],
        },
        (G::Fto, WildType) => TierAdvice {
            dietary: &["FTO TT: no appetite-specific adjustments"],
            supplements: NONE,
            training: NONE,
        },

        (G::Vdr, HomozygousRisk) => TierAdvice {
            dietary: &["VDR: include vitamin D rich foods such as fatty fish and egg yolks"],
            supplements: &[
                "Vitamin D3 5000 IU daily with breakfast",
                "K2 (MK-7) 100 mcg with breakfast",
            ],
            training: &["Get outdoor daylight before training"],
        },
        (G::Vdr, Heterozygous) => TierAdvice {
            dietary: &["VDR: keep vitamin D intake consistent year-round"],
            supplements: &["Vitamin D3 2000 IU daily with breakfast"],
            training: NONE,
        },
        (G::Vdr, WildType) => TierAdvice {
            dietary: &["VDR: typical vitamin D receptor function"],
            supplements: NONE,
            training: NONE,
        },

        (G::Comt, HomozygousRisk) => TierAdvice {
            dietary: &["COMT slow: limit caffeine and green tea extract"],
            supplements: &[
                "Magnesium Glycinate 400 mg at bedtime",
                "L-Theanine 200 mg in the evening",
            ],
            training: &["Prefer moderate intensity and pair hard days with stress management"],
        },
        (G::Comt, Heterozygous) => TierAdvice {
            dietary: &["COMT intermediate: moderate caffeine intake"],
            supplements: &["L-Theanine 100 mg as needed"],
            training: NONE,
        },
        (G::Comt, WildType) => TierAdvice {
            dietary: &["COMT fast: stimulants are generally well tolerated"],
            supplements: &["L-Tyrosine 500 mg before demanding cognitive work"],
            training: &["Handles high-intensity intervals well"],
        },

        (G::Gstm1, HomozygousRisk) => TierAdvice {
            dietary: &[
                "GSTM1 null: eat cruciferous vegetables daily (broccoli, kale, sprouts)",
                "Limit charred and smoked meats",
            ],
            supplements: &[
                "Sulforaphane 10 mg daily with breakfast",
                "N-Acetyl Cysteine 600 mg with dinner",
            ],
            training: &["Avoid training next to heavy traffic and ventilate indoor spaces"],
        },
        (G::Gstm1, _) => TierAdvice {
            dietary: &["GSTM1 present: standard detoxification capacity"],
            supplements: NONE,
            training: NONE,
        },

        (G::Bcmo1, HomozygousRisk) => TierAdvice {
            dietary: &["BCMO1 poor converter: get preformed vitamin A from eggs, dairy or liver"],
            supplements: &["Retinyl Palmitate 3000 IU daily with breakfast"],
            training: NONE,
        },
        (G::Bcmo1, Heterozygous) => TierAdvice {
            dietary: &["BCMO1 reduced conversion: pair beta-carotene foods with fat"],
            supplements: NONE,
            training: NONE,
        },
        (G::Bcmo1, WildType) => TierAdvice {
            dietary: &["BCMO1: efficient beta-carotene conversion"],
            supplements: NONE,
            training: NONE,
        },

        (G::Slc23a1, HomozygousRisk) => TierAdvice {
            dietary: &["SLC23A1: eat vitamin C rich produce at every meal"],
            supplements: &["Ascorbic Acid (Vitamin C) 500 mg twice daily with meals"],
            training: NONE,
        },
        (G::Slc23a1, Heterozygous) => TierAdvice {
            dietary: &["SLC23A1: include vitamin C rich produce daily"],
            supplements: &["Ascorbic Acid (Vitamin C) 250 mg daily with lunch"],
            training: NONE,
        },
        (G::Slc23a1, WildType) => TierAdvice {
            dietary: &["SLC23A1: typical vitamin C transport"],
            supplements: NONE,
            training: NONE,
        },
    }
}

fn to_owned(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| s.to_string()).collect()
}

// ============================================================================
// Mapping
// ============================================================================

/// Assess a single genotype record
pub fn assess(risk: &GeneticRisk) -> GeneticRiskAssessment {
    let tier = classify_genotype(risk.category, &risk.genotype);
    let advice = advice(risk.category, tier);

    GeneticRiskAssessment {
        category: risk.category,
        tier,
        risk_level: risk.risk_level.clamp(0.0, 1.0),
        dietary_adjustments: to_owned(advice.dietary),
        supplement_adjustments: to_owned(advice.supplements),
        training_adjustments: to_owned(advice.training),
    }
}

/// Map genotype records to per-gene assessments
///
/// Records are processed in input order. When two records share a
/// category, the later record replaces the earlier one (last write wins).
pub fn map_risks(risks: &[GeneticRisk]) -> RiskMap {
    let mut map = RiskMap::new();

    for risk in risks {
        let assessment = assess(risk);
        tracing::debug!(
            "Genotype {} '{}' classified as {}",
            risk.category,
            risk.genotype,
            assessment.tier.as_str()
        );
        if let Some(previous) = map.insert(risk.category, assessment) {
            tracing::debug!(
                "Duplicate {} record replaces earlier {} assessment",
                risk.category,
                previous.tier.as_str()
            );
        }
    }

    tracing::info!("Mapped {} genetic categories", map.len());
    map
}

/// True when the assessment's risk level reaches the configured threshold
pub fn is_high_risk(assessment: &GeneticRiskAssessment, config: &GeneticsConfig) -> bool {
    assessment.risk_level >= config.high_risk_threshold
}

/// True when `category` is present and high risk
pub fn category_is_high_risk(
    risks: &RiskMap,
    category: GeneticCategory,
    config: &GeneticsConfig,
) -> bool {
    risks
        .get(&category)
        .map(|a| is_high_risk(a, config))
        .unwrap_or(false)
}
