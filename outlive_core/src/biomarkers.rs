//! Bloodwork analysis: prioritized insights and panel-over-panel trends.
//!
//! Marker names are normalized (lowercase, hyphens and spaces removed) and
//! looked up in a fixed alias table. Known markers get a dedicated
//! recommendation; anything else falls back to a generic template.

use crate::config::BiomarkerConfig;
use crate::types::round_to;
use crate::{BloodworkMarker, MarkerStatus};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Markers with dedicated recommendation templates
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum KnownMarker {
    VitaminD,
    ApoB,
    Ldl,
    Hdl,
    Triglycerides,
    Hba1c,
    FastingGlucose,
    FastingInsulin,
    HsCrp,
    Homocysteine,
    Ferritin,
    VitaminB12,
    Testosterone,
    Tsh,
    Omega3Index,
    Magnesium,
    Lpa,
}

impl KnownMarker {
    /// Stable key used to match markers across panels
    pub fn key(&self) -> &'static str {
        match self {
            KnownMarker::VitaminD => "vitamin_d",
            KnownMarker::ApoB => "apob",
            KnownMarker::Ldl => "ldl",
            KnownMarker::Hdl => "hdl",
            KnownMarker::Triglycerides => "triglycerides",
            KnownMarker::Hba1c => "hba1c",
            KnownMarker::FastingGlucose => "fasting_glucose",
            KnownMarker::FastingInsulin => "fasting_insulin",
            KnownMarker::HsCrp => "hs_crp",
            KnownMarker::Homocysteine => "homocysteine",
            KnownMarker::Ferritin => "ferritin",
            KnownMarker::VitaminB12 => "vitamin_b12",
            KnownMarker::Testosterone => "testosterone",
            KnownMarker::Tsh => "tsh",
            KnownMarker::Omega3Index => "omega3_index",
            KnownMarker::Magnesium => "magnesium",
            KnownMarker::Lpa => "lpa",
        }
    }
}

/// Normalized alias → marker
static ALIASES: Lazy<HashMap<&'static str, KnownMarker>> = Lazy::new(|| {
    use KnownMarker::*;

    let groups: [(KnownMarker, &[&str]); 17] = [
        (VitaminD, &["vitamind", "25ohd", "25ohvitamind", "25hydroxyvitamind", "vitd", "vitamind3"]),
        (ApoB, &["apob", "apolipoproteinb", "apob100"]),
        (Ldl, &["ldl", "ldlc", "ldlcholesterol"]),
        (Hdl, &["hdl", "hdlc", "hdlcholesterol"]),
        (Triglycerides, &["triglycerides", "triglyceride", "tg", "trigs"]),
        (Hba1c, &["hba1c", "a1c", "hemoglobina1c", "glycatedhemoglobin"]),
        (FastingGlucose, &["glucose", "fastingglucose", "fbg"]),
        (FastingInsulin, &["insulin", "fastinginsulin"]),
        (HsCrp, &["hscrp", "crp", "creactiveprotein", "hscreactiveprotein"]),
        (Homocysteine, &["homocysteine", "hcy"]),
        (Ferritin, &["ferritin", "serumferritin"]),
        (VitaminB12, &["vitaminb12", "b12", "cobalamin"]),
        (Testosterone, &["testosterone", "totaltestosterone"]),
        (Tsh, &["tsh", "thyroidstimulatinghormone"]),
        (Omega3Index, &["omega3index", "omega3"]),
        (Magnesium, &["magnesium", "rbcmagnesium", "serummagnesium"]),
        (Lpa, &["lpa", "lp(a)", "lipoproteina", "lipoprotein(a)"]),
    ];

    let mut map = HashMap::new();
    for (marker, aliases) in groups {
        for alias in aliases {
            map.insert(*alias, marker);
        }
    }
    map
});

/// Lowercase and strip hyphens and spaces
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| *c != '-' && *c != ' ')
        .collect()
}

/// Resolve a marker name against the alias table
pub fn lookup(name: &str) -> Option<KnownMarker> {
    ALIASES.get(normalize_name(name).as_str()).copied()
}

/// Key used to pair markers across panels
fn trend_key(name: &str) -> String {
    match lookup(name) {
        Some(known) => known.key().to_string(),
        None => normalize_name(name),
    }
}

// ============================================================================
// Insights
// ============================================================================

/// A prioritized recommendation for one marker
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BiomarkerInsight {
    pub marker: String,
    pub known: Option<KnownMarker>,
    pub status: MarkerStatus,
    pub value: f64,
    pub unit: String,
    pub recommendation: String,
    pub priority: u8,
}

impl BiomarkerInsight {
    /// Critical or suboptimal
    pub fn needs_attention(&self) -> bool {
        matches!(
            self.status,
            MarkerStatus::Critical | MarkerStatus::Suboptimal
        )
    }
}

/// Per-marker advice, one line per status
struct MarkerCopy {
    label: &'static str,
    /// Cardiometabolic markers rank above micronutrients when suboptimal
    cardiometabolic: bool,
    critical: &'static str,
    suboptimal: &'static str,
    normal: &'static str,
    optimal: &'static str,
}

fn copy(marker: KnownMarker, value_is_high: bool) -> MarkerCopy {
    use KnownMarker::*;

    match marker {
        VitaminD => MarkerCopy {
            label: "Vitamin D",
            cardiometabolic: false,
            critical: "Supplement 5000-10000 IU of D3 daily with K2 and retest in 8-12 weeks.",
            suboptimal: "Supplement 2000-5000 IU of D3 daily and get midday sunlight.",
            normal: "Aim for the upper half of the range with 1000-2000 IU daily.",
            optimal: "Maintain current sun exposure and supplementation.",
        },
        ApoB => MarkerCopy {
            label: "ApoB",
            cardiometabolic: true,
            critical: "Discuss lipid-lowering therapy with a physician; cut saturated fat and add soluble fiber.",
            suboptimal: "Reduce saturated fat, add 10 g of soluble fiber daily and increase zone 2 training.",
            normal: "Keep trending lower; long-term risk tracks cumulative ApoB exposure.",
            optimal: "Keep current diet and training.",
        },
        Ldl => MarkerCopy {
            label: "LDL cholesterol",
            cardiometabolic: true,
            critical: "Review lipid therapy with a physician and confirm with an ApoB test.",
            suboptimal: "Replace saturated fat with olive oil, nuts and fish; add soluble fiber.",
            normal: "Keep saturated fat moderate and retest with your next panel.",
            optimal: "No change needed.",
        },
        Hdl => MarkerCopy {
            label: "HDL cholesterol",
            cardiometabolic: true,
            critical: "Very low HDL: increase aerobic training and review with a physician.",
            suboptimal: "Increase aerobic volume and favor monounsaturated fats.",
            normal: "Maintain regular aerobic training.",
            optimal: "No change needed.",
        },
        Triglycerides => MarkerCopy {
            label: "Triglycerides",
            cardiometabolic: true,
            critical: "Cut refined carbohydrates and alcohol now and review with a physician.",
            suboptimal: "Reduce refined carbohydrates and alcohol; add omega-3 rich fish.",
            normal: "Keep refined carbohydrates low.",
            optimal: "No change needed.",
        },
        Hba1c => MarkerCopy {
            label: "HbA1c",
            cardiometabolic: true,
            critical: "Glycemic control needs medical review; walk 10 minutes after every meal.",
            suboptimal: "Lower refined carbohydrate intake, walk after meals and prioritize muscle gain.",
            normal: "Keep post-meal walks and fiber-first meals.",
            optimal: "Glycemic control is excellent.",
        },
        FastingGlucose => MarkerCopy {
            label: "Fasting glucose",
            cardiometabolic: true,
            critical: "Confirm with repeat testing and a physician visit.",
            suboptimal: "Reduce late-evening carbohydrates and add post-meal walks.",
            normal: "Keep meal timing consistent.",
            optimal: "No change needed.",
        },
        FastingInsulin => MarkerCopy {
            label: "Fasting insulin",
            cardiometabolic: true,
            critical: "Marked insulin resistance: review with a physician and reduce refined carbohydrates.",
            suboptimal: "Improve insulin sensitivity with resistance training and fewer refined carbohydrates.",
            normal: "Maintain resistance training.",
            optimal: "Insulin sensitivity is excellent.",
        },
        HsCrp => MarkerCopy {
            label: "hs-CRP",
            cardiometabolic: true,
            critical: "Rule out acute infection or injury and retest in 2-4 weeks.",
            suboptimal: "Prioritize sleep, omega-3 intake and an anti-inflammatory diet.",
            normal: "Keep inflammation low with sleep and whole foods.",
            optimal: "Systemic inflammation is low.",
        },
        Homocysteine => MarkerCopy {
            label: "Homocysteine",
            cardiometabolic: true,
            critical: "Supplement methylated B vitamins and review with a physician.",
            suboptimal: "Add methylfolate and B12 and eat more leafy greens.",
            normal: "Keep folate-rich foods in the diet.",
            optimal: "Methylation markers look good.",
        },
        Ferritin if value_is_high => MarkerCopy {
            label: "Ferritin",
            cardiometabolic: false,
            critical: "Iron overload possible: avoid iron supplements and review with a physician.",
            suboptimal: "Avoid iron supplements and consider blood donation.",
            normal: "Avoid unnecessary iron supplementation.",
            optimal: "Iron stores are optimal.",
        },
        Ferritin => MarkerCopy {
            label: "Ferritin",
            cardiometabolic: false,
            critical: "Iron stores are depleted: supplement iron bisglycinate with vitamin C and review with a physician.",
            suboptimal: "Add iron-rich foods and supplement iron bisglycinate away from calcium.",
            normal: "Keep iron-rich foods in the diet.",
            optimal: "Iron stores are optimal.",
        },
        VitaminB12 => MarkerCopy {
            label: "Vitamin B12",
            cardiometabolic: false,
            critical: "Supplement 1000 mcg methylcobalamin daily and review absorption with a physician.",
            suboptimal: "Supplement 1000 mcg methylcobalamin daily.",
            normal: "Keep B12 sources in the diet.",
            optimal: "No change needed.",
        },
        Testosterone => MarkerCopy {
            label: "Testosterone",
            cardiometabolic: false,
            critical: "Review with an endocrinologist.",
            suboptimal: "Prioritize sleep, resistance training and adequate dietary fat.",
            normal: "Maintain sleep and resistance training.",
            optimal: "No change needed.",
        },
        Tsh => MarkerCopy {
            label: "TSH",
            cardiometabolic: false,
            critical: "Thyroid function needs medical review.",
            suboptimal: "Retest with free T3/T4 and ensure adequate iodine and selenium.",
            normal: "Retest with your next panel.",
            optimal: "Thyroid function looks good.",
        },
        Omega3Index => MarkerCopy {
            label: "Omega-3 index",
            cardiometabolic: true,
            critical: "Supplement 2-3 g EPA/DHA daily and eat fatty fish twice weekly.",
            suboptimal: "Increase EPA/DHA to 2 g daily.",
            normal: "Aim for an index of 8-12%.",
            optimal: "Omega-3 status is optimal.",
        },
        Magnesium => MarkerCopy {
            label: "Magnesium",
            cardiometabolic: false,
            critical: "Supplement magnesium glycinate and review with a physician.",
            suboptimal: "Supplement 300-400 mg magnesium glycinate in the evening.",
            normal: "Keep leafy greens, nuts and seeds in the diet.",
            optimal: "No change needed.",
        },
        Lpa => MarkerCopy {
            label: "Lp(a)",
            cardiometabolic: true,
            critical: "Lp(a) is largely genetic: aggressively manage ApoB and review with a cardiologist.",
            suboptimal: "Keep ApoB and blood pressure tightly controlled.",
            normal: "Lp(a) needs testing only once in a lifetime.",
            optimal: "Lp(a) risk is low.",
        },
    }
}

fn known_insight(known: KnownMarker, marker: &BloodworkMarker) -> BiomarkerInsight {
    let copy = copy(known, marker.value > marker.optimal_high);
    let direction = if marker.value < marker.optimal_low {
        "below"
    } else {
        "above"
    };

    let (recommendation, priority) = match marker.status {
        MarkerStatus::Critical => (
            format!(
                "{} is critically {} range at {} {}. {}",
                copy.label, direction, marker.value, marker.unit, copy.critical
            ),
            1,
        ),
        MarkerStatus::Suboptimal => (
            format!(
                "{} is {} the optimal range at {} {}. {}",
                copy.label, direction, marker.value, marker.unit, copy.suboptimal
            ),
            if copy.cardiometabolic { 2 } else { 3 },
        ),
        MarkerStatus::Normal => (
            format!(
                "{} is within the normal range (optimal {}-{} {}). {}",
                copy.label, marker.optimal_low, marker.optimal_high, marker.unit, copy.normal
            ),
            4,
        ),
        MarkerStatus::Optimal => (format!("{} is optimal. {}", copy.label, copy.optimal), 5),
    };

    BiomarkerInsight {
        marker: marker.name.clone(),
        known: Some(known),
        status: marker.status,
        value: marker.value,
        unit: marker.unit.clone(),
        recommendation,
        priority,
    }
}

fn generic_priority(status: MarkerStatus) -> Option<u8> {
    match status {
        MarkerStatus::Critical => Some(1),
        MarkerStatus::Suboptimal => Some(3),
        MarkerStatus::Normal => Some(4),
        MarkerStatus::Optimal => None,
    }
}

fn generic_insight(marker: &BloodworkMarker) -> Option<BiomarkerInsight> {
    let priority = generic_priority(marker.status)?;
    Some(BiomarkerInsight {
        marker: marker.name.clone(),
        known: None,
        status: marker.status,
        value: marker.value,
        unit: marker.unit.clone(),
        recommendation: format!(
            "{} is {} at {} {} (optimal {}-{}). Review with your clinician and retest in 3 months.",
            marker.name,
            marker.status,
            marker.value,
            marker.unit,
            marker.optimal_low,
            marker.optimal_high
        ),
        priority,
    })
}

/// Produce prioritized insights, most urgent first
///
/// Sorting is stable, so equal priorities keep panel order.
pub fn analyze(markers: &[BloodworkMarker]) -> Vec<BiomarkerInsight> {
    let mut insights: Vec<BiomarkerInsight> = markers
        .iter()
        .filter_map(|marker| match lookup(&marker.name) {
            Some(known) => Some(known_insight(known, marker)),
            None => generic_insight(marker),
        })
        .collect();

    insights.sort_by_key(|i| i.priority);

    tracing::debug!(
        "Analyzed {} markers into {} insights",
        markers.len(),
        insights.len()
    );
    insights
}

/// First insight for a known marker
pub fn find_insight(insights: &[BiomarkerInsight], known: KnownMarker) -> Option<&BiomarkerInsight> {
    insights.iter().find(|i| i.known == Some(known))
}

// ============================================================================
// Trends
// ============================================================================

/// Direction of a marker relative to the previous panel
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Improving => "improving",
            TrendDirection::Declining => "declining",
            TrendDirection::Stable => "stable",
        }
    }
}

/// Change of one marker between two panels
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BiomarkerTrend {
    pub marker: String,
    pub current: f64,
    pub previous: f64,
    pub percent_change: f64,
    pub direction: TrendDirection,
}

fn classify_direction(
    marker: &BloodworkMarker,
    percent_change: f64,
    config: &BiomarkerConfig,
) -> TrendDirection {
    let magnitude = percent_change.abs();
    if magnitude <= config.trend_stable_band_percent {
        return TrendDirection::Stable;
    }

    // Any large move away from an already-optimal value is adverse
    if marker.status == MarkerStatus::Optimal {
        return if magnitude > config.trend_optimal_drift_percent {
            TrendDirection::Declining
        } else {
            TrendDirection::Stable
        };
    }

    let midpoint = marker.optimal_midpoint();
    let improving = if marker.value < midpoint {
        percent_change > 0.0
    } else if marker.value > midpoint {
        percent_change < 0.0
    } else {
        true
    };

    if improving {
        TrendDirection::Improving
    } else {
        TrendDirection::Declining
    }
}

/// Compare the current panel against the previous one
///
/// Markers without a previous value, or whose previous value is exactly
/// zero, are left out.
pub fn trends(
    current: &[BloodworkMarker],
    previous: &[BloodworkMarker],
    config: &BiomarkerConfig,
) -> Vec<BiomarkerTrend> {
    let mut previous_values: HashMap<String, f64> = HashMap::new();
    for marker in previous {
        previous_values
            .entry(trend_key(&marker.name))
            .or_insert(marker.value);
    }

    current
        .iter()
        .filter_map(|marker| {
            let previous = *previous_values.get(&trend_key(&marker.name))?;
            if previous == 0.0 {
                tracing::debug!("Skipping trend for {}: previous value is zero", marker.name);
                return None;
            }

            let percent_change = round_to((marker.value - previous) / previous * 100.0, 1);
            Some(BiomarkerTrend {
                marker: marker.name.clone(),
                current: marker.value,
                previous,
                percent_change,
                direction: classify_direction(marker, percent_change, config),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(name: &str, value: f64, low: f64, high: f64, status: MarkerStatus) -> BloodworkMarker {
        BloodworkMarker {
            name: name.into(),
            value,
            unit: "ng/mL".into(),
            optimal_low: low,
            optimal_high: high,
            normal_low: low * 0.5,
            normal_high: high * 1.5,
            status,
        }
    }

    #[test]
    fn test_critical_vitamin_d() {
        let insights = analyze(&[marker("Vitamin D", 18.0, 60.0, 80.0, MarkerStatus::Critical)]);

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].priority, 1);
        assert_eq!(insights[0].known, Some(KnownMarker::VitaminD));
        assert!(insights[0].recommendation.contains("5000-10000 IU"));
        assert!(insights[0].recommendation.contains("18 ng/mL"));
    }

    #[test]
    fn test_alias_normalization() {
        assert_eq!(lookup("25-OH Vitamin D"), Some(KnownMarker::VitaminD));
        assert_eq!(lookup("hs-CRP"), Some(KnownMarker::HsCrp));
        assert_eq!(lookup("Apo B"), Some(KnownMarker::ApoB));
        assert_eq!(lookup("Lp(a)"), Some(KnownMarker::Lpa));
        assert_eq!(lookup("Omega-3 Index"), Some(KnownMarker::Omega3Index));
        assert_eq!(lookup("Uric Acid"), None);
    }

    #[test]
    fn test_known_optimal_marker_still_reported() {
        let insights = analyze(&[marker("ApoB", 60.0, 40.0, 80.0, MarkerStatus::Optimal)]);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].priority, 5);
    }

    #[test]
    fn test_unknown_marker_fallback() {
        let insights = analyze(&[
            marker("Uric Acid", 7.9, 3.0, 5.5, MarkerStatus::Suboptimal),
            marker("Albumin", 4.5, 4.0, 5.0, MarkerStatus::Optimal),
            marker("Sodium", 150.0, 136.0, 142.0, MarkerStatus::Critical),
            marker("Potassium", 3.9, 4.0, 4.5, MarkerStatus::Normal),
        ]);

        // Optimal unknown markers are dropped
        assert_eq!(insights.len(), 3);
        let priorities: Vec<u8> = insights.iter().map(|i| i.priority).collect();
        assert_eq!(priorities, vec![1, 3, 4]);
        assert!(insights[0].recommendation.starts_with("Sodium is critical"));
    }

    #[test]
    fn test_insights_sorted_stably() {
        let insights = analyze(&[
            marker("Magnesium", 1.6, 2.0, 2.4, MarkerStatus::Suboptimal),
            marker("Vitamin D", 70.0, 60.0, 80.0, MarkerStatus::Optimal),
            marker("Ferritin", 12.0, 50.0, 150.0, MarkerStatus::Critical),
            marker("Uric Acid", 7.0, 3.0, 5.5, MarkerStatus::Suboptimal),
        ]);

        let names: Vec<&str> = insights.iter().map(|i| i.marker.as_str()).collect();
        assert_eq!(names, vec!["Ferritin", "Magnesium", "Uric Acid", "Vitamin D"]);
    }

    #[test]
    fn test_cardiometabolic_suboptimal_ranks_higher() {
        let insights = analyze(&[
            marker("Magnesium", 1.6, 2.0, 2.4, MarkerStatus::Suboptimal),
            marker("ApoB", 105.0, 40.0, 80.0, MarkerStatus::Suboptimal),
        ]);
        assert_eq!(insights[0].marker, "ApoB");
        assert_eq!(insights[0].priority, 2);
        assert_eq!(insights[1].priority, 3);
    }

    #[test]
    fn test_high_ferritin_avoids_iron_advice() {
        let insights = analyze(&[marker("Ferritin", 400.0, 50.0, 150.0, MarkerStatus::Critical)]);
        assert!(insights[0].recommendation.contains("avoid iron"));
    }

    #[test]
    fn test_trend_improving_below_midpoint() {
        let current = [marker("Vitamin D", 40.0, 60.0, 80.0, MarkerStatus::Suboptimal)];
        let previous = [marker("vitamin-d", 30.0, 60.0, 80.0, MarkerStatus::Critical)];

        let trends = trends(&current, &previous, &BiomarkerConfig::default());
        assert_eq!(trends.len(), 1);
        assert_eq!(trends[0].percent_change, 33.3);
        assert_eq!(trends[0].direction, TrendDirection::Improving);
    }

    #[test]
    fn test_trend_declining_above_midpoint() {
        let current = [marker("ApoB", 110.0, 40.0, 80.0, MarkerStatus::Suboptimal)];
        let previous = [marker("ApoB", 100.0, 40.0, 80.0, MarkerStatus::Suboptimal)];

        let trends = trends(&current, &previous, &BiomarkerConfig::default());
        assert_eq!(trends[0].percent_change, 10.0);
        assert_eq!(trends[0].direction, TrendDirection::Declining);
    }

    #[test]
    fn test_trend_stable_band() {
        let current = [marker("ApoB", 102.0, 40.0, 80.0, MarkerStatus::Suboptimal)];
        let previous = [marker("ApoB", 100.0, 40.0, 80.0, MarkerStatus::Suboptimal)];
        assert_eq!(trends(&current, &previous, &BiomarkerConfig::default())[0].direction, TrendDirection::Stable);
    }

    #[test]
    fn test_trend_optimal_drift_is_declining() {
        let previous = [marker("Vitamin D", 70.0, 60.0, 80.0, MarkerStatus::Optimal)];

        let small = [marker("Vitamin D", 73.0, 60.0, 80.0, MarkerStatus::Optimal)];
        assert_eq!(trends(&small, &previous, &BiomarkerConfig::default())[0].direction, TrendDirection::Stable);

        let large = [marker("Vitamin D", 77.0, 60.0, 80.0, MarkerStatus::Optimal)];
        assert_eq!(trends(&large, &previous, &BiomarkerConfig::default())[0].direction, TrendDirection::Declining);
    }

    #[test]
    fn test_trend_skips_missing_and_zero_previous() {
        let current = [
            marker("Vitamin D", 40.0, 60.0, 80.0, MarkerStatus::Suboptimal),
            marker("hs-CRP", 1.2, 0.0, 1.0, MarkerStatus::Suboptimal),
            marker("Ferritin", 80.0, 50.0, 150.0, MarkerStatus::Optimal),
        ];
        let previous = [marker("hs-CRP", 0.0, 0.0, 1.0, MarkerStatus::Optimal)];

        assert!(trends(&current, &previous, &BiomarkerConfig::default()).is_empty());
    }

    #[test]
    fn test_trend_sign_inverts_when_swapped() {
        let a = [
            marker("Vitamin D", 40.0, 60.0, 80.0, MarkerStatus::Suboptimal),
            marker("ApoB", 95.0, 40.0, 80.0, MarkerStatus::Suboptimal),
        ];
        let b = [
            marker("Vitamin D", 30.0, 60.0, 80.0, MarkerStatus::Critical),
            marker("ApoB", 110.0, 40.0, 80.0, MarkerStatus::Suboptimal),
        ];

        let forward = trends(&a, &b, &BiomarkerConfig::default());
        let backward = trends(&b, &a, &BiomarkerConfig::default());
        assert_eq!(forward.len(), backward.len());
        for (f, r) in forward.iter().zip(backward.iter()) {
            assert_eq!(f.marker, r.marker);
            assert!(f.percent_change.signum() == -r.percent_change.signum());
        }
    }

    #[test]
    fn test_trend_band_follows_config() {
        let current = [marker("ApoB", 104.0, 40.0, 80.0, MarkerStatus::Suboptimal)];
        let previous = [marker("ApoB", 100.0, 40.0, 80.0, MarkerStatus::Suboptimal)];

        let default = trends(&current, &previous, &BiomarkerConfig::default());
        assert_eq!(default[0].direction, TrendDirection::Declining);

        let wide = BiomarkerConfig {
            trend_stable_band_percent: 5.0,
            ..BiomarkerConfig::default()
        };
        assert_eq!(trends(&current, &previous, &wide)[0].direction, TrendDirection::Stable);
    }
}
