//! Dose extraction from free-text supplement recommendations.
//!
//! Recommendation strings look like `"Methylfolate (5-MTHF) 1000 mcg daily
//! with breakfast"`: a name, an amount, a unit and trailing instructions.
//! The parser never guesses: a string without a recognizable dose, or with
//! nothing before the amount, comes back with `parsed == false`.

use crate::SupplementTiming;

/// Units recognized as a dose, matched case-insensitively
const DOSE_UNITS: [&str; 4] = ["mg", "mcg", "iu", "g"];

/// Result of parsing a recommendation string
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedDose {
    pub name: String,
    pub dose: String,
    pub parsed: bool,
}

impl ParsedDose {
    fn unparsed(text: &str) -> Self {
        Self {
            name: text.trim().to_string(),
            dose: String::new(),
            parsed: false,
        }
    }
}

enum UnitToken {
    /// "mg", "IU", "g/day": the amount is the previous token
    Standalone,
    /// "5000IU", "5g/day": the token carries its own amount
    Fused,
}

fn is_amount_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | ',' | '-')
}

fn is_amount(token: &str) -> bool {
    token.chars().all(is_amount_char) && token.chars().any(|c| c.is_ascii_digit())
}

fn trim_punctuation(token: &str) -> &str {
    token.trim_end_matches(|c| matches!(c, ',' | ';' | '.' | ':' | ')'))
}

fn unit_token(token: &str) -> Option<UnitToken> {
    let t = trim_punctuation(token).to_lowercase();
    if t.is_empty() {
        return None;
    }

    let amount_len = t.chars().take_while(|c| is_amount_char(*c)).count();
    let has_amount = t[..amount_len].chars().any(|c| c.is_ascii_digit());
    let rest = &t[amount_len..];

    let is_unit = DOSE_UNITS.contains(&rest) || rest.contains("g/");
    match (is_unit, has_amount) {
        (true, true) => Some(UnitToken::Fused),
        (true, false) if amount_len == 0 => Some(UnitToken::Standalone),
        _ => None,
    }
}

/// Split a recommendation into supplement name and dose
pub fn parse_dose(text: &str) -> ParsedDose {
    let tokens: Vec<&str> = text.split_whitespace().collect();

    for (i, token) in tokens.iter().enumerate() {
        let (name_end, dose) = match unit_token(token) {
            Some(UnitToken::Fused) => (i, trim_punctuation(token).to_string()),
            Some(UnitToken::Standalone) if i > 0 && is_amount(tokens[i - 1]) => (
                i - 1,
                format!("{} {}", tokens[i - 1], trim_punctuation(token)),
            ),
            _ => continue,
        };

        let name = tokens[..name_end]
            .join(" ")
            .trim_end_matches(|c| matches!(c, ',' | ':' | '-' | ' '))
            .to_string();

        if name.is_empty() {
            tracing::debug!("Dose found but no supplement name in '{}'", text);
            return ParsedDose::unparsed(text);
        }

        return ParsedDose {
            name,
            dose,
            parsed: true,
        };
    }

    tracing::debug!("No dose unit found in '{}'", text);
    ParsedDose::unparsed(text)
}

/// First word of a supplement name, lowercased, used for overlap checks
pub fn name_prefix(name: &str) -> String {
    name.split_whitespace()
        .next()
        .unwrap_or("")
        .trim_matches(|c: char| !(c.is_alphanumeric() || c == '-'))
        .to_lowercase()
}

/// Pick a timing slot from the instruction words of a recommendation
pub fn infer_timing(text: &str) -> SupplementTiming {
    let lower = text.to_lowercase();
    const RULES: [(&str, SupplementTiming); 10] = [
        ("bedtime", SupplementTiming::Bedtime),
        ("before bed", SupplementTiming::Bedtime),
        ("evening", SupplementTiming::Evening),
        ("dinner", SupplementTiming::WithDinner),
        ("lunch", SupplementTiming::WithLunch),
        ("before training", SupplementTiming::PreWorkout),
        ("pre-workout", SupplementTiming::PreWorkout),
        ("post-workout", SupplementTiming::PostWorkout),
        ("morning", SupplementTiming::Morning),
        ("breakfast", SupplementTiming::WithBreakfast),
    ];

    RULES
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, timing)| *timing)
        .unwrap_or(SupplementTiming::WithBreakfast)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_standalone_unit() {
        let parsed = parse_dose("Methylfolate (5-MTHF) 1000 mcg daily with breakfast");
        assert!(parsed.parsed);
        assert_eq!(parsed.name, "Methylfolate (5-MTHF)");
        assert_eq!(parsed.dose, "1000 mcg");
    }

    #[test]
    fn test_parse_keeps_unit_casing() {
        let parsed = parse_dose("Vitamin D3 5000 IU daily with breakfast");
        assert_eq!(parsed.name, "Vitamin D3");
        assert_eq!(parsed.dose, "5000 IU");
    }

    #[test]
    fn test_parse_fused_unit() {
        let parsed = parse_dose("Vitamin D3 5000IU, daily");
        assert!(parsed.parsed);
        assert_eq!(parsed.name, "Vitamin D3");
        assert_eq!(parsed.dose, "5000IU");
    }

    #[test]
    fn test_parse_per_day_unit() {
        let parsed = parse_dose("Creatine Monohydrate 5 g/day");
        assert!(parsed.parsed);
        assert_eq!(parsed.name, "Creatine Monohydrate");
        assert_eq!(parsed.dose, "5 g/day");
    }

    #[test]
    fn test_name_with_slash_is_not_a_unit() {
        let parsed = parse_dose("Omega-3 (EPA/DHA) 2000 mg daily");
        assert_eq!(parsed.name, "Omega-3 (EPA/DHA)");
        assert_eq!(parsed.dose, "2000 mg");
    }

    #[test]
    fn test_malformed_without_unit_is_unparsed() {
        let parsed = parse_dose("  Eat more leafy greens ");
        assert!(!parsed.parsed);
        assert_eq!(parsed.name, "Eat more leafy greens");
        assert_eq!(parsed.dose, "");
    }

    #[test]
    fn test_malformed_without_name_is_unparsed() {
        let parsed = parse_dose("500 mg daily");
        assert!(!parsed.parsed);
        assert_eq!(parsed.name, "500 mg daily");
        assert!(parsed.dose.is_empty());
    }

    #[test]
    fn test_unit_without_amount_is_skipped() {
        // "mg" follows a word, not an amount, so there is no dose at all
        let parsed = parse_dose("Magnesium mg as tolerated");
        assert!(!parsed.parsed);
    }

    #[test]
    fn test_empty_string() {
        let parsed = parse_dose("");
        assert!(!parsed.parsed);
        assert_eq!(parsed.name, "");
    }

    #[test]
    fn test_name_prefix() {
        assert_eq!(name_prefix("Omega-3 (EPA/DHA)"), "omega-3");
        assert_eq!(name_prefix("L-Theanine"), "l-theanine");
        assert_eq!(name_prefix(""), "");
    }

    #[test]
    fn test_infer_timing() {
        assert_eq!(
            infer_timing("Magnesium Glycinate 400 mg at bedtime"),
            SupplementTiming::Bedtime
        );
        assert_eq!(
            infer_timing("Fiber (Psyllium) 5 g before dinner"),
            SupplementTiming::WithDinner
        );
        assert_eq!(
            infer_timing("Collagen Peptides 15 g with vitamin C before training"),
            SupplementTiming::PreWorkout
        );
        assert_eq!(
            infer_timing("Ascorbic Acid (Vitamin C) 500 mg twice daily"),
            SupplementTiming::WithBreakfast
        );
    }
}
