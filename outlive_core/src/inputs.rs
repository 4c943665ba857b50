//! Loading input records from disk.
//!
//! - `load_input`: a full `SynthesisInput` bundle as JSON
//! - `load_bloodwork_csv`: a lab panel exported as CSV
//!
//! The CSV header is
//! `name,value,unit,optimal_low,optimal_high,normal_low,normal_high[,status]`.
//! When the status column is absent or empty it is derived from the ranges.

use crate::{BloodworkMarker, Error, MarkerStatus, Result, SynthesisInput};
use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use std::path::Path;

/// Load an input bundle from a JSON file
pub fn load_input(path: &Path) -> Result<SynthesisInput> {
    let contents = std::fs::read_to_string(path)?;
    let input: SynthesisInput = serde_json::from_str(&contents)?;

    tracing::info!(
        "Loaded input from {:?} ({} goals, genomics: {}, bloodwork: {}, wearable: {}, body comp: {})",
        path,
        input.profile.goals.len(),
        input.genomics.is_some(),
        input.bloodwork.is_some(),
        input.wearable.is_some(),
        input.body_comp.is_some()
    );
    Ok(input)
}

/// CSV row format for a lab panel
#[derive(Debug, Deserialize)]
struct CsvRow {
    name: String,
    value: f64,
    #[serde(default)]
    unit: String,
    optimal_low: f64,
    optimal_high: f64,
    normal_low: f64,
    normal_high: f64,
    #[serde(default)]
    status: Option<String>,
}

impl TryFrom<CsvRow> for BloodworkMarker {
    type Error = crate::Error;

    fn try_from(row: CsvRow) -> Result<Self> {
        if row.name.trim().is_empty() {
            return Err(Error::Input("Marker name is empty".into()));
        }
        if row.optimal_low > row.optimal_high || row.normal_low > row.normal_high {
            return Err(Error::Input(format!(
                "Marker {} has an inverted range",
                row.name
            )));
        }

        let status = match row.status.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.parse::<MarkerStatus>()?,
            _ => MarkerStatus::classify(
                row.value,
                (row.optimal_low, row.optimal_high),
                (row.normal_low, row.normal_high),
            ),
        };

        Ok(BloodworkMarker {
            name: row.name.trim().to_string(),
            value: row.value,
            unit: row.unit,
            optimal_low: row.optimal_low,
            optimal_high: row.optimal_high,
            normal_low: row.normal_low,
            normal_high: row.normal_high,
            status,
        })
    }
}

/// Load a bloodwork panel from a CSV file
///
/// Rows that fail to parse are logged and skipped.
pub fn load_bloodwork_csv(path: &Path) -> Result<Vec<BloodworkMarker>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_path(path)?;

    let mut markers = Vec::new();
    for result in reader.deserialize::<CsvRow>() {
        match result {
            Ok(row) => match BloodworkMarker::try_from(row) {
                Ok(marker) => markers.push(marker),
                Err(e) => {
                    tracing::warn!("Skipping bloodwork row: {}", e);
                }
            },
            Err(e) => {
                tracing::warn!("Failed to deserialize bloodwork row: {}", e);
            }
        }
    }

    tracing::info!("Loaded {} markers from {:?}", markers.len(), path);
    Ok(markers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Goal;

    #[test]
    fn test_load_input_bundle() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("input.json");

        let json = r#"{
            "profile": {
                "goals": ["muscleGain", "longevity"],
                "allergies": ["fish"]
            },
            "wearable": { "hrv_ms": 62.0, "sleep_hours": 7.5 },
            "body_comp": { "weight_kg": 80.0 }
        }"#;
        std::fs::write(&path, json).unwrap();

        let input = load_input(&path).unwrap();
        assert_eq!(input.profile.goals, vec![Goal::MuscleGain, Goal::Longevity]);
        assert_eq!(input.wearable.unwrap().hrv_ms, Some(62.0));
        assert!(input.genomics.is_none());
        assert_eq!(input.body_comp.unwrap().body_fat_percent, None);
    }

    #[test]
    fn test_load_input_rejects_unknown_goal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("input.json");
        std::fs::write(&path, r#"{ "profile": { "goals": ["bulk"] } }"#).unwrap();

        assert!(matches!(load_input(&path), Err(Error::Json(_))));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = load_input(&temp_dir.path().join("missing.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_load_bloodwork_csv() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("panel.csv");

        let csv = "\
name,value,unit,optimal_low,optimal_high,normal_low,normal_high,status
Vitamin D,18,ng/mL,60,80,30,100,critical
ApoB,72,mg/dL,40,80,40,130,
hs-CRP,not-a-number,mg/L,0,1,0,3,
Ferritin,20,ng/mL,50,150,30,400,
";
        std::fs::write(&path, csv).unwrap();

        let markers = load_bloodwork_csv(&path).unwrap();
        assert_eq!(markers.len(), 3);
        assert_eq!(markers[0].status, MarkerStatus::Critical);
        assert_eq!(markers[1].status, MarkerStatus::Optimal);
        // 10 below normal, within a quarter of the 370 span
        assert_eq!(markers[2].status, MarkerStatus::Suboptimal);
    }

    #[test]
    fn test_load_bloodwork_csv_without_status_column() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("panel.csv");

        let csv = "\
name,value,unit,optimal_low,optimal_high,normal_low,normal_high
HbA1c,5.9,%,4.6,5.3,4.0,5.6
";
        std::fs::write(&path, csv).unwrap();

        let markers = load_bloodwork_csv(&path).unwrap();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].status, MarkerStatus::Suboptimal);
    }

    #[test]
    fn test_bad_status_and_inverted_range_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("panel.csv");

        let csv = "\
name,value,unit,optimal_low,optimal_high,normal_low,normal_high,status
Vitamin D,18,ng/mL,60,80,30,100,terrible
ApoB,72,mg/dL,80,40,40,130,
Magnesium,2.1,mg/dL,2.0,2.4,1.7,2.6,optimal
";
        std::fs::write(&path, csv).unwrap();

        let markers = load_bloodwork_csv(&path).unwrap();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].name, "Magnesium");
    }
}
