#![forbid(unsafe_code)]

//! Core domain model and rule engines for the Outlive daily protocol.
//!
//! This crate provides:
//! - Domain types (inputs, protocol building blocks, the synthesized protocol)
//! - Rule engines (genetics, biomarkers, recovery, weekly cycle, meals)
//! - Conflict resolution across allergies, recovery, genetics and interactions
//! - The deterministic protocol synthesizer
//! - Configuration, input loading and logging setup

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod genetics;
pub mod biomarkers;
pub mod recovery;
pub mod circaseptan;
pub mod meals;
pub mod dose;
pub mod conflicts;
pub mod stack;
pub mod brief;
pub mod synthesizer;
pub mod inputs;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use genetics::{map_risks, RiskMap};
pub use biomarkers::{BiomarkerInsight, BiomarkerTrend, TrendDirection};
pub use recovery::{assess_recovery, RecoveryAdaptor};
pub use circaseptan::{plan_week, DayPlan, WeeklyPlan};
pub use meals::{MealPlanner, MealRequest};
pub use conflicts::{ConflictResolver, ResolvedProtocol};
pub use synthesizer::synthesize;
pub use inputs::{load_bloodwork_csv, load_input};
