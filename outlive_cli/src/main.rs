use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use outlive_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "outlive")]
#[command(about = "Personalized daily health protocol synthesizer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override config file location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize the daily protocol from an input bundle
    Plan {
        /// JSON input bundle (profile, genomics, bloodwork, wearable, body comp)
        #[arg(long)]
        input: PathBuf,

        /// Lab panel CSV, replaces any bloodwork in the bundle
        #[arg(long)]
        bloodwork: Option<PathBuf>,

        /// Collection date of the --bloodwork panel (YYYY-MM-DD), defaults to the reference date
        #[arg(long, requires = "bloodwork")]
        lab_date: Option<String>,

        /// Previous lab panel CSV, used for trends
        #[arg(long)]
        previous_bloodwork: Option<PathBuf>,

        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show the weekly training cycle for a goal
    Week {
        /// Primary goal (longevity, muscleGain, fatLoss, ...)
        #[arg(long, default_value = "longevity")]
        goal: String,

        /// Current day, 1 = Monday ... 7 = Sunday
        #[arg(long, default_value_t = 1)]
        day: u8,

        /// Recovery zone (green, yellow, red)
        #[arg(long, default_value = "green")]
        zone: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Assess recovery from wearable signals
    Recovery {
        /// Heart-rate variability (ms)
        #[arg(long)]
        hrv: Option<f64>,

        /// Resting heart rate (bpm)
        #[arg(long)]
        rhr: Option<f64>,

        /// Sleep duration (hours)
        #[arg(long)]
        sleep: Option<f64>,

        /// Deep sleep (minutes)
        #[arg(long)]
        deep: Option<f64>,

        /// Device recovery score (0-100)
        #[arg(long)]
        recovery_score: Option<f64>,

        /// Previous day's strain (0-21)
        #[arg(long)]
        strain: Option<f64>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Write the default configuration file
    InitConfig {
        /// Destination, defaults to the --config path or the standard location
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    outlive_core::logging::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Plan {
            input,
            bloodwork,
            lab_date,
            previous_bloodwork,
            date,
            json,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let panels = Panels {
                bloodwork: bloodwork.as_deref(),
                lab_date: lab_date.as_deref(),
                previous_bloodwork: previous_bloodwork.as_deref(),
            };
            cmd_plan(&input, &panels, date.as_deref(), json, &config)
        }
        Commands::Week {
            goal,
            day,
            zone,
            json,
        } => cmd_week(&goal, day, &zone, json),
        Commands::Recovery {
            hrv,
            rhr,
            sleep,
            deep,
            recovery_score,
            strain,
            json,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let wearable = WearableInput {
                hrv_ms: hrv,
                resting_hr: rhr,
                sleep_hours: sleep,
                deep_sleep_minutes: deep,
                rem_sleep_minutes: None,
                recovery_score,
                strain,
            };
            cmd_recovery(&wearable, json, &config)
        }
        Commands::InitConfig { path, force } => {
            let path = path
                .or(cli.config)
                .unwrap_or_else(Config::default_config_path);
            cmd_init_config(&path, force)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn parse_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| Error::Input(format!("Invalid date '{}': {}", s, e))),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

/// Lab panel files given on the command line
struct Panels<'a> {
    bloodwork: Option<&'a Path>,
    lab_date: Option<&'a str>,
    previous_bloodwork: Option<&'a Path>,
}

fn cmd_plan(
    input_path: &Path,
    panels: &Panels<'_>,
    date: Option<&str>,
    json: bool,
    config: &Config,
) -> Result<()> {
    let date = parse_date(date)?;
    let mut input = load_input(input_path)?;

    if let Some(path) = panels.bloodwork {
        let lab_date = match panels.lab_date {
            Some(_) => parse_date(panels.lab_date)?,
            None => date,
        };
        let markers = load_bloodwork_csv(path)?;
        input.bloodwork = Some(BloodworkInput {
            markers,
            lab_date,
            previous_markers: None,
        });
    }

    if let Some(path) = panels.previous_bloodwork {
        let previous = load_bloodwork_csv(path)?;
        match input.bloodwork.as_mut() {
            Some(current) => current.previous_markers = Some(previous),
            None => eprintln!("--previous-bloodwork ignored: no current bloodwork panel."),
        }
    }

    let protocol = synthesize(&input, date, config);
    tracing::debug!(
        "Synthesized protocol for {} with {} supplements",
        protocol.date,
        protocol.supplements.len()
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&protocol)?);
    } else {
        display_protocol(&protocol);
    }
    Ok(())
}

fn cmd_week(goal: &str, day: u8, zone: &str, json: bool) -> Result<()> {
    let goal = goal.parse::<Goal>().unwrap_or_else(|e| {
        eprintln!("{}. Using longevity.", e);
        Goal::Longevity
    });
    let zone = zone.parse::<RecoveryZone>().unwrap_or_else(|e| {
        eprintln!("{}. Using green.", e);
        RecoveryZone::Green
    });

    let plan = plan_week(&[goal], day, zone);

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        display_week(&plan, day.clamp(1, 7), zone);
    }
    Ok(())
}

fn cmd_recovery(wearable: &WearableInput, json: bool, config: &Config) -> Result<()> {
    let assessment = assess_recovery(wearable, &config.recovery);

    if json {
        println!("{}", serde_json::to_string_pretty(&assessment)?);
    } else {
        display_recovery(&assessment);
    }
    Ok(())
}

fn cmd_init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    Config::default().save_to(path)?;
    println!("✓ Wrote default config to {}", path.display());
    Ok(())
}

// ============================================================================
// Display
// ============================================================================

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

fn weekday_name(day: u8) -> &'static str {
    WEEKDAYS
        .get(usize::from(day.saturating_sub(1)))
        .copied()
        .unwrap_or("?")
}

fn header(title: &str) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", title);
    println!("╰─────────────────────────────────────────╯");
}

fn display_recovery(assessment: &RecoveryAssessment) {
    header(&format!("RECOVERY: {}", assessment.zone.as_str().to_uppercase()));
    println!();
    if let Some(score) = assessment.composite_score {
        println!("  Composite score:   {:.2}", score);
    }
    println!(
        "  Signals:           {} (confidence {:.2})",
        assessment.signal_count, assessment.confidence
    );
    println!(
        "  Intensity:         x{:.2}",
        assessment.training_intensity_modifier
    );
    println!();
    for rec in &assessment.recommendations {
        println!("  → {}", rec);
    }
    println!();
}

fn display_week(plan: &WeeklyPlan, current_day: u8, zone: RecoveryZone) {
    header(&format!("WEEK: {} ({} zone)", plan.goal, zone));
    println!();
    for day in &plan.days {
        let marker = if day.day == current_day { "▶" } else { " " };
        let recovery = if day.recovery_day { " (recovery)" } else { "" };
        println!(
            "{} {} {:<12}{} {}",
            marker,
            weekday_name(day.day),
            day.focus.as_str(),
            recovery,
            day.nutrition_focus
        );
    }
    println!();
}

fn display_protocol(protocol: &SynthesizedProtocol) {
    header(&format!(
        "PROTOCOL {} ({}, {} zone)",
        protocol.date,
        weekday_name(protocol.day_of_week),
        protocol.recovery_zone
    ));

    println!("\nTop priorities");
    for (i, item) in protocol.priorities.iter().enumerate() {
        println!("  {}. {}", i + 1, item);
    }

    let training = &protocol.training;
    println!(
        "\nTraining: {} ({} min, RPE {})",
        training.training_type, training.duration_minutes, training.rpe_target
    );
    for exercise in &training.exercises {
        println!("  → {} {}x{}", exercise.name, exercise.sets, exercise.reps);
    }
    if let Some(ref notes) = training.notes {
        println!("  ℹ {}", notes);
    }

    let nutrition = &protocol.nutrition;
    println!(
        "\nNutrition: {} kcal (P {} g, C {} g, F {} g)",
        nutrition.tdee, nutrition.protein_g, nutrition.carbs_g, nutrition.fat_g
    );
    for meal in &nutrition.meals {
        println!(
            "  {:<10} {:>5} kcal  {}",
            meal.slot.as_str(),
            meal.calories,
            meal.description
        );
    }

    println!("\nSupplements");
    for supplement in &protocol.supplements {
        println!(
            "  {:<16} {} {}",
            supplement.timing.as_str(),
            supplement.name,
            supplement.dose
        );
    }

    println!("\nInterventions");
    for block in &protocol.interventions {
        match block.temperature_c {
            Some(temp) => println!(
                "  {} {} min at {}°C",
                block.intervention_type, block.duration_minutes, temp
            ),
            None => println!("  {} {} min", block.intervention_type, block.duration_minutes),
        }
    }

    let sleep = &protocol.sleep;
    println!(
        "\nSleep: {} → {} ({} h)",
        sleep.target_bedtime, sleep.target_wake_time, sleep.target_hours
    );
    for item in &sleep.evening_checklist {
        println!("  □ {}", item);
    }

    if !protocol.conflicts.is_empty() {
        println!("\nResolved conflicts");
        for note in &protocol.conflicts {
            println!("  [{}] {}: {}", note.priority, note.description, note.resolution);
        }
    }

    println!("\nInsights");
    for insight in &protocol.insights {
        println!("  • {}", insight);
    }
    println!();
}
