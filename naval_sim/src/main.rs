//! naval_sim - resolve a naval battle scenario from the command line

mod simulation;

use clap::Parser;
use naval_core::{
    load_scenario, Battle, BattleError, BattleReport, ConfigError, ExpectedHits, FleetError,
    HitRoll, ReportError, SampledHits,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Naval battle resolver - replays a scenario's fire events minute by minute
#[derive(Parser, Debug)]
#[command(name = "naval_sim")]
#[command(about = "Resolve a naval gunnery scenario and print the strength of both sides")]
struct Args {
    /// Scenario TOML file
    scenario: PathBuf,

    /// Draw hits per gun from this seed instead of using expected values
    #[arg(long)]
    seed: Option<u64>,

    /// Run a Monte-Carlo batch of this many seeded trials
    #[arg(long, default_value_t = 0)]
    trials: u32,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,

    /// Print the strength table as CSV
    #[arg(long)]
    csv: bool,

    /// Side A groups to compare firepower for (comma separated)
    #[arg(long, value_delimiter = ',')]
    compare_a: Vec<String>,

    /// Side B groups to compare firepower for (comma separated)
    #[arg(long, value_delimiter = ',')]
    compare_b: Vec<String>,
}

#[derive(Error, Debug)]
enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Fleet(#[from] FleetError),
    #[error("Battle failed: {0}")]
    Battle(#[from] BattleError),
    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Report(#[from] ReportError),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("naval_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), SimError> {
    let loaded = load_scenario(&args.scenario)?;
    for warning in &loaded.warnings {
        eprintln!("Warning: {warning}");
    }
    let mut battle = loaded.battle;

    if !args.compare_a.is_empty() || !args.compare_b.is_empty() {
        print_firepower(&battle, &args.compare_a, &args.compare_b)?;
    }

    if args.trials > 0 {
        let seed = args.seed.unwrap_or(0);
        let summary = simulation::run_trials(&battle, args.trials, seed)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            print_summary(&summary);
        }
        return Ok(());
    }

    let mut roll: Box<dyn HitRoll> = match args.seed {
        Some(seed) => Box::new(SampledHits::new(ChaCha8Rng::seed_from_u64(seed))),
        None => Box::new(ExpectedHits),
    };
    battle.resolve_with(roll.as_mut())?;
    let report = battle.report();

    if args.json {
        println!("{}", report.to_json()?);
    } else if args.csv {
        print!("{}", report.to_csv()?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &BattleReport) {
    println!("{} ({})", report.name, report.profile);
    println!(
        "{:<6} {:>12} {:>8} {:>12} {:>8}",
        "time", report.side_a.name.chars().take(12).collect::<String>(), "status",
        report.side_b.name.chars().take(12).collect::<String>(), "status"
    );
    for row in &report.rows {
        println!(
            "{:<6} {:>12.2} {:>8.3} {:>12.2} {:>8.3}",
            row.time.to_string(),
            row.a_staying_power,
            row.a_status,
            row.b_staying_power,
            row.b_status
        );
    }
    println!();
    if let Some(termination) = report.termination {
        println!("Battle over after {} minutes: {}", report.pulses, termination);
    }
    for side in [&report.side_a, &report.side_b] {
        println!("{}: {:.1}% losses", side.name, side.losses);
        for ship in &side.ships {
            let hits: Vec<String> = ship
                .hits_received
                .iter()
                .map(|h| format!("{:.2} x {} in", h.hits, h.caliber))
                .collect();
            println!(
                "  {:<20} {:>4} {:>8.2}/{:<8.2} {}",
                ship.name,
                ship.hull.tag(),
                ship.hit_points,
                ship.staying_power,
                hits.join(", ")
            );
        }
    }
}

fn print_summary(summary: &simulation::TrialSummary) {
    println!("{} trials from seed {}", summary.trials, summary.seed);
    println!("mean length: {:.1} minutes", summary.mean_pulses);
    for (label, spread, eliminated) in [
        ("A", summary.side_a, summary.side_a_eliminated),
        ("B", summary.side_b, summary.side_b_eliminated),
    ] {
        println!(
            "side {label}: losses {:.1}% +/- {:.1} (min {:.1}, max {:.1}), eliminated {eliminated}",
            spread.mean, spread.std_dev, spread.min, spread.max
        );
    }
    if summary.mutual_destruction > 0 {
        println!("mutual destruction: {}", summary.mutual_destruction);
    }
}

fn print_firepower(battle: &Battle, side_a: &[String], side_b: &[String]) -> Result<(), SimError> {
    let a: Vec<&str> = side_a.iter().map(String::as_str).collect();
    let b: Vec<&str> = side_b.iter().map(String::as_str).collect();
    let comparison = battle.firepower_comparison(&a, &b)?;
    println!("Broadside firepower ({:?} hits per minute)", comparison.scale);
    println!("{:>8} {:>10} {:>10}", "range", "A", "B");
    for row in &comparison.rows {
        println!("{:>8} {:>10.3} {:>10.3}", row.range, row.side_a, row.side_b);
    }
    println!();
    Ok(())
}
