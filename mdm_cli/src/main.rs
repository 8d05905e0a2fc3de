//! # mdm - Moment Distribution CLI
//!
//! Terminal front end for `mdm_core`. Plays the role of the UI layer: it
//! assembles a raw payload (from a JSON file or a built-in preset), hands it
//! to the solver, and renders the returned iteration history as the classic
//! hand-calculation table: one column per member end, DF/COF/initial-moment
//! header rows, a Balance and Carry-over row per pass, and the final Total
//! row. `--json` emits the raw history instead, for machine consumers.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use mdm_core::engine::solve;
use mdm_core::history::ResultHistory;
use mdm_core::input::RawStructureInput;
use mdm_core::model::StructureModel;
use mdm_core::validate::validate;
use mdm_core::{presets, SolveOptions};

#[derive(Parser)]
#[command(name = "mdm", version, about = "Moment distribution method solver")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a payload file (JSON, see mdm_core::input docs for the shape)
    Solve {
        /// Path to the payload file
        path: PathBuf,

        /// Emit the raw iteration history as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Solve a built-in example structure
    Demo {
        /// Which example to run (see `mdm presets`)
        #[arg(long, default_value = "portal-frame")]
        preset: String,

        /// Emit the raw iteration history as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List the built-in example structures
    Presets,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Solve { path, json } => {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("reading payload file '{}'", path.display()))?;
            let raw: RawStructureInput = serde_json::from_str(&text)
                .with_context(|| format!("parsing payload file '{}'", path.display()))?;
            run(&raw, json)
        }
        Command::Demo { preset, json } => {
            let Some(preset) = presets::by_name(&preset) else {
                bail!(
                    "unknown preset '{preset}' (available: {})",
                    preset_names().join(", ")
                );
            };
            log::info!("running preset '{}': {}", preset.name, preset.description);
            run(&preset.input, json)
        }
        Command::Presets => {
            for preset in presets::all() {
                println!("{:<16} {}", preset.name, preset.description);
            }
            Ok(())
        }
    }
}

fn preset_names() -> Vec<&'static str> {
    presets::all().iter().map(|p| p.name).collect()
}

fn run(raw: &RawStructureInput, as_json: bool) -> Result<()> {
    let validated = match validate(raw) {
        Ok(validated) => validated,
        Err(error) => {
            eprintln!("Input error: {error}");
            if let Ok(json) = serde_json::to_string_pretty(&error) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{json}");
            }
            bail!("payload rejected by validation ({})", error.error_code());
        }
    };

    log::debug!(
        "solving {} joints, max {} passes, tolerance {}%",
        validated.model.joint_count(),
        validated.options.max_iterations,
        validated.options.min_error_percent
    );

    let history = solve(&validated.model, &validated.options);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&history)?);
    } else {
        render_table(&validated.model, &validated.options, &history);
    }
    Ok(())
}

/// Width of one member-end column in the rendered table
const COL: usize = 10;
/// Width of the row-label column
const LABEL: usize = 9;

/// Render the distribution table the way it is written out by hand:
/// member-end columns grouped by joint, factor rows, then Balance and
/// Carry-over per pass, then the Total row.
fn render_table(model: &StructureModel, options: &SolveOptions, history: &ResultHistory) {
    let labels = model.labels();

    // One column per member end (near joint first, then the far joint it
    // faces), grouped by near joint as in the classic sheet.
    let columns: Vec<(usize, usize)> = (0..model.joint_count())
        .flat_map(|near| {
            model
                .connectivity()
                .neighbors(near)
                .map(move |far| (near, far))
        })
        .collect();

    println!("Moment Distribution Calculation Results");
    println!();

    // Joint row: label each group of columns once.
    print!("{:<LABEL$}", "Joint");
    let mut previous_near = usize::MAX;
    for &(near, _) in &columns {
        if near != previous_near {
            print!("{:>COL$}", labels[near]);
            previous_near = near;
        } else {
            print!("{:>COL$}", "");
        }
    }
    println!();

    // Member-end row: moment at `near` within member near-far.
    print!("{:<LABEL$}", "Moment");
    for &(near, far) in &columns {
        print!(
            "{:>COL$}",
            format!("M{}{}", labels[near].to_lowercase(), labels[far].to_lowercase())
        );
    }
    println!();

    value_row("DF", &columns, |near, far| model.distribution().get(far, near));
    value_row("COF", &columns, |near, far| model.carry_over().get(near, far));
    value_row("Init M", &columns, |near, far| model.initial().get(far, near));
    println!();

    for record in &history.records {
        value_row("Balance", &columns, |near, far| record.balance.get(far, near));
        value_row("C.O.", &columns, |near, far| record.carry_over.get(far, near));
    }
    println!();
    value_row("Total", &columns, |near, far| {
        history.final_total.get(far, near)
    });

    println!();
    match history.last_max_error_percent() {
        Some(error) if history.converged(options.min_error_percent) => {
            println!(
                "Converged in {} of {} passes (max error {:.6}% < {}%)",
                history.iteration_count, options.max_iterations, error, options.min_error_percent
            );
        }
        Some(error) => {
            println!(
                "Did NOT reach {}% after {} passes (max error {:.6}%)",
                options.min_error_percent, history.iteration_count, error
            );
        }
        None => {
            println!("Single pass requested; no convergence check performed");
        }
    }
}

fn value_row(label: &str, columns: &[(usize, usize)], value: impl Fn(usize, usize) -> f64) {
    print!("{label:<LABEL$}");
    for &(near, far) in columns {
        print!("{:>COL$.3}", value(near, far));
    }
    println!();
}
