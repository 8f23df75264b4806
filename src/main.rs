//! WDBC Scorer - command line front end
//!
//! Runs the same collector -> scorer -> classifier pipeline as the API:
//! - `predict` scores four raw measurements
//! - `fields` lists the measurements and their reference ranges

use clap::{Parser, Subcommand};
use eyre::{bail, Result};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use wdbc_scorer::api::types::{FieldInfo, PredictionResponse};
use wdbc_scorer::utils::constants::{reference_ranges_hint, FIELD_SPECS};
use wdbc_scorer::{Field, InputCollector, Predictor, DISCLAIMER};

#[derive(Parser, Debug)]
#[command(name = "wdbc_scorer", version, about = "Educational WDBC-style tumour score")]
struct Cli {
    /// Verbose logging (shows logit and probability)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score four measurements
    Predict {
        /// Mean radius (e.g. 14.5)
        #[arg(allow_hyphen_values = true)]
        mean_radius: String,
        /// Texture (e.g. 19.3)
        #[arg(allow_hyphen_values = true)]
        texture: String,
        /// Smoothness (e.g. 0.1)
        #[arg(allow_hyphen_values = true)]
        smoothness: String,
        /// Compactness (e.g. 0.12)
        #[arg(allow_hyphen_values = true)]
        compactness: String,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
        /// Include the per-feature breakdown
        #[arg(long)]
        explain: bool,
    },
    /// List input fields and reference ranges
    Fields {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging (stderr so --json output stays clean)
    FmtSubscriber::builder()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    match cli.command {
        Command::Predict {
            mean_radius,
            texture,
            smoothness,
            compactness,
            json,
            explain,
        } => {
            let collector = InputCollector::from_raw(&mean_radius, &texture, &smoothness, &compactness);
            run_predict(&collector, json, explain)
        }
        Command::Fields { json } => run_fields(json),
    }
}

fn run_predict(collector: &InputCollector, json: bool, explain: bool) -> Result<()> {
    if !collector.is_ready() {
        for err in collector.errors() {
            eprintln!("❌ {}", err);
        }
        eprintln!("   {}", reference_ranges_hint());
        bail!("{} field(s) incomplete", collector.incomplete_fields().len());
    }

    let predictor = Predictor::new();
    let prediction = predictor.predict_form(collector)?;
    let input = prediction.input;
    let breakdown = predictor.scorer().breakdown(&input);

    if json {
        let mut response = PredictionResponse::from(prediction);
        if explain {
            response = response.with_breakdown(breakdown);
        }
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    let result = &prediction.result;
    println!("{}", result.summary());
    println!("   {}", result.explanation);
    println!();
    println!("Feature Summary:");
    for field in Field::ALL {
        println!("   {:<12} {}", format!("{}:", field.spec().label), input.get(field));
    }

    if explain {
        println!();
        println!("Breakdown:");
        for field in Field::ALL {
            let i = field.index();
            println!(
                "   {:<12} normalized {:>8.4}  contribution {:>8.4}",
                field.key(),
                breakdown.normalized[i],
                breakdown.contributions[i]
            );
        }
        println!("   bias {:.4}, logit {:.4}, probability {:.4}", breakdown.bias, breakdown.logit, breakdown.probability);
    }

    println!();
    println!("{}", DISCLAIMER);
    Ok(())
}

fn run_fields(json: bool) -> Result<()> {
    if json {
        let fields: Vec<FieldInfo> = FIELD_SPECS.iter().map(FieldInfo::from).collect();
        println!("{}", serde_json::to_string_pretty(&fields)?);
        return Ok(());
    }

    for spec in FIELD_SPECS.iter() {
        println!(
            "{:<12} {:<14} {:>6} – {:<6} ({})",
            spec.field.key(),
            spec.label,
            spec.reference_min,
            spec.reference_max,
            spec.placeholder
        );
    }
    println!();
    println!("Reference ranges are hints only; out-of-range values are scored as given.");
    Ok(())
}
