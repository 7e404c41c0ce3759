//! Landtally CLI - land-deal CSV reports
//!
//! # Main Command
//!
//! ```bash
//! landtally report                     # Full pipeline on the default files
//! landtally report --output out.json   # Custom report path
//! ```
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! landtally parse deals.csv            # Just parse one CSV to JSON rows
//! ```

use clap::{Parser, Subcommand};
use landtally::{load_inputs, load_table, run, MissingSizePolicy, PipelineOptions};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "landtally")]
#[command(about = "Clean, geocode and aggregate land-deal CSV exports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full report pipeline
    Report {
        /// Deals CSV file
        #[arg(long, default_value = "deals.csv")]
        deals: PathBuf,

        /// Investors CSV file
        #[arg(long, default_value = "investors.csv")]
        investors: PathBuf,

        /// Involvements CSV file
        #[arg(long, default_value = "involvements.csv")]
        involvements: PathBuf,

        /// Output JSON file
        #[arg(short, long, default_value = "importers.json")]
        output: PathBuf,

        /// Treat deals with no present size candidate as size zero
        /// instead of failing the run
        #[arg(long)]
        zero_missing_size: bool,
    },

    /// Parse a CSV file and output JSON rows
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Report {
            deals,
            investors,
            involvements,
            output,
            zero_missing_size,
        } => cmd_report(&deals, &investors, &involvements, output, zero_missing_size),

        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("✗ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_report(
    deals: &Path,
    investors: &Path,
    involvements: &Path,
    output: PathBuf,
    zero_missing_size: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Reading inputs:");
    eprintln!("   Deals: {}", deals.display());
    eprintln!("   Investors: {}", investors.display());
    eprintln!("   Involvements: {}", involvements.display());

    let inputs = load_inputs(deals, investors, involvements)?;
    eprintln!("   Encoding: {}", inputs.deals.encoding());

    let options = PipelineOptions {
        missing_size: if zero_missing_size {
            MissingSizePolicy::Zero
        } else {
            MissingSizePolicy::Fail
        },
        output,
    };

    let summary = run(&inputs, &options)?;

    eprintln!(
        "\nDone: {} of {} deals reported, {} importer countries",
        summary.deals_kept,
        summary.deals_loaded,
        summary.index.importers.len()
    );
    eprintln!("Report written to: {}", summary.output.display());
    Ok(())
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Parsing CSV: {}", input.display());

    let table = load_table(input)?;
    eprintln!("   Encoding: {}", table.encoding());
    eprintln!("   Columns: {}", table.headers().len());
    eprintln!("   Rows: {}", table.len());

    let json = serde_json::to_string_pretty(&table.json_rows())?;
    write_output(&json, output)?;

    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
