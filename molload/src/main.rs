//! Molload CLI - Normalize chemical structure datasets
//!
//! # Main Commands
//!
//! ```bash
//! molload process                   # Process the dataset named by DT_DATASET_* variables
//! molload process --filename mols.csv --input-path in --output-path out
//! ```
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! molload sniff mols.csv            # Show detected dialect and first row
//! molload standardize CCO c1ccccc1  # Show toolkit output per structure
//! molload schema out/mols.schema.json  # Check and print a field schema
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use molload::compress::decompress_to_scratch;
use molload::config::GZIP_SUFFIX;
use molload::logs::{self, log_event_error, log_info};
use molload::parser::{format_delimiter, DEFAULT_CANDIDATES};
use molload::{
    describe, read_first_row, run, BasicToolkit, ChemToolkit, DatasetPaths, DialectDetector,
    FieldSchema, ProcessingConfig, RunSummary,
};
use serde_json::json;
use std::error::Error;
use std::path::{Path, PathBuf};

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "molload")]
#[command(about = "Standardize chemical structure files into load-ready tables", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum ToolkitChoice {
    /// Built-in SMILES reader
    #[default]
    Basic,
    /// RDKit through embedded Python (needs the `rdkit` feature)
    Rdkit,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a dataset: standardize, assign uuids, write outputs, merge the field schema
    Process {
        /// Dataset file name, optionally ending in .gz
        #[arg(long, env = "DT_DATASET_FILENAME")]
        filename: String,

        /// Directory holding the dataset
        #[arg(long, env = "DT_DATASET_INPUT_PATH")]
        input_path: PathBuf,

        /// Directory receiving the outputs
        #[arg(long, env = "DT_DATASET_OUTPUT_PATH")]
        output_path: PathBuf,

        /// Parameters, e.g. "generate_uuid=false&header=true"
        #[arg(long, env = "DT_DATASET_EXTRA_VARIABLES")]
        extra_variables: Option<String>,

        /// Directory holding field schemas (default: output path)
        #[arg(long, env = "DT_DATASET_SCHEMA_PATH")]
        schema_path: Option<PathBuf>,

        /// Candidate delimiters in preference order (use \t for tab)
        #[arg(short, long)]
        delimiters: Option<String>,

        /// Chemistry toolkit
        #[arg(short, long, value_enum, default_value_t)]
        toolkit: ToolkitChoice,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the detected dialect and first row of a file
    Sniff {
        /// Input file (csv, tsv, optionally .gz)
        input: PathBuf,

        /// Candidate delimiters in preference order (use \t for tab)
        #[arg(short, long)]
        delimiters: Option<String>,
    },

    /// Standardize structures and print their descriptors
    Standardize {
        /// SMILES strings
        #[arg(required = true)]
        smiles: Vec<String>,

        /// Chemistry toolkit
        #[arg(short, long, value_enum, default_value_t)]
        toolkit: ToolkitChoice,
    },

    /// Validate and print a field schema document
    Schema {
        /// Schema document (<dataset>.schema.json)
        file: PathBuf,
    },
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();
    logs::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Process {
            filename,
            input_path,
            output_path,
            extra_variables,
            schema_path,
            delimiters,
            toolkit,
            json,
        } => cmd_process(
            filename,
            input_path,
            output_path,
            extra_variables.as_deref(),
            schema_path,
            delimiters.as_deref(),
            toolkit,
            json,
        ),

        Commands::Sniff { input, delimiters } => cmd_sniff(&input, delimiters.as_deref()),

        Commands::Standardize { smiles, toolkit } => cmd_standardize(&smiles, toolkit),

        Commands::Schema { file } => cmd_schema(&file),
    };

    if let Err(e) = result {
        log_event_error(format!("Error: {}", e));
        std::process::exit(1);
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_process(
    filename: String,
    input_path: PathBuf,
    output_path: PathBuf,
    extra_variables: Option<&str>,
    schema_path: Option<PathBuf>,
    delimiters: Option<&str>,
    toolkit: ToolkitChoice,
    json: bool,
) -> CliResult<()> {
    log_info(format!("DT_DATASET_FILENAME: {}", filename));
    log_info(format!("DT_DATASET_INPUT_PATH: {}", input_path.display()));
    log_info(format!("DT_DATASET_OUTPUT_PATH: {}", output_path.display()));
    log_info(format!(
        "DT_DATASET_EXTRA_VARIABLES: {}",
        extra_variables.unwrap_or("")
    ));
    if let Some(ref dir) = schema_path {
        log_info(format!("DT_DATASET_SCHEMA_PATH: {}", dir.display()));
    }

    let config = ProcessingConfig::from_parameters(extra_variables)?;
    let paths = DatasetPaths::new(filename, input_path, output_path, schema_path)?;
    let detector = detector_for(delimiters)?;

    let summary = match toolkit {
        ToolkitChoice::Basic => run(&paths, &config, &detector, &BasicToolkit::new())?,
        ToolkitChoice::Rdkit => run_rdkit(&paths, &config, &detector)?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}

#[cfg(feature = "rdkit")]
fn run_rdkit(
    paths: &DatasetPaths,
    config: &ProcessingConfig,
    detector: &DialectDetector,
) -> CliResult<RunSummary> {
    let toolkit = molload::RdkitToolkit::init()?;
    Ok(run(paths, config, detector, &toolkit)?)
}

#[cfg(not(feature = "rdkit"))]
fn run_rdkit(_: &DatasetPaths, _: &ProcessingConfig, _: &DialectDetector) -> CliResult<RunSummary> {
    Err(rdkit_unavailable())
}

fn rdkit_unavailable() -> Box<dyn Error> {
    "molload was built without the rdkit feature".into()
}

/// Candidate delimiters from a flag value such as `;\t`.
fn detector_for(delimiters: Option<&str>) -> CliResult<DialectDetector> {
    let Some(flag) = delimiters else {
        return Ok(DialectDetector::new());
    };
    let flag = flag.replace("\\t", "\t");
    let mut candidates = Vec::with_capacity(flag.len());
    for c in flag.chars() {
        if !c.is_ascii() || c == '"' || c == '\n' || c == '\r' {
            return Err(format!("Unusable delimiter: {:?}", c).into());
        }
        candidates.push(c as u8);
    }
    if candidates.is_empty() {
        candidates.extend_from_slice(&DEFAULT_CANDIDATES);
    }
    Ok(DialectDetector::with_candidates(candidates))
}

fn cmd_sniff(input: &Path, delimiters: Option<&str>) -> CliResult<()> {
    let detector = detector_for(delimiters)?;

    let staged = if input.to_string_lossy().ends_with(GZIP_SUFFIX) {
        Some(decompress_to_scratch(input, &std::env::temp_dir())?)
    } else {
        None
    };
    let source = staged.as_ref().map_or(input, |s| s.path());

    let dialect = detector.detect_path(source)?;
    let first_row = read_first_row(source, &dialect)?;

    println!("Delimiter: '{}'", format_delimiter(dialect.delimiter));
    println!("Quote: '{}'", char::from(dialect.quote));
    println!("Encoding: {}", dialect.encoding);
    println!("First row ({} columns):", first_row.len());
    for (i, value) in first_row.iter().enumerate() {
        println!("  [{:2}] {}", i + 1, value);
    }
    Ok(())
}

fn cmd_standardize(smiles: &[String], toolkit: ToolkitChoice) -> CliResult<()> {
    match toolkit {
        ToolkitChoice::Basic => print_descriptors(&BasicToolkit::new(), smiles),
        ToolkitChoice::Rdkit => standardize_rdkit(smiles),
    }
}

#[cfg(feature = "rdkit")]
fn standardize_rdkit(smiles: &[String]) -> CliResult<()> {
    print_descriptors(&molload::RdkitToolkit::init()?, smiles)
}

#[cfg(not(feature = "rdkit"))]
fn standardize_rdkit(_: &[String]) -> CliResult<()> {
    Err(rdkit_unavailable())
}

fn print_descriptors<T: ChemToolkit>(toolkit: &T, inputs: &[String]) -> CliResult<()> {
    for input in inputs {
        let line = match toolkit.standardize(input)? {
            Some(standardized) => {
                let d = describe(toolkit, &standardized)?;
                json!({
                    "input": input,
                    "smiles": d.canonical_smiles,
                    "inchis": d.structural_identifier,
                    "inchik": d.structural_identifier_hash,
                    "hac": d.heavy_atom_count,
                })
            }
            None => json!({ "input": input, "error": "could not standardize" }),
        };
        println!("{}", line);
    }
    Ok(())
}

fn cmd_schema(file: &Path) -> CliResult<()> {
    let schema = FieldSchema::load(file)?
        .ok_or_else(|| format!("No schema document at {}", file.display()))?;

    eprintln!("{}", schema.description);
    eprintln!(
        "{} fields, {} active",
        schema.fields.len(),
        schema.active_fields().count()
    );
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
