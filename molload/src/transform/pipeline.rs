//! End-to-end processing of one dataset.
//!
//! A run is a single synchronous pass:
//! 1. Stage the input (gzip datasets are expanded into a scratch file)
//! 2. Sniff the dialect and read the first row
//! 3. Reconcile the headings and load the prior field schema
//! 4. Process every record, writing the load-ready table and, when
//!    generating uuids, the rewritten dataset
//! 5. Merge the observed columns into the dataset's field schema
//!
//! Every check that can fail the run before a record is read (dialect,
//! headings, prior schema) happens before any output is written.
//!
//! # Example
//!
//! ```rust,no_run
//! use molload::config::{DatasetPaths, ProcessingConfig};
//! use molload::parser::DialectDetector;
//! use molload::toolkit::BasicToolkit;
//! use molload::transform::pipeline::run;
//!
//! let paths = DatasetPaths::new("mols.csv", "data/in", "data/out", None).unwrap();
//! let summary = run(
//!     &paths,
//!     &ProcessingConfig::default(),
//!     &DialectDetector::new(),
//!     &BasicToolkit::new(),
//! )
//! .unwrap();
//! println!("{} processed molecules", summary.counters.processed);
//! ```

use serde::Serialize;
use std::fs::{self, File};
use std::path::PathBuf;

use crate::compress;
use crate::config::{DatasetPaths, ProcessingConfig};
use crate::error::PipelineResult;
use crate::logs::{log_event, log_event_error, log_event_warning, log_info};
use crate::models::{OutcomeCounters, Record};
use crate::parser::{format_delimiter, read_first_row, Dialect, DialectDetector};
use crate::schema::{self, FieldSchema, MergeReport, ObservedFields};
use crate::toolkit::ChemToolkit;

use super::headings;
use super::identifier::{IdentifierLifecycle, IdentifierMode};
use super::record::{OutputSinks, RecordOutcome, RecordProcessor};

/// A progress line is logged every this many records.
pub const PROGRESS_INTERVAL: u64 = 50_000;

/// What a completed run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub counters: OutcomeCounters,
    #[serde(skip)]
    pub dialect: Dialect,
    pub headings: Vec<String>,
    pub loader_file: PathBuf,
    pub rewritten_file: Option<PathBuf>,
    pub schema_file: PathBuf,
    pub schema_changes: MergeReport,
}

/// Process one dataset.
///
/// Per-record failures are counted and logged; any error returned here is
/// fatal for the run. Scratch files are removed on every exit path.
pub fn run<T: ChemToolkit>(
    paths: &DatasetPaths,
    config: &ProcessingConfig,
    detector: &DialectDetector,
    toolkit: &T,
) -> PipelineResult<RunSummary> {
    let input = paths.input_file();
    log_event(format!("Processing {}", paths.filename));
    log_info(format!("Input file: {}", input.display()));
    log_info(format!(
        "Settings: generate_uuid={} header={}",
        config.generate_uuid, config.header
    ));

    fs::create_dir_all(&paths.output_dir)?;

    // 1. Stage
    let staged = if paths.is_gzip() {
        log_info("Expanding gzip input");
        Some(compress::decompress_to_scratch(&input, &paths.output_dir)?)
    } else {
        None
    };
    let source = staged.as_ref().map_or(input.as_path(), |s| s.path());

    // 2. Dialect
    let dialect = detector.detect_path(source)?;
    log_info(format!(
        "Detected delimiter '{}', encoding {}",
        format_delimiter(dialect.delimiter),
        dialect.encoding
    ));
    let first_row = read_first_row(source, &dialect)?;

    // 3. Headings
    let headings = headings::reconcile(&first_row, config, toolkit)?;
    if headings.inserted_identifier() {
        log_info("Inserted uuid column at position 1");
    }
    if let Some(position) = headings.moved_identifier() {
        log_info(format!("Moved uuid column from position {} to 1", position));
    }
    log_info(format!("Columns: {}", headings.names().join(", ")));

    let schema_file = paths.schema_file();
    let prior = FieldSchema::load(&schema_file)?;
    if prior.is_none() {
        log_info(format!("No schema at {}, starting a new one", schema_file.display()));
    }

    // 4. Records
    let identifiers = IdentifierLifecycle::new(IdentifierMode::from(config));
    let rewritten = if identifiers.generates() {
        Some(
            tempfile::Builder::new()
                .prefix(".molload-")
                .suffix(".rewritten")
                .tempfile_in(&paths.output_dir)?,
        )
    } else {
        None
    };
    let rewritten_sink = match &rewritten {
        Some(file) => Some((file.as_file().try_clone()?, &dialect, &headings)),
        None => None,
    };
    let mut sinks = OutputSinks::new(
        File::create(paths.loader_file())?,
        rewritten_sink,
        config.header,
    )?;

    let processor = RecordProcessor::new(toolkit, &headings, identifiers);
    let mut counters = OutcomeCounters::default();
    let mut observed = ObservedFields::from_headings(&headings);
    {
        let mut reader = dialect.reader_builder(config.header).from_path(source)?;
        let mut raw = csv::ByteRecord::new();
        while reader.read_byte_record(&mut raw)? {
            let mut record = Record::from_input(
                &headings,
                raw.iter().map(|field| dialect.decode(field).into_owned()),
            );
            let number = counters.start_record();

            let outcome = match processor.process(&mut record, number) {
                Ok(outcome) => outcome,
                Err(e) => {
                    log_event_error(format!(
                        "{} caused a failure in the chemistry toolkit (record {})",
                        record.smiles(&headings),
                        number
                    ));
                    return Err(e.into());
                }
            };

            match &outcome {
                RecordOutcome::Emitted(_) => counters.record_success(),
                RecordOutcome::FailedStandardization => {
                    counters.record_failure();
                    log_event_warning(format!(
                        "Record {}: could not standardize '{}'",
                        number,
                        record.smiles(&headings)
                    ));
                }
                RecordOutcome::FailedIdentifier { value } => {
                    counters.record_failure();
                    log_event_warning(format!("Record {}: invalid uuid '{}'", number, value));
                }
            }

            observed.observe_record(&headings, &record);
            sinks.emit(&outcome, &record)?;

            if number % PROGRESS_INTERVAL == 0 {
                log_info(format!("{} records processed", number));
            }
        }
    }
    sinks.finish()?;

    let rewritten_file = match rewritten {
        Some(file) => {
            let target = paths.rewritten_file();
            if paths.is_gzip() {
                compress::compress_into(file.path(), &target)?;
            } else {
                file.persist(&target).map_err(|e| e.error)?;
            }
            log_info(format!("Rewritten dataset: {}", target.display()));
            Some(target)
        }
        None => None,
    };
    drop(staged);

    // 5. Schema
    let (field_schema, schema_changes) =
        schema::reconcile(prior, &headings, &observed, &paths.filename);
    field_schema.save(&schema_file)?;
    log_schema_changes(&schema_changes);

    log_info(format!(
        "Processed {} records: {} succeeded, {} failed",
        counters.processed, counters.succeeded, counters.failed
    ));
    log_event(format!("{} processed molecules", counters.processed));

    Ok(RunSummary {
        counters,
        dialect,
        headings: headings.names().to_vec(),
        loader_file: paths.loader_file(),
        rewritten_file,
        schema_file,
        schema_changes,
    })
}

fn log_schema_changes(report: &MergeReport) {
    if report.is_empty() {
        log_info("Schema unchanged");
        return;
    }
    if !report.added.is_empty() {
        log_info(format!("Schema fields added: {}", report.added.join(", ")));
    }
    if !report.reactivated.is_empty() {
        log_info(format!("Schema fields reactivated: {}", report.reactivated.join(", ")));
    }
    if !report.deactivated.is_empty() {
        log_info(format!("Schema fields deactivated: {}", report.deactivated.join(", ")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DialectError, FormatError, PipelineError, ToolkitError, ToolkitResult};
    use crate::models::StandardizedDescriptor;
    use crate::toolkit::{BasicToolkit, Molecule, Standardized};
    use flate2::read::GzDecoder;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::{Read, Write};
    use std::path::Path;
    use tempfile::tempdir;
    use uuid::Uuid;

    const KNOWN_UUID: &str = "6f1c2d6e-1f4e-4c1e-9a38-0a3a9f1d2b7c";

    /// Faults on one structure, otherwise behaves like [`BasicToolkit`].
    struct FaultOn(&'static str);

    impl ChemToolkit for FaultOn {
        type Handle = Molecule;

        fn standardize(&self, smiles: &str) -> ToolkitResult<Option<Standardized<Molecule>>> {
            if smiles == self.0 {
                return Err(ToolkitError::new(smiles, "toolkit crashed"));
            }
            BasicToolkit.standardize(smiles)
        }

        fn structural_identifier(&self, handle: &Molecule) -> ToolkitResult<String> {
            BasicToolkit.structural_identifier(handle)
        }

        fn structural_identifier_hash(&self, identifier: &str) -> ToolkitResult<String> {
            BasicToolkit.structural_identifier_hash(identifier)
        }

        fn heavy_atom_count(&self, handle: &Molecule) -> ToolkitResult<u32> {
            BasicToolkit.heavy_atom_count(handle)
        }
    }

    struct Workspace {
        _root: tempfile::TempDir,
        input: PathBuf,
        output: PathBuf,
    }

    fn workspace() -> Workspace {
        let root = tempdir().unwrap();
        let input = root.path().join("in");
        let output = root.path().join("out");
        fs::create_dir_all(&input).unwrap();
        Workspace {
            input,
            output,
            _root: root,
        }
    }

    impl Workspace {
        fn paths(&self, filename: &str) -> DatasetPaths {
            DatasetPaths::new(filename, &self.input, &self.output, None).unwrap()
        }

        fn write(&self, filename: &str, content: &str) {
            fs::write(self.input.join(filename), content).unwrap();
        }
    }

    fn run_basic(paths: &DatasetPaths, config: ProcessingConfig) -> PipelineResult<RunSummary> {
        run(paths, &config, &DialectDetector::new(), &BasicToolkit)
    }

    fn validate_mode() -> ProcessingConfig {
        ProcessingConfig {
            generate_uuid: false,
            header: true,
        }
    }

    fn loader_rows(path: &Path) -> Vec<StandardizedDescriptor> {
        csv::Reader::from_path(path)
            .unwrap()
            .deserialize()
            .map(|row| row.unwrap())
            .collect()
    }

    fn rewritten_rows(path: &Path, has_headers: bool) -> Vec<Vec<String>> {
        csv::ReaderBuilder::new()
            .has_headers(has_headers)
            .from_path(path)
            .unwrap()
            .records()
            .map(|row| row.unwrap().iter().map(String::from).collect())
            .collect()
    }

    fn leftovers(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with(".molload-"))
            .collect()
    }

    #[test]
    fn test_single_record_generate_mode() {
        let ws = workspace();
        ws.write("mols.csv", "smiles,uuid\nCCO,\n");
        let paths = ws.paths("mols.csv");

        let summary = run_basic(&paths, ProcessingConfig::default()).unwrap();
        assert_eq!(summary.counters.processed, 1);
        assert_eq!(summary.counters.succeeded, 1);
        assert!(summary.counters.is_balanced());

        let rows = loader_rows(&summary.loader_file);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].canonical_smiles, "CCO");
        assert_eq!(rows[0].heavy_atom_count, 3);
        assert_eq!(rows[0].record_number, 1);
        assert!(Uuid::parse_str(&rows[0].record_identifier).is_ok());

        let rewritten = rewritten_rows(summary.rewritten_file.as_deref().unwrap(), true);
        assert_eq!(rewritten, vec![vec!["CCO".to_string(), rows[0].record_identifier.clone()]]);
        assert!(leftovers(&ws.output).is_empty());
    }

    #[test]
    fn test_loader_heading_row() {
        let ws = workspace();
        ws.write("mols.csv", "smiles,uuid\nCCO,\n");
        let summary = run_basic(&ws.paths("mols.csv"), ProcessingConfig::default()).unwrap();
        let text = fs::read_to_string(summary.loader_file).unwrap();
        assert!(text.starts_with("smiles,inchis,inchik,hac,molecule-uuid,rec_number\n"));
    }

    #[test]
    fn test_failed_record_kept_in_rewritten_copy() {
        let ws = workspace();
        ws.write(
            "mols.csv",
            "smiles,name\nCCO,ethanol\nC1CC,broken\nCC,ethane\n",
        );
        let summary = run_basic(&ws.paths("mols.csv"), ProcessingConfig::default()).unwrap();
        assert_eq!(summary.counters.processed, 3);
        assert_eq!(summary.counters.failed, 1);
        assert_eq!(summary.counters.succeeded, 2);
        assert_eq!(summary.headings, vec!["smiles", "uuid", "name"]);

        let rows = loader_rows(&summary.loader_file);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].record_number, 1);
        assert_eq!(rows[1].record_number, 3);
        assert_eq!(rows[1].canonical_smiles, "CC");

        let rewritten = rewritten_rows(summary.rewritten_file.as_deref().unwrap(), false);
        assert_eq!(rewritten[0], vec!["smiles", "uuid", "name"]);
        assert_eq!(rewritten.len(), 4);
        assert_eq!(rewritten[2], vec!["C1CC", "", "broken"]);
        assert_eq!(rewritten[1][1], rows[0].record_identifier);
        assert_eq!(rewritten[3][1], rows[1].record_identifier);
    }

    #[test]
    fn test_generated_identifiers_replace_existing_ones() {
        let ws = workspace();
        ws.write("mols.csv", &format!("smiles,uuid\nCCO,{}\nC1CC,{}\n", KNOWN_UUID, KNOWN_UUID));
        let summary = run_basic(&ws.paths("mols.csv"), ProcessingConfig::default()).unwrap();

        let rewritten = rewritten_rows(summary.rewritten_file.as_deref().unwrap(), true);
        assert_ne!(rewritten[0][1], KNOWN_UUID);
        assert!(Uuid::parse_str(&rewritten[0][1]).is_ok());
        assert_eq!(rewritten[1][1], "");
    }

    #[test]
    fn test_validate_mode_invalid_identifier() {
        let ws = workspace();
        ws.write(
            "mols.csv",
            &format!("smiles,uuid\nCCO,{}\nCC,not-a-uuid\n", KNOWN_UUID),
        );
        let summary = run_basic(&ws.paths("mols.csv"), validate_mode()).unwrap();
        assert_eq!(summary.counters.processed, 2);
        assert_eq!(summary.counters.failed, 1);
        assert_eq!(summary.counters.succeeded, 1);
        assert!(summary.rewritten_file.is_none());
        assert!(!ws.output.join("mols.csv").exists());

        let rows = loader_rows(&summary.loader_file);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].record_identifier, KNOWN_UUID);
        assert!(leftovers(&ws.output).is_empty());
    }

    #[test]
    fn test_validate_mode_requires_uuid_column() {
        let ws = workspace();
        ws.write("mols.csv", "smiles,name\nCCO,ethanol\n");
        let err = run_basic(&ws.paths("mols.csv"), validate_mode()).unwrap_err();
        assert!(matches!(err, PipelineError::Format(FormatError::IdentifierColumn(_))));
    }

    #[test]
    fn test_gzip_input() {
        let ws = workspace();
        let mut encoder = GzEncoder::new(
            File::create(ws.input.join("mols.csv.gz")).unwrap(),
            Compression::default(),
        );
        encoder.write_all(b"smiles,uuid\nCCO,\nC1CC,\n").unwrap();
        encoder.finish().unwrap();

        let summary = run_basic(&ws.paths("mols.csv.gz"), ProcessingConfig::default()).unwrap();
        assert_eq!(summary.counters.succeeded, 1);
        assert_eq!(summary.counters.failed, 1);

        let target = ws.output.join("mols.csv.gz");
        assert_eq!(summary.rewritten_file.as_deref(), Some(target.as_path()));
        let mut text = String::new();
        GzDecoder::new(File::open(&target).unwrap())
            .read_to_string(&mut text)
            .unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "smiles,uuid");
        assert_eq!(lines[2], "C1CC,");

        let mut names: Vec<_> = fs::read_dir(&ws.output)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["mols.csv.gz", "mols.schema.json", "tmploaderfile.csv"]);
    }

    #[test]
    fn test_toolkit_fault_is_fatal() {
        let ws = workspace();
        ws.write("mols.csv", "smiles,uuid\nCCO,\nC[Fault],\nCC,\n");
        let paths = ws.paths("mols.csv");

        let err = run(
            &paths,
            &ProcessingConfig::default(),
            &DialectDetector::new(),
            &FaultOn("C[Fault]"),
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::Toolkit(ref e) if e.smiles == "C[Fault]"));
        assert!(leftovers(&ws.output).is_empty());
        assert!(!paths.schema_file().exists());
        assert!(!paths.rewritten_file().exists());
    }

    #[test]
    fn test_headerless_input() {
        let ws = workspace();
        ws.write("mols.tsv", "CCO\tethanol\nCC\tethane\n");
        let config = ProcessingConfig {
            generate_uuid: true,
            header: false,
        };
        let summary = run_basic(&ws.paths("mols.tsv"), config).unwrap();
        assert_eq!(summary.dialect.delimiter, b'\t');
        assert_eq!(summary.headings, vec!["smiles", "uuid", "column_2"]);
        assert_eq!(summary.counters.succeeded, 2);

        let text = fs::read_to_string(summary.rewritten_file.unwrap()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("CCO\t"));
        assert!(lines[0].ends_with("\tethanol"));

        let rows = loader_rows(&summary.loader_file);
        assert_eq!(rows.iter().map(|r| r.record_number).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_ragged_rows_are_squared() {
        let ws = workspace();
        // Keep the ragged rows past the sniffed prefix
        let mut content = "smiles,uuid,name\n".to_string();
        content.push_str(&"CCO,,ethanol\n".repeat(100));
        content.push_str("CCO,,ethanol,extra\nCC\n");
        ws.write("mols.csv", &content);
        let summary = run_basic(&ws.paths("mols.csv"), ProcessingConfig::default()).unwrap();
        assert_eq!(summary.counters.succeeded, 102);

        let rewritten = rewritten_rows(summary.rewritten_file.as_deref().unwrap(), true);
        assert!(rewritten.iter().all(|row| row.len() == 3));
        assert_eq!(rewritten[100][2], "ethanol");
        assert_eq!(rewritten[101][0], "CC");
        assert_eq!(rewritten[101][2], "");
    }

    #[test]
    fn test_in_place_rewrite() {
        let ws = workspace();
        ws.write("mols.csv", "smiles,uuid\nCCO,\n");
        let paths = DatasetPaths::new("mols.csv", &ws.input, &ws.input, None).unwrap();

        let summary = run_basic(&paths, ProcessingConfig::default()).unwrap();
        let rewritten = rewritten_rows(&paths.input_file(), true);
        assert_eq!(rewritten.len(), 1);
        assert_eq!(rewritten[0][1], loader_rows(&summary.loader_file)[0].record_identifier);
    }

    #[test]
    fn test_schema_tracks_versions() {
        let ws = workspace();
        ws.write("mols.csv", "smiles,uuid,mw,name\nCCO,,46.07,ethanol\n");
        let paths = ws.paths("mols.csv");
        let first = run_basic(&paths, ProcessingConfig::default()).unwrap();
        assert_eq!(first.schema_changes.added, vec!["mw", "name"]);

        ws.write("mols.csv", "smiles,uuid,mw\nCC,,30.07\n");
        let second = run_basic(&paths, ProcessingConfig::default()).unwrap();
        assert_eq!(second.schema_changes.deactivated, vec!["name"]);

        let schema = FieldSchema::load(&paths.schema_file()).unwrap().unwrap();
        assert!(!schema.fields["name"].active);
        assert!(schema.fields["mw"].active);
        assert_eq!(schema.fields["mw"].field_type, schema::FieldType::Number);
        assert!(schema.description.contains("mols.csv"));

        let third = run_basic(&paths, ProcessingConfig::default()).unwrap();
        assert!(third.schema_changes.is_empty());
    }

    #[test]
    fn test_schema_dir_override() {
        let ws = workspace();
        ws.write("mols.csv", "smiles,uuid\nCCO,\n");
        let schema_dir = ws.output.join("schemas");
        let paths =
            DatasetPaths::new("mols.csv", &ws.input, &ws.output, Some(schema_dir.clone())).unwrap();
        let summary = run_basic(&paths, ProcessingConfig::default()).unwrap();
        assert_eq!(summary.schema_file, schema_dir.join("mols.schema.json"));
        assert!(summary.schema_file.exists());
    }

    #[test]
    fn test_undetectable_dialect() {
        let ws = workspace();
        ws.write("mols.csv", "smiles;uuid\nCCO;\n");
        let err = run_basic(&ws.paths("mols.csv"), ProcessingConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Dialect(DialectError::Undetectable { .. })));

        let summary = run(
            &ws.paths("mols.csv"),
            &ProcessingConfig::default(),
            &DialectDetector::with_candidates(*b";\t"),
            &BasicToolkit,
        )
        .unwrap();
        assert_eq!(summary.counters.succeeded, 1);
    }

    #[test]
    fn test_missing_input_is_fatal() {
        let ws = workspace();
        let err = run_basic(&ws.paths("absent.csv"), ProcessingConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Dialect(DialectError::IoError(_))));
    }

    #[test]
    fn test_latin1_values_survive() {
        let ws = workspace();
        let mut content = b"smiles,uuid,name\nCCO,,".to_vec();
        content.extend_from_slice(&[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9]);
        content.push(b'\n');
        fs::write(ws.input.join("mols.csv"), content).unwrap();

        let summary = run_basic(&ws.paths("mols.csv"), ProcessingConfig::default()).unwrap();
        assert_eq!(summary.counters.succeeded, 1);
        let rewritten = fs::read(summary.rewritten_file.unwrap()).unwrap();
        assert!(rewritten.windows(4).any(|w| w == b"Soci"));
        if summary.dialect.encoding != "utf-8" {
            assert!(rewritten.windows(3).any(|w| w == [0xE9, 0x74, 0xE9]));
        }
    }

    #[test]
    fn test_invalid_prior_schema_leaves_input_untouched() {
        let ws = workspace();
        ws.write("mols.csv", "smiles,uuid\nCCO,\n");
        ws.write("mols.schema.json", r#"{"description":"x"}"#);
        let paths = DatasetPaths::new("mols.csv", &ws.input, &ws.input, None).unwrap();

        let err = run_basic(&paths, ProcessingConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Schema(_)));
        assert_eq!(fs::read_to_string(paths.input_file()).unwrap(), "smiles,uuid\nCCO,\n");
        assert!(!paths.loader_file().exists());
        assert!(leftovers(&ws.input).is_empty());
    }

    #[test]
    fn test_misplaced_uuid_column_moved() {
        let ws = workspace();
        ws.write(
            "mols.csv",
            &format!("smiles,name,uuid\nCCO,ethanol,{}\nCC,ethane,\n", KNOWN_UUID),
        );
        let summary = run_basic(&ws.paths("mols.csv"), ProcessingConfig::default()).unwrap();
        assert_eq!(summary.headings, vec!["smiles", "uuid", "name"]);
        assert_eq!(summary.counters.succeeded, 2);

        let rows = loader_rows(&summary.loader_file);
        let rewritten = rewritten_rows(summary.rewritten_file.as_deref().unwrap(), true);
        assert_eq!(rewritten.len(), 2);
        assert_eq!(rewritten[0][2], "ethanol");
        assert_eq!(rewritten[0][1], rows[0].record_identifier);
        assert_ne!(rewritten[0][1], KNOWN_UUID);
        assert_eq!(rewritten[1][0], "CC");
        assert_eq!(rewritten[1][1], rows[1].record_identifier);
        assert_eq!(rewritten[1][2], "ethane");
    }
}
