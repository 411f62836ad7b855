//! Per-record processing.
//!
//! Each input record becomes exactly one [`RecordOutcome`]. Failures that are
//! the data's fault are outcomes; a toolkit fault is an error and ends the run.

use std::io::{self, Write};

use crate::error::ToolkitResult;
use crate::models::{HeadingSet, Record, StandardizedDescriptor, LOADER_COLUMNS};
use crate::parser::Dialect;
use crate::toolkit::{describe, ChemToolkit};

use super::identifier::IdentifierLifecycle;

/// What happened to one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Standardized and identified; one row for the load-ready table.
    Emitted(StandardizedDescriptor),
    /// The toolkit could not standardize the structure.
    FailedStandardization,
    /// The existing identifier is not a uuid (validation mode only).
    FailedIdentifier { value: String },
}

impl RecordOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Emitted(_))
    }
}

/// Runs single records through standardize, identify, derive.
pub struct RecordProcessor<'a, T: ChemToolkit> {
    toolkit: &'a T,
    headings: &'a HeadingSet,
    identifiers: IdentifierLifecycle,
}

impl<'a, T: ChemToolkit> RecordProcessor<'a, T> {
    pub fn new(
        toolkit: &'a T,
        headings: &'a HeadingSet,
        identifiers: IdentifierLifecycle,
    ) -> Self {
        Self {
            toolkit,
            headings,
            identifiers,
        }
    }

    /// Process one record.
    ///
    /// In generate mode the record's identifier column is rewritten in place:
    /// the fresh uuid on success, empty on failure.
    pub fn process(
        &self,
        record: &mut Record,
        record_number: u64,
    ) -> ToolkitResult<RecordOutcome> {
        let smiles = record.smiles(self.headings).trim().to_string();

        let Some(standardized) = self.toolkit.standardize(&smiles)? else {
            self.clear_identifier(record);
            return Ok(RecordOutcome::FailedStandardization);
        };

        let existing = record.identifier(self.headings).to_string();
        let Some(identifier) = self.identifiers.resolve(&existing) else {
            return Ok(RecordOutcome::FailedIdentifier { value: existing });
        };

        let descriptors = describe(self.toolkit, &standardized)?;

        if self.identifiers.generates() {
            record.set(self.headings, self.headings.identifier_column(), identifier.as_str());
        }

        Ok(RecordOutcome::Emitted(StandardizedDescriptor {
            canonical_smiles: descriptors.canonical_smiles,
            structural_identifier: descriptors.structural_identifier,
            structural_identifier_hash: descriptors.structural_identifier_hash,
            heavy_atom_count: descriptors.heavy_atom_count,
            record_identifier: identifier,
            record_number,
        }))
    }

    fn clear_identifier(&self, record: &mut Record) {
        if self.identifiers.generates() {
            record.set(self.headings, self.headings.identifier_column(), "");
        }
    }
}

/// The two output tables of a run.
///
/// The load-ready table is comma-delimited UTF-8 and always has a heading row.
/// The rewritten dataset exists only in generate mode. It uses the input
/// dialect, encoding included, and repeats the heading row only when the input
/// had one.
pub struct OutputSinks<W: Write> {
    loader: csv::Writer<W>,
    rewritten: Option<(csv::Writer<W>, Dialect)>,
}

impl<W: Write> OutputSinks<W> {
    /// Open the sinks and write their heading rows.
    pub fn new(
        loader: W,
        rewritten: Option<(W, &Dialect, &HeadingSet)>,
        write_headings: bool,
    ) -> csv::Result<Self> {
        let mut loader = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(loader);
        loader.write_record(LOADER_COLUMNS)?;

        let rewritten = match rewritten {
            Some((out, dialect, headings)) => {
                let mut writer = dialect.writer_builder().has_headers(false).from_writer(out);
                if write_headings {
                    writer.write_record(headings.names().iter().map(|n| dialect.encode(n)))?;
                }
                Some((writer, dialect.clone()))
            }
            None => None,
        };

        Ok(Self { loader, rewritten })
    }

    /// Write a processed record to the sinks it belongs in.
    pub fn emit(&mut self, outcome: &RecordOutcome, record: &Record) -> csv::Result<()> {
        if let RecordOutcome::Emitted(descriptor) = outcome {
            self.loader.serialize(descriptor)?;
        }
        if let Some((writer, dialect)) = self.rewritten.as_mut() {
            writer.write_record(record.values().iter().map(|v| dialect.encode(v)))?;
        }
        Ok(())
    }

    /// Flush both sinks and hand back the underlying writers.
    pub fn finish(self) -> io::Result<(W, Option<W>)> {
        let loader = self.loader.into_inner().map_err(|e| e.into_error())?;
        let rewritten = match self.rewritten {
            Some((writer, _)) => Some(writer.into_inner().map_err(|e| e.into_error())?),
            None => None,
        };
        Ok((loader, rewritten))
    }
}
