//! Domain models for the molload pipeline.
//!
//! - [`HeadingSet`] - Output column layout with a name→index lookup
//! - [`Record`] - One input row laid out against a [`HeadingSet`]
//! - [`StandardizedDescriptor`] - One row of the load-ready table
//! - [`OutcomeCounters`] - Per-run accounting

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Name of the smiles column in every reconciled layout.
pub const SMILES_COLUMN: &str = "smiles";

/// Name of the identifier column in every reconciled layout.
pub const IDENTIFIER_COLUMN: &str = "uuid";

// =============================================================================
// Headings
// =============================================================================

/// Ordered output columns.
///
/// Position 0 is always the smiles column and position 1 the identifier. When
/// the identifier column had to be inserted, or was found further right in the
/// input, input rows are rearranged on load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingSet {
    names: Vec<String>,
    index: HashMap<String, usize>,
    smiles_column: String,
    identifier_column: String,
    inserted_identifier: bool,
    moved_identifier: Option<usize>,
    input_width: usize,
}

impl HeadingSet {
    /// Build a layout. `names` must already contain the identifier column.
    pub fn new(
        names: Vec<String>,
        smiles_column: impl Into<String>,
        identifier_column: impl Into<String>,
        inserted_identifier: bool,
    ) -> Self {
        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            index.entry(name.clone()).or_insert(i);
        }
        let input_width = names.len() - usize::from(inserted_identifier);
        Self {
            names,
            index,
            smiles_column: smiles_column.into(),
            identifier_column: identifier_column.into(),
            inserted_identifier,
            moved_identifier: None,
            input_width,
        }
    }

    /// Mark the identifier column as read from input position `position`
    /// rather than position 1.
    pub fn with_identifier_moved_from(mut self, position: usize) -> Self {
        self.moved_identifier = Some(position);
        self
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Index of a column by name (first occurrence).
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn smiles_column(&self) -> &str {
        &self.smiles_column
    }

    pub fn identifier_column(&self) -> &str {
        &self.identifier_column
    }

    /// Whether the identifier column is absent from the input.
    pub fn inserted_identifier(&self) -> bool {
        self.inserted_identifier
    }

    /// Input position of an identifier column that was moved to position 1.
    pub fn moved_identifier(&self) -> Option<usize> {
        self.moved_identifier
    }

    /// Number of columns in the input file.
    pub fn input_width(&self) -> usize {
        self.input_width
    }
}

// =============================================================================
// Records
// =============================================================================

/// One row, aligned to a [`HeadingSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    values: Vec<String>,
}

impl Record {
    /// Lay out raw input fields against the headings: short rows are padded,
    /// long rows truncated, and the identifier is placed at position 1 (empty
    /// when the input has no identifier column).
    pub fn from_input<I, S>(headings: &HeadingSet, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut values: Vec<String> = fields
            .into_iter()
            .take(headings.input_width())
            .map(Into::into)
            .collect();
        values.resize(headings.input_width(), String::new());
        if headings.inserted_identifier() {
            values.insert(1, String::new());
        } else if let Some(position) = headings.moved_identifier() {
            let identifier = values.remove(position);
            values.insert(1, identifier);
        }
        Self { values }
    }

    pub fn get<'a>(&'a self, headings: &HeadingSet, name: &str) -> Option<&'a str> {
        headings
            .index_of(name)
            .and_then(|i| self.values.get(i))
            .map(String::as_str)
    }

    pub fn set(&mut self, headings: &HeadingSet, name: &str, value: impl Into<String>) {
        if let Some(slot) = headings.index_of(name).and_then(|i| self.values.get_mut(i)) {
            *slot = value.into();
        }
    }

    pub fn smiles<'a>(&'a self, headings: &HeadingSet) -> &'a str {
        self.get(headings, headings.smiles_column()).unwrap_or("")
    }

    pub fn identifier<'a>(&'a self, headings: &HeadingSet) -> &'a str {
        self.get(headings, headings.identifier_column()).unwrap_or("")
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// `(column, value)` pairs in heading order.
    pub fn fields<'a>(
        &'a self,
        headings: &'a HeadingSet,
    ) -> impl Iterator<Item = (&'a str, &'a str)> {
        headings
            .names()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }
}

// =============================================================================
// Load-ready output
// =============================================================================

/// One row of the load-ready table. The column names are fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardizedDescriptor {
    #[serde(rename = "smiles")]
    pub canonical_smiles: String,
    #[serde(rename = "inchis")]
    pub structural_identifier: String,
    #[serde(rename = "inchik")]
    pub structural_identifier_hash: String,
    #[serde(rename = "hac")]
    pub heavy_atom_count: u32,
    #[serde(rename = "molecule-uuid")]
    pub record_identifier: String,
    #[serde(rename = "rec_number")]
    pub record_number: u64,
}

/// Heading row of the load-ready table.
pub const LOADER_COLUMNS: [&str; 6] = [
    "smiles",
    "inchis",
    "inchik",
    "hac",
    "molecule-uuid",
    "rec_number",
];

// =============================================================================
// Accounting
// =============================================================================

/// Record counts for a run. Only ever incremented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounters {
    pub processed: u64,
    pub failed: u64,
    pub succeeded: u64,
}

impl OutcomeCounters {
    /// Count a new record and return its 1-based ordinal.
    pub fn start_record(&mut self) -> u64 {
        self.processed += 1;
        self.processed
    }

    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    /// `processed == succeeded + failed`.
    pub fn is_balanced(&self) -> bool {
        self.processed == self.succeeded + self.failed
    }
}
