//! Field schema - column types persisted across dataset versions
//!
//! Every run observes the columns of its file, infers a coarse type per
//! column and merges the observation into the schema left by the previous
//! run. Columns are never removed: a column missing from the current file is
//! only marked inactive.

use chrono::{SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::error::{SchemaError, SchemaResult};
use crate::models::{HeadingSet, Record};
use crate::validation::validate_field_schema;

// =============================================================================
// Types
// =============================================================================

/// Coarse column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Boolean,
    Integer,
    Number,
    String,
}

impl FieldType {
    /// Type of a single value; `None` for an empty one.
    pub fn infer(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        if value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false") {
            return Some(Self::Boolean);
        }
        if value.parse::<i64>().is_ok() {
            return Some(Self::Integer);
        }
        if value.parse::<f64>().is_ok_and(f64::is_finite) {
            return Some(Self::Number);
        }
        Some(Self::String)
    }

    /// Least type covering both.
    pub fn merge(self, other: Self) -> Self {
        match (self, other) {
            (a, b) if a == b => a,
            (Self::Integer, Self::Number) | (Self::Number, Self::Integer) => Self::Number,
            _ => Self::String,
        }
    }
}

/// One column of the schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub active: bool,
}

impl FieldDescriptor {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            description: None,
            active: true,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Persisted schema of one dataset. Column order is first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Origin note of the version last written.
    pub description: String,
    pub fields: IndexMap<String, FieldDescriptor>,
}

/// Changes made by one merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub added: Vec<String>,
    pub reactivated: Vec<String>,
    pub deactivated: Vec<String>,
}

impl MergeReport {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.reactivated.is_empty() && self.deactivated.is_empty()
    }
}

// =============================================================================
// Observation
// =============================================================================

/// Column types accumulated over a run.
#[derive(Debug, Clone, Default)]
pub struct ObservedFields {
    fields: IndexMap<String, Option<FieldType>>,
}

impl ObservedFields {
    /// Start with every column of the layout, before any value is seen.
    pub fn from_headings(headings: &HeadingSet) -> Self {
        let mut observed = Self::default();
        for name in headings.names() {
            observed.register(name);
        }
        observed
    }

    pub fn register(&mut self, name: &str) {
        if !self.fields.contains_key(name) {
            self.fields.insert(name.to_string(), None);
        }
    }

    /// Narrow a column's type with one more value. Empty values are ignored.
    pub fn observe(&mut self, name: &str, value: &str) {
        let Some(seen) = FieldType::infer(value) else {
            self.register(name);
            return;
        };
        let slot = self.fields.entry(name.to_string()).or_insert(None);
        *slot = Some(match *slot {
            Some(current) => current.merge(seen),
            None => seen,
        });
    }

    pub fn observe_record(&mut self, headings: &HeadingSet, record: &Record) {
        for (name, value) in record.fields(headings) {
            self.observe(name, value);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Resolved type of a column. Columns with only empty values are strings.
    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.fields
            .get(name)
            .map(|t| t.unwrap_or(FieldType::String))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, FieldType)> {
        self.fields
            .iter()
            .map(|(name, t)| (name.as_str(), t.unwrap_or(FieldType::String)))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// =============================================================================
// Schema documents
// =============================================================================

impl FieldSchema {
    /// Schema of a dataset never seen before: its smiles and uuid columns.
    pub fn base(smiles_column: &str, identifier_column: &str) -> Self {
        let mut fields = IndexMap::new();
        fields.insert(
            smiles_column.to_string(),
            FieldDescriptor::new(FieldType::String).with_description("Molecule structure (SMILES)"),
        );
        fields.insert(
            identifier_column.to_string(),
            FieldDescriptor::new(FieldType::String).with_description("Unique UUID"),
        );
        Self {
            description: String::new(),
            fields,
        }
    }

    /// Load a schema document, or `None` if there is none at `path`.
    ///
    /// The document is validated before it is deserialized.
    pub fn load(path: &Path) -> SchemaResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&content)?;
        validate_field_schema(&value).map_err(|errors| SchemaError::Invalid { errors })?;
        Ok(Some(serde_json::from_value(value)?))
    }

    /// Write the document, creating the directory if needed.
    pub fn save(&self, path: &Path) -> SchemaResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Merge one run's observations into this schema.
    ///
    /// Observed columns are active, new ones are added with their observed
    /// type. Known types are never changed. Columns not observed become
    /// inactive.
    pub fn merge(&mut self, observed: &ObservedFields) -> MergeReport {
        let mut report = MergeReport::default();

        for (name, field) in self.fields.iter_mut() {
            match (observed.contains(name), field.active) {
                (true, false) => {
                    field.active = true;
                    report.reactivated.push(name.clone());
                }
                (false, true) => {
                    field.active = false;
                    report.deactivated.push(name.clone());
                }
                _ => {}
            }
        }

        for (name, field_type) in observed.iter() {
            if !self.fields.contains_key(name) {
                self.fields
                    .insert(name.to_string(), FieldDescriptor::new(field_type));
                report.added.push(name.to_string());
            }
        }

        report
    }

    /// Record where and when this version was produced.
    pub fn stamp(&mut self, source: &str) {
        self.description = format!(
            "Automatically created from {} on {}",
            source,
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
        );
    }

    pub fn active_fields(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.fields
            .iter()
            .filter(|(_, f)| f.active)
            .map(|(name, f)| (name.as_str(), f))
    }
}

/// Produce the next schema version for a dataset.
///
/// Starts from `prior`, or from [`FieldSchema::base`] for a new dataset.
pub fn reconcile(
    prior: Option<FieldSchema>,
    headings: &HeadingSet,
    observed: &ObservedFields,
    source: &str,
) -> (FieldSchema, MergeReport) {
    let mut schema = prior.unwrap_or_else(|| {
        FieldSchema::base(headings.smiles_column(), headings.identifier_column())
    });
    let report = schema.merge(observed);
    schema.stamp(source);
    (schema, report)
}
