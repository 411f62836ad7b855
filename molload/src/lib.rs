//! # Molload - chemical structure dataset normalization
//!
//! Molload takes a delimited file of chemical structures (one SMILES per row,
//! optionally gzip-wrapped), standardizes each structure, assigns or checks a
//! per-record uuid and produces a fixed-shape table ready for a database
//! loader. Column types are tracked across dataset versions in a persisted
//! field schema.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌──────────────┐
//! │ SMILES file │────▶│   Dialect   │────▶│   Records   │────▶│ Loader table │
//! │  (csv/.gz)  │     │ + headings  │     │  (toolkit)  │     │ + schema     │
//! └─────────────┘     └─────────────┘     └─────────────┘     └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use molload::{run, BasicToolkit, DatasetPaths, DialectDetector, ProcessingConfig};
//!
//! let paths = DatasetPaths::new("mols.csv", "in", "out", None).unwrap();
//! let summary = run(&paths, &ProcessingConfig::default(), &DialectDetector::new(), &BasicToolkit)
//!     .unwrap();
//! println!("{} succeeded, {} failed", summary.counters.succeeded, summary.counters.failed);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`config`] - Run flags and file locations
//! - [`models`] - Headings, records, load-ready rows, counters
//! - [`parser`] - Dialect detection
//! - [`toolkit`] - Chemistry toolkit seam
//! - [`transform`] - Headings, identifiers, records and the pipeline
//! - [`schema`] - Field schema reconciliation
//! - [`validation`] - Field schema document validation
//! - [`compress`] - gzip staging
//! - [`logs`] - Basic and event log streams

// Core modules
pub mod config;
pub mod error;
pub mod logs;
pub mod models;

// Parsing
pub mod compress;
pub mod parser;

// Chemistry
pub mod toolkit;

// Transformation
pub mod transform;

// Schema
pub mod schema;
pub mod validation;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError, DialectError, FormatError, PipelineError, PipelineResult, SchemaError,
    ToolkitError,
};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::{DatasetPaths, ProcessingConfig};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{HeadingSet, OutcomeCounters, Record, StandardizedDescriptor};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{read_first_row, Dialect, DialectDetector};

// =============================================================================
// Re-exports - Toolkit
// =============================================================================

pub use toolkit::{describe, BasicToolkit, ChemToolkit, Descriptors, Standardized};

#[cfg(feature = "rdkit")]
pub use toolkit::RdkitToolkit;

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::{run, RecordOutcome, RunSummary};

// =============================================================================
// Re-exports - Schema
// =============================================================================

pub use schema::{FieldDescriptor, FieldSchema, FieldType, MergeReport, ObservedFields};
