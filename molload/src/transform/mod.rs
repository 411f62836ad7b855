//! Transformation module.
//!
//! This module turns a delimited structure file into load-ready rows:
//! - Headings: leading-column contract and uuid insertion
//! - Identifier: per-record uuid generation or validation
//! - Record: per-record standardization and the output sinks
//! - Pipeline: one full run over a dataset

pub mod headings;
pub mod identifier;
pub mod pipeline;
pub mod record;

pub use identifier::{is_valid_uuid, IdentifierLifecycle, IdentifierMode};
pub use pipeline::{run, RunSummary, PROGRESS_INTERVAL};
pub use record::{OutputSinks, RecordOutcome, RecordProcessor};
