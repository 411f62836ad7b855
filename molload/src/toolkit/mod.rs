//! Chemistry toolkit seam.
//!
//! The pipeline never parses structures itself: it asks a [`ChemToolkit`] to
//! standardize a SMILES string and to derive identifiers from the resulting
//! handle. Two implementations ship with the crate:
//!
//! - [`BasicToolkit`] - pure Rust SMILES reader, always available
//! - `RdkitToolkit` - RDKit through embedded Python (feature `rdkit`)
//!
//! The contract distinguishes an *expected* failure from a *fault*:
//! `Ok(None)` from [`ChemToolkit::standardize`] means the structure could not
//! be standardized and the record is skipped; any `Err` means the toolkit
//! itself misbehaved and the run must stop.

pub mod basic;
mod smiles;

#[cfg(feature = "rdkit")]
pub mod rdkit;

pub use basic::{BasicToolkit, Molecule};

#[cfg(feature = "rdkit")]
pub use rdkit::RdkitToolkit;

use crate::error::ToolkitResult;

/// A successfully standardized structure.
#[derive(Debug, Clone)]
pub struct Standardized<H> {
    /// Non-isomeric standard SMILES.
    pub canonical_smiles: String,
    /// Toolkit molecule, used to derive the remaining descriptors.
    pub handle: H,
}

/// Structure standardization and descriptor derivation.
pub trait ChemToolkit {
    /// Opaque molecule produced by [`ChemToolkit::standardize`].
    type Handle;

    /// Standardize a SMILES string. `Ok(None)` if it cannot be standardized.
    fn standardize(&self, smiles: &str) -> ToolkitResult<Option<Standardized<Self::Handle>>>;

    /// Full structural identifier string (InChI-like).
    fn structural_identifier(&self, handle: &Self::Handle) -> ToolkitResult<String>;

    /// Fixed-length hash of a structural identifier (InChIKey-like).
    fn structural_identifier_hash(&self, identifier: &str) -> ToolkitResult<String>;

    /// Number of non-hydrogen atoms.
    fn heavy_atom_count(&self, handle: &Self::Handle) -> ToolkitResult<u32>;
}

/// Every descriptor the toolkit derives for one structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptors {
    pub canonical_smiles: String,
    pub structural_identifier: String,
    pub structural_identifier_hash: String,
    pub heavy_atom_count: u32,
}

/// Derive all descriptors from a standardized structure.
pub fn describe<T: ChemToolkit>(
    toolkit: &T,
    standardized: &Standardized<T::Handle>,
) -> ToolkitResult<Descriptors> {
    let structural_identifier = toolkit.structural_identifier(&standardized.handle)?;
    let structural_identifier_hash = toolkit.structural_identifier_hash(&structural_identifier)?;
    let heavy_atom_count = toolkit.heavy_atom_count(&standardized.handle)?;
    Ok(Descriptors {
        canonical_smiles: standardized.canonical_smiles.clone(),
        structural_identifier,
        structural_identifier_hash,
        heavy_atom_count,
    })
}
