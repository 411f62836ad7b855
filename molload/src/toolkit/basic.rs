//! Pure Rust toolkit.
//!
//! Standardization removes stereochemistry and isotope labels and drops
//! brackets the organic subset can express. Atom order follows the input, so
//! two spellings of the same molecule in different atom orders do not
//! converge; use the `rdkit` feature when true canonical forms are needed.

use sha2::{Digest, Sha256};

use super::smiles::{self, ParsedSmiles};
use super::{ChemToolkit, Standardized};
use crate::error::{ToolkitError, ToolkitResult};

/// Version tag of the structural identifier layout.
const IDENTIFIER_PREFIX: &str = "MolID=1";

/// A structure read by [`BasicToolkit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Molecule {
    parsed: ParsedSmiles,
}

impl Molecule {
    /// Molecular formula in Hill order.
    pub fn formula(&self) -> String {
        self.parsed.formula()
    }

    pub fn heavy_atoms(&self) -> u32 {
        self.parsed.heavy_atoms()
    }

    pub fn standard_smiles(&self) -> String {
        self.parsed.to_standard_smiles()
    }
}

/// SMILES toolkit with no external dependencies.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicToolkit;

impl BasicToolkit {
    pub fn new() -> Self {
        Self
    }
}

impl ChemToolkit for BasicToolkit {
    type Handle = Molecule;

    fn standardize(&self, smiles: &str) -> ToolkitResult<Option<Standardized<Molecule>>> {
        Ok(smiles::parse(smiles).map(|parsed| {
            let molecule = Molecule { parsed };
            Standardized {
                canonical_smiles: molecule.standard_smiles(),
                handle: molecule,
            }
        }))
    }

    /// `MolID=1/<formula>/<standard smiles>`.
    fn structural_identifier(&self, handle: &Molecule) -> ToolkitResult<String> {
        Ok(format!(
            "{}/{}/{}",
            IDENTIFIER_PREFIX,
            handle.formula(),
            handle.standard_smiles()
        ))
    }

    /// 27-character key `AAAAAAAAAAAAAA-BBBBBBBBBB-N` over SHA-256 of the identifier.
    fn structural_identifier_hash(&self, identifier: &str) -> ToolkitResult<String> {
        if identifier.is_empty() {
            return Err(ToolkitError::new(identifier, "empty structural identifier"));
        }
        let digest = Sha256::digest(identifier.as_bytes());
        let letters: String = digest
            .iter()
            .take(24)
            .map(|b| char::from(b'A' + b % 26))
            .collect();
        Ok(format!("{}-{}-N", &letters[..14], &letters[14..]))
    }

    fn heavy_atom_count(&self, handle: &Molecule) -> ToolkitResult<u32> {
        Ok(handle.heavy_atoms())
    }
}
