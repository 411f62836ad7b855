//! RDKit toolkit through embedded Python.
//!
//! Requires a Python environment with `rdkit` importable. Any Python
//! exception is reported as a [`ToolkitError`]; RDKit's own "could not parse"
//! result (`None`) is an ordinary `Ok(None)`.

use pyo3::ffi::c_str;
use pyo3::prelude::*;
use pyo3::types::PyModule;
use std::ffi::CString;

use super::{ChemToolkit, Standardized};
use crate::error::{ToolkitError, ToolkitResult};

/// RDKit molecule object.
pub struct RdkitMolecule(Py<PyAny>);

/// Toolkit backed by the `rdkit_wrapper` Python module.
pub struct RdkitToolkit {
    module: Py<PyModule>,
}

impl RdkitToolkit {
    /// Load the wrapper module. Fails if RDKit cannot be imported.
    pub fn init() -> ToolkitResult<Self> {
        Python::attach(|py| {
            let code = CString::new(include_str!("../../python/rdkit_wrapper.py"))?;
            let module = PyModule::from_code(
                py,
                code.as_c_str(),
                c_str!("rdkit_wrapper.py"),
                c_str!("rdkit_wrapper"),
            )?;
            Ok::<_, PyErr>(Self {
                module: module.unbind(),
            })
        })
        .map_err(|e| ToolkitError::new("", format!("cannot load RDKit: {}", e)))
    }

    fn call<T>(
        &self,
        smiles: &str,
        f: impl FnOnce(&Bound<'_, PyModule>) -> PyResult<T>,
    ) -> ToolkitResult<T> {
        Python::attach(|py| f(self.module.bind(py)))
            .map_err(|e| ToolkitError::new(smiles, e.to_string()))
    }
}

impl ChemToolkit for RdkitToolkit {
    type Handle = RdkitMolecule;

    fn standardize(&self, smiles: &str) -> ToolkitResult<Option<Standardized<RdkitMolecule>>> {
        self.call(smiles, |module| {
            let (canonical, mol): (Option<String>, Option<Py<PyAny>>) =
                module.getattr("standardize")?.call1((smiles,))?.extract()?;
            Ok(match (canonical, mol) {
                (Some(canonical_smiles), Some(mol)) => Some(Standardized {
                    canonical_smiles,
                    handle: RdkitMolecule(mol),
                }),
                _ => None,
            })
        })
    }

    fn structural_identifier(&self, handle: &RdkitMolecule) -> ToolkitResult<String> {
        self.call("", |module| {
            module.getattr("inchi")?.call1((handle.0.clone_ref(module.py()),))?.extract()
        })
    }

    fn structural_identifier_hash(&self, identifier: &str) -> ToolkitResult<String> {
        self.call(identifier, |module| {
            module.getattr("inchi_key")?.call1((identifier,))?.extract()
        })
    }

    fn heavy_atom_count(&self, handle: &RdkitMolecule) -> ToolkitResult<u32> {
        self.call("", |module| {
            module.getattr("heavy_atoms")?.call1((handle.0.clone_ref(module.py()),))?.extract()
        })
    }
}
