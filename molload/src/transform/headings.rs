//! Column layout of a run.
//!
//! Checks the leading-column contract (smiles first, uuid second) and decides
//! whether a uuid column must be inserted or moved into place.

use crate::config::ProcessingConfig;
use crate::error::{FormatError, PipelineResult};
use crate::models::{HeadingSet, IDENTIFIER_COLUMN, SMILES_COLUMN};
use crate::toolkit::ChemToolkit;

use super::identifier::is_valid_uuid;

/// Build the output layout from the first row of the file.
///
/// With `header = true` the first row is the heading row and the column
/// names are checked. With `header = false` it is the first data row: its
/// first value must standardize and its second must be a uuid for column 1 to
/// count as the identifier; names are synthesized.
pub fn reconcile<T: ChemToolkit>(
    first_row: &[String],
    config: &ProcessingConfig,
    toolkit: &T,
) -> PipelineResult<HeadingSet> {
    let first = first_row.first().ok_or(FormatError::EmptyFile)?;
    let smiles_ok = if config.header {
        first.eq_ignore_ascii_case(SMILES_COLUMN)
    } else {
        toolkit.standardize(first)?.is_some()
    };
    if !smiles_ok {
        return Err(FormatError::SmilesColumn(first.clone()).into());
    }

    let second = first_row.get(1);
    let has_identifier = second.is_some_and(|value| {
        if config.header {
            value.eq_ignore_ascii_case(IDENTIFIER_COLUMN)
        } else {
            is_valid_uuid(value)
        }
    });
    if !config.generate_uuid && !has_identifier {
        return Err(FormatError::IdentifierColumn(second.cloned().unwrap_or_default()).into());
    }

    let mut names: Vec<String> = if config.header {
        first_row.to_vec()
    } else {
        (0..first_row.len())
            .map(|i| match i {
                0 => SMILES_COLUMN.to_string(),
                1 if has_identifier => IDENTIFIER_COLUMN.to_string(),
                _ => format!("column_{}", i + 1),
            })
            .collect()
    };
    let smiles_column = names[0].clone();

    if has_identifier {
        let identifier_column = names[1].clone();
        return Ok(HeadingSet::new(names, smiles_column, identifier_column, false));
    }

    // A uuid column further right is moved to position 1
    if let Some(position) = names
        .iter()
        .position(|n| n.eq_ignore_ascii_case(IDENTIFIER_COLUMN))
    {
        let identifier_column = names.remove(position);
        names.insert(1, identifier_column.clone());
        let headings = HeadingSet::new(names, smiles_column, identifier_column, false);
        return Ok(headings.with_identifier_moved_from(position));
    }
    names.insert(1, IDENTIFIER_COLUMN.to_string());
    Ok(HeadingSet::new(names, smiles_column, IDENTIFIER_COLUMN, true))
}
