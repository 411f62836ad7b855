//! JSON Schema validation for field schema documents.
//!
//! Documents are checked against `schemas/field-schema.json` (Draft 7),
//! embedded at compile time, before they are trusted as the prior schema of
//! a dataset.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use molload::validation::validate_field_schema;
//!
//! let document = json!({
//!     "description": "Automatically created from mols.csv on 2024-01-01T00:00:00+00:00",
//!     "fields": {
//!         "smiles": { "type": "string", "active": true }
//!     }
//! });
//! assert!(validate_field_schema(&document).is_ok());
//! ```

use serde_json::Value;

const FIELD_SCHEMA: &str = include_str!("../../schemas/field-schema.json");

/// Validate a JSON value against a JSON schema.
///
/// # Returns
/// * `Ok(())` if valid
/// * `Err(Vec<String>)` with one message per violation
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator =
        jsonschema::draft7::new(schema).map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// The embedded field schema document schema.
pub fn field_schema() -> Result<Value, Vec<String>> {
    serde_json::from_str(FIELD_SCHEMA).map_err(|e| vec![format!("Invalid embedded schema: {}", e)])
}

/// Validate a field schema document.
pub fn validate_field_schema(data: &Value) -> Result<(), Vec<String>> {
    validate(&field_schema()?, data)
}

/// Quick check of a field schema document.
pub fn is_valid_field_schema(data: &Value) -> bool {
    field_schema().is_ok_and(|schema| jsonschema::draft7::is_valid(&schema, data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_embedded_schema_parses() {
        assert!(field_schema().is_ok());
    }

    #[test]
    fn test_valid_document() {
        let document = json!({
            "description": "Automatically created from a.csv on 2024-01-01T00:00:00+00:00",
            "fields": {
                "smiles": { "type": "string", "description": "Molecule structure", "active": true },
                "mw": { "type": "number", "active": false }
            }
        });
        assert!(validate_field_schema(&document).is_ok());
        assert!(is_valid_field_schema(&document));
    }

    #[test]
    fn test_unknown_type_rejected() {
        let document = json!({
            "description": "x",
            "fields": { "mw": { "type": "float", "active": true } }
        });
        let errors = validate_field_schema(&document).unwrap_err();
        assert!(!errors.is_empty());
        assert!(errors.iter().any(|e| e.contains("float")));
    }

    #[test]
    fn test_missing_active_rejected() {
        let document = json!({
            "description": "x",
            "fields": { "mw": { "type": "number" } }
        });
        assert!(!is_valid_field_schema(&document));
    }

    #[test]
    fn test_missing_fields_rejected() {
        assert!(validate_field_schema(&json!({ "description": "x" })).is_err());
    }
}
