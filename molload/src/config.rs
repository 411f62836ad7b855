//! Run configuration.
//!
//! [`ProcessingConfig`] is resolved once from the `&`-delimited parameter blob
//! and handed to every component that needs it. [`DatasetPaths`] derives every
//! file location of a run from the dataset filename and its directories.

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};

/// File name of the load-ready table written to the output directory.
pub const LOADER_FILENAME: &str = "tmploaderfile.csv";

/// Suffix of the persisted field schema document.
pub const SCHEMA_SUFFIX: &str = ".schema.json";

/// Suffix that marks a gzip-wrapped dataset.
pub const GZIP_SUFFIX: &str = ".gz";

/// Flags controlling a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingConfig {
    /// Assign a fresh uuid to every record (otherwise validate column 1).
    pub generate_uuid: bool,
    /// Row 1 of the input is a heading row.
    pub header: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            generate_uuid: true,
            header: true,
        }
    }
}

impl ProcessingConfig {
    /// Parse a `key=value&key=value` blob.
    ///
    /// Keys are case-insensitive and unknown keys are ignored. Empty pieces
    /// (`a=1&&b=2`, trailing `&`) are skipped.
    ///
    /// # Example
    /// ```
    /// use molload::ProcessingConfig;
    ///
    /// let config = ProcessingConfig::from_parameters(Some("generate_uuid=false")).unwrap();
    /// assert!(!config.generate_uuid);
    /// assert!(config.header);
    /// ```
    pub fn from_parameters(blob: Option<&str>) -> ConfigResult<Self> {
        let mut config = Self::default();
        let Some(blob) = blob else {
            return Ok(config);
        };

        for piece in blob.split('&').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = piece
                .split_once('=')
                .ok_or_else(|| ConfigError::MalformedParameter(piece.to_string()))?;
            let key = key.trim().to_lowercase();
            match key.as_str() {
                "generate_uuid" => config.generate_uuid = parse_bool(&key, value)?,
                "header" => config.header = parse_bool(&key, value)?,
                _ => {}
            }
        }

        Ok(config)
    }
}

fn parse_bool(key: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidBoolean {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Locations of every file touched by a run.
#[derive(Debug, Clone)]
pub struct DatasetPaths {
    /// Dataset file name as provided (may end in `.gz`).
    pub filename: String,
    /// Directory holding the input dataset.
    pub input_dir: PathBuf,
    /// Directory receiving the load-ready table and rewritten dataset.
    pub output_dir: PathBuf,
    /// Directory holding the field schema document.
    pub schema_dir: PathBuf,
}

impl DatasetPaths {
    pub fn new(
        filename: impl Into<String>,
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        schema_dir: Option<PathBuf>,
    ) -> ConfigResult<Self> {
        let filename = filename.into();
        if filename.trim().is_empty() {
            return Err(ConfigError::Missing("DT_DATASET_FILENAME"));
        }
        let output_dir = output_dir.into();
        Ok(Self {
            filename,
            input_dir: input_dir.into(),
            schema_dir: schema_dir.unwrap_or_else(|| output_dir.clone()),
            output_dir,
        })
    }

    /// Whether the dataset is gzip-wrapped.
    pub fn is_gzip(&self) -> bool {
        self.filename.ends_with(GZIP_SUFFIX)
    }

    /// File name with any `.gz` suffix removed.
    pub fn plain_filename(&self) -> &str {
        self.filename
            .strip_suffix(GZIP_SUFFIX)
            .unwrap_or(&self.filename)
    }

    /// Dataset identity: file name without `.gz` and without its extension.
    pub fn base_name(&self) -> &str {
        let plain = self.plain_filename();
        Path::new(plain)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(plain)
    }

    pub fn input_file(&self) -> PathBuf {
        self.input_dir.join(&self.filename)
    }

    pub fn loader_file(&self) -> PathBuf {
        self.output_dir.join(LOADER_FILENAME)
    }

    /// Rewritten dataset, under the original file name (compressed again
    /// when the input was).
    pub fn rewritten_file(&self) -> PathBuf {
        self.output_dir.join(&self.filename)
    }

    pub fn schema_file(&self) -> PathBuf {
        self.schema_dir
            .join(format!("{}{}", self.base_name(), SCHEMA_SUFFIX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_blob() {
        let config = ProcessingConfig::from_parameters(None).unwrap();
        assert_eq!(config, ProcessingConfig::default());
        assert!(config.generate_uuid);
        assert!(config.header);
    }

    #[test]
    fn test_parse_both_flags() {
        let config =
            ProcessingConfig::from_parameters(Some("generate_uuid=False&HEADER=no")).unwrap();
        assert!(!config.generate_uuid);
        assert!(!config.header);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let config =
            ProcessingConfig::from_parameters(Some("colour=blue&header=true&")).unwrap();
        assert!(config.header);
        assert!(config.generate_uuid);
    }

    #[test]
    fn test_malformed_piece_is_error() {
        let err = ProcessingConfig::from_parameters(Some("generate_uuid")).unwrap_err();
        assert!(matches!(err, ConfigError::MalformedParameter(p) if p == "generate_uuid"));
    }

    #[test]
    fn test_invalid_boolean_is_error() {
        let err = ProcessingConfig::from_parameters(Some("header=perhaps")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBoolean { .. }));
    }

    #[test]
    fn test_paths_for_gzip_dataset() {
        let paths = DatasetPaths::new("mols.smi.gz", "/in", "/out", None).unwrap();
        assert!(paths.is_gzip());
        assert_eq!(paths.plain_filename(), "mols.smi");
        assert_eq!(paths.base_name(), "mols");
        assert_eq!(paths.input_file(), PathBuf::from("/in/mols.smi.gz"));
        assert_eq!(paths.rewritten_file(), PathBuf::from("/out/mols.smi.gz"));
        assert_eq!(paths.schema_file(), PathBuf::from("/out/mols.schema.json"));
        assert_eq!(paths.loader_file(), PathBuf::from("/out/tmploaderfile.csv"));
    }

    #[test]
    fn test_schema_dir_override() {
        let paths =
            DatasetPaths::new("a.csv", "/in", "/out", Some(PathBuf::from("/schemas"))).unwrap();
        assert!(!paths.is_gzip());
        assert_eq!(paths.schema_file(), PathBuf::from("/schemas/a.schema.json"));
    }

    #[test]
    fn test_empty_filename_rejected() {
        assert!(DatasetPaths::new(" ", "/in", "/out", None).is_err());
    }
}
