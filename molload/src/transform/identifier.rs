//! Per-record unique identifiers.

use uuid::Uuid;

use crate::config::ProcessingConfig;

/// How record identifiers are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierMode {
    /// A fresh v4 uuid for every record.
    Generate,
    /// The record must already carry a uuid.
    Validate,
}

impl From<&ProcessingConfig> for IdentifierMode {
    fn from(config: &ProcessingConfig) -> Self {
        if config.generate_uuid {
            Self::Generate
        } else {
            Self::Validate
        }
    }
}

/// Whether the given value parses as a uuid (hyphenated, simple, braced or URN).
pub fn is_valid_uuid(value: &str) -> bool {
    Uuid::parse_str(value.trim()).is_ok()
}

/// Generates or validates identifiers according to its mode.
#[derive(Debug, Clone, Copy)]
pub struct IdentifierLifecycle {
    mode: IdentifierMode,
}

impl IdentifierLifecycle {
    pub fn new(mode: IdentifierMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> IdentifierMode {
        self.mode
    }

    pub fn generates(&self) -> bool {
        self.mode == IdentifierMode::Generate
    }

    /// Identifier for a record whose identifier column holds `existing`.
    ///
    /// Generate mode ignores `existing`. Validate mode returns the trimmed
    /// value when it is a uuid and `None` otherwise.
    pub fn resolve(&self, existing: &str) -> Option<String> {
        match self.mode {
            IdentifierMode::Generate => Some(Uuid::new_v4().to_string()),
            IdentifierMode::Validate => {
                let existing = existing.trim();
                is_valid_uuid(existing).then(|| existing.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ignores_existing() {
        let lifecycle = IdentifierLifecycle::new(IdentifierMode::Generate);
        let existing = "6f1c2d6e-1f4e-4c1e-9a38-0a3a9f1d2b7c";
        let generated = lifecycle.resolve(existing).unwrap();
        assert_ne!(generated, existing);
        assert_eq!(Uuid::parse_str(&generated).unwrap().get_version_num(), 4);
    }

    #[test]
    fn test_generate_is_fresh_each_time() {
        let lifecycle = IdentifierLifecycle::new(IdentifierMode::Generate);
        assert_ne!(lifecycle.resolve(""), lifecycle.resolve(""));
    }

    #[test]
    fn test_validate_accepts_uuid_forms() {
        let lifecycle = IdentifierLifecycle::new(IdentifierMode::Validate);
        assert_eq!(
            lifecycle.resolve(" 6f1c2d6e-1f4e-4c1e-9a38-0a3a9f1d2b7c "),
            Some("6f1c2d6e-1f4e-4c1e-9a38-0a3a9f1d2b7c".to_string())
        );
        assert!(lifecycle.resolve("6f1c2d6e1f4e4c1e9a380a3a9f1d2b7c").is_some());
        assert!(lifecycle.resolve("{6f1c2d6e-1f4e-4c1e-9a38-0a3a9f1d2b7c}").is_some());
    }

    #[test]
    fn test_validate_rejects_garbage() {
        let lifecycle = IdentifierLifecycle::new(IdentifierMode::Validate);
        assert!(lifecycle.resolve("not-a-uuid").is_none());
        assert!(lifecycle.resolve("").is_none());
    }

    #[test]
    fn test_mode_from_config() {
        let config = ProcessingConfig {
            generate_uuid: false,
            header: true,
        };
        assert_eq!(IdentifierMode::from(&config), IdentifierMode::Validate);
        assert_eq!(
            IdentifierMode::from(&ProcessingConfig::default()),
            IdentifierMode::Generate
        );
    }
}
