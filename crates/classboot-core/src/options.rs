//! Runtime options
//!
//! Options can be built in code or loaded from TOML:
//!
//! ```toml
//! static_marker = "_"
//! constructor_prefix = "$"
//! root_class_name = "Object"
//! metadata_class_name = "Class"
//! ```

use crate::{BootError, BootResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Runtime options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootOptions {
    /// Key prefix marking static members; the bare marker is the static initializer
    pub static_marker: char,

    /// Prefix prepended to the constructor selector to name the constructor variant
    pub constructor_prefix: String,

    /// Name of the root object type
    pub root_class_name: String,

    /// Name the metadata class is defined under
    pub metadata_class_name: String,
}

impl Default for BootOptions {
    fn default() -> Self {
        Self {
            static_marker: '_',
            constructor_prefix: "$".to_string(),
            root_class_name: "Object".to_string(),
            metadata_class_name: "Class".to_string(),
        }
    }
}

impl BootOptions {
    /// Parse options from TOML text
    pub fn from_toml_str(content: &str) -> BootResult<Self> {
        let options: BootOptions = toml::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    /// Parse options from a TOML file
    pub fn from_file(path: &Path) -> BootResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BootError::InvalidOptions(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Validate the options
    pub fn validate(&self) -> BootResult<()> {
        if self.root_class_name.is_empty() {
            return Err(BootError::InvalidOptions(
                "root_class_name cannot be empty".to_string(),
            ));
        }
        if self.metadata_class_name.is_empty() {
            return Err(BootError::InvalidOptions(
                "metadata_class_name cannot be empty".to_string(),
            ));
        }
        if self.metadata_class_name == self.root_class_name {
            return Err(BootError::InvalidOptions(format!(
                "metadata class and root type share the name '{}'",
                self.root_class_name
            )));
        }
        if self.metadata_class_name.starts_with(self.static_marker) {
            return Err(BootError::InvalidOptions(format!(
                "metadata_class_name '{}' starts with the static marker",
                self.metadata_class_name
            )));
        }
        if self.constructor_prefix.starts_with(self.static_marker) {
            return Err(BootError::InvalidOptions(format!(
                "constructor_prefix '{}' would mark constructors as static",
                self.constructor_prefix
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = BootOptions::default();
        assert_eq!(options.static_marker, '_');
        assert_eq!(options.constructor_prefix, "$");
        assert_eq!(options.root_class_name, "Object");
        assert_eq!(options.metadata_class_name, "Class");
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let options = BootOptions::from_toml_str("static_marker = \"@\"\n").unwrap();
        assert_eq!(options.static_marker, '@');
        assert_eq!(options.constructor_prefix, "$");
    }

    #[test]
    fn test_full_toml() {
        let content = r#"
            static_marker = "%"
            constructor_prefix = "new$"
            root_class_name = "Root"
            metadata_class_name = "Meta"
        "#;
        let options = BootOptions::from_toml_str(content).unwrap();
        assert_eq!(options.static_marker, '%');
        assert_eq!(options.constructor_prefix, "new$");
        assert_eq!(options.root_class_name, "Root");
        assert_eq!(options.metadata_class_name, "Meta");
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            BootOptions::from_toml_str("static_marker = "),
            Err(BootError::Config(_))
        ));
    }

    #[test]
    fn test_validation_errors() {
        let clash = BootOptions {
            metadata_class_name: "Object".to_string(),
            ..BootOptions::default()
        };
        assert!(matches!(clash.validate(), Err(BootError::InvalidOptions(_))));

        let static_prefix = BootOptions {
            constructor_prefix: "_new".to_string(),
            ..BootOptions::default()
        };
        assert!(matches!(
            static_prefix.validate(),
            Err(BootError::InvalidOptions(_))
        ));
    }
}
