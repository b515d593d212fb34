//! Analyzer options

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

const BOOLEAN_DOMAIN: &str = "a boolean (true/false, 1/0, yes/no, on/off)";

/// Which validation passes run. The weight pass always runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct AnalyzeOptions {
    /// Document-level structural checks
    pub include_validation: bool,
    /// Per-element deep checks
    pub include_custom_validations: bool,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            include_validation: true,
            include_custom_validations: true,
        }
    }
}

impl AnalyzeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Weights only
    pub fn weights_only() -> Self {
        Self {
            include_validation: false,
            include_custom_validations: false,
        }
    }

    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.include_validation = enabled;
        self
    }

    pub fn with_custom_validations(mut self, enabled: bool) -> Self {
        self.include_custom_validations = enabled;
        self
    }

    /// Parse options from JSON, e.g. `{"includeValidation": false}`
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set an option from its string form (environment, CLI flags)
    pub fn set(&mut self, option: &str, value: &str) -> Result<(), ConfigError> {
        let slot = match option {
            "includeValidation" | "include_validation" | "include-validation" => {
                &mut self.include_validation
            }
            "includeCustomValidations"
            | "include_custom_validations"
            | "include-custom-validations" => &mut self.include_custom_validations,
            _ => return Err(ConfigError::UnknownOption(option.to_string())),
        };
        *slot = parse_bool(option, value)?;
        Ok(())
    }
}

fn parse_bool(option: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            option: option.to_string(),
            value: value.to_string(),
            expected: BOOLEAN_DOMAIN,
        }),
    }
}
