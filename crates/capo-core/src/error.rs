//! Engine errors
//!
//! Only caller mistakes are errors. Problems in the analyzed document
//! are reported as warnings and never surface here.

/// Invalid configuration supplied by the caller
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown option `{0}`; expected one of: includeValidation, includeCustomValidations")]
    UnknownOption(String),

    #[error("Invalid value `{value}` for option `{option}`; expected {expected}")]
    InvalidValue {
        option: String,
        value: String,
        expected: &'static str,
    },

    #[error("Invalid options document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid {field} URL `{value}`: {source}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_value_display() {
        let err = ConfigError::InvalidValue {
            option: "includeValidation".to_string(),
            value: "maybe".to_string(),
            expected: "a boolean (true/false)",
        };
        assert_eq!(
            err.to_string(),
            "Invalid value `maybe` for option `includeValidation`; expected a boolean (true/false)"
        );
    }
}
