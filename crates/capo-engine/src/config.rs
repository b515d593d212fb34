//! Engine configuration

use capo_core::{AnalysisContext, AnalyzeOptions, ConfigError, parse_url};
use serde::{Deserialize, Serialize};

/// Everything a host can configure about one engine
///
/// ```json
/// {
///   "options": { "includeCustomValidations": false },
///   "documentUrl": "https://example.com/",
///   "adapter": "dom"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct Config {
    pub options: AnalyzeOptions,
    /// URL the analyzed document is served from
    pub document_url: Option<String>,
    /// Overrides `<base href>` when resolving preload targets
    pub base_url: Option<String>,
    /// Backend used for markup input; `None` means "rcdom"
    pub adapter: Option<String>,
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        // surface bad URLs at load time
        config.context()?;
        Ok(config)
    }

    /// Set one key from its string form. Analyzer option names are
    /// forwarded to [`AnalyzeOptions::set`]. Adapter names are checked
    /// against a registry by [`Engine::set`](crate::Engine::set).
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "documentUrl" | "document_url" | "document-url" => {
                parse_url("document", value)?;
                self.document_url = Some(value.to_string());
            }
            "baseUrl" | "base_url" | "base-url" => {
                parse_url("base", value)?;
                self.base_url = Some(value.to_string());
            }
            "adapter" => {
                let name = value.trim();
                if name.is_empty() {
                    return Err(ConfigError::InvalidValue {
                        option: key.to_string(),
                        value: value.to_string(),
                        expected: "an adapter name",
                    });
                }
                self.adapter = Some(name.to_string());
            }
            _ => self.options.set(key, value)?,
        }
        Ok(())
    }

    /// Analysis context for these URLs, stamped with the current time
    pub fn context(&self) -> Result<AnalysisContext, ConfigError> {
        let mut ctx = AnalysisContext::new();
        if let Some(url) = &self.document_url {
            ctx = ctx.with_document_url(parse_url("document", url)?);
        }
        if let Some(url) = &self.base_url {
            ctx = ctx.with_base_url(parse_url("base", url)?);
        }
        Ok(ctx)
    }
}
