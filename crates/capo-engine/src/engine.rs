//! Engine - configured entry point for hosts

use crate::config::Config;
use crate::registry::{AdapterRegistry, RegistryError};
use capo_core::{AnalysisReport, AnalysisResult, ConfigError, analyze};
use capo_dom::{DomAdapter, DomError, Document, LiveNode};
use capo_html::{ParseError, RcDomAdapter, StaticDocument};
use std::io::Read;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Failed to build live tree: {0}")]
    Dom(#[from] DomError),
}

/// Configuration plus the adapters it can choose from
pub struct Engine {
    config: Config,
    registry: AdapterRegistry,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Engine {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            registry: AdapterRegistry::with_builtins(),
        }
    }

    /// Engine whose configured adapter must already be registered
    pub fn try_new(config: Config) -> Result<Self, EngineError> {
        let engine = Self::new(config);
        if let Some(name) = &engine.config.adapter {
            engine.registry.check(name)?;
        }
        Ok(engine)
    }

    /// Set one configuration key; adapter names must be registered
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), EngineError> {
        let mut config = self.config.clone();
        config.set(key, value)?;
        if let Some(name) = &config.adapter {
            self.registry.check(name)?;
        }
        self.config = config;
        Ok(())
    }

    pub fn with_registry(mut self, registry: AdapterRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut AdapterRegistry {
        &mut self.registry
    }

    /// Analyze the `<head>` of a markup string with the configured adapter
    pub fn analyze_html(&self, html: &str) -> Result<AnalysisReport, EngineError> {
        let ctx = self.config.context()?;
        let options = self.config.options;
        let name = self.config.adapter.as_deref().unwrap_or(RcDomAdapter::NAME);
        let parsed = StaticDocument::parse(html);

        tracing::info!("analyzing {} bytes with `{}`", html.len(), name);
        let report = match name {
            RcDomAdapter::NAME => {
                let adapter = parsed.adapter();
                let head = parsed.require_head()?;
                analyze(&head, &adapter, &ctx, options).to_report(&adapter)
            }
            DomAdapter::NAME => {
                let live = capo_html::to_live(&parsed)?;
                analyze(&live.head(), &DomAdapter, &ctx, options).to_report(&DomAdapter)
            }
            custom => {
                // user adapters over one of the two built-in node types
                let head = parsed.require_head()?;
                match self.registry.analyze_with(custom, &head, &ctx, options) {
                    Err(RegistryError::TypeMismatch { .. }) => {
                        let live = capo_html::to_live(&parsed)?;
                        self.registry
                            .analyze_with(custom, &live.head(), &ctx, options)?
                    }
                    other => other?,
                }
            }
        };

        tracing::info!(
            "{} elements, {} document warnings, {} ordering violations",
            report.weights.len(),
            report.validation_warnings.len(),
            report.ordering_violations.len()
        );
        Ok(report)
    }

    pub fn analyze_reader<R: Read>(&self, reader: &mut R) -> Result<AnalysisReport, EngineError> {
        let mut html = String::new();
        reader.read_to_string(&mut html).map_err(ParseError::from)?;
        self.analyze_html(&html)
    }

    /// Parse into a live document and analyze it. The returned document
    /// can be edited and passed to [`Engine::reanalyze`].
    pub fn analyze_live_html(
        &self,
        html: &str,
    ) -> Result<(Document, AnalysisResult<LiveNode>), EngineError> {
        let document = capo_html::parse_live(html)?;
        let result = self.reanalyze(&document)?;
        Ok((document, result))
    }

    pub fn reanalyze(&self, document: &Document) -> Result<AnalysisResult<LiveNode>, EngineError> {
        let ctx = self.config.context()?;
        Ok(analyze(&document.head(), &DomAdapter, &ctx, self.config.options))
    }

    /// Analyze a head node of any registered backend, picked by node type
    pub fn analyze_node<N: 'static>(&self, head: &N) -> Result<AnalysisReport, EngineError> {
        let ctx = self.config.context()?;
        Ok(self.registry.analyze(head, &ctx, self.config.options)?)
    }
}
