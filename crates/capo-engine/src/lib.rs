//! capo - `<head>` analysis with pluggable tree backends
//!
//! Bundles the analysis core with its two built-in backends: a live,
//! mutable tree ([`dom`]) and html5ever's static tree ([`html`]).
//!
//! ```no_run
//! use capo_engine::Engine;
//!
//! let report = Engine::default()
//!     .analyze_html("<head><meta charset=utf-8><title>Hi</title></head>")
//!     .unwrap();
//! println!("{}", report.to_json().unwrap());
//! ```

mod config;
mod engine;
mod registry;

pub use capo_core as core;
pub use capo_dom as dom;
pub use capo_html as html;

pub use capo_core::{
    AnalysisContext, AnalysisReport, AnalysisResult, AnalyzeOptions, ElementCategory, TreeAdapter,
    ValidationWarning,
};
pub use config::Config;
pub use engine::{Engine, EngineError};
pub use registry::{AdapterInfo, AdapterRegistry, RegistryError};

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
