//! capo core
//!
//! DOM-agnostic analysis of an HTML `<head>`: weight classification,
//! document and element validation, and ordering checks. Backends plug
//! in through [`TreeAdapter`].
//!
//! # Example
//! ```rust,ignore
//! use capo_core::{AnalysisContext, AnalyzeOptions, analyze, check_ordering};
//!
//! let ctx = AnalysisContext::for_url("https://example.com/")?;
//! let result = analyze(&head, &adapter, &ctx, AnalyzeOptions::default());
//! for violation in check_ordering(&result.weights) {
//!     println!("{}", violation.message);
//! }
//! ```

pub mod adapter;
pub mod analyzer;
mod context;
mod error;
mod options;
pub mod origin_trial;
pub mod report;
pub mod selector;
pub mod serialize;
pub mod validation;
pub mod weights;

#[cfg(test)]
mod test_tree;

pub use adapter::{Capability, SourceLocation, TreeAdapter};
pub use analyzer::{AnalysisResult, Analyzer, OrderingViolation, analyze, check_ordering};
pub use context::{AnalysisContext, parse_url};
pub use error::ConfigError;
pub use options::AnalyzeOptions;
pub use origin_trial::{OriginTrialPayload, TokenError};
pub use report::{AnalysisReport, ElementSnapshot};
pub use validation::{
    CustomValidation, ElementValidation, ValidationPayload, ValidationWarning,
    get_custom_validations, get_validation_warnings,
};
pub use weights::{ElementCategory, WeightInfo, classify, get_head_weights, get_weight};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
