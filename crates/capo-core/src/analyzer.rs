//! Analyzer
//!
//! Runs the three passes over one `<head>` and merges them:
//!
//! 1. weights for every child
//! 2. document-level validation (optional)
//! 3. element-level validation per child (optional)
//!
//! [`check_ordering`] is a separate scan over the weights.

use crate::adapter::TreeAdapter;
use crate::context::AnalysisContext;
use crate::options::AnalyzeOptions;
use crate::report::AnalysisReport;
use crate::validation::{
    CustomValidation, ValidationWarning, get_custom_validations, get_validation_warnings,
};
use crate::weights::{ElementCategory, WeightInfo, get_head_weights};

/// Everything one analysis run found
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult<N> {
    pub weights: Vec<WeightInfo<N>>,
    pub validation_warnings: Vec<ValidationWarning<N>>,
    pub custom_validations: Vec<CustomValidation<N>>,
    pub head: N,
}

impl<N: Clone + PartialEq> AnalysisResult<N> {
    /// Referenced by any warning of either validation pass
    pub fn is_flagged(&self, element: &N) -> bool {
        self.validation_warnings
            .iter()
            .any(|w| w.elements.contains(element))
            || self
                .custom_validations
                .iter()
                .any(|v| &v.element == element && !v.warnings.is_empty())
    }

    /// Element-level result for one element
    pub fn custom_validation(&self, element: &N) -> Option<&CustomValidation<N>> {
        self.custom_validations.iter().find(|v| &v.element == element)
    }

    pub fn ordering_violations(&self) -> Vec<OrderingViolation<N>> {
        check_ordering(&self.weights)
    }

    /// Backend-independent, serializable view of this result
    pub fn to_report<A>(&self, adapter: &A) -> AnalysisReport
    where
        A: TreeAdapter<Node = N>,
    {
        AnalysisReport::new(adapter, self)
    }
}

/// A heavier element placed right after a lighter one
#[derive(Debug, Clone, PartialEq)]
pub struct OrderingViolation<N> {
    /// Index of the later element
    pub index: usize,
    pub element: N,
    pub weight: u8,
    pub category: ElementCategory,
    pub previous_element: N,
    pub previous_weight: u8,
    pub previous_category: ElementCategory,
    pub message: String,
}

/// Adjacent pairs whose later element outweighs the earlier one
pub fn check_ordering<N: Clone>(weights: &[WeightInfo<N>]) -> Vec<OrderingViolation<N>> {
    weights
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[1].weight > pair[0].weight)
        .map(|(i, pair)| {
            let (previous, current) = (&pair[0], &pair[1]);
            OrderingViolation {
                index: i + 1,
                element: current.element.clone(),
                weight: current.weight,
                category: current.category,
                previous_element: previous.element.clone(),
                previous_weight: previous.weight,
                previous_category: previous.category,
                message: format!(
                    "{} (weight {}) should come before {} (weight {})",
                    current.category, current.weight, previous.category, previous.weight
                ),
            }
        })
        .collect()
}

/// Analyzer bound to one adapter and context
pub struct Analyzer<'a, A: TreeAdapter> {
    adapter: &'a A,
    ctx: AnalysisContext,
    options: AnalyzeOptions,
}

impl<'a, A: TreeAdapter> Analyzer<'a, A> {
    pub fn new(adapter: &'a A) -> Self {
        Self {
            adapter,
            ctx: AnalysisContext::new(),
            options: AnalyzeOptions::default(),
        }
    }

    pub fn with_context(mut self, ctx: AnalysisContext) -> Self {
        self.ctx = ctx;
        self
    }

    pub fn with_options(mut self, options: AnalyzeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn context(&self) -> &AnalysisContext {
        &self.ctx
    }

    pub fn options(&self) -> AnalyzeOptions {
        self.options
    }

    /// Run every enabled pass over `head`
    pub fn analyze(&self, head: &A::Node) -> AnalysisResult<A::Node> {
        analyze(head, self.adapter, &self.ctx, self.options)
    }
}

/// Analyze the children of `head`
pub fn analyze<A: TreeAdapter>(
    head: &A::Node,
    adapter: &A,
    ctx: &AnalysisContext,
    options: AnalyzeOptions,
) -> AnalysisResult<A::Node> {
    tracing::debug!(
        "analyzing <head> with the {} adapter ({:?})",
        adapter.name(),
        options
    );

    let weights = get_head_weights(adapter, head);

    let validation_warnings = if options.include_validation {
        get_validation_warnings(adapter, head, ctx)
    } else {
        Vec::new()
    };

    let custom_validations = if options.include_custom_validations {
        weights
            .iter()
            .filter_map(|info| {
                let result = get_custom_validations(adapter, &info.element, ctx);
                (!result.is_empty()).then(|| CustomValidation {
                    element: info.element.clone(),
                    warnings: result.warnings,
                    payload: result.payload,
                })
            })
            .collect()
    } else {
        Vec::new()
    };

    tracing::debug!(
        "{} element(s), {} document warning(s), {} element validation(s)",
        weights.len(),
        validation_warnings.len(),
        custom_validations.len()
    );

    AnalysisResult {
        weights,
        validation_warnings,
        custom_validations,
        head: head.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_tree::{TestAdapter, document, el, text};

    #[test]
    fn test_well_ordered_head() {
        let adapter = TestAdapter;
        let doc = document(vec![
            el("meta", &[("charset", "utf-8")]),
            el("title", &[]).with_children(vec![text("X")]),
            el("script", &[("src", "a.js")]),
        ]);
        let result = analyze(&doc.head, &adapter, &AnalysisContext::new(), AnalyzeOptions::default());

        let weights: Vec<u8> = result.weights.iter().map(|w| w.weight).collect();
        assert_eq!(weights, vec![10, 9, 5]);
        assert!(result.ordering_violations().is_empty());
        assert_eq!(result.head, doc.head);
    }

    #[test]
    fn test_check_ordering() {
        let adapter = TestAdapter;
        let doc = document(vec![
            el("link", &[("rel", "stylesheet"), ("href", "a.css")]),
            el("meta", &[("charset", "utf-8")]),
        ]);
        let result = analyze(&doc.head, &adapter, &AnalysisContext::new(), AnalyzeOptions::weights_only());
        let violations = check_ordering(&result.weights);

        assert_eq!(violations.len(), 1);
        let violation = &violations[0];
        assert_eq!(violation.index, 1);
        assert_eq!(violation.category, ElementCategory::Meta);
        assert_eq!(violation.previous_category, ElementCategory::SyncStyles);
        assert_eq!((violation.weight, violation.previous_weight), (10, 4));
        assert_eq!(violation.message, "META (weight 10) should come before SYNC_STYLES (weight 4)");
    }

    #[test]
    fn test_equal_weights_are_not_violations() {
        let adapter = TestAdapter;
        let doc = document(vec![el("script", &[]), el("script", &[("src", "b.js")])]);
        let weights = get_head_weights(&adapter, &doc.head);
        assert!(check_ordering(&weights).is_empty());
        assert!(check_ordering::<crate::test_tree::NodeRef>(&[]).is_empty());
    }

    #[test]
    fn test_options_skip_passes() {
        let adapter = TestAdapter;
        let doc = document(vec![el("meta", &[("http-equiv", "x-ua-compatible"), ("content", "IE=edge")])]);
        let ctx = AnalysisContext::new();

        let full = analyze(&doc.head, &adapter, &ctx, AnalyzeOptions::default());
        assert_eq!(full.validation_warnings.len(), 2);
        assert_eq!(full.custom_validations.len(), 1);

        let weights_only = Analyzer::new(&adapter)
            .with_options(AnalyzeOptions::weights_only())
            .analyze(&doc.head);
        assert_eq!(weights_only.weights.len(), 1);
        assert!(weights_only.validation_warnings.is_empty());
        assert!(weights_only.custom_validations.is_empty());
    }

    #[test]
    fn test_is_flagged() {
        let adapter = TestAdapter;
        let doc = document(vec![
            el("meta", &[("charset", "utf-8")]),
            el("title", &[]).with_children(vec![text("A")]),
            el("title", &[]).with_children(vec![text("B")]),
            el("meta", &[("name", "viewport"), ("content", "width=device-width")]),
            el("meta", &[("http-equiv", "cache-control"), ("content", "no-cache")]),
        ]);
        let result = Analyzer::new(&adapter).analyze(&doc.head);
        let children = adapter.children(&doc.head);

        assert!(!result.is_flagged(&children[0]));
        assert!(result.is_flagged(&children[1]));
        assert!(result.is_flagged(&children[2]));
        assert!(!result.is_flagged(&children[3]));
        assert!(result.is_flagged(&children[4]));
        assert!(result.custom_validation(&children[4]).is_some());
        // viewport payload is recorded even without warnings
        assert!(result.custom_validation(&children[3]).is_some());
    }
}
